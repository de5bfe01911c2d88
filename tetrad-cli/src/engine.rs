use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    thread,
};

use flume::{Receiver, Sender};
use tetrad::{
    chord::{Chord, ChordPoint, ChordSpace},
    voicing::{PivotVoice, VoicingSession},
};

/// Shared chord state behind the CLI commands.
///
/// The engine serializes all session mutations behind a lock and runs chord
/// space enumerations on background threads. Each enumeration request bumps a
/// generation counter; a finished run publishes its result only if no newer
/// request was started in the meantime, so at most one result per parameter
/// change ever reaches the receiver.
pub struct ChordEngine {
    model: Mutex<ChordEngineModel>,
    generation: AtomicU64,
    results: Sender<Enumeration>,
}

struct ChordEngineModel {
    session: VoicingSession,
}

pub struct Enumeration {
    pub generation: u64,
    pub points: Vec<ChordPoint>,
}

impl ChordEngine {
    pub fn new(initial_base_hz: f64) -> (Arc<Self>, Receiver<Enumeration>) {
        let (results, receiver) = flume::unbounded();

        let engine = Self {
            model: Mutex::new(ChordEngineModel {
                session: VoicingSession::new(initial_base_hz),
            }),
            generation: AtomicU64::new(0),
            results,
        };

        (Arc::new(engine), receiver)
    }

    /// Resolves the chord against the session state and persists the result.
    pub fn play_chord(&self, chord: Chord, pivot: PivotVoice) -> [f64; 4] {
        self.lock_model().session.play(chord, pivot)
    }

    /// Starts a background enumeration of the given chord space.
    pub fn request_enumeration(self: &Arc<Self>, space: ChordSpace) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let engine = self.clone();
        thread::spawn(move || {
            if let Some(enumeration) = engine.enumerate_if_current(&space, generation) {
                // The receiver might be gone already. Nothing left to do then.
                engine.results.send(enumeration).ok();
            }
        });
    }

    fn enumerate_if_current(&self, space: &ChordSpace, generation: u64) -> Option<Enumeration> {
        let points = space.enumerate();
        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("Discarding superseded enumeration (generation {generation})");
            return None;
        }
        log::info!(
            "Enumerated {} chords for the {} (generation {generation})",
            points.len(),
            space.limit,
        );
        Some(Enumeration { generation, points })
    }

    fn lock_model(&self) -> MutexGuard<ChordEngineModel> {
        self.model.lock().unwrap()
    }
}
