//! Pivot-relative resolution of chords into absolute frequencies.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::chord::Chord;

/// The base frequency of the very first chord in a session, in Hz (C3).
pub const DEFAULT_BASE_FREQ_HZ: f64 = 130.8128;

/// The voice whose frequency is held fixed when moving to the next chord.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PivotVoice {
    Bass,
    Tenor,
    Alto,
    Soprano,
}

impl PivotVoice {
    pub const ALL: [PivotVoice; 4] = [
        PivotVoice::Bass,
        PivotVoice::Tenor,
        PivotVoice::Alto,
        PivotVoice::Soprano,
    ];

    /// The voice's position within a chord, counted from the lowest voice.
    pub fn index(self) -> usize {
        match self {
            PivotVoice::Bass => 0,
            PivotVoice::Tenor => 1,
            PivotVoice::Alto => 2,
            PivotVoice::Soprano => 3,
        }
    }
}

impl Display for PivotVoice {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            PivotVoice::Bass => "bass",
            PivotVoice::Tenor => "tenor",
            PivotVoice::Alto => "alto",
            PivotVoice::Soprano => "soprano",
        };
        write!(f, "{name}")
    }
}

/// [`PivotVoice`]s parse from their lowercase names.
///
/// ```
/// # use tetrad::voicing::PivotVoice;
/// assert_eq!("bass".parse::<PivotVoice>().unwrap(), PivotVoice::Bass);
/// assert_eq!("Soprano".parse::<PivotVoice>().unwrap(), PivotVoice::Soprano);
/// assert!("baritone".parse::<PivotVoice>().is_err());
/// ```
impl FromStr for PivotVoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bass" => Ok(PivotVoice::Bass),
            "tenor" => Ok(PivotVoice::Tenor),
            "alto" => Ok(PivotVoice::Alto),
            "soprano" => Ok(PivotVoice::Soprano),
            _ => Err(format!(
                "Unknown pivot voice '{s}'. Should be bass, tenor, alto or soprano"
            )),
        }
    }
}

/// Resolves a chord into absolute frequencies, continuing from the prior
/// chord's frequencies via the pivot voice.
///
/// With no prior chord the lowest voice starts at `initial_base_hz`.
/// Otherwise the base is chosen s.t. the pivot voice of the new chord sounds
/// at the same frequency as the pivot voice of the prior chord. Every other
/// voice follows from the chord's internal ratio.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use tetrad::voicing;
/// # use tetrad::voicing::PivotVoice;
/// let chord = "3:4:5:6".parse().unwrap();
/// let prior = [260.0, 325.0, 390.0, 520.0];
/// let next = voicing::resolve_frequencies(chord, PivotVoice::Bass, Some(&prior), 130.8128);
/// assert_approx_eq!(next[0], 260.0);
/// assert_approx_eq!(next[1], 260.0 * 4.0 / 3.0);
/// assert_approx_eq!(next[2], 260.0 * 5.0 / 3.0);
/// assert_approx_eq!(next[3], 520.0);
/// ```
pub fn resolve_frequencies(
    chord: Chord,
    pivot: PivotVoice,
    prior: Option<&[f64; 4]>,
    initial_base_hz: f64,
) -> [f64; 4] {
    let members = chord.members().map(f64::from);
    let base = match prior {
        None => initial_base_hz,
        Some(prior) => prior[pivot.index()] * members[0] / members[pivot.index()],
    };
    members.map(|member| base * member / members[0])
}

/// A playback session threading pivot-relative frequencies through a chord
/// sequence.
///
/// The session owns the state the resolver needs between chords. Resetting
/// it makes the next chord bootstrap from the initial base frequency again.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use tetrad::voicing::PivotVoice;
/// # use tetrad::voicing::VoicingSession;
/// let mut session = VoicingSession::default();
/// let first = session.play("4:5:6:7".parse().unwrap(), PivotVoice::Bass);
/// assert_approx_eq!(first[0], 130.8128);
///
/// // The soprano of the next chord takes over the prior soprano's frequency.
/// let second = session.play("3:4:5:6".parse().unwrap(), PivotVoice::Soprano);
/// assert_approx_eq!(second[3], first[3]);
/// ```
#[derive(Clone, Debug)]
pub struct VoicingSession {
    initial_base_hz: f64,
    last_frequencies: Option<[f64; 4]>,
}

impl VoicingSession {
    pub fn new(initial_base_hz: f64) -> Self {
        Self {
            initial_base_hz,
            last_frequencies: None,
        }
    }

    /// Resolves the chord and persists its frequencies as the reference for
    /// the next call.
    pub fn play(&mut self, chord: Chord, pivot: PivotVoice) -> [f64; 4] {
        let frequencies = resolve_frequencies(
            chord,
            pivot,
            self.last_frequencies.as_ref(),
            self.initial_base_hz,
        );
        self.last_frequencies = Some(frequencies);
        frequencies
    }

    pub fn last_frequencies(&self) -> Option<[f64; 4]> {
        self.last_frequencies
    }

    /// Forgets the prior chord.
    pub fn reset(&mut self) {
        self.last_frequencies = None;
    }
}

impl Default for VoicingSession {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_FREQ_HZ)
    }
}

/// A frequency described in terms of the closest 12-EDO MIDI note.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VoiceDescription {
    pub freq_hz: f64,
    pub midi_number: i32,
    pub deviation_cents: f64,
}

impl VoiceDescription {
    /// Locates `freq_hz` on the MIDI keyboard.
    ///
    /// The deviation is bounded by ±50 cents around the returned note.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tetrad::voicing::VoiceDescription;
    /// let concert_a = VoiceDescription::of_freq(440.0);
    /// assert_eq!(concert_a.midi_number, 69);
    /// assert_approx_eq!(concert_a.deviation_cents, 0.0);
    ///
    /// let septimal = VoiceDescription::of_freq(440.0 * 7.0 / 4.0);
    /// assert_eq!(septimal.midi_number, 79);
    /// assert_approx_eq!(septimal.deviation_cents, -31.174, 0.001);
    /// ```
    pub fn of_freq(freq_hz: f64) -> Self {
        let exact_midi = 69.0 + 12.0 * (freq_hz / 440.0).log2();
        let midi_number = exact_midi.round() as i32;
        let deviation_cents = (exact_midi - f64::from(midi_number)) * 100.0;
        Self {
            freq_hz,
            midi_number,
            deviation_cents,
        }
    }
}

impl Display for VoiceDescription {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{:.3} Hz | MIDI {} | {:+.3}c",
            self.freq_hz, self.midi_number, self.deviation_cents
        )
    }
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn first_chord_starts_at_initial_base() {
        let frequencies = resolve_frequencies(
            "4:5:6:7".parse().unwrap(),
            PivotVoice::Alto,
            None,
            DEFAULT_BASE_FREQ_HZ,
        );
        assert_approx_eq!(frequencies[0], DEFAULT_BASE_FREQ_HZ);
        assert_approx_eq!(frequencies[3], DEFAULT_BASE_FREQ_HZ * 7.0 / 4.0);
    }

    #[test]
    fn pivot_voice_keeps_its_frequency() {
        let prior = [200.0, 250.0, 300.0, 350.0];
        for pivot in PivotVoice::ALL {
            let frequencies =
                resolve_frequencies("5:6:7:9".parse().unwrap(), pivot, Some(&prior), 100.0);
            assert_approx_eq!(frequencies[pivot.index()], prior[pivot.index()]);
        }
    }

    #[test]
    fn replaying_the_same_chord_is_stationary() {
        let mut session = VoicingSession::default();
        let chord = "4:5:6:7".parse().unwrap();
        let first = session.play(chord, PivotVoice::Tenor);
        let second = session.play(chord, PivotVoice::Tenor);
        for (a, b) in first.iter().zip(&second) {
            assert_approx_eq!(a, b);
        }
    }

    #[test]
    fn resolved_frequencies_are_finite_and_positive() {
        let mut session = VoicingSession::default();
        for (chord, pivot) in [
            ("1:1:1:1", PivotVoice::Bass),
            ("3:4:5:6", PivotVoice::Soprano),
            ("7:9:11:13", PivotVoice::Alto),
            ("1:2:3:4", PivotVoice::Tenor),
        ] {
            let frequencies = session.play(chord.parse().unwrap(), pivot);
            assert!(frequencies.iter().all(|freq| freq.is_finite() && *freq > 0.0));
        }
    }

    #[test]
    fn reset_restores_the_bootstrap_base() {
        let mut session = VoicingSession::new(100.0);
        session.play("3:4:5:6".parse().unwrap(), PivotVoice::Soprano);
        session.reset();
        let frequencies = session.play("4:5:6:7".parse().unwrap(), PivotVoice::Soprano);
        assert_approx_eq!(frequencies[0], 100.0);
    }
}
