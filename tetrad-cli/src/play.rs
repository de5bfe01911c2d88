use std::{str::FromStr, time::Duration};

use clap::Parser;
use tetrad::{
    chord::Chord,
    voicing::{self, PivotVoice, VoiceDescription},
};

use crate::{engine::ChordEngine, midi::MpePlayer, App, CliResult};

#[derive(Parser)]
pub struct PlayOptions {
    /// Base frequency of the first chord's lowest voice, in Hz
    #[arg(
        long = "base-freq",
        env = "TETRAD_BASE_FREQ",
        default_value_t = voicing::DEFAULT_BASE_FREQ_HZ
    )]
    base_freq_hz: f64,

    /// Voice whose frequency carries over from one chord to the next
    #[arg(long = "pivot", default_value = "bass", value_parser = PivotVoice::from_str)]
    pivot: PivotVoice,

    /// Play the chords on the given MIDI device (fuzzy name matching)
    #[arg(long = "midi-out")]
    midi_out_device: Option<String>,

    /// Note-on velocity for MIDI playback
    #[arg(
        long = "velocity",
        default_value_t = 100,
        value_parser = clap::value_parser!(u8).range(0..=127)
    )]
    velocity: u8,

    /// Duration of each chord in milliseconds (MIDI playback only)
    #[arg(long = "duration-ms", default_value_t = 1000)]
    duration_ms: u64,

    /// Chords to play, lowest voice first ("i:j:k:l")
    #[arg(required = true, value_parser = parse_chord)]
    chords: Vec<Chord>,
}

fn parse_chord(s: &str) -> Result<Chord, String> {
    s.parse().map_err(|err| format!("{err}"))
}

impl PlayOptions {
    pub fn run(self, app: &mut App) -> CliResult<()> {
        let mut player = match &self.midi_out_device {
            Some(device) => {
                let (port_name, player) = MpePlayer::connect("tetrad-cli", device)?;
                log::info!("Playing on {port_name}");
                Some(player)
            }
            None => None,
        };

        let (engine, _results) = ChordEngine::new(self.base_freq_hz);

        for chord in &self.chords {
            let frequencies = engine.play_chord(*chord, self.pivot);

            app.writeln(format!("== {chord} (pivot: {})", self.pivot))?;
            for (voice, &frequency) in PivotVoice::ALL.iter().zip(&frequencies) {
                app.writeln(format!(
                    "{:>8}: {}",
                    voice.to_string(),
                    VoiceDescription::of_freq(frequency)
                ))?;
            }

            if let Some(player) = &mut player {
                player.play_chord(
                    &frequencies,
                    self.velocity,
                    Duration::from_millis(self.duration_ms),
                )?;
            }
        }

        Ok(())
    }
}
