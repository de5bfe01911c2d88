use std::{error::Error, io, thread, time::Duration};

use midir::{MidiIO, MidiOutput, MidiOutputConnection};
use tetrad::voicing::VoiceDescription;

use crate::CliError;

/// Pitch bend sensitivity announced to the receiver, in semitones.
const PITCH_BEND_RANGE_SEMITONES: u8 = 48;

/// Channel 0 is reserved as the MPE master channel.
const FIRST_MEMBER_CHANNEL: u8 = 1;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xb0;
const PITCH_BEND_CHANGE: u8 = 0xe0;

pub type MidiResult<T> = Result<T, MidiError>;

#[derive(Clone, Debug)]
pub enum MidiError {
    DeviceNotFound {
        wanted: String,
        available: Vec<String>,
    },
    AmbiguousDevice {
        wanted: String,
        matches: Vec<String>,
    },
    Other(String),
}

impl<T: Error> From<T> for MidiError {
    fn from(error: T) -> Self {
        MidiError::Other(error.to_string())
    }
}

impl From<MidiError> for CliError {
    fn from(v: MidiError) -> Self {
        CliError::CommandError(format!("Could not connect to MIDI device ({v:#?})"))
    }
}

pub fn print_midi_devices(mut dst: impl io::Write, client_name: &str) -> MidiResult<()> {
    let midi_output = MidiOutput::new(client_name)?;
    writeln!(dst, "Writable MIDI devices:")?;
    for port in midi_output.ports() {
        writeln!(dst, "- {}", midi_output.port_name(&port)?)?;
    }

    Ok(())
}

pub fn connect_to_out_device(
    client_name: &str,
    fuzzy_port_name: &str,
) -> MidiResult<(String, MidiOutputConnection)> {
    let midi_output = MidiOutput::new(client_name)?;

    let (port_name, port) = find_port_by_name(&midi_output, fuzzy_port_name)?;

    Ok((port_name, midi_output.connect(&port, "MIDI in")?))
}

fn find_port_by_name<IO: MidiIO>(
    midi_io: &IO,
    target_port: &str,
) -> MidiResult<(String, IO::Port)> {
    let target_port_lowercase = target_port.to_lowercase();

    let mut matching_ports = midi_io
        .ports()
        .into_iter()
        .filter_map(|port| {
            midi_io
                .port_name(&port)
                .ok()
                .filter(|port_name| port_name.to_lowercase().contains(&target_port_lowercase))
                .map(|port_name| (port_name, port))
        })
        .collect::<Vec<_>>();

    match matching_ports.len() {
        0 => Err(MidiError::DeviceNotFound {
            wanted: target_port_lowercase,
            available: midi_io
                .ports()
                .iter()
                .filter_map(|port| midi_io.port_name(port).ok())
                .collect(),
        }),
        1 => Ok(matching_ports.pop().unwrap()),
        _ => Err(MidiError::AmbiguousDevice {
            wanted: target_port_lowercase,
            matches: matching_ports
                .into_iter()
                .map(|(port_name, _)| port_name)
                .collect(),
        }),
    }
}

/// Plays chords on an MPE-capable MIDI device.
///
/// Each voice gets its own member channel with a per-channel pitch bend
/// expressing the deviation from the nearest 12-EDO note.
pub struct MpePlayer {
    connection: MidiOutputConnection,
}

impl MpePlayer {
    pub fn connect(client_name: &str, fuzzy_port_name: &str) -> MidiResult<(String, Self)> {
        let (port_name, connection) = connect_to_out_device(client_name, fuzzy_port_name)?;
        let mut player = Self { connection };
        player.announce_pitch_bend_range()?;
        Ok((port_name, player))
    }

    /// Sends the pitch bend sensitivity RPN on every member channel used for
    /// chord voices.
    fn announce_pitch_bend_range(&mut self) -> MidiResult<()> {
        for voice in 0..4 {
            let channel = FIRST_MEMBER_CHANNEL + voice;
            self.send(&[CONTROL_CHANGE | channel, 0x65, 0x00])?;
            self.send(&[CONTROL_CHANGE | channel, 0x64, 0x00])?;
            self.send(&[CONTROL_CHANGE | channel, 0x06, PITCH_BEND_RANGE_SEMITONES])?;
            self.send(&[CONTROL_CHANGE | channel, 0x26, 0x00])?;
        }
        Ok(())
    }

    /// Sounds all four voices for the given duration.
    pub fn play_chord(
        &mut self,
        frequencies: &[f64; 4],
        velocity: u8,
        duration: Duration,
    ) -> MidiResult<()> {
        let mut playing = Vec::new();
        for (voice, &frequency) in frequencies.iter().enumerate() {
            let channel = FIRST_MEMBER_CHANNEL + voice as u8;
            let description = VoiceDescription::of_freq(frequency);
            let key = description.midi_number.clamp(0, 127) as u8;
            let bend = pitch_bend_value(description.deviation_cents);
            self.send(&[
                PITCH_BEND_CHANGE | channel,
                (bend & 0x7f) as u8,
                (bend >> 7) as u8,
            ])?;
            self.send(&[NOTE_ON | channel, key, velocity])?;
            playing.push((channel, key));
        }

        thread::sleep(duration);

        for (channel, key) in playing {
            self.send(&[NOTE_OFF | channel, key, velocity])?;
        }

        Ok(())
    }

    fn send(&mut self, message: &[u8]) -> MidiResult<()> {
        self.connection.send(message)?;
        Ok(())
    }
}

/// Maps a cent deviation to a 14-bit pitch bend value (8192 = center).
fn pitch_bend_value(deviation_cents: f64) -> u16 {
    let normalized = deviation_cents / (f64::from(PITCH_BEND_RANGE_SEMITONES) * 100.0);
    (8192.0 + 8191.0 * normalized).round().clamp(0.0, 16383.0) as u16
}
