mod describe;

pub use describe::*;

use midly::live::LiveEvent;
use midly::MidiMessage;

const ALL_SOUND_OFF: u8 = 120;
const ALL_NOTES_OFF: u8 = 123;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MidiEventKind {
    NoteOn,
    NoteOff,
    ProgramChange,
    PitchWheel,
    Aftertouch,
    ChannelPressure,
    AllNotesOff,
    AllSoundOff,
    MetaEvent,
    ControllerChange,
    Other,
}

/// A timestamped MIDI message.
///
/// The raw bytes are kept as received; `kind`, `channel` and the two
/// data bytes are decoded once at construction. Channels are 1-based,
/// system messages carry channel 0.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiEvent {
    kind: MidiEventKind,
    channel: u8,
    data1: u8,
    data2: u8,
    raw: Vec<u8>,
    timestamp: f64,
}

impl MidiEvent {
    pub fn from_raw(bytes: &[u8], timestamp: f64) -> Self {
        let data = |index: usize| bytes.get(index).copied().unwrap_or_default();
        let (kind, channel) = classify(bytes);

        Self {
            kind,
            channel,
            data1: data(1),
            data2: data(2),
            raw: bytes.into(),
            timestamp,
        }
    }

    pub fn note_on(channel: u8, note: u8, velocity: u8, timestamp: f64) -> Self {
        Self::from_raw(
            &[0x90 | channel_nibble(channel), note.min(127), velocity.min(127)],
            timestamp,
        )
    }

    pub fn note_off(channel: u8, note: u8, timestamp: f64) -> Self {
        Self::from_raw(&[0x80 | channel_nibble(channel), note.min(127), 0], timestamp)
    }

    pub fn kind(&self) -> MidiEventKind {
        self.kind
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn data1(&self) -> u8 {
        self.data1
    }

    pub fn data2(&self) -> u8 {
        self.data2
    }

    pub fn note(&self) -> u8 {
        self.data1
    }

    pub fn velocity(&self) -> u8 {
        self.data2
    }

    pub fn raw(&self) -> &[u8] {
        self.raw.as_slice()
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Pitch bend centered on zero, in `-8192..=8191`.
    pub fn pitch_wheel_value(&self) -> i16 {
        let value = (u16::from(self.data2 & 0x7F) << 7) | u16::from(self.data1 & 0x7F);
        value as i16 - 0x2000
    }
}

fn channel_nibble(channel: u8) -> u8 {
    channel.clamp(1, 16) - 1
}

fn classify(bytes: &[u8]) -> (MidiEventKind, u8) {
    match bytes.first() {
        None => return (MidiEventKind::Other, 0),
        Some(0xFF) => return (MidiEventKind::MetaEvent, 0),
        Some(_) => (),
    }

    let Ok(LiveEvent::Midi { channel, message }) = LiveEvent::parse(bytes) else {
        return (MidiEventKind::Other, 0);
    };

    let kind = match message {
        MidiMessage::NoteOn { vel, .. } if vel.as_int() > 0 => MidiEventKind::NoteOn,
        MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. } => MidiEventKind::NoteOff,
        MidiMessage::Aftertouch { .. } => MidiEventKind::Aftertouch,
        MidiMessage::ChannelAftertouch { .. } => MidiEventKind::ChannelPressure,
        MidiMessage::ProgramChange { .. } => MidiEventKind::ProgramChange,
        MidiMessage::PitchBend { .. } => MidiEventKind::PitchWheel,
        MidiMessage::Controller { controller, .. } => match controller.as_int() {
            ALL_NOTES_OFF => MidiEventKind::AllNotesOff,
            ALL_SOUND_OFF => MidiEventKind::AllSoundOff,
            _ => MidiEventKind::ControllerChange,
        },
    };

    (kind, channel.as_int() + 1)
}
