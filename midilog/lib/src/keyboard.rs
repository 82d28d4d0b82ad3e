//! Held-note state behind the on-screen keyboard.

use crate::midi::{MidiEvent, MidiEventKind};

pub const NUM_NOTES: usize = 128;

/// Where a keyboard change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource {
    /// A key was pressed or released on the on-screen keyboard.
    OnScreen,
    /// The state mirrors a message received from a device.
    Hardware,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    NoteOn {
        channel: u8,
        note: u8,
        velocity: u8,
        source: NoteSource,
    },
    NoteOff {
        channel: u8,
        note: u8,
        source: NoteSource,
    },
}

impl KeyboardEvent {
    pub fn source(&self) -> NoteSource {
        match self {
            Self::NoteOn { source, .. } | Self::NoteOff { source, .. } => *source,
        }
    }

    /// The MIDI message this change stands for.
    pub fn to_midi(&self, timestamp: f64) -> MidiEvent {
        match *self {
            Self::NoteOn {
                channel,
                note,
                velocity,
                ..
            } => MidiEvent::note_on(channel, note, velocity, timestamp),
            Self::NoteOff { channel, note, .. } => MidiEvent::note_off(channel, note, timestamp),
        }
    }
}

/// One 16 bit channel mask per note, bit `n` set while the note is held
/// on channel `n + 1`.
pub struct KeyboardState {
    notes: [u16; NUM_NOTES],
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self {
            notes: [0; NUM_NOTES],
        }
    }
}

impl KeyboardState {
    pub fn is_note_on(&self, channel: u8, note: u8) -> bool {
        self.is_note_on_for_channels(channel_bit(channel), note)
    }

    pub fn is_note_on_for_channels(&self, channel_mask: u16, note: u8) -> bool {
        self.notes
            .get(usize::from(note))
            .is_some_and(|mask| mask & channel_mask != 0)
    }

    /// Press a key on the on-screen keyboard.
    pub fn note_on(&mut self, channel: u8, note: u8, velocity: u8) -> Option<KeyboardEvent> {
        self.press(channel, note, velocity, NoteSource::OnScreen)
    }

    /// Release a key on the on-screen keyboard.
    pub fn note_off(&mut self, channel: u8, note: u8) -> Option<KeyboardEvent> {
        self.release(channel, note, NoteSource::OnScreen)
    }

    pub fn all_notes_off(&mut self, channel: u8) {
        let bit = channel_bit(channel);
        for mask in self.notes.iter_mut() {
            *mask &= !bit;
        }
    }

    /// Mirror a message received from a device. The returned event, if
    /// any, is tagged [`NoteSource::Hardware`].
    pub fn process_next_midi_event(&mut self, event: &MidiEvent) -> Option<KeyboardEvent> {
        match event.kind() {
            MidiEventKind::NoteOn => self.press(
                event.channel(),
                event.note(),
                event.velocity(),
                NoteSource::Hardware,
            ),
            MidiEventKind::NoteOff => {
                self.release(event.channel(), event.note(), NoteSource::Hardware)
            }
            MidiEventKind::AllNotesOff | MidiEventKind::AllSoundOff => {
                self.all_notes_off(event.channel());
                None
            }
            _ => None,
        }
    }

    fn press(
        &mut self,
        channel: u8,
        note: u8,
        velocity: u8,
        source: NoteSource,
    ) -> Option<KeyboardEvent> {
        let bit = channel_bit(channel);
        let mask = self.notes.get_mut(usize::from(note))?;
        if *mask & bit != 0 {
            return None;
        }

        *mask |= bit;
        Some(KeyboardEvent::NoteOn {
            channel: channel.clamp(1, 16),
            note,
            velocity,
            source,
        })
    }

    fn release(&mut self, channel: u8, note: u8, source: NoteSource) -> Option<KeyboardEvent> {
        let bit = channel_bit(channel);
        let mask = self.notes.get_mut(usize::from(note))?;
        if *mask & bit == 0 {
            return None;
        }

        *mask &= !bit;
        Some(KeyboardEvent::NoteOff {
            channel: channel.clamp(1, 16),
            note,
            source,
        })
    }
}

fn channel_bit(channel: u8) -> u16 {
    1 << (channel.clamp(1, 16) - 1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn on_screen_presses_are_reported_once() {
        let mut keyboard = KeyboardState::default();

        let event = keyboard.note_on(1, 60, 100).unwrap();
        assert_eq!(event.source(), NoteSource::OnScreen);
        assert!(keyboard.is_note_on(1, 60));
        assert!(!keyboard.is_note_on(2, 60));

        assert!(keyboard.note_on(1, 60, 100).is_none());

        assert!(keyboard.note_off(1, 60).is_some());
        assert!(keyboard.note_off(1, 60).is_none());
        assert!(!keyboard.is_note_on(1, 60));
    }

    #[test]
    fn hardware_messages_are_tagged_as_hardware() {
        let mut keyboard = KeyboardState::default();

        let event = keyboard
            .process_next_midi_event(&MidiEvent::from_raw(&[0x92, 64, 90], 0.))
            .unwrap();

        assert_eq!(
            event,
            KeyboardEvent::NoteOn {
                channel: 3,
                note: 64,
                velocity: 90,
                source: NoteSource::Hardware
            }
        );
        assert!(keyboard.is_note_on(3, 64));

        let event = keyboard
            .process_next_midi_event(&MidiEvent::from_raw(&[0x92, 64, 0], 0.))
            .unwrap();
        assert_eq!(event.source(), NoteSource::Hardware);
        assert!(!keyboard.is_note_on(3, 64));
    }

    #[test]
    fn all_notes_off_only_releases_its_channel() {
        let mut keyboard = KeyboardState::default();
        keyboard.note_on(1, 60, 1);
        keyboard.note_on(1, 67, 1);
        keyboard.note_on(2, 60, 1);

        let event = keyboard.process_next_midi_event(&MidiEvent::from_raw(&[0xB0, 123, 0], 0.));
        assert!(event.is_none());

        assert!(!keyboard.is_note_on(1, 60));
        assert!(!keyboard.is_note_on(1, 67));
        assert!(keyboard.is_note_on(2, 60));
    }

    #[test]
    fn channel_masks_select_channels() {
        let mut keyboard = KeyboardState::default();
        keyboard.note_on(16, 10, 1);

        assert!(keyboard.is_note_on_for_channels(0xFFFF, 10));
        assert!(keyboard.is_note_on_for_channels(1 << 15, 10));
        assert!(!keyboard.is_note_on_for_channels(0x7FFF, 10));
    }

    #[test]
    fn other_messages_leave_the_keyboard_alone() {
        let mut keyboard = KeyboardState::default();
        for bytes in [&[0xB0, 1, 64][..], &[0xC0, 1], &[0xF8]] {
            assert!(keyboard
                .process_next_midi_event(&MidiEvent::from_raw(bytes, 0.))
                .is_none());
        }
    }

    #[test]
    fn events_convert_back_to_midi() {
        let mut keyboard = KeyboardState::default();
        let event = keyboard.note_on(5, 72, 80).unwrap();
        assert_eq!(event.to_midi(1.).raw(), &[0x94, 72, 80]);

        let event = keyboard.note_off(5, 72).unwrap();
        assert_eq!(event.to_midi(1.).raw(), &[0x84, 72, 0]);
    }
}
