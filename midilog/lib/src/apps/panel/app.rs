use crate::{
    devices::{DeviceHandle, DeviceSelector, InputCallback, MidiDeviceManager},
    keyboard::{KeyboardEvent, KeyboardState, NoteSource},
    messages::{LogWriter, MessageLog},
    midi::MidiEvent,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_CHANNEL: u8 = 1;
pub const DEFAULT_VELOCITY: u8 = 100;

/// Device selection, on-screen keyboard and message log, wired together.
///
/// Device input arrives on the host's thread: it lights the matching
/// keys and appends to the log, nothing more. Everything else happens on
/// the thread that owns the panel.
pub struct Panel {
    // dropped first so no device callback outlives the rest of the panel
    selector: DeviceSelector,
    log: MessageLog,
    writer: LogWriter,
    keyboard: Arc<Mutex<KeyboardState>>,
    channel: u8,
    velocity: u8,
}

impl Panel {
    pub fn new(manager: Box<dyn MidiDeviceManager>) -> Self {
        let (log, writer) = MessageLog::new();
        let keyboard = Arc::new(Mutex::new(KeyboardState::default()));

        let callback: InputCallback = {
            let writer = writer.clone();
            let keyboard = keyboard.clone();

            Arc::new(move |_: &DeviceHandle, event: MidiEvent| {
                // hardware key changes only mirror the device, the log
                // gets the message itself
                lock(&keyboard).process_next_midi_event(&event);
                writer.append(&event);
            })
        };

        let mut selector = DeviceSelector::new(manager, callback);
        selector.select_default();

        Self {
            selector,
            log,
            writer,
            keyboard,
            channel: DEFAULT_CHANNEL,
            velocity: DEFAULT_VELOCITY,
        }
    }

    pub fn devices(&self) -> &[DeviceHandle] {
        self.selector.devices()
    }

    pub fn active_device(&self) -> Option<&DeviceHandle> {
        self.selector.active()
    }

    pub fn active_device_index(&self) -> Option<usize> {
        self.selector.active_index()
    }

    pub fn select_device(&mut self, index: usize) {
        self.selector.select_device(index);
    }

    pub fn select_device_by_name(&mut self, name: &str) {
        self.selector.select_device_by_name(name);
    }

    pub fn refresh_devices(&mut self) -> bool {
        self.selector.refresh_devices()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn set_keyboard_channel(&mut self, channel: u8) {
        self.channel = channel.clamp(1, 16);
    }

    pub fn set_velocity(&mut self, velocity: u8) {
        self.velocity = velocity.clamp(1, 127);
    }

    /// Whether the note is held on any channel, from either source.
    pub fn is_note_on(&self, note: u8) -> bool {
        lock(&self.keyboard).is_note_on_for_channels(u16::MAX, note)
    }

    pub fn press_key(&mut self, note: u8) {
        let event = lock(&self.keyboard).note_on(self.channel, note, self.velocity);
        self.handle_keyboard_event(event);
    }

    pub fn release_key(&mut self, note: u8) {
        let event = lock(&self.keyboard).note_off(self.channel, note);
        self.handle_keyboard_event(event);
    }

    /// Pull pending messages into the log. Returns `true` when the
    /// display must be refreshed.
    pub fn update(&mut self) -> bool {
        self.log.collect()
    }

    fn handle_keyboard_event(&self, event: Option<KeyboardEvent>) {
        let Some(event) = event else {
            return;
        };

        if event.source() == NoteSource::OnScreen {
            self.writer.append(&event.to_midi(crate::clock::now()));
        }
    }
}

fn lock(keyboard: &Mutex<KeyboardState>) -> MutexGuard<'_, KeyboardState> {
    keyboard.lock().unwrap_or_else(PoisonError::into_inner)
}
