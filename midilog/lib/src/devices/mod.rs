mod hosted;
mod selector;

pub use hosted::*;
pub use selector::*;

use crate::midi::MidiEvent;
use std::{fmt, sync::Arc};

/// Identity of a system MIDI input, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceHandle(String);

impl DeviceHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceHandle {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Receives every message of the devices it is subscribed to.
/// Called from the host's input thread, so it must return quickly.
pub type InputCallback = Arc<dyn Fn(&DeviceHandle, MidiEvent) + Send + Sync>;

/// Device enumeration and management, owned by the host system.
#[cfg_attr(test, mockall::automock)]
pub trait MidiDeviceManager {
    fn list_devices(&self) -> anyhow::Result<Vec<DeviceHandle>>;
    fn is_enabled(&self, device: &DeviceHandle) -> bool;
    fn set_enabled(&mut self, device: &DeviceHandle, enabled: bool) -> anyhow::Result<()>;
    fn subscribe(&mut self, device: &DeviceHandle, callback: InputCallback) -> anyhow::Result<()>;
    fn unsubscribe(&mut self, device: &DeviceHandle, callback: &InputCallback);
}
