use super::{DeviceHandle, InputCallback, MidiDeviceManager};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorState {
    Unsubscribed,
    Subscribed(DeviceHandle),
}

/// Keeps exactly one input device subscribed to the panel's callback.
///
/// Switching devices tears the previous subscription down before the
/// new one is set up. Failures in the host are logged and otherwise
/// ignored: the host owns the devices and reports its own errors.
pub struct DeviceSelector {
    manager: Box<dyn MidiDeviceManager>,
    callback: InputCallback,
    devices: Vec<DeviceHandle>,
    state: SelectorState,
}

impl DeviceSelector {
    pub fn new(manager: Box<dyn MidiDeviceManager>, callback: InputCallback) -> Self {
        let mut selector = Self {
            manager,
            callback,
            devices: vec![],
            state: SelectorState::Unsubscribed,
        };

        selector.refresh_devices();
        selector
    }

    pub fn devices(&self) -> &[DeviceHandle] {
        self.devices.as_slice()
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn active(&self) -> Option<&DeviceHandle> {
        match &self.state {
            SelectorState::Subscribed(device) => Some(device),
            SelectorState::Unsubscribed => None,
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        let active = self.active()?;
        self.devices.iter().position(|device| device == active)
    }

    /// Query the host for its current inputs. Returns whether the list changed.
    ///
    /// An active input that is no longer listed has been unplugged, so the
    /// selector stops listening to it.
    pub fn refresh_devices(&mut self) -> bool {
        let devices = match self.manager.list_devices() {
            Ok(devices) => devices,
            Err(e) => {
                log::error!("[ MIDI ] : failed to list devices : {e}");
                return false;
            }
        };

        if devices == self.devices {
            return false;
        }

        log::debug!("[ MIDI ] : {} input(s) available", devices.len());
        self.devices = devices;

        if self.active().is_some() && self.active_index().is_none() {
            log::warn!("[ MIDI ] : active input was unplugged");
            self.unsubscribe();
        }

        true
    }

    /// Listen to the first input the host already has enabled, or to the
    /// first input of the list when none is.
    pub fn select_default(&mut self) {
        let index = self
            .devices
            .iter()
            .position(|device| self.manager.is_enabled(device))
            .unwrap_or(0);

        self.select_device(index);
    }

    pub fn select_device_by_name(&mut self, name: &str) {
        match self.devices.iter().position(|device| device.name() == name) {
            Some(index) => self.select_device(index),
            None => log::warn!("[ MIDI ] : no input named {name}"),
        }
    }

    pub fn select_device(&mut self, index: usize) {
        let Some(device) = self.devices.get(index).cloned() else {
            log::warn!(
                "[ MIDI ] : invalid input selection {index}, {} available",
                self.devices.len()
            );
            return;
        };

        self.unsubscribe();

        if !self.manager.is_enabled(&device) {
            if let Err(e) = self.manager.set_enabled(&device, true) {
                log::error!("[ MIDI ] : failed to enable {device} : {e}");
            }
        }

        match self.manager.subscribe(&device, self.callback.clone()) {
            Ok(()) => {
                log::info!("[ MIDI ] : listening to {device}");
                self.state = SelectorState::Subscribed(device);
            }
            Err(e) => log::error!("[ MIDI ] : failed to listen to {device} : {e}"),
        }
    }

    fn unsubscribe(&mut self) {
        let state = std::mem::replace(&mut self.state, SelectorState::Unsubscribed);
        if let SelectorState::Subscribed(device) = state {
            self.manager.unsubscribe(&device, &self.callback);
            log::trace!("[ MIDI ] : stopped listening to {device}");
        }
    }
}

impl Drop for DeviceSelector {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
