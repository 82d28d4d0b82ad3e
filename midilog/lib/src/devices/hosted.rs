use super::{DeviceHandle, InputCallback, MidiDeviceManager};
use crate::midi::MidiEvent;
use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

const CLIENT_NAME: &str = "midilog-in";

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("[ MIDI ] : failed to start the MIDI host : {0}")]
    Init(#[from] midir::InitError),
    #[error("[ MIDI ] : failed to read port info : {0}")]
    PortInfo(#[from] midir::PortInfoError),
    #[error("[ MIDI ] : cannot find device {0}")]
    PortNotFound(DeviceHandle),
    #[error("[ MIDI ] : failed to connect to {device} : {reason}")]
    Connect { device: DeviceHandle, reason: String },
}

type Subscribers = Arc<RwLock<Vec<InputCallback>>>;

/// System MIDI inputs through `midir`.
///
/// A device is enabled while a connection to its port is open. Every
/// message received on an open connection is stamped with
/// [`crate::clock::now`] and handed to the device's subscribers on the
/// `midir` input thread.
///
/// Devices are identified by port name. Two identical controllers that
/// report the same name show up as a single input, and the first port
/// carrying that name is the one connected.
pub struct HostedMidiDevices {
    host: MidiInput,
    connections: HashMap<DeviceHandle, MidiInputConnection<()>>,
    subscribers: HashMap<DeviceHandle, Subscribers>,
}

impl HostedMidiDevices {
    pub fn new() -> Result<Self, DeviceError> {
        Ok(Self {
            host: MidiInput::new(CLIENT_NAME)?,
            connections: HashMap::new(),
            subscribers: HashMap::new(),
        })
    }

    /// First port named like `device`.
    fn find_port(&self, device: &DeviceHandle) -> Result<MidiInputPort, DeviceError> {
        self.host
            .ports()
            .into_iter()
            .find(|port| self.host.port_name(port).as_deref() == Ok(device.name()))
            .ok_or_else(|| DeviceError::PortNotFound(device.clone()))
    }

    fn subscribers_of(&mut self, device: &DeviceHandle) -> Subscribers {
        self.subscribers.entry(device.clone()).or_default().clone()
    }

    fn connect(&mut self, device: &DeviceHandle) -> Result<MidiInputConnection<()>, DeviceError> {
        let port = self.find_port(device)?;

        let callback = {
            let device = device.clone();
            let subscribers = self.subscribers_of(&device);

            move |_: u64, bytes: &[u8], _: &mut ()| {
                let event = MidiEvent::from_raw(bytes, crate::clock::now());
                let subscribers = subscribers.read().unwrap_or_else(PoisonError::into_inner);
                for subscriber in subscribers.iter() {
                    subscriber(&device, event.clone());
                }
            }
        };

        let mut input = MidiInput::new(CLIENT_NAME)?;
        input.ignore(Ignore::None);

        input
            .connect(&port, CLIENT_NAME, callback, ())
            .map_err(|e| DeviceError::Connect {
                device: device.clone(),
                reason: e.to_string(),
            })
    }
}

impl MidiDeviceManager for HostedMidiDevices {
    fn list_devices(&self) -> anyhow::Result<Vec<DeviceHandle>> {
        Ok(self
            .host
            .ports()
            .iter()
            .map(|port| self.host.port_name(port).map(DeviceHandle::new))
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn is_enabled(&self, device: &DeviceHandle) -> bool {
        self.connections.contains_key(device)
    }

    fn set_enabled(&mut self, device: &DeviceHandle, enabled: bool) -> anyhow::Result<()> {
        if !enabled {
            if self.connections.remove(device).is_some() {
                log::trace!("[ MIDI ] : disconnected from {device}");
            }
            return Ok(());
        }

        if self.is_enabled(device) {
            return Ok(());
        }

        let connection = self.connect(device)?;
        self.connections.insert(device.clone(), connection);
        log::trace!("[ MIDI ] : connected to {device}");
        Ok(())
    }

    fn subscribe(&mut self, device: &DeviceHandle, callback: InputCallback) -> anyhow::Result<()> {
        let subscribers = self.subscribers_of(device);
        subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(callback);
        Ok(())
    }

    fn unsubscribe(&mut self, device: &DeviceHandle, callback: &InputCallback) {
        let Some(subscribers) = self.subscribers.get(device) else {
            return;
        };

        subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|subscriber| !Arc::ptr_eq(subscriber, callback));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // These only touch the host when one is available, CI machines
    // usually have no MIDI backend at all.
    fn host() -> Option<HostedMidiDevices> {
        HostedMidiDevices::new().ok()
    }

    #[test]
    fn unknown_devices_cannot_be_enabled() {
        let Some(mut devices) = host() else {
            return;
        };

        let missing = DeviceHandle::new("midilog: no such device");
        assert!(devices.set_enabled(&missing, true).is_err());
        assert!(!devices.is_enabled(&missing));
    }

    #[test]
    fn subscriptions_are_removed_by_identity() {
        let Some(mut devices) = host() else {
            return;
        };

        let device = DeviceHandle::new("virtual");
        let first: InputCallback = Arc::new(|_: &DeviceHandle, _: MidiEvent| {});
        let second: InputCallback = Arc::new(|_: &DeviceHandle, _: MidiEvent| {});

        devices.subscribe(&device, first.clone()).unwrap();
        devices.subscribe(&device, second.clone()).unwrap();
        devices.unsubscribe(&device, &first);

        let remaining = devices.subscribers_of(&device);
        let remaining = remaining.read().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(Arc::ptr_eq(&remaining[0], &second));
    }

    #[test]
    fn disabling_a_device_that_is_not_enabled_is_fine() {
        let Some(mut devices) = host() else {
            return;
        };

        devices
            .set_enabled(&DeviceHandle::new("virtual"), false)
            .unwrap();
    }
}
