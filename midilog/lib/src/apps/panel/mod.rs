mod app;

pub use app::*;

#[cfg(test)]
mod test {
    use super::*;
    use crate::devices::fake::{FakeDevices, Op};

    const DEVICES: &[&str] = &["keys", "pads"];

    fn panel() -> (Panel, FakeDevices) {
        let devices = FakeDevices::with_devices(DEVICES);
        (Panel::new(Box::new(devices.clone())), devices)
    }

    fn descriptions(panel: &Panel) -> Vec<String> {
        panel
            .log()
            .entries()
            .iter()
            .map(|entry| entry.description.clone())
            .collect()
    }

    #[test]
    fn starts_listening_to_the_first_device() {
        let (panel, devices) = panel();
        assert_eq!(panel.active_device().unwrap().name(), "keys");
        assert_eq!(panel.active_device_index(), Some(0));
        assert_eq!(devices.subscribed(), ["keys"]);
    }

    #[test]
    fn starts_unsubscribed_without_devices() {
        let panel = Panel::new(Box::<FakeDevices>::default());
        assert!(panel.active_device().is_none());
        assert!(panel.devices().is_empty());
    }

    #[test]
    fn logs_hardware_messages_once_after_an_update() {
        let (mut panel, devices) = panel();

        devices.emit("keys", &[0x90, 60, 100], 3_600.);
        assert_eq!(panel.log().count(), 0);

        assert!(panel.update());
        assert_eq!(descriptions(&panel), ["Note on C4"]);
        assert_eq!(panel.log().entry_at(0).unwrap().timestamp, 3_600.);
        assert!(!panel.update());
    }

    #[test]
    fn hardware_notes_light_keys_without_echoing_into_the_log() {
        let (mut panel, devices) = panel();

        devices.emit("keys", &[0x90, 64, 100], 0.);
        assert!(panel.is_note_on(64));

        devices.emit("keys", &[0x80, 64, 0], 0.);
        assert!(!panel.is_note_on(64));

        panel.update();
        assert_eq!(descriptions(&panel), ["Note on E4", "Note off E4"]);
    }

    #[test]
    fn on_screen_keys_are_logged() {
        let (mut panel, _devices) = panel();

        panel.press_key(61);
        assert!(panel.is_note_on(61));
        panel.release_key(61);

        panel.update();
        assert_eq!(descriptions(&panel), ["Note on C#4", "Note off C#4"]);
        assert!(panel.log().entry_at(0).unwrap().timestamp > 0.);
    }

    #[test]
    fn pressing_a_held_key_again_logs_nothing() {
        let (mut panel, devices) = panel();

        devices.emit("keys", &[0x90, 60, 100], 0.);
        panel.press_key(60);
        panel.release_key(62);

        panel.update();
        assert_eq!(panel.log().count(), 1);
    }

    #[test]
    fn both_sources_interleave_in_arrival_order() {
        let (mut panel, devices) = panel();

        devices.emit("keys", &[0xC0, 1], 0.);
        panel.press_key(48);
        devices.emit("keys", &[0xC0, 2], 0.);
        panel.update();
        panel.release_key(48);
        devices.emit("keys", &[0xC0, 3], 0.);
        panel.update();

        assert_eq!(
            descriptions(&panel),
            [
                "Program change 1",
                "Note on C3",
                "Program change 2",
                "Note off C3",
                "Program change 3"
            ]
        );
    }

    #[test]
    fn switching_devices_stops_logging_the_previous_one() {
        let (mut panel, devices) = panel();

        panel.select_device(1);
        assert_eq!(panel.active_device().unwrap().name(), "pads");
        assert_eq!(devices.subscribed(), ["pads"]);

        devices.emit("keys", &[0x90, 60, 100], 0.);
        devices.emit("pads", &[0x99, 36, 100], 0.);
        panel.update();

        assert_eq!(descriptions(&panel), ["Note on C2"]);
    }

    #[test]
    fn on_screen_keys_use_the_configured_channel_and_velocity() {
        let (mut panel, devices) = panel();
        panel.set_keyboard_channel(10);
        panel.set_velocity(0);
        assert_eq!(panel.channel(), 10);

        panel.press_key(36);
        devices.emit("keys", &[0x89, 36, 0], 0.);
        panel.update();

        // the hardware note off on channel 10 releases the on-screen key
        assert!(!panel.is_note_on(36));
        assert_eq!(descriptions(&panel), ["Note on C2", "Note off C2"]);
    }

    #[test]
    fn dropping_the_panel_unsubscribes() {
        let (panel, devices) = panel();
        drop(panel);

        assert_eq!(devices.ops().last(), Some(&Op::Unsubscribe("keys".into())));
        assert!(devices.subscribed().is_empty());
    }

    #[test]
    fn device_threads_can_log_concurrently_with_the_keyboard() {
        let (mut panel, devices) = panel();

        let device_thread = {
            let devices = devices.clone();
            std::thread::spawn(move || {
                for i in 0..200 {
                    devices.emit("keys", &[0xB0, 7, (i % 128) as u8], 0.);
                }
            })
        };

        for _ in 0..100 {
            panel.press_key(72);
            panel.release_key(72);
            panel.update();
        }

        device_thread.join().unwrap();
        panel.update();

        assert_eq!(panel.log().count(), 400);
    }
}
