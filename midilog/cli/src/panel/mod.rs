mod ui;

use crate::app::Flow;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use midilog::{
    apps::panel::{Panel, DEFAULT_CHANNEL, DEFAULT_VELOCITY},
    devices::{HostedMidiDevices, MidiDeviceManager},
};
use ratatui::prelude::*;
use std::time::{Duration, Instant};

/// Terminals only report key presses, so notes played from the computer
/// keyboard are released once they have not been pressed for this long.
const KEY_HOLD: Duration = Duration::from_millis(250);

struct TerminalApp {
    ui: ui::Ui,
    panel: Panel,
    held_keys: Vec<(u8, Instant)>,
    mouse_note: Option<u8>,
}

impl TerminalApp {
    fn new(manager: Box<dyn MidiDeviceManager>, opts: &Options) -> Self {
        let mut panel = Panel::new(manager);
        panel.set_keyboard_channel(opts.channel);
        panel.set_velocity(opts.velocity);

        if let Some(device) = &opts.device {
            panel.select_device_by_name(device);
        }

        Self {
            ui: ui::Ui::default(),
            panel,
            held_keys: vec![],
            mouse_note: None,
        }
    }

    fn play(&mut self, note: u8, now: Instant) {
        let release_at = now + KEY_HOLD;

        match self.held_keys.iter_mut().find(|(held, _)| *held == note) {
            Some((_, deadline)) => *deadline = release_at,
            None => {
                self.panel.press_key(note);
                self.held_keys.push((note, release_at));
            }
        }
    }

    fn release_expired_keys(&mut self, now: Instant) {
        let panel = &mut self.panel;
        self.held_keys.retain(|&(note, deadline)| {
            if deadline > now {
                return true;
            }

            panel.release_key(note);
            false
        });
    }

    fn select_device(&mut self, index: usize) {
        self.panel.select_device(index);

        if self.panel.active_device_index() == Some(index) {
            return;
        }

        if let Some(device) = self.panel.devices().get(index) {
            let message = format!("could not listen to {device}, see the log file");
            self.ui.show_alert_message(&message);
        }
    }

    fn mouse_over(&mut self, note: Option<u8>) {
        if note == self.mouse_note {
            return;
        }

        if let Some(previous) = self.mouse_note.take() {
            self.panel.release_key(previous);
        }

        if let Some(note) = note {
            self.panel.press_key(note);
            self.mouse_note = Some(note);
        }
    }
}

impl crate::app::Base for TerminalApp {
    fn update(&mut self) -> anyhow::Result<Flow> {
        self.release_expired_keys(Instant::now());
        self.panel.update();
        Ok(Flow::Continue)
    }

    fn on_keypress(&mut self, key: KeyEvent) -> anyhow::Result<Flow> {
        self.ui.sync_devices(&self.panel);

        match self.ui.handle_keypress(key) {
            ui::UiEvent::Continue => (),
            ui::UiEvent::Exit => return Ok(Flow::Exit),
            ui::UiEvent::Select(index) => self.select_device(index),
            ui::UiEvent::Play(note) => self.play(note, Instant::now()),
            ui::UiEvent::Refresh => {
                if self.panel.refresh_devices() {
                    log::info!("[ MIDI ] : inputs changed");
                }
            }
        }

        Ok(Flow::Continue)
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> anyhow::Result<Flow> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                let note = self.ui.key_at(mouse.column, mouse.row);
                self.mouse_over(note);
            }
            MouseEventKind::Up(MouseButton::Left) => self.mouse_over(None),
            _ => {}
        }

        Ok(Flow::Continue)
    }

    fn render(&mut self, f: &mut Frame) {
        self.ui.render(f, &self.panel);
    }
}

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Frames per second
    #[arg(long, default_value_t = 30.)]
    fps: f32,

    /// MIDI channel of the on-screen keyboard
    #[arg(long, default_value_t = DEFAULT_CHANNEL, value_parser = clap::value_parser!(u8).range(1..=16))]
    channel: u8,

    /// Velocity of the notes played on the on-screen keyboard
    #[arg(long, default_value_t = DEFAULT_VELOCITY, value_parser = clap::value_parser!(u8).range(1..=127))]
    velocity: u8,

    /// Name of the input to listen to, instead of the first available one
    #[arg(long)]
    device: Option<String>,
}

pub fn run(
    terminal: &mut Terminal<impl Backend>,
    opts: Options,
    common: crate::CommonOptions,
) -> anyhow::Result<()> {
    if let Some(log_file) = common.log.or(crate::locations::log_file("midilog")) {
        crate::logger::start(log_file, common.verbose)?;
    }

    let devices = HostedMidiDevices::new()?;
    let mut app = TerminalApp::new(Box::new(devices), &opts);

    crate::app::run(terminal, &mut app, opts.fps.max(1.))
}
