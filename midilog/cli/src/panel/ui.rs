use crate::ui::{
    components,
    widgets::{self, keyboard::PianoLayout},
};
use crossterm::event::{KeyCode, KeyEvent};
use midilog::{apps::panel::Panel, midi::note_name};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders},
};

const USAGE: &str = r#"
               ? : display help
  <UP>, <DOWN>   : browse inputs
           Enter : listen to the highlighted input
               r : refresh inputs
            z, x : octave down, up
 a w s e d f ... : play from C, the row above plays sharps
  mouse on a key : play
        <ESC>, q : quit or hide popup
           <C-c> : force quit
"#;

/// Two rows of the computer keyboard laid out like a piano.
const NOTE_KEYS: [char; 17] = [
    'a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k', 'o', 'l', 'p', ';',
];

const DEFAULT_BASE_NOTE: u8 = 60;
const HIGHEST_BASE_NOTE: u8 = 120;
const KEYBOARD_HEIGHT: u16 = 7;

#[derive(PartialEq, Eq, Clone, Copy)]
enum Popup {
    Usage,
    Alert,
}

pub enum UiEvent {
    Continue,
    Select(usize),
    Refresh,
    Play(u8),
    Exit,
}

pub struct Ui {
    popups: components::Popups<Popup>,
    devices: components::Selector,
    piano: PianoLayout,
    base_note: u8,
    alert_message: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            popups: components::Popups::default(),
            devices: components::Selector::default(),
            piano: PianoLayout::default(),
            base_note: DEFAULT_BASE_NOTE,
            alert_message: None,
        }
    }
}

impl Ui {
    pub fn base_note(&self) -> u8 {
        self.base_note
    }

    pub fn show_alert_message(&mut self, alert_message: &str) {
        self.popups.show(Popup::Alert);
        self.alert_message = Some(alert_message.into());
    }

    /// Mirror the panel's inputs in the list.
    pub fn sync_devices(&mut self, panel: &Panel) {
        self.devices
            .sync(panel.devices().len(), panel.active_device_index());
    }

    /// The piano key drawn at a screen cell, as of the last render.
    pub fn key_at(&self, column: u16, row: u16) -> Option<u8> {
        self.piano.key_at(column, row)
    }

    pub fn handle_keypress(&mut self, key: KeyEvent) -> UiEvent {
        match key.code {
            KeyCode::Char('?') => self.popups.toggle_visible(Popup::Usage),
            KeyCode::Char('q') | KeyCode::Esc => {
                if !self.popups.any_visible() {
                    return UiEvent::Exit;
                }

                self.popups.hide()
            }
            KeyCode::Down => self.devices.next(),
            KeyCode::Up => self.devices.previous(),
            KeyCode::Enter => {
                if let Some(index) = self.devices.highlighted() {
                    return UiEvent::Select(index);
                }
            }
            KeyCode::Char('r') => return UiEvent::Refresh,
            KeyCode::Char('z') => self.base_note = self.base_note.saturating_sub(12),
            KeyCode::Char('x') => self.base_note = (self.base_note + 12).min(HIGHEST_BASE_NOTE),
            KeyCode::Char(c) => {
                if let Some(note) = self.note_for(c) {
                    return UiEvent::Play(note);
                }
            }
            _ => {}
        }

        UiEvent::Continue
    }

    fn note_for(&self, key: char) -> Option<u8> {
        let offset = NOTE_KEYS.iter().position(|&k| k == key)?;
        let note = usize::from(self.base_note) + offset;
        u8::try_from(note).ok().filter(|&note| note < 128)
    }

    pub fn render(&mut self, f: &mut Frame, panel: &Panel) {
        let devices = panel.devices();
        let list_height = u16::try_from(devices.len()).unwrap_or(u16::MAX);

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Length(list_height.saturating_add(2).clamp(3, 8)),
                    Constraint::Length(KEYBOARD_HEIGHT),
                    Constraint::Min(3),
                ]
                .as_ref(),
            )
            .split(f.size());

        let names: Vec<&str> = devices.iter().map(|device| device.name()).collect();
        self.sync_devices(panel);
        self.devices
            .render(f, sections[0], crate::title!("inputs"), &names, true);

        let keyboard = Block::default()
            .borders(Borders::ALL)
            .fg(Color::DarkGray)
            .title(crate::title!(
                "channel {} : {}",
                panel.channel(),
                note_name(self.base_note())
            ));

        // one octave below the played keys stays visible
        let keys = keyboard.inner(sections[1]);
        self.piano = PianoLayout::new(keys, self.base_note.saturating_sub(12));
        f.render_widget(keyboard, sections[1]);
        f.render_widget(
            widgets::keyboard::Piano::new(self.piano.first_note(), |note| {
                panel.is_note_on(note)
            }),
            keys,
        );

        let log_title = match panel.active_device() {
            Some(device) => crate::title!("input : {}", device),
            None => crate::title!("no input").to_owned(),
        };

        widgets::log::render_messages(f, &log_title, panel.log().entries(), sections[2]);

        self.popups
            .render(f, Popup::Usage, crate::title!("usage"), USAGE);

        self.popups.render(
            f,
            Popup::Alert,
            crate::title!("alert!"),
            self.alert_message.as_deref().unwrap_or_default(),
        );
    }
}
