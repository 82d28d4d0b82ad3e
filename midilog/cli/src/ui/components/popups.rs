use crate::ui::widgets;
use ratatui::prelude::*;

/// At most one popup is shown at a time, on top of everything else.
pub struct Popups<Key> {
    visible: Option<Key>,
}

impl<Key> Default for Popups<Key> {
    fn default() -> Self {
        Self { visible: None }
    }
}

impl<Key> Popups<Key>
where
    Key: PartialEq<Key> + Copy,
{
    pub fn show(&mut self, popup: Key) {
        self.visible = Some(popup);
    }

    pub fn toggle_visible(&mut self, popup: Key) {
        if self.is_visible(popup) {
            self.hide();
        } else {
            self.show(popup)
        }
    }

    pub fn hide(&mut self) {
        self.visible = None;
    }

    pub fn any_visible(&self) -> bool {
        self.visible.is_some()
    }

    pub fn is_visible(&self, popup: Key) -> bool {
        self.visible == Some(popup)
    }

    pub fn render(&self, f: &mut Frame, popup: Key, title: &str, text: &str) {
        if self.is_visible(popup) {
            widgets::popup::render_text(f, title, text);
        }
    }
}
