use midilog::{keyboard::NUM_NOTES, midi::note_name};
use ratatui::{prelude::*, widgets::Widget};

const WHITE_KEY_WIDTH: u16 = 4;
const WHITE_KEYS_PER_OCTAVE: u16 = 7;
const WHITE_KEY_OFFSETS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Where the keys of a piano starting on a C sit on screen.
///
/// White keys are [`WHITE_KEY_WIDTH`] columns wide. A black key covers
/// the last column of the white key on its left and the first column of
/// the one on its right, over the top three fifths of the rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PianoLayout {
    area: Rect,
    first_note: u8,
}

impl PianoLayout {
    pub fn new(area: Rect, first_note: u8) -> Self {
        Self {
            area,
            first_note: first_note - first_note % 12,
        }
    }

    pub fn first_note(&self) -> u8 {
        self.first_note
    }

    /// The note drawn at the given screen cell.
    pub fn key_at(&self, column: u16, row: u16) -> Option<u8> {
        let area = self.area;
        if column < area.left() || column >= area.right() || row < area.top() || row >= area.bottom()
        {
            return None;
        }

        let x = column - area.left();
        let index = x / WHITE_KEY_WIDTH;
        if index >= self.num_white_keys() {
            return None;
        }

        if row - area.top() < self.black_key_height() {
            let within = x % WHITE_KEY_WIDTH;
            let black = if within == WHITE_KEY_WIDTH - 1 && index + 1 < self.num_white_keys() {
                self.black_note(index)
            } else if within == 0 && index > 0 {
                self.black_note(index - 1)
            } else {
                None
            };

            if black.is_some() {
                return black;
            }
        }

        self.white_note(index)
    }

    fn num_white_keys(&self) -> u16 {
        self.area.width / WHITE_KEY_WIDTH
    }

    fn black_key_height(&self) -> u16 {
        (self.area.height * 3 / 5).max(1)
    }

    fn white_note(&self, index: u16) -> Option<u8> {
        let octave = usize::from(index / WHITE_KEYS_PER_OCTAVE);
        let offset = WHITE_KEY_OFFSETS[usize::from(index % WHITE_KEYS_PER_OCTAVE)];
        let note = usize::from(self.first_note) + octave * 12 + usize::from(offset);

        (note < NUM_NOTES).then_some(note as u8)
    }

    /// The black key between white key `index` and the next one, if any.
    fn black_note(&self, index: u16) -> Option<u8> {
        if matches!(index % WHITE_KEYS_PER_OCTAVE, 2 | 6) {
            return None;
        }

        let note = self.white_note(index)?.checked_add(1)?;
        (usize::from(note) < NUM_NOTES).then_some(note)
    }
}

/// On-screen keyboard. Held keys are highlighted, every C is labelled.
pub struct Piano<F> {
    first_note: u8,
    is_note_on: F,
}

impl<F> Piano<F>
where
    F: Fn(u8) -> bool,
{
    pub fn new(first_note: u8, is_note_on: F) -> Self {
        Self {
            first_note,
            is_note_on,
        }
    }
}

impl<F> Widget for Piano<F>
where
    F: Fn(u8) -> bool,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = PianoLayout::new(area, self.first_note);
        let key_style = |note: u8, color: Color| {
            let color = if (self.is_note_on)(note) {
                Color::Cyan
            } else {
                color
            };
            Style::default().bg(color)
        };

        let blank = " ".repeat(usize::from(WHITE_KEY_WIDTH - 1));

        for index in 0..layout.num_white_keys() {
            let Some(note) = layout.white_note(index) else {
                break;
            };

            let x = area.left() + index * WHITE_KEY_WIDTH;
            let style = key_style(note, Color::White);

            for y in area.top()..area.bottom() {
                buf.set_string(x, y, &blank, style);
                buf.set_string(x + WHITE_KEY_WIDTH - 1, y, "│", style.fg(Color::DarkGray));
            }

            if note % 12 == 0 && area.height > 0 {
                buf.set_string(x, area.bottom() - 1, note_name(note), style.fg(Color::Black));
            }
        }

        for index in 0..layout.num_white_keys().saturating_sub(1) {
            let Some(note) = layout.black_note(index) else {
                continue;
            };

            let x = area.left() + index * WHITE_KEY_WIDTH + WHITE_KEY_WIDTH - 1;
            let style = key_style(note, Color::Black);

            for y in area.top()..area.top() + layout.black_key_height().min(area.height) {
                buf.set_string(x, y, "  ", style);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn layout() -> PianoLayout {
        PianoLayout::new(Rect::new(0, 0, 28, 5), 60)
    }

    #[test]
    fn layouts_start_on_a_c() {
        assert_eq!(PianoLayout::new(Rect::default(), 65).first_note(), 60);
        assert_eq!(PianoLayout::new(Rect::default(), 0).first_note(), 0);
    }

    #[test]
    fn white_keys_are_found_on_every_row() {
        let layout = layout();

        assert_eq!(layout.key_at(1, 0), Some(60));
        assert_eq!(layout.key_at(0, 4), Some(60));
        assert_eq!(layout.key_at(4, 4), Some(62));
        assert_eq!(layout.key_at(13, 1), Some(65));
        assert_eq!(layout.key_at(27, 4), Some(71));
    }

    #[test]
    fn black_keys_straddle_white_keys_on_the_top_rows() {
        let layout = layout();

        assert_eq!(layout.key_at(3, 0), Some(61));
        assert_eq!(layout.key_at(4, 2), Some(61));
        assert_eq!(layout.key_at(3, 3), Some(60));
        assert_eq!(layout.key_at(7, 0), Some(63));
    }

    #[test]
    fn e_and_b_have_no_black_key_above() {
        let layout = layout();

        assert_eq!(layout.key_at(11, 0), Some(64));
        assert_eq!(layout.key_at(12, 0), Some(65));
        assert_eq!(layout.key_at(27, 0), Some(71));
    }

    #[test]
    fn cells_outside_the_keys_are_not_keys() {
        let layout = PianoLayout::new(Rect::new(10, 5, 30, 5), 60);

        assert_eq!(layout.key_at(9, 7), None);
        assert_eq!(layout.key_at(10, 4), None);
        assert_eq!(layout.key_at(10, 10), None);
        // 30 columns hold 7 white keys, the last two columns are unused
        assert_eq!(layout.key_at(38, 9), None);
        assert_eq!(layout.key_at(10, 5), Some(60));
    }

    #[test]
    fn keys_stop_at_the_highest_note() {
        let layout = PianoLayout::new(Rect::new(0, 0, 40, 5), 120);

        assert_eq!(layout.key_at(16, 4), Some(127));
        assert_eq!(layout.key_at(19, 0), Some(127));
        assert_eq!(layout.key_at(20, 4), None);
    }

    #[test]
    fn held_keys_are_highlighted_and_cs_labelled() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 28, 5));
        Piano::new(60, |note| note == 62 || note == 66).render(buf.area, &mut buf);

        assert_eq!(buf.get(0, 4).symbol(), "C");
        assert_eq!(buf.get(1, 4).symbol(), "4");
        assert_eq!(buf.get(0, 4).bg, Color::White);
        assert_eq!(buf.get(5, 4).bg, Color::Cyan);
        assert_eq!(buf.get(3, 0).bg, Color::Black);
        assert_eq!(buf.get(15, 0).bg, Color::Cyan);
        assert_eq!(buf.get(11, 0).bg, Color::White);
    }
}
