use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Component that can cycle through elements while
/// remembering which one is in use.
///
/// It does not own the data it renders: the list lives
/// elsewhere and is mirrored with [`Selector::sync`], so
/// the caller keeps the number of selectable elements and
/// the number of rendered elements coherent.
#[derive(Default)]
pub struct Selector {
    state: ListState,
    selection: Option<usize>,
    len: usize,
}

impl Selector {
    /// Mirror a list of `len` elements of which `selection` is in use.
    /// The cursor stays put while it is still in range.
    pub fn sync(&mut self, len: usize, selection: Option<usize>) {
        self.len = len;
        self.selection = selection.filter(|&i| i < len);

        let cursor = self
            .state
            .selected()
            .filter(|&i| i < len)
            .or(self.selection)
            .or(len.ge(&1).then_some(0));

        self.state.select(cursor);
    }

    pub fn next(&mut self) {
        if self.len == 0 {
            return;
        }

        let next = self.state.selected().map(|i| (i + 1) % self.len);
        self.state.select(next);
    }

    pub fn previous(&mut self) {
        if self.len == 0 {
            return;
        }

        let prev = self.state.selected().map(|i| (i + self.len - 1) % self.len);
        self.state.select(prev);
    }

    /// Element under the cursor.
    pub fn highlighted(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Element in use.
    pub fn selected(&self) -> Option<usize> {
        self.selection
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        title: &str,
        items: &[impl AsRef<str>],
        is_highlighted: bool,
    ) {
        let items: Vec<ListItem> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let color = if self.selected() == Some(i) {
                    Color::Cyan
                } else {
                    Color::Gray
                };

                ListItem::new(Span::styled(item.as_ref(), Style::default().fg(color)))
            })
            .collect();

        let border_color = if is_highlighted {
            Color::Gray
        } else {
            Color::DarkGray
        };

        let items = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .fg(border_color)
                    .title(title),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        f.render_stateful_widget(items, area, &mut self.state);
    }
}
