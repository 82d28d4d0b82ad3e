use midilog::{clock, messages::LogEntry};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem},
};

/// Draw the tail of the log, oldest at the top and the newest entry in
/// bold on the last line.
pub fn render_messages(f: &mut Frame, title: &str, entries: &[LogEntry], area: Rect) {
    let visible = usize::from(area.height.saturating_sub(2));
    let first = entries.len().saturating_sub(visible);
    let newest = entries.len().saturating_sub(1);

    let message_list: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .skip(first)
        .map(|(i, entry)| {
            let style = if i == newest {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    clock::format_time_of_day(entry.timestamp),
                    style.fg(Color::Gray),
                ),
                Span::styled("  -  ", style.fg(Color::DarkGray)),
                Span::styled(entry.description.as_str(), style.fg(Color::Yellow)),
            ]))
        })
        .collect();

    let list = List::new(message_list)
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        );

    f.render_widget(list, area);
}

#[cfg(test)]
mod test {
    use super::*;
    use midilog::midi::MidiEvent;
    use ratatui::backend::TestBackend;

    fn entries(count: u8) -> Vec<LogEntry> {
        (0..count)
            .map(|i| LogEntry::new(&MidiEvent::from_raw(&[0xC0, i], 3_600. + f64::from(i))))
            .collect()
    }

    fn draw(entries: &[LogEntry], height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(50, height)).unwrap();
        terminal
            .draw(|f| render_messages(f, "log", entries, f.size()))
            .unwrap();

        super::super::test::rows(terminal.backend().buffer())
    }

    #[test]
    fn entries_show_their_time_and_description() {
        let rows = draw(&entries(1), 5);
        assert!(rows[1].contains("01:00:00  -  Program change 0"));
    }

    #[test]
    fn only_the_latest_entries_fit() {
        let rows = draw(&entries(5), 4);

        assert!(rows[1].contains("Program change 3"));
        assert!(rows[2].contains("Program change 4"));
        assert!(!rows.iter().any(|row| row.contains("Program change 2")));
    }

    #[test]
    fn an_empty_log_draws_only_the_frame() {
        let rows = draw(&[], 4);
        assert!(rows[0].contains("log"));
        assert!(rows[1].trim_matches(|c| c == '│' || c == ' ').is_empty());
    }
}
