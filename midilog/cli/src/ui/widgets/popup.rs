use ratatui::{prelude::*, widgets::*};

/// Centered box sized to fit `text`, drawn over whatever is below it.
pub fn render_text(f: &mut Frame, title: &str, text: &str) {
    let lines: Vec<_> = text.split('\n').filter(|l| !l.is_empty()).collect();
    let num_lines = lines.len();
    let max_width = lines
        .iter()
        .fold(title.chars().count(), |max, line| line.chars().count().max(max));

    let lines: Vec<_> = lines
        .iter()
        .map(|line| Line::from(line.to_string()))
        .collect();

    let text = Paragraph::new(lines)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Left);

    const MARGIN: usize = 4;
    let h = f.size().height.max(1) as f32;
    let w = f.size().width.max(1) as f32;

    let (block, area) = setup_popup(
        f.size(),
        title,
        (100. * ((num_lines + MARGIN) as f32 / h)) as u16,
        (100. * ((max_width + MARGIN) as f32 / w)) as u16,
    );

    f.render_widget(Clear, area);
    f.render_widget(text.block(block), area);
}

fn setup_popup(
    frame: Rect,
    title: &str,
    height_percentage: u16,
    width_percentage: u16,
) -> (Block<'_>, Rect) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .set_style(Style::default().gray());

    let height_percentage = height_percentage.min(100);
    let y_border_percentage = (100 - height_percentage) / 2;
    let y_constraints = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(y_border_percentage),
                Constraint::Percentage(height_percentage),
                Constraint::Percentage(y_border_percentage),
            ]
            .as_ref(),
        )
        .split(frame);

    let width_percentage = width_percentage.min(100);
    let x_border_percentage = (100 - width_percentage) / 2;
    let area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(x_border_percentage),
                Constraint::Percentage(width_percentage),
                Constraint::Percentage(x_border_percentage),
            ]
            .as_ref(),
        )
        .split(y_constraints[1])[1];

    (block, area)
}
