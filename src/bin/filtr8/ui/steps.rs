//! Step row widget - one cell per step, the playing one highlighted

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use filtr8::runtime::Control;

use super::UiState;

pub fn render_steps(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" Steps ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let steps = state.steps();
    if steps == 0 {
        return;
    }

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, steps as u32); steps])
        .split(inner);

    for (i, cell) in cells.iter().enumerate() {
        let frequency = state.value(Control::StepFrequency(i)).unwrap_or(0.0);
        let duration = state.value(Control::StepDuration(i)).unwrap_or(0.0);

        let style = if state.active_step == Some(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let text = vec![
            Line::from(format!("{}", i + 1)),
            Line::from(format!("{frequency:.0}Hz")),
            Line::from(format!("{duration:.0}ms")),
        ];
        frame.render_widget(Paragraph::new(text).style(style), *cell);
    }
}
