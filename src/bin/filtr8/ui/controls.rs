//! Control panel widget - every control grouped by panel, the selected one
//! marked

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use filtr8::runtime::{Control, ControlGroup};

use super::UiState;

const PANELS: [(ControlGroup, &str); 4] = [
    (ControlGroup::Clock, " Clock "),
    (ControlGroup::Source, " Source "),
    (ControlGroup::Echo, " Echo "),
    (ControlGroup::Filter, " Filter "),
];

fn group_color(group: ControlGroup) -> Color {
    match group {
        ControlGroup::Clock => Color::Cyan,
        ControlGroup::Sequence => Color::White,
        ControlGroup::Source => Color::Yellow,
        ControlGroup::Echo => Color::Magenta,
        ControlGroup::Filter => Color::Blue,
    }
}

pub fn render_controls(frame: &mut Frame, area: Rect, state: &UiState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ])
        .split(area);

    render_group(frame, columns[0], state, ControlGroup::Sequence, " Pattern ");
    for (column, (group, title)) in columns.iter().skip(1).zip(PANELS) {
        render_group(frame, *column, state, group, title);
    }
}

fn render_group(frame: &mut Frame, area: Rect, state: &UiState, group: ControlGroup, title: &str) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(group_color(group)));

    let lines: Vec<Line> = state
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.spec.group == group)
        .filter(|(_, row)| group != ControlGroup::Sequence || is_step_control(row.spec.control))
        .map(|(index, row)| {
            let selected = index == state.selected;
            let marker = if selected { "▶ " } else { "  " };
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<8}", row.spec.control.to_string()), style),
                Span::styled(
                    format!(" {}", row.spec.format(row.value)),
                    Style::default().fg(group_color(group)),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn is_step_control(control: Control) -> bool {
    matches!(control, Control::StepFrequency(_) | Control::StepDuration(_))
}
