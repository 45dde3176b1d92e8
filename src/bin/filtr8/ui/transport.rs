//! Transport bar widget - shows power, tempo, current step and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use filtr8::runtime::Control;

use super::UiState;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, state: &UiState, audio_stats: &AudioStats) {
    let block = Block::default().title(" filtr8 ").borders(Borders::ALL);

    let play_symbol = if state.playing { "▶" } else { "■" };
    let play_state_str = if state.playing { "On" } else { "Off" };
    let bpm = state.value(Control::Tempo).unwrap_or(0.0);
    let step = match state.active_step {
        Some(i) => format!("{}/{}", i + 1, state.steps()),
        None => format!("-/{}", state.steps()),
    };

    // Format sample rate nicely (e.g., 48000 -> "48.0kHz")
    let sample_rate_khz = state.sample_rate / 1000.0;

    let line = Line::from(vec![
        Span::styled(format!(" BPM: {bpm:.0}  "), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{play_symbol} {play_state_str}  "),
            Style::default().fg(if state.playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(format!("Step {step}  "), Style::default().fg(Color::White)),
        Span::styled(
            format!("{sample_rate_khz:.1}kHz  "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
