//! TUI module for filtr8
//!
//! Shows the step row with the playing step highlighted, the control panel,
//! and a scope of the output. Controls are edited in place.

pub mod state;
mod controls;
mod steps;
mod transport;
mod waveform;

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use filtr8::runtime::{Control, StepSynth};

pub use state::{HighlightEvent, UiState};

use controls::render_controls;
use steps::render_steps;
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

const HELP: &str = " [Q] Quit  [Space] On/Off  [←/→] Select  [↑/↓] Adjust  [PgUp/PgDn] Coarse";

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// UI application state
pub struct UiApp {
    /// The synth shared with the audio callback
    synth: Arc<Mutex<StepSynth>>,
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    /// Ring buffer receiver for step highlights
    step_rx: Consumer<HighlightEvent>,
    /// What the widgets draw from
    state: UiState,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    /// Whether the app should quit
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        synth: Arc<Mutex<StepSynth>>,
        audio_rx: Consumer<f32>,
        step_rx: Consumer<HighlightEvent>,
        sample_rate: f32,
    ) -> Self {
        let state = {
            let synth = synth.lock().unwrap_or_else(PoisonError::into_inner);
            UiState::new(&synth, sample_rate)
        };
        Self {
            synth,
            audio_rx,
            step_rx,
            state,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_steps();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Poll for new audio samples from ring buffer
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received && self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn poll_steps(&mut self) {
        while let Ok(event) = self.step_rx.pop() {
            self.state.apply(event);
        }
    }

    /// Sends a control change to the synth and mirrors the accepted values.
    fn send(&mut self, control: Control, value: f32) {
        let mut synth = self.synth.lock().unwrap_or_else(PoisonError::into_inner);
        self.state.status = synth.set(control, value).err().map(|err| err.to_string());
        self.state.refresh(&synth);
    }

    fn nudge_selected(&mut self, steps: i32) {
        let Some(row) = self.state.selected_row() else {
            return;
        };
        let value = row.spec.nudge(row.value, steps);
        self.send(row.spec.control, value);
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                let value = if self.state.playing { 0.0 } else { 1.0 };
                self.send(Control::Power, value);
            }
            KeyCode::Left | KeyCode::BackTab => self.state.select_previous(),
            KeyCode::Right | KeyCode::Tab => self.state.select_next(),
            KeyCode::Up => self.nudge_selected(1),
            KeyCode::Down => self.nudge_selected(-1),
            KeyCode::PageUp => self.nudge_selected(10),
            KeyCode::PageDown => self.nudge_selected(-10),
            _ => {}
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(5), // Step row
                Constraint::Min(8),    // Controls
                Constraint::Length(8), // Waveform
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, chunks[0], &self.state, &stats);
        render_steps(frame, chunks[1], &self.state);
        render_controls(frame, chunks[2], &self.state);
        render_waveform(frame, chunks[3], &self.audio_buffer);

        let help = match &self.state.status {
            Some(message) => {
                Paragraph::new(format!(" {message}")).style(Style::default().fg(Color::Red))
            }
            None => Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(help, chunks[4]);
    }
}
