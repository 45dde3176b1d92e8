//! Crate-wide error type.
//!
//! Each layer reports its own failure enum; `Error` gathers them so the
//! composed synth and the binary can propagate with `?`.

use thiserror::Error;

use crate::{
    graph::{param::ParamError, GraphError},
    sequencing::{pattern::PatternError, tempo::TempoError},
    synth::voice::VoiceError,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No compatible audio output is available. Fatal at startup.
    #[error("no compatible audio output: {0}")]
    UnsupportedBackend(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    Tempo(#[from] TempoError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}
