//! Error types for note tagging.
//!
//! Two layers:
//! - [`PitchError`] describes why one audio slice produced no note. It never
//!   escapes the word it belongs to.
//! - [`TaggerError`] covers the whole run (missing inputs, decoding, I/O).
//!   These are the only errors allowed to stop the tool.

use std::path::PathBuf;

use thiserror::Error;

use crate::audio::PitchStats;

/// Result alias for run-level operations.
pub type Result<T> = std::result::Result<T, TaggerError>;

/// Outcome of a pitch analysis that did not yield a note.
#[derive(Error, Debug, Clone)]
pub enum PitchError {
    /// No frame passed the confidence filter (nor the relaxed pass for short
    /// slices). Carries the diagnostics gathered so far.
    #[error("no valid pitch found")]
    NoValidPitch { stats: PitchStats },

    #[error("empty audio slice")]
    EmptySegment,

    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    #[error("non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("invalid pitch configuration: {0}")]
    InvalidConfig(String),
}

/// Which of the two inputs a [`TaggerError::MissingInput`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Lyrics,
    Audio,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Lyrics => write!(f, "lyrics file"),
            InputKind::Audio => write!(f, "audio file"),
        }
    }
}

/// Fatal errors for a tagging run.
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("{kind} not found: {}", path.display())]
    MissingInput { kind: InputKind, path: PathBuf },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read WAV file: {0}")]
    Wav(#[from] hound::Error),

    #[error("failed to decode audio: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("unsupported audio: {0}")]
    UnsupportedAudio(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TaggerError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }
}
