use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which of the two recordings an operation concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Benchmark,
    Candidate,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Benchmark => f.write_str("benchmark"),
            Side::Candidate => f.write_str("candidate"),
        }
    }
}

/// Failure to turn an audio byte buffer into features.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("audio buffer is empty")]
    Empty,

    #[error("not a recognized audio container: {0}")]
    UnrecognizedContainer(String),

    #[error("unsupported audio encoding: {0}")]
    UnsupportedCodec(String),

    #[error("malformed audio data: {0}")]
    Malformed(String),

    #[error("no audio track found")]
    NoAudioTrack,

    #[error("audio contains no samples")]
    ZeroLength,
}

impl DecodeError {
    /// Map a symphonia error raised while reading packets or decoding.
    pub(crate) fn from_stream(err: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error;
        match err {
            Error::Unsupported(what) => DecodeError::UnsupportedCodec(what.to_string()),
            Error::IoError(e) => DecodeError::Malformed(e.to_string()),
            other => DecodeError::Malformed(other.to_string()),
        }
    }
}

/// The reporter was handed features it cannot compare.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidInputError {
    #[error("{0} features are missing")]
    Missing(Side),

    #[error("{side} features are invalid: {reason}")]
    Malformed { side: Side, reason: String },
}

/// Failure of the two-recording comparison.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not analyze the {side} recording: {source}")]
    Decode {
        side: Side,
        #[source]
        source: DecodeError,
    },

    #[error("could not analyze either recording (benchmark: {benchmark}; candidate: {candidate})")]
    BothDecode {
        benchmark: DecodeError,
        candidate: DecodeError,
    },

    #[error(transparent)]
    Report(#[from] InvalidInputError),
}

impl PipelineError {
    /// The recordings that failed to decode, in benchmark/candidate order.
    pub fn failed_sides(&self) -> Vec<Side> {
        match self {
            PipelineError::Decode { side, .. } => vec![*side],
            PipelineError::BothDecode { .. } => vec![Side::Benchmark, Side::Candidate],
            PipelineError::Report(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode PNG: {0}")]
    Png(#[from] png::EncodingError),

    #[error("failed to load font: {0}")]
    Font(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
