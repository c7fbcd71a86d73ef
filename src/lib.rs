//! Compare a performance recording against a benchmark recording.
//!
//! The engine decodes both recordings to mono, derives a handful of scalar
//! descriptors (duration, loudness, peak, dynamic range, tonal balance),
//! bands the candidate/benchmark ratios and renders a fixed-template report.
//! Waveform plots are available for side-by-side display.

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod report;

pub use audio::{extract, AudioFeatures, ExtractOptions, Recording};
pub use error::{DecodeError, InvalidInputError, PipelineError, RenderError, Side};
pub use pipeline::{compare_recordings, AnalysisSettings, Comparison};
pub use render::{render, RenderOptions, WaveformImage};
pub use report::{compare, ComparisonReport, ReportConfig};
