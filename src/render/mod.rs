pub mod encode;
pub mod text;
pub mod waveform;

pub use text::TextOverlay;
pub use waveform::{render, RenderOptions, WaveformImage};
