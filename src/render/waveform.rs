//! Time-domain waveform plots.
//!
//! Each plot column covers a contiguous run of samples and is drawn as the
//! vertical span between that run's minimum and maximum, so transients stay
//! at their true position no matter how far the signal is downsampled.

use std::path::Path;

use super::encode::encode_rgb;
use super::text::TextOverlay;
use crate::audio::AudioFeatures;
use crate::error::RenderError;

const MARGIN_LEFT: u32 = 44;
const MARGIN_RIGHT: u32 = 12;
const MARGIN_TOP: u32 = 28;
const MARGIN_BOTTOM: u32 = 24;

const MIN_PLOT_SIZE: u32 = 16;
/// Largest image edge, in pixels, either dimension is clamped to.
pub const MAX_IMAGE_SIZE: u32 = 8192;

const BACKGROUND_COLOR: [u8; 3] = [32, 32, 32];
const GRID_COLOR: [u8; 3] = [52, 52, 52];
const CENTER_LINE_COLOR: [u8; 3] = [80, 80, 80];
const TEXT_COLOR: [u8; 3] = [230, 230, 230];

pub const BENCHMARK_COLOR: [u8; 3] = [64, 192, 255];
pub const CANDIDATE_COLOR: [u8; 3] = [255, 128, 64];

/// Candidate tick spacings in seconds, smallest first.
const TICK_STEPS: &[f64] = &[0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0];
const MAX_TICKS: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 240,
            color: BENCHMARK_COLOR,
        }
    }
}

/// Pixel rectangle the waveform is drawn into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PlotArea {
    pub fn for_image(width: u32, height: u32) -> Self {
        Self {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            width: width
                .min(MAX_IMAGE_SIZE)
                .saturating_sub(MARGIN_LEFT + MARGIN_RIGHT)
                .max(MIN_PLOT_SIZE),
            height: height
                .min(MAX_IMAGE_SIZE)
                .saturating_sub(MARGIN_TOP + MARGIN_BOTTOM)
                .max(MIN_PLOT_SIZE),
        }
    }

    /// Maps amplitude, clamped to [-1, 1], to a pixel row; +1 is the top row.
    pub fn amplitude_to_y(&self, amplitude: f32) -> u32 {
        let clamped = amplitude.clamp(-1.0, 1.0);
        let normalized = (1.0 - clamped) / 2.0;
        let offset = (normalized * (self.height - 1) as f32).round() as u32;
        self.y + offset.min(self.height - 1)
    }

    /// Maps a time in [0, duration] to a pixel column.
    pub fn time_to_x(&self, seconds: f64, duration: f64) -> u32 {
        let t = (seconds / duration).clamp(0.0, 1.0);
        self.x + (t * (self.width - 1) as f64).round() as u32
    }

    /// Half-open range of sample indices drawn in `column`.
    pub fn column_samples(&self, column: u32, sample_count: usize) -> std::ops::Range<usize> {
        let n = sample_count as u64;
        let w = self.width as u64;
        let start = (column as u64 * n / w) as usize;
        let end = ((column as u64 + 1) * n / w) as usize;
        start..end.max(start + 1).min(sample_count)
    }
}

/// An RGB8 raster plus the label it was drawn for.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub label: String,
}

impl WaveformImage {
    fn filled(width: u32, height: u32, color: [u8; 3], label: &str) -> Self {
        let pixels = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
            label: label.to_string(),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = self.index(x, y);
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    fn put(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.pixels[idx..idx + 3].copy_from_slice(&color);
        }
    }

    fn hline(&mut self, x0: u32, x1: u32, y: u32, color: [u8; 3]) {
        for x in x0..=x1 {
            self.put(x, y, color);
        }
    }

    fn vline(&mut self, x: u32, y0: u32, y1: u32, color: [u8; 3]) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.put(x, y, color);
        }
    }

    /// Encode as a PNG carrying the label in a `Title` text chunk.
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Vec::new();
        encode_rgb(&self.pixels, self.width, self.height, Some(&self.label), &mut buffer)?;
        Ok(buffer)
    }

    pub fn write_png(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

/// Plot the waveform retained in `features`.
///
/// Text (label, axis values) is only drawn when an overlay is supplied; the
/// label always travels with the returned image.
pub fn render(
    features: &AudioFeatures,
    label: &str,
    options: &RenderOptions,
    overlay: Option<&TextOverlay>,
) -> WaveformImage {
    let area = PlotArea::for_image(options.width, options.height);
    let width = area.x + area.width + MARGIN_RIGHT;
    let height = area.y + area.height + MARGIN_BOTTOM;
    let mut image = WaveformImage::filled(width, height, BACKGROUND_COLOR, label);

    let right = area.x + area.width - 1;
    let bottom = area.y + area.height - 1;
    let duration = features.duration_seconds;

    // Amplitude grid
    for amplitude in [1.0f32, 0.5, -0.5, -1.0] {
        image.hline(area.x, right, area.amplitude_to_y(amplitude), GRID_COLOR);
    }

    // Time grid and ticks
    let step = tick_step(duration);
    let ticks: Vec<f64> = (0..)
        .map(|k| k as f64 * step)
        .take_while(|&t| t <= duration + 1e-9)
        .collect();
    for &t in &ticks {
        let x = area.time_to_x(t, duration);
        image.vline(x, area.y, bottom, GRID_COLOR);
        image.vline(x, bottom + 1, bottom + 4, TEXT_COLOR);
    }

    image.hline(area.x, right, area.amplitude_to_y(0.0), CENTER_LINE_COLOR);

    // Waveform
    let samples = &features.waveform;
    let mut previous: Option<f32> = None;
    for column in 0..area.width {
        let range = area.column_samples(column, samples.len());
        if range.is_empty() {
            continue;
        }
        let run = &samples[range];
        let (mut lo, mut hi) = run
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        // Join to the previous column so sparse signals read as a line.
        if let Some(prev) = previous {
            lo = lo.min(prev);
            hi = hi.max(prev);
        }
        previous = run.last().copied();

        image.vline(
            area.x + column,
            area.amplitude_to_y(hi),
            area.amplitude_to_y(lo),
            options.color,
        );
    }

    if let Some(overlay) = overlay {
        draw_text(&mut image, overlay, &area, &ticks, step, duration, label);
    }

    image
}

fn draw_text(
    image: &mut WaveformImage,
    overlay: &TextOverlay,
    area: &PlotArea,
    ticks: &[f64],
    step: f64,
    duration: f64,
    label: &str,
) {
    let (w, h) = (image.width, image.height);
    let font_px = overlay.font_size() as i32;

    overlay.composite(&mut image.pixels, w, h, label, area.x as i32, 4, TEXT_COLOR);

    for (text, amplitude) in [("1", 1.0f32), ("0", 0.0), ("-1", -1.0)] {
        let tw = overlay.measure_width(text) as i32;
        let x = area.x as i32 - 6 - tw;
        let y = area.amplitude_to_y(amplitude) as i32 - font_px / 2;
        overlay.composite(&mut image.pixels, w, h, text, x, y, TEXT_COLOR);
    }

    let bottom = (area.y + area.height) as i32;
    for &t in ticks {
        let text = if step < 1.0 {
            format!("{:.1}", t)
        } else {
            format!("{:.0}", t)
        };
        let tw = overlay.measure_width(&text) as i32;
        let x = area.time_to_x(t, duration) as i32 - tw / 2;
        overlay.composite(&mut image.pixels, w, h, &text, x, bottom + 5, TEXT_COLOR);
    }
}

fn tick_step(duration: f64) -> f64 {
    TICK_STEPS
        .iter()
        .copied()
        .find(|&step| duration / step <= MAX_TICKS)
        .unwrap_or_else(|| (duration / MAX_TICKS).ceil())
}
