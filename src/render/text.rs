use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};

use crate::error::RenderError;

/// Font files tried, in order, when no font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// File names looked for in the user's font directory.
const USER_FONTS: &[&str] = &["DejaVuSans.ttf", "LiberationSans-Regular.ttf", "Arial.ttf"];

pub struct TextOverlay {
    font: Font,
    font_size: f32,
}

impl TextOverlay {
    pub fn from_bytes(bytes: &[u8], font_size: f32) -> Result<Self, RenderError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self { font, font_size })
    }

    pub fn from_file(path: &Path, font_size: f32) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, font_size)
    }

    /// Load the configured font, falling back to well-known system fonts.
    pub fn discover(configured: Option<&Path>, font_size: f32) -> Option<Self> {
        if let Some(path) = configured {
            match Self::from_file(path, font_size) {
                Ok(overlay) => return Some(overlay),
                Err(err) => log::warn!("Failed to load font {}: {}", path.display(), err),
            }
        }

        let user_fonts = dirs::font_dir()
            .into_iter()
            .flat_map(|dir| USER_FONTS.iter().map(move |name| dir.join(name)));
        let candidates: Vec<PathBuf> = user_fonts
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from))
            .collect();

        for path in candidates.iter().filter(|p| p.exists()) {
            if let Ok(overlay) = Self::from_file(path, font_size) {
                log::debug!("Using font {}", path.display());
                return Some(overlay);
            }
        }

        log::warn!("No usable font found; waveform plots will have no text");
        None
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Composite text onto an RGB pixel buffer with its top-left corner at (x, y).
    pub fn composite(
        &self,
        pixels: &mut [u8],
        width: u32,
        height: u32,
        text: &str,
        x: i32,
        y: i32,
        color: [u8; 3],
    ) {
        let mut cursor_x = x;
        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, self.font_size);
            let glyph_y = y + self.font_size as i32 - metrics.height as i32 - metrics.ymin;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let alpha = bitmap[gy * metrics.width + gx];
                    if alpha == 0 {
                        continue;
                    }

                    let px = cursor_x + gx as i32;
                    let py = glyph_y + gy as i32;

                    if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                        continue;
                    }

                    let idx = (py as usize * width as usize + px as usize) * 3;
                    let a = alpha as f32 / 255.0;
                    let inv_a = 1.0 - a;
                    for c in 0..3 {
                        pixels[idx + c] = (color[c] as f32 * a + pixels[idx + c] as f32 * inv_a) as u8;
                    }
                }
            }

            cursor_x += metrics.advance_width.round() as i32;
        }
    }

    /// Measure the width of rendered text in pixels.
    pub fn measure_width(&self, text: &str) -> u32 {
        let width: f32 = text
            .chars()
            .map(|ch| self.font.metrics(ch, self.font_size).advance_width.round())
            .sum();
        width.max(0.0) as u32
    }
}
