use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

/// Encodes an RGB8 buffer as PNG with fixed settings, so identical pixels
/// always produce identical bytes.
pub fn encode_rgb<W: Write>(
    rgb_data: &[u8],
    width: u32,
    height: u32,
    title: Option<&str>,
    writer: W,
) -> Result<(), png::EncodingError> {
    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(Compression::Default);
    encoder.set_filter(FilterType::NoFilter);

    if let Some(title) = title {
        if title.chars().all(|c| (c as u32) < 0x100) {
            encoder.add_text_chunk("Title".to_string(), title.to_string())?;
        } else {
            encoder.add_itxt_chunk("Title".to_string(), title.to_string())?;
        }
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(rgb_data)?;

    Ok(())
}
