use std::io::Cursor;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::error::DecodeError;

/// Mono, normalized samples decoded from an audio container.
#[derive(Debug)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source before downmixing.
    pub channels: u16,
}

/// Decode an in-memory audio file into a mono sample sequence.
///
/// `extension` is only a probing hint; the container is always sniffed from
/// the bytes themselves.
pub fn decode_bytes(bytes: &[u8], extension: Option<&str>) -> Result<DecodedAudio, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    // MediaSourceStream only takes an owned 'static source, so the buffer is copied once.
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(probe_error)?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let sample_rate = match track.codec_params.sample_rate {
        Some(rate) if rate > 0 => rate,
        _ => return Err(DecodeError::Malformed("missing or zero sample rate".into())),
    };
    let mut channels = track.codec_params.channels.map_or(0, |c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => DecodeError::UnsupportedCodec(what.to_string()),
            other => DecodeError::from_stream(other),
        })?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(DecodeError::from_stream(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(DecodeError::from_stream(e)),
        };

        if channels == 0 {
            channels = decoded.spec().channels.count() as u16;
        }
        push_normalized(decoded, &mut all_samples);
    }

    if all_samples.is_empty() {
        return Err(DecodeError::ZeroLength);
    }
    if let Some(index) = all_samples.iter().position(|s| !s.is_finite()) {
        return Err(DecodeError::Malformed(format!("non-finite sample at frame {}", index)));
    }

    log::info!(
        "Decoded audio: {} samples, {}Hz, {} channel(s), {:.1}s",
        all_samples.len(),
        sample_rate,
        channels,
        all_samples.len() as f64 / sample_rate as f64
    );

    Ok(DecodedAudio {
        samples: all_samples,
        sample_rate,
        channels: channels.max(1),
    })
}

fn probe_error(err: SymphoniaError) -> DecodeError {
    match err {
        SymphoniaError::Unsupported(what) if what.contains("no suitable format reader") => {
            DecodeError::UnrecognizedContainer(what.to_string())
        }
        other => DecodeError::from_stream(other),
    }
}

/// Append a decoded packet to `out`, normalizing by the full-scale value of
/// its sample type and averaging channels down to mono.
fn push_normalized(decoded: AudioBufferRef<'_>, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::U8(buf) => push_mono(&*buf, out, |s| (s as f32 - 128.0) / 128.0),
        AudioBufferRef::U16(buf) => push_mono(&*buf, out, |s| (s as f32 - 32768.0) / 32768.0),
        AudioBufferRef::U24(buf) => {
            push_mono(&*buf, out, |s| (s.inner() as f32 - 8_388_608.0) / 8_388_608.0)
        }
        AudioBufferRef::U32(buf) => {
            push_mono(&*buf, out, |s| ((s as f64 - 2_147_483_648.0) / 2_147_483_648.0) as f32)
        }
        AudioBufferRef::S8(buf) => push_mono(&*buf, out, |s| s as f32 / 128.0),
        AudioBufferRef::S16(buf) => push_mono(&*buf, out, |s| s as f32 / 32768.0),
        AudioBufferRef::S24(buf) => push_mono(&*buf, out, |s| s.inner() as f32 / 8_388_608.0),
        AudioBufferRef::S32(buf) => {
            push_mono(&*buf, out, |s| (s as f64 / 2_147_483_648.0) as f32)
        }
        AudioBufferRef::F32(buf) => push_mono(&*buf, out, |s| s.clamp(-1.0, 1.0)),
        AudioBufferRef::F64(buf) => push_mono(&*buf, out, |s| s.clamp(-1.0, 1.0) as f32),
    }
}

fn push_mono<S: Sample>(buf: &AudioBuffer<S>, out: &mut Vec<f32>, normalize: impl Fn(S) -> f32) {
    let channels = buf.spec().channels.count();
    if channels <= 1 {
        out.extend(buf.chan(0).iter().map(|&s| normalize(s)));
        return;
    }

    out.reserve(buf.frames());
    for frame in 0..buf.frames() {
        let sum: f32 = (0..channels).map(|ch| normalize(buf.chan(ch)[frame])).sum();
        out.push(sum / channels as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_i16(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let spec = hound::WavSpec {
                channels,
                sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            };
            let mut writer = hound::WavWriter::new(Cursor::new(&mut buffer), spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        buffer
    }

    #[test]
    fn test_empty_buffer_short_circuits() {
        assert_eq!(decode_bytes(&[], None).err(), Some(DecodeError::Empty));
    }

    #[test]
    fn test_16bit_full_scale_normalization() {
        let wav = wav_i16(&[0, 16384, -32768, 32767], 8000, 1);
        let audio = decode_bytes(&wav, Some("wav")).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.samples, vec![0.0, 0.5, -1.0, 32767.0 / 32768.0]);
    }

    #[test]
    fn test_stereo_is_averaged_to_mono() {
        // L/R interleaved: (16384, 0), (-16384, -16384)
        let wav = wav_i16(&[16384, 0, -16384, -16384], 8000, 2);
        let audio = decode_bytes(&wav, None).unwrap();
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.samples, vec![0.25, -0.5]);
    }

    #[test]
    fn test_8bit_unsigned_is_centered() {
        let mut buffer = Vec::new();
        {
            let spec = hound::WavSpec {
                channels: 1,
                sample_rate: 8000,
                bits_per_sample: 8,
                sample_format: hound::SampleFormat::Int,
            };
            let mut writer = hound::WavWriter::new(Cursor::new(&mut buffer), spec).unwrap();
            // hound takes signed 8-bit values and stores them offset by 128
            for s in [0i8, 64, -128] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        let audio = decode_bytes(&buffer, None).unwrap();
        assert_eq!(audio.samples, vec![0.0, 0.5, -1.0]);
    }

    #[test]
    fn test_header_without_frames_is_zero_length() {
        let wav = wav_i16(&[], 44100, 1);
        assert_eq!(decode_bytes(&wav, None).err(), Some(DecodeError::ZeroLength));
    }

    #[test]
    fn test_nan_float_sample_is_malformed() {
        let mut buffer = Vec::new();
        {
            let spec = hound::WavSpec {
                channels: 1,
                sample_rate: 8000,
                bits_per_sample: 32,
                sample_format: hound::SampleFormat::Float,
            };
            let mut writer = hound::WavWriter::new(Cursor::new(&mut buffer), spec).unwrap();
            for s in [0.25f32, f32::NAN, -0.25] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        let err = decode_bytes(&buffer, Some("wav")).unwrap_err();
        assert_eq!(err, DecodeError::Malformed("non-finite sample at frame 1".into()));
    }

    #[test]
    fn test_text_is_not_a_container() {
        let err = decode_bytes(b"definitely not an audio file", None).unwrap_err();
        assert!(matches!(err, DecodeError::UnrecognizedContainer(_)), "{:?}", err);
    }
}
