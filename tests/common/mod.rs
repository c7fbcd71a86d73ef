#![allow(dead_code)]

use std::io::Cursor;

/// Encodes interleaved 16-bit samples as an in-memory WAV file.
pub fn wav_i16(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
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

/// Encodes mono 32-bit float samples as an in-memory WAV file.
pub fn wav_f32(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::new(Cursor::new(&mut buffer), spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    buffer
}

/// A sine tone at `amplitude` of full scale.
pub fn sine(freq: f64, amplitude: f64, sample_rate: u32, seconds: f64) -> Vec<i16> {
    let n = (sample_rate as f64 * seconds).round() as usize;
    (0..n)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64;
            (amplitude * 32768.0 * phase.sin()).round() as i16
        })
        .collect()
}

/// A square wave whose every sample has magnitude `amplitude` of full scale.
pub fn constant_amplitude(amplitude: f64, sample_rate: u32, seconds: f64) -> Vec<i16> {
    let n = (sample_rate as f64 * seconds).round() as usize;
    let level = (amplitude * 32768.0).round() as i16;
    (0..n)
        .map(|i| if (i / 50) % 2 == 0 { level } else { -level })
        .collect()
}

/// Duplicates each mono sample into an interleaved stereo frame.
pub fn to_stereo(mono: &[i16]) -> Vec<i16> {
    mono.iter().flat_map(|&s| [s, s]).collect()
}
