use rustfft::{num_complex::Complex, FftPlanner};

use super::decode::{decode_bytes, DecodedAudio};
use super::features::{AudioFeatures, ExtractOptions};
use crate::error::DecodeError;

/// An encoded audio file handed to the extractor.
#[derive(Clone, Copy, Debug)]
pub struct Recording<'a> {
    pub bytes: &'a [u8],
    /// File extension used as a container probing hint.
    pub extension: Option<&'a str>,
}

impl<'a> Recording<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, extension: None }
    }

    pub fn with_extension(mut self, extension: &'a str) -> Self {
        self.extension = Some(extension);
        self
    }
}

/// Decode `buffer` and derive its features.
pub fn extract(buffer: &[u8], options: &ExtractOptions) -> Result<AudioFeatures, DecodeError> {
    extract_recording(Recording::new(buffer), options)
}

pub fn extract_recording(
    recording: Recording<'_>,
    options: &ExtractOptions,
) -> Result<AudioFeatures, DecodeError> {
    let DecodedAudio { samples, sample_rate, channels } =
        decode_bytes(recording.bytes, recording.extension)?;
    features_from_samples(samples, sample_rate, channels, options)
}

/// Derive features from an already decoded mono sequence.
pub fn features_from_samples(
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    options: &ExtractOptions,
) -> Result<AudioFeatures, DecodeError> {
    if samples.is_empty() {
        return Err(DecodeError::ZeroLength);
    }
    if sample_rate == 0 {
        return Err(DecodeError::Malformed("sample rate is zero".into()));
    }
    if samples.iter().any(|s| !s.is_finite()) {
        return Err(DecodeError::Malformed("non-finite sample".into()));
    }

    let n = samples.len();
    let (sum, peak, floor) = samples.iter().fold((0.0f64, 0.0f32, f32::MAX), |(sum, peak, floor), &s| {
        let a = s.abs();
        (sum + a as f64, peak.max(a), floor.min(a))
    });

    let peak_amplitude = peak as f64;
    // Rounding in the running sum must not push the mean past the peak.
    let average_amplitude = (sum / n as f64).min(peak_amplitude);
    let dynamic_range = peak_amplitude - floor as f64;
    let duration_seconds = n as f64 / sample_rate as f64;

    let tonal_balance = options
        .tonal_balance
        .then(|| tonal_balance(&samples, sample_rate, options.tonal_cutoff_hz));

    log::debug!(
        "Features: duration={:.3}s avg={:.4} peak={:.4} range={:.4} tonal={:?}",
        duration_seconds, average_amplitude, peak_amplitude, dynamic_range, tonal_balance
    );

    Ok(AudioFeatures {
        sample_rate,
        channels,
        sample_count: n,
        duration_seconds,
        average_amplitude,
        peak_amplitude,
        dynamic_range,
        tonal_balance,
        waveform: samples,
    })
}

/// Ratio of summed spectral magnitude at or above `cutoff_hz` to the
/// magnitude below it, over a single FFT of the whole sequence.
///
/// Returns 1.0 when there is no energy below the cutoff (silence).
pub fn tonal_balance(samples: &[f32], sample_rate: u32, cutoff_hz: f64) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 1.0;
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    let bin_hz = sample_rate as f64 / n as f64;
    let (low, high) = buffer[..=n / 2]
        .iter()
        .enumerate()
        .fold((0.0f64, 0.0f64), |(low, high), (k, c)| {
            let magnitude = c.norm() as f64;
            if (k as f64) * bin_hz < cutoff_hz {
                (low + magnitude, high)
            } else {
                (low, high + magnitude)
            }
        });

    if low == 0.0 {
        1.0
    } else {
        high / low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amplitude: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_constant_amplitude_has_no_dynamic_range() {
        let samples: Vec<f32> = (0..1000).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let f = features_from_samples(samples, 1000, 1, &ExtractOptions::default()).unwrap();
        assert_eq!(f.peak_amplitude, 0.5);
        assert!((f.average_amplitude - 0.5).abs() < 1e-9);
        assert_eq!(f.dynamic_range, 0.0);
        assert_eq!(f.duration_seconds, 1.0);
    }

    #[test]
    fn test_amplitude_ordering() {
        let samples = sine(440.0, 0.8, 8000, 0.5);
        let f = features_from_samples(samples, 8000, 1, &ExtractOptions::default()).unwrap();
        assert!(0.0 <= f.average_amplitude);
        assert!(f.average_amplitude <= f.peak_amplitude);
        assert!(f.peak_amplitude <= 1.0);
        assert!(f.dynamic_range <= f.peak_amplitude);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_empty_samples_rejected() {
        let err = features_from_samples(Vec::new(), 44100, 1, &ExtractOptions::default()).unwrap_err();
        assert_eq!(err, DecodeError::ZeroLength);
    }

    #[test]
    fn test_non_finite_samples_rejected() {
        for bad in [f32::NAN, f32::INFINITY] {
            let err = features_from_samples(vec![0.1, bad, -0.1], 8000, 1, &ExtractOptions::default())
                .unwrap_err();
            assert!(matches!(err, DecodeError::Malformed(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_tonal_balance_silence_is_one() {
        assert_eq!(tonal_balance(&[0.0; 512], 8000, 1000.0), 1.0);
    }

    #[test]
    fn test_tonal_balance_low_and_high_tones() {
        let low = sine(200.0, 0.5, 8000, 1.0);
        let high = sine(3000.0, 0.5, 8000, 1.0);
        assert!(tonal_balance(&low, 8000, 1000.0) < 0.1);
        assert!(tonal_balance(&high, 8000, 1000.0) > 10.0);
    }

    #[test]
    fn test_tonal_balance_skipped_when_disabled() {
        let options = ExtractOptions {
            tonal_balance: false,
            ..ExtractOptions::default()
        };
        let f = features_from_samples(sine(440.0, 0.5, 8000, 0.1), 8000, 1, &options).unwrap();
        assert_eq!(f.tonal_balance, None);
    }
}
