use serde::Serialize;

/// Default split between "low" and "high" spectral energy, in Hz.
pub const DEFAULT_TONAL_CUTOFF_HZ: f64 = 1000.0;

/// Scalar descriptors of one recording.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AudioFeatures {
    pub sample_rate: u32,
    /// Channel count of the source before downmixing.
    pub channels: u16,
    /// Number of mono frames.
    pub sample_count: usize,
    pub duration_seconds: f64,
    /// Mean of |s|, 0.0-1.0
    pub average_amplitude: f64,
    /// Max of |s|, 0.0-1.0
    pub peak_amplitude: f64,
    /// Peak minus the smallest |s|
    pub dynamic_range: f64,
    /// Spectral magnitude above the cutoff divided by magnitude below it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tonal_balance: Option<f64>,
    /// Normalized mono samples, kept for plotting
    #[serde(skip)]
    pub waveform: Vec<f32>,
}

impl AudioFeatures {
    /// Checks the invariants every extracted feature set satisfies.
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate is zero".into());
        }
        if !(self.duration_seconds.is_finite() && self.duration_seconds > 0.0) {
            return Err(format!("duration {} is not positive", self.duration_seconds));
        }
        let amplitudes = [
            ("average amplitude", self.average_amplitude),
            ("peak amplitude", self.peak_amplitude),
            ("dynamic range", self.dynamic_range),
        ];
        for (name, value) in amplitudes {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} {} is outside 0-1", name, value));
            }
        }
        if let Some(balance) = self.tonal_balance {
            if !(balance.is_finite() && balance >= 0.0) {
                return Err(format!("tonal balance {} is not a finite ratio", balance));
            }
        }
        Ok(())
    }
}

/// Knobs for feature extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractOptions {
    /// Compute the FFT-based tonal balance ratio.
    pub tonal_balance: bool,
    pub tonal_cutoff_hz: f64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tonal_balance: true,
            tonal_cutoff_hz: DEFAULT_TONAL_CUTOFF_HZ,
        }
    }
}
