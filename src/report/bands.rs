use serde::{Deserialize, Serialize};

/// Where the candidate's value sits relative to the benchmark's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Lower,
    Similar,
    Higher,
}

impl Band {
    pub fn inverse(self) -> Band {
        match self {
            Band::Lower => Band::Higher,
            Band::Similar => Band::Similar,
            Band::Higher => Band::Lower,
        }
    }
}

/// Half-widths of the "similar" band around a ratio of 1.0, per metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_tone")]
    pub tone: f64,
    #[serde(default = "default_dynamics")]
    pub dynamics: f64,
    #[serde(default = "default_style")]
    pub style: f64,
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    #[serde(default = "default_tonal_balance")]
    pub tonal_balance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            tone: default_tone(),
            dynamics: default_dynamics(),
            style: default_style(),
            tempo: default_tempo(),
            tonal_balance: default_tonal_balance(),
        }
    }
}

fn default_tone() -> f64 { 0.10 }
fn default_dynamics() -> f64 { 0.15 }
fn default_style() -> f64 { 0.15 }
fn default_tempo() -> f64 { 0.05 }
fn default_tonal_balance() -> f64 { 0.20 }

/// Outcome of comparing one metric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub band: Band,
    /// `candidate / benchmark`; `None` when the benchmark is zero and the
    /// candidate is not.
    pub ratio: Option<f64>,
}

/// Classify `candidate` against `benchmark` with a symmetric tolerance.
///
/// The similar band is `[1 - tolerance, 1 + tolerance]`, inclusive. A zero
/// benchmark compares equal to a zero candidate and lower than anything else.
pub fn classify(benchmark: f64, candidate: f64, tolerance: f64) -> Classification {
    if benchmark == 0.0 {
        return if candidate == 0.0 {
            Classification { band: Band::Similar, ratio: Some(1.0) }
        } else {
            Classification { band: Band::Higher, ratio: None }
        };
    }

    let ratio = candidate / benchmark;
    let band = if ratio > 1.0 + tolerance {
        Band::Higher
    } else if ratio < 1.0 - tolerance {
        Band::Lower
    } else {
        Band::Similar
    };

    Classification { band, ratio: Some(ratio) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_band_edges_are_inclusive() {
        assert_eq!(classify(1.0, 1.10, 0.10).band, Band::Similar);
        assert_eq!(classify(1.0, 0.90, 0.10).band, Band::Similar);
        assert_eq!(classify(1.0, 1.1001, 0.10).band, Band::Higher);
        assert_eq!(classify(1.0, 0.8999, 0.10).band, Band::Lower);
    }

    #[test]
    fn test_zero_benchmark_guard() {
        assert_eq!(
            classify(0.0, 0.0, 0.15),
            Classification { band: Band::Similar, ratio: Some(1.0) }
        );
        assert_eq!(
            classify(0.0, 0.1, 0.15),
            Classification { band: Band::Higher, ratio: None }
        );
    }

    #[test]
    fn test_swapping_inputs_inverts_band() {
        for (a, b) in [(0.5, 0.6), (0.2, 0.9), (10.0, 9.0)] {
            let forward = classify(a, b, 0.05).band;
            let backward = classify(b, a, 0.05).band;
            assert_eq!(forward.inverse(), backward);
        }
    }

    #[test]
    fn test_default_thresholds() {
        let t = Thresholds::default();
        assert_eq!((t.tone, t.dynamics, t.style, t.tempo, t.tonal_balance), (0.10, 0.15, 0.15, 0.05, 0.20));
    }
}
