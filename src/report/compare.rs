use std::fmt;

use serde::Serialize;

use super::bands::{classify, Band, Thresholds};
use crate::audio::AudioFeatures;
use crate::error::{InvalidInputError, Side};

/// A compared descriptor, in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Average amplitude
    Dynamics,
    /// Peak amplitude
    TonalQuality,
    /// Dynamic range
    Style,
    /// Duration, read inversely: a shorter take is a faster one
    Tempo,
    /// High/low spectral ratio
    TonalBalance,
}

impl Metric {
    pub fn title(self) -> &'static str {
        match self {
            Metric::Dynamics => "Dynamics",
            Metric::TonalQuality => "Tonal Quality",
            Metric::Style => "Playing Style",
            Metric::Tempo => "Tempo",
            Metric::TonalBalance => "Tonal Balance",
        }
    }

    fn value(self, features: &AudioFeatures) -> Option<f64> {
        match self {
            Metric::Dynamics => Some(features.average_amplitude),
            Metric::TonalQuality => Some(features.peak_amplitude),
            Metric::Style => Some(features.dynamic_range),
            Metric::Tempo => Some(features.duration_seconds),
            Metric::TonalBalance => features.tonal_balance,
        }
    }

    fn tolerance(self, thresholds: &Thresholds) -> f64 {
        match self {
            Metric::Dynamics => thresholds.dynamics,
            Metric::TonalQuality => thresholds.tone,
            Metric::Style => thresholds.style,
            Metric::Tempo => thresholds.tempo,
            Metric::TonalBalance => thresholds.tonal_balance,
        }
    }

    /// One-word reading of a band for this metric.
    pub fn verdict(self, band: Band) -> &'static str {
        match (self, band) {
            (Metric::Dynamics, Band::Higher) => "louder",
            (Metric::Dynamics, Band::Lower) => "quieter",
            (Metric::TonalQuality, Band::Higher) => "brighter",
            (Metric::TonalQuality, Band::Lower) => "warmer",
            (Metric::Style, Band::Higher) => "wider",
            (Metric::Style, Band::Lower) => "narrower",
            (Metric::Tempo, Band::Higher) => "slower",
            (Metric::Tempo, Band::Similar) => "similar tempo",
            (Metric::Tempo, Band::Lower) => "faster",
            (Metric::TonalBalance, Band::Higher) => "brighter",
            (Metric::TonalBalance, Band::Similar) => "similar tone",
            (Metric::TonalBalance, Band::Lower) => "warmer",
            (_, Band::Similar) => "similar",
        }
    }

    fn phrase(self, band: Band) -> &'static str {
        match (self, band) {
            (Metric::Dynamics, Band::Higher) => "generally louder than",
            (Metric::Dynamics, Band::Similar) => "very close to",
            (Metric::Dynamics, Band::Lower) => "quieter and more reserved than",
            (Metric::TonalQuality, Band::Higher) => "brighter and more piercing than",
            (Metric::TonalQuality, Band::Similar) => "similar to",
            (Metric::TonalQuality, Band::Lower) => "warmer and less aggressive than",
            (Metric::Style, Band::Higher) => "wider, with more contrast than",
            (Metric::Style, Band::Similar) => "well matched to",
            (Metric::Style, Band::Lower) => "narrower than",
            (Metric::Tempo, Band::Higher) => "slower than",
            (Metric::Tempo, Band::Similar) => "at a similar tempo to",
            (Metric::Tempo, Band::Lower) => "faster than",
            (Metric::TonalBalance, Band::Higher) => "brighter than",
            (Metric::TonalBalance, Band::Similar) => "similar in tone to",
            (Metric::TonalBalance, Band::Lower) => "warmer than",
        }
    }
}

/// One labeled paragraph of the report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    pub metric: Metric,
    pub band: Band,
    pub verdict: &'static str,
    pub benchmark: f64,
    pub candidate: f64,
    /// `None` when the benchmark value was zero and the candidate's was not.
    pub ratio: Option<f64>,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = self.metric.phrase(self.band);
        let (you, them) = (self.candidate, self.benchmark);
        write!(f, "**{}:** ", self.metric.title())?;
        match self.metric {
            Metric::Dynamics => write!(
                f,
                "Your performance was {} the benchmark. (Avg. Loudness: {:.2} vs {:.2})",
                phrase, you, them
            ),
            Metric::TonalQuality => {
                write!(f, "Your tone was {} the goal recording", phrase)?;
                if self.band != Band::Similar {
                    f.write_str(", suggesting a difference in bow pressure")?;
                }
                write!(f, ". (Peak: {:.2} vs {:.2})", you, them)
            }
            Metric::Style => write!(
                f,
                "Your dynamic range was {} the benchmark's, reflecting your expressive choices. (Range: {:.2} vs {:.2})",
                phrase, you, them
            ),
            Metric::Tempo => write!(
                f,
                "Your performance ran {} the benchmark. (Duration: {:.2}s vs {:.2}s)",
                phrase, you, them
            ),
            Metric::TonalBalance => write!(
                f,
                "Your sound was {} the benchmark. (High/low energy ratio: {:.2} vs {:.2})",
                phrase, you, them
            ),
        }
    }
}

/// Which sections to produce and how wide each "similar" band is.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    pub thresholds: Thresholds,
    pub include_tempo: bool,
    /// Only honored when both recordings carry a tonal balance.
    pub include_tonal_balance: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            include_tempo: true,
            include_tonal_balance: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub sections: Vec<Section>,
}

impl ComparisonReport {
    pub fn section(&self, metric: Metric) -> Option<&Section> {
        self.sections.iter().find(|s| s.metric == metric)
    }

    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}

/// Compare a candidate recording's features against the benchmark's.
///
/// Both sides must be present; callers skip the comparison when either
/// extraction failed.
pub fn compare(
    benchmark: Option<&AudioFeatures>,
    candidate: Option<&AudioFeatures>,
    config: &ReportConfig,
) -> Result<ComparisonReport, InvalidInputError> {
    let benchmark = checked(Side::Benchmark, benchmark)?;
    let candidate = checked(Side::Candidate, candidate)?;

    let mut metrics = vec![Metric::Dynamics, Metric::TonalQuality, Metric::Style];
    if config.include_tempo {
        metrics.push(Metric::Tempo);
    }
    if config.include_tonal_balance {
        metrics.push(Metric::TonalBalance);
    }

    let sections = metrics
        .into_iter()
        .filter_map(|metric| {
            let b = metric.value(benchmark)?;
            let c = metric.value(candidate)?;
            let classification = classify(b, c, metric.tolerance(&config.thresholds));
            Some(Section {
                metric,
                band: classification.band,
                verdict: metric.verdict(classification.band),
                benchmark: b,
                candidate: c,
                ratio: classification.ratio,
            })
        })
        .collect();

    Ok(ComparisonReport { sections })
}

fn checked(side: Side, features: Option<&AudioFeatures>) -> Result<&AudioFeatures, InvalidInputError> {
    let features = features.ok_or(InvalidInputError::Missing(side))?;
    features
        .validate()
        .map_err(|reason| InvalidInputError::Malformed { side, reason })?;
    Ok(features)
}
