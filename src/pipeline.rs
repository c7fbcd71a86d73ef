use serde::Serialize;

use crate::audio::{extract_recording, AudioFeatures, ExtractOptions, Recording};
use crate::error::{DecodeError, PipelineError, Side};
use crate::report::{compare, ComparisonReport, ReportConfig};

/// Everything needed to analyze a pair of recordings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisSettings {
    pub extract: ExtractOptions,
    pub report: ReportConfig,
}

/// Result of a successful benchmark/candidate comparison.
#[derive(Clone, Debug, Serialize)]
pub struct Comparison {
    pub benchmark: AudioFeatures,
    pub candidate: AudioFeatures,
    pub report: ComparisonReport,
}

/// Extract both recordings and compare them.
///
/// The two extractions are independent and run concurrently. If either
/// fails no report is produced and the error names the failing side(s).
pub fn compare_recordings(
    benchmark: Recording<'_>,
    candidate: Recording<'_>,
    settings: &AnalysisSettings,
) -> Result<Comparison, PipelineError> {
    log::info!("Analyzing benchmark and candidate recordings...");
    let (benchmark, candidate) = rayon::join(
        || extract_recording(benchmark, &settings.extract),
        || extract_recording(candidate, &settings.extract),
    );

    let (benchmark, candidate) = match (benchmark, candidate) {
        (Ok(b), Ok(c)) => (b, c),
        (Err(b), Err(c)) => {
            return Err(PipelineError::BothDecode {
                benchmark: b,
                candidate: c,
            })
        }
        (Err(source), Ok(_)) => return Err(decode_failure(Side::Benchmark, source)),
        (Ok(_), Err(source)) => return Err(decode_failure(Side::Candidate, source)),
    };

    log::info!("Comparing features...");
    let report = compare(Some(&benchmark), Some(&candidate), &settings.report)?;

    Ok(Comparison {
        benchmark,
        candidate,
        report,
    })
}

/// Extract a single recording, attributing any failure to `side`.
pub fn inspect(
    recording: Recording<'_>,
    side: Side,
    options: &ExtractOptions,
) -> Result<AudioFeatures, PipelineError> {
    extract_recording(recording, options).map_err(|source| decode_failure(side, source))
}

fn decode_failure(side: Side, source: DecodeError) -> PipelineError {
    log::warn!("The {} recording could not be decoded: {}", side, source);
    PipelineError::Decode { side, source }
}
