pub mod bands;
pub mod compare;

pub use bands::{Band, Thresholds};
pub use compare::{compare, ComparisonReport, Metric, ReportConfig, Section};
