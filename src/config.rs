use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::features::{ExtractOptions, DEFAULT_TONAL_CUTOFF_HZ};
use crate::pipeline::AnalysisSettings;
use crate::report::{ReportConfig, Thresholds};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub report: ReportSectionsConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_true")]
    pub tonal_balance: bool,
    #[serde(default = "default_cutoff_hz")]
    pub cutoff_hz: f64,
}

#[derive(Debug, Deserialize)]
pub struct ReportSectionsConfig {
    #[serde(default = "default_true")]
    pub include_tempo: bool,
    #[serde(default = "default_true")]
    pub include_tonal_balance: bool,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub font: Option<PathBuf>,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tonal_balance: default_true(),
            cutoff_hz: default_cutoff_hz(),
        }
    }
}

impl Default for ReportSectionsConfig {
    fn default() -> Self {
        Self {
            include_tempo: default_true(),
            include_tonal_balance: default_true(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            font: None,
            font_size: default_font_size(),
        }
    }
}

fn default_true() -> bool { true }
fn default_cutoff_hz() -> f64 { DEFAULT_TONAL_CUTOFF_HZ }
fn default_width() -> u32 { 1000 }
fn default_height() -> u32 { 240 }
fn default_font_size() -> f32 { 14.0 }

impl Config {
    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            extract: ExtractOptions {
                tonal_balance: self.analysis.tonal_balance,
                tonal_cutoff_hz: self.analysis.cutoff_hz,
            },
            report: ReportConfig {
                thresholds: self.thresholds.clone(),
                include_tempo: self.report.include_tempo,
                include_tonal_balance: self.report.include_tonal_balance,
            },
        }
    }
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// Explicit path first, then `./etude.toml`, then the user config directories.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("etude.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("etude").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("etude").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.analysis_settings(), AnalysisSettings::default());
        assert_eq!(config.render.width, 1000);
        assert!(config.render.font.is_none());
    }

    #[test]
    fn test_partial_thresholds_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            cutoff_hz = 1500.0

            [thresholds]
            dynamics = 0.25

            [report]
            include_tempo = false
            "#,
        )
        .unwrap();
        let settings = config.analysis_settings();
        assert_eq!(settings.extract.tonal_cutoff_hz, 1500.0);
        assert!(settings.extract.tonal_balance);
        assert_eq!(settings.report.thresholds.dynamics, 0.25);
        assert_eq!(settings.report.thresholds.tone, 0.10);
        assert!(!settings.report.include_tempo);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nwidth = 800\nfont_size = 18.0").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.render.width, 800);
        assert_eq!(config.render.font_size, 18.0);
        assert_eq!(config.render.height, 240);
    }

    #[test]
    fn test_invalid_config_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[thresholds]\ntone = \"loud\"").unwrap();
        assert!(load_config(file.path()).is_none());
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = Path::new("/tmp/somewhere/etude.toml");
        assert_eq!(find_config(Some(path)), Some(path.to_path_buf()));
    }
}
