use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Thresholds used by the pixel delta computer and the hazard checks.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorConfig {
    /// A differing pixel is "compatible" when its luminance change is below this.
    #[serde(default = "default_compatible_luminance_threshold")]
    pub compatible_luminance_threshold: f64,
    /// The pixel-danger check triggers when the danger ratio exceeds this.
    #[serde(default = "default_pixel_danger_threshold")]
    pub pixel_danger_threshold: f64,
    #[serde(default = "default_flash_min_hz")]
    pub flash_min_hz: f64,
    #[serde(default = "default_flash_max_hz")]
    pub flash_max_hz: f64,
    /// The intensity-swing check triggers when min/max average intensity is at or below this.
    #[serde(default = "default_intensity_ratio_threshold")]
    pub intensity_ratio_threshold: f64,
    /// Score frame pairs on the rayon pool (requires the `parallel` feature).
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            compatible_luminance_threshold: default_compatible_luminance_threshold(),
            pixel_danger_threshold: default_pixel_danger_threshold(),
            flash_min_hz: default_flash_min_hz(),
            flash_max_hz: default_flash_max_hz(),
            intensity_ratio_threshold: default_intensity_ratio_threshold(),
            parallel: false,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            extension: default_extension(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFile(path.display().to_string(), e))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.evaluator.flash_min_hz > config.evaluator.flash_max_hz {
            return Err(ConfigError::Invalid(format!(
                "flash_min_hz ({}) is above flash_max_hz ({})",
                config.evaluator.flash_min_hz, config.evaluator.flash_max_hz
            )));
        }
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    ReadFile(String, std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// Default value functions
fn default_compatible_luminance_threshold() -> f64 {
    128.0
}
fn default_pixel_danger_threshold() -> f64 {
    30.0
}
fn default_flash_min_hz() -> f64 {
    3.0
}
fn default_flash_max_hz() -> f64 {
    30.0
}
fn default_intensity_ratio_threshold() -> f64 {
    0.55
}
fn default_input_dir() -> String {
    "images_bs".into()
}
fn default_extension() -> String {
    "gif".into()
}
fn default_max_concurrent() -> usize {
    4
}
fn default_database_path() -> String {
    "data/verdicts.db".into()
}
fn default_log_level() -> String {
    "info".into()
}
