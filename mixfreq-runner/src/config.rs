//! Serializable batch configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) reproduces the standard three-input run over 1982-01-01..2020-07-01.

use std::path::{Path, PathBuf};

use mixfreq_core::domain::{DateRange, Frequency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a batch configuration (content hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config TOML: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Complete configuration for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Process the three frequencies on the rayon pool instead of one by one.
    pub parallel: bool,

    /// Calendar for daily completion and truncation window for every output.
    pub range: DateRange,

    pub inputs: InputConfig,

    pub output: OutputConfig,
}

/// Where the three raw inputs live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Name of the date index column in every input CSV.
    pub date_column: String,
    pub daily: PathBuf,
    pub monthly: PathBuf,
    pub quarterly: PathBuf,
}

/// Where and how the processed tables are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(ConfigError::Parse(format!(
                "unknown output format '{other}' (expected csv or parquet)"
            ))),
        }
    }
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            range: DateRange::default(),
            inputs: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            date_column: "Date".to_string(),
            daily: PathBuf::from("data_raw/daily_data.csv"),
            monthly: PathBuf::from("data_raw/monthly_data.csv"),
            quarterly: PathBuf::from("data_raw/quarterly_data.csv"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data_processed"),
            format: OutputFormat::Csv,
        }
    }
}

impl PrepConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Point all three inputs at `{dir}/{frequency}_data.csv`.
    pub fn with_input_dir(mut self, dir: &Path) -> Self {
        self.inputs.daily = dir.join("daily_data.csv");
        self.inputs.monthly = dir.join("monthly_data.csv");
        self.inputs.quarterly = dir.join("quarterly_data.csv");
        self
    }

    pub fn input_path(&self, frequency: Frequency) -> &Path {
        match frequency {
            Frequency::Daily => &self.inputs.daily,
            Frequency::Monthly => &self.inputs.monthly,
            Frequency::Quarterly => &self.inputs.quarterly,
        }
    }

    /// `{output.dir}/{frequency}.{ext}`
    pub fn output_path(&self, frequency: Frequency) -> PathBuf {
        self.output
            .dir
            .join(format!("{frequency}.{}", self.output.format.extension()))
    }

    /// Deterministic hash of the configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json =
            serde_json::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
