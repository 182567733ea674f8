//! JSON tool configuration.
use crate::edges::DEFAULT_THRESHOLD;
use crate::error::{Result, SobelError};
use crate::partition::RowPartition;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the pipeline driver needs for one run.
#[derive(Clone, Debug, Deserialize)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Expected image width; the input must declare exactly this size.
    pub width: usize,
    /// Expected image height; must be a multiple of `workers`.
    pub height: usize,
    /// Number of row blocks the image is split into.
    pub workers: usize,
    /// Units actually started. Defaults to `workers`; any other value fails the run.
    #[serde(default)]
    pub units: Option<usize>,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

impl PipelineConfig {
    pub fn unit_count(&self) -> usize {
        self.units.unwrap_or(self.workers)
    }

    /// Geometry and threshold checks that do not need any unit to be running.
    pub fn validate(&self) -> Result<RowPartition> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SobelError::config(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        RowPartition::new(self.height, self.width, self.workers)
    }
}

#[derive(Debug, Deserialize)]
pub struct EdgeToolConfig {
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
    /// Optional JSON summary of the run.
    #[serde(default)]
    pub report_json: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn load_config(path: &Path) -> Result<EdgeToolConfig> {
    let data = fs::read_to_string(path).map_err(|e| SobelError::io(path, e))?;
    serde_json::from_str(&data).map_err(|source| SobelError::Json {
        path: path.to_path_buf(),
        source,
    })
}
