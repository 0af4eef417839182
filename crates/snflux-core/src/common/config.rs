//! Run configuration for the fluence pipeline.
//!
//! Every field has a default matching the layout of the CHIMERA luminosity
//! spectra, so a configuration file is only needed for differently laid out
//! inputs.

use super::constants::{
    DEFAULT_DATA_START_LINE, DEFAULT_HEADER_LINE, DEFAULT_INPUT_GLOB, DEFAULT_TIMESTEPS_DIR,
    TIMESTEPS_FILE_SUFFIX,
};
use crate::domain::{ExecutionMode, FluxError};
use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub input_glob: String,
    pub header_line: usize,
    pub data_start_line: usize,
    pub timesteps_dir: PathBuf,
    pub execution_mode: ExecutionMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_glob: DEFAULT_INPUT_GLOB.to_string(),
            header_line: DEFAULT_HEADER_LINE,
            data_start_line: DEFAULT_DATA_START_LINE,
            timesteps_dir: PathBuf::from(DEFAULT_TIMESTEPS_DIR),
            execution_mode: ExecutionMode::Serial,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineConfigError> {
        if self.header_line == 0 {
            return Err(PipelineConfigError::Invalid {
                field: "headerLine",
                reason: "line numbers are 1-based".to_string(),
            });
        }
        if self.data_start_line <= self.header_line {
            return Err(PipelineConfigError::Invalid {
                field: "dataStartLine",
                reason: format!(
                    "spectrum rows must start after header line {}, got {}",
                    self.header_line, self.data_start_line
                ),
            });
        }
        self.input_matcher().map(|_| ())
    }

    pub fn input_matcher(&self) -> Result<GlobMatcher, PipelineConfigError> {
        Glob::new(&self.input_glob)
            .map(|glob| glob.compile_matcher())
            .map_err(|source| PipelineConfigError::Glob {
                pattern: self.input_glob.clone(),
                source,
            })
    }

    pub fn timesteps_path(&self, flux_name: &str) -> PathBuf {
        self.timesteps_dir
            .join(format!("{flux_name}{TIMESTEPS_FILE_SUFFIX}"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineConfigError {
    #[error("failed to read pipeline config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse pipeline config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid input glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        source: globset::Error,
    },
    #[error("invalid pipeline config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<PipelineConfigError> for FluxError {
    fn from(error: PipelineConfigError) -> Self {
        match error {
            PipelineConfigError::Read { .. } => {
                FluxError::io_system("IO.PIPELINE_CONFIG", error.to_string())
            }
            _ => FluxError::input_validation("INPUT.PIPELINE_CONFIG", error.to_string()),
        }
    }
}

pub fn load_pipeline_config(
    config_path: impl AsRef<Path>,
) -> Result<PipelineConfig, PipelineConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| PipelineConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let config: PipelineConfig =
        serde_json::from_str(&source).map_err(|source| PipelineConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
