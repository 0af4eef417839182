pub mod config;
pub mod constants;

pub use config::{PipelineConfig, PipelineConfigError, load_pipeline_config};
