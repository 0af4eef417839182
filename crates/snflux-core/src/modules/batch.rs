//! Two-phase fluence run over a directory of time-step files.
//!
//! Phase one assembles the complete time series and writes the timesteps
//! table; any failure there aborts the run. Phase two resamples every file
//! independently, so one bad file is reported without stopping its siblings.

use super::StepExecutor;
use super::helpers::create_output_dir;
use super::resample::ResampleModule;
use super::timeseries::{TimeSeries, TimeSeriesCollector, TimeStepJob, write_timesteps_table};
use crate::common::PipelineConfig;
use crate::domain::{ComputeModule, ComputeRequest, ComputeResult, ExecutionMode, FluxError};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Written,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub file_name: String,
    pub time_width: f64,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl StepOutcome {
    pub fn is_written(&self) -> bool {
        self.status == StepStatus::Written
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub flux_name: String,
    pub passed: bool,
    pub execution_mode: ExecutionMode,
    pub input_dir: String,
    pub output_dir: String,
    pub timesteps_path: String,
    pub step_count: usize,
    pub written_count: usize,
    pub failed_count: usize,
    pub steps: Vec<StepOutcome>,
}

impl BatchReport {
    pub fn exit_code(&self) -> i32 {
        if self.passed { 0 } else { 1 }
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|step| !step.is_written())
    }
}

/// Runs phase one only and returns the series with the table location.
pub fn collect_time_series(
    request: &ComputeRequest,
    config: &PipelineConfig,
) -> ComputeResult<(TimeSeries, PathBuf)> {
    validate_flux_name(&request.flux_name)?;
    let series = TimeSeriesCollector::from_config(config)?.collect(&request.input_dir)?;
    let timesteps_path = config.timesteps_path(&request.flux_name);
    write_timesteps_table(&series, &timesteps_path)?;
    Ok((series, timesteps_path))
}

pub fn run_pipeline(
    request: &ComputeRequest,
    config: &PipelineConfig,
) -> ComputeResult<BatchReport> {
    let executor = ResampleModule::from_config(config)?;
    run_pipeline_with(request, config, &executor)
}

pub fn run_pipeline_with<E>(
    request: &ComputeRequest,
    config: &PipelineConfig,
    executor: &E,
) -> ComputeResult<BatchReport>
where
    E: StepExecutor + Sync,
{
    let (series, timesteps_path) = collect_time_series(request, config)?;

    create_output_dir(&request.output_dir, "IO.FLUENCE_OUTPUT_DIRECTORY")?;
    let jobs = series.jobs();
    info!(
        module = %ComputeModule::Resample,
        flux = %request.flux_name,
        steps = jobs.len(),
        mode = ?request.execution_mode,
        "resampling time steps into '{}'",
        request.output_dir.display()
    );

    let steps: Vec<StepOutcome> = match request.execution_mode {
        ExecutionMode::Serial => jobs
            .iter()
            .map(|job| run_step(executor, job, &request.output_dir))
            .collect(),
        ExecutionMode::Parallel => jobs
            .par_iter()
            .map(|job| run_step(executor, job, &request.output_dir))
            .collect(),
    };

    let written_count = steps.iter().filter(|step| step.is_written()).count();
    let failed_count = steps.len() - written_count;
    info!(
        module = %ComputeModule::Resample,
        written = written_count,
        failed = failed_count,
        "fluence run finished"
    );

    Ok(BatchReport {
        flux_name: request.flux_name.clone(),
        passed: failed_count == 0,
        execution_mode: request.execution_mode,
        input_dir: normalize_path(&request.input_dir),
        output_dir: normalize_path(&request.output_dir),
        timesteps_path: normalize_path(&timesteps_path),
        step_count: steps.len(),
        written_count,
        failed_count,
        steps,
    })
}

fn run_step<E>(executor: &E, job: &TimeStepJob, output_dir: &Path) -> StepOutcome
where
    E: StepExecutor + ?Sized,
{
    match executor.execute_step(job, output_dir) {
        Ok(artifact) => {
            debug!(index = job.index, file = %job.file_name, "time step written");
            StepOutcome {
                index: job.index,
                file_name: job.file_name.clone(),
                time_width: job.time_width,
                status: StepStatus::Written,
                output_path: Some(normalize_path(&artifact.relative_path)),
                diagnostic: None,
            }
        }
        Err(error) => {
            warn!(
                index = job.index,
                file = %job.file_name,
                placeholder = error.placeholder(),
                "time step failed: {}",
                error.message()
            );
            StepOutcome {
                index: job.index,
                file_name: job.file_name.clone(),
                time_width: job.time_width,
                status: StepStatus::Failed,
                output_path: None,
                diagnostic: Some(error.diagnostic_line()),
            }
        }
    }
}

fn validate_flux_name(flux_name: &str) -> ComputeResult<()> {
    if flux_name.is_empty() || flux_name.contains(['/', '\\']) {
        return Err(FluxError::input_validation(
            "INPUT.FLUX_NAME",
            format!("flux name must be a non-empty file-name stem, got '{flux_name}'"),
        ));
    }
    Ok(())
}

pub fn render_human_summary(report: &BatchReport) -> String {
    let mut lines = Vec::new();
    let status = if report.passed { "PASS" } else { "FAIL" };
    lines.push(format!("Fluence status: {}", status));
    lines.push(format!(
        "Flux set: {} ({} mode)",
        report.flux_name,
        match report.execution_mode {
            ExecutionMode::Serial => "serial",
            ExecutionMode::Parallel => "parallel",
        }
    ));
    lines.push(format!(
        "Time steps: {} total ({} written, {} failed)",
        report.step_count, report.written_count, report.failed_count
    ));
    lines.push(format!("Timesteps table: {}", report.timesteps_path));
    lines.push(format!("Fluence directory: {}", report.output_dir));

    for step in report.failed_steps() {
        let reason = step
            .diagnostic
            .as_deref()
            .unwrap_or("time step failed without a diagnostic");
        lines.push(format!("  failed: {} ({})", step.file_name, reason));
    }

    lines.join("\n")
}

pub fn write_batch_report(report_path: &Path, report: &BatchReport) -> ComputeResult<()> {
    if let Some(parent_dir) = report_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        create_output_dir(parent_dir, "IO.BATCH_REPORT_DIRECTORY")?;
    }

    let report_json = serde_json::to_string_pretty(report).map_err(|source| {
        FluxError::internal(
            "SYS.BATCH_REPORT_SERIALIZE",
            format!(
                "failed to serialize run report '{}': {}",
                report_path.display(),
                source
            ),
        )
    })?;
    fs::write(report_path, report_json).map_err(|source| {
        FluxError::io_system(
            "IO.BATCH_REPORT_WRITE",
            format!(
                "failed to write run report '{}': {}",
                report_path.display(),
                source
            ),
        )
    })
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
