use super::CliError;
use anyhow::Context;
use snflux_core::common::{PipelineConfig, load_pipeline_config};
use snflux_core::domain::{ComputeRequest, ExecutionMode, FluxError};
use snflux_core::modules::{
    collect_time_series, render_human_summary, run_pipeline, write_batch_report,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct InterpolateArgs {
    /// Flux set name; names the timesteps table
    #[arg(value_name = "fluxname")]
    flux_name: String,

    /// Directory of time-step spectrum files
    input_dir: PathBuf,

    /// Directory receiving one fluence table per time-step file
    output_dir: PathBuf,

    /// Resample time-step files in parallel
    #[arg(long)]
    parallel: bool,

    /// JSON run report output path
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineFlags,
}

#[derive(clap::Args)]
pub(super) struct TimestepsArgs {
    /// Flux set name; names the timesteps table
    #[arg(value_name = "fluxname")]
    flux_name: String,

    /// Directory of time-step spectrum files
    input_dir: PathBuf,

    #[command(flatten)]
    pipeline: PipelineFlags,
}

#[derive(clap::Args)]
pub(super) struct PipelineFlags {
    /// Pipeline configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving `<fluxname>_timesteps.dat`
    #[arg(long)]
    timesteps_dir: Option<PathBuf>,
}

impl PipelineFlags {
    fn resolve(self) -> Result<PipelineConfig, CliError> {
        let mut config = match self.config {
            Some(path) => {
                debug!("loading pipeline config '{}'", path.display());
                load_pipeline_config(&path)
                    .map_err(|error| CliError::Compute(FluxError::from(error)))?
            }
            None => PipelineConfig::default(),
        };
        if let Some(timesteps_dir) = self.timesteps_dir {
            config.timesteps_dir = timesteps_dir;
        }
        Ok(config)
    }
}

pub(super) fn run_interpolate_command(args: InterpolateArgs) -> Result<i32, CliError> {
    let config = args.pipeline.resolve()?;
    let execution_mode = if args.parallel {
        ExecutionMode::Parallel
    } else {
        config.execution_mode
    };
    let request = ComputeRequest::new(args.flux_name, args.input_dir, args.output_dir)
        .with_execution_mode(execution_mode);

    let report = run_pipeline(&request, &config).map_err(CliError::Compute)?;
    if let Some(report_path) = &args.report {
        write_batch_report(report_path, &report).map_err(CliError::Compute)?;
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", render_human_summary(&report))
        .context("failed to print run summary")?;
    if let Some(report_path) = &args.report {
        writeln!(stdout, "JSON report: {}", report_path.display())
            .context("failed to print run summary")?;
    }

    Ok(report.exit_code())
}

pub(super) fn run_timesteps_command(args: TimestepsArgs) -> Result<i32, CliError> {
    let config = args.pipeline.resolve()?;
    let request = ComputeRequest::new(args.flux_name, args.input_dir, PathBuf::new());

    let (series, timesteps_path) =
        collect_time_series(&request, &config).map_err(CliError::Compute)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "Timesteps table: {} ({} steps)",
        timesteps_path.display(),
        series.len()
    )
    .context("failed to print timesteps summary")?;

    Ok(0)
}
