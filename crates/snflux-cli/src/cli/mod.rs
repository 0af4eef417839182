mod commands;

use clap::Parser;
use snflux_core::domain::FluxError;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "snflux=info,snflux_core=info";

pub fn run_from_env() -> i32 {
    init_logging();
    let args: Vec<String> = std::env::args().collect();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let flux_error = error.as_flux_error();
            eprintln!("{}", flux_error.diagnostic_line());
            eprintln!("{}", flux_error.fatal_exit_line());
            flux_error.exit_code()
        }
    }
}

#[cfg(test)]
pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("snflux".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

/// Logs go to stderr; stdout carries only the run summary.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "snflux",
    version,
    about = "Resample time-dependent supernova neutrino spectra into fluence tables"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Build the timesteps table and one fluence table per time-step file
    Interpolate(commands::InterpolateArgs),
    /// Build only the timesteps table for a directory of time-step files
    Timesteps(commands::TimestepsArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Interpolate(args) => commands::run_interpolate_command(args),
        CliCommand::Timesteps(args) => commands::run_timesteps_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(FluxError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_flux_error(&self) -> FluxError {
        match self {
            Self::Usage(message) => {
                FluxError::input_validation("INPUT.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => FluxError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, run};

    #[test]
    fn help_is_not_an_error() {
        let code = run(["--help"]).expect("help should succeed");
        assert_eq!(code, 0);
    }

    #[test]
    fn missing_arguments_are_usage_errors() {
        let error = run(["interpolate", "chimera"]).expect_err("missing dirs should fail");
        assert!(matches!(error, CliError::Usage(_)));

        let flux_error = error.as_flux_error();
        assert_eq!(flux_error.placeholder(), "INPUT.CLI_USAGE");
        assert_eq!(flux_error.exit_code(), 2);
    }

    #[test]
    fn unknown_subcommand_is_a_usage_error() {
        let error = run(["resample"]).expect_err("unknown command should fail");
        assert!(matches!(error, CliError::Usage(_)));
    }

    #[test]
    fn internal_errors_map_to_io_category() {
        let error = CliError::from(anyhow::anyhow!("stdout closed"));
        let flux_error = error.as_flux_error();
        assert_eq!(flux_error.placeholder(), "IO.CLI");
        assert_eq!(flux_error.exit_code(), 3);
    }
}
