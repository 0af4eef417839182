use crate::domain::{ComputeResult, FluxError, ParserResult};
use std::fs;
use std::path::Path;

pub(crate) fn read_input_source(path: &Path) -> ComputeResult<String> {
    fs::read_to_string(path).map_err(|source| {
        FluxError::io_system(
            "IO.TIMESTEP_READ",
            format!("failed to read time-step file '{}': {}", path.display(), source),
        )
    })
}

pub(crate) fn create_output_dir(path: &Path, placeholder: &'static str) -> ComputeResult<()> {
    fs::create_dir_all(path).map_err(|source| {
        FluxError::io_system(
            placeholder,
            format!(
                "failed to create output directory '{}': {}",
                path.display(),
                source
            ),
        )
    })
}

/// Returns the text of 1-based `line_number`, if the source is long enough.
pub(crate) fn source_line(source: &str, line_number: usize) -> Option<&str> {
    line_number
        .checked_sub(1)
        .and_then(|index| source.lines().nth(index))
}

/// Parses the whitespace-separated token at `position`, naming the line in errors.
pub(crate) fn parse_f64_token(
    tokens: &[&str],
    position: usize,
    what: &str,
    path: &Path,
    line_number: usize,
    placeholder: &'static str,
) -> ParserResult<f64> {
    let token = tokens.get(position).ok_or_else(|| {
        FluxError::input_validation(
            placeholder,
            format!(
                "'{}' line {}: missing {} (expected at least {} fields, found {})",
                path.display(),
                line_number,
                what,
                position + 1,
                tokens.len()
            ),
        )
    })?;

    token.parse::<f64>().map_err(|_| {
        FluxError::input_validation(
            placeholder,
            format!(
                "'{}' line {}: {} '{}' is not a number",
                path.display(),
                line_number,
                what,
                token
            ),
        )
    })
}
