use super::model::TimeStamp;
use crate::domain::{ComputeResult, FluxError, ParserResult};
use crate::modules::helpers::{parse_f64_token, source_line};
use globset::GlobMatcher;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER_PLACEHOLDER: &str = "INPUT.TIMESTEP_HEADER";

/// Lists the regular files of `input_dir` whose names match `matcher`, in
/// lexicographic file-name order. A matching name that is not UTF-8 is an
/// input error.
pub(crate) fn list_time_step_files(
    input_dir: &Path,
    matcher: &GlobMatcher,
) -> ComputeResult<Vec<(String, PathBuf)>> {
    let read_dir = fs::read_dir(input_dir).map_err(|source| {
        FluxError::io_system(
            "IO.TIMESERIES_INPUT_DIRECTORY",
            format!(
                "failed to list time-step directory '{}': {}",
                input_dir.display(),
                source
            ),
        )
    })?;

    let mut files = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry.map_err(|source| {
            FluxError::io_system(
                "IO.TIMESERIES_INPUT_DIRECTORY",
                format!(
                    "failed to read entry of '{}': {}",
                    input_dir.display(),
                    source
                ),
            )
        })?;
        let path = dir_entry.path();
        let file_name = dir_entry.file_name();
        if path.is_file() && matcher.is_match(Path::new(&file_name)) {
            files.push((file_name, path));
        }
    }

    files.sort_by(|left, right| left.0.cmp(&right.0));
    files
        .into_iter()
        .map(|(file_name, path)| match file_name.into_string() {
            Ok(file_name) => Ok((file_name, path)),
            Err(_) => Err(FluxError::input_validation(
                "INPUT.TIMESTEP_FILE_NAME",
                format!(
                    "time-step file name '{}' is not valid UTF-8",
                    path.display()
                ),
            )),
        })
        .collect()
}

/// Reads `overall_time post_bounce_time` from 1-based `header_line`.
pub(crate) fn parse_header_line(
    source: &str,
    header_line: usize,
    path: &Path,
) -> ParserResult<TimeStamp> {
    let line = source_line(source, header_line).ok_or_else(|| {
        FluxError::input_validation(
            HEADER_PLACEHOLDER,
            format!(
                "'{}' ends before timestamp header line {}",
                path.display(),
                header_line
            ),
        )
    })?;

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(FluxError::input_validation(
            HEADER_PLACEHOLDER,
            format!(
                "'{}' line {}: expected overall and post-bounce times, found '{}'",
                path.display(),
                header_line,
                line.trim()
            ),
        ));
    }

    let overall_time = parse_f64_token(
        &tokens,
        0,
        "overall time",
        path,
        header_line,
        HEADER_PLACEHOLDER,
    )?;
    let post_bounce_time = parse_f64_token(
        &tokens,
        1,
        "post-bounce time",
        path,
        header_line,
        HEADER_PLACEHOLDER,
    )?;

    Ok(TimeStamp::new(
        overall_time,
        post_bounce_time,
        tokens[0],
        tokens[1],
    ))
}
