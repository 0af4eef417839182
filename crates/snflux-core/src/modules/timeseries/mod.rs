mod model;
pub(crate) mod parser;

pub use model::{TimeSeries, TimeStamp, TimeStepEntry, TimeStepJob};

use super::helpers::{create_output_dir, read_input_source};
use super::serialization::write_text_artifact;
use crate::common::PipelineConfig;
use crate::domain::{ComputeArtifact, ComputeModule, ComputeResult, FluxError};
use globset::GlobMatcher;
use parser::{list_time_step_files, parse_header_line};
use std::path::Path;
use tracing::{debug, info};

/// Phase one of a run: reads the header of every time-step file and
/// assembles the ordered time series.
#[derive(Debug, Clone)]
pub struct TimeSeriesCollector {
    header_line: usize,
    matcher: GlobMatcher,
}

impl TimeSeriesCollector {
    pub fn from_config(config: &PipelineConfig) -> ComputeResult<Self> {
        config.validate()?;
        Ok(Self {
            header_line: config.header_line,
            matcher: config.input_matcher()?,
        })
    }

    pub fn collect(&self, input_dir: &Path) -> ComputeResult<TimeSeries> {
        let files = list_time_step_files(input_dir, &self.matcher)?;
        info!(
            module = %ComputeModule::TimeSeries,
            files = files.len(),
            "collecting time-step headers from '{}'",
            input_dir.display()
        );

        let mut entries = Vec::with_capacity(files.len());
        for (index, (file_name, path)) in files.into_iter().enumerate() {
            let source = read_input_source(&path)?;
            let stamp = parse_header_line(&source, self.header_line, &path)?;
            debug!(
                index,
                file = %file_name,
                post_bounce_time = stamp.post_bounce_time,
                "read time-step header"
            );
            entries.push(TimeStepEntry {
                index,
                file_name,
                path,
                stamp,
            });
        }

        TimeSeries::from_entries(entries)
    }
}

/// Writes the two-column timesteps table, creating its directory if needed.
pub fn write_timesteps_table(series: &TimeSeries, path: &Path) -> ComputeResult<ComputeArtifact> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        create_output_dir(parent, "IO.TIMESTEPS_OUTPUT_DIRECTORY")?;
    }

    write_text_artifact(path, &series.render_table()).map_err(|source| {
        FluxError::io_system(
            "IO.TIMESTEPS_WRITE",
            format!(
                "failed to write timesteps table '{}': {}",
                path.display(),
                source
            ),
        )
    })?;
    info!(
        module = %ComputeModule::TimeSeries,
        steps = series.len(),
        "wrote timesteps table '{}'",
        path.display()
    );

    Ok(ComputeArtifact::new(path))
}

#[cfg(test)]
mod tests {
    use super::{TimeSeriesCollector, write_timesteps_table};
    use crate::common::PipelineConfig;
    use crate::domain::FluxErrorCategory;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn stage_header_file(dir: &Path, name: &str, overall: &str, post_bounce: &str) {
        let mut source = String::new();
        for line in 1..=8 {
            source.push_str(&format!("# preamble line {line}\n"));
        }
        source.push_str(&format!("   {overall}   {post_bounce}\n"));
        fs::write(dir.join(name), source).expect("time-step file should be staged");
    }

    #[test]
    fn collect_orders_steps_by_file_name() {
        let temp = TempDir::new().expect("tempdir should be created");
        stage_header_file(temp.path(), "lum_0002.dat", "0.320", "0.020");
        stage_header_file(temp.path(), "lum_0000.dat", "0.300", "0.000");
        stage_header_file(temp.path(), "lum_0001.dat", "0.310", "0.010");
        fs::write(temp.path().join("README"), "ignored").expect("extra file");

        let collector =
            TimeSeriesCollector::from_config(&PipelineConfig::default()).expect("collector");
        let series = collector.collect(temp.path()).expect("series should build");

        let names: Vec<&str> = series
            .entries()
            .iter()
            .map(|entry| entry.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["lum_0000.dat", "lum_0001.dat", "lum_0002.dat"]);
        assert_eq!(series.post_bounce_times(), vec![0.0, 0.01, 0.02]);
    }

    #[test]
    fn malformed_header_aborts_collection() {
        let temp = TempDir::new().expect("tempdir should be created");
        stage_header_file(temp.path(), "lum_0000.dat", "0.300", "0.000");
        fs::write(temp.path().join("lum_0001.dat"), "truncated\n").expect("bad file");

        let collector =
            TimeSeriesCollector::from_config(&PipelineConfig::default()).expect("collector");
        let error = collector
            .collect(temp.path())
            .expect_err("truncated header should fail");

        assert_eq!(error.category(), FluxErrorCategory::InputValidationError);
        assert_eq!(error.placeholder(), "INPUT.TIMESTEP_HEADER");
        assert!(error.message().contains("lum_0001.dat"));
    }

    #[test]
    fn timesteps_table_is_written_under_missing_directory() {
        let temp = TempDir::new().expect("tempdir should be created");
        let input_dir = temp.path().join("inputs");
        fs::create_dir_all(&input_dir).expect("input dir");
        stage_header_file(&input_dir, "lum_0000.dat", "0.300", "0.000");
        stage_header_file(&input_dir, "lum_0001.dat", "0.310", "0.010");

        let series = TimeSeriesCollector::from_config(&PipelineConfig::default())
            .expect("collector")
            .collect(&input_dir)
            .expect("series should build");
        let table_path = temp.path().join("timesteps/chimera_timesteps.dat");
        let artifact = write_timesteps_table(&series, &table_path).expect("table should write");

        assert_eq!(artifact.relative_path, table_path);
        let table = fs::read_to_string(&table_path).expect("table should be readable");
        assert_eq!(table.lines().count(), 3);
        assert!(table.starts_with("Overall Time (s) Post Bounce Time (s)\n"));
    }
}
