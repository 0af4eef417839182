mod model;
pub(crate) mod parser;

pub use model::{FluenceRow, FluenceTable, SpeciesFluence};
pub use parser::{EmissionSpectrum, TimeStepFile};

use super::StepExecutor;
use super::helpers::read_input_source;
use super::serialization::write_text_artifact;
use super::timeseries::TimeStepJob;
use crate::common::PipelineConfig;
use crate::domain::{ComputeArtifact, ComputeModule, ComputeResult, FluxError};
use crate::numerics::UniformGrid;
use parser::{SpectrumLayout, parse_time_step_source};
use std::path::Path;
use tracing::debug;

/// Phase two of a run: resamples one time-step file onto the uniform grid
/// and writes its fluence table.
#[derive(Debug, Clone)]
pub struct ResampleModule {
    layout: SpectrumLayout,
    grid: UniformGrid,
}

impl ResampleModule {
    pub fn from_config(config: &PipelineConfig) -> ComputeResult<Self> {
        config.validate()?;
        Ok(Self {
            layout: SpectrumLayout {
                header_line: config.header_line,
                data_start_line: config.data_start_line,
            },
            grid: UniformGrid::standard(),
        })
    }

    pub fn read_time_step(&self, job: &TimeStepJob) -> ComputeResult<TimeStepFile> {
        let source = read_input_source(&job.input_path)?;
        parse_time_step_source(
            job.index,
            &job.file_name,
            &job.input_path,
            &source,
            self.layout,
        )
    }

    pub fn resample(&self, job: &TimeStepJob) -> ComputeResult<FluenceTable> {
        let file = self.read_time_step(job)?;
        let fluence = SpeciesFluence::from_time_step(&file, &self.grid, job.time_width)?;
        Ok(fluence.project())
    }
}

impl StepExecutor for ResampleModule {
    fn execute_step(
        &self,
        job: &TimeStepJob,
        output_dir: &Path,
    ) -> ComputeResult<ComputeArtifact> {
        // render fully before touching the output so a failed step leaves no file
        let content = self.resample(job)?.render();
        let output_path = output_dir.join(&job.file_name);
        write_text_artifact(&output_path, &content).map_err(|source| {
            FluxError::io_system(
                "IO.FLUENCE_WRITE",
                format!(
                    "failed to write fluence table '{}': {}",
                    output_path.display(),
                    source
                ),
            )
        })?;
        debug!(
            module = %ComputeModule::Resample,
            index = job.index,
            file = %job.file_name,
            time_width = job.time_width,
            "wrote fluence table"
        );

        Ok(ComputeArtifact::new(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::ResampleModule;
    use super::parser::fixtures::{reciprocal_rows, time_step_source};
    use crate::common::PipelineConfig;
    use crate::common::constants::DISTANCE_DILUTION_FACTOR;
    use crate::domain::FluxErrorCategory;
    use crate::modules::StepExecutor;
    use crate::modules::serialization::{format_fixed_f64, format_scientific_f64};
    use crate::modules::timeseries::TimeStepJob;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn stage_job(dir: &Path, name: &str, source: &str, time_width: f64) -> TimeStepJob {
        let input_path = dir.join(name);
        fs::write(&input_path, source).expect("time-step file should be staged");
        TimeStepJob {
            index: 1,
            file_name: name.to_string(),
            input_path,
            time_width,
        }
    }

    #[test]
    fn written_table_matches_reciprocal_scenario() {
        let temp = TempDir::new().expect("tempdir should be created");
        let output_dir = temp.path().join("out");
        fs::create_dir_all(&output_dir).expect("output dir");
        let source = time_step_source("0.310", "0.010", &reciprocal_rows());
        let job = stage_job(temp.path(), "lum_0001.dat", &source, 0.01);

        let module = ResampleModule::from_config(&PipelineConfig::default()).expect("module");
        let artifact = module
            .execute_step(&job, &output_dir)
            .expect("step should succeed");
        assert_eq!(artifact.relative_path, output_dir.join("lum_0001.dat"));

        let written = fs::read_to_string(&artifact.relative_path).expect("output readable");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 501);

        let fluence = format_scientific_f64(50.0 * DISTANCE_DILUTION_FACTOR * 0.01, 15, 6);
        let expected = format!("{}{}", format_fixed_f64(0.002, 10, 6), fluence.repeat(6));
        assert_eq!(lines[10], expected);
    }

    #[test]
    fn rerunning_a_step_is_byte_identical() {
        let temp = TempDir::new().expect("tempdir should be created");
        let source = time_step_source("0.310", "0.010", &reciprocal_rows());
        let job = stage_job(temp.path(), "lum_0001.dat", &source, 0.01);
        let first_dir = temp.path().join("first");
        let second_dir = temp.path().join("second");
        fs::create_dir_all(&first_dir).expect("first dir");
        fs::create_dir_all(&second_dir).expect("second dir");

        let module = ResampleModule::from_config(&PipelineConfig::default()).expect("module");
        let first = module.execute_step(&job, &first_dir).expect("first run");
        let second = module.execute_step(&job, &second_dir).expect("second run");

        let first = fs::read(first.relative_path).expect("first output");
        let second = fs::read(second.relative_path).expect("second output");
        assert_eq!(first, second);
    }

    #[test]
    fn failed_step_leaves_no_output_file() {
        let temp = TempDir::new().expect("tempdir should be created");
        let output_dir = temp.path().join("out");
        fs::create_dir_all(&output_dir).expect("output dir");
        let rows = reciprocal_rows();
        let source = time_step_source("0.310", "0.010", &rows[..12]);
        let job = stage_job(temp.path(), "lum_0001.dat", &source, 0.01);

        let module = ResampleModule::from_config(&PipelineConfig::default()).expect("module");
        let error = module
            .execute_step(&job, &output_dir)
            .expect_err("short table should fail");

        assert_eq!(error.category(), FluxErrorCategory::InputValidationError);
        assert!(!output_dir.join("lum_0001.dat").exists());
    }

    #[test]
    fn unreadable_input_is_an_io_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let job = TimeStepJob {
            index: 0,
            file_name: "absent.dat".to_string(),
            input_path: temp.path().join("absent.dat"),
            time_width: 0.01,
        };

        let module = ResampleModule::from_config(&PipelineConfig::default()).expect("module");
        let error = module
            .execute_step(&job, temp.path())
            .expect_err("missing input should fail");
        assert_eq!(error.category(), FluxErrorCategory::IoSystemError);
        assert_eq!(error.placeholder(), "IO.TIMESTEP_READ");
    }
}
