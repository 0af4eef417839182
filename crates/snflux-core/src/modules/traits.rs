use crate::domain::{ComputeArtifact, ComputeResult};
use crate::modules::timeseries::TimeStepJob;
use std::path::Path;

/// Turns one time-step job into one artifact under `output_dir`.
pub trait StepExecutor {
    fn execute_step(
        &self,
        job: &TimeStepJob,
        output_dir: &Path,
    ) -> ComputeResult<ComputeArtifact>;
}
