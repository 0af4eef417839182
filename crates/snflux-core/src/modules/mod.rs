pub mod batch;
pub mod resample;
pub mod serialization;
pub mod timeseries;

mod helpers;
mod traits;

pub use batch::{
    BatchReport, StepOutcome, StepStatus, collect_time_series, render_human_summary,
    run_pipeline, run_pipeline_with, write_batch_report,
};
pub use resample::ResampleModule;
pub use timeseries::TimeSeriesCollector;
pub use traits::StepExecutor;
