use crate::domain::{ComputeResult, FluxError};
use std::path::PathBuf;

const OVERALL_TIME_HEADER: &str = "Overall Time (s)";
const POST_BOUNCE_TIME_HEADER: &str = "Post Bounce Time (s)";

/// Header timestamps of one time-step file. The original tokens are kept so
/// the timesteps table echoes the input text unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStamp {
    pub overall_time: f64,
    pub post_bounce_time: f64,
    overall_text: String,
    post_bounce_text: String,
}

impl TimeStamp {
    pub fn new(
        overall_time: f64,
        post_bounce_time: f64,
        overall_text: impl Into<String>,
        post_bounce_text: impl Into<String>,
    ) -> Self {
        Self {
            overall_time,
            post_bounce_time,
            overall_text: overall_text.into(),
            post_bounce_text: post_bounce_text.into(),
        }
    }

    pub fn overall_text(&self) -> &str {
        &self.overall_text
    }

    pub fn post_bounce_text(&self) -> &str {
        &self.post_bounce_text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeStepEntry {
    pub index: usize,
    pub file_name: String,
    pub path: PathBuf,
    pub stamp: TimeStamp,
}

/// One unit of resampling work: a file, its position in the series, and the
/// integration width derived for that position.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStepJob {
    pub index: usize,
    pub file_name: String,
    pub input_path: PathBuf,
    pub time_width: f64,
}

/// The complete, immutable sequence of time steps of a flux set.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    entries: Vec<TimeStepEntry>,
}

impl TimeSeries {
    /// Requires at least two steps with finite, non-decreasing post-bounce
    /// times; the first width is undefined otherwise.
    pub fn from_entries(entries: Vec<TimeStepEntry>) -> ComputeResult<Self> {
        if entries.len() < 2 {
            return Err(FluxError::input_validation(
                "INPUT.TIMESERIES_LENGTH",
                format!(
                    "time series needs at least 2 time-step files to derive step widths, found {}",
                    entries.len()
                ),
            ));
        }

        for (position, entry) in entries.iter().enumerate() {
            if entry.index != position {
                return Err(FluxError::internal(
                    "SYS.TIMESERIES_INDEX",
                    format!(
                        "time-step '{}' carries index {} at position {}",
                        entry.file_name, entry.index, position
                    ),
                ));
            }
            if !entry.stamp.post_bounce_time.is_finite() {
                return Err(FluxError::input_validation(
                    "INPUT.TIMESTEP_HEADER",
                    format!(
                        "'{}': post-bounce time must be finite, got {}",
                        entry.path.display(),
                        entry.stamp.post_bounce_time
                    ),
                ));
            }
            if position > 0 {
                let previous = &entries[position - 1];
                if entry.stamp.post_bounce_time < previous.stamp.post_bounce_time {
                    return Err(FluxError::computation(
                        "RUN.TIMESERIES_ORDER",
                        format!(
                            "post-bounce time decreases from {} ('{}') to {} ('{}')",
                            previous.stamp.post_bounce_text(),
                            previous.file_name,
                            entry.stamp.post_bounce_text(),
                            entry.file_name
                        ),
                    ));
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimeStepEntry] {
        &self.entries
    }

    pub fn post_bounce_times(&self) -> Vec<f64> {
        self.entries
            .iter()
            .map(|entry| entry.stamp.post_bounce_time)
            .collect()
    }

    /// Integration width of step `index`. Steps 0 and 1 share the first
    /// difference since nothing precedes step 0.
    pub fn time_width(&self, index: usize) -> Option<f64> {
        (index < self.entries.len()).then(|| self.width_at(index))
    }

    pub fn jobs(&self) -> Vec<TimeStepJob> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, entry)| TimeStepJob {
                index: entry.index,
                file_name: entry.file_name.clone(),
                input_path: entry.path.clone(),
                time_width: self.width_at(position),
            })
            .collect()
    }

    // at least two entries are guaranteed by `from_entries`
    fn width_at(&self, position: usize) -> f64 {
        let upper = position.max(1);
        let lower = &self.entries[upper - 1].stamp;
        self.entries[upper].stamp.post_bounce_time - lower.post_bounce_time
    }

    pub fn render_table(&self) -> String {
        let overall_width = self
            .entries
            .iter()
            .map(|entry| entry.stamp.overall_text().len())
            .max()
            .unwrap_or(0)
            .max(OVERALL_TIME_HEADER.len());
        let post_bounce_width = self
            .entries
            .iter()
            .map(|entry| entry.stamp.post_bounce_text().len())
            .max()
            .unwrap_or(0)
            .max(POST_BOUNCE_TIME_HEADER.len());

        let mut table = format!(
            "{OVERALL_TIME_HEADER:>overall_width$} {POST_BOUNCE_TIME_HEADER:>post_bounce_width$}\n"
        );
        for entry in &self.entries {
            table.push_str(&format!(
                "{:>overall_width$} {:>post_bounce_width$}\n",
                entry.stamp.overall_text(),
                entry.stamp.post_bounce_text(),
            ));
        }
        table
    }
}
