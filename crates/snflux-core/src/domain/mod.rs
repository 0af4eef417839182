pub mod errors;

pub use errors::{ComputeResult, FluxError, FluxErrorCategory, FluxResult, ParserResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Serial,
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputeModule {
    TimeSeries,
    Resample,
}

impl ComputeModule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeSeries => "TIMESERIES",
            Self::Resample => "RESAMPLE",
        }
    }
}

impl Display for ComputeModule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// One run over a directory of time-step files for a named flux set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeRequest {
    pub flux_name: String,
    pub execution_mode: ExecutionMode,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl ComputeRequest {
    pub fn new(
        flux_name: impl Into<String>,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            flux_name: flux_name.into(),
            execution_mode: ExecutionMode::Serial,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_execution_mode(mut self, execution_mode: ExecutionMode) -> Self {
        self.execution_mode = execution_mode;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeArtifact {
    pub relative_path: PathBuf,
}

impl ComputeArtifact {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }
}

/// Species tabulated in the emission spectra, in input column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Nue,
    Nuebar,
    Nux,
    Nuxbar,
}

impl Species {
    pub const ALL: [Species; 4] = [Self::Nue, Self::Nuebar, Self::Nux, Self::Nuxbar];

    pub const fn column(self) -> usize {
        match self {
            Self::Nue => 0,
            Self::Nuebar => 1,
            Self::Nux => 2,
            Self::Nuxbar => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nue => "nue",
            Self::Nuebar => "nuebar",
            Self::Nux => "nux",
            Self::Nuxbar => "nuxbar",
        }
    }
}

impl Display for Species {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Output fluence columns. The heavy-lepton channels are not distinguished in
/// the source spectra, so mu and tau both report the `nux`/`nuxbar` species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluenceChannel {
    Nue,
    Numu,
    Nutau,
    Nuebar,
    Numubar,
    Nutaubar,
}

impl FluenceChannel {
    pub const OUTPUT_ORDER: [FluenceChannel; 6] = [
        Self::Nue,
        Self::Numu,
        Self::Nutau,
        Self::Nuebar,
        Self::Numubar,
        Self::Nutaubar,
    ];

    pub const fn output_column(self) -> usize {
        match self {
            Self::Nue => 0,
            Self::Numu => 1,
            Self::Nutau => 2,
            Self::Nuebar => 3,
            Self::Numubar => 4,
            Self::Nutaubar => 5,
        }
    }

    pub const fn source_species(self) -> Species {
        match self {
            Self::Nue => Species::Nue,
            Self::Numu | Self::Nutau => Species::Nux,
            Self::Nuebar => Species::Nuebar,
            Self::Numubar | Self::Nutaubar => Species::Nuxbar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ComputeRequest, ExecutionMode, FluenceChannel, Species};

    #[test]
    fn compute_request_defaults_to_serial_mode() {
        let request = ComputeRequest::new("chimera", "lumspec", "fluxes/td_fluxes/chimera");
        assert_eq!(request.execution_mode, ExecutionMode::Serial);

        let request = request.with_execution_mode(ExecutionMode::Parallel);
        assert_eq!(request.execution_mode, ExecutionMode::Parallel);
    }

    #[test]
    fn heavy_lepton_channels_fold_onto_nux_species() {
        assert_eq!(FluenceChannel::Numu.source_species(), Species::Nux);
        assert_eq!(FluenceChannel::Nutau.source_species(), Species::Nux);
        assert_eq!(FluenceChannel::Numubar.source_species(), Species::Nuxbar);
        assert_eq!(FluenceChannel::Nutaubar.source_species(), Species::Nuxbar);
        assert_eq!(FluenceChannel::Nue.source_species(), Species::Nue);
        assert_eq!(FluenceChannel::Nuebar.source_species(), Species::Nuebar);
    }

    #[test]
    fn output_columns_follow_output_order() {
        for (position, channel) in FluenceChannel::OUTPUT_ORDER.iter().enumerate() {
            assert_eq!(channel.output_column(), position);
        }
    }

    #[test]
    fn species_columns_follow_input_table_order() {
        let columns: Vec<usize> = Species::ALL.iter().map(|species| species.column()).collect();
        assert_eq!(columns, vec![0, 1, 2, 3]);
    }

    #[test]
    fn execution_mode_parses_lowercase_names() {
        let mode: ExecutionMode =
            serde_json::from_str("\"parallel\"").expect("execution mode should parse");
        assert_eq!(mode, ExecutionMode::Parallel);
    }
}
