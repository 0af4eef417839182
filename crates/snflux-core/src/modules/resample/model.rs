use super::parser::TimeStepFile;
use crate::common::constants::DISTANCE_DILUTION_FACTOR;
use crate::domain::{ComputeResult, FluenceChannel, FluxError, Species};
use crate::modules::serialization::{format_fixed_f64, format_scientific_f64};
use crate::numerics::{
    InterpolationError, LogLinearResampleInput, UniformGrid, resample_log_linear,
};
use tracing::{debug, warn};

const ENERGY_WIDTH: usize = 10;
const ENERGY_PRECISION: usize = 6;
const FLUENCE_WIDTH: usize = 15;
const FLUENCE_PRECISION: usize = 6;

/// Per-species fluence on the uniform grid, before projection onto the
/// output channels.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesFluence {
    grid: Vec<f64>,
    fluence: [Vec<f64>; 4],
    above_table_bins: usize,
}

impl SpeciesFluence {
    pub fn from_time_step(
        file: &TimeStepFile,
        grid: &UniformGrid,
        time_width: f64,
    ) -> ComputeResult<Self> {
        if !time_width.is_finite() || time_width < 0.0 {
            return Err(FluxError::computation(
                "RUN.RESAMPLE_TIME_WIDTH",
                format!(
                    "'{}' (step {}): time width must be finite and >= 0, got {}",
                    file.file_name, file.index, time_width
                ),
            ));
        }

        let energies = grid.energies();
        let mut fluence: [Vec<f64>; 4] = Default::default();
        let mut extrapolated_above = 0;
        for species in Species::ALL {
            let resampled = resample_log_linear(LogLinearResampleInput::new(
                &energies,
                file.spectrum.energies_gev(),
                file.spectrum.flux(species),
            ))
            .map_err(|error| interpolation_error(file, species, error))?;
            debug!(
                index = file.index,
                file = %file.file_name,
                species = %species,
                extrapolated_below = resampled.extrapolated_below,
                extrapolated_above = resampled.extrapolated_above,
                "resampled spectrum"
            );
            extrapolated_above = extrapolated_above.max(resampled.extrapolated_above);

            fluence[species.column()] = resampled
                .values
                .into_iter()
                .map(|flux| flux * DISTANCE_DILUTION_FACTOR * time_width)
                .collect();
        }

        if extrapolated_above > 0 {
            let highest_energy = file.spectrum.energies_gev().last().copied().unwrap_or_default();
            warn!(
                index = file.index,
                file = %file.file_name,
                bins = extrapolated_above,
                "bins above the highest tabulated energy ({} GeV) continue the last interval",
                highest_energy
            );
        }

        Ok(Self {
            grid: energies,
            fluence,
            above_table_bins: extrapolated_above,
        })
    }

    pub fn fluence(&self, species: Species) -> &[f64] {
        &self.fluence[species.column()]
    }

    /// Grid bins past the last tabulated energy, logged once per file.
    pub fn above_table_bins(&self) -> usize {
        self.above_table_bins
    }

    /// Projects the four computed species onto the six reported channels.
    pub fn project(&self) -> FluenceTable {
        let rows = self
            .grid
            .iter()
            .copied()
            .enumerate()
            .map(|(bin, energy)| FluenceRow {
                energy,
                channels: FluenceChannel::OUTPUT_ORDER
                    .map(|channel| self.fluence(channel.source_species())[bin]),
            })
            .collect();
        FluenceTable { rows }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluenceRow {
    pub energy: f64,
    /// Values in [`FluenceChannel::OUTPUT_ORDER`].
    pub channels: [f64; 6],
}

impl FluenceRow {
    pub fn channel(&self, channel: FluenceChannel) -> f64 {
        self.channels[channel.output_column()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FluenceTable {
    rows: Vec<FluenceRow>,
}

impl FluenceTable {
    pub fn rows(&self) -> &[FluenceRow] {
        &self.rows
    }

    /// Fixed-width text without header or index column.
    pub fn render(&self) -> String {
        let row_width = ENERGY_WIDTH + FluenceChannel::OUTPUT_ORDER.len() * FLUENCE_WIDTH + 1;
        let mut content = String::with_capacity(self.rows.len() * row_width);
        for row in &self.rows {
            content.push_str(&format_fixed_f64(
                row.energy,
                ENERGY_WIDTH,
                ENERGY_PRECISION,
            ));
            for value in row.channels {
                content.push_str(&format_scientific_f64(
                    value,
                    FLUENCE_WIDTH,
                    FLUENCE_PRECISION,
                ));
            }
            content.push('\n');
        }
        content
    }
}

fn interpolation_error(
    file: &TimeStepFile,
    species: Species,
    error: InterpolationError,
) -> FluxError {
    FluxError::computation(
        "RUN.RESAMPLE_FLUX",
        format!(
            "'{}' (step {}), species {}: {}",
            file.file_name, file.index, species, error
        ),
    )
}
