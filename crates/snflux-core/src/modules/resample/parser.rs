use crate::common::constants::{MEV_TO_GEV, SPECTRUM_ROW_COUNT};
use crate::domain::{FluxError, ParserResult, Species};
use crate::modules::helpers::parse_f64_token;
use crate::modules::timeseries::TimeStamp;
use crate::modules::timeseries::parser::parse_header_line;
use std::path::Path;

const ROW_PLACEHOLDER: &str = "INPUT.SPECTRUM_ROW";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SpectrumLayout {
    pub(super) header_line: usize,
    pub(super) data_start_line: usize,
}

/// Tabulated emission spectrum with energies in GeV and flux magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionSpectrum {
    energies_gev: Vec<f64>,
    flux: [Vec<f64>; 4],
}

impl EmissionSpectrum {
    pub fn energies_gev(&self) -> &[f64] {
        &self.energies_gev
    }

    pub fn flux(&self, species: Species) -> &[f64] {
        &self.flux[species.column()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeStepFile {
    pub index: usize,
    pub file_name: String,
    pub stamp: TimeStamp,
    pub spectrum: EmissionSpectrum,
}

pub(super) fn parse_time_step_source(
    index: usize,
    file_name: &str,
    path: &Path,
    source: &str,
    layout: SpectrumLayout,
) -> ParserResult<TimeStepFile> {
    let stamp = parse_header_line(source, layout.header_line, path)?;

    let mut energies_gev = Vec::with_capacity(SPECTRUM_ROW_COUNT);
    let mut flux: [Vec<f64>; 4] = Default::default();

    let rows = source
        .lines()
        .enumerate()
        .skip(layout.data_start_line - 1)
        .filter(|(_, line)| !line.trim().is_empty())
        .take(SPECTRUM_ROW_COUNT);

    for (line_index, line) in rows {
        let line_number = line_index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let energy_mev = parse_f64_token(&tokens, 0, "energy", path, line_number, ROW_PLACEHOLDER)?;
        let energy = energy_mev * MEV_TO_GEV;
        if !energy.is_finite() {
            return Err(FluxError::computation(
                "RUN.SPECTRUM_ENERGY",
                format!(
                    "'{}' line {}: energy {} is not finite",
                    path.display(),
                    line_number,
                    tokens[0]
                ),
            ));
        }
        if let Some(previous) = energies_gev.last().copied()
            && energy <= previous
        {
            return Err(FluxError::computation(
                "RUN.SPECTRUM_ENERGY",
                format!(
                    "'{}' line {}: energies must be strictly increasing, {} GeV follows {} GeV",
                    path.display(),
                    line_number,
                    energy,
                    previous
                ),
            ));
        }
        energies_gev.push(energy);

        for species in Species::ALL {
            let what = format!("{species} flux");
            let raw = parse_f64_token(
                &tokens,
                species.column() + 1,
                &what,
                path,
                line_number,
                ROW_PLACEHOLDER,
            )?;
            // sign is an upstream convention; only the magnitude is physical
            let magnitude = raw.abs();
            if !magnitude.is_finite() || magnitude == 0.0 {
                return Err(FluxError::computation(
                    "RUN.SPECTRUM_FLUX",
                    format!(
                        "'{}' line {}: {} must be non-zero and finite, got {}",
                        path.display(),
                        line_number,
                        what,
                        tokens[species.column() + 1]
                    ),
                ));
            }
            flux[species.column()].push(magnitude);
        }
    }

    if energies_gev.len() < SPECTRUM_ROW_COUNT {
        return Err(FluxError::input_validation(
            "INPUT.SPECTRUM_ROWS",
            format!(
                "'{}': expected {} spectrum rows from line {}, found {}",
                path.display(),
                SPECTRUM_ROW_COUNT,
                layout.data_start_line,
                energies_gev.len()
            ),
        ));
    }

    Ok(TimeStepFile {
        index,
        file_name: file_name.to_string(),
        stamp,
        spectrum: EmissionSpectrum { energies_gev, flux },
    })
}
