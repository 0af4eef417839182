use crate::common::constants::EXTRAPOLATION_ANCHOR_GEV;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLinearResampleInput<'a> {
    pub grid: &'a [f64],
    pub energies: &'a [f64],
    pub flux: &'a [f64],
}

impl<'a> LogLinearResampleInput<'a> {
    pub fn new(grid: &'a [f64], energies: &'a [f64], flux: &'a [f64]) -> Self {
        Self {
            grid,
            energies,
            flux,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSpectrum {
    pub values: Vec<f64>,
    /// Bins at or below the first tabulated energy.
    pub extrapolated_below: usize,
    /// Bins above the last tabulated energy.
    pub extrapolated_above: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    #[error("log-linear resampling requires at least 2 tabulated points, got {actual}")]
    InsufficientPoints { actual: usize },
    #[error("tabulated length mismatch: energy={energy}, flux={flux}")]
    LengthMismatch { energy: usize, flux: usize },
    #[error("tabulated energy must be finite at row {index}, got {value}")]
    NonFiniteEnergy { index: usize, value: f64 },
    #[error(
        "tabulated energies must be strictly increasing, row {index} has {current} after {previous}"
    )]
    NonIncreasingEnergy {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("tabulated flux must be finite and > 0 at row {index}, got {value}")]
    NonPositiveFlux { index: usize, value: f64 },
    #[error("target grid must be non-empty, finite and strictly increasing (bin {index})")]
    InvalidGrid { index: usize },
    #[error("lowest grid bin {lowest_bin} lies above the highest tabulated energy {highest_energy}")]
    GridAboveTable { lowest_bin: f64, highest_energy: f64 },
    #[error("resampled flux left the representable range at bin {bin} (energy {energy}): {value}")]
    NumericRange { bin: usize, energy: f64, value: f64 },
}

/// Reciprocal form of the linear fraction `(energy - lower) / (upper - lower)`.
///
/// Yields exactly 1 at `energy == upper` and exactly 0 at `energy == lower`.
pub fn interpolation_weight(energy: f64, lower: f64, upper: f64) -> f64 {
    (1.0 / (1.0 + (upper - energy) / (energy - lower))).abs()
}

/// Weight for bins at or below the first tabulated energy, measured against a
/// virtual anchor at [`EXTRAPOLATION_ANCHOR_GEV`]. Only one real sample takes
/// part, so the result departs from `first_energy`'s flux everywhere except
/// at `energy == first_energy`.
// TODO: check this heuristic against the emission-model derivation before
// relying on the sub-threshold bins beyond reproducing existing outputs.
pub fn extrapolation_weight(energy: f64, first_energy: f64) -> f64 {
    interpolation_weight(energy, EXTRAPOLATION_ANCHOR_GEV, first_energy)
}

/// `exp(alpha ln(upper) + (1 - alpha) ln(lower))`, exact at both endpoints.
pub fn geometric_blend(alpha: f64, lower_flux: f64, upper_flux: f64) -> f64 {
    if alpha == 0.0 {
        return lower_flux;
    }
    if alpha == 1.0 {
        return upper_flux;
    }
    (alpha * upper_flux.ln() + (1.0 - alpha) * lower_flux.ln()).exp()
}

/// `exp(alpha ln(first_flux))`, exact at `alpha == 1`.
pub fn extrapolated_flux(alpha: f64, first_flux: f64) -> f64 {
    if alpha == 1.0 {
        return first_flux;
    }
    (alpha * first_flux.ln()).exp()
}

/// Resample one tabulated spectrum onto `grid` by geometric interpolation.
///
/// Bins at or below the first energy use the extrapolation weight; bins above
/// the last energy continue the final interval's log-linear trend. Every
/// produced value is finite and strictly positive.
pub fn resample_log_linear(
    input: LogLinearResampleInput<'_>,
) -> Result<ResampledSpectrum, InterpolationError> {
    validate_table(input.energies, input.flux)?;
    validate_grid(input.grid)?;

    let energies = input.energies;
    let flux = input.flux;
    let last = energies.len() - 1;
    if input.grid[0] > energies[last] {
        return Err(InterpolationError::GridAboveTable {
            lowest_bin: input.grid[0],
            highest_energy: energies[last],
        });
    }

    let mut values = Vec::with_capacity(input.grid.len());
    let mut bin = 0;

    while bin < input.grid.len() && input.grid[bin] <= energies[0] {
        let energy = input.grid[bin];
        let alpha = extrapolation_weight(energy, energies[0]);
        values.push(checked_value(bin, energy, extrapolated_flux(alpha, flux[0]))?);
        bin += 1;
    }
    let extrapolated_below = bin;

    let mut interval = 0;
    let mut extrapolated_above = 0;
    while bin < input.grid.len() {
        let energy = input.grid[bin];
        while interval + 1 < last && energy > energies[interval + 1] {
            interval += 1;
        }
        if energy > energies[last] {
            extrapolated_above += 1;
        }

        let alpha = interpolation_weight(energy, energies[interval], energies[interval + 1]);
        let value = geometric_blend(alpha, flux[interval], flux[interval + 1]);
        values.push(checked_value(bin, energy, value)?);
        bin += 1;
    }

    Ok(ResampledSpectrum {
        values,
        extrapolated_below,
        extrapolated_above,
    })
}

fn checked_value(bin: usize, energy: f64, value: f64) -> Result<f64, InterpolationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(InterpolationError::NumericRange { bin, energy, value })
    }
}

fn validate_table(energies: &[f64], flux: &[f64]) -> Result<(), InterpolationError> {
    if energies.len() != flux.len() {
        return Err(InterpolationError::LengthMismatch {
            energy: energies.len(),
            flux: flux.len(),
        });
    }
    if energies.len() < 2 {
        return Err(InterpolationError::InsufficientPoints {
            actual: energies.len(),
        });
    }

    for (index, value) in energies.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(InterpolationError::NonFiniteEnergy { index, value });
        }
        if index > 0 && value <= energies[index - 1] {
            return Err(InterpolationError::NonIncreasingEnergy {
                index,
                previous: energies[index - 1],
                current: value,
            });
        }
    }

    for (index, value) in flux.iter().copied().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(InterpolationError::NonPositiveFlux { index, value });
        }
    }

    Ok(())
}

fn validate_grid(grid: &[f64]) -> Result<(), InterpolationError> {
    if grid.is_empty() {
        return Err(InterpolationError::InvalidGrid { index: 0 });
    }
    for (index, value) in grid.iter().copied().enumerate() {
        if !value.is_finite() || (index > 0 && value <= grid[index - 1]) {
            return Err(InterpolationError::InvalidGrid { index });
        }
    }
    Ok(())
}
