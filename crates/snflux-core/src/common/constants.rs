//! Physical and layout constants shared by the collector and the resampler.
//!
//! The source distance and the uniform grid are fixed for every run; only the
//! file layout is configurable (see [`crate::common::config`]).

use std::f64::consts::PI;

/// 10 kpc expressed in centimetres.
pub const SOURCE_DISTANCE_CM: f64 = 3.086e22;

/// Inverse-square dilution `1 / (4 pi R^2)` at [`SOURCE_DISTANCE_CM`].
pub const DISTANCE_DILUTION_FACTOR: f64 =
    1.0 / (4.0 * PI * SOURCE_DISTANCE_CM * SOURCE_DISTANCE_CM);

pub const MEV_TO_GEV: f64 = 0.001;

pub const GRID_BIN_COUNT: usize = 501;
pub const GRID_STEP_GEV: f64 = 0.0002;

/// Virtual lower anchor used by the below-table extrapolation weight.
pub const EXTRAPOLATION_ANCHOR_GEV: f64 = 0.0001;

pub const SPECTRUM_ROW_COUNT: usize = 20;

/// 1-based line holding `overall_time post_bounce_time`.
pub const DEFAULT_HEADER_LINE: usize = 9;
/// 1-based line of the first spectrum row.
pub const DEFAULT_DATA_START_LINE: usize = 13;

pub const DEFAULT_INPUT_GLOB: &str = "*.dat";
pub const DEFAULT_TIMESTEPS_DIR: &str = "fluxes/td_fluxes/timesteps";
pub const TIMESTEPS_FILE_SUFFIX: &str = "_timesteps.dat";
