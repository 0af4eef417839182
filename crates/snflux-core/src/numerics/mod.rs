pub mod grid;
pub mod loglinear;

pub use grid::UniformGrid;
pub use loglinear::{
    InterpolationError, LogLinearResampleInput, ResampledSpectrum, extrapolated_flux,
    extrapolation_weight, geometric_blend, interpolation_weight, resample_log_linear,
};
