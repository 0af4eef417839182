use crate::common::constants::{GRID_BIN_COUNT, GRID_STEP_GEV};

/// Evenly spaced energy bins starting at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGrid {
    step: f64,
    bin_count: usize,
}

impl UniformGrid {
    pub const fn new(step: f64, bin_count: usize) -> Self {
        Self { step, bin_count }
    }

    /// The 501-bin, 0.0002 GeV grid every fluence file is written on.
    pub const fn standard() -> Self {
        Self::new(GRID_STEP_GEV, GRID_BIN_COUNT)
    }

    pub const fn len(&self) -> usize {
        self.bin_count
    }

    pub const fn is_empty(&self) -> bool {
        self.bin_count == 0
    }

    pub fn energy(&self, bin: usize) -> f64 {
        bin as f64 * self.step
    }

    pub fn energies(&self) -> Vec<f64> {
        (0..self.bin_count).map(|bin| self.energy(bin)).collect()
    }
}

impl Default for UniformGrid {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::UniformGrid;

    #[test]
    fn standard_grid_has_501_bins_from_zero() {
        let grid = UniformGrid::standard();
        let energies = grid.energies();

        assert_eq!(energies.len(), 501);
        assert_eq!(energies[0], 0.0);
        assert_eq!(energies[1], 0.0002);
        assert!((energies[500] - 0.1).abs() <= 1.0e-12);
        assert!(energies.windows(2).all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn grid_bins_land_on_tabulated_mev_energies() {
        let grid = UniformGrid::standard();
        assert_eq!(grid.energy(5), 1.0 * 0.001);
        assert_eq!(grid.energy(10), 2.0 * 0.001);
    }
}
