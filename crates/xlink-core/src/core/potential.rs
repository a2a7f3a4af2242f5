//! The bond potential used to rank candidate cross-links.
//!
//! A Gaussian around the equilibrium bond length, shifted by a weighted
//! isolatedness bonus and normalized so the best possible score is 1:
//!
//! ```text
//! score(d) = (exp(-(d - d0)^2 / (2 sigma^2)) + w * isolatedness) / (1 + w * Cmax)
//! ```

use serde::Deserialize;

/// Shape parameters of the bond potential.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PotentialParams {
    /// Equilibrium bond length `d0` in Angstroms.
    pub equilibrium_distance: f64,
    /// Tolerance `sigma` of the Gaussian in Angstroms.
    pub tolerance: f64,
    /// Maximum connectivity `Cmax` of a chain pair.
    pub max_connectivity: u32,
}

impl Default for PotentialParams {
    fn default() -> Self {
        Self {
            equilibrium_distance: 3.0,
            tolerance: 2.5,
            max_connectivity: 8,
        }
    }
}

impl PotentialParams {
    /// Isolatedness of a candidate whose two chains already hold `connectivity`
    /// committed-bond endpoints. Negative once a chain pair exceeds `Cmax`.
    #[inline]
    pub fn isolatedness(&self, connectivity: usize) -> f64 {
        self.max_connectivity as f64 - connectivity as f64
    }
}

#[inline]
pub fn gaussian(dist: f64, equilibrium: f64, tolerance: f64) -> f64 {
    let offset = dist - equilibrium;
    (-(offset * offset) / (2.0 * tolerance * tolerance)).exp()
}

#[inline]
pub fn bond_potential(dist: f64, params: &PotentialParams, weight: f64, isolatedness: f64) -> f64 {
    let proximity = gaussian(dist, params.equilibrium_distance, params.tolerance);
    (proximity + weight * isolatedness) / (1.0 + weight * params.max_connectivity as f64)
}
