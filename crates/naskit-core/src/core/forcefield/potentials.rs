pub(crate) const COULOMB_CONSTANT: f64 = 332.0637; // In kcal·Å/(mol·e²)

/// Ratio between the 12-6 minimum-energy distance and sigma, `2^(1/6)`.
pub const R_MIN_PER_SIGMA: f64 = 1.122_462_048_309_373;

#[inline]
pub fn lennard_jones_12_6(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    if dist < 1e-6 {
        return 1e10;
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    well_depth * (rho12 - 2.0 * rho6)
}

/// Lorentz-Berthelot mixing: geometric well depth, arithmetic sigma. Returns `(r_min, well_depth)`.
#[inline]
pub fn mix_lennard_jones(
    sigma1: f64,
    well_depth1: f64,
    sigma2: f64,
    well_depth2: f64,
) -> (f64, f64) {
    let sigma = 0.5 * (sigma1 + sigma2);
    let well_depth = (well_depth1 * well_depth2).sqrt();
    (R_MIN_PER_SIGMA * sigma, well_depth)
}

#[inline]
pub fn coulomb(dist: f64, q1: f64, q2: f64, dielectric: f64) -> f64 {
    if dist < 1e-6 {
        return q1.signum() * q2.signum() * 1e10;
    }
    COULOMB_CONSTANT * q1 * q2 / (dielectric * dist)
}

/// Coulomb with a dielectric that grows linearly with distance, `ε(r) = dielectric · r`.
#[inline]
pub fn coulomb_distance_dependent(dist: f64, q1: f64, q2: f64, dielectric: f64) -> f64 {
    coulomb(dist, q1, q2, dielectric * dist)
}
