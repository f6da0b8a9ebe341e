//! # Force Field Module
//!
//! The energy terms used to score candidate base pairs.
//!
//! - [`potentials`] - 12-6 Lennard-Jones and Coulomb pair potentials, with Lorentz-Berthelot
//!   mixing and an optional distance-dependent dielectric
//! - [`params`] - [`params::PairingForcefield`]: geometric filter limits, per-element
//!   Lennard-Jones parameters and per-atom partial charges, loaded from TOML and CSV
//!
//! ```ignore
//! use naskit::core::forcefield::params::PairingForcefield;
//!
//! let ff = PairingForcefield::bundled()?;
//! let threshold = ff.globals().acceptance_threshold;
//! ```

pub mod params;
pub mod potentials;
