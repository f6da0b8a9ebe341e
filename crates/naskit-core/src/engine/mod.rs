//! # Engine Module
//!
//! Chemistry on top of the core models.
//!
//! ## Architecture
//!
//! - **Fragment Embedding** ([`embedding`]) - Rigid replacement of part of a residue with the
//!   matching part of a reference template, validated before any atom is touched
//! - **Nucleotide Chemistry** ([`nucleotide`]) - Sugar swaps (`to_rna`, `to_dna`), base swaps
//!   (`change_nucleobase`), purine/pyrimidine classification and base frames
//! - **Base Pairing** ([`pairing`]) - Geometric filter, hydrogen-bond energy, greedy matching
//!   and dot-bracket rendering
//! - **Error Handling** ([`error`]) - [`error::EngineError`] shared by every operation
//!
//! ## Usage
//!
//! ```ignore
//! use naskit::core::forcefield::params::PairingForcefield;
//! use naskit::core::topology::templates::TemplateLibrary;
//! use naskit::engine::{nucleotide, pairing};
//!
//! let library = TemplateLibrary::bundled()?;
//! for chain in structure.components_mut().iter_mut().filter_map(|c| c.as_chain_mut()) {
//!     nucleotide::chain_to_dna(chain, library)?;
//! }
//! let adjacency = pairing::infer_for_structure(&structure, PairingForcefield::bundled()?)?;
//! println!("{}", pairing::to_dot_bracket(&adjacency));
//! ```

pub mod embedding;
pub mod error;
pub mod nucleotide;
pub mod pairing;
