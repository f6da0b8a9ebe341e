//! # Core Models Module
//!
//! The hierarchical in-memory representation of coordinate files.
//!
//! ## Overview
//!
//! - [`atom`] - One atom record: identity, position and file metadata
//! - [`residue`] - Name-indexed atom groups with a fixed [`residue::ResidueCategory`]
//! - [`chain`] - Category-homogeneous residue sequences sharing a chain label
//! - [`structure`] - One frame: an ordered list of chains and standalone molecules
//! - [`frames`] - All frames of a file plus its header, and the [`frames::Document`] view used
//!   by writers
//! - [`edit`] - The [`edit::Renumber`] bulk-edit trait shared by every container
//!
//! ## Invariants
//!
//! Identity fields (atom names, residue name, chain label, residue number) are private and are
//! rewritten top-down in a single pass, so an atom never disagrees with its residue and a
//! residue never disagrees with its chain. Chains hand out residues mutably only through
//! [`chain::Chain::update_residue`], which rejects edits that reuse a residue number or change
//! the label.
//!
//! ```ignore
//! use naskit::core::models::{atom::Atom, residue::{Residue, ResidueCategory}};
//!
//! let atoms = vec![Atom::new("P", "P", Point3::origin()).with_residue("DG", 'A', 1)];
//! let residue = Residue::from_atoms(ResidueCategory::NucleicAcid, atoms)?;
//! ```

pub mod atom;
pub mod chain;
pub mod edit;
pub mod error;
pub mod frames;
pub mod residue;
pub mod structure;
