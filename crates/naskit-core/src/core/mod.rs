//! # Core Module
//!
//! The fundamental building blocks of the library: the hierarchical structure model, file I/O,
//! nucleotide topology knowledge and the numeric utilities the engine builds on.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, structures and frame sets
//! - **File I/O** ([`io`]) - Fixed-column PDB reading and writing
//! - **Structural Knowledge** ([`topology`]) - Nucleotide atom tables, H-bond tables and the
//!   reference template library
//! - **Energy Terms** ([`forcefield`]) - Pair potentials and base-pairing parameters
//! - **Utilities** ([`utils`]) - Superposition, residue-name tables and point-cloud preparation
//!
//! ## Data Ownership
//!
//! Containers own their children directly. A [`models::structure::Structure`] owns its chains
//! and standalone molecules, a chain owns its residues and a residue owns its atoms. Bulk
//! coordinate accessors always copy, so no view into internal storage ever escapes.

pub mod forcefield;
pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
