//! # File I/O Module
//!
//! Reading and writing of fixed-column PDB coordinate files.
//!
//! ## Overview
//!
//! - [`traits`] - The format-agnostic [`traits::MolecularFile`] interface with path helpers
//! - [`pdb`] - The PDB implementation: header capture, `MODEL`/`ENDMDL` frame splitting,
//!   residue and chain grouping on read; formatting and optional renumbering on write
//!
//! ## Usage
//!
//! ```ignore
//! use naskit::core::io::{read, write};
//! use naskit::core::io::pdb::WriteOptions;
//!
//! let frames = read("input.pdb")?;
//! let options = WriteOptions { renumber_atoms: true, ..Default::default() };
//! write("output.pdb", &frames[0], &options)?;
//! ```

pub mod pdb;
pub mod traits;

use crate::core::models::frames::{Document, FrameSet};
use pdb::{PdbError, PdbFile, ReadOptions, WriteOptions};
use std::path::Path;
use traits::MolecularFile;

/// Reads a PDB file with default options.
///
/// # Arguments
///
/// * `path` - The PDB file to read.
///
/// # Return
///
/// Returns every frame of the file and its header.
///
/// # Errors
///
/// Returns [`PdbError`] if the file cannot be read or is malformed.
pub fn read<P: AsRef<Path>>(path: P) -> Result<FrameSet, PdbError> {
    PdbFile::read_from_path(path, &ReadOptions::default())
}

/// Writes any document to a PDB file.
///
/// # Arguments
///
/// * `path` - Destination; created or truncated.
/// * `document` - A frame set, structure, chain or residue.
/// * `options` - Header and renumbering choices, applied to a private copy.
///
/// # Errors
///
/// Returns [`PdbError`] if the file cannot be written.
pub fn write<'a, P: AsRef<Path>>(
    path: P,
    document: impl Into<Document<'a>>,
    options: &WriteOptions,
) -> Result<(), PdbError> {
    PdbFile::write_to_path(document, path, options)
}
