//! Fixed-column PDB format.
//!
//! Only the record types needed for coordinates are interpreted: `ATOM`, `HETATM`, `TER`,
//! `MODEL` and `ENDMDL`. Everything before the first coordinate record is kept verbatim as the
//! header; other records after it are ignored. Alternate locations other than blank and `A`
//! are dropped.

mod reader;
mod record;
mod writer;

use super::traits::MolecularFile;
use crate::core::models::error::ModelError;
use crate::core::models::frames::{Document, FrameSet};
use std::io::{self, BufRead, Write};
use thiserror::Error;

pub use record::{decode_charge, format_atom_name};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Frame error on line {line}: {kind}")]
    Frame { line: usize, kind: FrameErrorKind },
    #[error("Invalid structure on line {line}: {source}")]
    Model {
        line: usize,
        #[source]
        source: ModelError,
    },
    #[error("Cannot prepare document for writing: {0}")]
    Prepare(#[from] ModelError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Element symbol in columns 77-78 is empty")]
    MissingElement,
    #[error("Invalid atom charge '{0}': magnitude must be a digit")]
    InvalidChargeMagnitude(String),
    #[error("Invalid atom charge sign '{0}': expected '+' or '-'")]
    InvalidChargeSign(String),
    #[error("Non-ASCII text at column {column} shifts the fixed-width fields")]
    NonAscii { column: usize },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameErrorKind {
    #[error("MODEL opened while the previous frame is still open")]
    NestedFrame,
    #[error("MODEL opened after records that belong to no frame")]
    RecordsOutsideFrame,
    #[error("ENDMDL without a matching MODEL")]
    UnopenedFrame,
    #[error("Frame contains no records")]
    EmptyFrame,
    #[error("Final frame is not closed")]
    UnclosedFrame,
    #[error("TER without an open chain")]
    EmptyChain,
}

/// Derives an element symbol from `(is_hetatm, atom_name, residue_name, chain_id)`.
pub type ElementDeriver = fn(bool, &str, &str, char) -> String;

/// What to do when an atom record has a blank element column.
#[derive(Debug, Clone, Copy, Default)]
pub enum ElementPolicy {
    /// Reject the record.
    #[default]
    Required,
    /// Ask the given function for the element symbol.
    Derive(ElementDeriver),
}

impl ElementPolicy {
    /// Derivation from the first character of the atom name.
    pub fn from_atom_name() -> Self {
        ElementPolicy::Derive(first_letter_element)
    }
}

fn first_letter_element(_is_hetatm: bool, atom_name: &str, _residue_name: &str, _chain_id: char) -> String {
    atom_name
        .trim()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub element_policy: ElementPolicy,
}

/// Edits applied to a private copy of the document before writing.
///
/// Atom serials and residue numbers restart at 1 and chain labels at `A`. For a frame set every
/// frame restarts independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub renumber_atoms: bool,
    pub renumber_residues: bool,
    pub rename_chains: bool,
    pub include_header: bool,
}

impl WriteOptions {
    pub(crate) fn rewrites_records(&self) -> bool {
        self.renumber_atoms || self.renumber_residues || self.rename_chains
    }
}

pub struct PdbFile;

impl MolecularFile for PdbFile {
    type ReadOptions = ReadOptions;
    type WriteOptions = WriteOptions;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::ReadOptions,
    ) -> Result<FrameSet, Self::Error> {
        reader::read_frames(reader, options)
    }

    fn write_to<'a>(
        document: impl Into<Document<'a>>,
        writer: &mut impl Write,
        options: &Self::WriteOptions,
    ) -> Result<(), Self::Error> {
        writer::write_document(document.into(), writer, options)
    }
}
