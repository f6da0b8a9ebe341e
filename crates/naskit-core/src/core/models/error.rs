use super::residue::ResidueCategory;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Atom '{atom_name}' already exists in residue {residue_name} {residue_number}")]
    DuplicateAtomName {
        atom_name: String,
        residue_name: String,
        residue_number: isize,
    },

    #[error("Atom '{atom_name}' does not belong to residue {residue_number}: {field} '{found}' differs from '{expected}'")]
    IdentityMismatch {
        atom_name: String,
        residue_number: isize,
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("Atom '{0}' not found")]
    AtomNotFound(String),

    #[error("Residue {residue_number} has chain label '{found}' but the chain is labelled '{expected}'")]
    ChainIdMismatch {
        residue_number: isize,
        expected: char,
        found: char,
    },

    #[error("Residue number {residue_number} is already used in chain '{chain_id}'")]
    DuplicateResidueNumber { chain_id: char, residue_number: isize },

    #[error("Residue {residue_name} {residue_number} is {found}, expected {expected}")]
    CategoryMismatch {
        residue_name: String,
        residue_number: isize,
        expected: ResidueCategory,
        found: ResidueCategory,
    },

    #[error("Residue {residue_name} {residue_number} is not a polymer residue and cannot start a chain")]
    NotPolymerResidue {
        residue_name: String,
        residue_number: isize,
    },

    #[error("Invalid chain label '{0}': expected a single uppercase ASCII letter")]
    InvalidChainId(char),

    #[error("Coordinate matrix has {found} rows but the container holds {expected} atoms")]
    CoordinateShape { expected: usize, found: usize },

    #[error("Cannot build a residue without atoms")]
    EmptyResidue,

    #[error("Residue index {index} is out of range for a chain of {len} residues")]
    ResidueIndexOutOfRange { index: usize, len: usize },

    #[error("Cannot build a chain without residues")]
    EmptyChain,
}
