use crate::core::forcefield::params::ParamLoadError;
use crate::core::models::error::ModelError;
use crate::core::topology::nucleotides::{ParseNucleobaseError, ParseSugarError};
use crate::core::topology::templates::TemplateLoadError;
use crate::core::utils::geometry::GeometryError;
use std::fmt;
use thiserror::Error;

/// Which residue of an embedding lacks an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Target,
    Template,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Target => write!(f, "target residue"),
            Side::Template => write!(f, "template"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Atom '{atom_name}' not found in the {side} '{residue}'")]
    AtomNotFound {
        side: Side,
        atom_name: String,
        residue: String,
    },

    #[error("Embedding atom '{atom_name}' would collide with an atom kept in '{residue}'")]
    AtomCollision { atom_name: String, residue: String },

    #[error(transparent)]
    UnknownBase(#[from] ParseNucleobaseError),

    #[error(transparent)]
    UnknownSugar(#[from] ParseSugarError),

    #[error("Residue '{residue_name}' {residue_number} has no recognised nucleobase")]
    UnrecognizedResidueBase {
        residue_name: String,
        residue_number: isize,
    },

    #[error("Residue '{residue_name}' {residue_number} is not a nucleic-acid residue")]
    NotNucleicAcid {
        residue_name: String,
        residue_number: isize,
    },

    #[error("No Lennard-Jones parameters for element '{element}'")]
    MissingLjParameter { element: String },

    #[error("No partial charge for atom '{atom_name}' of base '{base}'")]
    MissingPartialCharge { base: char, atom_name: String },

    #[error("Template library error: {0}")]
    Template(#[from] TemplateLoadError),

    #[error("Pairing parameter error: {0}")]
    Params(#[from] ParamLoadError),

    #[error("Superposition failed: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}
