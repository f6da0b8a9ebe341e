use crate::core::topology::nucleotides::NaType;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, instrument};

const BUNDLED_PARAMS: &str = include_str!("../../../data/pairing/params.toml");
const BUNDLED_CHARGES: &str = include_str!("../../../data/pairing/charges.csv");

static BUNDLED: LazyLock<Result<PairingForcefield, String>> = LazyLock::new(|| {
    PairingForcefield::from_sources(
        BUNDLED_PARAMS,
        "<bundled params.toml>",
        BUNDLED_CHARGES.as_bytes(),
        "<bundled charges.csv>",
    )
    .map_err(|e| e.to_string())
});

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PairingGlobals {
    /// Largest glycosidic-nitrogen distance at which two bases are considered.
    pub max_origin_distance: f64,
    /// Largest angle in degrees between the two base-plane normals.
    pub max_normal_angle: f64,
    /// Smallest index separation between residues allowed to pair.
    pub min_sequence_separation: usize,
    /// Interaction energies above this value never form a pair.
    pub acceptance_threshold: f64,
    pub dielectric_constant: f64,
    /// Scale the dielectric by distance, turning the Coulomb term into a `1/r^2` law.
    pub distance_dependent_dielectric: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct LjParam {
    pub well_depth: f64,
    pub sigma: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PairingParams {
    pub globals: PairingGlobals,
    pub lennard_jones: HashMap<String, LjParam>,
}

#[derive(Debug, Deserialize)]
struct ChargeRecord {
    na_type: NaType,
    base: char,
    atom_name: String,
    charge: f64,
}

/// Partial charges keyed by nucleic-acid type, base letter and atom name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeTable {
    charges: HashMap<(NaType, char, String), f64>,
}

impl ChargeTable {
    pub fn insert(&mut self, na_type: NaType, base: char, atom_name: &str, charge: f64) {
        self.charges
            .insert((na_type, base.to_ascii_uppercase(), atom_name.to_string()), charge);
    }

    /// Looks up a charge, falling back to the other nucleic-acid type when the base is absent
    /// from the requested one (thymine in RNA, uracil in DNA).
    pub fn get(&self, na_type: NaType, base: char, atom_name: &str) -> Option<f64> {
        let base = base.to_ascii_uppercase();
        let key = |t| (t, base, atom_name.to_string());
        self.charges
            .get(&key(na_type))
            .or_else(|| self.charges.get(&key(na_type.other())))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }
}

/// Everything the base-pair energy needs: globals, per-element Lennard-Jones terms and charges.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingForcefield {
    pub params: PairingParams,
    pub charges: ChargeTable,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Bundled pairing parameters are unusable: {0}")]
    Bundled(String),
}

impl PairingForcefield {
    /// The parameters compiled into the crate, parsed once on first use.
    pub fn bundled() -> Result<&'static Self, ParamLoadError> {
        BUNDLED
            .as_ref()
            .map_err(|msg| ParamLoadError::Bundled(msg.clone()))
    }

    #[instrument(skip_all, name = "load_pairing_forcefield")]
    pub fn load(params_path: &Path, charges_path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(params_path).map_err(|e| ParamLoadError::Io {
            path: params_path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file = std::fs::File::open(charges_path).map_err(|e| ParamLoadError::Io {
            path: charges_path.to_string_lossy().to_string(),
            source: e,
        })?;
        let forcefield = Self::from_sources(
            &content,
            &params_path.to_string_lossy(),
            file,
            &charges_path.to_string_lossy(),
        )?;
        debug!(
            elements = forcefield.params.lennard_jones.len(),
            charges = forcefield.charges.len(),
            "Loaded pairing forcefield."
        );
        Ok(forcefield)
    }

    fn from_sources(
        params: &str,
        params_label: &str,
        charges: impl std::io::Read,
        charges_label: &str,
    ) -> Result<Self, ParamLoadError> {
        let params = toml::from_str(params).map_err(|e| ParamLoadError::Toml {
            path: params_label.to_string(),
            source: e,
        })?;
        let charges = Self::load_charges(charges, charges_label)?;
        Ok(Self { params, charges })
    }

    fn load_charges(source: impl std::io::Read, label: &str) -> Result<ChargeTable, ParamLoadError> {
        let mut reader = csv::Reader::from_reader(source);
        let mut table = ChargeTable::default();
        for result in reader.deserialize::<ChargeRecord>() {
            let record = result.map_err(|e| ParamLoadError::Csv {
                path: label.to_string(),
                source: e,
            })?;
            table.insert(record.na_type, record.base, &record.atom_name, record.charge);
        }
        Ok(table)
    }

    pub fn lennard_jones(&self, element: &str) -> Option<LjParam> {
        self.params.lennard_jones.get(element).copied()
    }

    pub fn globals(&self) -> &PairingGlobals {
        &self.params.globals
    }
}
