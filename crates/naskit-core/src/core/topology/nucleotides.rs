use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Atoms owned by the ribose ring and its substituents (the part swapped on a sugar change).
pub const RIBOSE_ATOMS: &[&str] = &[
    "C4'", "O4'", "C3'", "O3'", "C2'", "O2'", "C1'", "H4'", "H3'", "H2'", "HO2'", "H1'",
];

pub const DEOXYRIBOSE_ATOMS: &[&str] = &[
    "C4'", "O4'", "C3'", "O3'", "C2'", "C1'", "H4'", "H3'", "H2'", "H2''", "H1'",
];

/// Sugar atoms shared by both sugars, used to superimpose one onto the other.
pub const SUGAR_CORRESPONDENCE: &[(&str, &str)] = &[("C1'", "C1'"), ("C4'", "C4'"), ("O4'", "O4'")];

pub const PYRIMIDINE_CORE_ATOMS: &[&str] = &["N1", "C2", "N3", "C4", "C5", "C6"];

pub const PURINE_CORE_ATOMS: &[&str] = &["N9", "C8", "N7", "C5", "C6", "N1", "C2", "N3", "C4"];

/// Pyrimidine ring atoms matched to the purine atoms occupying the same glycosidic geometry.
pub const PYRIMIDINE_TO_PURINE: &[(&str, &str)] = &[("N1", "N9"), ("C2", "C4"), ("C6", "C8")];

const ADENINE_ATOMS: &[&str] = &[
    "N9", "C8", "N7", "C5", "C6", "N6", "N1", "C2", "N3", "C4", "H8", "H61", "H62", "H2",
];
const GUANINE_ATOMS: &[&str] = &[
    "N9", "C8", "N7", "C5", "C6", "O6", "N1", "C2", "N2", "N3", "C4", "H8", "H1", "H21", "H22",
];
const CYTOSINE_ATOMS: &[&str] = &[
    "N1", "C2", "O2", "N3", "C4", "N4", "C5", "C6", "H41", "H42", "H5", "H6",
];
const URACIL_ATOMS: &[&str] = &["N1", "C2", "O2", "N3", "C4", "O4", "C5", "C6", "H3", "H5", "H6"];
const THYMINE_ATOMS: &[&str] = &[
    "N1", "C2", "O2", "N3", "C4", "O4", "C5", "C7", "C6", "H3", "H71", "H72", "H73", "H6",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NaType {
    Rna,
    Dna,
}

impl NaType {
    /// DNA residue names carry a `D` prefix (`DA`, `DT`, ...); everything else is RNA.
    pub fn from_residue_name(name: &str) -> Self {
        let name = name.trim();
        if name.len() > 1 && name.starts_with('D') {
            NaType::Dna
        } else {
            NaType::Rna
        }
    }

    pub fn other(self) -> Self {
        match self {
            NaType::Rna => NaType::Dna,
            NaType::Dna => NaType::Rna,
        }
    }

    pub fn sugar(self) -> Sugar {
        match self {
            NaType::Rna => Sugar::Ribose,
            NaType::Dna => Sugar::Deoxyribose,
        }
    }

    /// Residue name for `base` in this nucleic-acid type.
    pub fn residue_name(self, base: Nucleobase) -> String {
        self.residue_name_for_letter(base.letter())
    }

    /// Residue name for any one-letter base code, e.g. `I` / `DI` for inosine.
    pub fn residue_name_for_letter(self, letter: char) -> String {
        let letter = letter.to_ascii_uppercase();
        match self {
            NaType::Rna => letter.to_string(),
            NaType::Dna => format!("D{letter}"),
        }
    }
}

impl fmt::Display for NaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NaType::Rna => "RNA",
                NaType::Dna => "DNA",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sugar {
    Ribose,
    Deoxyribose,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown sugar '{0}': expected ribose, rna, deoxyribose or dna")]
pub struct ParseSugarError(pub String);

impl FromStr for Sugar {
    type Err = ParseSugarError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ribose" | "rna" => Ok(Sugar::Ribose),
            "deoxyribose" | "dna" => Ok(Sugar::Deoxyribose),
            _ => Err(ParseSugarError(s.to_string())),
        }
    }
}

impl Sugar {
    pub fn atoms(self) -> &'static [&'static str] {
        match self {
            Sugar::Ribose => RIBOSE_ATOMS,
            Sugar::Deoxyribose => DEOXYRIBOSE_ATOMS,
        }
    }

    pub fn na_type(self) -> NaType {
        match self {
            Sugar::Ribose => NaType::Rna,
            Sugar::Deoxyribose => NaType::Dna,
        }
    }
}

/// Ring class of a nucleobase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingClass {
    Purine,
    Pyrimidine,
}

impl RingClass {
    /// The glycosidic nitrogen bonded to C1'.
    pub fn origin_atom(self) -> &'static str {
        match self {
            RingClass::Purine => "N9",
            RingClass::Pyrimidine => "N1",
        }
    }

    /// The ring atom pointing from the glycosidic nitrogen towards the pairing edge.
    pub fn direction_atom(self) -> &'static str {
        match self {
            RingClass::Purine => "N1",
            RingClass::Pyrimidine => "N3",
        }
    }

    /// Two ring atoms whose bond vectors from the origin span the base plane.
    pub fn plane_atoms(self) -> [&'static str; 2] {
        match self {
            RingClass::Purine => ["C8", "C4"],
            RingClass::Pyrimidine => ["C2", "C6"],
        }
    }

    pub fn core_atoms(self) -> &'static [&'static str] {
        match self {
            RingClass::Purine => PURINE_CORE_ATOMS,
            RingClass::Pyrimidine => PYRIMIDINE_CORE_ATOMS,
        }
    }

    /// Classifies a one-letter base code; inosine counts as a purine.
    pub fn from_base_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' | 'G' | 'I' => Some(RingClass::Purine),
            'C' | 'U' | 'T' => Some(RingClass::Pyrimidine),
            _ => None,
        }
    }
}

/// Atom-name pairs `(target, template)` used to superimpose a base of class `to` onto an existing
/// base of class `from`.
pub fn ring_correspondence(from: RingClass, to: RingClass) -> Vec<(&'static str, &'static str)> {
    match (from, to) {
        (RingClass::Pyrimidine, RingClass::Pyrimidine) => {
            PYRIMIDINE_CORE_ATOMS.iter().map(|&a| (a, a)).collect()
        }
        (RingClass::Purine, RingClass::Purine) => PURINE_CORE_ATOMS.iter().map(|&a| (a, a)).collect(),
        (RingClass::Pyrimidine, RingClass::Purine) => PYRIMIDINE_TO_PURINE.to_vec(),
        (RingClass::Purine, RingClass::Pyrimidine) => {
            PYRIMIDINE_TO_PURINE.iter().map(|&(pyr, pur)| (pur, pyr)).collect()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleobase {
    Adenine,
    Guanine,
    Cytosine,
    Uracil,
    Thymine,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown nucleobase '{0}': expected one of A, G, C, U, T")]
pub struct ParseNucleobaseError(pub String);

impl FromStr for Nucleobase {
    type Err = ParseNucleobaseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                Nucleobase::from_letter(letter).ok_or_else(|| ParseNucleobaseError(s.to_string()))
            }
            _ => match trimmed.to_lowercase().as_str() {
                "adenine" => Ok(Nucleobase::Adenine),
                "guanine" => Ok(Nucleobase::Guanine),
                "cytosine" => Ok(Nucleobase::Cytosine),
                "uracil" => Ok(Nucleobase::Uracil),
                "thymine" => Ok(Nucleobase::Thymine),
                _ => Err(ParseNucleobaseError(s.to_string())),
            },
        }
    }
}

impl Nucleobase {
    pub const ALL: [Nucleobase; 5] = [
        Nucleobase::Adenine,
        Nucleobase::Guanine,
        Nucleobase::Cytosine,
        Nucleobase::Uracil,
        Nucleobase::Thymine,
    ];

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Nucleobase::Adenine),
            'G' => Some(Nucleobase::Guanine),
            'C' => Some(Nucleobase::Cytosine),
            'U' => Some(Nucleobase::Uracil),
            'T' => Some(Nucleobase::Thymine),
            _ => None,
        }
    }

    /// The base of a residue name such as `G`, `DA` or `DT`.
    pub fn from_residue_name(name: &str) -> Option<Self> {
        base_letter(name).and_then(Nucleobase::from_letter)
    }

    pub fn letter(self) -> char {
        match self {
            Nucleobase::Adenine => 'A',
            Nucleobase::Guanine => 'G',
            Nucleobase::Cytosine => 'C',
            Nucleobase::Uracil => 'U',
            Nucleobase::Thymine => 'T',
        }
    }

    pub fn ring_class(self) -> RingClass {
        match self {
            Nucleobase::Adenine | Nucleobase::Guanine => RingClass::Purine,
            Nucleobase::Cytosine | Nucleobase::Uracil | Nucleobase::Thymine => RingClass::Pyrimidine,
        }
    }

    /// Every atom belonging to the base, hydrogens included.
    pub fn atoms(self) -> &'static [&'static str] {
        match self {
            Nucleobase::Adenine => ADENINE_ATOMS,
            Nucleobase::Guanine => GUANINE_ATOMS,
            Nucleobase::Cytosine => CYTOSINE_ATOMS,
            Nucleobase::Uracil => URACIL_ATOMS,
            Nucleobase::Thymine => THYMINE_ATOMS,
        }
    }
}

impl fmt::Display for Nucleobase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One-letter base code of a nucleotide residue name, with any DNA prefix stripped.
pub fn base_letter(residue_name: &str) -> Option<char> {
    let name = residue_name.trim();
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), None, None) => Some(letter),
        (Some('D'), Some(letter), None) => Some(letter),
        _ => None,
    }
}
