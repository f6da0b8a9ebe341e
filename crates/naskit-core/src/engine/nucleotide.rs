use super::embedding::{Anchor, FragmentSpec, embed_fragment_preserving_hydrogens};
use super::error::{EngineError, Side};
use crate::core::models::chain::Chain;
use crate::core::models::residue::{Residue, ResidueCategory};
use crate::core::topology::nucleotides::{
    DEOXYRIBOSE_ATOMS, NaType, Nucleobase, RIBOSE_ATOMS, RingClass, SUGAR_CORRESPONDENCE, Sugar,
    base_letter, ring_correspondence,
};
use crate::core::topology::templates::TemplateLibrary;
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument};

/// Every sugar atom of either sugar, so a swap clears whatever sugar is present.
fn all_sugar_atoms() -> Vec<&'static str> {
    let mut atoms = RIBOSE_ATOMS.to_vec();
    atoms.extend(DEOXYRIBOSE_ATOMS.iter().filter(|a| !RIBOSE_ATOMS.contains(*a)));
    atoms
}

fn ensure_nucleic_acid(residue: &Residue) -> Result<(), EngineError> {
    if residue.category() == ResidueCategory::NucleicAcid {
        Ok(())
    } else {
        Err(EngineError::NotNucleicAcid {
            residue_name: residue.name().to_string(),
            residue_number: residue.number(),
        })
    }
}

/// The nucleobase named by the residue (`G`, `DA`, ...).
pub fn residue_base(residue: &Residue) -> Result<Nucleobase, EngineError> {
    Nucleobase::from_residue_name(residue.name()).ok_or_else(|| {
        EngineError::UnrecognizedResidueBase {
            residue_name: residue.name().to_string(),
            residue_number: residue.number(),
        }
    })
}

pub fn residue_na_type(residue: &Residue) -> NaType {
    NaType::from_residue_name(residue.name())
}

/// Replaces the residue's sugar with the `sugar` template, keeping the backbone and base.
///
/// The template is aligned on C1', C4' and O4'. Hydrogens are only brought in if the residue
/// already had some.
pub fn change_sugar(
    residue: &mut Residue,
    sugar: Sugar,
    library: &TemplateLibrary,
) -> Result<(), EngineError> {
    ensure_nucleic_acid(residue)?;
    let source_atoms = all_sugar_atoms();
    let spec = FragmentSpec {
        source_atoms: &source_atoms,
        embed_atoms: sugar.atoms(),
        correspondence: SUGAR_CORRESPONDENCE,
        anchor: Anchor::Centroid,
    };
    embed_fragment_preserving_hydrogens(residue, library.sugar(sugar), &spec)
}

/// Converts a nucleotide to RNA: ribose sugar, thymine becomes uracil, `D` prefix dropped.
///
/// Residues that are already RNA are left as they are; inosine (`DI`) keeps its base and is only
/// renamed. On error the residue is unchanged.
#[instrument(skip_all, fields(residue = %residue.name(), number = residue.number()))]
pub fn to_rna(residue: &mut Residue, library: &TemplateLibrary) -> Result<(), EngineError> {
    convert(residue, NaType::Rna, library)
}

/// Converts a nucleotide to DNA: deoxyribose sugar, uracil becomes thymine, `D` prefix added.
///
/// Residues that are already DNA are left as they are. On error the residue is unchanged.
#[instrument(skip_all, fields(residue = %residue.name(), number = residue.number()))]
pub fn to_dna(residue: &mut Residue, library: &TemplateLibrary) -> Result<(), EngineError> {
    convert(residue, NaType::Dna, library)
}

fn convert(
    residue: &mut Residue,
    na_type: NaType,
    library: &TemplateLibrary,
) -> Result<(), EngineError> {
    ensure_nucleic_acid(residue)?;
    if residue_na_type(residue) == na_type {
        return Ok(());
    }
    // Bases without a template, such as inosine, only have their sugar swapped and are renamed.
    let letter = base_letter(residue.name())
        .filter(|&letter| RingClass::from_base_letter(letter).is_some())
        .ok_or_else(|| EngineError::UnrecognizedResidueBase {
            residue_name: residue.name().to_string(),
            residue_number: residue.number(),
        })?;

    let mut work = residue.clone();
    change_sugar(&mut work, na_type.sugar(), library)?;
    work.set_name(&na_type.residue_name_for_letter(letter));
    match (na_type, Nucleobase::from_letter(letter)) {
        (NaType::Rna, Some(Nucleobase::Thymine)) => {
            change_nucleobase(&mut work, Nucleobase::Uracil, library)?
        }
        (NaType::Dna, Some(Nucleobase::Uracil)) => {
            change_nucleobase(&mut work, Nucleobase::Thymine, library)?
        }
        _ => {}
    }
    debug!(from = %residue.name(), to = %work.name(), "Converted nucleotide.");
    *residue = work;
    Ok(())
}

/// Replaces the residue's base with `base`, keeping the sugar and backbone.
///
/// The new glycosidic nitrogen is placed exactly on the old one and the ring is oriented by
/// the ring atoms both bases share. The residue name follows the new base, keeping a DNA
/// prefix. A residue that already carries `base` is left as it is.
#[instrument(skip_all, fields(residue = %residue.name(), number = residue.number(), base = %base))]
pub fn change_nucleobase(
    residue: &mut Residue,
    base: Nucleobase,
    library: &TemplateLibrary,
) -> Result<(), EngineError> {
    ensure_nucleic_acid(residue)?;
    let current = residue_base(residue)?;
    if current == base {
        return Ok(());
    }
    let from = current.ring_class();
    let to = base.ring_class();
    let correspondence = ring_correspondence(from, to);
    let spec = FragmentSpec {
        source_atoms: current.atoms(),
        embed_atoms: base.atoms(),
        correspondence: &correspondence,
        anchor: Anchor::OriginAtoms {
            target: from.origin_atom(),
            fragment: to.origin_atom(),
        },
    };
    embed_fragment_preserving_hydrogens(residue, library.base(base), &spec)?;
    let name = residue_na_type(residue).residue_name(base);
    residue.set_name(&name);
    debug!(from = %current, to = %base, "Swapped nucleobase.");
    Ok(())
}

/// Applies [`to_rna`] to every residue. On error the chain is unchanged.
pub fn chain_to_rna(chain: &mut Chain, library: &TemplateLibrary) -> Result<(), EngineError> {
    convert_chain(chain, NaType::Rna, library)
}

/// Applies [`to_dna`] to every residue. On error the chain is unchanged.
pub fn chain_to_dna(chain: &mut Chain, library: &TemplateLibrary) -> Result<(), EngineError> {
    convert_chain(chain, NaType::Dna, library)
}

fn convert_chain(
    chain: &mut Chain,
    na_type: NaType,
    library: &TemplateLibrary,
) -> Result<(), EngineError> {
    let mut work = chain.clone();
    for residue in work.residues_mut() {
        convert(residue, na_type, library)?;
    }
    *chain = work;
    Ok(())
}

fn ring_class_with_core(residue: &Residue) -> Option<RingClass> {
    let ring = base_letter(residue.name()).and_then(RingClass::from_base_letter)?;
    ring.core_atoms()
        .iter()
        .all(|atom| residue.contains_atom(atom))
        .then_some(ring)
}

/// A purine by name whose nine ring atoms are all present.
pub fn is_purine(residue: &Residue) -> bool {
    ring_class_with_core(residue) == Some(RingClass::Purine)
}

/// A pyrimidine by name whose six ring atoms are all present.
pub fn is_pyrimidine(residue: &Residue) -> bool {
    ring_class_with_core(residue) == Some(RingClass::Pyrimidine)
}

/// Reference points of a base used by the pairing filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseFrame {
    pub ring: RingClass,
    /// Glycosidic nitrogen.
    pub origin: Point3<f64>,
    /// Ring nitrogen on the Watson-Crick edge.
    pub direction: Point3<f64>,
    /// Unit normal of the base plane.
    pub normal: Vector3<f64>,
}

impl BaseFrame {
    /// Distance from the glycosidic nitrogen to the pairing edge.
    pub fn reach(&self) -> f64 {
        (self.direction - self.origin).norm()
    }
}

pub fn base_frame(residue: &Residue) -> Result<BaseFrame, EngineError> {
    let ring = base_letter(residue.name())
        .and_then(RingClass::from_base_letter)
        .ok_or_else(|| EngineError::UnrecognizedResidueBase {
            residue_name: residue.name().to_string(),
            residue_number: residue.number(),
        })?;
    let position = |name: &str| {
        residue
            .atom_by_name(name)
            .map(|atom| atom.position)
            .ok_or_else(|| EngineError::AtomNotFound {
                side: Side::Target,
                atom_name: name.to_string(),
                residue: residue.name().to_string(),
            })
    };
    let origin = position(ring.origin_atom())?;
    let direction = position(ring.direction_atom())?;
    let [a, b] = ring.plane_atoms();
    let normal = (position(a)? - origin).cross(&(position(b)? - origin)).normalize();
    Ok(BaseFrame {
        ring,
        origin,
        direction,
        normal,
    })
}

pub fn base_normal(residue: &Residue) -> Result<Vector3<f64>, EngineError> {
    base_frame(residue).map(|frame| frame.normal)
}
