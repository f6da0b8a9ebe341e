use super::error::{EngineError, Side};
use crate::core::models::residue::Residue;
use crate::core::utils::geometry::{self, Translation};
use tracing::{instrument, trace};

/// Where the superposed fragment is pinned after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor<'a> {
    /// Overlay the centroids of the corresponding atoms.
    Centroid,
    /// Place the fragment atom `fragment` exactly on the target atom `target`.
    OriginAtoms { target: &'a str, fragment: &'a str },
}

/// Which atoms are replaced, which are brought in, and how the fragment is aligned.
#[derive(Debug, Clone, Copy)]
pub struct FragmentSpec<'a> {
    /// Removed from the target; names the target lacks are skipped.
    pub source_atoms: &'a [&'a str],
    /// Copied from the aligned template into the target, in this order.
    pub embed_atoms: &'a [&'a str],
    /// `(target atom, template atom)` name pairs used for the superposition.
    pub correspondence: &'a [(&'a str, &'a str)],
    pub anchor: Anchor<'a>,
}

/// Replaces a fragment of `target` with the corresponding fragment of `template`.
///
/// The template is copied and superposed onto the target through `spec.correspondence`, its
/// copy takes the target's residue name, chain label and number, then `spec.source_atoms` are
/// deleted from the target and `spec.embed_atoms` appended from the aligned copy.
///
/// All names are resolved and checked before the target is touched, so on error the target
/// is unchanged.
///
/// # Errors
///
/// - [`EngineError::AtomNotFound`] naming the side that lacks a correspondence, origin or
///   embed atom.
/// - [`EngineError::AtomCollision`] if an embed atom would duplicate an atom that survives the
///   deletion, or is listed twice.
/// - [`EngineError::Geometry`] if the superposition cannot be computed.
#[instrument(skip_all, fields(residue = %target.name(), number = target.number()))]
pub fn embed_fragment(
    target: &mut Residue,
    template: &Residue,
    spec: &FragmentSpec<'_>,
) -> Result<(), EngineError> {
    // --- Phase 1: Resolution ---
    let pairs = spec
        .correspondence
        .iter()
        .map(|&(t, f)| -> Result<(usize, usize), EngineError> {
            Ok((
                resolve(target, t, Side::Target)?,
                resolve(template, f, Side::Template)?,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let anchor = match spec.anchor {
        Anchor::Centroid => Translation::Centroid,
        Anchor::OriginAtoms {
            target: t,
            fragment: f,
        } => Translation::Origin {
            target: resolve(target, t, Side::Target)?,
            aligned: resolve(template, f, Side::Template)?,
        },
    };

    for (i, &name) in spec.embed_atoms.iter().enumerate() {
        resolve(template, name, Side::Template)?;
        let survives = target.contains_atom(name) && !spec.source_atoms.contains(&name);
        if survives || spec.embed_atoms[..i].contains(&name) {
            return Err(EngineError::AtomCollision {
                atom_name: name.to_string(),
                residue: target.name().to_string(),
            });
        }
    }

    // --- Phase 2: Alignment of a private copy ---
    let mut fragment = template.clone();
    let target_positions = target.positions();
    let mut fragment_positions = fragment.positions();
    geometry::superpose(&target_positions, &mut fragment_positions, &pairs, anchor)?;
    if let Some(rmsd) =
        geometry::correspondence_rmsd(&target_positions, &fragment_positions, &pairs)
    {
        trace!(rmsd, pairs = pairs.len(), "Superposed template fragment.");
    }
    fragment.set_positions(&fragment_positions)?;
    fragment.stamp_identity(target.name(), target.chain_id(), target.number());

    // --- Phase 3: Replacement ---
    target.retain_atoms(|atom| !spec.source_atoms.contains(&atom.name()));
    for &name in spec.embed_atoms {
        if let Some(atom) = fragment.atom_by_name(name) {
            target.add_atom(atom.clone())?;
        }
    }
    Ok(())
}

/// Runs [`embed_fragment`] and, if `target` carried no hydrogens beforehand, strips the
/// hydrogens the fragment brought in.
pub fn embed_fragment_preserving_hydrogens(
    target: &mut Residue,
    template: &Residue,
    spec: &FragmentSpec<'_>,
) -> Result<(), EngineError> {
    let had_hydrogens = target.has_hydrogens();
    embed_fragment(target, template, spec)?;
    if !had_hydrogens {
        target.retain_atoms(|atom| !atom.is_hydrogen());
    }
    Ok(())
}

fn resolve(residue: &Residue, name: &str, side: Side) -> Result<usize, EngineError> {
    residue
        .atom_index(name)
        .ok_or_else(|| EngineError::AtomNotFound {
            side,
            atom_name: name.to_string(),
            residue: residue.name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::residue::ResidueCategory;
    use nalgebra::{Point3, Rotation3, Vector3};

    const TOLERANCE: f64 = 1e-9;

    fn residue(name: &str, chain: char, number: isize, atoms: &[(&str, &str, [f64; 3])]) -> Residue {
        let atoms = atoms.iter().map(|&(atom, element, [x, y, z])| {
            Atom::new(atom, element, Point3::new(x, y, z)).with_residue(name, chain, number)
        });
        Residue::from_atoms(ResidueCategory::Generic, atoms).unwrap()
    }

    fn target() -> Residue {
        residue(
            "TGT",
            'B',
            12,
            &[
                ("P1", "C", [0.0, 0.0, 0.0]),
                ("P2", "C", [1.5, 0.0, 0.0]),
                ("P3", "O", [0.0, 1.4, 0.2]),
                ("Q", "N", [-1.0, -1.0, 0.5]),
            ],
        )
    }

    fn moved(point: [f64; 3]) -> [f64; 3] {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), 1.1);
        let p = rotation * Point3::from(point) + Vector3::new(4.0, -2.0, 7.5);
        [p.x, p.y, p.z]
    }

    // The target's anchor atoms under a rigid motion, plus R and its hydrogen HR.
    fn template() -> Residue {
        residue(
            "TPL",
            'A',
            1,
            &[
                ("P1", "C", moved([0.0, 0.0, 0.0])),
                ("P2", "C", moved([1.5, 0.0, 0.0])),
                ("P3", "O", moved([0.0, 1.4, 0.2])),
                ("R", "S", moved([0.5, -1.2, -0.8])),
                ("HR", "H", moved([0.9, -2.0, -1.0])),
            ],
        )
    }

    const CORRESPONDENCE: &[(&str, &str)] = &[("P1", "P1"), ("P2", "P2"), ("P3", "P3")];

    fn spec<'a>(embed_atoms: &'a [&'a str]) -> FragmentSpec<'a> {
        FragmentSpec {
            source_atoms: &["Q"],
            embed_atoms,
            correspondence: CORRESPONDENCE,
            anchor: Anchor::Centroid,
        }
    }

    fn assert_point(actual: &Point3<f64>, expected: [f64; 3]) {
        assert!(
            (actual - Point3::from(expected)).norm() < TOLERANCE,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn embedded_atoms_land_in_the_target_frame() {
        let mut target = target();
        let template = template();
        embed_fragment(&mut target, &template, &spec(&["R", "HR"])).unwrap();

        let names: Vec<_> = target.atoms().iter().map(Atom::name).collect();
        assert_eq!(names, vec!["P1", "P2", "P3", "R", "HR"]);
        assert_point(&target.atom_by_name("R").unwrap().position, [0.5, -1.2, -0.8]);
        assert_point(&target.atom_by_name("HR").unwrap().position, [0.9, -2.0, -1.0]);
        assert_point(&target.atom_by_name("P2").unwrap().position, [1.5, 0.0, 0.0]);

        let r = target.atom_by_name("R").unwrap();
        assert_eq!((r.residue_name(), r.chain_id(), r.residue_number()), ("TGT", 'B', 12));
    }

    #[test]
    fn template_is_never_mutated() {
        let mut target = target();
        let template = template();
        let before = template.clone();
        embed_fragment(&mut target, &template, &spec(&["R"])).unwrap();
        assert_eq!(template, before);
    }

    #[test]
    fn origin_anchor_pins_the_designated_atom() {
        let mut target = target();
        let mut template = template();
        // Distort the template so centroid and origin anchoring disagree.
        template.atom_by_name_mut("P3").unwrap().position += Vector3::new(0.0, 0.3, 0.0);
        let spec = FragmentSpec {
            anchor: Anchor::OriginAtoms {
                target: "P1",
                fragment: "P1",
            },
            embed_atoms: &["P1"],
            source_atoms: &["P1", "Q"],
            correspondence: CORRESPONDENCE,
        };
        embed_fragment(&mut target, &template, &spec).unwrap();
        assert_point(&target.atom_by_name("P1").unwrap().position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_atoms_name_the_side_and_leave_target_untouched() {
        let template = template();
        let mut target = target();
        let before = target.clone();

        let bad_target = FragmentSpec {
            correspondence: &[("P1", "P1"), ("P2", "P2"), ("P9", "P3")],
            ..spec(&["R"])
        };
        let err = embed_fragment(&mut target, &template, &bad_target).unwrap_err();
        assert!(matches!(
            err,
            EngineError::AtomNotFound { side: Side::Target, ref atom_name, .. } if atom_name == "P9"
        ));

        let bad_embed = spec(&["R", "MISSING"]);
        let err = embed_fragment(&mut target, &template, &bad_embed).unwrap_err();
        assert!(matches!(
            err,
            EngineError::AtomNotFound { side: Side::Template, ref atom_name, .. } if atom_name == "MISSING"
        ));
        assert_eq!(target, before);
    }

    #[test]
    fn collisions_are_rejected_before_mutation() {
        let template = template();
        let mut target = target();
        let before = target.clone();

        let err = embed_fragment(&mut target, &template, &spec(&["P2"])).unwrap_err();
        assert!(matches!(err, EngineError::AtomCollision { ref atom_name, .. } if atom_name == "P2"));
        let err = embed_fragment(&mut target, &template, &spec(&["R", "R"])).unwrap_err();
        assert!(matches!(err, EngineError::AtomCollision { .. }));
        assert_eq!(target, before);
    }

    #[test]
    fn too_few_pairs_is_a_geometry_error() {
        let template = template();
        let mut target = target();
        let short = FragmentSpec {
            correspondence: &[("P1", "P1"), ("P2", "P2")],
            ..spec(&["R"])
        };
        let err = embed_fragment(&mut target, &template, &short).unwrap_err();
        assert!(matches!(err, EngineError::Geometry(_)));
        assert_eq!(target.len(), 4);
    }

    #[test]
    fn hydrogen_free_targets_stay_hydrogen_free() {
        let template = template();
        let mut heavy = target();
        embed_fragment_preserving_hydrogens(&mut heavy, &template, &spec(&["R", "HR"])).unwrap();
        assert!(!heavy.has_hydrogens());
        assert!(heavy.contains_atom("R"));

        let mut protonated = target();
        protonated
            .add_atom(Atom::new("H1", "H", Point3::new(0.0, 0.0, 1.0)).with_residue("TGT", 'B', 12))
            .unwrap();
        embed_fragment_preserving_hydrogens(&mut protonated, &template, &spec(&["R", "HR"])).unwrap();
        assert!(protonated.contains_atom("HR"));
        assert!(protonated.contains_atom("H1"));
    }
}
