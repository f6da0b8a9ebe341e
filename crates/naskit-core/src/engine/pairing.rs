use super::error::EngineError;
use super::nucleotide::{BaseFrame, base_frame, residue_base, residue_na_type};
use crate::core::forcefield::params::{LjParam, PairingForcefield, PairingGlobals};
use crate::core::forcefield::potentials;
use crate::core::models::atom::Atom;
use crate::core::models::chain::Chain;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::topology::hbond;
use nalgebra::DMatrix;
use tracing::{debug, instrument, trace, warn};

const BRACKETS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

fn frames_compatible(a: &BaseFrame, b: &BaseFrame, globals: &PairingGlobals) -> bool {
    let origin_distance = (a.origin - b.origin).norm();
    if origin_distance > globals.max_origin_distance {
        return false;
    }
    // Bases whose pairing edges face away from each other sit closer than their combined reach.
    if origin_distance < a.reach() + b.reach() {
        return false;
    }
    let cos = a.normal.dot(&b.normal).abs().min(1.0);
    cos.acos().to_degrees() <= globals.max_normal_angle
}

/// Geometric pre-filter: close enough, edges facing each other, roughly coplanar.
///
/// Residues without a recognisable base never pass.
pub fn can_form_pair(first: &Residue, second: &Residue, globals: &PairingGlobals) -> bool {
    match (base_frame(first), base_frame(second)) {
        (Ok(a), Ok(b)) => frames_compatible(&a, &b, globals),
        _ => false,
    }
}

/// Energy of `donor` donating hydrogen bonds to `acceptor`.
///
/// A donor hydrogen counts only together with its heavy atom; heavy atoms shared by two
/// hydrogens count once. Acceptor atoms missing from `acceptor` are skipped.
pub fn hbond_energy(
    donor: &Residue,
    acceptor: &Residue,
    ff: &PairingForcefield,
) -> Result<f64, EngineError> {
    let donor_base = residue_base(donor)?;
    let acceptor_base = residue_base(acceptor)?;

    let mut donor_atoms: Vec<&Atom> = Vec::new();
    for &(hydrogen, heavy) in hbond::donors(donor_base) {
        if let (Some(h), Some(x)) = (donor.atom_by_name(hydrogen), donor.atom_by_name(heavy)) {
            for atom in [h, x] {
                if !donor_atoms.iter().any(|a| a.name() == atom.name()) {
                    donor_atoms.push(atom);
                }
            }
        }
    }
    let acceptor_atoms: Vec<&Atom> = hbond::acceptors(acceptor_base)
        .iter()
        .filter_map(|name| acceptor.atom_by_name(name))
        .collect();

    let globals = ff.globals();
    let mut energy = 0.0;
    for d in &donor_atoms {
        let d_lj = lj_param(ff, d)?;
        let d_q = partial_charge(ff, donor, donor_base.letter(), d)?;
        for a in &acceptor_atoms {
            let a_lj = lj_param(ff, a)?;
            let a_q = partial_charge(ff, acceptor, acceptor_base.letter(), a)?;
            let dist = (d.position - a.position).norm();
            let (r_min, well_depth) = potentials::mix_lennard_jones(
                d_lj.sigma,
                d_lj.well_depth,
                a_lj.sigma,
                a_lj.well_depth,
            );
            let vdw = potentials::lennard_jones_12_6(dist, r_min, well_depth);
            let elec = if globals.distance_dependent_dielectric {
                potentials::coulomb_distance_dependent(dist, d_q, a_q, globals.dielectric_constant)
            } else {
                potentials::coulomb(dist, d_q, a_q, globals.dielectric_constant)
            };
            energy += vdw + elec;
        }
    }
    Ok(energy)
}

fn lj_param(ff: &PairingForcefield, atom: &Atom) -> Result<LjParam, EngineError> {
    ff.lennard_jones(&atom.element)
        .ok_or_else(|| EngineError::MissingLjParameter {
            element: atom.element.clone(),
        })
}

fn partial_charge(
    ff: &PairingForcefield,
    residue: &Residue,
    base: char,
    atom: &Atom,
) -> Result<f64, EngineError> {
    ff.charges
        .get(residue_na_type(residue), base, atom.name())
        .ok_or_else(|| EngineError::MissingPartialCharge {
            base,
            atom_name: atom.name().to_string(),
        })
}

/// Hydrogen-bond energy of a base pair, counting both donor directions.
pub fn pair_energy(
    first: &Residue,
    second: &Residue,
    ff: &PairingForcefield,
) -> Result<f64, EngineError> {
    Ok(hbond_energy(first, second, ff)? + hbond_energy(second, first, ff)?)
}

/// Symmetric pair energies; `+inf` wherever the pair is too close in sequence or fails the
/// geometric filter.
pub fn energy_matrix(
    residues: &[&Residue],
    ff: &PairingForcefield,
) -> Result<DMatrix<f64>, EngineError> {
    let n = residues.len();
    let globals = ff.globals();
    let frames: Vec<Option<BaseFrame>> = residues
        .iter()
        .map(|r| match residue_base(r).and_then(|_| base_frame(r)) {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!(residue = %r.name(), number = r.number(), error = %e, "Residue cannot pair.");
                None
            }
        })
        .collect();

    let mut energies = DMatrix::from_element(n, n, f64::INFINITY);
    for i in 0..n {
        for j in (i + globals.min_sequence_separation.max(1))..n {
            let (Some(a), Some(b)) = (&frames[i], &frames[j]) else {
                continue;
            };
            if !frames_compatible(a, b, globals) {
                continue;
            }
            let energy = pair_energy(residues[i], residues[j], ff)?;
            trace!(i, j, energy, "Candidate base pair.");
            energies[(i, j)] = energy;
            energies[(j, i)] = energy;
        }
    }
    Ok(energies)
}

/// Greedy one-to-one matching of entries at or below `threshold`.
///
/// Repeatedly takes the lowest remaining entry (first in row-major order on ties), pairs its
/// row and column and removes both residues from further consideration. The diagonal is
/// ignored.
pub fn greedy_matching(energies: &DMatrix<f64>, threshold: f64) -> DMatrix<u8> {
    let n = energies.nrows().min(energies.ncols());
    let mut remaining = energies.clone();
    let mut adjacency = DMatrix::<u8>::zeros(n, n);
    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            for j in (0..n).filter(|&j| j != i) {
                let e = remaining[(i, j)];
                if best.is_none_or(|(_, _, b)| e < b) {
                    best = Some((i, j, e));
                }
            }
        }
        let Some((i, j, e)) = best else { break };
        if e.is_nan() || e > threshold {
            break;
        }
        adjacency[(i, j)] = 1;
        adjacency[(j, i)] = 1;
        for k in [i, j] {
            remaining.row_mut(k).fill(f64::INFINITY);
            remaining.column_mut(k).fill(f64::INFINITY);
        }
    }
    adjacency
}

/// Infers Watson-Crick-edge base pairs between ordered nucleotides.
///
/// Returns a symmetric 0/1 adjacency in which every residue has at most one partner.
#[instrument(skip_all, name = "infer_secondary_structure")]
pub fn infer_secondary_structure(
    residues: &[&Residue],
    ff: &PairingForcefield,
) -> Result<DMatrix<u8>, EngineError> {
    let energies = energy_matrix(residues, ff)?;
    let adjacency = greedy_matching(&energies, ff.globals().acceptance_threshold);
    debug!(
        residues = residues.len(),
        pairs = base_pairs(&adjacency).len(),
        "Inferred base pairs."
    );
    Ok(adjacency)
}

pub fn infer_for_chain(chain: &Chain, ff: &PairingForcefield) -> Result<DMatrix<u8>, EngineError> {
    let residues: Vec<&Residue> = chain.residues().iter().collect();
    infer_secondary_structure(&residues, ff)
}

/// Pairs across every nucleic-acid residue of the structure, indexed in traversal order.
pub fn infer_for_structure(
    structure: &Structure,
    ff: &PairingForcefield,
) -> Result<DMatrix<u8>, EngineError> {
    let residues: Vec<&Residue> = structure.nucleic_acid_residues().collect();
    infer_secondary_structure(&residues, ff)
}

/// Paired index pairs `(i, j)` with `i < j`, ordered by `i`.
pub fn base_pairs(adjacency: &DMatrix<u8>) -> Vec<(usize, usize)> {
    let n = adjacency.nrows();
    (0..n)
        .flat_map(|i| ((i + 1)..adjacency.ncols()).map(move |j| (i, j)))
        .filter(|&(i, j)| adjacency[(i, j)] != 0)
        .collect()
}

/// Dot-bracket notation; pseudoknotted pairs move to `[]`, then `{}`, then `<>`.
pub fn to_dot_bracket(adjacency: &DMatrix<u8>) -> String {
    let mut symbols = vec!['.'; adjacency.nrows()];
    let mut levels: Vec<Vec<(usize, usize)>> = vec![Vec::new(); BRACKETS.len()];
    let crosses = |(i, j): (usize, usize), (k, l): (usize, usize)| {
        (i < k && k < j && j < l) || (k < i && i < l && l < j)
    };
    for pair in base_pairs(adjacency) {
        let level = levels
            .iter()
            .position(|placed| placed.iter().all(|&other| !crosses(pair, other)))
            .unwrap_or(BRACKETS.len() - 1);
        levels[level].push(pair);
        let (open, close) = BRACKETS[level];
        symbols[pair.0] = open;
        symbols[pair.1] = close;
    }
    symbols.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topology::nucleotides::Nucleobase;
    use crate::core::topology::templates::TemplateLibrary;
    use nalgebra::Point3;

    fn ff() -> &'static PairingForcefield {
        PairingForcefield::bundled().unwrap()
    }

    /// A base template, optionally turned to face the unturned templates across a
    /// Watson-Crick edge, shifted along x.
    fn placed(base: Nucleobase, facing: bool, shift: f64) -> Residue {
        let mut residue = TemplateLibrary::bundled().unwrap().base(base).clone();
        let positions: Vec<_> = residue
            .positions()
            .iter()
            .map(|p| {
                let (y, z) = if facing { (-p.y, -p.z) } else { (p.y, p.z) };
                Point3::new(p.x + shift, y, z)
            })
            .collect();
        residue.set_positions(&positions).unwrap();
        residue
    }

    fn assert_symmetric_matching(adjacency: &DMatrix<u8>) {
        assert_eq!(adjacency, &adjacency.transpose());
        for row in adjacency.row_iter() {
            assert!(row.iter().map(|&v| v as usize).sum::<usize>() <= 1);
        }
    }

    #[test]
    fn canonical_pairs_have_expected_energies() {
        let g = placed(Nucleobase::Guanine, false, 0.0);
        let a = placed(Nucleobase::Adenine, false, 0.0);
        let c = placed(Nucleobase::Cytosine, true, 0.0);
        let u = placed(Nucleobase::Uracil, true, 0.0);
        let gc = pair_energy(&g, &c, ff()).unwrap();
        let au = pair_energy(&a, &u, ff()).unwrap();
        let gu = pair_energy(&g, &u, ff()).unwrap();
        assert!((gc - -9.50).abs() < 0.01, "G-C energy {gc}");
        assert!((au - -5.40).abs() < 0.01, "A-U energy {au}");
        assert!((gu - -5.54).abs() < 0.01, "G-U energy {gu}");
        assert!((pair_energy(&c, &g, ff()).unwrap() - gc).abs() < 1e-9);

        let g_facing = placed(Nucleobase::Guanine, true, 0.0);
        assert!(pair_energy(&g, &g_facing, ff()).unwrap() > 0.0);
        let ac = pair_energy(&a, &c, ff()).unwrap();
        assert!(ac > ff().globals().acceptance_threshold, "A-C energy {ac}");
    }

    #[test]
    fn bundled_electrostatics_fall_off_as_inverse_distance() {
        let globals = ff().globals();
        assert!(!globals.distance_dependent_dielectric);
        let g = placed(Nucleobase::Guanine, false, 0.0);
        let c = placed(Nucleobase::Cytosine, true, 0.0);

        let mut squared = ff().clone();
        squared.params.globals.distance_dependent_dielectric = true;
        let gc = pair_energy(&g, &c, ff()).unwrap();
        let gc_squared = pair_energy(&g, &c, &squared).unwrap();
        assert!((gc_squared - -7.96).abs() < 0.01, "G-C energy {gc_squared}");
        assert!(gc < gc_squared);
    }

    #[test]
    fn geometric_filter_rejects_distant_and_overlapping_bases() {
        let globals = ff().globals();
        let g = placed(Nucleobase::Guanine, false, 0.0);
        assert!(can_form_pair(&g, &placed(Nucleobase::Cytosine, true, 0.0), globals));
        assert!(!can_form_pair(&g, &placed(Nucleobase::Cytosine, true, 20.0), globals));
        let c = placed(Nucleobase::Cytosine, true, 0.0);
        assert!(!can_form_pair(&c, &placed(Nucleobase::Uracil, true, 0.0), globals));
    }

    #[test]
    fn watson_crick_pair_is_found_among_distant_residues() {
        let residues = [
            placed(Nucleobase::Guanine, false, 0.0),
            placed(Nucleobase::Adenine, false, 40.0),
            placed(Nucleobase::Uracil, false, 80.0),
            placed(Nucleobase::Adenine, false, 120.0),
            placed(Nucleobase::Cytosine, true, 0.0),
        ];
        let refs: Vec<&Residue> = residues.iter().collect();
        let adjacency = infer_secondary_structure(&refs, ff()).unwrap();
        assert_eq!(base_pairs(&adjacency), vec![(0, 4)]);
        assert_symmetric_matching(&adjacency);
        assert_eq!(to_dot_bracket(&adjacency), "(...)");
    }

    #[test]
    fn residues_closer_than_minimum_separation_never_pair() {
        let residues = [
            placed(Nucleobase::Guanine, false, 0.0),
            placed(Nucleobase::Cytosine, true, 0.0),
            placed(Nucleobase::Adenine, false, 40.0),
        ];
        let refs: Vec<&Residue> = residues.iter().collect();
        let energies = energy_matrix(&refs, ff()).unwrap();
        assert!(energies.iter().all(|e| e.is_infinite()));
        let adjacency = infer_secondary_structure(&refs, ff()).unwrap();
        assert!(base_pairs(&adjacency).is_empty());
    }

    #[test]
    fn strongest_partner_wins_a_competition() {
        let residues = [
            placed(Nucleobase::Guanine, false, 0.0),
            placed(Nucleobase::Adenine, false, 40.0),
            placed(Nucleobase::Adenine, false, 80.0),
            placed(Nucleobase::Cytosine, true, 0.0),
            placed(Nucleobase::Adenine, false, 120.0),
            placed(Nucleobase::Adenine, false, 160.0),
            placed(Nucleobase::Uracil, true, 0.0),
        ];
        let refs: Vec<&Residue> = residues.iter().collect();
        let energies = energy_matrix(&refs, ff()).unwrap();
        assert!(energies[(0, 6)] < ff().globals().acceptance_threshold);
        assert!(energies[(3, 6)].is_infinite());

        let adjacency = infer_secondary_structure(&refs, ff()).unwrap();
        assert_eq!(base_pairs(&adjacency), vec![(0, 3)]);
        assert_symmetric_matching(&adjacency);
    }

    #[test]
    fn greedy_matching_takes_lowest_entries_first() {
        let inf = f64::INFINITY;
        #[rustfmt::skip]
        let energies = DMatrix::from_row_slice(4, 4, &[
            inf, -3.0, -5.0, inf,
            -3.0, inf, inf, -4.0,
            -5.0, inf, inf, -2.0,
            inf, -4.0, -2.0, inf,
        ]);
        let adjacency = greedy_matching(&energies, -1.5);
        assert_eq!(base_pairs(&adjacency), vec![(0, 2), (1, 3)]);
        assert_symmetric_matching(&adjacency);

        let strict = greedy_matching(&energies, -4.5);
        assert_eq!(base_pairs(&strict), vec![(0, 2)]);
    }

    #[test]
    fn greedy_matching_breaks_ties_in_row_major_order() {
        let inf = f64::INFINITY;
        #[rustfmt::skip]
        let energies = DMatrix::from_row_slice(3, 3, &[
            inf, -2.0, -2.0,
            -2.0, inf, inf,
            -2.0, inf, inf,
        ]);
        assert_eq!(base_pairs(&greedy_matching(&energies, -1.5)), vec![(0, 1)]);
        assert!(base_pairs(&greedy_matching(&energies, -2.5)).is_empty());
    }

    #[test]
    fn entries_exactly_at_the_threshold_are_paired() {
        let inf = f64::INFINITY;
        #[rustfmt::skip]
        let energies = DMatrix::from_row_slice(4, 4, &[
            inf, inf, inf, -1.5,
            inf, inf, inf, inf,
            inf, inf, inf, inf,
            -1.5, inf, inf, inf,
        ]);
        assert_eq!(base_pairs(&greedy_matching(&energies, -1.5)), vec![(0, 3)]);
        assert!(base_pairs(&greedy_matching(&energies, -2.0)).is_empty());
    }

    #[test]
    fn dot_bracket_promotes_crossing_pairs() {
        let mut adjacency = DMatrix::<u8>::zeros(9, 9);
        for (i, j) in [(0, 5), (1, 4), (2, 8)] {
            adjacency[(i, j)] = 1;
            adjacency[(j, i)] = 1;
        }
        assert_eq!(to_dot_bracket(&adjacency), "(([.))..]");
        assert_eq!(to_dot_bracket(&DMatrix::<u8>::zeros(3, 3)), "...");
    }

    #[test]
    fn chain_and_structure_inference_agree() {
        let bases = [
            (Nucleobase::Guanine, false, 0.0),
            (Nucleobase::Adenine, false, 40.0),
            (Nucleobase::Adenine, false, 80.0),
            (Nucleobase::Cytosine, true, 0.0),
        ];
        let residues = bases.iter().enumerate().map(|(i, &(base, facing, shift))| {
            let mut residue = placed(base, facing, shift);
            residue.set_number(i as isize + 1);
            residue
        });
        let chain = Chain::from_residues(residues).unwrap();
        let from_chain = infer_for_chain(&chain, ff()).unwrap();
        assert_eq!(base_pairs(&from_chain), vec![(0, 3)]);

        let mut structure = Structure::new();
        structure.push(chain);
        assert_eq!(infer_for_structure(&structure, ff()).unwrap(), from_chain);
    }

    #[test]
    fn missing_parameters_are_reported() {
        let g = placed(Nucleobase::Guanine, false, 0.0);
        let c = placed(Nucleobase::Cytosine, true, 0.0);

        let mut no_hydrogen = ff().clone();
        no_hydrogen.params.lennard_jones.remove("H");
        assert!(matches!(
            pair_energy(&g, &c, &no_hydrogen),
            Err(EngineError::MissingLjParameter { ref element }) if element == "H"
        ));

        let mut no_charges = ff().clone();
        no_charges.charges = Default::default();
        assert!(matches!(
            pair_energy(&g, &c, &no_charges),
            Err(EngineError::MissingPartialCharge { .. })
        ));
    }
}
