use super::nucleotides::Nucleobase;
use phf::{Map, phf_map};

/// Hydrogen-bond donors on the Watson-Crick edge, as `(hydrogen, heavy atom)` pairs.
static DONORS: Map<char, &'static [(&'static str, &'static str)]> = phf_map! {
    'A' => &[("H61", "N6"), ("H62", "N6")],
    'G' => &[("H1", "N1"), ("H21", "N2"), ("H22", "N2")],
    'C' => &[("H41", "N4"), ("H42", "N4")],
    'U' => &[("H3", "N3")],
    'T' => &[("H3", "N3")],
};

static ACCEPTORS: Map<char, &'static [&'static str]> = phf_map! {
    'A' => &["N1", "N3", "N7"],
    'G' => &["O6", "N3", "N7"],
    'C' => &["O2", "N3"],
    'U' => &["O2", "O4"],
    'T' => &["O2", "O4"],
};

pub fn donors(base: Nucleobase) -> &'static [(&'static str, &'static str)] {
    DONORS.get(&base.letter()).copied().unwrap_or(&[])
}

pub fn acceptors(base: Nucleobase) -> &'static [&'static str] {
    ACCEPTORS.get(&base.letter()).copied().unwrap_or(&[])
}

/// Donor atom names with each heavy atom listed once, hydrogens first.
pub fn donor_atoms(base: Nucleobase) -> Vec<&'static str> {
    let pairs = donors(base);
    let mut names: Vec<&'static str> = pairs.iter().map(|(h, _)| *h).collect();
    for (_, heavy) in pairs {
        if !names.contains(heavy) {
            names.push(heavy);
        }
    }
    names
}
