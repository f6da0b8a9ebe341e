use phf::{Map, Set, phf_map, phf_set};

static NUCLEIC_ACID_NAMES: Set<&'static str> = phf_set! {
    "A", "U", "G", "C", "I", "DA", "DT", "DG", "DC",
};

static AMINO_ACID_LETTERS: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "CYS" => 'C', "ASP" => 'D', "ASH" => 'D', "GLU" => 'E', "PHE" => 'F',
    "GLY" => 'G', "ILE" => 'I', "LYS" => 'K', "LEU" => 'L', "MET" => 'M', "PRO" => 'P',
    "GLN" => 'Q', "ARG" => 'R', "SER" => 'S', "THR" => 'T', "VAL" => 'V', "TRP" => 'W',
    "TYR" => 'Y', "ASN" => 'N', "HID" => 'H', "HIE" => 'H', "HIP" => 'H', "HIS" => 'H',
};

pub fn is_nucleic_acid_name(residue_name: &str) -> bool {
    NUCLEIC_ACID_NAMES.contains(residue_name.trim())
}

pub fn is_amino_acid_name(residue_name: &str) -> bool {
    AMINO_ACID_LETTERS.contains_key(residue_name.trim())
}

pub fn amino_acid_letter(residue_name: &str) -> Option<char> {
    AMINO_ACID_LETTERS.get(residue_name.trim()).copied()
}

/// Hydrogen and deuterium both count as hydrogens.
pub fn is_hydrogen_element(element: &str) -> bool {
    let element = element.trim();
    element.eq_ignore_ascii_case("H") || element.eq_ignore_ascii_case("D")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nucleic_acid_names_cover_rna_dna_and_inosine() {
        for name in ["A", "U", "G", "C", "I", "DA", "DT", "DG", "DC"] {
            assert!(is_nucleic_acid_name(name), "{name}");
        }
        assert!(!is_nucleic_acid_name("T"));
        assert!(!is_nucleic_acid_name("DU"));
        assert!(!is_nucleic_acid_name("ADE"));
    }

    #[test]
    fn amino_acid_names_include_protonation_variants() {
        for name in ["ALA", "ASH", "HID", "HIE", "HIP", "HIS", "TYR"] {
            assert!(is_amino_acid_name(name), "{name}");
        }
        assert!(!is_amino_acid_name("HOH"));
        assert_eq!(amino_acid_letter("HIP"), Some('H'));
        assert_eq!(amino_acid_letter("ASH"), Some('D'));
        assert_eq!(amino_acid_letter("MSE"), None);
    }

    #[test]
    fn hydrogen_elements_are_case_insensitive() {
        assert!(is_hydrogen_element("H"));
        assert!(is_hydrogen_element(" h"));
        assert!(is_hydrogen_element("D"));
        assert!(!is_hydrogen_element("HG"));
        assert!(!is_hydrogen_element(""));
    }
}
