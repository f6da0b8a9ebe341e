use super::atom::Atom;
use super::edit::{Renumber, next_chain_label, validate_chain_id};
use super::error::ModelError;
use super::residue::{Residue, ResidueCategory};
use crate::core::topology::nucleotides::NaType;
use nalgebra::MatrixXx3;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainKind {
    NucleicAcid,
    Protein,
}

impl ChainKind {
    /// The chain kind that holds residues of `category`, or `None` for generic molecules.
    pub fn for_category(category: ResidueCategory) -> Option<Self> {
        match category {
            ResidueCategory::NucleicAcid => Some(ChainKind::NucleicAcid),
            ResidueCategory::AminoAcid => Some(ChainKind::Protein),
            ResidueCategory::Generic => None,
        }
    }

    pub fn residue_category(self) -> ResidueCategory {
        match self {
            ChainKind::NucleicAcid => ResidueCategory::NucleicAcid,
            ChainKind::Protein => ResidueCategory::AminoAcid,
        }
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChainKind::NucleicAcid => "NucleicAcid",
                ChainKind::Protein => "Protein",
            }
        )
    }
}

/// An ordered, category-homogeneous run of polymer residues sharing one chain label.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    kind: ChainKind,
    residues: Vec<Residue>,
}

impl Chain {
    pub fn new(kind: ChainKind) -> Self {
        Self {
            kind,
            residues: Vec::new(),
        }
    }

    /// Builds a chain whose kind follows the first residue's category.
    ///
    /// # Arguments
    ///
    /// * `residues` - Polymer residues in chain order, all with the same label.
    ///
    /// # Return
    ///
    /// Returns the chain, with its kind derived from the first residue.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyChain`] for empty input,
    /// [`ModelError::NotPolymerResidue`] if the first residue is generic, or the first error
    /// reported by [`Chain::add_residue`].
    pub fn from_residues(residues: impl IntoIterator<Item = Residue>) -> Result<Self, ModelError> {
        let mut residues = residues.into_iter();
        let first = residues.next().ok_or(ModelError::EmptyChain)?;
        let kind =
            ChainKind::for_category(first.category()).ok_or_else(|| ModelError::NotPolymerResidue {
                residue_name: first.name().to_string(),
                residue_number: first.number(),
            })?;
        let mut chain = Self::new(kind);
        chain.add_residue(first)?;
        for residue in residues {
            chain.add_residue(residue)?;
        }
        Ok(chain)
    }

    /// Appends a residue.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CategoryMismatch`] if the residue's category does not match the
    /// chain kind, [`ModelError::ChainIdMismatch`] if its label differs from the chain's, or
    /// [`ModelError::DuplicateResidueNumber`] if its number is already present.
    pub fn add_residue(&mut self, residue: Residue) -> Result<(), ModelError> {
        let expected = self.kind.residue_category();
        if residue.category() != expected {
            return Err(ModelError::CategoryMismatch {
                residue_name: residue.name().to_string(),
                residue_number: residue.number(),
                expected,
                found: residue.category(),
            });
        }
        if let Some(chain_id) = self.chain_id() {
            if residue.chain_id() != chain_id {
                return Err(ModelError::ChainIdMismatch {
                    residue_number: residue.number(),
                    expected: chain_id,
                    found: residue.chain_id(),
                });
            }
        }
        if self.residues.iter().any(|r| r.number() == residue.number()) {
            return Err(ModelError::DuplicateResidueNumber {
                chain_id: residue.chain_id(),
                residue_number: residue.number(),
            });
        }
        self.residues.push(residue);
        Ok(())
    }

    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    /// The shared chain label, or `None` for an empty chain.
    pub fn chain_id(&self) -> Option<char> {
        self.residues.first().map(Residue::chain_id)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub(crate) fn residues_mut(&mut self) -> impl Iterator<Item = &mut Residue> {
        self.residues.iter_mut()
    }

    /// Edits one residue in place and keeps the change only if the chain stays consistent.
    ///
    /// The closure works on a copy of the residue at `index`. The copy is written back once
    /// the closure succeeds and the residue still carries the chain's label and a residue
    /// number no other residue of the chain uses. Renumbering and relabelling whole chains
    /// go through [`Renumber`] and [`Chain::set_chain_id`].
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the residue in the chain.
    /// * `edit` - The modification; its error type must absorb [`ModelError`].
    ///
    /// # Return
    ///
    /// Whatever `edit` returns on success.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ResidueIndexOutOfRange`] for a bad `index`, the closure's own
    /// error, [`ModelError::ChainIdMismatch`] if the label changed, or
    /// [`ModelError::DuplicateResidueNumber`] if the new number is already taken. The chain is
    /// unchanged on every error.
    pub fn update_residue<T, E>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut Residue) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<ModelError>,
    {
        let len = self.residues.len();
        let original = self
            .residues
            .get(index)
            .ok_or(ModelError::ResidueIndexOutOfRange { index, len })?;
        let chain_id = original.chain_id();
        let mut work = original.clone();
        let output = edit(&mut work)?;

        if work.chain_id() != chain_id {
            return Err(ModelError::ChainIdMismatch {
                residue_number: work.number(),
                expected: chain_id,
                found: work.chain_id(),
            }
            .into());
        }
        let taken = self
            .residues
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && r.number() == work.number());
        if taken {
            return Err(ModelError::DuplicateResidueNumber {
                chain_id,
                residue_number: work.number(),
            }
            .into());
        }
        self.residues[index] = work;
        Ok(output)
    }

    pub fn find_residue(&self, number: isize) -> Option<&Residue> {
        self.residues.iter().find(|r| r.number() == number)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn natoms(&self) -> usize {
        self.residues.iter().map(Residue::len).sum()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(Residue::iter)
    }

    /// Nucleic-acid flavour of the chain if every residue agrees.
    ///
    /// Returns `None` for protein chains, empty chains and RNA/DNA hybrids.
    pub fn na_type(&self) -> Option<NaType> {
        if self.kind != ChainKind::NucleicAcid {
            return None;
        }
        let mut types = self.residues.iter().map(|r| NaType::from_residue_name(r.name()));
        let first = types.next()?;
        types.all(|t| t == first).then_some(first)
    }

    /// One-letter sequence of the chain; unknown residues render as `X`.
    pub fn sequence(&self) -> String {
        self.residues
            .iter()
            .map(|r| match self.kind {
                ChainKind::NucleicAcid => r
                    .name()
                    .chars()
                    .last()
                    .filter(|c| c.is_ascii_alphabetic())
                    .unwrap_or('X'),
                ChainKind::Protein => {
                    crate::core::utils::identifiers::amino_acid_letter(r.name()).unwrap_or('X')
                }
            })
            .collect()
    }

    /// Relabels the chain and every residue and atom in it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidChainId`] unless `chain_id` is an uppercase ASCII letter.
    pub fn set_chain_id(&mut self, chain_id: char) -> Result<(), ModelError> {
        validate_chain_id(chain_id)?;
        for residue in &mut self.residues {
            residue.set_chain_id(chain_id)?;
        }
        Ok(())
    }

    pub fn coordinates(&self) -> MatrixXx3<f64> {
        let atoms: Vec<&Atom> = self.atoms().collect();
        MatrixXx3::from_fn(atoms.len(), |r, c| atoms[r].position[c])
    }

    /// # Errors
    ///
    /// Returns [`ModelError::CoordinateShape`] if the row count differs from [`Chain::natoms`].
    pub fn set_coordinates(&mut self, coordinates: &MatrixXx3<f64>) -> Result<(), ModelError> {
        let expected = self.natoms();
        if coordinates.nrows() != expected {
            return Err(ModelError::CoordinateShape {
                expected,
                found: coordinates.nrows(),
            });
        }
        self.assign_rows(coordinates, 0);
        Ok(())
    }

    pub(crate) fn assign_rows(&mut self, coordinates: &MatrixXx3<f64>, offset: usize) -> usize {
        self.residues
            .iter_mut()
            .fold(offset, |row, residue| residue.assign_rows(coordinates, row))
    }
}

impl Renumber for Chain {
    fn renumber_atoms(&mut self, start: usize) -> usize {
        self.residues
            .iter_mut()
            .fold(start, |serial, residue| residue.renumber_atoms(serial))
    }

    fn renumber_residues(&mut self, start: isize) -> isize {
        self.residues
            .iter_mut()
            .fold(start, |number, residue| residue.renumber_residues(number))
    }

    fn rename_chains(&mut self, start: char) -> Result<char, ModelError> {
        self.set_chain_id(start)?;
        Ok(next_chain_label(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn residue(name: &str, chain_id: char, number: isize) -> Residue {
        let atoms = ["P", "C1'"].into_iter().enumerate().map(|(i, atom_name)| {
            Atom::new(atom_name, &atom_name[..1], Point3::new(number as f64, i as f64, 0.0))
                .with_residue(name, chain_id, number)
        });
        Residue::from_atoms(ResidueCategory::from_residue_name(name), atoms).unwrap()
    }

    #[test]
    fn from_residues_builds_nucleic_acid_chain() {
        let chain =
            Chain::from_residues(vec![residue("G", 'A', 1), residue("C", 'A', 2)]).unwrap();
        assert_eq!(chain.kind(), ChainKind::NucleicAcid);
        assert_eq!(chain.chain_id(), Some('A'));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.natoms(), 4);
        assert_eq!(chain.sequence(), "GC");
        assert_eq!(chain.na_type(), Some(NaType::Rna));
    }

    #[test]
    fn from_residues_rejects_generic_residues() {
        let result = Chain::from_residues(vec![residue("HOH", 'A', 1)]);
        assert!(matches!(result, Err(ModelError::NotPolymerResidue { .. })));
        assert_eq!(Chain::from_residues(Vec::new()), Err(ModelError::EmptyChain));
    }

    #[test]
    fn add_residue_enforces_category() {
        let mut chain = Chain::from_residues(vec![residue("DA", 'A', 1)]).unwrap();
        let err = chain.add_residue(residue("ALA", 'A', 2)).unwrap_err();
        assert!(matches!(
            err,
            ModelError::CategoryMismatch {
                expected: ResidueCategory::NucleicAcid,
                found: ResidueCategory::AminoAcid,
                ..
            }
        ));
    }

    #[test]
    fn add_residue_enforces_chain_label_and_unique_numbers() {
        let mut chain = Chain::from_residues(vec![residue("DA", 'A', 1)]).unwrap();
        assert!(matches!(
            chain.add_residue(residue("DT", 'B', 2)),
            Err(ModelError::ChainIdMismatch {
                expected: 'A',
                found: 'B',
                ..
            })
        ));
        assert!(matches!(
            chain.add_residue(residue("DT", 'A', 1)),
            Err(ModelError::DuplicateResidueNumber {
                residue_number: 1,
                ..
            })
        ));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn renumber_residues_is_contiguous_and_keeps_numbers_unique() {
        let mut chain = Chain::from_residues(vec![
            residue("DA", 'A', 7),
            residue("DT", 'A', 3),
            residue("DG", 'A', 40),
        ])
        .unwrap();
        let next = chain.renumber_residues(1);
        assert_eq!(next, 4);
        let numbers: Vec<_> = chain.residues().iter().map(Residue::number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(chain.atoms().all(|a| (1..=3).contains(&a.residue_number())));

        assert!(chain.add_residue(residue("DC", 'A', 3)).is_err());
        assert!(chain.add_residue(residue("DC", 'A', 7)).is_ok());
    }

    #[test]
    fn rename_chains_relabels_and_advances() {
        let mut chain = Chain::from_residues(vec![residue("U", 'A', 1)]).unwrap();
        assert_eq!(chain.rename_chains('Z'), Ok('A'));
        assert_eq!(chain.chain_id(), Some('Z'));
        assert!(chain.atoms().all(|a| a.chain_id() == 'Z'));
    }

    #[test]
    fn na_type_is_none_for_hybrids() {
        let chain =
            Chain::from_residues(vec![residue("DA", 'A', 1), residue("U", 'A', 2)]).unwrap();
        assert_eq!(chain.na_type(), None);
    }

    #[test]
    fn coordinates_follow_residue_order() {
        let mut chain =
            Chain::from_residues(vec![residue("G", 'A', 1), residue("C", 'A', 2)]).unwrap();
        let mut coords = chain.coordinates();
        assert_eq!(coords.nrows(), 4);
        assert_eq!(coords[(2, 0)], 2.0);
        coords[(3, 2)] = 9.0;
        chain.set_coordinates(&coords).unwrap();
        assert_eq!(chain.residue(1).unwrap().atom(1).unwrap().position.z, 9.0);
        assert!(chain.set_coordinates(&MatrixXx3::zeros(3)).is_err());
    }

    #[test]
    fn update_residue_commits_atom_level_edits() {
        let mut chain =
            Chain::from_residues(vec![residue("G", 'A', 1), residue("C", 'A', 2)]).unwrap();
        let removed = chain
            .update_residue(1, |r| -> Result<_, ModelError> {
                r.set_name("U");
                Ok(r.remove_atom_by_name("P").is_some())
            })
            .unwrap();
        assert!(removed);
        assert_eq!(chain.sequence(), "GU");
        assert_eq!(chain.natoms(), 3);
    }

    #[test]
    fn update_residue_cannot_break_chain_identity() {
        let mut chain =
            Chain::from_residues(vec![residue("G", 'A', 1), residue("C", 'A', 2)]).unwrap();
        let before = chain.clone();

        let duplicate = chain.update_residue(1, |r| -> Result<(), ModelError> {
            r.set_number(1);
            Ok(())
        });
        assert_eq!(
            duplicate,
            Err(ModelError::DuplicateResidueNumber {
                chain_id: 'A',
                residue_number: 1
            })
        );

        let relabelled = chain.update_residue(1, |r| r.set_chain_id('Q'));
        assert!(matches!(
            relabelled,
            Err(ModelError::ChainIdMismatch {
                expected: 'A',
                found: 'Q',
                ..
            })
        ));

        let out_of_range = chain.update_residue(5, |_| -> Result<(), ModelError> { Ok(()) });
        assert_eq!(
            out_of_range,
            Err(ModelError::ResidueIndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(chain, before);

        let identities: Vec<_> = chain
            .residues()
            .iter()
            .map(|r| (r.number(), r.chain_id()))
            .collect();
        assert_eq!(identities, vec![(1, 'A'), (2, 'A')]);
    }

    #[test]
    fn update_residue_allows_a_free_number() {
        let mut chain =
            Chain::from_residues(vec![residue("G", 'A', 1), residue("C", 'A', 2)]).unwrap();
        chain
            .update_residue(1, |r| -> Result<(), ModelError> {
                r.set_number(10);
                Ok(())
            })
            .unwrap();
        assert!(chain.find_residue(10).is_some());
        assert!(chain.atoms().skip(2).all(|a| a.residue_number() == 10));
    }
}
