use super::atom::Atom;
use super::edit::{Renumber, validate_chain_id};
use super::error::ModelError;
use crate::core::utils::identifiers::{is_amino_acid_name, is_nucleic_acid_name};
use nalgebra::{MatrixXx3, Point3};
use std::collections::HashMap;
use std::fmt;

/// The chemical category of a residue, fixed when the residue is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueCategory {
    NucleicAcid,
    AminoAcid,
    Generic,
}

impl ResidueCategory {
    /// Classifies a residue by its name: nucleotides, amino acids, everything else.
    pub fn from_residue_name(name: &str) -> Self {
        if is_nucleic_acid_name(name) {
            ResidueCategory::NucleicAcid
        } else if is_amino_acid_name(name) {
            ResidueCategory::AminoAcid
        } else {
            ResidueCategory::Generic
        }
    }

    pub fn is_polymer(self) -> bool {
        !matches!(self, ResidueCategory::Generic)
    }
}

impl fmt::Display for ResidueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResidueCategory::NucleicAcid => "a nucleic-acid residue",
                ResidueCategory::AminoAcid => "an amino-acid residue",
                ResidueCategory::Generic => "a generic molecule",
            }
        )
    }
}

/// An ordered, name-indexed group of atoms sharing one residue identity.
///
/// A residue doubles as a standalone molecule (ligand, ion, water) when its category is
/// [`ResidueCategory::Generic`].
///
/// Invariants:
/// - atom names are unique within the residue;
/// - every atom carries the residue's name, chain label and residue number.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    category: ResidueCategory,
    name: String,
    chain_id: char,
    number: isize,
    atoms: Vec<Atom>,
    atom_name_map: HashMap<String, usize>, // atom name -> index into `atoms`
}

impl Residue {
    pub fn new(category: ResidueCategory, name: &str, chain_id: char, number: isize) -> Self {
        Self {
            category,
            name: name.to_string(),
            chain_id,
            number,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    /// Builds a residue whose identity is taken from the first atom.
    ///
    /// # Arguments
    ///
    /// * `category` - Fixed for the lifetime of the residue.
    /// * `atoms` - Atoms in stored order; all must share the first atom's residue identity.
    ///
    /// # Return
    ///
    /// Returns the residue with its name index built.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyResidue`] for an empty input, or the first error reported by
    /// [`Residue::add_atom`].
    pub fn from_atoms(
        category: ResidueCategory,
        atoms: impl IntoIterator<Item = Atom>,
    ) -> Result<Self, ModelError> {
        let mut atoms = atoms.into_iter();
        let first = atoms.next().ok_or(ModelError::EmptyResidue)?;
        let mut residue = Self::new(
            category,
            first.residue_name(),
            first.chain_id(),
            first.residue_number(),
        );
        residue.add_atom(first)?;
        for atom in atoms {
            residue.add_atom(atom)?;
        }
        Ok(residue)
    }

    pub fn category(&self) -> ResidueCategory {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain_id(&self) -> char {
        self.chain_id
    }

    pub fn number(&self) -> isize {
        self.number
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn natoms(&self) -> usize {
        self.atoms.len()
    }

    /// Appends an atom.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateAtomName`] if the name is taken, or
    /// [`ModelError::IdentityMismatch`] if the atom's residue name, chain label or residue
    /// number disagrees with this residue.
    pub fn add_atom(&mut self, atom: Atom) -> Result<(), ModelError> {
        if self.atom_name_map.contains_key(atom.name()) {
            return Err(ModelError::DuplicateAtomName {
                atom_name: atom.name().to_string(),
                residue_name: self.name.clone(),
                residue_number: self.number,
            });
        }
        self.check_identity(&atom)?;
        self.atom_name_map
            .insert(atom.name().to_string(), self.atoms.len());
        self.atoms.push(atom);
        Ok(())
    }

    fn check_identity(&self, atom: &Atom) -> Result<(), ModelError> {
        let mismatch = |field: &'static str, expected: String, found: String| {
            Err(ModelError::IdentityMismatch {
                atom_name: atom.name().to_string(),
                residue_number: self.number,
                field,
                expected,
                found,
            })
        };
        if atom.residue_name() != self.name {
            return mismatch(
                "residue name",
                self.name.clone(),
                atom.residue_name().to_string(),
            );
        }
        if atom.chain_id() != self.chain_id {
            return mismatch(
                "chain label",
                self.chain_id.to_string(),
                atom.chain_id().to_string(),
            );
        }
        if atom.residue_number() != self.number {
            return mismatch(
                "residue number",
                self.number.to_string(),
                atom.residue_number().to_string(),
            );
        }
        Ok(())
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Mutable access to the atoms' coordinates and metadata.
    ///
    /// Atom names and residue identity stay read-only through this slice.
    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub fn atom_index(&self, name: &str) -> Option<usize> {
        self.atom_name_map.get(name).copied()
    }

    pub fn atom_by_name(&self, name: &str) -> Option<&Atom> {
        self.atom_index(name).map(|i| &self.atoms[i])
    }

    pub fn atom_by_name_mut(&mut self, name: &str) -> Option<&mut Atom> {
        self.atom_index(name).map(|i| &mut self.atoms[i])
    }

    pub fn contains_atom(&self, name: &str) -> bool {
        self.atom_name_map.contains_key(name)
    }

    pub fn has_hydrogens(&self) -> bool {
        self.atoms.iter().any(Atom::is_hydrogen)
    }

    pub fn remove_atom(&mut self, index: usize) -> Option<Atom> {
        if index >= self.atoms.len() {
            return None;
        }
        let atom = self.atoms.remove(index);
        self.rebuild_name_map();
        Some(atom)
    }

    pub fn remove_atom_by_name(&mut self, name: &str) -> Option<Atom> {
        let index = self.atom_index(name)?;
        self.remove_atom(index)
    }

    /// Keeps only the atoms for which `keep` returns `true`, preserving order.
    pub fn retain_atoms(&mut self, keep: impl FnMut(&Atom) -> bool) {
        let before = self.atoms.len();
        self.atoms.retain(keep);
        if self.atoms.len() != before {
            self.rebuild_name_map();
        }
    }

    fn rebuild_name_map(&mut self) {
        self.atom_name_map = self
            .atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| (atom.name().to_string(), i))
            .collect();
    }

    /// Renames one atom, keeping the name index consistent.
    ///
    /// # Arguments
    ///
    /// * `old` - Current atom name.
    /// * `new` - Replacement name; renaming an atom to itself is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AtomNotFound`] if `old` is absent or
    /// [`ModelError::DuplicateAtomName`] if `new` is already taken by another atom.
    pub fn rename_atom(&mut self, old: &str, new: &str) -> Result<(), ModelError> {
        let index = self
            .atom_index(old)
            .ok_or_else(|| ModelError::AtomNotFound(old.to_string()))?;
        if old == new {
            return Ok(());
        }
        if self.contains_atom(new) {
            return Err(ModelError::DuplicateAtomName {
                atom_name: new.to_string(),
                residue_name: self.name.clone(),
                residue_number: self.number,
            });
        }
        self.atoms[index].set_name(new);
        self.atom_name_map.remove(old);
        self.atom_name_map.insert(new.to_string(), index);
        Ok(())
    }

    /// Renames the residue and every member atom.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        for atom in &mut self.atoms {
            atom.set_residue_name(name);
        }
    }

    /// Relabels the residue and every member atom.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidChainId`] unless `chain_id` is an uppercase ASCII letter.
    pub fn set_chain_id(&mut self, chain_id: char) -> Result<(), ModelError> {
        validate_chain_id(chain_id)?;
        self.chain_id = chain_id;
        for atom in &mut self.atoms {
            atom.set_chain_id(chain_id);
        }
        Ok(())
    }

    /// Sets the residue number on the residue and every member atom.
    pub fn set_number(&mut self, number: isize) {
        self.number = number;
        for atom in &mut self.atoms {
            atom.set_residue_number(number);
        }
    }

    /// Copies another residue's identity onto this one without validating the chain label.
    pub(crate) fn stamp_identity(&mut self, name: &str, chain_id: char, number: isize) {
        self.set_name(name);
        self.chain_id = chain_id;
        self.set_number(number);
        for atom in &mut self.atoms {
            atom.set_chain_id(chain_id);
        }
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// Overwrites every atom position in order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CoordinateShape`] if the slice length differs from the atom count.
    pub fn set_positions(&mut self, positions: &[Point3<f64>]) -> Result<(), ModelError> {
        if positions.len() != self.atoms.len() {
            return Err(ModelError::CoordinateShape {
                expected: self.atoms.len(),
                found: positions.len(),
            });
        }
        for (atom, position) in self.atoms.iter_mut().zip(positions) {
            atom.position = *position;
        }
        Ok(())
    }

    /// Returns an `n × 3` copy of the atom coordinates.
    pub fn coordinates(&self) -> MatrixXx3<f64> {
        MatrixXx3::from_fn(self.atoms.len(), |r, c| self.atoms[r].position[c])
    }

    /// Assigns coordinates from an `n × 3` matrix whose rows follow the atom order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CoordinateShape`] if the row count differs from the atom count.
    pub fn set_coordinates(&mut self, coordinates: &MatrixXx3<f64>) -> Result<(), ModelError> {
        if coordinates.nrows() != self.atoms.len() {
            return Err(ModelError::CoordinateShape {
                expected: self.atoms.len(),
                found: coordinates.nrows(),
            });
        }
        self.assign_rows(coordinates, 0);
        Ok(())
    }

    /// Writes rows `offset..offset + len` into the atoms; the caller checks the shape.
    pub(crate) fn assign_rows(&mut self, coordinates: &MatrixXx3<f64>, offset: usize) -> usize {
        for (i, atom) in self.atoms.iter_mut().enumerate() {
            let row = offset + i;
            atom.position = Point3::new(
                coordinates[(row, 0)],
                coordinates[(row, 1)],
                coordinates[(row, 2)],
            );
        }
        offset + self.atoms.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }
}

impl Renumber for Residue {
    fn renumber_atoms(&mut self, start: usize) -> usize {
        let mut serial = start;
        for atom in &mut self.atoms {
            atom.serial = serial;
            serial += 1;
        }
        serial
    }

    fn renumber_residues(&mut self, start: isize) -> isize {
        self.set_number(start);
        start + 1
    }

    fn rename_chains(&mut self, start: char) -> Result<char, ModelError> {
        self.set_chain_id(start)?;
        Ok(start)
    }
}

impl<'a> IntoIterator for &'a Residue {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}
