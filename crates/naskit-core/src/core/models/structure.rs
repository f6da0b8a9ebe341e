use super::atom::Atom;
use super::chain::Chain;
use super::edit::Renumber;
use super::error::ModelError;
use super::residue::{Residue, ResidueCategory};
use nalgebra::MatrixXx3;
use std::fmt;

/// A top-level member of a structure: a standalone molecule or a polymer chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Molecule(Residue),
    Chain(Chain),
}

impl Component {
    /// The residues of this component in order; a molecule is a single residue.
    pub fn residues(&self) -> &[Residue] {
        match self {
            Component::Molecule(residue) => std::slice::from_ref(residue),
            Component::Chain(chain) => chain.residues(),
        }
    }

    pub fn natoms(&self) -> usize {
        self.residues().iter().map(Residue::len).sum()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues().iter().flat_map(Residue::iter)
    }

    pub fn as_chain(&self) -> Option<&Chain> {
        match self {
            Component::Chain(chain) => Some(chain),
            Component::Molecule(_) => None,
        }
    }

    pub fn as_chain_mut(&mut self) -> Option<&mut Chain> {
        match self {
            Component::Chain(chain) => Some(chain),
            Component::Molecule(_) => None,
        }
    }

    pub fn as_molecule(&self) -> Option<&Residue> {
        match self {
            Component::Molecule(residue) => Some(residue),
            Component::Chain(_) => None,
        }
    }

    pub fn as_molecule_mut(&mut self) -> Option<&mut Residue> {
        match self {
            Component::Molecule(residue) => Some(residue),
            Component::Chain(_) => None,
        }
    }

    fn assign_rows(&mut self, coordinates: &MatrixXx3<f64>, offset: usize) -> usize {
        match self {
            Component::Molecule(residue) => residue.assign_rows(coordinates, offset),
            Component::Chain(chain) => chain.assign_rows(coordinates, offset),
        }
    }
}

impl From<Residue> for Component {
    fn from(residue: Residue) -> Self {
        Component::Molecule(residue)
    }
}

impl From<Chain> for Component {
    fn from(chain: Chain) -> Self {
        Component::Chain(chain)
    }
}

impl Renumber for Component {
    fn renumber_atoms(&mut self, start: usize) -> usize {
        match self {
            Component::Molecule(residue) => residue.renumber_atoms(start),
            Component::Chain(chain) => chain.renumber_atoms(start),
        }
    }

    fn renumber_residues(&mut self, start: isize) -> isize {
        match self {
            Component::Molecule(residue) => residue.renumber_residues(start),
            Component::Chain(chain) => chain.renumber_residues(start),
        }
    }

    fn rename_chains(&mut self, start: char) -> Result<char, ModelError> {
        match self {
            Component::Molecule(residue) => residue.rename_chains(start),
            Component::Chain(chain) => chain.rename_chains(start),
        }
    }
}

/// One model (frame) of a coordinate file: an ordered list of components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    components: Vec<Component>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: Vec<Component>) -> Self {
        Self { components }
    }

    pub fn push(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn component_mut(&mut self, index: usize) -> Option<&mut Component> {
        self.components.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn natoms(&self) -> usize {
        self.components.iter().map(Component::natoms).sum()
    }

    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.components.iter().filter_map(Component::as_chain)
    }

    pub fn molecules(&self) -> impl Iterator<Item = &Residue> {
        self.components.iter().filter_map(Component::as_molecule)
    }

    /// Every residue in traversal order, chain members and standalone molecules alike.
    pub fn residues(&self) -> impl Iterator<Item = &Residue> {
        self.components.iter().flat_map(Component::residues)
    }

    /// Every nucleic-acid residue in traversal order.
    pub fn nucleic_acid_residues(&self) -> impl Iterator<Item = &Residue> {
        self.residues()
            .filter(|r| r.category() == ResidueCategory::NucleicAcid)
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues().flat_map(Residue::iter)
    }

    /// Copies every atom position into an `n × 3` matrix.
    ///
    /// # Return
    ///
    /// One row per atom, in chain-then-residue-then-atom traversal order. The matrix is a copy;
    /// editing it leaves the structure unchanged.
    pub fn coordinates(&self) -> MatrixXx3<f64> {
        let atoms: Vec<&Atom> = self.atoms().collect();
        MatrixXx3::from_fn(atoms.len(), |r, c| atoms[r].position[c])
    }

    /// Assigns all coordinates at once, rows in traversal order.
    ///
    /// # Arguments
    ///
    /// * `coordinates` - One row per atom, laid out as returned by [`Structure::coordinates`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CoordinateShape`] if the row count differs from
    /// [`Structure::natoms`].
    pub fn set_coordinates(&mut self, coordinates: &MatrixXx3<f64>) -> Result<(), ModelError> {
        let expected = self.natoms();
        if coordinates.nrows() != expected {
            return Err(ModelError::CoordinateShape {
                expected,
                found: coordinates.nrows(),
            });
        }
        self.components
            .iter_mut()
            .fold(0, |row, component| component.assign_rows(coordinates, row));
        Ok(())
    }
}

impl Renumber for Structure {
    fn renumber_atoms(&mut self, start: usize) -> usize {
        self.components
            .iter_mut()
            .fold(start, |serial, component| component.renumber_atoms(serial))
    }

    fn renumber_residues(&mut self, start: isize) -> isize {
        self.components
            .iter_mut()
            .fold(start, |number, component| component.renumber_residues(number))
    }

    fn rename_chains(&mut self, start: char) -> Result<char, ModelError> {
        let mut label = start;
        for component in &mut self.components {
            label = component.rename_chains(label)?;
        }
        Ok(label)
    }
}

impl std::ops::Index<usize> for Structure {
    type Output = Component;

    fn index(&self, index: usize) -> &Self::Output {
        &self.components[index]
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Structure with {} components, {} atoms",
            self.components.len(),
            self.natoms()
        )?;
        let mut i = 0;
        while i < self.components.len() {
            match &self.components[i] {
                Component::Chain(chain) => {
                    writeln!(
                        f,
                        "  {} chain {} ({} residues): {}",
                        chain.kind(),
                        chain.chain_id().unwrap_or(' '),
                        chain.len(),
                        chain.sequence()
                    )?;
                    i += 1;
                }
                Component::Molecule(molecule) => {
                    // Collapse runs of identically named molecules (waters, ions).
                    let run = self.components[i..]
                        .iter()
                        .take_while(|c| c.as_molecule().is_some_and(|m| m.name() == molecule.name()))
                        .count();
                    writeln!(f, "  {} x molecule {}", run, molecule.name())?;
                    i += run;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn residue(name: &str, chain_id: char, number: isize, natoms: usize) -> Residue {
        let atoms = (0..natoms).map(|i| {
            Atom::new(&format!("X{i}"), "C", Point3::new(i as f64, 0.0, 0.0))
                .with_residue(name, chain_id, number)
        });
        Residue::from_atoms(ResidueCategory::from_residue_name(name), atoms).unwrap()
    }

    fn sample_structure() -> Structure {
        let mut structure = Structure::new();
        structure.push(residue("JFJ", 'B', 201, 2));
        structure.push(
            Chain::from_residues(vec![residue("G", 'A', 5, 3), residue("C", 'A', 6, 3)]).unwrap(),
        );
        structure.push(residue("HOH", 'W', 1, 1));
        structure.push(residue("HOH", 'W', 2, 1));
        structure.push(Chain::from_residues(vec![residue("ALA", 'C', 10, 2)]).unwrap());
        structure
    }

    #[test]
    fn traversal_counts_every_atom() {
        let structure = sample_structure();
        assert_eq!(structure.len(), 5);
        assert_eq!(structure.natoms(), 11);
        assert_eq!(structure.residues().count(), 6);
        assert_eq!(structure.nucleic_acid_residues().count(), 2);
        assert_eq!(structure.chains().count(), 2);
        assert_eq!(structure.molecules().count(), 3);
    }

    #[test]
    fn renumbering_spans_components() {
        let mut structure = sample_structure();
        assert_eq!(structure.renumber_atoms(1), 12);
        let serials: Vec<_> = structure.atoms().map(|a| a.serial).collect();
        assert_eq!(serials, (1..=11).collect::<Vec<_>>());

        assert_eq!(structure.renumber_residues(1), 7);
        let numbers: Vec<_> = structure.residues().map(Residue::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rename_chains_advances_only_on_chains() {
        let mut structure = sample_structure();
        let next = structure.rename_chains('A').unwrap();
        let labels: Vec<_> = structure.residues().map(Residue::chain_id).collect();
        assert_eq!(labels, vec!['A', 'A', 'A', 'B', 'B', 'B']);
        assert_eq!(next, 'C');
    }

    #[test]
    fn rename_chains_wraps_after_z() {
        let mut structure = sample_structure();
        structure.rename_chains('Z').unwrap();
        let labels: Vec<_> = structure.residues().map(Residue::chain_id).collect();
        assert_eq!(labels, vec!['Z', 'Z', 'Z', 'A', 'A', 'A']);
    }

    #[test]
    fn set_coordinates_assigns_rows_in_traversal_order() {
        let mut structure = sample_structure();
        let n = structure.natoms();
        let coords = MatrixXx3::from_fn(n, |r, c| (3 * r + c) as f64);
        structure.set_coordinates(&coords).unwrap();
        let last = structure.atoms().last().unwrap();
        assert_eq!(last.position.z, (3 * n - 1) as f64);
        assert_eq!(structure.coordinates(), coords);
        assert!(structure.set_coordinates(&MatrixXx3::zeros(n + 1)).is_err());
    }

    #[test]
    fn display_summarises_chains_and_molecule_runs() {
        let summary = sample_structure().to_string();
        assert!(summary.starts_with("Structure with 5 components, 11 atoms"));
        assert!(summary.contains("NucleicAcid chain A (2 residues): GC"));
        assert!(summary.contains("2 x molecule HOH"));
        assert!(summary.contains("1 x molecule JFJ"));
        assert!(summary.contains("Protein chain C (1 residues): A"));
    }
}
