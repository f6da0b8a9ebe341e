use crate::core::utils::identifiers::is_hydrogen_element;
use nalgebra::Point3;

/// A single atom record as it appears in a coordinate file.
///
/// Positional and descriptive metadata are public and may be edited in place. The atom name and
/// the identity of the owning residue (residue name, chain label, residue number) are private:
/// they are only rewritten through [`Residue`](super::residue::Residue) so that a residue never
/// holds atoms that disagree with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// `true` for `HETATM` records, `false` for `ATOM` records.
    pub is_hetatm: bool,
    /// Serial number from the source file (or assigned by renumbering).
    pub serial: usize,
    name: String,
    /// Alternate-location indicator; blank for the primary location.
    pub alt_loc: char,
    residue_name: String,
    chain_id: char,
    residue_number: isize,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy, or `None` when unset.
    pub occupancy: Option<f64>,
    /// Temperature factor, or `None` when unset.
    pub temperature_factor: Option<f64>,
    /// Segment identifier (at most four characters when written).
    pub segment: String,
    /// Element symbol, e.g. `"C"` or `"CL"`.
    pub element: String,
    /// Integer formal charge.
    pub charge: i8,
}

impl Atom {
    /// Creates a detached atom with blank residue identity and unset occupancy and temperature.
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            is_hetatm: false,
            serial: 0,
            name: name.to_string(),
            alt_loc: ' ',
            residue_name: String::new(),
            chain_id: ' ',
            residue_number: 0,
            position,
            occupancy: None,
            temperature_factor: None,
            segment: String::new(),
            element: element.to_string(),
            charge: 0,
        }
    }

    /// Sets the residue identity of a detached atom, e.g. before adding it to a residue.
    pub fn with_residue(mut self, residue_name: &str, chain_id: char, residue_number: isize) -> Self {
        self.residue_name = residue_name.to_string();
        self.chain_id = chain_id;
        self.residue_number = residue_number;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn residue_name(&self) -> &str {
        &self.residue_name
    }

    pub fn chain_id(&self) -> char {
        self.chain_id
    }

    pub fn residue_number(&self) -> isize {
        self.residue_number
    }

    pub fn is_hydrogen(&self) -> bool {
        is_hydrogen_element(&self.element)
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub(crate) fn set_residue_name(&mut self, residue_name: &str) {
        self.residue_name = residue_name.to_string();
    }

    pub(crate) fn set_chain_id(&mut self, chain_id: char) {
        self.chain_id = chain_id;
    }

    pub(crate) fn set_residue_number(&mut self, residue_number: isize) {
        self.residue_number = residue_number;
    }
}
