use crate::core::models::atom::Atom;
use phf::{Map, phf_map};
use serde::Serialize;

static ELEMENT_COLORS: Map<&'static str, &'static str> = phf_map! {
    "C" => "#1D90DE",
    "H" => "#BCC5E0",
    "S" => "#E0D86B",
    "O" => "#DE371D",
    "N" => "#1DDE81",
    "P" => "#DC8BE0",
};

// Covalent radii in Angstroms.
static ELEMENT_RADII: Map<&'static str, f64> = phf_map! {
    "C" => 0.67,
    "H" => 0.53,
    "S" => 0.88,
    "O" => 0.48,
    "N" => 0.56,
    "P" => 0.98,
};

const DEFAULT_COLOR: &str = "#A0A0A0";
const DEFAULT_RADIUS: f64 = 0.70;

/// Renderer-agnostic input for a 3D scatter view of a set of atoms.
///
/// All vectors are parallel and follow the input atom order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointCloud {
    pub positions: Vec<[f64; 3]>,
    pub colors: Vec<&'static str>,
    pub sizes: Vec<f64>,
    pub labels: Vec<String>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Marker scale that shrinks as the scene gets more crowded.
pub fn marker_size_multiplier(natoms: usize) -> f64 {
    100.0 * (-(0.02 * natoms as f64).sqrt()).exp() + 10.0
}

/// Prepares positions, element colours, radius-scaled marker sizes and hover labels.
///
/// When `size_multiplier` is `None` it is derived from the atom count with
/// [`marker_size_multiplier`].
pub fn point_cloud<'a>(
    atoms: impl IntoIterator<Item = &'a Atom>,
    size_multiplier: Option<f64>,
) -> PointCloud {
    let atoms: Vec<&Atom> = atoms.into_iter().collect();
    let multiplier = size_multiplier.unwrap_or_else(|| marker_size_multiplier(atoms.len()));

    let mut cloud = PointCloud::default();
    for atom in atoms {
        let element = atom.element.trim().to_ascii_uppercase();
        cloud.positions.push([atom.position.x, atom.position.y, atom.position.z]);
        cloud
            .colors
            .push(ELEMENT_COLORS.get(element.as_str()).copied().unwrap_or(DEFAULT_COLOR));
        cloud.sizes.push(
            ELEMENT_RADII
                .get(element.as_str())
                .copied()
                .unwrap_or(DEFAULT_RADIUS)
                * multiplier,
        );
        cloud.labels.push(format!(
            "{} {} {}",
            atom.name(),
            atom.residue_number(),
            atom.residue_name()
        ));
    }
    cloud
}
