use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Superposition needs at least 3 corresponding points, got {found}")]
    InsufficientPairs { found: usize },
    #[error("Index {index} is out of bounds for the {set} point set of length {len}")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        set: &'static str,
    },
    #[error("Singular value decomposition did not converge")]
    SvdFailed,
}

/// How the translation of a superposition is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// Map the centroid of the aligned subset onto the centroid of the target subset.
    Centroid,
    /// Map one designated aligned point exactly onto one designated target point.
    Origin { target: usize, aligned: usize },
}

/// A proper rotation followed by a translation: `p' = R p + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Computes the least-squares rigid transform mapping `aligned` onto `target`.
///
/// Only the points named by `correspondence` (`(target_index, aligned_index)` pairs) take part
/// in the fit. The rotation is the Kabsch solution with reflection correction; the translation
/// follows `anchor`.
///
/// # Errors
///
/// Returns [`GeometryError::InsufficientPairs`] for fewer than three pairs,
/// [`GeometryError::IndexOutOfBounds`] for an invalid index and [`GeometryError::SvdFailed`]
/// if the decomposition does not produce both singular-vector matrices.
pub fn superposition_transform(
    target: &[Point3<f64>],
    aligned: &[Point3<f64>],
    correspondence: &[(usize, usize)],
    anchor: Translation,
) -> Result<RigidTransform, GeometryError> {
    if correspondence.len() < 3 {
        return Err(GeometryError::InsufficientPairs {
            found: correspondence.len(),
        });
    }
    let fetch = |points: &[Point3<f64>], index: usize, set: &'static str| {
        points
            .get(index)
            .copied()
            .ok_or(GeometryError::IndexOutOfBounds {
                index,
                len: points.len(),
                set,
            })
    };

    let mut to_points = Vec::with_capacity(correspondence.len());
    let mut from_points = Vec::with_capacity(correspondence.len());
    for &(t, a) in correspondence {
        to_points.push(fetch(target, t, "target")?);
        from_points.push(fetch(aligned, a, "aligned")?);
    }

    // Both subsets are non-empty here.
    let to_centroid = centroid(&to_points).unwrap_or_else(Point3::origin);
    let from_centroid = centroid(&from_points).unwrap_or_else(Point3::origin);

    let h = from_points
        .iter()
        .zip(to_points.iter())
        .fold(Matrix3::zeros(), |acc, (f, t)| {
            acc + (t - to_centroid) * (f - from_centroid).transpose()
        });

    let svd = h.svd(true, true);
    let u = svd.u.ok_or(GeometryError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(GeometryError::SvdFailed)?;

    let d = (u * v_t).determinant();
    let mut correction = Matrix3::identity();
    if d < 0.0 {
        correction[(2, 2)] = -1.0;
    }

    let rotation = Rotation3::from_matrix(&(u * correction * v_t));
    let translation = match anchor {
        Translation::Centroid => to_centroid.coords - rotation * from_centroid.coords,
        Translation::Origin {
            target: t,
            aligned: a,
        } => fetch(target, t, "target")?.coords - rotation * fetch(aligned, a, "aligned")?.coords,
    };

    Ok(RigidTransform {
        rotation,
        translation,
    })
}

/// Superimposes `aligned` onto `target` in place and returns the applied transform.
///
/// The transform is fitted on the corresponding subset only but applied to every point of
/// `aligned`.
///
/// # Errors
///
/// See [`superposition_transform`]. On error `aligned` is left untouched.
pub fn superpose(
    target: &[Point3<f64>],
    aligned: &mut [Point3<f64>],
    correspondence: &[(usize, usize)],
    anchor: Translation,
) -> Result<RigidTransform, GeometryError> {
    let transform = superposition_transform(target, aligned, correspondence, anchor)?;
    for point in aligned.iter_mut() {
        *point = transform.apply(point);
    }
    Ok(transform)
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// RMSD over corresponding pairs only.
pub fn correspondence_rmsd(
    target: &[Point3<f64>],
    aligned: &[Point3<f64>],
    correspondence: &[(usize, usize)],
) -> Option<f64> {
    let pairs: Option<(Vec<_>, Vec<_>)> = correspondence
        .iter()
        .map(|&(t, a)| Some((*target.get(t)?, *aligned.get(a)?)))
        .collect();
    let (t, a) = pairs?;
    calculate_rmsd(&t, &a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Unit;

    const TOLERANCE: f64 = 1e-9;

    fn tetrahedron() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.3, 0.4, 1.7),
            Point3::new(-0.8, 1.1, -0.6),
        ]
    }

    fn identity_pairs(n: usize) -> Vec<(usize, usize)> {
        (0..n).map(|i| (i, i)).collect()
    }

    fn moved(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        let rotation = Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(0.3, -1.0, 0.5)),
            1.2,
        );
        let shift = Vector3::new(4.0, -2.5, 10.0);
        points.iter().map(|p| rotation * p + shift).collect()
    }

    #[test]
    fn superposing_onto_itself_leaves_zero_residual() {
        let target = tetrahedron();
        let mut aligned = target.clone();
        let transform = superpose(&target, &mut aligned, &identity_pairs(4), Translation::Centroid)
            .unwrap();
        assert!(transform.rotation.angle().abs() < 1e-6);
        assert!(calculate_rmsd(&target, &aligned).unwrap() < TOLERANCE);
    }

    #[test]
    fn pure_translation_is_recovered() {
        let from = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let to: Vec<_> = from
            .iter()
            .map(|p| p + Vector3::new(10.0, 20.0, 30.0))
            .collect();
        let transform =
            superposition_transform(&to, &from, &identity_pairs(3), Translation::Centroid).unwrap();
        assert!(transform.rotation.angle().abs() < 1e-9);
        assert!((transform.translation - Vector3::new(10.0, 20.0, 30.0)).norm() < 1e-9);
    }

    #[test]
    fn result_is_invariant_to_pre_applied_rigid_motion() {
        let target = moved(&tetrahedron());
        let pairs = identity_pairs(4);

        let mut plain = tetrahedron();
        superpose(&target, &mut plain, &pairs, Translation::Centroid).unwrap();

        let mut pre_moved = moved(&moved(&tetrahedron()));
        superpose(&target, &mut pre_moved, &pairs, Translation::Centroid).unwrap();

        for (a, b) in plain.iter().zip(&pre_moved) {
            assert!((a - b).norm() < 1e-8);
        }
        // The fifth point is not part of the fit but still follows the transform.
        assert!((plain[4] - target[4]).norm() < 1e-8);
    }

    #[test]
    fn mirrored_input_still_yields_a_proper_rotation() {
        let target = tetrahedron();
        let mut mirrored: Vec<_> = target.iter().map(|p| Point3::new(p.x, p.y, -p.z)).collect();
        let transform =
            superpose(&target, &mut mirrored, &identity_pairs(5), Translation::Centroid).unwrap();
        assert!((transform.rotation.matrix().determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn origin_anchor_places_designated_point_exactly() {
        let target = moved(&tetrahedron());
        let mut aligned = tetrahedron();
        for p in aligned.iter_mut() {
            p.x += 0.05 * p.y;
        }
        superpose(
            &target,
            &mut aligned,
            &identity_pairs(4),
            Translation::Origin {
                target: 2,
                aligned: 2,
            },
        )
        .unwrap();
        assert!((aligned[2] - target[2]).norm() < 1e-9);
    }

    #[test]
    fn rejects_too_few_pairs_and_bad_indices() {
        let target = tetrahedron();
        let mut aligned = tetrahedron();
        assert_eq!(
            superpose(&target, &mut aligned, &[(0, 0), (1, 1)], Translation::Centroid),
            Err(GeometryError::InsufficientPairs { found: 2 })
        );
        assert_eq!(
            superpose(
                &target,
                &mut aligned,
                &[(0, 0), (1, 1), (2, 9)],
                Translation::Centroid
            ),
            Err(GeometryError::IndexOutOfBounds {
                index: 9,
                len: 5,
                set: "aligned"
            })
        );
        assert_eq!(aligned, tetrahedron());
    }

    #[test]
    fn correspondence_rmsd_uses_only_paired_points() {
        let a = tetrahedron();
        let mut b = tetrahedron();
        b[4].x += 100.0;
        assert!(correspondence_rmsd(&a, &b, &identity_pairs(4)).unwrap() < TOLERANCE);
        assert!(correspondence_rmsd(&a, &b, &[(0, 7)]).is_none());
    }

    #[test]
    fn calculate_rmsd_handles_mismatched_lengths() {
        assert!(calculate_rmsd(&tetrahedron(), &tetrahedron()[..2]).is_none());
        assert!(calculate_rmsd(&[], &[]).is_none());
    }
}
