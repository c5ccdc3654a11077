//! Dropping a degenerate z axis from planar meshes.

use crate::data::mesh::Mesh;

/// Default tolerance below which a z coordinate counts as zero.
pub const DEFAULT_Z_TOLERANCE: f64 = 1e-13;

/// Returns a 2D copy of `mesh` if it is 3D and every `|z| < tol`.
///
/// Returns `None` when the mesh is already 2D or any point lies off the
/// `z = 0` plane; callers keep the original mesh in that case.
pub fn prune_z_0(mesh: &Mesh, tol: f64) -> Option<Mesh> {
    let points = mesh.points();
    if points.dimension() != 3 {
        return None;
    }
    if let Some((index, z)) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p[2]))
        .find(|(_, z)| z.abs() >= tol)
    {
        log::debug!("keeping z axis: point {index} has z = {z}");
        return None;
    }
    Some(mesh.clone().with_points(points.drop_z()))
}

impl Mesh {
    /// In-place [`prune_z_0`]; returns whether the z axis was dropped.
    pub fn prune_z_0(&mut self, tol: f64) -> bool {
        match prune_z_0(self, tol) {
            Some(pruned) => {
                *self = pruned;
                true
            }
            None => false,
        }
    }
}
