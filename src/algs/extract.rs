//! Single-topology extraction.
//!
//! Picks every cell block of one topology out of a heterogeneous [`Mesh`],
//! concatenates them together with their region markers, and returns an
//! [`ExtractedMesh`] whose markers are exported under
//! [`ExtractedMesh::MARKER_FIELD`].

use crate::data::cells::CellBlock;
use crate::data::extracted::ExtractedMesh;
use crate::data::mesh::{Mesh, PHYSICAL_FIELD};
use crate::mesh_error::MeshSubsetError;
use crate::topology::cell_type::CellType;

/// Extract all cells of `cell_type` with their physical-group markers.
///
/// Blocks and marker entries of the same topology are concatenated in
/// their original order; nothing is re-sorted and the input is left
/// untouched.
///
/// # Errors
/// - `NoMatchingTopology` if no block has `cell_type`.
/// - `MissingMarkerField` if the mesh carries no physical markers.
/// - `MarkerCellCountMismatch` if the concatenated cell and marker
///   counts differ.
///
/// # Example
/// ```rust
/// # fn try_main() -> Result<(), mesh_subset::mesh_error::MeshSubsetError> {
/// use mesh_subset::algs::extract::extract;
/// use mesh_subset::data::{CellBlock, MarkerBlock, Mesh, Points};
/// use mesh_subset::topology::cell_type::CellType;
///
/// let points = Points::from_xy([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
/// let tri = CellBlock::from_rows(CellType::Triangle, [[0, 1, 2]])?;
/// let mesh = Mesh::new(points, vec![tri])?
///     .with_region_markers(vec![MarkerBlock::new(CellType::Triangle, vec![6])]);
/// let out = extract(&mesh, CellType::Triangle)?;
/// assert_eq!(out.markers(), &[6]);
/// # Ok(())
/// # }
/// # try_main().unwrap();
/// ```
pub fn extract(mesh: &Mesh, cell_type: CellType) -> Result<ExtractedMesh, MeshSubsetError> {
    extract_field(mesh, cell_type, PHYSICAL_FIELD)
}

/// Like [`extract`], with the topology given by name (`"triangle"`, `"line"`, ...).
pub fn extract_by_name(mesh: &Mesh, cell_type: &str) -> Result<ExtractedMesh, MeshSubsetError> {
    extract(mesh, cell_type.parse()?)
}

/// Like [`extract`], reading markers from the cell data field `field`.
pub fn extract_field(
    mesh: &Mesh,
    cell_type: CellType,
    field: &str,
) -> Result<ExtractedMesh, MeshSubsetError> {
    let mut connectivity = Vec::new();
    let mut blocks = 0usize;
    for block in mesh.cells().iter().filter(|b| b.cell_type() == cell_type) {
        connectivity.extend_from_slice(block.connectivity());
        blocks += 1;
    }
    if blocks == 0 {
        return Err(MeshSubsetError::NoMatchingTopology(cell_type));
    }

    let markers: Vec<i32> = mesh
        .marker_blocks(field)?
        .iter()
        .filter(|m| m.cell_type == cell_type)
        .flat_map(|m| m.values.iter().copied())
        .collect();

    let cells = CellBlock::new(cell_type, connectivity)?;
    if cells.len() != markers.len() {
        return Err(MeshSubsetError::MarkerCellCountMismatch {
            cell_type,
            cells: cells.len(),
            markers: markers.len(),
        });
    }

    log::debug!(
        "extracted {} `{cell_type}` cells from {blocks} block(s) using field `{field}`",
        cells.len()
    );
    Ok(ExtractedMesh::from_parts(
        mesh.points().clone(),
        cells,
        markers,
    ))
}
