//! Heterogeneous mesh container as produced by a mesh generator or file reader.

use crate::data::cells::{CellBlock, MarkerBlock};
use crate::data::points::Points;
use crate::mesh_error::MeshSubsetError;
use crate::topology::cell_type::CellType;
use std::collections::BTreeMap;

/// Cell data field holding the physical-group marker of each cell.
pub const PHYSICAL_FIELD: &str = "gmsh:physical";
/// Cell data field holding the elementary entity tag of each cell.
pub const GEOMETRICAL_FIELD: &str = "gmsh:geometrical";

/// A named physical group: its integer tag and topological dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhysicalGroup {
    pub tag: i32,
    pub dimension: u8,
}

/// Points, an ordered list of cell blocks, and per-block marker fields.
///
/// # Invariants
/// - every connectivity index is `< points.len()` (checked by [`Mesh::new`]).
///
/// Marker counts are *not* checked here; a mismatch between cells and
/// markers is reported when a topology is extracted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawMesh")]
pub struct Mesh {
    points: Points,
    cells: Vec<CellBlock>,
    cell_data: BTreeMap<String, Vec<MarkerBlock>>,
    field_data: BTreeMap<String, PhysicalGroup>,
}

#[derive(serde::Deserialize)]
struct RawMesh {
    points: Points,
    cells: Vec<CellBlock>,
    #[serde(default)]
    cell_data: BTreeMap<String, Vec<MarkerBlock>>,
    #[serde(default)]
    field_data: BTreeMap<String, PhysicalGroup>,
}

impl TryFrom<RawMesh> for Mesh {
    type Error = MeshSubsetError;

    fn try_from(raw: RawMesh) -> Result<Self, Self::Error> {
        let mut mesh = Self::new(raw.points, raw.cells)?;
        mesh.cell_data = raw.cell_data;
        mesh.field_data = raw.field_data;
        Ok(mesh)
    }
}

impl Mesh {
    /// Assemble a mesh, validating that every cell references an existing point.
    pub fn new(points: Points, cells: Vec<CellBlock>) -> Result<Self, MeshSubsetError> {
        let num_points = points.len();
        for block in &cells {
            if let Some(index) = block.max_point_index().filter(|&i| i >= num_points) {
                return Err(MeshSubsetError::PointIndexOutOfRange {
                    cell_type: block.cell_type(),
                    index,
                    num_points,
                });
            }
        }
        Ok(Self {
            points,
            cells,
            cell_data: BTreeMap::new(),
            field_data: BTreeMap::new(),
        })
    }

    /// Attach marker blocks under `field`, replacing any previous entry.
    pub fn with_cell_data(mut self, field: impl Into<String>, blocks: Vec<MarkerBlock>) -> Self {
        self.cell_data.insert(field.into(), blocks);
        self
    }

    /// Attach marker blocks under [`PHYSICAL_FIELD`].
    pub fn with_region_markers(self, blocks: Vec<MarkerBlock>) -> Self {
        self.with_cell_data(PHYSICAL_FIELD, blocks)
    }

    /// Attach a named physical group.
    pub fn with_physical_group(
        mut self,
        name: impl Into<String>,
        tag: i32,
        dimension: u8,
    ) -> Self {
        self.field_data
            .insert(name.into(), PhysicalGroup { tag, dimension });
        self
    }

    #[inline]
    pub fn points(&self) -> &Points {
        &self.points
    }

    #[inline]
    pub fn cells(&self) -> &[CellBlock] {
        &self.cells
    }

    #[inline]
    pub fn cell_data(&self) -> &BTreeMap<String, Vec<MarkerBlock>> {
        &self.cell_data
    }

    #[inline]
    pub fn field_data(&self) -> &BTreeMap<String, PhysicalGroup> {
        &self.field_data
    }

    /// Marker blocks stored under `field`.
    ///
    /// # Errors
    /// `MissingMarkerField` when the field is absent.
    pub fn marker_blocks(&self, field: &str) -> Result<&[MarkerBlock], MeshSubsetError> {
        self.cell_data
            .get(field)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshSubsetError::MissingMarkerField(field.to_string()))
    }

    /// Physical-group marker blocks.
    pub fn region_markers(&self) -> Result<&[MarkerBlock], MeshSubsetError> {
        self.marker_blocks(PHYSICAL_FIELD)
    }

    /// Distinct cell types in order of first appearance.
    pub fn cell_types(&self) -> Vec<CellType> {
        let mut seen = Vec::new();
        for block in &self.cells {
            if !seen.contains(&block.cell_type()) {
                seen.push(block.cell_type());
            }
        }
        seen
    }

    /// Total number of cells of `cell_type` across all blocks.
    pub fn num_cells(&self, cell_type: CellType) -> usize {
        self.cells
            .iter()
            .filter(|b| b.cell_type() == cell_type)
            .map(CellBlock::len)
            .sum()
    }

    /// Replace the point set; used by post-processing that only changes coordinates.
    pub(crate) fn with_points(mut self, points: Points) -> Self {
        debug_assert_eq!(points.len(), self.points.len());
        self.points = points;
        self
    }
}
