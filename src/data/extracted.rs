//! Single-topology mesh with one marker array, ready for export.

use crate::data::cells::CellBlock;
use crate::data::points::Points;
use crate::mesh_error::MeshSubsetError;
use crate::topology::cell_type::CellType;
use std::collections::BTreeMap;

/// A mesh holding exactly one cell block and one marker per cell.
///
/// The point set is the full, unfiltered point set of the source mesh;
/// points not referenced by the retained cells are kept.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawExtractedMesh")]
pub struct ExtractedMesh {
    points: Points,
    cells: CellBlock,
    markers: Vec<i32>,
}

#[derive(serde::Deserialize)]
struct RawExtractedMesh {
    points: Points,
    cells: CellBlock,
    markers: Vec<i32>,
}

impl TryFrom<RawExtractedMesh> for ExtractedMesh {
    type Error = MeshSubsetError;

    fn try_from(raw: RawExtractedMesh) -> Result<Self, Self::Error> {
        Self::try_new(raw.points, raw.cells, raw.markers)
    }
}

impl ExtractedMesh {
    /// Field name under which the markers are exported. Solver import
    /// code reads this exact key.
    pub const MARKER_FIELD: &'static str = "name_to_read";

    /// Assemble an extracted mesh, checking cell/marker counts and point indices.
    pub fn try_new(
        points: Points,
        cells: CellBlock,
        markers: Vec<i32>,
    ) -> Result<Self, MeshSubsetError> {
        if cells.len() != markers.len() {
            return Err(MeshSubsetError::MarkerCellCountMismatch {
                cell_type: cells.cell_type(),
                cells: cells.len(),
                markers: markers.len(),
            });
        }
        if let Some(index) = cells.max_point_index().filter(|&i| i >= points.len()) {
            return Err(MeshSubsetError::PointIndexOutOfRange {
                cell_type: cells.cell_type(),
                index,
                num_points: points.len(),
            });
        }
        Ok(Self {
            points,
            cells,
            markers,
        })
    }

    /// Counts and indices already checked by the caller.
    pub(crate) fn from_parts(points: Points, cells: CellBlock, markers: Vec<i32>) -> Self {
        debug_assert_eq!(cells.len(), markers.len());
        Self {
            points,
            cells,
            markers,
        }
    }

    #[inline]
    pub fn points(&self) -> &Points {
        &self.points
    }

    #[inline]
    pub fn cells(&self) -> &CellBlock {
        &self.cells
    }

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cells.cell_type()
    }

    #[inline]
    pub fn markers(&self) -> &[i32] {
        &self.markers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// `(field name, markers)` as written to the interchange file.
    pub fn cell_data(&self) -> (&'static str, &[i32]) {
        (Self::MARKER_FIELD, &self.markers)
    }

    /// Distinct marker values, sorted ascending.
    pub fn marker_values(&self) -> Vec<i32> {
        let mut values = self.markers.clone();
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Number of cells carrying `value`.
    pub fn marker_count(&self, value: i32) -> usize {
        self.markers.iter().filter(|&&m| m == value).count()
    }

    /// Cell count per marker value.
    pub fn marker_histogram(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for &m in &self.markers {
            *counts.entry(m).or_insert(0) += 1;
        }
        counts
    }

    /// Cells carrying `value`, in block order.
    pub fn cells_with_marker(&self, value: i32) -> impl Iterator<Item = &[usize]> + '_ {
        self.cells
            .cells()
            .zip(self.markers.iter())
            .filter_map(move |(cell, &m)| (m == value).then_some(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_lines() -> ExtractedMesh {
        let points = Points::from_xy([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let cells =
            CellBlock::from_rows(CellType::Line, [[0, 1], [1, 2], [2, 3], [3, 0]]).unwrap();
        ExtractedMesh::try_new(points, cells, vec![1, 3, 2, 3]).unwrap()
    }

    #[test]
    fn try_new_checks_counts() {
        let points = Points::from_xy([[0.0, 0.0], [1.0, 0.0]]);
        let cells = CellBlock::from_rows(CellType::Line, [[0, 1]]).unwrap();
        let err = ExtractedMesh::try_new(points, cells, vec![1, 2]).unwrap_err();
        assert!(matches!(
            err,
            MeshSubsetError::MarkerCellCountMismatch {
                cells: 1,
                markers: 2,
                ..
            }
        ));
    }

    #[test]
    fn deserialize_rechecks_invariants() {
        let partial_cell = r#"{
            "points": {"dimension": 2, "data": [0.0, 0.0, 1.0, 0.0, 0.0, 1.0]},
            "cells": {"cell_type": "triangle", "connectivity": [0, 1]},
            "markers": [1, 2, 3]
        }"#;
        assert!(serde_json::from_str::<ExtractedMesh>(partial_cell).is_err());

        let extra_markers = r#"{
            "points": {"dimension": 2, "data": [0.0, 0.0, 1.0, 0.0, 0.0, 1.0]},
            "cells": {"cell_type": "triangle", "connectivity": [0, 1, 2]},
            "markers": [1, 2, 3]
        }"#;
        let err = serde_json::from_str::<ExtractedMesh>(extra_markers).unwrap_err();
        assert!(err.to_string().contains("1 cells but 3 region markers"), "{err}");

        let dangling = r#"{
            "points": {"dimension": 2, "data": [0.0, 0.0, 1.0, 0.0, 0.0, 1.0]},
            "cells": {"cell_type": "triangle", "connectivity": [0, 1, 9]},
            "markers": [1]
        }"#;
        assert!(serde_json::from_str::<ExtractedMesh>(dangling).is_err());

        let mesh = unit_square_lines();
        let json = serde_json::to_string(&mesh).unwrap();
        assert_eq!(serde_json::from_str::<ExtractedMesh>(&json).unwrap(), mesh);
    }

    #[test]
    fn marker_queries() {
        let mesh = unit_square_lines();
        assert_eq!(mesh.cell_data().0, "name_to_read");
        assert_eq!(mesh.marker_values(), vec![1, 2, 3]);
        assert_eq!(mesh.marker_count(3), 2);
        assert_eq!(mesh.marker_histogram().get(&1), Some(&1));
        let walls: Vec<_> = mesh.cells_with_marker(3).collect();
        assert_eq!(walls, vec![&[1, 2][..], &[3, 0][..]]);
    }
}
