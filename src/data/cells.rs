//! Homogeneous cell blocks and their per-cell marker blocks.

use crate::mesh_error::MeshSubsetError;
use crate::topology::cell_type::CellType;

/// A group of cells sharing one topology.
///
/// Connectivity is stored flat: cell `i` is
/// `connectivity[i * w..(i + 1) * w]` with `w = cell_type.num_vertices()`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCellBlock")]
pub struct CellBlock {
    cell_type: CellType,
    connectivity: Vec<usize>,
}

#[derive(serde::Deserialize)]
struct RawCellBlock {
    cell_type: CellType,
    connectivity: Vec<usize>,
}

impl TryFrom<RawCellBlock> for CellBlock {
    type Error = MeshSubsetError;

    fn try_from(raw: RawCellBlock) -> Result<Self, Self::Error> {
        Self::new(raw.cell_type, raw.connectivity)
    }
}

impl CellBlock {
    /// Wrap a flat connectivity table.
    ///
    /// # Errors
    /// `InvalidConnectivity` if the length is not a multiple of the
    /// topology's vertex count.
    pub fn new(cell_type: CellType, connectivity: Vec<usize>) -> Result<Self, MeshSubsetError> {
        let width = cell_type.num_vertices();
        if connectivity.len() % width != 0 {
            return Err(MeshSubsetError::InvalidConnectivity {
                cell_type,
                len: connectivity.len(),
                width,
            });
        }
        Ok(Self {
            cell_type,
            connectivity,
        })
    }

    /// Build a block from per-cell index rows, checking each row's width.
    pub fn from_rows<I, R>(cell_type: CellType, rows: I) -> Result<Self, MeshSubsetError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[usize]>,
    {
        let width = cell_type.num_vertices();
        let mut connectivity = Vec::new();
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MeshSubsetError::InvalidConnectivity {
                    cell_type,
                    len: row.len(),
                    width,
                });
            }
            connectivity.extend_from_slice(row);
        }
        Ok(Self {
            cell_type,
            connectivity,
        })
    }

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Number of cells in the block.
    #[inline]
    pub fn len(&self) -> usize {
        self.connectivity.len() / self.cell_type.num_vertices()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connectivity.is_empty()
    }

    /// Point indices of cell `index`.
    pub fn cell(&self, index: usize) -> Option<&[usize]> {
        let width = self.cell_type.num_vertices();
        let start = index.checked_mul(width)?;
        self.connectivity.get(start..start + width)
    }

    /// Iterate cells in block order.
    pub fn cells(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.connectivity.chunks_exact(self.cell_type.num_vertices())
    }

    #[inline]
    pub fn connectivity(&self) -> &[usize] {
        &self.connectivity
    }

    /// Largest referenced point index, if any.
    pub fn max_point_index(&self) -> Option<usize> {
        self.connectivity.iter().copied().max()
    }
}

/// Per-cell integer markers for one cell block.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MarkerBlock {
    pub cell_type: CellType,
    pub values: Vec<i32>,
}

impl MarkerBlock {
    pub fn new(cell_type: CellType, values: Vec<i32>) -> Self {
        Self { cell_type, values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
