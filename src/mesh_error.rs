//! MeshSubsetError: unified error type for mesh-subset public APIs.
//!
//! Every fallible operation in the crate (construction of mesh values,
//! extraction, file I/O) reports through this enum instead of panicking.

use crate::topology::cell_type::CellType;
use thiserror::Error;

/// Unified error type for mesh-subset operations.
#[derive(Debug, Error)]
pub enum MeshSubsetError {
    /// No cell block of the requested topology exists in the mesh.
    #[error("no cell block of topology `{0}` in mesh")]
    NoMatchingTopology(CellType),
    /// Cell and marker counts disagree for a topology.
    #[error(
        "topology `{cell_type}`: {cells} cells but {markers} region markers (cell/marker count mismatch)"
    )]
    MarkerCellCountMismatch {
        cell_type: CellType,
        cells: usize,
        markers: usize,
    },
    /// A topology name outside the known cell vocabulary.
    #[error("unknown cell type `{0}`")]
    UnknownCellType(String),
    /// The requested marker field is not present in the mesh cell data.
    #[error("marker field `{0}` not found in cell data")]
    MissingMarkerField(String),
    /// Connectivity length is not a multiple of the topology's vertex count.
    #[error("connectivity of `{cell_type}` has {len} indices, not a multiple of {width}")]
    InvalidConnectivity {
        cell_type: CellType,
        len: usize,
        width: usize,
    },
    /// A cell references a point outside the point set.
    #[error("`{cell_type}` cell references point {index}, but mesh has {num_points} points")]
    PointIndexOutOfRange {
        cell_type: CellType,
        index: usize,
        num_points: usize,
    },
    /// Points must be embedded in 2 or 3 dimensions.
    #[error("unsupported point dimension {0} (expected 2 or 3)")]
    InvalidPointDimension(usize),
    /// Flat coordinate buffer length is not a multiple of the dimension.
    #[error("coordinate buffer of length {len} is not a multiple of dimension {dim}")]
    InvalidCoordinateLength { len: usize, dim: usize },
    /// A marker value is absent from the region marker table.
    #[error("`{cell_type}` marker {value} is not a known region marker")]
    UnknownMarker { cell_type: CellType, value: i32 },
    /// Malformed or unsupported mesh file content.
    #[error("mesh I/O parse error: {0}")]
    MeshIoParse(String),
    /// Underlying reader/writer failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
