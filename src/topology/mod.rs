//! Topology vocabulary: cell types and region markers.

pub mod cell_type;
pub mod markers;

pub use cell_type::CellType;
pub use markers::RegionMarkers;
