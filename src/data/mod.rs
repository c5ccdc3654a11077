//! Data module: points, cell blocks and mesh containers.

pub mod cells;
pub mod extracted;
pub mod mesh;
pub mod points;

pub use cells::{CellBlock, MarkerBlock};
pub use extracted::ExtractedMesh;
pub use mesh::{GEOMETRICAL_FIELD, Mesh, PHYSICAL_FIELD, PhysicalGroup};
pub use points::Points;
