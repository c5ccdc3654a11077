//! # mesh-subset
//!
//! mesh-subset turns meshes produced by a geometry/meshing kernel (Gmsh)
//! into single-cell-type meshes tagged with integer region markers, ready
//! for import by finite-element solvers through XDMF.
//!
//! ## Features
//! - Mesh values with shared points, ordered cell blocks and per-block marker fields
//! - Topology extraction that concatenates repeated blocks and their markers in order
//! - Gmsh `.msh` reader (ASCII v2.2 and v4.1) with physical and elementary tags
//! - XDMF writer/reader using the `name_to_read` marker field
//! - Named region marker tables passed as explicit configuration
//!
//! ## Usage
//! ```rust,no_run
//! # fn try_main() -> Result<(), mesh_subset::mesh_error::MeshSubsetError> {
//! use mesh_subset::prelude::*;
//!
//! let mesh = GmshReader.read_path("mesh.msh")?;
//! let triangles = extract(&mesh, CellType::Triangle)?;
//! let facets = extract(&mesh, CellType::Line)?;
//! XdmfWriter::default().write_path("mesh2D.xdmf", &triangles)?;
//! XdmfWriter::default().write_path("mf2D.xdmf", &facets)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Determinism
//!
//! Extraction is a pure function of its input: blocks are visited in
//! storage order and never re-sorted, so identical meshes always produce
//! identical output.

pub mod algs;
pub mod data;
pub mod io;
pub mod mesh_error;
pub mod topology;

static_assertions::assert_impl_all!(data::Mesh: Send, Sync, Clone);
static_assertions::assert_impl_all!(data::ExtractedMesh: Send, Sync, Clone);
static_assertions::assert_impl_all!(mesh_error::MeshSubsetError: Send, Sync, std::error::Error);

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::convert::{ConvertOptions, convert, convert_file, prepare};
    pub use crate::algs::extract::{extract, extract_by_name, extract_field};
    pub use crate::algs::prune::prune_z_0;
    pub use crate::data::{CellBlock, ExtractedMesh, MarkerBlock, Mesh, PHYSICAL_FIELD, Points};
    pub use crate::io::gmsh::GmshReader;
    pub use crate::io::xdmf::{XdmfReader, XdmfWriter};
    pub use crate::io::{MeshReader, MeshWriter};
    pub use crate::mesh_error::MeshSubsetError;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::markers::RegionMarkers;
}
