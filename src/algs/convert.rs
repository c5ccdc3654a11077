//! `.msh` → XDMF conversion pipeline.
//!
//! Read a Gmsh mesh, optionally drop a degenerate z axis, extract one
//! topology with its markers, and write the result as XDMF.

use crate::algs::extract::extract_field;
use crate::algs::prune::{DEFAULT_Z_TOLERANCE, prune_z_0};
use crate::data::extracted::ExtractedMesh;
use crate::data::mesh::{Mesh, PHYSICAL_FIELD};
use crate::io::gmsh::GmshReader;
use crate::io::xdmf::XdmfWriter;
use crate::io::{MeshReader, MeshWriter};
use crate::mesh_error::MeshSubsetError;
use crate::topology::cell_type::CellType;
use crate::topology::markers::RegionMarkers;
use std::io::Write;
use std::path::Path;

/// Options for [`convert`] and [`convert_file`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Drop the z coordinate when every point lies on `z = 0`.
    pub prune_z_0: bool,
    /// Tolerance for the `z = 0` test.
    pub z_tolerance: f64,
    /// Cell data field the markers are read from.
    pub marker_field: String,
    /// `Name` of the written XDMF grid.
    pub grid_name: String,
    /// When set, every extracted marker must belong to this table.
    pub regions: Option<RegionMarkers>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            prune_z_0: false,
            z_tolerance: DEFAULT_Z_TOLERANCE,
            marker_field: PHYSICAL_FIELD.to_string(),
            grid_name: "Grid".to_string(),
            regions: None,
        }
    }
}

impl ConvertOptions {
    pub fn with_prune_z_0(mut self, prune: bool) -> Self {
        self.prune_z_0 = prune;
        self
    }

    pub fn with_marker_field(mut self, field: impl Into<String>) -> Self {
        self.marker_field = field.into();
        self
    }

    pub fn with_regions(mut self, regions: RegionMarkers) -> Self {
        self.regions = Some(regions);
        self
    }
}

/// Prune, extract and validate `cell_type` without writing anything.
pub fn prepare(
    mesh: &Mesh,
    cell_type: CellType,
    opts: &ConvertOptions,
) -> Result<ExtractedMesh, MeshSubsetError> {
    let pruned = if opts.prune_z_0 {
        prune_z_0(mesh, opts.z_tolerance)
    } else {
        None
    };
    if opts.prune_z_0 && pruned.is_none() {
        log::warn!("prune_z_0 requested but mesh is not planar; keeping z");
    }
    let source = pruned.as_ref().unwrap_or(mesh);

    let extracted = extract_field(source, cell_type, &opts.marker_field)?;
    if let Some(regions) = &opts.regions {
        regions.validate(&extracted)?;
    }
    Ok(extracted)
}

fn writer_for(opts: &ConvertOptions) -> XdmfWriter {
    XdmfWriter::default().with_grid_name(opts.grid_name.clone())
}

fn log_summary(extracted: &ExtractedMesh, opts: &ConvertOptions) {
    let summary = match &opts.regions {
        Some(regions) => regions.summarize(extracted),
        None => extracted
            .marker_histogram()
            .into_iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect(),
    };
    log::info!(
        "wrote {} `{}` cells on {} points, markers {:?}",
        extracted.len(),
        extracted.cell_type(),
        extracted.points().len(),
        summary
    );
}

/// Extract `cell_type` from `mesh` and write it as XDMF into `writer`.
///
/// Nothing is written when extraction or validation fails. Returns the
/// extracted mesh that was written.
pub fn convert<W: Write>(
    mesh: &Mesh,
    cell_type: CellType,
    writer: W,
    opts: &ConvertOptions,
) -> Result<ExtractedMesh, MeshSubsetError> {
    let extracted = prepare(mesh, cell_type, opts)?;
    writer_for(opts).write(writer, &extracted)?;
    log_summary(&extracted, opts);
    Ok(extracted)
}

/// Read a Gmsh file at `msh_path`, convert `cell_type`, and write XDMF to `xdmf_path`.
///
/// `xdmf_path` is only created once extraction has succeeded, so a failed
/// conversion leaves an existing file untouched.
pub fn convert_file<P, Q>(
    msh_path: P,
    cell_type: CellType,
    xdmf_path: Q,
    opts: &ConvertOptions,
) -> Result<ExtractedMesh, MeshSubsetError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mesh = GmshReader.read_path(msh_path.as_ref())?;
    let extracted = prepare(&mesh, cell_type, opts)?;
    writer_for(opts).write_path(xdmf_path.as_ref(), &extracted)?;
    log_summary(&extracted, opts);
    log::debug!(
        "converted {} -> {}",
        msh_path.as_ref().display(),
        xdmf_path.as_ref().display()
    );
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: ConvertOptions = serde_json::from_str(r#"{"prune_z_0": true}"#).unwrap();
        assert!(opts.prune_z_0);
        assert_eq!(opts.z_tolerance, DEFAULT_Z_TOLERANCE);
        assert_eq!(opts.marker_field, "gmsh:physical");
        assert_eq!(opts.grid_name, "Grid");
        assert!(opts.regions.is_none());
    }

    #[test]
    fn options_with_regions() {
        let opts: ConvertOptions =
            serde_json::from_str(r#"{"regions": {"inflow": 1, "outflow": 2}}"#).unwrap();
        assert_eq!(opts.regions.unwrap().get("inflow"), Some(1));
    }
}
