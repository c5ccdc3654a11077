//! XDMF (XML) writer/reader for single-topology meshes.
//!
//! The writer emits an XDMF 3 uniform grid with inline XML `DataItem`
//! payloads: a `Geometry` (`XY` or `XYZ`), a `Topology` of one cell type,
//! and one cell-centred scalar `Attribute` named
//! [`ExtractedMesh::MARKER_FIELD`]. The reader accepts the same subset,
//! which is what finite-element solvers import as a mesh plus a cell
//! (or facet) marker function.
//!
//! HDF5-backed data items are not supported.

use crate::data::cells::CellBlock;
use crate::data::extracted::ExtractedMesh;
use crate::data::points::Points;
use crate::io::{MeshReader, MeshWriter};
use crate::mesh_error::MeshSubsetError;
use crate::topology::cell_type::CellType;
use itertools::Itertools;
use roxmltree::{Document, Node};
use std::io::{Read, Write};
use std::str::FromStr;

const DEFAULT_GRID_NAME: &str = "Grid";

#[derive(Debug, Clone)]
pub struct XdmfWriter {
    grid_name: String,
}

impl Default for XdmfWriter {
    fn default() -> Self {
        Self {
            grid_name: DEFAULT_GRID_NAME.to_string(),
        }
    }
}

impl XdmfWriter {
    /// Set the `Name` attribute of the written grid.
    pub fn with_grid_name(mut self, name: impl Into<String>) -> Self {
        self.grid_name = name.into();
        self
    }

    pub fn grid_name(&self) -> &str {
        &self.grid_name
    }

    fn escape(raw: &str) -> String {
        raw.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    fn write_data_item<'a, W, I, T>(
        writer: &mut W,
        indent: &str,
        dimensions: &str,
        number_type: &str,
        rows: I,
    ) -> Result<(), MeshSubsetError>
    where
        W: Write,
        I: IntoIterator<Item = &'a [T]>,
        T: std::fmt::Display + 'a,
    {
        writeln!(
            writer,
            "{indent}<DataItem Dimensions=\"{dimensions}\" NumberType=\"{number_type}\" Precision=\"8\" Format=\"XML\">"
        )?;
        for row in rows {
            writeln!(writer, "{indent}  {}", row.iter().join(" "))?;
        }
        writeln!(writer, "{indent}</DataItem>")?;
        Ok(())
    }
}

impl MeshWriter for XdmfWriter {
    type Input = ExtractedMesh;

    fn write<W: Write>(&self, mut writer: W, mesh: &ExtractedMesh) -> Result<(), MeshSubsetError> {
        let points = mesh.points();
        let cells = mesh.cells();
        let cell_type = cells.cell_type();
        let geometry_type = match points.dimension() {
            2 => "XY",
            3 => "XYZ",
            dim => return Err(MeshSubsetError::InvalidPointDimension(dim)),
        };

        writeln!(writer, "<?xml version=\"1.0\"?>")?;
        writeln!(writer, "<Xdmf Version=\"3.0\">")?;
        writeln!(writer, "  <Domain>")?;
        writeln!(
            writer,
            "    <Grid Name=\"{}\" GridType=\"Uniform\">",
            Self::escape(&self.grid_name)
        )?;

        writeln!(writer, "      <Geometry GeometryType=\"{geometry_type}\">")?;
        Self::write_data_item(
            &mut writer,
            "        ",
            &format!("{} {}", points.len(), points.dimension()),
            "Float",
            points.iter(),
        )?;
        writeln!(writer, "      </Geometry>")?;

        let nodes_per_element = match cell_type {
            CellType::Vertex | CellType::Line => {
                format!(" NodesPerElement=\"{}\"", cell_type.num_vertices())
            }
            _ => String::new(),
        };
        writeln!(
            writer,
            "      <Topology TopologyType=\"{}\" NumberOfElements=\"{}\"{nodes_per_element}>",
            cell_type.xdmf_topology(),
            cells.len()
        )?;
        Self::write_data_item(
            &mut writer,
            "        ",
            &format!("{} {}", cells.len(), cell_type.num_vertices()),
            "Int",
            cells.cells(),
        )?;
        writeln!(writer, "      </Topology>")?;

        writeln!(
            writer,
            "      <Attribute Name=\"{}\" AttributeType=\"Scalar\" Center=\"Cell\">",
            ExtractedMesh::MARKER_FIELD
        )?;
        Self::write_data_item(
            &mut writer,
            "        ",
            &mesh.len().to_string(),
            "Int",
            mesh.markers().chunks(1),
        )?;
        writeln!(writer, "      </Attribute>")?;

        writeln!(writer, "    </Grid>")?;
        writeln!(writer, "  </Domain>")?;
        writeln!(writer, "</Xdmf>")?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct XdmfReader;

#[derive(Clone, Debug)]
struct DataItem<'a> {
    dimensions: Vec<usize>,
    text: &'a str,
}

impl DataItem<'_> {
    fn values<T: FromStr>(&self) -> Result<Vec<T>, MeshSubsetError> {
        let values = self
            .text
            .split_whitespace()
            .map(|v| {
                v.parse::<T>()
                    .map_err(|_| MeshSubsetError::MeshIoParse(format!("invalid value {v}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let expected = self
            .dimensions
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| {
                MeshSubsetError::MeshIoParse(format!(
                    "DataItem dimensions {:?} overflow",
                    self.dimensions
                ))
            })?;
        if !self.dimensions.is_empty() && expected != values.len() {
            return Err(MeshSubsetError::MeshIoParse(format!(
                "DataItem declares {expected} values, found {}",
                values.len()
            )));
        }
        Ok(values)
    }
}

impl XdmfReader {
    fn child<'a, 'input>(
        node: Node<'a, 'input>,
        tag: &str,
    ) -> Result<Node<'a, 'input>, MeshSubsetError> {
        node.descendants()
            .find(|n| n.has_tag_name(tag))
            .ok_or_else(|| MeshSubsetError::MeshIoParse(format!("missing {tag}")))
    }

    fn parse_data_item<'a>(node: Node<'a, '_>) -> Result<DataItem<'a>, MeshSubsetError> {
        let item = Self::child(node, "DataItem")?;
        let format = item.attribute("Format").unwrap_or("XML");
        if !format.eq_ignore_ascii_case("XML") {
            return Err(MeshSubsetError::MeshIoParse(format!(
                "unsupported DataItem format {format}"
            )));
        }
        let dimensions = item
            .attribute("Dimensions")
            .unwrap_or("")
            .split_whitespace()
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| MeshSubsetError::MeshIoParse(format!("invalid dimension {v}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DataItem {
            dimensions,
            text: item.text().unwrap_or(""),
        })
    }
}

impl MeshReader for XdmfReader {
    type Output = ExtractedMesh;

    fn read<R: Read>(&self, mut reader: R) -> Result<ExtractedMesh, MeshSubsetError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let doc = Document::parse(&input)
            .map_err(|err| MeshSubsetError::MeshIoParse(format!("XML parse error: {err}")))?;
        let grid = Self::child(doc.root(), "Grid")?;

        let geometry = Self::child(grid, "Geometry")?;
        let dimension = match geometry.attribute("GeometryType").unwrap_or("XYZ") {
            "XY" => 2,
            "XYZ" => 3,
            other => {
                return Err(MeshSubsetError::MeshIoParse(format!(
                    "unsupported GeometryType {other}"
                )));
            }
        };
        let coords = Self::parse_data_item(geometry)?.values::<f64>()?;
        let points = Points::try_new(dimension, coords)?;

        let topology = Self::child(grid, "Topology")?;
        let topology_type = topology
            .attribute("TopologyType")
            .ok_or_else(|| MeshSubsetError::MeshIoParse("missing TopologyType".into()))?;
        let nodes_per_element = topology
            .attribute("NodesPerElement")
            .map(|v| {
                v.parse::<usize>().map_err(|_| {
                    MeshSubsetError::MeshIoParse(format!("invalid NodesPerElement {v}"))
                })
            })
            .transpose()?;
        let cell_type = CellType::from_xdmf(topology_type, nodes_per_element).ok_or_else(|| {
            MeshSubsetError::MeshIoParse(format!("unsupported TopologyType {topology_type}"))
        })?;
        let connectivity = Self::parse_data_item(topology)?.values::<usize>()?;
        let cells = CellBlock::new(cell_type, connectivity)?;

        let attribute = grid
            .descendants()
            .filter(|n| n.has_tag_name("Attribute"))
            .find(|n| n.attribute("Name") == Some(ExtractedMesh::MARKER_FIELD))
            .ok_or_else(|| {
                MeshSubsetError::MissingMarkerField(ExtractedMesh::MARKER_FIELD.to_string())
            })?;
        if attribute.attribute("Center").unwrap_or("Node") != "Cell" {
            return Err(MeshSubsetError::MeshIoParse(format!(
                "attribute {} is not cell-centred",
                ExtractedMesh::MARKER_FIELD
            )));
        }
        let markers = Self::parse_data_item(attribute)?.values::<i32>()?;

        ExtractedMesh::try_new(points, cells, markers)
    }
}
