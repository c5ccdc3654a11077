//! Gmsh `.msh` reader.
//!
//! # Supported format
//! - ASCII `.msh` versions **2.2** and **4.1**.
//! - Element types: 1 (line), 2 (triangle), 3 (quad), 4 (tet), 5 (hex),
//!   6 (prism), 7 (pyramid), 15 (point).
//!
//! # Cell blocks and markers
//! - v2.2: consecutive elements of the same type form one block. The first
//!   element tag is the physical marker, the second the elementary entity.
//! - v4.1: every `$Elements` entity block is one block, so a topology may
//!   appear in several blocks. The physical marker is the first physical
//!   tag of the owning entity in `$Entities` (0 when the entity has none).
//!
//! Markers land in the [`PHYSICAL_FIELD`] and [`GEOMETRICAL_FIELD`] cell
//! data fields; `$PhysicalNames` become the mesh's physical groups.
//!
//! # Limitations
//! - Binary files are not supported.
//! - Higher-order elements are not supported.
//! - Coordinates are always read as 3D `(x, y, z)` tuples; see
//!   [`prune_z_0`](crate::algs::prune::prune_z_0) for planar meshes.

use crate::data::cells::{CellBlock, MarkerBlock};
use crate::data::mesh::{GEOMETRICAL_FIELD, Mesh, PHYSICAL_FIELD, PhysicalGroup};
use crate::data::points::Points;
use crate::io::MeshReader;
use crate::mesh_error::MeshSubsetError;
use crate::topology::cell_type::CellType;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::str::FromStr;

/// Gmsh `.msh` reader for ASCII v2.2 and v4.1 meshes.
#[derive(Debug, Default, Clone)]
pub struct GmshReader;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MshVersion {
    V2,
    V4,
}

/// Elements of one block before node tags are resolved to indices.
#[derive(Debug)]
struct RawBlock {
    cell_type: CellType,
    node_tags: Vec<u64>,
    physical: Vec<i32>,
    geometrical: Vec<i32>,
}

impl RawBlock {
    fn new(cell_type: CellType) -> Self {
        Self {
            cell_type,
            node_tags: Vec::new(),
            physical: Vec::new(),
            geometrical: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct RawMesh {
    node_tags: Vec<u64>,
    coords: Vec<[f64; 3]>,
    blocks: Vec<RawBlock>,
    physical_names: BTreeMap<String, PhysicalGroup>,
    /// `(dim, entity tag)` → physical tags (v4 only).
    entities: HashMap<(u8, i32), Vec<i32>>,
}

fn parse_err(msg: impl Into<String>) -> MeshSubsetError {
    MeshSubsetError::MeshIoParse(msg.into())
}

fn next_line<'a, I>(lines: &mut I, what: &str) -> Result<&'a str, MeshSubsetError>
where
    I: Iterator<Item = &'a str>,
{
    lines.next().ok_or_else(|| parse_err(format!("missing {what}")))
}

fn next_token<'a, I, T>(tokens: &mut I, what: &str) -> Result<T, MeshSubsetError>
where
    I: Iterator<Item = &'a str>,
    T: FromStr,
{
    let raw = tokens
        .next()
        .ok_or_else(|| parse_err(format!("missing {what}")))?;
    raw.parse::<T>()
        .map_err(|_| parse_err(format!("invalid {what}: {raw}")))
}

fn expect_end<'a, I>(lines: &mut I, marker: &str) -> Result<(), MeshSubsetError>
where
    I: Iterator<Item = &'a str>,
{
    let end = next_line(lines, marker)?;
    if end != marker {
        return Err(parse_err(format!("expected {marker}, found `{end}`")));
    }
    Ok(())
}

impl GmshReader {
    fn parse_version(line: &str) -> Result<MshVersion, MeshSubsetError> {
        let mut parts = line.split_whitespace();
        let version = parts
            .next()
            .ok_or_else(|| parse_err("missing mesh format version"))?;
        let file_type = parts
            .next()
            .ok_or_else(|| parse_err("missing mesh format type"))?;
        if file_type != "0" {
            return Err(parse_err("binary .msh files are not supported"));
        }
        match version {
            v if v.starts_with("2.") => Ok(MshVersion::V2),
            "4.1" => Ok(MshVersion::V4),
            v => Err(parse_err(format!("unsupported gmsh version: {v}"))),
        }
    }

    fn cell_type(code: u32) -> Result<CellType, MeshSubsetError> {
        CellType::from_gmsh(code)
            .ok_or_else(|| parse_err(format!("unsupported element type: {code}")))
    }

    fn parse_physical_names<'a, I>(lines: &mut I, raw: &mut RawMesh) -> Result<(), MeshSubsetError>
    where
        I: Iterator<Item = &'a str>,
    {
        let count: usize = next_token(
            &mut next_line(lines, "physical name count")?.split_whitespace(),
            "physical name count",
        )?;
        for _ in 0..count {
            let line = next_line(lines, "physical name")?;
            let mut parts = line.splitn(3, char::is_whitespace);
            let dimension: u8 = next_token(&mut parts, "physical dimension")?;
            let tag: i32 = next_token(&mut parts, "physical tag")?;
            let name = parts
                .next()
                .map(|n| n.trim().trim_matches('"').to_string())
                .ok_or_else(|| parse_err("missing physical name"))?;
            raw.physical_names
                .insert(name, PhysicalGroup { tag, dimension });
        }
        expect_end(lines, "$EndPhysicalNames")
    }

    fn parse_entities<'a, I>(lines: &mut I, raw: &mut RawMesh) -> Result<(), MeshSubsetError>
    where
        I: Iterator<Item = &'a str>,
    {
        let header = next_line(lines, "entity counts")?;
        let mut parts = header.split_whitespace();
        let mut counts = [0usize; 4];
        for count in &mut counts {
            *count = next_token(&mut parts, "entity count")?;
        }
        for (dim, &count) in counts.iter().enumerate() {
            // points: tag x y z; higher entities: tag + bounding box
            let skip = if dim == 0 { 3 } else { 6 };
            for _ in 0..count {
                let line = next_line(lines, "entity")?;
                let mut parts = line.split_whitespace();
                let tag: i32 = next_token(&mut parts, "entity tag")?;
                for _ in 0..skip {
                    let _: f64 = next_token(&mut parts, "entity coordinate")?;
                }
                let num_physical: usize = next_token(&mut parts, "physical tag count")?;
                let physical = (0..num_physical)
                    .map(|_| next_token(&mut parts, "physical tag"))
                    .collect::<Result<Vec<i32>, _>>()?;
                raw.entities.insert((dim as u8, tag), physical);
            }
        }
        expect_end(lines, "$EndEntities")
    }

    fn parse_coords(line: &str) -> Result<[f64; 3], MeshSubsetError> {
        let mut parts = line.split_whitespace();
        Ok([
            next_token(&mut parts, "x coordinate")?,
            next_token(&mut parts, "y coordinate")?,
            next_token(&mut parts, "z coordinate")?,
        ])
    }

    fn parse_nodes_v2<'a, I>(lines: &mut I, raw: &mut RawMesh) -> Result<(), MeshSubsetError>
    where
        I: Iterator<Item = &'a str>,
    {
        let count: usize = next_token(
            &mut next_line(lines, "node count")?.split_whitespace(),
            "node count",
        )?;
        for _ in 0..count {
            let line = next_line(lines, "node")?;
            let (tag, rest) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| parse_err(format!("malformed node line: {line}")))?;
            let tag = tag
                .parse::<u64>()
                .map_err(|_| parse_err(format!("invalid node tag: {tag}")))?;
            raw.node_tags.push(tag);
            raw.coords.push(Self::parse_coords(rest)?);
        }
        expect_end(lines, "$EndNodes")
    }

    fn parse_nodes_v4<'a, I>(lines: &mut I, raw: &mut RawMesh) -> Result<(), MeshSubsetError>
    where
        I: Iterator<Item = &'a str>,
    {
        let header = next_line(lines, "node header")?;
        let mut parts = header.split_whitespace();
        let num_blocks: usize = next_token(&mut parts, "node block count")?;
        let num_nodes: usize = next_token(&mut parts, "node count")?;
        for _ in 0..num_blocks {
            let header = next_line(lines, "node block header")?;
            let mut parts = header.split_whitespace();
            let _dim: u8 = next_token(&mut parts, "entity dimension")?;
            let _entity: i32 = next_token(&mut parts, "entity tag")?;
            let _parametric: u8 = next_token(&mut parts, "parametric flag")?;
            let in_block: usize = next_token(&mut parts, "block node count")?;
            for _ in 0..in_block {
                let line = next_line(lines, "node tag")?;
                raw.node_tags
                    .push(next_token(&mut line.split_whitespace(), "node tag")?);
            }
            for _ in 0..in_block {
                raw.coords
                    .push(Self::parse_coords(next_line(lines, "node coordinates")?)?);
            }
        }
        if raw.node_tags.len() != num_nodes {
            return Err(parse_err(format!(
                "node header announces {num_nodes} nodes, blocks hold {}",
                raw.node_tags.len()
            )));
        }
        expect_end(lines, "$EndNodes")
    }

    fn parse_elements_v2<'a, I>(lines: &mut I, raw: &mut RawMesh) -> Result<(), MeshSubsetError>
    where
        I: Iterator<Item = &'a str>,
    {
        let count: usize = next_token(
            &mut next_line(lines, "element count")?.split_whitespace(),
            "element count",
        )?;
        for _ in 0..count {
            let line = next_line(lines, "element")?;
            let mut parts = line.split_whitespace();
            let _id: u64 = next_token(&mut parts, "element id")?;
            let cell_type = Self::cell_type(next_token(&mut parts, "element type")?)?;
            let num_tags: usize = next_token(&mut parts, "element tag count")?;
            let tags = (0..num_tags)
                .map(|_| next_token(&mut parts, "element tag"))
                .collect::<Result<Vec<i32>, _>>()?;

            if raw.blocks.last().map(|b| b.cell_type) != Some(cell_type) {
                raw.blocks.push(RawBlock::new(cell_type));
            }
            let block = raw
                .blocks
                .last_mut()
                .ok_or_else(|| parse_err("element block missing"))?;
            for _ in 0..cell_type.num_vertices() {
                block
                    .node_tags
                    .push(next_token(&mut parts, "element node id")?);
            }
            block.physical.push(tags.first().copied().unwrap_or(0));
            block.geometrical.push(tags.get(1).copied().unwrap_or(0));
        }
        expect_end(lines, "$EndElements")
    }

    fn parse_elements_v4<'a, I>(lines: &mut I, raw: &mut RawMesh) -> Result<(), MeshSubsetError>
    where
        I: Iterator<Item = &'a str>,
    {
        let header = next_line(lines, "element header")?;
        let mut parts = header.split_whitespace();
        let num_blocks: usize = next_token(&mut parts, "element block count")?;
        let num_elements: usize = next_token(&mut parts, "element count")?;
        let mut seen = 0usize;
        for _ in 0..num_blocks {
            let header = next_line(lines, "element block header")?;
            let mut parts = header.split_whitespace();
            let dim: u8 = next_token(&mut parts, "entity dimension")?;
            let entity: i32 = next_token(&mut parts, "entity tag")?;
            let cell_type = Self::cell_type(next_token(&mut parts, "element type")?)?;
            let in_block: usize = next_token(&mut parts, "block element count")?;

            let physical = raw
                .entities
                .get(&(dim, entity))
                .and_then(|tags| tags.first().copied())
                .unwrap_or(0);
            let mut block = RawBlock::new(cell_type);
            for _ in 0..in_block {
                let line = next_line(lines, "element")?;
                let mut parts = line.split_whitespace();
                let _id: u64 = next_token(&mut parts, "element id")?;
                for _ in 0..cell_type.num_vertices() {
                    block
                        .node_tags
                        .push(next_token(&mut parts, "element node id")?);
                }
                block.physical.push(physical);
                block.geometrical.push(entity);
            }
            seen += in_block;
            raw.blocks.push(block);
        }
        if seen != num_elements {
            return Err(parse_err(format!(
                "element header announces {num_elements} elements, blocks hold {seen}"
            )));
        }
        expect_end(lines, "$EndElements")
    }

    fn skip_section<'a, I>(lines: &mut I, name: &str) -> Result<(), MeshSubsetError>
    where
        I: Iterator<Item = &'a str>,
    {
        let end = format!("$End{}", &name[1..]);
        for line in lines.by_ref() {
            if line == end {
                return Ok(());
            }
        }
        Err(parse_err(format!("missing {end}")))
    }

    fn assemble(raw: RawMesh) -> Result<Mesh, MeshSubsetError> {
        let index: HashMap<u64, usize> = raw
            .node_tags
            .iter()
            .enumerate()
            .map(|(idx, &tag)| (tag, idx))
            .collect();
        if index.len() != raw.node_tags.len() {
            return Err(parse_err("duplicate node tags"));
        }

        let mut cells = Vec::with_capacity(raw.blocks.len());
        let mut physical = Vec::with_capacity(raw.blocks.len());
        let mut geometrical = Vec::with_capacity(raw.blocks.len());
        for block in raw.blocks {
            let connectivity = block
                .node_tags
                .iter()
                .map(|tag| {
                    index
                        .get(tag)
                        .copied()
                        .ok_or_else(|| parse_err(format!("element references unknown node {tag}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(CellBlock::new(block.cell_type, connectivity)?);
            physical.push(MarkerBlock::new(block.cell_type, block.physical));
            geometrical.push(MarkerBlock::new(block.cell_type, block.geometrical));
        }

        let mut mesh = Mesh::new(Points::from_xyz(raw.coords), cells)?
            .with_cell_data(PHYSICAL_FIELD, physical)
            .with_cell_data(GEOMETRICAL_FIELD, geometrical);
        for (name, group) in raw.physical_names {
            mesh = mesh.with_physical_group(name, group.tag, group.dimension);
        }
        Ok(mesh)
    }
}

impl MeshReader for GmshReader {
    type Output = Mesh;

    fn read<R: Read>(&self, mut reader: R) -> Result<Mesh, MeshSubsetError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());

        let mut version: Option<MshVersion> = None;
        let mut raw = RawMesh::default();

        while let Some(line) = lines.next() {
            match line {
                "$MeshFormat" => {
                    version = Some(Self::parse_version(next_line(&mut lines, "MeshFormat")?)?);
                    expect_end(&mut lines, "$EndMeshFormat")?;
                }
                "$PhysicalNames" => Self::parse_physical_names(&mut lines, &mut raw)?,
                "$Entities" => Self::parse_entities(&mut lines, &mut raw)?,
                "$Nodes" => match version.unwrap_or(MshVersion::V2) {
                    MshVersion::V2 => Self::parse_nodes_v2(&mut lines, &mut raw)?,
                    MshVersion::V4 => Self::parse_nodes_v4(&mut lines, &mut raw)?,
                },
                "$Elements" => match version.unwrap_or(MshVersion::V2) {
                    MshVersion::V2 => Self::parse_elements_v2(&mut lines, &mut raw)?,
                    MshVersion::V4 => Self::parse_elements_v4(&mut lines, &mut raw)?,
                },
                section if section.starts_with('$') && !section.starts_with("$End") => {
                    log::debug!("skipping gmsh section {section}");
                    Self::skip_section(&mut lines, section)?;
                }
                other => {
                    log::warn!("ignoring stray gmsh line `{other}`");
                }
            }
        }

        if version.is_none() {
            log::warn!("no $MeshFormat section, assuming version 2.2");
        }
        let mesh = Self::assemble(raw)?;
        log::debug!(
            "read gmsh mesh: {} points, {} cell blocks",
            mesh.points().len(),
            mesh.cells().len()
        );
        Ok(mesh)
    }
}
