//! Cell type vocabulary for mesh blocks.
//!
//! Names follow the convention used by mesh interchange tools
//! (`"line"`, `"triangle"`, `"tetra"`, ...), which is also the string
//! form accepted by [`CellType::from_str`].

use crate::mesh_error::MeshSubsetError;
use std::fmt;
use std::str::FromStr;

/// Fixed-width cell topologies.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// 0D vertex.
    Vertex,
    /// 1D segment.
    Line,
    /// 2D simplex.
    Triangle,
    /// 2D tensor-product cell.
    Quad,
    /// 3D simplex.
    Tetra,
    /// 3D tensor-product cell.
    Hexahedron,
    /// 3D prism.
    Wedge,
    /// 3D pyramid.
    Pyramid,
}

impl CellType {
    /// All supported cell types, ordered by dimension.
    pub const ALL: [CellType; 8] = [
        CellType::Vertex,
        CellType::Line,
        CellType::Triangle,
        CellType::Quad,
        CellType::Tetra,
        CellType::Hexahedron,
        CellType::Wedge,
        CellType::Pyramid,
    ];

    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Line => 1,
            CellType::Triangle | CellType::Quad => 2,
            CellType::Tetra | CellType::Hexahedron | CellType::Wedge | CellType::Pyramid => 3,
        }
    }

    /// Number of point indices per cell.
    pub fn num_vertices(self) -> usize {
        match self {
            CellType::Vertex => 1,
            CellType::Line => 2,
            CellType::Triangle => 3,
            CellType::Quad | CellType::Tetra => 4,
            CellType::Pyramid => 5,
            CellType::Wedge => 6,
            CellType::Hexahedron => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellType::Vertex => "vertex",
            CellType::Line => "line",
            CellType::Triangle => "triangle",
            CellType::Quad => "quad",
            CellType::Tetra => "tetra",
            CellType::Hexahedron => "hexahedron",
            CellType::Wedge => "wedge",
            CellType::Pyramid => "pyramid",
        }
    }

    /// Maps a first-order Gmsh element type code to a cell type.
    pub fn from_gmsh(code: u32) -> Option<Self> {
        match code {
            1 => Some(CellType::Line),
            2 => Some(CellType::Triangle),
            3 => Some(CellType::Quad),
            4 => Some(CellType::Tetra),
            5 => Some(CellType::Hexahedron),
            6 => Some(CellType::Wedge),
            7 => Some(CellType::Pyramid),
            15 => Some(CellType::Vertex),
            _ => None,
        }
    }

    pub fn gmsh_code(self) -> u32 {
        match self {
            CellType::Line => 1,
            CellType::Triangle => 2,
            CellType::Quad => 3,
            CellType::Tetra => 4,
            CellType::Hexahedron => 5,
            CellType::Wedge => 6,
            CellType::Pyramid => 7,
            CellType::Vertex => 15,
        }
    }

    /// XDMF `TopologyType` name for a uniform grid of this cell type.
    pub fn xdmf_topology(self) -> &'static str {
        match self {
            CellType::Vertex => "Polyvertex",
            CellType::Line => "Polyline",
            CellType::Triangle => "Triangle",
            CellType::Quad => "Quadrilateral",
            CellType::Tetra => "Tetrahedron",
            CellType::Hexahedron => "Hexahedron",
            CellType::Wedge => "Wedge",
            CellType::Pyramid => "Pyramid",
        }
    }

    /// Inverse of [`CellType::xdmf_topology`]. Poly* topologies need the
    /// `NodesPerElement` attribute to be resolved.
    pub fn from_xdmf(topology: &str, nodes_per_element: Option<usize>) -> Option<Self> {
        match (topology, nodes_per_element) {
            ("Polyvertex", None | Some(1)) => Some(CellType::Vertex),
            ("Polyline", None | Some(2)) => Some(CellType::Line),
            ("Triangle", _) => Some(CellType::Triangle),
            ("Quadrilateral", _) => Some(CellType::Quad),
            ("Tetrahedron", _) => Some(CellType::Tetra),
            ("Hexahedron", _) => Some(CellType::Hexahedron),
            ("Wedge", _) => Some(CellType::Wedge),
            ("Pyramid", _) => Some(CellType::Pyramid),
            _ => None,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = MeshSubsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| MeshSubsetError::UnknownCellType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for ty in CellType::ALL {
            assert_eq!(ty.as_str().parse::<CellType>().unwrap(), ty);
        }
        assert!(matches!(
            "prism".parse::<CellType>(),
            Err(MeshSubsetError::UnknownCellType(name)) if name == "prism"
        ));
    }

    #[test]
    fn gmsh_codes_are_consistent() {
        for ty in CellType::ALL {
            assert_eq!(CellType::from_gmsh(ty.gmsh_code()), Some(ty));
        }
        assert_eq!(CellType::from_gmsh(9), None);
    }

    #[test]
    fn widths_match_gmsh_first_order_elements() {
        assert_eq!(CellType::Line.num_vertices(), 2);
        assert_eq!(CellType::Triangle.num_vertices(), 3);
        assert_eq!(CellType::Tetra.num_vertices(), 4);
        assert_eq!(CellType::Hexahedron.num_vertices(), 8);
        assert_eq!(CellType::Tetra.dimension(), 3);
    }

    #[test]
    fn xdmf_polyline_requires_two_nodes() {
        assert_eq!(CellType::from_xdmf("Polyline", Some(2)), Some(CellType::Line));
        assert_eq!(CellType::from_xdmf("Polyline", Some(3)), None);
        assert_eq!(CellType::from_xdmf("Mixed", None), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let s = serde_json::to_string(&CellType::Tetra).unwrap();
        assert_eq!(s, "\"tetra\"");
        let ty: CellType = serde_json::from_str("\"triangle\"").unwrap();
        assert_eq!(ty, CellType::Triangle);
    }
}
