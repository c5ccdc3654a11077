use mesh_subset::algs::convert::{ConvertOptions, convert, convert_file, prepare};
use mesh_subset::io::MeshReader;
use mesh_subset::io::gmsh::GmshReader;
use mesh_subset::io::xdmf::XdmfReader;
use mesh_subset::mesh_error::MeshSubsetError;
use mesh_subset::topology::cell_type::CellType;
use mesh_subset::topology::markers::RegionMarkers;

/// Unit square in the z = 0 plane, boundary tagged 1..=4, interior tagged 6.
const PLANAR_V22: &str = "$MeshFormat
2.2 0 8
$EndMeshFormat
$PhysicalNames
5
1 1 \"bottom\"
1 2 \"right\"
1 3 \"top\"
1 4 \"left\"
2 6 \"domain\"
$EndPhysicalNames
$Nodes
4
1 0 0 0
2 1 0 0
3 1 1 0
4 0 1 0
$EndNodes
$Elements
6
1 1 2 1 1 1 2
2 1 2 2 2 2 3
3 1 2 3 3 3 4
4 1 2 4 4 4 1
5 2 2 6 1 1 2 3
6 2 2 6 1 1 3 4
$EndElements
";

#[test]
fn planar_mesh_is_written_with_xy_geometry() {
    let mesh = GmshReader.read(PLANAR_V22.as_bytes()).unwrap();
    let mut out = Vec::new();
    let opts = ConvertOptions::default().with_prune_z_0(true);
    let extracted = convert(&mesh, CellType::Triangle, &mut out, &opts).unwrap();
    assert_eq!(extracted.points().dimension(), 2);
    assert_eq!(extracted.markers(), &[6, 6]);

    let xml = String::from_utf8(out).unwrap();
    assert!(xml.contains("GeometryType=\"XY\""));
    assert!(xml.contains("Name=\"name_to_read\""));

    // input mesh keeps its third coordinate
    assert_eq!(mesh.points().dimension(), 3);
}

#[test]
fn without_pruning_geometry_stays_xyz() {
    let mesh = GmshReader.read(PLANAR_V22.as_bytes()).unwrap();
    let mut out = Vec::new();
    convert(&mesh, CellType::Line, &mut out, &ConvertOptions::default()).unwrap();
    let xml = String::from_utf8(out).unwrap();
    assert!(xml.contains("GeometryType=\"XYZ\""));
    assert!(xml.contains("TopologyType=\"Polyline\""));
}

#[test]
fn convert_file_round_trips_through_disk() {
    let dir = std::env::temp_dir();
    let id = std::process::id();
    let msh = dir.join(format!("mesh_subset_convert_{id}.msh"));
    let xdmf = dir.join(format!("mesh_subset_convert_{id}.xdmf"));
    std::fs::write(&msh, PLANAR_V22).unwrap();

    let opts = ConvertOptions::default().with_prune_z_0(true);
    let written = convert_file(&msh, CellType::Line, &xdmf, &opts).unwrap();
    let back = XdmfReader.read_path(&xdmf).unwrap();
    std::fs::remove_file(&msh).ok();
    std::fs::remove_file(&xdmf).ok();

    assert_eq!(back, written);
    assert_eq!(back.markers(), &[1, 2, 3, 4]);
    assert_eq!(back.points().len(), 4);
}

#[test]
fn failed_conversion_keeps_existing_output() {
    let dir = std::env::temp_dir();
    let id = std::process::id();
    let msh = dir.join(format!("mesh_subset_keep_{id}.msh"));
    let xdmf = dir.join(format!("mesh_subset_keep_{id}.xdmf"));
    std::fs::write(&msh, PLANAR_V22).unwrap();
    std::fs::write(&xdmf, "previous output").unwrap();

    let err = convert_file(&msh, CellType::Tetra, &xdmf, &ConvertOptions::default()).unwrap_err();
    let kept = std::fs::read_to_string(&xdmf).unwrap();

    let missing = dir.join(format!("mesh_subset_keep_{id}_absent.xdmf"));
    let regions = RegionMarkers::new().with("bottom", 1);
    let opts = ConvertOptions::default().with_regions(regions);
    assert!(convert_file(&msh, CellType::Line, &missing, &opts).is_err());
    let created = missing.exists();

    std::fs::remove_file(&msh).ok();
    std::fs::remove_file(&xdmf).ok();
    std::fs::remove_file(&missing).ok();

    assert!(matches!(err, MeshSubsetError::NoMatchingTopology(CellType::Tetra)));
    assert_eq!(kept, "previous output");
    assert!(!created);
}

#[test]
fn prepare_matches_written_mesh() {
    let mesh = GmshReader.read(PLANAR_V22.as_bytes()).unwrap();
    let opts = ConvertOptions::default().with_prune_z_0(true);
    let prepared = prepare(&mesh, CellType::Triangle, &opts).unwrap();
    let mut out = Vec::new();
    let written = convert(&mesh, CellType::Triangle, &mut out, &opts).unwrap();
    assert_eq!(prepared, written);
    assert_eq!(XdmfReader.read(out.as_slice()).unwrap(), written);
}

#[test]
fn region_table_rejects_unnamed_markers() {
    let mesh = GmshReader.read(PLANAR_V22.as_bytes()).unwrap();
    let regions = RegionMarkers::new().with("bottom", 1).with("top", 3);
    let opts = ConvertOptions::default().with_regions(regions);
    let mut out = Vec::new();
    let err = convert(&mesh, CellType::Line, &mut out, &opts).unwrap_err();
    assert!(matches!(
        err,
        MeshSubsetError::UnknownMarker { value: 2, .. }
    ));
    assert!(out.is_empty());
}

#[test]
fn region_table_from_physical_names_accepts_all_markers() {
    let mesh = GmshReader.read(PLANAR_V22.as_bytes()).unwrap();
    let opts = ConvertOptions::default().with_regions(RegionMarkers::from_mesh(&mesh));
    let mut out = Vec::new();
    assert!(convert(&mesh, CellType::Line, &mut out, &opts).is_ok());
}

#[test]
fn geometrical_tags_can_be_exported_instead() {
    let mesh = GmshReader.read(PLANAR_V22.as_bytes()).unwrap();
    let opts = ConvertOptions::default().with_marker_field("gmsh:geometrical");
    let mut out = Vec::new();
    let extracted = convert(&mesh, CellType::Triangle, &mut out, &opts).unwrap();
    assert_eq!(extracted.markers(), &[1, 1]);
}

#[test]
fn missing_topology_writes_nothing() {
    let mesh = GmshReader.read(PLANAR_V22.as_bytes()).unwrap();
    let mut out = Vec::new();
    let err = convert(&mesh, CellType::Tetra, &mut out, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, MeshSubsetError::NoMatchingTopology(CellType::Tetra)));
    assert!(out.is_empty());
}
