//! Named region markers.
//!
//! A [`RegionMarkers`] table maps region names (`"inflow"`, `"walls"`, ...)
//! to the integer markers assigned to physical groups when the geometry
//! was tagged. The table is an explicit value passed to whoever needs it;
//! it can be written by hand, deserialized from configuration, or read
//! from the physical names stored in a mesh file.

use crate::data::extracted::ExtractedMesh;
use crate::data::mesh::Mesh;
use crate::mesh_error::MeshSubsetError;
use std::collections::BTreeMap;

/// Region name → marker value.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RegionMarkers {
    markers: BTreeMap<String, i32>,
}

impl RegionMarkers {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`RegionMarkers::insert`].
    pub fn with(mut self, name: impl Into<String>, value: i32) -> Self {
        self.insert(name, value);
        self
    }

    /// Assigns `value` to region `name`.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: i32) -> Option<i32> {
        self.markers.insert(name.into(), value)
    }

    /// Builds a table from the physical group names carried by `mesh`.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let markers = mesh
            .field_data()
            .iter()
            .map(|(name, group)| (name.clone(), group.tag))
            .collect();
        Self { markers }
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.markers.get(name).copied()
    }

    /// First region name (alphabetically) mapped to `value`.
    pub fn name_of(&self, value: i32) -> Option<&str> {
        self.markers
            .iter()
            .find_map(|(name, &v)| (v == value).then_some(name.as_str()))
    }

    pub fn contains_value(&self, value: i32) -> bool {
        self.markers.values().any(|&v| v == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.markers.iter().map(|(name, &v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Checks that every marker in `mesh` belongs to a known region.
    ///
    /// # Errors
    /// `UnknownMarker` for the first marker value missing from the table.
    pub fn validate(&self, mesh: &ExtractedMesh) -> Result<(), MeshSubsetError> {
        match mesh
            .marker_values()
            .into_iter()
            .find(|&v| !self.contains_value(v))
        {
            Some(value) => Err(MeshSubsetError::UnknownMarker {
                cell_type: mesh.cell_type(),
                value,
            }),
            None => Ok(()),
        }
    }

    /// Cell counts of `mesh` keyed by region name; unknown values are keyed
    /// by their number.
    pub fn summarize(&self, mesh: &ExtractedMesh) -> BTreeMap<String, usize> {
        mesh.marker_histogram()
            .into_iter()
            .map(|(value, count)| {
                let key = self
                    .name_of(value)
                    .map_or_else(|| value.to_string(), str::to_string);
                (key, count)
            })
            .collect()
    }
}
