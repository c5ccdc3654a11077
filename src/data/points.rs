//! Point coordinates shared by all cell blocks of a mesh.
//!
//! Coordinates are stored in one flat buffer with a fixed dimension per
//! point, so point `i` occupies `data[i * dim..(i + 1) * dim]`.

use crate::mesh_error::MeshSubsetError;

/// Flat coordinate storage with an attached embedding dimension.
///
/// Deserialization goes through [`Points::try_new`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPoints")]
pub struct Points {
    dimension: usize,
    data: Vec<f64>,
}

#[derive(serde::Deserialize)]
struct RawPoints {
    dimension: usize,
    data: Vec<f64>,
}

impl TryFrom<RawPoints> for Points {
    type Error = MeshSubsetError;

    fn try_from(raw: RawPoints) -> Result<Self, Self::Error> {
        Self::try_new(raw.dimension, raw.data)
    }
}

impl Points {
    /// Wrap a flat coordinate buffer.
    ///
    /// # Errors
    /// `InvalidPointDimension` unless `dimension` is 2 or 3, and
    /// `InvalidCoordinateLength` if `data.len()` is not a multiple of it.
    pub fn try_new(dimension: usize, data: Vec<f64>) -> Result<Self, MeshSubsetError> {
        if !(2..=3).contains(&dimension) {
            return Err(MeshSubsetError::InvalidPointDimension(dimension));
        }
        if data.len() % dimension != 0 {
            return Err(MeshSubsetError::InvalidCoordinateLength {
                len: data.len(),
                dim: dimension,
            });
        }
        Ok(Self { dimension, data })
    }

    /// Build 3D points from `(x, y, z)` triples.
    pub fn from_xyz<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f64; 3]>,
    {
        Self {
            dimension: 3,
            data: points.into_iter().flatten().collect(),
        }
    }

    /// Build 2D points from `(x, y)` pairs.
    pub fn from_xy<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f64; 2]>,
    {
        Self {
            dimension: 2,
            data: points.into_iter().flatten().collect(),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Coordinates of point `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Iterate coordinate slices in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dimension)
    }

    /// The flat coordinate buffer.
    #[inline]
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Drops the z component of every point. No-op on 2D points.
    pub(crate) fn drop_z(&self) -> Self {
        if self.dimension == 2 {
            return self.clone();
        }
        Self {
            dimension: 2,
            data: self.iter().flat_map(|p| [p[0], p[1]]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_dimension_and_length() {
        assert!(matches!(
            Points::try_new(1, vec![0.0]),
            Err(MeshSubsetError::InvalidPointDimension(1))
        ));
        assert!(matches!(
            Points::try_new(3, vec![0.0; 4]),
            Err(MeshSubsetError::InvalidCoordinateLength { len: 4, dim: 3 })
        ));
    }

    #[test]
    fn indexing_and_iteration() {
        let pts = Points::from_xyz([[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]]);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts.get(1), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(pts.get(2), None);
        assert_eq!(pts.iter().count(), 2);
    }

    #[test]
    fn deserialize_checks_dimension_and_length() {
        let err = serde_json::from_str::<Points>(r#"{"dimension":0,"data":[]}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported point dimension 0"), "{err}");
        assert!(serde_json::from_str::<Points>(r#"{"dimension":2,"data":[1.0,2.0,3.0]}"#).is_err());

        let pts: Points = serde_json::from_str(r#"{"dimension":2,"data":[1.0,2.0]}"#).unwrap();
        assert_eq!(pts.len(), 1);
    }

    #[test]
    fn drop_z_keeps_xy() {
        let pts = Points::from_xyz([[1.0, 2.0, 0.0], [3.0, 4.0, 0.0]]);
        let flat = pts.drop_z();
        assert_eq!(flat.dimension(), 2);
        assert_eq!(flat.as_flat(), &[1.0, 2.0, 3.0, 4.0]);
    }
}
