use glam::Vec3;

use crate::{Error, Result};

/// Indexed triangle mesh, in object space.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Creates a mesh, validating its buffers.
    ///
    /// `normals` can be empty, in which case flat normals are used.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self> {
        if !normals.is_empty() && normals.len() != positions.len() {
            return Err(Error::MismatchedNormals {
                positions: positions.len(),
                normals: normals.len(),
            });
        }

        if indices.len() % 3 != 0 {
            return Err(Error::IncompleteTriangles(indices.len()));
        }

        if let Some(&index) = indices
            .iter()
            .find(|&&index| index as usize >= positions.len())
        {
            return Err(Error::DegenerateMesh {
                index,
                vertices: positions.len(),
            });
        }

        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns positions and normals of each triangle.
    pub fn triangles(
        &self,
    ) -> impl Iterator<Item = ([Vec3; 3], [Vec3; 3])> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            let idx = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let positions = idx.map(|idx| self.positions[idx]);

            let normals = if self.normals.is_empty() {
                let normal = (positions[1] - positions[0])
                    .cross(positions[2] - positions[0])
                    .normalize_or_zero();

                [normal; 3]
            } else {
                idx.map(|idx| self.normals[idx])
            };

            (positions, normals)
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    fn positions() -> Vec<Vec3> {
        vec![Vec3::ZERO, vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)]
    }

    #[test]
    fn flat_normals() {
        let mesh = Mesh::new(positions(), Vec::new(), vec![0, 1, 2]).unwrap();
        let (_, normals) = mesh.triangles().next().unwrap();

        assert_eq!(1, mesh.triangle_count());
        assert_eq!([Vec3::Z; 3], normals);
    }

    #[test]
    fn invalid_buffers() {
        assert!(matches!(
            Mesh::new(positions(), Vec::new(), vec![0, 1, 3]),
            Err(Error::DegenerateMesh {
                index: 3,
                vertices: 3
            })
        ));

        assert!(matches!(
            Mesh::new(positions(), Vec::new(), vec![0, 1]),
            Err(Error::IncompleteTriangles(2))
        ));

        assert!(matches!(
            Mesh::new(positions(), vec![Vec3::Z], vec![0, 1, 2]),
            Err(Error::MismatchedNormals {
                positions: 3,
                normals: 1
            })
        ));
    }
}
