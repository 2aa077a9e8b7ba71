//! Flattening indexed meshes into world space primitives

use glam::{Mat4, Vec3, Vec3A};

use crate::{Material, MeshError, Primitive};

/// Triangle list mesh in object space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Planar quad `p0 p1 p2 p3` (in winding order) as two triangles
    pub fn quad(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self::new(vec![p0, p1, p2, p3], vec![0, 1, 2, 0, 2, 3])
    }

    /// Append another mesh, re-indexing its triangles
    pub fn extend(&mut self, other: &IndexedMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices
            .extend(other.indices.iter().map(|index| index + offset));
    }

    /// Number of complete index triples
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Transform every triangle to world space and push it to `out`.
    ///
    /// Trailing indices that do not form a full triangle are ignored. Ids are
    /// the positions the primitives take in `out`. On error nothing is pushed.
    pub fn append_primitives(
        &self,
        transform: &Mat4,
        material: Material,
        out: &mut Vec<Primitive>,
    ) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();
        if let Some(&index) = self.indices[..3 * self.triangle_count()]
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count,
            });
        }

        let world = |index: u32| -> Vec3A {
            Vec3A::from(transform.transform_point3(self.positions[index as usize]))
        };

        out.reserve(self.triangle_count());
        for tri in self.indices.chunks_exact(3) {
            let id = out.len() as u32;
            out.push(Primitive::with_material(
                world(tri[0]),
                world(tri[1]),
                world(tri[2]),
                id,
                material,
            ));
        }

        Ok(())
    }
}
