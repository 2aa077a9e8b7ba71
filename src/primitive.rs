extern crate glam;

use glam::Vec3A;

use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::{Bounded, Grow, AABB};

/// Surface colours carried along with a triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub albedo: Vec3A,
    pub emission: Vec3A,
}

impl Material {
    #[inline]
    pub fn new(albedo: Vec3A, emission: Vec3A) -> Self {
        Self { albedo, emission }
    }

    /// Non-reflective light source
    #[inline]
    pub fn emissive(emission: Vec3A) -> Self {
        Self::new(Vec3A::ZERO, emission)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3A::splat(0.8),
            emission: Vec3A::ZERO,
        }
    }
}

/// Triangle record fed to the BVH builder.
///
/// `bounds` and `centroid` are derived once in the constructor. The centroid is
/// the centre of the bounding box, not the average of the vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    vertex0: Vec3A,
    vertex1: Vec3A,
    vertex2: Vec3A,
    id: u32,
    material: Material,
    bounds: AABB,
    centroid: Vec3A,
}

impl Primitive {
    /// Triangle with the default material
    #[inline]
    pub fn new(vertex0: Vec3A, vertex1: Vec3A, vertex2: Vec3A, id: u32) -> Primitive {
        Self::with_material(vertex0, vertex1, vertex2, id, Material::default())
    }

    pub fn with_material(
        vertex0: Vec3A,
        vertex1: Vec3A,
        vertex2: Vec3A,
        id: u32,
        material: Material,
    ) -> Primitive {
        let mut bounds = AABB::empty();
        bounds.grow(vertex0);
        bounds.grow(vertex1);
        bounds.grow(vertex2);

        Primitive {
            vertex0,
            vertex1,
            vertex2,
            id,
            material,
            bounds,
            centroid: bounds.centroid(),
        }
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3A; 3] {
        [self.vertex0, self.vertex1, self.vertex2]
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    pub fn albedo(&self) -> Vec3A {
        self.material.albedo
    }

    #[inline]
    pub fn emission(&self) -> Vec3A {
        self.material.emission
    }
}

impl Bounded for Primitive {
    #[inline]
    fn bounds(&self) -> AABB {
        self.bounds
    }

    #[inline]
    fn centroid(&self) -> Vec3A {
        self.centroid
    }
}

impl Distribution<Primitive> for Standard {
    /// Random triangle inside the unit cube with the default material and id 0
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Primitive {
        Primitive::new(rng.gen(), rng.gen(), rng.gen(), 0)
    }
}
