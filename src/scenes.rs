//! Scene generation functionality

use std::f32::consts::PI;

use glam::{Mat4, Vec3, Vec3A};
use rand::Rng;

use crate::{IndexedMesh, Material, MeshError, Primitive};

/// Possible hard-coded scenes to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneType {
    /// The [Cornell Box](https://www.graphics.cornell.edu/online/box/data.html) with an area light
    CornellBox,
    /// Uniformly scattered random triangles
    Random,
}

/// Returns the triangles of the chosen scene.
///
/// `triangle_count` is only used by [SceneType::Random].
pub fn get_scene(
    scene_type: SceneType,
    triangle_count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Primitive>, MeshError> {
    match scene_type {
        SceneType::CornellBox => cornell_box(),
        SceneType::Random => Ok(random_triangles(triangle_count, rng)),
    }
}

/// Random triangle soup, roughly inside [-5, 4]^3, with sequential ids
pub fn random_triangles<R>(count: usize, rng: &mut R) -> Vec<Primitive>
where
    R: Rng + ?Sized,
{
    (0..count)
        .map(|id| {
            let v0 = rng.gen::<Vec3A>() * 9.0 - Vec3A::splat(5.0);
            let v1 = v0 + rng.gen::<Vec3A>() - Vec3A::splat(0.5);
            let v2 = v0 + rng.gen::<Vec3A>() - Vec3A::splat(0.5);
            Primitive::new(v0, v1, v2, id as u32)
        })
        .collect()
}

/// Placement of the Cornell Box data in front of a camera at the origin
pub fn cornell_box_transform() -> Mat4 {
    Mat4::from_translation(Vec3::new(138.0, -136.0, -350.0))
        * Mat4::from_rotation_y(PI)
        * Mat4::from_scale(Vec3::splat(0.5))
}

/// Cornell Box with both blocks, flattened in world space
pub fn cornell_box() -> Result<Vec<Primitive>, MeshError> {
    let white = Material::new(Vec3A::new(0.725, 0.71, 0.68), Vec3A::ZERO);
    let red = Material::new(Vec3A::new(0.63, 0.065, 0.05), Vec3A::ZERO);
    let green = Material::new(Vec3A::new(0.14, 0.45, 0.091), Vec3A::ZERO);
    let block = Material::new(Vec3A::new(0.28, 0.17, 0.08), Vec3A::ZERO);
    let light = Material::emissive(Vec3A::splat(6.0));

    let parts = [
        (cornell_room(), white),
        (
            IndexedMesh::quad(
                Vec3::new(552.8, 0.0, 0.0),
                Vec3::new(549.6, 0.0, 559.2),
                Vec3::new(556.0, 548.8, 559.2),
                Vec3::new(556.0, 548.8, 0.0),
            ),
            red,
        ),
        (
            IndexedMesh::quad(
                Vec3::new(0.0, 0.0, 559.2),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 548.8, 0.0),
                Vec3::new(0.0, 548.8, 559.2),
            ),
            green,
        ),
        (
            IndexedMesh::quad(
                Vec3::new(343.0, 548.7, 227.0),
                Vec3::new(343.0, 548.7, 332.0),
                Vec3::new(213.0, 548.7, 332.0),
                Vec3::new(213.0, 548.7, 227.0),
            ),
            light,
        ),
        (
            extrude_block(
                [
                    Vec3::new(130.0, 165.0, 65.0),
                    Vec3::new(82.0, 165.0, 225.0),
                    Vec3::new(240.0, 165.0, 272.0),
                    Vec3::new(290.0, 165.0, 114.0),
                ],
            ),
            block,
        ),
        (
            extrude_block(
                [
                    Vec3::new(423.0, 330.0, 247.0),
                    Vec3::new(265.0, 330.0, 296.0),
                    Vec3::new(314.0, 330.0, 456.0),
                    Vec3::new(472.0, 330.0, 406.0),
                ],
            ),
            block,
        ),
    ];

    let transform = cornell_box_transform();
    let triangle_count = parts.iter().map(|(mesh, _)| mesh.triangle_count()).sum();
    let mut primitives = Vec::with_capacity(triangle_count);
    for (mesh, material) in parts.iter() {
        mesh.append_primitives(&transform, *material, &mut primitives)?;
    }

    log::debug!("generated Cornell Box with {} triangles", primitives.len());
    Ok(primitives)
}

/// Floor, ceiling and back wall
fn cornell_room() -> IndexedMesh {
    let mut room = IndexedMesh::quad(
        Vec3::new(552.8, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 559.2),
        Vec3::new(549.6, 0.0, 559.2),
    );
    room.extend(&IndexedMesh::quad(
        Vec3::new(556.0, 548.8, 0.0),
        Vec3::new(556.0, 548.8, 559.2),
        Vec3::new(0.0, 548.8, 559.2),
        Vec3::new(0.0, 548.8, 0.0),
    ));
    room.extend(&IndexedMesh::quad(
        Vec3::new(549.6, 0.0, 559.2),
        Vec3::new(0.0, 0.0, 559.2),
        Vec3::new(0.0, 548.8, 559.2),
        Vec3::new(556.0, 548.8, 559.2),
    ));
    room
}

/// Block standing on the floor (y = 0) with the given top face
fn extrude_block(top: [Vec3; 4]) -> IndexedMesh {
    let mut block = IndexedMesh::quad(top[0], top[1], top[2], top[3]);
    for i in 0..top.len() {
        let a = top[i];
        let b = top[(i + 1) % top.len()];
        block.extend(&IndexedMesh::quad(
            a,
            b,
            Vec3::new(b.x, 0.0, b.z),
            Vec3::new(a.x, 0.0, a.z),
        ));
    }
    block
}
