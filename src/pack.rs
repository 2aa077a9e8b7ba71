//! Flat buffer layout consumed by a shader-side traversal.
//!
//! Triangles are 5 `vec4` each and nodes 3 `vec4` each, so both buffers can
//! be bound as `RGBA32F` texel buffers.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3A, Vec4};

use crate::{Bounded, Bvh, Grow, NodeKind, PackError, Primitive, AABB};

/// Largest integer up to which every integer is exactly representable as `f32`
pub const MAX_EXACT_F32_INDEX: usize = 1 << f32::MANTISSA_DIGITS;

/// Value stored in the child slots of a leaf
const NO_CHILD: f32 = -1.0;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuTriangle {
    /// Positions have `w = 1`
    pub vertex0: Vec4,
    pub vertex1: Vec4,
    pub vertex2: Vec4,
    /// Colours have `w = 0`
    pub albedo: Vec4,
    pub emission: Vec4,
}

impl From<&Primitive> for GpuTriangle {
    fn from(prim: &Primitive) -> Self {
        let [v0, v1, v2] = prim.vertices();
        Self {
            vertex0: v0.extend(1.0),
            vertex1: v1.extend(1.0),
            vertex2: v2.extend(1.0),
            albedo: prim.albedo().extend(0.0),
            emission: prim.emission().extend(0.0),
        }
    }
}

/// Node texels: `(min, left)`, `(max, right)`, `(start, count, 0, 0)`.
///
/// Leaves have `left = right = -1`, interior nodes `start = count = 0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuNode {
    pub min_left: Vec4,
    pub max_right: Vec4,
    pub range: Vec4,
}

impl GpuNode {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.min_left.w < 0.0 && self.max_right.w < 0.0
    }
}

/// Buffers ready for upload, in BVH order
#[derive(Debug, Clone, Default)]
pub struct PackedScene {
    pub triangles: Vec<GpuTriangle>,
    pub nodes: Vec<GpuNode>,
    /// Union of all triangle bounds
    pub scene_bounds: AABB,
}

impl PackedScene {
    #[inline]
    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    #[inline]
    pub fn node_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Node buffer viewed as individual texels
    #[inline]
    pub fn node_texels(&self) -> &[Vec4] {
        bytemuck::cast_slice(&self.nodes)
    }
}

#[inline]
fn exact_f32(value: usize) -> Result<f32, PackError> {
    if value > MAX_EXACT_F32_INDEX {
        return Err(PackError::IndexNotRepresentable {
            value,
            limit: MAX_EXACT_F32_INDEX,
        });
    }
    Ok(value as f32)
}

/// Pack the hierarchy into GPU buffers.
///
/// Fails if a node index or a leaf range can't be stored exactly as `f32`.
pub fn pack_bvh(bvh: &Bvh<Primitive>) -> Result<PackedScene, PackError> {
    let mut scene_bounds = AABB::empty();
    let triangles: Vec<GpuTriangle> = bvh
        .primitives()
        .iter()
        .map(|prim| {
            scene_bounds.grow(&prim.bounds());
            GpuTriangle::from(prim)
        })
        .collect();

    let nodes = bvh
        .nodes()
        .iter()
        .map(|node| -> Result<GpuNode, PackError> {
            let (left, right, start, count) = match node.kind {
                NodeKind::Leaf { start, count } => {
                    (NO_CHILD, NO_CHILD, exact_f32(start)?, exact_f32(count)?)
                }
                NodeKind::Interior { left, right } => {
                    (exact_f32(left)?, exact_f32(right)?, 0.0, 0.0)
                }
            };
            Ok(GpuNode {
                min_left: node.aabb.min.extend(left),
                max_right: node.aabb.max.extend(right),
                range: Vec4::new(start, count, 0.0, 0.0),
            })
        })
        .collect::<Result<Vec<_>, PackError>>()?;

    log::debug!(
        "packed {} triangles ({} bytes) and {} nodes ({} bytes)",
        bvh.len(),
        bvh.len() * std::mem::size_of::<GpuTriangle>(),
        bvh.nodes().len(),
        bvh.nodes().len() * std::mem::size_of::<GpuNode>()
    );

    Ok(PackedScene {
        triangles,
        nodes,
        scene_bounds,
    })
}

/// Bounds as stored in a packed node
#[inline]
pub fn gpu_node_bounds(node: &GpuNode) -> AABB {
    AABB {
        min: Vec3A::from(node.min_left.truncate()),
        max: Vec3A::from(node.max_right.truncate()),
    }
}
