//! Error types for the fallible edges around the builder.
//!
//! Building itself never fails; these cover mesh flattening, buffer packing
//! and structural validation of a finished hierarchy.

use thiserror::Error;

/// Errors flattening an indexed mesh into primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An index refers past the end of the vertex array
    #[error("Vertex index {index} out of bounds (vertex count: {vertex_count})")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
}

/// Errors packing a hierarchy into GPU buffers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// Node indices and leaf ranges are stored as `f32`
    #[error("Value {value} cannot be stored exactly as f32 (limit: {limit})")]
    IndexNotRepresentable { value: usize, limit: usize },
}

/// Structural defects found by [crate::Bvh::validate]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An interior node points outside the node array
    #[error("Node {node} has child {child} out of bounds (node count: {count})")]
    ChildOutOfBounds {
        node: usize,
        child: usize,
        count: usize,
    },

    /// A node is the child of more than one parent, or of itself
    #[error("Node {node} is reachable more than once")]
    NodeRevisited { node: usize },

    /// A node cannot be reached from the root
    #[error("Node {node} is not reachable from the root")]
    UnreachableNode { node: usize },

    /// A leaf range reaches past the end of the primitive array
    #[error("Leaf {node} range {start}..{end} out of bounds (primitive count: {count})")]
    LeafOutOfBounds {
        node: usize,
        start: usize,
        end: usize,
        count: usize,
    },

    /// A primitive belongs to more than one leaf
    #[error("Primitive {index} is owned by more than one leaf")]
    PrimitiveOverlap { index: usize },

    /// A primitive belongs to no leaf
    #[error("Primitive {index} is not owned by any leaf")]
    PrimitiveUncovered { index: usize },

    /// A node box does not contain a child box or one of its primitives
    #[error("Bounds of node {node} do not contain {what}")]
    BoundsNotContained { node: usize, what: String },
}
