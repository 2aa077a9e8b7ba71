//! Fork/join build over disjoint sibling ranges.
//!
//! Subtrees are built into their own node vectors and spliced behind their
//! parent, which reproduces the pre-order layout of the sequential build.

use crate::{
    bvh::{build_recursive, make_node},
    Bounded, Bvh, BvhNode, MedianSplitStrategy, SplitStrategy,
};

/// Ranges smaller than this are built sequentially
pub const PARALLEL_SPLIT_THRESHOLD: usize = 4096;

impl<T> Bvh<T>
where
    T: Bounded + Send,
{
    /// Parallel version of [Bvh::build]. Produces the same hierarchy.
    pub fn par_build(primitives: Vec<T>, max_leaf_size: usize) -> Self {
        Self::par_build_with::<MedianSplitStrategy>(primitives, max_leaf_size)
    }

    pub fn par_build_with<Strat>(mut primitives: Vec<T>, max_leaf_size: usize) -> Self
    where
        Strat: SplitStrategy,
    {
        let nodes = if primitives.is_empty() {
            Vec::new()
        } else {
            par_build_recursive::<T, Strat>(&mut primitives, 0, max_leaf_size)
        };

        let bvh = Self { nodes, primitives };
        log::debug!(
            "built BVH in parallel over {} primitives (max leaf size {}): {}",
            bvh.primitives.len(),
            max_leaf_size,
            bvh.stats()
        );
        bvh
    }
}

/// Returns the subtree over `primitives` with its root at index 0
fn par_build_recursive<T, Strat>(
    primitives: &mut [T],
    first: usize,
    max_leaf_size: usize,
) -> Vec<BvhNode>
where
    T: Bounded + Send,
    Strat: SplitStrategy,
{
    if primitives.len() < PARALLEL_SPLIT_THRESHOLD {
        let mut nodes = Vec::with_capacity(2 * primitives.len() - 1);
        build_recursive::<T, Strat>(&mut nodes, primitives, first, max_leaf_size);
        return nodes;
    }

    let (mut node, split) = make_node::<T, Strat>(primitives, first, max_leaf_size);
    let mid = match split {
        Some(mid) => mid,
        None => return vec![node],
    };

    let (left_prims, right_prims) = primitives.split_at_mut(mid);
    let (mut left_nodes, mut right_nodes) = rayon::join(
        || par_build_recursive::<T, Strat>(left_prims, first, max_leaf_size),
        || par_build_recursive::<T, Strat>(right_prims, first + mid, max_leaf_size),
    );

    let left = 1;
    let right = left + left_nodes.len();
    left_nodes.iter_mut().for_each(|n| n.rebase(left));
    right_nodes.iter_mut().for_each(|n| n.rebase(right));
    node.setup_children(left, right);

    let mut nodes = Vec::with_capacity(1 + left_nodes.len() + right_nodes.len());
    nodes.push(node);
    nodes.append(&mut left_nodes);
    nodes.append(&mut right_nodes);
    nodes
}
