use std::fmt;

use smallvec::SmallVec;

use crate::{Bvh, NodeKind};

/// Shape summary of a built hierarchy
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BvhStats {
    pub node_count: usize,
    pub interior_count: usize,
    pub leaf_count: usize,
    /// Depth of the deepest node, the root has depth 0
    pub max_depth: usize,
    pub min_leaf_size: usize,
    pub max_leaf_size: usize,
    pub average_leaf_size: f32,
}

impl fmt::Display for BvhStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes ({} interior, {} leaves), depth {}, leaf size {}..={} (avg {:.2})",
            self.node_count,
            self.interior_count,
            self.leaf_count,
            self.max_depth,
            self.min_leaf_size,
            self.max_leaf_size,
            self.average_leaf_size
        )
    }
}

/// Traversal stack entries kept inline before spilling to the heap
pub(crate) const INLINE_STACK_SIZE: usize = 64;

impl<T> Bvh<T> {
    /// Walk the tree from the root and summarize it.
    ///
    /// Only nodes reachable from the root are counted.
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        if self.nodes.is_empty() {
            return stats;
        }

        stats.min_leaf_size = usize::MAX;
        let mut prim_total = 0_usize;

        let mut stack: SmallVec<[(usize, usize); INLINE_STACK_SIZE]> = SmallVec::new();
        stack.push((0, 0));

        while let Some((node_id, depth)) = stack.pop() {
            stats.node_count += 1;
            stats.max_depth = stats.max_depth.max(depth);

            match self.nodes[node_id].kind {
                NodeKind::Leaf { count, .. } => {
                    stats.leaf_count += 1;
                    stats.min_leaf_size = stats.min_leaf_size.min(count);
                    stats.max_leaf_size = stats.max_leaf_size.max(count);
                    prim_total += count;
                }
                NodeKind::Interior { left, right } => {
                    stats.interior_count += 1;
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }

        stats.average_leaf_size = prim_total as f32 / stats.leaf_count as f32;
        stats
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3A;

    use crate::*;

    #[test]
    fn empty_stats() {
        let bvh = Bvh::<Primitive>::default();
        assert_eq!(bvh.stats(), BvhStats::default());
    }

    #[test]
    fn balanced_tree_stats() {
        // 16 primitives spread along x, leaves of 2 -> full tree of depth 3
        let triangles: Vec<Primitive> = (0..16)
            .map(|i| {
                let p = Vec3A::new(i as f32, 0.0, 0.0);
                Primitive::new(p, p + Vec3A::Y, p + Vec3A::Z, i)
            })
            .collect();

        let stats = Bvh::build(triangles, 2).stats();

        assert_eq!(stats.node_count, 15);
        assert_eq!(stats.interior_count, 7);
        assert_eq!(stats.leaf_count, 8);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.min_leaf_size, 2);
        assert_eq!(stats.max_leaf_size, 2);
        assert_eq!(stats.average_leaf_size, 2.0);
    }

    #[test]
    fn display_mentions_counts() {
        let p = Vec3A::ZERO;
        let stats = Bvh::build(vec![Primitive::new(p, p, p, 0)], 8).stats();
        let text = stats.to_string();
        assert!(text.starts_with("1 nodes (0 interior, 1 leaves)"), "{text}");
    }
}
