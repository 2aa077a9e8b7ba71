extern crate glam;
use glam::Vec3A;

use std::ops::Range;

use crate::{Grow, MedianSplitStrategy, Primitive, SplitStrategy, AABB};

/// Leaf size used when the caller has no preference
pub const DEFAULT_MAX_LEAF_SIZE: usize = 8;

/// Geometry with precomputed bounds, as consumed by the builder
pub trait Bounded {
    fn bounds(&self) -> AABB;
    fn centroid(&self) -> Vec3A;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Owns the primitives `start..start + count`
    Leaf { start: usize, count: usize },
    /// Indices of both children in the node array
    Interior { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    pub aabb: AABB,
    pub kind: NodeKind,
}

impl BvhNode {
    #[inline]
    pub fn leaf(aabb: AABB, start: usize, count: usize) -> Self {
        Self {
            aabb,
            kind: NodeKind::Leaf { start, count },
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Primitive range of a leaf
    #[inline]
    pub fn prim_range(&self) -> Option<Range<usize>> {
        match self.kind {
            NodeKind::Leaf { start, count } => Some(start..start + count),
            NodeKind::Interior { .. } => None,
        }
    }

    /// (left, right) of an interior node
    #[inline]
    pub fn children(&self) -> Option<(usize, usize)> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Interior { left, right } => Some((left, right)),
        }
    }

    #[inline]
    pub fn setup_children(&mut self, left: usize, right: usize) {
        self.kind = NodeKind::Interior { left, right };
    }

    /// Shift child indices of a node built inside a detached subtree
    #[inline]
    pub(crate) fn rebase(&mut self, offset: usize) {
        if let NodeKind::Interior { left, right } = &mut self.kind {
            *left += offset;
            *right += offset;
        }
    }
}

/// Bounding volume hierarchy over a set of primitives.
///
/// Nodes are stored in pre-order with the root at index 0. Leaf ranges index
/// into [Bvh::primitives], which is the input reordered by the build, so the
/// two sequences are only meaningful together.
#[derive(Debug, Clone)]
pub struct Bvh<T = Primitive> {
    pub(crate) nodes: Vec<BvhNode>,
    pub(crate) primitives: Vec<T>,
}

impl<T> Default for Bvh<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            primitives: Vec::new(),
        }
    }
}

impl<T> Bvh<T>
where
    T: Bounded,
{
    /// Build with the median split strategy.
    ///
    /// Takes ownership of `primitives` and reorders them. `max_leaf_size` is not
    /// validated: with 0 every leaf comes from a range that can't be split.
    pub fn build(primitives: Vec<T>, max_leaf_size: usize) -> Self {
        Self::build_with::<MedianSplitStrategy>(primitives, max_leaf_size)
    }

    pub fn build_with<Strat>(mut primitives: Vec<T>, max_leaf_size: usize) -> Self
    where
        Strat: SplitStrategy,
    {
        let mut nodes = Vec::new();
        if !primitives.is_empty() {
            // a binary tree over n leaves of at least one primitive has < 2n nodes
            nodes.reserve(2 * primitives.len() - 1);
            build_recursive::<T, Strat>(&mut nodes, &mut primitives, 0, max_leaf_size);
        }

        let bvh = Self { nodes, primitives };
        log::debug!(
            "built BVH over {} primitives (max leaf size {}): {}",
            bvh.primitives.len(),
            max_leaf_size,
            bvh.stats()
        );
        bvh
    }
}

impl<T> Bvh<T> {
    #[inline]
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Primitives in BVH order
    #[inline]
    pub fn primitives(&self) -> &[T] {
        &self.primitives
    }

    #[inline]
    pub fn root(&self) -> Option<&BvhNode> {
        self.nodes.first()
    }

    /// Bounds of the whole hierarchy, empty if there are no primitives
    #[inline]
    pub fn bounds(&self) -> AABB {
        self.root().map(|root| root.aabb).unwrap_or_default()
    }

    /// Number of primitives
    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Primitives owned by the leaf at `node_id`, empty for interior nodes
    pub fn leaf_primitives(&self, node_id: usize) -> &[T] {
        match self.nodes[node_id].prim_range() {
            Some(range) => &self.primitives[range],
            None => &[],
        }
    }

    pub fn into_parts(self) -> (Vec<BvhNode>, Vec<T>) {
        (self.nodes, self.primitives)
    }
}

impl<T> Bounded for Bvh<T> {
    #[inline]
    fn bounds(&self) -> AABB {
        Bvh::bounds(self)
    }

    #[inline]
    fn centroid(&self) -> Vec3A {
        Bvh::bounds(self).centroid()
    }
}

/// Partition `primitives`, which start at `first` in the full sequence, and
/// append its subtree to `nodes`. Returns the index of the subtree root.
pub(crate) fn build_recursive<T, Strat>(
    nodes: &mut Vec<BvhNode>,
    primitives: &mut [T],
    first: usize,
    max_leaf_size: usize,
) -> usize
where
    T: Bounded,
    Strat: SplitStrategy,
{
    let (node, split) = make_node::<T, Strat>(primitives, first, max_leaf_size);
    let node_id = nodes.len();
    nodes.push(node);

    if let Some(mid) = split {
        let (left_prims, right_prims) = primitives.split_at_mut(mid);
        let left = build_recursive::<T, Strat>(nodes, left_prims, first, max_leaf_size);
        let right = build_recursive::<T, Strat>(nodes, right_prims, first + mid, max_leaf_size);
        nodes[node_id].setup_children(left, right);
    }

    node_id
}

/// Bounds one range and decides whether it is a leaf.
///
/// Returns the node (a leaf over the whole range until children are wired in)
/// and the split point when the range should be subdivided.
pub(crate) fn make_node<T, Strat>(
    primitives: &mut [T],
    first: usize,
    max_leaf_size: usize,
) -> (BvhNode, Option<usize>)
where
    T: Bounded,
    Strat: SplitStrategy,
{
    let mut aabb = AABB::empty();
    let mut centroid_bounds = AABB::empty();
    for prim in primitives.iter() {
        aabb.grow(&prim.bounds());
        centroid_bounds.grow(prim.centroid());
    }

    let count = primitives.len();
    let node = BvhNode::leaf(aabb, first, count);

    if count <= max_leaf_size {
        return (node, None);
    }

    let split = Strat::split(primitives, &centroid_bounds);
    if split.is_none() {
        log::trace!(
            "degenerate split over {} primitives at {}, keeping an oversized leaf",
            count,
            first
        );
    }

    (node, split)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::{rngs::SmallRng, thread_rng, Rng, SeedableRng};

    use glam::Vec3A;

    use approx::*;

    use crate::*;

    static TRIANGLES_NUM: usize = 64;

    fn leaves(bvh: &Bvh) -> Vec<&BvhNode> {
        bvh.nodes().iter().filter(|node| node.is_leaf()).collect()
    }

    #[test]
    fn empty_has_no_nodes() {
        for max_leaf_size in [0, 1, 8, 100] {
            let bvh = Bvh::<Primitive>::build(vec![], max_leaf_size);
            assert!(bvh.nodes().is_empty());
            assert!(bvh.is_empty());
            assert!(bvh.root().is_none());
            assert_eq!(bvh.bounds(), AABB::empty());
        }
    }

    #[test]
    fn single_primitive_is_one_leaf() {
        let mut rng = thread_rng();
        let prim: Primitive = rng.gen();

        let bvh = Bvh::build(vec![prim], DEFAULT_MAX_LEAF_SIZE);

        assert_eq!(bvh.nodes().len(), 1);
        let root = bvh.root().unwrap();
        assert_eq!(root.kind, NodeKind::Leaf { start: 0, count: 1 });
        assert_eq!(root.aabb, prim.bounds());
        assert_eq!(bvh.primitives(), &[prim]);
    }

    #[test]
    fn small_input_is_root_leaf() {
        let mut rng = thread_rng();
        let triangles = scenes::random_triangles(8, &mut rng);
        let bvh = Bvh::build(triangles, 8);
        assert_eq!(bvh.nodes().len(), 1);
        assert_eq!(bvh.root().unwrap().kind, NodeKind::Leaf { start: 0, count: 8 });
    }

    #[test]
    fn coincident_centroids_make_one_oversized_leaf() {
        let p = Vec3A::new(1.0, 2.0, 3.0);
        let triangles: Vec<Primitive> = (0..9)
            .map(|id| Primitive::new(p - Vec3A::X, p + Vec3A::X, p, id))
            .collect();

        let bvh = Bvh::build(triangles, 8);

        assert_eq!(bvh.nodes().len(), 1);
        assert_eq!(bvh.root().unwrap().kind, NodeKind::Leaf { start: 0, count: 9 });
        bvh.validate().unwrap();
    }

    #[test]
    fn zero_leaf_size_terminates() {
        let mut rng = thread_rng();
        let triangles = scenes::random_triangles(17, &mut rng);
        let bvh = Bvh::build(triangles, 0);

        bvh.validate().unwrap();
        assert!(leaves(&bvh).iter().all(|leaf| leaf.prim_range().unwrap().len() == 1));
        assert_eq!(bvh.nodes().len(), 2 * 17 - 1);
    }

    #[test]
    fn interior_nodes_split_at_median() {
        let mut rng = thread_rng();
        let triangles = scenes::random_triangles(TRIANGLES_NUM, &mut rng);
        let bvh = Bvh::build(triangles, 4);

        let root = bvh.root().unwrap();
        let (left, right) = root.children().unwrap();
        assert_eq!(left, 1);
        let left_count: usize = leaf_count_under(&bvh, left);
        let right_count: usize = leaf_count_under(&bvh, right);
        assert_eq!(left_count, TRIANGLES_NUM / 2);
        assert_eq!(right_count, TRIANGLES_NUM - TRIANGLES_NUM / 2);
    }

    fn leaf_count_under(bvh: &Bvh, node_id: usize) -> usize {
        match bvh.nodes()[node_id].kind {
            NodeKind::Leaf { count, .. } => count,
            NodeKind::Interior { left, right } => {
                leaf_count_under(bvh, left) + leaf_count_under(bvh, right)
            }
        }
    }

    #[test]
    fn bounds_contain_children_and_primitives() {
        let mut rng = thread_rng();
        let triangles = scenes::random_triangles(TRIANGLES_NUM, &mut rng);
        let bvh = Bvh::build(triangles, 2);

        for node in bvh.nodes() {
            match node.kind {
                NodeKind::Leaf { start, count } => {
                    for prim in &bvh.primitives()[start..start + count] {
                        assert!(node.aabb.contains(&prim.bounds()));
                    }
                }
                NodeKind::Interior { left, right } => {
                    let nodes = bvh.nodes();
                    assert!(node.aabb.contains(&nodes[left].aabb));
                    assert!(node.aabb.contains(&nodes[right].aabb));
                    // the parent box is exactly the union of its children
                    assert_eq!(node.aabb, nodes[left].aabb.union(&nodes[right].aabb));
                }
            }
        }
    }

    #[test]
    fn leaves_cover_all_primitives_once() {
        let mut rng = thread_rng();
        let triangles = scenes::random_triangles(100, &mut rng);
        let bvh = Bvh::build(triangles, 3);

        let mut ranges: Vec<_> = leaves(&bvh)
            .iter()
            .map(|leaf| leaf.prim_range().unwrap())
            .collect();
        ranges.sort_by_key(|range| range.start);

        let mut expected_start = 0;
        for range in ranges {
            assert_eq!(range.start, expected_start);
            assert!(!range.is_empty());
            assert!(range.len() <= 3);
            expected_start = range.end;
        }
        assert_eq!(expected_start, 100);

        let ids: BTreeSet<u32> = bvh.primitives().iter().map(|p| p.id()).collect();
        assert_eq!(ids, (0..100).collect());
    }

    #[test]
    fn builds_are_deterministic() {
        let mut rng = SmallRng::seed_from_u64(7);
        let triangles = scenes::random_triangles(257, &mut rng);

        let a = Bvh::build(triangles.clone(), 4);
        let b = Bvh::build(triangles, 4);

        assert_eq!(a.nodes().len(), b.nodes().len());
        for (i, (na, nb)) in a.nodes().iter().zip(b.nodes()).enumerate() {
            assert_eq!(na.aabb, nb.aabb);
            assert_eq!(na.kind, nb.kind);
            if na.is_leaf() {
                let ids_a: BTreeSet<u32> = a.leaf_primitives(i).iter().map(|p| p.id()).collect();
                let ids_b: BTreeSet<u32> = b.leaf_primitives(i).iter().map(|p| p.id()).collect();
                assert_eq!(ids_a, ids_b);
            }
        }
    }

    #[test]
    fn scale_depth_is_logarithmic() {
        let mut rng = SmallRng::seed_from_u64(1000);
        let triangles = scenes::random_triangles(1000, &mut rng);
        let bvh = Bvh::build(triangles, 4);

        bvh.validate().unwrap();
        let stats = bvh.stats();
        // 1000 -> 500 -> ... -> 3/4 takes 8 halvings
        assert!(stats.max_depth <= 2 * (1000_f32.log2().ceil() as usize));
        assert!(stats.max_leaf_size <= 4);
        assert_relative_eq!(
            stats.leaf_count as f32 * stats.average_leaf_size,
            1000.0,
            max_relative = 1e-4
        );
    }

    #[test]
    fn root_bounds_is_scene_bounds() {
        let mut rng = thread_rng();
        let triangles = scenes::random_triangles(TRIANGLES_NUM, &mut rng);
        let mut expected = AABB::empty();
        triangles.iter().for_each(|t| expected.grow(&t.bounds()));

        let bvh = Bvh::build(triangles, DEFAULT_MAX_LEAF_SIZE);
        assert_eq!(bvh.bounds(), expected);
        assert_relative_eq!(Bounded::centroid(&bvh), expected.centroid());
    }

    #[test]
    fn leaf_primitives_of_interior_is_empty() {
        let mut rng = thread_rng();
        let bvh = Bvh::build(scenes::random_triangles(TRIANGLES_NUM, &mut rng), 4);
        assert!(bvh.leaf_primitives(0).is_empty());
        let (nodes, prims) = bvh.into_parts();
        assert_eq!(prims.len(), TRIANGLES_NUM);
        assert!(nodes.len() > 1);
    }
}
