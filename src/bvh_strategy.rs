use crate::{Axis, Bounded, AABB};

pub trait SplitStrategy {
    /// Reorder `primitives` in place and return the index splitting them into
    /// the left and right child ranges.
    ///
    /// `None` means the range cannot be split and has to become a leaf.
    fn split<T>(primitives: &mut [T], centroid_bounds: &AABB) -> Option<usize>
    where
        T: Bounded;
}

/// Object median split along the longest axis of the centroid bounds.
///
/// The lower half (rounded down) by centroid coordinate goes left. Only a
/// partition-select is done, order within each half is unspecified.
pub struct MedianSplitStrategy {}

impl SplitStrategy for MedianSplitStrategy {
    fn split<T>(primitives: &mut [T], centroid_bounds: &AABB) -> Option<usize>
    where
        T: Bounded,
    {
        let extent = centroid_bounds.extent();
        let axis = Axis::of_longest_extent(extent);

        // All centroids coincide (or are NaN): no ordering separates them
        if !(extent[axis] > 0.0) {
            return None;
        }

        let mid = primitives.len() / 2;
        if mid == 0 || mid == primitives.len() {
            return None;
        }

        primitives.select_nth_unstable_by(mid, |a, b| {
            a.centroid()[axis].total_cmp(&b.centroid()[axis])
        });

        Some(mid)
    }
}
