extern crate glam;

use std::ops::{Index, IndexMut};

use strum::EnumIter;

/// 3D Axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// Axis with the longest extent.
    ///
    /// Ties keep the earlier axis: Y only wins over X if strictly longer, and Z
    /// only wins over the chosen axis if strictly longer than it.
    #[inline]
    pub fn of_longest_extent(extent: glam::Vec3A) -> Axis {
        let mut axis = Axis::X;
        if extent.y > extent.x {
            axis = Axis::Y;
        }
        if extent[axis] < extent.z {
            axis = Axis::Z;
        }
        axis
    }
}

impl Index<Axis> for glam::Vec3A {
    type Output = f32;

    fn index(&self, axis: Axis) -> &Self::Output {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl IndexMut<Axis> for glam::Vec3A {
    fn index_mut(&mut self, axis: Axis) -> &mut Self::Output {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3A;

    use strum::IntoEnumIterator;

    use crate::Axis;

    #[test]
    fn longest_extent_picks_strict_maximum() {
        assert_eq!(Axis::of_longest_extent(Vec3A::new(3.0, 1.0, 2.0)), Axis::X);
        assert_eq!(Axis::of_longest_extent(Vec3A::new(1.0, 3.0, 2.0)), Axis::Y);
        assert_eq!(Axis::of_longest_extent(Vec3A::new(1.0, 2.0, 3.0)), Axis::Z);
    }

    #[test]
    fn longest_extent_ties_prefer_earlier_axis() {
        assert_eq!(Axis::of_longest_extent(Vec3A::splat(1.0)), Axis::X);
        assert_eq!(Axis::of_longest_extent(Vec3A::new(1.0, 2.0, 2.0)), Axis::Y);
        assert_eq!(Axis::of_longest_extent(Vec3A::new(2.0, 1.0, 2.0)), Axis::X);
        assert_eq!(Axis::of_longest_extent(Vec3A::ZERO), Axis::X);
    }

    #[test]
    fn index_by_axis() {
        let mut v = Vec3A::new(1.0, 2.0, 3.0);
        let values: Vec<f32> = Axis::iter().map(|axis| v[axis]).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);

        v[Axis::Y] = 5.0;
        assert_eq!(v.y, 5.0);
    }
}
