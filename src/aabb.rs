use glam::Vec3A;

/// Axis aligned bounding box.
///
/// A fresh box is [AABB::empty]: `min` is `+inf` and `max` is `-inf` on every
/// axis, so growing it by anything yields exactly that thing's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3A,
    pub max: Vec3A,
}

/// Monotonic union of a box with some other geometry
pub trait Grow<T> {
    fn grow(&mut self, value: T);
}

impl Default for AABB {
    fn default() -> Self {
        Self::empty()
    }
}

impl AABB {
    /// The empty box, identity of [Grow::grow]
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Vec3A::splat(f32::INFINITY),
            max: Vec3A::splat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing both corners
    #[inline]
    pub fn new(p0: Vec3A, p1: Vec3A) -> Self {
        Self {
            min: p0.min(p1),
            max: p0.max(p1),
        }
    }

    /// Smallest box containing all the points. Empty if there are none.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3A>,
    {
        let mut aabb = Self::empty();
        points.into_iter().for_each(|p| aabb.grow(p));
        aabb
    }

    /// If the AABB is valid (min <= max)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.is_valid()
    }

    #[inline]
    pub fn extent(&self) -> Vec3A {
        self.max - self.min
    }

    /// Midpoint of the box. NaN for the empty box.
    #[inline]
    pub fn centroid(&self) -> Vec3A {
        0.5 * (self.min + self.max)
    }

    #[inline]
    pub fn union(&self, other: &AABB) -> AABB {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Whether `other` lies inside this box. The empty box is inside every box.
    #[inline]
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.cmple(other.min).all() && other.max.cmple(self.max).all()
    }

    #[inline]
    pub fn contains_point(&self, point: Vec3A) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }
}

impl Grow<Vec3A> for AABB {
    /// Grow the box to contain a new point
    #[inline]
    fn grow(&mut self, point: Vec3A) {
        self.max = self.max.max(point);
        self.min = self.min.min(point);
    }
}

impl Grow<&AABB> for AABB {
    /// Grow the box to contain another box
    #[inline]
    fn grow(&mut self, other: &AABB) {
        self.max = self.max.max(other.max);
        self.min = self.min.min(other.min);
    }
}
