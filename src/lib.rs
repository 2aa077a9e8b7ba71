pub mod axis;
pub use axis::*;

pub mod aabb;
pub use aabb::*;

pub mod error;
pub use error::*;

pub mod primitive;
pub use primitive::*;

pub mod bvh;
pub use bvh::*;

pub mod bvh_strategy;
pub use bvh_strategy::*;

pub mod stats;
pub use stats::BvhStats;

pub mod validate;

#[cfg(feature = "parallel")]
pub mod parallel;
#[cfg(feature = "parallel")]
pub use parallel::*;

pub mod mesh;
pub use mesh::*;

pub mod pack;
pub use pack::*;

// public: commandline parser
pub mod cli;
// public: scene selection
pub mod scenes;
