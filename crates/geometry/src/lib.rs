//! Points and rectangles on the continuous canvas plane.
mod aabb;
mod errors;
mod v2;

pub use aabb::*;
pub use errors::*;
pub use v2::*;
