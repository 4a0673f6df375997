//! Plain-old-data vector types used for vertex positions, texture coordinates, and colors.
//!
//! These are intentionally bare: no dot/cross/normalize, no matrices. The parser only ever stores
//! and copies these values; it never does vector math on them.

mod vec2;
mod vec3;

pub use vec2::Vec2;
pub use vec3::Vec3;
