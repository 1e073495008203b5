// Copyright @yucwang 2026

pub type Float = f32;
pub type Int = i32;
pub type UInt = u32;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;
pub type Vector4f = nalgebra::Vector4<Float>;
pub type Point3f = nalgebra::Point3<Float>;
pub type Matrix4f = nalgebra::Matrix4<Float>;

pub const EPSILON: Float = 1e-4;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;

/// Sentinel hit distance for a ray that escaped the scene.
pub const INFINITE: Float = std::f32::MAX;

/// Reserved pdf value for delta lights. Not a real density; a sample
/// carrying it cannot be produced by BSDF sampling, so its MIS weight
/// collapses to 1.
pub const DIRAC: Float = -1.0;

pub fn luminance(c: &Vector3f) -> Float {
    c.x * 0.212671 + c.y * 0.715160 + c.z * 0.072169
}
