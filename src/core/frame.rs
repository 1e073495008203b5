// Copyright @yucwang 2026

use crate::math::constants::Vector3f;

/// Orthonormal shading frame with the normal on the local +z axis.
/// BSDF lobes are expressed in this frame; the sun sampler reuses it to
/// orient the disk jitter around the light direction.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub tangent: Vector3f,
    pub bitangent: Vector3f,
    pub normal: Vector3f,
}

impl Frame {
    /// Completes a unit normal into a frame. The tangent choice is
    /// arbitrary but deterministic; isotropic lobes never observe it.
    pub fn from_normal(normal: &Vector3f) -> Self {
        let up = if normal.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let tangent = normal.cross(&up).normalize();
        let bitangent = normal.cross(&tangent).normalize();
        Self {
            tangent,
            bitangent,
            normal: *normal,
        }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.tangent), v.dot(&self.bitangent), v.dot(&self.normal))
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_orthonormal() {
        for n in &[
            Vector3f::new(0.3, 0.8, -0.2).normalize(),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, -1.0, 0.0),
        ] {
            let frame = Frame::from_normal(n);
            assert!(frame.tangent.dot(&frame.normal).abs() < 1e-5);
            assert!(frame.bitangent.dot(&frame.normal).abs() < 1e-5);
            assert!(frame.tangent.dot(&frame.bitangent).abs() < 1e-5);
            assert!((frame.tangent.norm() - 1.0).abs() < 1e-5);
            assert!((frame.bitangent.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_round_trip() {
        let frame = Frame::from_normal(&Vector3f::new(0.2, 0.9, 0.4).normalize());
        let v = Vector3f::new(0.4, -0.3, 0.87).normalize();
        let back = frame.to_world(&frame.to_local(&v));
        assert!((back - v).norm() < 1e-5);
    }

    #[test]
    fn test_normal_maps_to_z() {
        let n = Vector3f::new(0.1, -0.7, 0.7).normalize();
        let frame = Frame::from_normal(&n);
        let local = frame.to_local(&n);
        assert!(local.x.abs() < 1e-5);
        assert!(local.y.abs() < 1e-5);
        assert!((local.z - 1.0).abs() < 1e-5);
    }
}
