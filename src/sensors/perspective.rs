// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Matrix4f, Vector2f, Vector3f, Vector4f};
use crate::math::ray::Ray3f;

/// Camera driven by inverse projection/view matrices, the way a frame
/// configuration hands them over. The primary ray direction is built by
/// unprojecting the pixel to a view-space target on a fixed near plane;
/// the returned direction is unit length only because the view matrix
/// is rigid, callers must not rely on it after further transforms.
pub struct RasterCamera {
    proj_inv: Matrix4f,
    view_inv: Matrix4f,
    bitmap: Bitmap,
}

impl RasterCamera {
    pub fn from_matrices(
        proj: &Matrix4f,
        view: &Matrix4f,
        width: usize,
        height: usize,
    ) -> std::result::Result<Self, String> {
        let proj_inv = proj
            .try_inverse()
            .ok_or_else(|| String::from("projection matrix is not invertible"))?;
        let view_inv = view
            .try_inverse()
            .ok_or_else(|| String::from("view matrix is not invertible"))?;
        Ok(Self {
            proj_inv,
            view_inv,
            bitmap: Bitmap::new(width, height),
        })
    }

    /// Convenience constructor that builds both inverse matrices
    /// directly, so it cannot fail.
    pub fn look_at(
        origin: Vector3f,
        target: Vector3f,
        up: Vector3f,
        fov_y_radians: Float,
        width: usize,
        height: usize,
    ) -> Self {
        let aspect = width as Float / height as Float;
        let proj_inv = nalgebra::Perspective3::new(aspect, fov_y_radians, 0.1, 1000.0).inverse();

        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let true_up = right.cross(&forward);
        // Rigid camera-to-world: basis columns plus the origin.
        let view_inv = Matrix4f::new(
            right.x, true_up.x, -forward.x, origin.x,
            right.y, true_up.y, -forward.y, origin.y,
            right.z, true_up.z, -forward.z, origin.z,
            0.0, 0.0, 0.0, 1.0,
        );

        Self {
            proj_inv,
            view_inv,
            bitmap: Bitmap::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    pub fn height(&self) -> usize {
        self.bitmap.height()
    }
}

impl Sensor for RasterCamera {
    fn sample_ray(&self, pixel: &Vector2f, jitter: &Vector2f) -> Ray3f {
        let width = self.bitmap.width() as Float;
        let height = self.bitmap.height() as Float;

        let pixel_center = pixel + jitter;
        let in_uv = Vector2f::new(pixel_center.x / width, pixel_center.y / height);
        let d = Vector2f::new(2.0 * in_uv.x - 1.0, 1.0 - 2.0 * in_uv.y);

        let origin = self.view_inv * Vector4f::new(0.0, 0.0, 0.0, 1.0);
        // Unproject onto a fixed near plane; the w component is dropped
        // deliberately, the xyz rows of an inverse projection do not
        // depend on it.
        let target = self.proj_inv * Vector4f::new(d.x, d.y, 0.01, 1.0);
        let t = target.xyz().normalize();
        let direction = self.view_inv * Vector4f::new(t.x, t.y, t.z, 0.0);

        Ray3f::new(origin.xyz(), direction.xyz())
    }

    fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    fn bitmap_mut(&mut self) -> &mut Bitmap {
        &mut self.bitmap
    }
}
