// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;

pub trait Sensor: Sync {
    /// Primary ray for a pixel coordinate plus a sub-pixel jitter
    /// offset in [0, 1)^2.
    fn sample_ray(&self, pixel: &Vector2f, jitter: &Vector2f) -> Ray3f;
    fn bitmap(&self) -> &Bitmap;
    fn bitmap_mut(&mut self) -> &mut Bitmap;
}
