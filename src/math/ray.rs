// Copyright @yucwang 2026

use super::constants::{Float, Vector3f};

/// A ray owned by one integrator iteration. The direction is whatever
/// the producer left in it; shapes must not assume unit length.
#[derive(Debug, Clone)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f) -> Self {
        Self { origin: o, dir: d }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn set_origin(&mut self, o: Vector3f) {
        self.origin = o;
    }

    pub fn set_dir(&mut self, d: Vector3f) {
        self.dir = d;
    }
}

/* Tests for Ray */
