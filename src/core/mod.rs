// Copyright @yucwang 2026

pub mod bsdf;
pub mod frame;
pub mod integrator;
pub mod interaction;
pub mod material;
pub mod rng;
pub mod scene;
pub mod sensor;
