// Copyright @yucwang 2026

pub mod bitmap;
pub mod constants;
pub mod ray;
pub mod warp;
