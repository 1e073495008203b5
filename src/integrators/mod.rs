// Copyright @yucwang 2026

pub mod debug;
pub mod path;
