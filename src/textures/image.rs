// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector4f};
use exr::prelude::*;
use image::io::Reader as ImageReader;
use image::GenericImageView;

/// RGBA texture sampled bilinearly with repeat wrapping. The alpha
/// channel feeds the opacity evaluator; HDR inputs get alpha 1.
pub struct ImageTexture {
    width: usize,
    height: usize,
    data: Vec<Vector4f>,
}

fn srgb_to_linear(v: Float) -> Float {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

impl ImageTexture {
    pub fn from_rgba(r: Float, g: Float, b: Float, a: Float) -> Self {
        Self {
            width: 1,
            height: 1,
            data: vec![Vector4f::new(r, g, b, a)],
        }
    }

    pub fn from_pixels(width: usize, height: usize, data: Vec<Vector4f>) -> std::result::Result<Self, String> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(format!(
                "texture has invalid layout: {}x{} with {} pixels",
                width,
                height,
                data.len()
            ));
        }
        Ok(Self { width, height, data })
    }

    pub fn from_exr(path: &str) -> std::result::Result<Self, String> {
        let image = read()
            .no_deep_data()
            .largest_resolution_level()
            .rgba_channels(
                |resolution, _| ImageTexture {
                    width: resolution.width(),
                    height: resolution.height(),
                    data: vec![Vector4f::zeros(); resolution.width() * resolution.height()],
                },
                |tex, position, (r, g, b, a): (f32, f32, f32, f32)| {
                    let idx = position.x() + tex.width * position.y();
                    tex.data[idx] = Vector4f::new(r, g, b, a);
                },
            )
            .first_valid_layer()
            .all_attributes()
            .from_file(path)
            .map_err(|e| format!("failed to read exr {}: {}", path, e))?;

        Ok(image.layer_data.channel_data.pixels)
    }

    pub fn from_image(path: &str, srgb: bool) -> std::result::Result<Self, String> {
        let img = ImageReader::open(path)
            .map_err(|e| format!("failed to open image {}: {}", path, e))?
            .decode()
            .map_err(|e| format!("failed to decode image {}: {}", path, e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba32f();
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let p = rgba.get_pixel(x, y);
                let (mut r, mut g, mut b) = (p[0], p[1], p[2]);
                if srgb {
                    r = srgb_to_linear(r);
                    g = srgb_to_linear(g);
                    b = srgb_to_linear(b);
                }
                data.push(Vector4f::new(r, g, b, p[3]));
            }
        }

        Self::from_pixels(width as usize, height as usize, data)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn texel(&self, x: isize, y: isize) -> Vector4f {
        let w = self.width as isize;
        let h = self.height as isize;
        let xi = x.rem_euclid(w) as usize;
        let yi = y.rem_euclid(h) as usize;
        self.data[xi + self.width * yi]
    }

    pub fn eval(&self, uv: Vector2f) -> Vector4f {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);
        let fx = u * self.width as Float - 0.5;
        let fy = v * self.height as Float - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let x0 = x0 as isize;
        let y0 = y0 as isize;

        let p00 = self.texel(x0, y0);
        let p10 = self.texel(x0 + 1, y0);
        let p01 = self.texel(x0, y0 + 1);
        let p11 = self.texel(x0 + 1, y0 + 1);

        let top = p00 * (1.0 - tx) + p10 * tx;
        let bottom = p01 * (1.0 - tx) + p11 * tx;
        top * (1.0 - ty) + bottom * ty
    }
}
