// Copyright @yucwang 2026

use super::LightSample;
use crate::core::rng::SampleRng;
use crate::math::constants::{luminance, Float, PI, Vector2f, Vector3f};
use crate::textures::image::ImageTexture;

/// Importance-sampled HDR environment, equirectangular with +y up.
/// Carries a fixed rotation about the vertical axis and a global
/// intensity scale, both applied at sampling/lookup time.
pub struct EnvMap {
    texture: ImageTexture,
    rotation: Float,
    intensity: Vector3f,
    width: usize,
    height: usize,
    row_cdf: Vec<Float>,
    col_cdf: Vec<Vec<Float>>,
    total_weight: Float,
}

fn rotate_y(d: &Vector3f, angle: Float) -> Vector3f {
    let (sin_a, cos_a) = angle.sin_cos();
    Vector3f::new(d.x * cos_a + d.z * sin_a, d.y, -d.x * sin_a + d.z * cos_a)
}

impl EnvMap {
    pub fn from_texture(texture: ImageTexture, rotation: Float, intensity: Vector3f) -> Self {
        let (width, height) = texture.dimensions();
        let mut env = Self {
            texture,
            rotation,
            intensity,
            width,
            height,
            row_cdf: vec![0.0; height + 1],
            col_cdf: vec![vec![0.0; width + 1]; height],
            total_weight: 0.0,
        };
        env.build_distribution();
        env
    }

    pub fn from_file(path: &str, rotation: Float, intensity: Vector3f) -> std::result::Result<Self, String> {
        let texture = ImageTexture::from_exr(path)?;
        log::info!("Loaded environment map from {}.", path);
        Ok(Self::from_texture(texture, rotation, intensity))
    }

    // Luminance times sin(theta), so rows near the poles do not get
    // oversampled relative to the solid angle they cover.
    fn build_distribution(&mut self) {
        let mut total = 0.0;
        for y in 0..self.height {
            let v = (y as Float + 0.5) / (self.height as Float);
            let sin_theta = (v * PI).sin();
            let mut row_sum = 0.0;
            for x in 0..self.width {
                let uv = Vector2f::new(
                    (x as Float + 0.5) / (self.width as Float),
                    v,
                );
                let rgb = self.texture.eval(uv).xyz();
                row_sum += luminance(&rgb) * sin_theta;
                self.col_cdf[y][x + 1] = row_sum;
            }
            total += row_sum;
            self.row_cdf[y + 1] = total;
        }
        self.total_weight = total;
    }

    fn search_cdf(cdf: &[Float], target: Float) -> usize {
        let mut lo = 0usize;
        let mut hi = cdf.len() - 1;
        while lo + 1 < hi {
            let mid = (lo + hi) / 2;
            if cdf[mid] <= target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    fn direction_from_uv(uv: &Vector2f) -> Vector3f {
        let theta = uv.y * PI;
        let phi = 2.0 * PI * uv.x - PI;
        let sin_theta = theta.sin();
        Vector3f::new(sin_theta * phi.sin(), theta.cos(), -sin_theta * phi.cos())
    }

    fn uv_from_direction(d: &Vector3f) -> Vector2f {
        let u = (d.x.atan2(-d.z) + PI) / (2.0 * PI);
        let v = d.y.clamp(-1.0, 1.0).acos() / PI;
        Vector2f::new(u - u.floor(), v)
    }

    /// Draw a direction proportional to the map's luminance. Consumes 3
    /// uniform samples; the returned radiance is already divided by the
    /// pdf and carries the intensity scale.
    pub fn sample(&self, rng: &mut SampleRng) -> LightSample {
        let u1 = rng.next_f32();
        let u2 = rng.next_f32();
        let u3 = rng.next_f32();

        if self.total_weight <= 0.0 {
            return LightSample::invalid();
        }

        let y = Self::search_cdf(&self.row_cdf, u1 * self.total_weight);
        let row = &self.col_cdf[y];
        let row_weight = self.row_cdf[y + 1] - self.row_cdf[y];
        if row_weight <= 0.0 {
            return LightSample::invalid();
        }
        let x = Self::search_cdf(row, u2 * row_weight);
        let weight = row[x + 1] - row[x];
        if weight <= 0.0 {
            return LightSample::invalid();
        }

        let uv = Vector2f::new(
            (x as Float + u3) / (self.width as Float),
            (y as Float + 0.5) / (self.height as Float),
        );
        let sin_theta = (uv.y * PI).sin();
        if sin_theta <= 0.0 {
            return LightSample::invalid();
        }

        let pdf_uv = (weight / self.total_weight)
            * (self.width as Float)
            * (self.height as Float);
        let pdf = pdf_uv / (2.0 * PI * PI * sin_theta);
        if pdf <= 0.0 {
            return LightSample::invalid();
        }

        let radiance = self
            .texture
            .eval(uv)
            .xyz()
            .component_mul(&self.intensity);
        let dir = rotate_y(&Self::direction_from_uv(&uv), self.rotation);

        LightSample {
            radiance_over_pdf: radiance / pdf,
            dir_to_light: dir,
            pdf,
        }
    }

    /// Radiance lookup for a miss ray, with the rotation undone and the
    /// intensity scale applied.
    pub fn eval_direction(&self, dir: &Vector3f) -> Vector3f {
        let len = dir.norm();
        if len <= 0.0 {
            return Vector3f::zeros();
        }
        let local = rotate_y(&(dir / len), -self.rotation);
        let uv = Self::uv_from_direction(&local);
        self.texture.eval(uv).xyz().component_mul(&self.intensity)
    }
}
