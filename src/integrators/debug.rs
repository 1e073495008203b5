// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::rng::SampleRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};

/// Which material or geometry channel the visualizer maps to RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    Metallic,
    Roughness,
    Normal,
    BaseColor,
    Emissive,
    Opacity,
}

impl DebugMode {
    /// Parses a command-line mode name.
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name {
            "metallic" => Ok(Self::Metallic),
            "roughness" => Ok(Self::Roughness),
            "normal" => Ok(Self::Normal),
            "basecolor" => Ok(Self::BaseColor),
            "emissive" => Ok(Self::Emissive),
            "opacity" => Ok(Self::Opacity),
            other => Err(format!("unknown debug mode: {}", other)),
        }
    }
}

/// Single-hit channel visualizer. Shoots one deterministic primary ray
/// per pixel (pixel-center jitter, no path continuation) and maps the
/// selected surface quantity to a color. Misses render black.
pub struct DebugIntegrator {
    pub mode: DebugMode,
}

impl DebugIntegrator {
    pub fn new(mode: DebugMode) -> Self {
        Self { mode }
    }
}

fn splat(v: Float) -> Vector3f {
    Vector3f::new(v, v, v)
}

impl Integrator for DebugIntegrator {
    fn trace_ray_forward(
        &self,
        scene: &Scene,
        sensor: &dyn Sensor,
        pixel: Vector2f,
        rng: &mut SampleRng,
    ) -> Vector3f {
        let jitter = Vector2f::new(0.5, 0.5);
        let ray = sensor.sample_ray(&pixel, &jitter);

        let payload = match scene.trace_ray(&ray, rng) {
            Some(p) => p,
            None => return Vector3f::zeros(),
        };

        let material = scene.material(payload.material_id);
        match self.mode {
            DebugMode::Metallic => {
                let pbr = material.evaluate(scene.textures(), &payload.hit, false);
                splat(pbr.metallic)
            }
            DebugMode::Roughness => {
                let pbr = material.evaluate(scene.textures(), &payload.hit, false);
                splat(pbr.roughness)
            }
            DebugMode::Normal => {
                // Remap [-1, 1] shading normal into displayable [0, 1].
                (payload.hit.sh_normal + Vector3f::new(1.0, 1.0, 1.0)) * 0.5
            }
            DebugMode::BaseColor => {
                let pbr = material.evaluate(scene.textures(), &payload.hit, false);
                pbr.albedo
            }
            DebugMode::Emissive => {
                let pbr = material.evaluate(scene.textures(), &payload.hit, false);
                pbr.emissive
            }
            DebugMode::Opacity => splat(material.opacity(scene.textures(), &payload.hit.uv)),
        }
    }

    fn samples_per_pixel(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::ShadeMaterial;
    use crate::core::scene::SceneObject;
    use crate::emitters::{EnvMap, LightSource};
    use crate::math::constants::Vector4f;
    use crate::sensors::perspective::RasterCamera;
    use crate::shapes::sphere::Sphere;
    use crate::textures::image::ImageTexture;

    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        let tex = ImageTexture::from_pixels(
            4,
            2,
            vec![Vector4f::new(1.0, 1.0, 1.0, 1.0); 8],
        )
        .unwrap();
        scene.set_light(LightSource::Environment(EnvMap::from_texture(
            tex,
            0.0,
            Vector3f::new(1.0, 1.0, 1.0),
        )));
        let mut mat = ShadeMaterial::default();
        mat.base_color_factor = Vector4f::new(0.8, 0.4, 0.2, 1.0);
        mat.metallic_factor = 0.75;
        mat.emissive_factor = Vector3f::new(0.1, 0.2, 0.3);
        let id = scene.add_material(mat);
        scene.add_object(SceneObject::new(
            Box::new(Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0)),
            id,
        ));
        scene
    }

    fn center_pixel(scene: &Scene, mode: DebugMode) -> Vector3f {
        let cam = RasterCamera::look_at(
            Vector3f::zeros(),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_3,
            8,
            8,
        );
        let mut rng = SampleRng::new(0);
        DebugIntegrator::new(mode).trace_ray_forward(
            scene,
            &cam,
            Vector2f::new(3.5, 3.5),
            &mut rng,
        )
    }

    #[test]
    fn test_mode_names_round_trip() {
        assert_eq!(DebugMode::from_name("normal").unwrap(), DebugMode::Normal);
        assert_eq!(
            DebugMode::from_name("basecolor").unwrap(),
            DebugMode::BaseColor
        );
        assert!(DebugMode::from_name("depth").is_err());
    }

    #[test]
    fn test_metallic_channel() {
        let c = center_pixel(&test_scene(), DebugMode::Metallic);
        assert!((c.x - 0.75).abs() < 1e-5);
        assert_eq!(c.x, c.y);
        assert_eq!(c.y, c.z);
    }

    #[test]
    fn test_emissive_channel() {
        let c = center_pixel(&test_scene(), DebugMode::Emissive);
        assert!((c.x - 0.1).abs() < 1e-5);
        assert!((c.y - 0.2).abs() < 1e-5);
        assert!((c.z - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_opacity_opaque_is_one() {
        let c = center_pixel(&test_scene(), DebugMode::Opacity);
        assert_eq!(c, Vector3f::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_normal_remapped_to_unit_range() {
        let c = center_pixel(&test_scene(), DebugMode::Normal);
        for ch in 0..3 {
            assert!(c[ch] >= 0.0 && c[ch] <= 1.0);
        }
        // Camera-facing front of the sphere: normal near +z, so the
        // blue channel sits near 1.
        assert!(c.z > 0.95);
    }

    #[test]
    fn test_miss_renders_black() {
        // Bright environment must not leak into the visualizer.
        let mut scene = Scene::new();
        scene.set_light(LightSource::Environment(EnvMap::from_texture(
            ImageTexture::from_pixels(4, 2, vec![Vector4f::new(9.0, 9.0, 9.0, 1.0); 8]).unwrap(),
            0.0,
            Vector3f::new(1.0, 1.0, 1.0),
        )));
        let c = center_pixel(&scene, DebugMode::BaseColor);
        assert_eq!(c, Vector3f::zeros());
    }
}
