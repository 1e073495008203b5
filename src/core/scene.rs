// Copyright @yucwang 2026

use crate::core::interaction::{HitPayload, SurfaceHit};
use crate::core::material::ShadeMaterial;
use crate::core::rng::SampleRng;
use crate::emitters::{LightSample, LightSource, SkyDescriptor, SunLight};
use crate::math::constants::{EPSILON, Float, Vector3f, Vector4f};
use crate::math::ray::Ray3f;
use crate::shapes::Shape;
use crate::textures::image::ImageTexture;

pub struct SceneObject {
    pub shape: Box<dyn Shape>,
    pub material_id: usize,
    /// Per-instance tint multiplied into the base color, the slot
    /// interpolated vertex colors would otherwise fill.
    pub color: Vector4f,
}

impl SceneObject {
    pub fn new(shape: Box<dyn Shape>, material_id: usize) -> Self {
        Self {
            shape,
            material_id,
            color: Vector4f::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    pub fn tinted(mut self, color: Vector4f) -> Self {
        self.color = color;
        self
    }
}

/// Shared, read-only scene data for the duration of a trace: geometry,
/// the material and texture arenas (integer handles only, the arenas own
/// the data), and the scene-wide light representation.
pub struct Scene {
    objects: Vec<SceneObject>,
    materials: Vec<ShadeMaterial>,
    textures: Vec<ImageTexture>,
    light: LightSource,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            materials: vec![ShadeMaterial::default()],
            textures: Vec::new(),
            light: LightSource::Sun {
                sun: SunLight::new(
                    Vector3f::new(0.33, -0.81, 0.48),
                    Vector3f::new(1.0, 0.96, 0.90),
                    10.0,
                ),
                sky: SkyDescriptor::default(),
            },
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn add_material(&mut self, material: ShadeMaterial) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_texture(&mut self, texture: ImageTexture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn set_light(&mut self, light: LightSource) {
        self.light = light;
    }

    pub fn material(&self, id: usize) -> &ShadeMaterial {
        self.materials.get(id).unwrap_or(&self.materials[0])
    }

    pub fn textures(&self) -> &[ImageTexture] {
        &self.textures
    }

    pub fn light(&self) -> &LightSource {
        &self.light
    }

    /// Closest hit surviving the stochastic-alpha any-hit filter: a hit
    /// whose opacity loses against a uniform draw is treated as
    /// transparent and the ray continues behind it.
    pub fn trace_ray(&self, ray: &Ray3f, rng: &mut SampleRng) -> Option<HitPayload> {
        let mut t_min = EPSILON;
        loop {
            let candidate = self.closest_hit(ray, t_min)?;
            let (t, object_id, local) = candidate;
            let object = &self.objects[object_id];

            let material = self.material(object.material_id);
            let opacity = material.opacity(&self.textures, &local.uv);
            if opacity >= 1.0 || rng.next_f32() <= opacity {
                let origin = ray.origin();
                let hit = SurfaceHit::new(local.pos, local.geo_normal, local.sh_normal, local.uv, &origin)
                    .with_color(object.color);
                return Some(HitPayload {
                    t,
                    material_id: object.material_id,
                    hit,
                });
            }

            // Transparent: step past this surface and keep going.
            t_min = t + EPSILON;
        }
    }

    /// Occlusion query toward a light, any-hit with the same stochastic
    /// alpha decision. Returns true when something opaque is in the way.
    pub fn trace_shadow(&self, ray: &Ray3f, max_dist: Float, rng: &mut SampleRng) -> bool {
        let mut t_min = EPSILON;
        loop {
            let candidate = match self.closest_hit_limited(ray, t_min, max_dist) {
                Some(c) => c,
                None => return false,
            };
            let (t, object_id, local) = candidate;

            let material = self.material(self.objects[object_id].material_id);
            let opacity = material.opacity(&self.textures, &local.uv);
            if opacity >= 1.0 || rng.next_f32() <= opacity {
                return true;
            }
            t_min = t + EPSILON;
        }
    }

    // Returns (t, object index, raw hit).
    fn closest_hit(&self, ray: &Ray3f, t_min: Float) -> Option<(Float, usize, crate::shapes::LocalHit)> {
        self.closest_hit_limited(ray, t_min, crate::math::constants::INFINITE)
    }

    fn closest_hit_limited(
        &self,
        ray: &Ray3f,
        t_min: Float,
        t_max: Float,
    ) -> Option<(Float, usize, crate::shapes::LocalHit)> {
        let mut best: Option<(Float, usize, crate::shapes::LocalHit)> = None;
        let mut closest = t_max;
        for (object_id, object) in self.objects.iter().enumerate() {
            if let Some(local) = object.shape.intersect(ray, t_min, closest) {
                closest = local.t;
                best = Some((local.t, object_id, local));
            }
        }
        best
    }

    /// Radiance for a ray that left the scene: procedural sky or the
    /// rotated/scaled environment lookup, depending on the light mode.
    pub fn miss_radiance(&self, dir: &Vector3f) -> Vector3f {
        self.light.miss_radiance(dir)
    }

    pub fn sample_light(&self, rng: &mut SampleRng) -> LightSample {
        self.light.sample(rng)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::AlphaMode;
    use crate::math::constants::INFINITE;
    use crate::shapes::sphere::Sphere;

    fn sphere_at(z: Float, material_id: usize) -> SceneObject {
        SceneObject::new(Box::new(Sphere::new(Vector3f::new(0.0, 0.0, z), 1.0)), material_id)
    }

    #[test]
    fn test_trace_ray_closest() {
        let mut scene = Scene::new();
        let a = scene.add_material(ShadeMaterial::default());
        let b = scene.add_material(ShadeMaterial::default());
        scene.add_object(sphere_at(-5.0, a));
        scene.add_object(sphere_at(-10.0, b));

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0));
        let mut rng = SampleRng::new(0);
        let payload = scene.trace_ray(&ray, &mut rng).unwrap();
        assert_eq!(payload.material_id, a);
        assert!((payload.t - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_masked_surface_is_transparent() {
        let mut scene = Scene::new();
        let mut masked = ShadeMaterial::default();
        masked.alpha_mode = AlphaMode::Mask;
        masked.base_color_factor.w = 0.0;
        let front = scene.add_material(masked);
        let back = scene.add_material(ShadeMaterial::default());
        scene.add_object(sphere_at(-5.0, front));
        scene.add_object(sphere_at(-10.0, back));

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0));
        let mut rng = SampleRng::new(0);
        let payload = scene.trace_ray(&ray, &mut rng).unwrap();
        assert_eq!(payload.material_id, back);
    }

    #[test]
    fn test_shadow_through_masked_blocker() {
        let mut scene = Scene::new();
        let mut masked = ShadeMaterial::default();
        masked.alpha_mode = AlphaMode::Mask;
        masked.base_color_factor.w = 0.0;
        let blocker = scene.add_material(masked);
        scene.add_object(sphere_at(-5.0, blocker));

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0));
        let mut rng = SampleRng::new(0);
        assert!(!scene.trace_shadow(&ray, INFINITE, &mut rng));

        let opaque = scene.add_material(ShadeMaterial::default());
        scene.add_object(sphere_at(-10.0, opaque));
        assert!(scene.trace_shadow(&ray, INFINITE, &mut rng));
    }

    #[test]
    fn test_instance_tint_reaches_hit() {
        let mut scene = Scene::new();
        let m = scene.add_material(ShadeMaterial::default());
        let tint = Vector4f::new(0.2, 0.5, 0.9, 1.0);
        scene.add_object(sphere_at(-5.0, m).tinted(tint));

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0));
        let mut rng = SampleRng::new(0);
        let payload = scene.trace_ray(&ray, &mut rng).unwrap();
        assert_eq!(payload.hit.color, tint);

        let pbr = scene.material(payload.material_id).evaluate(scene.textures(), &payload.hit, false);
        assert!((pbr.albedo.x - 0.2).abs() < 1e-6);
        assert!((pbr.albedo.y - 0.5).abs() < 1e-6);
        assert!((pbr.albedo.z - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_respects_max_distance() {
        let mut scene = Scene::new();
        let m = scene.add_material(ShadeMaterial::default());
        scene.add_object(sphere_at(-5.0, m));

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0));
        let mut rng = SampleRng::new(0);
        assert!(!scene.trace_shadow(&ray, 2.0, &mut rng));
        assert!(scene.trace_shadow(&ray, 100.0, &mut rng));
    }
}
