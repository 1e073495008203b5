// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::rng::SampleRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{luminance, DIRAC, EPSILON, Float, INFINITE, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Unidirectional path tracer: next-event estimation against the scene
/// light combined with BSDF sampling through multiple importance
/// sampling, Beer-Lambert attenuation inside media, and optional
/// Russian-roulette termination.
pub struct PathIntegrator {
    pub max_depth: u32,
    pub samples_per_pixel: u32,
    pub russian_roulette: bool,
    /// Post-hoc luminance clamp on the final per-sample radiance.
    pub firefly_clamp: Option<Float>,
}

/// Exactly one transition per bounce; everything but `Continue` ends
/// the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Continue,
    Miss,
    Absorbed,
    RouletteKilled,
}

/// Per-path mutable state, created at the start of a trace and dropped
/// at return. Throughput only ever grows through the roulette boost.
struct PathState {
    ray: Ray3f,
    radiance: Vector3f,
    throughput: Vector3f,
    inside: bool,
}

/// Balance weight folding the light pdf and the BSDF pdf into a single
/// unbiased factor. A delta light cannot be reached by BSDF sampling,
/// so its weight is exactly 1.
pub fn mis_weight(light_pdf: Float, bsdf_pdf: Float) -> Float {
    if light_pdf == DIRAC {
        1.0
    } else {
        light_pdf / (light_pdf + bsdf_pdf)
    }
}

fn offset_ray(pos: &Vector3f, dir: &Vector3f) -> Vector3f {
    pos + dir * EPSILON
}

impl PathIntegrator {
    pub fn new(max_depth: u32, samples_per_pixel: u32) -> Self {
        Self {
            max_depth,
            samples_per_pixel,
            russian_roulette: true,
            firefly_clamp: None,
        }
    }

    pub fn trace_path(&self, scene: &Scene, ray: Ray3f, rng: &mut SampleRng) -> Vector3f {
        let mut state = PathState {
            ray,
            radiance: Vector3f::zeros(),
            throughput: Vector3f::new(1.0, 1.0, 1.0),
            inside: false,
        };

        for _depth in 0..self.max_depth {
            match self.bounce(scene, &mut state, rng) {
                Transition::Continue => {}
                _ => break,
            }
        }

        state.radiance
    }

    fn bounce(&self, scene: &Scene, state: &mut PathState, rng: &mut SampleRng) -> Transition {
        let payload = match scene.trace_ray(&state.ray, rng) {
            Some(p) => p,
            None => {
                let dir = state.ray.dir();
                state.radiance += state
                    .throughput
                    .component_mul(&scene.miss_radiance(&dir));
                return Transition::Miss;
            }
        };

        let material = scene.material(payload.material_id);
        let pbr = material.evaluate(scene.textures(), &payload.hit, state.inside);

        // Emission is never subject to MIS.
        state.radiance += state.throughput.component_mul(&pbr.emissive);

        // Beer-Lambert extinction while travelling through a medium; a
        // zero channel means non-absorbing and stays untouched.
        if state.inside && !pbr.thin_walled {
            for c in 0..3 {
                if pbr.absorption[c] > 0.0 {
                    state.throughput[c] *= (-pbr.absorption[c] * payload.t).exp();
                }
            }
        }

        let wo = -state.ray.dir();

        // Next-event estimation: the sample is usable only when the
        // light sits on the side the path can scatter toward and the
        // pdf is not degenerate. The contribution stays pending until
        // the shadow test at the end of the bounce.
        let light = scene.sample_light(rng);
        let next_event_valid = ((light.dir_to_light.dot(&payload.hit.geo_normal) > 0.0)
            != state.inside)
            && light.pdf != 0.0;

        let mut contribution = Vector3f::zeros();
        if next_event_valid {
            let eval = pbr.bsdf_eval(&wo, &light.dir_to_light);
            if eval.pdf > 0.0 {
                let weight = mis_weight(light.pdf, eval.pdf);
                let w = state
                    .throughput
                    .component_mul(&light.radiance_over_pdf)
                    * weight;
                contribution += w.component_mul(&(eval.diffuse + eval.glossy));
            }
        }

        // Sample the BSDF for the continuation direction.
        let xi = [
            rng.next_f32(),
            rng.next_f32(),
            rng.next_f32(),
            rng.next_f32(),
        ];
        let sample = pbr.bsdf_sample(&wo, xi);
        let absorbed = sample.event.is_absorb();

        if !absorbed {
            state.throughput = state.throughput.component_mul(&sample.bsdf_over_pdf);

            let offset_dir = if sample.direction.dot(&payload.hit.geo_normal) > 0.0 {
                payload.hit.geo_normal
            } else {
                -payload.hit.geo_normal
            };
            state.ray.set_origin(offset_ray(&payload.hit.pos, &offset_dir));
            state.ray.set_dir(sample.direction);

            if sample.event.contains(crate::core::bsdf::BsdfEvent::TRANSMISSION) && !pbr.thin_walled
            {
                state.inside = !state.inside;
            }
        }

        // The pending contribution was computed against the pre-scatter
        // state, so it survives an absorbing BSDF sample; only its own
        // occlusion test can drop it.
        if next_event_valid {
            let shadow_offset = if light.dir_to_light.dot(&payload.hit.geo_normal) > 0.0 {
                payload.hit.geo_normal
            } else {
                -payload.hit.geo_normal
            };
            let shadow_ray = Ray3f::new(
                offset_ray(&payload.hit.pos, &shadow_offset),
                light.dir_to_light,
            );
            if !scene.trace_shadow(&shadow_ray, INFINITE, rng) {
                state.radiance += contribution;
            }
        }

        if absorbed {
            return Transition::Absorbed;
        }

        if self.russian_roulette {
            // Kill paths whose throughput no longer pays for the rays;
            // survivors are boosted to keep the estimator unbiased.
            let max_channel = state
                .throughput
                .x
                .max(state.throughput.y)
                .max(state.throughput.z);
            let continue_prob = (max_channel + 0.001).min(0.95);
            if rng.next_f32() >= continue_prob {
                return Transition::RouletteKilled;
            }
            state.throughput /= continue_prob;
        }

        Transition::Continue
    }

    pub fn sample_pixel(
        &self,
        scene: &Scene,
        sensor: &dyn Sensor,
        pixel: Vector2f,
        rng: &mut SampleRng,
    ) -> Vector3f {
        let jitter = Vector2f::new(rng.next_f32(), rng.next_f32());
        let ray = sensor.sample_ray(&pixel, &jitter);
        let mut radiance = self.trace_path(scene, ray, rng);

        if let Some(max_luminance) = self.firefly_clamp {
            let lum = luminance(&radiance);
            if lum > max_luminance {
                radiance *= max_luminance / lum;
            }
        }

        radiance
    }
}

impl Integrator for PathIntegrator {
    fn trace_ray_forward(
        &self,
        scene: &Scene,
        sensor: &dyn Sensor,
        pixel: Vector2f,
        rng: &mut SampleRng,
    ) -> Vector3f {
        self.sample_pixel(scene, sensor, pixel, rng)
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
