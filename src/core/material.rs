// Copyright @yucwang 2026

use crate::core::frame::Frame;
use crate::core::interaction::SurfaceHit;
use crate::math::constants::{Float, Vector3f, Vector4f};
use crate::textures::image::ImageTexture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

/// Stored material, indexed by material id out of the scene arena.
/// Read-only for the duration of a trace.
#[derive(Debug, Clone)]
pub struct ShadeMaterial {
    pub base_color_factor: Vector4f,
    pub base_color_texture: Option<usize>,
    pub metallic_factor: Float,
    pub roughness_factor: Float,
    pub emissive_factor: Vector3f,
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: Float,
    /// 0 means thin-walled: the surface has no interior volume.
    pub thickness_factor: Float,
    pub attenuation_color: Vector3f,
    pub attenuation_distance: Float,
    pub transmission_factor: Float,
    pub ior: Float,
}

impl Default for ShadeMaterial {
    fn default() -> Self {
        Self {
            base_color_factor: Vector4f::new(1.0, 1.0, 1.0, 1.0),
            base_color_texture: None,
            metallic_factor: 0.0,
            roughness_factor: 1.0,
            emissive_factor: Vector3f::zeros(),
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            thickness_factor: 0.0,
            attenuation_color: Vector3f::new(1.0, 1.0, 1.0),
            attenuation_distance: 0.0,
            transmission_factor: 0.0,
            ior: 1.5,
        }
    }
}

impl ShadeMaterial {
    /// Resolved opacity in [0, 1] for the any-hit transparency decision.
    /// Mask mode thresholds to exactly 0 or 1; blend passes the alpha
    /// through unmodified, including a sampled texture alpha.
    pub fn opacity(&self, textures: &[ImageTexture], uv: &crate::math::constants::Vector2f) -> Float {
        let mut base_color_alpha = self.base_color_factor.w;
        if let Some(tex_id) = self.base_color_texture {
            if let Some(tex) = textures.get(tex_id) {
                base_color_alpha *= tex.eval(*uv).w;
            }
        }

        match self.alpha_mode {
            AlphaMode::Opaque => 1.0,
            AlphaMode::Mask => {
                if base_color_alpha > self.alpha_cutoff {
                    1.0
                } else {
                    0.0
                }
            }
            AlphaMode::Blend => base_color_alpha,
        }
    }
}

/// Material evaluated at a hit point. Built once per bounce from the
/// stored material plus interpolated vertex/texture data, then never
/// mutated.
#[derive(Debug, Clone)]
pub struct PbrMaterial {
    pub albedo: Vector3f,
    pub metallic: Float,
    pub roughness: Float,
    pub emissive: Vector3f,
    pub frame: Frame,
    pub f0: Vector3f,
    /// eta_i / eta_t across the interface for the side the path is on.
    pub eta: Float,
    pub transmission: Float,
    pub thin_walled: bool,
    pub absorption: Vector3f,
}

impl ShadeMaterial {
    pub fn evaluate(&self, textures: &[ImageTexture], hit: &SurfaceHit, inside: bool) -> PbrMaterial {
        let mut base_color = self.base_color_factor.component_mul(&hit.color);
        if let Some(tex_id) = self.base_color_texture {
            if let Some(tex) = textures.get(tex_id) {
                base_color = base_color.component_mul(&tex.eval(hit.uv));
            }
        }

        let albedo = base_color.xyz();
        let metallic = self.metallic_factor.clamp(0.0, 1.0);
        // The floor keeps the GGX lobe a finite spike for authored
        // roughness 0; true mirrors go through the specular events.
        let roughness = self.roughness_factor.clamp(1e-3, 1.0);

        let r = (self.ior - 1.0) / (self.ior + 1.0);
        let dielectric_f0 = r * r;
        let f0 = Vector3f::new(dielectric_f0, dielectric_f0, dielectric_f0) * (1.0 - metallic)
            + albedo * metallic;

        let eta = if inside { self.ior } else { 1.0 / self.ior };

        PbrMaterial {
            albedo,
            metallic,
            roughness,
            emissive: self.emissive_factor,
            frame: Frame::from_normal(&hit.sh_normal),
            f0,
            eta,
            transmission: self.transmission_factor.clamp(0.0, 1.0),
            thin_walled: self.thickness_factor == 0.0,
            absorption: self.absorption_coefficient(),
        }
    }

    /// Beer-Lambert extinction per channel. A zero channel means
    /// non-absorbing and is skipped by the attenuation step.
    fn absorption_coefficient(&self) -> Vector3f {
        if self.attenuation_distance <= 0.0 {
            return Vector3f::zeros();
        }
        let c = &self.attenuation_color;
        Vector3f::new(
            -c.x.clamp(1e-6, 1.0).ln() / self.attenuation_distance,
            -c.y.clamp(1e-6, 1.0).ln() / self.attenuation_distance,
            -c.z.clamp(1e-6, 1.0).ln() / self.attenuation_distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;

    fn uv() -> Vector2f {
        Vector2f::new(0.25, 0.75)
    }

    #[test]
    fn test_opacity_mask_thresholds_exactly() {
        let mut mat = ShadeMaterial::default();
        mat.alpha_mode = AlphaMode::Mask;
        mat.alpha_cutoff = 0.5;

        mat.base_color_factor.w = 0.51;
        assert_eq!(mat.opacity(&[], &uv()), 1.0);
        mat.base_color_factor.w = 0.5;
        assert_eq!(mat.opacity(&[], &uv()), 0.0);
        mat.base_color_factor.w = 0.1;
        assert_eq!(mat.opacity(&[], &uv()), 0.0);
    }

    #[test]
    fn test_opacity_blend_passes_through() {
        let mut mat = ShadeMaterial::default();
        mat.alpha_mode = AlphaMode::Blend;
        mat.base_color_factor.w = 0.37;
        assert!((mat.opacity(&[], &uv()) - 0.37).abs() < 1e-6);
    }

    #[test]
    fn test_opacity_blend_with_texture_alpha() {
        let tex = ImageTexture::from_rgba(1.0, 1.0, 1.0, 0.5);
        let mut mat = ShadeMaterial::default();
        mat.alpha_mode = AlphaMode::Blend;
        mat.base_color_factor.w = 0.5;
        mat.base_color_texture = Some(0);
        assert!((mat.opacity(&[tex], &uv()) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_opaque_always_one() {
        let mut mat = ShadeMaterial::default();
        mat.base_color_factor.w = 0.0;
        assert_eq!(mat.opacity(&[], &uv()), 1.0);
    }

    #[test]
    fn test_evaluate_floors_roughness() {
        let mut mat = ShadeMaterial::default();
        mat.roughness_factor = 0.0;
        let hit = SurfaceHit::new(
            Vector3f::zeros(),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            uv(),
            &Vector3f::new(0.0, 1.0, 0.0),
        );
        let pbr = mat.evaluate(&[], &hit, false);
        assert!(pbr.roughness >= 1e-3);
    }

    #[test]
    fn test_absorption_zero_distance_is_zero() {
        let mut mat = ShadeMaterial::default();
        mat.attenuation_distance = 0.0;
        mat.attenuation_color = Vector3f::new(0.5, 0.5, 0.5);
        assert_eq!(mat.absorption_coefficient(), Vector3f::zeros());
    }

    #[test]
    fn test_absorption_from_attenuation() {
        let mut mat = ShadeMaterial::default();
        mat.attenuation_distance = 2.0;
        mat.attenuation_color = Vector3f::new(0.5, 1.0, 0.25);
        let a = mat.absorption_coefficient();
        assert!((a.x - (-(0.5 as Float).ln() / 2.0)).abs() < 1e-5);
        // A fully transmissive channel carries zero absorption.
        assert!(a.y.abs() < 1e-5);
        assert!(a.z > a.x);
    }
}
