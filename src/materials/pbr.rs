// Copyright @yucwang 2026

use super::microfacet::{
    fresnel_dielectric, fresnel_schlick, ggx_d, ggx_g, pdf_ggx_vndf, reflect, refract,
    sample_ggx_vndf,
};
use crate::core::bsdf::{BsdfEval, BsdfEvent, BsdfSample};
use crate::core::material::PbrMaterial;
use crate::math::constants::{luminance, Float, INV_PI, Vector2f, Vector3f};
use crate::math::warp::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf};

// The transmissive dielectric fraction handles its own Fresnel
// reflection inside the delta branch, so the GGX reflection lobe only
// covers the remaining fraction of the material.
fn specular_scale(mat: &PbrMaterial) -> Float {
    1.0 - (1.0 - mat.metallic) * mat.transmission
}

// Lobe selection probabilities shared between sampling and the pdf of
// eval, so the one-sample estimator stays consistent.
fn lobe_weights(mat: &PbrMaterial, cos_o: Float) -> (Float, Float, Float) {
    let f = fresnel_schlick(&mat.f0, cos_o);
    let glossy_w = luminance(&f) * specular_scale(mat);
    let diffuse_w = luminance(&mat.albedo) * (1.0 - mat.metallic) * (1.0 - mat.transmission);
    let trans_w = (1.0 - mat.metallic) * mat.transmission;

    let sum = diffuse_w + glossy_w + trans_w;
    if sum <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    (diffuse_w / sum, glossy_w / sum, trans_w / sum)
}

fn eval_local(mat: &PbrMaterial, wo: &Vector3f, wi: &Vector3f) -> BsdfEval {
    if wo.z <= 1e-6 || wi.z <= 1e-6 {
        return BsdfEval::zero();
    }

    let (p_diffuse, p_glossy, _) = lobe_weights(mat, wo.z);
    if p_diffuse <= 0.0 && p_glossy <= 0.0 {
        return BsdfEval::zero();
    }

    let alpha = mat.roughness * mat.roughness;
    let diffuse_scale = (1.0 - mat.metallic) * (1.0 - mat.transmission);
    // Cosine folded into both lobes.
    let diffuse = mat.albedo * diffuse_scale * INV_PI * wi.z;

    let m = (wo + wi).normalize();
    let f = fresnel_schlick(&mat.f0, wo.dot(&m).max(0.0));
    let d = ggx_d(m.z, alpha);
    let g = ggx_g(wi.z, wo.z, alpha);
    let glossy = f * (specular_scale(mat) * d * g / (4.0 * wo.z.max(1e-6)));

    let pdf_diffuse = sample_cosine_hemisphere_pdf(wi.z);
    let dot_om = wo.dot(&m).abs().max(1e-6);
    let pdf_glossy = pdf_ggx_vndf(wo, &m, alpha) / (4.0 * dot_om);
    let pdf = p_diffuse * pdf_diffuse + p_glossy * pdf_glossy;

    BsdfEval { diffuse, glossy, pdf }
}

impl PbrMaterial {
    /// Evaluate both lobes between two world directions; next-event
    /// estimation only. `pdf == 0` means the directions are not
    /// connected by a samplable lobe.
    pub fn bsdf_eval(&self, wo_world: &Vector3f, wi_world: &Vector3f) -> BsdfEval {
        let mut wo = self.frame.to_local(&wo_world.normalize());
        let mut wi = self.frame.to_local(&wi_world.normalize());
        // Shade from whichever side the outgoing direction is on.
        if wo.z < 0.0 {
            wo.z = -wo.z;
            wi.z = -wi.z;
        }
        eval_local(self, &wo, &wi)
    }

    /// Draw a new direction from 4 uniform samples. `bsdf_over_pdf`
    /// folds the cosine and the pdf division and is finite even when the
    /// pdf underflows; an `ABSORB` event means the path must stop.
    pub fn bsdf_sample(&self, wo_world: &Vector3f, xi: [Float; 4]) -> BsdfSample {
        let mut wo = self.frame.to_local(&wo_world.normalize());
        let flip = wo.z < 0.0;
        if flip {
            wo.z = -wo.z;
        }
        if wo.z <= 1e-6 {
            return BsdfSample::absorbed();
        }

        let (p_diffuse, p_glossy, p_trans) = lobe_weights(self, wo.z);
        if p_diffuse + p_glossy + p_trans <= 0.0 {
            return BsdfSample::absorbed();
        }

        let (wi, event, pdf, bsdf_over_pdf) = if xi[0] < p_diffuse {
            let wi = sample_cosine_hemisphere(&Vector2f::new(xi[1], xi[2]));
            let eval = eval_local(self, &wo, &wi);
            if eval.pdf <= 0.0 {
                return BsdfSample::absorbed();
            }
            let value = (eval.diffuse + eval.glossy) / eval.pdf;
            (wi, BsdfEvent::DIFFUSE, eval.pdf, value)
        } else if xi[0] < p_diffuse + p_glossy {
            let alpha = self.roughness * self.roughness;
            let m = sample_ggx_vndf(&wo, &Vector2f::new(xi[1], xi[2]), alpha);
            let wi = reflect(&wo, &m);
            if wi.z <= 1e-6 {
                return BsdfSample::absorbed();
            }
            let eval = eval_local(self, &wo, &wi);
            if eval.pdf <= 0.0 {
                return BsdfSample::absorbed();
            }
            let value = (eval.diffuse + eval.glossy) / eval.pdf;
            (wi, BsdfEvent::GLOSSY, eval.pdf, value)
        } else {
            // Smooth dielectric interface: Fresnel splits between a
            // specular reflection and a transmission event. The Fresnel
            // factor cancels against the split probability, leaving the
            // lobe strength over its selection probability. Delta lobes
            // carry no density, pdf stays 0.
            let m = Vector3f::new(0.0, 0.0, 1.0);
            let weight = (1.0 - self.metallic) * self.transmission / p_trans;
            let fr = fresnel_dielectric(wo.z, self.eta, 1.0);
            if xi[3] < fr {
                let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
                (wi, BsdfEvent::SPECULAR, 0.0, Vector3f::new(weight, weight, weight))
            } else if self.thin_walled {
                // No interior: pass straight through without bending.
                let wi = -wo;
                (
                    wi,
                    BsdfEvent::SPECULAR | BsdfEvent::TRANSMISSION,
                    0.0,
                    self.albedo * weight,
                )
            } else {
                match refract(&wo, &m, self.eta) {
                    Some(wt) => (
                        wt,
                        BsdfEvent::SPECULAR | BsdfEvent::TRANSMISSION,
                        0.0,
                        self.albedo * weight,
                    ),
                    // Total internal reflection.
                    None => (
                        Vector3f::new(-wo.x, -wo.y, wo.z),
                        BsdfEvent::SPECULAR,
                        0.0,
                        Vector3f::new(weight, weight, weight),
                    ),
                }
            }
        };

        let mut wi = wi;
        if flip {
            wi.z = -wi.z;
        }
        let direction = self.frame.to_world(&wi);

        BsdfSample {
            direction,
            event,
            pdf,
            bsdf_over_pdf,
        }
    }
}
