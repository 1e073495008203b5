// Copyright @yucwang 2026

use crate::math::constants::{Float, PI, Vector2f, Vector3f};

fn clamp01(v: Float) -> Float {
    if v < 0.0 {
        0.0
    } else if v > 1.0 {
        1.0
    } else {
        v
    }
}

pub fn ggx_d(cos_theta: Float, alpha: Float) -> Float {
    if cos_theta <= 0.0 {
        return 0.0;
    }
    let a = alpha.max(1e-4);
    let a2 = a * a;
    let cos2 = cos_theta * cos_theta;
    // cos2 * (a2 - 1) + 1 cancels to 0 in f32 for tiny alpha at normal
    // incidence; this form keeps the denominator at least cos2 * a2.
    let denom = cos2 * a2 + (1.0 - cos2);
    a2 / (PI * denom * denom)
}

pub fn ggx_g1(cos_theta: Float, alpha: Float) -> Float {
    if cos_theta <= 0.0 {
        return 0.0;
    }
    let a = alpha.max(1e-4);
    let cos2 = cos_theta * cos_theta;
    let sin2 = (1.0 - cos2).max(0.0);
    if sin2 <= 0.0 {
        return 1.0;
    }
    let tan2 = sin2 / cos2.max(1e-6);
    let root = (1.0 + a * a * tan2).sqrt();
    2.0 / (1.0 + root)
}

pub fn ggx_g(cos_i: Float, cos_o: Float, alpha: Float) -> Float {
    ggx_g1(cos_i.abs(), alpha) * ggx_g1(cos_o.abs(), alpha)
}

pub fn pdf_ggx_vndf(wo: &Vector3f, m: &Vector3f, alpha: Float) -> Float {
    if wo.z <= 0.0 || m.z <= 0.0 {
        return 0.0;
    }
    let d = ggx_d(m.z, alpha);
    let g1 = ggx_g1(wo.z, alpha);
    let dot = wo.dot(m).abs();
    if wo.z.abs() <= 1e-6 {
        return 0.0;
    }
    d * g1 * dot / wo.z.abs()
}

pub fn sample_ggx_vndf(wo: &Vector3f, u: &Vector2f, alpha: Float) -> Vector3f {
    let a = alpha.max(1e-4);
    let wo = Vector3f::new(a * wo.x, a * wo.y, wo.z).normalize();

    let mut t1 = Vector3f::new(1.0, 0.0, 0.0);
    if wo.z < 0.9999 {
        t1 = Vector3f::new(0.0, 0.0, 1.0).cross(&wo).normalize();
    }
    let t2 = wo.cross(&t1);

    let u1 = clamp01(u.x);
    let u2 = clamp01(u.y);
    let r = u1.sqrt();
    let phi = 2.0 * PI * u2;
    let t1p = r * phi.cos();
    let mut t2p = r * phi.sin();
    let s = 0.5 * (1.0 + wo.z);
    t2p = (1.0 - s) * (1.0 - t1p * t1p).max(0.0).sqrt() + s * t2p;

    let nh = t1 * t1p + t2 * t2p + wo * (1.0 - t1p * t1p - t2p * t2p).max(0.0).sqrt();
    Vector3f::new(a * nh.x, a * nh.y, nh.z.max(0.0)).normalize()
}

pub fn reflect(wo: &Vector3f, m: &Vector3f) -> Vector3f {
    2.0 * wo.dot(m) * m - wo
}

pub fn refract(wo: &Vector3f, m: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = wo.dot(m).max(-1.0).min(1.0);
    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(-eta * wo + (eta * cos_i - cos_t) * m)
}

pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_i = cos_i.max(-1.0).min(1.0);
    let entering = cos_i > 0.0;
    let (eta_i, eta_t) = if entering { (eta_i, eta_t) } else { (eta_t, eta_i) };
    cos_i = cos_i.abs();

    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let eta = eta_i / eta_t;
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    0.5 * (r_parl * r_parl + r_perp * r_perp)
}

pub fn fresnel_schlick(f0: &Vector3f, cos_theta: Float) -> Vector3f {
    let cos_theta = cos_theta.max(0.0).min(1.0);
    let one_minus = (1.0 - cos_theta).powi(5);
    f0 + (Vector3f::new(1.0, 1.0, 1.0) - f0) * one_minus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ggx_d_normalized_direction() {
        assert_eq!(ggx_d(-0.1, 0.5), 0.0);
        assert!(ggx_d(1.0, 0.2) > 0.0);
    }

    #[test]
    fn test_ggx_d_finite_for_smooth_surfaces() {
        // Near-zero alpha at normal incidence used to cancel the
        // denominator to 0 and blow up to infinity.
        for &alpha in &[0.0, 1e-5, 1e-4, 1e-3] {
            for &cos in &[1.0, 0.9999, 0.5, 0.05] {
                let d = ggx_d(cos, alpha);
                assert!(d.is_finite(), "alpha {} cos {} gave {}", alpha, cos, d);
                assert!(d >= 0.0);
            }
        }
    }

    #[test]
    fn test_vndf_sample_upper_hemisphere() {
        let wo = Vector3f::new(0.3, 0.1, 0.9).normalize();
        for i in 0..16 {
            let u = Vector2f::new((i as Float + 0.5) / 16.0, (i as Float * 0.61).fract());
            let m = sample_ggx_vndf(&wo, &u, 0.4);
            assert!(m.z >= 0.0);
            assert!((m.norm() - 1.0).abs() < 1e-4);
            assert!(pdf_ggx_vndf(&wo, &m, 0.4) > 0.0);
        }
    }

    #[test]
    fn test_fresnel_total_internal_reflection() {
        // Grazing exit from dense to thin medium reflects everything.
        let f = fresnel_dielectric(0.1, 1.5, 1.0);
        assert!((f - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_schlick_limits() {
        let f0 = Vector3f::new(0.04, 0.04, 0.04);
        let at_normal = fresnel_schlick(&f0, 1.0);
        assert!((at_normal.x - 0.04).abs() < 1e-6);
        let grazing = fresnel_schlick(&f0, 0.0);
        assert!((grazing.x - 1.0).abs() < 1e-6);
    }
}
