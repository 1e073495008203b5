// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

/// Event classification for a BSDF sample. The empty set means the
/// sample was absorbed and the path must terminate; the transmission
/// bit is independent of the lobe bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BsdfEvent(u8);

impl BsdfEvent {
    pub const ABSORB: Self = Self(0);
    pub const DIFFUSE: Self = Self(1 << 0);
    pub const GLOSSY: Self = Self(1 << 1);
    pub const SPECULAR: Self = Self(1 << 2);
    pub const TRANSMISSION: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn is_absorb(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for BsdfEvent {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for BsdfEvent {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Result of evaluating the BSDF between two fixed world directions; used
/// only by next-event estimation. The cosine term is folded into both
/// lobes. `pdf == 0` signals the directions are not connected.
#[derive(Debug, Clone, Copy)]
pub struct BsdfEval {
    pub diffuse: Vector3f,
    pub glossy: Vector3f,
    pub pdf: Float,
}

impl Default for BsdfEval {
    fn default() -> Self {
        Self::zero()
    }
}

impl BsdfEval {
    pub fn zero() -> Self {
        Self {
            diffuse: Vector3f::zeros(),
            glossy: Vector3f::zeros(),
            pdf: 0.0,
        }
    }
}

/// Result of sampling a new direction. `bsdf_over_pdf` already folds the
/// cosine term and the pdf division into one quantity; the integrator
/// multiplies it straight into the path throughput and must never divide
/// by `pdf` itself.
#[derive(Debug, Clone, Copy)]
pub struct BsdfSample {
    pub direction: Vector3f,
    pub event: BsdfEvent,
    pub pdf: Float,
    pub bsdf_over_pdf: Vector3f,
}

impl BsdfSample {
    pub fn absorbed() -> Self {
        Self {
            direction: Vector3f::zeros(),
            event: BsdfEvent::ABSORB,
            pdf: 0.0,
            bsdf_over_pdf: Vector3f::zeros(),
        }
    }
}
