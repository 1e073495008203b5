// Copyright @yucwang 2026

use crate::math::constants::Float;

/// Per-path sample generator with a 32-bit state. One instance is owned
/// exclusively by each (pixel, sample) invocation; the mutation order of
/// the state defines the sample sequence, so for a fixed seed the output
/// is reproducible across runs.
pub struct SampleRng {
    state: u32,
}

impl SampleRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    // PCG output permutation on an LCG state.
    pub fn next_u32(&mut self) -> u32 {
        let prev = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);
        self.state = prev;
        let word = ((prev >> ((prev >> 28) + 4)) ^ prev).wrapping_mul(277803737);
        (word >> 22) ^ word
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> Float {
        ((self.next_u32() >> 8) as Float) * (1.0 / 16777216.0)
    }
}
