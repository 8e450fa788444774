#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

pub trait F32Ext
where
    Self: Sized,
{
    fn sqr(self) -> Self;
    fn saturate(self) -> Self;
    fn inverse_sqrt(self) -> Self;

    /// Hermite interpolation between `edge0` and `edge1`, as in GLSL.
    fn smoothstep(self, edge0: Self, edge1: Self) -> Self;
}

impl F32Ext for f32 {
    fn sqr(self) -> Self {
        self * self
    }

    fn saturate(self) -> Self {
        self.clamp(0.0, 1.0)
    }

    fn inverse_sqrt(self) -> Self {
        1.0 / self.max(crate::CAUSTICA_EPSILON).sqrt()
    }

    fn smoothstep(self, edge0: Self, edge1: Self) -> Self {
        let t = ((self - edge0) / (edge1 - edge0)).saturate();

        t * t * (3.0 - 2.0 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep() {
        assert_eq!(0.0, (-1.0f32).smoothstep(0.0, 1.0));
        assert_eq!(0.5, 0.5f32.smoothstep(0.0, 1.0));
        assert_eq!(1.0, 3.0f32.smoothstep(0.0, 1.0));
    }
}
