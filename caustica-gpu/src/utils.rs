mod f32_ext;
mod vec3_ext;

use core::ops;

pub use self::f32_ext::*;
pub use self::vec3_ext::*;

pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: ops::Add<Output = T>,
    T: ops::Sub<Output = T>,
    T: ops::Mul<f32, Output = T>,
    T: Copy,
{
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// PCG-based integer hash; maps consecutive integers into uncorrelated ones.
pub fn hash_u32(x: u32) -> u32 {
    let state = x.wrapping_mul(747796405).wrapping_add(2891336453);

    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277803737);

    (word >> 22) ^ word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_and_spreads() {
        assert_eq!(hash_u32(1234), hash_u32(1234));
        assert_ne!(hash_u32(0), hash_u32(1));
        assert_ne!(hash_u32(1), hash_u32(2));
    }

    #[test]
    fn lerp_clamps() {
        assert_eq!(lerp(1.0, 3.0, 0.5), 2.0);
        assert_eq!(lerp(1.0, 3.0, 2.0), 3.0);
        assert_eq!(lerp(1.0, 3.0, -1.0), 1.0);
    }
}
