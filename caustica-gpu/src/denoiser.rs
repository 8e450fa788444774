use glam::{vec2, vec3, Vec2, Vec2Swizzles, Vec3, Vec3Swizzles, Vec4};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{Camera, MaterialClass, SoftShadow};

/// Largest penumbra width reported to the denoiser.
pub const PENUMBRA_MAX: f32 = 32768.0;

/// Encoding and decoding of the signals exchanged with the denoiser.
pub struct DenoiserBridge;

impl DenoiserBridge {
    /// Penumbra reported for points that see no occluder at all.
    pub const NO_OCCLUDER: f32 = 65504.0;

    /// View depth reported for pixels whose camera ray hit nothing.
    pub const MISS_VIEW_DEPTH: f32 = 65504.0;

    /// Albedo below this value is clamped when (de)modulating, so that
    /// black surfaces don't blow up the demodulated signal.
    pub const ALBEDO_EPSILON: f32 = 0.01;

    /// Compresses a unit vector into two components in range `<0.0, 1.0>`,
    /// by projecting it onto an octahedron and unfolding its lower half.
    pub fn encode_normal(n: Vec3) -> Vec2 {
        let n = n / (n.x.abs() + n.y.abs() + n.z.abs()).max(1e-20);
        let mut p = n.xy();

        if n.z < 0.0 {
            p = (Vec2::ONE - p.yx().abs()) * sign_not_zero(p);
        }

        p * 0.5 + 0.5
    }

    /// See: [`Self::encode_normal()`].
    pub fn decode_normal(encoded: Vec2) -> Vec3 {
        let p = encoded * 2.0 - 1.0;
        let z = 1.0 - p.x.abs() - p.y.abs();

        let p = if z < 0.0 {
            (Vec2::ONE - p.yx().abs()) * sign_not_zero(p)
        } else {
            p
        };

        vec3(p.x, p.y, z).normalize()
    }

    /// Converts linear roughness into the perceptual one stored by the
    /// denoiser.
    pub fn encode_roughness(roughness: f32) -> f32 {
        roughness.max(0.0).sqrt()
    }

    /// See: [`Self::encode_roughness()`].
    pub fn decode_roughness(encoded: f32) -> f32 {
        encoded * encoded
    }

    pub fn pack_normal_roughness(normal: Vec3, roughness: f32) -> Vec4 {
        Self::encode_normal(normal)
            .extend(Self::encode_roughness(roughness))
            .extend(0.0)
    }

    /// See: [`Self::pack_normal_roughness()`].
    pub fn unpack_normal_roughness(packed: Vec4) -> (Vec3, f32) {
        (
            Self::decode_normal(vec2(packed.x, packed.y)),
            Self::decode_roughness(packed.z),
        )
    }

    pub fn pack_penumbra(shadow: &SoftShadow) -> f32 {
        if shadow.is_occluded() {
            shadow.penumbra.clamp(0.0, PENUMBRA_MAX)
        } else {
            Self::NO_OCCLUDER
        }
    }

    /// See: [`Self::pack_penumbra()`]; returns `None` for unoccluded points.
    pub fn unpack_penumbra(packed: f32) -> Option<f32> {
        if packed >= Self::NO_OCCLUDER {
            None
        } else {
            Some(packed.min(PENUMBRA_MAX))
        }
    }

    /// Packs shadow's color and visibility.
    pub fn pack_translucency(shadow: &SoftShadow) -> Vec4 {
        shadow.tint.extend(shadow.visibility)
    }

    pub fn view_depth(camera: &Camera, point: Option<Vec3>) -> f32 {
        match point {
            Some(point) => camera.view_depth(point).max(0.0),
            None => Self::MISS_VIEW_DEPTH,
        }
    }

    /// Returns pixel-space motion of given point between the previous and the
    /// current frame, pointing from the current position to the previous one.
    pub fn motion(camera: &Camera, point: Vec3) -> Vec2 {
        camera.prev_world_to_screen(point) - camera.world_to_screen(point)
    }

    pub fn demodulate(radiance: Vec3, albedo: Vec3) -> Vec3 {
        radiance / albedo.max(Vec3::splat(Self::ALBEDO_EPSILON))
    }

    /// See: [`Self::demodulate()`].
    pub fn remodulate(radiance: Vec3, albedo: Vec3) -> Vec3 {
        radiance * albedo.max(Vec3::splat(Self::ALBEDO_EPSILON))
    }
}

fn sign_not_zero(v: Vec2) -> Vec2 {
    vec2(
        if v.x >= 0.0 { 1.0 } else { -1.0 },
        if v.y >= 0.0 { 1.0 } else { -1.0 },
    )
}

/// Classification of a pixel, stored in the albedo buffer's alpha channel;
/// tells the compositor which signal to use for that pixel.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum AlphaClass {
    /// Camera ray didn't hit anything.
    Miss,

    /// Surface is dominated by reflections or refractions (metals, glass).
    Specular,

    Diffuse,
}

impl AlphaClass {
    pub fn new(class: Option<MaterialClass>) -> Self {
        match class {
            None => Self::Miss,
            Some(MaterialClass::Diffuse) => Self::Diffuse,
            Some(_) => Self::Specular,
        }
    }

    pub fn code(self) -> f32 {
        match self {
            Self::Miss => 0.0,
            Self::Specular => 0.5,
            Self::Diffuse => 1.0,
        }
    }

    pub fn from_code(code: f32) -> Self {
        if code < 0.25 {
            Self::Miss
        } else if code < 0.75 {
            Self::Specular
        } else {
            Self::Diffuse
        }
    }
}

/// Per-pixel signals handed over to the denoiser.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct DenoiserInputs {
    /// xyz - demodulated diffuse radiance
    /// w - diffuse hit distance
    pub diffuse: Vec4,

    /// xyz - specular radiance
    /// w - specular hit distance
    pub specular: Vec4,

    /// See: [`DenoiserBridge::pack_normal_roughness()`].
    pub normal_roughness: Vec4,

    pub view_depth: f32,
    pub motion: Vec2,

    /// xyz - albedo
    /// w - [`AlphaClass::code()`]
    pub albedo: Vec4,

    /// x - penumbra, see [`DenoiserBridge::pack_penumbra()`]
    /// y - visibility
    pub shadow: Vec2,

    /// See: [`DenoiserBridge::pack_translucency()`].
    pub translucency: Vec4,
}

impl DenoiserInputs {
    /// Returns inputs for a pixel whose camera ray escaped into the sky.
    pub fn miss(camera: &Camera, direction: Vec3) -> Self {
        let far_point = camera.position() + direction * 1000.0;

        Self {
            diffuse: Vec4::ZERO,
            specular: Vec4::ZERO,
            normal_roughness: DenoiserBridge::pack_normal_roughness(
                -direction, 1.0,
            ),
            view_depth: DenoiserBridge::MISS_VIEW_DEPTH,
            motion: DenoiserBridge::motion(camera, far_point),
            albedo: Vec3::ZERO.extend(AlphaClass::Miss.code()),
            shadow: vec2(DenoiserBridge::NO_OCCLUDER, 1.0),
            translucency: Vec4::ONE,
        }
    }

    pub fn alpha_class(&self) -> AlphaClass {
        AlphaClass::from_code(self.albedo.w)
    }
}
