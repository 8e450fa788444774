use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{lerp, F32Ext};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Material {
    pub base_color: Vec4,

    /// xyz - emitted radiance
    pub emission: Vec4,

    /// xyz - absorption coefficient (σₐ) of the medium inside the object
    pub absorption: Vec4,

    pub metallic: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub ior: f32,

    /// Multiplier of the specular response (reflections, highlights).
    pub specular: f32,
    pub pattern_scale: f32,
    pub pattern: u32,
    pub _pad0: f32,
}

impl Material {
    pub const PATTERN_NONE: u32 = 0;
    pub const PATTERN_CHECKER: u32 = 1;

    /// Metallic factor from which a material is considered to be a metal.
    pub const METAL_THRESHOLD: f32 = 0.5;

    /// Transmission factor from which a non-metal is considered to be glass.
    pub const GLASS_THRESHOLD: f32 = 0.01;

    /// Classifies this material; this is the single place deciding which
    /// branch of the shading/photon code handles a surface.
    pub fn classify(&self) -> MaterialClass {
        if self.metallic >= Self::METAL_THRESHOLD {
            MaterialClass::Metal
        } else if self.transmission > Self::GLASS_THRESHOLD {
            MaterialClass::Glass { ior: self.ior }
        } else {
            MaterialClass::Diffuse
        }
    }

    /// Returns transmission as seen by the renderer; metals are never
    /// transmissive.
    pub fn effective_transmission(&self) -> f32 {
        if self.metallic >= Self::METAL_THRESHOLD {
            0.0
        } else {
            self.transmission.saturate()
        }
    }

    /// Resolves this material at given point, evaluating its procedural
    /// pattern.
    pub fn surface(&self, point: Vec3, view_distance: f32) -> Surface {
        Surface {
            base_color: self.pattern_color(point, view_distance),
            emission: self.emission.xyz(),
            absorption: self.absorption.xyz(),
            metallic: self.metallic.saturate(),
            roughness: self.roughness.saturate(),
            transmission: self.effective_transmission(),
            ior: self.ior.max(1.0),
            specular: self.specular.max(0.0),
            class: self.classify(),
        }
    }

    /// Checkerboard pattern; fades into the average of both colors with
    /// distance, where the individual cells would only alias.
    fn pattern_color(&self, point: Vec3, view_distance: f32) -> Vec3 {
        let base_color = self.base_color.xyz();

        if self.pattern != Self::PATTERN_CHECKER || self.pattern_scale <= 0.0 {
            return base_color;
        }

        let cell: IVec3 = (point / self.pattern_scale).floor().as_ivec3();
        let dark = base_color * 0.2;
        let neutral = (base_color + dark) * 0.5;

        let color = if (cell.x + cell.y + cell.z) & 1 == 0 {
            base_color
        } else {
            dark
        };

        let fade = (view_distance / self.pattern_scale).smoothstep(20.0, 80.0);

        lerp(color, neutral, fade)
    }
}

#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum MaterialClass {
    Diffuse,
    Metal,
    Glass { ior: f32 },
}

impl MaterialClass {
    pub fn is_diffuse(self) -> bool {
        matches!(self, Self::Diffuse)
    }

    pub fn is_metal(self) -> bool {
        matches!(self, Self::Metal)
    }

    pub fn is_glass(self) -> bool {
        matches!(self, Self::Glass { .. })
    }
}

/// Material resolved at a particular point.
#[derive(Clone, Copy)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Surface {
    pub base_color: Vec3,
    pub emission: Vec3,
    pub absorption: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub ior: f32,
    pub specular: f32,
    pub class: MaterialClass,
}

impl Surface {
    /// Tint applied to light refracted on primary hits.
    pub const PRIMARY_GLASS_TINT: f32 = 1.0;

    /// Tint applied to light refracted on deeper hits (and by photons).
    pub const SECONDARY_GLASS_TINT: f32 = 0.5;

    pub fn diffuse_albedo(&self) -> Vec3 {
        self.base_color * (1.0 - self.metallic)
    }

    /// Reflectance at normal incidence.
    pub fn f0(&self) -> Vec3 {
        lerp(Vec3::splat(0.04), self.base_color, self.metallic)
    }

    /// Reflectance at normal incidence of a dielectric interface with this
    /// surface's index of refraction.
    pub fn dielectric_f0(&self) -> f32 {
        ((self.ior - 1.0) / (self.ior + 1.0)).sqr()
    }

    pub fn glass_tint(&self, primary: bool) -> Vec3 {
        let strength = if primary {
            Self::PRIMARY_GLASS_TINT
        } else {
            Self::SECONDARY_GLASS_TINT
        };

        lerp(Vec3::ONE, self.base_color, strength)
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}
