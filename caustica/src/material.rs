use glam::{Vec3, Vec4};

use crate::gpu;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    base_color: Vec4,
    emission: Vec3,
    absorption: Vec3,
    metallic: f32,
    roughness: f32,
    transmission: f32,
    ior: f32,
    specular: f32,
    pattern: Pattern,
}

impl Material {
    /// Clear, smooth glass.
    pub fn glass(ior: f32) -> Self {
        Self::default()
            .with_base_color(Vec4::ONE)
            .with_transmission(1.0)
            .with_roughness(0.0)
            .with_ior(ior)
    }

    /// Perfect mirror of given color.
    pub fn metal(base_color: Vec3, roughness: f32) -> Self {
        Self::default()
            .with_base_color(base_color.extend(1.0))
            .with_metallic(1.0)
            .with_roughness(roughness)
    }

    pub fn with_base_color(mut self, base_color: Vec4) -> Self {
        self.base_color = base_color;
        self
    }

    pub fn with_emission(mut self, emission: Vec3) -> Self {
        self.emission = emission;
        self
    }

    /// Sets absorption coefficient (σₐ) of the medium inside the object;
    /// matters for transmissive materials only.
    pub fn with_absorption(mut self, absorption: Vec3) -> Self {
        self.absorption = absorption;
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_transmission(mut self, transmission: f32) -> Self {
        self.transmission = transmission;
        self
    }

    pub fn with_ior(mut self, ior: f32) -> Self {
        self.ior = ior;
        self
    }

    pub fn with_specular(mut self, specular: f32) -> Self {
        self.specular = specular;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn class(&self) -> gpu::MaterialClass {
        self.serialize().classify()
    }

    pub(crate) fn serialize(&self) -> gpu::Material {
        let (pattern, pattern_scale) = match self.pattern {
            Pattern::None => (gpu::Material::PATTERN_NONE, 1.0),
            Pattern::Checker { scale } => {
                (gpu::Material::PATTERN_CHECKER, scale.max(1e-3))
            }
        };

        gpu::Material {
            base_color: self.base_color,
            emission: self.emission.extend(0.0),
            absorption: self.absorption.max(Vec3::ZERO).extend(0.0),
            metallic: self.metallic.clamp(0.0, 1.0),
            roughness: self.roughness.clamp(0.0, 1.0),
            transmission: self.transmission.clamp(0.0, 1.0),
            ior: self.ior.max(1.0),
            specular: self.specular.max(0.0),
            pattern_scale,
            pattern,
            _pad0: 0.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec4::new(0.8, 0.8, 0.8, 1.0),
            emission: Vec3::ZERO,
            absorption: Vec3::ZERO,
            metallic: 0.0,
            roughness: 0.5,
            transmission: 0.0,
            ior: 1.5,
            specular: 1.0,
            pattern: Pattern::None,
        }
    }
}

/// Procedural pattern modulating material's base color.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Pattern {
    #[default]
    None,

    /// 3D checkerboard with cells of given size.
    Checker { scale: f32 },
}
