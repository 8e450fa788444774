use core::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{
    fresnel_dielectric, Hit, Intersector, LightsView, MaterialClass, MaterialId,
    MaterialsView, Ray, SceneConstants, Surface, Vec3Ext, WhiteNoise,
};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Photon {
    /// x - position x
    /// y - position y
    /// z - position z
    /// w - power
    pub d0: Vec4,

    /// x - incoming direction x
    /// y - incoming direction y
    /// z - incoming direction z
    /// w - (as u32) 1 if the photon is valid
    pub d1: Vec4,

    /// x - color r
    /// y - color g
    /// z - color b
    pub d2: Vec4,
}

impl Photon {
    pub fn new(
        position: Vec3,
        direction: Vec3,
        power: f32,
        color: Vec3,
    ) -> Self {
        Self {
            d0: position.extend(power),
            d1: direction.extend(f32::from_bits(1)),
            d2: color.extend(0.0),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn power(&self) -> f32 {
        self.d0.w
    }

    /// Direction the photon was travelling in when it got stored.
    pub fn direction(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn color(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn is_valid(&self) -> bool {
        self.d1.w.to_bits() == 1
    }
}

/// Storage for photons produced by [`PhotonTracer`].
///
/// Implemented by the host's photon arena; appending happens concurrently, so
/// the method takes `&self`.
pub trait PhotonSink {
    /// Claims a slot and stores the photon there, returning the slot's index;
    /// returns `None` (and drops the photon) when the storage is full.
    fn try_append(&self, photon: Photon) -> Option<u32>;
}

/// Emits photons from lights towards specular objects and follows them until
/// they land on a diffuse surface.
#[derive(Clone, Copy)]
pub struct PhotonTracer<'a> {
    constants: &'a SceneConstants,
    intersector: Intersector<'a>,
    materials: MaterialsView<'a>,
    lights: LightsView<'a>,
}

impl<'a> PhotonTracer<'a> {
    /// Maximum number of specular bounces a photon can take.
    pub const MAX_BOUNCES: u32 = 8;

    /// Distance from which directional lights launch photons towards their
    /// targets.
    pub const DIRECTIONAL_LAUNCH_DISTANCE: f32 = 1000.0;

    pub fn new(
        constants: &'a SceneConstants,
        intersector: Intersector<'a>,
        materials: MaterialsView<'a>,
        lights: LightsView<'a>,
    ) -> Self {
        Self {
            constants,
            intersector,
            materials,
            lights,
        }
    }

    /// Emits and traces a single photon; returns whether it got stored.
    pub fn emit(&self, slot: u32, sink: &impl PhotonSink) -> bool {
        let budget = self.constants.photon_count;
        let emitters = self.lights.emitters();

        if budget == 0 || emitters == 0 {
            return false;
        }

        let mut noise = WhiteNoise::for_photon(self.constants.frame, slot);

        let light = {
            let nth = ((noise.sample() * emitters as f32) as u32)
                .min(emitters - 1);

            match self.lights.emitter(nth) {
                Some(light) => light,
                None => return false,
            }
        };

        let targets = self.targets();
        let scale = (emitters as f32) / (budget as f32);

        let target = if targets > 0 {
            let nth =
                ((noise.sample() * targets as f32) as u32).min(targets - 1);

            self.target(nth)
        } else {
            None
        };

        let (origin, direction, power) = if light.is_directional() {
            let Some((center, radius)) = target else {
                return false;
            };

            let direction = light.direction();
            let (t, b) = direction.any_orthonormal_pair();
            let disk = noise.sample_disk() * radius;

            let origin = center + t * disk.x + b * disk.y
                - direction * (radius + Self::DIRECTIONAL_LAUNCH_DISTANCE);

            let power = light.intensity()
                * PI
                * radius
                * radius
                * (targets as f32)
                * scale;

            (origin, direction, power)
        } else {
            let origin = light.position();

            match target {
                Some((center, radius))
                    if center.distance(origin) > radius =>
                {
                    let to_target = center - origin;
                    let distance = to_target.length();
                    let sin_max = radius / distance;
                    let cos_max = (1.0 - sin_max * sin_max).max(0.0).sqrt();
                    let solid_angle = 2.0 * PI * (1.0 - cos_max);

                    let direction =
                        noise.sample_cone(to_target / distance, cos_max);

                    let power = light.intensity() * solid_angle / (4.0 * PI)
                        * (targets as f32)
                        * scale;

                    (origin, direction, power)
                }

                _ => (
                    origin,
                    noise.sample_sphere(),
                    light.intensity() * scale,
                ),
            }
        };

        self.trace(origin, direction, power, light.color(), &mut noise, sink)
    }

    fn trace(
        &self,
        mut origin: Vec3,
        mut direction: Vec3,
        mut power: f32,
        mut color: Vec3,
        noise: &mut WhiteNoise,
        sink: &impl PhotonSink,
    ) -> bool {
        let mut absorption = Vec3::ZERO;
        let mut is_caustic = false;
        let mut bounce = 0;

        while bounce < Self::MAX_BOUNCES {
            bounce += 1;

            let hit =
                self.intersector.trace_nearest(Ray::new(origin, direction));

            if hit.is_none() {
                return false;
            }

            color *= absorption.beer_lambert(hit.distance);

            let surface = self
                .materials
                .get(hit.material_id)
                .surface(hit.point, 0.0);

            let normal = hit.facing_normal(direction);

            match surface.class {
                MaterialClass::Diffuse => {
                    if !is_caustic {
                        return false;
                    }

                    let photon =
                        Photon::new(hit.point, direction, power, color);

                    return sink.try_append(photon).is_some();
                }

                MaterialClass::Metal => {
                    color *= surface.base_color;
                    direction = direction.reflect(normal);
                    origin = hit.point + normal * Hit::NUDGE_OFFSET;
                }

                MaterialClass::Glass { ior } => {
                    let entering = hit.is_front_face(direction);
                    let event = GlassEvent::sample(
                        &hit, &surface, direction, normal, ior, entering, noise,
                    );

                    origin = event.origin;
                    direction = event.direction;

                    if event.refracted {
                        color *= surface.glass_tint(false);

                        absorption = if entering {
                            surface.absorption
                        } else {
                            Vec3::ZERO
                        };
                    }
                }
            }

            is_caustic = true;

            // Russian roulette
            let survival = color.max_element().clamp(0.1, 0.95);

            if noise.sample() >= survival {
                return false;
            }

            power /= survival;
        }

        false
    }

    /// Returns the number of objects photons are aimed at (i.e. spheres and
    /// cuboids with metallic or transmissive materials).
    pub fn targets(&self) -> u32 {
        let mut count = 0;
        let mut idx = 0;

        while idx < self.intersector.spheres().len() {
            let sphere = self.intersector.spheres()[idx];

            if self.is_target(sphere.material_id()) {
                count += 1;
            }

            idx += 1;
        }

        idx = 0;

        while idx < self.intersector.cuboids().len() {
            let cuboid = self.intersector.cuboids()[idx];

            if self.is_target(cuboid.material_id()) {
                count += 1;
            }

            idx += 1;
        }

        count
    }

    /// Returns bounding sphere of the `nth` target, see [`Self::targets()`].
    fn target(&self, nth: u32) -> Option<(Vec3, f32)> {
        let mut remaining = nth;
        let mut idx = 0;

        while idx < self.intersector.spheres().len() {
            let sphere = self.intersector.spheres()[idx];

            if self.is_target(sphere.material_id()) {
                if remaining == 0 {
                    return Some((sphere.center(), sphere.radius()));
                }

                remaining -= 1;
            }

            idx += 1;
        }

        idx = 0;

        while idx < self.intersector.cuboids().len() {
            let cuboid = self.intersector.cuboids()[idx];

            if self.is_target(cuboid.material_id()) {
                if remaining == 0 {
                    return Some((cuboid.center(), cuboid.bounding_radius()));
                }

                remaining -= 1;
            }

            idx += 1;
        }

        None
    }

    fn is_target(&self, material_id: MaterialId) -> bool {
        !self.materials.get(material_id).classify().is_diffuse()
    }
}

/// Outcome of a photon hitting a dielectric surface: reflection or
/// refraction, picked with probability given by Fresnel's reflectance.
struct GlassEvent {
    origin: Vec3,
    direction: Vec3,
    refracted: bool,
}

impl GlassEvent {
    fn sample(
        hit: &Hit,
        surface: &Surface,
        direction: Vec3,
        normal: Vec3,
        ior: f32,
        entering: bool,
        noise: &mut WhiteNoise,
    ) -> Self {
        let eta = if entering { 1.0 / ior } else { ior };

        let (refracted, reflectance) = fresnel_dielectric(
            direction,
            normal,
            eta,
            surface.dielectric_f0(),
        );

        if noise.sample() < reflectance {
            Self {
                origin: hit.point + normal * Hit::NUDGE_OFFSET,
                direction: direction.reflect(normal),
                refracted: false,
            }
        } else {
            Self {
                origin: hit.point - normal * Hit::NUDGE_OFFSET,
                direction: refracted,
                refracted: true,
            }
        }
    }
}
