use glam::{Vec3, Vec4};
#[cfg(target_arch = "spirv")]
use spirv_std::arch::IndexUnchecked;

use crate::{Light, LightId};

#[derive(Clone, Copy)]
pub struct LightsView<'a> {
    items: &'a [Light],
}

impl<'a> LightsView<'a> {
    pub fn new(items: &'a [Light]) -> Self {
        Self { items }
    }

    pub fn get(&self, id: LightId) -> Light {
        #[cfg(not(target_arch = "spirv"))]
        let item = self.items[id.get() as usize];

        #[cfg(target_arch = "spirv")]
        let item = unsafe { *self.items.index_unchecked(id.get() as usize) };

        item
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the number of lights that can emit photons and cast shadows
    /// (i.e. all but ambient ones).
    pub fn emitters(&self) -> u32 {
        let mut count = 0;
        let mut idx = 0;

        while idx < self.items.len() {
            if !self.get(LightId::new(idx as u32)).is_ambient() {
                count += 1;
            }

            idx += 1;
        }

        count
    }

    /// Returns the `nth` emitter, see [`Self::emitters()`].
    pub fn emitter(&self, nth: u32) -> Option<Light> {
        let mut remaining = nth;
        let mut idx = 0;

        while idx < self.items.len() {
            let light = self.get(LightId::new(idx as u32));

            if !light.is_ambient() {
                if remaining == 0 {
                    return Some(light);
                }

                remaining -= 1;
            }

            idx += 1;
        }

        None
    }

    /// Returns the light contributing the most to given surface point.
    pub fn dominant(
        &self,
        point: Vec3,
        normal: Vec3,
        attenuation: Vec4,
    ) -> Option<LightId> {
        let mut best = None;
        let mut best_importance = 0.0;
        let mut idx = 0;

        while idx < self.items.len() {
            let id = LightId::new(idx as u32);
            let importance =
                self.get(id).importance(point, normal, attenuation);

            if importance > best_importance {
                best = Some(id);
                best_importance = importance;
            }

            idx += 1;
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn dominant() {
        let lights = [
            Light::ambient(Vec3::ONE, 10.0),
            Light::point(vec3(0.0, 10.0, 0.0), 0.0, Vec3::ONE, 1.0, 1),
            Light::point(vec3(0.0, 2.0, 0.0), 0.0, Vec3::ONE, 1.0, 1),
            Light::point(vec3(0.0, -2.0, 0.0), 0.0, Vec3::ONE, 100.0, 1),
        ];

        let lights = LightsView::new(&lights);
        let attenuation = Vec4::new(1.0, 0.0, 1.0, 0.0);

        assert_eq!(
            Some(LightId::new(2)),
            lights.dominant(Vec3::ZERO, Vec3::Y, attenuation)
        );

        assert_eq!(3, lights.emitters());
        assert!(lights.emitter(2).is_some());
        assert!(lights.emitter(3).is_none());
    }

    #[test]
    fn no_dominant_light_without_emitters() {
        let lights = [Light::ambient(Vec3::ONE, 1.0)];
        let lights = LightsView::new(&lights);

        assert_eq!(
            None,
            lights.dominant(Vec3::ZERO, Vec3::Y, Vec4::new(1.0, 0.0, 0.0, 0.0))
        );
    }
}
