use crate::utils::Registry;
use crate::{gpu, Light, Params};

pub struct Lights<P>
where
    P: Params,
{
    lights: Registry<P::LightHandle, Light>,
}

impl<P> Lights<P>
where
    P: Params,
{
    pub fn insert(&mut self, handle: P::LightHandle, light: Light) {
        self.lights.insert(handle, light);
    }

    pub fn remove(&mut self, handle: &P::LightHandle) -> Option<Light> {
        self.lights.remove(handle)
    }

    pub fn serialize(&self) -> Vec<gpu::Light> {
        self.lights
            .iter()
            .map(|(_, light)| light.serialize())
            .collect()
    }
}

impl<P> Default for Lights<P>
where
    P: Params,
{
    fn default() -> Self {
        Self {
            lights: Default::default(),
        }
    }
}
