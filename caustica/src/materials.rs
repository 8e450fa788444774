use fxhash::FxHashMap;

use crate::utils::Registry;
use crate::{gpu, Material, Params};

pub struct Materials<P>
where
    P: Params,
{
    materials: Registry<P::MaterialHandle, Material>,
}

impl<P> Materials<P>
where
    P: Params,
{
    pub fn insert(&mut self, handle: P::MaterialHandle, material: Material) {
        self.materials.insert(handle, material);
    }

    pub fn remove(&mut self, handle: &P::MaterialHandle) -> Option<Material> {
        self.materials.remove(handle)
    }

    pub fn has(&self, handle: &P::MaterialHandle) -> bool {
        self.materials.has(handle)
    }

    /// Serializes materials, assigning them consecutive ids.
    pub fn refresh(&self) -> MaterialsBuffer<P> {
        let mut buffer = Vec::with_capacity(self.materials.len());
        let mut index = FxHashMap::default();

        for (handle, material) in self.materials.iter() {
            index.insert(*handle, gpu::MaterialId::new(buffer.len() as u32));
            buffer.push(material.serialize());
        }

        MaterialsBuffer { buffer, index }
    }
}

impl<P> Default for Materials<P>
where
    P: Params,
{
    fn default() -> Self {
        Self {
            materials: Default::default(),
        }
    }
}

pub struct MaterialsBuffer<P>
where
    P: Params,
{
    pub buffer: Vec<gpu::Material>,
    pub index: FxHashMap<P::MaterialHandle, gpu::MaterialId>,
}
