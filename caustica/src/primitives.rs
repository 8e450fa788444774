use fxhash::FxHashMap;
use log::warn;

use crate::primitive::SerializedPrimitive;
use crate::utils::Registry;
use crate::{gpu, Params, Primitive};

pub struct Primitives<P>
where
    P: Params,
{
    primitives: Registry<P::PrimitiveHandle, (Primitive, P::MaterialHandle)>,
}

impl<P> Primitives<P>
where
    P: Params,
{
    pub fn insert(
        &mut self,
        handle: P::PrimitiveHandle,
        primitive: Primitive,
        material_handle: P::MaterialHandle,
    ) {
        self.primitives.insert(handle, (primitive, material_handle));
    }

    pub fn remove(
        &mut self,
        handle: &P::PrimitiveHandle,
    ) -> Option<(Primitive, P::MaterialHandle)> {
        self.primitives.remove(handle)
    }

    /// Serializes primitives into per-kind buffers; primitives whose material
    /// is gone are skipped.
    pub fn serialize(
        &self,
        materials: &FxHashMap<P::MaterialHandle, gpu::MaterialId>,
        spheres: &mut Vec<gpu::Sphere>,
        planes: &mut Vec<gpu::Plane>,
        cuboids: &mut Vec<gpu::Cuboid>,
    ) {
        spheres.clear();
        planes.clear();
        cuboids.clear();

        for (handle, (primitive, material_handle)) in self.primitives.iter() {
            let Some(material_id) = materials.get(material_handle) else {
                warn!(
                    "Primitive {handle:?} refers to unknown material \
                     {material_handle:?}; skipping it"
                );

                continue;
            };

            match primitive.serialize(*material_id) {
                SerializedPrimitive::Sphere(sphere) => spheres.push(sphere),
                SerializedPrimitive::Plane(plane) => planes.push(plane),
                SerializedPrimitive::Cuboid(cuboid) => cuboids.push(cuboid),
            }
        }
    }
}

impl<P> Default for Primitives<P>
where
    P: Params,
{
    fn default() -> Self {
        Self {
            primitives: Default::default(),
        }
    }
}
