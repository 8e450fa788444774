use fxhash::FxHashMap;
use log::warn;

use crate::meshes::Meshes;
use crate::utils::Registry;
use crate::{gpu, BvhTriangle, Instance, Params};

pub struct Instances<P>
where
    P: Params,
{
    instances: Registry<P::InstanceHandle, Instance<P>>,
}

impl<P> Instances<P>
where
    P: Params,
{
    pub fn insert(&mut self, handle: P::InstanceHandle, instance: Instance<P>) {
        self.instances.insert(handle, instance);
    }

    pub fn remove(
        &mut self,
        handle: &P::InstanceHandle,
    ) -> Option<Instance<P>> {
        self.instances.remove(handle)
    }

    /// Transforms instanced meshes into world-space triangles, returning
    /// what the BVH builder needs to know about them.
    ///
    /// Instances whose mesh or material is gone are skipped.
    pub fn refresh(
        &self,
        meshes: &Meshes<P>,
        materials: &FxHashMap<P::MaterialHandle, gpu::MaterialId>,
        triangles: &mut Vec<gpu::Triangle>,
    ) -> Vec<BvhTriangle> {
        triangles.clear();

        let mut bvh_triangles = Vec::new();

        for (handle, instance) in self.instances.iter() {
            let Some(mesh) = meshes.get(&instance.mesh_handle) else {
                warn!(
                    "Instance {handle:?} refers to unknown mesh {:?}; \
                     skipping it",
                    instance.mesh_handle,
                );

                continue;
            };

            let Some(&material_id) = materials.get(&instance.material_handle)
            else {
                warn!(
                    "Instance {handle:?} refers to unknown material {:?}; \
                     skipping it",
                    instance.material_handle,
                );

                continue;
            };

            let transform = instance.transform;
            let normal_matrix = transform.matrix3.inverse().transpose();

            for (positions, normals) in mesh.triangles() {
                let triangle = gpu::Triangle::new(
                    positions.map(|pos| transform.transform_point3(pos)),
                    normals.map(|normal| {
                        (normal_matrix * normal).normalize_or_zero()
                    }),
                );

                let triangle_id = gpu::TriangleId::new(triangles.len() as u32);

                bvh_triangles.push(BvhTriangle::new(
                    &triangle,
                    triangle_id,
                    material_id,
                ));

                triangles.push(triangle);
            }
        }

        bvh_triangles
    }
}

impl<P> Default for Instances<P>
where
    P: Params,
{
    fn default() -> Self {
        Self {
            instances: Default::default(),
        }
    }
}
