use glam::Affine3A;

use crate::Params;

/// Mesh placed in the world.
pub struct Instance<P>
where
    P: Params,
{
    pub(crate) mesh_handle: P::MeshHandle,
    pub(crate) material_handle: P::MaterialHandle,
    pub(crate) transform: Affine3A,
}

impl<P> Instance<P>
where
    P: Params,
{
    pub fn new(
        mesh_handle: P::MeshHandle,
        material_handle: P::MaterialHandle,
        transform: Affine3A,
    ) -> Self {
        Self {
            mesh_handle,
            material_handle,
            transform,
        }
    }

    pub fn mesh_handle(&self) -> P::MeshHandle {
        self.mesh_handle
    }

    pub fn material_handle(&self) -> P::MaterialHandle {
        self.material_handle
    }

    pub fn transform(&self) -> Affine3A {
        self.transform
    }
}

impl<P> Clone for Instance<P>
where
    P: Params,
{
    fn clone(&self) -> Self {
        Self::new(self.mesh_handle, self.material_handle, self.transform)
    }
}
