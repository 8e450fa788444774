use crate::utils::Registry;
use crate::{Mesh, Params};

pub struct Meshes<P>
where
    P: Params,
{
    meshes: Registry<P::MeshHandle, Mesh>,
}

impl<P> Meshes<P>
where
    P: Params,
{
    pub fn insert(&mut self, handle: P::MeshHandle, mesh: Mesh) {
        self.meshes.insert(handle, mesh);
    }

    pub fn remove(&mut self, handle: &P::MeshHandle) -> Option<Mesh> {
        self.meshes.remove(handle)
    }

    pub fn has(&self, handle: &P::MeshHandle) -> bool {
        self.meshes.has(handle)
    }

    pub fn get(&self, handle: &P::MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }
}

impl<P> Default for Meshes<P>
where
    P: Params,
{
    fn default() -> Self {
        Self {
            meshes: Default::default(),
        }
    }
}
