#[cfg(target_arch = "spirv")]
use spirv_std::arch::IndexUnchecked;

use crate::{Triangle, TriangleId};

#[derive(Clone, Copy)]
pub struct TrianglesView<'a> {
    buffer: &'a [Triangle],
}

impl<'a> TrianglesView<'a> {
    pub fn new(buffer: &'a [Triangle]) -> Self {
        Self { buffer }
    }

    pub fn get(self, id: TriangleId) -> Triangle {
        #[cfg(not(target_arch = "spirv"))]
        let item = self.buffer[id.get() as usize];

        #[cfg(target_arch = "spirv")]
        let item = unsafe { *self.buffer.index_unchecked(id.get() as usize) };

        item
    }

    pub fn len(self) -> usize {
        self.buffer.len()
    }
}
