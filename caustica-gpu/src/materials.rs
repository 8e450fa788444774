#[cfg(target_arch = "spirv")]
use spirv_std::arch::IndexUnchecked;

use crate::{Material, MaterialId};

#[derive(Clone, Copy)]
pub struct MaterialsView<'a> {
    items: &'a [Material],
}

impl<'a> MaterialsView<'a> {
    pub fn new(items: &'a [Material]) -> Self {
        Self { items }
    }

    pub fn get(self, id: MaterialId) -> Material {
        // Out-of-range ids panic on the CPU instead of reading garbage
        #[cfg(not(target_arch = "spirv"))]
        let item = self.items[id.get() as usize];

        #[cfg(target_arch = "spirv")]
        let item = unsafe { *self.items.index_unchecked(id.get() as usize) };

        item
    }

    pub fn len(self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get() {
        let materials = [
            Material::default(),
            Material {
                roughness: 0.25,
                ..Default::default()
            },
        ];

        let view = MaterialsView::new(&materials);

        assert_eq!(0.25, view.get(MaterialId::new(1)).roughness);
    }

    #[test]
    #[should_panic]
    fn get_out_of_range() {
        MaterialsView::new(&[Material::default()]).get(MaterialId::new(1));
    }
}
