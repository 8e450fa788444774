use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use derivative::Derivative;
use rayon::prelude::*;

use crate::gpu::{self, PHOTON_CELL_CAPACITY, PHOTON_GRID_BUCKETS};

/// Append-only storage for photons, filled concurrently by the emission
/// pass.
///
/// Slots are claimed through an atomic bump index and written exactly once;
/// photons that don't fit are dropped.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PhotonArena {
    next: AtomicU32,
    dropped: AtomicU32,

    #[derivative(Debug = "ignore")]
    slots: Vec<OnceLock<gpu::Photon>>,
}

impl PhotonArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            next: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            slots: (0..capacity).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of claimed slots.
    pub fn len(&self) -> usize {
        (self.next.load(Ordering::Acquire) as usize).min(self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of photons rejected since the last reset.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn reset(&mut self) {
        *self.next.get_mut() = 0;
        *self.dropped.get_mut() = 0;

        for slot in &mut self.slots {
            slot.take();
        }
    }

    /// Resets the arena, changing its capacity.
    pub fn resize(&mut self, capacity: usize) {
        self.reset();
        self.slots.resize_with(capacity, OnceLock::new);
    }

    pub fn for_each_valid(&self, mut f: impl FnMut(u32, &gpu::Photon)) {
        for (idx, slot) in self.slots[..self.len()].iter().enumerate() {
            if let Some(photon) = slot.get() {
                if photon.is_valid() {
                    f(idx as u32, photon);
                }
            }
        }
    }

    /// Returns stored photons indexed by their slots; slots claimed but not
    /// written yet come back as invalid photons.
    pub fn to_vec(&self) -> Vec<gpu::Photon> {
        self.slots[..self.len()]
            .iter()
            .map(|slot| slot.get().copied().unwrap_or_default())
            .collect()
    }
}

impl gpu::PhotonSink for PhotonArena {
    fn try_append(&self, photon: gpu::Photon) -> Option<u32> {
        let capacity = self.capacity() as u32;

        let idx = self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |next| {
                (next < capacity).then_some(next + 1)
            });

        let Ok(idx) = idx else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        self.slots[idx as usize].set(photon).ok()?;

        Some(idx)
    }
}

/// Photons indexed by a spatial hash grid, ready to be gathered from.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PhotonMap {
    #[derivative(Debug = "ignore")]
    photons: Vec<gpu::Photon>,

    #[derivative(Debug = "ignore")]
    counts: Vec<u32>,

    #[derivative(Debug = "ignore")]
    indices: Vec<u32>,

    cell_size: f32,
    overflow: u32,
}

impl PhotonMap {
    pub fn empty() -> Self {
        Self {
            photons: Vec::new(),
            counts: Vec::new(),
            indices: Vec::new(),
            cell_size: 1.0,
            overflow: 0,
        }
    }

    /// Indexes valid photons into [`PHOTON_GRID_BUCKETS`] buckets of up to
    /// [`PHOTON_CELL_CAPACITY`] photons each; whatever doesn't fit into its
    /// bucket is dropped.
    pub fn build(photons: Vec<gpu::Photon>, cell_size: f32) -> Self {
        if photons.is_empty() {
            return Self::empty();
        }

        let counts: Vec<_> =
            (0..PHOTON_GRID_BUCKETS).map(|_| AtomicU32::new(0)).collect();

        let indices: Vec<_> = (0..PHOTON_GRID_BUCKETS * PHOTON_CELL_CAPACITY)
            .map(|_| AtomicU32::new(0))
            .collect();

        photons
            .par_iter()
            .enumerate()
            .filter(|(_, photon)| photon.is_valid())
            .for_each(|(idx, photon)| {
                let cell = gpu::PhotonGrid::cell(photon.position(), cell_size);
                let bucket = gpu::PhotonGrid::bucket(cell);
                let nth = counts[bucket].fetch_add(1, Ordering::Relaxed);

                if (nth as usize) < PHOTON_CELL_CAPACITY {
                    indices[bucket * PHOTON_CELL_CAPACITY + nth as usize]
                        .store(idx as u32, Ordering::Relaxed);
                }
            });

        let mut overflow = 0;

        let counts: Vec<u32> = counts
            .into_iter()
            .map(|count| {
                let count = count.into_inner();
                let capacity = PHOTON_CELL_CAPACITY as u32;

                overflow += count.saturating_sub(capacity);
                count.min(capacity)
            })
            .collect();

        let mut indices: Vec<u32> =
            indices.into_iter().map(AtomicU32::into_inner).collect();

        // Insertion order depends on scheduling; sorting keeps gathers
        // reproducible
        indices
            .par_chunks_mut(PHOTON_CELL_CAPACITY)
            .zip(counts.par_iter())
            .for_each(|(bucket, &count)| {
                bucket[..count as usize].sort_unstable();
            });

        Self {
            photons,
            counts,
            indices,
            cell_size,
            overflow,
        }
    }

    pub fn photons(&self) -> &[gpu::Photon] {
        &self.photons
    }

    /// Returns the number of photons indexed in given bucket.
    pub fn bucket_len(&self, bucket: usize) -> u32 {
        self.counts.get(bucket).copied().unwrap_or(0)
    }

    /// Returns the number of photons that didn't fit into their buckets.
    pub fn overflow(&self) -> u32 {
        self.overflow
    }

    pub fn view(&self) -> gpu::PhotonMapView<'_> {
        gpu::PhotonMapView::new(
            &self.photons,
            &self.counts,
            &self.indices,
            self.cell_size,
        )
    }
}

impl Default for PhotonMap {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec3};

    use super::*;
    use crate::gpu::PhotonSink;

    fn photon(position: Vec3) -> gpu::Photon {
        gpu::Photon::new(position, -Vec3::Y, 1.0, Vec3::ONE)
    }

    #[test]
    fn arena() {
        let mut arena = PhotonArena::new(2);

        assert_eq!(Some(0), arena.try_append(photon(Vec3::ZERO)));
        assert_eq!(Some(1), arena.try_append(photon(Vec3::ONE)));
        assert_eq!(None, arena.try_append(photon(Vec3::ONE)));
        assert_eq!(2, arena.len());
        assert_eq!(1, arena.dropped());

        let mut seen = Vec::new();

        arena.for_each_valid(|idx, photon| {
            seen.push((idx, photon.position()));
        });

        assert_eq!(vec![(0, Vec3::ZERO), (1, Vec3::ONE)], seen);

        arena.reset();

        assert!(arena.is_empty());
        assert_eq!(0, arena.dropped());
        assert_eq!(Some(0), arena.try_append(photon(Vec3::ONE)));
    }

    #[test]
    fn grid() {
        let photons = vec![
            photon(vec3(0.1, 0.1, 0.1)),
            photon(vec3(0.2, 0.2, 0.2)),
            gpu::Photon::default(),
            photon(vec3(5.5, 0.1, 0.1)),
        ];

        let map = PhotonMap::build(photons, 1.0);
        let bucket = gpu::PhotonGrid::bucket(gpu::PhotonGrid::cell(
            vec3(0.1, 0.1, 0.1),
            1.0,
        ));

        assert_eq!(2, map.bucket_len(bucket));
        assert_eq!(0, map.overflow());
        assert!(!map.view().is_empty());
    }
}
