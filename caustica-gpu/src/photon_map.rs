use core::f32::consts::PI;

use glam::{IVec3, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{F32Ext, Photon};

/// Number of buckets in the photon hash grid.
pub const PHOTON_GRID_BUCKETS: usize = 65536;

/// Maximum number of photons indexed per bucket; the rest is dropped.
pub const PHOTON_CELL_CAPACITY: usize = 64;

/// Maximum number of photons taken into account by a single gather.
pub const PHOTON_GATHER_LIMIT: u32 = 32;

/// Spatial hash mapping photon positions into buckets.
pub struct PhotonGrid;

impl PhotonGrid {
    pub fn cell(position: Vec3, cell_size: f32) -> IVec3 {
        (position / cell_size.max(crate::CAUSTICA_EPSILON))
            .floor()
            .as_ivec3()
    }

    pub fn bucket(cell: IVec3) -> usize {
        let hash = (cell.x as u32).wrapping_mul(73856093)
            ^ (cell.y as u32).wrapping_mul(19349663)
            ^ (cell.z as u32).wrapping_mul(83492791);

        (hash % (PHOTON_GRID_BUCKETS as u32)) as usize
    }
}

/// Cells visited by a gather: the center one plus its 6 face and 12 edge
/// neighbours.
const GATHER_OFFSETS: [IVec3; 19] = [
    IVec3::new(0, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 0, -1),
    IVec3::new(0, 0, 1),
    IVec3::new(-1, -1, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(1, -1, 0),
    IVec3::new(1, 1, 0),
    IVec3::new(-1, 0, -1),
    IVec3::new(-1, 0, 1),
    IVec3::new(1, 0, -1),
    IVec3::new(1, 0, 1),
    IVec3::new(0, -1, -1),
    IVec3::new(0, -1, 1),
    IVec3::new(0, 1, -1),
    IVec3::new(0, 1, 1),
];

/// Read-only view of the photon map, as frozen by the host after the
/// indexing pass.
#[derive(Clone, Copy)]
pub struct PhotonMapView<'a> {
    photons: &'a [Photon],

    /// Number of photons indexed by each bucket, `PHOTON_GRID_BUCKETS` items.
    counts: &'a [u32],

    /// Photon indices, `PHOTON_CELL_CAPACITY` items per bucket.
    indices: &'a [u32],

    cell_size: f32,
}

impl<'a> PhotonMapView<'a> {
    /// Gaussian filter parameters, as proposed by Jensen.
    const ALPHA: f32 = 0.918;
    const BETA: f32 = 1.953;

    pub fn new(
        photons: &'a [Photon],
        counts: &'a [u32],
        indices: &'a [u32],
        cell_size: f32,
    ) -> Self {
        Self {
            photons,
            counts,
            indices,
            cell_size,
        }
    }

    pub fn empty() -> Self {
        Self::new(&[], &[], &[], 1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty() || self.counts.len() < PHOTON_GRID_BUCKETS
    }

    /// Estimates caustic radiance arriving at given surface point.
    pub fn gather(
        &self,
        position: Vec3,
        normal: Vec3,
        radius: f32,
        intensity: f32,
    ) -> Vec3 {
        if self.is_empty() || radius <= 0.0 {
            return Vec3::ZERO;
        }

        let center = PhotonGrid::cell(position, self.cell_size);
        let radius_sq = radius.sqr();

        let mut visited = [u32::MAX; GATHER_OFFSETS.len()];
        let mut total = Vec3::ZERO;
        let mut gathered = 0;
        let mut offset_idx = 0;

        'cells: while offset_idx < GATHER_OFFSETS.len() {
            let bucket =
                PhotonGrid::bucket(center + GATHER_OFFSETS[offset_idx]);

            // Neighbouring cells can hash into the same bucket
            let mut is_duplicate = false;
            let mut visited_idx = 0;

            while visited_idx < offset_idx {
                if visited[visited_idx] == bucket as u32 {
                    is_duplicate = true;
                }

                visited_idx += 1;
            }

            visited[offset_idx] = bucket as u32;
            offset_idx += 1;

            if is_duplicate {
                continue;
            }

            let count =
                (self.counts[bucket] as usize).min(PHOTON_CELL_CAPACITY);

            let mut slot = 0;

            while slot < count {
                let photon_idx =
                    self.indices[bucket * PHOTON_CELL_CAPACITY + slot];

                slot += 1;

                let Some(photon) = self.photons.get(photon_idx as usize)
                else {
                    continue;
                };

                if !photon.is_valid() {
                    continue;
                }

                let distance_sq =
                    photon.position().distance_squared(position);

                if distance_sq > radius_sq {
                    continue;
                }

                let weight = Self::kernel(distance_sq, radius_sq)
                    * normal.dot(-photon.direction()).max(0.0);

                total += photon.color() * photon.power() * weight;
                gathered += 1;

                if gathered >= PHOTON_GATHER_LIMIT {
                    break 'cells;
                }
            }
        }

        total / (PI * radius_sq) * intensity
    }

    fn kernel(distance_sq: f32, radius_sq: f32) -> f32 {
        let falloff =
            1.0 - (-Self::BETA * distance_sq / (2.0 * radius_sq)).exp();
        let norm = 1.0 - (-Self::BETA).exp();

        Self::ALPHA * (1.0 - falloff / norm)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    struct Grid {
        counts: Vec<u32>,
        indices: Vec<u32>,
    }

    fn index(photons: &[Photon], cell_size: f32) -> Grid {
        let mut counts = vec![0; PHOTON_GRID_BUCKETS];
        let mut indices = vec![0; PHOTON_GRID_BUCKETS * PHOTON_CELL_CAPACITY];

        for (idx, photon) in photons.iter().enumerate() {
            let cell = PhotonGrid::cell(photon.position(), cell_size);
            let bucket = PhotonGrid::bucket(cell);

            let slot = counts[bucket] as usize;

            if slot < PHOTON_CELL_CAPACITY {
                indices[bucket * PHOTON_CELL_CAPACITY + slot] = idx as u32;
                counts[bucket] += 1;
            }
        }

        Grid { counts, indices }
    }

    fn photon(position: Vec3) -> Photon {
        Photon::new(position, -Vec3::Y, 1.0, Vec3::ONE)
    }

    #[test]
    fn empty_map() {
        assert_eq!(
            Vec3::ZERO,
            PhotonMapView::empty().gather(Vec3::ZERO, Vec3::Y, 1.0, 1.0)
        );
    }

    #[test]
    fn ignores_photons_beyond_radius() {
        let photons = [
            photon(vec3(0.6, 0.0, 0.0)),
            photon(vec3(0.0, 0.0, -0.55)),
        ];

        let grid = index(&photons, 0.5);
        let map =
            PhotonMapView::new(&photons, &grid.counts, &grid.indices, 0.5);

        assert_eq!(Vec3::ZERO, map.gather(Vec3::ZERO, Vec3::Y, 0.5, 1.0));
        assert!(map.gather(Vec3::ZERO, Vec3::Y, 0.7, 1.0).x > 0.0);
    }

    #[test]
    fn linear_in_intensity() {
        let photons = [
            photon(vec3(0.1, 0.0, 0.0)),
            photon(vec3(-0.2, 0.0, 0.1)),
            photon(vec3(0.0, 0.0, 0.3)),
        ];

        let grid = index(&photons, 0.5);
        let map =
            PhotonMapView::new(&photons, &grid.counts, &grid.indices, 0.5);

        let a = map.gather(Vec3::ZERO, Vec3::Y, 0.5, 1.0);
        let b = map.gather(Vec3::ZERO, Vec3::Y, 0.5, 3.0);

        assert!(a.x > 0.0);
        assert_relative_eq!(b.x, a.x * 3.0, epsilon = 1e-5);
    }

    #[test]
    fn ignores_photons_arriving_from_behind() {
        let photons = [Photon::new(Vec3::ZERO, Vec3::Y, 1.0, Vec3::ONE)];
        let grid = index(&photons, 0.5);
        let map =
            PhotonMapView::new(&photons, &grid.counts, &grid.indices, 0.5);

        assert_eq!(Vec3::ZERO, map.gather(Vec3::ZERO, Vec3::Y, 0.5, 1.0));
    }

    #[test]
    fn gathers_at_most_limit() {
        let photons: Vec<_> = (0..PHOTON_CELL_CAPACITY)
            .map(|idx| photon(vec3(0.001 * idx as f32, 0.0, 0.0)))
            .collect();

        let grid = index(&photons, 1.0);
        let map =
            PhotonMapView::new(&photons, &grid.counts, &grid.indices, 1.0);

        let gathered = map.gather(vec3(0.01, 0.0, 0.0), Vec3::Y, 0.5, 1.0);

        // Every photon sits (almost) in the center, so each one contributes
        // close to the kernel's peak
        let per_photon = PhotonMapView::kernel(0.0, 0.25) / (PI * 0.25);

        assert!(gathered.x <= per_photon * PHOTON_GATHER_LIMIT as f32 + 1e-3);
        assert!(gathered.x >= per_photon * (PHOTON_GATHER_LIMIT - 1) as f32);
    }

    #[test]
    fn kernel() {
        let center = PhotonMapView::kernel(0.0, 1.0);
        let middle = PhotonMapView::kernel(0.25, 1.0);
        let edge = PhotonMapView::kernel(1.0, 1.0);

        assert_relative_eq!(center, 0.918);
        assert!(center > middle && middle > edge && edge > 0.0);
    }
}
