use log::{debug, warn};
use rayon::prelude::*;

use crate::utils::metric;
use crate::{
    gpu, PhotonArena, PhotonMap, PhotonRefresh, PhotonStats, RenderSettings,
    SceneData,
};

/// Largest number of photons kept around; emission slots past it are
/// dropped.
const PHOTON_ARENA_LIMIT: usize = 1 << 20;

/// Emits photons into the arena and indexes them into the photon map.
pub struct PhotonPass {
    arena: PhotonArena,
    map: PhotonMap,
    key: Option<PhotonKey>,
}

/// What the current photon map was built from.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PhotonKey {
    scene_version: u64,
    photon_count: u32,
    photon_radius: f32,
}

impl PhotonPass {
    pub fn new() -> Self {
        debug!("Initializing pass: photons");

        Self {
            arena: PhotonArena::new(0),
            map: PhotonMap::empty(),
            key: None,
        }
    }

    pub fn map(&self) -> &PhotonMap {
        &self.map
    }

    pub fn run(
        &mut self,
        constants: &gpu::SceneConstants,
        scene: &SceneData,
        settings: &RenderSettings,
        scene_version: u64,
    ) -> PhotonStats {
        let key = PhotonKey {
            scene_version,
            photon_count: settings.photon_count,
            photon_radius: settings.photon_radius,
        };

        let is_stale = match settings.photon_refresh {
            PhotonRefresh::EveryFrame => true,
            PhotonRefresh::OnSceneChange => self.key != Some(key),
        };

        if !is_stale {
            return PhotonStats {
                emitted: 0,
                stored: self.map.photons().len() as u32,
                dropped: 0,
            };
        }

        self.key = Some(key);

        if settings.photon_count == 0 || settings.photon_radius <= 0.0 {
            self.map = PhotonMap::empty();

            return Default::default();
        }

        let capacity = (settings.photon_count as usize).min(PHOTON_ARENA_LIMIT);

        if self.arena.capacity() == capacity {
            self.arena.reset();
        } else {
            debug!(
                "Resizing photon arena ({} -> {})",
                self.arena.capacity(),
                capacity
            );

            self.arena.resize(capacity);
        }

        let scene = gpu::Scene::new(
            constants,
            scene.as_buffers(),
            gpu::PhotonMapView::empty(),
        );

        let tracer = scene.photon_tracer();
        let arena = &self.arena;

        metric("photons.emit", || {
            (0..settings.photon_count).into_par_iter().for_each(|slot| {
                tracer.emit(slot, arena);
            });
        });

        let dropped = self.arena.dropped();

        if dropped > 0 {
            warn!(
                "Photon arena saturated; dropped {} of {} photons",
                dropped,
                settings.photon_count
            );
        }

        self.map = metric("photons.index", || {
            PhotonMap::build(self.arena.to_vec(), settings.photon_radius)
        });

        if self.map.overflow() > 0 {
            debug!(
                "Photon grid overflow; {} photons didn't fit into their cells",
                self.map.overflow()
            );
        }

        PhotonStats {
            emitted: settings.photon_count,
            stored: self.arena.len() as u32,
            dropped,
        }
    }
}
