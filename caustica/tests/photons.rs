use std::collections::HashSet;

use caustica::gpu::{self, PhotonSink, PHOTON_CELL_CAPACITY};
use caustica::{PhotonArena, PhotonMap};
use glam::{vec3, Vec3};
use rayon::prelude::*;

fn photon(position: Vec3) -> gpu::Photon {
    gpu::Photon::new(position, -Vec3::Y, 1.0, Vec3::ONE)
}

#[test]
fn arena_never_exceeds_its_capacity() {
    let arena = PhotonArena::new(100);

    let slots: Vec<_> = (0..1000)
        .into_par_iter()
        .filter_map(|idx| arena.try_append(photon(Vec3::splat(idx as f32))))
        .collect();

    assert_eq!(100, slots.len());
    assert_eq!(100, arena.len());
    assert_eq!(900, arena.dropped());

    let unique: HashSet<_> = slots.iter().copied().collect();

    assert_eq!(100, unique.len());
    assert!(slots.iter().all(|&slot| slot < 100));

    let mut valid = 0;

    arena.for_each_valid(|_, _| valid += 1);

    assert_eq!(100, valid);
}

#[test]
fn grid_cell_drops_overflow() {
    let photons: Vec<_> = (0..100)
        .map(|idx| photon(vec3(0.5, 0.5, 0.001 * idx as f32)))
        .collect();

    let map = PhotonMap::build(photons, 1.0);

    let bucket = gpu::PhotonGrid::bucket(gpu::PhotonGrid::cell(
        vec3(0.5, 0.5, 0.0),
        1.0,
    ));

    assert_eq!(PHOTON_CELL_CAPACITY as u32, map.bucket_len(bucket));
    assert_eq!(100 - PHOTON_CELL_CAPACITY as u32, map.overflow());
}

#[test]
fn gather_ignores_distant_photons() {
    let photons =
        vec![photon(vec3(0.0, 0.0, 0.0)), photon(vec3(0.1, 0.0, 0.0))];
    let map = PhotonMap::build(photons, 0.5);

    let near = map.view().gather(Vec3::ZERO, Vec3::Y, 0.5, 1.0);
    let far = map.view().gather(vec3(0.0, 0.0, 3.0), Vec3::Y, 0.5, 1.0);

    assert!(near.x > 0.0);
    assert_eq!(Vec3::ZERO, far);
}
