use caustica::{Camera, Engine, Light, Material, Primitive};
use glam::{vec3, Quat, Vec3};

use super::DemoParams;

const WHITE: u32 = 0;
const RED: u32 = 1;
const GREEN: u32 = 2;
const MIRROR: u32 = 3;
const GLASS: u32 = 4;
const LAMP: u32 = 5;

pub fn build(engine: &mut Engine<DemoParams>) -> caustica::Result<Camera> {
    let diffuse = |color: Vec3| {
        Material::default()
            .with_base_color(color.extend(1.0))
            .with_roughness(1.0)
    };

    engine.add_material(WHITE, diffuse(vec3(0.73, 0.73, 0.73)));
    engine.add_material(RED, diffuse(vec3(0.65, 0.05, 0.05)));
    engine.add_material(GREEN, diffuse(vec3(0.12, 0.45, 0.15)));
    engine.add_material(MIRROR, Material::metal(vec3(0.95, 0.95, 0.95), 0.05));

    engine.add_material(
        GLASS,
        Material::glass(1.5).with_absorption(vec3(0.1, 0.02, 0.1)),
    );

    engine.add_material(
        LAMP,
        diffuse(Vec3::ONE).with_emission(Vec3::splat(8.0)),
    );

    // Walls; planes face the inside of the box
    let walls = [
        (Vec3::Y, 0.0, WHITE),
        (-Vec3::Y, -5.0, WHITE),
        (Vec3::Z, -2.5, WHITE),
        (Vec3::X, -2.5, RED),
        (-Vec3::X, -2.5, GREEN),
    ];

    for (handle, (normal, offset, material)) in (0..).zip(walls) {
        engine.add_primitive(
            handle,
            Primitive::plane(normal, offset),
            material,
        )?;
    }

    engine.add_primitive(
        10,
        Primitive::cuboid(
            vec3(-1.0, 1.5, -1.0),
            vec3(0.6, 1.5, 0.6),
            Quat::from_rotation_y(0.3),
        ),
        MIRROR,
    )?;

    engine.add_primitive(
        11,
        Primitive::sphere(vec3(1.1, 0.8, 0.5), 0.8),
        GLASS,
    )?;

    engine.add_primitive(
        12,
        Primitive::cuboid(
            vec3(0.0, 4.98, 0.0),
            vec3(0.6, 0.01, 0.6),
            Quat::IDENTITY,
        ),
        LAMP,
    )?;

    engine.add_light(
        0,
        Light::point(vec3(0.0, 4.7, 0.0), Vec3::ONE, 30.0).with_radius(0.3, 8),
    );

    Ok(Camera::looking_at(vec3(0.0, 2.5, 9.0), vec3(0.0, 2.5, 0.0))
        .with_fov_y(40f32.to_radians()))
}
