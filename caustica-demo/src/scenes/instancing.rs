use std::f32::consts::TAU;

use caustica::{Camera, Engine, Instance, Light, Material, Primitive};
use glam::{vec3, Affine3A, Quat, Vec3};

use super::DemoParams;
use crate::shapes;

const INSTANCES: u32 = 12;

pub fn build(engine: &mut Engine<DemoParams>) -> caustica::Result<Camera> {
    engine.add_material(0, Material::default().with_roughness(0.8));
    engine.add_material(1, Material::glass(1.45));
    engine.add_material(2, Material::metal(vec3(1.0, 0.78, 0.34), 0.2));

    engine.add_mesh(0, shapes::icosphere(2)?);
    engine.add_mesh(1, shapes::prism()?);

    engine.add_primitive(0, Primitive::plane(Vec3::Y, 0.0), 0)?;

    for idx in 0..INSTANCES {
        let angle = TAU * (idx as f32) / (INSTANCES as f32);
        let position = vec3(angle.cos(), 0.0, angle.sin()) * 4.0;

        let instance = if idx % 2 == 0 {
            Instance::new(
                0,
                1,
                Affine3A::from_scale_rotation_translation(
                    Vec3::splat(0.7),
                    Quat::IDENTITY,
                    position + Vec3::Y * 0.7,
                ),
            )
        } else {
            Instance::new(
                1,
                2,
                Affine3A::from_scale_rotation_translation(
                    vec3(1.0, 1.5, 1.0),
                    Quat::from_rotation_y(angle),
                    position,
                ),
            )
        };

        engine.add_instance(idx, instance)?;
    }

    engine.add_light(
        0,
        Light::directional(vec3(-0.4, -1.0, -0.3), vec3(1.0, 0.95, 0.85), 3.0)
            .with_radius(0.02, 4),
    );

    engine.add_light(1, Light::ambient(vec3(0.5, 0.6, 0.8), 0.1));

    Ok(Camera::looking_at(vec3(0.0, 6.0, 10.0), Vec3::ZERO))
}
