use caustica::{Camera, Engine, Light, Material, Pattern, Primitive};
use glam::{vec3, Vec3};

use super::DemoParams;

pub fn build(engine: &mut Engine<DemoParams>) -> caustica::Result<Camera> {
    engine.add_material(
        0,
        Material::default()
            .with_base_color(vec3(0.9, 0.9, 0.85).extend(1.0))
            .with_roughness(0.9)
            .with_pattern(Pattern::Checker { scale: 1.0 }),
    );

    engine.add_material(1, Material::glass(1.5));

    for (handle, color) in [
        (2, vec3(1.0, 0.1, 0.1)),
        (3, vec3(0.1, 1.0, 0.1)),
        (4, vec3(0.1, 0.1, 1.0)),
    ] {
        engine.add_material(
            handle,
            Material::default().with_base_color(color.extend(1.0)),
        );
    }

    engine.add_primitive(0, Primitive::plane(Vec3::Y, 0.0), 0)?;
    engine.add_primitive(1, Primitive::sphere(vec3(0.0, 2.0, 0.0), 1.5), 1)?;

    for (handle, x) in [(2, -3.0), (3, 0.0), (4, 3.0)] {
        engine.add_primitive(
            handle,
            Primitive::sphere(vec3(x, 1.0, -4.5), 1.0),
            handle,
        )?;
    }

    engine.add_light(
        0,
        Light::point(vec3(0.0, 6.0, 0.0), Vec3::ONE, 150.0).with_radius(0.1, 4),
    );

    engine.add_light(1, Light::ambient(vec3(0.6, 0.7, 1.0), 0.05));

    Ok(Camera::looking_at(vec3(-5.0, 5.0, 10.0), vec3(0.0, 1.0, -1.0)))
}
