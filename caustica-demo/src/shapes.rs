use caustica::Mesh;
use glam::{vec3, Vec3};

/// Icosahedron subdivided `subdivisions` times and projected onto the unit
/// sphere; normals are smooth.
pub fn icosphere(subdivisions: u32) -> caustica::Result<Mesh> {
    let t = (1.0 + 5f32.sqrt()) / 2.0;

    let mut positions: Vec<_> = [
        vec3(-1.0, t, 0.0),
        vec3(1.0, t, 0.0),
        vec3(-1.0, -t, 0.0),
        vec3(1.0, -t, 0.0),
        vec3(0.0, -1.0, t),
        vec3(0.0, 1.0, t),
        vec3(0.0, -1.0, -t),
        vec3(0.0, 1.0, -t),
        vec3(t, 0.0, -1.0),
        vec3(t, 0.0, 1.0),
        vec3(-t, 0.0, -1.0),
        vec3(-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect();

    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, //
        1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8, //
        3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, //
        4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1, //
    ];

    for _ in 0..subdivisions {
        let mut next = Vec::with_capacity(indices.len() * 4);

        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]];
            let ab = midpoint(&mut positions, a, b);
            let bc = midpoint(&mut positions, b, c);
            let ca = midpoint(&mut positions, c, a);

            next.extend([a, ab, ca, b, bc, ab, c, ca, bc, ab, bc, ca]);
        }

        indices = next;
    }

    let normals = positions.clone();

    Mesh::new(positions, normals, indices)
}

// Shared edges get duplicated vertices; that's fine for rendering, since
// the normals stay the same
fn midpoint(positions: &mut Vec<Vec3>, a: u32, b: u32) -> u32 {
    let point = (positions[a as usize] + positions[b as usize]).normalize();

    positions.push(point);
    positions.len() as u32 - 1
}

/// Triangular prism of unit height standing on the XZ plane; normals are
/// flat.
pub fn prism() -> caustica::Result<Mesh> {
    let bottom = [
        vec3(0.0, 0.0, -0.6),
        vec3(0.52, 0.0, 0.3),
        vec3(-0.52, 0.0, 0.3),
    ];

    let top = bottom.map(|p| p + Vec3::Y);
    let positions = bottom.into_iter().chain(top).collect();

    let indices = vec![
        0, 1, 2, // bottom
        3, 5, 4, // top
        0, 3, 1, 1, 3, 4, // sides
        1, 4, 2, 2, 4, 5, //
        2, 5, 0, 0, 5, 3, //
    ];

    Mesh::new(positions, Vec::new(), indices)
}
