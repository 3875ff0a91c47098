// mesh.rs: sphere / plane generators (positions, uvs, indices)
//
// Triangles are counter-clockwise when seen from the side the face normal points
// to: outward for the sphere, +Z for the plane before placement.
// UVs have v = 1 at the top edge of the source frame.

use std::f32::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// UV sphere centred on the origin. `width_segments` run around the equator,
/// `height_segments` from pole to pole.
///
/// u = 0.5 lies on +X, which is where the camera looks at zero longitude, so
/// the centre of the frame is in front of the viewer.
pub fn build_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let cols = width_segments + 1;
    let rows = height_segments + 1;

    let mut positions = Vec::with_capacity(cols * rows);
    let mut uvs = Vec::with_capacity(cols * rows);
    let mut indices = Vec::with_capacity(width_segments * height_segments * 6);

    for iy in 0..rows {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        let y = radius * theta.cos();
        let sin_t = theta.sin();

        for ix in 0..cols {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;

            // mirrored in z so the frame reads left-to-right from inside
            let x = -radius * phi.cos() * sin_t;
            let z = -radius * phi.sin() * sin_t;

            positions.push([x, y, z]);
            uvs.push([u, 1.0 - v]);
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = (iy * cols + ix) as u32;
            let b = a + 1;
            let c = a + cols as u32;
            let d = c + 1;

            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    Mesh {
        positions,
        uvs,
        indices,
    }
}

/// Single-quad rectangle in the XY plane, facing +Z, centred on the origin.
pub fn build_plane(width: f32, height: f32) -> Mesh {
    let hw = width * 0.5;
    let hh = height * 0.5;

    Mesh {
        positions: vec![
            [-hw, hh, 0.0],
            [-hw, -hh, 0.0],
            [hw, -hh, 0.0],
            [hw, hh, 0.0],
        ],
        uvs: vec![[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
        indices: vec![0, 1, 3, 1, 2, 3],
    }
}
