// projection.rs: which primitive the frames are projected onto, per display mode

use crate::mesh::{build_plane, build_sphere, Mesh};
use crate::orientation::DisplayMode;
use glam::{Mat4, Vec3};

pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;
pub const PLANE_WIDTH: f32 = 10.0;
pub const PLANE_STANDOFF: f32 = 5.0;
pub const SPHERE_RADIUS: f32 = 500.0;
pub const SPHERE_WIDTH_SEGMENTS: usize = 60;
pub const SPHERE_HEIGHT_SEGMENTS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Plane { width: f32, height: f32 },
    Sphere {
        radius: f32,
        width_segments: usize,
        height_segments: usize,
    },
}

/// Which side of the surface gets drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSide {
    /// Viewer outside, looking at the front (mono rectangle).
    Front,
    /// Viewer inside the sphere.
    Back,
}

/// Linear remap of the v texture coordinate: `v * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRemap {
    pub scale: f32,
    pub offset: f32,
}

impl UvRemap {
    /// Middle half of the frame; a 180° source only fills the front hemisphere.
    pub const HALF: UvRemap = UvRemap {
        scale: 0.5,
        offset: 0.25,
    };

    pub fn apply(&self, v: f32) -> f32 {
        v * self.scale + self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionGeometry {
    pub mode: DisplayMode,
    pub shape: Shape,
    pub uv_remap: Option<UvRemap>,
    pub side: FaceSide,
    pub position: Vec3,
    /// Rotation about +Y, radians.
    pub yaw: f32,
}

/// Aspect ratio guess until the media reports real dimensions.
pub fn effective_aspect(source_aspect: Option<f32>) -> f32 {
    match source_aspect {
        Some(a) if a.is_finite() && a > 0.0 => a,
        _ => DEFAULT_ASPECT,
    }
}

pub fn select_geometry(mode: DisplayMode, source_aspect: Option<f32>) -> ProjectionGeometry {
    match mode {
        DisplayMode::Mono => {
            let aspect = effective_aspect(source_aspect);
            ProjectionGeometry {
                mode,
                shape: Shape::Plane {
                    width: PLANE_WIDTH,
                    height: PLANE_WIDTH / aspect,
                },
                uv_remap: None,
                side: FaceSide::Front,
                position: Vec3::new(0.0, 0.0, -PLANE_STANDOFF),
                // face +X: the mono camera starts PLANE_STANDOFF units out along +X
                yaw: std::f32::consts::FRAC_PI_2,
            }
        }
        DisplayMode::Half360 | DisplayMode::Full360 => ProjectionGeometry {
            mode,
            shape: Shape::Sphere {
                radius: SPHERE_RADIUS,
                width_segments: SPHERE_WIDTH_SEGMENTS,
                height_segments: SPHERE_HEIGHT_SEGMENTS,
            },
            uv_remap: (mode == DisplayMode::Half360).then_some(UvRemap::HALF),
            side: FaceSide::Back,
            position: Vec3::ZERO,
            yaw: 0.0,
        },
    }
}

impl ProjectionGeometry {
    /// Generates a fresh mesh and applies the remap exactly once.
    pub fn build_mesh(&self) -> Mesh {
        let mut mesh = match self.shape {
            Shape::Plane { width, height } => build_plane(width, height),
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => build_sphere(radius, width_segments, height_segments),
        };

        if let Some(remap) = self.uv_remap {
            for uv in &mut mesh.uvs {
                uv[1] = remap.apply(uv[1]);
            }
        }
        mesh
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_rotation_y(self.yaw)
    }
}
