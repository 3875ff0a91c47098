// camera.rs: look angles → camera pose, and the perspective used to draw it

use crate::orientation::{DisplayMode, Orientation};
use crate::projection::PLANE_STANDOFF;
use glam::{Mat4, Vec3};

/// Orbit radius of the mono camera around the rectangle.
pub const MONO_ORBIT_RADIUS: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

/// Unit direction for the given angles (Y up, zero longitude on +X).
fn spherical_direction(orientation: &Orientation) -> Vec3 {
    let phi = (90.0 - orientation.latitude_deg).to_radians();
    let theta = orientation.longitude_deg.to_radians();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Mono orbits the framed rectangle; panoramic modes keep the eye at the centre
/// of the sphere and only turn it.
pub fn compute_pose(orientation: &Orientation, mode: DisplayMode) -> CameraPose {
    let dir = spherical_direction(orientation);
    match mode {
        DisplayMode::Mono => {
            let centre = Vec3::new(0.0, 0.0, -PLANE_STANDOFF);
            CameraPose {
                position: dir * MONO_ORBIT_RADIUS + centre,
                target: centre,
            }
        }
        DisplayMode::Half360 | DisplayMode::Full360 => CameraPose {
            position: Vec3::ZERO,
            target: dir,
        },
    }
}

pub struct PerspectiveCamera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32) -> Self {
        Self {
            fov_y_deg,
            aspect,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_proj(&self, pose: &CameraPose) -> Mat4 {
        let view = Mat4::look_at_rh(pose.position, pose.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        proj * view
    }
}
