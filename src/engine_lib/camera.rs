// src/engine_lib/camera.rs

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(
        position: Vec3,
        target: Vec3,
        fov_y_deg: f32,
        aspect: f32,
        znear: f32,
        zfar: f32,
    ) -> Self {
        Self {
            position,
            target,
            fov_y_rad: fov_y_deg.to_radians(),
            aspect,
            znear,
            zfar,
        }
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self::new(
            Vec3::from(config.position),
            Vec3::from(config.target),
            config.fov_y_deg,
            aspect,
            config.znear,
            config.zfar,
        )
    }

    /// Viewport resize passthrough. Zero-sized surfaces keep the old aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    // wgpu clip space has z in [0, 1], which is what perspective_rh expects.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
