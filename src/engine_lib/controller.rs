// src/engine_lib/controller.rs

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::config::ControlsConfig;
use crate::engine_lib::camera::Camera;

const POLAR_EPSILON: f32 = 1e-6;
const CHANGE_EPSILON: f32 = 1e-6;
// Damped motion below this is snapped to zero so the controller settles.
const REST_EPSILON: f32 = 1e-5;
const PIXELS_PER_LINE: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Orbit/pan/zoom around a target point with damped motion.
pub struct OrbitController {
    settings: ControlsConfig,
    viewport_height: f32,

    drag: Option<DragMode>,
    last_cursor: Option<(f32, f32)>,
    shift_held: bool,

    pending_rotate_px: (f32, f32),
    pending_pan_px: (f32, f32),
    pending_zoom_lines: f32,

    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vec3,
}

impl OrbitController {
    pub fn new(settings: ControlsConfig, viewport_height: u32) -> Self {
        Self {
            settings,
            viewport_height: viewport_height.max(1) as f32,
            drag: None,
            last_cursor: None,
            shift_held: false,
            pending_rotate_px: (0.0, 0.0),
            pending_pan_px: (0.0, 0.0),
            pending_zoom_lines: 0.0,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vec3::ZERO,
        }
    }

    pub fn resize(&mut self, viewport_height: u32) {
        if viewport_height > 0 {
            self.viewport_height = viewport_height as f32;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_held = modifiers.state().shift_key();
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let mode = match button {
                    MouseButton::Left if self.shift_held => DragMode::Pan,
                    MouseButton::Left => DragMode::Rotate,
                    MouseButton::Right => DragMode::Pan,
                    _ => return false,
                };
                match state {
                    ElementState::Pressed => self.begin_drag(mode),
                    ElementState::Released => self.end_drag(),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::CursorLeft { .. } => {
                self.end_drag();
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.scroll(lines);
                true
            }
            WindowEvent::Focused(false) => {
                self.end_drag();
                false
            }
            _ => false,
        }
    }

    pub fn begin_drag(&mut self, mode: DragMode) {
        self.drag = Some(mode);
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Records a cursor position. Returns true when the move fed a drag.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> bool {
        let previous = self.last_cursor.replace((x, y));
        let (Some(mode), Some((px, py))) = (self.drag, previous) else {
            return false;
        };
        let (dx, dy) = (x - px, y - py);
        match mode {
            DragMode::Rotate => {
                self.pending_rotate_px.0 += dx;
                self.pending_rotate_px.1 += dy;
            }
            DragMode::Pan => {
                self.pending_pan_px.0 += dx;
                self.pending_pan_px.1 += dy;
            }
        }
        true
    }

    /// Positive values zoom in.
    pub fn scroll(&mut self, lines: f32) {
        self.pending_zoom_lines += lines;
    }

    /// Applies pending input and damping to `camera`. Returns true when the
    /// camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - camera.target;
        let mut radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        self.consume_rotate();
        self.consume_pan(camera, radius);
        let zoom_scale = self.consume_zoom();

        let damping = self.settings.damping_factor.clamp(0.0, 1.0);
        let step = if damping > 0.0 { damping } else { 1.0 };

        theta += self.theta_delta * step;
        phi = (phi + self.phi_delta * step).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        radius = (radius * zoom_scale).clamp(self.settings.min_distance, self.settings.max_distance);
        let target = camera.target + self.pan_offset * step;

        if damping > 0.0 {
            self.theta_delta *= 1.0 - damping;
            self.phi_delta *= 1.0 - damping;
            self.pan_offset *= 1.0 - damping;
            self.settle();
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }

        let sin_phi = phi.sin();
        let position = target
            + Vec3::new(sin_phi * theta.sin(), phi.cos(), sin_phi * theta.cos()) * radius;

        let changed = position.distance_squared(camera.position) > CHANGE_EPSILON
            || target.distance_squared(camera.target) > CHANGE_EPSILON;
        camera.position = position;
        camera.target = target;
        changed
    }

    fn consume_rotate(&mut self) {
        let (dx, dy) = std::mem::take(&mut self.pending_rotate_px);
        let per_pixel = TAU * self.settings.rotate_speed / self.viewport_height;
        self.theta_delta -= dx * per_pixel;
        self.phi_delta -= dy * per_pixel;
    }

    fn consume_pan(&mut self, camera: &Camera, radius: f32) {
        let (dx, dy) = std::mem::take(&mut self.pending_pan_px);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        // World units per pixel at the target's depth.
        let target_height = 2.0 * radius * (camera.fov_y_rad * 0.5).tan();
        let per_pixel = target_height * self.settings.pan_speed / self.viewport_height;

        let forward = (camera.target - camera.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        self.pan_offset += (-right * dx + up * dy) * per_pixel;
    }

    fn consume_zoom(&mut self) -> f32 {
        let lines = std::mem::take(&mut self.pending_zoom_lines);
        0.95f32.powf(self.settings.zoom_speed * lines)
    }

    fn settle(&mut self) {
        if self.theta_delta.abs() < REST_EPSILON {
            self.theta_delta = 0.0;
        }
        if self.phi_delta.abs() < REST_EPSILON {
            self.phi_delta = 0.0;
        }
        if self.pan_offset.length_squared() < REST_EPSILON * REST_EPSILON {
            self.pan_offset = Vec3::ZERO;
        }
    }
}
