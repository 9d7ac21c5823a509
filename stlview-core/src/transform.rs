//! Interactive view state and model matrices

use nalgebra::{Matrix4, Vector3};

/// Degrees of rotation per unit of drag distance
pub const DRAG_SENSITIVITY: f32 = 0.5;
/// Zoom change per scroll step
pub const ZOOM_STEP: f32 = 0.1;
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;
/// Pitch is clamped to +/- this many degrees
pub const MAX_PITCH: f32 = 90.0;
/// Degrees of yaw added per animation tick
pub const SPIN_STEP: f32 = 1.0;

/// User-controlled rotation (in degrees), zoom and auto-rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewControls {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub zoom: f32,
    pub animating: bool,
}

impl ViewControls {
    pub fn new() -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            zoom: 1.0,
            animating: false,
        }
    }

    /// Rotate by a pointer drag of `dx`, `dy` units
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.rotation_y += dx * DRAG_SENSITIVITY;
        self.rotation_x = (self.rotation_x + dy * DRAG_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Zoom by `steps` wheel notches (positive zooms in)
    pub fn scroll(&mut self, steps: f32) {
        self.zoom = (self.zoom + steps * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn reset(&mut self) {
        self.rotation_x = 0.0;
        self.rotation_y = 0.0;
        self.zoom = 1.0;
    }

    pub fn toggle_animation(&mut self) {
        self.animating = !self.animating;
    }

    /// Advance the auto-rotation by one frame
    pub fn tick(&mut self) {
        if self.animating {
            self.rotation_y += SPIN_STEP;
            if self.rotation_y >= 360.0 {
                self.rotation_y = 0.0;
            }
        }
    }
}

impl Default for ViewControls {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Pitch then yaw, from the view controls
    pub fn rotation_matrix(controls: &ViewControls) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::x() * controls.rotation_x.to_radians());
        let ry = Matrix4::new_rotation(Vector3::y() * controls.rotation_y.to_radians());
        rx * ry
    }

    /// Rotation followed by the mesh's normalization scale times the user zoom
    pub fn model_matrix(controls: &ViewControls, scale: f32) -> Matrix4<f32> {
        Self::rotation_matrix(controls) * Matrix4::new_scaling(scale * controls.zoom)
    }

    /// Combine model, view and projection; the model is applied first
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
