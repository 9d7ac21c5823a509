//! ASCII rasterizer for terminal rendering

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use stlview_core::{Camera, NormalizedMesh};

use crate::config::ViewerConfig;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Phong lighting parameters, evaluated once per face
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    pub light_position: Vector3<f32>,
    pub eye_position: Vector3<f32>,
    pub ambient: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Lighting {
    pub fn new(config: &ViewerConfig, camera: &Camera) -> Self {
        Self {
            light_position: config.light_position,
            eye_position: camera.position.coords,
            ambient: config.ambient_strength,
            specular: config.specular_strength,
            shininess: config.shininess,
        }
    }

    /// Intensity in [0, 1] of a face with world-space `normal` at `position`.
    /// Faces without a normal only receive ambient light.
    pub fn intensity(&self, normal: &Vector3<f32>, position: &Vector3<f32>) -> f32 {
        let Some(normal) = normal.try_normalize(0.0) else {
            return self.ambient.min(1.0);
        };
        let to_light = (self.light_position - position).normalize();
        let diffuse = normal.dot(&to_light).max(0.0);

        let to_eye = (self.eye_position - position).normalize();
        let reflected = -to_light - normal * 2.0 * normal.dot(&-to_light);
        let specular = self.specular * to_eye.dot(&reflected).max(0.0).powf(self.shininess);

        (self.ambient + diffuse + specular).clamp(0.0, 1.0)
    }
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Rasterize every face of `mesh` under `model_matrix`
    pub fn render_mesh(
        &mut self,
        mesh: &NormalizedMesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        lighting: &Lighting,
    ) {
        for (corners, normals) in mesh.vertices.chunks_exact(3).zip(mesh.normals.chunks_exact(3)) {
            self.render_triangle(corners, &normals[0], model_matrix, camera, lighting);
        }
    }

    fn render_triangle(
        &mut self,
        corners: &[Vector3<f32>],
        normal: &Vector3<f32>,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        lighting: &Lighting,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (screen, corner) in screen_coords.iter_mut().zip(corners) {
            match camera.project_to_screen(
                &Point3::from(*corner),
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *screen = projected,
                None => return, // Behind the camera or past the far plane
            }
        }

        let centroid = (corners[0] + corners[1] + corners[2]) / 3.0;
        let world_position = model_matrix.transform_point(&Point3::from(centroid)).coords;
        let world_normal = model_matrix.transform_vector(normal);
        let brightness = lighting.intensity(&world_normal, &world_position);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (row_index, row) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            for &c in row {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if row_index + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stlview_core::{normalize, Mesh, Transform, ViewControls};

    #[test]
    fn test_barycentric_inside_and_degenerate() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!(w0 > 0.0 && w1 > 0.0 && w2 > 0.0);
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-6);

        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn test_lighting_facing_light_is_brighter() {
        let lighting = Lighting::new(&ViewerConfig::default(), &Camera::default());
        let position = Vector3::zeros();
        let toward = lighting.intensity(&Vector3::new(1.0, 1.0, 1.0), &position);
        let away = lighting.intensity(&Vector3::new(-1.0, -1.0, -1.0), &position);
        assert!(toward > away);
        assert!((away - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_zero_normal_gets_ambient_only() {
        let lighting = Lighting::new(&ViewerConfig::default(), &Camera::default());
        let value = lighting.intensity(&Vector3::zeros(), &Vector3::zeros());
        assert!((value - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_cube_covers_screen_center() {
        let mesh = normalize(&Mesh::cube(10.0, Vector3::new(50.0, 50.0, 50.0)));
        let camera = Camera::new(40.0, 40.0);
        let lighting = Lighting::new(&ViewerConfig::default(), &camera);
        let mut controls = ViewControls::new();
        controls.scroll(-5.0);
        let model = Transform::model_matrix(&controls, mesh.transform.scale);

        let mut renderer = AsciiRenderer::new(40, 40);
        renderer.render_mesh(&mesh, &model, &camera, &lighting);
        assert_ne!(renderer.char_at(20, 20), ' ');
        assert_eq!(renderer.char_at(0, 0), ' ');

        renderer.clear();
        assert_eq!(renderer.char_at(20, 20), ' ');
    }
}
