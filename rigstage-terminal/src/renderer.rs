/// ASCII rasterizer for the terminal viewport
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use rigstage_core::{Camera, DrawCommand, Mesh, Shade, Triangle};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Lines and markers win depth ties against the faces they sit on
const OVERLAY_BIAS: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    shade: Option<Shade>,
}

const EMPTY: Cell = Cell {
    character: ' ',
    shade: None,
};

/// ASCII renderer that converts a draw list to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    pub fn render(&mut self, commands: &[DrawCommand], camera: &Camera) {
        let identity = Matrix4::identity();
        let light_dir = (camera.position() - camera.target).normalize();

        for command in commands {
            match command {
                DrawCommand::Line { from, to, shade } => {
                    self.render_line(camera, from, to, *shade);
                }
                DrawCommand::Box {
                    transform,
                    half_extents,
                    shade,
                    ..
                } => {
                    let mesh = Mesh::cuboid(half_extents);
                    for triangle in &mesh.triangles {
                        self.render_triangle(triangle, transform, camera, &light_dir, *shade);
                    }
                }
                DrawCommand::JointMarker {
                    position, shade, ..
                } => {
                    if let Some((x, y, depth)) = self.project(camera, position, &identity) {
                        self.plot(x as i32, y as i32, depth - OVERLAY_BIAS, 'o', *shade);
                    }
                }
            }
        }
    }

    fn project(
        &self,
        camera: &Camera,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
    ) -> Option<(f32, f32, f32)> {
        camera.project_to_screen(point, model_matrix, self.width as u32, self.height as u32)
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        light_dir: &Vector3<f32>,
        shade: Shade,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match self.project(camera, &vertex.position, model_matrix) {
                Some(projected) => *coord = projected,
                None => return, // Triangle is clipped
            }
        }

        // Face normal in world space for shading
        let normal = model_matrix
            .transform_vector(&triangle.calculate_normal())
            .normalize();
        let brightness = normal.dot(light_dir);
        if brightness <= 0.0 {
            return; // Back face
        }

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character, shade);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, shade: Shade) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };

                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    self.plot(x, y, depth, character, shade);
                }
            }
        }
    }

    /// Lines are sampled in world space so partly visible ones still show
    fn render_line(&mut self, camera: &Camera, from: &Point3<f32>, to: &Point3<f32>, shade: Shade) {
        let character = match shade {
            Shade::Axis => '+',
            _ => '.',
        };

        let identity = Matrix4::identity();
        let samples = self.width.max(self.height).max(1);
        for step in 0..=samples {
            let t = step as f32 / samples as f32;
            let point = from + (to - from) * t;
            if let Some((x, y, depth)) = self.project(camera, &point, &identity) {
                self.plot(x as i32, y as i32, depth - OVERLAY_BIAS, character, shade);
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, shade: Shade) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = Cell {
                character,
                shade: Some(shade),
            };
        }
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].character
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                writer.queue(SetForegroundColor(shade_color(cell.shade)))?;
                writer.queue(Print(cell.character))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

pub fn shade_color(shade: Option<Shade>) -> Color {
    match shade {
        None | Some(Shade::Grid) => Color::DarkGrey,
        Some(Shade::Axis) => Color::Blue,
        Some(Shade::Body) => Color::Cyan,
        Some(Shade::Highlight) => Color::White,
        Some(Shade::Joint) => Color::Red,
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
