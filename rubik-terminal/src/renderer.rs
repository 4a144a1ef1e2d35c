/// Software rasterizer that presents its framebuffer as terminal half-blocks
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use rubik_core::{Camera, Rgb, Scene, SceneObject, Triangle};
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// Fixed-size RGB framebuffer with a depth buffer
pub struct SoftwareRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    color_buffer: Vec<Rgb>,
}

impl SoftwareRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            color_buffer: vec![Rgb::BLACK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, background: Rgb) {
        self.depth_buffer.fill(f32::INFINITY);
        self.color_buffer.fill(background);
    }

    /// Color of the pixel at `(x, y)`, if inside the framebuffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.color_buffer[y * self.width + x])
    }

    /// Draw every object of `scene` as seen from `camera`.
    ///
    /// Triangles crossing the camera's near plane are clipped against it, so
    /// geometry that extends behind the camera still draws its visible part.
    pub fn render(&mut self, scene: &Scene, camera: &Camera) {
        for object in scene.objects() {
            self.render_object(object, scene, camera);
        }
    }

    fn render_object(&mut self, object: &SceneObject, scene: &Scene, camera: &Camera) {
        let model = object.transform.model_matrix();
        let rotation = object.transform.rotation.rotation();

        for triangle in &object.mesh.triangles {
            let mut normal = rotation * triangle.calculate_normal();
            let centroid = world_centroid(triangle, &model);
            let to_camera = camera.position - centroid;

            if normal.dot(&to_camera) < 0.0 {
                if !object.double_sided {
                    continue;
                }
                normal = -normal;
            }

            let shade = object.color.modulate(scene.irradiance(&normal));
            self.render_triangle(triangle, &model, camera, shade);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model: &Matrix4<f32>,
        camera: &Camera,
        shade: Rgb,
    ) {
        let clip = triangle
            .vertices
            .map(|vertex| camera.to_clip(&vertex.position, model));
        let polygon = clip_near(&clip, camera.near);
        if polygon.len() < 3 {
            return; // Entirely behind the camera
        }

        let (width, height) = (self.width as u32, self.height as u32);
        let screen: Vec<_> = polygon
            .iter()
            .map(|vertex| camera.clip_to_screen(vertex, width, height))
            .collect();

        // The clipped polygon is convex: fan it out from its first vertex
        for edge in screen[1..].windows(2) {
            self.rasterize_triangle(&[screen[0], edge[0], edge[1]], shade);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], shade: Rgb) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

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

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    return; // Degenerate on screen
                };

                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                if depth > 1.0 {
                    continue; // Past the far plane
                }

                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.color_buffer[idx] = shade;
                }
            }
        }
    }

    /// Present the framebuffer in a `columns` x `rows` cell area starting at
    /// the top-left of the terminal. Each cell shows two stacked pixels.
    pub fn draw<W: Write>(
        &self,
        writer: &mut W,
        columns: u16,
        rows: u16,
    ) -> std::io::Result<()> {
        if columns == 0 || rows == 0 {
            return Ok(());
        }

        let sub_rows = rows as usize * 2;
        for row in 0..rows {
            writer.queue(cursor::MoveTo(0, row))?;
            for column in 0..columns {
                let x = column as usize * self.width / columns as usize;
                let upper = row as usize * 2 * self.height / sub_rows;
                let lower = (row as usize * 2 + 1) * self.height / sub_rows;

                let top = self.color_buffer[upper * self.width + x];
                let bottom = self.color_buffer[lower * self.width + x];

                writer.queue(SetForegroundColor(terminal_color(top)))?;
                writer.queue(SetBackgroundColor(terminal_color(bottom)))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
            writer.queue(ResetColor)?;
        }
        Ok(())
    }
}

/// Largest cell area with the framebuffer's aspect ratio that fits the
/// terminal, given that each cell holds two square pixels stacked vertically
pub fn fit_viewport(width: usize, height: usize, columns: u16, rows: u16) -> (u16, u16) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let pixel_rows = rows as usize * 2;
    let by_width = (columns as usize, columns as usize * height / width);
    let (fit_columns, fit_pixel_rows) = if by_width.1 <= pixel_rows {
        by_width
    } else {
        (pixel_rows * width / height, pixel_rows)
    };

    (fit_columns as u16, (fit_pixel_rows / 2) as u16)
}

fn terminal_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.to_u8();
    Color::Rgb { r, g, b }
}

/// Clip a triangle in clip space against the plane `w = near`.
/// Returns the visible polygon in winding order: no vertices, three or four.
fn clip_near(vertices: &[Vector4<f32>; 3], near: f32) -> Vec<Vector4<f32>> {
    let mut polygon = Vec::with_capacity(4);

    for (i, current) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % 3];
        let current_inside = current.w >= near;
        if current_inside {
            polygon.push(*current);
        }
        if current_inside != (next.w >= near) {
            let t = (near - current.w) / (next.w - current.w);
            polygon.push(*current + (next - *current) * t);
        }
    }

    polygon
}

fn world_centroid(triangle: &Triangle, model: &Matrix4<f32>) -> Point3<f32> {
    let sum = triangle
        .vertices
        .iter()
        .fold(Vector3::zeros(), |acc, vertex| acc + vertex.position.coords);
    model.transform_point(&Point3::from(sum / 3.0))
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
    use rubik_core::{Color as TileColor, Face, Light, Orientation, Piece, Side};

    fn corner_scene() -> (Scene, Camera) {
        let faces = [
            Face::new(Side::Front, TileColor::Red),
            Face::new(Side::Bottom, TileColor::White),
            Face::new(Side::Left, TileColor::Green),
        ];
        let mut scene = Scene::new();
        scene.add_light(Light::ambient(0x444444));
        scene.add_light(Light::directional(0xffffff, 0.6, Point3::new(0.0, 1.0, 0.0)));
        scene.add_piece(&Piece::new(Point3::origin(), &faces));

        let camera = Camera::perspective(75.0, 1.0, 0.1, 1000.0)
            .with_position(Point3::new(-4.0, 5.0, -2.0))
            .with_rotation(Orientation::new(-std::f32::consts::FRAC_PI_2, -0.6, 0.0));

        (scene, camera)
    }

    #[test]
    fn test_clear() {
        let mut renderer = SoftwareRenderer::new(4, 3);
        renderer.clear(Rgb::new(0.1, 0.2, 0.3));
        assert_eq!(renderer.pixel(3, 2), Some(Rgb::new(0.1, 0.2, 0.3)));
        assert_eq!(renderer.pixel(4, 0), None);
    }

    #[test]
    fn test_empty_scene_leaves_background() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        renderer.clear(Rgb::BLACK);
        renderer.render(&Scene::new(), &Camera::default());
        assert!((0..16).all(|y| (0..16).all(|x| renderer.pixel(x, y) == Some(Rgb::BLACK))));
    }

    #[test]
    fn test_corner_piece_is_visible() {
        let (scene, camera) = corner_scene();
        let mut renderer = SoftwareRenderer::new(200, 200);
        renderer.clear(Rgb::BLACK);
        renderer.render(&scene, &camera);

        let covered = (0..200)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.pixel(x, y) != Some(Rgb::BLACK))
            .count();
        assert!(covered > 100, "only {} pixels covered", covered);
    }

    #[test]
    fn test_front_tile_is_lit_red() {
        let (scene, camera) = corner_scene();
        let mut renderer = SoftwareRenderer::new(200, 200);
        renderer.clear(Rgb::BLACK);
        renderer.render(&scene, &camera);

        // A point on the front tile, away from its diagonal
        let (x, y, _) = camera
            .project_to_screen(
                &Point3::new(-0.2, 0.5, 0.25),
                &Matrix4::identity(),
                200,
                200,
            )
            .unwrap();
        let pixel = renderer.pixel(x as usize, y as usize).unwrap();

        // Ambient plus the full directional light hitting the +Y face
        assert!((pixel.r - (0x44 as f32 / 255.0 + 0.6)).abs() < 1e-3);
        assert_eq!(pixel.g, 0.0);
        assert_eq!(pixel.b, 0.0);
    }

    #[test]
    fn test_single_sided_back_face_is_culled() {
        let mut scene = Scene::new();
        scene.add_light(Light::ambient(0xffffff));
        scene.add(SceneObject {
            mesh: rubik_core::Mesh::plane(2.0),
            color: Rgb::new(1.0, 1.0, 1.0),
            transform: rubik_core::Transform::default(),
            double_sided: false,
        });

        // Camera behind the plane, looking toward +Z
        let camera = Camera::default()
            .with_position(Point3::new(0.0, 0.0, -5.0))
            .with_rotation(Orientation::new(0.0, std::f32::consts::PI, 0.0));
        let mut renderer = SoftwareRenderer::new(32, 32);
        renderer.clear(Rgb::BLACK);
        renderer.render(&scene, &camera);
        assert_eq!(renderer.pixel(16, 16), Some(Rgb::BLACK));

        let front = Camera::default().with_position(Point3::new(0.0, 0.0, 5.0));
        renderer.clear(Rgb::BLACK);
        renderer.render(&scene, &front);
        assert_eq!(renderer.pixel(16, 16), Some(Rgb::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_clip_near() {
        let ahead = Vector4::new(0.0, 0.0, 0.0, 2.0);
        let behind = Vector4::new(0.0, 0.0, 0.0, -2.0);

        assert_eq!(clip_near(&[ahead, ahead, ahead], 0.1).len(), 3);
        assert!(clip_near(&[behind, behind, behind], 0.1).is_empty());

        let polygon = clip_near(&[ahead, ahead, behind], 0.1);
        assert_eq!(polygon.len(), 4);
        assert!(polygon.iter().all(|vertex| vertex.w >= 0.1 - 1e-6));

        let polygon = clip_near(&[ahead, behind, behind], 0.1);
        assert_eq!(polygon.len(), 3);
    }

    #[test]
    fn test_floor_reaching_behind_camera_is_drawn() {
        let mut scene = Scene::new();
        scene.add_light(Light::ambient(0xffffff));
        // Large floor one unit below the camera, extending far behind it
        scene.add(SceneObject {
            mesh: rubik_core::Mesh::plane(100.0),
            color: Rgb::new(1.0, 1.0, 1.0),
            transform: rubik_core::Transform::new(
                Point3::new(0.0, -1.0, 0.0),
                Orientation::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            ),
            double_sided: false,
        });

        let mut renderer = SoftwareRenderer::new(32, 32);
        renderer.clear(Rgb::BLACK);
        renderer.render(&scene, &Camera::default());

        assert_eq!(renderer.pixel(16, 28), Some(Rgb::new(1.0, 1.0, 1.0)));
        // Above the horizon stays empty
        assert_eq!(renderer.pixel(16, 4), Some(Rgb::BLACK));
    }

    #[test]
    fn test_fit_viewport() {
        // Square surface in a wide terminal is limited by height
        assert_eq!(fit_viewport(800, 800, 200, 50), (100, 50));
        // ...and in a tall one by width
        assert_eq!(fit_viewport(800, 800, 40, 50), (40, 20));
        assert_eq!(fit_viewport(0, 800, 40, 50), (0, 0));
    }

    #[test]
    fn test_draw_emits_half_blocks() {
        let mut renderer = SoftwareRenderer::new(4, 4);
        renderer.clear(Rgb::new(1.0, 0.0, 0.0));
        let mut out = Vec::new();
        renderer.draw(&mut out, 2, 2).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 4);
        assert!(text.contains("255;0;0"));
    }
}
