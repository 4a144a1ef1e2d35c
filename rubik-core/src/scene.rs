//! Scene container: drawable objects plus the lights that shade them

use nalgebra::{Point3, Vector3};

use crate::color::Rgb;
use crate::geometry::Mesh;
use crate::piece::Piece;
use crate::transform::Transform;

/// A light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light reaching every surface
    Ambient { color: Rgb, intensity: f32 },
    /// Parallel light shining from `position` toward the origin
    Directional {
        color: Rgb,
        intensity: f32,
        position: Point3<f32>,
    },
}

impl Light {
    pub fn ambient(hex: u32) -> Self {
        Light::Ambient {
            color: Rgb::from_hex(hex),
            intensity: 1.0,
        }
    }

    pub fn directional(hex: u32, intensity: f32, position: Point3<f32>) -> Self {
        Light::Directional {
            color: Rgb::from_hex(hex),
            intensity,
            position,
        }
    }

    /// Light arriving at a surface with unit normal `normal`
    pub fn irradiance(&self, normal: &Vector3<f32>) -> Rgb {
        match *self {
            Light::Ambient { color, intensity } => color.scale(intensity),
            Light::Directional {
                color,
                intensity,
                position,
            } => {
                let to_light = position.coords.try_normalize(f32::EPSILON);
                let lambert = to_light.map_or(0.0, |l| normal.dot(&l).max(0.0));
                color.scale(intensity * lambert)
            }
        }
    }
}

/// A mesh placed in the world with a flat color
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub color: Rgb,
    pub transform: Transform,
    /// Shade and draw both sides of each triangle
    pub double_sided: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Add one double-sided plane per tile of `piece`
    pub fn add_piece(&mut self, piece: &Piece) {
        for tile in piece.tiles() {
            self.add(SceneObject {
                mesh: Mesh::plane(piece.tile_size()),
                color: tile.color.rgb(),
                transform: Transform::new(tile.position, tile.rotation),
                double_sided: true,
            });
        }

        log::info!(
            "Added piece at ({}, {}, {}) with {} tiles",
            piece.center().x,
            piece.center().y,
            piece.center().z,
            piece.tiles().len()
        );
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Total light reaching a surface with unit normal `normal`
    pub fn irradiance(&self, normal: &Vector3<f32>) -> Rgb {
        self.lights
            .iter()
            .fold(Rgb::BLACK, |total, light| total + light.irradiance(normal))
    }
}
