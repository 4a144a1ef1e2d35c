/// Cube pieces and the colored tiles stuck on their faces
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::PieceError;
use crate::placement::{place_tile, TILE_SIZE};
use crate::side::Side;
use crate::transform::Orientation;

/// Which side of a piece carries a tile, and in which color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub side: Side,
    pub color: Color,
}

impl Face {
    pub fn new(side: Side, color: Color) -> Self {
        Self { side, color }
    }

    /// Parse a face from raw side and color identifiers
    pub fn parse(side: &str, color: &str) -> Result<Self, PieceError> {
        Ok(Self::new(side.parse()?, color.parse()?))
    }
}

/// A colored square on one face of a piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub position: Point3<f32>,
    pub rotation: Orientation,
    pub color: Color,
}

/// Place one tile per face, in input order.
///
/// Repeated sides are kept and yield coincident tiles.
pub fn build_tiles(center: Point3<f32>, faces: &[Face], tile_size: f32) -> Vec<Tile> {
    faces
        .iter()
        .map(|face| {
            let placement = place_tile(center, face.side, tile_size);
            log::debug!(
                "Placed {} tile on {} side at ({}, {}, {})",
                face.color,
                face.side,
                placement.position.x,
                placement.position.y,
                placement.position.z
            );

            Tile {
                position: placement.position,
                rotation: placement.rotation,
                color: face.color,
            }
        })
        .collect()
}

/// A cube piece with its tiles
#[derive(Debug, Clone)]
pub struct Piece {
    center: Point3<f32>,
    tile_size: f32,
    rotation: Orientation,
    tiles: Vec<Tile>,
}

impl Piece {
    /// Build a piece with unit tiles
    pub fn new(center: Point3<f32>, faces: &[Face]) -> Self {
        Self {
            center,
            tile_size: TILE_SIZE,
            rotation: Orientation::zero(),
            tiles: build_tiles(center, faces, TILE_SIZE),
        }
    }

    /// Build a piece whose tiles have edge `tile_size`
    pub fn with_tile_size(
        center: Point3<f32>,
        faces: &[Face],
        tile_size: f32,
    ) -> Result<Self, PieceError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(PieceError::InvalidTileSize(tile_size));
        }

        Ok(Self {
            center,
            tile_size,
            rotation: Orientation::zero(),
            tiles: build_tiles(center, faces, tile_size),
        })
    }

    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn rotation(&self) -> Orientation {
        self.rotation
    }

    /// Record a new orientation for the piece. Tiles already built keep
    /// their placement.
    pub fn set_rotation(&mut self, rotation: Orientation) {
        self.rotation = rotation;
    }
}
