/// Rubik Core Library - Cube piece geometry and scene model
///
/// This library provides the stateless core: colors and face directions,
/// the tile placement rule, pieces, and the scene/camera types a renderer
/// consumes.

pub mod color;
pub mod error;
pub mod geometry;
pub mod piece;
pub mod placement;
pub mod projection;
pub mod scene;
pub mod side;
pub mod transform;

// Re-export commonly used types
pub use color::{Color, Rgb};
pub use error::PieceError;
pub use geometry::{Mesh, Triangle, Vertex};
pub use piece::{build_tiles, Face, Piece, Tile};
pub use placement::{place_tile, Placement, TILE_SIZE};
pub use projection::Camera;
pub use scene::{Light, Scene, SceneObject};
pub use side::Side;
pub use transform::{Orientation, Transform};
