//! Error types for piece construction

use std::fmt;

/// Error raised while turning raw identifiers or sizes into a piece
#[derive(Debug, Clone, PartialEq)]
pub enum PieceError {
    /// Side identifier outside the six face directions
    InvalidSide(String),
    /// Color name outside the six sticker colors
    InvalidColor(String),
    /// Tile size that is not a positive finite number
    InvalidTileSize(f32),
}

impl fmt::Display for PieceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceError::InvalidSide(side) => write!(f, "Invalid tile side: {}", side),
            PieceError::InvalidColor(color) => write!(f, "Invalid tile color: {}", color),
            PieceError::InvalidTileSize(size) => write!(f, "Invalid tile size: {}", size),
        }
    }
}

impl std::error::Error for PieceError {}
