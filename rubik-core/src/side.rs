/// The six face directions of a cube piece
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use crate::error::PieceError;
use crate::transform::Orientation;

/// A face direction. Variants are numbered 0..=5 in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "SideId")]
pub enum Side {
    Top,
    Bottom,
    Right,
    Left,
    Front,
    Back,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Top,
        Side::Bottom,
        Side::Right,
        Side::Left,
        Side::Front,
        Side::Back,
    ];

    /// Unit vector pointing from the piece center toward this face
    pub fn normal(self) -> Vector3<f32> {
        match self {
            Side::Top => Vector3::new(0.0, 0.0, 1.0),
            Side::Bottom => Vector3::new(0.0, 0.0, -1.0),
            Side::Right => Vector3::new(1.0, 0.0, 0.0),
            Side::Left => Vector3::new(-1.0, 0.0, 0.0),
            Side::Front => Vector3::new(0.0, 1.0, 0.0),
            Side::Back => Vector3::new(0.0, -1.0, 0.0),
        }
    }

    /// Rotation that turns an XY-plane tile onto this face
    pub fn orientation(self) -> Orientation {
        match self {
            Side::Top | Side::Bottom => Orientation::zero(),
            Side::Right | Side::Left => Orientation::new(0.0, FRAC_PI_2, 0.0),
            Side::Front | Side::Back => Orientation::new(FRAC_PI_2, 0.0, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Right => "right",
            Side::Left => "left",
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A side as written in configuration: a name or a 0..=5 index
#[derive(Deserialize)]
#[serde(untagged)]
enum SideId {
    Index(u64),
    Name(String),
}

impl TryFrom<SideId> for Side {
    type Error = PieceError;

    fn try_from(id: SideId) -> Result<Self, Self::Error> {
        match id {
            SideId::Index(index) => match u8::try_from(index) {
                Ok(index) => Side::try_from(index),
                Err(_) => {
                    log::warn!("Rejecting invalid tile side index {}", index);
                    Err(PieceError::InvalidSide(index.to_string()))
                }
            },
            SideId::Name(name) => name.parse(),
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = PieceError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Side::ALL.get(index as usize).copied().ok_or_else(|| {
            log::warn!("Rejecting invalid tile side index {}", index);
            PieceError::InvalidSide(index.to_string())
        })
    }
}

impl FromStr for Side {
    type Err = PieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<u8>() {
            return Side::try_from(index);
        }

        Side::ALL
            .into_iter()
            .find(|side| side.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                log::warn!("Rejecting invalid tile side {:?}", s);
                PieceError::InvalidSide(s.to_string())
            })
    }
}
