/// Tile colors and linear RGB values
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PieceError;

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Component-wise product, used to filter an albedo by incoming light
    pub fn modulate(self, other: Rgb) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Convert to 8-bit channels, clamping out-of-range components
    pub fn to_u8(self) -> (u8, u8, u8) {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (quantize(self.r), quantize(self.g), quantize(self.b))
    }
}

impl std::ops::Add for Rgb {
    type Output = Rgb;

    fn add(self, other: Rgb) -> Rgb {
        Rgb::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

/// The six sticker colors of a cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    White,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Orange,
        Color::White,
    ];

    /// The `0xRRGGBB` value of this color
    pub fn hex(self) -> u32 {
        match self {
            Color::Red => 0xff0000,
            Color::Green => 0x00ff00,
            Color::Blue => 0x0000ff,
            Color::Yellow => 0xffff00,
            Color::Orange => 0xff7f00,
            Color::White => 0xffffff,
        }
    }

    pub fn rgb(self) -> Rgb {
        Rgb::from_hex(self.hex())
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = PieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                log::warn!("Rejecting unknown tile color {:?}", s);
                PieceError::InvalidColor(s.to_string())
            })
    }
}

impl TryFrom<String> for Color {
    type Error = PieceError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}
