//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`RUBIK_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use rubik_core::{Color, Face, Side};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output surface and frame pacing
    #[serde(default)]
    pub surface: SurfaceConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Scene lighting
    #[serde(default)]
    pub lighting: LightingConfig,
    /// The piece to render
    #[serde(default)]
    pub piece: PieceConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // RUBIK_CAMERA__FOV=60 -> camera.fov = 60
        figment = figment.merge(Env::prefixed("RUBIK_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Output surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Framebuffer width in pixels
    pub width: u32,
    /// Framebuffer height in pixels
    pub height: u32,
    /// Frames drawn per second
    pub target_fps: u32,
    /// Stop after this many frames; runs until quit when unset
    pub max_frames: Option<u64>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            target_fps: 30,
            max_frames: None,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Position [x, y, z]
    pub position: [f32; 3],
    /// Euler angles [rx, ry, rz] in radians, XYZ order
    pub rotation: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [-4.0, 5.0, -2.0],
            rotation: [-std::f32::consts::FRAC_PI_2, -0.6, 0.0],
        }
    }
}

/// Lighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Background color as 0xRRGGBB
    pub background: u32,
    /// Ambient light color as 0xRRGGBB
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    /// Directional light color as 0xRRGGBB
    pub directional_color: u32,
    pub directional_intensity: f32,
    /// The directional light shines from here toward the origin
    pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            background: 0x000000,
            ambient_color: 0x444444,
            ambient_intensity: 1.0,
            directional_color: 0xffffff,
            directional_intensity: 0.6,
            directional_position: [0.0, 1.0, 0.0],
        }
    }
}

/// Piece configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceConfig {
    /// Piece center [x, y, z]
    pub center: [f32; 3],
    /// Tile edge length
    pub tile_size: f32,
    /// Tiles in drawing order
    pub faces: Vec<Face>,
}

impl Default for PieceConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            tile_size: rubik_core::TILE_SIZE,
            faces: vec![
                Face::new(Side::Front, Color::Red),
                Face::new(Side::Bottom, Color::White),
                Face::new(Side::Left, Color::Green),
            ],
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Default log level (error, warn, info, debug, trace); `RUST_LOG` wins
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.surface.width, 800);
        assert_eq!(config.surface.height, 800);
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.camera.position, [-4.0, 5.0, -2.0]);
        assert_eq!(config.lighting.ambient_color, 0x444444);
        assert_eq!(config.piece.faces.len(), 3);
        assert_eq!(config.piece.faces[0], Face::new(Side::Front, Color::Red));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("target_fps"));
        assert!(toml.contains("side = \"front\""));
        assert!(toml.contains("color = \"white\""));
    }

    #[test]
    fn test_layered_loading() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "default.toml",
                r#"
                [surface]
                width = 640
                height = 640
                target_fps = 24

                [piece]
                center = [1.0, 0.0, 0.0]
                tile_size = 2.0

                [[piece.faces]]
                side = "top"
                color = "yellow"
                "#,
            )?;
            jail.create_file(
                "user.toml",
                r#"
                [camera]
                fov = 60.0
                near = 0.5
                far = 50.0
                position = [0.0, 0.0, 5.0]
                rotation = [0.0, 0.0, 0.0]
                "#,
            )?;
            jail.set_env("RUBIK_SURFACE__WIDTH", "320");

            let config = AppConfig::load_from(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(config.surface.width, 320);
            assert_eq!(config.surface.height, 640);
            assert_eq!(config.camera.fov, 60.0);
            assert_eq!(config.piece.tile_size, 2.0);
            assert_eq!(config.piece.faces, vec![Face::new(Side::Top, Color::Yellow)]);
            // untouched sections keep their defaults
            assert_eq!(config.lighting.directional_intensity, 0.6);
            Ok(())
        });
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        figment::Jail::expect_with(|jail| {
            let config = AppConfig::load_from(jail.directory().join("missing"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.surface.target_fps, 30);
            assert_eq!(config.debug.log_level, "warn");
            Ok(())
        });
    }

    #[test]
    fn test_sides_by_index_and_any_case() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "default.toml",
                r#"
                [[piece.faces]]
                side = 4
                color = "RED"

                [[piece.faces]]
                side = "BOTTOM"
                color = "white"

                [[piece.faces]]
                side = "3"
                color = "Green"
                "#,
            )?;

            let config = AppConfig::load_from(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(
                config.piece.faces,
                vec![
                    Face::new(Side::Front, Color::Red),
                    Face::new(Side::Bottom, Color::White),
                    Face::new(Side::Left, Color::Green),
                ]
            );
            Ok(())
        });
    }

    #[test]
    fn test_out_of_range_side_index_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "default.toml",
                r#"
                [[piece.faces]]
                side = 6
                color = "red"
                "#,
            )?;

            let err = AppConfig::load_from(jail.directory()).unwrap_err();
            assert!(err.to_string().contains("Invalid tile side: 6"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_side_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "default.toml",
                r#"
                [piece]
                center = [0.0, 0.0, 0.0]
                tile_size = 1.0

                [[piece.faces]]
                side = "diagonal"
                color = "red"
                "#,
            )?;

            let err = AppConfig::load_from(jail.directory()).unwrap_err();
            assert!(err.to_string().contains("Configuration error"));
            Ok(())
        });
    }
}
