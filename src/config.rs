//! Viewer configuration
//!
//! Every field defaults to the values of the hand-authored bedroom scene, so an
//! empty (or missing) TOML file reproduces it exactly. A partial file only
//! overrides the keys it names.
//!
//! ```toml
//! [camera]
//! mode = "fixed"
//!
//! [render]
//! shadows = false
//!
//! [room]
//! lightbulb = [0.0, 2.0, 3.0]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::gfx::camera::orbit_controls::DEFAULT_MIN_DISTANCE;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(String),

    /// A value parsed fine but is out of range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How the camera is driven after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Camera stays where it was placed
    Fixed,
    /// Damped orbit controls around the room centre
    Orbit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            title: "roomview".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub mode: CameraMode,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    /// Closest the orbit camera may get to its target
    pub min_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Orbit,
            fov_degrees: 75.0,
            near: 0.1,
            far: 5000.0,
            position: [0.0, 0.0, 8.0],
            target: [0.0, 0.0, 0.0],
            enable_damping: true,
            damping_factor: 0.05,
            enable_pan: true,
            enable_zoom: true,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Clear color as 0xRRGGBB
    pub background: u32,
    pub shadows: bool,
    pub shadow_map_size: u32,
    pub vsync: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: 0xB9F3FC,
            shadows: true,
            shadow_map_size: 2048,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Anchor shared by the bulb meshes and the point light
    pub lightbulb: [f32; 3],
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            lightbulb: [0.0, 2.35, 3.0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub room: RoomConfig,
}

impl AppConfig {
    /// Loads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid(
                "window",
                format!("size must be non-zero, got {}x{}", self.window.width, self.window.height),
            ));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid(
                "camera.fov_degrees",
                format!("{} is outside (0, 180)", camera.fov_degrees),
            ));
        }
        if !(camera.near > 0.0) || camera.near >= camera.far {
            return Err(invalid(
                "camera.near",
                format!("need 0 < near < far, got near={} far={}", camera.near, camera.far),
            ));
        }
        if !(camera.damping_factor > 0.0 && camera.damping_factor <= 1.0) {
            return Err(invalid(
                "camera.damping_factor",
                format!("{} is outside (0, 1]", camera.damping_factor),
            ));
        }
        if !(camera.min_distance > 0.0 && camera.min_distance.is_finite()) {
            return Err(invalid(
                "camera.min_distance",
                format!("{} must be positive and finite", camera.min_distance),
            ));
        }
        if camera.position == camera.target {
            return Err(invalid(
                "camera.position",
                "camera cannot sit on its own target".to_string(),
            ));
        }

        if self.render.background > 0xFF_FFFF {
            return Err(invalid(
                "render.background",
                format!("{:#x} is not a 24-bit color", self.render.background),
            ));
        }
        if !self.render.shadow_map_size.is_power_of_two() || self.render.shadow_map_size > 8192 {
            return Err(invalid(
                "render.shadow_map_size",
                format!("{} must be a power of two <= 8192", self.render.shadow_map_size),
            ));
        }

        if self.room.lightbulb.iter().any(|c| !c.is_finite()) {
            return Err(invalid("room.lightbulb", "coordinates must be finite".to_string()));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_room_scene() {
        let config = AppConfig::default();
        assert_eq!(config.camera.mode, CameraMode::Orbit);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.damping_factor, 0.05);
        assert_eq!(config.camera.position, [0.0, 0.0, 8.0]);
        assert_eq!(config.render.background, 0xB9F3FC);
        assert_eq!(config.room.lightbulb, [0.0, 2.35, 3.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let config = AppConfig::from_toml_str(
            r#"
            [camera]
            mode = "fixed"

            [render]
            background = 0x000000
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.mode, CameraMode::Fixed);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.render.background, 0);
        assert!(config.render.shadows);
    }

    #[test]
    fn rejects_out_of_range_damping() {
        let err = AppConfig::from_toml_str("[camera]\ndamping_factor = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "camera.damping_factor",
                ..
            }
        ));
    }

    #[test]
    fn orbit_distance_must_stay_positive() {
        assert_eq!(AppConfig::default().camera.min_distance, 1.1);
        for bad in ["0.0", "-2.0"] {
            let err = AppConfig::from_toml_str(&format!("[camera]\nmin_distance = {bad}\n"))
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid {
                    field: "camera.min_distance",
                    ..
                }
            ));
        }
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let mut config = AppConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_garbage() {
        let err = AppConfig::from_toml_str("[camera\nmode = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn serialized_defaults_parse_back() {
        let text = AppConfig::default().to_toml_string().unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), AppConfig::default());
    }
}
