//! Engine configuration.
//!
//! Every section has reference defaults, so a config file only needs the
//! fields it wants to change:
//!
//! ```json
//! { "motion": { "collide": false }, "render": { "mode": "flat" } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::Player;
use crate::renderer::{Palette, RenderMode};
use crate::vector::Vec2;
use crate::world::{GridMap, MapError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("map error: {0}")]
    Map(#[from] MapError),
}

/// Internal render resolution, in pixels.
///
/// The `cast` report uses both fields as given. The window keeps `height`
/// and widens the internal buffer to the window aspect, never below `width`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera plane constant `k` in `(0, k)`. Smaller is a narrower FOV
    /// unless `normalize_plane` is set.
    pub plane: f32,
    /// Normalize the base plane to unit length (fixed 90 degree FOV).
    pub normalize_plane: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            plane: 0.66,
            normalize_plane: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Grid units per tick.
    pub speed: f32,
    /// Radians per tick added while turning left.
    pub turn_left_rate: f32,
    /// Radians per tick added while turning right (negative).
    pub turn_right_rate: f32,
    /// Reject moves into wall cells. The reference movement has no collision
    /// at all; set this to `false` to get it back.
    pub collide: bool,
    /// Simulation ticks per second.
    pub tick_hz: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 0.03,
            turn_left_rate: 0.06,
            turn_right_rate: -0.05,
            collide: true,
            tick_hz: 60.0,
        }
    }
}

/// Size of every wall texture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            x: 2.0,
            y: 2.0,
            angle: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    pub palette: Palette,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub screen: ScreenConfig,
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub texture: TextureConfig,
    pub spawn: SpawnConfig,
    pub render: RenderConfig,
    /// Map rows; the built-in reference map when absent.
    pub map: Option<Vec<Vec<u8>>>,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build_map(&self) -> Result<GridMap, ConfigError> {
        match &self.map {
            Some(rows) => Ok(GridMap::from_rows(rows)?),
            None => Ok(GridMap::reference()),
        }
    }

    pub fn spawn_player(&self) -> Player {
        Player::new(Vec2::new(self.spawn.x, self.spawn.y), self.spawn.angle)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.screen.width == 0 || self.screen.height == 0 {
            return invalid("screen dimensions must be nonzero");
        }
        if self.texture.width == 0 || self.texture.height == 0 {
            return invalid("texture dimensions must be nonzero");
        }
        if !self.camera.plane.is_finite() || self.camera.plane == 0.0 {
            return invalid("camera plane must be finite and nonzero");
        }
        let m = &self.motion;
        let rates = [m.speed, m.turn_left_rate, m.turn_right_rate];
        if !rates.iter().all(|v| v.is_finite()) {
            return invalid("motion rates must be finite");
        }
        if !(m.tick_hz.is_finite() && m.tick_hz > 0.0) {
            return invalid("tick_hz must be positive");
        }
        if self.render.palette.colors.is_empty() {
            return invalid("palette needs at least one color");
        }

        let map = self.build_map()?;
        let spawn = Vec2::new(self.spawn.x, self.spawn.y);
        if !map.is_open(spawn) {
            return Err(ConfigError::Invalid(format!(
                "spawn ({}, {}) is not on an open cell",
                spawn.x, spawn.y
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let c = EngineConfig::default();
        assert_eq!(c.motion.speed, 0.03);
        assert_eq!(c.motion.turn_left_rate, 0.06);
        assert_eq!(c.motion.turn_right_rate, -0.05);
        assert_eq!(c.camera.plane, 0.66);
        assert!(c.motion.collide);
        assert!(c.validate().is_ok());
        assert_eq!(c.build_map().unwrap(), GridMap::reference());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = EngineConfig::from_json(
            r#"{ "motion": { "collide": false }, "render": { "mode": "flat" } }"#,
        )
        .unwrap();
        assert!(!c.motion.collide);
        assert_eq!(c.motion.speed, 0.03);
        assert_eq!(c.render.mode, RenderMode::Flat);
        assert_eq!(c.screen, ScreenConfig::default());
    }

    #[test]
    fn custom_map_rows() {
        let c = EngineConfig::from_json(
            r#"{ "map": [[1,1,1,1],[1,0,0,2],[1,1,1,1]], "spawn": { "x": 1.5, "y": 1.5 } }"#,
        )
        .unwrap();
        let map = c.build_map().unwrap();
        assert_eq!((map.width(), map.height()), (4, 3));
    }

    #[test]
    fn rejects_open_map_border() {
        let err = EngineConfig::from_json(r#"{ "map": [[1,1,1],[0,0,1],[1,1,1]] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Map(MapError::OpenBorder { .. })));
    }

    #[test]
    fn rejects_spawn_in_wall() {
        let err = EngineConfig::from_json(r#"{ "spawn": { "x": 0.5, "y": 0.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_texture() {
        let err = EngineConfig::from_json(r#"{ "texture": { "width": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let c = EngineConfig::default();
        let back = EngineConfig::from_json(&c.to_json().unwrap()).unwrap();
        assert_eq!(back, c);
    }
}
