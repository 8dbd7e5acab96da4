// src/config.rs
//! Startup configuration, read once from an optional TOML file.

use serde::{Deserialize, Serialize};

use crate::engine_lib::visibility::SealingFloorPolicy;
use crate::error::ViewerResult;

pub const DEFAULT_CONFIG_PATH: &str = "room_viewer.toml";
pub const CONFIG_PATH_ENV: &str = "ROOM_VIEWER_CONFIG";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub scene: SceneConfig,
    pub visibility: VisibilityConfig,
    pub render: RenderConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Room Viewer".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f32,
    pub znear: f32,
    pub zfar: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            znear: 0.1,
            zfar: 100.0,
            position: [8.0, 6.0, 2.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 40.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// glTF/GLB file to load. The built-in demo room is used when unset.
    pub model_path: Option<String>,
    pub room_color: [f32; 4],
    pub ambient_intensity: f32,
    pub point_light_intensity: f32,
    pub point_light_position: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            room_color: [1.0, 1.0, 1.0, 1.0],
            ambient_intensity: 0.5,
            point_light_intensity: 0.5,
            point_light_position: [2.0, 3.0, 4.0],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub sealing_floor_policy: SealingFloorPolicy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f64; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> ViewerResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads `$ROOM_VIEWER_CONFIG` or `room_viewer.toml`. A missing default file
    /// is not an error; a missing file named through the environment is.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> ViewerResult<Self> {
        let (path, explicit) = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => (path, true),
            Err(_) => (DEFAULT_CONFIG_PATH.to_string(), false),
        };
        if !explicit && !std::path::Path::new(&path).exists() {
            log::info!("No {} found, using default configuration", path);
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        log::info!("Loaded configuration from {}", path);
        Self::from_toml_str(&contents)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> ViewerResult<Self> {
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;

    #[test]
    fn defaults_match_original_scene_constants() {
        let config = AppConfig::default();
        assert_eq!(config.camera.fov_y_deg, 75.0);
        assert_eq!(config.camera.znear, 0.1);
        assert_eq!(config.camera.zfar, 100.0);
        assert_eq!(config.camera.position, [8.0, 6.0, 2.0]);
        assert_eq!(config.scene.ambient_intensity, 0.5);
        assert_eq!(config.scene.point_light_position, [2.0, 3.0, 4.0]);
        assert_eq!(config.visibility.sealing_floor_policy, SealingFloorPolicy::Distance);
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let config = AppConfig::from_toml_str(
            r#"
            [camera]
            fov_y_deg = 60.0

            [scene]
            model_path = "assets/My-Room.glb"

            [visibility.sealing_floor_policy]
            mode = "vertical_threshold"
            threshold = -0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.fov_y_deg, 60.0);
        assert_eq!(config.camera.zfar, 100.0);
        assert_eq!(config.scene.model_path.as_deref(), Some("assets/My-Room.glb"));
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(
            config.visibility.sealing_floor_policy,
            SealingFloorPolicy::VerticalThreshold { threshold: -0.25 }
        );
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let err = AppConfig::from_toml_str("[camera]\nfov_y_deg = \"wide\"").unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }
}
