use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

use crate::core::Color;

/// Complete timeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub disc: DiscConfigData,
    pub death: KindStyle,
    pub injury: KindStyle,
    pub motion: MotionConfigData,
    pub rotation: RotationConfigData,
    pub labels: LabelConfigData,
    pub description: DescriptionConfigData,
    pub camera: CameraConfigData,

    /// Instant (epoch ms) disc heights are measured from; `None` uses the current time
    pub reference_time_ms: Option<i64>,

    /// Seed for placement and drift; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            disc: DiscConfigData::default(),
            death: KindStyle::death(),
            injury: KindStyle::injury(),
            motion: MotionConfigData::default(),
            rotation: RotationConfigData::default(),
            labels: LabelConfigData::default(),
            description: DescriptionConfigData::default(),
            camera: CameraConfigData::default(),
            reference_time_ms: None,
            seed: None,
        }
    }
}

impl TimelineConfig {
    /// Load configuration from JSON file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: TimelineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file with pretty formatting
    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_default(path: &str) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            tracing::warn!("Using default config ({}): {}", path, err);
            let config = Self::default();
            let _ = config.save(path);
            config
        })
    }
}

/// Disc sizing, stacking and fading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscConfigData {
    /// Disc radius per casualty
    pub radius_factor: f32,
    /// World units per millisecond of record age (negative stacks older discs lower)
    pub y_factor: f64,
    pub y_offset: f32,
    pub base_opacity: f32,
    /// Opacity lost per millisecond of record age
    pub opacity_damping: f64,
    /// Disc mesh opacity relative to the disc's own opacity
    pub mesh_opacity_scale: f32,
    pub mesh_color: Color,
}

impl Default for DiscConfigData {
    fn default() -> Self {
        Self {
            radius_factor: 0.1,
            y_factor: -0.000_000_02,
            y_offset: 20.0,
            base_opacity: 0.9,
            opacity_damping: 0.000_000_000_2,
            mesh_opacity_scale: 0.1,
            mesh_color: Color::BLACK,
        }
    }
}

/// Per-kind look of a casualty point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindStyle {
    pub radius: f32,
    pub color: Color,
    /// Sphere opacity relative to the disc opacity
    pub opacity_scale: f32,
    #[serde(default)]
    pub animation: Option<AnimationStyle>,
}

impl KindStyle {
    pub fn death() -> Self {
        Self {
            radius: 0.5,
            color: Color::rgb(0xbb as f32 / 255.0, 0.0, 0x13 as f32 / 255.0),
            opacity_scale: 4.0,
            animation: Some(AnimationStyle::default()),
        }
    }

    pub fn injury() -> Self {
        Self {
            radius: 0.5,
            color: Color::rgb(0x55 as f32 / 255.0, 0x55 as f32 / 255.0, 0x55 as f32 / 255.0),
            opacity_scale: 1.0,
            animation: None,
        }
    }
}

/// Collision flash parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationStyle {
    pub frames: u32,
    pub brighten: f32,
    pub saturate: f32,
}

impl Default for AnimationStyle {
    fn default() -> Self {
        Self {
            frames: 100,
            brighten: 2.0,
            saturate: 3.0,
        }
    }
}

/// Which test marks an entity as collided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Entity reached the edge of its disc
    #[default]
    DiscBoundary,
    /// Entity overlaps another entity of the same disc
    EntityProximity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfigData {
    /// Each velocity component is drawn from `[-max_speed, max_speed)`
    pub max_speed: f32,
    pub collision_policy: CollisionPolicy,
}

impl Default for MotionConfigData {
    fn default() -> Self {
        Self {
            max_speed: 0.01,
            collision_policy: CollisionPolicy::DiscBoundary,
        }
    }
}

/// Cosmetic spin of the marker ring and entity group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfigData {
    pub enabled: bool,
    /// Ring radians per frame = severity^2 * ring_speed_factor
    pub ring_speed_factor: f32,
    /// Group radians per frame around the vertical axis
    pub group_speed: f32,
    /// Width of the marker ring drawn just outside the disc
    pub ring_width: f32,
}

impl Default for RotationConfigData {
    fn default() -> Self {
        Self {
            enabled: false,
            ring_speed_factor: 0.05,
            group_speed: 0.001,
            ring_width: 0.3,
        }
    }
}

/// Date label placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfigData {
    /// Horizontal offset from the viewport center, in px
    pub base_x: f32,
    /// Camera distance below which labels spread outward
    pub spread_threshold: f32,
    pub spread_divisor: f32,
}

impl Default for LabelConfigData {
    fn default() -> Self {
        Self {
            base_x: 100.0,
            spread_threshold: 145.0,
            spread_divisor: 50.0,
        }
    }
}

/// Description panel fade
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfigData {
    /// Fully opaque at or beyond this camera distance
    pub fade_threshold: f32,
    /// Fully transparent at or below this camera distance
    pub fade_floor: f32,
}

impl Default for DescriptionConfigData {
    fn default() -> Self {
        Self {
            fade_threshold: 300.0,
            fade_floor: 150.0,
        }
    }
}

/// Camera and orbit rig configuration (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfigData {
    #[serde(with = "vec3_serde")]
    pub position: Vec3,

    #[serde(with = "vec3_serde")]
    pub target: Vec3,

    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfigData {
    fn default() -> Self {
        Self {
            position: Vec3::new(100.0, 50.0, 100.0),
            target: Vec3::ZERO,
            fov: 50.0,
            near: 1.0,
            far: 5000.0,
            damping_factor: 0.2,
            min_distance: 150.0,
            max_distance: 500.0,
            min_polar_angle: 0.0,
            max_polar_angle: FRAC_PI_2,
            auto_rotate: true,
            auto_rotate_speed: 2.0,
        }
    }
}

/// Custom serialization for Vec3
mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S>(vec: &Vec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Vec3Data {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = Vec3Data::deserialize(deserializer)?;
        Ok(Vec3::new(data.x, data.y, data.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TimelineConfig::default();
        assert_eq!(config.disc.radius_factor, 0.1);
        assert_eq!(config.disc.y_offset, 20.0);
        assert_eq!(config.death.color.to_hex(), "#bb0013");
        assert_eq!(config.injury.color.to_hex(), "#555555");
        assert!(config.death.animation.is_some());
        assert!(config.injury.animation.is_none());
        assert_eq!(config.motion.collision_policy, CollisionPolicy::DiscBoundary);
    }

    #[test]
    fn test_save_load() {
        let mut config = TimelineConfig::default();
        config.seed = Some(7);
        config.motion.collision_policy = CollisionPolicy::EntityProximity;
        let path = "test_timeline_config.json";

        config.save(path).unwrap();
        let loaded = TimelineConfig::load(path).unwrap();

        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.motion.collision_policy, CollisionPolicy::EntityProximity);
        assert_eq!(loaded.camera.position, config.camera.position);
        assert_eq!(loaded.injury, config.injury);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "disc": { "radius_factor": 0.5 }, "reference_time_ms": 1000 }"#;
        let config: TimelineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.disc.radius_factor, 0.5);
        assert_eq!(config.disc.base_opacity, 0.9);
        assert_eq!(config.reference_time_ms, Some(1000));
        assert_eq!(config.injury, KindStyle::injury());
        assert_eq!(config.labels.spread_threshold, 145.0);
    }
}
