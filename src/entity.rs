use glam::{vec3, Vec3};

use crate::{camera::Camera, emitter::DriftConfig, particle::SmokeConfig};

/// Title and description shown for a hotspot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HotspotInfo {
    pub name: String,
    pub description: String,
}

impl HotspotInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotspotConfig {
    pub position: Vec3,
    pub info: HotspotInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub smoke: SmokeConfig,
    pub drift: DriftConfig,
    pub hotspots: Vec<HotspotConfig>,
    /// Label that rides along with the drift emitter, if any.
    pub drift_hotspot: Option<HotspotInfo>,
    /// RNG seed for emission. Derived from the clock when `None`.
    pub seed: Option<u64>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            camera_position: vec3(0., 2., 8.),
            camera_target: Vec3::ZERO,
            smoke: SmokeConfig::default(),
            drift: DriftConfig::default(),
            hotspots: vec![
                HotspotConfig {
                    position: vec3(3., 1., -2.),
                    info: HotspotInfo::new(
                        "Jellyfish",
                        "A delicate jellyfish floating gracefully, representing the elegance of deep sea creatures.",
                    ),
                },
                HotspotConfig {
                    position: vec3(-3., 0.5, -2.),
                    info: HotspotInfo::new(
                        "Koi Fish",
                        "Koi fish are ornamental varieties of the common carp, celebrated for their vivid colors and symbolism in Asian culture.",
                    ),
                },
                HotspotConfig {
                    position: vec3(0., 1., -5.),
                    info: HotspotInfo::new(
                        "Goldfish",
                        "Goldfish are one of the most common aquarium fish, admired for their beauty and peaceful presence.",
                    ),
                },
            ],
            drift_hotspot: Some(HotspotInfo::new(
                "Drifter",
                "Circles the hall, leaving a trail of smoke behind it.",
            )),
            seed: None,
        }
    }
}
