// Centralized configuration for the replay viewer

use serde::{Deserialize, Serialize};
use std::path::Path;

// ====================
// Boundary-crossing rule
// ====================
/// Displacement beyond which a particle is assumed to have wrapped around the
/// periodic domain instead of actually travelling that far. Tunable, not
/// derived from the domain size.
pub const WRAP_DISTANCE: f32 = 50.0;

// ====================
// Frame pacing
// ====================
/// Minimum delay between successive frames, enforced inside the streaming
/// thread's unit of work so it composes with pause/resume.
pub const FRAME_DELAY_MS: u64 = 20;

// ====================
// Particle plot axes
// ====================
pub const DOMAIN_AXIS_MIN: f64 = 0.0;
pub const DOMAIN_AXIS_MAX: f64 = 100.0;

// ====================
// Speed plot axes
// ====================
/// Fraction of the visible axis range a sample may reach before the range grows.
pub const AXIS_HEADROOM: f64 = 0.75;
/// Multiplicative growth applied when a sample exceeds the headroom. Kept
/// well above 1 so rescaling stays infrequent.
pub const AXIS_GROWTH: f64 = 2.0;
pub const INITIAL_TIME_AXIS_MAX: f64 = 100.0;
pub const INITIAL_SPEED_AXIS_MAX: f64 = 1.0;

// ====================
// Colors (RGBA)
// ====================
pub const SEGMENT_COLOR: [u8; 4] = [64, 160, 255, 255];
/// Wrap-classified points are not real motion, so they get a fixed neutral
/// color even when direction coloring is on.
pub const WRAP_POINT_COLOR: [u8; 4] = [160, 160, 160, 255];
pub const DIRECTION_SATURATION: f32 = 0.9;
pub const DIRECTION_VALUE: f32 = 1.0;

// ====================
// Window
// ====================
pub const WINDOW_WIDTH: u32 = 1100;
pub const WINDOW_HEIGHT: u32 = 720;

/// Runtime-tunable settings, loaded from `replay.toml` when present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Boundary-crossing threshold in source units.
    #[serde(default = "default_wrap_distance")]
    pub wrap_distance: f32,
    /// Minimum inter-frame delay in milliseconds.
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u64,
    /// Map segment direction to hue instead of using a single color.
    #[serde(default)]
    pub color_by_direction: bool,
}

fn default_wrap_distance() -> f32 {
    WRAP_DISTANCE
}

fn default_frame_delay_ms() -> u64 {
    FRAME_DELAY_MS
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            wrap_distance: WRAP_DISTANCE,
            frame_delay_ms: FRAME_DELAY_MS,
            color_by_direction: false,
        }
    }
}

impl ReplayConfig {
    pub fn wrap_distance_sq(&self) -> f32 {
        self.wrap_distance * self.wrap_distance
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: ReplayConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_file("replay.toml")
    }
}

use once_cell::sync::Lazy;
use parking_lot::Mutex;

pub static REPLAY_CONFIG: Lazy<Mutex<ReplayConfig>> =
    Lazy::new(|| Mutex::new(ReplayConfig::default()));
