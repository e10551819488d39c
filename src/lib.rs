//! Pachinko - drop balls through a field of bouncers into scoring slots
//!
//! Core modules:
//! - `sim`: Scene state, field layout, input handling, contact scoring
//! - `engine`: Host physics engine boundary (rapier2d adapter)
//! - `session`: Fixed timestep driver tying the scene to an engine
//! - `settings`: Data-driven configuration

pub mod engine;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions (origin bottom-left, y up)
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Slot x positions, alternating good/bad from the left
    pub const SLOT_XS: [f32; 4] = [128.0, 384.0, 640.0, 896.0];
    pub const SLOT_BASE_SIZE: Vec2 = Vec2::new(200.0, 32.0);
    /// Slot glow spin: `GLOW_SPIN_ANGLE` radians every `GLOW_SPIN_DURATION`
    pub const GLOW_SPIN_ANGLE: f32 = std::f32::consts::PI;
    pub const GLOW_SPIN_DURATION: f32 = 10.0;

    pub const BOUNCER_COUNT: u32 = 5;
    pub const BOUNCER_SPACING: f32 = 256.0;
    pub const BOUNCER_RADIUS: f32 = 48.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 22.0;
    pub const BALL_RESTITUTION: f32 = 0.4;
    pub const BALL_IMAGES: [&str; 7] = [
        "ballRed",
        "ballBlue",
        "ballCyan",
        "ballGreen",
        "ballGrey",
        "ballPurple",
        "ballYellow",
    ];

    /// Edit-mode box dimensions
    pub const BOX_MIN_WIDTH: f32 = 64.0;
    pub const BOX_MAX_WIDTH: f32 = 128.0;
    pub const BOX_HEIGHT: f32 = 16.0;
    /// Box rotation is drawn from [0, BOX_MAX_ROTATION)
    pub const BOX_MAX_ROTATION: f32 = 3.0;

    /// Scoring burst lifetime (seconds)
    pub const SCORING_EFFECT_LIFETIME: f32 = 2.0;
    pub const DEFAULT_SCORING_EFFECT: &str = "FireParticles";

    /// HUD placement
    pub const EDIT_LABEL_POS: Vec2 = Vec2::new(80.0, 700.0);
    pub const EDIT_LABEL_SIZE: Vec2 = Vec2::new(120.0, 48.0);
    pub const SCORE_LABEL_POS: Vec2 = Vec2::new(980.0, 700.0);

    /// Collision categories
    pub const CATEGORY_BALL: u32 = 0b01;
    pub const CATEGORY_STATIC: u32 = 0b10;
    pub const CATEGORY_ALL: u32 = u32::MAX;
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Corners in counter-clockwise order starting bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

/// The full play field frame
pub fn field_frame() -> Rect {
    Rect {
        min: Vec2::ZERO,
        max: Vec2::new(consts::FIELD_WIDTH, consts::FIELD_HEIGHT),
    }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
