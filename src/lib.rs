//! Goblin Tide - a side-view wave-combat action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (animation, AI, combat, projectiles)
//! - `tuning`: Data-driven game balance
//! - `render`: Sprite/draw-surface boundary consumed by the embedding shell
//! - `audio`: Sound-event routing boundary

pub mod audio;
pub mod render;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play area dimensions
    pub const PLAY_WIDTH: f32 = 1280.0;
    pub const PLAY_HEIGHT: f32 = 720.0;
    /// Ground reference line (screen y grows downward)
    pub const GROUND_Y: f32 = 560.0;

    /// Jump physics (pixels/s, pixels/s²)
    pub const JUMP_SPEED: f32 = 900.0;
    pub const GRAVITY: f32 = 2400.0;
    /// Fall speed clamp
    pub const TERMINAL_VELOCITY: f32 = 1400.0;

    /// Damage guard windows (ticks). Each outlasts one full swing animation
    /// of the slowest class.
    pub const SWING_LOCKOUT_TICKS: u32 = 48;
    pub const SKILL_LOCKOUT_TICKS: u32 = 90;
    pub const HURT_LOCKOUT_TICKS: u32 = 45;
}

/// Center point of a box given its top-left corner and size
#[inline]
pub fn center_of(pos: Vec2, size: Vec2) -> Vec2 {
    pos + size * 0.5
}

/// Horizontal sign (-1, 0, or 1) from `from` toward `to`
#[inline]
pub fn sign_toward(from: f32, to: f32) -> f32 {
    (to - from).signum()
}
