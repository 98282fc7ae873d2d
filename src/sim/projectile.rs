//! Projectile flight and collision queries
//!
//! Constant-velocity motion, no gravity. A projectile's size, frame count
//! and sprite set are fixed at spawn by the owning class; after that the
//! only mutation is position, the cosmetic frame cycle, and deactivation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::player::PlayerClass;
use crate::consts::{PLAY_HEIGHT, PLAY_WIDTH};
use crate::tuning::ProjectileSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub class: PlayerClass,
    pub frame: u32,
    frame_count: u32,
    frame_delay: u32,
    counter: u32,
    sprite_dir: String,
    pub active: bool,
}

impl Projectile {
    /// Spawn at a center point flying along `angle`
    pub fn spawn(id: u32, class: PlayerClass, origin: Vec2, angle: f32, spec: &ProjectileSpec) -> Self {
        Self {
            id,
            pos: origin - spec.size * 0.5,
            vel: spec.speed * Vec2::new(angle.cos(), angle.sin()),
            size: spec.size,
            class,
            frame: 0,
            frame_count: spec.frame_count.max(1),
            frame_delay: spec.frame_delay.max(1),
            counter: 0,
            sprite_dir: spec.sprite_dir.clone(),
            active: true,
        }
    }

    /// Advance one tick; deactivates once outside the play rectangle (with a
    /// one-sprite margin so it fully leaves the screen first).
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel * dt;

        self.counter += 1;
        if self.counter >= self.frame_delay {
            self.counter = 0;
            self.frame = (self.frame + 1) % self.frame_count;
        }

        let out = self.pos.x < -self.size.x
            || self.pos.x > PLAY_WIDTH + self.size.x
            || self.pos.y < -self.size.y
            || self.pos.y > PLAY_HEIGHT + self.size.y;
        if out {
            self.active = false;
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_top_left(self.pos, self.size)
    }

    /// AABB test against a target's effective hitbox
    pub fn hits(&self, target: &Aabb) -> bool {
        self.active && self.hitbox().intersects(target)
    }

    /// Sprite path for the current cosmetic frame (frames are 1-based files)
    pub fn sprite_path(&self) -> String {
        format!("{}/{}.png", self.sprite_dir, self.frame + 1)
    }

    /// True when the projectile flies leftward (the renderer mirrors it)
    pub fn mirrored(&self) -> bool {
        self.vel.x < 0.0
    }
}
