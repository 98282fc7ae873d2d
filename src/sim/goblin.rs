//! Goblin AI state machine
//!
//! Perception-driven chase/attack loop with two pre-empting interrupts:
//! a duration-bounded hit reaction and a terminal KO with fade-out. The
//! priority order is Koed > HitReact > a committed Melee > perception.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::animation::{AnimationBook, Animator};
use super::state::Facing;
use super::timers::{Cooldown, Lockout};
use crate::center_of;
use crate::tuning::GoblinTuning;

/// Logical goblin states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoblinState {
    Ready,
    Run,
    Melee,
    HitReact,
    Koed,
}

impl GoblinState {
    /// Clip key in the goblin animation book
    pub fn clip_name(&self) -> &'static str {
        match self {
            GoblinState::Ready => "ready",
            GoblinState::Run => "run",
            GoblinState::Melee => "melee",
            GoblinState::HitReact => "hit_react",
            GoblinState::Koed => "koed",
        }
    }
}

/// What a damage application did to the goblin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health reduced, hit reaction started
    Staggered,
    /// Health hit zero: terminal KO entered this call
    Died,
    /// Target was already dead; nothing applied
    Ignored,
}

/// A wave-spawned goblin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goblin {
    pub id: u32,
    /// Top-left corner of the sprite box
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub state: GoblinState,
    pub animator: Animator,
    pub health: i32,
    pub vel_x: f32,
    pub attack_cooldown: Cooldown,
    hit_react_ticks: u32,
    ko_hold_ticks: u32,
    pub opacity: f32,
    /// One-way latch: set when health reaches zero, never cleared
    pub dead: bool,
    /// Set once the fade completes; the resolver sweeps marked goblins
    pub marked_for_removal: bool,
    /// Damage guard for the player's current melee swing
    pub hit_by_attack: Lockout,
    /// Damage guard for the player's current skill use
    pub hit_by_skill: Lockout,
}

impl Goblin {
    pub fn spawn(id: u32, x: f32, tuning: &GoblinTuning) -> Self {
        Self {
            id,
            pos: Vec2::new(x, crate::consts::GROUND_Y - tuning.size.y),
            size: tuning.size,
            facing: Facing::Left,
            state: GoblinState::Ready,
            animator: Animator::new(tuning.frame_delay),
            health: tuning.max_health,
            vel_x: 0.0,
            attack_cooldown: Cooldown::default(),
            hit_react_ticks: 0,
            ko_hold_ticks: 0,
            opacity: 1.0,
            dead: false,
            marked_for_removal: false,
            hit_by_attack: Lockout::default(),
            hit_by_skill: Lockout::default(),
        }
    }

    pub fn center(&self) -> Vec2 {
        center_of(self.pos, self.size)
    }

    pub fn alive(&self) -> bool {
        !self.dead
    }

    /// Combat hitbox, reduced from the sprite box
    pub fn hitbox(&self, tuning: &GoblinTuning) -> Aabb {
        Aabb::from_top_left(self.pos, self.size).shrunk(tuning.hitbox_ratio)
    }

    fn enter(&mut self, next: GoblinState) {
        if self.state != next {
            self.state = next;
            self.animator.reset();
        }
    }

    /// One tick of the state machine. `player_center` drives perception.
    /// Returns true when a melee attack started this tick.
    pub fn update(
        &mut self,
        player_center: Vec2,
        dt: f32,
        book: &AnimationBook,
        tuning: &GoblinTuning,
    ) -> bool {
        self.attack_cooldown.tick();
        self.hit_by_attack.tick();
        self.hit_by_skill.tick();

        let mut started_attack = false;
        match self.state {
            GoblinState::Koed => {
                self.vel_x = 0.0;
                if let Some(clip) = book.clip(self.state.clip_name()) {
                    self.animator.advance(clip, true);
                }
                if self.ko_hold_ticks > 0 {
                    self.ko_hold_ticks -= 1;
                } else {
                    self.opacity -= tuning.fade_rate;
                    if self.opacity <= 0.0 {
                        self.opacity = 0.0;
                        self.marked_for_removal = true;
                    }
                }
            }
            GoblinState::HitReact => {
                self.vel_x = 0.0;
                if self.hit_react_ticks > 0 {
                    self.hit_react_ticks -= 1;
                    if let Some(clip) = book.clip(self.state.clip_name()) {
                        self.animator.advance(clip, false);
                    }
                } else {
                    self.enter(GoblinState::Ready);
                }
            }
            GoblinState::Melee => {
                // Committed: perception cannot interrupt a started swing
                self.vel_x = 0.0;
                let done = match book.clip(self.state.clip_name()) {
                    Some(clip) => self.animator.advance(clip, true),
                    None => true,
                };
                if done {
                    self.attack_cooldown.arm(tuning.attack_cooldown_ticks);
                    self.enter(GoblinState::Ready);
                }
            }
            GoblinState::Ready | GoblinState::Run => {
                let delta = player_center - self.center();
                let distance = delta.length();

                if distance <= tuning.attack_range && self.attack_cooldown.ready() {
                    self.enter(GoblinState::Melee);
                    self.vel_x = 0.0;
                    self.facing = Facing::toward(delta.x);
                    started_attack = true;
                } else if distance > tuning.attack_range && distance <= tuning.detection_range {
                    self.enter(GoblinState::Run);
                    self.vel_x = tuning.move_speed * delta.x.signum();
                    self.facing = Facing::toward(delta.x);
                } else {
                    // Out of detection range, or in range but cooling down
                    self.enter(GoblinState::Ready);
                    self.vel_x = 0.0;
                }

                self.pos.x += self.vel_x * dt;
                if let Some(clip) = book.clip(self.state.clip_name()) {
                    let single_pass = self.state == GoblinState::Melee;
                    self.animator.advance(clip, single_pass);
                }
            }
        }
        started_attack
    }

    /// Apply damage. Unconditionally enters the hit reaction (phase reset)
    /// unless health reaches zero, which latches the terminal KO.
    pub fn take_damage(&mut self, amount: i32, tuning: &GoblinTuning) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.dead = true;
            self.state = GoblinState::Koed;
            self.animator.reset();
            self.ko_hold_ticks = tuning.ko_hold_ticks;
            DamageOutcome::Died
        } else {
            // Re-entering resets the reaction phase even mid-reaction
            self.state = GoblinState::HitReact;
            self.animator.reset();
            self.hit_react_ticks = tuning.hit_react_ticks;
            DamageOutcome::Staggered
        }
    }

    /// True while the current melee swing sits inside its damage window
    pub fn attack_active(&self, book: &AnimationBook, tuning: &GoblinTuning) -> bool {
        if self.state != GoblinState::Melee {
            return false;
        }
        let Some(clip) = book.clip(self.state.clip_name()) else {
            return false;
        };
        match self.animator.absolute_frame(clip) {
            Some(frame) => {
                let [lo, hi] = tuning.attack_active_frames;
                (lo..=hi).contains(&frame)
            }
            None => false,
        }
    }
}
