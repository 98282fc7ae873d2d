//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Tick counters instead of wall-clock timers
//! - Seeded RNG only (wave placement)
//! - No rendering, audio, or platform dependencies

pub mod aabb;
pub mod animation;
pub mod goblin;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod timers;

pub use aabb::Aabb;
pub use animation::{AnimationBook, Animator, FrameRange, Phase, StateClip};
pub use goblin::{DamageOutcome, Goblin, GoblinState};
pub use player::{AimSector, AttackKind, Player, PlayerClass, PlayerState, ProjectileSpawn};
pub use projectile::Projectile;
pub use state::{Facing, GameEvent, GamePhase, GameState, WaveStatus};
pub use tick::{TickInput, spawn_wave, tick};
pub use timers::{Cooldown, Lockout};
