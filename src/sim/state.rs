//! Game state and core simulation types
//!
//! Everything the resolver mutates lives here: the player, the live goblin
//! and projectile collections, wave bookkeeping, and the per-tick event
//! queue the embedding shell drains for sounds and notifications.

use serde::{Deserialize, Serialize};

use super::animation::AnimationBook;
use super::goblin::Goblin;
use super::player::{Player, PlayerClass};
use super::projectile::Projectile;
use crate::tuning::{Tuning, default_goblin_descriptor, default_player_descriptor};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen
    Paused,
    /// Player died; the session is over
    GameOver,
}

/// Horizontal facing for movement and sprite mirroring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing toward a horizontal delta; zero keeps facing right
    #[inline]
    pub fn toward(dx: f32) -> Facing {
        if dx < 0.0 { Facing::Left } else { Facing::Right }
    }

    #[inline]
    pub fn flipped(&self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Sprites are authored right-facing; drawing mirrors when facing left
    #[inline]
    pub fn mirrored(&self) -> bool {
        matches!(self, Facing::Left)
    }
}

/// Combat and lifecycle events emitted during a tick, drained by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerSwing,
    PlayerShot,
    PlayerJump,
    SkillCast,
    GoblinSwing,
    GoblinHit,
    GoblinDied,
    PlayerHurt,
    PlayerDied,
    WaveSpawned(u32),
    WaveCleared(u32),
    /// The final wave was cleared; nothing more will spawn
    AllWavesCleared,
}

/// Wave progression bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave number (0-based)
    pub index: u32,
    /// A spawned wave is still being fought. Guards against double spawns.
    pub in_progress: bool,
    /// Ticks until the next wave spawns, counting after a clear
    pub respawn_ticks: u32,
    /// All waves fought and cleared
    pub all_cleared: bool,
}

/// Snapshot answer for `GameState::wave_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveStatus {
    pub current: u32,
    pub max_waves: u32,
    pub goblins_left: usize,
    /// The current wave has been cleared (none in progress)
    pub cleared: bool,
    pub all_cleared: bool,
}

/// Animation descriptors for every animated entity kind
#[derive(Debug, Clone)]
pub struct Books {
    pub player: AnimationBook,
    pub goblin: AnimationBook,
}

impl Books {
    /// Built-in descriptors for a class; a shell can replace these with
    /// `AnimationBook::from_json` output loaded from asset files.
    pub fn for_class(class: PlayerClass) -> Self {
        Self {
            player: parse_or_empty(&default_player_descriptor(class)),
            goblin: parse_or_empty(&default_goblin_descriptor()),
        }
    }
}

impl Default for Books {
    fn default() -> Self {
        Self::for_class(PlayerClass::Paladin)
    }
}

fn parse_or_empty(json: &str) -> AnimationBook {
    AnimationBook::from_json(json).unwrap_or_else(|e| {
        log::warn!("animation descriptor rejected: {e}");
        AnimationBook::default()
    })
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducible wave placement
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Live goblins (only the resolver mutates this collection)
    pub goblins: Vec<Goblin>,
    /// Active projectiles
    pub projectiles: Vec<Projectile>,
    pub wave: WaveState,
    pub tuning: Tuning,
    /// Animation descriptors; rebuilt from the built-ins on deserialize
    #[serde(skip)]
    pub books: Books,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// New session with the default class (paladin)
    pub fn new(seed: u64) -> Self {
        Self::with_class(seed, PlayerClass::Paladin)
    }

    pub fn with_class(seed: u64, class: PlayerClass) -> Self {
        let tuning = Tuning::for_class(class);
        let mut state = Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::new(class, &tuning.class),
            goblins: Vec::new(),
            projectiles: Vec::new(),
            wave: WaveState::default(),
            tuning,
            books: Books::for_class(class),
            events: Vec::new(),
            next_id: 1,
        };
        super::tick::spawn_wave(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the accumulated events to the shell, clearing the queue
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player_health(&self) -> i32 {
        self.player.health
    }

    pub fn wave_status(&self) -> WaveStatus {
        WaveStatus {
            current: self.wave.index,
            max_waves: self.tuning.wave.max_waves,
            goblins_left: self.goblins.len(),
            cleared: !self.wave.in_progress,
            all_cleared: self.wave.all_cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_spawns_first_wave() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.wave.in_progress);
        assert!(!state.goblins.is_empty());
        assert_eq!(state.wave.index, 0);
        assert!(state.events.contains(&GameEvent::WaveSpawned(0)));
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(7);
        assert!(!state.drain_events().is_empty());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_facing_helpers() {
        assert_eq!(Facing::toward(-3.0), Facing::Left);
        assert_eq!(Facing::toward(3.0), Facing::Right);
        assert_eq!(Facing::toward(0.0), Facing::Right);
        assert!(Facing::Left.mirrored());
        assert_eq!(Facing::Left.flipped(), Facing::Right);
    }
}
