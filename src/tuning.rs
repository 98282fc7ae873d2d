//! Data-driven game balance
//!
//! Per-class configuration is data, not behavior: dimensions, frame delays,
//! socket-offset tables and projectile specs vary per class while the
//! controller logic stays uniform. Everything here is serde-serializable so
//! an embedding shell can load overrides from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::sim::player::{AimSector, PlayerClass};

/// Projectile parameters, chosen once at spawn and immutable after
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    /// Flight speed (pixels/s)
    pub speed: f32,
    pub size: Vec2,
    /// Cosmetic frame cycle length
    pub frame_count: u32,
    /// Ticks per projectile frame
    pub frame_delay: u32,
    /// Sprite directory; frame N resolves to `"{sprite_dir}/{N}.png"`
    pub sprite_dir: String,
}

/// Per-aim-sector projectile spawn offsets, as ratios of the player sprite
/// box measured from its top-left corner (right-facing; the controller
/// mirrors horizontally for left-facing spawns).
///
/// These tables place the projectile at the visual weapon/hand location and
/// are reproduced per class to match each sprite set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocketTable {
    pub forward: [f32; 2],
    pub up45: [f32; 2],
    pub up90: [f32; 2],
    pub down45: [f32; 2],
    pub down90: [f32; 2],
}

impl SocketTable {
    /// Offset ratio for a sector. A behind-the-player aim has already been
    /// mirrored to forward by the controller before spawning.
    pub fn offset(&self, sector: AimSector) -> Vec2 {
        let [x, y] = match sector {
            AimSector::Forward | AimSector::Back => self.forward,
            AimSector::Up45 => self.up45,
            AimSector::Up90 => self.up90,
            AimSector::Down45 => self.down45,
            AimSector::Down90 => self.down90,
        };
        Vec2::new(x, y)
    }
}

/// The skill special-case: its own cooldown, and a damage window tied to an
/// absolute frame interval of the skill clip rather than the whole animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    pub cooldown_ticks: u32,
    pub damage: i32,
    /// Radius around the player center
    pub range: f32,
    /// Inclusive absolute frame interval during which damage applies
    pub active_frames: [u32; 2],
}

/// Immutable per-class configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    pub size: Vec2,
    /// Ticks per animation frame
    pub frame_delay: u32,
    pub move_speed: f32,
    pub max_health: i32,
    /// Horizontal reach of the melee swing box
    pub melee_reach: f32,
    /// A swing targets melee when the aim point is within this radius
    pub melee_decision_radius: f32,
    pub melee_damage: i32,
    pub attack_cooldown_ticks: u32,
    /// Effective hitbox as a ratio of the sprite box
    pub hitbox_ratio: Vec2,
    pub projectile: ProjectileSpec,
    pub sockets: SocketTable,
    pub skill: SkillConfig,
}

impl ClassConfig {
    pub fn for_class(class: PlayerClass) -> Self {
        match class {
            PlayerClass::Paladin => Self {
                size: Vec2::new(120.0, 160.0),
                frame_delay: 4,
                move_speed: 260.0,
                max_health: 10,
                melee_reach: 90.0,
                melee_decision_radius: 140.0,
                melee_damage: 1,
                attack_cooldown_ticks: 18,
                hitbox_ratio: Vec2::new(0.30, 0.45),
                projectile: ProjectileSpec {
                    speed: 700.0,
                    size: Vec2::new(48.0, 24.0),
                    frame_count: 4,
                    frame_delay: 4,
                    sprite_dir: "sprites/paladin/hammer".to_string(),
                },
                sockets: SocketTable {
                    forward: [0.88, 0.42],
                    up45: [0.80, 0.22],
                    up90: [0.55, 0.08],
                    down45: [0.80, 0.68],
                    down90: [0.55, 0.90],
                },
                skill: SkillConfig {
                    cooldown_ticks: 300,
                    damage: 2,
                    range: 220.0,
                    active_frames: [5, 10],
                },
            },
            PlayerClass::Mage => Self {
                size: Vec2::new(110.0, 150.0),
                frame_delay: 5,
                move_speed: 240.0,
                max_health: 8,
                melee_reach: 70.0,
                melee_decision_radius: 110.0,
                melee_damage: 1,
                attack_cooldown_ticks: 22,
                hitbox_ratio: Vec2::new(0.30, 0.45),
                projectile: ProjectileSpec {
                    speed: 820.0,
                    size: Vec2::new(40.0, 40.0),
                    frame_count: 6,
                    frame_delay: 3,
                    sprite_dir: "sprites/mage/fireball".to_string(),
                },
                sockets: SocketTable {
                    forward: [0.92, 0.38],
                    up45: [0.84, 0.18],
                    up90: [0.52, 0.05],
                    down45: [0.84, 0.64],
                    down90: [0.52, 0.92],
                },
                skill: SkillConfig {
                    cooldown_ticks: 360,
                    damage: 3,
                    range: 260.0,
                    active_frames: [5, 10],
                },
            },
            PlayerClass::Rogue => Self {
                size: Vec2::new(100.0, 140.0),
                frame_delay: 3,
                move_speed: 300.0,
                max_health: 9,
                melee_reach: 80.0,
                melee_decision_radius: 120.0,
                melee_damage: 1,
                attack_cooldown_ticks: 14,
                hitbox_ratio: Vec2::new(0.30, 0.45),
                projectile: ProjectileSpec {
                    speed: 900.0,
                    size: Vec2::new(36.0, 12.0),
                    frame_count: 2,
                    frame_delay: 4,
                    sprite_dir: "sprites/rogue/knife".to_string(),
                },
                sockets: SocketTable {
                    forward: [0.90, 0.40],
                    up45: [0.78, 0.20],
                    up90: [0.50, 0.06],
                    down45: [0.78, 0.66],
                    down90: [0.50, 0.88],
                },
                skill: SkillConfig {
                    cooldown_ticks: 240,
                    damage: 2,
                    range: 180.0,
                    active_frames: [5, 10],
                },
            },
        }
    }
}

/// Goblin combat stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoblinTuning {
    pub size: Vec2,
    pub frame_delay: u32,
    pub max_health: i32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub move_speed: f32,
    pub attack_cooldown_ticks: u32,
    pub attack_damage: i32,
    /// Inclusive absolute frame interval of the melee clip that deals damage
    pub attack_active_frames: [u32; 2],
    pub hit_react_ticks: u32,
    /// KO pose hold before the fade begins
    pub ko_hold_ticks: u32,
    /// Opacity lost per tick once fading
    pub fade_rate: f32,
    pub hitbox_ratio: Vec2,
}

impl Default for GoblinTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(100.0, 130.0),
            frame_delay: 5,
            max_health: 3,
            detection_range: 200.0,
            attack_range: 100.0,
            move_speed: 140.0,
            attack_cooldown_ticks: 90,
            attack_damage: 1,
            attack_active_frames: [4, 8],
            hit_react_ticks: 24,
            ko_hold_ticks: 60,
            fade_rate: 0.02,
            hitbox_ratio: Vec2::new(0.30, 0.45),
        }
    }
}

/// Wave progression parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveTuning {
    pub max_waves: u32,
    /// Goblins in the first wave
    pub base_count: u32,
    /// Extra goblins per subsequent wave
    pub per_wave: u32,
    pub max_count: u32,
    /// Delay between a cleared wave and the next spawn
    pub respawn_delay_ticks: u32,
    /// Horizontal jitter applied to flank spawn positions
    pub spawn_jitter: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            max_waves: 5,
            base_count: 2,
            per_wave: 1,
            max_count: 6,
            respawn_delay_ticks: 120,
            spawn_jitter: 48.0,
        }
    }
}

/// Complete balance record for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub class: ClassConfig,
    pub goblin: GoblinTuning,
    pub wave: WaveTuning,
}

impl Tuning {
    pub fn for_class(class: PlayerClass) -> Self {
        Self {
            class: ClassConfig::for_class(class),
            goblin: GoblinTuning::default(),
            wave: WaveTuning::default(),
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::for_class(PlayerClass::Paladin)
    }
}

fn phase_paths(dir: &str, state: &str, lo: u32, hi: u32) -> serde_json::Value {
    json!([
        format!("sprites/{dir}/{state}/{lo}.png"),
        format!("sprites/{dir}/{state}/{hi}.png"),
    ])
}

/// Built-in animation descriptor for a player class, in the same JSON shape
/// an external descriptor file uses. Frame counts line up with the skill
/// active-frame window in [`ClassConfig`].
pub fn default_player_descriptor(class: PlayerClass) -> String {
    let dir = class.asset_dir();
    let mut states = serde_json::Map::new();
    states.insert("ready".into(), json!({"loop": phase_paths(dir, "ready", 1, 8)}));
    states.insert("run".into(), json!({"loop": phase_paths(dir, "run", 1, 8)}));
    for step in 1..=3u32 {
        let state = format!("melee_{step}");
        states.insert(
            state.clone(),
            json!({
                "start": phase_paths(dir, &state, 1, 2),
                "loop": phase_paths(dir, &state, 3, 5),
                "end": phase_paths(dir, &state, 6, 8),
            }),
        );
    }
    for sector in ["forward", "up45", "up90", "down45", "down90"] {
        let state = format!("shoot_{sector}");
        states.insert(
            state.clone(),
            json!({
                "start": phase_paths(dir, &state, 1, 2),
                "loop": phase_paths(dir, &state, 3, 5),
                "end": phase_paths(dir, &state, 6, 8),
            }),
        );
    }
    states.insert(
        "skill".into(),
        json!({
            "start": phase_paths(dir, "skill", 1, 4),
            "loop": phase_paths(dir, "skill", 5, 10),
            "end": phase_paths(dir, "skill", 11, 14),
        }),
    );
    serde_json::Value::Object(states).to_string()
}

/// Built-in goblin animation descriptor. The melee frame numbering lines up
/// with `GoblinTuning::attack_active_frames`.
pub fn default_goblin_descriptor() -> String {
    json!({
        "ready": {"loop": phase_paths("goblin", "ready", 1, 6)},
        "run": {"loop": phase_paths("goblin", "run", 1, 8)},
        "melee": {
            "start": phase_paths("goblin", "melee", 1, 3),
            "loop": phase_paths("goblin", "melee", 4, 8),
            "end": phase_paths("goblin", "melee", 9, 12),
        },
        "hit_react": {"loop": phase_paths("goblin", "hit_react", 1, 4)},
        "koed": {"start": phase_paths("goblin", "koed", 1, 6)},
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::AnimationBook;

    #[test]
    fn test_default_descriptors_parse() {
        for class in [PlayerClass::Paladin, PlayerClass::Mage, PlayerClass::Rogue] {
            let book = AnimationBook::from_json(&default_player_descriptor(class)).unwrap();
            for state in [
                "ready", "run", "melee_1", "melee_2", "melee_3", "shoot_forward", "shoot_up45",
                "shoot_up90", "shoot_down45", "shoot_down90", "skill",
            ] {
                assert!(book.clip(state).is_some(), "missing clip {state}");
            }
        }
        let goblin = AnimationBook::from_json(&default_goblin_descriptor()).unwrap();
        for state in ["ready", "run", "melee", "hit_react", "koed"] {
            assert!(goblin.clip(state).is_some(), "missing clip {state}");
        }
    }

    #[test]
    fn test_skill_window_inside_skill_clip() {
        let cfg = ClassConfig::for_class(PlayerClass::Paladin);
        let book = AnimationBook::from_json(&default_player_descriptor(PlayerClass::Paladin)).unwrap();
        let clip = book.clip("skill").unwrap();
        let loop_phase = clip.loop_phase.as_ref().unwrap();
        let [lo, hi] = cfg.skill.active_frames;
        assert!(loop_phase.lo <= lo && hi <= loop_phase.hi);
    }

    #[test]
    fn test_goblin_attack_window_inside_melee_clip() {
        let tuning = GoblinTuning::default();
        let book = AnimationBook::from_json(&default_goblin_descriptor()).unwrap();
        let clip = book.clip("melee").unwrap();
        let loop_phase = clip.loop_phase.as_ref().unwrap();
        let [lo, hi] = tuning.attack_active_frames;
        assert!(loop_phase.lo <= lo && hi <= loop_phase.hi);
    }

    #[test]
    fn test_socket_offsets_inside_sprite_box() {
        for class in [PlayerClass::Paladin, PlayerClass::Mage, PlayerClass::Rogue] {
            let cfg = ClassConfig::for_class(class);
            for sector in [
                AimSector::Forward,
                AimSector::Up45,
                AimSector::Up90,
                AimSector::Down45,
                AimSector::Down90,
            ] {
                let offset = cfg.sockets.offset(sector);
                assert!((0.0..=1.0).contains(&offset.x));
                assert!((0.0..=1.0).contains(&offset.y));
            }
        }
    }
}
