//! Player controller: movement, jump physics, attack dispatch, skill
//!
//! The controller is uniform across the playable classes; everything that
//! varies (dimensions, frame delay, socket tables, projectile tuning) lives
//! in the per-class [`ClassConfig`](crate::tuning::ClassConfig) record.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationBook, Animator};
use super::state::Facing;
use super::timers::{Cooldown, Lockout};
use crate::consts::*;
use crate::tuning::ClassConfig;
use crate::{center_of, sim::aabb::Aabb};

/// Playable character classes. Attack behavior is uniform; only the
/// configuration record differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerClass {
    Paladin,
    Mage,
    Rogue,
}

impl PlayerClass {
    /// Sprite directory name for this class
    pub fn asset_dir(&self) -> &'static str {
        match self {
            PlayerClass::Paladin => "paladin",
            PlayerClass::Mage => "mage",
            PlayerClass::Rogue => "rogue",
        }
    }
}

/// Logical player states driving clip selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Ready,
    Run,
    Melee,
    Shoot,
    Skill,
}

/// Aim sectors for ranged attacks, classified from the angle between the
/// player center and the target point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AimSector {
    Forward,
    Up45,
    Up90,
    Down45,
    Down90,
    /// Target behind the player: mirrors Forward and flips facing
    Back,
}

impl AimSector {
    /// Classify a target point relative to the player center and facing.
    /// Boundaries at 22.5° and 67.5° of elevation; beyond 112.5° the target
    /// is behind the player.
    pub fn classify(center: Vec2, target: Vec2, facing: Facing) -> AimSector {
        let dx = (target.x - center.x) * facing.sign();
        // Screen y grows downward; positive elevation means above the player
        let dy = center.y - target.y;
        let deg = dy.atan2(dx).to_degrees();
        match deg {
            d if d.abs() <= 22.5 => AimSector::Forward,
            d if d.abs() >= 112.5 => AimSector::Back,
            d if d > 67.5 => AimSector::Up90,
            d if d > 0.0 => AimSector::Up45,
            d if d < -67.5 => AimSector::Down90,
            _ => AimSector::Down45,
        }
    }

    /// Flight angle in radians for a projectile fired into this sector
    pub fn angle(&self, facing: Facing) -> f32 {
        use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
        let base = match self {
            AimSector::Forward | AimSector::Back => 0.0,
            AimSector::Up45 => -FRAC_PI_4,
            AimSector::Up90 => -FRAC_PI_2,
            AimSector::Down45 => FRAC_PI_4,
            AimSector::Down90 => FRAC_PI_2,
        };
        match facing {
            Facing::Right => base,
            Facing::Left => PI - base,
        }
    }

    /// Clip name suffix shared with the animation descriptor
    pub fn clip_suffix(&self) -> &'static str {
        match self {
            AimSector::Forward | AimSector::Back => "forward",
            AimSector::Up45 => "up45",
            AimSector::Up90 => "up90",
            AimSector::Down45 => "down45",
            AimSector::Down90 => "down90",
        }
    }
}

/// Request to create a projectile, emitted by a successful ranged attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    /// Spawn center (the class socket position)
    pub origin: Vec2,
    pub angle: f32,
    pub class: PlayerClass,
}

/// What a dispatched attack turned into
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackKind {
    Melee,
    Ranged(ProjectileSpawn),
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub class: PlayerClass,
    /// Top-left corner of the sprite box
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub state: PlayerState,
    pub animator: Animator,
    pub health: i32,
    /// Last melee combo step used (cycles 1 -> 2 -> 3)
    pub combo_step: u8,
    pub aim: AimSector,
    pub attacking: bool,
    /// Discriminates the current swing; a ranged swing deals no melee damage
    pub ranged: bool,
    pub using_skill: bool,
    pub attack_cooldown: Cooldown,
    pub skill_cooldown: Cooldown,
    pub hurt_lockout: Lockout,
    pub vel_x: f32,
    pub vel_y: f32,
    pub airborne: bool,
    /// Walkable x interval, established once from the environment
    pub walk_bounds: Option<(f32, f32)>,
}

impl Player {
    pub fn new(class: PlayerClass, cfg: &ClassConfig) -> Self {
        let size = cfg.size;
        Self {
            class,
            pos: Vec2::new(PLAY_WIDTH * 0.25, GROUND_Y - size.y),
            size,
            facing: Facing::Right,
            state: PlayerState::Ready,
            animator: Animator::new(cfg.frame_delay),
            health: cfg.max_health,
            combo_step: 0,
            aim: AimSector::Forward,
            attacking: false,
            ranged: false,
            using_skill: false,
            attack_cooldown: Cooldown::default(),
            skill_cooldown: Cooldown::default(),
            hurt_lockout: Lockout::default(),
            vel_x: 0.0,
            vel_y: 0.0,
            airborne: false,
            walk_bounds: Some((0.0, PLAY_WIDTH - size.x)),
        }
    }

    pub fn center(&self) -> Vec2 {
        center_of(self.pos, self.size)
    }

    /// Combat hitbox, reduced from the sprite box
    pub fn hitbox(&self, cfg: &ClassConfig) -> Aabb {
        Aabb::from_top_left(self.pos, self.size).shrunk(cfg.hitbox_ratio)
    }

    /// Swing box in front of the player for melee collision
    pub fn melee_box(&self, cfg: &ClassConfig) -> Aabb {
        let center = self.center();
        let reach = cfg.melee_reach;
        let half_w = self.size.x * cfg.hitbox_ratio.x * 0.5;
        let x_near = match self.facing {
            Facing::Right => center.x + half_w,
            Facing::Left => center.x - half_w - reach,
        };
        Aabb::new(
            Vec2::new(x_near, center.y - self.size.y * 0.35),
            Vec2::new(x_near + reach, center.y + self.size.y * 0.35),
        )
    }

    /// Clip key in the player animation book for the current state
    pub fn clip_name(&self) -> &'static str {
        match self.state {
            PlayerState::Ready => "ready",
            PlayerState::Run => "run",
            PlayerState::Melee => match self.combo_step {
                1 => "melee_1",
                2 => "melee_2",
                _ => "melee_3",
            },
            PlayerState::Shoot => match self.aim.clip_suffix() {
                "up45" => "shoot_up45",
                "up90" => "shoot_up90",
                "down45" => "shoot_down45",
                "down90" => "shoot_down90",
                _ => "shoot_forward",
            },
            PlayerState::Skill => "skill",
        }
    }

    fn enter(&mut self, next: PlayerState) {
        if self.state != next {
            self.state = next;
            self.animator.reset();
        }
    }

    /// Movement and jump integration for one tick. Returns true when a jump
    /// started this tick (the shell keys a sound off it).
    pub fn update(&mut self, move_dir: f32, jump: bool, dt: f32, cfg: &ClassConfig) -> bool {
        self.attack_cooldown.tick();
        self.skill_cooldown.tick();
        self.hurt_lockout.tick();

        // Grounded swings and skill casts commit the player in place
        let committed = (self.attacking || self.using_skill) && !self.airborne;
        if committed {
            self.vel_x = 0.0;
        } else if move_dir > 0.2 {
            self.vel_x = cfg.move_speed;
            self.facing = Facing::Right;
        } else if move_dir < -0.2 {
            self.vel_x = -cfg.move_speed;
            self.facing = Facing::Left;
        } else {
            self.vel_x = 0.0;
        }

        self.pos.x += self.vel_x * dt;
        if let Some((min_x, max_x)) = self.walk_bounds {
            self.pos.x = self.pos.x.clamp(min_x, max_x);
        }

        let mut jumped = false;
        if jump && !self.airborne {
            self.airborne = true;
            self.vel_y = -JUMP_SPEED;
            jumped = true;
        }
        if self.airborne {
            self.vel_y = (self.vel_y + GRAVITY * dt).min(TERMINAL_VELOCITY);
            self.pos.y += self.vel_y * dt;
            let ground = GROUND_Y - self.size.y;
            if self.pos.y >= ground {
                self.pos.y = ground;
                self.vel_y = 0.0;
                self.airborne = false;
            }
        }

        // Baseline state follows movement when nothing is committed
        if !self.attacking && !self.using_skill {
            if self.vel_x != 0.0 {
                self.enter(PlayerState::Run);
            } else {
                self.enter(PlayerState::Ready);
            }
        }

        jumped
    }

    /// Dispatch an attack at the target point.
    ///
    /// Melee vs ranged is decided here by proximity of the target point:
    /// within `melee_decision_radius` the swing is a melee combo step,
    /// otherwise it is a ranged shot classified into an aim sector. Returns
    /// `None` when the attack could not start (cooldown, already swinging).
    pub fn begin_attack(&mut self, target: Vec2, cfg: &ClassConfig) -> Option<AttackKind> {
        if !self.attack_cooldown.ready() || self.attacking || self.using_skill {
            return None;
        }
        let center = self.center();
        self.attack_cooldown.arm(cfg.attack_cooldown_ticks);

        if center.distance(target) <= cfg.melee_decision_radius {
            // Face the target, advance the combo cycle
            if (target.x - center.x).abs() > f32::EPSILON {
                self.facing = Facing::toward(target.x - center.x);
            }
            self.combo_step = self.combo_step % 3 + 1;
            self.attacking = true;
            self.ranged = false;
            self.state = PlayerState::Melee;
            self.animator.reset();
            return Some(AttackKind::Melee);
        }

        let mut sector = AimSector::classify(center, target, self.facing);
        if sector == AimSector::Back {
            self.facing = self.facing.flipped();
            sector = AimSector::classify(center, target, self.facing);
        }
        self.aim = sector;
        self.attacking = true;
        self.ranged = true;
        self.state = PlayerState::Shoot;
        self.animator.reset();

        let mut ratio = cfg.sockets.offset(sector);
        if self.facing == Facing::Left {
            ratio.x = 1.0 - ratio.x;
        }
        Some(AttackKind::Ranged(ProjectileSpawn {
            origin: self.pos + self.size * ratio,
            angle: sector.angle(self.facing),
            class: self.class,
        }))
    }

    /// Start the skill if its cooldown allows. Independent of the regular
    /// attack cooldown.
    pub fn begin_skill(&mut self, cfg: &ClassConfig) -> bool {
        if !self.skill_cooldown.ready() || self.attacking || self.using_skill {
            return false;
        }
        self.skill_cooldown.arm(cfg.skill.cooldown_ticks);
        self.using_skill = true;
        self.state = PlayerState::Skill;
        self.animator.reset();
        true
    }

    /// True while the skill animation sits inside its active-damage window
    pub fn skill_active(&self, book: &AnimationBook, cfg: &ClassConfig) -> bool {
        if !self.using_skill || self.state != PlayerState::Skill {
            return false;
        }
        let Some(clip) = book.clip(self.clip_name()) else {
            return false;
        };
        match self.animator.absolute_frame(clip) {
            Some(frame) => {
                let [lo, hi] = cfg.skill.active_frames;
                (lo..=hi).contains(&frame)
            }
            None => false,
        }
    }

    /// Advance the animation one tick; completed swing/skill clips clear the
    /// combat flags and drop back to a baseline state.
    pub fn update_animation(&mut self, book: &AnimationBook) {
        let Some(clip) = book.clip(self.clip_name()) else {
            // Unknown clip: fail open so the player is never stuck mid-swing
            self.exit_action();
            return;
        };
        let end_loop = matches!(
            self.state,
            PlayerState::Melee | PlayerState::Shoot | PlayerState::Skill
        );
        if self.animator.advance(clip, end_loop) && end_loop {
            self.exit_action();
        }
    }

    fn exit_action(&mut self) {
        self.attacking = false;
        self.ranged = false;
        self.using_skill = false;
        self.state = if self.vel_x != 0.0 {
            PlayerState::Run
        } else {
            PlayerState::Ready
        };
        self.animator.reset();
    }
}
