//! Sound-event routing
//!
//! The core emits [`GameEvent`]s; this module maps them to sound-effect ids
//! and hands them to whatever sink the shell provides. Fire-and-forget: a
//! missing or failing sink never affects the simulation.

use crate::sim::state::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player melee swing
    Swing,
    /// Player ranged shot
    Shot,
    /// Player jump
    Jump,
    /// Skill cast
    Skill,
    /// Goblin swing starting
    GoblinAttack,
    /// Goblin took a hit
    GoblinHit,
    /// Goblin death cry (fires exactly once per goblin)
    GoblinDeath,
    /// Player took a hit
    PlayerHurt,
    /// Player died
    GameOver,
    /// Wave spawned
    WaveSpawn,
    /// Wave cleared
    WaveClear,
}

/// Playback sink supplied by the shell
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that drops every request (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Sound for a game event, if it has one
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::PlayerSwing => Some(SoundEffect::Swing),
        GameEvent::PlayerShot => Some(SoundEffect::Shot),
        GameEvent::PlayerJump => Some(SoundEffect::Jump),
        GameEvent::SkillCast => Some(SoundEffect::Skill),
        GameEvent::GoblinSwing => Some(SoundEffect::GoblinAttack),
        GameEvent::GoblinHit => Some(SoundEffect::GoblinHit),
        GameEvent::GoblinDied => Some(SoundEffect::GoblinDeath),
        GameEvent::PlayerHurt => Some(SoundEffect::PlayerHurt),
        GameEvent::PlayerDied => Some(SoundEffect::GameOver),
        GameEvent::WaveSpawned(_) => Some(SoundEffect::WaveSpawn),
        GameEvent::WaveCleared(_) => Some(SoundEffect::WaveClear),
        GameEvent::AllWavesCleared => None,
    }
}

/// Route a tick's drained events into the sink
pub fn route_events(events: &[GameEvent], sink: &mut impl AudioSink) {
    for event in events {
        if let Some(effect) = sound_for(event) {
            sink.play(effect);
        }
    }
}
