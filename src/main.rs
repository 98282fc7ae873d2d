//! Goblin Tide entry point
//!
//! Headless demo driver: runs the simulation with a scripted player and
//! logs the combat events each tick produces. Useful for exercising the
//! core without a renderer attached.

use goblin_tide::audio::{AudioSink, SoundEffect, route_events};
use goblin_tide::consts::SIM_DT;
use goblin_tide::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Sink that logs effects instead of playing them
struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("sfx: {effect:?}");
    }
}

/// Scripted input: chase the nearest goblin, swing in melee range, shoot
/// otherwise, and cast the skill when surrounded.
fn scripted_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = state.player.center();

    let nearest = state
        .goblins
        .iter()
        .filter(|g| g.alive())
        .min_by(|a, b| {
            let da = a.center().distance(player);
            let db = b.center().distance(player);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
    let Some(goblin) = nearest else {
        return input;
    };

    let target = goblin.center();
    let distance = target.distance(player);
    let melee_radius = state.tuning.class.melee_decision_radius;

    let surrounded = state
        .goblins
        .iter()
        .filter(|g| g.alive() && g.center().distance(player) <= state.tuning.class.skill.range)
        .count()
        >= 2;

    if surrounded && state.player.skill_cooldown.ready() {
        input.skill = true;
    } else if distance <= melee_radius {
        input.attack = Some(target);
    } else if distance < 500.0 {
        // Close the gap on nearby goblins, shoot the far ones
        input.move_dir = (target.x - player.x).signum() * 0.8;
    } else {
        input.attack = Some(target);
    }
    input
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let mut state = GameState::new(seed);
    let mut audio = LogAudio;
    log::info!("running demo with seed {seed}");

    // Up to five minutes of simulated time
    let max_ticks = 5 * 60 * 60;
    for _ in 0..max_ticks {
        let input = scripted_input(&state);
        tick(&mut state, &input, SIM_DT);

        let events = state.drain_events();
        route_events(&events, &mut audio);
        for event in &events {
            match event {
                GameEvent::WaveCleared(n) => log::info!("wave {n} cleared"),
                GameEvent::WaveSpawned(n) => log::info!("wave {n} spawned"),
                GameEvent::PlayerDied => log::info!("player died"),
                _ => {}
            }
        }

        if state.wave.all_cleared || state.phase == GamePhase::GameOver {
            break;
        }
    }

    let status = state.wave_status();
    let outcome = if state.phase == GamePhase::GameOver {
        "defeat"
    } else if status.all_cleared {
        "victory"
    } else {
        "timeout"
    };
    println!(
        "{outcome}: wave {}/{} | health {} | {} ticks ({:.1}s simulated)",
        status.current + 1,
        status.max_waves,
        state.player_health(),
        state.time_ticks,
        state.time_ticks as f32 * SIM_DT,
    );
}
