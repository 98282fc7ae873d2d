//! Rendering boundary
//!
//! The core never draws. The embedding shell supplies sprite resolution and
//! a draw surface; `render` walks the visible entities and issues draw calls
//! for whatever sprites resolve. A missing sprite skips that entity for the
//! frame - never an error.

use serde::{Deserialize, Serialize};

use crate::sim::state::GameState;

/// Resolves asset paths to whatever handle the shell's renderer uses
pub trait SpriteSource {
    type Handle;

    /// `None` when the asset is not (yet) available
    fn get_sprite(&self, path: &str) -> Option<Self::Handle>;
}

/// Draw calls consumed by the shell's renderer
pub trait DrawSurface<H> {
    /// Draw a sprite into the play area. `mirrored` flips horizontally;
    /// `opacity` carries the KO fade (1.0 = opaque).
    fn draw(&mut self, sprite: &H, x: f32, y: f32, w: f32, h: f32, mirrored: bool, opacity: f32);

    /// Debug overlay rectangle outline. Default is a no-op so shells without
    /// debug drawing ignore it.
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let _ = (x, y, w, h);
    }
}

/// Debug visualization toggles, threaded explicitly into render calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugOptions {
    /// Outline effective hitboxes
    pub show_hitboxes: bool,
    /// Outline the melee swing box while a swing is active
    pub show_swing_box: bool,
}

/// Render one frame of the simulation
pub fn render<S, D>(state: &GameState, sprites: &S, surface: &mut D, debug: &DebugOptions)
where
    S: SpriteSource,
    D: DrawSurface<S::Handle>,
{
    let player = &state.player;
    if let Some(clip) = state.books.player.clip(player.clip_name()) {
        if let Some(path) = player.animator.sprite_path(clip) {
            if let Some(sprite) = sprites.get_sprite(&path) {
                surface.draw(
                    &sprite,
                    player.pos.x,
                    player.pos.y,
                    player.size.x,
                    player.size.y,
                    player.facing.mirrored(),
                    1.0,
                );
            }
        }
    }

    for goblin in &state.goblins {
        let Some(clip) = state.books.goblin.clip(goblin.state.clip_name()) else {
            continue;
        };
        let Some(path) = goblin.animator.sprite_path(clip) else {
            continue;
        };
        if let Some(sprite) = sprites.get_sprite(&path) {
            surface.draw(
                &sprite,
                goblin.pos.x,
                goblin.pos.y,
                goblin.size.x,
                goblin.size.y,
                goblin.facing.mirrored(),
                goblin.opacity,
            );
        }
    }

    for projectile in &state.projectiles {
        if let Some(sprite) = sprites.get_sprite(&projectile.sprite_path()) {
            surface.draw(
                &sprite,
                projectile.pos.x,
                projectile.pos.y,
                projectile.size.x,
                projectile.size.y,
                projectile.mirrored(),
                1.0,
            );
        }
    }

    if debug.show_hitboxes {
        let hit = player.hitbox(&state.tuning.class);
        surface.stroke_rect(hit.min.x, hit.min.y, hit.size().x, hit.size().y);
        for goblin in &state.goblins {
            let hit = goblin.hitbox(&state.tuning.goblin);
            surface.stroke_rect(hit.min.x, hit.min.y, hit.size().x, hit.size().y);
        }
    }
    if debug.show_swing_box && player.attacking && !player.ranged {
        let swing = player.melee_box(&state.tuning.class);
        surface.stroke_rect(swing.min.x, swing.min.y, swing.size().x, swing.size().y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Sprite source that only knows goblin assets
    struct GoblinOnly;

    impl SpriteSource for GoblinOnly {
        type Handle = String;

        fn get_sprite(&self, path: &str) -> Option<String> {
            path.starts_with("sprites/goblin/").then(|| path.to_string())
        }
    }

    #[derive(Default)]
    struct Recorder {
        draws: Vec<(String, f32, bool)>,
        rects: usize,
    }

    impl DrawSurface<String> for Recorder {
        fn draw(&mut self, sprite: &String, _x: f32, _y: f32, _w: f32, _h: f32, mirrored: bool, opacity: f32) {
            self.draws.push((sprite.clone(), opacity, mirrored));
        }

        fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
            self.rects += 1;
        }
    }

    #[test]
    fn test_missing_sprites_skip_draws() {
        let state = GameState::new(5);
        let mut surface = Recorder::default();
        render(&state, &GoblinOnly, &mut surface, &DebugOptions::default());
        // The player sprite is absent, so only goblins were drawn
        assert_eq!(surface.draws.len(), state.goblins.len());
        let paths: HashSet<_> = surface.draws.iter().map(|(p, _, _)| p.clone()).collect();
        assert!(paths.iter().all(|p| p.starts_with("sprites/goblin/")));
    }

    #[test]
    fn test_debug_overlay_draws_hitboxes() {
        let state = GameState::new(5);
        let mut surface = Recorder::default();
        let debug = DebugOptions {
            show_hitboxes: true,
            show_swing_box: false,
        };
        render(&state, &GoblinOnly, &mut surface, &debug);
        assert_eq!(surface.rects, 1 + state.goblins.len());
    }
}
