//! Frame scheduler
//!
//! The single per-frame driver. Every tick runs the same fixed sequence:
//!
//! 1. advance the decorative environment (always, even before/while paused)
//! 2. advance and reap all reveal effects (always)
//! 3. if the run state is active: player lane interpolation, collectible
//!    motion + reaping, spawn policy, pickup detection -> one reveal per
//!    pickup
//! 4. render (3D scene pass, then the 2D overlay)
//!
//! Each step is wrapped so a panic inside it is logged and does not prevent
//! the later steps of the same tick, nor the next tick - the loop is
//! effectively unkillable from within. A crashed step degrades one frame's
//! functionality, never the game.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::app::Game;
use crate::game::collectible::TRAVEL_SPEED;

/// What the gameplay step observed this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickReport {
    /// Collectibles picked up this tick
    pub picked: u32,
    /// True when the pickup(s) pushed the high score past its old value
    pub new_high: bool,
}

/// Run one step with crash isolation. A panic is logged and converted to
/// None; the caller carries on with the rest of the tick.
pub fn isolated<T>(label: &str, step: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(step)) {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("frame step '{}' panicked, continuing", label);
            None
        }
    }
}

/// Steps 1-3: everything except rendering. Split out so the simulation is
/// testable without a window.
pub fn simulate(game: &mut Game, dt: f32) -> TickReport {
    isolated("environment", || {
        game.scene.advance(dt, game.ctx.running);
    });

    isolated("reveals", || {
        game.reveals.advance_all();
    });

    if game.ctx.running {
        isolated("gameplay", || step_gameplay(game, dt)).unwrap_or_default()
    } else {
        TickReport::default()
    }
}

/// The full per-tick sequence including the render pass.
pub fn run_frame(game: &mut Game, dt: f32) -> TickReport {
    let report = simulate(game, dt);
    isolated("render", || {
        crate::scene::draw_frame(game);
        crate::hud::draw(game);
    });
    report
}

fn step_gameplay(game: &mut Game, dt: f32) -> TickReport {
    game.ctx.elapsed += dt as f64;
    let elapsed = game.ctx.elapsed as f32;

    // Player interpolation toward the target lane comes first so pickup
    // detection sees this frame's position
    game.player.update(dt, game.ctx.current_lane);

    game.field.advance(TRAVEL_SPEED * dt, elapsed);
    game.field.reap_out_of_range();

    let last_shown = game.reveals.last_shown().map(str::to_string);
    if game
        .field
        .maybe_spawn(
            &game.facts,
            last_shown.as_deref(),
            game.ctx.elapsed,
            game.ctx.last_spawn_time,
        )
        .is_some()
    {
        game.ctx.last_spawn_time = game.ctx.elapsed;
    }

    let picked = game.field.check_pickup(game.player.position());
    let mut report = TickReport {
        picked: picked.len() as u32,
        new_high: false,
    };
    for collectible in &picked {
        game.ctx.collected += 1;
        if game.ctx.collected > game.ctx.high_score {
            game.ctx.high_score = game.ctx.collected;
            report.new_high = true;
        }
        // Exactly one reveal per pickup
        game.reveals.present(&collectible.fact, collectible.position);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Game;
    use crate::game::collectible::{FLOAT_BASE_Y, LANE_X, SPAWN_DISTANCE};
    use crate::storage::SaveData;
    use macroquad::math::vec3;

    const DT: f32 = 1.0 / 60.0;

    fn game_with_facts() -> Game {
        // Game::new preloads the resume fallback, which is all these need
        Game::new(SaveData::default(), None, 7)
    }

    #[test]
    fn test_reveals_advance_even_when_paused() {
        let mut game = game_with_facts();
        game.field.spawn(&game.facts, None);
        let c = &game.field.live()[0];
        game.reveals.present(&c.fact.clone(), c.position);
        game.ctx.running = false;

        let before = game.reveals.effects()[0].position.y;
        simulate(&mut game, DT);
        let after = game.reveals.effects()[0].position.y;
        assert!(after > before);
    }

    #[test]
    fn test_paused_game_freezes_gameplay() {
        let mut game = game_with_facts();
        game.field.spawn(&game.facts, None);
        game.ctx.running = false;

        let z = game.field.live()[0].position.z;
        for _ in 0..30 {
            simulate(&mut game, DT);
        }
        assert_eq!(game.field.live()[0].position.z, z);
        assert_eq!(game.ctx.elapsed, 0.0);
    }

    #[test]
    fn test_pickup_creates_exactly_one_reveal_and_counts() {
        let mut game = game_with_facts();
        game.field.spawn(&game.facts, None);

        // Park the collectible on top of the player
        let lane = game.field.live()[0].lane;
        game.ctx.current_lane = lane;
        game.player.x = LANE_X[lane];
        {
            let live = game.field.live();
            assert_eq!(live[0].position.z, SPAWN_DISTANCE);
        }
        game.field.advance(-SPAWN_DISTANCE, 0.0); // bring it to z = 0

        let report = simulate(&mut game, DT);
        assert_eq!(report.picked, 1);
        assert!(report.new_high);
        assert_eq!(game.ctx.collected, 1);
        assert_eq!(game.ctx.high_score, 1);
        assert_eq!(game.reveals.effects().len(), 1);

        // The collectible is gone; the next tick picks up nothing
        let report = simulate(&mut game, DT);
        assert_eq!(report.picked, 0);
    }

    #[test]
    fn test_high_score_only_advances_past_old_best() {
        let mut game = Game::new(
            SaveData {
                high_score: 5,
                music_enabled: false,
            },
            None,
            7,
        );
        game.field.spawn(&game.facts, None);
        game.field.advance(-SPAWN_DISTANCE, 0.0);
        let lane = game.field.live()[0].lane;
        game.ctx.current_lane = lane;
        game.player.x = LANE_X[lane];

        let report = simulate(&mut game, DT);
        assert_eq!(report.picked, 1);
        assert!(!report.new_high);
        assert_eq!(game.ctx.high_score, 5);
    }

    #[test]
    fn test_forced_floor_spawns_on_the_next_tick() {
        let mut game = game_with_facts();
        // Long silence: elapsed far past the forced interval
        game.ctx.elapsed = 10.0;
        game.ctx.last_spawn_time = 0.0;

        simulate(&mut game, DT);
        assert_eq!(game.field.live().len(), 1);
        // And the cadence clock was rearmed
        assert!(game.ctx.last_spawn_time > 0.0);
    }

    #[test]
    fn test_empty_fact_library_never_spawns() {
        let mut game = Game::new(SaveData::default(), None, 7);
        game.facts = crate::facts::FactLibrary::empty();
        game.ctx.elapsed = 100.0;
        for _ in 0..240 {
            simulate(&mut game, DT);
        }
        assert!(game.field.live().is_empty());
    }

    #[test]
    fn test_refresh_keeps_reveals_running() {
        let mut game = game_with_facts();
        game.field.spawn(&game.facts, None);
        let c = &game.field.live()[0];
        game.reveals.present(&c.fact.clone(), c.position);

        game.refresh();
        assert!(game.field.live().is_empty());
        assert_eq!(game.ctx.collected, 0);
        // The reveal survives the refresh and keeps animating
        assert_eq!(game.reveals.effects().len(), 1);
        let before = game.reveals.effects()[0].position.y;
        simulate(&mut game, DT);
        assert!(game.reveals.effects()[0].position.y > before);
    }

    #[test]
    fn test_isolated_swallows_panics() {
        let result = isolated("boom", || -> u32 { panic!("injected") });
        assert!(result.is_none());

        // A panicking step does not poison subsequent steps
        let ok = isolated("fine", || 42u32);
        assert_eq!(ok, Some(42));
    }

    #[test]
    fn test_player_tracks_lane_through_simulate() {
        let mut game = game_with_facts();
        game.ctx.current_lane = 2;
        for _ in 0..240 {
            simulate(&mut game, DT);
        }
        assert!((game.player.x - LANE_X[2]).abs() < 0.01);
        assert_eq!(game.player.position(), vec3(game.player.x, FLOAT_BASE_Y, 0.0));
    }
}
