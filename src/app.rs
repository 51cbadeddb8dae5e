//! Run state and the game container
//!
//! All process-wide mutable state lives in `GameContext` and is threaded
//! explicitly through the scheduler, the lifecycle manager, and the reveal
//! controller - there are no hidden statics. `Game` is the single-owner
//! container the frame loop hands to the scheduler every tick.

use std::path::PathBuf;

use crate::facts::FactLibrary;
use crate::game::collectible::CollectibleField;
use crate::game::player::{shift_lane, Player};
use crate::game::reveal::RevealController;
use crate::scene::SceneState;
use crate::storage::{self, SaveData};

/// Process-wide mutable run state.
///
/// `high_score` and `music_enabled` persist across sessions; everything
/// else resets on a gameplay refresh.
pub struct GameContext {
    /// Active lane index, 0..=2
    pub current_lane: usize,
    /// Gameplay-clock timestamp of the last spawn (cadence anchor)
    pub last_spawn_time: f64,
    pub running: bool,
    pub music_enabled: bool,
    /// Facts revealed this run
    pub collected: u32,
    pub high_score: u32,
    /// Gameplay clock in seconds; advances only while running, so pausing
    /// neither starves nor floods the spawn cadence
    pub elapsed: f64,
}

impl GameContext {
    pub fn new(save: SaveData) -> Self {
        Self {
            current_lane: 1,
            last_spawn_time: 0.0,
            running: true,
            music_enabled: save.music_enabled,
            collected: 0,
            high_score: save.high_score,
            elapsed: 0.0,
        }
    }
}

/// Everything the frame scheduler drives, in one place.
pub struct Game {
    pub ctx: GameContext,
    pub facts: FactLibrary,
    pub field: CollectibleField,
    pub reveals: RevealController,
    pub player: Player,
    pub scene: SceneState,
    /// Where the save file lives; None disables persistence (wasm, tests)
    pub save_path: Option<PathBuf>,
}

impl Game {
    pub fn new(save: SaveData, save_path: Option<PathBuf>, rng_seed: u32) -> Self {
        Self {
            ctx: GameContext::new(save),
            facts: FactLibrary::with_resume(),
            field: CollectibleField::new(rng_seed),
            reveals: RevealController::new(),
            player: Player::new(),
            scene: SceneState::new(),
            save_path,
        }
    }

    /// Steer one lane left (-1) or right (+1).
    pub fn steer(&mut self, direction: i32) {
        let target = shift_lane(self.ctx.current_lane, direction);
        if target != self.ctx.current_lane {
            self.ctx.current_lane = target;
            self.player.nudge(direction);
        }
    }

    /// Reset the run: lane, counter, cadence, live collectibles. The high
    /// score and the music preference survive, and live reveals keep
    /// running to their natural expiry.
    pub fn refresh(&mut self) {
        self.ctx.current_lane = 1;
        self.ctx.collected = 0;
        self.ctx.last_spawn_time = self.ctx.elapsed;
        self.ctx.running = true;
        self.field.clear();
        self.player.reset();
        self.persist();
    }

    pub fn toggle_pause(&mut self) {
        self.ctx.running = !self.ctx.running;
    }

    /// Flip the music preference and persist it. Returns the new state so
    /// the caller can start/stop the sequencer.
    pub fn toggle_music(&mut self) -> bool {
        self.ctx.music_enabled = !self.ctx.music_enabled;
        self.persist();
        self.ctx.music_enabled
    }

    /// Best-effort save of the persistent slice of the context.
    pub fn persist(&self) {
        let Some(path) = &self.save_path else {
            return;
        };
        let data = SaveData {
            high_score: self.ctx.high_score,
            music_enabled: self.ctx.music_enabled,
        };
        if let Err(e) = storage::save(&data, path) {
            eprintln!("save failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::collectible::LANE_X;

    fn game() -> Game {
        Game::new(SaveData::default(), None, 7)
    }

    #[test]
    fn test_steer_moves_lane_and_tilts() {
        let mut game = game();
        assert_eq!(game.ctx.current_lane, 1);

        game.steer(-1);
        assert_eq!(game.ctx.current_lane, 0);
        assert!(game.player.tilt.abs() > 0.0);

        // Steering into the wall neither moves nor tilts further
        let tilt = game.player.tilt;
        game.steer(-1);
        assert_eq!(game.ctx.current_lane, 0);
        assert_eq!(game.player.tilt, tilt);
    }

    #[test]
    fn test_refresh_resets_run_but_keeps_persistent_state() {
        let mut game = Game::new(
            SaveData {
                high_score: 9,
                music_enabled: false,
            },
            None,
            7,
        );
        game.ctx.current_lane = 2;
        game.ctx.collected = 4;
        game.ctx.elapsed = 30.0;
        game.field.spawn(&game.facts, None);

        game.refresh();

        assert_eq!(game.ctx.current_lane, 1);
        assert_eq!(game.ctx.collected, 0);
        assert!(game.field.live().is_empty());
        assert_eq!(game.ctx.high_score, 9);
        assert!(!game.ctx.music_enabled);
        assert_eq!(game.ctx.last_spawn_time, 30.0);
        assert_eq!(game.player.x, LANE_X[1]);
    }

    #[test]
    fn test_toggle_music_flips_preference() {
        let mut game = game();
        let initial = game.ctx.music_enabled;
        assert_eq!(game.toggle_music(), !initial);
        assert_eq!(game.toggle_music(), initial);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game = game();
        assert!(game.ctx.running);
        game.toggle_pause();
        assert!(!game.ctx.running);
        game.toggle_pause();
        assert!(game.ctx.running);
    }
}
