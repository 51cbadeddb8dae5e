//! SYNTHLANE: a synthwave hovercar mini-game as a portfolio landing page
//!
//! Pilot the hovercar down an infinite neon lane and fly through the
//! floating shapes - each one reveals a fact about me or one of my
//! projects, pulled live from GitHub with a hardcoded resume as fallback.
//! No score to lose, no way to die; the only relic is a high-score count
//! and the music toggle, both remembered between sessions.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod audio;
mod facts;
mod game;
mod hud;
mod input;
mod scene;
mod storage;

use macroquad::prelude::*;

use app::Game;
use audio::Chiptune;
use input::Command;

/// The profile the fact provider reads
const GITHUB_LOGIN: &str = "EBonura";
const PROFILE_URL: &str = "https://github.com/EBonura";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("SYNTHLANE v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Panic logging first, before anything can fail
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let save_path = storage::default_save_path();
    let save = storage::load_or_default(save_path.as_deref());

    // Seed gameplay randomness from the wall clock (low millisecond bits);
    // tests seed explicitly
    let seed = (macroquad::miniquad::date::now() * 1000.0) as u64 as u32 | 1;
    let mut game = Game::new(save, save_path, seed);

    // One-shot fetch, polled each frame; failure degrades to the resume
    // fallback that's already loaded
    let mut fetch = facts::fetch::fetch_facts(GITHUB_LOGIN);

    let chiptune = Chiptune::new();
    if game.ctx.music_enabled {
        chiptune.start();
    }

    println!("=== SYNTHLANE v{} ===", VERSION);

    loop {
        let dt = get_frame_time();

        if let Some(result) = fetch.poll() {
            game.facts.install(result);
        }

        for command in input::poll_commands() {
            match command {
                Command::SteerLeft => game.steer(-1),
                Command::SteerRight => game.steer(1),
                Command::Refresh => game.refresh(),
                Command::TogglePause => game.toggle_pause(),
                Command::ToggleMusic => {
                    if game.toggle_music() {
                        chiptune.start();
                    } else {
                        chiptune.stop();
                    }
                }
                Command::VolumeDown => chiptune.set_volume(chiptune.volume() - 0.1),
                Command::VolumeUp => chiptune.set_volume(chiptune.volume() + 0.1),
                Command::OpenProfile => open_profile(),
            }
        }

        let report = game::scheduler::run_frame(&mut game, dt);
        if report.new_high {
            game.persist();
        }

        next_frame().await;
    }
}

fn open_profile() {
    #[cfg(not(target_arch = "wasm32"))]
    if let Err(e) = webbrowser::open(PROFILE_URL) {
        eprintln!("failed to open {}: {}", PROFILE_URL, e);
    }
    // The browser build can't pop windows from here; the HUD shows the hint
    // and the address is logged for the console
    #[cfg(target_arch = "wasm32")]
    println!("profile: {}", PROFILE_URL);
}
