//! HUD overlay
//!
//! The 2D pass drawn after the scene: collected/best counters, music and
//! sync status, the control hints, and the pause banner. Purely
//! presentational - reads the game, never writes it.

use macroquad::prelude::*;

use crate::app::Game;

const TEXT_COLOR: Color = Color::new(0.9, 0.9, 0.9, 1.0);
const MUTED_COLOR: Color = Color::new(0.6, 0.6, 0.65, 1.0);
const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

pub fn draw(game: &Game) {
    let w = screen_width();
    let h = screen_height();

    draw_text("SYNTHLANE", 24.0, 40.0, 30.0, ACCENT_COLOR);
    draw_text(
        &format!("FACTS {}", game.ctx.collected),
        24.0,
        70.0,
        22.0,
        TEXT_COLOR,
    );
    draw_text(
        &format!("BEST {}", game.ctx.high_score),
        24.0,
        94.0,
        22.0,
        MUTED_COLOR,
    );

    let music = if game.ctx.music_enabled {
        "music on"
    } else {
        "music off"
    };
    draw_text(music, 24.0, 118.0, 18.0, MUTED_COLOR);

    if game.facts.syncing() {
        let pulse = 0.5 + 0.3 * (get_time() * 4.0).sin() as f32;
        draw_text(
            "syncing profile...",
            24.0,
            142.0,
            18.0,
            Color::new(ACCENT_COLOR.r, ACCENT_COLOR.g, ACCENT_COLOR.b, pulse),
        );
    }

    let hints = "arrows/tap steer  |  R refresh  |  space pause  |  M music  |  -/+ volume  |  G github";
    let dims = measure_text(hints, None, 18, 1.0);
    draw_text(
        hints,
        (w - dims.width) / 2.0,
        h - 18.0,
        18.0,
        MUTED_COLOR,
    );

    if !game.ctx.running {
        let banner = "PAUSED";
        let dims = measure_text(banner, None, 48, 1.0);
        draw_text(
            banner,
            (w - dims.width) / 2.0,
            h * 0.4,
            48.0,
            ACCENT_COLOR,
        );
    }
}
