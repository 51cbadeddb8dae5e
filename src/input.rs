//! Input surface
//!
//! Polls keyboard and touch each frame and turns them into discrete
//! commands. The lane contract lives in `game::player::shift_lane`; this
//! module only decides *that* a steer happened, never where it lands.
//!
//! Touch: tapping the left or right half of the screen steers. Mouse
//! clicks mirror the touch zones so the web build works on desktop too.

use macroquad::prelude::*;

/// A discrete input event for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SteerLeft,
    SteerRight,
    /// Reset the run (high score and music preference survive)
    Refresh,
    TogglePause,
    ToggleMusic,
    VolumeDown,
    VolumeUp,
    /// Open the GitHub profile in the browser
    OpenProfile,
}

/// Collect this frame's commands. Order is keyboard first, then taps.
pub fn poll_commands() -> Vec<Command> {
    let mut commands = Vec::new();

    if is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A) {
        commands.push(Command::SteerLeft);
    }
    if is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D) {
        commands.push(Command::SteerRight);
    }
    if is_key_pressed(KeyCode::R) {
        commands.push(Command::Refresh);
    }
    if is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::P) {
        commands.push(Command::TogglePause);
    }
    if is_key_pressed(KeyCode::M) {
        commands.push(Command::ToggleMusic);
    }
    if is_key_pressed(KeyCode::Minus) {
        commands.push(Command::VolumeDown);
    }
    if is_key_pressed(KeyCode::Equal) {
        commands.push(Command::VolumeUp);
    }
    if is_key_pressed(KeyCode::G) {
        commands.push(Command::OpenProfile);
    }

    let half = screen_width() / 2.0;
    for touch in touches() {
        if touch.phase == TouchPhase::Started {
            commands.push(steer_for_x(touch.position.x, half));
        }
    }
    // Touch and mouse are never both active; on touch devices macroquad
    // also synthesizes mouse events, so only read the mouse when no touch
    // arrived this frame.
    if touches().is_empty() && is_mouse_button_pressed(MouseButton::Left) {
        commands.push(steer_for_x(mouse_position().0, half));
    }

    commands
}

fn steer_for_x(x: f32, half: f32) -> Command {
    if x < half {
        Command::SteerLeft
    } else {
        Command::SteerRight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_zones_split_at_half() {
        assert_eq!(steer_for_x(10.0, 400.0), Command::SteerLeft);
        assert_eq!(steer_for_x(399.9, 400.0), Command::SteerLeft);
        assert_eq!(steer_for_x(400.0, 400.0), Command::SteerRight);
        assert_eq!(steer_for_x(799.0, 400.0), Command::SteerRight);
    }
}
