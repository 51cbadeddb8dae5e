//! Player hovercar
//!
//! The lane controller's output side: the hovercar eases toward the active
//! lane's x position and carries a cosmetic roll tilt that decays back to
//! level. Gameplay only ever reads `position()`; the tilt is purely visual.

use macroquad::math::{vec3, Vec3};

use super::collectible::{FLOAT_BASE_Y, LANE_X};

/// The hovercar sits at the origin plane; the world scrolls toward it
pub const PLAYER_Z: f32 = 0.0;

/// Hover height, matched to the collectible float band so a same-lane pass
/// lands inside the capture radius
pub const HOVER_HEIGHT: f32 = FLOAT_BASE_Y;

/// Exponential approach rate toward the target lane x
const LANE_SNAP_RATE: f32 = 10.0;

/// Roll added per steer input (radians)
const TILT_IMPULSE: f32 = 0.45;
const TILT_DECAY_RATE: f32 = 6.0;
const MAX_TILT: f32 = 0.6;

/// Clamp a steer input to the lane table. Pure function of input -> lane.
pub fn shift_lane(current: usize, direction: i32) -> usize {
    let target = current as i32 + direction;
    target.clamp(0, LANE_X.len() as i32 - 1) as usize
}

pub struct Player {
    pub x: f32,
    /// Cosmetic roll, decays to zero
    pub tilt: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            x: LANE_X[1],
            tilt: 0.0,
        }
    }

    /// Kick the roll when a steer lands (direction -1 = left, +1 = right)
    pub fn nudge(&mut self, direction: i32) {
        self.tilt = (self.tilt - direction as f32 * TILT_IMPULSE).clamp(-MAX_TILT, MAX_TILT);
    }

    /// Ease toward the target lane and decay the tilt.
    pub fn update(&mut self, dt: f32, target_lane: usize) {
        let target_x = LANE_X[target_lane.min(LANE_X.len() - 1)];
        self.x += (target_x - self.x) * (LANE_SNAP_RATE * dt).min(1.0);
        self.tilt -= self.tilt * (TILT_DECAY_RATE * dt).min(1.0);
    }

    pub fn position(&self) -> Vec3 {
        vec3(self.x, HOVER_HEIGHT, PLAYER_Z)
    }

    /// Snap back to the center lane (gameplay refresh)
    pub fn reset(&mut self) {
        self.x = LANE_X[1];
        self.tilt = 0.0;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
