//! Synthwave scene
//!
//! The presentation layer: camera, sky, the scrolling neon grid, roadside
//! props, the hovercar, collectible shapes, and the projected reveal text.
//! Static factories and ambient animation only - nothing in here makes
//! gameplay decisions, the core just calls `advance` and the draw pass.

use macroquad::camera::Camera;
use macroquad::prelude::*;

use crate::app::Game;
use crate::game::collectible::{Collectible, ShapeVariant, TRAVEL_SPEED};
use crate::game::player::Player;
use crate::game::reveal::{RevealEffect, RevealPhase};

/// Spacing of the transversal grid lines
const GRID_SPACING: f32 = 4.0;
/// How far the grid reaches ahead of the player
const HORIZON_Z: f32 = 90.0;
/// Grid extends this far behind the camera plane
const GRID_BEHIND_Z: f32 = 10.0;
const ROAD_HALF_WIDTH: f32 = 4.8;
const GRID_HALF_WIDTH: f32 = 28.0;
/// Longitudinal spacing of the roadside pylons
const PROP_SPACING: f32 = 18.0;
/// Environment keeps drifting at this fraction of travel speed while paused
const IDLE_DRIFT: f32 = 0.2;
/// Sun slat scroll rate
const SUN_SLAT_RATE: f32 = 6.0;

// Palette
const SKY_TOP: Color = Color::new(0.05, 0.01, 0.10, 1.0);
const SKY_HORIZON: Color = Color::new(0.26, 0.04, 0.28, 1.0);
const SUN_CORE: Color = Color::new(1.0, 0.45, 0.25, 1.0);
const SUN_EDGE: Color = Color::new(1.0, 0.15, 0.45, 1.0);
const GRID_LINE: Color = Color::new(0.95, 0.25, 0.80, 0.55);
const ROAD_EDGE: Color = Color::new(0.0, 0.85, 0.95, 0.9);
const ROAD_SURFACE: Color = Color::new(0.03, 0.02, 0.07, 1.0);
const PROP_COLOR: Color = Color::new(0.55, 0.20, 0.95, 0.8);
const CAR_BODY: Color = Color::new(0.09, 0.07, 0.16, 1.0);
const CAR_TRIM: Color = Color::new(0.0, 0.9, 1.0, 1.0);
const CAR_CANOPY: Color = Color::new(0.95, 0.35, 0.75, 1.0);

/// Ambient animation state. Runs on its own always-advancing clock,
/// independent of the gameplay clock.
pub struct SceneState {
    pub elapsed: f32,
    /// Scroll position of the transversal grid lines, wraps at the spacing
    pub grid_offset: f32,
    /// Drives the sun slat scroll
    pub sun_phase: f32,
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            grid_offset: 0.0,
            sun_phase: 0.0,
        }
    }

    /// Advance the ambient animation. Always runs; while the game is paused
    /// the scroll drops to a slow idle drift so the background stays alive.
    pub fn advance(&mut self, dt: f32, running: bool) {
        let speed = if running { 1.0 } else { IDLE_DRIFT };
        self.elapsed += dt;
        self.grid_offset = (self.grid_offset + TRAVEL_SPEED * dt * speed) % GRID_SPACING;
        self.sun_phase += dt * SUN_SLAT_RATE * speed;
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed chase camera: slightly above and behind the hovercar.
pub fn scene_camera() -> Camera3D {
    Camera3D {
        position: vec3(0.0, 3.2, 6.5),
        target: vec3(0.0, 1.2, -8.0),
        up: vec3(0.0, 1.0, 0.0),
        ..Default::default()
    }
}

/// Project a world point into screen coordinates. Returns None for points
/// on or behind the camera plane.
pub fn world_to_screen(
    view_projection: &Mat4,
    point: Vec3,
    screen_w: f32,
    screen_h: f32,
) -> Option<Vec2> {
    let clip = *view_projection * vec4(point.x, point.y, point.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    Some(vec2(
        (ndc_x + 1.0) * 0.5 * screen_w,
        (1.0 - ndc_y) * 0.5 * screen_h,
    ))
}

/// The whole 3D frame plus the projected reveal text. The 2D HUD overlay
/// is drawn separately after this.
pub fn draw_frame(game: &Game) {
    set_default_camera();
    draw_sky(&game.scene);

    let camera = scene_camera();
    set_camera(&camera);
    draw_grid(&game.scene);
    draw_props(&game.scene);
    for collectible in game.field.live() {
        draw_collectible(collectible, game.scene.elapsed);
    }
    draw_player(&game.player);

    set_default_camera();
    let view_projection = camera.matrix();
    for effect in game.reveals.effects() {
        draw_reveal(effect, &view_projection);
    }
}

/// Gradient sky with the slatted synthwave sun. Drawn as a 2D background
/// before the 3D pass.
fn draw_sky(state: &SceneState) {
    let w = screen_width();
    let h = screen_height();
    let horizon = h * 0.52;

    // Vertical gradient in coarse bands
    let bands = 24;
    let band_h = horizon / bands as f32;
    for i in 0..bands {
        let t = i as f32 / bands as f32;
        let color = Color::new(
            SKY_TOP.r + (SKY_HORIZON.r - SKY_TOP.r) * t,
            SKY_TOP.g + (SKY_HORIZON.g - SKY_TOP.g) * t,
            SKY_TOP.b + (SKY_HORIZON.b - SKY_TOP.b) * t,
            1.0,
        );
        draw_rectangle(0.0, i as f32 * band_h, w, band_h + 1.0, color);
    }
    // Ground fill below the horizon; the grid draws over it
    draw_rectangle(0.0, horizon, w, h - horizon, ROAD_SURFACE);

    // Sun disc, banded by scrolling slats
    let sun_r = h * 0.18;
    let sun_x = w * 0.5;
    let sun_y = horizon - sun_r * 0.35;
    let slats = 9;
    for i in 0..slats {
        let t = i as f32 / (slats - 1) as f32;
        let y = sun_y - sun_r + t * 2.0 * sun_r;
        if y > horizon {
            continue;
        }
        let dy = (y - sun_y) / sun_r;
        let half = sun_r * (1.0 - dy * dy).max(0.0).sqrt();
        let color = Color::new(
            SUN_CORE.r + (SUN_EDGE.r - SUN_CORE.r) * t,
            SUN_CORE.g + (SUN_EDGE.g - SUN_CORE.g) * t,
            SUN_CORE.b + (SUN_EDGE.b - SUN_CORE.b) * t,
            1.0,
        );
        // Slats thin out toward the bottom and scroll with the phase
        let gap = 2.0 + t * 6.0 + (state.sun_phase + i as f32).sin();
        let thickness = (2.0 * sun_r / slats as f32 - gap).max(2.0);
        draw_rectangle(sun_x - half, y, half * 2.0, thickness, color);
    }
}

/// The scrolling neon grid and the road edges.
fn draw_grid(state: &SceneState) {
    // Longitudinal lines, brighter at the road edges
    let mut x = -GRID_HALF_WIDTH;
    while x <= GRID_HALF_WIDTH {
        let on_edge = (x.abs() - ROAD_HALF_WIDTH).abs() < 0.1;
        let color = if on_edge { ROAD_EDGE } else { GRID_LINE };
        draw_line_3d(
            vec3(x, 0.0, -HORIZON_Z),
            vec3(x, 0.0, GRID_BEHIND_Z),
            color,
        );
        x += GRID_SPACING;
    }

    // Transversal lines scroll toward the camera and wrap
    let count = ((HORIZON_Z + GRID_BEHIND_Z) / GRID_SPACING) as i32;
    for i in 0..count {
        let z = -HORIZON_Z + i as f32 * GRID_SPACING + state.grid_offset;
        draw_line_3d(
            vec3(-GRID_HALF_WIDTH, 0.0, z),
            vec3(GRID_HALF_WIDTH, 0.0, z),
            GRID_LINE,
        );
    }
}

/// Roadside pylons, scrolling with the grid and gently pulsing.
fn draw_props(state: &SceneState) {
    let count = (HORIZON_Z / PROP_SPACING) as i32 + 1;
    for i in 0..count {
        let z = -HORIZON_Z + i as f32 * PROP_SPACING
            + state.grid_offset * (PROP_SPACING / GRID_SPACING);
        let z = -HORIZON_Z + (z + HORIZON_Z).rem_euclid(HORIZON_Z + GRID_BEHIND_Z);
        let pulse = 2.6 + 0.3 * (state.elapsed * 1.3 + i as f32).sin();
        for side in [-1.0f32, 1.0] {
            let x = side * (ROAD_HALF_WIDTH + 3.4);
            draw_cube_wires(vec3(x, pulse / 2.0, z), vec3(0.5, pulse, 0.5), PROP_COLOR);
            draw_sphere_wires(vec3(x, pulse + 0.3, z), 0.3, None, ROAD_EDGE);
        }
    }
}

/// The hovercar, tilted by the cosmetic roll.
fn draw_player(player: &Player) {
    let position = player.position();
    unsafe {
        get_internal_gl().quad_gl.push_model_matrix(
            Mat4::from_translation(position) * Mat4::from_rotation_z(player.tilt),
        );
    }

    draw_cube(vec3(0.0, 0.0, 0.0), vec3(1.6, 0.35, 2.4), None, CAR_BODY);
    draw_cube_wires(vec3(0.0, 0.0, 0.0), vec3(1.6, 0.35, 2.4), CAR_TRIM);
    draw_cube(vec3(0.0, 0.3, 0.2), vec3(0.8, 0.28, 1.0), None, CAR_CANOPY);
    // Skids
    draw_cube(vec3(-0.7, -0.28, 0.0), vec3(0.18, 0.12, 1.8), None, CAR_TRIM);
    draw_cube(vec3(0.7, -0.28, 0.0), vec3(0.18, 0.12, 1.8), None, CAR_TRIM);
    // Tail glow
    draw_cube(vec3(0.0, 0.0, 1.25), vec3(1.2, 0.12, 0.1), None, SUN_EDGE);

    unsafe {
        get_internal_gl().quad_gl.pop_model_matrix();
    }
}

/// One collectible shape, colored by its fact's accent and spun by its
/// variant's pure animation function.
fn draw_collectible(collectible: &Collectible, elapsed: f32) {
    let [r, g, b] = collectible.fact.accent;
    let fill = Color::from_rgba(r, g, b, 140);
    let wire = Color::from_rgba(r, g, b, 255);
    let spin = collectible.variant.spin(elapsed);

    unsafe {
        get_internal_gl().quad_gl.push_model_matrix(
            Mat4::from_translation(collectible.position) * Mat4::from_rotation_y(spin),
        );
    }

    match collectible.variant {
        ShapeVariant::Cassette => {
            draw_cube(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.62, 0.2), None, fill);
            draw_cube_wires(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.62, 0.2), wire);
        }
        ShapeVariant::Crystal => {
            draw_cube(vec3(0.0, 0.0, 0.0), vec3(0.55, 0.9, 0.55), None, fill);
            draw_sphere_wires(vec3(0.0, 0.0, 0.0), 0.62, None, wire);
        }
        ShapeVariant::Disc => {
            draw_cylinder(vec3(0.0, 0.0, 0.0), 0.55, 0.55, 0.12, None, fill);
            draw_cylinder_wires(vec3(0.0, 0.0, 0.0), 0.55, 0.55, 0.12, None, wire);
        }
        ShapeVariant::Pyramid => {
            draw_cylinder(vec3(0.0, -0.45, 0.0), 0.02, 0.6, 0.95, None, fill);
            draw_cylinder_wires(vec3(0.0, -0.45, 0.0), 0.02, 0.6, 0.95, None, wire);
        }
    }

    unsafe {
        get_internal_gl().quad_gl.pop_model_matrix();
    }
}

/// Project a reveal into screen space and draw its text at the effect's
/// opacity. A blank placeholder renders as a faint bar so the pickup still
/// reads visually.
fn draw_reveal(effect: &RevealEffect, view_projection: &Mat4) {
    let Some(screen) = world_to_screen(
        view_projection,
        effect.position,
        screen_width(),
        screen_height(),
    ) else {
        return;
    };

    let [r, g, b] = effect.accent;
    let alpha = (effect.opacity() * 255.0) as u8;
    let color = Color::from_rgba(r, g, b, alpha);
    let font_size = 26.0;

    if effect.text.is_empty() {
        draw_rectangle(screen.x - 30.0, screen.y - 3.0, 60.0, 6.0, color);
        return;
    }

    let dims = measure_text(&effect.text, None, font_size as u16, 1.0);
    draw_text_ex(
        &effect.text,
        screen.x - dims.width / 2.0,
        screen.y,
        TextParams {
            font_size: font_size as u16,
            rotation: effect.roll,
            color,
            ..Default::default()
        },
    );
    // Fresh reveals get an accent underline until the fade begins
    if effect.phase() == RevealPhase::Holding {
        draw_rectangle(
            screen.x - dims.width / 2.0,
            screen.y + 6.0,
            dims.width,
            2.0,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_view_projection() -> Mat4 {
        let projection = Mat4::perspective_rh_gl(45f32.to_radians(), 16.0 / 9.0, 0.01, 1000.0);
        let view = Mat4::look_at_rh(vec3(0.0, 3.2, 6.5), vec3(0.0, 1.2, -8.0), Vec3::Y);
        projection * view
    }

    #[test]
    fn test_advance_wraps_grid_offset() {
        let mut state = SceneState::new();
        for _ in 0..600 {
            state.advance(1.0 / 60.0, true);
            assert!(state.grid_offset >= 0.0);
            assert!(state.grid_offset < GRID_SPACING);
        }
    }

    #[test]
    fn test_paused_environment_still_moves() {
        let mut state = SceneState::new();
        state.advance(1.0 / 60.0, false);
        assert!(state.grid_offset > 0.0);
        assert!(state.elapsed > 0.0);
    }

    #[test]
    fn test_world_to_screen_maps_ahead_points_on_screen() {
        let vp = test_view_projection();
        let screen = world_to_screen(&vp, vec3(0.0, 1.0, -20.0), 1280.0, 720.0).unwrap();
        assert!(screen.x > 0.0 && screen.x < 1280.0);
        assert!(screen.y > 0.0 && screen.y < 720.0);
        // A centered point lands on the vertical midline
        assert!((screen.x - 640.0).abs() < 1.0);
    }

    #[test]
    fn test_world_to_screen_rejects_points_behind_camera() {
        let vp = test_view_projection();
        assert!(world_to_screen(&vp, vec3(0.0, 1.0, 50.0), 1280.0, 720.0).is_none());
    }

    #[test]
    fn test_lane_sides_project_to_matching_screen_sides() {
        let vp = test_view_projection();
        let left = world_to_screen(&vp, vec3(-2.4, 1.0, -20.0), 1280.0, 720.0).unwrap();
        let right = world_to_screen(&vp, vec3(2.4, 1.0, -20.0), 1280.0, 720.0).unwrap();
        assert!(left.x < 640.0);
        assert!(right.x > 640.0);
    }
}
