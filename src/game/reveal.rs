//! Reveal effects
//!
//! A reveal is the short-lived in-world text animation shown when the player
//! flies through a collectible. Each effect is bound to one Fact at creation
//! and runs a fixed lifecycle on its own frame clock, decoupled from game
//! state - reveals keep animating while the game is paused and survive a
//! gameplay refresh, expiring only on their own schedule.
//!
//! Lifecycle: Holding (grace period, fully opaque so the text is legible)
//! -> Fading (opacity decays at a fixed per-frame rate) -> Expired
//! (terminal, removed by the controller exactly once). No transition skips
//! Holding and Fading never re-enters it.

use macroquad::math::{vec3, Vec3};

use crate::facts::Fact;

/// Frames the text stays fully opaque before any fade begins
pub const HOLD_FRAMES: u32 = 120;

/// Opacity lost per frame once fading
pub const FADE_RATE: f32 = 0.0025;

/// Fading frames until expiry; FADE_FRAMES * FADE_RATE covers the full
/// opacity range
pub const FADE_FRAMES: u32 = 400;

/// Characters of description kept in the display string
pub const DESCRIPTION_LIMIT: usize = 64;

/// Near-zero upward drift per frame - text is almost stationary for
/// readability
const DRIFT_PER_FRAME: f32 = 0.004;

/// Slow self-rotation per frame (radians)
const ROLL_PER_FRAME: f32 = 0.0035;

/// The effect appears slightly above the pickup point...
const REVEAL_LIFT: f32 = 0.8;
/// ...and nudged toward the camera
const REVEAL_TOWARD_CAMERA: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Holding,
    Fading,
    Expired,
}

/// One transient, self-animating text effect.
pub struct RevealEffect {
    /// Formatted display string; empty for the blank placeholder fallback
    pub text: String,
    pub position: Vec3,
    pub accent: [u8; 3],
    pub roll: f32,
    /// Opacity in [0, 1]; exactly 1.0 throughout the grace period
    life: f32,
    hold_left: u32,
    fade_left: u32,
    phase: RevealPhase,
}

impl RevealEffect {
    fn new(text: String, position: Vec3, accent: [u8; 3]) -> Self {
        Self {
            text,
            position,
            accent,
            roll: 0.0,
            life: 1.0,
            hold_left: HOLD_FRAMES,
            fade_left: FADE_FRAMES,
            phase: RevealPhase::Holding,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Current opacity
    pub fn opacity(&self) -> f32 {
        self.life
    }

    /// Advance one frame. Returns false exactly once the effect expires;
    /// the caller must remove it then.
    pub fn tick(&mut self) -> bool {
        match self.phase {
            RevealPhase::Expired => false,
            RevealPhase::Holding => {
                self.drift();
                self.hold_left -= 1;
                if self.hold_left == 0 {
                    self.phase = RevealPhase::Fading;
                }
                true
            }
            RevealPhase::Fading => {
                self.drift();
                // Integer frame countdown keeps the terminal value exact
                self.fade_left -= 1;
                self.life = self.fade_left as f32 * FADE_RATE;
                if self.fade_left == 0 {
                    self.life = 0.0;
                    self.phase = RevealPhase::Expired;
                    false
                } else {
                    true
                }
            }
        }
    }

    fn drift(&mut self) {
        self.position.y += DRIFT_PER_FRAME;
        self.roll += ROLL_PER_FRAME;
    }
}

/// Owns the live reveal set and the anti-repeat tracker.
pub struct RevealController {
    effects: Vec<RevealEffect>,
    last_shown: Option<String>,
}

impl RevealController {
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
            last_shown: None,
        }
    }

    /// Create exactly one reveal for a pickup.
    ///
    /// If no display string can be built for the fact, a blank placeholder
    /// effect is created instead - it still occupies its lifecycle slot and
    /// expires normally, so nothing leaks.
    pub fn present(&mut self, fact: &Fact, world_pos: Vec3) {
        let text = build_display_string(fact).unwrap_or_default();
        let position = world_pos + vec3(0.0, REVEAL_LIFT, REVEAL_TOWARD_CAMERA);
        self.effects.push(RevealEffect::new(text, position, fact.accent));
        self.last_shown = Some(fact.name.clone());
    }

    /// Tick every live effect and drop the ones that expired this frame.
    /// Returns how many expired.
    pub fn advance_all(&mut self) -> usize {
        let before = self.effects.len();
        self.effects.retain_mut(|e| e.tick());
        before - self.effects.len()
    }

    pub fn effects(&self) -> &[RevealEffect] {
        &self.effects
    }

    /// The most recently shown fact name, consulted by the spawn policy's
    /// anti-repeat resample. A UX heuristic, not a correctness invariant.
    pub fn last_shown(&self) -> Option<&str> {
        self.last_shown.as_deref()
    }
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the formatted display string: category glyph, name, then a
/// truncated description and the language when present.
///
/// Returns None when nothing printable survives - the default font only
/// renders printable ASCII, so a string of unexpected characters is treated
/// as unbuildable and the caller falls back to the blank placeholder.
pub fn build_display_string(fact: &Fact) -> Option<String> {
    let mut out = format!("{} {}", fact.category.glyph(), fact.name);
    if let Some(description) = &fact.description {
        out.push_str(" - ");
        out.push_str(&truncate(description, DESCRIPTION_LIMIT));
    }
    if let Some(language) = &fact.language {
        out.push_str(&format!(" ({})", language));
    }
    if let Some(stars) = fact.star_count.filter(|&n| n > 0) {
        out.push_str(&format!(" *{}", stars));
    }

    let clean: String = out
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();
    let clean = clean.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean == fact.category.glyph() || clean.is_empty() {
        None
    } else {
        Some(clean)
    }
}

/// Cut at a char boundary and mark the cut.
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{FactCategory, FactOrigin};

    fn fact(name: &str) -> Fact {
        Fact::new(name, FactOrigin::ProfileInfo, FactCategory::Bio)
    }

    #[test]
    fn test_hold_then_fade_then_expire() {
        let mut controller = RevealController::new();
        controller.present(&fact("A"), vec3(0.0, 1.0, 0.0));
        let effect = &mut controller.effects[0];

        // Grace period: after 119 ticks the opacity is still exactly 1.0
        for _ in 0..HOLD_FRAMES - 1 {
            assert!(effect.tick());
        }
        assert_eq!(effect.opacity(), 1.0);
        assert_eq!(effect.phase(), RevealPhase::Holding);

        // 120th tick crosses into Fading, still alive
        assert!(effect.tick());
        assert_eq!(effect.phase(), RevealPhase::Fading);

        // 400 fading ticks reach exactly zero and report dead exactly once
        for i in 0..FADE_FRAMES {
            let alive = effect.tick();
            if i < FADE_FRAMES - 1 {
                assert!(alive);
            } else {
                assert!(!alive);
            }
        }
        assert_eq!(effect.opacity(), 0.0);
        assert_eq!(effect.phase(), RevealPhase::Expired);
    }

    #[test]
    fn test_opacity_monotonic_and_strictly_decreasing_while_fading() {
        let mut controller = RevealController::new();
        controller.present(&fact("A"), vec3(0.0, 1.0, 0.0));
        let effect = &mut controller.effects[0];

        let mut previous = effect.opacity();
        for _ in 0..HOLD_FRAMES {
            effect.tick();
            assert!(effect.opacity() <= previous);
            previous = effect.opacity();
        }
        for _ in 0..FADE_FRAMES {
            let was = effect.opacity();
            effect.tick();
            assert!(effect.opacity() < was);
        }
    }

    #[test]
    fn test_exactly_one_effect_per_present() {
        let mut controller = RevealController::new();
        controller.present(&fact("A"), vec3(0.0, 1.0, 0.0));
        assert_eq!(controller.effects().len(), 1);
        controller.present(&fact("B"), vec3(0.0, 1.0, 0.0));
        assert_eq!(controller.effects().len(), 2);
    }

    #[test]
    fn test_present_records_last_shown() {
        let mut controller = RevealController::new();
        assert!(controller.last_shown().is_none());
        controller.present(&fact("A"), vec3(0.0, 1.0, 0.0));
        assert_eq!(controller.last_shown(), Some("A"));
    }

    #[test]
    fn test_advance_all_removes_expired_exactly_once() {
        let mut controller = RevealController::new();
        controller.present(&fact("A"), vec3(0.0, 1.0, 0.0));

        let mut total_expired = 0;
        for _ in 0..(HOLD_FRAMES + FADE_FRAMES + 50) {
            total_expired += controller.advance_all();
        }
        assert_eq!(total_expired, 1);
        assert!(controller.effects().is_empty());
    }

    #[test]
    fn test_unprintable_text_falls_back_to_placeholder_that_expires() {
        let weird = fact("\u{7f}\u{0}\u{1b}");
        assert!(build_display_string(&weird).is_none());

        let mut controller = RevealController::new();
        controller.present(&weird, vec3(0.0, 1.0, 0.0));
        assert_eq!(controller.effects().len(), 1);
        assert!(controller.effects()[0].text.is_empty());

        // The placeholder still runs the full lifecycle
        let mut expired = 0;
        for _ in 0..(HOLD_FRAMES + FADE_FRAMES) {
            expired += controller.advance_all();
        }
        assert_eq!(expired, 1);
    }

    #[test]
    fn test_display_string_truncates_long_descriptions() {
        let long = fact("repo").with_description("x".repeat(DESCRIPTION_LIMIT * 2));
        let text = build_display_string(&long).unwrap();
        assert!(text.ends_with("..."));
        assert!(text.len() < DESCRIPTION_LIMIT * 2);
    }

    #[test]
    fn test_display_string_prefixes_glyph() {
        let text = build_display_string(&fact("hello")).unwrap();
        assert!(text.starts_with("[bio] hello"));
    }
}
