//! Collectible lifecycle
//!
//! The lifecycle manager owns every live collectible on the lane: spawn
//! cadence, forward motion, the floating bob, proximity pickup, and
//! out-of-range reaping. A collectible binds exactly one Fact at spawn and
//! is removed exactly once - either by pickup (which hands the Fact to the
//! reveal controller) or by drifting past the camera (silent despawn).
//!
//! Spawn cadence is the one real scheduling decision in the game: a
//! probabilistic rate limiter with a forced-floor fallback, so the player is
//! never starved of collectibles under bad luck while the live cap keeps
//! the lane uncluttered.

use macroquad::math::{vec3, Vec3};

use crate::facts::{Fact, FactLibrary};

/// Lateral x position of each of the 3 lanes
pub const LANE_X: [f32; 3] = [-2.4, 0.0, 2.4];

/// Forward travel speed (world units per second)
pub const TRAVEL_SPEED: f32 = 18.0;

/// Spawn z: far enough ahead to be unseen, a few seconds from the player
pub const SPAWN_DISTANCE: f32 = -60.0;

/// Past this z the collectible is behind the camera and gets reaped
pub const DESPAWN_Z: f32 = 8.0;

/// Live collectibles ahead of the player never exceed this
pub const MAX_AHEAD: usize = 3;

/// Minimum seconds between spawns for the probabilistic branch
pub const MIN_SPAWN_INTERVAL: f64 = 0.9;

/// After this long without a spawn, the next tick spawns regardless of the
/// random draw (the forced floor)
pub const FORCED_SPAWN_INTERVAL: f64 = 3.0;

/// Per-tick spawn probability once the minimum interval has elapsed
pub const SPAWN_CHANCE: f32 = 0.04;

const PLAYER_HALF_SIZE: f32 = 0.8;
const CAPTURE_MARGIN: f32 = 0.5;

/// Pickup when the player is closer than this (player half-size + margin)
pub const CAPTURE_RADIUS: f32 = PLAYER_HALF_SIZE + CAPTURE_MARGIN;

/// Hover height the bob oscillates around
pub const FLOAT_BASE_Y: f32 = 1.0;
const FLOAT_AMPLITUDE: f32 = 0.35;
const FLOAT_FREQUENCY: f32 = 1.6;

/// Fast xorshift PRNG (no external deps, deterministic - seedable for tests)
pub struct GameRng {
    state: u32,
}

impl GameRng {
    pub fn new(seed: u32) -> Self {
        // xorshift has a fixed point at zero
        Self {
            state: seed.max(1),
        }
    }

    fn next_random(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Random float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_random() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform index in 0..n (n must be > 0)
    pub fn index(&mut self, n: usize) -> usize {
        self.next_random() as usize % n
    }

    /// Bernoulli draw
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

/// Cosmetic shape family. Gameplay never branches on it; the per-variant
/// animation is the pure `spin` function below, dispatched by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeVariant {
    Cassette,
    Crystal,
    Disc,
    Pyramid,
}

impl ShapeVariant {
    pub const ALL: [ShapeVariant; 4] = [
        ShapeVariant::Cassette,
        ShapeVariant::Crystal,
        ShapeVariant::Disc,
        ShapeVariant::Pyramid,
    ];

    /// Self-rotation for this variant at the given elapsed time (radians)
    pub fn spin(self, elapsed: f32) -> f32 {
        let rate = match self {
            ShapeVariant::Cassette => 0.9,
            ShapeVariant::Crystal => 1.4,
            ShapeVariant::Disc => 2.2,
            ShapeVariant::Pyramid => 0.6,
        };
        elapsed * rate
    }
}

/// Identity of a live collectible. Monotonic, never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectibleId(pub u32);

/// A live, mobile pickup bound to one Fact.
pub struct Collectible {
    pub id: CollectibleId,
    pub lane: usize,
    /// x from the lane table, y = floating bob, z forward distance
    /// (negative = ahead of the player, increasing toward the camera)
    pub position: Vec3,
    /// Bound at spawn, never reassigned
    pub fact: Fact,
    pub variant: ShapeVariant,
    /// Bob phase offset so same-lane collectibles don't move in lockstep
    phase: f32,
}

/// The set of live collectibles plus the spawn machinery.
pub struct CollectibleField {
    live: Vec<Collectible>,
    next_id: u32,
    rng: GameRng,
}

impl CollectibleField {
    pub fn new(seed: u32) -> Self {
        Self {
            live: Vec::new(),
            next_id: 0,
            rng: GameRng::new(seed),
        }
    }

    pub fn live(&self) -> &[Collectible] {
        &self.live
    }

    /// Live collectibles still ahead of the player
    pub fn ahead_count(&self) -> usize {
        self.live.iter().filter(|c| c.position.z < 0.0).count()
    }

    /// Remove everything (gameplay refresh)
    pub fn clear(&mut self) {
        self.live.clear();
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Spawn cadence: spawn when EITHER the forced-floor interval has been
    /// exceeded (bypassing the random draw), OR the minimum interval has
    /// elapsed and the per-tick draw succeeds. The live cap gates both
    /// branches. Returns the new id, or None when nothing spawned.
    pub fn maybe_spawn(
        &mut self,
        facts: &FactLibrary,
        last_shown: Option<&str>,
        now: f64,
        last_spawn_time: f64,
    ) -> Option<CollectibleId> {
        if self.ahead_count() >= MAX_AHEAD {
            return None;
        }
        let since = now - last_spawn_time;
        if since >= FORCED_SPAWN_INTERVAL
            || (since >= MIN_SPAWN_INTERVAL && self.rng.chance(SPAWN_CHANCE))
        {
            self.spawn(facts, last_shown)
        } else {
            None
        }
    }

    /// Create one collectible: pick an origin (~50/50 once both pools have
    /// data), draw a fact with the anti-repeat resample, pick a random lane,
    /// and place it at the spawn distance.
    ///
    /// Silent no-op when no facts are available from either origin - the
    /// provider may simply not have responded yet.
    pub fn spawn(&mut self, facts: &FactLibrary, last_shown: Option<&str>) -> Option<CollectibleId> {
        let pool = match (facts.profile().is_empty(), facts.projects().is_empty()) {
            (true, true) => return None,
            (false, true) => facts.profile(),
            (true, false) => facts.projects(),
            (false, false) => {
                if self.rng.chance(0.5) {
                    facts.profile()
                } else {
                    facts.projects()
                }
            }
        };

        let fact = draw_fact(&mut self.rng, pool, last_shown).clone();
        let lane = self.rng.index(LANE_X.len());
        let variant = ShapeVariant::ALL[self.rng.index(ShapeVariant::ALL.len())];

        let id = CollectibleId(self.next_id);
        self.next_id += 1;

        self.live.push(Collectible {
            id,
            lane,
            position: vec3(LANE_X[lane], FLOAT_BASE_Y, SPAWN_DISTANCE),
            fact,
            variant,
            phase: lane as f32 * 2.1 + (id.0 % 16) as f32 * 0.39,
        });
        Some(id)
    }

    // =========================================================================
    // Per-tick motion
    // =========================================================================

    /// Advance every live collectible toward the camera and update its bob.
    ///
    /// Per-entity isolation: an entity whose update produced a non-finite
    /// position is logged and evicted; the rest of the batch continues.
    /// Returns the number of evicted entities.
    pub fn advance(&mut self, delta_distance: f32, elapsed: f32) -> usize {
        let before = self.live.len();
        for c in &mut self.live {
            c.position.z += delta_distance;
            c.position.y =
                FLOAT_BASE_Y + FLOAT_AMPLITUDE * (elapsed * FLOAT_FREQUENCY + c.phase).sin();
        }
        self.live.retain(|c| {
            if c.position.is_finite() {
                true
            } else {
                eprintln!("evicting collectible {:?} after a bad update", c.id);
                false
            }
        });
        before - self.live.len()
    }

    /// Remove (without a reveal) everything that drifted behind the camera.
    pub fn reap_out_of_range(&mut self) -> usize {
        let before = self.live.len();
        self.live.retain(|c| c.position.z <= DESPAWN_Z);
        before - self.live.len()
    }

    /// Collect every collectible within the capture radius of the player.
    ///
    /// Removal from the live set and event emission are one operation, so a
    /// collectible can be reported at most once, ever.
    pub fn check_pickup(&mut self, player_pos: Vec3) -> Vec<Collectible> {
        let mut picked = Vec::new();
        let mut i = 0;
        while i < self.live.len() {
            if self.live[i].position.distance(player_pos) < CAPTURE_RADIUS {
                picked.push(self.live.remove(i));
            } else {
                i += 1;
            }
        }
        picked
    }
}

/// Uniform draw with one bounded anti-repeat resample: when the draw matches
/// the previously shown fact and another candidate exists, re-draw among the
/// other indices - a single resample that always lands elsewhere.
fn draw_fact<'a>(rng: &mut GameRng, pool: &'a [Fact], last_shown: Option<&str>) -> &'a Fact {
    let mut idx = rng.index(pool.len());
    if pool.len() > 1 && Some(pool[idx].name.as_str()) == last_shown {
        idx = (idx + 1 + rng.index(pool.len() - 1)) % pool.len();
    }
    &pool[idx]
}
