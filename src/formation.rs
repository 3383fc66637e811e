/// The enemy grid: spawning, lockstep sweep-and-descend movement and the
/// per-wave speed curve.

use rand::Rng;
use tracing::info;

use crate::entities::{Condiment, Enemy, ENEMY_HEIGHT, ENEMY_WIDTH, FIELD_WIDTH};

// ── Layout ────────────────────────────────────────────────────────────────────

pub const GRID_ROWS: usize = 4;
pub const GRID_COLS: usize = 6;
pub const GRID_SPACING_X: f32 = 80.0;
pub const GRID_SPACING_Y: f32 = 60.0;
pub const GRID_TOP: f32 = 50.0;

pub const STEP_X: f32 = 20.0;
pub const STEP_Y: f32 = 30.0;
/// Distance from each side wall that turns the formation around.
pub const SIDE_MARGIN: f32 = 20.0;

// ── Difficulty curve ──────────────────────────────────────────────────────────

pub const BASE_STEP_INTERVAL_MS: f64 = 180.0;
pub const STEP_INTERVAL_DECAY: f64 = 0.975;
pub const MIN_STEP_INTERVAL_MS: f64 = 40.0;

/// Milliseconds between formation steps for a wave (waves start at 1).
pub fn step_interval_for_wave(wave: u32) -> f64 {
    let exponent = i32::try_from(wave.saturating_sub(1)).unwrap_or(i32::MAX);
    (BASE_STEP_INTERVAL_MS * STEP_INTERVAL_DECAY.powi(exponent)).max(MIN_STEP_INTERVAL_MS)
}

/// What a call to [`Formation::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationStep {
    /// The step interval has not elapsed yet.
    Waiting,
    Sideways,
    /// A member hit the side margin: the whole grid dropped and turned.
    Descended,
}

#[derive(Clone, Debug)]
pub struct Formation {
    pub enemies: Vec<Enemy>,
    /// +1 moving right, -1 moving left.
    pub direction: f32,
    pub step_interval_ms: f64,
    pub step_x: f32,
    pub step_y: f32,
    pub last_move_ms: u64,
}

impl Default for Formation {
    fn default() -> Self {
        Self::new()
    }
}

impl Formation {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            direction: 1.0,
            step_interval_ms: BASE_STEP_INTERVAL_MS,
            step_x: STEP_X,
            step_y: STEP_Y,
            last_move_ms: 0,
        }
    }

    /// Back to the state of a freshly built formation, with no enemies.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replace the grid with a fresh, horizontally centred wave.
    pub fn spawn_wave(&mut self, wave: u32, rng: &mut impl Rng) {
        self.enemies.clear();
        self.step_interval_ms = step_interval_for_wave(wave);
        self.direction = 1.0;

        let start_x = (FIELD_WIDTH - GRID_COLS as f32 * GRID_SPACING_X) / 2.0;
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                self.enemies.push(Enemy {
                    x: start_x + col as f32 * GRID_SPACING_X,
                    y: GRID_TOP + row as f32 * GRID_SPACING_Y,
                    width: ENEMY_WIDTH,
                    height: ENEMY_HEIGHT,
                    condiment: Condiment::random(rng),
                });
            }
        }

        info!(
            wave,
            enemies = self.enemies.len(),
            step_interval_ms = self.step_interval_ms,
            "spawned wave"
        );
    }

    /// Advance the formation if its step interval has elapsed.
    ///
    /// The boundary check runs before anything moves: the first member found
    /// at the leading margin makes the whole grid descend one row and turn
    /// around instead of stepping sideways.
    pub fn tick(&mut self, now_ms: u64) -> FormationStep {
        let elapsed = now_ms.saturating_sub(self.last_move_ms) as f64;
        if elapsed < self.step_interval_ms {
            return FormationStep::Waiting;
        }
        self.last_move_ms = now_ms;

        let direction = self.direction;
        let at_edge = self.enemies.iter().any(|e| {
            if direction > 0.0 {
                e.x + e.width >= FIELD_WIDTH - SIDE_MARGIN
            } else {
                e.x <= SIDE_MARGIN
            }
        });

        if at_edge {
            for enemy in &mut self.enemies {
                enemy.y += self.step_y;
            }
            self.direction = -self.direction;
            FormationStep::Descended
        } else {
            let dx = self.direction * self.step_x;
            for enemy in &mut self.enemies {
                enemy.x += dx;
            }
            FormationStep::Sideways
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_wave_uses_base_interval() {
        assert_eq!(step_interval_for_wave(1), BASE_STEP_INTERVAL_MS);
    }

    #[test]
    fn tick_waits_for_interval() {
        let mut f = Formation::new();
        f.spawn_wave(1, &mut StdRng::seed_from_u64(1));
        let before = f.enemies[0].x;
        assert_eq!(f.tick(179), FormationStep::Waiting);
        assert_eq!(f.enemies[0].x, before);
        assert_eq!(f.tick(180), FormationStep::Sideways);
        assert_eq!(f.enemies[0].x, before + STEP_X);
    }

    #[test]
    fn empty_formation_still_steps() {
        let mut f = Formation::new();
        assert_eq!(f.tick(1_000), FormationStep::Sideways);
        assert_eq!(f.last_move_ms, 1_000);
    }
}
