/// The game session state machine.
///
/// A `Session` owns the player, the projectile in flight, the enemy
/// formation, the score and the wave counter. `update` is the only place the
/// simulation advances; it reports what happened as [`GameEvent`]s so the
/// caller decides how to sound and display them. All randomness comes from
/// the session's own RNG, so a seeded session replays identically.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::info;

use crate::collision::overlaps;
use crate::entities::{
    Condiment, GameEvent, GameStatus, InputState, Player, Projectile, BOTTLE_HEIGHT, FIELD_HEIGHT,
    FIELD_WIDTH, GROUND_MARGIN, POINTS_PER_KILL, PROJECTILE_SPEED,
};
use crate::formation::Formation;

pub struct Session {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub formation: Formation,
    pub score: u32,
    pub wave: u32,
    pub status: GameStatus,
    rng: StdRng,
}

impl Session {
    /// Build a session with wave 1 already spawned.
    pub fn new(rng: StdRng) -> Self {
        let mut session = Self {
            player: Player::spawn(),
            projectiles: Vec::new(),
            formation: Formation::new(),
            score: 0,
            wave: 1,
            status: GameStatus::Playing,
            rng,
        };
        session.formation.spawn_wave(session.wave, &mut session.rng);
        session
    }

    // ── Terminal-state flags ──────────────────────────────────────────────────

    pub fn game_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn show_restart_button(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn show_next_level_button(&self) -> bool {
        self.status == GameStatus::WaveCleared
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Launch a bottle from the player's centre. Ignored while another bottle
    /// is still in flight or the session is not playing.
    pub fn shoot(&mut self) -> Option<GameEvent> {
        if self.status != GameStatus::Playing || !self.projectiles.is_empty() {
            return None;
        }
        self.projectiles.push(Projectile {
            x: self.player.x + self.player.width / 2.0,
            y: self.player.y,
            speed: PROJECTILE_SPEED,
            condiment: Condiment::random(&mut self.rng),
        });
        Some(GameEvent::Shot)
    }

    /// Advance the simulation by one frame.
    pub fn update(&mut self, input: InputState, now_ms: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status != GameStatus::Playing {
            return events;
        }

        // ── 1. Player ────────────────────────────────────────────────────────
        let max_x = FIELD_WIDTH - self.player.width;
        if input.left {
            self.player.x = (self.player.x - self.player.speed).max(0.0);
        }
        if input.right {
            self.player.x = (self.player.x + self.player.speed).min(max_x);
        }

        // ── 2. Shooting ──────────────────────────────────────────────────────
        if input.shoot {
            events.extend(self.shoot());
        }

        // ── 3. Formation ─────────────────────────────────────────────────────
        self.formation.tick(now_ms);

        // ── 4. Projectiles ↔ enemies ─────────────────────────────────────────
        let enemies = &mut self.formation.enemies;
        let score = &mut self.score;
        self.projectiles.retain_mut(|proj| {
            proj.y -= proj.speed;

            let bounds = proj.rect();
            if let Some(hit) = enemies.iter().position(|e| overlaps(bounds, e.rect())) {
                enemies.remove(hit);
                *score += POINTS_PER_KILL;
                events.push(GameEvent::EnemyDestroyed { score: *score });
                return false;
            }

            proj.y > -BOTTLE_HEIGHT
        });

        // ── 5. Win / loss ────────────────────────────────────────────────────
        let ground = FIELD_HEIGHT - GROUND_MARGIN;
        if self.formation.enemies.iter().any(|e| e.y + e.height >= ground) {
            self.status = GameStatus::GameOver;
            info!(score = self.score, wave = self.wave, "game over");
            events.push(GameEvent::GameOver);
        } else if self.formation.is_empty() {
            self.status = GameStatus::WaveCleared;
            info!(score = self.score, wave = self.wave, "wave cleared");
            events.push(GameEvent::WaveCleared);
        }

        events
    }

    /// Move on to the next wave. Only valid once the current wave is cleared.
    pub fn advance_level(&mut self) {
        if self.status != GameStatus::WaveCleared {
            return;
        }
        self.wave = self.wave.saturating_add(1);
        self.begin_wave();
        info!(wave = self.wave, score = self.score, "advanced to next level");
    }

    /// Start over from wave 1 with a zero score. Safe from any state.
    pub fn restart(&mut self) {
        self.score = 0;
        self.wave = 1;
        self.begin_wave();
        info!("session restarted");
    }

    fn begin_wave(&mut self) {
        self.projectiles.clear();
        self.player = Player::spawn();
        self.formation.reset();
        self.formation.spawn_wave(self.wave, &mut self.rng);
        self.status = GameStatus::Playing;
    }

    /// Expose the RNG so collaborators (e.g. the background) share one seed.
    pub fn rng(&mut self) -> &mut impl Rng {
        &mut self.rng
    }
}
