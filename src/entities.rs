/// All game entity types and play-field constants: pure data, no logic.

use rand::Rng;

// ── Play field ────────────────────────────────────────────────────────────────

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

/// Enemies whose lower edge reaches this far above the bottom end the game.
pub const GROUND_MARGIN: f32 = 100.0;

pub const POINTS_PER_KILL: u32 = 10;

pub const PLAYER_WIDTH: f32 = 60.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 15.0;
/// Distance between the player's top edge and the bottom of the field.
pub const PLAYER_BASELINE: f32 = 60.0;

pub const PROJECTILE_SPEED: f32 = 7.0;
pub const BOTTLE_WIDTH: f32 = 20.0;
pub const BOTTLE_HEIGHT: f32 = 30.0;

pub const ENEMY_WIDTH: f32 = 30.0;
pub const ENEMY_HEIGHT: f32 = 40.0;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in logical field pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive on every edge, the way a pointer lands on a button.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// The rectangle shared by the "Play Again" and "Next Level" buttons.
pub fn overlay_button_rect() -> Rect {
    Rect::new(
        FIELD_WIDTH / 2.0 - 100.0,
        FIELD_HEIGHT / 2.0 + 60.0,
        200.0,
        50.0,
    )
}

// ── Condiments ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condiment {
    Ketchup,
    Mustard,
}

impl Condiment {
    pub const ALL: [Condiment; 2] = [Condiment::Ketchup, Condiment::Mustard];

    /// Uniform draw over both variants.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Every enemy of the wave is gone; waiting for the "Next Level" button.
    WaveCleared,
    /// The formation reached the ground; waiting for "Play Again".
    GameOver,
}

// ── Player, projectiles, enemies ─────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Player {
    /// A player centred on the bottom of the field.
    pub fn spawn() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0,
            y: FIELD_HEIGHT - PLAYER_BASELINE,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A condiment bottle in flight. `x` is the bottle's horizontal centre and
/// `y` its bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub condiment: Condiment,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x - BOTTLE_WIDTH / 2.0,
            self.y - BOTTLE_HEIGHT,
            BOTTLE_WIDTH,
            BOTTLE_HEIGHT,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub condiment: Condiment,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Frame output ──────────────────────────────────────────────────────────────

/// Something that happened during a session update. The frame driver turns
/// these into audio cues and score display updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Shot,
    EnemyDestroyed { score: u32 },
    WaveCleared,
    GameOver,
}

/// Held-key commands for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}
