/// Rendering layer: turns session state into surface draw calls.
///
/// No game logic is performed here. Sprites are used when their asset has
/// decoded; everything else is drawn as procedural shapes that cannot fail.

use rand::Rng;
use tracing::debug;

use crate::assets::{AssetId, Assets};
use crate::compute::Session;
use crate::entities::{
    overlay_button_rect, Condiment, Enemy, GameStatus, Player, Projectile, Rect, BOTTLE_WIDTH,
    FIELD_HEIGHT, FIELD_WIDTH, GROUND_MARGIN,
};
use crate::surface::{Rgba, Shadow, Surface, TextAlign};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BLANKET_PINK: Rgba = Rgba::hex(0xFFB6C1);
const C_BLANKET_WHITE: Rgba = Rgba::hex(0xFFFFFF);
const C_GRASS: Rgba = Rgba::hex(0x90EE90);
const C_GRASS_BLADE: Rgba = Rgba::hex(0x228B22);
const C_BUN: Rgba = Rgba::hex(0xDEB887);
const C_SAUSAGE: Rgba = Rgba::hex(0x8B4513);
const C_GRILL: Rgba = Rgba::hex(0x654321);
const C_KETCHUP: Rgba = Rgba::hex(0xFF0000);
const C_MUSTARD: Rgba = Rgba::hex(0xFFD700);
const C_CAP: Rgba = Rgba::hex(0x8B4513);
const C_LABEL: Rgba = Rgba::hex(0xFFFFFF);
const C_BOTTLE_OUTLINE: Rgba = Rgba::hex(0x333333);
const C_ENEMY_OUTLINE: Rgba = Rgba::hex(0x000000);
const C_DIM: Rgba = Rgba::rgba(0, 0, 0, 0.7);
const C_TEXT: Rgba = Rgba::hex(0xFFFFFF);
const C_RESTART: Rgba = Rgba::hex(0x4CAF50);
const C_RESTART_BORDER: Rgba = Rgba::hex(0x2E7D32);
const C_NEXT_LEVEL: Rgba = Rgba::hex(0xFF6B35);
const C_NEXT_LEVEL_BORDER: Rgba = Rgba::hex(0xE55A2B);

const TILE_SIZE: f32 = 40.0;
const GRASS_BLADES: usize = 50;

pub fn condiment_color(condiment: Condiment) -> Rgba {
    match condiment {
        Condiment::Ketchup => C_KETCHUP,
        Condiment::Mustard => C_MUSTARD,
    }
}

/// Draws the picnic scene. Holds the grass blade layout so the background
/// stays still from frame to frame.
pub struct Renderer {
    grass_blades: Vec<Rect>,
}

impl Renderer {
    pub fn new(rng: &mut impl Rng) -> Self {
        let grass_blades = (0..GRASS_BLADES)
            .map(|_| {
                Rect::new(
                    rng.gen_range(0.0..FIELD_WIDTH),
                    FIELD_HEIGHT - rng.gen_range(0.0..GROUND_MARGIN),
                    1.0,
                    rng.gen_range(0.0..10.0),
                )
            })
            .collect();
        Self { grass_blades }
    }

    // ── Background ────────────────────────────────────────────────────────────

    pub fn draw_background(&self, surface: &mut dyn Surface) {
        let (width, height) = surface.size();

        // Checkered picnic blanket
        let cols = (width / TILE_SIZE).ceil() as usize;
        let rows = (height / TILE_SIZE).ceil() as usize;
        for col in 0..cols {
            for row in 0..rows {
                let color = if (col + row) % 2 == 0 { C_BLANKET_PINK } else { C_BLANKET_WHITE };
                surface.fill_rect(
                    Rect::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE),
                    color,
                );
            }
        }

        // Grass strip along the bottom
        surface.fill_rect(Rect::new(0.0, height - GROUND_MARGIN, width, GROUND_MARGIN), C_GRASS);
        for blade in &self.grass_blades {
            surface.fill_rect(*blade, C_GRASS_BLADE);
        }
    }

    // ── Entities ──────────────────────────────────────────────────────────────

    /// Player, projectiles, then enemies.
    pub fn draw_entities(&self, surface: &mut dyn Surface, session: &Session, assets: &Assets) {
        draw_player(surface, &session.player, assets);
        for proj in &session.projectiles {
            draw_projectile(surface, proj);
        }
        for enemy in &session.formation.enemies {
            draw_enemy(surface, enemy, assets);
        }
    }

    // ── Terminal-state overlays ───────────────────────────────────────────────

    pub fn draw_overlay(&self, surface: &mut dyn Surface, session: &Session) {
        let (title, line1, line2) = match session.status {
            GameStatus::Playing => return,
            GameStatus::WaveCleared => (
                "Level Cleared!",
                format!("Score: {}", session.score),
                format!("Level {} Complete", session.wave),
            ),
            GameStatus::GameOver => (
                "Game Over!",
                format!("Final Score: {}", session.score),
                format!("Level Reached: {}", session.wave),
            ),
        };

        let (width, height) = surface.size();
        surface.fill_rect(Rect::new(0.0, 0.0, width, height), C_DIM);

        let cx = width / 2.0;
        let cy = height / 2.0;
        surface.draw_text(title, cx, cy - 20.0, 48.0, C_TEXT, TextAlign::Center);
        surface.draw_text(&line1, cx, cy + 20.0, 24.0, C_TEXT, TextAlign::Center);
        surface.draw_text(&line2, cx, cy + 50.0, 24.0, C_TEXT, TextAlign::Center);

        if session.show_next_level_button() {
            draw_button(surface, "Next Level", C_NEXT_LEVEL, C_NEXT_LEVEL_BORDER);
        } else if session.show_restart_button() {
            draw_button(surface, "Play Again", C_RESTART, C_RESTART_BORDER);
        }
    }
}

fn draw_button(surface: &mut dyn Surface, label: &str, fill: Rgba, border: Rgba) {
    let rect = overlay_button_rect();
    surface.fill_rect(rect, fill);
    surface.stroke_rect(rect, border, 3.0);
    surface.draw_text(label, rect.x + rect.width / 2.0, rect.y + 32.0, 20.0, C_TEXT, TextAlign::Center);
}

/// Draw the asset for `id` into `dest`; false means the caller should fall back.
fn try_draw_sprite(surface: &mut dyn Surface, assets: &Assets, id: AssetId, dest: Rect) -> bool {
    let Some(sprite) = assets.sprite(id) else {
        return false;
    };
    match surface.draw_image(sprite, dest) {
        Ok(()) => true,
        Err(err) => {
            debug!(asset = id.file_name(), error = %err, "sprite draw failed, using shape");
            false
        }
    }
}

fn draw_player(surface: &mut dyn Surface, player: &Player, assets: &Assets) {
    let rect = player.rect();
    if try_draw_sprite(surface, assets, AssetId::Hotdog, rect) {
        return;
    }

    // Bun, sausage and grill marks
    surface.fill_rect(rect, C_BUN);
    surface.stroke_rect(rect, C_SAUSAGE, 2.0);
    surface.fill_rect(
        Rect::new(rect.x + 5.0, rect.y + 5.0, rect.width - 10.0, rect.height - 10.0),
        C_SAUSAGE,
    );
    for i in 0..3 {
        let x = rect.x + 10.0 + i as f32 * 15.0;
        surface.fill_rect(Rect::new(x, rect.y + 8.0, 1.0, rect.height - 16.0), C_GRILL);
    }
}

fn draw_projectile(surface: &mut dyn Surface, proj: &Projectile) {
    let body = proj.rect();
    let color = condiment_color(proj.condiment);

    surface.fill_rect(body, color);
    surface.stroke_rect(body, C_BOTTLE_OUTLINE, 2.0);

    let cap = Rect::new(body.x + 5.0, body.y - 5.0, 10.0, 5.0);
    surface.fill_rect(cap, C_CAP);
    surface.stroke_rect(cap, C_BOTTLE_OUTLINE, 2.0);

    surface.fill_rect(Rect::new(body.x + 2.0, body.y + 5.0, BOTTLE_WIDTH - 4.0, 8.0), C_LABEL);

    // Glow so the bottle reads against the blanket
    surface.set_shadow(Some(Shadow { color, blur: 8.0 }));
    surface.fill_rect(body, color);
    surface.set_shadow(None);
}

fn draw_enemy(surface: &mut dyn Surface, enemy: &Enemy, assets: &Assets) {
    let rect = enemy.rect();
    if try_draw_sprite(surface, assets, AssetId::for_condiment(enemy.condiment), rect) {
        return;
    }

    surface.fill_rect(rect, condiment_color(enemy.condiment));
    surface.stroke_rect(rect, C_ENEMY_OUTLINE, 2.0);

    let cap = Rect::new(rect.x + 10.0, rect.y - 5.0, 10.0, 5.0);
    surface.fill_rect(cap, C_CAP);
    surface.stroke_rect(cap, C_ENEMY_OUTLINE, 2.0);

    surface.fill_rect(Rect::new(rect.x + 5.0, rect.y + 8.0, rect.width - 10.0, 8.0), C_LABEL);
}
