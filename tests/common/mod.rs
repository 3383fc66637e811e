#![allow(dead_code)]

use hotdog_game::assets::Sprite;
use hotdog_game::compute::Session;
use hotdog_game::entities::Rect;
use hotdog_game::surface::{DrawError, Rgba, ScoreSink, Shadow, Surface, TextAlign};

use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn seeded_session() -> Session {
    Session::new(StdRng::seed_from_u64(42))
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    Fill(Rect, Rgba),
    Stroke(Rect, Rgba),
    Image(Rect),
    Text(String),
    Shadow(Option<Shadow>),
    Present,
}

/// Records draw calls instead of drawing them.
#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub scores: Vec<u32>,
    /// Make every `draw_image` fail.
    pub broken_images: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fills_of(&self, rect: Rect) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Fill(r, _) if *r == rect))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (800.0, 600.0)
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.calls.push(DrawCall::Fill(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, _line_width: f32) {
        self.calls.push(DrawCall::Stroke(rect, color));
    }

    fn draw_image(&mut self, _sprite: &Sprite, dest: Rect) -> Result<(), DrawError> {
        if self.broken_images {
            return Err(DrawError::EmptyDestination(dest));
        }
        self.calls.push(DrawCall::Image(dest));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, _x: f32, _y: f32, _size: f32, _color: Rgba, _align: TextAlign) {
        self.calls.push(DrawCall::Text(text.to_string()));
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.calls.push(DrawCall::Shadow(shadow));
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.calls.push(DrawCall::Present);
        Ok(())
    }
}

impl ScoreSink for RecordingSurface {
    fn show_score(&mut self, score: u32) {
        self.scores.push(score);
    }
}

pub fn tiny_sprite() -> Sprite {
    Sprite {
        width: 1,
        height: 1,
        pixels: vec![Some(Rgba::rgb(1, 2, 3))],
    }
}
