/// The 2D drawing surface the renderer paints onto.
///
/// Coordinates are logical field pixels; a surface is free to scale them onto
/// whatever it actually displays.

use crate::assets::Sprite;
use crate::entities::Rect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity, 0.0 transparent to 1.0 opaque.
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from `0xRRGGBB`.
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Composite `self` over an opaque `below`.
    pub fn over(self, below: Rgba) -> Rgba {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| (top as f32 * a + bottom as f32 * (1.0 - a)).round() as u8;
        Rgba::rgb(mix(self.r, below.r), mix(self.g, below.g), mix(self.b, below.b))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Glow drawn beneath filled rectangles while it is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f32,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DrawError {
    #[error("image has no pixels")]
    EmptyImage,
    #[error("destination {0:?} has no area")]
    EmptyDestination(Rect),
}

pub trait Surface {
    /// Logical (width, height).
    fn size(&self) -> (f32, f32);

    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f32);

    fn draw_image(&mut self, sprite: &Sprite, dest: Rect) -> Result<(), DrawError>;

    /// `y` is the text baseline, `size` the font height in logical pixels.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba, align: TextAlign);

    fn set_shadow(&mut self, shadow: Option<Shadow>);

    /// Push the finished frame to the display.
    fn present(&mut self) -> std::io::Result<()>;
}

/// External score readout, updated after every kill.
pub trait ScoreSink {
    fn show_score(&mut self, score: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        assert_eq!(Rgba::hex(0xFFD700), Rgba::rgb(255, 215, 0));
    }

    #[test]
    fn translucent_black_darkens() {
        let dim = Rgba::rgba(0, 0, 0, 0.5).over(Rgba::rgb(255, 255, 255));
        assert_eq!(dim, Rgba::rgb(128, 128, 128));
    }
}
