/// Sprite assets: the text sprite format and the background loader.
///
/// Each asset is decoded on its own thread and reported back over a channel.
/// The frame loop polls that channel once per frame and never waits on it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{info, warn};

use crate::entities::Condiment;
use crate::surface::Rgba;

/// Character that marks a transparent pixel.
const TRANSPARENT: char = '.';

// ── Sprite ────────────────────────────────────────────────────────────────────

/// A decoded image: rows of optional colours, `None` being transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Option<Rgba>>,
}

impl Sprite {
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        self.pixels.get(y * self.width + x).copied().flatten()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("could not read asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Decode { line: usize, reason: String },
}

fn decode_error(line: usize, reason: impl Into<String>) -> AssetError {
    AssetError::Decode { line, reason: reason.into() }
}

/// Decode the text sprite format.
///
/// ```text
/// # comment
/// R=#FF0000
/// ..RR..
/// .RRRR.
/// ```
///
/// `c=#RRGGBB` binds a palette character, every other non-blank line is a
/// pixel row and `.` is transparent.
pub fn decode_sprite(source: &str) -> Result<Sprite, AssetError> {
    let mut palette: HashMap<char, Rgba> = HashMap::new();
    let mut rows: Vec<(usize, &str)> = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(decode_error(line_no, format!("palette key {key:?} is not one character")));
            };
            if c == TRANSPARENT {
                return Err(decode_error(line_no, "'.' is reserved for transparency"));
            }
            palette.insert(c, parse_hex(value.trim()).ok_or_else(|| {
                decode_error(line_no, format!("bad colour {value:?}"))
            })?);
            continue;
        }
        rows.push((line_no, line));
    }

    let Some(&(_, first)) = rows.first() else {
        return Err(decode_error(source.lines().count().max(1), "no pixel rows"));
    };
    let width = first.chars().count();

    let mut pixels = Vec::with_capacity(width * rows.len());
    for &(line_no, row) in &rows {
        if row.chars().count() != width {
            return Err(decode_error(line_no, format!("row is not {width} pixels wide")));
        }
        for c in row.chars() {
            if c == TRANSPARENT {
                pixels.push(None);
            } else {
                let colour = palette
                    .get(&c)
                    .ok_or_else(|| decode_error(line_no, format!("unknown palette character {c:?}")))?;
                pixels.push(Some(*colour));
            }
        }
    }

    Ok(Sprite { width, height: rows.len(), pixels })
}

fn parse_hex(value: &str) -> Option<Rgba> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(Rgba::hex)
}

pub fn load_sprite(path: &Path) -> Result<Sprite, AssetError> {
    let source = std::fs::read_to_string(path)?;
    decode_sprite(&source)
}

// ── Asset store ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    Hotdog,
    Ketchup,
    Mustard,
}

impl AssetId {
    pub const ALL: [AssetId; 3] = [AssetId::Hotdog, AssetId::Ketchup, AssetId::Mustard];

    pub fn file_name(self) -> &'static str {
        match self {
            AssetId::Hotdog => "hotdog.sprite",
            AssetId::Ketchup => "ketchup.sprite",
            AssetId::Mustard => "mustard.sprite",
        }
    }

    pub fn for_condiment(condiment: Condiment) -> Self {
        match condiment {
            Condiment::Ketchup => AssetId::Ketchup,
            Condiment::Mustard => AssetId::Mustard,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AssetState {
    Pending,
    Ready(Sprite),
    Failed,
}

pub struct Assets {
    states: HashMap<AssetId, AssetState>,
    rx: Option<Receiver<(AssetId, Result<Sprite, AssetError>)>>,
}

impl Assets {
    /// Start loading every asset from `dir` in the background.
    pub fn load_from(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let (tx, rx) = mpsc::channel();
        for id in AssetId::ALL {
            let tx = tx.clone();
            let path = dir.join(id.file_name());
            thread::spawn(move || {
                // The store may be gone by the time decoding finishes.
                let _ = tx.send((id, load_sprite(&path)));
            });
        }
        Self {
            states: AssetId::ALL.iter().map(|&id| (id, AssetState::Pending)).collect(),
            rx: Some(rx),
        }
    }

    /// A store whose assets all failed, so the renderer always falls back.
    pub fn unavailable() -> Self {
        Self {
            states: AssetId::ALL.iter().map(|&id| (id, AssetState::Failed)).collect(),
            rx: None,
        }
    }

    /// A store with already-decoded sprites; missing ids count as failed.
    pub fn preloaded(sprites: impl IntoIterator<Item = (AssetId, Sprite)>) -> Self {
        let mut store = Self::unavailable();
        for (id, sprite) in sprites {
            store.states.insert(id, AssetState::Ready(sprite));
        }
        store
    }

    /// Drain finished loads without blocking.
    pub fn poll(&mut self) {
        let Some(rx) = &self.rx else { return };
        loop {
            match rx.try_recv() {
                Ok((id, Ok(sprite))) => {
                    info!(asset = id.file_name(), "asset ready");
                    self.states.insert(id, AssetState::Ready(sprite));
                }
                Ok((id, Err(err))) => {
                    warn!(asset = id.file_name(), error = %err, "asset failed, using fallback shapes");
                    self.states.insert(id, AssetState::Failed);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    for state in self.states.values_mut() {
                        if *state == AssetState::Pending {
                            *state = AssetState::Failed;
                        }
                    }
                    self.rx = None;
                    break;
                }
            }
        }
    }

    /// True once every asset is either ready or failed.
    pub fn settled(&self) -> bool {
        self.states.values().all(|s| *s != AssetState::Pending)
    }

    pub fn state(&self, id: AssetId) -> &AssetState {
        static MISSING: AssetState = AssetState::Failed;
        self.states.get(&id).unwrap_or(&MISSING)
    }

    /// The sprite to draw for `id`, if the whole set has settled and this one
    /// decoded.
    pub fn sprite(&self, id: AssetId) -> Option<&Sprite> {
        if !self.settled() {
            return None;
        }
        match self.state(id) {
            AssetState::Ready(sprite) => Some(sprite),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTTLE: &str = "\
# tiny bottle
R=#FF0000
W=#FFFFFF
.R.
RWR
";

    #[test]
    fn decodes_palette_and_transparency() {
        let sprite = decode_sprite(BOTTLE).unwrap();
        assert_eq!((sprite.width, sprite.height), (3, 2));
        assert_eq!(sprite.pixel(0, 0), None);
        assert_eq!(sprite.pixel(1, 0), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(sprite.pixel(1, 1), Some(Rgba::rgb(255, 255, 255)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = decode_sprite("R=#FF0000\nRR\nR\n").unwrap_err();
        assert!(matches!(err, AssetError::Decode { line: 3, .. }));
    }

    #[test]
    fn unknown_character_is_rejected() {
        let err = decode_sprite("R=#FF0000\nRX\n").unwrap_err();
        assert!(matches!(err, AssetError::Decode { line: 2, .. }));
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(decode_sprite("R=#FF00\nR\n").is_err());
        assert!(decode_sprite("R=FF0000\nR\n").is_err());
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(decode_sprite("# nothing here\n").is_err());
    }

    #[test]
    fn missing_directory_settles_as_failed() {
        let mut assets = Assets::load_from("/definitely/not/a/real/dir");
        while !assets.settled() {
            assets.poll();
            std::thread::yield_now();
        }
        for id in AssetId::ALL {
            assert_eq!(*assets.state(id), AssetState::Failed);
        }
        assert!(assets.sprite(AssetId::Hotdog).is_none());
    }
}
