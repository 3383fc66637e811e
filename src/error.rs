/// Errors that stop the game from starting.
///
/// Everything that can go wrong once the loop is running (missing sprites, no
/// audio device, a sprite that will not draw) is recovered from locally and
/// only logged.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// The terminal cannot host the play field.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
