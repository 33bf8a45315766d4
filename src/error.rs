//! Ошибки генерации острова

use thiserror::Error;

/// Все ошибки, которые может вернуть генератор и слой запросов к карте.
#[derive(Error, Debug)]
pub enum IslandError {
    /// Недопустимые параметры генерации (обнаруживаются до начала генерации)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Случайный поиск проходимой клетки исчерпал лимит попыток.
    /// Означает вырожденную карту (например, сплошная вода).
    #[error("could not find a passable tile after {attempts} attempts")]
    NoPassableTileFound { attempts: u32 },

    /// На карте нет ни одной клетки суши
    #[error("map contains no land tiles")]
    NoLandTile,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to create image buffer")]
    ImageBuffer,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, IslandError>;
