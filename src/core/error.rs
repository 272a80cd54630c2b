//! Engine error types.

use thiserror::Error;

/// Errors raised while loading or running a game.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Sprite-sheet JSON could not be parsed.
    #[error("sprite sheet is not valid JSON: {0}")]
    SheetParse(#[from] serde_json::Error),

    /// Asset-path config JSON could not be parsed.
    #[error("asset config is not valid JSON: {0}")]
    Config(serde_json::Error),

    /// A frame name was not present in a sprite sheet.
    #[error("cell not found in sprite sheet: {0}")]
    MissingCell(String),

    /// An image or JSON asset failed to load.
    #[error("failed to load asset {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    /// `initialize` was called on a game that is already loaded.
    #[error("game is already initialized")]
    AlreadyInitialized,

    /// A browser API threw or returned an unexpected value.
    #[error("browser: {0}")]
    Browser(String),
}

impl EngineError {
    pub fn asset_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::AssetLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
