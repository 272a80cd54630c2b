//! TexturePacker sprite-sheet metadata.
//!
//! Only the fields the game reads are modelled; everything else in the JSON
//! (`rotated`, `trimmed`, `meta`, ...) is ignored.

use hashbrown::HashMap;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SheetRect {
    pub x: i16,
    pub y: i16,
    pub w: i16,
    pub h: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub frame: SheetRect,
    /// Offset of the trimmed frame inside the untrimmed sprite.
    #[serde(default)]
    pub sprite_source_size: SheetRect,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sheet {
    pub frames: HashMap<String, Cell>,
}

impl Sheet {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.frames.get(name)
    }

    pub fn require(&self, name: &str) -> EngineResult<&Cell> {
        self.cell(name)
            .ok_or_else(|| EngineError::MissingCell(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
