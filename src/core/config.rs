//! Asset locations.
//!
//! Paths are relative to the served root (`dist/` under Trunk). Every field
//! has a default matching the shipped asset layout, so a partial JSON override
//! such as `{"stone": "assets/rock.png"}` is enough.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub rhb_sheet: String,
    pub rhb_image: String,
    pub tiles_sheet: String,
    pub tiles_image: String,
    pub background: String,
    pub stone: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            rhb_sheet: "assets/sprite_sheets/rhb.json".to_string(),
            rhb_image: "assets/sprite_sheets/rhb.png".to_string(),
            tiles_sheet: "assets/sprite_sheets/tiles.json".to_string(),
            tiles_image: "assets/sprite_sheets/tiles.png".to_string(),
            background: "assets/resized/freetileset/png/BG/BG.png".to_string(),
            stone: "assets/resized/freetileset/png/Object/Stone.png".to_string(),
        }
    }
}

impl AssetPaths {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(EngineError::Config)
    }

    /// Prefix every path with `base` (e.g. a CDN root).
    pub fn with_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return self;
        }
        for p in [
            &mut self.rhb_sheet,
            &mut self.rhb_image,
            &mut self.tiles_sheet,
            &mut self.tiles_image,
            &mut self.background,
            &mut self.stone,
        ] {
            *p = format!("{base}/{p}");
        }
        self
    }
}
