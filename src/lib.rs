//! # walk_the_dog
//!
//! Platform-independent core of the "Walk the Dog" side-scroller.
//!
//! Everything in here is plain Rust: geometry, sprite-sheet metadata, keyboard
//! state, the fixed-timestep loop and the player state machine. The browser
//! shell (`walk_web`) plugs a canvas renderer and an asset loader into the
//! [`render::Renderer`] and [`engine::AssetLoader`] seams, which keeps the whole
//! game testable on native targets.
//!
//! ## Quick Start
//!
//! ```
//! use walk_the_dog::prelude::*;
//!
//! let mut guard = InitGuard::new();
//! let mut calls = 0;
//! guard.run(|| calls += 1);
//! guard.run(|| calls += 1);
//! assert_eq!(calls, 1);
//! ```
//!
//! ## Modules
//!
//! - [`once`]: run-once initializer guard used by the route component
//! - [`geometry`]: points and axis-aligned rectangles
//! - [`sheet`]: TexturePacker sprite-sheet metadata
//! - [`input`]: keyboard state fed from a channel
//! - [`render`]: the renderer seam plus a recording renderer
//! - [`engine`]: asset loading, the `Game` trait and the fixed-step loop
//! - [`red_hat_boy`]: the player and its typestate machine
//! - [`walk`]: the level (platform, stone, background)

#[path = "core/error.rs"]
pub mod error;

#[path = "core/once.rs"]
pub mod once;

#[path = "core/geometry.rs"]
pub mod geometry;

#[path = "core/sheet.rs"]
pub mod sheet;

#[path = "core/input.rs"]
pub mod input;

#[path = "core/render.rs"]
pub mod render;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/engine.rs"]
pub mod engine;

#[path = "core/red_hat_boy.rs"]
pub mod red_hat_boy;

#[path = "core/walk.rs"]
pub mod walk;

pub use error::{EngineError, EngineResult};

/// Canvas width in pixels.
pub const WIDTH: i16 = 1200;
/// Canvas height in pixels.
pub const HEIGHT: i16 = 600;

/// Prelude module for convenient imports.
///
/// ```
/// use walk_the_dog::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::AssetPaths;
    pub use crate::engine::{AssetLoader, Game, GameLoop, Image, FRAME_SIZE};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::geometry::{Point, Rect};
    pub use crate::input::{process_input, KeyPress, KeyState};
    pub use crate::once::InitGuard;
    pub use crate::render::{DrawCommand, ImageHandle, RecordingRenderer, Renderer};
    pub use crate::sheet::{Cell, Sheet, SheetRect};
    pub use crate::walk::{Walk, WalkTheDog};
    pub use crate::{HEIGHT, WIDTH};
}
