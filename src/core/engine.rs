//! Asset loading, the `Game` trait and the fixed-timestep loop.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::geometry::{Point, Rect};
use crate::input::KeyState;
use crate::render::{ImageHandle, Renderer};
use crate::sheet::Sheet;

/// Length of one simulation step in milliseconds (60 updates per second).
pub const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;

/// Source of images and JSON for a game.
///
/// Futures are `?Send`: in the browser they run on the single UI thread via
/// `spawn_local`.
#[async_trait(?Send)]
pub trait AssetLoader {
    type Image: ImageHandle;

    async fn load_image(&self, source: &str) -> EngineResult<Self::Image>;

    /// Fetch a JSON document as text.
    async fn fetch_json(&self, path: &str) -> EngineResult<String>;

    async fn load_sheet(&self, path: &str) -> EngineResult<Sheet> {
        let json = self.fetch_json(path).await?;
        Sheet::from_json(&json)
    }
}

#[async_trait(?Send)]
pub trait Game: Sized {
    type Image: ImageHandle;

    /// Load assets and return the playable game.
    async fn initialize<L>(&self, loader: &L) -> EngineResult<Self>
    where
        L: AssetLoader<Image = Self::Image> + ?Sized;

    /// Advance the simulation by one fixed step.
    fn update(&mut self, keystate: &KeyState);

    fn draw<R: Renderer<Image = Self::Image>>(&self, renderer: &R);
}

/// A static sprite drawn whole at a fixed position.
#[derive(Debug, Clone)]
pub struct Image<I> {
    element: I,
    position: Point,
    bounding_box: Rect,
}

impl<I: ImageHandle> Image<I> {
    pub fn new(element: I, position: Point) -> Self {
        let bounding_box = Rect::new(position, element.width(), element.height());
        Self {
            element,
            position,
            bounding_box,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn bounding_box(&self) -> &Rect {
        &self.bounding_box
    }

    pub fn draw<R: Renderer<Image = I>>(&self, renderer: &R) {
        let frame = Rect::new_from_x_y(0, 0, self.element.width(), self.element.height());
        renderer.draw_image(&self.element, &frame, &self.bounding_box);
    }
}

/// Fixed-timestep accumulator.
///
/// Each animation frame adds the elapsed wall time; whole `FRAME_SIZE` steps
/// are spent on `update`, the remainder carries over, and the game is drawn
/// once per frame regardless of how many steps ran.
#[derive(Debug, Clone, Copy)]
pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

impl GameLoop {
    /// `now` is a monotonic timestamp in milliseconds (`performance.now()`).
    pub fn new(now: f64) -> Self {
        Self {
            last_frame: now,
            accumulated_delta: 0.0,
        }
    }

    pub fn accumulated_delta(&self) -> f32 {
        self.accumulated_delta
    }

    /// Run the updates owed since the previous frame, then draw.
    ///
    /// Returns the number of `update` calls made.
    pub fn frame<G, R>(&mut self, now: f64, game: &mut G, keystate: &KeyState, renderer: &R) -> u32
    where
        G: Game,
        R: Renderer<Image = G::Image>,
    {
        let elapsed = (now - self.last_frame) as f32;
        if elapsed > 0.0 {
            self.accumulated_delta += elapsed;
        }

        let mut updates = 0;
        while self.accumulated_delta > FRAME_SIZE {
            game.update(keystate);
            self.accumulated_delta -= FRAME_SIZE;
            updates += 1;
        }
        self.last_frame = now;

        game.draw(renderer);
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;

    #[derive(Debug, Clone, PartialEq)]
    struct Px;

    impl ImageHandle for Px {
        fn width(&self) -> i16 {
            32
        }
        fn height(&self) -> i16 {
            16
        }
    }

    #[derive(Default)]
    struct Counter {
        updates: u32,
        draws: std::cell::Cell<u32>,
    }

    #[async_trait(?Send)]
    impl Game for Counter {
        type Image = Px;

        async fn initialize<L>(&self, _loader: &L) -> EngineResult<Self>
        where
            L: AssetLoader<Image = Self::Image> + ?Sized,
        {
            Ok(Counter::default())
        }

        fn update(&mut self, _keystate: &KeyState) {
            self.updates += 1;
        }

        fn draw<R: Renderer<Image = Self::Image>>(&self, _renderer: &R) {
            self.draws.set(self.draws.get() + 1);
        }
    }

    #[test]
    fn short_frame_draws_without_updating() {
        let mut game = Counter::default();
        let renderer: RecordingRenderer<Px> = RecordingRenderer::new();
        let keys = KeyState::new();
        let mut lp = GameLoop::new(1000.0);

        assert_eq!(lp.frame(1010.0, &mut game, &keys, &renderer), 0);
        assert_eq!(game.updates, 0);
        assert_eq!(game.draws.get(), 1);
    }

    #[test]
    fn remainder_carries_into_next_frame() {
        let mut game = Counter::default();
        let renderer: RecordingRenderer<Px> = RecordingRenderer::new();
        let keys = KeyState::new();
        let mut lp = GameLoop::new(0.0);

        // 10ms + 10ms crosses one 16.67ms step on the second frame.
        lp.frame(10.0, &mut game, &keys, &renderer);
        assert_eq!(lp.frame(20.0, &mut game, &keys, &renderer), 1);
        assert!((lp.accumulated_delta() - (20.0 - FRAME_SIZE)).abs() < 1.0e-3);
        assert_eq!(game.draws.get(), 2);
    }

    #[test]
    fn long_frame_runs_several_steps() {
        let mut game = Counter::default();
        let renderer: RecordingRenderer<Px> = RecordingRenderer::new();
        let keys = KeyState::new();
        let mut lp = GameLoop::new(0.0);

        let steps = lp.frame(110.0, &mut game, &keys, &renderer);
        assert_eq!(steps, 6);
        assert_eq!(game.updates, 6);
        assert_eq!(game.draws.get(), 1);
    }

    #[test]
    fn backwards_time_never_updates() {
        let mut game = Counter::default();
        let renderer: RecordingRenderer<Px> = RecordingRenderer::new();
        let keys = KeyState::new();
        let mut lp = GameLoop::new(500.0);

        assert_eq!(lp.frame(100.0, &mut game, &keys, &renderer), 0);
        assert_eq!(lp.accumulated_delta(), 0.0);
        assert_eq!(game.draws.get(), 1);
    }

    #[test]
    fn image_bounding_box_uses_handle_size() {
        let img = Image::new(Px, Point { x: 150, y: 546 });
        assert_eq!(*img.bounding_box(), Rect::new_from_x_y(150, 546, 32, 16));

        let renderer: RecordingRenderer<Px> = RecordingRenderer::new();
        img.draw(&renderer);
        assert_eq!(renderer.len(), 1);
    }
}
