//! The level: background, a stone, one platform and the player.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::AssetPaths;
use crate::engine::{AssetLoader, Game, Image};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Point, Rect};
use crate::input::KeyState;
use crate::red_hat_boy::RedHatBoy;
use crate::render::{ImageHandle, Renderer};
use crate::sheet::{Cell, Sheet};
use crate::{HEIGHT, WIDTH};

pub const HIGH_PLATFORM: i16 = 375;
pub const FIRST_PLATFORM: i16 = 370;
pub const STONE_POSITION: Point = Point { x: 150, y: 546 };

/// Tile used for the platform; drawn three tiles wide.
const PLATFORM_TILE: &str = "13.png";
const PLATFORM_TILES_WIDE: i16 = 3;

pub struct Platform<I> {
    tile: Cell,
    image: I,
    position: Point,
}

impl<I: ImageHandle> Platform<I> {
    pub fn new(sheet: &Sheet, image: I, position: Point) -> EngineResult<Self> {
        let tile = sheet.require(PLATFORM_TILE)?.clone();
        Ok(Self {
            tile,
            image,
            position,
        })
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn destination_box(&self) -> Rect {
        Rect::new(
            self.position,
            self.tile.frame.w * PLATFORM_TILES_WIDE,
            self.tile.frame.h,
        )
    }

    /// Collision boxes: two short end caps around a full-height middle.
    pub fn bounding_boxes(&self) -> Vec<Rect> {
        const X_OFFSET: i16 = 60;
        const END_HEIGHT: i16 = 54;
        let destination_box = self.destination_box();

        let bounding_box_one = Rect::new_from_x_y(
            destination_box.x(),
            destination_box.y(),
            X_OFFSET,
            END_HEIGHT,
        );
        let bounding_box_two = Rect::new_from_x_y(
            destination_box.x() + X_OFFSET,
            destination_box.y(),
            destination_box.width - (X_OFFSET * 2),
            destination_box.height,
        );
        let bounding_box_three = Rect::new_from_x_y(
            destination_box.right() - X_OFFSET,
            destination_box.y(),
            X_OFFSET,
            END_HEIGHT,
        );

        vec![bounding_box_one, bounding_box_two, bounding_box_three]
    }

    pub fn draw<R: Renderer<Image = I>>(&self, renderer: &R) {
        renderer.draw_image(
            &self.image,
            &Rect::new_from_x_y(
                self.tile.frame.x,
                self.tile.frame.y,
                self.tile.frame.w * PLATFORM_TILES_WIDE,
                self.tile.frame.h,
            ),
            &self.destination_box(),
        );

        for bounding_box in self.bounding_boxes() {
            renderer.draw_bounding_box(&bounding_box);
        }
    }
}

pub struct Walk<I> {
    boy: RedHatBoy<I>,
    background: Image<I>,
    stone: Image<I>,
    platform: Platform<I>,
}

impl<I: ImageHandle> Walk<I> {
    pub fn new(boy: RedHatBoy<I>, background: Image<I>, stone: Image<I>, platform: Platform<I>) -> Self {
        Self {
            boy,
            background,
            stone,
            platform,
        }
    }

    pub fn boy(&self) -> &RedHatBoy<I> {
        &self.boy
    }

    pub fn platform(&self) -> &Platform<I> {
        &self.platform
    }

    pub fn stone(&self) -> &Image<I> {
        &self.stone
    }

    fn step(&mut self, keystate: &KeyState) {
        if keystate.is_pressed("ArrowRight") {
            self.boy.run_right();
        }

        if keystate.is_pressed("Space") {
            self.boy.jump();
        }

        if keystate.is_pressed("ArrowDown") {
            self.boy.slide();
        }

        self.boy.update();

        for bounding_box in &self.platform.bounding_boxes() {
            if self.boy.bounding_box().intersects(bounding_box) {
                if self.boy.velocity_y() > 0 && self.boy.pos_y() < self.platform.position.y {
                    self.boy.land_on(bounding_box.y());
                } else {
                    debug!(x = self.boy.pos_x(), y = self.boy.pos_y(), "hit platform");
                    self.boy.knock_out();
                }
            }
        }

        if self.boy.bounding_box().intersects(self.stone.bounding_box()) {
            debug!(x = self.boy.pos_x(), "hit stone");
            self.boy.knock_out();
        }
    }

    fn render<R: Renderer<Image = I>>(&self, renderer: &R) {
        self.background.draw(renderer);
        self.boy.draw(renderer);
        self.stone.draw(renderer);
        self.platform.draw(renderer);
    }
}

pub enum WalkTheDog<I> {
    Loading(AssetPaths),
    Loaded(Walk<I>),
}

impl<I> Default for WalkTheDog<I> {
    fn default() -> Self {
        Self::Loading(AssetPaths::default())
    }
}

impl<I> WalkTheDog<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: AssetPaths) -> Self {
        Self::Loading(assets)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, WalkTheDog::Loaded(_))
    }

    pub fn walk(&self) -> Option<&Walk<I>> {
        match self {
            WalkTheDog::Loaded(walk) => Some(walk),
            WalkTheDog::Loading(_) => None,
        }
    }
}

#[async_trait(?Send)]
impl<I: ImageHandle> Game for WalkTheDog<I> {
    type Image = I;

    async fn initialize<L>(&self, loader: &L) -> EngineResult<Self>
    where
        L: AssetLoader<Image = Self::Image> + ?Sized,
    {
        let assets = match self {
            WalkTheDog::Loading(assets) => assets,
            WalkTheDog::Loaded(_) => return Err(EngineError::AlreadyInitialized),
        };

        let sheet = loader.load_sheet(&assets.rhb_sheet).await?;
        let background = loader.load_image(&assets.background).await?;
        let stone = loader.load_image(&assets.stone).await?;
        let rhb = RedHatBoy::new(sheet, loader.load_image(&assets.rhb_image).await?)?;

        let platform_sheet = loader.load_sheet(&assets.tiles_sheet).await?;
        let platform = Platform::new(
            &platform_sheet,
            loader.load_image(&assets.tiles_image).await?,
            Point {
                x: FIRST_PLATFORM,
                y: HIGH_PLATFORM,
            },
        )?;

        info!("walk the dog assets loaded");
        Ok(WalkTheDog::Loaded(Walk::new(
            rhb,
            Image::new(background, Point { x: 0, y: 0 }),
            Image::new(stone, STONE_POSITION),
            platform,
        )))
    }

    fn update(&mut self, keystate: &KeyState) {
        if let WalkTheDog::Loaded(walk) = self {
            walk.step(keystate);
        }
    }

    fn draw<R: Renderer<Image = Self::Image>>(&self, renderer: &R) {
        renderer.clear(&Rect::new_from_x_y(0, 0, WIDTH, HEIGHT));

        if let WalkTheDog::Loaded(walk) = self {
            walk.render(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::SheetRect;

    #[derive(Debug, Clone, PartialEq)]
    struct Px(i16, i16);

    impl ImageHandle for Px {
        fn width(&self) -> i16 {
            self.0
        }
        fn height(&self) -> i16 {
            self.1
        }
    }

    fn tile_sheet() -> Sheet {
        let mut sheet = Sheet::default();
        sheet.frames.insert(
            PLATFORM_TILE.to_string(),
            Cell {
                frame: SheetRect { x: 10, y: 20, w: 128, h: 93 },
                sprite_source_size: SheetRect::default(),
            },
        );
        sheet
    }

    #[test]
    fn platform_boxes_split_into_caps_and_middle() {
        let platform = Platform::new(&tile_sheet(), Px(0, 0), Point { x: 370, y: 375 }).unwrap();
        assert_eq!(platform.destination_box(), Rect::new_from_x_y(370, 375, 384, 93));

        let boxes = platform.bounding_boxes();
        assert_eq!(boxes[0], Rect::new_from_x_y(370, 375, 60, 54));
        assert_eq!(boxes[1], Rect::new_from_x_y(430, 375, 264, 93));
        assert_eq!(boxes[2], Rect::new_from_x_y(694, 375, 60, 54));
    }

    #[test]
    fn platform_requires_its_tile() {
        let err = Platform::new(&Sheet::default(), Px(0, 0), Point::default())
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::MissingCell(name) if name == PLATFORM_TILE));
    }

    #[test]
    fn loading_game_only_clears() {
        let game: WalkTheDog<Px> = WalkTheDog::new();
        assert!(!game.is_loaded());

        let renderer = crate::render::RecordingRenderer::new();
        game.draw(&renderer);
        assert_eq!(
            renderer.commands(),
            vec![crate::render::DrawCommand::Clear(Rect::new_from_x_y(0, 0, WIDTH, HEIGHT))]
        );
    }

    #[test]
    fn loading_game_ignores_updates() {
        let mut game: WalkTheDog<Px> = WalkTheDog::new();
        let mut keys = KeyState::new();
        keys.set_pressed("ArrowRight");
        game.update(&keys);
        assert!(game.walk().is_none());
    }
}
