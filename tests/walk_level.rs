//! Drives the whole level through an in-memory asset loader.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::executor::block_on;
use serde_json::json;

use walk_the_dog::prelude::*;
use walk_the_dog::red_hat_boy::{uniform_sheet, PlayerState, RedHatBoy};
use walk_the_dog::walk::{Platform, HIGH_PLATFORM};

#[derive(Debug, Clone, PartialEq)]
struct TestImage {
    name: String,
    w: i16,
    h: i16,
}

impl ImageHandle for TestImage {
    fn width(&self) -> i16 {
        self.w
    }
    fn height(&self) -> i16 {
        self.h
    }
}

struct MemoryLoader {
    json: HashMap<String, String>,
    images: HashMap<String, (i16, i16)>,
}

#[async_trait(?Send)]
impl AssetLoader for MemoryLoader {
    type Image = TestImage;

    async fn load_image(&self, source: &str) -> EngineResult<TestImage> {
        let (w, h) = self
            .images
            .get(source)
            .copied()
            .ok_or_else(|| EngineError::asset_load(source, "not found"))?;
        Ok(TestImage {
            name: source.to_string(),
            w,
            h,
        })
    }

    async fn fetch_json(&self, path: &str) -> EngineResult<String> {
        self.json
            .get(path)
            .cloned()
            .ok_or_else(|| EngineError::asset_load(path, "not found"))
    }
}

fn rhb_json() -> String {
    let sheet = uniform_sheet(120, 120);
    let frames: serde_json::Map<String, serde_json::Value> = sheet
        .frames
        .keys()
        .map(|name| {
            (
                name.clone(),
                json!({
                    "frame": {"x": 0, "y": 0, "w": 120, "h": 120},
                    "spriteSourceSize": {"x": 0, "y": 0, "w": 120, "h": 120}
                }),
            )
        })
        .collect();
    json!({ "frames": frames }).to_string()
}

fn tiles_json() -> String {
    json!({
        "frames": {
            "13.png": {"frame": {"x": 0, "y": 0, "w": 128, "h": 93}}
        }
    })
    .to_string()
}

fn loader() -> MemoryLoader {
    let paths = AssetPaths::default();
    let mut json = HashMap::new();
    json.insert(paths.rhb_sheet.clone(), rhb_json());
    json.insert(paths.tiles_sheet.clone(), tiles_json());

    let mut images = HashMap::new();
    images.insert(paths.rhb_image.clone(), (1024, 1024));
    images.insert(paths.tiles_image.clone(), (512, 512));
    images.insert(paths.background.clone(), (1200, 600));
    images.insert(paths.stone.clone(), (90, 54));

    MemoryLoader { json, images }
}

fn loaded_game() -> WalkTheDog<TestImage> {
    block_on(WalkTheDog::new().initialize(&loader())).expect("level loads")
}

fn held(keys: &[&str]) -> KeyState {
    let mut state = KeyState::new();
    for k in keys {
        state.set_pressed(k);
    }
    state
}

#[test]
fn initialize_loads_the_level() {
    let game = loaded_game();
    let walk = game.walk().expect("loaded");
    assert_eq!(walk.boy().state(), PlayerState::Idle);
    assert_eq!(walk.platform().position().y, HIGH_PLATFORM);
    assert_eq!(
        *walk.stone().bounding_box(),
        Rect::new_from_x_y(150, 546, 90, 54)
    );
}

#[test]
fn initializing_twice_is_an_error() {
    let game = loaded_game();
    let again = block_on(game.initialize(&loader()));
    assert!(matches!(again, Err(EngineError::AlreadyInitialized)));
}

#[test]
fn missing_asset_fails_initialize() {
    let mut l = loader();
    l.images.remove(&AssetPaths::default().stone);
    let res = block_on(WalkTheDog::<TestImage>::new().initialize(&l));
    match res {
        Err(EngineError::AssetLoad { path, .. }) => assert!(path.ends_with("Stone.png")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected AssetLoad"),
    }
}

#[test]
fn custom_asset_paths_are_used() {
    let mut paths = AssetPaths::default();
    paths.stone = "assets/rock.png".to_string();

    let mut l = loader();
    l.images.insert("assets/rock.png".to_string(), (40, 40));
    let game = block_on(WalkTheDog::with_assets(paths).initialize(&l)).unwrap();
    assert_eq!(game.walk().unwrap().stone().bounding_box().width, 40);
}

#[test]
fn running_into_the_stone_knocks_the_boy_out() {
    let mut game = loaded_game();
    let keys = held(&["ArrowRight"]);

    // Bounding box reaches the stone once x > 56, i.e. on update 20.
    for _ in 0..19 {
        game.update(&keys);
    }
    assert_eq!(game.walk().unwrap().boy().state(), PlayerState::Running);

    game.update(&keys);
    let boy = game.walk().unwrap().boy();
    assert_eq!(boy.state(), PlayerState::Falling);
    assert_eq!(boy.walking_speed(), 0);

    for _ in 0..40 {
        game.update(&keys);
    }
    assert_eq!(game.walk().unwrap().boy().state(), PlayerState::KnockedOut);
}

/// The real boy and platform, with the stone parked in the far corner.
fn level_with_platform(platform_y: i16) -> WalkTheDog<TestImage> {
    let paths = AssetPaths::default();
    let rhb_sheet = Sheet::from_json(&rhb_json()).unwrap();
    let tiles = Sheet::from_json(&tiles_json()).unwrap();
    let img = |name: &str, w, h| TestImage {
        name: name.to_string(),
        w,
        h,
    };

    let walk = Walk::new(
        RedHatBoy::new(rhb_sheet, img(&paths.rhb_image, 1024, 1024)).unwrap(),
        Image::new(img(&paths.background, 1200, 600), Point { x: 0, y: 0 }),
        Image::new(img(&paths.stone, 10, 10), Point { x: 1180, y: 590 }),
        Platform::new(
            &tiles,
            img(&paths.tiles_image, 512, 512),
            Point {
                x: 370,
                y: platform_y,
            },
        )
        .unwrap(),
    );
    WalkTheDog::Loaded(walk)
}

#[test]
fn jumping_onto_the_platform_lands_on_top() {
    let mut game = level_with_platform(HIGH_PLATFORM);

    // Run until x == 200, then jump once.
    let run = held(&["ArrowRight"]);
    for _ in 0..55 {
        game.update(&run);
    }
    assert_eq!(game.walk().unwrap().boy().pos_x(), 200);

    game.update(&held(&["ArrowRight", "Space"]));
    assert_eq!(game.walk().unwrap().boy().state(), PlayerState::Jumping);

    let mut landed_at = None;
    for step in 0..60 {
        game.update(&run);
        let boy = game.walk().unwrap().boy();
        assert_ne!(boy.state(), PlayerState::Falling, "knocked out on step {step}");
        if boy.state() == PlayerState::Running {
            landed_at = Some(boy.pos_y());
            break;
        }
    }

    // Feet on the platform top: 375 - (600 - 479).
    assert_eq!(landed_at, Some(254));

    // Gravity keeps pulling, collision keeps resolving back onto the top.
    for _ in 0..5 {
        game.update(&run);
        let boy = game.walk().unwrap().boy();
        assert_eq!(boy.state(), PlayerState::Running);
        assert_eq!(boy.pos_y(), 254);
    }
}

#[test]
fn running_into_the_side_of_a_platform_knocks_the_boy_out() {
    // Low enough that the left end cap overlaps a boy standing on the floor.
    let mut game = level_with_platform(470);
    let run = held(&["ArrowRight"]);

    // The end cap starts at x 370, reached once pos_x + 94 > 370.
    for _ in 0..74 {
        game.update(&run);
    }
    let boy = game.walk().unwrap().boy();
    assert_eq!(boy.state(), PlayerState::Running);
    assert_eq!(boy.pos_x(), 276);

    // Feet are below the platform top, so this is a side hit, not a landing.
    game.update(&run);
    let boy = game.walk().unwrap().boy();
    assert_eq!(boy.state(), PlayerState::Falling);
    assert_eq!(boy.pos_x(), 280);
    assert_eq!(boy.pos_y(), 479);
    assert_eq!(boy.walking_speed(), 0);
}

#[test]
fn clearing_the_stone_and_running_on_does_not_overflow() {
    let mut game = loaded_game();
    let run = held(&["ArrowRight"]);

    for _ in 0..14 {
        game.update(&run);
    }
    assert_eq!(game.walk().unwrap().boy().pos_x(), 36);

    game.update(&held(&["ArrowRight", "Space"]));
    assert_eq!(game.walk().unwrap().boy().state(), PlayerState::Jumping);

    // Over the stone, under the platform, then on past the end of i16.
    for _ in 0..10_000 {
        game.update(&run);
    }
    let boy = game.walk().unwrap().boy();
    assert_eq!(boy.state(), PlayerState::Running);
    assert_eq!(boy.pos_x(), i16::MAX);
    assert_eq!(boy.pos_y(), 479);

    let renderer: RecordingRenderer<TestImage> = RecordingRenderer::new();
    game.draw(&renderer);
    assert!(!renderer.take().is_empty());
}

#[test]
fn draw_order_is_background_boy_stone_platform() {
    let game = loaded_game();
    let renderer: RecordingRenderer<TestImage> = RecordingRenderer::new();
    game.draw(&renderer);

    let cmds = renderer.take();
    let summary: Vec<String> = cmds
        .iter()
        .map(|c| match c {
            DrawCommand::Clear(_) => "clear".to_string(),
            DrawCommand::Image { image, .. } => image.name.clone(),
            DrawCommand::BoundingBox(_) => "bbox".to_string(),
        })
        .collect();

    let paths = AssetPaths::default();
    assert_eq!(
        summary,
        vec![
            "clear".to_string(),
            paths.background.clone(),
            paths.rhb_image.clone(),
            "bbox".to_string(),
            paths.stone.clone(),
            paths.tiles_image.clone(),
            "bbox".to_string(),
            "bbox".to_string(),
            "bbox".to_string(),
        ]
    );
    assert_eq!(
        cmds[0],
        DrawCommand::Clear(Rect::new_from_x_y(0, 0, WIDTH, HEIGHT))
    );
}

#[test]
fn game_loop_drives_the_level() {
    let mut game = loaded_game();
    let renderer: RecordingRenderer<TestImage> = RecordingRenderer::new();
    let keys = held(&["ArrowRight"]);
    let mut lp = GameLoop::new(0.0);

    // Five frames of ~2 steps each.
    let mut steps = 0;
    for i in 1..=5 {
        let now = f64::from(i) * 2.0 * f64::from(FRAME_SIZE) + 1.0;
        steps += lp.frame(now, &mut game, &keys, &renderer);
    }
    assert_eq!(steps, 10);
    assert_eq!(game.walk().unwrap().boy().pos_x(), -20 + 4 * 10);
}
