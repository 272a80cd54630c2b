use leptos::prelude::*;
use tracing::{error, info};
use wasm_bindgen::prelude::*;
use walk_the_dog::prelude::{EngineResult, Game, InitGuard, WalkTheDog};

mod assets;
mod browser;
mod canvas;
mod game_loop;
mod input;

use assets::BrowserLoader;
use canvas::CanvasRenderer;

/// Id of the canvas the game draws into.
const CANVAS_ID: &str = "canvas";

#[wasm_bindgen]
pub fn start() {
    mount_to_body(|| view! { <GamePage /> });
}

#[component]
fn GamePage() -> impl IntoView {
    // One guard per mounted page; a remount starts from a fresh guard.
    let guard = StoredValue::new(InitGuard::new());

    Effect::new(move |_| {
        guard.update_value(|g| {
            if g.run(start_game).is_none() {
                info!("game already started for this page");
            }
        });
    });

    view! {
        <h1>"Walk the Dog"</h1>
        <p>"Arrow Right to run, Space to jump, Arrow Down to slide."</p>
        <canvas id=CANVAS_ID width="1200" height="600" tabindex="0">
            "Your browser does not support the canvas."
        </canvas>
    }
}

fn start_game() {
    install_diagnostics();

    browser::spawn_local(async move {
        if let Err(err) = run_game().await {
            error!(%err, "game failed to start");
        }
    });
}

async fn run_game() -> EngineResult<()> {
    let keyevent_rx = input::prepare_input()?;

    let game = WalkTheDog::new().initialize(&BrowserLoader).await?;
    let renderer = CanvasRenderer::for_canvas(CANVAS_ID)?;

    game_loop::start(game, renderer, keyevent_rx)
}

/// Panic hook and console logger; both tolerate repeat installs.
fn install_diagnostics() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already set.
    if console_log::init_with_level(log::Level::Info).is_ok() {
        info!("walk_web initialized");
    }
}
