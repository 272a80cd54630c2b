use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::UnboundedReceiver;
use tracing::{error, info};

use walk_the_dog::prelude::*;

use super::browser::{self, LoopClosure};
use super::canvas::{CanvasImage, CanvasRenderer};

type SharedLoopClosure = Rc<RefCell<Option<LoopClosure>>>;

/// Drive `game` from `requestAnimationFrame` for the lifetime of the page.
///
/// The animation-frame closure holds a handle to itself so it can re-arm each
/// frame; it is never released.
pub(super) fn start<G>(
    mut game: G,
    renderer: CanvasRenderer,
    mut keyevent_rx: UnboundedReceiver<KeyPress>,
) -> EngineResult<()>
where
    G: Game<Image = CanvasImage> + 'static,
{
    let mut game_loop = GameLoop::new(browser::now()?);
    let mut keystate = KeyState::new();

    let f: SharedLoopClosure = Rc::new(RefCell::new(None));
    let g = Rc::clone(&f);

    *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
        process_input(&mut keystate, &mut keyevent_rx);
        game_loop.frame(perf, &mut game, &keystate, &renderer);

        if let Some(next) = f.borrow().as_ref() {
            if let Err(err) = browser::request_animation_frame(next) {
                error!(%err, "animation loop stopped");
            }
        }
    }));

    let first = g.borrow();
    let callback = first
        .as_ref()
        .ok_or_else(|| EngineError::Browser("loop closure missing".to_string()))?;
    browser::request_animation_frame(callback)?;

    info!("game loop started");
    Ok(())
}
