use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use walk_the_dog::input::key_event_channel;
use walk_the_dog::prelude::*;

use super::browser;

fn key_listener(
    tx: UnboundedSender<KeyPress>,
    to_press: fn(String) -> KeyPress,
) -> Closure<dyn FnMut(web_sys::KeyboardEvent)> {
    Closure::wrap(Box::new(move |ev: web_sys::KeyboardEvent| {
        // A closed receiver means the loop is gone; drop the event.
        let _ = tx.unbounded_send(to_press(ev.code()));
    }) as Box<dyn FnMut(_)>)
}

/// Install window key listeners that feed the returned receiver.
pub(super) fn prepare_input() -> EngineResult<UnboundedReceiver<KeyPress>> {
    let (tx, rx) = key_event_channel();
    let on_keydown = key_listener(tx.clone(), KeyPress::KeyDown);
    let on_keyup = key_listener(tx, KeyPress::KeyUp);

    let window = browser::window()?;
    window.set_onkeydown(Some(on_keydown.as_ref().unchecked_ref()));
    window.set_onkeyup(Some(on_keyup.as_ref().unchecked_ref()));
    on_keydown.forget();
    on_keyup.forget();

    Ok(rx)
}
