use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use walk_the_dog::prelude::*;

use super::browser;
use super::canvas::CanvasImage;

/// Loads images through `<img>` elements and JSON through `fetch`.
pub struct BrowserLoader;

#[async_trait(?Send)]
impl AssetLoader for BrowserLoader {
    type Image = CanvasImage;

    async fn load_image(&self, source: &str) -> EngineResult<CanvasImage> {
        let image = browser::new_image()?;

        // Whichever callback fires first settles the channel.
        let (tx, rx) = oneshot::channel::<Result<(), String>>();
        let success_tx = Rc::new(RefCell::new(Some(tx)));
        let error_tx = Rc::clone(&success_tx);

        let on_load = Closure::wrap(Box::new(move || {
            if let Some(tx) = success_tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        }) as Box<dyn FnMut()>);
        let on_error = Closure::wrap(Box::new(move |err: JsValue| {
            if let Some(tx) = error_tx.borrow_mut().take() {
                let _ = tx.send(Err(format!("{err:?}")));
            }
        }) as Box<dyn FnMut(JsValue)>);

        image.set_onload(Some(on_load.as_ref().unchecked_ref()));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        image.set_src(source);

        let outcome = rx.await;
        image.set_onload(None);
        image.set_onerror(None);

        match outcome {
            Ok(Ok(())) => {
                debug!(source, "image loaded");
                Ok(CanvasImage::new(image))
            }
            Ok(Err(reason)) => Err(EngineError::asset_load(source, reason)),
            Err(_) => Err(EngineError::asset_load(source, "load callback dropped")),
        }
    }

    async fn fetch_json(&self, path: &str) -> EngineResult<String> {
        browser::fetch_text(path).await
    }
}
