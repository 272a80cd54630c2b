use std::future::Future;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Response, Window};

use walk_the_dog::{EngineError, EngineResult};

pub(super) type LoopClosure = Closure<dyn FnMut(f64)>;

fn browser_err(what: &'static str) -> impl Fn(JsValue) -> EngineError {
    move |err| EngineError::Browser(format!("{what}: {err:?}"))
}

pub(super) fn window() -> EngineResult<Window> {
    web_sys::window().ok_or_else(|| EngineError::Browser("no window".to_string()))
}

pub(super) fn document() -> EngineResult<Document> {
    window()?
        .document()
        .ok_or_else(|| EngineError::Browser("no document".to_string()))
}

pub(super) fn canvas(id: &str) -> EngineResult<HtmlCanvasElement> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| EngineError::Browser(format!("no element with id #{id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| EngineError::Browser(format!("#{id} is not a canvas")))
}

pub(super) fn context(canvas: &HtmlCanvasElement) -> EngineResult<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(browser_err("canvas: get_context threw"))?
        .ok_or_else(|| EngineError::Browser("canvas: missing 2d context".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| EngineError::Browser("canvas: context is not 2d".to_string()))
}

pub(super) fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// GET `resource` and return the body as text.
pub(super) async fn fetch_text(resource: &str) -> EngineResult<String> {
    let resp_value = JsFuture::from(window()?.fetch_with_str(resource))
        .await
        .map_err(|err| EngineError::asset_load(resource, format!("{err:?}")))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| EngineError::Browser("fetch: result is not a Response".to_string()))?;

    if !resp.ok() {
        return Err(EngineError::asset_load(
            resource,
            format!("HTTP {}", resp.status()),
        ));
    }

    let text = JsFuture::from(resp.text().map_err(browser_err("fetch: text() threw"))?)
        .await
        .map_err(|err| EngineError::asset_load(resource, format!("{err:?}")))?;
    text.as_string()
        .ok_or_else(|| EngineError::asset_load(resource, "body is not text"))
}

pub(super) fn new_image() -> EngineResult<HtmlImageElement> {
    HtmlImageElement::new().map_err(browser_err("image: HtmlImageElement::new failed"))
}

pub(super) fn create_raf_closure(f: impl FnMut(f64) + 'static) -> LoopClosure {
    Closure::wrap(Box::new(f) as Box<dyn FnMut(f64)>)
}

pub(super) fn request_animation_frame(callback: &LoopClosure) -> EngineResult<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(browser_err("request_animation_frame threw"))
}

/// Milliseconds from `performance.now()`.
pub(super) fn now() -> EngineResult<f64> {
    Ok(window()?
        .performance()
        .ok_or_else(|| EngineError::Browser("performance unavailable".to_string()))?
        .now())
}
