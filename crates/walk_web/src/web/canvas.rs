use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use walk_the_dog::prelude::*;

use super::browser;

/// Loaded `<img>` element usable as a sprite source.
#[derive(Debug, Clone)]
pub struct CanvasImage(HtmlImageElement);

impl CanvasImage {
    pub fn new(element: HtmlImageElement) -> Self {
        Self(element)
    }
}

impl ImageHandle for CanvasImage {
    fn width(&self) -> i16 {
        i16::try_from(self.0.width()).unwrap_or(i16::MAX)
    }

    fn height(&self) -> i16 {
        i16::try_from(self.0.height()).unwrap_or(i16::MAX)
    }
}

/// Draws into a 2D canvas context.
pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn for_canvas(id: &str) -> EngineResult<Self> {
        let canvas = browser::canvas(id)?;
        Ok(Self {
            context: browser::context(&canvas)?,
        })
    }
}

impl Renderer for CanvasRenderer {
    type Image = CanvasImage;

    fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.x().into(),
            rect.y().into(),
            rect.width.into(),
            rect.height.into(),
        );
    }

    fn draw_image(&self, image: &CanvasImage, frame: &Rect, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &image.0,
                frame.x().into(),
                frame.y().into(),
                frame.width.into(),
                frame.height.into(),
                destination.x().into(),
                destination.y().into(),
                destination.width.into(),
                destination.height.into(),
            )
        {
            warn!(?err, "canvas: draw_image failed");
        }
    }

    #[allow(deprecated)]
    fn draw_bounding_box(&self, rect: &Rect) {
        self.context.set_stroke_style(&JsValue::from_str("#FF0000"));
        self.context.begin_path();
        self.context.rect(
            rect.x().into(),
            rect.y().into(),
            rect.width.into(),
            rect.height.into(),
        );
        self.context.stroke();
    }
}
