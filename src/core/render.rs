//! Rendering seam.
//!
//! The game draws through [`Renderer`]; the browser shell implements it on top
//! of a 2D canvas context, and [`RecordingRenderer`] captures draw calls for
//! tests and headless runs.

use std::cell::RefCell;

use crate::geometry::Rect;

/// A loaded bitmap whose pixel size is known.
pub trait ImageHandle {
    fn width(&self) -> i16;
    fn height(&self) -> i16;
}

pub trait Renderer {
    type Image: ImageHandle;

    fn clear(&self, rect: &Rect);

    /// Copy `frame` out of `image` into `destination`.
    fn draw_image(&self, image: &Self::Image, frame: &Rect, destination: &Rect);

    /// Outline a collision box (debug overlay).
    fn draw_bounding_box(&self, rect: &Rect);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand<I> {
    Clear(Rect),
    Image {
        image: I,
        frame: Rect,
        destination: Rect,
    },
    BoundingBox(Rect),
}

/// Renderer that stores every call in order.
#[derive(Debug)]
pub struct RecordingRenderer<I> {
    commands: RefCell<Vec<DrawCommand<I>>>,
}

impl<I> Default for RecordingRenderer<I> {
    fn default() -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
        }
    }
}

impl<I: Clone> RecordingRenderer<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<DrawCommand<I>> {
        self.commands.borrow().clone()
    }

    pub fn take(&self) -> Vec<DrawCommand<I>> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }
}

impl<I: ImageHandle + Clone> Renderer for RecordingRenderer<I> {
    type Image = I;

    fn clear(&self, rect: &Rect) {
        self.commands.borrow_mut().push(DrawCommand::Clear(*rect));
    }

    fn draw_image(&self, image: &I, frame: &Rect, destination: &Rect) {
        self.commands.borrow_mut().push(DrawCommand::Image {
            image: image.clone(),
            frame: *frame,
            destination: *destination,
        });
    }

    fn draw_bounding_box(&self, rect: &Rect) {
        self.commands.borrow_mut().push(DrawCommand::BoundingBox(*rect));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Px(&'static str);

    impl ImageHandle for Px {
        fn width(&self) -> i16 {
            1
        }
        fn height(&self) -> i16 {
            1
        }
    }

    #[test]
    fn records_calls_in_order() {
        let r: RecordingRenderer<Px> = RecordingRenderer::new();
        let area = Rect::new_from_x_y(0, 0, 10, 10);
        r.clear(&area);
        r.draw_image(&Px("bg"), &area, &area);
        r.draw_bounding_box(&area);

        let cmds = r.take();
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0], DrawCommand::Clear(area));
        assert!(matches!(&cmds[1], DrawCommand::Image { image, .. } if image.0 == "bg"));
        assert_eq!(cmds[2], DrawCommand::BoundingBox(area));
        assert!(r.is_empty());
    }
}
