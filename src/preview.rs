//! Preview surface: shows the last capture centered, scrollable when it does
//! not fit.

use druid::piet::{ImageFormat, InterpolationMode, PietImage};
use druid::widget::prelude::*;
use druid::{Point, Rect, Vec2};

use crate::config::{SCROLLBAR_COLOR, SCROLLBAR_THICKNESS};
use crate::state::AppState;

const MIN_THUMB: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bar {
    Horizontal,
    Vertical,
}

struct ThumbDrag {
    bar: Bar,
    start: Point,
    start_offset: Vec2,
}

pub struct PreviewSurface {
    cached_image: Option<PietImage>,
    offset: Vec2,
    drag: Option<ThumbDrag>,
}

impl PreviewSurface {
    pub fn new() -> Self {
        PreviewSurface { cached_image: None, offset: Vec2::ZERO, drag: None }
    }
}

fn image_size(data: &AppState) -> Size {
    data.preview
        .as_ref()
        .map(|img| Size::new(img.width() as f64, img.height() as f64))
        .unwrap_or(Size::ZERO)
}

fn max_offset(view: Size, image: Size) -> Vec2 {
    Vec2::new((image.width - view.width).max(0.0), (image.height - view.height).max(0.0))
}

fn clamp_offset(offset: Vec2, view: Size, image: Size) -> Vec2 {
    let max = max_offset(view, image);
    Vec2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y))
}

/// Where the image's top-left lands: centered on an axis that fits,
/// scrolled on one that does not.
fn image_origin(view: Size, image: Size, offset: Vec2) -> Point {
    let x = if image.width <= view.width { (view.width - image.width) / 2.0 } else { -offset.x };
    let y = if image.height <= view.height { (view.height - image.height) / 2.0 } else { -offset.y };
    Point::new(x, y)
}

fn thumb(bar: Bar, view: Size, image: Size, offset: Vec2) -> Option<Rect> {
    let max = max_offset(view, image);
    match bar {
        Bar::Horizontal if max.x > 0.0 => {
            let len = (view.width * view.width / image.width).max(MIN_THUMB).min(view.width);
            let x = (view.width - len) * offset.x / max.x;
            Some(Rect::new(x, view.height - SCROLLBAR_THICKNESS, x + len, view.height))
        }
        Bar::Vertical if max.y > 0.0 => {
            let len = (view.height * view.height / image.height).max(MIN_THUMB).min(view.height);
            let y = (view.height - len) * offset.y / max.y;
            Some(Rect::new(view.width - SCROLLBAR_THICKNESS, y, view.width, y + len))
        }
        _ => None,
    }
}

/// Offset for a thumb drag that has moved the pointer to `pos`.
fn dragged_offset(drag: &ThumbDrag, pos: Point, view: Size, image: Size) -> Vec2 {
    let max = max_offset(view, image);
    let mut offset = drag.start_offset;
    if let Some(t) = thumb(drag.bar, view, image, Vec2::ZERO) {
        match drag.bar {
            Bar::Horizontal => {
                let travel = view.width - t.width();
                if travel > 0.0 {
                    offset.x += (pos.x - drag.start.x) * max.x / travel;
                }
            }
            Bar::Vertical => {
                let travel = view.height - t.height();
                if travel > 0.0 {
                    offset.y += (pos.y - drag.start.y) * max.y / travel;
                }
            }
        }
    }
    clamp_offset(offset, view, image)
}

impl Widget<AppState> for PreviewSurface {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, _env: &Env) {
        let view = ctx.size();
        let image = image_size(data);
        match event {
            Event::Wheel(e) => {
                let next = clamp_offset(self.offset + e.wheel_delta, view, image);
                if next != self.offset {
                    self.offset = next;
                    ctx.request_paint();
                }
                ctx.set_handled();
            }
            Event::MouseDown(e) if e.button.is_left() => {
                for bar in [Bar::Horizontal, Bar::Vertical] {
                    if thumb(bar, view, image, self.offset).is_some_and(|t| t.contains(e.pos)) {
                        self.drag = Some(ThumbDrag { bar, start: e.pos, start_offset: self.offset });
                        ctx.set_active(true);
                        break;
                    }
                }
            }
            Event::MouseMove(e) => {
                if let Some(drag) = &self.drag {
                    self.offset = dragged_offset(drag, e.pos, view, image);
                    ctx.request_paint();
                }
            }
            Event::MouseUp(_) if self.drag.is_some() => {
                self.drag = None;
                ctx.set_active(false);
            }
            _ => {}
        }
    }

    fn lifecycle(&mut self, _ctx: &mut LifeCycleCtx, _event: &LifeCycle, _data: &AppState, _env: &Env) {}

    fn update(&mut self, ctx: &mut UpdateCtx, old: &AppState, data: &AppState, _env: &Env) {
        if !old.preview.same(&data.preview) {
            self.cached_image = None;
            self.offset = Vec2::ZERO;
            self.drag = None;
            ctx.request_paint();
        }
    }

    fn layout(&mut self, _ctx: &mut LayoutCtx, bc: &BoxConstraints, data: &AppState, _env: &Env) -> Size {
        let size = bc.max();
        // re-clamp on resize; centering is recomputed in paint
        self.offset = clamp_offset(self.offset, size, image_size(data));
        size
    }

    fn paint(&mut self, ctx: &mut PaintCtx, data: &AppState, _env: &Env) {
        let Some(image) = &data.preview else {
            return;
        };
        if self.cached_image.is_none() {
            self.cached_image = ctx
                .make_image(
                    image.width() as usize,
                    image.height() as usize,
                    image.as_raw(),
                    ImageFormat::RgbaSeparate,
                )
                .ok();
        }

        let view = ctx.size();
        let size = image_size(data);
        let dest = Rect::from_origin_size(image_origin(view, size, self.offset), size);
        let cached = self.cached_image.as_ref();
        let offset = self.offset;
        ctx.with_save(|ctx| {
            ctx.clip(view.to_rect());
            if let Some(img) = cached {
                ctx.draw_image(img, dest, InterpolationMode::NearestNeighbor);
            }
            for bar in [Bar::Horizontal, Bar::Vertical] {
                if let Some(t) = thumb(bar, view, size, offset) {
                    ctx.fill(t.to_rounded_rect(SCROLLBAR_THICKNESS / 2.0), &SCROLLBAR_COLOR);
                }
            }
        });
    }
}
