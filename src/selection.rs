//! Full-desktop overlay that turns a pointer drag into a [`Region`].

use druid::widget::prelude::*;
use druid::{Color, Cursor, KbKey, Point, Rect, Target, WindowDesc, WindowId, commands};
use log::debug;

use crate::capture::Desktop;
use crate::config::{OVERLAY_TINT, SELECTION_FILL, SELECTION_OUTLINE, SELECTION_OUTLINE_WIDTH};
use crate::selection_logic::{Region, ScreenPoint, Selection, SelectionOutcome};
use crate::state::{AppState, SELECTION_FINISHED};

/// Converts between the overlay's window points and the grabber's screen
/// units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapping {
    /// Screen position of the window's top-left corner.
    origin: ScreenPoint,
    /// Screen units per window point.
    scale: f64,
}

impl ScreenMapping {
    pub fn new(origin: ScreenPoint, scale: f64) -> Self {
        ScreenMapping { origin, scale }
    }

    /// Where druid should place the window, in points.
    pub fn window_position(&self) -> Point {
        Point::new(self.origin.x as f64 / self.scale, self.origin.y as f64 / self.scale)
    }

    pub fn window_size(&self, bounds: Region) -> Size {
        Size::new(bounds.width as f64 / self.scale, bounds.height as f64 / self.scale)
    }

    pub fn to_screen(&self, pos: Point) -> ScreenPoint {
        ScreenPoint::new(
            self.origin.x + (pos.x * self.scale).round() as i32,
            self.origin.y + (pos.y * self.scale).round() as i32,
        )
    }

    pub fn to_local(&self, region: Region) -> Rect {
        let x0 = (region.left - self.origin.x) as f64 / self.scale;
        let y0 = (region.top - self.origin.y) as f64 / self.scale;
        Rect::new(
            x0,
            y0,
            x0 + region.width as f64 / self.scale,
            y0 + region.height as f64 / self.scale,
        )
    }
}

/// Overlay input after it has been pulled out of a druid event.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Press(Point),
    Move(Point),
    Release(Point),
    Escape,
    /// The window is closing for a reason other than our own resolution.
    CloseRequested,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Reaction {
    Nothing,
    Redraw,
    Resolve(SelectionOutcome),
}

pub struct SelectionOverlay {
    selection: Selection,
    mapping: ScreenMapping,
    owner: WindowId,
}

impl SelectionOverlay {
    pub fn new(mapping: ScreenMapping, owner: WindowId) -> Self {
        SelectionOverlay { selection: Selection::new(), mapping, owner }
    }

    /// Borderless, transparent, topmost window spanning the desktop.
    pub fn window(desktop: Desktop, owner: WindowId) -> WindowDesc<AppState> {
        let origin = ScreenPoint::new(desktop.bounds.left, desktop.bounds.top);
        let mapping = ScreenMapping::new(origin, desktop.scale);
        WindowDesc::new(SelectionOverlay::new(mapping, owner))
            .title("Select Region")
            .show_titlebar(false)
            .transparent(true)
            .resizable(false)
            .set_always_on_top(true)
            .set_position(mapping.window_position())
            .window_size(mapping.window_size(desktop.bounds))
    }

    fn handle(&mut self, input: Input) -> Reaction {
        let outcome = match input {
            Input::Press(pos) => {
                self.selection.press(self.mapping.to_screen(pos));
                return Reaction::Redraw;
            }
            Input::Move(pos) => {
                return if self.selection.drag(self.mapping.to_screen(pos)) {
                    Reaction::Redraw
                } else {
                    Reaction::Nothing
                };
            }
            Input::Release(pos) => self.selection.release(self.mapping.to_screen(pos)),
            Input::Escape | Input::CloseRequested => self.selection.cancel(),
        };
        outcome.map_or(Reaction::Nothing, Reaction::Resolve)
    }

    fn notify_owner(&self, ctx: &mut EventCtx, outcome: SelectionOutcome) {
        debug!("overlay resolved: {:?}", outcome);
        ctx.submit_command(SELECTION_FINISHED.with(outcome).to(Target::Window(self.owner)));
    }
}

impl Widget<AppState> for SelectionOverlay {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, _data: &mut AppState, _env: &Env) {
        let input = match event {
            Event::WindowConnected => {
                ctx.request_focus();
                ctx.set_cursor(&Cursor::Crosshair);
                return;
            }
            Event::MouseDown(e) if e.button.is_left() => {
                ctx.set_active(true);
                Input::Press(e.pos)
            }
            Event::MouseMove(e) => {
                ctx.set_cursor(&Cursor::Crosshair);
                Input::Move(e.pos)
            }
            Event::MouseUp(e) if e.button.is_left() => {
                ctx.set_active(false);
                Input::Release(e.pos)
            }
            Event::KeyDown(k) if k.key == KbKey::Escape => Input::Escape,
            // closed from outside (window manager, alt-f4)
            Event::WindowCloseRequested => Input::CloseRequested,
            _ => return,
        };
        match self.handle(input) {
            Reaction::Nothing => {}
            Reaction::Redraw => ctx.request_paint(),
            Reaction::Resolve(outcome) => {
                // tear down first so the owner's grab doesn't see the tint
                if input != Input::CloseRequested {
                    ctx.submit_command(commands::CLOSE_WINDOW);
                }
                self.notify_owner(ctx, outcome);
            }
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifeCycleCtx, event: &LifeCycle, _data: &AppState, _env: &Env) {
        if let LifeCycle::BuildFocusChain = event {
            ctx.register_for_focus();
        }
    }

    fn update(&mut self, _ctx: &mut UpdateCtx, _old: &AppState, _data: &AppState, _env: &Env) {}

    fn layout(&mut self, _ctx: &mut LayoutCtx, bc: &BoxConstraints, _data: &AppState, _env: &Env) -> Size {
        bc.max()
    }

    fn paint(&mut self, ctx: &mut PaintCtx, _data: &AppState, _env: &Env) {
        let full = ctx.size().to_rect();
        // full redraw every frame, so only one rectangle is ever visible
        ctx.clear(None, Color::TRANSPARENT);
        ctx.fill(full, &OVERLAY_TINT);

        if let Some(region) = self.selection.current_region() {
            let r = self.mapping.to_local(region);
            ctx.fill(r, &SELECTION_FILL);
            ctx.stroke(r, &SELECTION_OUTLINE, SELECTION_OUTLINE_WIDTH);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(x: i32, y: i32, scale: f64) -> SelectionOverlay {
        SelectionOverlay::new(ScreenMapping::new(ScreenPoint::new(x, y), scale), WindowId::next())
    }

    #[test]
    fn window_positions_map_to_screen() {
        let mapping = ScreenMapping::new(ScreenPoint::new(-1920, 0), 1.0);
        assert_eq!(mapping.to_screen(Point::new(20.0, 30.4)), ScreenPoint::new(-1900, 30));
    }

    #[test]
    fn regions_map_back_to_window_space() {
        let mapping = ScreenMapping::new(ScreenPoint::new(-100, -50), 1.0);
        let r = mapping.to_local(Region::new(-90, -40, 30, 20));
        assert_eq!(r, Rect::new(10.0, 10.0, 40.0, 30.0));
    }

    #[test]
    fn scaled_display_places_window_in_points() {
        let mapping = ScreenMapping::new(ScreenPoint::new(0, 0), 1.5);
        assert_eq!(mapping.window_position(), Point::ZERO);
        assert_eq!(mapping.window_size(Region::new(0, 0, 2560, 1440)), Size::new(2560.0 / 1.5, 960.0));
    }

    #[test]
    fn scaled_drag_selects_the_pixels_under_the_pointer() {
        let mut overlay = overlay(0, 0, 1.5);
        overlay.handle(Input::Press(Point::new(100.0, 100.0)));
        overlay.handle(Input::Move(Point::new(300.0, 300.0)));
        let reaction = overlay.handle(Input::Release(Point::new(500.0, 400.0)));
        let expected = Region::new(150, 150, 600, 450);
        assert_eq!(reaction, Reaction::Resolve(SelectionOutcome::Selected(expected)));
        assert_eq!(overlay.mapping.to_local(expected), Rect::new(100.0, 100.0, 500.0, 400.0));
    }

    #[test]
    fn scaled_mapping_on_offset_origin() {
        let mapping = ScreenMapping::new(ScreenPoint::new(-3840, 0), 1.5);
        assert_eq!(mapping.window_position(), Point::new(-2560.0, 0.0));
        assert_eq!(mapping.to_screen(Point::new(10.0, 20.0)), ScreenPoint::new(-3825, 30));
        assert_eq!(mapping.to_local(Region::new(-3825, 30, 15, 30)), Rect::new(10.0, 20.0, 20.0, 40.0));
    }

    #[test]
    fn escape_while_dragging_cancels() {
        let mut overlay = overlay(0, 0, 1.0);
        assert_eq!(overlay.handle(Input::Press(Point::new(5.0, 5.0))), Reaction::Redraw);
        assert_eq!(overlay.handle(Input::Move(Point::new(50.0, 50.0))), Reaction::Redraw);
        assert_eq!(overlay.handle(Input::Escape), Reaction::Resolve(SelectionOutcome::Cancelled));
        assert_eq!(overlay.handle(Input::Release(Point::new(50.0, 50.0))), Reaction::Nothing);
    }

    #[test]
    fn escape_before_press_cancels() {
        let mut overlay = overlay(0, 0, 1.0);
        assert_eq!(overlay.handle(Input::Escape), Reaction::Resolve(SelectionOutcome::Cancelled));
    }

    #[test]
    fn pointer_up_resolves_exactly_once() {
        let mut overlay = overlay(10, 10, 1.0);
        overlay.handle(Input::Press(Point::new(0.0, 0.0)));
        let first = overlay.handle(Input::Release(Point::new(40.0, 30.0)));
        assert_eq!(first, Reaction::Resolve(SelectionOutcome::Selected(Region::new(10, 10, 40, 30))));
        // our own CLOSE_WINDOW comes back as a close request
        assert_eq!(overlay.handle(Input::CloseRequested), Reaction::Nothing);
        assert_eq!(overlay.handle(Input::Escape), Reaction::Nothing);
        assert_eq!(overlay.handle(Input::Release(Point::new(1.0, 1.0))), Reaction::Nothing);
    }

    #[test]
    fn external_close_cancels_an_open_drag() {
        let mut overlay = overlay(0, 0, 1.0);
        overlay.handle(Input::Press(Point::new(5.0, 5.0)));
        assert_eq!(overlay.handle(Input::CloseRequested), Reaction::Resolve(SelectionOutcome::Cancelled));
    }

    #[test]
    fn move_without_press_draws_nothing() {
        let mut overlay = overlay(0, 0, 1.0);
        assert_eq!(overlay.handle(Input::Move(Point::new(5.0, 5.0))), Reaction::Nothing);
    }
}
