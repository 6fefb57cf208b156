//! Main window: widget tree and the controller that wires the two buttons to
//! `CaptureApp`.

use anyhow::Result;
use arboard::Clipboard;
use druid::menu::MenuEventCtx;
use druid::widget::{Button, Controller, CrossAxisAlignment, Flex, Label, LineBreaking};
use druid::{Env, Event, EventCtx, Menu, MenuItem, TimerToken, Widget, WidgetExt};
use log::{debug, warn};

use crate::app::CaptureApp;
use crate::config::{DEFAULT_FILE_NAME, OVERLAY_SETTLE_DELAY, PREVIEW_BORDER, ROW_PADDING};
use crate::error::SessionError;
use crate::notice::Notice;
use crate::preview::PreviewSurface;
use crate::selection::SelectionOverlay;
use crate::selection_logic::SelectionOutcome;
use crate::state::{AppState, SAVE_IMAGE, SELECTION_FINISHED, START_SELECTION};

fn copy_text_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

fn copy_all_menu() -> Menu<AppState> {
    Menu::empty().entry(MenuItem::new("Copy All").on_activate(
        |_ctx: &mut MenuEventCtx, data: &mut AppState, _env: &Env| {
            if let Err(e) = copy_text_to_clipboard(&data.metadata) {
                warn!("clipboard copy failed: {}", e);
            }
        },
    ))
}

/// Right-click on the metadata line offers "Copy All". The line itself is a
/// label, so it can never be edited.
struct CopyAllMenu;

impl<W: Widget<AppState>> Controller<AppState, W> for CopyAllMenu {
    fn event(&mut self, child: &mut W, ctx: &mut EventCtx, event: &Event, data: &mut AppState, env: &Env) {
        match event {
            Event::MouseDown(e) if e.button.is_right() => {
                ctx.show_context_menu(copy_all_menu(), e.window_pos);
                ctx.set_handled();
            }
            _ => child.event(ctx, event, data, env),
        }
    }
}

/// Owns the single `CaptureApp` and drives a selection session:
/// hide, open overlay, wait for its one result, settle, grab, show.
pub struct AppController {
    app: CaptureApp,
    pending: Option<(TimerToken, SelectionOutcome)>,
}

impl AppController {
    pub fn new(app: CaptureApp) -> Self {
        AppController { app, pending: None }
    }

    fn start_selection(&mut self, ctx: &mut EventCtx, data: &mut AppState) {
        let desktop = match self.app.begin_session() {
            Ok(desktop) => desktop,
            Err(SessionError::Busy) => {
                debug!("selection already in progress");
                return;
            }
            Err(e) => {
                warn!("cannot start selection: {}", e);
                Notice::error("Error", e.to_string()).show();
                return;
            }
        };
        data.selecting = true;
        ctx.window().hide();
        ctx.new_window(SelectionOverlay::window(desktop, ctx.window_id()));
    }

    fn finish_selection(&mut self, ctx: &mut EventCtx, data: &mut AppState, outcome: SelectionOutcome) {
        let result = self.app.finish_session(outcome).map(|cap| data.show_capture(cap));
        data.selecting = false;
        ctx.window().show();
        ctx.window().bring_to_front_and_focus();
        if let Err(notice) = result {
            notice.show();
        }
    }

    fn save(&mut self) {
        let notice = self.app.save_with(|| {
            rfd::FileDialog::new()
                .set_title("Save Image As")
                .add_filter("PNG files", &["png"])
                .add_filter("All files", &["*"])
                .set_file_name(DEFAULT_FILE_NAME)
                .save_file()
        });
        notice.show();
    }
}

impl<W: Widget<AppState>> Controller<AppState, W> for AppController {
    fn event(&mut self, child: &mut W, ctx: &mut EventCtx, event: &Event, data: &mut AppState, env: &Env) {
        match event {
            Event::Command(cmd) if cmd.is(START_SELECTION) => {
                if !data.selecting {
                    self.start_selection(ctx, data);
                }
                ctx.set_handled();
            }
            Event::Command(cmd) if cmd.is(SELECTION_FINISHED) => {
                let outcome = *cmd.get_unchecked(SELECTION_FINISHED);
                // grab once the overlay is really gone from the screen
                let token = ctx.request_timer(OVERLAY_SETTLE_DELAY);
                self.pending = Some((token, outcome));
                ctx.set_handled();
            }
            Event::Timer(token) if self.pending.is_some_and(|(t, _)| t == *token) => {
                if let Some((_, outcome)) = self.pending.take() {
                    self.finish_selection(ctx, data, outcome);
                }
                ctx.set_handled();
            }
            Event::Command(cmd) if cmd.is(SAVE_IMAGE) => {
                self.save();
                ctx.set_handled();
            }
            _ => child.event(ctx, event, data, env),
        }
    }
}

pub fn build_root(app: CaptureApp) -> impl Widget<AppState> {
    let capture_button = Button::new("Select Screen Region")
        .on_click(|ctx, _data: &mut AppState, _env| ctx.submit_command(START_SELECTION));

    let metadata = Label::new(|data: &AppState, _env: &Env| data.metadata.clone())
        .with_line_break_mode(LineBreaking::Clip)
        .expand_width()
        .controller(CopyAllMenu);

    let preview = PreviewSurface::new().border(PREVIEW_BORDER, 1.0);

    let save_button =
        Button::new("Save Image").on_click(|ctx, _data: &mut AppState, _env| ctx.submit_command(SAVE_IMAGE));

    Flex::column()
        .cross_axis_alignment(CrossAxisAlignment::Center)
        .with_child(capture_button.padding(ROW_PADDING))
        .with_child(metadata.padding(ROW_PADDING))
        .with_flex_child(preview.padding(ROW_PADDING), 1.0)
        .with_child(save_button.padding(ROW_PADDING))
        .controller(AppController::new(app))
}
