use std::sync::Arc;

use druid::{Data, Selector};
use image::RgbaImage;
use log::debug;

use crate::app::Capture;
use crate::selection_logic::SelectionOutcome;

/// Open the selection overlay.
pub const START_SELECTION: Selector = Selector::new("capregion.start-selection");

/// Sent once by the overlay to the main window when it resolves.
pub const SELECTION_FINISHED: Selector<SelectionOutcome> = Selector::new("capregion.selection-finished");

pub const SAVE_IMAGE: Selector = Selector::new("capregion.save-image");

/// What the widgets render. The capture itself is owned by `CaptureApp`;
/// `preview` shares its pixels.
#[derive(Clone, Data, Default)]
pub struct AppState {
    pub metadata: String,
    pub preview: Option<Arc<RgbaImage>>,
    pub selecting: bool,
}

impl AppState {
    /// Replaces whatever was shown with `capture`.
    pub fn show_capture(&mut self, capture: &Capture) {
        debug!("previewing capture of {:?}", capture.region);
        self.metadata = capture.metadata.clone();
        self.preview = Some(capture.image.clone());
    }
}
