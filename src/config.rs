//! Fixed UI and capture tunables.
//!
//! The tool has no config file, flags or environment variables of its own;
//! everything adjustable lives here.

use std::time::Duration;

use druid::Color;

pub const WINDOW_TITLE: &str = "Capture Region Tool";

/// Initial size of the main window in display points.
pub const WINDOW_SIZE: (f64, f64) = (800.0, 600.0);

/// Vertical spacing between the main window rows.
pub const ROW_PADDING: f64 = 10.0;

/// Tint over the whole desktop while selecting. Alpha 0.3 keeps the
/// underlying content faintly visible.
pub const OVERLAY_TINT: Color = Color::rgba8(0, 0, 0, 77);

/// Shading for the selected interior.
pub const SELECTION_FILL: Color = Color::rgba8(255, 255, 255, 64);

pub const SELECTION_OUTLINE: Color = Color::rgb8(255, 0, 0);

pub const SELECTION_OUTLINE_WIDTH: f64 = 2.0;

/// Time given to the compositor to remove the overlay before pixels are
/// read back.
pub const OVERLAY_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Extension appended when the chosen path has none.
pub const DEFAULT_EXTENSION: &str = "png";

pub const DEFAULT_FILE_NAME: &str = "capture.png";

pub const SCROLLBAR_THICKNESS: f64 = 8.0;

pub const SCROLLBAR_COLOR: Color = Color::rgba8(0, 0, 0, 110);

pub const PREVIEW_BORDER: Color = Color::grey8(0x80);
