//! Application state that outlives a single selection: the last capture and
//! the coordinates it came from. One instance per process, owned by the
//! main window's controller.

use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use log::{debug, info, warn};

use crate::capture::{Desktop, ScreenGrabber};
use crate::error::SessionError;
use crate::metadata::format_metadata;
use crate::notice::Notice;
use crate::persist::save_image;
use crate::selection_logic::{Region, SelectionOutcome};

/// A finished capture. The image is shared read-only with the preview.
#[derive(Debug, Clone)]
pub struct Capture {
    pub region: Region,
    /// The metadata line for this capture.
    pub metadata: String,
    pub image: Arc<RgbaImage>,
}

pub struct CaptureApp {
    grabber: Box<dyn ScreenGrabber>,
    /// Set while an overlay is open.
    session: Option<Desktop>,
    last: Option<Capture>,
}

impl CaptureApp {
    pub fn new(grabber: Box<dyn ScreenGrabber>) -> Self {
        CaptureApp { grabber, session: None, last: None }
    }

    #[cfg(test)]
    pub fn last_capture(&self) -> Option<&Capture> {
        self.last.as_ref()
    }

    #[cfg(test)]
    pub fn session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a selection session and returns the desktop to cover.
    pub fn begin_session(&mut self) -> Result<Desktop, SessionError> {
        if self.session.is_some() {
            return Err(SessionError::Busy);
        }
        let desktop = self.grabber.desktop()?;
        debug!("selection session started over {:?}", desktop.bounds);
        self.session = Some(desktop);
        Ok(desktop)
    }

    /// Ends the session and, for a usable region, grabs it.
    ///
    /// On any failure the previous capture is left as it was.
    pub fn finish_session(&mut self, outcome: SelectionOutcome) -> Result<&Capture, Notice> {
        let desktop = self.session.take();
        let region = match outcome {
            SelectionOutcome::Selected(region) if !region.is_empty() => region,
            SelectionOutcome::Selected(region) => {
                debug!("empty selection {:?}", region);
                return Err(Notice::no_region());
            }
            SelectionOutcome::Cancelled => {
                debug!("selection cancelled");
                return Err(Notice::no_region());
            }
        };
        let Some(desktop) = desktop else {
            warn!("selection finished without an open session");
            return Err(Notice::no_region());
        };

        let metadata = format_metadata(desktop.primary, &region).map_err(|e| {
            warn!("cannot describe {:?}: {}", region, e);
            Notice::error("Error", e.to_string())
        })?;
        let image = self.grabber.grab(region).map_err(|e| {
            warn!("capture of {:?} failed: {}", region, e);
            Notice::error("Error", e.to_string())
        })?;
        info!("captured {}x{} at ({}, {})", image.width(), image.height(), region.left, region.top);

        Ok(&*self.last.insert(Capture {
            region,
            metadata,
            image: Arc::new(image),
        }))
    }

    /// Saves the last capture to the path picked by `choose`.
    ///
    /// `choose` is only asked when there is something to save; `None` from it
    /// means the user backed out.
    pub fn save_with<F>(&self, choose: F) -> Notice
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let Some(capture) = &self.last else {
            return Notice::warning("Error", "Please select a screen region first.");
        };
        let Some(path) = choose() else {
            return Notice::warning("Warning", "Image not saved.");
        };
        match save_image(&capture.image, &path) {
            Ok(_) => Notice::info("Success", "Image saved successfully."),
            Err(e) => {
                warn!("{}", e);
                Notice::error("Error", e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use image::{GenericImageView, Rgba};

    use super::*;
    use crate::error::CaptureError;
    use crate::notice::Severity;

    /// Returns a solid image whose shade changes on every grab.
    #[derive(Default)]
    struct FakeGrabber {
        grabs: Rc<Cell<u8>>,
        requested: Rc<RefCell<Vec<Region>>>,
        fail: Rc<Cell<bool>>,
    }

    impl ScreenGrabber for FakeGrabber {
        fn desktop(&self) -> Result<Desktop, CaptureError> {
            Ok(Desktop { bounds: Region::new(0, 0, 1920, 1080), primary: (1920, 1080), scale: 1.0 })
        }

        fn grab(&self, region: Region) -> Result<RgbaImage, CaptureError> {
            self.requested.borrow_mut().push(region);
            if self.fail.get() {
                return Err(CaptureError::Backend("permission denied".into()));
            }
            let shade = self.grabs.get() + 1;
            self.grabs.set(shade);
            Ok(RgbaImage::from_pixel(region.width, region.height, Rgba([shade, 0, 0, 255])))
        }
    }

    fn app() -> (CaptureApp, Rc<RefCell<Vec<Region>>>, Rc<Cell<bool>>) {
        let fake = FakeGrabber::default();
        let requested = fake.requested.clone();
        let fail = fake.fail.clone();
        (CaptureApp::new(Box::new(fake)), requested, fail)
    }

    fn capture(app: &mut CaptureApp, region: Region) -> Result<Capture, Notice> {
        app.begin_session().unwrap();
        app.finish_session(SelectionOutcome::Selected(region)).cloned()
    }

    #[test]
    fn capture_has_exact_region_size() {
        let (mut app, requested, _) = app();
        let cap = capture(&mut app, Region::new(10, 20, 100, 50)).unwrap();
        assert_eq!(cap.image.dimensions(), (100, 50));
        assert_eq!(requested.borrow().as_slice(), &[Region::new(10, 20, 100, 50)]);
    }

    #[test]
    fn metadata_for_documented_capture() {
        let (mut app, _, _) = app();
        let cap = capture(&mut app, Region::new(200, 100, 400, 300)).unwrap();
        assert_eq!(
            cap.metadata,
            r#"(1920, 1080) {"top": 100, "left": 200, "width": 400, "height": 300}"#
        );
    }

    #[test]
    fn zero_area_selection_is_rejected_without_grabbing() {
        let (mut app, requested, _) = app();
        let err = capture(&mut app, Region::new(5, 5, 0, 0)).unwrap_err();
        assert_eq!(err, Notice::no_region());
        assert!(requested.borrow().is_empty());
        assert!(app.last_capture().is_none());
        assert!(!app.session_active());
    }

    #[test]
    fn cancel_grabs_nothing() {
        let (mut app, requested, _) = app();
        app.begin_session().unwrap();
        let err = app.finish_session(SelectionOutcome::Cancelled).unwrap_err();
        assert_eq!(err.severity, Severity::Warning);
        assert!(requested.borrow().is_empty());
        assert!(!app.session_active());
    }

    #[test]
    fn only_one_session_at_a_time() {
        let (mut app, _, _) = app();
        app.begin_session().unwrap();
        assert!(matches!(app.begin_session(), Err(SessionError::Busy)));
        app.finish_session(SelectionOutcome::Cancelled).unwrap_err();
        assert!(app.begin_session().is_ok());
    }

    #[test]
    fn failed_grab_keeps_previous_capture() {
        let (mut app, _, fail) = app();
        let first = capture(&mut app, Region::new(0, 0, 8, 8)).unwrap();
        fail.set(true);
        let err = capture(&mut app, Region::new(0, 0, 30, 30)).unwrap_err();
        assert_eq!(err.severity, Severity::Error);
        assert!(err.message.contains("permission denied"));
        let kept = app.last_capture().unwrap();
        assert!(Arc::ptr_eq(&kept.image, &first.image));
        assert_eq!(kept.region, Region::new(0, 0, 8, 8));
    }

    #[test]
    fn save_without_capture_warns_and_writes_nothing() {
        let (app, _, _) = app();
        let dir = tempfile::tempdir().unwrap();
        let asked = Cell::new(false);
        let notice = app.save_with(|| {
            asked.set(true);
            Some(dir.path().join("out.png"))
        });
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(notice.message, "Please select a screen region first.");
        assert!(!asked.get());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn cancelled_dialog_is_a_neutral_notice() {
        let (mut app, _, _) = app();
        capture(&mut app, Region::new(0, 0, 8, 8)).unwrap();
        let notice = app.save_with(|| None);
        assert_eq!(notice, Notice::warning("Warning", "Image not saved."));
    }

    #[test]
    fn save_writes_decodable_file() {
        let (mut app, _, _) = app();
        capture(&mut app, Region::new(10, 20, 100, 50)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let notice = app.save_with(|| Some(path.clone()));
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(image::open(&path).unwrap().dimensions(), (100, 50));
    }

    #[test]
    fn second_capture_replaces_first_in_save_target() {
        let (mut app, _, _) = app();
        capture(&mut app, Region::new(0, 0, 10, 10)).unwrap();
        capture(&mut app, Region::new(0, 0, 30, 20)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        app.save_with(|| Some(path.clone()));
        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (30, 20));
        assert_eq!(saved.get_pixel(0, 0).0, [2, 0, 0, 255]);
    }

    #[test]
    fn write_failure_reports_error() {
        let (mut app, _, _) = app();
        capture(&mut app, Region::new(0, 0, 10, 10)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let notice = app.save_with(|| Some(dir.path().join("missing").join("out.png")));
        assert_eq!(notice.severity, Severity::Error);
        assert!(app.last_capture().is_some());
    }
}
