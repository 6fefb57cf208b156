//! Region capture: reads current screen pixels inside a region.
//!
//! [`ScreenGrabber`] is the seam between the controller and the platform.
//! [`XcapGrabber`] is the real backend; tests use an in-memory fake.

use image::{ImageBuffer, Rgba, RgbaImage};
use log::debug;
use xcap::Monitor;

use crate::error::CaptureError;
use crate::selection_logic::Region;

/// Geometry of the whole desktop at the time a session starts.
///
/// `bounds` and every [`Region`] handed to [`ScreenGrabber::grab`] are in the
/// grabber's own units. Windows and pointer events work in display points;
/// `scale` is grabber units per point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Desktop {
    /// Union of every monitor.
    pub bounds: Region,
    /// Size of the primary display, reported in the metadata line.
    pub primary: (u32, u32),
    pub scale: f64,
}

pub trait ScreenGrabber {
    fn desktop(&self) -> Result<Desktop, CaptureError>;

    /// Returns an image of exactly `region.width x region.height` pixels.
    fn grab(&self, region: Region) -> Result<RgbaImage, CaptureError>;
}

pub struct XcapGrabber;

impl XcapGrabber {
    fn monitors() -> Result<Vec<(Monitor, Region)>, CaptureError> {
        let mut out = Vec::new();
        for m in Monitor::all()? {
            let bounds = Region::new(m.x()?, m.y()?, m.width()?, m.height()?);
            out.push((m, bounds));
        }
        if out.is_empty() {
            return Err(CaptureError::NoDisplay);
        }
        Ok(out)
    }
}

impl ScreenGrabber for XcapGrabber {
    fn desktop(&self) -> Result<Desktop, CaptureError> {
        let monitors = Self::monitors()?;
        let bounds = monitors
            .iter()
            .map(|(_, b)| *b)
            .reduce(|acc, b| acc.union(&b))
            .ok_or(CaptureError::NoDisplay)?;
        let (primary_monitor, primary_bounds) = monitors
            .iter()
            .find(|(m, _)| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or(CaptureError::NoDisplay)?;
        let scale = points_scale(primary_monitor.scale_factor()? as f64);
        debug!("desktop {:?}, {} pixels per point", bounds, scale);
        Ok(Desktop { bounds, primary: (primary_bounds.width, primary_bounds.height), scale })
    }

    fn grab(&self, region: Region) -> Result<RgbaImage, CaptureError> {
        if region.is_empty() {
            return Err(CaptureError::EmptyRegion);
        }
        let mut canvas = RgbaImage::new(region.width, region.height);
        let mut covered = false;
        for (monitor, bounds) in Self::monitors()? {
            if bounds.intersection(&region).is_none() {
                continue;
            }
            //  xcap ships its own image version, go through raw bytes
            let shot = monitor.capture_image()?;
            let (w, h) = (shot.width(), shot.height());
            let raw = shot.into_raw();
            let shot: RgbaImage = ImageBuffer::from_raw(w, h, raw)
                .ok_or_else(|| CaptureError::Backend("monitor returned a short pixel buffer".into()))?;
            debug!("monitor {:?} captured at {}x{}", bounds, w, h);
            covered |= blit(&mut canvas, region, bounds, &shot);
        }
        if !covered {
            return Err(CaptureError::OutsideDesktop { region });
        }
        Ok(canvas)
    }
}

/// xcap reports monitor geometry in physical pixels on Windows and X11 but in
/// points on macOS, where the shots themselves are still physical (see
/// [`blit`]). Mixed per-monitor scales use the primary monitor's.
fn points_scale(monitor_scale: f64) -> f64 {
    if cfg!(target_os = "macos") || !monitor_scale.is_finite() || monitor_scale <= 0.0 {
        1.0
    } else {
        monitor_scale
    }
}

/// Copies the part of a monitor shot that overlaps `region` into `canvas`.
///
/// `shot` may be larger than `bounds` on scaled displays; pixels are picked
/// nearest-neighbour so the canvas keeps its logical size. Returns whether
/// anything overlapped.
pub fn blit(canvas: &mut RgbaImage, region: Region, bounds: Region, shot: &RgbaImage) -> bool {
    let Some(overlap) = region.intersection(&bounds) else {
        return false;
    };
    if shot.width() == 0 || shot.height() == 0 {
        return false;
    }
    let sx = shot.width() as f64 / bounds.width as f64;
    let sy = shot.height() as f64 / bounds.height as f64;
    for dy in 0..overlap.height {
        let screen_y = overlap.top as i64 + dy as i64;
        let src_y = (((screen_y - bounds.top as i64) as f64 * sy) as u32).min(shot.height() - 1);
        let dst_y = (screen_y - region.top as i64) as u32;
        for dx in 0..overlap.width {
            let screen_x = overlap.left as i64 + dx as i64;
            let src_x = (((screen_x - bounds.left as i64) as f64 * sx) as u32).min(shot.width() - 1);
            let dst_x = (screen_x - region.left as i64) as u32;
            let px: Rgba<u8> = *shot.get_pixel(src_x, src_y);
            canvas.put_pixel(dst_x, dst_y, px);
        }
    }
    true
}
