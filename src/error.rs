use std::path::PathBuf;

use crate::selection_logic::Region;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Screen capture failed: {0}")]
    Backend(String),

    #[error("No display found")]
    NoDisplay,

    #[error(
        "Region {}x{} at ({}, {}) is outside every display",
        region.width, region.height, region.left, region.top
    )]
    OutsideDesktop { region: Region },

    #[error("Region has zero width or height")]
    EmptyRegion,
}

impl From<xcap::XCapError> for CaptureError {
    fn from(e: xcap::XCapError) -> Self {
        CaptureError::Backend(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Could not encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("A region selection is already in progress")]
    Busy,

    #[error(transparent)]
    Desktop(#[from] CaptureError),
}
