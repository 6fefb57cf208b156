use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use log::info;

use crate::config::DEFAULT_EXTENSION;
use crate::error::PersistError;

/// Appends the default extension when the chosen path has none.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

/// Encodes `image` to `path`; the format follows the extension.
///
/// Encoding happens in memory, so a format that rejects the image leaves
/// whatever was at `path` untouched.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<PathBuf, PersistError> {
    let path = with_default_extension(path);
    let encode_err = |source| PersistError::Encode { path: path.clone(), source };
    let format = ImageFormat::from_path(&path).map_err(encode_err)?;
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).map_err(encode_err)?;
    fs::write(&path, bytes.into_inner())
        .map_err(|source| PersistError::Write { path: path.clone(), source })?;
    info!("saved {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(path)
}
