use std::path::Path;

use log::{debug, info};

use super::grid::Grid;
use crate::error::{Error, Result};

/// Decodes PNG bytes into an ink grid (`1 - luma / 255`, so dark strokes on
/// light paper are high values).
///
/// Fails with `Error::Format` when the bytes are not a PNG image or the image
/// is not `side × side`. When `verbose` is set the image characteristics are
/// logged at info level; the returned grid does not depend on it.
pub fn decode_png(bytes: &[u8], side: usize, verbose: bool) -> Result<Grid> {
    let format = image::guess_format(bytes)?;
    if format != image::ImageFormat::Png {
        return Err(Error::Format(format!("expected a PNG image, found {:?}", format)));
    }
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;

    if verbose {
        info!(
            "image: {}x{}, color type {:?}, {} bytes",
            img.width(),
            img.height(),
            img.color(),
            bytes.len()
        );
    }

    if img.width() as usize != side || img.height() as usize != side {
        return Err(Error::Format(format!(
            "expected a {side}x{side} image, got {}x{}",
            img.width(),
            img.height()
        )));
    }

    let gray = img.to_luma8();
    let cells = gray.pixels().map(|p| 1.0 - p.0[0] as f64 / 255.0).collect();
    Ok(Grid::from_cells(side, cells))
}

/// Reads and decodes a PNG file. See [`decode_png`].
pub fn load_png<P: AsRef<Path>>(path: P, side: usize, verbose: bool) -> Result<Grid> {
    let path = path.as_ref();
    debug!("reading {}", path.display());
    let bytes = std::fs::read(path)?;
    decode_png(&bytes, side, verbose)
}
