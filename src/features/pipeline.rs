use std::path::Path;

use super::{convolution, grid::Grid, image, metadata, pooling};
use crate::config::EngineConfig;
use crate::error::Result;

/// Turns a decoded `image_side × image_side` ink grid into the network input
/// vector: flattened feature maps followed by metadata descriptors.
///
/// Pure and deterministic. Panics if the grid side does not match the config.
pub fn extract_from_grid(grid: &Grid, config: &EngineConfig) -> Vec<f64> {
    assert_eq!(grid.side, config.image_side, "grid side does not match the configured image side");
    let pooled = pooling::mean_pool(grid, config.pool_len);

    let mut input = convolution::feature_maps(&pooled, config.feature_maps);
    input.extend(metadata::descriptors(&pooled, config.ink_threshold));

    debug_assert_eq!(input.len(), config.input_len());
    input
}

/// Decodes PNG bytes and extracts the input vector.
pub fn extract_from_png(bytes: &[u8], config: &EngineConfig, verbose: bool) -> Result<Vec<f64>> {
    let grid = image::decode_png(bytes, config.image_side, verbose)?;
    Ok(extract_from_grid(&grid, config))
}

/// Reads a PNG file and extracts the input vector.
///
/// Fails with `Error::Io` when the file cannot be read and `Error::Format`
/// when it is not a PNG of the configured resolution.
pub fn read_png_file<P: AsRef<Path>>(path: P, config: &EngineConfig, verbose: bool) -> Result<Vec<f64>> {
    let grid = image::load_png(path, config.image_side, verbose)?;
    Ok(extract_from_grid(&grid, config))
}
