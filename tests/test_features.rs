// Tests for the image-to-feature-vector pipeline.

mod common;

use std::io::Cursor;

use approx::assert_relative_eq;
use common::small_config;
use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
use ocr_nn::features::{extract_from_grid, Grid};
use ocr_nn::{extract_from_png, read_png_file, EngineConfig, Error};

fn png_bytes(img: GrayImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// White page with a black vertical bar over columns `from..to`.
fn bar_image(side: u32, from: u32, to: u32) -> GrayImage {
    GrayImage::from_fn(side, side, |x, _| if (from..to).contains(&x) { Luma([0]) } else { Luma([255]) })
}

#[test]
fn test_vector_has_contract_length() {
    let config = EngineConfig::default();
    let input = extract_from_png(&png_bytes(bar_image(128, 40, 56)), &config, false).unwrap();
    assert_eq!(input.len(), 256);
    assert_eq!(input.len(), config.input_len());
    assert!(input.iter().all(|v| v.is_finite()));
}

#[test]
fn test_extraction_is_deterministic_and_verbose_invariant() {
    let config = EngineConfig::default();
    let bytes = png_bytes(bar_image(128, 10, 90));
    let quiet = extract_from_png(&bytes, &config, false).unwrap();
    let again = extract_from_png(&bytes, &config, false).unwrap();
    let verbose = extract_from_png(&bytes, &config, true).unwrap();

    let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&quiet), bits(&again));
    assert_eq!(bits(&quiet), bits(&verbose));
}

#[test]
fn test_blank_page_has_no_features() {
    let config = EngineConfig::default();
    let input = extract_from_png(&png_bytes(GrayImage::from_pixel(128, 128, Luma([255]))), &config, false).unwrap();
    let features = &input[..config.feature_len()];
    assert!(features.iter().all(|&v| v == 0.0));
    let metadata = &input[config.feature_len()..];
    assert_eq!(metadata.len(), 60);
    // centroid falls back to the centre
    assert_eq!(metadata[33], 0.5);
    assert_eq!(metadata[34], 0.5);
}

#[test]
fn test_column_marginals_locate_the_bar() {
    let config = EngineConfig::default();
    // columns 32..48 cover pooled columns 4 and 5
    let input = extract_from_png(&png_bytes(bar_image(128, 32, 48)), &config, false).unwrap();
    let metadata = &input[config.feature_len()..];
    let (rows, cols) = metadata[..32].split_at(16);
    for &r in rows {
        assert_relative_eq!(r, 2.0 / 16.0, epsilon = 1e-12);
    }
    for (c, &v) in cols.iter().enumerate() {
        let expected = if c == 4 || c == 5 { 1.0 } else { 0.0 };
        assert_relative_eq!(v, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_feature_maps_follow_configuration() {
    let config = EngineConfig { feature_maps: 3, ..small_config() };
    let grid = Grid::from_cells(24, (0..24 * 24).map(|i| (i % 7) as f64 / 7.0).collect());
    let input = extract_from_grid(&grid, &config);
    assert_eq!(input.len(), 3 * 16 + 40);
    assert_eq!(input.len(), config.input_len());
}

#[test]
fn test_wrong_resolution_is_format_error() {
    let config = EngineConfig::default();
    let bytes = png_bytes(GrayImage::from_pixel(64, 64, Luma([255])));
    assert!(matches!(extract_from_png(&bytes, &config, false), Err(Error::Format(_))));

    let bytes = png_bytes(GrayImage::from_pixel(128, 127, Luma([255])));
    assert!(matches!(extract_from_png(&bytes, &config, true), Err(Error::Format(_))));
}

#[test]
fn test_non_png_bytes_are_format_error() {
    let config = EngineConfig::default();
    let result = extract_from_png(b"definitely not an image", &config, false);
    assert!(matches!(result, Err(Error::Format(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let config = EngineConfig::default();
    let result = read_png_file("/nonexistent/ocr-nn/sample.png", &config, false);
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_reads_png_from_disk() {
    let config = small_config();
    let bytes = png_bytes(bar_image(24, 4, 8));
    let path = std::env::temp_dir().join(format!("ocr-nn-sample-{}.png", std::process::id()));
    std::fs::write(&path, &bytes).unwrap();

    let from_file = read_png_file(&path, &config, false).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(from_file, extract_from_png(&bytes, &config, false).unwrap());
}
