pub mod convolution;
pub mod grid;
pub mod image;
pub mod metadata;
pub mod pipeline;
pub mod pooling;

pub use grid::Grid;
pub use pipeline::{extract_from_grid, extract_from_png, read_png_file};
