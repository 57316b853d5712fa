pub mod activation;
pub mod config;
pub mod error;
pub mod features;
pub mod math;
pub mod metrics;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::activation::{ActivationFunction, OutputTransform};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use features::pipeline::{extract_from_grid, extract_from_png, read_png_file};
pub use math::matrix::Matrix;
pub use metrics::{cross_entropy, hit, Hit};
pub use network::{NetSpec, Topology, TopologySpec};
pub use train::{train_loop, Sample, TrainConfig, TrainingSession};
