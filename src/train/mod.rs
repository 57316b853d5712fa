pub mod dataset;
pub mod epoch_stats;
pub mod loop_fn;
pub mod session;
pub mod train_config;

pub use dataset::{load_dataset, Sample};
pub use epoch_stats::EpochStats;
pub use loop_fn::{evaluate, train_loop};
pub use session::{LayerGradients, TrainingSession};
pub use train_config::TrainConfig;
