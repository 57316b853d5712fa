use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a `train_loop` run.
///
/// Learning rate and momentum live in `EngineConfig`, next to the topology
/// they update.
///
/// # Fields
/// - `epochs`: total number of full passes over the training data
/// - `batch_size`: samples per mini-batch; use `1` for online updates
/// - `shuffle`: reshuffle sample order at the start of every epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub shuffle: bool,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig { epochs, batch_size, shuffle: true }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Configuration("batch_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(TrainConfig::new(3, 0).validate(), Err(Error::Configuration(_))));
        assert!(TrainConfig::new(3, 1).validate().is_ok());
    }
}
