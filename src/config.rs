use serde::{Deserialize, Serialize};

use crate::activation::activation::{ActivationFunction, OutputTransform};
use crate::error::{Error, Result};
use crate::features::convolution::KERNEL_BANK;

/// Number of shape descriptors appended after the row and column marginals.
pub const SHAPE_DESCRIPTORS: usize = 28;

/// Engine-wide constants and hyper-parameters.
///
/// The image geometry fields form a compatibility contract: the feature
/// pipeline output length (`input_len`) must equal the `num_input` of every
/// source network, and changing any of them invalidates persisted weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width and height of the decoded image, in pixels.
    pub image_side: usize,
    /// Side of the square pooling window.
    pub pool_len: usize,
    /// Side of the square convolution kernels.
    pub kernel_side: usize,
    /// Number of kernels taken from the fixed kernel bank.
    pub feature_maps: usize,
    /// Upper bound on the terminal network's output width.
    pub max_classes: usize,
    /// Pooled intensity at or above which a cell counts as ink.
    pub ink_threshold: f64,
    pub hidden_activation: ActivationFunction,
    pub output_transform: OutputTransform,
    pub learning_rate: f64,
    pub momentum: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            image_side: 128,
            pool_len: 8,
            kernel_side: 3,
            feature_maps: 1,
            max_classes: 36,
            ink_threshold: 0.25,
            hidden_activation: ActivationFunction::Tanh,
            output_transform: OutputTransform::Softmax,
            learning_rate: 1.0,
            momentum: 0.3,
        }
    }
}

impl EngineConfig {
    pub fn pooled_side(&self) -> usize {
        self.image_side / self.pool_len
    }

    /// Cells lost on each spatial axis by a valid (unpadded) convolution.
    pub fn feature_margin(&self) -> usize {
        self.kernel_side - 1
    }

    pub fn feature_side(&self) -> usize {
        self.pooled_side() - self.feature_margin()
    }

    pub fn feature_len(&self) -> usize {
        self.feature_maps * self.feature_side() * self.feature_side()
    }

    pub fn metadata_len(&self) -> usize {
        SHAPE_DESCRIPTORS + 2 * self.pooled_side()
    }

    /// Total length of the vector fed to every source network.
    pub fn input_len(&self) -> usize {
        self.feature_len() + self.metadata_len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_len == 0 || self.image_side == 0 {
            return Err(Error::Configuration("image side and pool length must be positive".into()));
        }
        if self.image_side % self.pool_len != 0 {
            return Err(Error::Configuration(format!(
                "image side {} is not a multiple of pool length {}",
                self.image_side, self.pool_len
            )));
        }
        if self.kernel_side != 3 {
            return Err(Error::Configuration(format!(
                "kernel side must be 3 to match the kernel bank, got {}",
                self.kernel_side
            )));
        }
        if self.pooled_side() < self.kernel_side {
            return Err(Error::Configuration(format!(
                "pooled grid {}x{} is smaller than the {}x{} kernel",
                self.pooled_side(),
                self.pooled_side(),
                self.kernel_side,
                self.kernel_side
            )));
        }
        if self.feature_maps == 0 || self.feature_maps > KERNEL_BANK.len() {
            return Err(Error::Configuration(format!(
                "feature map count must be in 1..={}, got {}",
                KERNEL_BANK.len(),
                self.feature_maps
            )));
        }
        if self.max_classes == 0 {
            return Err(Error::Configuration("max_classes must be positive".into()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Configuration(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(Error::Configuration(format!(
                "momentum must be in [0, 1), got {}",
                self.momentum
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads and validates a config from a JSON file. Missing fields take
    /// their default values.
    pub fn load_json(path: &str) -> Result<EngineConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: EngineConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
