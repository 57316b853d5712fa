use serde::{Deserialize, Serialize};

/// Per-epoch training statistics emitted by `train_loop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean cross-entropy (nats) over the training samples, measured on the
    /// forward passes made while training.
    pub train_loss: f64,
    /// Fraction of training samples whose arg-max matched, in [0, 1].
    pub train_accuracy: f64,
    /// Mean validation cross-entropy, if a validation set was provided.
    pub val_loss: Option<f64>,
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
