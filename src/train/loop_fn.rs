use std::time::Instant;

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::metrics::{cross_entropy, hit};
use crate::network::topology::Topology;
use crate::train::dataset::Sample;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `topology` for `config.epochs` epochs and returns the stats of
/// every completed epoch.
///
/// # Panics
/// Panics if `train` is empty or `batch_size == 0`.
pub fn train_loop<R: Rng + ?Sized>(
    topology: &mut Topology,
    train: &[Sample],
    validation: Option<&[Sample]>,
    config: &TrainConfig,
    rng: &mut R,
) -> Vec<EpochStats> {
    assert!(!train.is_empty(), "training set must not be empty");
    assert!(config.batch_size > 0, "batch_size must be at least 1");

    let mut history = Vec::with_capacity(config.epochs);
    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let (train_loss, train_accuracy) = run_one_epoch(topology, train, config, rng);

        let (val_loss, val_accuracy) = match validation {
            Some(v) if !v.is_empty() => {
                let (l, a) = evaluate(topology, v);
                (Some(l), Some(a))
            }
            _ => (None, None),
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy,
            val_loss,
            val_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            "epoch {}/{}: loss {:.4} nats, hit rate {:.2}%{}",
            stats.epoch,
            stats.total_epochs,
            stats.train_loss,
            stats.train_accuracy * 100.0,
            match (stats.val_loss, stats.val_accuracy) {
                (Some(l), Some(a)) => format!(", validation {:.4} nats / {:.2}%", l, a * 100.0),
                _ => String::new(),
            }
        );
        history.push(stats);
    }

    history
}

/// Mean cross-entropy and hit rate over `samples`, without updating weights.
/// Returns `(0.0, 0.0)` for an empty set.
pub fn evaluate(topology: &mut Topology, samples: &[Sample]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let (loss, hits) = samples.iter().fold((0.0, 0.0), |(loss, hits), sample| {
        let output = topology.run(&sample.input);
        (
            loss + cross_entropy(&output, sample.class),
            hits + hit(&output, sample.class).score,
        )
    });
    let n = samples.len() as f64;
    (loss / n, hits / n)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one full epoch of mini-batches over the training data.
/// Returns the mean loss and hit rate over all samples.
fn run_one_epoch<R: Rng + ?Sized>(
    topology: &mut Topology,
    samples: &[Sample],
    config: &TrainConfig,
    rng: &mut R,
) -> (f64, f64) {
    let n = samples.len();
    let mut indices: Vec<usize> = (0..n).collect();
    if config.shuffle {
        indices.shuffle(rng);
    }

    let mut total_loss = 0.0;
    let mut total_hits = 0.0;
    for batch in indices.chunks(config.batch_size) {
        let mut session = topology.begin_batch(batch.len());
        for &idx in batch {
            let sample = &samples[idx];
            let output = session.run(&sample.input);
            total_loss += cross_entropy(&output, sample.class);
            total_hits += hit(&output, sample.class).score;
            session.backpr(&sample.input, &output, sample.class);
        }
        session.apply_backpr();
        session.end_backpr();
    }

    (total_loss / n as f64, total_hits / n as f64)
}
