// Shared fixtures for the integration tests.
#![allow(dead_code)]

use ocr_nn::{EngineConfig, NetSpec, Topology, TopologySpec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 24x24 images pooled by 4: 16 feature values + 40 metadata = 56 inputs.
pub fn small_config() -> EngineConfig {
    EngineConfig {
        image_side: 24,
        pool_len: 4,
        max_classes: 4,
        ..EngineConfig::default()
    }
}

/// Two source nets fanning into a terminal net:
/// `0: in -> [4]`, `1: in -> [3]`, `2: 7 -> [5, 3]`.
pub fn fan_in_spec(input_len: usize) -> TopologySpec {
    TopologySpec {
        nets: vec![
            NetSpec::source(input_len, vec![4], Some(2)),
            NetSpec::source(input_len, vec![3], Some(2)),
            NetSpec::downstream(7, vec![5, 3], None),
        ],
    }
}

/// A straight chain with an interior net between source and terminal:
/// `0: in -> [5, 4]`, `1: 4 -> [3, 4]`, `2: 4 -> [3]`.
pub fn chain_spec(input_len: usize) -> TopologySpec {
    TopologySpec {
        nets: vec![
            NetSpec::source(input_len, vec![5, 4], Some(1)),
            NetSpec::downstream(4, vec![3, 4], Some(2)),
            NetSpec::downstream(4, vec![3], None),
        ],
    }
}

pub fn random_topology(spec: &TopologySpec, config: EngineConfig, seed: u64) -> Topology {
    let mut topology = Topology::assemble(spec, config).expect("valid topology");
    topology.init_random_weights(&mut StdRng::seed_from_u64(seed));
    topology
}

pub fn random_input(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect()
}

pub fn all_weights(topology: &Topology) -> Vec<f64> {
    topology
        .nets()
        .iter()
        .flat_map(|n| &n.layers)
        .flat_map(|l| l.weights.data.iter().chain(&l.biases).copied())
        .collect()
}
