use log::debug;

use crate::math::matrix::Matrix;
use crate::network::{layer::hadamard_derivative, topology::Topology};

/// Summed gradients of one layer over the current batch.
#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Vec<f64>,
}

impl LayerGradients {
    fn zeros(rows: usize, cols: usize) -> LayerGradients {
        LayerGradients {
            weights: Matrix::zeros(rows, cols),
            biases: vec![0.0; cols],
        }
    }

    fn clear(&mut self) {
        self.weights.fill(0.0);
        self.biases.iter_mut().for_each(|b| *b = 0.0);
    }
}

/// A backpropagation batch over a topology.
///
/// Created by [`Topology::begin_batch`]; the accumulators are released when
/// the session is ended or dropped. The session holds the topology mutably,
/// so no other pass can interleave with an in-flight batch.
pub struct TrainingSession<'t> {
    topology: &'t mut Topology,
    /// Indexed by net, then layer.
    grads: Vec<Vec<LayerGradients>>,
    batch_size: usize,
    samples: usize,
}

impl Topology {
    /// Allocates zeroed gradient accumulators. `n` is the divisor used to
    /// average the gradients on apply; `n == 1` disables averaging.
    ///
    /// Panics if `n == 0`.
    pub fn begin_batch(&mut self, n: usize) -> TrainingSession<'_> {
        assert!(n > 0, "batch size must be at least 1");
        let grads = self
            .nets
            .iter()
            .map(|net| {
                net.layers
                    .iter()
                    .map(|l| LayerGradients::zeros(l.weights.rows, l.weights.cols))
                    .collect()
            })
            .collect();
        TrainingSession { topology: self, grads, batch_size: n, samples: 0 }
    }
}

impl<'t> TrainingSession<'t> {
    pub fn topology(&self) -> &Topology {
        &*self.topology
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of `backpr` calls accumulated since the last apply or clear.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn gradients(&self, net: usize, layer: usize) -> &LayerGradients {
        &self.grads[net][layer]
    }

    /// Forward pass; see [`Topology::run`].
    pub fn run(&mut self, input: &[f64]) -> Vec<f64> {
        self.topology.run(input)
    }

    /// Accumulates the gradients of one sample.
    ///
    /// `input` and `output` must come from the immediately preceding forward
    /// pass. The terminal error is `output - one_hot(expected)`; interior nets
    /// receive the slice of their downstream net's input gradient that
    /// matches their position in its fan-in.
    ///
    /// Panics without a prior forward pass or on mismatched lengths.
    pub fn backpr(&mut self, input: &[f64], output: &[f64], expected: usize) {
        let topo = &mut *self.topology;
        assert!(topo.fed, "backpr called before a forward pass");
        assert_eq!(input.len(), topo.config.input_len(), "input length mismatch");
        let classes = topo.nets[topo.terminal].output_width();
        assert_eq!(output.len(), classes, "output length mismatch");
        assert!(expected < classes, "expected class {expected} is outside the {classes} outputs");

        let f = topo.config.hidden_activation;
        // Gradient w.r.t. each net's final activations, routed from downstream.
        let mut routed: Vec<Option<Vec<f64>>> = vec![None; topo.nets.len()];

        for &id in topo.order.iter().rev() {
            let fan_in: Vec<(usize, usize)> = topo.upstream[id]
                .iter()
                .map(|&u| (u, topo.nets[u].output_width()))
                .collect();
            let net = &mut topo.nets[id];
            let last = net.layers.len() - 1;

            let mut delta: Vec<f64> = if id == topo.terminal {
                output
                    .iter()
                    .enumerate()
                    .map(|(k, &o)| if k == expected { o - 1.0 } else { o })
                    .collect()
            } else {
                let error = routed[id]
                    .take()
                    .expect("downstream net did not route a gradient");
                hadamard_derivative(&error, &net.layers[last].pre_activations, f)
            };

            for l in (0..=last).rev() {
                let (before, rest) = net.layers.split_at_mut(l);
                let layer = &mut rest[0];
                let layer_input: &[f64] = match l {
                    0 if net.source => input,
                    0 => &net.input,
                    _ => &before[l - 1].activations,
                };

                let acc = &mut self.grads[id][l];
                acc.weights.add_outer(layer_input, &delta);
                for (b, d) in acc.biases.iter_mut().zip(&delta) {
                    *b += d;
                }

                let input_error = layer.weights.vec_mul_transposed(&delta);
                layer.deltas = delta;

                if l > 0 {
                    delta = hadamard_derivative(&input_error, &before[l - 1].pre_activations, f);
                } else {
                    if !net.source {
                        let mut offset = 0;
                        for &(u, width) in &fan_in {
                            routed[u] = Some(input_error[offset..offset + width].to_vec());
                            offset += width;
                        }
                    }
                    break;
                }
            }
        }

        self.samples += 1;
    }

    /// Applies the averaged gradients with momentum and zeroes the
    /// accumulators:
    /// `v = momentum * v - rate * g / n; w += v`.
    pub fn apply_backpr(&mut self) {
        let rate = self.topology.config.learning_rate;
        let momentum = self.topology.config.momentum;
        let scale = 1.0 / self.batch_size as f64;
        debug!(
            "applying {} accumulated samples over batch size {}",
            self.samples, self.batch_size
        );

        for (net, net_grads) in self.topology.nets.iter_mut().zip(&mut self.grads) {
            for (layer, acc) in net.layers.iter_mut().zip(net_grads.iter_mut()) {
                layer.apply_gradients(&acc.weights, &acc.biases, scale, rate, momentum);
                acc.clear();
            }
        }
        self.samples = 0;
    }

    /// Discards the accumulated gradients, keeping the allocation.
    pub fn clear_backpr(&mut self) {
        for acc in self.grads.iter_mut().flatten() {
            acc.clear();
        }
        self.samples = 0;
    }

    /// Releases the accumulators and the borrow on the topology.
    pub fn end_backpr(self) {}
}
