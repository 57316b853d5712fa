use rand::Rng;

use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

#[derive(Debug, Clone)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    /// Shape `(input_size, size)`.
    pub weights: Matrix,
    pub biases: Vec<f64>,
    /// Pre-activation values (z = xW + b), needed for the derivative.
    pub pre_activations: Vec<f64>,
    pub activations: Vec<f64>,
    /// Error signal from the most recent backprop call.
    pub deltas: Vec<f64>,
    pub weight_velocity: Matrix,
    pub bias_velocity: Vec<f64>,
}

impl Layer {
    /// Allocates a zero-filled layer.
    pub fn new(size: usize, input_size: usize) -> Layer {
        Layer {
            size,
            input_size,
            weights: Matrix::zeros(input_size, size),
            biases: vec![0.0; size],
            pre_activations: vec![0.0; size],
            activations: vec![0.0; size],
            deltas: vec![0.0; size],
            weight_velocity: Matrix::zeros(input_size, size),
            bias_velocity: vec![0.0; size],
        }
    }

    /// Draws Xavier-normal weights and biases and resets momentum.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.weights = Matrix::xavier(self.input_size, self.size, self.input_size, rng);
        self.biases = Matrix::xavier(1, self.size, self.input_size, rng).data;
        self.weight_velocity.fill(0.0);
        self.bias_velocity.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Forward step. `activation` is `None` for the terminal layer, which
    /// leaves its scores linear.
    pub fn feed_from(&mut self, input: &[f64], activation: Option<ActivationFunction>) -> &[f64] {
        let mut z = self.weights.vec_mul(input);
        for (zi, b) in z.iter_mut().zip(&self.biases) {
            *zi += b;
        }
        self.activations = match activation {
            Some(f) => z.iter().map(|&x| f.function(x)).collect(),
            None => z.clone(),
        };
        self.pre_activations = z;
        &self.activations
    }

    /// Momentum update from an averaged gradient:
    /// `v = momentum * v - rate * g; w += v`.
    pub fn apply_gradients(
        &mut self,
        weights_grad: &Matrix,
        biases_grad: &[f64],
        scale: f64,
        rate: f64,
        momentum: f64,
    ) {
        let params = self.weights.data.iter_mut().zip(self.weight_velocity.data.iter_mut());
        for ((w, v), g) in params.zip(&weights_grad.data) {
            *v = momentum * *v - rate * g * scale;
            *w += *v;
        }
        let params = self.biases.iter_mut().zip(self.bias_velocity.iter_mut());
        for ((b, v), g) in params.zip(biases_grad) {
            *v = momentum * *v - rate * g * scale;
            *b += *v;
        }
    }
}

/// Element-wise (Hadamard) product of `error` with `f'(z)`.
pub fn hadamard_derivative(error: &[f64], pre_activations: &[f64], f: ActivationFunction) -> Vec<f64> {
    assert_eq!(error.len(), pre_activations.len());
    error
        .iter()
        .zip(pre_activations)
        .map(|(e, &z)| e * f.derivative(z))
        .collect()
}
