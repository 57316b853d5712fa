use serde::{Deserialize, Serialize};

/// Element-wise nonlinearity applied to every layer except the terminal
/// network's final layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Tanh,
    Sigmoid,
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative evaluated at the pre-activation `z`.
    pub fn derivative(&self, z: f64) -> f64 {
        match self {
            ActivationFunction::Tanh => {
                let t = z.tanh();
                1.0 - t * t
            }
            ActivationFunction::Sigmoid => {
                let fz = self.function(z);
                fz * (1.0 - fz)
            }
            ActivationFunction::Identity => 1.0,
        }
    }
}

/// Transform applied to the terminal network's raw scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTransform {
    /// Normalizes scores into a probability distribution.
    /// Paired with `output - one_hot` as the backprop error signal this is
    /// the exact cross-entropy gradient.
    Softmax,
    /// Scores are returned as-is.
    Identity,
}

impl OutputTransform {
    pub fn apply(&self, scores: &[f64]) -> Vec<f64> {
        match self {
            OutputTransform::Softmax => softmax(scores),
            OutputTransform::Identity => scores.to_vec(),
        }
    }
}

/// Numerically stable softmax (max is subtracted before exponentiating).
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0, 1000.0]);
        let total: f64 = p.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(p[3] > 0.999);
    }

    #[test]
    fn tanh_derivative_at_zero_is_one() {
        assert_eq!(ActivationFunction::Tanh.derivative(0.0), 1.0);
        assert_eq!(ActivationFunction::Tanh.function(0.0), 0.0);
    }
}
