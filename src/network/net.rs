use crate::network::{layer::Layer, spec::NetSpec};

/// One feedforward sub-network.
#[derive(Debug, Clone)]
pub struct Net {
    pub layers: Vec<Layer>,
    pub num_input: usize,
    pub source: bool,
    pub output: Option<usize>,
    /// Input vector of the most recent forward pass.
    pub(crate) input: Vec<f64>,
}

impl Net {
    /// Allocates zero-filled layers from a validated spec.
    pub(crate) fn from_spec(spec: &NetSpec) -> Net {
        let mut layers = Vec::with_capacity(spec.layers.len());
        let mut input_size = spec.num_input;
        for &size in &spec.layers {
            layers.push(Layer::new(size, input_size));
            input_size = size;
        }
        Net {
            layers,
            num_input: spec.num_input,
            source: spec.source,
            output: spec.output,
            input: vec![0.0; spec.num_input],
        }
    }

    pub fn spec(&self) -> NetSpec {
        NetSpec {
            layers: self.layers.iter().map(|l| l.size).collect(),
            num_input: self.num_input,
            source: self.source,
            output: self.output,
        }
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Width of the final layer.
    pub fn output_width(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    pub fn final_activations(&self) -> &[f64] {
        self.layers.last().map_or(&[][..], |l| l.activations.as_slice())
    }
}
