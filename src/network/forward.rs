use crate::network::topology::Topology;

impl Topology {
    /// Forward pass through every net in dependency order.
    ///
    /// Every source net reads `input`; downstream nets read the concatenated
    /// final activations of their upstream nets in declaration order. Every
    /// layer applies the hidden activation except the terminal net's final
    /// layer, whose scores pass through the configured output transform.
    /// Activations are cached on the layers for backprop.
    ///
    /// Panics if `input` does not have the configured input length.
    pub fn run(&mut self, input: &[f64]) -> Vec<f64> {
        assert_eq!(
            input.len(),
            self.config.input_len(),
            "input vector has {} values, the topology expects {}",
            input.len(),
            self.config.input_len()
        );
        let activation = self.config.hidden_activation;

        for &id in &self.order {
            let net_input: Vec<f64> = if self.nets[id].source {
                input.to_vec()
            } else {
                self.upstream[id]
                    .iter()
                    .flat_map(|&u| self.nets[u].final_activations().iter().copied())
                    .collect()
            };

            let is_terminal = id == self.terminal;
            let net = &mut self.nets[id];
            let last = net.layers.len() - 1;
            let mut current = net_input.clone();
            for (l, layer) in net.layers.iter_mut().enumerate() {
                let f = if is_terminal && l == last { None } else { Some(activation) };
                current = layer.feed_from(&current, f).to_vec();
            }
            net.input = net_input;
        }

        self.fed = true;
        self.config
            .output_transform
            .apply(self.nets[self.terminal].final_activations())
    }
}
