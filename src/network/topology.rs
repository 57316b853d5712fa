use std::collections::VecDeque;

use log::{debug, info};
use rand::Rng;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::network::{
    net::Net,
    spec::{NetSpec, TopologySpec},
};

/// An arena of nets linked by output indices, with a precomputed
/// dependency order.
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) nets: Vec<Net>,
    /// Nets ordered so every net comes after all of its upstream nets.
    pub(crate) order: Vec<usize>,
    /// Upstream nets of each net, in declaration order.
    pub(crate) upstream: Vec<Vec<usize>>,
    pub(crate) terminal: usize,
    pub(crate) config: EngineConfig,
    /// Set once a forward pass has populated the layer activations.
    pub(crate) fed: bool,
}

impl Topology {
    /// Validates `spec` against `config` and allocates zero-filled storage
    /// for every layer.
    ///
    /// Fails with `Error::Configuration` on out-of-range or cyclic output
    /// links, a missing or duplicated terminal net, or layer widths that do
    /// not chain.
    pub fn assemble(spec: &TopologySpec, config: EngineConfig) -> Result<Topology> {
        info!("assembling topology of {} nets", spec.nets.len());
        config.validate()?;
        let nets = &spec.nets;
        let n = nets.len();
        if n == 0 {
            return Err(Error::Configuration("topology has no nets".into()));
        }

        for (i, net) in nets.iter().enumerate() {
            if net.layers.is_empty() {
                return Err(Error::Configuration(format!("net {i} has no layers")));
            }
            if net.num_input == 0 || net.layers.contains(&0) {
                return Err(Error::Configuration(format!("net {i} has a zero-width layer or input")));
            }
            match net.output {
                Some(o) if o >= n => {
                    return Err(Error::Configuration(format!(
                        "net {i} outputs to net {o}, but only {n} nets exist"
                    )))
                }
                Some(o) if o == i => {
                    return Err(Error::Configuration(format!("net {i} outputs to itself")))
                }
                _ => {}
            }
        }

        let terminals: Vec<usize> = (0..n).filter(|&i| nets[i].output.is_none()).collect();
        let terminal = match terminals.as_slice() {
            [t] => *t,
            [] => return Err(Error::Configuration("no terminal net (every net has an output link)".into())),
            _ => {
                return Err(Error::Configuration(format!(
                    "expected exactly one terminal net, found {:?}",
                    terminals
                )))
            }
        };

        // Each net has a single output link, so a walk that does not reach
        // the terminal within n steps is caught in a cycle.
        for start in 0..n {
            let mut current = start;
            let mut steps = 0;
            while let Some(next) = nets[current].output {
                current = next;
                steps += 1;
                if steps > n {
                    return Err(Error::Configuration(format!(
                        "output links starting at net {start} form a cycle"
                    )));
                }
            }
        }

        let mut upstream = vec![Vec::new(); n];
        for (i, net) in nets.iter().enumerate() {
            if let Some(o) = net.output {
                upstream[o].push(i);
            }
        }

        let input_len = config.input_len();
        for (i, net) in nets.iter().enumerate() {
            if net.source {
                if !upstream[i].is_empty() {
                    return Err(Error::Configuration(format!(
                        "source net {i} also receives input from nets {:?}",
                        upstream[i]
                    )));
                }
                if net.num_input != input_len {
                    return Err(Error::Configuration(format!(
                        "source net {i} expects {} inputs, the feature vector has {input_len}",
                        net.num_input
                    )));
                }
            } else {
                if upstream[i].is_empty() {
                    return Err(Error::Configuration(format!(
                        "net {i} is not a source and has no upstream net"
                    )));
                }
                let fan_in: usize = upstream[i]
                    .iter()
                    .map(|&u| *nets[u].layers.last().unwrap_or(&0))
                    .sum();
                if net.num_input != fan_in {
                    return Err(Error::Configuration(format!(
                        "net {i} expects {} inputs, its upstream nets produce {fan_in}",
                        net.num_input
                    )));
                }
            }
        }

        let classes = *nets[terminal].layers.last().unwrap_or(&0);
        if classes > config.max_classes {
            return Err(Error::Configuration(format!(
                "terminal net has {classes} outputs, more than the {} supported classes",
                config.max_classes
            )));
        }

        let order = dependency_order(&upstream, nets);
        debug!("dependency order: {:?}", order);

        let topology = Topology {
            nets: nets.iter().map(Net::from_spec).collect(),
            order,
            upstream,
            terminal,
            config,
            fed: false,
        };
        info!(
            "topology assembled: {} parameters, {} output classes",
            topology.parameter_count(),
            classes
        );
        Ok(topology)
    }

    /// Draws random weights and biases for every layer and resets momentum.
    pub fn init_random_weights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for net in &mut self.nets {
            for layer in &mut net.layers {
                layer.randomize(rng);
            }
        }
    }

    pub fn spec(&self) -> TopologySpec {
        TopologySpec { nets: self.nets.iter().map(Net::spec).collect() }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn net(&self, id: usize) -> &Net {
        &self.nets[id]
    }

    pub fn net_mut(&mut self, id: usize) -> &mut Net {
        &mut self.nets[id]
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn upstream(&self, id: usize) -> &[usize] {
        &self.upstream[id]
    }

    pub fn terminal(&self) -> usize {
        self.terminal
    }

    /// Width of the terminal net's output.
    pub fn num_classes(&self) -> usize {
        self.nets[self.terminal].output_width()
    }

    pub fn parameter_count(&self) -> usize {
        self.nets
            .iter()
            .flat_map(|n| &n.layers)
            .map(|l| l.weights.data.len() + l.biases.len())
            .sum()
    }
}

/// Kahn's algorithm over the output links; nets become ready in
/// declaration order.
fn dependency_order(upstream: &[Vec<usize>], nets: &[NetSpec]) -> Vec<usize> {
    let mut pending: Vec<usize> = upstream.iter().map(Vec::len).collect();
    let mut ready: VecDeque<usize> = (0..nets.len()).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(nets.len());

    while let Some(id) = ready.pop_front() {
        order.push(id);
        if let Some(next) = nets[id].output {
            pending[next] -= 1;
            if pending[next] == 0 {
                ready.push_back(next);
            }
        }
    }

    order
}
