use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Describes one sub-network of the topology.
///
/// Fields:
/// - `layers`: neurons per layer, first to last in feedforward order
/// - `num_input`: width of the vector this net consumes. The feature vector
///   length for a source net, or the summed final-layer widths of its
///   upstream nets otherwise
/// - `source`: whether the net reads the feature vector directly
/// - `output`: index of the net consuming this net's final activations;
///   `None` marks the terminal net whose output is the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSpec {
    pub layers: Vec<usize>,
    pub num_input: usize,
    pub source: bool,
    pub output: Option<usize>,
}

impl NetSpec {
    pub fn source(num_input: usize, layers: Vec<usize>, output: Option<usize>) -> NetSpec {
        NetSpec { layers, num_input, source: true, output }
    }

    pub fn downstream(num_input: usize, layers: Vec<usize>, output: Option<usize>) -> NetSpec {
        NetSpec { layers, num_input, source: false, output }
    }
}

/// A serializable description of the whole topology, in declaration order.
///
/// Declaration order matters: it fixes fan-in concatenation order and the
/// weight-file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySpec {
    pub nets: Vec<NetSpec>,
}

impl TopologySpec {
    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `TopologySpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<TopologySpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// A single source net: `num_input` features through `layers`.
    pub fn single(num_input: usize, layers: Vec<usize>) -> TopologySpec {
        TopologySpec { nets: vec![NetSpec::source(num_input, layers, None)] }
    }
}
