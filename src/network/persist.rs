//! Binary weight file.
//!
//! Layout, all little-endian, no header or version:
//! ```text
//! u32                     number of nets
//! per net, declaration order:
//!   u32                   number of layers
//!   u32                   num_input
//!   u8                    source flag (0 or 1)
//!   i16                   output link (-1 for the terminal net)
//!   u32 × layers          neurons per layer
//! per net, per layer:
//!   f64 × (in × out)      weights, row-major
//!   f64 × out             biases
//! ```
//! Momentum state is not stored.

use std::io::{Read, Write};
use std::path::Path;

use log::info;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::network::{
    spec::{NetSpec, TopologySpec},
    topology::Topology,
};

/// Default weight file name.
pub const WEIGHTS_FILE: &str = "weights";

impl Topology {
    /// Writes structure, weights and biases to `writer`.
    pub fn save_weights<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&header_u32(self.nets.len(), "net count")?.to_le_bytes())?;
        for net in &self.nets {
            writer.write_all(&header_u32(net.layers.len(), "layer count")?.to_le_bytes())?;
            writer.write_all(&header_u32(net.num_input, "num_input")?.to_le_bytes())?;
            writer.write_all(&[u8::from(net.source)])?;
            let link: i16 = match net.output {
                Some(o) => i16::try_from(o)
                    .map_err(|_| Error::Format(format!("output link {o} does not fit the weight file")))?,
                None => -1,
            };
            writer.write_all(&link.to_le_bytes())?;
            for layer in &net.layers {
                writer.write_all(&header_u32(layer.size, "layer size")?.to_le_bytes())?;
            }
        }

        for layer in self.nets.iter().flat_map(|n| &n.layers) {
            for w in &layer.weights.data {
                writer.write_all(&w.to_le_bytes())?;
            }
            for b in &layer.biases {
                writer.write_all(&b.to_le_bytes())?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Rebuilds a topology from a stream written by [`Topology::save_weights`].
    ///
    /// Fails with `Error::Format` when the stream is truncated, has trailing
    /// bytes, or declares dimensions the remaining bytes cannot hold, and with
    /// `Error::Configuration` when the stored structure is not a valid
    /// topology under `config`.
    pub fn load_weights<R: Read>(mut reader: R, config: EngineConfig) -> Result<Topology> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let mut cursor = Cursor { bytes: &bytes, pos: 0 };

        let net_count = cursor.u32()? as usize;
        // Every net header takes at least 11 bytes.
        cursor.ensure(net_count.saturating_mul(11), "net headers")?;
        let mut nets = Vec::with_capacity(net_count);
        for _ in 0..net_count {
            let layer_count = cursor.u32()? as usize;
            let num_input = cursor.u32()? as usize;
            let source = match cursor.u8()? {
                0 => false,
                1 => true,
                other => return Err(Error::Format(format!("invalid source flag {other}"))),
            };
            let output = match cursor.i16()? {
                -1 => None,
                o if o >= 0 => Some(o as usize),
                o => return Err(Error::Format(format!("invalid output link {o}"))),
            };
            cursor.ensure(layer_count.saturating_mul(4), "layer sizes")?;
            let layers = (0..layer_count)
                .map(|_| cursor.u32().map(|s| s as usize))
                .collect::<Result<Vec<_>>>()?;
            nets.push(NetSpec { layers, num_input, source, output });
        }

        // Check declared dimensions against the bytes left before allocating.
        let parameters = nets
            .iter()
            .try_fold(0usize, |acc, net| {
                let mut fan_in = net.num_input;
                net.layers.iter().try_fold(acc, |acc, &size| {
                    let count = fan_in.checked_mul(size)?.checked_add(size)?;
                    fan_in = size;
                    acc.checked_add(count)
                })
            })
            .and_then(|count| count.checked_mul(8))
            .ok_or_else(|| Error::Format("declared layer dimensions overflow".into()))?;
        cursor.ensure(parameters, "layer parameters")?;

        let mut topology = Topology::assemble(&TopologySpec { nets }, config)?;

        for layer in topology.nets.iter_mut().flat_map(|n| &mut n.layers) {
            for w in layer.weights.data.iter_mut() {
                *w = cursor.f64()?;
            }
            for b in layer.biases.iter_mut() {
                *b = cursor.f64()?;
            }
        }

        if cursor.remaining() != 0 {
            return Err(Error::Format(format!(
                "{} unexpected trailing bytes in weight stream",
                cursor.remaining()
            )));
        }
        Ok(topology)
    }

    /// Writes the weight file at `path`.
    pub fn save_weights_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.save_weights(std::io::BufWriter::new(file))?;
        info!("saved {} parameters to {}", self.parameter_count(), path.display());
        Ok(())
    }

    /// Loads the weight file at `path`.
    pub fn load_weights_file<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<Topology> {
        let path = path.as_ref();
        info!("loading weights from {}", path.display());
        let file = std::fs::File::open(path)?;
        let topology = Topology::load_weights(std::io::BufReader::new(file), config)?;
        info!("loaded {} nets from {}", topology.nets.len(), path.display());
        Ok(topology)
    }
}

fn header_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::Format(format!("{what} {value} does not fit the weight file")))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn ensure(&self, needed: usize, what: &str) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::Format(format!(
                "weight stream truncated: {what} need {needed} bytes, {} left",
                self.remaining()
            )));
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N, "field")?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.take()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take()?))
    }
}
