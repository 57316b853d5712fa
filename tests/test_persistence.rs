// Tests for the binary weight file.

mod common;

use common::{all_weights, fan_in_spec, random_input, random_topology, small_config};
use ocr_nn::{Error, Topology, TopologySpec};

fn saved_bytes(topology: &Topology) -> Vec<u8> {
    let mut bytes = Vec::new();
    topology.save_weights(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_round_trip_is_bit_identical() {
    let config = small_config();
    let n = config.input_len();
    let mut original = random_topology(&fan_in_spec(n), config.clone(), 31);

    let bytes = saved_bytes(&original);
    let mut loaded = Topology::load_weights(bytes.as_slice(), config).unwrap();

    assert_eq!(loaded.spec(), original.spec());
    assert_eq!(loaded.order(), original.order());
    let (a, b) = (all_weights(&original), all_weights(&loaded));
    assert_eq!(a.len(), b.len());
    assert!(a.iter().zip(&b).all(|(x, y)| x.to_bits() == y.to_bits()));

    let input = random_input(n, 32);
    assert_eq!(original.run(&input), loaded.run(&input));
}

#[test]
fn test_layout_size() {
    let config = small_config();
    let n = config.input_len();
    let topology = random_topology(&TopologySpec::single(n, vec![5, 3]), config, 1);
    let bytes = saved_bytes(&topology);
    let header = 4 + (4 + 4 + 1 + 2 + 2 * 4);
    let parameters = (n * 5 + 5 + 5 * 3 + 3) * 8;
    assert_eq!(bytes.len(), header + parameters);
    // terminal link is stored as -1
    assert_eq!(&bytes[13..15], &(-1i16).to_le_bytes());
}

#[test]
fn test_truncated_stream_is_format_error() {
    let config = small_config();
    let n = config.input_len();
    let topology = random_topology(&fan_in_spec(n), config.clone(), 2);
    let bytes = saved_bytes(&topology);

    for cut in [0, 3, 10, 30, bytes.len() - 1] {
        let result = Topology::load_weights(&bytes[..cut], config.clone());
        assert!(matches!(result, Err(Error::Format(_))), "cut at {cut}");
    }
}

#[test]
fn test_trailing_bytes_are_format_error() {
    let config = small_config();
    let n = config.input_len();
    let topology = random_topology(&TopologySpec::single(n, vec![3]), config.clone(), 2);
    let mut bytes = saved_bytes(&topology);
    bytes.push(0);
    assert!(matches!(Topology::load_weights(bytes.as_slice(), config), Err(Error::Format(_))));
}

#[test]
fn test_oversized_dimensions_are_format_error() {
    let config = small_config();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&(config.input_len() as u32).to_le_bytes());
    bytes.push(1);
    bytes.extend_from_slice(&(-1i16).to_le_bytes());
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 64]);

    assert!(matches!(Topology::load_weights(bytes.as_slice(), config), Err(Error::Format(_))));
}

#[test]
fn test_invalid_source_flag_is_format_error() {
    let config = small_config();
    let n = config.input_len();
    let topology = random_topology(&TopologySpec::single(n, vec![3]), config.clone(), 2);
    let mut bytes = saved_bytes(&topology);
    bytes[12] = 7;
    assert!(matches!(Topology::load_weights(bytes.as_slice(), config), Err(Error::Format(_))));
}

#[test]
fn test_stored_structure_is_validated() {
    let config = small_config();
    let n = config.input_len();
    let topology = random_topology(&TopologySpec::single(n, vec![3]), config.clone(), 2);
    let mut bytes = saved_bytes(&topology);
    // point the only net's output link at a net that does not exist
    bytes[13..15].copy_from_slice(&4i16.to_le_bytes());
    assert!(matches!(
        Topology::load_weights(bytes.as_slice(), config),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_file_round_trip() {
    let config = small_config();
    let n = config.input_len();
    let topology = random_topology(&fan_in_spec(n), config.clone(), 41);
    let path = std::env::temp_dir().join(format!("ocr-nn-weights-{}", std::process::id()));

    topology.save_weights_file(&path).unwrap();
    let loaded = Topology::load_weights_file(&path, config.clone()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(all_weights(&loaded), all_weights(&topology));
    assert!(matches!(
        Topology::load_weights_file(&path, config),
        Err(Error::Io(_))
    ));
}
