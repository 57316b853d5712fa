/// Symbols of the 36 supported classes, by class index.
pub const CLASS_SYMBOLS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Result of [`hit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// 1.0 when the predicted class is the expected one, else 0.0. A float so
    /// it averages the same way as [`cross_entropy`].
    pub score: f64,
    /// Index of the highest output (first one on ties).
    pub index: usize,
    pub value: f64,
}

/// Index and value of the highest output; the first one wins on ties.
///
/// Panics on an empty output.
pub fn argmax(output: &[f64]) -> (usize, f64) {
    assert!(!output.is_empty(), "argmax called on an empty output");
    let mut index = 0;
    let mut value = output[0];
    for (i, &v) in output.iter().enumerate().skip(1) {
        if v > value {
            index = i;
            value = v;
        }
    }
    (index, value)
}

/// Compares the arg-max of `output` with `expected`.
pub fn hit(output: &[f64], expected: usize) -> Hit {
    let (index, value) = argmax(output);
    Hit {
        score: if index == expected { 1.0 } else { 0.0 },
        index,
        value,
    }
}

/// Cross-entropy in nats: `-ln(output[expected])`.
///
/// `output` must already be a probability distribution; nothing is
/// normalized here. Panics if `expected` is out of range.
pub fn cross_entropy(output: &[f64], expected: usize) -> f64 {
    assert!(
        expected < output.len(),
        "expected class {expected} is outside the {} outputs",
        output.len()
    );
    -output[expected].ln()
}

/// Printable symbol for a class index.
pub fn class_symbol(index: usize) -> Option<char> {
    CLASS_SYMBOLS.get(index).map(|&b| b as char)
}

/// Class index for a printable symbol (case-insensitive).
pub fn class_index(symbol: char) -> Option<usize> {
    let upper = symbol.to_ascii_uppercase();
    CLASS_SYMBOLS.iter().position(|&b| b as char == upper)
}
