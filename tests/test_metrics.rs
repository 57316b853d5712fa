// Tests for hit and cross-entropy.

use approx::assert_relative_eq;
use ocr_nn::metrics::{argmax, cross_entropy, hit};

#[test]
fn test_hit_on_expected_class() {
    let h = hit(&[0.1, 0.7, 0.2], 1);
    assert_eq!(h.score, 1.0);
    assert_eq!(h.index, 1);
    assert_eq!(h.value, 0.7);
}

#[test]
fn test_miss_reports_prediction() {
    let h = hit(&[0.1, 0.7, 0.2], 2);
    assert_eq!(h.score, 0.0);
    assert_eq!(h.index, 1);
    assert_eq!(h.value, 0.7);
}

#[test]
fn test_first_maximum_wins_ties() {
    assert_eq!(argmax(&[0.4, 0.1, 0.4, 0.1]), (0, 0.4));
    assert_eq!(hit(&[0.2, 0.4, 0.4], 2).score, 0.0);
    assert_eq!(hit(&[0.2, 0.4, 0.4], 1).score, 1.0);
}

#[test]
fn test_cross_entropy_in_nats() {
    let ce = cross_entropy(&[0.1, 0.7, 0.2], 1);
    assert_relative_eq!(ce, -(0.7f64.ln()), epsilon = 1e-15);
    assert_relative_eq!(ce, 0.356675, epsilon = 1e-6);
}

#[test]
fn test_cross_entropy_of_certain_prediction_is_zero() {
    assert_eq!(cross_entropy(&[0.0, 1.0], 1), 0.0);
    assert!(cross_entropy(&[0.0, 1.0], 0).is_infinite());
}

#[test]
#[should_panic]
fn test_cross_entropy_out_of_range_panics() {
    cross_entropy(&[0.5, 0.5], 2);
}
