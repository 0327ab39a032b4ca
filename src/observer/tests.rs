//! Tests for the observer trait and the min/max observer

use super::*;
use crate::error::CalibrationError;
use crate::qparams::{QuantDType, QuantScheme};
use approx::assert_abs_diff_eq;
use ndarray::arr1;
use proptest::prelude::*;

// ========================================================================
// PROPERTY TESTS - Range tracking
// ========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// The tracked range equals the elementwise min/max over all batches
    #[test]
    fn prop_range_captures_all_batches(
        batch1 in prop::collection::vec(-100.0f32..100.0, 1..50),
        batch2 in prop::collection::vec(-100.0f32..100.0, 1..50),
    ) {
        let mut observer = MinMaxObserver::default_activation();
        observer.observe_slice(&batch1);
        observer.observe_slice(&batch2);

        let all: Vec<f32> = batch1.iter().chain(batch2.iter()).copied().collect();
        let expected_min = all.iter().copied().fold(f32::INFINITY, f32::min);
        let expected_max = all.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        prop_assert_eq!(observer.min_val(), Some(expected_min));
        prop_assert_eq!(observer.max_val(), Some(expected_max));
    }

    /// Observation order never changes the tracked range
    #[test]
    fn prop_range_order_independent(
        batch1 in prop::collection::vec(-100.0f32..100.0, 1..50),
        batch2 in prop::collection::vec(-100.0f32..100.0, 1..50),
    ) {
        let mut forward = MinMaxObserver::default_activation();
        forward.observe_slice(&batch1);
        forward.observe_slice(&batch2);

        let mut reverse = MinMaxObserver::default_activation();
        reverse.observe_slice(&batch2);
        reverse.observe_slice(&batch1);

        prop_assert_eq!(forward.min_val(), reverse.min_val());
        prop_assert_eq!(forward.max_val(), reverse.max_val());
    }

    /// observe is pass-through: the returned tensor is the input, unchanged
    #[test]
    fn prop_observe_pass_through(data in prop::collection::vec(-10.0f32..10.0, 1..20)) {
        let mut observer = MinMaxObserver::default_activation();
        let x = arr1(&data).into_dyn();
        let y = observer.observe(&x);
        prop_assert!(std::ptr::eq(y, &x));
        prop_assert_eq!(y, &x);
    }
}

// ========================================================================
// UNIT TESTS
// ========================================================================

#[test]
fn test_running_min_max() {
    // Scenario: [1,2,3] then [-1,0,5] accumulates to [-1, 5]
    let mut observer = MinMaxObserver::default_activation();
    observer.observe_slice(&[1.0, 2.0, 3.0]);
    observer.observe_slice(&[-1.0, 0.0, 5.0]);

    assert_eq!(observer.min_val(), Some(-1.0));
    assert_eq!(observer.max_val(), Some(5.0));
}

#[test]
fn test_qparams_through_observer() {
    let mut observer = MinMaxObserver::new(QuantDType::Unsigned8, QuantScheme::Affine);
    observer.observe_slice(&[-1.0, 0.0, 2.0]);

    let qp = observer.calculate_qparams().unwrap();
    assert_abs_diff_eq!(qp.scale, 3.0 / 255.0, epsilon = 1e-9);
    assert_eq!(qp.zero_point, 85);
}

#[test]
fn test_uninitialized() {
    let mut observer = MinMaxObserver::default_activation();
    assert_eq!(observer.calculate_qparams().unwrap_err(), CalibrationError::Uninitialized);
}

#[test]
fn test_reset() {
    let mut observer = MinMaxObserver::default_activation();
    observer.observe_slice(&[1.0, 2.0]);
    assert!(observer.has_data());

    observer.reset();
    assert!(!observer.has_data());
    assert_eq!(observer.calculate_qparams().unwrap_err(), CalibrationError::Uninitialized);
}

#[test]
fn test_default_weight_is_symmetric_signed() {
    let mut observer = MinMaxObserver::default_weight();
    observer.observe_slice(&[-3.0, 1.0]);

    let qp = observer.calculate_qparams().unwrap();
    assert_eq!(qp.zero_point, 0);
    assert_abs_diff_eq!(qp.scale, 3.0 / 127.5, epsilon = 1e-9);
}

#[test]
fn test_empty_batch_skipped() {
    let mut observer = MinMaxObserver::default_activation();
    observer.observe_slice(&[]);
    assert!(!observer.has_data());

    observer.observe_slice(&[1.0]);
    observer.observe_slice(&[]);
    assert_eq!(observer.min_val(), Some(1.0));
}

#[test]
fn test_nan_values_ignored() {
    let mut observer = MinMaxObserver::default_activation();
    observer.observe_slice(&[1.0, f32::NAN, 3.0]);

    assert_eq!(observer.min_val(), Some(1.0));
    assert_eq!(observer.max_val(), Some(3.0));
}

#[test]
fn test_multidimensional_tensor() {
    let mut observer = MinMaxObserver::default_activation();
    let x = ndarray::arr2(&[[1.0f32, -2.0], [3.0, 0.5]]).into_dyn();
    observer.observe(&x);

    assert_eq!(observer.min_val(), Some(-2.0));
    assert_eq!(observer.max_val(), Some(3.0));
}

#[test]
fn test_non_contiguous_view() {
    // a transposed array is not in standard layout, exercising the
    // iterator fallback in observe
    let base = ndarray::arr2(&[[1.0f32, -4.0], [7.0, 0.0]]);
    let transposed = base.reversed_axes().into_dyn();
    assert!(transposed.as_slice().is_none());

    let mut observer = MinMaxObserver::default_activation();
    observer.observe(&transposed);

    assert_eq!(observer.min_val(), Some(-4.0));
    assert_eq!(observer.max_val(), Some(7.0));
}

#[test]
fn test_trait_object_dispatch() {
    let mut observers: Vec<Box<dyn Observer>> = vec![
        Box::new(MinMaxObserver::default_activation()),
        Box::new(HistogramObserver::default_activation().with_bins(16)),
    ];

    let x = arr1(&[-1.0f32, 0.0, 1.0, 2.0]).into_dyn();
    for observer in &mut observers {
        observer.observe(&x);
        let qp = observer.calculate_qparams().unwrap();
        assert!(qp.scale > 0.0);
        assert!(qp.zero_point >= 0 && qp.zero_point <= 255);
    }
}
