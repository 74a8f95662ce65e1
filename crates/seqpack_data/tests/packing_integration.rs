//! Integration tests for sequence pair packing.
//!
//! These tests pack small hand-written sequences and check the resulting
//! shapes, values and masks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use burn_ndarray::NdArray;
use ndarray::s;

use seqpack_data::{
    AlignmentMode, Compose, DataError, LabelEncoding, LabelIndexConverter, PackerConfig,
    Sequence, SequenceDataSet, TwoSequencePacker, Value,
};

type TestBackend = NdArray;

/// Build a sequence of `len` steps with `width` channels, value = 10 * t + c + offset.
fn sequence(len: usize, width: usize, offset: f64) -> Sequence {
    (0..len)
        .map(|t| {
            (0..width)
                .map(|c| Value::Float(10.0 * t as f64 + c as f64 + offset))
                .collect()
        })
        .collect()
}

fn regression(mode: AlignmentMode) -> TwoSequencePacker {
    TwoSequencePacker::new(PackerConfig::regression().with_alignment(mode)).unwrap()
}

fn close(a: f32, b: f64) -> bool {
    (f64::from(a) - b).abs() < 1e-6
}

#[test]
fn test_equal_length_identity_in_every_mode() {
    let features = sequence(4, 3, 0.0);
    let labels = sequence(4, 2, 0.5);

    for mode in AlignmentMode::ALL {
        let ds = regression(mode).pack(&features, &labels).unwrap();
        assert!(!ds.has_masks(), "{mode} should not mask equal lengths");
        assert_eq!(ds.features_shape().as_array(), [1, 3, 4]);
        assert_eq!(ds.labels_shape().as_array(), [1, 2, 4]);

        for t in 0..4 {
            for c in 0..3 {
                assert!(close(ds.features()[[0, c, t]], 10.0 * t as f64 + c as f64));
            }
            for c in 0..2 {
                assert!(close(ds.labels()[[0, c, t]], 10.0 * t as f64 + c as f64 + 0.5));
            }
        }
    }
}

#[test]
fn test_align_end_pads_labels_at_front() {
    let features = sequence(5, 2, 0.0);
    let labels = sequence(3, 1, 1.0);

    let ds = regression(AlignmentMode::AlignEnd).pack(&features, &labels).unwrap();
    assert_eq!(ds.labels_shape().len(), 5);
    assert!(ds.features_mask().is_none());
    assert_eq!(
        ds.labels_mask().unwrap().row(0).to_vec(),
        vec![0.0, 0.0, 1.0, 1.0, 1.0]
    );

    let out = ds.labels().slice(s![0, 0, ..]).to_vec();
    assert_eq!(out[0], 0.0);
    assert_eq!(out[1], 0.0);
    assert!(close(out[2], 1.0));
    assert!(close(out[3], 11.0));
    assert!(close(out[4], 21.0));
}

#[test]
fn test_align_start_pads_labels_at_end() {
    let features = sequence(5, 2, 0.0);
    let labels = sequence(3, 1, 1.0);

    let ds = regression(AlignmentMode::AlignStart).pack(&features, &labels).unwrap();
    assert_eq!(
        ds.labels_mask().unwrap().row(0).to_vec(),
        vec![1.0, 1.0, 1.0, 0.0, 0.0]
    );

    let out = ds.labels().slice(s![0, 0, ..]).to_vec();
    assert!(close(out[0], 1.0));
    assert!(close(out[1], 11.0));
    assert!(close(out[2], 21.0));
    assert_eq!(out[3], 0.0);
    assert_eq!(out[4], 0.0);
}

#[test]
fn test_exactly_one_mask_when_lengths_differ() {
    for mode in [AlignmentMode::AlignStart, AlignmentMode::AlignEnd] {
        let longer_features = regression(mode)
            .pack(&sequence(6, 1, 0.0), &sequence(2, 1, 0.0))
            .unwrap();
        assert!(longer_features.features_mask().is_none());
        assert!(longer_features.labels_mask().is_some());

        let longer_labels = regression(mode)
            .pack(&sequence(2, 1, 0.0), &sequence(6, 1, 0.0))
            .unwrap();
        assert!(longer_labels.features_mask().is_some());
        assert!(longer_labels.labels_mask().is_none());
        assert_eq!(longer_labels.features_shape().len(), 6);
    }
}

#[test]
fn test_classification_width_is_num_classes() {
    let features = sequence(3, 2, 0.0);

    let dense = TwoSequencePacker::new(PackerConfig::classification(4, LabelEncoding::Dense)).unwrap();
    let one_hot_rows: Sequence = (0..3)
        .map(|t| (0..4).map(|c| Value::Int(i64::from(c == t))).collect())
        .collect();
    let ds = dense.pack(&features, &one_hot_rows).unwrap();
    assert_eq!(ds.labels_shape().vars(), 4);

    let indexed = TwoSequencePacker::new(PackerConfig::classification(4, LabelEncoding::OneHot)).unwrap();
    let class_ids: Sequence = vec![vec![Value::Int(3)], vec![Value::Int(0)], vec![Value::Int(1)]];
    let ds = indexed.pack(&features, &class_ids).unwrap();
    assert_eq!(ds.labels_shape().vars(), 4);
    assert_eq!(ds.labels().slice(s![0, .., 0]).to_vec(), vec![0.0, 0.0, 0.0, 1.0]);

    // Dense rows must match the class count exactly.
    let short_rows: Sequence = vec![vec![Value::Int(1)]; 3];
    assert!(matches!(
        dense.pack(&features, &short_rows),
        Err(DataError::MalformedStep { expected: 4, got: 1, .. })
    ));
}

#[test]
fn test_unsupported_mode_produces_no_batch() {
    let err = PackerConfig::from_json(
        r#"{ "target": { "kind": "regression" }, "alignment": "ALIGN_CENTER" }"#,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::UnsupportedMode(_)));
    assert!(!err.is_invalid_input());
}

#[test]
fn test_pre_processor_runs_once_and_changes_stick() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let packer = regression(AlignmentMode::AlignEnd).with_pre_processor(
        move |ds: &mut SequenceDataSet| -> seqpack_data::Result<()> {
            counter.fetch_add(1, Ordering::SeqCst);
            assert!(ds.labels_mask().is_some());
            ds.features_mut().mapv_inplace(|v| v * 2.0);
            Ok(())
        },
    );

    let ds = packer.pack(&sequence(3, 1, 1.0), &sequence(1, 1, 0.0)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(close(ds.features()[[0, 0, 2]], 42.0));
}

#[test]
fn test_composed_pre_processors_run_in_order() {
    let packer = regression(AlignmentMode::AlignStart).with_pre_processor(
        Compose::new()
            .then(|ds: &mut SequenceDataSet| -> seqpack_data::Result<()> {
                ds.features_mut().mapv_inplace(|v| v + 1.0);
                Ok(())
            })
            .then(|ds: &mut SequenceDataSet| -> seqpack_data::Result<()> {
                ds.features_mut().mapv_inplace(|v| v * 10.0);
                Ok(())
            }),
    );

    let ds = packer.pack(&sequence(2, 1, 0.0), &sequence(2, 1, 0.0)).unwrap();
    assert!(close(ds.features()[[0, 0, 0]], 10.0));
    assert!(close(ds.features()[[0, 0, 1]], 110.0));
    assert!(close(ds.labels()[[0, 0, 1]], 10.0));
}

#[test]
fn test_failing_converter_produces_no_dataset() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let packer = regression(AlignmentMode::AlignEnd)
        .with_converter(|v: &Value| -> seqpack_data::Result<Value> {
            match v {
                Value::Text(s) if s == "corrupt" => {
                    Err(DataError::Conversion(format!("cannot read {:?}", s)))
                }
                other => Ok(other.clone()),
            }
        })
        .with_pre_processor(move |_: &mut SequenceDataSet| -> seqpack_data::Result<()> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

    let mut features = sequence(4, 2, 0.0);
    features[2][1] = Value::from("corrupt");
    let err = packer.pack(&features, &sequence(1, 1, 0.0)).unwrap_err();
    assert!(matches!(err, DataError::Conversion(ref m) if m.contains("corrupt")));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let results = packer.pack_all(&[(features, sequence(1, 1, 0.0))]);
    assert!(matches!(results[0], Err(DataError::Conversion(_))));
}

#[test]
fn test_category_labels_become_one_hot() {
    let labels = LabelIndexConverter::new(["low", "mid", "high"]).unwrap();
    let packer = TwoSequencePacker::new(
        PackerConfig::classification(3, LabelEncoding::OneHot)
            .with_alignment(AlignmentMode::AlignEnd),
    )
    .unwrap()
    .with_converter(labels);

    let ds = packer
        .pack(&sequence(3, 1, 0.0), &[vec![Value::from("high")]])
        .unwrap();
    assert_eq!(ds.labels().slice(s![0, .., 2]).to_vec(), vec![0.0, 0.0, 1.0]);
    assert!(ds.labels().slice(s![0, .., ..2]).iter().all(|&v| v == 0.0));
}

#[test]
fn test_converter_applies_to_both_sides() {
    let packer = regression(AlignmentMode::EqualLength).with_converter(
        |v: &Value| -> seqpack_data::Result<Value> {
            match v {
                Value::Text(s) if s == "missing" => Ok(Value::Float(-1.0)),
                other => Ok(other.clone()),
            }
        },
    );

    let features = vec![vec![Value::from("missing")], vec![Value::from("2.5")]];
    let labels = vec![vec![Value::from(1.0)], vec![Value::from("missing")]];
    let ds = packer.pack(&features, &labels).unwrap();
    assert!(close(ds.features()[[0, 0, 0]], -1.0));
    assert!(close(ds.features()[[0, 0, 1]], 2.5));
    assert!(close(ds.labels()[[0, 0, 1]], -1.0));
}

#[test]
fn test_empty_sequences_rejected() {
    let packer = regression(AlignmentMode::AlignStart);
    let err = packer.pack(&[], &sequence(2, 1, 0.0)).unwrap_err();
    assert!(matches!(err, DataError::EmptySequence { .. }));
    assert!(err.is_invalid_input());

    assert!(packer.pack(&sequence(2, 1, 0.0), &[]).is_err());
}

#[test]
fn test_pack_all_isolates_failures() {
    let packer = regression(AlignmentMode::AlignEnd);
    let pairs = vec![
        (sequence(4, 2, 0.0), sequence(2, 1, 0.0)),
        (sequence(3, 2, 0.0), Vec::new()),
        (sequence(2, 2, 0.0), sequence(5, 1, 0.0)),
    ];

    let results = packer.pack_all(&pairs);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().labels_shape().len(), 4);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().features_shape().len(), 5);
}

#[test]
fn test_to_batch_carries_mask() {
    let device = Default::default();
    let ds = regression(AlignmentMode::AlignStart)
        .pack(&sequence(2, 3, 0.0), &sequence(4, 1, 0.0))
        .unwrap();

    let batch = ds.to_batch::<TestBackend>(&device).unwrap();
    assert_eq!(batch.x.shape().as_array(), [1, 3, 4]);
    assert_eq!(batch.y.shape().as_array(), [1, 1, 4]);
    assert!(batch.y_mask.is_none());

    let mask = batch
        .x_mask
        .unwrap()
        .into_inner()
        .into_data()
        .to_vec::<f32>()
        .unwrap();
    assert_eq!(mask, vec![1.0, 1.0, 0.0, 0.0]);

    let x = batch.x.into_inner().into_data().to_vec::<f32>().unwrap();
    // channel 1: steps 0 and 1 hold 1.0 and 11.0, then padding
    assert_eq!(&x[4..8], &[1.0, 11.0, 0.0, 0.0]);
}
