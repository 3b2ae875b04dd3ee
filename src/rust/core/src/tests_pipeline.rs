// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto

//! End-to-end prediction tests against the reference artifact pair in
//! `fixtures/`.

use std::fs;
use std::path::PathBuf;

use crate::artifacts::ArtifactPaths;
use crate::error::{ArtifactKind, StrengthError};
use crate::prediction_kernel::{PredictionKernel, Predictor, StrengthPredictor};
use crate::tensors::{Feature, FeatureFrame, FeatureVector};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn reference_paths() -> ArtifactPaths {
    ArtifactPaths {
        scaler: fixture("reference_scaler.json"),
        model: fixture("reference_lightgbm_model.json"),
    }
}

fn reference_kernel() -> PredictionKernel {
    PredictionKernel::load(&reference_paths()).unwrap()
}

fn reference_mix() -> FeatureVector {
    FeatureVector::builder()
        .cement(150.0)
        .blast_furnace_slag(0.0)
        .fly_ash(0.0)
        .water(150.0)
        .superplasticizer(5.0)
        .coarse_aggregate(900.0)
        .fine_aggregate(800.0)
        .age(28)
        .build()
        .unwrap()
}

#[test]
fn test_reference_scenario() {
    let kernel = reference_kernel();
    assert_eq!(kernel.predict(&reference_mix()), 17.125);
}

#[test]
fn test_prediction_is_deterministic() {
    let kernel = reference_kernel();
    let mix = reference_mix();
    let first = kernel.predict(&mix);
    for _ in 0..100 {
        assert_eq!(kernel.predict(&mix).to_bits(), first.to_bits());
    }
    // A second load of the same files gives the same answer.
    assert_eq!(reference_kernel().predict(&mix).to_bits(), first.to_bits());
}

#[test]
fn test_column_order_matters() {
    let kernel = reference_kernel();

    // Cement and Coarse_Aggregate swapped
    let swapped = FeatureVector::new(900.0, 0.0, 0.0, 150.0, 5.0, 150.0, 800.0, 28.0).unwrap();
    let swapped_prediction = kernel.predict(&swapped);
    assert_eq!(swapped_prediction, 39.875);
    assert_ne!(swapped_prediction, 17.125);

    let mut reversed = *reference_mix().values();
    reversed.reverse();
    let reversed = FeatureVector::from_values(reversed).unwrap();
    assert_eq!(kernel.predict(&reversed), 27.125);
}

#[test]
fn test_other_reference_mixes() {
    let kernel = reference_kernel();
    let high_cement = FeatureVector::new(540.0, 0.0, 0.0, 162.0, 2.5, 1040.0, 676.0, 28.0).unwrap();
    assert_eq!(kernel.predict(&high_cement), 39.875);

    let blended = FeatureVector::new(300.0, 100.0, 50.0, 200.0, 10.0, 950.0, 900.0, 90.0).unwrap();
    assert_eq!(kernel.predict(&blended), 33.875);
}

#[test]
fn test_permuted_frame_is_refused() {
    let kernel = reference_kernel();
    let mix = reference_mix();

    assert_eq!(kernel.predict_frame(&mix.as_frame()).unwrap(), 17.125);

    let mut columns = Feature::column_names();
    columns.swap(
        Feature::Cement.index(),
        Feature::CoarseAggregate.index(),
    );
    let permuted = FeatureFrame::new(columns, mix.values().to_vec());
    let err = kernel.predict_frame(&permuted).unwrap_err();
    assert!(matches!(err, StrengthError::ShapeMismatch { .. }), "{:?}", err);

    let short = FeatureFrame::new(Vec::new(), Vec::new());
    assert_eq!(kernel.predict_frame(&short).unwrap_err().kind(), "shape_mismatch");
}

#[test]
fn test_report_carries_full_precision() {
    let report = reference_kernel().report(&reference_mix());
    assert_eq!(report.strength_mpa, 17.125);
    assert!(report.display.ends_with(" MPa"));
    assert!(report.advisories.is_empty());
    assert!(report.compute_time_ms >= 0.0);
}

#[test]
fn test_fingerprints_recorded() {
    let kernel = reference_kernel();
    let fps = kernel.fingerprints();
    assert_eq!(fps.len(), 2);
    assert_eq!(fps[0].artifact, ArtifactKind::Scaler);
    assert_eq!(fps[1].artifact, ArtifactKind::Model);
    assert!(fps.iter().all(|fp| fp.sha256.len() == 64));

    let scaler_bytes = fs::read(fixture("reference_scaler.json")).unwrap();
    assert_eq!(fps[0].size_bytes, scaler_bytes.len());
}

#[test]
fn test_missing_artifact_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths {
        scaler: fixture("reference_scaler.json"),
        model: dir.path().join("lightgbm_model.json"),
    };

    let err = PredictionKernel::load(&paths).unwrap_err();
    assert!(matches!(
        err,
        StrengthError::ArtifactUnavailable { artifact: ArtifactKind::Model, .. }
    ));

    let predictor = Predictor::startup(&paths);
    assert!(!predictor.is_available());
    assert_eq!(predictor.predict(&reference_mix()).unwrap_err(), err);
}

#[test]
fn test_corrupt_artifact_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let scaler = dir.path().join("scaler.json");
    fs::write(&scaler, b"\x00\x01 not json").unwrap();
    let paths = ArtifactPaths {
        scaler,
        model: fixture("reference_lightgbm_model.json"),
    };

    let err = PredictionKernel::load(&paths).unwrap_err();
    assert!(matches!(
        err,
        StrengthError::ArtifactUnavailable { artifact: ArtifactKind::Scaler, .. }
    ));
}

#[test]
fn test_ready_predictor() {
    let predictor = Predictor::startup(&reference_paths());
    assert!(predictor.is_available());
    assert_eq!(predictor.predict(&reference_mix()).unwrap(), 17.125);
}

#[test]
fn test_kernel_shared_across_threads() {
    let kernel = reference_kernel();
    let mix = reference_mix();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let kernel = kernel.clone();
                s.spawn(move || kernel.predict(&mix))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 17.125);
        }
    });
}

#[test]
fn test_wasm_predictor_json() {
    let scaler = fs::read_to_string(fixture("reference_scaler.json")).unwrap();
    let model = fs::read_to_string(fixture("reference_lightgbm_model.json")).unwrap();
    let predictor = StrengthPredictor::new(&scaler, &model);
    assert!(predictor.is_available());
    assert_eq!(predictor.unavailable_reason(), None);

    let mix = r#"{"cement":150,"slag":0,"fly_ash":0,"water":150,"sp":5,
                  "coarse_agg":900,"fine_agg":800,"age":28}"#;
    let ok: serde_json::Value = serde_json::from_str(&predictor.predict_json(mix)).unwrap();
    assert_eq!(ok["result"]["strength_mpa"], 17.125);
    assert_eq!(ok["result"]["strength_class"], "C12/15");

    let missing_age = r#"{"cement":150,"slag":0,"fly_ash":0,"water":150,"sp":5,
                          "coarse_agg":900,"fine_agg":800}"#;
    let err: serde_json::Value =
        serde_json::from_str(&predictor.predict_json(missing_age)).unwrap();
    assert_eq!(err["error"]["kind"], "invalid_input");
    assert_eq!(err["error"]["field"], "Age");
}

#[test]
fn test_wasm_predictor_unavailable() {
    let predictor = StrengthPredictor::new("{}", "not json");
    assert!(!predictor.is_available());
    assert!(predictor.unavailable_reason().is_some());

    let response: serde_json::Value =
        serde_json::from_str(&predictor.predict_json("{}")).unwrap();
    assert_eq!(response["error"]["kind"], "artifact_unavailable");
}
