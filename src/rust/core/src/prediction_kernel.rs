// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// PredictionKernel: pre-fitted scaler -> regressor inference
//
// ============================================================================
// All model-based strength estimates go through this module. Shells (CLI,
// WASM host) construct it once at startup and share it; nothing here is
// mutated after construction.
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;

use crate::artifacts::{
    check_schema, read_artifact, ArtifactFingerprint, ArtifactPaths, FeatureTransform,
    ModelArtifact, Regressor, ScalerArtifact,
};
use crate::error::{ArtifactKind, StrengthError};
use crate::guardrails::{GuardrailEngine, RangeAdvisory};
use crate::report;
use crate::science::strength::StrengthClass;
use crate::tensors::{FeatureFrame, FeatureVector, MixDesignInput, FEATURE_COUNT};

/// Immutable inference context: one scaler, one regressor, loaded once.
#[derive(Clone)]
pub struct PredictionKernel {
    scaler: Arc<dyn FeatureTransform>,
    model: Arc<dyn Regressor>,
    fingerprints: Vec<ArtifactFingerprint>,
    guardrails: Arc<GuardrailEngine>,
}

impl fmt::Debug for PredictionKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionKernel")
            .field("fingerprints", &self.fingerprints)
            .finish_non_exhaustive()
    }
}

/// Full-precision prediction plus what a shell needs to show it.
#[derive(Clone, Debug, Serialize)]
pub struct PredictionReport {
    pub strength_mpa: f64,
    pub display: String,
    pub strength_class: StrengthClass,
    pub advisories: Vec<RangeAdvisory>,
    pub compute_time_ms: f32,
}

impl PredictionKernel {
    /// Read and validate both artifact files.
    ///
    /// # Errors
    /// `ArtifactUnavailable` for a missing file, a corrupt or unsupported
    /// blob, or a schema other than the eight canonical columns.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, StrengthError> {
        let scaler_bytes = read_artifact(ArtifactKind::Scaler, &paths.scaler)?;
        let model_bytes = read_artifact(ArtifactKind::Model, &paths.model)?;
        let kernel = Self::from_json(&scaler_bytes, &model_bytes)?;
        info!(
            scaler = %paths.scaler.display(),
            model = %paths.model.display(),
            "artifacts loaded"
        );
        Ok(kernel)
    }

    /// Build from artifact bytes already in memory.
    pub fn from_json(scaler_json: &[u8], model_json: &[u8]) -> Result<Self, StrengthError> {
        let scaler = ScalerArtifact::from_json(scaler_json)?;
        let model = ModelArtifact::from_json(model_json)?;
        let fingerprints = vec![
            ArtifactFingerprint::of(ArtifactKind::Scaler, scaler_json),
            ArtifactFingerprint::of(ArtifactKind::Model, model_json),
        ];
        for fp in &fingerprints {
            info!(artifact = %fp.artifact, sha256 = %fp.sha256, bytes = fp.size_bytes, "artifact fingerprint");
        }
        debug!(scaler = scaler.kind(), model = model.kind(), "artifact kinds");

        let mut kernel = Self::from_parts(Arc::new(scaler), Arc::new(model))?;
        kernel.fingerprints = fingerprints;
        Ok(kernel)
    }

    /// Assemble from any transform/regressor pair fitted on the canonical columns.
    pub fn from_parts(
        scaler: Arc<dyn FeatureTransform>,
        model: Arc<dyn Regressor>,
    ) -> Result<Self, StrengthError> {
        check_schema(ArtifactKind::Scaler, scaler.feature_names())?;
        check_schema(ArtifactKind::Model, model.feature_names())?;
        Ok(PredictionKernel {
            scaler,
            model,
            fingerprints: Vec::new(),
            guardrails: Arc::new(GuardrailEngine::new()),
        })
    }

    pub fn with_guardrails(mut self, guardrails: GuardrailEngine) -> Self {
        self.guardrails = Arc::new(guardrails);
        self
    }

    /// Scale, then infer. Full precision; rounding is for display only.
    pub fn predict(&self, vector: &FeatureVector) -> f64 {
        let scaled = self.scaler.transform(vector.values());
        let prediction = self.model.predict(&scaled);
        debug!(prediction, "predicted compressive strength (MPa)");
        prediction
    }

    /// Predict from a labelled row that did not come through the builder.
    ///
    /// # Errors
    /// `ShapeMismatch` when the row's length or column order differs from the
    /// fitted schema; `InvalidInput` when a value fails validation.
    pub fn predict_frame(&self, frame: &FeatureFrame) -> Result<f64, StrengthError> {
        let expected = self.scaler.feature_names();
        if frame.values.len() != FEATURE_COUNT || frame.columns.len() != frame.values.len() {
            let err = StrengthError::shape_mismatch(
                format!("{} labelled values", FEATURE_COUNT),
                format!(
                    "{} columns and {} values",
                    frame.columns.len(),
                    frame.values.len()
                ),
            );
            error!(error = %err, "refusing prediction");
            return Err(err);
        }
        if frame.columns.as_slice() != expected {
            let err = StrengthError::shape_mismatch(
                format!("columns [{}]", expected.join(", ")),
                format!("columns [{}]", frame.columns.join(", ")),
            );
            error!(error = %err, "refusing prediction");
            return Err(err);
        }

        let mut row = [0.0; FEATURE_COUNT];
        row.copy_from_slice(&frame.values);
        let vector = FeatureVector::from_values(row)?;
        Ok(self.predict(&vector))
    }

    pub fn report(&self, vector: &FeatureVector) -> PredictionReport {
        let start = instant::Instant::now();
        let strength_mpa = self.predict(vector);
        let advisories = self.guardrails.review(vector);
        PredictionReport {
            strength_mpa,
            display: report::format_strength(strength_mpa),
            strength_class: StrengthClass::classify(strength_mpa),
            advisories,
            compute_time_ms: start.elapsed().as_secs_f32() * 1000.0,
        }
    }

    pub fn fingerprints(&self) -> &[ArtifactFingerprint] {
        &self.fingerprints
    }
}

/// Shell-facing startup state.
///
/// A failed load does not crash the shell: it keeps running with the
/// prediction action disabled and reports why.
#[derive(Clone, Debug)]
pub enum Predictor {
    Ready(PredictionKernel),
    Unavailable(StrengthError),
}

impl Predictor {
    pub fn startup(paths: &ArtifactPaths) -> Self {
        Self::from_result(PredictionKernel::load(paths))
    }

    pub fn from_json(scaler_json: &[u8], model_json: &[u8]) -> Self {
        Self::from_result(PredictionKernel::from_json(scaler_json, model_json))
    }

    fn from_result(result: Result<PredictionKernel, StrengthError>) -> Self {
        match result {
            Ok(kernel) => Predictor::Ready(kernel),
            Err(e) => {
                error!(error = %e, "predictions disabled");
                Predictor::Unavailable(e)
            }
        }
    }

    /// Replace the advisory ranges of a ready predictor.
    pub fn with_guardrails(self, guardrails: GuardrailEngine) -> Self {
        match self {
            Predictor::Ready(kernel) => Predictor::Ready(kernel.with_guardrails(guardrails)),
            unavailable => unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Predictor::Ready(_))
    }

    pub fn kernel(&self) -> Result<&PredictionKernel, StrengthError> {
        match self {
            Predictor::Ready(kernel) => Ok(kernel),
            Predictor::Unavailable(e) => Err(e.clone()),
        }
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<f64, StrengthError> {
        Ok(self.kernel()?.predict(vector))
    }

    /// Validate a shell mix and report on it.
    pub fn predict_mix(&self, input: MixDesignInput) -> Result<PredictionReport, StrengthError> {
        let kernel = self.kernel()?;
        let vector = FeatureVector::try_from(input)?;
        Ok(kernel.report(&vector))
    }
}

fn respond(result: Result<impl Serialize, StrengthError>) -> String {
    let response = match result {
        Ok(value) => serde_json::json!({ "result": value }),
        Err(e) => serde_json::json!({ "error": e.to_json() }),
    };
    response.to_string()
}

/// WASM entry point for browser shells, which fetch the artifact files
/// themselves and hand over their contents.
#[wasm_bindgen]
pub struct StrengthPredictor {
    inner: Predictor,
}

#[wasm_bindgen]
impl StrengthPredictor {
    #[wasm_bindgen(constructor)]
    pub fn new(scaler_json: &str, model_json: &str) -> StrengthPredictor {
        StrengthPredictor {
            inner: Predictor::from_json(scaler_json.as_bytes(), model_json.as_bytes()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    pub fn unavailable_reason(&self) -> Option<String> {
        match &self.inner {
            Predictor::Ready(_) => None,
            Predictor::Unavailable(e) => Some(e.to_string()),
        }
    }

    /// `{"result": PredictionReport}` or `{"error": {"kind": ..., "message": ...}}`.
    pub fn predict_json(&self, mix_json: &str) -> String {
        respond(
            MixDesignInput::from_json(mix_json).and_then(|input| self.inner.predict_mix(input)),
        )
    }

    /// Same as `predict_json` for a `{"columns": [...], "values": [...]}` row.
    pub fn predict_frame_json(&self, frame_json: &str) -> String {
        let result = self.inner.kernel().and_then(|kernel| {
            let frame: FeatureFrame = serde_json::from_str(frame_json).map_err(|e| {
                StrengthError::invalid_input("frame", format!("is not valid JSON: {}", e))
            })?;
            let strength_mpa = kernel.predict_frame(&frame)?;
            Ok(serde_json::json!({
                "strength_mpa": strength_mpa,
                "display": report::format_strength(strength_mpa),
            }))
        });
        respond(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensors::Feature;

    /// Identity scaler for isolating the regressor.
    struct Identity(Vec<String>);

    impl FeatureTransform for Identity {
        fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
            *row
        }
        fn feature_names(&self) -> &[String] {
            &self.0
        }
    }

    /// Water/cement ratio as a stand-in regressor.
    struct WaterCement(Vec<String>);

    impl Regressor for WaterCement {
        fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
            row[Feature::Water.index()] / row[Feature::Cement.index()]
        }
        fn feature_names(&self) -> &[String] {
            &self.0
        }
    }

    fn kernel() -> PredictionKernel {
        PredictionKernel::from_parts(
            Arc::new(Identity(Feature::column_names())),
            Arc::new(WaterCement(Feature::column_names())),
        )
        .unwrap()
    }

    fn mix() -> FeatureVector {
        FeatureVector::new(300.0, 0.0, 0.0, 150.0, 5.0, 900.0, 800.0, 28.0).unwrap()
    }

    #[test]
    fn test_pipeline_delegates_to_artifacts() {
        assert_eq!(kernel().predict(&mix()), 0.5);
    }

    #[test]
    fn test_from_parts_rejects_foreign_schema() {
        let mut names = Feature::column_names();
        names[3] = "Water_Binder_Ratio".to_string();
        let err = PredictionKernel::from_parts(
            Arc::new(Identity(Feature::column_names())),
            Arc::new(WaterCement(names)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StrengthError::ArtifactUnavailable { artifact: ArtifactKind::Model, .. }
        ));
    }

    #[test]
    fn test_frame_shape_mismatch() {
        let k = kernel();

        let short = FeatureFrame::new(
            Feature::column_names()[..7].to_vec(),
            vec![300.0, 0.0, 0.0, 150.0, 5.0, 900.0, 800.0],
        );
        assert_eq!(k.predict_frame(&short).unwrap_err().kind(), "shape_mismatch");

        let mut columns = Feature::column_names();
        columns.swap(0, 3);
        let permuted = FeatureFrame::new(columns, mix().values().to_vec());
        assert_eq!(k.predict_frame(&permuted).unwrap_err().kind(), "shape_mismatch");

        assert_eq!(k.predict_frame(&mix().as_frame()).unwrap(), 0.5);
    }

    #[test]
    fn test_frame_values_still_validated() {
        let mut frame = mix().as_frame();
        frame.values[Feature::Water.index()] = -1.0;
        assert_eq!(kernel().predict_frame(&frame).unwrap_err().kind(), "invalid_input");
    }

    #[test]
    fn test_report_fields() {
        let report = kernel().report(&mix());
        assert_eq!(report.strength_mpa, 0.5);
        assert_eq!(report.display, "0.50 MPa");
        assert_eq!(report.strength_class, StrengthClass::BelowC8);
        assert!(report.advisories.is_empty());
    }

    #[test]
    fn test_predictor_guardrails_override() {
        let mut limits = crate::guardrails::InputGuardrails::default();
        limits.max[Feature::Water.index()] = 140.0;
        let predictor = Predictor::Ready(kernel())
            .with_guardrails(GuardrailEngine::with_limits(limits));

        let report = predictor.kernel().unwrap().report(&mix());
        assert_eq!(report.advisories.len(), 1);
        assert_eq!(report.advisories[0].feature, "Water");
    }

    #[test]
    fn test_unavailable_predictor_refuses() {
        let predictor = Predictor::from_json(b"{}", b"{}");
        assert!(!predictor.is_available());
        let err = predictor.predict(&mix()).unwrap_err();
        assert_eq!(err.kind(), "artifact_unavailable");
    }

    #[test]
    fn test_kernel_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<PredictionKernel>();
    }
}
