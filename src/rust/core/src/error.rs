// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Error taxonomy for the strength pipeline.
//!
//! - `InvalidInput`: a caller-supplied value is missing or out of range.
//!   Recoverable; the request is simply not computed.
//! - `ArtifactUnavailable`: the scaler or model could not be loaded at
//!   startup. Predictions stay disabled until the artifact is fixed.
//! - `ShapeMismatch`: a feature row does not match the fitted schema.
//!   A contract violation, refused rather than mis-predicted.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which of the two pre-fitted artifacts an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Scaler,
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Scaler => f.write_str("scaler"),
            ArtifactKind::Model => f.write_str("model"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum StrengthError {
    #[error("invalid input: {field} {constraint}")]
    InvalidInput { field: String, constraint: String },

    #[error("{artifact} artifact unavailable: {reason}")]
    ArtifactUnavailable {
        artifact: ArtifactKind,
        reason: String,
    },

    #[error("feature shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

impl StrengthError {
    pub fn invalid_input(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        StrengthError::InvalidInput {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    pub fn artifact_unavailable(artifact: ArtifactKind, reason: impl Into<String>) -> Self {
        StrengthError::ArtifactUnavailable {
            artifact,
            reason: reason.into(),
        }
    }

    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        StrengthError::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Stable identifier used in JSON error objects.
    pub fn kind(&self) -> &'static str {
        match self {
            StrengthError::InvalidInput { .. } => "invalid_input",
            StrengthError::ArtifactUnavailable { .. } => "artifact_unavailable",
            StrengthError::ShapeMismatch { .. } => "shape_mismatch",
        }
    }

    /// JSON object handed to shells: `{"kind": ..., "message": ..., ...}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match self {
            StrengthError::InvalidInput { field, constraint } => {
                value["field"] = serde_json::json!(field);
                value["constraint"] = serde_json::json!(constraint);
            }
            StrengthError::ArtifactUnavailable { artifact, .. } => {
                value["artifact"] = serde_json::json!(artifact);
            }
            StrengthError::ShapeMismatch { .. } => {}
        }
        value
    }
}
