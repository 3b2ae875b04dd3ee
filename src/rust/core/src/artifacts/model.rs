// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Regressor artifact.
//!
//! A model file is either a LightGBM `dump_model()` JSON (recognised by its
//! `tree_info` key) or a linear regressor envelope:
//!
//! ```json
//! {"format_version": 1, "kind": "linear",
//!  "feature_names": [...], "coef": [...], "intercept": 0.0}
//! ```

use serde::Deserialize;

use super::lightgbm::TreeEnsemble;
use super::{check_format_version, check_schema, fixed_row, Regressor};
use crate::error::{ArtifactKind, StrengthError};
use crate::tensors::FEATURE_COUNT;

const KIND: ArtifactKind = ArtifactKind::Model;

#[derive(Clone, Debug, PartialEq)]
pub enum ModelArtifact {
    LightGbm(TreeEnsemble),
    Linear(LinearRegressor),
}

impl ModelArtifact {
    pub fn from_json(bytes: &[u8]) -> Result<Self, StrengthError> {
        let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
            StrengthError::artifact_unavailable(KIND, format!("corrupt model artifact: {}", e))
        })?;

        if value.get("tree_info").is_some() {
            return TreeEnsemble::from_json(bytes).map(ModelArtifact::LightGbm);
        }
        match value.get("kind").and_then(|k| k.as_str()) {
            Some("linear") => LinearRegressor::from_value(value).map(ModelArtifact::Linear),
            Some(other) => Err(StrengthError::artifact_unavailable(
                KIND,
                format!("unknown model kind `{}`", other),
            )),
            None => Err(StrengthError::artifact_unavailable(
                KIND,
                "neither a LightGBM dump nor a `kind`-tagged model",
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::LightGbm(_) => "lightgbm",
            ModelArtifact::Linear(_) => "linear",
        }
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        match self {
            ModelArtifact::LightGbm(m) => m.predict(row),
            ModelArtifact::Linear(m) => m.predict(row),
        }
    }

    fn feature_names(&self) -> &[String] {
        match self {
            ModelArtifact::LightGbm(m) => m.feature_names(),
            ModelArtifact::Linear(m) => m.feature_names(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LinearFile {
    format_version: u32,
    feature_names: Vec<String>,
    coef: Vec<f64>,
    intercept: f64,
}

/// `intercept + Σ coef[i] * x[i]`, accumulated in column order.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearRegressor {
    feature_names: Vec<String>,
    coef: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LinearRegressor {
    fn from_value(value: serde_json::Value) -> Result<Self, StrengthError> {
        let file: LinearFile = serde_json::from_value(value).map_err(|e| {
            StrengthError::artifact_unavailable(KIND, format!("corrupt linear model: {}", e))
        })?;
        check_format_version(KIND, file.format_version)?;
        check_schema(KIND, &file.feature_names)?;
        let coef = fixed_row(KIND, "coef", &file.coef)?;
        if !file.intercept.is_finite() {
            return Err(StrengthError::artifact_unavailable(KIND, "non-finite intercept"));
        }
        Ok(LinearRegressor {
            feature_names: file.feature_names,
            coef,
            intercept: file.intercept,
        })
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let dot = row
            .iter()
            .zip(self.coef.iter())
            .fold(0.0, |acc, (x, c)| acc + x * c);
        dot + self.intercept
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}
