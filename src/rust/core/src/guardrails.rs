// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Training-Domain Guardrails
//!
//! Soft limits on the mix inputs: the ranges the input form offers and
//! the model has seen data for. Leaving them is not an error (the
//! builder alone decides validity), but the prediction is an
//! extrapolation and shells should say so.

use serde::{Deserialize, Serialize};

use crate::tensors::{Feature, FeatureVector, FEATURE_COUNT};

/// Recommended input window per feature, in fitted column order.
///
/// Read from the `[guardrails]` table of `strength.toml`; absent keys
/// keep the form's defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputGuardrails {
    pub min: [f64; FEATURE_COUNT],
    pub max: [f64; FEATURE_COUNT],
}

impl Default for InputGuardrails {
    fn default() -> Self {
        InputGuardrails {
            //    Cement  Slag   FlyAsh Water  SP    Coarse  Fine    Age
            min: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            max: [1000.0, 300.0, 300.0, 300.0, 50.0, 1200.0, 1000.0, 365.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    BelowRecommended,
    AboveRecommended,
}

/// One input outside its recommended window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangeAdvisory {
    pub feature: &'static str,
    pub kind: AdvisoryKind,
    pub actual_value: f64,
    pub limit: f64,
}

impl RangeAdvisory {
    pub fn message(&self) -> String {
        let unit = Feature::from_column_name(self.feature)
            .map(Feature::unit)
            .unwrap_or("");
        match self.kind {
            AdvisoryKind::BelowRecommended => format!(
                "{} = {} {} is below the recommended minimum {} {}",
                self.feature, self.actual_value, unit, self.limit, unit
            ),
            AdvisoryKind::AboveRecommended => format!(
                "{} = {} {} exceeds the recommended maximum {} {}",
                self.feature, self.actual_value, unit, self.limit, unit
            ),
        }
    }
}

pub struct GuardrailEngine {
    limits: InputGuardrails,
}

impl Default for GuardrailEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardrailEngine {
    pub fn new() -> Self {
        GuardrailEngine {
            limits: InputGuardrails::default(),
        }
    }

    pub fn with_limits(limits: InputGuardrails) -> Self {
        GuardrailEngine { limits }
    }

    /// Inputs outside their recommended window, in column order.
    pub fn review(&self, vector: &FeatureVector) -> Vec<RangeAdvisory> {
        let mut advisories = Vec::new();
        for feature in Feature::ALL {
            let i = feature.index();
            let value = vector.get(feature);
            if value < self.limits.min[i] {
                advisories.push(RangeAdvisory {
                    feature: feature.column_name(),
                    kind: AdvisoryKind::BelowRecommended,
                    actual_value: value,
                    limit: self.limits.min[i],
                });
            } else if value > self.limits.max[i] {
                advisories.push(RangeAdvisory {
                    feature: feature.column_name(),
                    kind: AdvisoryKind::AboveRecommended,
                    actual_value: value,
                    limit: self.limits.max[i],
                });
            }
        }
        if !advisories.is_empty() {
            tracing::warn!(
                count = advisories.len(),
                "mix inputs outside the recommended range, prediction is an extrapolation"
            );
        }
        advisories
    }
}
