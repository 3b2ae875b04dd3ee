// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Fitted feature scaler.
//!
//! Exported from the fitted scikit-learn object as
//!
//! ```json
//! {"format_version": 1, "kind": "standard",
//!  "feature_names": ["Cement", ..., "Age"],
//!  "mean": [...], "scale": [...]}
//! ```
//!
//! `standard` applies `(x - mean) / scale` (`mean`/`scale` may be omitted
//! for `with_mean=False` / `with_std=False`); `min_max` applies
//! `x * scale + min`. The operation order matches scikit-learn so that
//! results agree to the bit.

use serde::Deserialize;

use super::{check_format_version, check_schema, fixed_row, FeatureTransform};
use crate::error::{ArtifactKind, StrengthError};
use crate::tensors::FEATURE_COUNT;

#[derive(Debug, Deserialize)]
struct ScalerFile {
    format_version: u32,
    kind: String,
    feature_names: Vec<String>,
    #[serde(default)]
    mean: Option<Vec<f64>>,
    #[serde(default)]
    scale: Option<Vec<f64>>,
    #[serde(default)]
    min: Option<Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq)]
enum Transform {
    Standard {
        mean: [f64; FEATURE_COUNT],
        scale: [f64; FEATURE_COUNT],
    },
    MinMax {
        min: [f64; FEATURE_COUNT],
        scale: [f64; FEATURE_COUNT],
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalerArtifact {
    feature_names: Vec<String>,
    transform: Transform,
}

const KIND: ArtifactKind = ArtifactKind::Scaler;

impl ScalerArtifact {
    pub fn from_json(bytes: &[u8]) -> Result<Self, StrengthError> {
        let file: ScalerFile = serde_json::from_slice(bytes).map_err(|e| {
            StrengthError::artifact_unavailable(KIND, format!("corrupt scaler artifact: {}", e))
        })?;
        check_format_version(KIND, file.format_version)?;
        check_schema(KIND, &file.feature_names)?;

        let transform = match file.kind.as_str() {
            "standard" => {
                let mean = match &file.mean {
                    Some(m) => fixed_row(KIND, "mean", m)?,
                    None => [0.0; FEATURE_COUNT],
                };
                let scale = match &file.scale {
                    Some(s) => nonzero_scale(fixed_row(KIND, "scale", s)?)?,
                    None => [1.0; FEATURE_COUNT],
                };
                Transform::Standard { mean, scale }
            }
            "min_max" => {
                let min = fixed_row(KIND, "min", required(&file.min, "min")?)?;
                let scale = fixed_row(KIND, "scale", required(&file.scale, "scale")?)?;
                Transform::MinMax { min, scale }
            }
            other => {
                return Err(StrengthError::artifact_unavailable(
                    KIND,
                    format!("unknown scaler kind `{}`", other),
                ))
            }
        };

        Ok(ScalerArtifact {
            feature_names: file.feature_names,
            transform,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self.transform {
            Transform::Standard { .. } => "standard",
            Transform::MinMax { .. } => "min_max",
        }
    }
}

fn required<'a>(field: &'a Option<Vec<f64>>, name: &str) -> Result<&'a [f64], StrengthError> {
    field
        .as_deref()
        .ok_or_else(|| StrengthError::artifact_unavailable(KIND, format!("missing `{}`", name)))
}

fn nonzero_scale(scale: [f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT], StrengthError> {
    if scale.iter().any(|&s| s == 0.0) {
        return Err(StrengthError::artifact_unavailable(
            KIND,
            "`scale` contains zero entries",
        ));
    }
    Ok(scale)
}

impl FeatureTransform for ScalerArtifact {
    fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        match &self.transform {
            Transform::Standard { mean, scale } => {
                for i in 0..FEATURE_COUNT {
                    out[i] = (row[i] - mean[i]) / scale[i];
                }
            }
            Transform::MinMax { min, scale } => {
                for i in 0..FEATURE_COUNT {
                    out[i] = row[i] * scale[i] + min[i];
                }
            }
        }
        out
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}
