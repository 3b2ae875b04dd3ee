// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Pre-fitted Artifacts
//!
//! The scaler and the regressor are produced by an external training run
//! and consumed here through two narrow capabilities:
//!
//! ```text
//! FeatureVector --FeatureTransform::transform--> scaled row --Regressor::predict--> MPa
//! ```
//!
//! - scaler.rs: fitted per-feature transforms (standard / min-max)
//! - lightgbm.rs: LightGBM `dump_model()` tree ensembles
//! - model.rs: regressor artifact dispatch (tree ensemble / linear)
//!
//! Everything is validated at load time; a loaded artifact is immutable.

pub mod lightgbm;
pub mod model;
pub mod scaler;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ArtifactKind, StrengthError};
use crate::tensors::{Feature, FEATURE_COUNT};

pub use lightgbm::TreeEnsemble;
pub use model::{LinearRegressor, ModelArtifact};
pub use scaler::ScalerArtifact;

/// Envelope version understood for the JSON artifacts this crate defines.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Fitted scaler capability.
pub trait FeatureTransform: Send + Sync {
    fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT];

    /// Column order the transform was fitted on.
    fn feature_names(&self) -> &[String];
}

/// Fitted regressor capability. Input is an already-scaled row.
pub trait Regressor: Send + Sync {
    fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64;

    fn feature_names(&self) -> &[String];
}

/// Where the two artifact files live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        ArtifactPaths {
            scaler: PathBuf::from("artifacts/scaler.json"),
            model: PathBuf::from("artifacts/lightgbm_model.json"),
        }
    }
}

/// SHA-256 of an artifact's bytes, for reproducibility checks across runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactFingerprint {
    pub artifact: ArtifactKind,
    pub sha256: String,
    pub size_bytes: usize,
}

impl ArtifactFingerprint {
    pub fn of(artifact: ArtifactKind, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        ArtifactFingerprint {
            artifact,
            sha256: hex::encode(hasher.finalize()),
            size_bytes: bytes.len(),
        }
    }
}

pub(crate) fn read_artifact(artifact: ArtifactKind, path: &Path) -> Result<Vec<u8>, StrengthError> {
    fs::read(path).map_err(|e| {
        StrengthError::artifact_unavailable(
            artifact,
            format!("cannot read {}: {}", path.display(), e),
        )
    })
}

/// The artifact must have been fitted on exactly the canonical columns,
/// in the canonical order.
pub(crate) fn check_schema(artifact: ArtifactKind, names: &[String]) -> Result<(), StrengthError> {
    let expected = Feature::column_names();
    if names != expected.as_slice() {
        return Err(StrengthError::artifact_unavailable(
            artifact,
            format!(
                "fitted on columns [{}], expected [{}]",
                names.join(", "),
                expected.join(", ")
            ),
        ));
    }
    Ok(())
}

/// Copy a slice into a fixed row, rejecting wrong lengths and non-finite entries.
pub(crate) fn fixed_row(
    artifact: ArtifactKind,
    name: &str,
    values: &[f64],
) -> Result<[f64; FEATURE_COUNT], StrengthError> {
    let row: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
        StrengthError::artifact_unavailable(
            artifact,
            format!("`{}` has {} entries, expected {}", name, values.len(), FEATURE_COUNT),
        )
    })?;
    if row.iter().any(|v| !v.is_finite()) {
        return Err(StrengthError::artifact_unavailable(
            artifact,
            format!("`{}` contains non-finite values", name),
        ));
    }
    Ok(row)
}

pub(crate) fn check_format_version(artifact: ArtifactKind, version: u32) -> Result<(), StrengthError> {
    if version != SUPPORTED_FORMAT_VERSION {
        return Err(StrengthError::artifact_unavailable(
            artifact,
            format!(
                "unsupported format_version {} (supported: {})",
                version, SUPPORTED_FORMAT_VERSION
            ),
        ));
    }
    Ok(())
}
