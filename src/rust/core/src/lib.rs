// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// Concrete Strength Core
// Model-based and load-test compressive strength estimates
//

pub mod artifacts;
pub mod config;
pub mod error;
pub mod formulas;
pub mod guardrails;
pub mod logging;
pub mod prediction_kernel;
pub mod report;
pub mod science;
pub mod tensors;
#[cfg(test)]
pub mod tests_pipeline;

// Re-export core types
pub use artifacts::{ArtifactFingerprint, ArtifactPaths, FeatureTransform, Regressor};
pub use config::{load_config, StrengthConfig};
pub use error::{ArtifactKind, StrengthError};
pub use prediction_kernel::{PredictionKernel, PredictionReport, Predictor, StrengthPredictor};
pub use science::load_test::{LoadTestEngine, LoadTestResult};
pub use science::strength::StrengthClass;
pub use tensors::{Feature, FeatureFrame, FeatureVector, MixDesignInput};
