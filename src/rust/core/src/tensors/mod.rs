// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT

pub mod feature_vector;

pub use feature_vector::{
    Feature, FeatureFrame, FeatureVector, FeatureVectorBuilder, MixDesignInput, FEATURE_COUNT,
};
