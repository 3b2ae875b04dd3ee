// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! LightGBM tree ensemble, read from `Booster.dump_model()` JSON.
//!
//! The nested `tree_structure` of each tree is flattened into an arena at
//! load time; prediction walks it iteratively. Leaf values in a dump
//! already include shrinkage, so the raw score is the plain sum of the
//! reached leaves (divided by the tree count for `average_output`).
//!
//! Only numerical splits are supported; the concrete features have no
//! categorical columns.

use serde::Deserialize;

use super::{check_schema, Regressor};
use crate::error::{ArtifactKind, StrengthError};
use crate::tensors::FEATURE_COUNT;

const KIND: ArtifactKind = ArtifactKind::Model;

/// Dump versions whose `tree_structure` layout is understood.
const SUPPORTED_VERSIONS: [&str; 2] = ["v3", "v4"];

/// LightGBM's `kZeroThreshold`.
const ZERO_THRESHOLD: f64 = 1e-35;

#[derive(Debug, Deserialize)]
struct DumpFile {
    version: String,
    #[serde(default = "one")]
    num_class: usize,
    #[serde(default = "one")]
    num_tree_per_iteration: usize,
    max_feature_idx: usize,
    #[serde(default)]
    objective: Option<String>,
    #[serde(default)]
    average_output: bool,
    #[serde(default)]
    linear_tree: bool,
    feature_names: Vec<String>,
    tree_info: Vec<TreeInfo>,
}

fn one() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct TreeInfo {
    tree_structure: RawNode,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNode {
    Split(RawSplit),
    Leaf(RawLeaf),
}

#[derive(Debug, Deserialize)]
struct RawSplit {
    split_feature: usize,
    threshold: serde_json::Value,
    decision_type: String,
    #[serde(default)]
    default_left: bool,
    #[serde(default = "missing_none")]
    missing_type: String,
    left_child: Box<RawNode>,
    right_child: Box<RawNode>,
}

fn missing_none() -> String {
    "None".to_string()
}

#[derive(Debug, Deserialize)]
struct RawLeaf {
    leaf_value: f64,
    // Present only in `linear_tree` dumps.
    #[serde(default)]
    leaf_const: Option<serde_json::Value>,
    #[serde(default)]
    leaf_features: Option<serde_json::Value>,
    #[serde(default)]
    leaf_coeff: Option<serde_json::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MissingType {
    None,
    Zero,
    NaN,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        default_left: bool,
        missing: MissingType,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Output transform implied by the training objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputLink {
    Identity,
    Exp,
    /// `reg_sqrt`: trained on `sign(y)·sqrt(|y|)`, so predictions are squared back.
    SignedSquare,
}

#[derive(Clone, Debug, PartialEq)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    default_left,
                    missing,
                    left,
                    right,
                } => {
                    idx = if goes_left(row[feature], threshold, default_left, missing) {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// LightGBM's numerical decision rule.
fn goes_left(value: f64, threshold: f64, default_left: bool, missing: MissingType) -> bool {
    let mut value = value;
    if value.is_nan() && missing != MissingType::NaN {
        value = 0.0;
    }
    let is_zero = (-ZERO_THRESHOLD..=ZERO_THRESHOLD).contains(&value);
    if (missing == MissingType::Zero && is_zero) || (missing == MissingType::NaN && value.is_nan())
    {
        return default_left;
    }
    value <= threshold
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeEnsemble {
    feature_names: Vec<String>,
    trees: Vec<Tree>,
    average_output: bool,
    link: OutputLink,
}

impl TreeEnsemble {
    pub fn from_json(bytes: &[u8]) -> Result<Self, StrengthError> {
        let dump: DumpFile = serde_json::from_slice(bytes).map_err(|e| {
            StrengthError::artifact_unavailable(KIND, format!("corrupt LightGBM dump: {}", e))
        })?;
        Self::from_dump(dump)
    }

    fn from_dump(dump: DumpFile) -> Result<Self, StrengthError> {
        if !SUPPORTED_VERSIONS.contains(&dump.version.as_str()) {
            return Err(StrengthError::artifact_unavailable(
                KIND,
                format!(
                    "unsupported LightGBM dump version `{}` (supported: {})",
                    dump.version,
                    SUPPORTED_VERSIONS.join(", ")
                ),
            ));
        }
        if dump.num_class != 1 || dump.num_tree_per_iteration != 1 {
            return Err(StrengthError::artifact_unavailable(
                KIND,
                format!(
                    "expected a single-output regressor, got num_class={} num_tree_per_iteration={}",
                    dump.num_class, dump.num_tree_per_iteration
                ),
            ));
        }
        if dump.max_feature_idx + 1 != FEATURE_COUNT {
            return Err(StrengthError::artifact_unavailable(
                KIND,
                format!(
                    "model uses {} features, expected {}",
                    dump.max_feature_idx + 1,
                    FEATURE_COUNT
                ),
            ));
        }
        check_schema(KIND, &dump.feature_names)?;
        if dump.linear_tree {
            return Err(StrengthError::artifact_unavailable(
                KIND,
                "linear_tree models are not supported",
            ));
        }
        if dump.tree_info.is_empty() {
            return Err(StrengthError::artifact_unavailable(KIND, "model has no trees"));
        }
        let link = output_link(dump.objective.as_deref())?;

        let trees = dump
            .tree_info
            .into_iter()
            .enumerate()
            .map(|(i, info)| {
                let mut nodes = Vec::new();
                flatten(info.tree_structure, &mut nodes).map_err(|reason| {
                    StrengthError::artifact_unavailable(KIND, format!("tree {}: {}", i, reason))
                })?;
                Ok(Tree { nodes })
            })
            .collect::<Result<Vec<_>, StrengthError>>()?;

        Ok(TreeEnsemble {
            feature_names: dump.feature_names,
            trees,
            average_output: dump.average_output,
            link,
        })
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Sum of leaf values before the objective's output transform.
    pub fn raw_score(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(row);
        }
        if self.average_output {
            sum /= self.trees.len() as f64;
        }
        sum
    }
}

fn output_link(objective: Option<&str>) -> Result<OutputLink, StrengthError> {
    // Dumps write parameters after the name, e.g. "tweedie tweedie_variance_power:1.5".
    let mut words = objective.unwrap_or("regression").split_whitespace();
    let name = words.next().unwrap_or("regression");
    let (mut link, params, sqrt_allowed): (OutputLink, &[&str], bool) = match name {
        "regression" | "regression_l2" | "l2" | "mse" | "regression_l1" | "l1" | "mape" => {
            (OutputLink::Identity, &[], true)
        }
        "huber" | "quantile" => (OutputLink::Identity, &["alpha"], true),
        "fair" => (OutputLink::Identity, &["fair_c"], true),
        "poisson" => (OutputLink::Exp, &["max_delta_step"], false),
        "gamma" => (OutputLink::Exp, &[], false),
        "tweedie" => (OutputLink::Exp, &["tweedie_variance_power"], false),
        other => {
            return Err(StrengthError::artifact_unavailable(
                KIND,
                format!("objective `{}` is not a regression objective", other),
            ))
        }
    };

    for word in words {
        if word == "sqrt" && sqrt_allowed && link == OutputLink::Identity {
            link = OutputLink::SignedSquare;
            continue;
        }
        let known = match word.split_once(':') {
            Some((key, value)) => params.contains(&key) && value.parse::<f64>().is_ok(),
            None => false,
        };
        if !known {
            return Err(StrengthError::artifact_unavailable(
                KIND,
                format!("unsupported parameter `{}` in objective `{}`", word, name),
            ));
        }
    }
    Ok(link)
}

/// Append `raw` to the arena in pre-order, returning its index.
fn flatten(raw: RawNode, nodes: &mut Vec<Node>) -> Result<usize, String> {
    let idx = nodes.len();
    match raw {
        RawNode::Leaf(leaf) => {
            if leaf.leaf_const.is_some() || leaf.leaf_features.is_some() || leaf.leaf_coeff.is_some()
            {
                return Err("linear leaves are not supported".to_string());
            }
            if !leaf.leaf_value.is_finite() {
                return Err("non-finite leaf value".to_string());
            }
            nodes.push(Node::Leaf(leaf.leaf_value));
        }
        RawNode::Split(split) => {
            if split.decision_type != "<=" {
                return Err(format!(
                    "unsupported decision type `{}` (categorical splits are not supported)",
                    split.decision_type
                ));
            }
            if split.split_feature >= FEATURE_COUNT {
                return Err(format!("split on unknown feature {}", split.split_feature));
            }
            let threshold = split
                .threshold
                .as_f64()
                .ok_or_else(|| format!("non-numeric threshold {}", split.threshold))?;
            let missing = match split.missing_type.as_str() {
                "None" => MissingType::None,
                "Zero" => MissingType::Zero,
                "NaN" => MissingType::NaN,
                other => return Err(format!("unknown missing_type `{}`", other)),
            };

            // Children indices are patched once they are known.
            nodes.push(Node::Leaf(0.0));
            let left = flatten(*split.left_child, nodes)?;
            let right = flatten(*split.right_child, nodes)?;
            nodes[idx] = Node::Split {
                feature: split.split_feature,
                threshold,
                default_left: split.default_left,
                missing,
                left,
                right,
            };
        }
    }
    Ok(idx)
}

impl Regressor for TreeEnsemble {
    fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let raw = self.raw_score(row);
        match self.link {
            OutputLink::Identity => raw,
            OutputLink::Exp => raw.exp(),
            OutputLink::SignedSquare => raw.abs() * raw,
        }
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensors::Feature;

    fn dump(trees: &str, extra: &str) -> String {
        format!(
            r#"{{"name": "tree", "version": "v4", "max_feature_idx": 7, {}
                "feature_names": {}, "tree_info": [{}]}}"#,
            extra,
            serde_json::to_string(&Feature::column_names()).unwrap(),
            trees
        )
    }

    fn stump(feature: usize, threshold: f64, missing: &str, default_left: bool) -> String {
        format!(
            r#"{{"tree_structure": {{
                "split_feature": {}, "threshold": {}, "decision_type": "<=",
                "default_left": {}, "missing_type": "{}",
                "left_child": {{"leaf_value": 1.0}},
                "right_child": {{"leaf_value": 2.0}}}}}}"#,
            feature, threshold, default_left, missing
        )
    }

    #[test]
    fn test_stump_threshold_is_inclusive() {
        let model = TreeEnsemble::from_json(dump(&stump(0, 0.5, "None", true), "").as_bytes())
            .unwrap();
        let mut row = [0.0; FEATURE_COUNT];
        row[0] = 0.5;
        assert_eq!(model.predict(&row), 1.0);
        row[0] = 0.500001;
        assert_eq!(model.predict(&row), 2.0);
    }

    #[test]
    fn test_missing_value_routing() {
        // NaN missing type: NaN follows default_left.
        let nan = TreeEnsemble::from_json(dump(&stump(1, -1.0, "NaN", false), "").as_bytes())
            .unwrap();
        let mut row = [0.0; FEATURE_COUNT];
        row[1] = f64::NAN;
        assert_eq!(nan.predict(&row), 2.0);

        // None missing type: NaN is read as 0.0.
        let none = TreeEnsemble::from_json(dump(&stump(1, -1.0, "None", true), "").as_bytes())
            .unwrap();
        assert_eq!(none.predict(&row), 2.0);

        // Zero missing type: zero follows default_left even when <= threshold fails.
        let zero = TreeEnsemble::from_json(dump(&stump(1, -1.0, "Zero", true), "").as_bytes())
            .unwrap();
        row[1] = 0.0;
        assert_eq!(zero.predict(&row), 1.0);
    }

    #[test]
    fn test_sum_and_average_output() {
        let trees = format!(
            "{}, {}, {{\"tree_structure\": {{\"leaf_value\": 0.5}}}}",
            stump(7, 10.0, "None", true),
            stump(7, 100.0, "None", true)
        );
        let mut row = [0.0; FEATURE_COUNT];
        row[7] = 28.0;

        let summed = TreeEnsemble::from_json(dump(&trees, "").as_bytes()).unwrap();
        assert_eq!(summed.num_trees(), 3);
        assert_eq!(summed.predict(&row), 2.0 + 1.0 + 0.5);

        let averaged =
            TreeEnsemble::from_json(dump(&trees, r#""average_output": true,"#).as_bytes())
                .unwrap();
        assert_eq!(averaged.predict(&row), 3.5 / 3.0);
    }

    #[test]
    fn test_exp_link_for_gamma_objective() {
        let trees = r#"{"tree_structure": {"leaf_value": 0.0}}"#;
        let model =
            TreeEnsemble::from_json(dump(trees, r#""objective": "gamma","#).as_bytes()).unwrap();
        assert_eq!(model.predict(&[0.0; FEATURE_COUNT]), 1.0);
    }

    #[test]
    fn test_sqrt_objective_squares_back() {
        let positive = r#"{"tree_structure": {"leaf_value": 5.0}}"#;
        let model = TreeEnsemble::from_json(
            dump(positive, r#""objective": "regression sqrt","#).as_bytes(),
        )
        .unwrap();
        assert_eq!(model.raw_score(&[0.0; FEATURE_COUNT]), 5.0);
        assert_eq!(model.predict(&[0.0; FEATURE_COUNT]), 25.0);

        // Sign is kept.
        let negative = r#"{"tree_structure": {"leaf_value": -2.0}}"#;
        let model = TreeEnsemble::from_json(
            dump(negative, r#""objective": "huber alpha:0.9 sqrt","#).as_bytes(),
        )
        .unwrap();
        assert_eq!(model.predict(&[0.0; FEATURE_COUNT]), -4.0);
    }

    #[test]
    fn test_parameterised_objectives() {
        let trees = r#"{"tree_structure": {"leaf_value": 0.0}}"#;
        for objective in [
            "tweedie tweedie_variance_power:1.5",
            "poisson max_delta_step:0.7",
            "quantile alpha:0.5",
            "fair fair_c:1",
        ] {
            let extra = format!(r#""objective": "{}","#, objective);
            let model = TreeEnsemble::from_json(dump(trees, &extra).as_bytes()).unwrap();
            let expected = if objective.starts_with("tweedie") || objective.starts_with("poisson") {
                1.0
            } else {
                0.0
            };
            assert_eq!(model.predict(&[0.0; FEATURE_COUNT]), expected, "{}", objective);
        }
    }

    #[test]
    fn test_rejects_unknown_objective_parameters() {
        let leaf = r#"{"tree_structure": {"leaf_value": 1.0}}"#;
        for objective in [
            "regression cube",
            "regression sqrt sqrt",
            "gamma sqrt",
            "tweedie alpha:0.5",
            "huber alpha:wide",
        ] {
            let extra = format!(r#""objective": "{}","#, objective);
            let err = TreeEnsemble::from_json(dump(leaf, &extra).as_bytes()).unwrap_err();
            assert_eq!(err.kind(), "artifact_unavailable", "{}", objective);
        }
    }

    #[test]
    fn test_rejects_linear_trees() {
        let linear_leaf = r#"{"tree_structure": {"leaf_value": 1.0,
            "leaf_const": 0.5, "leaf_features": [0], "leaf_coeff": [2.0]}}"#;
        let err = TreeEnsemble::from_json(dump(linear_leaf, "").as_bytes()).unwrap_err();
        assert!(err.to_string().contains("linear leaves"), "{}", err);

        let plain_leaf = r#"{"tree_structure": {"leaf_value": 1.0}}"#;
        let flagged = dump(plain_leaf, r#""linear_tree": true,"#);
        assert!(TreeEnsemble::from_json(flagged.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_unsupported_dumps() {
        let categorical = r#"{"tree_structure": {
            "split_feature": 0, "threshold": "1||3", "decision_type": "==",
            "left_child": {"leaf_value": 1.0}, "right_child": {"leaf_value": 2.0}}}"#;
        let bad_feature = stump(9, 0.0, "None", true);
        let leaf = r#"{"tree_structure": {"leaf_value": 1.0}}"#;

        let cases = [
            dump(categorical, ""),
            dump(&bad_feature, ""),
            dump(leaf, r#""objective": "binary sigmoid:1","#),
            dump(leaf, r#""num_class": 3,"#),
            dump("", ""),
            dump(leaf, "").replace("\"v4\"", "\"v1\""),
            dump(leaf, "").replace("\"max_feature_idx\": 7", "\"max_feature_idx\": 5"),
            "{\"tree_info\": [".to_string(),
        ];
        for case in &cases {
            let err = TreeEnsemble::from_json(case.as_bytes()).unwrap_err();
            assert!(
                matches!(err, StrengthError::ArtifactUnavailable { artifact: ArtifactKind::Model, .. }),
                "expected model ArtifactUnavailable, got {:?}",
                err
            );
        }
    }
}
