// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Fixed-order mix-design feature record.
//!
//! The scaler and regressor were fitted on exactly this column order.
//! Permuting it does not fail loudly, it silently predicts garbage, so
//! the order is owned here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::error::StrengthError;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    Cement = 0,
    BlastFurnaceSlag = 1,
    FlyAsh = 2,
    Water = 3,
    Superplasticizer = 4,
    CoarseAggregate = 5,
    FineAggregate = 6,
    Age = 7,
}

impl Feature {
    /// All features in fitted column order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Cement,
        Feature::BlastFurnaceSlag,
        Feature::FlyAsh,
        Feature::Water,
        Feature::Superplasticizer,
        Feature::CoarseAggregate,
        Feature::FineAggregate,
        Feature::Age,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name as it appears in the training data and artifacts.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::Cement => "Cement",
            Feature::BlastFurnaceSlag => "Blast_Furnace_Slag",
            Feature::FlyAsh => "Fly_Ash",
            Feature::Water => "Water",
            Feature::Superplasticizer => "Superplasticizer",
            Feature::CoarseAggregate => "Coarse_Aggregate",
            Feature::FineAggregate => "Fine_Aggregate",
            Feature::Age => "Age",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Feature::Age => "days",
            _ => "kg/m³",
        }
    }

    /// Lenient lookup: exact column names, spaced names and shell aliases.
    pub fn from_column_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "cement" => Some(Feature::Cement),
            "blast_furnace_slag" | "slag" => Some(Feature::BlastFurnaceSlag),
            "fly_ash" | "flyash" => Some(Feature::FlyAsh),
            "water" => Some(Feature::Water),
            "superplasticizer" | "sp" => Some(Feature::Superplasticizer),
            "coarse_aggregate" | "coarse_agg" => Some(Feature::CoarseAggregate),
            "fine_aggregate" | "fine_agg" => Some(Feature::FineAggregate),
            "age" | "age_days" => Some(Feature::Age),
            _ => None,
        }
    }

    /// Canonical column names in fitted order.
    pub fn column_names() -> Vec<String> {
        Feature::ALL
            .iter()
            .map(|f| f.column_name().to_string())
            .collect()
    }
}

/// Validated, immutable feature row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn builder() -> FeatureVectorBuilder {
        FeatureVectorBuilder::default()
    }

    /// Positional constructor, same validation as the builder.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cement: f64,
        blast_furnace_slag: f64,
        fly_ash: f64,
        water: f64,
        superplasticizer: f64,
        coarse_aggregate: f64,
        fine_aggregate: f64,
        age_days: f64,
    ) -> Result<Self, StrengthError> {
        Self::from_values([
            cement,
            blast_furnace_slag,
            fly_ash,
            water,
            superplasticizer,
            coarse_aggregate,
            fine_aggregate,
            age_days,
        ])
    }

    /// Validate an array that is already in fitted column order.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Result<Self, StrengthError> {
        for feature in Feature::ALL {
            validate_field(feature, values[feature.index()])?;
        }
        Ok(FeatureVector { values })
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn age_days(&self) -> u32 {
        self.values[Feature::Age.index()] as u32
    }

    /// Column-labelled single row in canonical order.
    pub fn as_frame(&self) -> FeatureFrame {
        FeatureFrame {
            columns: Feature::column_names(),
            values: self.values.to_vec(),
        }
    }
}

fn validate_field(feature: Feature, value: f64) -> Result<(), StrengthError> {
    let field = feature.column_name();
    if !value.is_finite() {
        return Err(StrengthError::invalid_input(field, "must be a finite number"));
    }
    match feature {
        Feature::Age => {
            if value <= 0.0 {
                return Err(StrengthError::invalid_input(
                    field,
                    "must be a positive number of days",
                ));
            }
            if value.fract() != 0.0 {
                return Err(StrengthError::invalid_input(
                    field,
                    "must be a whole number of days",
                ));
            }
        }
        _ => {
            if value < 0.0 {
                return Err(StrengthError::invalid_input(field, "must be non-negative"));
            }
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Default)]
pub struct FeatureVectorBuilder {
    slots: [Option<f64>; FEATURE_COUNT],
}

impl FeatureVectorBuilder {
    pub fn set(mut self, feature: Feature, value: f64) -> Self {
        self.slots[feature.index()] = Some(value);
        self
    }

    pub fn cement(self, kg_m3: f64) -> Self {
        self.set(Feature::Cement, kg_m3)
    }

    pub fn blast_furnace_slag(self, kg_m3: f64) -> Self {
        self.set(Feature::BlastFurnaceSlag, kg_m3)
    }

    pub fn fly_ash(self, kg_m3: f64) -> Self {
        self.set(Feature::FlyAsh, kg_m3)
    }

    pub fn water(self, kg_m3: f64) -> Self {
        self.set(Feature::Water, kg_m3)
    }

    pub fn superplasticizer(self, kg_m3: f64) -> Self {
        self.set(Feature::Superplasticizer, kg_m3)
    }

    pub fn coarse_aggregate(self, kg_m3: f64) -> Self {
        self.set(Feature::CoarseAggregate, kg_m3)
    }

    pub fn fine_aggregate(self, kg_m3: f64) -> Self {
        self.set(Feature::FineAggregate, kg_m3)
    }

    pub fn age(self, days: u32) -> Self {
        self.set(Feature::Age, f64::from(days))
    }

    pub fn build(self) -> Result<FeatureVector, StrengthError> {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = self.slots[feature.index()]
                .ok_or_else(|| StrengthError::invalid_input(feature.column_name(), "is required"))?;
        }
        FeatureVector::from_values(values)
    }
}

/// Mix design as it arrives from a shell (JSON).
///
/// Every field is optional so that a missing key is reported as
/// `InvalidInput` naming the field rather than as a parse error.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MixDesignInput {
    #[serde(default, alias = "Cement")]
    pub cement: Option<f64>,
    #[serde(default, alias = "Blast_Furnace_Slag", alias = "slag")]
    pub blast_furnace_slag: Option<f64>,
    #[serde(default, alias = "Fly_Ash")]
    pub fly_ash: Option<f64>,
    #[serde(default, alias = "Water")]
    pub water: Option<f64>,
    #[serde(default, alias = "Superplasticizer", alias = "sp")]
    pub superplasticizer: Option<f64>,
    #[serde(default, alias = "Coarse_Aggregate", alias = "coarse_agg")]
    pub coarse_aggregate: Option<f64>,
    #[serde(default, alias = "Fine_Aggregate", alias = "fine_agg")]
    pub fine_aggregate: Option<f64>,
    #[serde(default, alias = "Age", alias = "age_days")]
    pub age: Option<f64>,
}

impl MixDesignInput {
    pub fn from_json(json: &str) -> Result<Self, StrengthError> {
        serde_json::from_str(json)
            .map_err(|e| StrengthError::invalid_input("mix", format!("is not valid JSON: {}", e)))
    }
}

impl TryFrom<MixDesignInput> for FeatureVector {
    type Error = StrengthError;

    fn try_from(input: MixDesignInput) -> Result<Self, Self::Error> {
        let slots = [
            input.cement,
            input.blast_furnace_slag,
            input.fly_ash,
            input.water,
            input.superplasticizer,
            input.coarse_aggregate,
            input.fine_aggregate,
            input.age,
        ];
        let builder = Feature::ALL
            .iter()
            .zip(slots)
            .fold(FeatureVector::builder(), |b, (&feature, slot)| match slot {
                Some(value) => b.set(feature, value),
                None => b,
            });
        builder.build()
    }
}

/// Single labelled row, the shape a DataFrame row takes on the wire.
///
/// Unlike `FeatureVector` nothing here is guaranteed; the prediction
/// kernel checks it against the fitted schema before use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureFrame {
    pub fn new(columns: Vec<String>, values: Vec<f64>) -> Self {
        FeatureFrame { columns, values }
    }
}
