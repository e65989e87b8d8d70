//! Feature names and the ordered vector handed to the scaler.

use serde::Serialize;

use crate::error::{ChurnError, Result};

pub const CREDIT_SCORE: &str = "CreditScore";
pub const GEOGRAPHY_FRANCE: &str = "Geography_France";
pub const GEOGRAPHY_GERMANY: &str = "Geography_Germany";
pub const GEOGRAPHY_SPAIN: &str = "Geography_Spain";
pub const GENDER: &str = "Gender";
pub const AGE: &str = "Age";
pub const TENURE: &str = "Tenure";
pub const BALANCE: &str = "Balance";
pub const NUM_OF_PRODUCTS: &str = "NumOfProducts";
pub const HAS_CR_CARD: &str = "HasCrCard";
pub const IS_ACTIVE_MEMBER: &str = "IsActiveMember";
pub const ESTIMATED_SALARY: &str = "EstimatedSalary";

/// Column order the shipped model was fitted with.
///
/// Informational only: at inference time the order always comes from the
/// loaded scaler.
pub const CANONICAL_FEATURE_ORDER: [&str; 12] = [
    CREDIT_SCORE,
    GEOGRAPHY_FRANCE,
    GEOGRAPHY_GERMANY,
    GEOGRAPHY_SPAIN,
    GENDER,
    AGE,
    TENURE,
    BALANCE,
    NUM_OF_PRODUCTS,
    HAS_CR_CARD,
    IS_ACTIVE_MEMBER,
    ESTIMATED_SALARY,
];

/// Named numeric features in a fixed column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(ChurnError::prediction_failure(format!(
                "feature vector has {} names but {} values",
                names.len(),
                values.len()
            )));
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
