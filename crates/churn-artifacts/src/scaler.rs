#![deny(unsafe_code)]

use std::collections::BTreeSet;

use churn_model::{ChurnError, FeatureScaler};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// Standardization fitted on the training set: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    feature_names_in: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(
        feature_names_in: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, ArtifactError> {
        let scaler = Self {
            feature_names_in,
            mean,
            scale,
        };
        scaler
            .check()
            .map_err(|message| ArtifactError::invalid("scaler", message))?;
        Ok(scaler)
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        let n = self.feature_names_in.len();
        if n == 0 {
            return Err("feature_names_in is empty".to_string());
        }
        if self.mean.len() != n || self.scale.len() != n {
            return Err(format!(
                "expected {n} mean and scale values, found {} and {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        let mut seen = BTreeSet::new();
        for name in &self.feature_names_in {
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate feature name: {name}"));
            }
        }
        for (name, (mean, scale)) in self
            .feature_names_in
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
        {
            if !mean.is_finite() {
                return Err(format!("mean for {name} is not finite"));
            }
            if !scale.is_finite() || *scale == 0.0 {
                return Err(format!("scale for {name} must be finite and non-zero"));
            }
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn feature_names(&self) -> &[String] {
        &self.feature_names_in
    }

    fn transform(&self, row: &[f64]) -> churn_model::Result<Vec<f64>> {
        if row.len() != self.feature_names_in.len() {
            return Err(ChurnError::prediction_failure(format!(
                "scaler expects {} features, got {}",
                self.feature_names_in.len(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}
