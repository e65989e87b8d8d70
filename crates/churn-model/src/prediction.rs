use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ChurnError, Result};

/// Probabilities strictly above this value are classified as churn.
pub const CHURN_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Churn,
    Stay,
}

impl Decision {
    pub fn from_probability(probability: f64) -> Self {
        if probability > CHURN_THRESHOLD {
            Decision::Churn
        } else {
            Decision::Stay
        }
    }

    /// User-facing risk label.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Churn => "High Churn Risk",
            Decision::Stay => "Customer Likely to Stay",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Churn => "churn",
            Decision::Stay => "stay",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Churn probability with the derived decision and stay probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    churn_probability: f64,
    stay_probability: f64,
    decision: Decision,
}

impl PredictionResult {
    /// Build a result from a classifier output.
    ///
    /// # Errors
    ///
    /// Returns `PredictionFailure` if the value is not a probability.
    pub fn from_probability(probability: f64) -> Result<Self> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ChurnError::prediction_failure(format!(
                "classifier returned {probability}, expected a probability in [0, 1]"
            )));
        }
        Ok(Self {
            churn_probability: probability,
            stay_probability: 1.0 - probability,
            decision: Decision::from_probability(probability),
        })
    }

    pub fn churn_probability(&self) -> f64 {
        self.churn_probability
    }

    pub fn stay_probability(&self) -> f64 {
        self.stay_probability
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }

    pub fn is_churn(&self) -> bool {
        self.decision == Decision::Churn
    }

    /// The probability backing the decision: churn for churners, stay otherwise.
    pub fn headline_probability(&self) -> f64 {
        match self.decision {
            Decision::Churn => self.churn_probability,
            Decision::Stay => self.stay_probability,
        }
    }
}

/// Format a probability as a percentage with two decimals (`0.73` -> `73.00%`).
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}
