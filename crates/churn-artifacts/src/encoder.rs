#![deny(unsafe_code)]

use std::collections::BTreeSet;

use churn_model::{CategoryEncoder, ChurnError};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// Maps each known label to its index in `classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, ArtifactError> {
        let encoder = Self { classes };
        encoder
            .check()
            .map_err(|message| ArtifactError::invalid("label_encoder", message))?;
        Ok(encoder)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("classes is empty".to_string());
        }
        let mut seen = BTreeSet::new();
        for class in &self.classes {
            if !seen.insert(class.as_str()) {
                return Err(format!("duplicate class: {class}"));
            }
        }
        if u32::try_from(self.classes.len()).is_err() {
            return Err("too many classes".to_string());
        }
        Ok(())
    }
}

impl CategoryEncoder for LabelEncoder {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn transform(&self, label: &str) -> churn_model::Result<u32> {
        self.classes
            .iter()
            .position(|c| c == label)
            .and_then(|idx| u32::try_from(idx).ok())
            .ok_or_else(|| ChurnError::invalid_category("label", label, &self.classes))
    }
}
