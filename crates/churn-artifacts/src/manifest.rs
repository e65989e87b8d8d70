#![deny(unsafe_code)]

//! Optional `artifacts.toml` describing where each artifact lives.
//!
//! ```toml
//! [manifest]
//! schema = "churn-predictor.artifacts"
//! schema_version = 1
//!
//! [[files]]
//! role = "classifier"
//! path = "models/churn_model.json"
//! sha256 = "…64 hex chars…"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MANIFEST_FILENAME: &str = "artifacts.toml";
pub const MANIFEST_SCHEMA: &str = "churn-predictor.artifacts";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub role: String,
    pub path: String,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The three artifacts a prediction needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    Classifier,
    Scaler,
    LabelEncoder,
}

impl ArtifactRole {
    pub const ALL: [ArtifactRole; 3] = [
        ArtifactRole::Classifier,
        ArtifactRole::Scaler,
        ArtifactRole::LabelEncoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactRole::Classifier => "classifier",
            ArtifactRole::Scaler => "scaler",
            ArtifactRole::LabelEncoder => "label_encoder",
        }
    }

    /// File looked up in the artifacts directory when no manifest overrides it.
    pub fn default_file(&self) -> &'static str {
        match self {
            ArtifactRole::Classifier => "churn_model.json",
            ArtifactRole::Scaler => "scaler.json",
            ArtifactRole::LabelEncoder => "label_encoder.json",
        }
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| format!("unknown artifact role: {s}"))
    }
}
