#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use churn_model::{CategoryEncoder, Classifier, FeatureScaler};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::encoder::LabelEncoder;
use crate::error::ArtifactError;
use crate::hash::{is_sha256_hex, sha256_hex};
use crate::manifest::{
    ArtifactRole, MANIFEST_FILENAME, MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest,
};
use crate::network::DenseNetwork;
use crate::scaler::StandardScaler;

/// Where one artifact was found and what it hashed to.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactFile {
    pub role: ArtifactRole,
    pub path: PathBuf,
    pub sha256: String,
    /// True when the manifest pinned a hash and it matched.
    pub verified: bool,
    /// Free-form notes from the manifest entry.
    pub notes: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LayerSummary {
    pub inputs: usize,
    pub units: usize,
    pub activation: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadSummary {
    pub artifacts_dir: PathBuf,
    pub manifest: Option<PathBuf>,
    pub files: Vec<ArtifactFile>,
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub layers: Vec<LayerSummary>,
}

/// The fitted classifier, scaler and encoder, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub classifier: Arc<DenseNetwork>,
    pub scaler: Arc<StandardScaler>,
    pub encoder: Arc<LabelEncoder>,
    pub files: Vec<ArtifactFile>,
}

struct ResolvedPath {
    path: PathBuf,
    sha256: Option<String>,
    notes: Option<String>,
}

impl ArtifactSet {
    /// Locate, verify and parse every artifact under `artifacts_dir`.
    ///
    /// All three files are checked for presence before any of them is read,
    /// so a single error lists everything that is missing.
    ///
    /// # Errors
    ///
    /// Fails with [`ArtifactError::MissingArtifact`] if any file is absent, or
    /// with a manifest, hash or parse error otherwise.
    pub fn verify_and_load(artifacts_dir: &Path) -> Result<(Self, LoadSummary), ArtifactError> {
        let manifest_path = artifacts_dir.join(MANIFEST_FILENAME);
        let manifest = if manifest_path.is_file() {
            let manifest = load_manifest(&manifest_path)?;
            validate_manifest(&manifest)?;
            debug!(path = %manifest_path.display(), "using artifact manifest");
            Some(manifest)
        } else {
            None
        };

        let resolved = resolve_paths(artifacts_dir, manifest.as_ref())?;

        let missing: Vec<PathBuf> = ArtifactRole::ALL
            .iter()
            .filter_map(|role| resolved.get(role))
            .filter(|r| !r.path.is_file())
            .map(|r| r.path.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ArtifactError::MissingArtifact { missing });
        }

        let mut files = Vec::with_capacity(ArtifactRole::ALL.len());
        let mut contents: BTreeMap<ArtifactRole, Vec<u8>> = BTreeMap::new();
        for role in ArtifactRole::ALL {
            let Some(entry) = resolved.get(&role) else {
                continue;
            };
            let bytes = std::fs::read(&entry.path).map_err(|e| ArtifactError::io(&entry.path, e))?;
            let actual = sha256_hex(&bytes);
            let verified = match &entry.sha256 {
                Some(expected) => {
                    let expected = expected.to_ascii_lowercase();
                    if actual != expected {
                        return Err(ArtifactError::Sha256Mismatch {
                            path: entry.path.clone(),
                            expected,
                            actual,
                        });
                    }
                    true
                }
                None => false,
            };
            debug!(role = %role, path = %entry.path.display(), verified, "read artifact");
            files.push(ArtifactFile {
                role,
                path: entry.path.clone(),
                sha256: actual,
                verified,
                notes: entry.notes.clone(),
            });
            contents.insert(role, bytes);
        }

        let classifier: DenseNetwork = parse_artifact(&files, &contents, ArtifactRole::Classifier)?;
        let scaler: StandardScaler = parse_artifact(&files, &contents, ArtifactRole::Scaler)?;
        let encoder: LabelEncoder = parse_artifact(&files, &contents, ArtifactRole::LabelEncoder)?;

        let path_of = |role: ArtifactRole| {
            files
                .iter()
                .find(|f| f.role == role)
                .map(|f| f.path.clone())
                .unwrap_or_default()
        };
        classifier
            .check()
            .map_err(|m| ArtifactError::invalid_at(&path_of(ArtifactRole::Classifier), m))?;
        scaler
            .check()
            .map_err(|m| ArtifactError::invalid_at(&path_of(ArtifactRole::Scaler), m))?;
        encoder
            .check()
            .map_err(|m| ArtifactError::invalid_at(&path_of(ArtifactRole::LabelEncoder), m))?;

        if classifier.input_dim() != scaler.feature_names().len() {
            return Err(ArtifactError::invalid_at(
                &path_of(ArtifactRole::Classifier),
                format!(
                    "classifier expects {} inputs but the scaler records {} features",
                    classifier.input_dim(),
                    scaler.feature_names().len()
                ),
            ));
        }

        let summary = LoadSummary {
            artifacts_dir: artifacts_dir.to_path_buf(),
            manifest: manifest.as_ref().map(|_| manifest_path.clone()),
            files: files.clone(),
            feature_names: scaler.feature_names().to_vec(),
            classes: encoder.classes().to_vec(),
            layers: classifier
                .layers()
                .iter()
                .map(|layer| LayerSummary {
                    inputs: layer.inputs(),
                    units: layer.units(),
                    activation: layer.activation.as_str().to_string(),
                })
                .collect(),
        };
        info!(
            artifacts_dir = %artifacts_dir.display(),
            feature_count = summary.feature_names.len(),
            layer_count = summary.layers.len(),
            "artifacts loaded"
        );

        Ok((
            Self {
                classifier: Arc::new(classifier),
                scaler: Arc::new(scaler),
                encoder: Arc::new(encoder),
                files,
            },
            summary,
        ))
    }

    pub fn classifier_handle(&self) -> Arc<dyn Classifier> {
        self.classifier.clone()
    }

    pub fn scaler_handle(&self) -> Arc<dyn FeatureScaler> {
        self.scaler.clone()
    }

    pub fn encoder_handle(&self) -> Arc<dyn CategoryEncoder> {
        self.encoder.clone()
    }
}

fn load_manifest(path: &Path) -> Result<Manifest, ArtifactError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| ArtifactError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<(), ArtifactError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(ArtifactError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(ArtifactError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut seen = Vec::new();
    for file in &manifest.files {
        let role: ArtifactRole = file
            .role
            .parse()
            .map_err(|message| ArtifactError::InvalidManifest { message })?;
        if seen.contains(&role) {
            return Err(ArtifactError::InvalidManifest {
                message: format!("duplicate role in manifest: {role}"),
            });
        }
        seen.push(role);

        if let Some(sha) = &file.sha256
            && !is_sha256_hex(sha)
        {
            return Err(ArtifactError::InvalidSha256 {
                path: PathBuf::from(&file.path),
                message: "sha256 must be 64 hex characters".to_string(),
            });
        }
        validate_path(&file.path)?;
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<PathBuf, ArtifactError> {
    if path.contains('\\') {
        return Err(ArtifactError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }

    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(ArtifactError::InvalidPath {
            path: p,
            message: "manifest path must be relative".to_string(),
        });
    }

    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ArtifactError::InvalidPath {
            path: p,
            message: "manifest path must not leave the artifacts directory".to_string(),
        });
    }

    Ok(p)
}

fn resolve_paths(
    artifacts_dir: &Path,
    manifest: Option<&Manifest>,
) -> Result<BTreeMap<ArtifactRole, ResolvedPath>, ArtifactError> {
    let mut resolved = BTreeMap::new();
    for role in ArtifactRole::ALL {
        resolved.insert(
            role,
            ResolvedPath {
                path: artifacts_dir.join(role.default_file()),
                sha256: None,
                notes: None,
            },
        );
    }
    if let Some(manifest) = manifest {
        for file in &manifest.files {
            let role: ArtifactRole = file
                .role
                .parse()
                .map_err(|message| ArtifactError::InvalidManifest { message })?;
            let relative = validate_path(&file.path)?;
            resolved.insert(
                role,
                ResolvedPath {
                    path: artifacts_dir.join(relative),
                    sha256: file.sha256.clone(),
                    notes: file.notes.clone(),
                },
            );
        }
    }
    Ok(resolved)
}

fn parse_artifact<T: DeserializeOwned>(
    files: &[ArtifactFile],
    contents: &BTreeMap<ArtifactRole, Vec<u8>>,
    role: ArtifactRole,
) -> Result<T, ArtifactError> {
    let path = files
        .iter()
        .find(|f| f.role == role)
        .map(|f| f.path.clone())
        .unwrap_or_else(|| PathBuf::from(role.default_file()));
    let bytes = contents
        .get(&role)
        .ok_or_else(|| ArtifactError::MissingArtifact {
            missing: vec![path.clone()],
        })?;
    serde_json::from_slice(bytes).map_err(|source| ArtifactError::Json { path, source })
}
