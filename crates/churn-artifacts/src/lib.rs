#![deny(unsafe_code)]

pub mod encoder;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod network;
pub mod registry;
pub mod scaler;

pub use crate::encoder::LabelEncoder;
pub use crate::error::ArtifactError;
pub use crate::manifest::{ArtifactRole, Manifest};
pub use crate::network::{Activation, DenseLayer, DenseNetwork};
pub use crate::registry::{ArtifactFile, ArtifactSet, LayerSummary, LoadSummary};
pub use crate::scaler::StandardScaler;
