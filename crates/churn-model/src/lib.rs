pub mod error;
pub mod features;
pub mod handles;
pub mod input;
pub mod prediction;

pub use error::{ChurnError, Result};
pub use features::{CANONICAL_FEATURE_ORDER, FeatureVector};
pub use handles::{CategoryEncoder, Classifier, FeatureScaler};
pub use input::{Geography, RawInput, YesNo};
pub use prediction::{CHURN_THRESHOLD, Decision, PredictionResult, format_percent};
