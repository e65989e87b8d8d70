//! Narrow interfaces over the fitted artifacts.
//!
//! The encoder and predictor only ever see these traits; how an artifact is
//! stored or deserialized is the loader's business.

use crate::error::Result;

/// A fitted per-feature scaling transform.
pub trait FeatureScaler: Send + Sync {
    /// Column order recorded when the scaler was fitted.
    fn feature_names(&self) -> &[String];

    /// Scale one row. The row must follow [`FeatureScaler::feature_names`].
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>>;
}

/// A fitted label encoder for one categorical column.
pub trait CategoryEncoder: Send + Sync {
    /// Labels known to the encoder, in code order.
    fn classes(&self) -> &[String];

    /// Integer code for `label`.
    fn transform(&self, label: &str) -> Result<u32>;

    fn contains(&self, label: &str) -> bool {
        self.classes().iter().any(|c| c == label)
    }
}

/// A binary classifier producing the positive-class probability.
pub trait Classifier: Send + Sync {
    /// Number of inputs the classifier expects.
    fn input_dim(&self) -> usize;

    fn predict(&self, scaled: &[f64]) -> Result<f64>;
}
