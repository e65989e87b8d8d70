use std::sync::Arc;

use churn_artifacts::ArtifactSet;
use churn_model::{
    CategoryEncoder, ChurnError, Classifier, FeatureScaler, FeatureVector, PredictionResult,
    RawInput, Result,
};
use tracing::{debug, debug_span};

use crate::encoder::FeatureEncoder;

/// Encodes customers, scales them and asks the classifier for a churn probability.
///
/// Holds shared handles to the loaded artifacts; nothing here mutates them, so
/// one predictor can serve any number of calls.
#[derive(Clone)]
pub struct ChurnPredictor {
    encoder: FeatureEncoder,
    scaler: Arc<dyn FeatureScaler>,
    classifier: Arc<dyn Classifier>,
}

impl ChurnPredictor {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        scaler: Arc<dyn FeatureScaler>,
        gender_encoder: Arc<dyn CategoryEncoder>,
    ) -> Self {
        Self {
            encoder: FeatureEncoder::new(Arc::clone(&scaler), gender_encoder),
            scaler,
            classifier,
        }
    }

    pub fn from_artifacts(artifacts: &ArtifactSet) -> Self {
        Self::new(
            artifacts.classifier_handle(),
            artifacts.scaler_handle(),
            artifacts.encoder_handle(),
        )
    }

    pub fn feature_names(&self) -> &[String] {
        self.scaler.feature_names()
    }

    pub fn encode(&self, raw: &RawInput) -> Result<FeatureVector> {
        self.encoder.encode(raw)
    }

    /// Scale `features` and run the classifier.
    ///
    /// # Errors
    ///
    /// Returns `PredictionFailure` when the vector's columns differ from the
    /// scaler's recorded order, when an artifact rejects the vector's shape,
    /// or when the classifier output is not a probability.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        if features.names() != self.scaler.feature_names() {
            return Err(ChurnError::prediction_failure(format!(
                "feature columns [{}] do not match the scaler's order [{}]",
                features.names().join(", "),
                self.scaler.feature_names().join(", ")
            )));
        }
        let scaled = self.scaler.transform(features.values())?;
        let probability = self.classifier.predict(&scaled)?;
        PredictionResult::from_probability(probability)
    }

    /// Encode and predict in one step.
    pub fn assess(&self, raw: &RawInput) -> Result<PredictionResult> {
        let span = debug_span!("assess");
        let _guard = span.enter();
        let features = self.encode(raw)?;
        debug!(feature_count = features.len(), "encoded features");
        let result = self.predict(&features)?;
        debug!(
            churn_probability = result.churn_probability(),
            decision = %result.decision(),
            "prediction complete"
        );
        Ok(result)
    }
}
