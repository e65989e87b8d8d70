//! Churn inference: raw customer attributes in, churn decision out.
//!
//! ```text
//! RawInput --encode--> FeatureVector --scale--> scaled row --classify--> probability --> Decision
//! ```

pub mod encoder;
pub mod predictor;

pub use encoder::{ENCODED_WIDTH, FeatureEncoder, geography_indicators};
pub use predictor::ChurnPredictor;
