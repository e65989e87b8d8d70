//! CLI library components for the churn predictor.

pub mod batch;
pub mod form;
pub mod logging;
pub mod summary;
