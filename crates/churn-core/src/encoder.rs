//! Raw form values to the scaler-ordered feature vector.

use std::sync::Arc;

use churn_model::features::{
    AGE, BALANCE, CREDIT_SCORE, ESTIMATED_SALARY, GENDER, GEOGRAPHY_FRANCE, GEOGRAPHY_GERMANY,
    GEOGRAPHY_SPAIN, HAS_CR_CARD, IS_ACTIVE_MEMBER, NUM_OF_PRODUCTS, TENURE,
};
use churn_model::{
    CategoryEncoder, ChurnError, FeatureScaler, FeatureVector, Geography, RawInput, Result,
};

/// Number of columns the encoder produces.
pub const ENCODED_WIDTH: usize = 12;

/// Encodes a [`RawInput`] into the column order recorded by the fitted scaler.
#[derive(Clone)]
pub struct FeatureEncoder {
    scaler: Arc<dyn FeatureScaler>,
    gender: Arc<dyn CategoryEncoder>,
}

impl FeatureEncoder {
    pub fn new(scaler: Arc<dyn FeatureScaler>, gender: Arc<dyn CategoryEncoder>) -> Self {
        Self { scaler, gender }
    }

    /// Encode one customer.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if a numeric field is outside the form's range.
    /// - `InvalidCategory` if the gender label is unknown to the encoder.
    /// - `PredictionFailure` if the scaler's recorded columns do not match
    ///   the columns produced here.
    pub fn encode(&self, raw: &RawInput) -> Result<FeatureVector> {
        raw.validate()?;

        if !self.gender.contains(&raw.gender) {
            return Err(ChurnError::invalid_category(
                GENDER,
                raw.gender.as_str(),
                self.gender.classes(),
            ));
        }
        let gender_code = self.gender.transform(&raw.gender)?;

        let named = named_features(raw, f64::from(gender_code));
        let order = self.scaler.feature_names();
        if order.len() != named.len() {
            return Err(ChurnError::prediction_failure(format!(
                "scaler records {} features but {} are encoded",
                order.len(),
                named.len()
            )));
        }

        let values = order
            .iter()
            .map(|name| {
                named
                    .iter()
                    .find(|(n, _)| *n == name.as_str())
                    .map(|(_, value)| *value)
                    .ok_or_else(|| {
                        ChurnError::prediction_failure(format!(
                            "scaler expects feature '{name}' which is not encoded"
                        ))
                    })
            })
            .collect::<Result<Vec<f64>>>()?;

        FeatureVector::new(order.to_vec(), values)
    }
}

/// One-hot indicators for `Geography_France`, `Geography_Germany`, `Geography_Spain`.
pub fn geography_indicators(geography: Geography) -> [f64; 3] {
    match geography {
        Geography::France => [1.0, 0.0, 0.0],
        Geography::Germany => [0.0, 1.0, 0.0],
        Geography::Spain => [0.0, 0.0, 1.0],
    }
}

fn named_features(raw: &RawInput, gender_code: f64) -> [(&'static str, f64); ENCODED_WIDTH] {
    let [france, germany, spain] = geography_indicators(raw.geography);
    [
        (CREDIT_SCORE, f64::from(raw.credit_score)),
        (GEOGRAPHY_FRANCE, france),
        (GEOGRAPHY_GERMANY, germany),
        (GEOGRAPHY_SPAIN, spain),
        (GENDER, gender_code),
        (AGE, f64::from(raw.age)),
        (TENURE, f64::from(raw.tenure)),
        (BALANCE, raw.balance),
        (NUM_OF_PRODUCTS, f64::from(raw.num_of_products)),
        (HAS_CR_CARD, raw.has_cr_card.flag()),
        (IS_ACTIVE_MEMBER, raw.is_active_member.flag()),
        (ESTIMATED_SALARY, raw.estimated_salary),
    ]
}
