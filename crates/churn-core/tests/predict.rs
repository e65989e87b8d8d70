//! Integration tests for encoding and prediction.

use std::sync::Arc;

use churn_artifacts::{Activation, DenseLayer, DenseNetwork, LabelEncoder, StandardScaler};
use churn_core::ChurnPredictor;
use churn_model::{
    CANONICAL_FEATURE_ORDER, ChurnError, Classifier, Decision, FeatureVector, Geography, RawInput,
    YesNo, format_percent,
};

/// Returns a fixed probability regardless of input.
struct FixedClassifier(f64);

impl Classifier for FixedClassifier {
    fn input_dim(&self) -> usize {
        12
    }

    fn predict(&self, _scaled: &[f64]) -> churn_model::Result<f64> {
        Ok(self.0)
    }
}

fn names(order: &[&str]) -> Vec<String> {
    order.iter().map(|s| (*s).to_string()).collect()
}

fn identity_scaler(order: &[&str]) -> Arc<StandardScaler> {
    Arc::new(
        StandardScaler::new(names(order), vec![0.0; order.len()], vec![1.0; order.len()])
            .unwrap(),
    )
}

fn gender_encoder() -> Arc<LabelEncoder> {
    Arc::new(LabelEncoder::new(vec!["Female".into(), "Male".into()]).unwrap())
}

fn predictor_with(classifier: Arc<dyn Classifier>) -> ChurnPredictor {
    ChurnPredictor::new(
        classifier,
        identity_scaler(&CANONICAL_FEATURE_ORDER),
        gender_encoder(),
    )
}

/// Logistic model whose logit is the sum of two scaled columns.
fn logistic_on(order: &[&str], columns: &[&str]) -> Arc<DenseNetwork> {
    let weights = order
        .iter()
        .map(|name| vec![if columns.contains(name) { 1.0 } else { 0.0 }])
        .collect();
    Arc::new(
        DenseNetwork::new(
            order.len(),
            vec![DenseLayer {
                weights,
                bias: vec![0.0],
                activation: Activation::Sigmoid,
            }],
        )
        .unwrap(),
    )
}

#[test]
fn default_form_encodes_in_scaler_order() {
    let predictor = predictor_with(Arc::new(FixedClassifier(0.2)));
    let features = predictor.encode(&RawInput::default()).unwrap();

    assert_eq!(features.names(), CANONICAL_FEATURE_ORDER);
    assert_eq!(
        features.values(),
        [600.0, 1.0, 0.0, 0.0, 0.0, 40.0, 3.0, 60000.0, 1.0, 1.0, 1.0, 50000.0]
    );
}

#[test]
fn male_and_spain_encoding() {
    let predictor = predictor_with(Arc::new(FixedClassifier(0.2)));
    let raw = RawInput {
        gender: "Male".to_string(),
        geography: Geography::Spain,
        has_cr_card: YesNo::No,
        is_active_member: YesNo::No,
        ..RawInput::default()
    };
    let features = predictor.encode(&raw).unwrap();

    assert_eq!(features.get("Gender"), Some(1.0));
    assert_eq!(features.get("Geography_France"), Some(0.0));
    assert_eq!(features.get("Geography_Germany"), Some(0.0));
    assert_eq!(features.get("Geography_Spain"), Some(1.0));
    assert_eq!(features.get("HasCrCard"), Some(0.0));
    assert_eq!(features.get("IsActiveMember"), Some(0.0));
}

#[test]
fn reordered_scaler_reorders_features() {
    let order = [
        "Age",
        "EstimatedSalary",
        "Gender",
        "Geography_Spain",
        "Balance",
        "CreditScore",
        "IsActiveMember",
        "Geography_France",
        "Tenure",
        "HasCrCard",
        "Geography_Germany",
        "NumOfProducts",
    ];
    let predictor = ChurnPredictor::new(
        Arc::new(FixedClassifier(0.2)),
        identity_scaler(&order),
        gender_encoder(),
    );
    let features = predictor.encode(&RawInput::default()).unwrap();

    assert_eq!(features.names(), order);
    assert_eq!(
        features.values(),
        [40.0, 50000.0, 0.0, 0.0, 60000.0, 600.0, 1.0, 1.0, 3.0, 1.0, 0.0, 1.0]
    );
}

#[test]
fn unknown_gender_is_invalid_category() {
    let predictor = predictor_with(Arc::new(FixedClassifier(0.9)));
    let raw = RawInput {
        gender: "Unknown".to_string(),
        ..RawInput::default()
    };
    let err = predictor.assess(&raw).unwrap_err();
    match err {
        ChurnError::InvalidCategory { field, value, allowed } => {
            assert_eq!(field, "Gender");
            assert_eq!(value, "Unknown");
            assert_eq!(allowed, vec!["Female", "Male"]);
        }
        other => panic!("expected InvalidCategory, got {other:?}"),
    }
}

#[test]
fn out_of_range_input_never_reaches_the_model() {
    let predictor = predictor_with(Arc::new(FixedClassifier(0.9)));
    let raw = RawInput {
        credit_score: 950,
        ..RawInput::default()
    };
    let err = predictor.assess(&raw).unwrap_err();
    assert!(matches!(err, ChurnError::OutOfRange { .. }));
}

#[test]
fn classifier_at_73_percent_is_churn() {
    let predictor = predictor_with(Arc::new(FixedClassifier(0.73)));
    let result = predictor.assess(&RawInput::default()).unwrap();

    assert_eq!(result.decision(), Decision::Churn);
    assert_eq!(format_percent(result.churn_probability()), "73.00%");
    assert_eq!(format_percent(result.stay_probability()), "27.00%");
}

#[test]
fn classifier_at_exactly_half_is_stay() {
    let predictor = predictor_with(Arc::new(FixedClassifier(0.5)));
    let result = predictor.assess(&RawInput::default()).unwrap();
    assert_eq!(result.decision(), Decision::Stay);
}

#[test]
fn out_of_range_classifier_output_is_prediction_failure() {
    let predictor = predictor_with(Arc::new(FixedClassifier(1.7)));
    let err = predictor.assess(&RawInput::default()).unwrap_err();
    assert!(matches!(err, ChurnError::PredictionFailure { .. }));
}

#[test]
fn scaler_with_unknown_column_is_prediction_failure() {
    let mut order: Vec<&str> = CANONICAL_FEATURE_ORDER.to_vec();
    order[4] = "Sex";
    let predictor = ChurnPredictor::new(
        Arc::new(FixedClassifier(0.2)),
        identity_scaler(&order),
        gender_encoder(),
    );
    let err = predictor.encode(&RawInput::default()).unwrap_err();
    assert!(matches!(err, ChurnError::PredictionFailure { .. }));
    assert!(err.to_string().contains("'Sex'"));
}

#[test]
fn scaler_with_extra_column_is_prediction_failure() {
    let mut order: Vec<&str> = CANONICAL_FEATURE_ORDER.to_vec();
    order.push("Complain");
    let predictor = ChurnPredictor::new(
        Arc::new(FixedClassifier(0.2)),
        identity_scaler(&order),
        gender_encoder(),
    );
    let err = predictor.encode(&RawInput::default()).unwrap_err();
    assert!(matches!(err, ChurnError::PredictionFailure { .. }));
}

#[test]
fn predict_rejects_vectors_in_the_wrong_order() {
    let predictor = predictor_with(Arc::new(FixedClassifier(0.2)));
    let encoded = predictor.encode(&RawInput::default()).unwrap();
    let mut names: Vec<String> = encoded.names().to_vec();
    let mut values: Vec<f64> = encoded.values().to_vec();
    names.swap(0, 5);
    values.swap(0, 5);
    let shuffled = FeatureVector::new(names, values).unwrap();

    let err = predictor.predict(&shuffled).unwrap_err();
    assert!(matches!(err, ChurnError::PredictionFailure { .. }));
}

#[test]
fn classifier_width_mismatch_is_prediction_failure() {
    let narrow = Arc::new(
        DenseNetwork::new(
            2,
            vec![DenseLayer {
                weights: vec![vec![1.0], vec![1.0]],
                bias: vec![0.0],
                activation: Activation::Sigmoid,
            }],
        )
        .unwrap(),
    );
    let predictor = predictor_with(narrow);
    let err = predictor.assess(&RawInput::default()).unwrap_err();
    assert!(matches!(err, ChurnError::PredictionFailure { .. }));
}

#[test]
fn scaling_is_applied_before_classification() {
    // Logit = scaled HasCrCard + scaled IsActiveMember; both centred on 1.0.
    let order = CANONICAL_FEATURE_ORDER;
    let mut mean = vec![0.0; 12];
    mean[9] = 1.0;
    mean[10] = 1.0;
    let scaler = Arc::new(StandardScaler::new(names(&order), mean, vec![1.0; 12]).unwrap());
    let predictor = ChurnPredictor::new(
        logistic_on(&order, &["HasCrCard", "IsActiveMember"]),
        scaler,
        gender_encoder(),
    );

    let engaged = predictor.assess(&RawInput::default()).unwrap();
    assert_eq!(engaged.churn_probability(), 0.5);
    assert_eq!(engaged.decision(), Decision::Stay);

    let disengaged = RawInput {
        has_cr_card: YesNo::No,
        is_active_member: YesNo::No,
        ..RawInput::default()
    };
    let result = predictor.assess(&disengaged).unwrap();
    assert!(result.churn_probability() < 0.5);
}

#[test]
fn predictions_are_deterministic() {
    let order = CANONICAL_FEATURE_ORDER;
    let predictor = ChurnPredictor::new(
        logistic_on(&order, &["Age", "Balance"]),
        identity_scaler(&order),
        gender_encoder(),
    );
    let raw = RawInput {
        age: 23,
        balance: 0.0,
        ..RawInput::default()
    };
    let first = predictor.assess(&raw).unwrap();
    let second = predictor.assess(&raw).unwrap();
    assert_eq!(first, second);
}
