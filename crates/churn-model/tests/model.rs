//! Tests for churn-model types.

use churn_model::{
    ChurnError, Decision, FeatureVector, Geography, PredictionResult, RawInput, YesNo,
    format_percent,
};

#[test]
fn probability_exactly_half_stays() {
    let result = PredictionResult::from_probability(0.5).unwrap();
    assert_eq!(result.decision(), Decision::Stay);
    assert!(!result.is_churn());
}

#[test]
fn probability_just_above_half_churns() {
    let result = PredictionResult::from_probability(0.500_000_1).unwrap();
    assert_eq!(result.decision(), Decision::Churn);
}

#[test]
fn churn_at_73_percent() {
    let result = PredictionResult::from_probability(0.73).unwrap();
    assert_eq!(result.decision(), Decision::Churn);
    assert_eq!(format_percent(result.churn_probability()), "73.00%");
    assert_eq!(format_percent(result.stay_probability()), "27.00%");
    assert_eq!(result.headline_probability(), 0.73);
}

#[test]
fn stay_and_churn_sum_to_one() {
    for p in [0.0, 0.1, 0.25, 0.333, 0.5, 0.73, 0.999, 1.0] {
        let result = PredictionResult::from_probability(p).unwrap();
        assert!((result.churn_probability() + result.stay_probability() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn non_probabilities_are_prediction_failures() {
    for p in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
        let err = PredictionResult::from_probability(p).unwrap_err();
        assert!(matches!(err, ChurnError::PredictionFailure { .. }), "{p}");
    }
}

#[test]
fn decision_labels() {
    assert_eq!(Decision::Churn.label(), "High Churn Risk");
    assert_eq!(Decision::Stay.label(), "Customer Likely to Stay");
}

#[test]
fn raw_input_deserializes_from_training_columns() {
    let json = r#"{
        "CreditScore": 720,
        "Age": 52,
        "Tenure": 7,
        "Balance": 125000.5,
        "NumOfProducts": 2,
        "HasCrCard": "No",
        "IsActiveMember": "yes",
        "EstimatedSalary": 88000.0,
        "Gender": "Male",
        "Geography": "Germany"
    }"#;
    let input: RawInput = serde_json::from_str(json).expect("deserialize input");
    assert_eq!(input.credit_score, 720);
    assert_eq!(input.has_cr_card, YesNo::No);
    assert_eq!(input.is_active_member, YesNo::Yes);
    assert_eq!(input.geography, Geography::Germany);
    assert_eq!(input.gender, "Male");
    assert!(input.validate().is_ok());
}

#[test]
fn raw_input_rejects_unknown_geography() {
    let json = r#"{
        "CreditScore": 720, "Age": 52, "Tenure": 7, "Balance": 0.0,
        "NumOfProducts": 2, "HasCrCard": "No", "IsActiveMember": "No",
        "EstimatedSalary": 1.0, "Gender": "Male", "Geography": "Portugal"
    }"#;
    let err = serde_json::from_str::<RawInput>(json).unwrap_err();
    assert!(err.to_string().contains("Portugal"));
}

#[test]
fn validate_checks_each_range() {
    let cases = [
        (
            RawInput {
                credit_score: 299,
                ..RawInput::default()
            },
            "CreditScore",
        ),
        (
            RawInput {
                tenure: 11,
                ..RawInput::default()
            },
            "Tenure",
        ),
        (
            RawInput {
                balance: 300_000.01,
                ..RawInput::default()
            },
            "Balance",
        ),
        (
            RawInput {
                num_of_products: 5,
                ..RawInput::default()
            },
            "NumOfProducts",
        ),
        (
            RawInput {
                estimated_salary: f64::NAN,
                ..RawInput::default()
            },
            "EstimatedSalary",
        ),
    ];
    for (input, expected) in cases {
        match input.validate() {
            Err(ChurnError::OutOfRange { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected OutOfRange for {expected}, got {other:?}"),
        }
    }
}

#[test]
fn range_bounds_are_inclusive() {
    let input = RawInput {
        credit_score: 900,
        age: 18,
        tenure: 0,
        balance: 300_000.0,
        num_of_products: 4,
        estimated_salary: 0.0,
        ..RawInput::default()
    };
    assert!(input.validate().is_ok());
}

#[test]
fn feature_vector_lookup_by_name() {
    let vector = FeatureVector::new(
        vec!["Age".to_string(), "Tenure".to_string()],
        vec![40.0, 3.0],
    )
    .unwrap();
    assert_eq!(vector.get("Tenure"), Some(3.0));
    assert_eq!(vector.get("Balance"), None);
    assert_eq!(vector.iter().collect::<Vec<_>>(), vec![("Age", 40.0), ("Tenure", 3.0)]);
}

#[test]
fn invalid_category_message_lists_choices() {
    let err = ChurnError::invalid_category("Gender", "Unknown", &["Female", "Male"]);
    assert_eq!(
        err.to_string(),
        "invalid Gender value 'Unknown' (expected one of: Female, Male)"
    );
    assert!(err.is_input_error());
}
