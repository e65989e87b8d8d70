//! Batch scoring against the fixture artifacts.

use std::path::PathBuf;

use churn_artifacts::ArtifactSet;
use churn_cli::batch::{score_csv, score_to_path};
use churn_core::ChurnPredictor;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/artifacts")
}

fn predictor() -> ChurnPredictor {
    let (artifacts, _) = ArtifactSet::verify_and_load(&fixture_dir()).unwrap();
    ChurnPredictor::from_artifacts(&artifacts)
}

const HEADER: &str = "CustomerId,CreditScore,Geography,Gender,Age,Tenure,Balance,NumOfProducts,HasCrCard,IsActiveMember,EstimatedSalary";

fn score(rows: &[&str]) -> (churn_cli::batch::BatchReport, Vec<csv::StringRecord>) {
    let mut input = String::from(HEADER);
    for row in rows {
        input.push('\n');
        input.push_str(row);
    }
    let mut output = Vec::new();
    let report = score_csv(&predictor(), input.as_bytes(), &mut output).unwrap();
    let records = csv::Reader::from_reader(output.as_slice())
        .records()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    (report, records)
}

#[test]
fn scores_each_row_in_order() {
    let (report, records) = score(&[
        "15634602,600,France,Female,40,3,60000,1,Yes,Yes,50000",
        "15647311,500,Germany,Female,62,2,150000,3,Yes,No,120000",
    ]);

    assert_eq!(report.total(), 2);
    assert_eq!(report.stay, 1);
    assert_eq!(report.churn, 1);
    assert!(!report.has_failures());

    assert_eq!(&records[0][0], "1");
    assert_eq!(&records[0][3], "stay");
    let churn: f64 = records[0][1].parse().unwrap();
    assert!((churn - 0.143).abs() < 1e-3, "churn = {churn}");

    assert_eq!(&records[1][0], "2");
    assert_eq!(&records[1][3], "churn");
    let churn: f64 = records[1][1].parse().unwrap();
    assert!(churn > 0.99, "churn = {churn}");
}

#[test]
fn bad_rows_are_reported_and_skipped() {
    let (report, records) = score(&[
        "1,600,Portugal,Female,40,3,60000,1,Yes,Yes,50000",
        "2,600,Spain,Unknown,40,3,60000,1,Yes,Yes,50000",
        "3,950,Spain,Male,40,3,60000,1,Yes,Yes,50000",
        "4,600,Spain,Male,40,3,60000,1,Maybe,Yes,50000",
        "5,600,Spain,Male,40,3,60000,1,Yes,Yes,50000",
    ]);

    assert_eq!(report.total(), 5);
    assert_eq!(report.scored(), 1);
    let failed: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![1, 2, 3, 4]);
    assert!(report.failures[0].message.contains("Portugal"));
    assert!(report.failures[1].message.contains("invalid Gender value 'Unknown'"));
    assert!(report.failures[2].message.contains("CreditScore"));
    assert!(
        report.failures[3]
            .message
            .contains("invalid HasCrCard value 'Maybe'")
    );

    assert_eq!(records.len(), 5);
    for record in &records[..4] {
        assert!(record[1].is_empty());
        assert!(record[3].is_empty());
        assert!(!record[4].is_empty());
    }
    assert_eq!(&records[4][3], "stay");
    assert!(records[4][4].is_empty());
}

#[test]
fn output_header_names_the_columns() {
    let mut output = Vec::new();
    score_csv(
        &predictor(),
        format!("{HEADER}\n1,600,France,Male,40,3,60000,1,No,No,50000").as_bytes(),
        &mut output,
    )
    .unwrap();
    let text = String::from_utf8(output).unwrap();
    let header = text.lines().next().unwrap();
    insta::assert_snapshot!(header, @"CustomerIndex,ChurnProbability,StayProbability,Decision,Error");
}

#[test]
fn header_only_input_still_writes_the_header() {
    let mut output = Vec::new();
    let report = score_csv(&predictor(), HEADER.as_bytes(), &mut output).unwrap();
    assert_eq!(report.total(), 0);
    let text = String::from_utf8(output).unwrap();
    insta::assert_snapshot!(text.trim_end(), @"CustomerIndex,ChurnProbability,StayProbability,Decision,Error");
}

#[test]
fn dataset_rows_score_as_exported() {
    let input = "RowNumber,CustomerId,Surname,CreditScore,Geography,Gender,Age,Tenure,Balance,NumOfProducts,HasCrCard,IsActiveMember,EstimatedSalary,Exited\n\
                 1,15634602,Hargrave,619,France,Female,42,2,0,1,1,1,101348.88,1\n\
                 2,15647311,Hill,608,Spain,Female,41,1,83807.86,1,0,1,112542.58,0\n";
    let mut output = Vec::new();
    let report = score_csv(&predictor(), input.as_bytes(), &mut output).unwrap();

    assert_eq!(report.failures, vec![]);
    assert_eq!(report.scored(), 2);
}

#[test]
fn bad_flags_name_their_column() {
    let (report, _) = score(&[
        "1,600,France,Female,40,3,60000,1,2,1,50000",
        "2,600,France,Female,40,3,60000,1,1,x,50000",
    ]);
    assert!(report.failures[0].message.contains("HasCrCard"));
    assert!(report.failures[1].message.contains("IsActiveMember"));
}

#[test]
fn scores_can_be_written_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.csv");
    let input = format!("{HEADER}\n1,600,France,Female,40,3,60000,1,Yes,Yes,50000");

    let report = score_to_path(&predictor(), input.as_bytes(), &path).unwrap();
    assert_eq!(report.stay, 1);

    let records = csv::Reader::from_path(&path)
        .unwrap()
        .records()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][3], "stay");
}
