//! Scoring a CSV of customers.
//!
//! Input rows use the dataset's column headers (`CreditScore`, `Geography`,
//! ...); extra columns such as `CustomerId` or `Exited` are ignored, and the
//! flag columns accept the dataset's `1`/`0` as well as Yes/No. A row that
//! cannot be scored is written with an `Error` and counted, it does not stop
//! the run.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use churn_core::ChurnPredictor;
use churn_model::{Decision, RawInput};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::logging::redact_value;

/// Columns of the scored output, in order.
pub const OUTPUT_COLUMNS: [&str; 5] = [
    "CustomerIndex",
    "ChurnProbability",
    "StayProbability",
    "Decision",
    "Error",
];

/// One input line. Categorical columns stay text until they are parsed with
/// their column name, so errors say which column was wrong.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CsvCustomer {
    credit_score: u32,
    age: u32,
    tenure: u32,
    balance: f64,
    num_of_products: u32,
    has_cr_card: String,
    is_active_member: String,
    estimated_salary: f64,
    gender: String,
    geography: String,
}

impl CsvCustomer {
    fn into_raw(self) -> churn_model::Result<RawInput> {
        Ok(RawInput {
            credit_score: self.credit_score,
            age: self.age,
            tenure: self.tenure,
            balance: self.balance,
            num_of_products: self.num_of_products,
            has_cr_card: RawInput::parse_has_cr_card(&self.has_cr_card)?,
            is_active_member: RawInput::parse_is_active_member(&self.is_active_member)?,
            estimated_salary: self.estimated_salary,
            gender: self.gender,
            geography: self.geography.parse()?,
        })
    }
}

/// One output line.
#[derive(Debug, Serialize)]
struct ScoredRow {
    customer_index: usize,
    churn_probability: Option<f64>,
    stay_probability: Option<f64>,
    decision: Option<Decision>,
    error: Option<String>,
}

/// A row that was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// 1-based position among the data rows.
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub churn: usize,
    pub stay: usize,
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    pub fn scored(&self) -> usize {
        self.churn + self.stay
    }

    pub fn total(&self) -> usize {
        self.scored() + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Score `reader` into a new file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be created, plus everything [`score_csv`] fails on.
pub fn score_to_path<R: Read>(
    predictor: &ChurnPredictor,
    reader: R,
    path: &Path,
) -> Result<BatchReport> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let report = score_csv(predictor, reader, BufWriter::new(file))?;
    info!(output = %path.display(), "scores written");
    Ok(report)
}

/// Score every row of `reader` and write one result row per input row.
///
/// The header is always written, so an input without data rows still yields
/// a valid CSV.
///
/// # Errors
///
/// Fails on I/O errors and on prediction failures, which mean the artifacts do
/// not fit the encoded features and would fail every row alike. Bad customer
/// data only fails its own row.
pub fn score_csv<R: Read, W: Write>(
    predictor: &ChurnPredictor,
    reader: R,
    writer: W,
) -> Result<BatchReport> {
    let span = info_span!("batch");
    let _guard = span.enter();

    let mut input = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut output = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    output
        .write_record(OUTPUT_COLUMNS)
        .context("write batch header")?;
    let mut report = BatchReport::default();

    for (offset, record) in input.deserialize::<CsvCustomer>().enumerate() {
        let index = offset + 1;
        let outcome = match record {
            Ok(customer) => match customer.into_raw().and_then(|raw| predictor.assess(&raw)) {
                Ok(result) => Ok(result),
                Err(error) if error.is_input_error() => Err(error.to_string()),
                Err(error) => {
                    return Err(error).with_context(|| format!("score row {index}"));
                }
            },
            Err(error) if error.is_io_error() => {
                return Err(error).context("read batch input");
            }
            Err(error) => Err(row_error_message(&error)),
        };

        let row = match outcome {
            Ok(result) => {
                match result.decision() {
                    Decision::Churn => report.churn += 1,
                    Decision::Stay => report.stay += 1,
                }
                debug!(row = index, decision = %result.decision(), "row scored");
                ScoredRow {
                    customer_index: index,
                    churn_probability: Some(result.churn_probability()),
                    stay_probability: Some(result.stay_probability()),
                    decision: Some(result.decision()),
                    error: None,
                }
            }
            Err(message) => {
                warn!(row = index, reason = %redact_value(&message), "row rejected");
                report.failures.push(RowFailure {
                    index,
                    message: message.clone(),
                });
                ScoredRow {
                    customer_index: index,
                    churn_probability: None,
                    stay_probability: None,
                    decision: None,
                    error: Some(message),
                }
            }
        };
        output
            .serialize(&row)
            .with_context(|| format!("write row {index}"))?;
    }
    output.flush().context("flush batch output")?;

    info!(
        rows = report.total(),
        churn = report.churn,
        stay = report.stay,
        failed = report.failures.len(),
        "batch complete"
    );
    Ok(report)
}

/// Deserialization errors carry csv position noise; keep the field-level reason.
fn row_error_message(error: &csv::Error) -> String {
    match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("column {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => error.to_string(),
    }
}
