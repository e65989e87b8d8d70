use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use churn_artifacts::{ArtifactSet, LoadSummary};
use churn_cli::batch::{BatchReport, score_csv, score_to_path};
use churn_cli::form::prompt_raw_input;
use churn_cli::logging::redact_value;
use churn_cli::summary::{print_artifacts, print_prediction, verdict_text};
use churn_core::ChurnPredictor;
use churn_model::{PredictionResult, RawInput};
use serde::Serialize;
use tracing::{info, info_span};

use crate::cli::{BatchArgs, OutputFormatArg, PredictArgs};

#[derive(Serialize)]
struct PredictionOutput<'a> {
    input: &'a RawInput,
    result: &'a PredictionResult,
    verdict: String,
}

/// Load and verify the artifacts before any customer data is read.
fn load_predictor(artifacts_dir: &Path) -> Result<(ChurnPredictor, LoadSummary)> {
    let start = Instant::now();
    let (artifacts, summary) = ArtifactSet::verify_and_load(artifacts_dir)
        .with_context(|| format!("load artifacts from {}", artifacts_dir.display()))?;
    info!(
        duration_ms = start.elapsed().as_millis() as u64,
        features = summary.feature_names.len(),
        "predictor ready"
    );
    Ok((ChurnPredictor::from_artifacts(&artifacts), summary))
}

fn assess(predictor: &ChurnPredictor, raw: &RawInput) -> Result<PredictionResult> {
    info!(
        gender = redact_value(&raw.gender),
        geography = redact_value(raw.geography.as_str()),
        "scoring customer"
    );
    predictor.assess(raw).context("score customer")
}

pub fn run_predict(artifacts_dir: &Path, args: &PredictArgs) -> Result<()> {
    let span = info_span!("predict");
    let _guard = span.enter();
    let (predictor, _) = load_predictor(artifacts_dir)?;
    let raw = args.to_raw_input();
    let result = assess(&predictor, &raw)?;
    match args.format {
        OutputFormatArg::Text => print_prediction(&raw, &result),
        OutputFormatArg::Json => {
            let output = PredictionOutput {
                input: &raw,
                result: &result,
                verdict: verdict_text(&result),
            };
            let json = serde_json::to_string_pretty(&output).context("serialize prediction")?;
            println!("{json}");
        }
    }
    Ok(())
}

pub fn run_form(artifacts_dir: &Path) -> Result<()> {
    let span = info_span!("form");
    let _guard = span.enter();
    let (predictor, summary) = load_predictor(artifacts_dir)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    let raw = prompt_raw_input(&mut input, &mut output, &summary.classes)?;
    drop(output);
    let result = assess(&predictor, &raw)?;
    print_prediction(&raw, &result);
    Ok(())
}

pub fn run_batch(artifacts_dir: &Path, args: &BatchArgs) -> Result<BatchReport> {
    let span = info_span!("batch_file", input = %args.input.display());
    let _guard = span.enter();
    let (predictor, _) = load_predictor(artifacts_dir)?;
    let reader = File::open(&args.input)
        .with_context(|| format!("open {}", args.input.display()))?;
    match &args.output {
        Some(path) => score_to_path(&predictor, reader, path),
        None => score_csv(&predictor, reader, io::stdout().lock()),
    }
}

pub fn run_artifacts(artifacts_dir: &Path) -> Result<()> {
    let (_, summary) = load_predictor(artifacts_dir)?;
    print_artifacts(&summary);
    Ok(())
}
