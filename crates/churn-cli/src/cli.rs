//! CLI argument definitions for the churn predictor.

use std::path::PathBuf;

use churn_model::{Geography, RawInput, YesNo};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "churn-predictor",
    version,
    about = "Customer churn predictor - score bank customers with a fitted model",
    long_about = "Score bank customers with a fitted churn model.\n\n\
                  Loads the classifier, feature scaler and gender encoder from an\n\
                  artifacts directory and reports the churn probability and decision."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow customer attribute values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Directory holding churn_model.json, scaler.json and label_encoder.json.
    #[arg(
        long = "artifacts-dir",
        value_name = "DIR",
        default_value = ".",
        global = true
    )]
    pub artifacts_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score one customer given on the command line.
    Predict(PredictArgs),

    /// Enter one customer interactively and score it.
    Form,

    /// Score every row of a CSV file.
    Batch(BatchArgs),

    /// Verify the artifacts and describe what they contain.
    Artifacts,
}

#[derive(Parser)]
pub struct PredictArgs {
    /// Credit score (300-900).
    #[arg(
        long = "credit-score",
        default_value_t = 600,
        value_parser = clap::value_parser!(u32).range(300..=900)
    )]
    pub credit_score: u32,

    /// Age in years (18-100).
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u32).range(18..=100))]
    pub age: u32,

    /// Years as a customer (0-10).
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=10))]
    pub tenure: u32,

    /// Account balance (0-300000).
    #[arg(long, default_value_t = 60_000.0)]
    pub balance: f64,

    /// Number of bank products held (1-4).
    #[arg(
        long = "products",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=4)
    )]
    pub num_of_products: u32,

    /// Has a credit card (Yes/No).
    #[arg(long = "has-card", default_value = "Yes")]
    pub has_cr_card: YesNo,

    /// Is an active member (Yes/No).
    #[arg(long = "active", default_value = "Yes")]
    pub is_active_member: YesNo,

    /// Estimated salary (0-200000).
    #[arg(long = "salary", default_value_t = 50_000.0)]
    pub estimated_salary: f64,

    /// Gender, as known to the fitted encoder.
    #[arg(long, default_value = "Female")]
    pub gender: String,

    /// Country (France, Germany, Spain).
    #[arg(long, default_value = "France")]
    pub geography: Geography,

    /// How to print the result.
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormatArg,
}

impl PredictArgs {
    pub fn to_raw_input(&self) -> RawInput {
        RawInput {
            credit_score: self.credit_score,
            age: self.age,
            tenure: self.tenure,
            balance: self.balance,
            num_of_products: self.num_of_products,
            has_cr_card: self.has_cr_card,
            is_active_member: self.is_active_member,
            estimated_salary: self.estimated_salary,
            gender: self.gender.clone(),
            geography: self.geography,
        }
    }
}

#[derive(Parser)]
pub struct BatchArgs {
    /// CSV file with one customer per row, using the dataset's column names.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Write scored rows here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Text,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
