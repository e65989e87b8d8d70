use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use churn_artifacts::LoadSummary;
use churn_model::{Decision, PredictionResult, RawInput, format_percent};

use crate::batch::BatchReport;

/// The two-line verdict shown under every prediction.
pub fn verdict_text(result: &PredictionResult) -> String {
    let probability = format_percent(result.headline_probability());
    match result.decision() {
        Decision::Churn => format!("{}\nChurn Probability: {probability}", result.decision().label()),
        Decision::Stay => format!("{}\nStay Probability: {probability}", result.decision().label()),
    }
}

pub fn print_prediction(raw: &RawInput, result: &PredictionResult) {
    println!("{}", prediction_table(raw, result));
    println!("{}", verdict_text(result));
}

pub fn prediction_table(raw: &RawInput, result: &PredictionResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows: [(&str, String); 10] = [
        ("Credit Score", raw.credit_score.to_string()),
        ("Geography", raw.geography.to_string()),
        ("Gender", raw.gender.clone()),
        ("Age", raw.age.to_string()),
        ("Tenure", raw.tenure.to_string()),
        ("Balance", format!("{:.2}", raw.balance)),
        ("Number of Products", raw.num_of_products.to_string()),
        ("Has Credit Card", raw.has_cr_card.to_string()),
        ("Is Active Member", raw.is_active_member.to_string()),
        ("Estimated Salary", format!("{:.2}", raw.estimated_salary)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table.add_row(vec![
        label_cell("Churn Probability"),
        Cell::new(format_percent(result.churn_probability())).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        label_cell("Stay Probability"),
        Cell::new(format_percent(result.stay_probability())).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![label_cell("Decision"), decision_cell(result.decision())]);
    table
}

pub fn print_batch_summary(report: &BatchReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Churn"),
        header_cell("Stay"),
        header_cell("Failed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.total()).add_attribute(Attribute::Bold),
        count_cell(report.churn, Color::Red),
        count_cell(report.stay, Color::Green),
        count_cell(report.failures.len(), Color::Yellow),
    ]);
    eprintln!("{table}");
    if report.has_failures() {
        eprintln!("Errors:");
        for failure in &report.failures {
            eprintln!("- row {}: {}", failure.index, failure.message);
        }
    }
}

pub fn print_artifacts(summary: &LoadSummary) {
    println!("Artifacts: {}", summary.artifacts_dir.display());
    if let Some(path) = &summary.manifest {
        println!("Manifest: {}", path.display());
    }

    println!("{}", artifact_files_table(summary));

    let mut features = Table::new();
    features.set_header(vec![header_cell("#"), header_cell("Feature")]);
    apply_table_style(&mut features);
    align_column(&mut features, 0, CellAlignment::Right);
    for (index, name) in summary.feature_names.iter().enumerate() {
        features.add_row(vec![dim_cell(index), Cell::new(name)]);
    }
    println!("{features}");
    println!("Gender classes: {}", summary.classes.join(", "));

    let mut layers = Table::new();
    layers.set_header(vec![
        header_cell("Layer"),
        header_cell("Inputs"),
        header_cell("Units"),
        header_cell("Activation"),
    ]);
    apply_table_style(&mut layers);
    for index in 0..3 {
        align_column(&mut layers, index, CellAlignment::Right);
    }
    for (index, layer) in summary.layers.iter().enumerate() {
        layers.add_row(vec![
            dim_cell(index + 1),
            Cell::new(layer.inputs),
            Cell::new(layer.units),
            Cell::new(&layer.activation),
        ]);
    }
    println!("{layers}");
}

/// One row per artifact file: role, location, digest, pin state and manifest notes.
pub fn artifact_files_table(summary: &LoadSummary) -> Table {
    let mut files = Table::new();
    files.set_header(vec![
        header_cell("Role"),
        header_cell("Path"),
        header_cell("SHA-256"),
        header_cell("Pinned"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut files);
    align_column(&mut files, 3, CellAlignment::Center);
    for file in &summary.files {
        files.add_row(vec![
            Cell::new(file.role.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(file.path.display()),
            dim_cell(&file.sha256),
            if file.verified {
                Cell::new("✓").fg(Color::Green)
            } else {
                dim_cell("-")
            },
            match &file.notes {
                Some(notes) => Cell::new(notes),
                None => dim_cell("-"),
            },
        ]);
    }
    files
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn decision_cell(decision: Decision) -> Cell {
    let color = match decision {
        Decision::Churn => Color::Red,
        Decision::Stay => Color::Green,
    };
    Cell::new(decision.label())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
