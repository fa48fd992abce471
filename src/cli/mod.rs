//! Resale Valuation CLI Module
//!
//! Command-line interface for training, one-shot prediction and the
//! interactive price calculator.

use clap::{Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::ValuationError;
use crate::inference::{MarketAnalyzer, Prediction, PredictionHistory, PriceEstimator, PriceMatrix};
use crate::preprocessing::{Attribute, DataCleaner, PropertyAttributes, CATEGORICAL_ATTRIBUTES};
use crate::synthetic::SyntheticHousing;
use crate::training::{TrainEngine, TrainingSummary};
use crate::utils::{save_csv, DataLoader};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn warn(s: &str) -> ColoredString   { s.truecolor(240, 190, 90) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{:<22} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
    let _ = std::io::stdout().flush();
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn wait_enter() {
    println!();
    println!("  {}", dim("press enter to continue"));
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
}

/// Format a price with thousands separators, e.g. `$412,300`
fn money(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 { format!("-${}", grouped) } else { format!("${}", grouped) }
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "resale-valuation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Polynomial regression estimator for housing resale prices")]
#[command(long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Polynomial degree (overrides config)
    #[arg(long, global = true)]
    pub degree: Option<usize>,

    /// Train/test split seed (overrides config)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive price calculator
    Interactive {
        /// Transaction table (CSV, JSON, or Parquet)
        #[arg(short, long, default_value = "sample_data.csv")]
        data: PathBuf,
    },

    /// Train on a table and print the summary
    Train {
        /// Transaction table (CSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Train, then estimate the price of one property
    Predict {
        /// Transaction table (CSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        #[arg(long)]
        region: String,

        #[arg(long)]
        unit_type: String,

        #[arg(long)]
        storey_band: String,

        #[arg(long)]
        build_model: String,

        /// Floor area in square metres
        #[arg(long)]
        floor_area: f64,

        /// Remaining lease in years
        #[arg(long)]
        remaining_lease: f64,
    },

    /// List the valid values of each categorical attribute
    Vocab {
        /// Transaction table (CSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Write a synthetic transaction table as CSV
    Generate {
        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of rows
        #[arg(long, default_value = "500")]
        rows: usize,

        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

/// Resolve the configuration file and command-line overrides
pub fn resolve_config(
    path: Option<&Path>,
    degree: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(p) => AppConfig::load(p)?,
        None => AppConfig::default(),
    };
    if let Some(d) = degree {
        config.training.degree = d;
    }
    if let Some(s) = seed {
        config.training.random_seed = s;
    }
    config.training.validate()?;
    Ok(config)
}

/// Load, clean and train, printing progress
fn train_from_file(data_path: &Path, config: &AppConfig) -> anyhow::Result<PriceEstimator> {
    step_run("Loading data");
    let start = Instant::now();
    let df = DataLoader::new().load(data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    step_run(&format!("Training degree-{} polynomial", config.training.degree));
    let start = Instant::now();
    let cleaner = DataCleaner::new(config.cleaning.clone());
    let mut engine = TrainEngine::new(config.training.clone());
    engine.fit_dataframe(&df, &config.columns, Some(&cleaner))?;
    step_done(&format!("{:?}", start.elapsed()));

    Ok(engine.into_estimator(config.inference.clone())?)
}

fn print_summary(summary: &TrainingSummary) {
    println!();
    line_box_top();
    line_box_center(&"Model Training Summary".white().bold().to_string());
    line_box_sep();
    line_box(&kv("Polynomial degree", &summary.degree.to_string()));
    line_box(&kv("Training samples", &summary.train_sample_count.to_string()));
    line_box(&kv("Testing samples", &summary.test_sample_count.to_string()));
    line_box(&kv("Original features", &summary.raw_feature_count.to_string()));
    line_box(&kv("Polynomial features", &summary.expanded_feature_count.to_string()));
    line_box(&kv("Effective rank", &summary.effective_rank.to_string()));
    line_box_sep();
    line_box(&kv("Training R²", &format!("{:.4}", summary.train_r2)));
    line_box(&kv("Testing R²", &format!("{:.4}", summary.test_r2)));
    line_box(&kv("Accuracy", &format!("{:.2}%", summary.accuracy_percent())));
    line_box(&kv("Test MAE", &money(summary.test_mae)));
    line_box(&kv("Test RMSE", &money(summary.test_rmse)));
    line_box_bottom();
}

fn print_prediction(request: &PropertyAttributes, prediction: &Prediction) {
    println!();
    line_box_top();
    line_box_center(&"Prediction".white().bold().to_string());
    line_box_sep();
    line_box_center(&money(prediction.price).truecolor(120, 170, 255).bold().to_string());
    line_box_sep();
    for &attribute in &CATEGORICAL_ATTRIBUTES {
        line_box(&kv(attribute.label(), request.category(attribute).unwrap_or("-")));
    }
    for attribute in [Attribute::FloorAreaSqm, Attribute::RemainingLease] {
        let value = request.numeric(attribute).map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".into());
        line_box(&kv(attribute.label(), &value));
    }
    line_box_bottom();

    section("Feature scores");
    println!("  {}", dim("raw value × scale, not a breakdown of the price"));
    let max = prediction
        .contributions
        .iter()
        .map(|c| c.score.abs())
        .fold(0.0f64, f64::max);
    for c in &prediction.contributions {
        let width = if max > 0.0 { ((c.score.abs() / max) * 24.0).round() as usize } else { 0 };
        println!(
            "  {:<18} {:>12}  {}",
            muted(&c.feature),
            format!("{:.0}", c.score).white(),
            accent(&"█".repeat(width))
        );
    }
}

fn print_comparables(estimator: &PriceEstimator, request: &PropertyAttributes, price: f64) -> anyhow::Result<()> {
    let analyzer = MarketAnalyzer::new(estimator);
    let comparables = analyzer.comparables(request, price)?;

    section("Similarly priced combinations");
    for c in &comparables {
        let label = format!("{:<20} {:<16}", truncate(&c.region, 20), truncate(&c.unit_type, 16));
        let marker = if c.is_selected { ok("◆") } else { dim("·") };
        println!("  {} {} {}", marker, label, money(c.price).white());
    }

    let matrix = analyzer.price_matrix(request)?;
    print_matrix(&matrix);
    Ok(())
}

fn print_matrix(matrix: &PriceMatrix) {
    section("Price matrix (thousands)");
    let header: String = matrix
        .unit_types
        .iter()
        .map(|u| format!("{:>10}", truncate(u, 9)))
        .collect();
    println!("  {:<16}{}", "", muted(&header));
    for (i, region) in matrix.regions.iter().enumerate() {
        let mut row = String::new();
        for j in 0..matrix.unit_types.len() {
            let cell = format!("{:>10.0}", matrix.prices[[i, j]] / 1000.0);
            if matrix.selected == Some((i, j)) {
                row.push_str(&ok(&cell).to_string());
            } else {
                row.push_str(&cell);
            }
        }
        println!("  {:<16}{}", muted(&truncate(region, 15)), row);
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(data_path: &Path, config: &AppConfig, json: bool) -> anyhow::Result<()> {
    if json {
        let df = DataLoader::new().load(data_path)?;
        let cleaner = DataCleaner::new(config.cleaning.clone());
        let mut engine = TrainEngine::new(config.training.clone());
        engine.fit_dataframe(&df, &config.columns, Some(&cleaner))?;
        let summary = engine.summary().ok_or(ValuationError::ModelNotTrained)?;
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    section("Train");
    let estimator = train_from_file(data_path, config)?;
    print_summary(estimator.summary());
    println!();
    Ok(())
}

pub fn cmd_predict(data_path: &Path, config: &AppConfig, request: PropertyAttributes) -> anyhow::Result<()> {
    section("Predict");
    let estimator = train_from_file(data_path, config)?;
    let prediction = estimator.predict(&request)?;
    print_prediction(&request, &prediction);
    println!();
    Ok(())
}

pub fn cmd_vocab(data_path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    section("Vocabulary");
    let estimator = train_from_file(data_path, config)?;
    for &attribute in &CATEGORICAL_ATTRIBUTES {
        let values = estimator.vocabulary(attribute)?;
        println!();
        println!("  {} {}", attribute.label().white().bold(), dim(&format!("({})", values.len())));
        for value in values {
            println!("    {}", value);
        }
    }
    println!();
    Ok(())
}

pub fn cmd_generate(output: &Path, rows: usize, seed: u64, config: &AppConfig) -> anyhow::Result<()> {
    section("Generate");
    step_run(&format!("Writing {} synthetic rows", rows));
    let mut df = SyntheticHousing::new(seed).with_rows(rows).to_dataframe(&config.columns)?;
    save_csv(&mut df, output)?;
    step_done(&output.display().to_string());
    println!();
    Ok(())
}

fn print_banner() {
    println!();
    println!();
    println!("       {}", "┏━┓┏━╸┏━┓┏━┓╻  ┏━╸   ╻ ╻┏━┓╻  ╻ ╻┏━┓╺┳╸╻┏━┓┏┓╻".truecolor(120, 170, 255));
    println!("       {}", "┣┳┛┣╸ ┗━┓┣━┫┃  ┣╸    ┃┏┛┣━┫┃  ┃ ┃┣━┫ ┃ ┃┃ ┃┃┗┫".truecolor(100, 150, 240));
    println!("       {}", "╹┗╸┗━╸┗━┛╹ ╹┗━╸┗━╸   ┗┛ ╹ ╹┗━╸┗━┛╹ ╹ ╹ ╹┗━┛╹ ╹".truecolor(80, 130, 220));
    println!();
    println!("       {}", dim(&format!("Polynomial price calculator  ·  v{}  ·  rust", env!("CARGO_PKG_VERSION"))));
    println!();
}

fn show_history(history: &PredictionHistory) {
    section("Session history");
    if history.is_empty() {
        println!("  {}", warn("no predictions yet"));
        return;
    }

    println!(
        "  {}",
        muted(&format!("{:<20} {:<16} {:<10} {:>10} {:>14}", "Timestamp", "Region", "Unit", "Area", "Price"))
    );
    for entry in history.entries() {
        let r = &entry.request;
        println!(
            "  {:<20} {:<16} {:<10} {:>10} {:>14}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            truncate(r.region.as_deref().unwrap_or(""), 15),
            truncate(r.unit_type.as_deref().unwrap_or(""), 9),
            r.floor_area_sqm.map(|a| format!("{:.1}", a)).unwrap_or_default(),
            money(entry.price).white(),
        );
    }
}

fn prompt_request(
    estimator: &PriceEstimator,
    theme: &dialoguer::theme::ColorfulTheme,
) -> anyhow::Result<Option<PropertyAttributes>> {
    use dialoguer::{Input, Select};

    let mut request = PropertyAttributes::new();
    for &attribute in &CATEGORICAL_ATTRIBUTES {
        let values = estimator.vocabulary(attribute)?;
        let sel = Select::with_theme(theme)
            .with_prompt(format!("{} ({} available)", attribute.label(), values.len()))
            .items(values)
            .default(0)
            .max_length(12)
            .interact_opt()?;
        match sel {
            Some(i) => request.set_category(attribute, values[i].clone()),
            None => return Ok(None),
        }
    }

    let config = estimator.config();
    let ranges = [
        (Attribute::FloorAreaSqm, config.min_floor_area, config.max_floor_area, "sqm"),
        (Attribute::RemainingLease, config.min_remaining_lease, config.max_remaining_lease, "years"),
    ];
    for (attribute, min, max, unit) in ranges {
        let value: f64 = Input::with_theme(theme)
            .with_prompt(format!("{} ({}-{} {})", attribute.label(), min, max, unit))
            .validate_with(move |v: &f64| -> Result<(), String> {
                if *v >= min && *v <= max {
                    Ok(())
                } else {
                    Err(format!("must be between {} and {}", min, max))
                }
            })
            .interact_text()?;
        request.set_numeric(attribute, value);
    }

    Ok(Some(request))
}

pub fn cmd_interactive(data_path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    use dialoguer::{console::Term, theme::ColorfulTheme, Select};

    print_banner();

    section("Setup");
    let estimator = train_from_file(data_path, config)?;
    print_summary(estimator.summary());
    wait_enter();

    let theme = ColorfulTheme {
        active_item_prefix: dialoguer::console::style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        inactive_item_prefix: dialoguer::console::style("   ".to_string()).for_stderr(),
        inactive_item_style: dialoguer::console::Style::new().for_stderr().color256(245),
        prompt_prefix: dialoguer::console::style("  ?".to_string()).for_stderr().color256(111),
        prompt_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        ..ColorfulTheme::default()
    };

    let term = Term::stdout();
    let mut history = PredictionHistory::new();

    loop {
        let _ = term.clear_screen();
        print_banner();

        let items = &[
            "Calculate Price       estimate a resale price",
            "View History          predictions this session",
            "Exit",
        ];

        let sel = Select::with_theme(&theme)
            .with_prompt("What would you like to do")
            .items(items)
            .default(0)
            .interact_opt()?;

        match sel {
            Some(0) => {
                let _ = term.clear_screen();
                section("Calculate price");
                let Some(request) = prompt_request(&estimator, &theme)? else {
                    continue;
                };
                match estimator.predict(&request) {
                    Ok(prediction) => {
                        print_prediction(&request, &prediction);
                        print_comparables(&estimator, &request, prediction.price)?;
                        history.record(request, prediction.price);
                    }
                    Err(e) if e.is_recoverable() => {
                        println!();
                        println!("  {} {}", warn("!"), e);
                    }
                    Err(e) => return Err(e.into()),
                }
                wait_enter();
            }
            Some(1) => {
                let _ = term.clear_screen();
                show_history(&history);
                wait_enter();
            }
            Some(2) | None => {
                println!();
                println!("  {}", dim("goodbye"));
                println!();
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
