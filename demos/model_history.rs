//! Model History Example
//!
//! Compares a few baseline regressors on a synthetic housing-price dataset
//! and prints the resulting leaderboard.
//!
//! Run with: RUST_LOG=model_history=debug cargo run --example model_history

use anyhow::Context;
use model_history::estimator::{LinearRegression, MeanRegressor};
use model_history::model_selection::Metric;
use model_history::{ReportOptions, RunTracker};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Model History ===\n");

    // Square footage and age -> price in thousands
    let x: Vec<Vec<f64>> = (0..60)
        .map(|i| {
            let sqft = 800.0 + 35.0 * f64::from(i);
            let age = f64::from((i * 7) % 40);
            vec![sqft, age]
        })
        .collect();
    let y: Vec<f64> = x
        .iter()
        .map(|row| 0.12f64.mul_add(row[0], -1.5 * row[1]) + 40.0)
        .collect();

    let mut tracker = RunTracker::builder(Metric::NegMeanAbsoluteError)
        .score_column("neg_mae")
        .build();

    tracker
        .report(&MeanRegressor::new(), &x, &y, "mean")
        .context("mean baseline failed")?;
    tracker
        .report_with(
            &LinearRegression::new(0),
            &x,
            &y,
            "ols-sqft",
            ReportOptions::new().notes("square footage only"),
        )
        .context("sqft regression failed")?;
    tracker
        .report_with(
            &LinearRegression::new(1),
            &x,
            &y,
            "ols-age",
            ReportOptions::new().notes("age only").cv(10),
        )
        .context("age regression failed")?;

    println!("\n{}\n", tracker.history());

    if let Some(best) = tracker.history().best() {
        let (name, error) = (best.name().to_string(), -best.score());
        tracker.print_accuracy(&name, error)?;
    }

    let batch = tracker.history().to_record_batch()?;
    println!(
        "\nArrow export: {} rows x {} columns",
        batch.num_rows(),
        batch.num_columns()
    );

    println!("\n{}", tracker.history().to_markdown());
    Ok(())
}
