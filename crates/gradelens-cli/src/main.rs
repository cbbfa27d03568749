//! Gradelens CLI - Student performance insights
//!
//! Usage:
//!   gradelens init                      Initialize database
//!   gradelens predict S1001             Predict next scores per subject
//!   gradelens risk --threshold 55       List students at risk
//!   gradelens check-grade S1001 MATH 95 Check a proposed score

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Output;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let output = if cli.json { Output::Json } else { Output::Table };

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Analysis(analysis) => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let engine = gradelens_core::InsightEngine::with_config(&db, config);

            match analysis {
                Analysis::Predict { student } => commands::cmd_predict(&engine, &student, output),
                Analysis::Risk { threshold, class } => {
                    commands::cmd_risk(&engine, threshold, class.as_deref(), output)
                }
                Analysis::Recommend { student } => {
                    commands::cmd_recommend(&engine, &student, output)
                }
                Analysis::Anomalies => commands::cmd_anomalies(&engine, output),
                Analysis::Compare { student } => commands::cmd_compare(&engine, &student, output),
                Analysis::FinalGrade { student, subject } => {
                    commands::cmd_final_grade(&engine, &student, &subject, output)
                }
                Analysis::CheckGrade {
                    student,
                    subject,
                    score,
                } => commands::cmd_check_grade(&engine, &student, &subject, score, output),
                Analysis::Class { class } => commands::cmd_class(&engine, &class, output),
            }
        }
    }
}
