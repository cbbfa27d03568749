//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gradelens - Insights from approved assessment results
#[derive(Parser)]
#[command(name = "gradelens")]
#[command(about = "Student performance insights over approved assessment records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "gradelens.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set GRADELENS_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Insight threshold config (TOML)
    ///
    /// Defaults to ~/.local/share/gradelens/config/insights.toml when present,
    /// otherwise the built-in thresholds.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print reports as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (encryption, record counts)
    Status,

    #[command(flatten)]
    Analysis(Analysis),
}

/// Subcommands that run one insight engine analysis
#[derive(Subcommand)]
pub enum Analysis {
    /// Predict the next score in each subject for a student
    Predict {
        /// Student ID
        student: String,
    },

    /// List students at risk of failing
    Risk {
        /// Failing score threshold (defaults to the configured value, 60)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Only include students in this class
        #[arg(short, long)]
        class: Option<String>,
    },

    /// Study recommendations for a student, most urgent first
    Recommend {
        /// Student ID
        student: String,
    },

    /// Scan all approved results for sudden jumps and repeated perfect scores
    Anomalies,

    /// Compare a student with their class and everyone, per subject
    Compare {
        /// Student ID
        student: String,
    },

    /// Predict a student's final grade in a subject
    FinalGrade {
        /// Student ID
        student: String,

        /// Subject code
        subject: String,
    },

    /// Check whether a proposed score is typical for the student
    CheckGrade {
        /// Student ID
        student: String,

        /// Subject code
        subject: String,

        /// Proposed score (0-100)
        score: f64,
    },

    /// Summarize a class: averages, top performers, pass rate
    Class {
        /// Class label (e.g. JSS2A)
        class: String,
    },
}
