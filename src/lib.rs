//! Benchmark regression comparison between two runs.
//!
//! benchdiff loads CSV exports of an operator benchmark suite from a baseline
//! directory and a new directory, joins them by case name and reports every
//! case whose execution time or peak memory grew past a threshold.
//!
//! # Pipeline
//!
//! - [`loader`] reads `*.csv` files, optionally only eager or only compile runs
//! - [`compare`] joins both tables and computes percentage changes
//! - [`report`] writes the regression and full comparison CSVs
//! - [`markdown`] renders a two-category summary from aggregate statistics
//! - [`pipeline::run`] drives all of the above from a [`CompareConfig`]
//!
//! ```rust,no_run
//! use benchdiff::{CompareConfig, pipeline};
//!
//! let config = CompareConfig {
//!     baseline_dir: "runs/v1".into(),
//!     new_dir: "runs/v2".into(),
//!     ..CompareConfig::default()
//! };
//! let summary = pipeline::run(&config)?;
//! println!("{}", summary.render_text());
//! # Ok::<(), benchdiff::BenchDiffError>(())
//! ```

pub mod bench_meta;
pub mod bench_utils; // Public for benches
pub mod cases;
pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod loader;
pub mod markdown;
pub mod pipeline;
pub mod report;

pub use bench_meta::{BenchRow, BenchTable, RunCategory};
pub use cases::{normalize_case_name, unique_cases};
pub use compare::{ComparisonRow, ComparisonTable, compare_benchmarks, join_tables, percent_change};
pub use config::{BenchmarkSelection, CompareConfig};
pub use errors::BenchDiffError;
pub use loader::load;
pub use markdown::markdown_summary;
pub use pipeline::{RunSummary, run};
pub use report::{
    CategorySummary, RegressionStats, ReportOutcome, regression_report, write_full_comparison,
};
