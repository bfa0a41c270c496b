use std::{cmp::Ordering, path::Path};

use log::info;
use serde::Serialize;

use crate::{
    BenchDiffError,
    bench_meta::RunCategory,
    compare::{ComparisonRow, ComparisonTable},
};

pub const TOP_REGRESSIONS: usize = 5;

pub const REGRESSION_COLUMNS: [&str; 12] = [
    "Case Name",
    "Benchmarking Module Name_baseline",
    "Execution Time_baseline",
    "Execution Time_new",
    "execution_time_change_pct",
    "execution_time_regression",
    "Peak Memory (KB)_baseline",
    "Peak Memory (KB)_new",
    "memory_change_pct",
    "memory_regression",
    "source_file_baseline",
    "source_file_new",
];

pub const FULL_COMPARISON_COLUMNS: [&str; 14] = [
    "Case Name",
    "Benchmarking Module Name_baseline",
    "Execution Time_baseline",
    "Peak Memory (KB)_baseline",
    "source_file_baseline",
    "Benchmarking Module Name_new",
    "Execution Time_new",
    "Peak Memory (KB)_new",
    "source_file_new",
    "execution_time_change_pct",
    "memory_change_pct",
    "execution_time_regression",
    "memory_regression",
    "has_regression",
];

/// A row of the regression CSV. Field order is the column order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegressionRecord {
    #[serde(rename = "Case Name")]
    pub case_name: String,
    #[serde(rename = "Benchmarking Module Name_baseline")]
    pub module_name: String,
    #[serde(rename = "Execution Time_baseline")]
    pub execution_time_baseline: f64,
    #[serde(rename = "Execution Time_new")]
    pub execution_time_new: f64,
    pub execution_time_change_pct: f64,
    pub execution_time_regression: bool,
    #[serde(rename = "Peak Memory (KB)_baseline")]
    pub peak_memory_baseline: f64,
    #[serde(rename = "Peak Memory (KB)_new")]
    pub peak_memory_new: f64,
    pub memory_change_pct: f64,
    pub memory_regression: bool,
    pub source_file_baseline: String,
    pub source_file_new: String,
}

impl From<&ComparisonRow> for RegressionRecord {
    fn from(row: &ComparisonRow) -> Self {
        Self {
            case_name: row.baseline.case_name.clone(),
            module_name: row.baseline.module_name.clone(),
            execution_time_baseline: row.baseline.execution_time,
            execution_time_new: row.new.execution_time,
            execution_time_change_pct: row.execution_time_change_pct,
            execution_time_regression: row.execution_time_regression,
            peak_memory_baseline: row.baseline.peak_memory_kb,
            peak_memory_new: row.new.peak_memory_kb,
            memory_change_pct: row.memory_change_pct,
            memory_regression: row.memory_regression,
            source_file_baseline: row.baseline.source_file.clone(),
            source_file_new: row.new.source_file.clone(),
        }
    }
}

#[derive(Serialize)]
struct FullComparisonRecord<'a> {
    #[serde(rename = "Case Name")]
    case_name: &'a str,
    #[serde(rename = "Benchmarking Module Name_baseline")]
    module_name_baseline: &'a str,
    #[serde(rename = "Execution Time_baseline")]
    execution_time_baseline: f64,
    #[serde(rename = "Peak Memory (KB)_baseline")]
    peak_memory_baseline: f64,
    source_file_baseline: &'a str,
    #[serde(rename = "Benchmarking Module Name_new")]
    module_name_new: &'a str,
    #[serde(rename = "Execution Time_new")]
    execution_time_new: f64,
    #[serde(rename = "Peak Memory (KB)_new")]
    peak_memory_new: f64,
    source_file_new: &'a str,
    execution_time_change_pct: f64,
    memory_change_pct: f64,
    execution_time_regression: bool,
    memory_regression: bool,
    has_regression: bool,
}

impl<'a> From<&'a ComparisonRow> for FullComparisonRecord<'a> {
    fn from(row: &'a ComparisonRow) -> Self {
        Self {
            case_name: &row.baseline.case_name,
            module_name_baseline: &row.baseline.module_name,
            execution_time_baseline: row.baseline.execution_time,
            peak_memory_baseline: row.baseline.peak_memory_kb,
            source_file_baseline: &row.baseline.source_file,
            module_name_new: &row.new.module_name,
            execution_time_new: row.new.execution_time,
            peak_memory_new: row.new.peak_memory_kb,
            source_file_new: &row.new.source_file,
            execution_time_change_pct: row.execution_time_change_pct,
            memory_change_pct: row.memory_change_pct,
            execution_time_regression: row.execution_time_regression,
            memory_regression: row.memory_regression,
            has_regression: row.has_regression,
        }
    }
}

/// Aggregate counters over the regression rows of one comparison.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RegressionStats {
    pub total_regressions: usize,
    pub execution_regressions: usize,
    pub memory_regressions: usize,
    pub max_exec_time_regression: f64,
    pub max_memory_regression: f64,
    #[serde(skip)]
    pub records: Vec<RegressionRecord>,
}

impl RegressionStats {
    /// `records` must already be sorted by severity.
    pub fn from_records(records: Vec<RegressionRecord>) -> Self {
        let time: Vec<f64> = records
            .iter()
            .filter(|r| r.execution_time_regression)
            .map(|r| r.execution_time_change_pct)
            .collect();
        let memory: Vec<f64> = records
            .iter()
            .filter(|r| r.memory_regression)
            .map(|r| r.memory_change_pct)
            .collect();
        Self {
            total_regressions: records.len(),
            execution_regressions: time.len(),
            memory_regressions: memory.len(),
            max_exec_time_regression: worst(&time),
            max_memory_regression: worst(&memory),
            records,
        }
    }

    pub fn case_names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.case_name.clone()).collect()
    }

    pub fn top(&self, limit: usize) -> Vec<TopRegression> {
        self.records
            .iter()
            .take(limit)
            .map(|r| TopRegression {
                case_name: r.case_name.clone(),
                execution_time_change_pct: r.execution_time_change_pct,
            })
            .collect()
    }
}

fn worst(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportOutcome {
    NoRegressions,
    Regressions(RegressionStats),
}

impl ReportOutcome {
    pub fn stats(&self) -> Option<&RegressionStats> {
        match self {
            ReportOutcome::NoRegressions => None,
            ReportOutcome::Regressions(stats) => Some(stats),
        }
    }
}

/// Writes the sorted regression rows of `table` to `output_path`.
///
/// Nothing is written when the table has no regressions.
pub fn regression_report<P: AsRef<Path>>(
    table: &ComparisonTable,
    output_path: P,
    threshold: f64,
) -> Result<ReportOutcome, BenchDiffError> {
    let mut records: Vec<RegressionRecord> =
        table.regressions().map(RegressionRecord::from).collect();
    if records.is_empty() {
        info!("no regressions found above {threshold}%");
        return Ok(ReportOutcome::NoRegressions);
    }
    info!(
        "found {} benchmarks with regressions > {threshold}%",
        records.len()
    );

    // stable: equal severities keep join order
    records.sort_by(|a, b| by_severity(a.execution_time_change_pct, b.execution_time_change_pct));
    write_records(output_path.as_ref(), &records, &REGRESSION_COLUMNS)?;
    info!("regression report saved to {}", output_path.as_ref().display());

    let stats = RegressionStats::from_records(records);
    info!(
        "execution time regressions={} memory regressions={}",
        stats.execution_regressions, stats.memory_regressions
    );
    Ok(ReportOutcome::Regressions(stats))
}

/// Writes every joined row of `table`, returning the row count.
pub fn write_full_comparison<P: AsRef<Path>>(
    table: &ComparisonTable,
    path: P,
) -> Result<usize, BenchDiffError> {
    let records: Vec<FullComparisonRecord<'_>> =
        table.rows.iter().map(FullComparisonRecord::from).collect();
    write_records(path.as_ref(), &records, &FULL_COMPARISON_COLUMNS)?;
    info!("full comparison saved to {}", path.as_ref().display());
    Ok(records.len())
}

/// Descending order with NaN last.
fn by_severity(a: f64, b: f64) -> Ordering {
    let key = |v: f64| if v.is_nan() { f64::NEG_INFINITY } else { v };
    key(b).total_cmp(&key(a))
}

fn write_records<T: Serialize>(
    path: &Path,
    records: &[T],
    columns: &[&str],
) -> Result<(), BenchDiffError> {
    let io_err = |e: csv::Error| BenchDiffError::io(format!("{}: {e}", path.display()));
    let mut writer = csv::Writer::from_path(path).map_err(io_err)?;
    if records.is_empty() {
        writer.write_record(columns).map_err(io_err)?;
    }
    for record in records {
        writer.serialize(record).map_err(io_err)?;
    }
    writer
        .flush()
        .map_err(|e| BenchDiffError::io(format!("{}: {e}", path.display())))
}

/// One line of a top-N listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopRegression {
    pub case_name: String,
    pub execution_time_change_pct: f64,
}

/// Presentation input for one category, detached from the comparison rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Option<RunCategory>,
    pub total_matching: usize,
    pub total_regressions: usize,
    pub execution_regressions: usize,
    pub memory_regressions: usize,
    pub max_exec_time_regression: f64,
    pub max_memory_regression: f64,
    pub top_regressions: Vec<TopRegression>,
    pub case_names: Vec<String>,
    pub files: Vec<String>,
}

impl CategorySummary {
    pub fn new(category: Option<RunCategory>, total_matching: usize, outcome: &ReportOutcome) -> Self {
        let mut summary = Self {
            category,
            total_matching,
            ..Self::default()
        };
        if let Some(stats) = outcome.stats() {
            summary.total_regressions = stats.total_regressions;
            summary.execution_regressions = stats.execution_regressions;
            summary.memory_regressions = stats.memory_regressions;
            summary.max_exec_time_regression = stats.max_exec_time_regression;
            summary.max_memory_regression = stats.max_memory_regression;
            summary.top_regressions = stats.top(TOP_REGRESSIONS);
            summary.case_names = stats.case_names();
        }
        summary
    }

    pub fn regression_rate(&self) -> f64 {
        rate(self.total_regressions, self.total_matching)
    }
}

/// `part / whole * 100`, or 0 for an empty denominator.
pub fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
