use std::{fmt, str::FromStr};

use ahash::AHashSet;
use serde::{Deserialize, Deserializer, Serialize};

use crate::BenchDiffError;

pub const CASE_NAME_COLUMN: &str = "Case Name";
pub const MODULE_NAME_COLUMN: &str = "Benchmarking Module Name";
pub const EXECUTION_TIME_COLUMN: &str = "Execution Time";
pub const PEAK_MEMORY_COLUMN: &str = "Peak Memory (KB)";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    CASE_NAME_COLUMN,
    MODULE_NAME_COLUMN,
    EXECUTION_TIME_COLUMN,
    PEAK_MEMORY_COLUMN,
];

/// File names containing this marker hold compile benchmarks.
pub const COMPILE_MARKER: &str = "_compile";

/// One measured benchmark case as exported by the benchmark harness.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BenchRow {
    #[serde(rename = "Case Name")]
    pub case_name: String,
    #[serde(rename = "Benchmarking Module Name")]
    pub module_name: String,
    #[serde(rename = "Execution Time", deserialize_with = "blank_as_nan")]
    pub execution_time: f64,
    #[serde(rename = "Peak Memory (KB)", deserialize_with = "blank_as_nan")]
    pub peak_memory_kb: f64,
    #[serde(skip)]
    pub source_file: String,
}

/// Empty metric cells load as NaN; the row is kept but never counts as a regression.
fn blank_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Rows loaded from one directory, in file discovery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BenchTable {
    rows: Vec<BenchRow>,
}

impl BenchTable {
    pub fn new(rows: Vec<BenchRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[BenchRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenchRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn append(&mut self, other: BenchTable) {
        self.rows.extend(other.rows);
    }

    pub fn case_names(&self) -> AHashSet<&str> {
        self.rows.iter().map(|row| row.case_name.as_str()).collect()
    }
}

impl From<Vec<BenchRow>> for BenchTable {
    fn from(rows: Vec<BenchRow>) -> Self {
        Self::new(rows)
    }
}

/// Benchmark run category, decided purely by file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunCategory {
    Eager,
    Compile,
}

impl RunCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunCategory::Eager => "eager",
            RunCategory::Compile => "compile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RunCategory::Eager => "Eager",
            RunCategory::Compile => "Compile",
        }
    }

    pub fn includes(&self, file_name: &str) -> bool {
        let compiled = file_name.contains(COMPILE_MARKER);
        match self {
            RunCategory::Eager => !compiled,
            RunCategory::Compile => compiled,
        }
    }
}

impl fmt::Display for RunCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunCategory {
    type Err = BenchDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eager" => Ok(RunCategory::Eager),
            "compile" => Ok(RunCategory::Compile),
            other => Err(BenchDiffError::invalid_input(format!(
                "unknown benchmark category {other}"
            ))),
        }
    }
}
