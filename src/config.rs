//! Run configuration for a baseline/new comparison.
//!
//! [`CompareConfig`] carries everything one invocation needs: the two input
//! directories, the regression threshold, which benchmark categories to
//! compare and where the reports go.

use std::{fmt, path::PathBuf, str::FromStr};

use crate::{BenchDiffError, bench_meta::RunCategory, compare::DEFAULT_THRESHOLD};

/// Which benchmark categories a run compares.
///
/// # Examples
///
/// ```rust
/// use benchdiff::{BenchmarkSelection, RunCategory};
///
/// let selection: BenchmarkSelection = "both".parse().unwrap();
/// assert_eq!(selection.categories(), vec![RunCategory::Eager, RunCategory::Compile]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BenchmarkSelection {
    Eager,
    Compile,
    /// Eager first, then compile. A failure in either aborts the run.
    #[default]
    Both,
}

impl BenchmarkSelection {
    pub fn categories(&self) -> Vec<RunCategory> {
        match self {
            BenchmarkSelection::Eager => vec![RunCategory::Eager],
            BenchmarkSelection::Compile => vec![RunCategory::Compile],
            BenchmarkSelection::Both => vec![RunCategory::Eager, RunCategory::Compile],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BenchmarkSelection::Eager => "eager",
            BenchmarkSelection::Compile => "compile",
            BenchmarkSelection::Both => "both",
        }
    }
}

impl fmt::Display for BenchmarkSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BenchmarkSelection {
    type Err = BenchDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eager" => Ok(BenchmarkSelection::Eager),
            "compile" => Ok(BenchmarkSelection::Compile),
            "both" => Ok(BenchmarkSelection::Both),
            other => Err(BenchDiffError::invalid_input(format!(
                "benchmark type must be eager, compile or both, got {other}"
            ))),
        }
    }
}

/// Parameters of one comparison run.
///
/// # Default Configuration
///
/// ```rust
/// use benchdiff::{BenchmarkSelection, CompareConfig};
///
/// let config = CompareConfig::default();
/// assert_eq!(config.threshold, 5.0);
/// assert_eq!(config.selection, BenchmarkSelection::Both);
/// assert!(!config.generate_markdown);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CompareConfig {
    /// Directory holding the baseline CSV exports.
    pub baseline_dir: PathBuf,
    /// Directory holding the CSV exports of the run under test.
    pub new_dir: PathBuf,
    /// Percentage a metric must strictly exceed to count as a regression.
    ///
    /// **Default:** `5.0`
    pub threshold: f64,
    pub selection: BenchmarkSelection,
    /// Output file name; a trailing `.csv` is dropped to form the base
    /// that per-category file names are derived from.
    ///
    /// **Default:** `regression_report.csv`
    pub output: String,
    pub generate_markdown: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            baseline_dir: PathBuf::from("baseline"),
            new_dir: PathBuf::from("new"),
            threshold: DEFAULT_THRESHOLD,
            selection: BenchmarkSelection::default(),
            output: String::from("regression_report.csv"),
            generate_markdown: false,
        }
    }
}

impl CompareConfig {
    pub fn validate(&self) -> Result<(), BenchDiffError> {
        if !self.threshold.is_finite() {
            return Err(BenchDiffError::invalid_input(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        if self.output_base().is_empty() {
            return Err(BenchDiffError::invalid_input("output name must not be empty"));
        }
        Ok(())
    }

    pub fn output_base(&self) -> &str {
        self.output.strip_suffix(".csv").unwrap_or(&self.output)
    }

    /// `<base>_<category>.csv`
    pub fn regression_csv(&self, category: RunCategory) -> PathBuf {
        PathBuf::from(format!("{}_{category}.csv", self.output_base()))
    }

    /// `<base>_<category>_full_comparison.csv`
    pub fn full_comparison_csv(&self, category: RunCategory) -> PathBuf {
        PathBuf::from(format!(
            "{}_{category}_full_comparison.csv",
            self.output_base()
        ))
    }

    /// `<base>_summary_report.md`
    pub fn markdown_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_summary_report.md", self.output_base()))
    }
}

/// Threshold as printed in reports: always keeps a decimal, so `5` reads `5.0`.
pub fn threshold_label(threshold: f64) -> String {
    format!("{threshold:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let cfg = CompareConfig::default();
        assert_eq!(cfg.baseline_dir, PathBuf::from("baseline"));
        assert_eq!(cfg.new_dir, PathBuf::from("new"));
        assert_eq!(cfg.threshold, 5.0);
        assert_eq!(cfg.selection, BenchmarkSelection::Both);
        assert_eq!(cfg.output, "regression_report.csv");
        assert!(!cfg.generate_markdown);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_output_paths_follow_base_name() {
        let cfg = CompareConfig {
            output: "out/report.csv".into(),
            ..CompareConfig::default()
        };
        assert_eq!(
            cfg.regression_csv(RunCategory::Eager),
            PathBuf::from("out/report_eager.csv")
        );
        assert_eq!(
            cfg.full_comparison_csv(RunCategory::Compile),
            PathBuf::from("out/report_compile_full_comparison.csv")
        );
        assert_eq!(
            cfg.markdown_path(),
            PathBuf::from("out/report_summary_report.md")
        );
    }

    #[test]
    fn test_output_without_extension() {
        let cfg = CompareConfig {
            output: "nightly".into(),
            ..CompareConfig::default()
        };
        assert_eq!(
            cfg.regression_csv(RunCategory::Compile),
            PathBuf::from("nightly_compile.csv")
        );
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        let cfg = CompareConfig {
            threshold: f64::NAN,
            ..CompareConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(BenchDiffError::InvalidInput(_))));
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(
            "eager".parse::<BenchmarkSelection>().unwrap().categories(),
            vec![RunCategory::Eager]
        );
        assert!("all".parse::<BenchmarkSelection>().is_err());
    }

    #[test]
    fn test_threshold_label_keeps_decimal() {
        assert_eq!(threshold_label(5.0), "5.0");
        assert_eq!(threshold_label(2.5), "2.5");
        assert_eq!(threshold_label(10.0), "10.0");
    }
}
