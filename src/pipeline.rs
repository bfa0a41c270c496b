use std::{iter, path::PathBuf};

use log::info;
use serde::Serialize;

use crate::{
    BenchDiffError,
    bench_meta::RunCategory,
    cases::unique_cases,
    compare::{CaseOverlap, compare_benchmarks},
    config::{CompareConfig, threshold_label},
    markdown::markdown_summary,
    report::{
        CategorySummary, RegressionStats, ReportOutcome, regression_report,
        write_full_comparison,
    },
};

/// Outcome of comparing one benchmark category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryRun {
    pub category: RunCategory,
    pub baseline_entries: usize,
    pub new_entries: usize,
    pub overlap: CaseOverlap,
    pub matching: usize,
    pub regressions: Option<RegressionStats>,
    pub unique_cases: Vec<String>,
    pub regression_report: Option<PathBuf>,
    pub full_comparison: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub threshold: f64,
    pub categories: Vec<CategoryRun>,
    pub combined_unique_cases: Vec<String>,
    pub markdown: Option<PathBuf>,
}

impl RunSummary {
    pub fn category(&self, category: RunCategory) -> Option<&CategoryRun> {
        self.categories.iter().find(|run| run.category == category)
    }

    pub fn total_regressions(&self) -> usize {
        self.categories
            .iter()
            .filter_map(|run| run.regressions.as_ref())
            .map(|stats| stats.total_regressions)
            .sum()
    }

    /// Human-readable report of the run, one block per category.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for run in &self.categories {
            out.push_str(&format!(
                "=== {} BENCHMARKS ===\n",
                run.category.as_str().to_uppercase()
            ));
            out.push_str(&format!(
                "baseline entries: {}  new entries: {}\n",
                run.baseline_entries, run.new_entries
            ));
            let overlap = &run.overlap;
            out.push_str(&format!(
                "unique cases: baseline={} new={} common={} only_baseline={} only_new={}\n",
                overlap.baseline_cases,
                overlap.new_cases,
                overlap.common_cases,
                overlap.only_in_baseline,
                overlap.only_in_new
            ));
            out.push_str(&format!("matching benchmarks: {}\n", run.matching));
            match &run.regressions {
                None => out.push_str("No regressions found!\n"),
                Some(stats) => {
                    out.push_str(&format!(
                        "Found {} benchmarks with regressions > {}%\n",
                        stats.total_regressions,
                        threshold_label(self.threshold)
                    ));
                    out.push_str(&format!(
                        "- Execution time regressions: {}\n",
                        stats.execution_regressions
                    ));
                    out.push_str(&format!(
                        "- Memory regressions: {}\n",
                        stats.memory_regressions
                    ));
                    if stats.execution_regressions > 0 {
                        out.push_str(&format!(
                            "- Worst execution time regression: {:.2}%\n",
                            stats.max_exec_time_regression
                        ));
                    }
                    if stats.memory_regressions > 0 {
                        out.push_str(&format!(
                            "- Worst memory regression: {:.2}%\n",
                            stats.max_memory_regression
                        ));
                    }
                }
            }
            if let Some(path) = &run.regression_report {
                out.push_str(&format!("regression report: {}\n", path.display()));
            }
            out.push_str(&format!(
                "full comparison: {}\n\n",
                run.full_comparison.display()
            ));
        }

        out.push_str("UNIQUE CASES SUMMARY\n");
        for run in &self.categories {
            out.push_str(&format!(
                "{} Benchmark Unique Cases ({} unique):\n",
                run.category.title(),
                run.unique_cases.len()
            ));
            for case in &run.unique_cases {
                out.push_str(&format!("  {case}\n"));
            }
        }
        if self.categories.len() > 1 {
            out.push_str(&format!(
                "All Unique Cases Combined ({} unique):\n",
                self.combined_unique_cases.len()
            ));
            for case in &self.combined_unique_cases {
                out.push_str(&format!("  {case}\n"));
            }
        }
        if let Some(path) = &self.markdown {
            out.push_str(&format!("markdown report: {}\n", path.display()));
        }
        out
    }
}

/// Runs every selected category in order, writing its reports.
///
/// Fails fast: an error in any category aborts the whole run.
pub fn run(config: &CompareConfig) -> Result<RunSummary, BenchDiffError> {
    config.validate()?;
    let mut categories = Vec::new();
    let mut summaries = Vec::new();

    for category in config.selection.categories() {
        info!("comparing {category} benchmarks");
        let table = compare_benchmarks(
            &config.baseline_dir,
            &config.new_dir,
            config.threshold,
            Some(category),
        )?;

        let report_path = config.regression_csv(category);
        let outcome = regression_report(&table, &report_path, config.threshold)?;
        let full_path = config.full_comparison_csv(category);
        write_full_comparison(&table, &full_path)?;

        let written_report = match outcome {
            ReportOutcome::NoRegressions => None,
            ReportOutcome::Regressions(_) => Some(report_path),
        };
        let mut summary = CategorySummary::new(Some(category), table.len(), &outcome);
        summary.files = written_report
            .iter()
            .chain(iter::once(&full_path))
            .map(|path| path.display().to_string())
            .collect();

        categories.push(CategoryRun {
            category,
            baseline_entries: table.baseline_entries,
            new_entries: table.new_entries,
            overlap: table.overlap.clone(),
            matching: table.len(),
            unique_cases: unique_cases(&summary.case_names),
            regressions: outcome.stats().cloned(),
            regression_report: written_report,
            full_comparison: full_path,
        });
        summaries.push(summary);
    }

    let markdown = if config.generate_markdown {
        let pick = |category: RunCategory| {
            summaries
                .iter()
                .find(|summary| summary.category == Some(category))
                .cloned()
                .unwrap_or_default()
        };
        let path = config.markdown_path();
        markdown_summary(
            &pick(RunCategory::Eager),
            &pick(RunCategory::Compile),
            config.threshold,
            &path,
        )?;
        Some(path)
    } else {
        None
    };

    let combined_unique_cases =
        unique_cases(summaries.iter().flat_map(|summary| summary.case_names.iter()));
    Ok(RunSummary {
        threshold: config.threshold,
        categories,
        combined_unique_cases,
        markdown,
    })
}
