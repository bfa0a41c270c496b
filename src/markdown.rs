//! Markdown rendering of a two-category regression run.
//!
//! Works only from [`CategorySummary`] values so the text can be tested
//! without building comparison tables.

use std::{fs, path::Path};

use log::info;

use crate::{
    BenchDiffError,
    cases::unique_cases,
    config::threshold_label,
    report::{CategorySummary, TopRegression, rate},
};

/// Renders the summary, writes it to `output_path` and returns the text.
pub fn markdown_summary<P: AsRef<Path>>(
    eager: &CategorySummary,
    compile: &CategorySummary,
    threshold: f64,
    output_path: P,
) -> Result<String, BenchDiffError> {
    let path = output_path.as_ref();
    let content = render_markdown(eager, compile, threshold);
    fs::write(path, &content)
        .map_err(|e| BenchDiffError::io(format!("{}: {e}", path.display())))?;
    info!("markdown report saved to {}", path.display());
    Ok(content)
}

pub fn render_markdown(eager: &CategorySummary, compile: &CategorySummary, threshold: f64) -> String {
    let threshold = threshold_label(threshold);
    let total_matching = eager.total_matching + compile.total_matching;
    let total_regressions = eager.total_regressions + compile.total_regressions;

    let eager_unique = unique_cases(&eager.case_names);
    let compile_unique = unique_cases(&compile.case_names);
    let all_unique = unique_cases(eager.case_names.iter().chain(&compile.case_names));

    let mut out = String::new();
    out.push_str("# Benchmark Regression Analysis: Baseline vs New\n\n");
    out.push_str("## Executive Summary\n\n");
    out.push_str(&format!(
        "This report compares operator microbenchmarks between a baseline and a new run \
         and lists benchmarks whose execution time or peak memory grew by more than {threshold}%.\n\n"
    ));

    out.push_str("## Key Findings\n\n### Overall Statistics\n");
    out.push_str(&format!(
        "- **Total matching benchmarks**: {} ({} eager + {} compile)\n",
        group_thousands(total_matching),
        group_thousands(eager.total_matching),
        group_thousands(compile.total_matching)
    ));
    out.push_str(&format!(
        "- **Total regressions found**: {} ({} eager + {} compile)\n",
        group_thousands(total_regressions),
        group_thousands(eager.total_regressions),
        group_thousands(compile.total_regressions)
    ));
    out.push_str(&format!(
        "- **Regression rate**: {:.1}% of benchmarks show performance degradation > {threshold}%\n\n",
        rate(total_regressions, total_matching)
    ));

    write_category_section(&mut out, "Eager Benchmarks (Non-Compile)", eager);
    write_category_section(&mut out, "Compile Benchmarks", compile);

    out.push_str("## Top Performance Regressions\n\n");
    out.push_str("### Eager Benchmarks - Top 5 Execution Time Regressions\n");
    write_top_list(&mut out, &eager.top_regressions);
    out.push_str("\n### Compile Benchmarks - Top 5 Execution Time Regressions\n");
    write_top_list(&mut out, &compile.top_regressions);

    out.push_str("\n## Memory Usage\n\n");
    out.push_str(&format!(
        "- {} total memory regressions across both benchmark types\n",
        group_thousands(eager.memory_regressions + compile.memory_regressions)
    ));
    out.push_str(&format!(
        "- Worst memory regression: {:.2}% eager, {:.2}% compile\n\n",
        eager.max_memory_regression, compile.max_memory_regression
    ));

    out.push_str("## Files Generated\n\n");
    let files: Vec<&String> = eager.files.iter().chain(&compile.files).collect();
    if files.is_empty() {
        out.push_str("No report files were written.\n");
    }
    for file in files {
        out.push_str(&format!("- `{file}`\n"));
    }

    out.push_str("\n## Methodology\n\n");
    out.push_str("- Compared execution time and peak memory usage between baseline and new runs\n");
    out.push_str(&format!(
        "- Identified regressions where a metric grew by more than {threshold}%\n"
    ));
    out.push_str("- Separated eager and compile benchmarks so each is compared with its own kind\n");
    out.push_str("- Percentage change: ((new_value - old_value) / old_value) * 100\n\n");

    out.push_str("## Unique Cases Summary\n\n");
    out.push_str(
        "Benchmark cases with regressions, with dtype, backward-pass and transpose suffixes removed.\n\n",
    );
    write_case_group(&mut out, "Eager Benchmark Unique Cases", &eager_unique);
    out.push('\n');
    write_case_group(&mut out, "Compile Benchmark Unique Cases", &compile_unique);
    out.push('\n');
    write_case_group(&mut out, "All Unique Cases Combined", &all_unique);

    out.push_str("\n## Next Steps\n\n");
    out.push_str("1. Investigate the most severe regressions (>50% performance degradation)\n");
    out.push_str("2. Analyze patterns in backward pass operations\n");
    out.push_str("3. Review compile benchmark performance issues\n");
    out.push_str(&format!(
        "4. Focus optimization efforts on the {} unique cases identified above\n",
        all_unique.len()
    ));
    out
}

fn write_category_section(out: &mut String, title: &str, summary: &CategorySummary) {
    out.push_str(&format!("### {title}\n"));
    out.push_str(&format!(
        "- **Matching benchmarks**: {}\n",
        group_thousands(summary.total_matching)
    ));
    out.push_str(&format!(
        "- **Regressions found**: {} ({:.1}% regression rate)\n",
        group_thousands(summary.total_regressions),
        summary.regression_rate()
    ));
    out.push_str(&format!(
        "- **Execution time regressions**: {}\n",
        group_thousands(summary.execution_regressions)
    ));
    out.push_str(&format!(
        "- **Memory regressions**: {}\n",
        group_thousands(summary.memory_regressions)
    ));
    out.push_str(&format!(
        "- **Worst execution time regression**: {:.2}%\n",
        summary.max_exec_time_regression
    ));
    out.push_str(&format!(
        "- **Worst memory regression**: {:.2}%\n\n",
        summary.max_memory_regression
    ));
}

fn write_top_list(out: &mut String, top: &[TopRegression]) {
    if top.is_empty() {
        out.push_str("No regressions found.\n");
        return;
    }
    for (idx, entry) in top.iter().enumerate() {
        out.push_str(&format!(
            "{}. `{}`: {:.2}%\n",
            idx + 1,
            entry.case_name,
            entry.execution_time_change_pct
        ));
    }
}

fn write_case_group(out: &mut String, title: &str, cases: &[String]) {
    out.push_str(&format!("### {title} ({} unique)\n", cases.len()));
    if cases.is_empty() {
        out.push_str("No regressions found.\n");
        return;
    }
    for case in cases {
        out.push_str(&format!("- `{case}`\n"));
    }
}

/// Formats `value` with comma thousands separators.
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench_meta::RunCategory;

    fn summary(category: RunCategory, matching: usize, cases: &[(&str, f64)]) -> CategorySummary {
        CategorySummary {
            category: Some(category),
            total_matching: matching,
            total_regressions: cases.len(),
            execution_regressions: cases.len(),
            memory_regressions: 1,
            max_exec_time_regression: cases.first().map(|c| c.1).unwrap_or(0.0),
            max_memory_regression: 12.5,
            top_regressions: cases
                .iter()
                .map(|(name, pct)| TopRegression {
                    case_name: name.to_string(),
                    execution_time_change_pct: *pct,
                })
                .collect(),
            case_names: cases.iter().map(|(name, _)| name.to_string()).collect(),
            files: vec![format!("report_{category}.csv")],
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_render_contains_combined_counts_and_rates() {
        let eager = summary(
            RunCategory::Eager,
            1_200,
            &[("matmul_dtypetorch.float32", 40.0), ("add_M8", 9.5)],
        );
        let compile = summary(
            RunCategory::Compile,
            1_800,
            &[("matmul_dtypetorch.bfloat16", 1500.0)],
        );
        let text = render_markdown(&eager, &compile, 5.0);
        assert!(text.contains("**Total matching benchmarks**: 3,000 (1,200 eager + 1,800 compile)"));
        assert!(text.contains("**Total regressions found**: 3 (2 eager + 1 compile)"));
        assert!(text.contains("**Regression rate**: 0.1%"));
        assert!(text.contains("more than 5.0%"));
        assert!(text.contains("1. `matmul_dtypetorch.float32`: 40.00%"));
        assert!(text.contains("1. `matmul_dtypetorch.bfloat16`: 1500.00%"));
        assert!(text.contains("**Worst memory regression**: 12.50%"));
        assert!(text.contains("### All Unique Cases Combined (2 unique)"));
        assert!(text.contains("- `report_eager.csv`"));
    }

    #[test]
    fn test_render_empty_categories() {
        let text = render_markdown(&CategorySummary::default(), &CategorySummary::default(), 5.0);
        assert!(text.contains("**Regression rate**: 0.0%"));
        assert!(text.contains("### Eager Benchmark Unique Cases (0 unique)\nNo regressions found."));
        assert!(text.contains("No report files were written."));
    }

    #[test]
    fn test_markdown_summary_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        let eager = summary(RunCategory::Eager, 10, &[("bmm", 20.0)]);
        let text = markdown_summary(&eager, &CategorySummary::default(), 5.0, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }
}
