use std::path::Path;

use ahash::AHashMap;
use log::{info, warn};
use serde::Serialize;

use crate::{
    BenchDiffError,
    bench_meta::{BenchRow, BenchTable, RunCategory},
    loader,
};

pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// Percentage change from `old` to `new`.
///
/// A zero baseline yields `+inf` when `new` is positive and `0` otherwise.
pub fn percent_change(old: f64, new: f64) -> f64 {
    if old == 0.0 {
        return if new > 0.0 { f64::INFINITY } else { 0.0 };
    }
    (new - old) / old * 100.0
}

/// One baseline row paired with one new row sharing its case name.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonRow {
    pub baseline: BenchRow,
    pub new: BenchRow,
    pub execution_time_change_pct: f64,
    pub memory_change_pct: f64,
    pub execution_time_regression: bool,
    pub memory_regression: bool,
    pub has_regression: bool,
}

impl ComparisonRow {
    pub fn new(baseline: &BenchRow, new: &BenchRow, threshold: f64) -> Self {
        let execution_time_change_pct = percent_change(baseline.execution_time, new.execution_time);
        let memory_change_pct = percent_change(baseline.peak_memory_kb, new.peak_memory_kb);
        let execution_time_regression = execution_time_change_pct > threshold;
        let memory_regression = memory_change_pct > threshold;
        Self {
            baseline: baseline.clone(),
            new: new.clone(),
            execution_time_change_pct,
            memory_change_pct,
            execution_time_regression,
            memory_regression,
            has_regression: execution_time_regression || memory_regression,
        }
    }

    pub fn case_name(&self) -> &str {
        &self.baseline.case_name
    }
}

/// Unique case-name counts on both sides of a comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaseOverlap {
    pub baseline_cases: usize,
    pub new_cases: usize,
    pub common_cases: usize,
    pub only_in_baseline: usize,
    pub only_in_new: usize,
}

impl CaseOverlap {
    pub fn between(baseline: &BenchTable, new: &BenchTable) -> Self {
        let baseline_cases = baseline.case_names();
        let new_cases = new.case_names();
        let common_cases = baseline_cases.intersection(&new_cases).count();
        Self {
            baseline_cases: baseline_cases.len(),
            new_cases: new_cases.len(),
            common_cases,
            only_in_baseline: baseline_cases.len() - common_cases,
            only_in_new: new_cases.len() - common_cases,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonTable {
    pub category: Option<RunCategory>,
    pub threshold: f64,
    pub baseline_entries: usize,
    pub new_entries: usize,
    pub overlap: CaseOverlap,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn regressions(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|row| row.has_regression)
    }
}

/// Inner-joins `baseline` and `new` on case name.
///
/// Repeated case names produce every pairing. Rows come out in baseline
/// order, and for each baseline row the matches follow new-table order.
pub fn join_tables(
    baseline: &BenchTable,
    new: &BenchTable,
    threshold: f64,
    category: Option<RunCategory>,
) -> ComparisonTable {
    let mut index: AHashMap<&str, Vec<&BenchRow>> = AHashMap::new();
    for row in new.iter() {
        index.entry(row.case_name.as_str()).or_default().push(row);
    }

    let mut rows = Vec::new();
    let mut fanned_out = 0usize;
    for base in baseline.iter() {
        let Some(matches) = index.get(base.case_name.as_str()) else {
            continue;
        };
        if matches.len() > 1 {
            fanned_out += 1;
        }
        rows.extend(
            matches
                .iter()
                .map(|candidate| ComparisonRow::new(base, candidate, threshold)),
        );
    }

    let overlap = CaseOverlap::between(baseline, new);
    let baseline_dupes = baseline.len() - overlap.baseline_cases;
    if fanned_out > 0 || baseline_dupes > 0 {
        warn!(
            "duplicate case names in join input ({baseline_dupes} extra baseline rows, \
             {fanned_out} baseline rows matched several new rows); emitting every pairing"
        );
    }

    ComparisonTable {
        category,
        threshold,
        baseline_entries: baseline.len(),
        new_entries: new.len(),
        overlap,
        rows,
    }
}

/// Loads both directories for `category` and joins them.
pub fn compare_benchmarks<P: AsRef<Path>, Q: AsRef<Path>>(
    baseline_dir: P,
    new_dir: Q,
    threshold: f64,
    category: Option<RunCategory>,
) -> Result<ComparisonTable, BenchDiffError> {
    let label = category.map(|c| c.as_str()).unwrap_or("all");
    info!(
        "loading baseline {label} benchmarks from {}",
        baseline_dir.as_ref().display()
    );
    let baseline = loader::load(baseline_dir, category)?;
    info!(
        "loading new {label} benchmarks from {}",
        new_dir.as_ref().display()
    );
    let new = loader::load(new_dir, category)?;

    let table = join_tables(&baseline, &new, threshold, category);
    let overlap = &table.overlap;
    info!(
        "baseline={} new={} entries; unique cases baseline={} new={} common={} \
         only_baseline={} only_new={}",
        table.baseline_entries,
        table.new_entries,
        overlap.baseline_cases,
        overlap.new_cases,
        overlap.common_cases,
        overlap.only_in_baseline,
        overlap.only_in_new
    );
    info!("merged {} matching {label} benchmarks", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(case: &str, time: f64, mem: f64) -> BenchRow {
        BenchRow {
            case_name: case.into(),
            module_name: "ops".into(),
            execution_time: time,
            peak_memory_kb: mem,
            source_file: "a.csv".into(),
        }
    }

    #[test]
    fn test_percent_change_formula() {
        assert_eq!(percent_change(10.0, 12.0), 20.0);
        assert_eq!(percent_change(200.0, 100.0), -50.0);
        assert_eq!(percent_change(0.0, 3.0), f64::INFINITY);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, -1.0), 0.0);
    }

    #[test]
    fn test_join_keeps_only_common_cases() {
        let baseline = BenchTable::new(vec![row("A", 10.0, 100.0), row("B", 20.0, 200.0)]);
        let new = BenchTable::new(vec![row("A", 12.0, 90.0), row("C", 5.0, 5.0)]);
        let table = join_tables(&baseline, &new, DEFAULT_THRESHOLD, None);
        assert_eq!(table.len(), 1);
        let joined = &table.rows[0];
        assert_eq!(joined.case_name(), "A");
        assert!((joined.execution_time_change_pct - 20.0).abs() < 1e-9);
        assert!((joined.memory_change_pct + 10.0).abs() < 1e-9);
        assert!(joined.execution_time_regression);
        assert!(!joined.memory_regression);
        assert!(joined.has_regression);
        assert_eq!(
            table.overlap,
            CaseOverlap {
                baseline_cases: 2,
                new_cases: 2,
                common_cases: 1,
                only_in_baseline: 1,
                only_in_new: 1,
            }
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let base = row("A", 100.0, 100.0);
        let at = ComparisonRow::new(&base, &row("A", 105.0, 100.0), 5.0);
        assert!(!at.execution_time_regression);
        assert!(!at.has_regression);
        let above = ComparisonRow::new(&base, &row("A", 105.0001, 100.0), 5.0);
        assert!(above.execution_time_regression);
    }

    #[test]
    fn test_improvements_never_regress() {
        let joined = ComparisonRow::new(&row("A", 100.0, 100.0), &row("A", 10.0, 1.0), 5.0);
        assert!(!joined.has_regression);
    }

    #[test]
    fn test_duplicate_case_names_cross_product() {
        let baseline = BenchTable::new(vec![row("A", 1.0, 1.0), row("A", 2.0, 1.0)]);
        let new = BenchTable::new(vec![
            row("A", 3.0, 1.0),
            row("A", 4.0, 1.0),
            row("A", 5.0, 1.0),
        ]);
        let table = join_tables(&baseline, &new, 5.0, None);
        assert_eq!(table.len(), 6);
        let pairs: Vec<(f64, f64)> = table
            .rows
            .iter()
            .map(|r| (r.baseline.execution_time, r.new.execution_time))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (1.0, 3.0),
                (1.0, 4.0),
                (1.0, 5.0),
                (2.0, 3.0),
                (2.0, 4.0),
                (2.0, 5.0)
            ]
        );
    }
}
