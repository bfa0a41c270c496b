use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::bench_meta::{BenchRow, BenchTable};

const OPERATORS: [&str; 6] = ["matmul", "addmm", "bmm", "add", "relu", "softmax"];
const DTYPES: [&str; 3] = ["float32", "bfloat16", "float16"];

/// Matching baseline and new tables with a controlled drift between them.
#[derive(Clone, Debug)]
pub struct BenchDataset {
    pub baseline: BenchTable,
    pub new: BenchTable,
}

impl BenchDataset {
    pub fn cases(&self) -> usize {
        self.baseline.len()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum DriftShape {
    /// New run identical to the baseline.
    Flat,
    /// Every metric moves by a random amount in `-max_pct..=max_pct`.
    Uniform { max_pct: f64 },
    /// `fraction` of the cases slow down by `slowdown_pct`, the rest stay put.
    Regressing { fraction: f64, slowdown_pct: f64 },
}

pub fn generate_tables(shape: DriftShape, case_count: usize, seed: u64) -> BenchDataset {
    assert!(case_count > 0, "case_count must be positive");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut baseline = Vec::with_capacity(case_count);
    let mut new = Vec::with_capacity(case_count);
    for idx in 0..case_count {
        let base = build_row(idx, &mut rng, "baseline.csv");
        let (time_pct, mem_pct) = match shape {
            DriftShape::Flat => (0.0, 0.0),
            DriftShape::Uniform { max_pct } => (
                rng.gen_range(-max_pct..=max_pct),
                rng.gen_range(-max_pct..=max_pct),
            ),
            DriftShape::Regressing {
                fraction,
                slowdown_pct,
            } => {
                if rng.r#gen::<f64>() < fraction {
                    (slowdown_pct, 0.0)
                } else {
                    (0.0, 0.0)
                }
            }
        };
        new.push(BenchRow {
            execution_time: base.execution_time * (1.0 + time_pct / 100.0),
            peak_memory_kb: base.peak_memory_kb * (1.0 + mem_pct / 100.0),
            source_file: "new.csv".to_string(),
            ..base.clone()
        });
        baseline.push(base);
    }
    BenchDataset {
        baseline: BenchTable::new(baseline),
        new: BenchTable::new(new),
    }
}

fn build_row(idx: usize, rng: &mut StdRng, source_file: &str) -> BenchRow {
    let op = OPERATORS[idx % OPERATORS.len()];
    let dtype = DTYPES[(idx / OPERATORS.len()) % DTYPES.len()];
    let mut case_name = format!("{op}_M{}_dtypetorch.{dtype}", idx / 18);
    if idx % 2 == 1 {
        case_name.push_str("_bwdall_BACKWARD");
    }
    BenchRow {
        case_name,
        module_name: op.to_string(),
        execution_time: rng.gen_range(1.0..1_000.0),
        peak_memory_kb: rng.gen_range(64.0..65_536.0),
        source_file: source_file.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_tables(DriftShape::Uniform { max_pct: 10.0 }, 50, 7);
        let b = generate_tables(DriftShape::Uniform { max_pct: 10.0 }, 50, 7);
        assert_eq!(a.baseline, b.baseline);
        assert_eq!(a.new, b.new);
    }

    #[test]
    fn test_case_names_are_unique() {
        let data = generate_tables(DriftShape::Flat, 200, 1);
        assert_eq!(data.baseline.case_names().len(), data.cases());
    }
}
