use std::path::PathBuf;

use crate::config::CompareConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct CommandLineConfig {
    pub compare: CompareConfig,
    pub json: bool,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut compare = CompareConfig::default();
        let mut json = false;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--baseline-dir" => {
                    compare.baseline_dir = PathBuf::from(
                        iter.next()
                            .ok_or_else(|| "--baseline-dir requires a value".to_string())?,
                    );
                }
                "--new-dir" => {
                    compare.new_dir = PathBuf::from(
                        iter.next()
                            .ok_or_else(|| "--new-dir requires a value".to_string())?,
                    );
                }
                "--threshold" => {
                    let raw = iter
                        .next()
                        .ok_or_else(|| "--threshold requires a value".to_string())?;
                    compare.threshold = raw
                        .parse::<f64>()
                        .map_err(|_| format!("invalid threshold {raw}"))?;
                }
                "--benchmark-type" => {
                    let raw = iter
                        .next()
                        .ok_or_else(|| "--benchmark-type requires a value".to_string())?;
                    compare.selection = raw.parse().map_err(|e| format!("{e}"))?;
                }
                "--output" => {
                    compare.output = iter
                        .next()
                        .ok_or_else(|| "--output requires a value".to_string())?
                        .to_string();
                }
                "--generate-markdown" => compare.generate_markdown = true,
                "--json" => json = true,
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                other => {
                    return Err(format!("unexpected argument {other}"));
                }
            }
        }
        compare.validate().map_err(|e| e.to_string())?;
        Ok(Self { compare, json })
    }

    pub fn help() -> &'static str {
        r#"Usage: benchdiff [--baseline-dir DIR] [--new-dir DIR] [--threshold PCT]
                 [--benchmark-type eager|compile|both] [--output NAME]
                 [--generate-markdown] [--json]

Compares benchmark CSV exports of a baseline run against a new run and
reports cases whose execution time or peak memory grew past the threshold.

Options:
  --baseline-dir DIR        Baseline benchmark directory (default: baseline)
  --new-dir DIR             New benchmark directory (default: new)
  --threshold PCT           Regression threshold in percent (default: 5.0)
  --benchmark-type TYPE     eager, compile or both (default: both)
  --output NAME             Output CSV name (default: regression_report.csv)
  --generate-markdown       Also write NAME_summary_report.md
  --json                    Print a JSON run summary to stdout

Files containing "_compile" in their name are compile benchmarks.

Examples:
  benchdiff --baseline-dir runs/v1 --new-dir runs/v2
  benchdiff --benchmark-type eager --threshold 10
  benchdiff --output nightly.csv --generate-markdown
"#
    }
}
