//! Case-name grouping for report summaries.
//!
//! Benchmark harnesses expand one logical case into several variants by
//! appending dtype, backward-pass and transpose tags to the case name. The
//! helpers here strip those tags so related variants collapse into a single
//! entry. Grouping is for display only and never feeds the join.

use std::{borrow::Cow, collections::BTreeSet, sync::OnceLock};

use log::warn;
use regex::Regex;

/// Tags still present after normalization indicate an unknown naming scheme.
const KNOWN_MARKERS: [&str; 3] = ["_dtype", "_BACKWARD", "_trans_a"];

fn suffix_rules() -> &'static [Regex; 3] {
    static RULES: OnceLock<[Regex; 3]> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            Regex::new(r"_dtypetorch\.\w+").expect("dtype suffix pattern"),
            Regex::new(r"_bwd\w*_BACKWARD").expect("backward suffix pattern"),
            Regex::new(r"_trans_a\w+_trans_b\w+").expect("transpose suffix pattern"),
        ]
    })
}

/// Strips the dtype, backward-pass and transpose tags, in that order.
///
/// ```
/// use benchdiff::cases::normalize_case_name;
///
/// assert_eq!(normalize_case_name("matmul_dtypetorch.float32_bwdall_BACKWARD"), "matmul");
/// assert_eq!(normalize_case_name("add_M64"), "add_M64");
/// ```
pub fn normalize_case_name(case_name: &str) -> Cow<'_, str> {
    let mut name = Cow::Borrowed(case_name);
    for rule in suffix_rules() {
        if rule.is_match(&name) {
            let stripped = rule.replace_all(&name, "").into_owned();
            name = Cow::Owned(stripped);
        }
    }
    name
}

/// Returns `true` when `normalized` still carries a known variant marker.
pub fn is_partially_normalized(normalized: &str) -> bool {
    KNOWN_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Deduplicated, sorted normalized names of `case_names`.
pub fn unique_cases<I, S>(case_names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique = BTreeSet::new();
    for case_name in case_names {
        let original = case_name.as_ref();
        let normalized = normalize_case_name(original);
        if is_partially_normalized(&normalized) {
            warn!("case name {original} normalized to {normalized} but still carries a variant tag");
        }
        unique.insert(normalized.into_owned());
    }
    unique.into_iter().collect()
}
