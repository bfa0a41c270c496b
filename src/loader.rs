use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    BenchDiffError,
    bench_meta::{BenchRow, BenchTable, REQUIRED_COLUMNS, RunCategory},
};

/// Loads every CSV export in `directory` into one table.
///
/// `filter` restricts the files by category; `None` keeps all of them.
/// Fails with [`BenchDiffError::NoData`] when no file matches.
pub fn load<P: AsRef<Path>>(
    directory: P,
    filter: Option<RunCategory>,
) -> Result<BenchTable, BenchDiffError> {
    let directory = directory.as_ref();
    let files = discover_csv_files(directory, filter)?;
    if files.is_empty() {
        let msg = match filter {
            Some(category) => format!(
                "No {category} CSV files found in {}",
                directory.display()
            ),
            None => format!("No CSV files found in {}", directory.display()),
        };
        return Err(BenchDiffError::no_data(msg));
    }

    let mut table = BenchTable::default();
    for path in &files {
        let file_name = file_name_of(path);
        debug!("reading {}", path.display());
        let file = File::open(path)
            .map_err(|e| BenchDiffError::io(format!("{}: {e}", path.display())))?;
        table.append(load_reader(BufReader::new(file), &file_name)?);
    }
    info!(
        "loaded {} rows from {} file(s) in {}",
        table.len(),
        files.len(),
        directory.display()
    );
    Ok(table)
}

/// Decodes one CSV stream, tagging each row with `source_file`.
pub fn load_reader<R: Read>(reader: R, source_file: &str) -> Result<BenchTable, BenchDiffError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| BenchDiffError::parse(format!("{source_file}: {e}")))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(BenchDiffError::missing_column(format!(
                "{source_file} has no \"{column}\" column"
            )));
        }
    }

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<BenchRow>() {
        let mut row = record.map_err(|e| BenchDiffError::parse(format!("{source_file}: {e}")))?;
        row.source_file = source_file.to_string();
        rows.push(row);
    }
    Ok(BenchTable::new(rows))
}

/// Lists `*.csv` files in `directory` matching `filter`, sorted by path.
pub fn discover_csv_files(
    directory: &Path,
    filter: Option<RunCategory>,
) -> Result<Vec<PathBuf>, BenchDiffError> {
    let entries = fs::read_dir(directory)
        .map_err(|e| BenchDiffError::io(format!("{}: {e}", directory.display())))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| BenchDiffError::io(format!("{}: {e}", directory.display())))?
            .path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let name = file_name_of(&path);
        // hidden files are not picked up by shell-style globbing
        if name.starts_with('.') {
            continue;
        }
        if filter.is_some_and(|category| !category.includes(&name)) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
