//! Input resolution and the interactive CSV picker.
//!
//! Order of precedence for the observation file:
//! 1. `-f/--file`
//! 2. `SURVEY_DATA` (process environment or `.env`; clap folds this into `-f`)
//! 3. a numbered list of `*.csv` files found under the working directory

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AppError;

/// How deep below the working directory to look for CSV files.
const SEARCH_DEPTH: usize = 4;

const SKIP_DIRS: [&str; 3] = [".git", "target", "node_modules"];

/// Resolve the CSV to read, prompting when no path was supplied.
pub fn resolve_csv_path(file: Option<&Path>) -> Result<PathBuf, AppError> {
    match file {
        Some(path) => validate_csv_path(path),
        None => {
            debug!("no input file given; starting picker");
            prompt_for_csv_path()
        }
    }
}

/// List discovered `*.csv` files and read a choice from stdin.
///
/// A number picks from the list, anything else is taken as a path, `q` cancels.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found. Pass one with `-f <file.csv>` or set SURVEY_DATA.",
        ));
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, display_path(path));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Select 1-{} or type a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let Some(line) = lines.next() else {
            return Err(AppError::new(2, "No input received. Pass a CSV path with `-f <file.csv>`."));
        };
        let line = line.map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        match parse_choice(line.trim(), &files) {
            Choice::Quit => return Err(AppError::new(2, "Canceled.")),
            Choice::Listed(path) => return validate_csv_path(&path),
            Choice::OutOfRange(n) => println!("No entry {n}; pick between 1 and {}.", files.len()),
            Choice::Path(path) => match validate_csv_path(&path) {
                Ok(path) => return Ok(path),
                Err(err) => println!("{err}"),
            },
        }
    }
}

#[derive(Debug, PartialEq)]
enum Choice {
    Quit,
    Listed(PathBuf),
    OutOfRange(usize),
    Path(PathBuf),
}

fn parse_choice(input: &str, files: &[PathBuf]) -> Choice {
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=files.len()).contains(&n) => Choice::Listed(files[n - 1].clone()),
        Ok(n) => Choice::OutOfRange(n),
        Err(_) => Choice::Path(PathBuf::from(input)),
    }
}

/// Check that `path` names an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if path.is_dir() {
        return Err(AppError::new(2, format!("Expected a file, got a directory: {}", path.display())));
    }
    if !path.exists() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(2, format!("Expected a .csv file, got: {}", path.display())));
    }
    Ok(path.to_path_buf())
}

/// `*.csv` files under `root`, sorted by displayed path.
pub fn discover_csv_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else { continue };
            let path = entry.path();
            if file_type.is_dir() {
                let skip = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| SKIP_DIRS.contains(&n));
                if !skip && depth < SEARCH_DEPTH {
                    pending.push((path, depth + 1));
                }
            } else if file_type.is_file() && has_csv_extension(&path) {
                found.push(path);
            }
        }
    }

    found.sort_by_key(|p| display_path(p));
    found
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rates_survey_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn discovers_nested_csvs_and_skips_target() {
        let dir = scratch_dir("discover");
        fs::create_dir_all(dir.join("data/eur")).unwrap();
        fs::create_dir_all(dir.join("target")).unwrap();
        fs::write(dir.join("b.csv"), "").unwrap();
        fs::write(dir.join("data/eur/a.CSV"), "").unwrap();
        fs::write(dir.join("target/skip.csv"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let found = discover_csv_files(&dir);
        let _ = fs::remove_dir_all(&dir);

        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(&dir).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["b.csv", "data/eur/a.CSV"]);
    }

    #[test]
    fn validation_rejects_dirs_and_other_extensions() {
        let dir = scratch_dir("validate");
        let txt = dir.join("rates.txt");
        fs::write(&txt, "").unwrap();

        assert!(validate_csv_path(&dir).unwrap_err().to_string().contains("directory"));
        assert!(validate_csv_path(&txt).unwrap_err().to_string().contains(".csv"));
        assert_eq!(validate_csv_path(&dir.join("missing.csv")).unwrap_err().exit_code(), 2);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn choices() {
        let files = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
        assert_eq!(parse_choice("Q", &files), Choice::Quit);
        assert_eq!(parse_choice("2", &files), Choice::Listed(PathBuf::from("b.csv")));
        assert_eq!(parse_choice("3", &files), Choice::OutOfRange(3));
        assert_eq!(parse_choice("x/y.csv", &files), Choice::Path(PathBuf::from("x/y.csv")));
    }
}
