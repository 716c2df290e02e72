use ignore::WalkBuilder;
use serde_json::Value;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use crate::filter::Record;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an object or an array of objects")]
    NotRecords,
}

pub fn collect_export_files(data_path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkBuilder::new(data_path)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .build();

    for entry in walker.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }

    files
}

pub fn read_paths_from_stdin() -> Vec<PathBuf> {
    let stdin = io::stdin();
    stdin
        .lock()
        .lines()
        .map_while(Result::ok)
        .filter(|line| !line.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Loads one export file: either a JSON array of row objects, as the
/// dashboard's table export writes, or a single object.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let content = fs::read_to_string(path)?;
    parse_records(&content)
}

fn parse_records(content: &str) -> Result<Vec<Record>, LoadError> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                _ => Err(LoadError::NotRecords),
            })
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        _ => Err(LoadError::NotRecords),
    }
}
