//! Input readers: turn files into the engine's line-oriented dataset
//!
//! Search consumes non-empty lines verbatim. Word count first reduces each
//! comma-delimited phonebook record to the name field preceding the first
//! comma, with surrounding quotes stripped; records without a comma are
//! skipped.

use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read every non-empty line from `paths`, in the order given. The global
/// line numbering the search operation reports is over this sequence.
pub fn read_lines<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for path in paths {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }
    Ok(lines)
}

/// Read the extracted name field from every record in `paths`.
pub fn read_names<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for path in paths {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines() {
            if let Some(name) = extract_name(&line?) {
                names.push(name);
            }
        }
    }
    Ok(names)
}

/// The name field of one record: everything before the first comma,
/// trimmed of whitespace and surrounding double quotes. `None` when the
/// record has no comma.
pub fn extract_name(record: &str) -> Option<String> {
    let (field, _) = record.split_once(',')?;
    let name = field.trim().trim_matches('"').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
