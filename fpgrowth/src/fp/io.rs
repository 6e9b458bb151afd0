//! Transaction database files and pattern reports.
//!
//! A database starts with a line holding the number of transactions. Each
//! following line is `id<TAB>n<TAB>item item ...` where `n` is the number
//! of items. A report starts with `|FPs| = <count>` followed by one
//! `item, item : support` line per itemset.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::warn;

use super::Item;
use super::error::FpError;
use super::growth::FrequentItemset;

/// Parsed transaction database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    /// Transaction count announced on the first line.
    pub declared_count: usize,
    pub transactions: Vec<Vec<Item>>,
}

pub fn read_database(path: impl AsRef<Path>) -> Result<Database, FpError> {
    let file = File::open(path)?;
    parse_database(BufReader::new(file))
}

pub fn parse_database<R: BufRead>(reader: R) -> Result<Database, FpError> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(parse_error(1, "missing transaction count")),
    };
    let declared_count = header
        .trim()
        .parse::<usize>()
        .map_err(|e| parse_error(1, format!("invalid transaction count {:?}: {}", header.trim(), e)))?;

    // The header is untrusted; cap the up-front reservation.
    let mut transactions = Vec::with_capacity(declared_count.min(4096));
    for (idx, line) in lines.enumerate() {
        let line_number = idx + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        transactions.push(parse_transaction(&line, line_number)?);
    }

    if transactions.len() != declared_count {
        warn!(
            declared = declared_count,
            found = transactions.len(),
            "transaction count does not match the database header"
        );
    }

    Ok(Database { declared_count, transactions })
}

fn parse_transaction(line: &str, line_number: usize) -> Result<Vec<Item>, FpError> {
    let mut fields = line.trim_end_matches(['\r', '\n']).splitn(3, '\t');
    let (Some(id), Some(len), Some(items)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(parse_error(line_number, "expected three tab-separated fields"));
    };

    let id = id
        .trim()
        .parse::<usize>()
        .map_err(|e| parse_error(line_number, format!("invalid transaction id {:?}: {}", id, e)))?;
    let len = len
        .trim()
        .parse::<usize>()
        .map_err(|e| parse_error(line_number, format!("invalid item count {:?}: {}", len, e)))?;

    let items = items
        .split_whitespace()
        .map(|item| {
            item.parse::<Item>()
                .map_err(|e| parse_error(line_number, format!("invalid item {:?}: {}", item, e)))
        })
        .collect::<Result<Vec<Item>, FpError>>()?;

    if items.len() != len {
        warn!(id, declared = len, found = items.len(), "item count mismatch");
    }
    Ok(items)
}

fn parse_error(line: usize, message: impl Into<String>) -> FpError {
    FpError::Parse { line, message: message.into() }
}

/// Writes the report for `patterns`, items of each itemset ascending.
pub fn write_patterns<W: Write>(mut writer: W, patterns: &[FrequentItemset]) -> Result<(), FpError> {
    writeln!(writer, "|FPs| = {}", patterns.len())?;
    for pattern in patterns {
        let mut items = pattern.items.clone();
        items.sort_unstable();
        let items: Vec<String> = items.iter().map(Item::to_string).collect();
        writeln!(writer, "{} : {}", items.join(", "), pattern.support)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_patterns_to_path(
    path: impl AsRef<Path>,
    patterns: &[FrequentItemset],
) -> Result<(), FpError> {
    let file = File::create(path)?;
    write_patterns(BufWriter::new(file), patterns)
}
