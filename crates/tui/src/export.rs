//! CSV export of the full local sequence.

use std::{fs, path::Path};

use api_types::transaction::Transaction;
use csv::{Terminator, WriterBuilder};

use crate::error::{AppError, Result};

pub const HEADER: [&str; 6] = ["ID", "Type", "Category", "Amount", "Date", "Description"];

/// Encodes every transaction, in sequence order, under a fixed header.
/// Fields holding separators, quotes or newlines are quoted.
pub fn to_csv(transactions: &[Transaction]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(vec![]);

    writer.write_record(HEADER)?;
    for tx in transactions {
        writer.write_record([
            tx.id.as_str(),
            tx.kind.as_str(),
            tx.category.as_str(),
            tx.amount.to_string().as_str(),
            tx.date.as_str(),
            tx.description.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| AppError::Io(err.into_error()))
}

/// Writes the export to `path`, creating parent directories. Returns the
/// number of data rows written.
pub fn write_file(path: impl AsRef<Path>, transactions: &[Transaction]) -> Result<usize> {
    let data = to_csv(transactions)?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, data)?;
    Ok(transactions.len())
}
