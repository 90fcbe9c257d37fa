//! CSV output for fetched proxy records

use crate::error::Result;
use crate::proxy::models::ProxyRecord;
use std::fs;
use std::path::Path;

/// Header row written before any records
pub const CSV_HEADER: &str = "Type,Address,Port,Country,Anonymity";

fn csv_row(record: &ProxyRecord) -> String {
    format!(
        "{},{},{},{},{}",
        record.proxy_type,
        record.host,
        record.port,
        record.country.as_deref().unwrap_or(""),
        record.anonymity.as_deref().unwrap_or(""),
    )
}

/// Write records to a CSV file, header row first
pub fn write_csv<P: AsRef<Path>>(records: &[ProxyRecord], path: P) -> Result<()> {
    let mut content = String::from(CSV_HEADER);
    for record in records {
        content.push('\n');
        content.push_str(&csv_row(record));
    }
    content.push('\n');

    fs::write(path, content)?;
    Ok(())
}
