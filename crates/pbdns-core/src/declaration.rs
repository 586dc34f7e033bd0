// # Declaration File
//
// Reads the tabular list of desired records.
//
// ## File Format
//
// CSV with a header row. `host` and `type` are required columns, `answer` is
// optional (deletions do not need it). Any other column is ignored, so an
// export from a spreadsheet or from the provider's own dashboard can be used
// as-is. Values are trimmed, and blank or whitespace-only lines are skipped.
//
// ```text
// host,type,answer
// home,A,1.2.3.4
// www,CNAME,example.com
// old,CNAME,
// ```
//
// ## Failure Model
//
// The whole file is parsed before anything is sent. A missing file, a missing
// required column or a malformed row fails the entire load: a partially read
// declaration is never applied.

use std::path::Path;
use tokio::fs;

use crate::error::{Error, Result};
use crate::record::RecordRow;

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 2] = ["host", "type"];

/// Load every row of a declaration file, in file order
///
/// # Errors
///
/// `Error::DeclarationFile` if the file cannot be read or parsed.
pub async fn load_rows(path: impl AsRef<Path>) -> Result<Vec<RecordRow>> {
    let path = path.as_ref();

    let bytes = fs::read(path).await.map_err(|e| {
        Error::declaration_file(format!("File not found or unreadable: {}: {}", path.display(), e))
    })?;

    parse_rows(&bytes[..])
        .map_err(|e| Error::declaration_file(format!("{}: {}", path.display(), e)))
}

/// Parse declaration rows from any CSV source
///
/// Errors returned here carry the CSV position but not the file name;
/// [`load_rows`] adds it.
pub fn parse_rows<R: std::io::Read>(reader: R) -> std::result::Result<Vec<RecordRow>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(format!(
            "missing required column(s): {} (found: {})",
            missing.join(", "),
            headers.iter().collect::<Vec<_>>().join(", ")
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        // A whitespace-only line trims down to a single empty field
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(
            record
                .deserialize::<RecordRow>(Some(&headers))
                .map_err(|e| e.to_string())?,
        );
    }

    Ok(rows)
}
