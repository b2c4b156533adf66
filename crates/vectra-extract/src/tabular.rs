//! Tabular data extraction (CSV and Excel).
//!
//! A spreadsheet is not embedded row by row. Instead it is rendered into one
//! deterministic textual summary (column names, the first rows, per-column
//! numeric statistics) and that summary is what gets embedded. The summary
//! layout is a stable contract: identical input bytes must produce identical
//! summary bytes, since the text feeds directly into the embedder.

use std::io::Cursor;

use calamine::{Reader, Xls, Xlsx};
use serde_json::json;
use tracing::debug;
use vectra_core::{ExtractError, Metadata, Payload};

use crate::Extraction;

/// Number of data rows quoted verbatim in the summary.
const SAMPLE_ROWS: usize = 5;

/// Extract a CSV file into its textual summary.
pub fn extract_csv(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ExtractError::Format(format!("failed to parse CSV header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ExtractError::Format(format!("failed to parse CSV row: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }

    summarize(headers, rows, "csv")
}

/// Extract the first worksheet of a modern (`.xlsx`) workbook.
pub fn extract_xlsx(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Format(format!("failed to open workbook: {e}")))?;
    summarize_first_sheet(workbook)
}

/// Extract the first worksheet of a legacy BIFF (`.xls`) workbook.
///
/// Legacy workbooks are OLE2 compound files, not ZIP containers, so they
/// need calamine's dedicated BIFF reader rather than the xlsx one.
pub fn extract_xls(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let workbook: Xls<_> = Xls::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Format(format!("failed to open legacy workbook: {e}")))?;
    summarize_first_sheet(workbook)
}

/// Read the first worksheet of an already-opened workbook and summarize it.
fn summarize_first_sheet<RS, R>(mut workbook: R) -> Result<Extraction, ExtractError>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractError::Format("workbook has no worksheets".to_string()))?
        .map_err(|e| ExtractError::Format(format!("failed to read worksheet: {e}")))?;

    let mut cells = range.rows();
    let headers: Vec<String> = cells
        .next()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    let rows: Vec<Vec<String>> = cells
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    summarize(headers, rows, "excel")
}

/// Render parsed rows into the canonical summary text and metadata.
fn summarize(
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    file_type: &str,
) -> Result<Extraction, ExtractError> {
    if headers.is_empty() {
        return Err(ExtractError::Format("no columns found".to_string()));
    }
    debug!(
        columns = headers.len(),
        rows = rows.len(),
        file_type,
        "summarizing tabular data"
    );

    let mut lines = vec![format!("Columns: {}", headers.join(", "))];

    if !rows.is_empty() {
        lines.push("\nSample data:".to_string());
        for (i, row) in rows.iter().take(SAMPLE_ROWS).enumerate() {
            let cells: Vec<String> = headers
                .iter()
                .zip(row.iter())
                .map(|(col, val)| format!("{col}: {val}"))
                .collect();
            lines.push(format!("Row {}: {}", i + 1, cells.join(" | ")));
        }
    }

    let numeric = numeric_columns(&headers, &rows);
    if !numeric.is_empty() {
        lines.push("\nNumeric columns summary:".to_string());
        for (name, values) in &numeric {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            lines.push(format!(
                "{name}: mean={mean:.2}, min={}, max={}",
                fmt_num(min),
                fmt_num(max)
            ));
        }
    }

    let mut metadata = Metadata::new();
    metadata.insert("rows".to_string(), json!(rows.len()));
    metadata.insert("columns".to_string(), json!(headers.len()));
    metadata.insert("column_names".to_string(), json!(headers));
    metadata.insert(
        "numeric_columns".to_string(),
        json!(numeric.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>()),
    );
    metadata.insert("file_type".to_string(), json!(file_type));

    Ok(Extraction {
        payload: Payload::Text(lines.join("\n")),
        metadata,
    })
}

/// Columns whose every non-empty cell parses as a number, in header order.
fn numeric_columns(headers: &[String], rows: &[Vec<String>]) -> Vec<(String, Vec<f64>)> {
    let mut result = Vec::new();
    for (col, name) in headers.iter().enumerate() {
        let mut values = Vec::new();
        let mut numeric = true;
        for row in rows {
            let Some(cell) = row.get(col) else { continue };
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => {
                    numeric = false;
                    break;
                }
            }
        }
        if numeric && !values.is_empty() {
            result.push((name.clone(), values));
        }
    }
    result
}

/// Format a number without a trailing `.0` when it is integral.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
