//! Result serialization
//!
//! Renders a [`SearchResult`] as JSON, JSONL, or CSV for the CLI. The JSON
//! envelope mirrors the service's own response shape: a count field, the
//! truncation flag, and the record array under the endpoint's record key.
//! `numberOfRecords` and `truncated` are emitted even when there are no
//! records, so a dry-run still produces a complete envelope.

use crate::error::Result;
use crate::pagination::SearchResult;
use crate::query::Endpoint;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::io::Write;

/// Write the full JSON envelope
pub fn write_json(
    writer: &mut impl Write,
    endpoint: Endpoint,
    result: &SearchResult,
    pretty: bool,
) -> Result<()> {
    let envelope = envelope(endpoint, result);
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &envelope)
            .map_err(|e| crate::error::Error::Io(e.into()))?;
    } else {
        serde_json::to_writer(&mut *writer, &envelope)
            .map_err(|e| crate::error::Error::Io(e.into()))?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Write one record per line
pub fn write_jsonl(writer: &mut impl Write, result: &SearchResult) -> Result<()> {
    for record in &result.records {
        serde_json::to_writer(&mut *writer, record)
            .map_err(|e| crate::error::Error::Io(e.into()))?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Write records as CSV
///
/// Columns are the sorted union of keys across all records; cells missing a
/// key are empty, and non-scalar values are rendered as JSON text.
pub fn write_csv(writer: &mut impl Write, result: &SearchResult) -> Result<()> {
    if result.records.is_empty() {
        return Ok(());
    }

    let columns: BTreeSet<&String> = result.records.iter().flat_map(Map::keys).collect();

    let header: Vec<String> = columns.iter().map(|c| csv_escape(c)).collect();
    writeln!(writer, "{}", header.join(","))?;

    for record in &result.records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| match record.get(*column) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => csv_escape(s),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                Some(nested) => csv_escape(&nested.to_string()),
            })
            .collect();
        writeln!(writer, "{}", row.join(","))?;
    }

    Ok(())
}

fn envelope(endpoint: Endpoint, result: &SearchResult) -> Value {
    let mut envelope = Map::new();
    envelope.insert(
        "numberOfRecords".to_string(),
        Value::from(result.total_available),
    );
    envelope.insert("truncated".to_string(), Value::from(result.truncated));
    envelope.insert(
        endpoint.record_key().to_string(),
        Value::Array(result.records.iter().cloned().map(Value::Object).collect()),
    );
    Value::Object(envelope)
}

/// RFC 4180 quoting: fields containing a comma, quote, or line break are
/// wrapped in quotes with embedded quotes doubled.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
