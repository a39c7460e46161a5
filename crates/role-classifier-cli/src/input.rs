//! Read a batch of crawled elements from CSV or JSON lines.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use role_classifier::{AttrValue, Element, InputColumns};
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Header row plus one element per record; fields are trimmed.
    Csv,
    /// One JSON object per line.
    Jsonl,
}

impl InputFormat {
    /// Guess from a file extension; anything unrecognised is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl" | "ndjson") => InputFormat::Jsonl,
            _ => InputFormat::Csv,
        }
    }
}

/// Read every element in `reader`. Any malformed row fails the whole batch.
pub fn read_batch<R: Read>(
    reader: R,
    format: InputFormat,
    columns: &InputColumns,
) -> Result<Vec<Element>> {
    let elements = match format {
        InputFormat::Csv => read_csv(reader, columns)?,
        InputFormat::Jsonl => read_jsonl(reader, columns)?,
    };
    debug!(rows = elements.len(), ?format, "read input batch");
    Ok(elements)
}

fn read_csv<R: Read>(reader: R, columns: &InputColumns) -> Result<Vec<Element>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().context("reading CSV header")?.clone();
    let mut seen = HashSet::with_capacity(headers.len());
    if let Some(dup) = headers.iter().find(|name| !seen.insert(*name)) {
        bail!("duplicate CSV column `{dup}`");
    }

    let mut elements = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {row}"))?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.to_string(), AttrValue::from_text(value)));
        elements.push(Element::from_fields(row, fields, columns)?);
    }
    Ok(elements)
}

fn read_jsonl<R: Read>(reader: R, columns: &InputColumns) -> Result<Vec<Element>> {
    let mut elements = Vec::new();
    let mut row = 0;
    for (line_no, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line)
            .with_context(|| format!("parsing JSON on line {}", line_no + 1))?;
        let serde_json::Value::Object(object) = value else {
            bail!("line {} is not a JSON object", line_no + 1);
        };
        let fields = object
            .into_iter()
            .map(|(name, value)| (name, AttrValue::from(value)));
        elements.push(Element::from_fields(row, fields, columns)?);
        row += 1;
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "crawlerId, tagName, left, textAlign, fontSize\n\
                       0, div, 0, start, 16\n\
                       1,\"h1\", 8, center, NaN\n";

    #[test]
    fn test_read_csv_trims_fields() {
        let batch = read_batch(CSV.as_bytes(), InputFormat::Csv, &InputColumns::default()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].id(), "1");
        assert_eq!(batch[1].tag_name, "h1");
        assert_eq!(batch[1].text_align.as_deref(), Some("center"));
        assert_eq!(batch[1].attributes["fontSize"], AttrValue::Text("NaN".into()));
        assert_eq!(batch[0].attributes["left"], AttrValue::Text("0".into()));
    }

    #[test]
    fn test_csv_missing_required_column() {
        let csv = "crawlerId,left,textAlign\n0,1,left\n";
        let err = read_batch(csv.as_bytes(), InputFormat::Csv, &InputColumns::default()).unwrap_err();
        assert!(format!("{err:#}").contains("tagName"));
    }

    #[test]
    fn test_csv_duplicate_header_rejected() {
        let csv = "crawlerId,tagName,textAlign,crawlerId\n0,P,left,1\n";
        let err = read_batch(csv.as_bytes(), InputFormat::Csv, &InputColumns::default()).unwrap_err();
        assert!(err.to_string().contains("duplicate CSV column `crawlerId`"));
    }

    #[test]
    fn test_csv_ragged_row_fails() {
        let csv = "crawlerId,tagName,textAlign\n0,P\n";
        assert!(read_batch(csv.as_bytes(), InputFormat::Csv, &InputColumns::default()).is_err());
    }

    #[test]
    fn test_read_jsonl() {
        let jsonl = "{\"crawlerId\": 4, \"jobId\": \"p1\", \"tagName\": \"p\", \"textAlign\": null, \"width\": 300}\n\
                     \n\
                     {\"crawlerId\": 5, \"jobId\": \"p1\", \"tagName\": \"h2\", \"textAlign\": \"left\", \"width\": \"auto\"}\n";
        let batch = read_batch(jsonl.as_bytes(), InputFormat::Jsonl, &InputColumns::default()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id(), "4");
        assert_eq!(batch[0].job(), Some("p1"));
        assert_eq!(batch[0].text_align, None);
        assert_eq!(batch[0].attributes["width"], AttrValue::Text("300".into()));
        assert_eq!(batch[1].attributes["width"], AttrValue::Text("auto".into()));
    }

    #[test]
    fn test_jsonl_large_integer_ids_stay_distinct() {
        let jsonl = "{\"crawlerId\": 9007199254740993, \"tagName\": \"p\", \"textAlign\": \"left\"}\n\
                     {\"crawlerId\": 9007199254740992, \"tagName\": \"p\", \"textAlign\": \"left\"}\n";
        let batch = read_batch(jsonl.as_bytes(), InputFormat::Jsonl, &InputColumns::default()).unwrap();
        assert_eq!(batch[0].id(), "9007199254740993");
        assert_eq!(batch[1].id(), "9007199254740992");
    }

    #[test]
    fn test_jsonl_rejects_non_object() {
        let err = read_batch("[1,2]\n".as_bytes(), InputFormat::Jsonl, &InputColumns::default())
            .unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.jsonl")), InputFormat::Jsonl);
        assert_eq!(InputFormat::from_path(Path::new("a.ndjson")), InputFormat::Jsonl);
        assert_eq!(InputFormat::from_path(Path::new("a.csv")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("elements")), InputFormat::Csv);
    }

    #[test]
    fn test_custom_id_column() {
        let csv = "elementId,tagName,textAlign\n9,P,left\n";
        let columns = InputColumns {
            id: "elementId".into(),
            job: "url".into(),
        };
        let batch = read_batch(csv.as_bytes(), InputFormat::Csv, &columns).unwrap();
        assert_eq!(batch[0].id(), "9");
    }
}
