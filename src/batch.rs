//! Tabular batch: an ordered column list over JSON-object rows.
//!
//! Batches are what the normalizer and classifier consume and produce. Keeping rows as
//! `serde_json` objects lets a batch carry raw dumps with missing or oddly-typed cells,
//! which the stages then filter instead of rejecting at load time.

use crate::error::PipelineError;
use crate::model::CommentRecord;
use crate::util::open_buffered;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::io::{Read, Write};
use std::path::Path;

pub type Row = Map<String, Value>;

/// Columns of a raw comment batch, in fetch order.
pub const COMMENT_COLUMNS: [&str; 5] = ["author", "text", "like_count", "published_at", "video_id"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Batch {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { columns: columns.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Raw comment batch with the canonical column set, even when `records` is empty.
    pub fn from_comments(records: &[CommentRecord]) -> Self {
        let mut batch = Batch::new(COMMENT_COLUMNS);
        for r in records {
            let mut row = Row::new();
            row.insert("author".into(), Value::String(r.author.clone()));
            row.insert("text".into(), r.text.clone().map(Value::String).unwrap_or(Value::Null));
            row.insert("like_count".into(), Value::Number(r.like_count.into()));
            row.insert("published_at".into(), Value::String(r.published_at.clone()));
            row.insert("video_id".into(), Value::String(r.video_id.clone()));
            batch.rows.push(row);
        }
        batch
    }

    /// Build a batch from any serializable records. Columns are the union of keys in first-seen order.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("serialize records into batch rows")?;
        Ok(Self::from_values(values))
    }

    /// Non-object values are skipped.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut batch = Batch::default();
        for v in values {
            match v {
                Value::Object(row) => {
                    for k in row.keys() {
                        if !batch.has_column(k) {
                            batch.columns.push(k.clone());
                        }
                    }
                    batch.rows.push(row);
                }
                other => tracing::warn!("skipping non-object batch row: {}", other),
            }
        }
        batch
    }

    /// Load a JSON array (`.json`) or CSV (anything else) file.
    pub fn load(path: &Path) -> Result<Self> {
        let r = open_buffered(path)?;
        let is_json = path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("json")).unwrap_or(false);
        if is_json {
            Self::from_json_reader(r).with_context(|| format!("read JSON batch {}", path.display()))
        } else {
            Self::from_csv_reader(r).with_context(|| format!("read CSV batch {}", path.display()))
        }
    }

    pub fn from_json_reader<R: Read>(r: R) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_reader(r)?;
        Ok(Self::from_values(values))
    }

    /// Read CSV with a header row. Empty cells become null; a column whose non-empty
    /// cells all parse as numbers is loaded as numbers, otherwise as strings.
    pub fn from_csv_reader<R: Read>(r: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(r);
        let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut cells: Vec<Vec<Option<String>>> = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            let row = (0..columns.len())
                .map(|i| rec.get(i).filter(|s| !s.is_empty()).map(|s| s.to_string()))
                .collect();
            cells.push(row);
        }

        let kinds: Vec<CellKind> = (0..columns.len())
            .map(|i| infer_kind(cells.iter().filter_map(|row| row[i].as_deref())))
            .collect();

        let mut batch = Batch::new(columns);
        for row in cells {
            let mut out = Row::new();
            for (i, cell) in row.into_iter().enumerate() {
                out.insert(batch.columns[i].clone(), cell_value(cell, kinds[i]));
            }
            batch.rows.push(out);
        }
        Ok(batch)
    }

    /// CSV with a header row and no index column. Null cells are written empty.
    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(self.columns.iter().map(|c| cell_text(row.get(c))))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, w: W, pretty: bool) -> Result<()> {
        let values: Vec<&Row> = self.rows.iter().collect();
        if pretty {
            serde_json::to_writer_pretty(w, &values)?;
        } else {
            serde_json::to_writer(w, &values)?;
        }
        Ok(())
    }

    /// Deserialize every row into `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> std::result::Result<Vec<T>, PipelineError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                serde_json::from_value(Value::Object(row.clone()))
                    .map_err(|e| PipelineError::Decode(format!("row {i}: {e}")))
            })
            .collect()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Contract check: fail loudly when the batch shape lacks `name`.
    pub fn require_column(&self, name: &str, stage: &'static str) -> std::result::Result<(), PipelineError> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(PipelineError::missing_column(name, stage))
        }
    }

    /// Append a column (no-op if present). Existing rows are not touched.
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }

    pub fn push_row(&mut self, row: Row) {
        for k in row.keys() {
            if !self.has_column(k) {
                self.columns.push(k.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn retain_rows<F: FnMut(&Row) -> bool>(&mut self, f: F) {
        self.rows.retain(f);
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    /// Stable identity of a row over the batch columns (missing cells count as null).
    pub(crate) fn row_key(&self, row: &Row) -> String {
        let cells: Vec<&Value> = self.columns.iter().map(|c| row.get(c).unwrap_or(&Value::Null)).collect();
        serde_json::to_string(&cells).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Text,
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> CellKind {
    let mut kind = CellKind::Int;
    for c in cells {
        match kind {
            CellKind::Int if c.parse::<i64>().is_ok() => {}
            CellKind::Int | CellKind::Float if c.parse::<f64>().is_ok() => kind = CellKind::Float,
            _ => return CellKind::Text,
        }
    }
    kind
}

fn cell_value(cell: Option<String>, kind: CellKind) -> Value {
    let Some(s) = cell else { return Value::Null };
    match kind {
        CellKind::Int => s.parse::<i64>().map(|n| Value::Number(n.into())).unwrap_or(Value::String(s)),
        CellKind::Float => match s.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        CellKind::Text => Value::String(s),
    }
}

fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
