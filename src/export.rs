//! Flat artifacts of a run: raw JSON dump, cleaned CSV, final CSV with sentiment.
//! Every file is written to a temp sibling and promoted once complete.

use crate::config::PipelineOptions;
use crate::model::{ClassifiedRecord, CommentRecord, NormalizedRecord, CLASSIFIED_COLUMNS, NORMALIZED_COLUMNS};
use crate::pipeline::PipelineRun;
use crate::util::{open_buffered, write_atomic};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const RAW_FILE: &str = "comments_raw.json";
pub const CLEAN_FILE: &str = "comments_clean.csv";

/// Where [`save_run`] put each artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub raw: PathBuf,
    pub clean: PathBuf,
    pub sentiment: PathBuf,
}

impl ArtifactPaths {
    pub fn under(opts: &PipelineOptions) -> Self {
        let clean = opts.processed_dir().join(CLEAN_FILE);
        Self { raw: opts.raw_dir().join(RAW_FILE), sentiment: sentiment_path_for(&clean), clean }
    }
}

/// `comments_clean.csv` -> `comments_clean_sentiment.csv`.
pub fn sentiment_path_for(clean: &Path) -> PathBuf {
    let stem = clean.file_stem().and_then(|s| s.to_str()).unwrap_or("comments");
    clean.with_file_name(format!("{}_sentiment.csv", stem))
}

/// Pretty JSON array, UTF-8 with non-ASCII kept as-is.
pub fn save_raw(records: &[CommentRecord], path: &Path) -> Result<()> {
    write_atomic(path, |f| {
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, records)?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    })?;
    tracing::info!("Raw data saved to {}", path.display());
    Ok(())
}

pub fn load_raw(path: &Path) -> Result<Vec<CommentRecord>> {
    let r = open_buffered(path)?;
    serde_json::from_reader(r).with_context(|| format!("parse raw dump {}", path.display()))
}

pub fn save_clean_csv(records: &[NormalizedRecord], path: &Path) -> Result<()> {
    write_csv(records, &NORMALIZED_COLUMNS, path)?;
    tracing::info!("Clean data saved to {}", path.display());
    Ok(())
}

pub fn save_sentiment_csv(records: &[ClassifiedRecord], path: &Path) -> Result<()> {
    write_csv(records, &CLASSIFIED_COLUMNS, path)?;
    tracing::info!("Results saved to {}", path.display());
    Ok(())
}

/// Header row is always written, so an empty batch still yields a valid table.
fn write_csv<T: Serialize>(records: &[T], header: &[&str], path: &Path) -> Result<()> {
    write_atomic(path, |f| {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(BufWriter::new(f));
        wtr.write_record(header)?;
        for r in records {
            wtr.serialize(r)?;
        }
        wtr.flush()?;
        Ok(())
    })
}

/// Write all three artifacts of `run` under the configured data dir.
pub fn save_run(opts: &PipelineOptions, run: &PipelineRun) -> Result<ArtifactPaths> {
    let paths = ArtifactPaths::under(opts);
    save_raw(&run.raw, &paths.raw)?;
    save_clean_csv(&run.normalized, &paths.clean)?;
    save_sentiment_csv(&run.records, &paths.sentiment)?;
    Ok(paths)
}
