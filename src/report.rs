//! Human-readable renderings of a classified run.

use crate::classifier::Summary;
use crate::config::PipelineOptions;
use crate::model::ClassifiedRecord;
use crate::util::write_atomic;
use anyhow::Result;
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Comments quoted in the Markdown report.
pub const SAMPLE_COMMENTS: usize = 5;
/// Characters kept from each quoted comment.
pub const SAMPLE_CHARS: usize = 100;

/// Per-label counts and percentages as a fixed-width table.
///
/// ```text
/// Sentiment  Total  Percentage (%)
/// Positive       2           66.67
/// Neutral        1           33.33
/// Negative       0            0.00
/// ```
pub fn summary_table(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<9}  {:>5}  {:>14}", "Sentiment", "Total", "Percentage (%)");
    for s in &summary.labels {
        let _ = writeln!(out, "{:<9}  {:>5}  {:>14.2}", s.label.as_str(), s.count, s.percentage);
    }
    out
}

/// Markdown analysis report: totals, label distribution and the first few comments.
pub fn markdown_report(video_id: &str, records: &[ClassifiedRecord], summary: &Summary) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# YouTube Comment Sentiment Report");
    let _ = writeln!(md);
    let _ = writeln!(md, "**Video ID:** `{}`", video_id);
    let _ = writeln!(md, "**Total comments:** {}", summary.total);
    let _ = writeln!(md);
    let _ = writeln!(md, "## Sentiment distribution");
    let _ = writeln!(md);
    let _ = writeln!(md, "| Sentiment | Count | Percentage |");
    let _ = writeln!(md, "|-----------|-------|------------|");
    for s in &summary.labels {
        let _ = writeln!(md, "| {} | {} | {:.1}% |", s.label, s.count, s.percentage);
    }
    let _ = writeln!(md);
    let _ = writeln!(md, "## First {} comments", SAMPLE_COMMENTS);
    let _ = writeln!(md);
    for r in records.iter().take(SAMPLE_COMMENTS) {
        let _ = writeln!(md, "- **[{}]** {}...", r.sentiment, truncate_chars(&r.clean_text, SAMPLE_CHARS));
    }
    md
}

/// Render the report for `video_id` into `reports/<video_id>.md` under the data dir.
pub fn write_report(opts: &PipelineOptions, video_id: &str, records: &[ClassifiedRecord], summary: &Summary) -> Result<PathBuf> {
    let path = opts.reports_dir().join(format!("{}.md", video_id));
    let stamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    let body = markdown_report(video_id, records, summary);
    write_atomic(&path, |f| {
        f.write_all(body.as_bytes())?;
        if !stamp.is_empty() {
            writeln!(f, "\n_Generated {}_", stamp)?;
        }
        Ok(())
    })?;
    tracing::info!("Report written to {}", path.display());
    Ok(path)
}

fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sentiment;

    fn rec(clean: &str, sentiment: Sentiment) -> ClassifiedRecord {
        ClassifiedRecord {
            author: "a".into(),
            text: clean.into(),
            clean_text: clean.into(),
            sentiment,
            polarity: 0.0,
            like_count: 0,
            published_at: String::new(),
            video_id: "vid".into(),
        }
    }

    #[test]
    fn table_lists_every_label() {
        let summary = Summary::from_labels([Sentiment::Positive, Sentiment::Positive, Sentiment::Neutral]);
        let table = summary_table(&summary);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Total") && lines[0].contains("Percentage (%)"));
        assert!(lines[1].starts_with("Positive") && lines[1].ends_with("66.67"));
        assert!(lines[2].starts_with("Neutral") && lines[2].ends_with("33.33"));
        assert!(lines[3].starts_with("Negative") && lines[3].ends_with("0.00"));
    }

    #[test]
    fn report_quotes_first_five_truncated() {
        let long = "é".repeat(150);
        let mut records = vec![rec(&long, Sentiment::Negative)];
        for i in 0..6 {
            records.push(rec(&format!("comment {i}"), Sentiment::Neutral));
        }
        let summary = Summary::from_labels(records.iter().map(|r| r.sentiment));
        let md = markdown_report("abcdefghijk", &records, &summary);

        assert!(md.contains("**Video ID:** `abcdefghijk`"));
        assert!(md.contains("**Total comments:** 7"));
        assert!(md.contains("| Neutral | 6 | 85.7% |"));
        let quoted: Vec<&str> = md.lines().filter(|l| l.starts_with("- **[")).collect();
        assert_eq!(quoted.len(), 5);
        assert_eq!(quoted[0], format!("- **[Negative]** {}...", "é".repeat(100)));
        assert_eq!(quoted[4], "- **[Neutral]** comment 3...");
    }

    #[test]
    fn write_report_lands_under_reports_dir() {
        let dir = tempfile::tempdir().unwrap();
        let opts = PipelineOptions::default().with_data_dir(dir.path());
        let records = vec![rec("great", Sentiment::Positive)];
        let summary = Summary::from_labels([Sentiment::Positive]);
        let path = write_report(&opts, "vid", &records, &summary).unwrap();
        assert_eq!(path, dir.path().join("reports").join("vid.md"));
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.contains("- **[Positive]** great..."));
    }
}
