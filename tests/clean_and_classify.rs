#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::json;
use yt_sentiment::{
    Batch, Classifier, CommentPipeline, PipelineError, Sentiment, TextNormalizer, CLEAN_TEXT_COLUMN,
};

#[test]
fn cleaning_drops_null_empty_and_duplicate_rows() {
    let mut batch = raw_batch(&[
        Some("Great video! https://youtu.be/x"),
        None,
        Some("@someone 😀"),
        Some("   "),
        Some("Second comment"),
    ]);
    // exact duplicate of the first row
    let dup = batch.rows()[0].clone();
    batch.push_row(dup);

    let out = TextNormalizer::new().clean_batch(batch).unwrap();
    let clean: Vec<&str> = out.rows().iter().map(|r| r[CLEAN_TEXT_COLUMN].as_str().unwrap()).collect();
    assert_eq!(clean, vec!["great video!", "second comment"]);
    assert_eq!(out.columns().last().map(String::as_str), Some(CLEAN_TEXT_COLUMN));
}

#[test]
fn reprocessing_a_cleaned_batch_is_stable() {
    let normalizer = TextNormalizer::new();
    let once = normalizer
        .clean_batch(raw_batch(&[Some("Hola @ana!! http://t.co/x 🎉"), Some("WOW   so\ngood")]))
        .unwrap();
    for row in once.rows() {
        let clean = row[CLEAN_TEXT_COLUMN].as_str().unwrap();
        assert_eq!(normalizer.normalize(clean), clean);
    }
    let twice = normalizer.clean_batch(once.clone()).unwrap();
    assert_eq!(twice.rows(), once.rows());
}

#[test]
fn classifier_keeps_every_row_and_labels_sum_up() {
    let batch = Batch::from_values(vec![
        json!({"text": "x", "clean_text": "i love this!!!"}),
        json!({"text": "x", "clean_text": "worst video ever"}),
        json!({"text": "x", "clean_text": "it is a video"}),
        json!({"text": "x", "clean_text": 12}),
    ]);
    let out = Classifier::new().classify_batch(batch, CLEAN_TEXT_COLUMN).unwrap();
    assert_eq!(out.len(), 4);

    let labels: Vec<Sentiment> = out.rows().iter().map(|r| r["sentiment"].as_str().unwrap().parse().unwrap()).collect();
    assert_eq!(labels, vec![Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral, Sentiment::Neutral]);
    for r in out.rows() {
        let p = r["polarity"].as_f64().unwrap();
        assert!((-1.0..=1.0).contains(&p));
    }

    let summary = yt_sentiment::Summary::from_labels(labels);
    let counted: usize = summary.labels.iter().map(|s| s.count).sum();
    assert_eq!(counted, out.len());
}

#[test]
fn contract_errors_name_the_column() {
    let err = Classifier::new().classify_batch(raw_batch(&[Some("hi")]), CLEAN_TEXT_COLUMN).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn { ref column, .. } if column == CLEAN_TEXT_COLUMN));
}

#[test]
fn empty_input_gives_empty_run() {
    let run = CommentPipeline::new().process(Vec::new()).unwrap();
    assert!(run.is_empty());
    assert_eq!(run.summary.total, 0);
    assert_eq!(run.summary.percentage(Sentiment::Positive), 0.0);
}

#[test]
fn tabular_and_typed_paths_agree() {
    let raw = vec![
        comment("vid", "a", "This is AMAZING!"),
        comment("vid", "b", "not good at all"),
        comment("vid", "c", "https://only.a/link"),
    ];
    let pipeline = CommentPipeline::new();
    let run = pipeline.process(raw.clone()).unwrap();
    let table = pipeline.process_batch(Batch::from_comments(&raw)).unwrap();

    assert_eq!(table.len(), run.records.len());
    for (row, rec) in table.rows().iter().zip(&run.records) {
        assert_eq!(row["clean_text"], json!(rec.clean_text));
        assert_eq!(row["sentiment"], json!(rec.sentiment.as_str()));
    }
    assert_eq!(run.records[0].sentiment, Sentiment::Positive);
    assert_eq!(run.records[1].sentiment, Sentiment::Negative);
}
