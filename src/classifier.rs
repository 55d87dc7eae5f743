//! Polarity scoring, fixed-threshold labelling, and per-label aggregation.

use crate::batch::Batch;
use crate::error::PipelineError;
use crate::lexicon::Lexicon;
use crate::model::{ClassifiedRecord, NormalizedRecord, Sentiment};
use regex::Regex;
use serde::Serialize;
use serde_json::{Number, Value};

/// Strictly above this is `Positive`.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Strictly below this is `Negative`.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Extra magnitude per trailing '!' after a scored word, at most three counted.
const EXCLAMATION_BOOST: f64 = 1.25;
const MAX_EXCLAMATIONS: i32 = 3;

impl Sentiment {
    /// `p > 0.05` is Positive, `p < -0.05` is Negative, anything else (including both bounds and NaN) is Neutral.
    pub fn from_polarity(p: f64) -> Self {
        if p > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if p < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Maps text to a polarity in [-1.0, 1.0]. Empty text must score 0.0.
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> f64;
}

/// Adapts a plain function or closure into a scorer.
pub struct FnScorer<F>(pub F);

impl<F: Fn(&str) -> f64> PolarityScorer for FnScorer<F> {
    fn polarity(&self, text: &str) -> f64 {
        (self.0)(text)
    }
}

/// Rule-based scorer: averages the scores of lexicon words found in the text, after
/// applying intensifiers, negations and exclamation emphasis to each.
#[derive(Clone, Debug)]
pub struct LexiconScorer {
    lexicon: Lexicon,
    token: Regex,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(Lexicon::english())
    }
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon, token: Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}]+)*|!").expect("token pattern") }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<String> = self.token.find_iter(&lowered).map(|m| m.as_str().replace('’', "'")).collect();

        let mut scores: Vec<f64> = Vec::new();
        let mut intensity = 1.0f64;
        let mut negated = false;

        let mut i = 0;
        while i < tokens.len() {
            let tok = tokens[i].as_str();
            if let Some(p) = self.lexicon.polarity(tok) {
                let mut s = p * intensity;
                if negated {
                    s *= -0.5;
                }
                let bangs = tokens[i + 1..]
                    .iter()
                    .take_while(|t| self.lexicon.polarity(t).is_none())
                    .filter(|t| t.as_str() == "!")
                    .count() as i32;
                s *= EXCLAMATION_BOOST.powi(bangs.min(MAX_EXCLAMATIONS));
                scores.push(s.clamp(-1.0, 1.0));
                intensity = 1.0;
                negated = false;
            } else if let Some(k) = self.lexicon.intensity(tok) {
                intensity *= k;
            } else if self.lexicon.is_negation(tok) {
                negated = true;
            } else if !matches!(tok, "a" | "an" | "the" | "this" | "that" | "it" | "be" | "is" | "was" | "!") {
                intensity = 1.0;
                negated = false;
            }
            i += 1;
        }

        if scores.is_empty() {
            return 0.0;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        if mean.is_finite() { mean.clamp(-1.0, 1.0) } else { 0.0 }
    }
}

/// Adds `sentiment` and `polarity` to every row; never filters.
pub struct Classifier<S = LexiconScorer> {
    scorer: S,
}

impl Default for Classifier<LexiconScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier<LexiconScorer> {
    pub fn new() -> Self {
        Self { scorer: LexiconScorer::default() }
    }
}

impl<S: PolarityScorer> Classifier<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer }
    }

    /// Polarity (clamped, NaN as 0.0) and its label.
    pub fn score(&self, text: &str) -> (f64, Sentiment) {
        let p = self.scorer.polarity(text);
        let p = if p.is_nan() { 0.0 } else { p.clamp(-1.0, 1.0) };
        (p, Sentiment::from_polarity(p))
    }

    /// Score `text_field` of every row. Row count and order are unchanged.
    /// A non-string cell scores as empty text. Fails if the batch has no `text_field` column.
    pub fn classify_batch(&self, mut batch: Batch, text_field: &str) -> Result<Batch, PipelineError> {
        batch.require_column(text_field, "classify_batch")?;
        batch.add_column("sentiment");
        batch.add_column("polarity");

        for row in batch.rows_mut().iter_mut() {
            let text = row.get(text_field).and_then(Value::as_str).unwrap_or("");
            let (p, label) = self.score(text);
            row.insert("sentiment".to_string(), Value::String(label.as_str().to_string()));
            row.insert("polarity".to_string(), Number::from_f64(p).map(Value::Number).unwrap_or(Value::Null));
        }
        tracing::debug!("classify_batch: {} rows scored on '{}'", batch.len(), text_field);
        Ok(batch)
    }

    /// Typed path, scoring `clean_text`.
    pub fn classify_records(&self, records: Vec<NormalizedRecord>) -> Vec<ClassifiedRecord> {
        records
            .into_iter()
            .map(|r| {
                let (polarity, sentiment) = self.score(&r.clean_text);
                ClassifiedRecord {
                    author: r.author,
                    text: r.text,
                    clean_text: r.clean_text,
                    sentiment,
                    polarity,
                    like_count: r.like_count,
                    published_at: r.published_at,
                    video_id: r.video_id,
                }
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelStat {
    pub label: Sentiment,
    pub count: usize,
    /// Share of the batch in percent, rounded half away from zero to 2 decimals.
    pub percentage: f64,
}

/// Per-label counts and percentages, always listing Positive, Neutral, Negative in that order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub labels: Vec<LabelStat>,
}

impl Summary {
    pub fn from_labels<I: IntoIterator<Item = Sentiment>>(labels: I) -> Self {
        let mut counts = [0usize; 3];
        for l in labels {
            counts[label_index(l)] += 1;
        }
        let total: usize = counts.iter().sum();
        let labels = Sentiment::ALL
            .iter()
            .map(|l| {
                let count = counts[label_index(*l)];
                let percentage = if total == 0 { 0.0 } else { round2(count as f64 * 100.0 / total as f64) };
                LabelStat { label: *l, count, percentage }
            })
            .collect();
        Summary { total, labels }
    }

    pub fn get(&self, label: Sentiment) -> Option<&LabelStat> {
        self.labels.iter().find(|s| s.label == label)
    }

    pub fn count(&self, label: Sentiment) -> usize {
        self.get(label).map(|s| s.count).unwrap_or(0)
    }

    pub fn percentage(&self, label: Sentiment) -> f64 {
        self.get(label).map(|s| s.percentage).unwrap_or(0.0)
    }
}

impl Default for Summary {
    fn default() -> Self {
        Summary::from_labels(std::iter::empty())
    }
}

pub fn summarize(records: &[ClassifiedRecord]) -> Summary {
    Summary::from_labels(records.iter().map(|r| r.sentiment))
}

fn label_index(l: Sentiment) -> usize {
    match l {
        Sentiment::Positive => 0,
        Sentiment::Neutral => 1,
        Sentiment::Negative => 2,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(Sentiment::from_polarity(0.05), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.05), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(0.0500001), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(-0.0500001), Sentiment::Negative);
        assert_eq!(Sentiment::from_polarity(1.0), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(-1.0), Sentiment::Negative);
        assert_eq!(Sentiment::from_polarity(f64::NAN), Sentiment::Neutral);
    }

    #[test]
    fn loved_clean_text_is_positive() {
        let (p, label) = Classifier::new().score("i love this!!!");
        assert!(p > 0.05, "polarity {p}");
        assert!(p <= 1.0);
        assert_eq!(label, Sentiment::Positive);
    }

    #[test]
    fn empty_text_is_neutral_zero() {
        assert_eq!(Classifier::new().score(""), (0.0, Sentiment::Neutral));
    }

    #[test]
    fn negation_and_intensifiers() {
        let s = LexiconScorer::default();
        assert!(s.polarity("this video is terrible") < -0.05);
        assert!(s.polarity("not good") < 0.0);
        assert!(s.polarity("very good") > s.polarity("good"));
        assert!(s.polarity("isn't bad") > 0.0);
        assert_eq!(s.polarity("the video was uploaded today"), 0.0);
    }

    #[test]
    fn polarity_stays_in_range() {
        let s = LexiconScorer::default();
        for t in ["super extremely incredibly awesome!!!!!!", "absolutely totally pathetic!!!", "best best best"] {
            let p = s.polarity(t);
            assert!((-1.0..=1.0).contains(&p), "{t}: {p}");
        }
    }

    #[test]
    fn classify_batch_appends_columns_without_filtering() {
        let batch = Batch::from_values(vec![
            json!({"clean_text": "great stuff"}),
            json!({"clean_text": ""}),
            json!({"clean_text": 5}),
        ]);
        let out = Classifier::new().classify_batch(batch, "clean_text").unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.has_column("sentiment") && out.has_column("polarity"));
        assert_eq!(out.rows()[0]["sentiment"], json!("Positive"));
        assert_eq!(out.rows()[1]["sentiment"], json!("Neutral"));
        assert_eq!(out.rows()[1]["polarity"], json!(0.0));
        assert_eq!(out.rows()[2]["sentiment"], json!("Neutral"));
    }

    #[test]
    fn classify_batch_requires_text_field() {
        let batch = Batch::from_values(vec![json!({"text": "hi"})]);
        let err = Classifier::new().classify_batch(batch, "clean_text").unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }

    #[test]
    fn custom_scorer_via_closure() {
        let c = Classifier::with_scorer(FnScorer(|t: &str| if t.contains("yay") { 0.9 } else { -0.9 }));
        assert_eq!(c.score("yay").1, Sentiment::Positive);
        assert_eq!(c.score("nay").1, Sentiment::Negative);
    }

    #[test]
    fn summary_counts_and_rounding() {
        use Sentiment::*;
        let s = Summary::from_labels([Positive, Positive, Neutral]);
        assert_eq!(s.total, 3);
        assert_eq!(s.count(Positive), 2);
        assert_eq!(s.count(Negative), 0);
        assert_eq!(s.percentage(Positive), 66.67);
        assert_eq!(s.percentage(Neutral), 33.33);
        assert_eq!(s.percentage(Negative), 0.0);
        assert_eq!(s.labels.iter().map(|l| l.count).sum::<usize>(), s.total);

        let empty = Summary::from_labels(Vec::<Sentiment>::new());
        assert_eq!(empty.total, 0);
        assert!(empty.labels.iter().all(|l| l.percentage == 0.0));
    }
}
