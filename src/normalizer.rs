//! Batch cleaning: exact-duplicate removal, null-text removal, text normalization,
//! and eviction of rows whose normalized text ends up empty.

use crate::batch::Batch;
use crate::error::PipelineError;
use crate::model::{CommentRecord, NormalizedRecord};
use ahash::AHashSet;
use regex::Regex;
use serde_json::Value;

pub const TEXT_COLUMN: &str = "text";
pub const CLEAN_TEXT_COLUMN: &str = "clean_text";

/// Compiled patterns for comment text normalization. Build once per run and reuse.
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    url: Regex,
    mention: Regex,
    emoji: Regex,
    whitespace: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            url: Regex::new(r"http\S+|www\S+").expect("url pattern"),
            mention: Regex::new(r"@\w+").expect("mention pattern"),
            // Whole keycap sequences first, then pictographs plus the joiners, selectors,
            // skin tones and flag letters that glue multi-codepoint emoji together.
            emoji: Regex::new(
                r"[0-9#*]\x{FE0F}?\x{20E3}|[\p{Extended_Pictographic}\x{1F3FB}-\x{1F3FF}\x{1F1E6}-\x{1F1FF}\x{200D}\x{20E3}\x{FE0E}\x{FE0F}\x{E0020}-\x{E007F}]",
            )
            .expect("emoji pattern"),
            whitespace: Regex::new(r"\s+").expect("whitespace pattern"),
        }
    }

    /// Lower-case, strip emoji, URLs and @mentions, collapse whitespace, trim.
    ///
    /// Emoji go first so that removing one can never splice a new URL or mention
    /// together; this keeps `normalize(normalize(s)) == normalize(s)`.
    pub fn normalize(&self, text: &str) -> String {
        let s = text.to_lowercase();
        let s = self.emoji.replace_all(&s, "");
        let s = self.url.replace_all(&s, "");
        let s = self.mention.replace_all(&s, "");
        let s = self.whitespace.replace_all(&s, " ");
        s.trim().to_string()
    }

    /// Non-string cells normalize to the empty string.
    pub fn normalize_value(&self, v: &Value) -> String {
        match v {
            Value::String(s) => self.normalize(s),
            _ => String::new(),
        }
    }

    /// Clean a raw batch. Steps, each over the whole batch:
    /// 1. drop exact duplicate rows (all columns equal), keeping the first;
    /// 2. drop rows with a missing or null `text`;
    /// 3. add `clean_text`;
    /// 4. drop rows whose `clean_text` is empty.
    ///
    /// Surviving rows keep their input order. A batch without a `text` column is a
    /// caller error and fails with [`PipelineError::MissingColumn`].
    pub fn clean_batch(&self, mut batch: Batch) -> Result<Batch, PipelineError> {
        batch.require_column(TEXT_COLUMN, "clean_batch")?;
        let n_in = batch.len();

        let mut seen: AHashSet<String> = AHashSet::with_capacity(n_in);
        let keys: Vec<String> = batch.rows().iter().map(|r| batch.row_key(r)).collect();
        let mut keys = keys.into_iter();
        batch.retain_rows(|_| keys.next().map(|k| seen.insert(k)).unwrap_or(false));
        let n_unique = batch.len();

        batch.retain_rows(|row| !matches!(row.get(TEXT_COLUMN), None | Some(Value::Null)));

        batch.add_column(CLEAN_TEXT_COLUMN);
        for row in batch.rows_mut().iter_mut() {
            let clean = row.get(TEXT_COLUMN).map(|v| self.normalize_value(v)).unwrap_or_default();
            row.insert(CLEAN_TEXT_COLUMN.to_string(), Value::String(clean));
        }

        batch.retain_rows(|row| matches!(row.get(CLEAN_TEXT_COLUMN), Some(Value::String(s)) if !s.is_empty()));

        tracing::debug!(
            "clean_batch: {} in, {} after dedup, {} out",
            n_in,
            n_unique,
            batch.len()
        );
        Ok(batch)
    }

    /// Typed convenience over [`TextNormalizer::clean_batch`].
    pub fn clean_records(&self, records: &[CommentRecord]) -> Result<Vec<NormalizedRecord>, PipelineError> {
        self.clean_batch(Batch::from_comments(records))?.to_typed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn n(s: &str) -> String {
        TextNormalizer::new().normalize(s)
    }

    #[test]
    fn strips_urls_mentions_and_emoji() {
        assert_eq!(n("I LOVE this!!! http://x.co @bob 😀"), "i love this!!!");
        assert_eq!(n("see www.example.com/page now"), "see now");
        assert_eq!(n("https://a.b/c?d=e"), "");
        assert_eq!(n("👍🏽 ok 🇪🇸 👨‍👩‍👧"), "ok");
        assert_eq!(n("1\u{FE0F}\u{20E3} great #\u{FE0F}\u{20E3}"), "great");
        assert_eq!(n("top 3\u{20E3} *\u{FE0F}\u{20E3}"), "top");
        // plain digits and symbols stay
        assert_eq!(n("top 10 #1 *wow*"), "top 10 #1 *wow*");
    }

    #[test]
    fn collapses_newlines_and_spaces() {
        assert_eq!(n("  Line one\n\nLine\ttwo   "), "line one line two");
    }

    #[test]
    fn keeps_accents_and_punctuation() {
        assert_eq!(n("¡Qué BUEN vídeo!"), "¡qué buen vídeo!");
    }

    #[test]
    fn normalization_is_idempotent() {
        for s in ["@😀bob hi", "ww😀w.site.com x", "Hola @ana!! http://t.co/x 🎉🎉", "plain"] {
            let once = n(s);
            assert_eq!(n(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn non_string_text_is_empty() {
        let t = TextNormalizer::new();
        assert_eq!(t.normalize_value(&json!(42)), "");
        assert_eq!(t.normalize_value(&Value::Null), "");
    }

    #[test]
    fn missing_text_column_is_a_contract_error() {
        let batch = Batch::from_values(vec![json!({"author": "a"})]);
        let err = TextNormalizer::new().clean_batch(batch).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { ref column, .. } if column == "text"));
    }

    #[test]
    fn dedupe_happens_before_normalization() {
        // Different raw text, same normalized text: both survive.
        let batch = Batch::from_values(vec![
            json!({"author": "a", "text": "Nice!", "video_id": "v"}),
            json!({"author": "a", "text": "nice! 😀", "video_id": "v"}),
        ]);
        let out = TextNormalizer::new().clean_batch(batch).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.rows().iter().all(|r| r["clean_text"] == json!("nice!")));
    }
}
