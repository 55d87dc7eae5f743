//! Record shapes flowing through the pipeline: raw -> normalized -> classified.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One top-level comment as returned by the fetcher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default)]
    pub author: String,
    /// Missing on a few platform records (and on hand-edited dumps); such rows are dropped downstream.
    pub text: Option<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub published_at: String,
    pub video_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub author: String,
    pub text: String,
    pub like_count: u64,
    pub published_at: String,
    pub video_id: String,
    pub clean_text: String,
}

/// Column order of a normalized batch.
pub const NORMALIZED_COLUMNS: [&str; 6] = ["author", "text", "like_count", "published_at", "video_id", "clean_text"];

/// Output row. Field order is the exported column order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub author: String,
    pub text: String,
    pub clean_text: String,
    pub sentiment: Sentiment,
    pub polarity: f64,
    pub like_count: u64,
    pub published_at: String,
    pub video_id: String,
}

/// Exported column order of a classified batch.
pub const CLASSIFIED_COLUMNS: [&str; 8] = [
    "author", "text", "clean_text", "sentiment", "polarity", "like_count", "published_at", "video_id",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Sentiment::Positive),
            "Neutral" => Ok(Sentiment::Neutral),
            "Negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment label '{other}'")),
        }
    }
}

/// A video taken from a channel's uploads listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    pub video_id: String,
    pub title: String,
    pub published_at: String,
}
