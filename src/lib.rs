mod config;
mod error;
mod model;
mod batch;
mod retry;

mod youtube;
mod fetcher;
mod normalizer;
mod lexicon;
mod classifier;
mod pipeline;

mod cache;
mod export;
mod report;
mod workflow;
mod ident;

mod progress;
mod util;

pub use crate::config::{PipelineOptions, API_KEY_ENV, DEFAULT_API_BASE};
pub use crate::error::PipelineError;
pub use crate::model::{ClassifiedRecord, CommentRecord, NormalizedRecord, Sentiment, VideoRef, CLASSIFIED_COLUMNS, NORMALIZED_COLUMNS};
pub use crate::batch::{Batch, Row, COMMENT_COLUMNS};
pub use crate::retry::{Backoff, RetryPolicy};

pub use crate::youtube::{CommentPage, CommentSource, PlaylistPage, YouTubeApi};
pub use crate::fetcher::Fetcher;
pub use crate::normalizer::{TextNormalizer, CLEAN_TEXT_COLUMN, TEXT_COLUMN};
pub use crate::lexicon::Lexicon;
pub use crate::classifier::{
    summarize, Classifier, FnScorer, LabelStat, LexiconScorer, PolarityScorer, Summary, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD,
};
pub use crate::pipeline::{CommentPipeline, PipelineRun, Target};

// artifacts, cache and the orchestrated flow
pub use crate::cache::RawCache;
pub use crate::export::{load_raw, save_clean_csv, save_raw, save_run, save_sentiment_csv, sentiment_path_for, ArtifactPaths};
pub use crate::report::{markdown_report, summary_table, write_report};
pub use crate::workflow::{run_video_flow, FlowOutcome, ANALYZED_FILE, FLOW_NAME};
pub use crate::ident::extract_video_id;

pub use crate::util::init_tracing_once;
