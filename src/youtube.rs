//! Platform access: the listing capabilities the fetcher consumes, and a blocking
//! HTTP implementation against the YouTube Data API v3.

use crate::config::PipelineOptions;
use crate::error::PipelineError;
use crate::model::{CommentRecord, VideoRef};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One page of top-level comments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommentPage {
    pub comments: Vec<CommentRecord>,
    pub next_page_token: Option<String>,
}

/// One page of a channel's uploads, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaylistPage {
    pub videos: Vec<VideoRef>,
    pub next_page_token: Option<String>,
}

/// Paginated listings the fetcher is built on. Implemented over HTTP by [`YouTubeApi`];
/// tests substitute scripted sources.
pub trait CommentSource {
    fn comment_threads(&self, video_id: &str, page_token: Option<&str>, page_size: u32) -> Result<CommentPage, PipelineError>;

    /// Uploads playlist of a channel, or `None` when the channel does not resolve.
    fn uploads_playlist(&self, channel_id: &str) -> Result<Option<String>, PipelineError>;

    fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>, page_size: u32) -> Result<PlaylistPage, PipelineError>;
}

impl<S: CommentSource + ?Sized> CommentSource for &S {
    fn comment_threads(&self, video_id: &str, page_token: Option<&str>, page_size: u32) -> Result<CommentPage, PipelineError> {
        (**self).comment_threads(video_id, page_token, page_size)
    }
    fn uploads_playlist(&self, channel_id: &str) -> Result<Option<String>, PipelineError> {
        (**self).uploads_playlist(channel_id)
    }
    fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>, page_size: u32) -> Result<PlaylistPage, PipelineError> {
        (**self).playlist_items(playlist_id, page_token, page_size)
    }
}

pub struct YouTubeApi {
    client: Client,
    base: String,
    key: String,
}

impl YouTubeApi {
    /// Fails with [`PipelineError::MissingCredential`] when no API key is configured.
    pub fn new(opts: &PipelineOptions) -> Result<Self, PipelineError> {
        let key = opts
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(PipelineError::MissingCredential)?
            .to_string();
        let client = Client::builder()
            .timeout(opts.request_timeout)
            .user_agent(concat!("yt-sentiment/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::Transport(e.to_string()))?;
        Ok(Self { client, base: opts.api_base.trim_end_matches('/').to_string(), key })
    }

    fn get<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T, PipelineError> {
        let url = format!("{}/{}", self.base, resource);
        tracing::debug!("GET {} {:?}", url, params);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.key.as_str())])
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        decode(&body)
    }
}

impl CommentSource for YouTubeApi {
    fn comment_threads(&self, video_id: &str, page_token: Option<&str>, page_size: u32) -> Result<CommentPage, PipelineError> {
        let size = page_size.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", size.as_str()),
            ("textFormat", "plainText"),
        ];
        if let Some(t) = page_token {
            params.push(("pageToken", t));
        }
        let wire: wire::CommentThreadList = self.get("commentThreads", &params)?;
        Ok(wire.into_page(video_id))
    }

    fn uploads_playlist(&self, channel_id: &str) -> Result<Option<String>, PipelineError> {
        let wire: wire::ChannelList = self.get("channels", &[("part", "contentDetails"), ("id", channel_id)])?;
        Ok(wire.uploads())
    }

    fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>, page_size: u32) -> Result<PlaylistPage, PipelineError> {
        let size = page_size.to_string();
        let mut params = vec![("part", "snippet"), ("playlistId", playlist_id), ("maxResults", size.as_str())];
        if let Some(t) = page_token {
            params.push(("pageToken", t));
        }
        let wire: wire::PlaylistItemList = self.get("playlistItems", &params)?;
        Ok(wire.into_page())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, PipelineError> {
    serde_json::from_str(body).map_err(|e| PipelineError::Decode(e.to_string()))
}

/// Map an error response to `Api`, preferring the platform's own message.
fn api_error(status: u16, body: &str) -> PipelineError {
    let reason = serde_json::from_str::<wire::ErrorEnvelope>(body)
        .ok()
        .map(|env| match env.error.errors.first().and_then(|e| e.reason.clone()) {
            Some(r) => format!("{} ({})", env.error.message, r),
            None => env.error.message,
        })
        .unwrap_or_else(|| body.chars().take(200).collect());
    PipelineError::Api { status, reason }
}

/// Response bodies, reduced to the fields the pipeline reads.
mod wire {
    use super::*;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CommentThreadList {
        pub next_page_token: Option<String>,
        #[serde(default)]
        pub items: Vec<CommentThread>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CommentThread {
        pub snippet: ThreadSnippet,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ThreadSnippet {
        pub top_level_comment: TopLevelComment,
    }

    #[derive(Deserialize)]
    pub struct TopLevelComment {
        pub snippet: CommentSnippet,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CommentSnippet {
        #[serde(default)]
        pub author_display_name: String,
        pub text_display: Option<String>,
        #[serde(default)]
        pub like_count: u64,
        #[serde(default)]
        pub published_at: String,
    }

    impl CommentThreadList {
        pub fn into_page(self, video_id: &str) -> CommentPage {
            let comments = self
                .items
                .into_iter()
                .map(|t| {
                    let s = t.snippet.top_level_comment.snippet;
                    CommentRecord {
                        author: s.author_display_name,
                        text: s.text_display,
                        like_count: s.like_count,
                        published_at: s.published_at,
                        video_id: video_id.to_string(),
                    }
                })
                .collect();
            CommentPage {
                comments,
                next_page_token: self.next_page_token.filter(|t| !t.is_empty()),
            }
        }
    }

    #[derive(Deserialize)]
    pub struct ChannelList {
        #[serde(default)]
        pub items: Vec<Channel>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Channel {
        pub content_details: Option<ContentDetails>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContentDetails {
        pub related_playlists: RelatedPlaylists,
    }

    #[derive(Deserialize)]
    pub struct RelatedPlaylists {
        pub uploads: Option<String>,
    }

    impl ChannelList {
        pub fn uploads(self) -> Option<String> {
            self.items
                .into_iter()
                .next()
                .and_then(|c| c.content_details)
                .and_then(|d| d.related_playlists.uploads)
        }
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PlaylistItemList {
        pub next_page_token: Option<String>,
        #[serde(default)]
        pub items: Vec<PlaylistItem>,
    }

    #[derive(Deserialize)]
    pub struct PlaylistItem {
        pub snippet: PlaylistSnippet,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PlaylistSnippet {
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub published_at: String,
        pub resource_id: ResourceId,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResourceId {
        pub video_id: Option<String>,
    }

    impl PlaylistItemList {
        pub fn into_page(self) -> PlaylistPage {
            let videos = self
                .items
                .into_iter()
                .filter_map(|it| {
                    let s = it.snippet;
                    s.resource_id.video_id.map(|video_id| VideoRef { video_id, title: s.title, published_at: s.published_at })
                })
                .collect();
            PlaylistPage { videos, next_page_token: self.next_page_token.filter(|t| !t.is_empty()) }
        }
    }

    #[derive(Deserialize)]
    pub struct ErrorEnvelope {
        pub error: ErrorBody,
    }

    #[derive(Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub errors: Vec<ErrorItem>,
    }

    #[derive(Deserialize)]
    pub struct ErrorItem {
        pub reason: Option<String>,
    }
}
