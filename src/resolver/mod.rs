// Resolver - turns search queries and watch URLs into something the audio process can play
// YouTube search for queries, yt-dlp (optional) for direct stream URLs

pub mod youtube;
pub mod ytdlp;

pub use youtube::YoutubeResolver;

use crate::audio::Track;
use crate::error::StreamResult;
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStream {
    pub stream_url: String,
    pub title: String,
    pub duration: Option<u64>,
    pub artist: Option<String>,
}

impl ResolvedStream {
    /// Hand the page URL straight to the player (mpv resolves it itself)
    pub fn passthrough(url: &str) -> Self {
        Self {
            stream_url: url.to_string(),
            title: url.to_string(),
            duration: None,
            artist: None,
        }
    }
}

pub trait Resolver: Send + Sync {
    /// Ordered best-match-first. An empty result is an error, not `Ok(vec![])`.
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = StreamResult<Vec<Track>>> + Send;

    fn resolve_stream(
        &self,
        url: &str,
    ) -> impl Future<Output = StreamResult<ResolvedStream>> + Send;
}
