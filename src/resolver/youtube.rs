use super::ytdlp::YtDlp;
use super::{ResolvedStream, Resolver};
use crate::audio::Track;
use crate::config::ResolverConfig;
use crate::error::{StreamError, StreamResult};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const MUSIC_CATEGORY: &str = "10";
const ISO8601_DURATION: &str = r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$";

pub enum StreamLookup {
    /// mpv gets the watch URL as-is
    Passthrough,
    YtDlp(YtDlp),
}

pub struct YoutubeResolver {
    client: reqwest::Client,
    api_key: Option<String>,
    streams: StreamLookup,
}

impl YoutubeResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        let streams = if config.resolve_streams {
            StreamLookup::YtDlp(YtDlp::new(&config.ytdlp_binary))
        } else {
            StreamLookup::Passthrough
        };

        Self {
            client,
            api_key: config.effective_api_key(),
            streams,
        }
    }

    async fn get_json(&self, url: &str, params: &[(&str, &str)]) -> reqwest::Result<Value> {
        self.client
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Search results carry no length, so ask the videos endpoint. Best effort.
    async fn fetch_durations(&self, key: &str, ids: &[String]) -> HashMap<String, u64> {
        let joined = ids.join(",");
        let params = [("part", "contentDetails"), ("id", joined.as_str()), ("key", key)];

        match self.get_json(VIDEOS_URL, &params).await {
            Ok(response) => parse_video_durations(&response),
            Err(e) => {
                warn!("Could not fetch durations: {}", e);
                HashMap::new()
            }
        }
    }
}

impl Resolver for YoutubeResolver {
    async fn search(&self, query: &str, max_results: usize) -> StreamResult<Vec<Track>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StreamError::resolution(query, "YOUTUBE_API_KEY not set"))?;

        let search_terms = format!("{} audio", query);
        let max = max_results.clamp(1, 50).to_string();
        let params = [
            ("part", "snippet"),
            ("q", search_terms.as_str()),
            ("type", "video"),
            ("maxResults", max.as_str()),
            ("key", key),
            ("videoCategoryId", MUSIC_CATEGORY),
            ("videoDuration", "medium"),
            ("order", "relevance"),
        ];

        let response = self
            .get_json(SEARCH_URL, &params)
            .await
            .map_err(|e| StreamError::resolution(query, e))?;

        let hits = parse_search_items(&response);
        if hits.is_empty() {
            return Err(StreamError::resolution(query, "no results found"));
        }
        debug!("Search '{}' returned {} hits", query, hits.len());

        let ids: Vec<String> = hits.iter().map(|(id, _)| id.clone()).collect();
        let durations = self.fetch_durations(key, &ids).await;

        Ok(hits
            .into_iter()
            .map(|(id, title)| {
                let duration = durations.get(&id).copied();
                Track::new(title, format!("{}{}", WATCH_URL, id)).with_duration(duration)
            })
            .collect())
    }

    async fn resolve_stream(&self, url: &str) -> StreamResult<ResolvedStream> {
        match &self.streams {
            StreamLookup::Passthrough => Ok(ResolvedStream::passthrough(url)),
            StreamLookup::YtDlp(ytdlp) => ytdlp.resolve(url).await,
        }
    }
}

/// (video id, title) pairs; items missing either are skipped
pub fn parse_search_items(response: &Value) -> Vec<(String, String)> {
    let Some(items) = response["items"].as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let id = item["id"]["videoId"].as_str()?;
            let title = item["snippet"]["title"].as_str()?;
            Some((id.to_string(), unescape_html(title)))
        })
        .collect()
}

pub fn parse_video_durations(response: &Value) -> HashMap<String, u64> {
    response["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let id = item["id"].as_str()?;
                    let raw = item["contentDetails"]["duration"].as_str()?;
                    Some((id.to_string(), parse_iso8601_duration(raw)?))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `PT4M13S` style durations. Zero (live streams report `P0D`) counts as unknown.
pub fn parse_iso8601_duration(raw: &str) -> Option<u64> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(ISO8601_DURATION).ok()).as_ref()?;

    let caps = pattern.captures(raw.trim())?;
    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let total = part(1) * 86_400 + part(2) * 3600 + part(3) * 60 + part(4);
    (total > 0).then_some(total)
}

/// The search API returns HTML-escaped titles
fn unescape_html(raw: &str) -> String {
    raw.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_items_skip_malformed_entries() {
        let response = json!({
            "items": [
                { "id": { "videoId": "abc" }, "snippet": { "title": "Rock &amp; Roll" } },
                { "id": { "kind": "youtube#channel" }, "snippet": { "title": "A channel" } },
                { "id": { "videoId": "def" } },
                { "id": { "videoId": "ghi" }, "snippet": { "title": "Don&#39;t Stop" } }
            ]
        });

        let hits = parse_search_items(&response);
        assert_eq!(
            hits,
            vec![
                ("abc".to_string(), "Rock & Roll".to_string()),
                ("ghi".to_string(), "Don't Stop".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_response_has_no_items() {
        let response = json!({ "error": { "code": 403, "message": "quota" } });
        assert!(parse_search_items(&response).is_empty());
        assert!(parse_video_durations(&response).is_empty());
    }

    #[test]
    fn test_iso8601_durations() {
        assert_eq!(parse_iso8601_duration("PT4M13S"), Some(253));
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723));
        assert_eq!(parse_iso8601_duration("PT45S"), Some(45));
        assert_eq!(parse_iso8601_duration("P1DT1S"), Some(86_401));
        assert_eq!(parse_iso8601_duration("P0D"), None);
        assert_eq!(parse_iso8601_duration("garbage"), None);
    }

    #[test]
    fn test_video_durations_by_id() {
        let response = json!({
            "items": [
                { "id": "abc", "contentDetails": { "duration": "PT3M" } },
                { "id": "live", "contentDetails": { "duration": "P0D" } }
            ]
        });
        let durations = parse_video_durations(&response);
        assert_eq!(durations.get("abc"), Some(&180));
        assert!(!durations.contains_key("live"));
    }

    #[tokio::test]
    async fn test_search_without_key_is_resolution_failure() {
        let resolver = YoutubeResolver {
            client: reqwest::Client::new(),
            api_key: None,
            streams: StreamLookup::Passthrough,
        };
        let err = resolver.search("anything", 1).await.unwrap_err();
        assert!(matches!(err, StreamError::Resolution { .. }));
    }

    #[tokio::test]
    async fn test_passthrough_keeps_watch_url() {
        let resolver = YoutubeResolver::new(&ResolverConfig::default());
        let stream = resolver
            .resolve_stream("https://www.youtube.com/watch?v=abc")
            .await
            .unwrap();
        assert_eq!(stream.stream_url, "https://www.youtube.com/watch?v=abc");
    }
}
