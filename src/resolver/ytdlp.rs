use super::ResolvedStream;
use crate::error::{StreamError, StreamResult};
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Direct audio stream lookup through the yt-dlp binary
pub struct YtDlp {
    binary: String,
}

impl YtDlp {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }

    pub async fn resolve(&self, url: &str) -> StreamResult<ResolvedStream> {
        let output = Command::new(&self.binary)
            .args(["-f", "bestaudio", "-j", "--no-playlist", "--no-warnings"])
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                StreamError::resolution(url, format!("could not run {}: {}", self.binary, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("yt-dlp failed")
                .trim()
                .to_string();
            return Err(StreamError::resolution(url, reason));
        }

        let stream = parse_ytdlp_json(url, &String::from_utf8_lossy(&output.stdout))?;
        debug!("yt-dlp resolved '{}' to a direct stream", stream.title);
        Ok(stream)
    }
}

/// First JSON line of `yt-dlp -j` output
pub fn parse_ytdlp_json(url: &str, raw: &str) -> StreamResult<ResolvedStream> {
    let line = raw
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| StreamError::resolution(url, "yt-dlp printed nothing"))?;

    let value: Value =
        serde_json::from_str(line).map_err(|e| StreamError::resolution(url, e))?;

    let stream_url = value["url"]
        .as_str()
        .ok_or_else(|| StreamError::resolution(url, "no stream url in yt-dlp output"))?;

    Ok(ResolvedStream {
        stream_url: stream_url.to_string(),
        title: value["title"].as_str().unwrap_or(url).to_string(),
        duration: value["duration"]
            .as_f64()
            .filter(|secs| *secs > 0.0)
            .map(|secs| secs.round() as u64),
        artist: value["artist"]
            .as_str()
            .or_else(|| value["uploader"].as_str())
            .map(str::to_string),
    })
}
