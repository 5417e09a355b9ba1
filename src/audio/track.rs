use serde::{Deserialize, Serialize};

const TITLE_DISPLAY_LIMIT: usize = 50;

/// A playable item handed out by the resolver. Identity is the `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub duration: Option<u64>, // seconds
}

impl Track {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Option<u64>) -> Self {
        self.duration = duration;
        self
    }

    pub fn same_source(&self, other: &Track) -> bool {
        self.url == other.url
    }

    /// Title cut down for the one-line progress display
    pub fn display_title(&self) -> String {
        if self.title.chars().count() > TITLE_DISPLAY_LIMIT {
            let cut: String = self.title.chars().take(TITLE_DISPLAY_LIMIT).collect();
            format!("{}...", cut)
        } else {
            self.title.clone()
        }
    }

    pub fn duration_string(&self) -> String {
        match self.duration {
            Some(secs) => format_duration(secs),
            None => "--:--".to_string(),
        }
    }
}

pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_titles_are_truncated() {
        let track = Track::new("x".repeat(80), "https://example.com/a");
        let shown = track.display_title();
        assert_eq!(shown.chars().count(), 53);
        assert!(shown.ends_with("..."));

        let short = Track::new("Short", "https://example.com/b");
        assert_eq!(short.display_title(), "Short");
    }

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(253), "04:13");
        assert_eq!(format_duration(3723), "1:02:03");
        assert_eq!(Track::new("a", "b").duration_string(), "--:--");
    }

    #[test]
    fn test_json_layout_uses_null_duration() {
        let track = Track::new("Song", "https://www.youtube.com/watch?v=abc");
        let json = serde_json::to_string(&track).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Song","url":"https://www.youtube.com/watch?v=abc","duration":null}"#
        );

        let parsed: Track = serde_json::from_str(r#"{"title":"S","url":"u"}"#).unwrap();
        assert_eq!(parsed.duration, None);
    }
}
