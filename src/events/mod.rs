//! Tagged SEO events as they arrive on the generation stream.
//!
//! The backend emits one JSON object per line, shaped `{"type": ..., "data": ...}`.
//! Older frontends used `content` instead of `data`; both spellings are
//! accepted here and normalized to [`RawEvent::content`] so that nothing past
//! this module has to care. When a record carries both, `data` wins.
//!
//! [`SeoEvent::decode`] turns a [`RawEvent`] into a typed event, or explains
//! why it could not ([`EventError`]).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// One decoded line of the generation stream, before tag interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireEvent")]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub tag: String,
    pub content: Value,
}

/// The record as sent; both payload spellings are read independently so a
/// record carrying both is never rejected.
#[derive(Deserialize)]
struct WireEvent {
    #[serde(rename = "type", default)]
    tag: String,
    #[serde(default, deserialize_with = "present")]
    data: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    content: Option<Value>,
}

impl From<WireEvent> for RawEvent {
    fn from(wire: WireEvent) -> Self {
        Self {
            tag: wire.tag,
            content: wire.data.or(wire.content).unwrap_or(Value::Null),
        }
    }
}

/// `Some` whenever the key is present, including an explicit `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RawEvent {
    pub fn new(tag: impl Into<String>, content: Value) -> Self {
        Self {
            tag: tag.into(),
            content,
        }
    }
}

/// A related video returned by the backend's search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    /// Empty when the backend could not resolve a watch URL.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// The closed set of tags the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Titles,
    SelectedTitle,
    Description,
    Tags,
    Hashtags,
    Score,
    Analytics,
    TopVideos,
}

impl EventKind {
    /// Stream tag for "ranked related videos".
    pub const TOP_VIDEOS_TAG: &'static str = "top_videos";

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "titles" => Some(Self::Titles),
            "selected_title" => Some(Self::SelectedTitle),
            "description" => Some(Self::Description),
            "tags" => Some(Self::Tags),
            "hashtags" => Some(Self::Hashtags),
            // the generation service emits `seo_score`
            "score" | "seo_score" => Some(Self::Score),
            "analytics" => Some(Self::Analytics),
            Self::TOP_VIDEOS_TAG => Some(Self::TopVideos),
            _ => None,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Titles => "titles",
            Self::SelectedTitle => "selected_title",
            Self::Description => "description",
            Self::Tags => "tags",
            Self::Hashtags => "hashtags",
            Self::Score => "score",
            Self::Analytics => "analytics",
            Self::TopVideos => Self::TOP_VIDEOS_TAG,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

// ---------------------------------------------------------------------------
// Typed events
// ---------------------------------------------------------------------------

/// Payload of a `top_videos` event.
///
/// Mid-conversation events carry the search keyword and expect the client to
/// run the lookup itself; the generation stream carries the finished list.
#[derive(Debug, Clone, PartialEq)]
pub enum TopVideosPayload {
    Keyword(String),
    Videos(Vec<VideoRef>),
}

/// A recognized event with its payload decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum SeoEvent {
    Titles(Vec<String>),
    SelectedTitle(String),
    Description(String),
    Tags(Vec<String>),
    Hashtags(Vec<String>),
    Score(String),
    Analytics(String),
    TopVideos(TopVideosPayload),
}

/// Why a [`RawEvent`] did not become a [`SeoEvent`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("unrecognized event type '{0}'")]
    Unrecognized(String),
    #[error("event '{tag}' has an unexpected payload: {reason}")]
    Payload { tag: String, reason: String },
}

impl SeoEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Titles(_) => EventKind::Titles,
            Self::SelectedTitle(_) => EventKind::SelectedTitle,
            Self::Description(_) => EventKind::Description,
            Self::Tags(_) => EventKind::Tags,
            Self::Hashtags(_) => EventKind::Hashtags,
            Self::Score(_) => EventKind::Score,
            Self::Analytics(_) => EventKind::Analytics,
            Self::TopVideos(_) => EventKind::TopVideos,
        }
    }

    /// Interpret a raw event according to its tag.
    pub fn decode(raw: &RawEvent) -> Result<Self, EventError> {
        let kind = EventKind::from_tag(&raw.tag)
            .ok_or_else(|| EventError::Unrecognized(raw.tag.clone()))?;
        let payload_err = |reason: &str| EventError::Payload {
            tag: raw.tag.clone(),
            reason: reason.to_string(),
        };

        let content = &raw.content;
        let strings = || string_list(content).ok_or_else(|| payload_err("expected a list of strings"));
        let text = || {
            content
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| payload_err("expected a string"))
        };

        let event = match kind {
            EventKind::Titles => Self::Titles(strings()?),
            EventKind::Tags => Self::Tags(strings()?),
            EventKind::Hashtags => Self::Hashtags(strings()?),
            EventKind::SelectedTitle => Self::SelectedTitle(text()?),
            EventKind::Description => Self::Description(text()?),
            EventKind::Score => {
                Self::Score(score_text(content).ok_or_else(|| payload_err("expected a number"))?)
            }
            EventKind::Analytics => match content {
                Value::Null => return Err(payload_err("missing content")),
                Value::String(s) => Self::Analytics(s.clone()),
                other => Self::Analytics(other.to_string()),
            },
            EventKind::TopVideos => match content {
                Value::String(keyword) => {
                    Self::TopVideos(TopVideosPayload::Keyword(keyword.clone()))
                }
                Value::Array(_) => Self::TopVideos(TopVideosPayload::Videos(
                    video_list(content).ok_or_else(|| payload_err("malformed video entry"))?,
                )),
                _ => return Err(payload_err("expected a keyword or a list of videos")),
            },
        };

        Ok(event)
    }
}

/// Decode a `top_videos` payload that is expected to be a list.
///
/// `null` and missing payloads count as an empty list.
pub fn video_list(content: &Value) -> Option<Vec<VideoRef>> {
    match content {
        Value::Null => Some(Vec::new()),
        Value::Array(_) => serde_json::from_value(content.clone()).ok(),
        _ => None,
    }
}

fn string_list(content: &Value) -> Option<Vec<String>> {
    content
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Render a score payload the way it was sent: `87` stays `87`, `87.0`
/// becomes `87`, `87.5` stays `87.5`. Numeric strings are accepted too.
fn score_text(content: &Value) -> Option<String> {
    match content {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(format!("{}", f as i64))
                } else {
                    Some(f.to_string())
                }
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|_| trimmed.to_string())
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
