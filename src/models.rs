//! Data models shared by the fetcher, the dialogue producer and the outputs.
//!
//! - [`NewsItem`]: one normalized story taken from the feed
//! - [`DialogueResult`]: the six-turn HTML dialogue and where it came from
//! - [`Edition`]: what a single run writes to disk

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title of the sentinel returned when the feed could not be reached.
pub const CONNECTION_ERROR_TITLE: &str = "Erro de Conexão";
/// Title of the sentinel returned when the feed had no usable items.
pub const NO_NEWS_TITLE: &str = "Nenhuma notícia encontrada";

/// A single news story after normalization.
///
/// Built once by the fetcher and only read afterwards. Sentinel items (see
/// [`NewsItem::connection_error`] and [`NewsItem::no_news`]) stand in for
/// failures and are recognized by their title.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    title: String,
    summary: String,
    link: String,
}

impl NewsItem {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            link: link.into(),
        }
    }

    /// Sentinel for transport failures while fetching the feed.
    pub fn connection_error() -> Self {
        Self::new(
            CONNECTION_ERROR_TITLE,
            "Não foi possível conectar à API de notícias.",
            "",
        )
    }

    /// Sentinel for a feed response without any `<item>`.
    pub fn no_news() -> Self {
        Self::new(
            NO_NEWS_TITLE,
            "Não foi possível localizar notícias neste momento.",
            "",
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    /// `true` for the placeholder items produced on fetch failures.
    pub fn is_sentinel(&self) -> bool {
        self.title == CONNECTION_ERROR_TITLE || self.title == NO_NEWS_TITLE
    }
}

/// Why the fixed fallback dialogue replaced the model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No generator backend could be set up.
    GeneratorUnavailable,
    /// The generator returned an error.
    GenerationFailed,
    /// The generator answered, but fewer than three turns were recoverable.
    MalformedOutput,
    /// The fetcher returned a sentinel, so there was nothing to discuss.
    NewsUnavailable,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackReason::GeneratorUnavailable => "generator_unavailable",
            FallbackReason::GenerationFailed => "generation_failed",
            FallbackReason::MalformedOutput => "malformed_output",
            FallbackReason::NewsUnavailable => "news_unavailable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum DialogueOrigin {
    Generated,
    Fallback(FallbackReason),
}

/// The dialogue as HTML paragraphs, one per turn, plus its origin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DialogueResult {
    html: String,
    origin: DialogueOrigin,
}

impl DialogueResult {
    pub fn generated(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            origin: DialogueOrigin::Generated,
        }
    }

    pub fn fallback(html: impl Into<String>, reason: FallbackReason) -> Self {
        Self {
            html: html.into(),
            origin: DialogueOrigin::Fallback(reason),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn origin(&self) -> DialogueOrigin {
        self.origin
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, DialogueOrigin::Fallback(_))
    }
}

impl fmt::Display for DialogueResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

/// Everything one run produces, as written to the JSON output.
#[derive(Debug, Deserialize, Serialize)]
pub struct Edition {
    /// The date of the run in `YYYY-MM-DD` format (São Paulo time).
    pub local_date: String,
    /// The time of the run in `HH:MM:SS` format (São Paulo time).
    pub local_time: String,
    /// Human readable timestamp, e.g. `Segunda-feira, 19/10/2026, 14:05`.
    pub data_hora: String,
    pub news: NewsItem,
    pub dialogue: DialogueResult,
}
