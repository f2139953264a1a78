//! Google News RSS search feed.
//!
//! Fetches the Portuguese-language search feed for science, technology and
//! economy stories, picks one `<item>` at random and hands it to
//! [`normalize_entry`]. Failures never escape: a transport error yields the
//! [`NewsItem::connection_error`] sentinel and an empty or unreadable feed
//! yields [`NewsItem::no_news`].

use super::normalize::normalize_entry;
use crate::models::NewsItem;
use crate::utils::truncate_for_log;
use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

const SEARCH_ENDPOINT: &str = "https://news.google.com/rss/search";
const SEARCH_QUERY: &str = "(ciência OR tecnologia OR economia)";

/// The default feed: Google News search in Brazilian Portuguese.
pub fn default_feed_url() -> String {
    let params = [
        ("q", SEARCH_QUERY),
        ("hl", "pt-BR"),
        ("gl", "BR"),
        ("ceid", "BR:pt-419"),
    ];
    match Url::parse_with_params(SEARCH_ENDPOINT, &params) {
        Ok(url) => url.to_string(),
        Err(_) => SEARCH_ENDPOINT.to_string(),
    }
}

/// One `<item>` of an RSS 2.0 channel, with the fields we read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct Rss {
    #[serde(default)]
    channel: Channel,
}

#[derive(Debug, Default, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<FeedEntry>,
}

/// Parse an RSS body into its items.
///
/// Malformed XML is treated like a feed without items.
pub fn parse_feed(xml: &str) -> Vec<FeedEntry> {
    match quick_xml::de::from_str::<Rss>(xml) {
        Ok(rss) => rss.channel.items,
        Err(e) => {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(xml, 200),
                "Feed body is not valid RSS"
            );
            Vec::new()
        }
    }
}

/// Pick one item at random from a feed body and normalize it.
pub fn news_from_feed<R: Rng + ?Sized>(xml: &str, rng: &mut R) -> NewsItem {
    let entries = parse_feed(xml);
    info!(count = entries.len(), "Parsed feed items");

    match entries.choose(rng) {
        Some(entry) => {
            debug!(raw_title = %entry.title, link = %entry.link, "Selected feed item");
            normalize_entry(entry)
        }
        None => {
            warn!("Feed has no items");
            NewsItem::no_news()
        }
    }
}

/// Client for one RSS search feed.
#[derive(Debug, Clone)]
pub struct GoogleNewsFeed {
    client: Client,
    feed_url: String,
}

impl GoogleNewsFeed {
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), feed_url)
    }

    pub fn with_client(client: Client, feed_url: impl Into<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
        }
    }

    /// The feed URL with a `cache_bust` timestamp appended.
    pub fn request_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.feed_url)?;
        let micros = Utc::now().timestamp_micros();
        let stamp = format!("{}.{:06}", micros / 1_000_000, micros % 1_000_000);
        url.query_pairs_mut().append_pair("cache_bust", &stamp);
        Ok(url)
    }

    /// Fetch the feed and return one normalized story, or a sentinel.
    ///
    /// Makes a single GET with no retry. The HTTP status is not checked; an
    /// error page simply parses as a feed without items.
    ///
    /// # Returns
    ///
    /// - A random item, normalized with [`normalize_entry`]
    /// - [`NewsItem::connection_error`] on an invalid URL or a transport error
    /// - [`NewsItem::no_news`] when the body has no items or is not valid RSS
    #[instrument(level = "info", skip_all, fields(feed_url = %self.feed_url))]
    pub async fn fetch_news(&self) -> NewsItem {
        let url = match self.request_url() {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Invalid feed URL");
                return NewsItem::connection_error();
            }
        };

        let body = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(status = %resp.status(), "Feed responded");
                match resp.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        error!(error = %e, "Failed reading feed body");
                        return NewsItem::connection_error();
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Feed request failed");
                return NewsItem::connection_error();
            }
        };

        info!(bytes = body.len(), "Fetched feed");
        news_from_feed(&body, &mut rng())
    }
}
