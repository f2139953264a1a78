//! News sources.
//!
//! Fetching happens in two steps:
//!
//! 1. **Fetching**: download the RSS feed and pick one `<item>` at random
//!    ([`google_news`])
//! 2. **Normalizing**: clean the title and snippet into a [`NewsItem`]
//!    ([`normalize`])
//!
//! Errors never escape this module. Callers get a sentinel [`NewsItem`]
//! instead, recognized by [`NewsItem::is_sentinel`].
//!
//! [`NewsItem`]: crate::models::NewsItem
//! [`NewsItem::is_sentinel`]: crate::models::NewsItem::is_sentinel

pub mod google_news;
pub mod normalize;

pub use google_news::{GoogleNewsFeed, default_feed_url};
