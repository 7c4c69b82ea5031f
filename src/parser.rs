use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::article::Article;
use crate::registry::Category;

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_LINK: &str = "#";
pub const DEFAULT_SOURCE: &str = "Unknown Source";
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1560518883-ce09059eeffa?w=400&h=250&fit=crop";

/// Feed XML that could not be deserialized at all, scoped to one feed.
#[derive(Debug, Error)]
#[error("malformed feed XML: {0}")]
pub struct ParseError(#[from] quick_xml::DeError);

/// Dialect-tagged parse result. The dialect is detected structurally: an RSS
/// 2.0 document carries `rss.channel.item[]`, an Atom document `feed.entry[]`,
/// and a well-formed document with neither simply has zero items.
#[derive(Debug)]
pub enum ParsedFeed {
    Rss {
        title: Option<String>,
        items: Vec<FeedItem>,
    },
    Atom {
        title: Option<String>,
        entries: Vec<FeedItem>,
    },
    Empty,
}

/// Union of the per-item fields both dialects may carry. Normalization probes
/// the same fallback chains regardless of which dialect produced the item.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedItem {
    title: Option<Text>,
    description: Option<Text>,
    summary: Option<Text>,
    // quick-xml strips namespace prefixes, so Atom <content> and RSS
    // <media:content> both arrive under the local name "content": the
    // element text feeds the description chain, the url attribute the
    // image chain.
    content: Vec<Content>,
    link: Vec<Link>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    published: Option<String>,
    // <media:thumbnail>, local name after prefix stripping
    thumbnail: Vec<MediaRef>,
    enclosure: Vec<Enclosure>,
}

/// Element whose text content is what we want, ignoring its attributes
/// (Atom's `type="html"` and friends).
#[derive(Debug, Default, Deserialize)]
struct Text {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// `<link>` in either shape: RSS puts the URL in the element text, Atom in an
/// `href` attribute.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MediaRef {
    #[serde(rename = "@url")]
    url: Option<String>,
}

/// `<content>` in either shape: Atom content carries its value in the element
/// text, media:content in a `url` attribute.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Content {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Enclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}

/// Permissive envelope over the document root: an `<rss>` root exposes
/// `channel`, a `<feed>` root exposes `title`/`entry`, anything else
/// deserializes to all-empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedDocument {
    channel: Option<RssChannel>,
    title: Option<Text>,
    entry: Vec<FeedItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RssChannel {
    title: Option<Text>,
    item: Vec<FeedItem>,
}

/// Parse raw feed bytes into a dialect-tagged item list.
///
/// A non-empty RSS item list wins; otherwise the Atom entry list is used;
/// otherwise the feed has zero items, which is not an error. Only XML the
/// deserializer cannot read at all is a [`ParseError`].
pub fn parse(bytes: &[u8]) -> Result<ParsedFeed, ParseError> {
    let doc: FeedDocument = quick_xml::de::from_reader(bytes)?;

    if let Some(channel) = doc.channel {
        if !channel.item.is_empty() {
            return Ok(ParsedFeed::Rss {
                title: channel.title.and_then(|t| t.value),
                items: channel.item,
            });
        }
    }

    if !doc.entry.is_empty() {
        return Ok(ParsedFeed::Atom {
            title: doc.title.and_then(|t| t.value),
            entries: doc.entry,
        });
    }

    Ok(ParsedFeed::Empty)
}

/// Map a parsed feed onto canonical articles, filling every absent field with
/// its deterministic default. The caller supplies the category from the
/// registry bucket the feed URL came from; the feed's own notion of category
/// is ignored.
pub fn normalize(
    parsed: ParsedFeed,
    feed_url: &str,
    category: Category,
    fetched_at: DateTime<Utc>,
) -> Vec<Article> {
    let (feed_title, items) = match parsed {
        ParsedFeed::Rss { title, items } => (title, items),
        ParsedFeed::Atom { title, entries } => (title, entries),
        ParsedFeed::Empty => return Vec::new(),
    };

    let source = feed_title
        .and_then(nonblank)
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| normalize_item(item, feed_url, index, &source, category, fetched_at))
        .collect()
}

fn normalize_item(
    item: FeedItem,
    feed_url: &str,
    index: usize,
    source: &str,
    category: Category,
    fetched_at: DateTime<Utc>,
) -> Article {
    let title = item
        .title
        .and_then(|t| t.value)
        .and_then(nonblank)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    // description -> summary -> content text, in that preference order
    let description = [item.description, item.summary]
        .into_iter()
        .flatten()
        .find_map(|t| t.value.and_then(nonblank))
        .or_else(|| {
            item.content
                .iter()
                .find_map(|c| c.text.clone().and_then(nonblank))
        })
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    let link = item
        .link
        .iter()
        .find_map(|l| l.text.clone().and_then(nonblank))
        .or_else(|| {
            item.link
                .iter()
                .find_map(|l| l.href.clone().and_then(nonblank))
        })
        .unwrap_or_else(|| DEFAULT_LINK.to_string());

    let image = extract_image(&item.content, &item.thumbnail, &item.enclosure);

    let published_at = item
        .pub_date
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| item.published.as_deref().and_then(parse_timestamp))
        .unwrap_or(fetched_at);

    Article {
        id: format!("{}-{}", feed_url, index),
        title,
        description,
        link,
        image,
        published_at,
        source: source.to_string(),
        category,
    }
}

/// Image preference order: media:content url, media:thumbnail url, enclosure
/// url with an `image/*` MIME type, then the fixed placeholder. Richer hints
/// win when a feed populates several at once.
fn extract_image(
    content: &[Content],
    thumbnails: &[MediaRef],
    enclosures: &[Enclosure],
) -> String {
    if let Some(url) = content.iter().find_map(|c| c.url.clone().and_then(nonblank)) {
        return url;
    }
    if let Some(url) = thumbnails.iter().find_map(|m| m.url.clone().and_then(nonblank)) {
        return url;
    }
    if let Some(url) = enclosures.iter().find_map(|e| {
        e.mime_type
            .as_deref()
            .filter(|mime| mime.starts_with("image/"))
            .and_then(|_| e.url.clone().and_then(nonblank))
    }) {
        return url;
    }
    PLACEHOLDER_IMAGE.to_string()
}

/// RSS dates are RFC 2822, Atom dates RFC 3339; accept either from any field.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .or_else(|_| DateTime::parse_from_rfc3339(raw.trim()))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn nonblank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
