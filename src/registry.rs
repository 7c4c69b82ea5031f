use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which registry bucket a feed belongs to. Articles inherit the category of
/// the feed they came from; nothing is ever inferred from article text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Local,
    National,
    International,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Local,
        Category::National,
        Category::International,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Local => "local",
            Category::National => "national",
            Category::International => "international",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Category::Local),
            "national" => Ok(Category::National),
            "international" => Ok(Category::International),
            _ => Err(()),
        }
    }
}

/// One upstream syndication endpoint. Defined at startup, never mutated.
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub url: String,
    pub category: Category,
}

/// Category restriction for an aggregation call. Anything that is not a
/// recognized category name means "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    All,
    One(Category),
}

impl CategorySelector {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.and_then(|s| s.parse::<Category>().ok()) {
            Some(category) => CategorySelector::One(category),
            None => CategorySelector::All,
        }
    }
}

/// Immutable, ordered mapping of categories to feed URLs.
///
/// The enumeration order of `select` is the order sources were registered in,
/// which makes the pre-rank merge order (and therefore timestamp tie-breaks
/// after the stable sort) deterministic.
#[derive(Debug, Clone, Default)]
pub struct FeedRegistry {
    sources: Vec<FeedSource>,
}

impl FeedRegistry {
    pub fn new(sources: Vec<FeedSource>) -> Self {
        Self { sources }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Resolve the feed sources an aggregation request applies to.
    pub fn select(&self, selector: CategorySelector) -> Vec<&FeedSource> {
        self.sources
            .iter()
            .filter(|source| match selector {
                CategorySelector::All => true,
                CategorySelector::One(category) => source.category == category,
            })
            .collect()
    }
}
