use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::Category;

/// The normalized, dialect-independent record produced for every feed item.
///
/// Every field is always populated; the parser substitutes deterministic
/// defaults where the upstream feed is missing data. `id` is
/// `{feed url}-{item index}` and is only unique within one aggregation
/// response; upstream reordering between fetches changes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub category: Category,
}
