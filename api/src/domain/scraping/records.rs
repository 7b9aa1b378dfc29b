use uuid::Uuid;

/// Column width shared by `urls.name` and `links.name`.
pub const NAME_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UrlWithLinkCount {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub links_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkRecord {
    pub id: Uuid,
    pub url_id: Uuid,
    pub link: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url_id: Uuid,
    pub link: String,
    pub name: String,
    /// Index of the anchor on the scraped page; listings follow it.
    pub position: i32,
}

/// Cuts `value` to at most `max` characters without splitting a code point.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
