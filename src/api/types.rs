use serde::Deserialize;

/// A single entry as returned by `GET /v1/entries`.
///
/// Only the fields this tool consumes are modeled; unknown fields in the
/// response are ignored, and absent fields fall back to defaults so older
/// servers don't break deserialization.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub content: String,
    pub starred: bool,
}

/// The envelope of `GET /v1/entries`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EntryList {
    pub total: u64,
    pub entries: Vec<Entry>,
}

/// Query parameters accepted by the entries endpoint.
///
/// The default filter requests the full, unfiltered list; the bookmark
/// pipeline selects starred entries client-side.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub starred: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl EntryFilter {
    /// Renders the filter as query parameters, omitting unset fields.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(starred) = self.starred {
            query.push(("starred", starred.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        query
    }
}
