use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Watermark of the last article delivered to the channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    #[serde(
        rename = "publicationDateOfLastPostedArticle",
        alias = "lastPublicationDate",
        default,
        deserialize_with = "deserialize_zoned"
    )]
    pub last_publication_date: Option<DateTime<Utc>>,

    #[serde(rename = "titleOfLastPostedArticle", alias = "lastTitle", default)]
    pub last_title: Option<String>,
}

impl SyncStatus {
    pub fn new(last_publication_date: DateTime<Utc>, last_title: impl Into<String>) -> Self {
        Self {
            last_publication_date: Some(last_publication_date),
            last_title: Some(last_title.into()),
        }
    }
}

/// Accepts RFC 3339 timestamps, optionally followed by a `[Region/City]` zone id.
fn deserialize_zoned<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let trimmed = match raw.find('[') {
        Some(idx) if raw.ends_with(']') => &raw[..idx],
        _ => raw.as_str(),
    };
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(serde::de::Error::custom)
}
