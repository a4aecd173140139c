use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A media attachment announced by a feed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enclosure {
    pub url: String,
    pub media_type: Option<String>,
}

impl Enclosure {
    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|t| t.contains("image"))
    }
}

/// A feed item as it appears in the feed, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub enclosures: Vec<Enclosure>,
    pub categories: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl RawItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// URL of the first enclosure with an image media type.
    pub fn image_url(&self) -> Option<&str> {
        self.enclosures
            .iter()
            .find(|e| e.is_image())
            .map(|e| e.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enclosure(url: &str, media_type: Option<&str>) -> Enclosure {
        Enclosure {
            url: url.into(),
            media_type: media_type.map(String::from),
        }
    }

    #[test]
    fn test_image_url_picks_first_image() {
        let mut item = RawItem::new("t");
        item.enclosures = vec![
            enclosure("https://example.com/a.mp3", Some("audio/mpeg")),
            enclosure("https://example.com/b.jpg", Some("image/jpeg")),
            enclosure("https://example.com/c.png", Some("image/png")),
        ];
        assert_eq!(item.image_url(), Some("https://example.com/b.jpg"));
    }

    #[test]
    fn test_image_url_ignores_untyped_enclosures() {
        let mut item = RawItem::new("t");
        item.enclosures = vec![enclosure("https://example.com/b.jpg", None)];
        assert_eq!(item.image_url(), None);
    }

    #[test]
    fn test_image_url_without_enclosures() {
        assert_eq!(RawItem::new("t").image_url(), None);
    }
}
