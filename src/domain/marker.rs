use serde::{Deserialize, Serialize};

/// Separator between the category tag and the display title, e.g. `VIDEO ⟩ Title`.
pub const TITLE_TAG_SEPARATOR: char = '⟩';

/// Prepended to the caption of subscriber-only articles.
pub const PAYWALL_GLYPH: &str = "🔒";

/// Category tag carried in the title prefix of a feed item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryMarker {
    Video,
    Photo,
    PhotoAndVideo,
    Notice,
    #[default]
    Plain,
}

impl CategoryMarker {
    /// Look up a title tag. Matching is exact and case-sensitive.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "VIDEO" => Self::Video,
            "FOTO" => Self::Photo,
            "FOTO UN VIDEO" => Self::PhotoAndVideo,
            "ŅEM VĒRĀ" => Self::Notice,
            _ => Self::Plain,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Video => "🎬",
            Self::Photo => "📷",
            Self::PhotoAndVideo => "📷🎬",
            Self::Notice => "❗",
            Self::Plain => "📰",
        }
    }
}

/// Split a raw feed title into its marker and display title.
pub fn split_title(raw: &str) -> (CategoryMarker, String) {
    match raw.split_once(TITLE_TAG_SEPARATOR) {
        Some((tag, title)) => (
            CategoryMarker::from_tag(tag.trim()),
            title.trim().to_string(),
        ),
        None => (CategoryMarker::Plain, raw.to_string()),
    }
}
