pub mod article;
pub mod item;
pub mod marker;
pub mod status;

pub use article::{oldest_first, Article};
pub use item::{Enclosure, RawItem};
pub use marker::{split_title, CategoryMarker, PAYWALL_GLYPH, TITLE_TAG_SEPARATOR};
pub use status::SyncStatus;
