pub mod json;

use crate::app::Result;
use crate::domain::SyncStatus;

pub use json::JsonStatusFile;

/// Where the delivery watermark lives between runs.
pub trait WatermarkStore {
    /// Read the watermark. An absent or empty store yields the empty watermark.
    fn load(&self) -> Result<SyncStatus>;

    /// Replace the watermark. Either the whole new value is stored or nothing.
    fn save(&self, status: &SyncStatus) -> Result<()>;
}
