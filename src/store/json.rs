use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::app::{FeedRelayError, Result};
use crate::domain::SyncStatus;
use crate::store::WatermarkStore;

/// Watermark kept as a small JSON document on disk.
pub struct JsonStatusFile {
    path: PathBuf,
}

impl JsonStatusFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl WatermarkStore for JsonStatusFile {
    fn load(&self) -> Result<SyncStatus> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    path = %self.path.display(),
                    "Status file does not exist, will create a new file"
                );
                return Ok(SyncStatus::default());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            warn!(path = %self.path.display(), "Status file was empty");
            return Ok(SyncStatus::default());
        }

        let status: Option<SyncStatus> =
            serde_json::from_str(&content).map_err(|e| FeedRelayError::WatermarkCorrupt {
                path: self.path.clone(),
                source: e,
            })?;

        let status = status.unwrap_or_default();
        debug!(?status, "Loaded sync status");
        Ok(status)
    }

    fn save(&self, status: &SyncStatus) -> Result<()> {
        debug!(?status, path = %self.path.display(), "Writing sync status");
        let bytes = serde_json::to_vec_pretty(status).map_err(std::io::Error::other)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write then rename; readers never see a half-written file
        let tmp = self.tmp_path();
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
