use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

use crate::app::Result;
use crate::config::HttpConfig;

/// Image bytes ready for upload.
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Downloads article images for upload.
#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(http.timeout())
            .timeout(http.timeout())
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &Url) -> Result<Photo> {
        let response = self.client.get(url.clone()).send().await?;
        response.error_for_status_ref()?;
        let bytes = response.bytes().await?.to_vec();

        let file_name = random_file_name(url);
        debug!(%url, %file_name, size = bytes.len(), "Fetched image");
        Ok(Photo { bytes, file_name })
    }
}

/// A fresh upload name that keeps the extension of the source path.
pub fn random_file_name(url: &Url) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(url.as_str().as_bytes());
    hasher.update(nanos.to_le_bytes());
    hasher.update(COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    let stem = hex::encode(&hasher.finalize()[..16]);

    match extension(url) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

fn extension(url: &Url) -> Option<&str> {
    let last = url.path_segments()?.next_back()?;
    let (name, ext) = last.rsplit_once('.')?;
    (!name.is_empty() && !ext.is_empty()).then_some(ext)
}
