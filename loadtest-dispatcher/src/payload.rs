//! Ammo payload files
//!
//! Every saved request is appended to one file per ammo format. Appends are
//! serialized so concurrent requests never interleave inside a file.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::request::CapturedRequest;

pub const URI_PAYLOAD: &str = "uri.payload";
pub const URIPOST_PAYLOAD: &str = "uripost.payload";
pub const RAW_PAYLOAD: &str = "raw.payload";
pub const HTTP_JSON_PAYLOAD: &str = "httpjson.payload";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to write {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode request as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Appends ammo to the payload files of one directory
#[derive(Debug)]
pub struct PayloadWriter {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl PayloadWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Records a request in every format that applies to it
    ///
    /// # Returns
    /// Whether the request was written; static files (when skipped) and
    /// requests whose body does not match the declared length are not.
    pub async fn save(&self, request: &CapturedRequest, skip_static: bool) -> Result<bool, PayloadError> {
        if skip_static && request.is_static() {
            debug!("Skipping static file {}", request.uri);
            return Ok(false);
        }

        if !request.is_complete() {
            debug!(
                "Skipping {} {}: got {} body bytes, {} declared",
                request.method,
                request.uri,
                request.body.len(),
                request.content_length
            );
            return Ok(false);
        }

        self.append(RAW_PAYLOAD, &request.format_raw()).await?;
        self.append(HTTP_JSON_PAYLOAD, &request.format_http_json()?)
            .await?;
        if let Some(ammo) = request.format_uri_post() {
            self.append(URIPOST_PAYLOAD, &ammo).await?;
        }
        if let Some(ammo) = request.format_uri() {
            self.append(URI_PAYLOAD, &ammo).await?;
        }

        Ok(true)
    }

    /// Appends one ammo record followed by a blank line
    pub async fn append(&self, name: &str, data: &[u8]) -> Result<(), PayloadError> {
        let path = self.dir.join(name);
        let io_error = |source: std::io::Error| PayloadError::Io {
            file: path.clone(),
            source,
        };

        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_error)?;
        file.write_all(data).await.map_err(io_error)?;
        file.write_all(b"\r\n").await.map_err(io_error)?;
        file.flush().await.map_err(io_error)?;

        info!("The payload is written to {}", path.display());
        Ok(())
    }
}
