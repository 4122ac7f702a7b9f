use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Streams `url` into `dest`, truncating whatever was there.
#[tracing::instrument(skip(runtime, dest, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<u64> {
    info!("Downloading {} to {:?}...", url, dest);

    let bytes = http_client
        .download_file(url, || {
            runtime
                .create_file(dest)
                .with_context(|| format!("Failed to create download file at {:?}", dest))
        })
        .await?;

    info!("Download complete ({} bytes).", bytes);
    Ok(bytes)
}
