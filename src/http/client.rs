//! Thin HTTP client: single attempt, non-success statuses become
//! `FttbError::RemoteRequestFailed`.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::io::Write;

use super::progress::DownloadProgress;
use crate::error::FttbError;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    show_progress: bool,
}

impl HttpClient {
    /// Creates a client that draws no progress bars.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// GET `url` with `query` and deserialize the JSON body.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);
        let response = self.send(url, query).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// GET `url` and return the body as UTF-8 text.
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET text from {}...", url);
        let response = self.send(url, &[]).await?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }

    /// Streams `url` into the writer produced by `create_writer`.
    ///
    /// With a `Content-Length` the body is copied chunk by chunk while the
    /// percentage is reported; without one it is written in a single call.
    /// The writer is created only after the response status is known good.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);
        let mut response = self.send(url, &[]).await?;
        let mut writer = create_writer()?;

        let downloaded_bytes = match response.content_length() {
            Some(total) => {
                let progress = DownloadProgress::new(total, self.show_progress);
                while let Some(chunk) = response
                    .chunk()
                    .await
                    .context("Failed to read chunk from download stream")?
                {
                    writer
                        .write_all(&chunk)
                        .context("Failed to write chunk to file")?;
                    progress.advance(chunk.len() as u64);
                }
                let written = progress.position();
                progress.finish();
                written
            }
            None => {
                let body = response
                    .bytes()
                    .await
                    .context("Failed to read download body")?;
                writer
                    .write_all(&body)
                    .context("Failed to write download to file")?;
                body.len() as u64
            }
        };
        writer.flush().context("Failed to flush download")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );
        Ok(downloaded_bytes)
    }

    async fn send(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FttbError::RemoteRequestFailed {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        Ok(response)
    }
}
