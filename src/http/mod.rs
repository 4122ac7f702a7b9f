//! HTTP plumbing shared by the catalog client and the installer.

mod client;
mod progress;

pub use client::HttpClient;
pub use progress::DownloadProgress;
