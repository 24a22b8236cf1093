//! HTTP client for artifact downloads.
//!
//! A thin wrapper around `reqwest` that streams response bodies to disk.
//! Redirects are followed; the final response status must be 200. There is
//! deliberately no retry or timeout layer: any transport failure aborts the
//! current entry.

use futures_util::StreamExt;
use log::debug;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::{DependencyError, Result};

const USER_AGENT: &str = concat!("depfetch/", env!("CARGO_PKG_VERSION"));

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with an optional proxy URL.
    ///
    /// The proxy string is parsed for host and port only; a malformed value
    /// silently falls back to a direct connection.
    pub fn new(proxy: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);

        if let Some(address) = proxy.and_then(parse_proxy) {
            debug!("using proxy {address}");
            if let Ok(proxy) = reqwest::Proxy::all(&address) {
                builder = builder.proxy(proxy);
            }
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Download `source` to `destination`, streaming the body to disk.
    ///
    /// A destination ending in `/` gets the last path segment of the source
    /// URL appended. Missing parent directories are created. Returns the
    /// path that was actually written so the caller can verify it.
    pub async fn download<F>(
        &self,
        source: &str,
        destination: &str,
        progress: Option<F>,
    ) -> Result<PathBuf>
    where
        F: Fn(u64, u64),
    {
        let dest_path = resolve_destination(source, destination);

        if let Some(parent) = dest_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        debug!("GET {source} -> {}", dest_path.display());
        let response = self.client.get(source).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DependencyError::HttpStatus {
                status: status.as_u16(),
                url: source.to_string(),
            });
        }

        let total = response.content_length().unwrap_or(0);

        let mut file = File::create(&dest_path).await?;
        let mut written: u64 = 0;

        if let Some(ref callback) = progress {
            callback(written, total);
        }

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;

            if let Some(ref callback) = progress {
                callback(written, total);
            }
        }

        file.flush().await?;

        Ok(dest_path)
    }
}

/// A destination ending in `/` gets the source URL's basename appended.
/// Shared between the fetch path and the plain-file copy path so the
/// trailing-slash rule cannot drift between them.
pub(crate) fn resolve_destination(source: &str, destination: &str) -> PathBuf {
    if destination.ends_with('/') {
        let filename = source.rsplit('/').next().unwrap_or(source);
        Path::new(destination).join(filename)
    } else {
        PathBuf::from(destination)
    }
}

/// Parse a proxy URL into a `http://host:port` address.
///
/// Strips any `http://` or `https://` prefix and splits on the last `:`.
/// Returns `None` for anything that does not yield a host and numeric port.
fn parse_proxy(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let stripped = raw
        .trim_start_matches("https://")
        .trim_start_matches("http://");

    let (host, port) = stripped.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    let port: u16 = port.parse().ok()?;

    Some(format!("http://{host}:{port}"))
}
