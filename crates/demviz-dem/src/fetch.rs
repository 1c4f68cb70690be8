//! DEM download over HTTP.
//!
//! A [`DemFetcher`] issues a single blocking GET for a [`DemRequest`] and, on
//! success, overwrites the output file with the response body. Nothing is
//! written when the request fails.
//!
//! The network is reached through the [`HttpTransport`] trait so that the
//! fetcher can be driven by a canned response in tests.

use crate::{DemError, DemRequest, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default file the downloaded GeoTIFF is written to.
pub const DEFAULT_OUTPUT_PATH: &str = "noamundi_dem.tif";

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP GET.
pub trait HttpTransport {
    /// Fetch `url` and return the status and full body.
    ///
    /// Transport-level failures (DNS, connect, TLS, timeout) are errors;
    /// non-2xx statuses are returned as a normal response.
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport without a request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Create a transport with an optional request timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        // reqwest's blocking client defaults to 30s; None means no timeout at all
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// Result of a successful download.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Where the payload was written.
    pub path: PathBuf,
    /// The payload itself, so callers need not re-read the file.
    pub bytes: Vec<u8>,
}

/// Downloads DEMs and stores them at a fixed path.
#[derive(Debug)]
pub struct DemFetcher<T: HttpTransport> {
    transport: T,
    output_path: PathBuf,
}

impl DemFetcher<ReqwestTransport> {
    /// Create a fetcher using reqwest and the default output path.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> DemFetcher<T> {
    /// Create a fetcher using the given transport and the default output path.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }

    /// Set the output path.
    pub fn with_output_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    /// Get the output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Download the DEM described by `request`.
    ///
    /// On success the output file is overwritten with exactly the response
    /// body. On a non-2xx status or transport error the file is left as is.
    pub fn fetch_dem(&self, request: &DemRequest) -> Result<FetchOutcome> {
        let url = request.url();
        info!("Requesting {} DEM: {}", request.dem_type(), url);

        let response = self.transport.get(&url)?;

        if !response.is_success() {
            return Err(DemError::DownloadFailed {
                status: response.status,
                reason: failure_reason(&response.body),
            });
        }

        debug!(
            "Received {} bytes, writing to {}",
            response.body.len(),
            self.output_path.display()
        );

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Not atomic: an interrupted write leaves a truncated file behind.
        let mut file = fs::File::create(&self.output_path)?;
        file.write_all(&response.body)?;

        info!(
            "DEM downloaded successfully ({} bytes) to {}",
            response.body.len(),
            self.output_path.display()
        );

        Ok(FetchOutcome {
            path: self.output_path.clone(),
            bytes: response.body,
        })
    }
}

/// Short printable excerpt of an error body (the API answers errors in text).
fn failure_reason(body: &[u8]) -> String {
    const MAX_REASON_LEN: usize = 200;

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "empty response".to_string();
    }
    text.chars().take(MAX_REASON_LEN).collect()
}
