//! Resumable corpus download.
//!
//! A single blocking transfer: probe the remote size, then request only the
//! byte range missing from the local file and append it. Resume is
//! best-effort: a local file already at or beyond the remote size is
//! accepted as complete without verifying its content.
use std::fs::OpenOptions;
use std::io::BufReader;
use std::path::Path;

use log::{debug, info};
use reqwest::header::{CONTENT_LENGTH, RANGE};

use crate::error::Error;

/// Holds the http client that will make the requests.
pub struct Downloader {
    client: reqwest::blocking::Client,
}

impl Default for Downloader {
    fn default() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Downloader {
    /// Download `url` into `dst`, resuming a partial file if one exists.
    ///
    /// Returns the remote size in bytes.
    pub fn download(&self, url: &str, dst: &Path) -> Result<u64, Error> {
        let head = self.client.head(url).send()?;
        let file_size = head
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .ok_or_else(|| Error::Custom(format!("no content length for {}", url)))?;

        let first_byte = match std::fs::metadata(dst) {
            Ok(metadata) => metadata.len(),
            Err(_) => 0,
        };

        // already done; content is not re-verified
        if first_byte >= file_size {
            debug!("{:?} already complete ({} bytes)", dst, first_byte);
            return Ok(file_size);
        }

        let range = byte_range(first_byte, file_size);
        info!("downloading {} ({} bytes, starting at {})", url, file_size, first_byte);
        let response = self.client.get(url).header(RANGE, range).send()?;

        let mut out = OpenOptions::new().create(true).append(true).open(dst)?;
        let mut reader = BufReader::new(response);
        std::io::copy(&mut reader, &mut out)?;

        Ok(file_size)
    }
}

/// `Range` header value for the remaining bytes.
fn byte_range(first_byte: u64, file_size: u64) -> String {
    format!("bytes={}-{}", first_byte, file_size)
}
