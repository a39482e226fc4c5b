/// One-time dataset retrieval.
///
/// When the configured CSV is not on disk, it is downloaded once over
/// HTTP(S) before ingestion. There is a single attempt with a fixed
/// timeout and no retry: any failure aborts startup.
///
/// The body is streamed into `<file>.part`, checked, and only then renamed
/// over the real path. A failed download never leaves a file behind, so the
/// next start sees the dataset as absent and tries again.
///
/// File hosts that put a warning or consent page in front of large files
/// answer with HTML instead of the CSV. That is detected both from the
/// Content-Type header and by sniffing the start of the body.

use reqwest::header::CONTENT_TYPE;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{DashboardConfig, FETCH_TIMEOUT_SECS};
use crate::ingest::storm_events::check_header;
use crate::model::DataError;

/// Bytes inspected when sniffing for an HTML page.
const SNIFF_LEN: usize = 1024;

/// Makes sure `config.data_path` exists, downloading it if needed.
///
/// # Errors
/// - `DataError::DatasetUnavailable` — file absent and no URL configured.
/// - any error from `download_dataset`.
pub fn ensure_dataset(config: &DashboardConfig) -> Result<(), DataError> {
    if config.data_path.exists() {
        info!(path = %config.data_path.display(), "Using local dataset");
        return Ok(());
    }

    let url = config
        .dataset_url
        .as_deref()
        .ok_or_else(|| DataError::DatasetUnavailable(config.data_path.clone()))?;

    download_dataset(url, &config.data_path, Duration::from_secs(FETCH_TIMEOUT_SECS))
}

/// Downloads `url` to `dest` through a temporary sibling file.
///
/// # Errors
/// - `DataError::Fetch` — network failure or a non-2xx status.
/// - `DataError::HtmlResponse` — the host answered with an HTML page.
/// - `DataError::ReadBack` — the saved file has no usable CSV header.
/// - `DataError::Io` — the file could not be written or moved into place.
pub fn download_dataset(url: &str, dest: &Path, timeout: Duration) -> Result<(), DataError> {
    info!(url, dest = %dest.display(), "Downloading dataset");

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }

    let partial = partial_path(dest);
    let result = fetch_to_file(url, &partial, timeout)
        .and_then(|bytes| {
            verify_download(url, &partial)?;
            Ok(bytes)
        })
        .and_then(|bytes| {
            fs::rename(&partial, dest).map_err(|e| DataError::io(dest, e))?;
            Ok(bytes)
        });

    match result {
        Ok(bytes) => {
            info!(bytes, dest = %dest.display(), "Dataset saved");
            Ok(())
        }
        Err(e) => {
            if partial.exists() {
                if let Err(rm) = fs::remove_file(&partial) {
                    warn!("Could not remove partial download {}: {}", partial.display(), rm);
                }
            }
            Err(e)
        }
    }
}

/// `data/events.csv` → `data/events.csv.part`
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Streams the response body to `path`, returning the byte count.
fn fetch_to_file(url: &str, path: &Path, timeout: Duration) -> Result<u64, DataError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DataError::Fetch(format!("could not build HTTP client: {}", e)))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| DataError::Fetch(format!("request to {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(DataError::Fetch(format!(
            "{} returned HTTP {}",
            url,
            response.status()
        )));
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"));
    if is_html {
        return Err(DataError::HtmlResponse(url.to_string()));
    }

    let file = File::create(path).map_err(|e| DataError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let bytes = response
        .copy_to(&mut writer)
        .map_err(|e| DataError::Fetch(format!("reading body from {} failed: {}", url, e)))?;
    writer.flush().map_err(|e| DataError::io(path, e))?;

    Ok(bytes)
}

/// Rejects HTML bodies and files without the required CSV header.
fn verify_download(url: &str, path: &Path) -> Result<(), DataError> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)
        .and_then(|f| f.take(SNIFF_LEN as u64).read_to_end(&mut head))
        .map_err(|e| DataError::io(path, e))?;

    if looks_like_html(&head) {
        return Err(DataError::HtmlResponse(url.to_string()));
    }

    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    check_header(file).map_err(|e| DataError::ReadBack(e.to_string()))
}

/// True when the body opens like an HTML document.
pub fn looks_like_html(head: &[u8]) -> bool {
    let text = String::from_utf8_lossy(head).to_ascii_lowercase();
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<!doctype html") || text.starts_with("<html")
}
