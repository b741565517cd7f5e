// API client module: a small blocking client for the AlphaFold Protein
// Structure Database. HTTP goes through the `Transport` trait so the fetch,
// download and dispatch logic can be exercised without a network.

use crate::config::{RetryPolicy, Settings};
use crate::model::{ModelBatch, ModelEntry};
use crate::output;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Everything except RFC 3986 unreserved characters gets escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected response from {url}: {message}")]
    UnexpectedShape { url: String, message: String },
}

impl FetchError {
    /// Connection problems, timeouts, 5xx and 429 may succeed on a retry.
    /// Other 4xx and body problems will not.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::Json { .. } | FetchError::UnexpectedShape { .. } => false,
        }
    }
}

/// A blocking GET that yields the body of a 2xx response.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Run `op` until it succeeds, fails permanently, or the policy's retries
/// are used up. Backoff doubles after every attempt.
pub fn with_retry<T>(
    policy: &RetryPolicy,
    url: &str,
    mut op: impl FnMut() -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    let mut delay = policy.initial_backoff;
    let mut attempt = 0;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                tracing::warn!(%url, attempt, error = %err, "transient failure, retrying");
                std::thread::sleep(delay);
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }
}

/// reqwest-backed transport with a per-request timeout and retries.
pub struct HttpTransport {
    client: Client,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("afdb-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpTransport {
            client,
            retry: settings.retry,
        })
    }

    fn get_once(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(%url, "GET");
        let transport_err = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };
        let res = self.client.get(url).send().map_err(transport_err)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = res.bytes().map_err(transport_err)?;
        Ok(body.to_vec())
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        with_retry(&self.retry, url, || self.get_once(url))
    }
}

/// Client for the two AlphaFold DB endpoints this tool uses.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
}

impl ApiClient<HttpTransport> {
    /// Build a client against `settings.api_url` using reqwest.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(ApiClient::with_transport(
            HttpTransport::new(settings)?,
            &settings.api_url,
        ))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, base_url: &str) -> Self {
        ApiClient {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn models_url(&self, accession: &str) -> String {
        format!(
            "{}/prediction/{}",
            self.base_url,
            utf8_percent_encode(accession, COMPONENT)
        )
    }

    pub fn summary_url(&self, accession: &str, residue_range: &str) -> String {
        format!(
            "{}/uniprot/summary/{}.json?range={}",
            self.base_url,
            utf8_percent_encode(accession, COMPONENT),
            utf8_percent_encode(residue_range, COMPONENT)
        )
    }

    pub(crate) fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.transport.get(url)
    }

    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let spinner = fetch_spinner(url);
        let body = self.transport.get(url);
        spinner.finish_and_clear();
        let body = body?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Json {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch every model for `accession`, save the raw response to
    /// `{accession}_models.json` and return the entries.
    ///
    /// Failures are reported on the console and yield `None`. A save failure
    /// is reported but the fetched entries are still returned.
    pub fn fetch_models(&self, accession: &str, out_dir: &Path) -> Option<ModelBatch> {
        let url = self.models_url(accession);
        let body = match self.get_json(&url) {
            Ok(body) => body,
            Err(e) => {
                println!("Error fetching data: {}", e);
                return None;
            }
        };

        let path = output::models_file(out_dir, accession);
        match output::write_pretty_json(&path, &body) {
            Ok(()) => println!("Data saved to {}", path.display()),
            Err(e) => println!("Error saving data: {:#}", e),
        }

        match parse_entries(&url, body) {
            Ok(batch) => Some(batch),
            Err(e) => {
                println!("Error fetching data: {}", e);
                None
            }
        }
    }

    /// Fetch the summary for `accession` restricted to `residue_range` and
    /// save it to `{accession}_summary_{range}.json`.
    pub fn fetch_summary(
        &self,
        accession: &str,
        residue_range: &str,
        out_dir: &Path,
    ) -> Option<serde_json::Value> {
        let url = self.summary_url(accession, residue_range);
        let summary = match self.get_json(&url) {
            Ok(summary) => summary,
            Err(e) => {
                println!("Error fetching summary: {}", e);
                return None;
            }
        };

        let path = output::summary_file(out_dir, accession, residue_range);
        match output::write_pretty_json(&path, &summary) {
            Ok(()) => println!("Summary data saved to {}", path.display()),
            Err(e) => println!("Error saving summary: {:#}", e),
        }
        Some(summary)
    }
}

/// Spinner shown while a request is in flight; hidden when stderr is not a
/// terminal.
fn fetch_spinner(url: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Fetching {}...", url));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// The models endpoint must return an array. Items that are not objects are
/// skipped so their siblings still get processed; wrongly typed fields
/// inside an object only blank that field.
fn parse_entries(url: &str, body: serde_json::Value) -> Result<ModelBatch, FetchError> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(FetchError::UnexpectedShape {
                url: url.to_string(),
                message: format!("expected a JSON array, got {}", json_kind(&other)),
            })
        }
    };

    let mut batch = ModelBatch {
        entries: Vec::with_capacity(items.len()),
        skipped: 0,
    };
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            tracing::warn!(index, kind = json_kind(&item), "skipping model entry that is not an object");
            batch.skipped += 1;
            continue;
        }
        match serde_json::from_value::<ModelEntry>(item) {
            Ok(entry) => batch.entries.push(entry),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed model entry");
                batch.skipped += 1;
            }
        }
    }
    Ok(batch)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
