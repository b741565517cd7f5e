// Settings for the CLI. Every value has a default that matches talking to
// the public AlphaFold DB and writing into the current directory; the
// environment only overrides.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://www.alphafold.ebi.ac.uk/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// How often and how patiently a transient failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_url: DEFAULT_API_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Read `AFDB_API_URL`, `AFDB_TIMEOUT_SECS`, `AFDB_MAX_RETRIES` and
    /// `AFDB_OUTPUT_DIR`, falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        let api_url = lookup("AFDB_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);
        let timeout_secs = parse_or("AFDB_TIMEOUT_SECS", lookup("AFDB_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS);
        let max_retries = parse_or("AFDB_MAX_RETRIES", lookup("AFDB_MAX_RETRIES"), DEFAULT_MAX_RETRIES);
        let output_dir = lookup("AFDB_OUTPUT_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        Settings {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy {
                max_retries,
                ..defaults.retry
            },
            output_dir,
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(%key, value = %raw, %default, "ignoring unparseable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let s = settings_from(&[]);
        assert_eq!(s.api_url, DEFAULT_API_URL);
        assert_eq!(s.timeout, Duration::from_secs(30));
        assert_eq!(s.retry.max_retries, 2);
        assert_eq!(s.output_dir, PathBuf::from("."));
    }

    #[test]
    fn overrides_are_applied() {
        let s = settings_from(&[
            ("AFDB_API_URL", "http://localhost:9000/api/"),
            ("AFDB_TIMEOUT_SECS", "5"),
            ("AFDB_MAX_RETRIES", "0"),
            ("AFDB_OUTPUT_DIR", "/tmp/afdb"),
        ]);
        assert_eq!(s.api_url, "http://localhost:9000/api");
        assert_eq!(s.timeout, Duration::from_secs(5));
        assert_eq!(s.retry.max_retries, 0);
        assert_eq!(s.output_dir, PathBuf::from("/tmp/afdb"));
    }

    #[test]
    fn garbage_numbers_fall_back_to_defaults() {
        let s = settings_from(&[("AFDB_TIMEOUT_SECS", "soon"), ("AFDB_MAX_RETRIES", "-1")]);
        assert_eq!(s.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(s.retry.max_retries, DEFAULT_MAX_RETRIES);
    }
}
