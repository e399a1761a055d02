use std::time::Duration;

use anyhow::{bail, Context};
use log::warn;
use reqwest::Url;

const DEFAULT_UPSTREAM_URL: &str = "http://localhost:3000";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 7860;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_url: Url,
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("COMPOSER_UPSTREAM_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        let upstream_url = Url::parse(raw_url.trim())
            .with_context(|| format!("COMPOSER_UPSTREAM_URL is not a valid URL: {raw_url}"))?;
        if !matches!(upstream_url.scheme(), "http" | "https") {
            bail!(
                "COMPOSER_UPSTREAM_URL must use http or https, got {}",
                upstream_url.scheme()
            );
        }

        let host = lookup("COMPOSER_HOST")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = parse_or_default(&lookup, "COMPOSER_PORT", DEFAULT_PORT);

        let timeout_secs =
            match parse_or_default(&lookup, "COMPOSER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS) {
                0 => {
                    warn!(
                        "COMPOSER_TIMEOUT_SECS must be positive, using {}",
                        DEFAULT_TIMEOUT_SECS
                    );
                    DEFAULT_TIMEOUT_SECS
                }
                secs => secs,
            };

        Ok(Self {
            upstream_url,
            host,
            port,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.upstream_url.as_str(), "http://localhost:3000/");
        assert_eq!(cfg.listen_addr(), "0.0.0.0:7860");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            ("COMPOSER_UPSTREAM_URL", "https://composer.internal/v1"),
            ("COMPOSER_HOST", "127.0.0.1"),
            ("COMPOSER_PORT", "9000"),
            ("COMPOSER_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.upstream_url.as_str(), "https://composer.internal/v1");
        assert_eq!(cfg.listen_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let cfg = load(&[("COMPOSER_PORT", "http"), ("COMPOSER_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(cfg.port, 7860);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_bad_upstream() {
        assert!(load(&[("COMPOSER_UPSTREAM_URL", "not a url")]).is_err());
        assert!(load(&[("COMPOSER_UPSTREAM_URL", "ftp://files.example.com")]).is_err());
    }
}
