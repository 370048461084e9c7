use std::{net::IpAddr, path::Path, path::PathBuf};

use anyhow::Context;
use config::{File, FileFormat};
use estudio_models::email_address::EmailAddress;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Loads and merges the given config files. Later files override earlier
/// ones key by key, so a deployment only has to redefine what differs from
/// the defaults.
pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    let mut builder = config::Config::builder();
    for path in paths {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        builder = builder.add_source(File::from_str(&content, FileFormat::Toml));
    }
    builder
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub real_ip: Option<RealIpConfig>,
}

/// Trust the `header` value as the client address, but only for requests
/// arriving from `set_from` (the reverse proxy).
#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub backend: EmailBackend,
    pub smtp_url: Option<String>,
    pub from: EmailAddress,
    #[serde(default)]
    pub inert: InertEmailConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailBackend {
    Smtp,
    Inert,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InertEmailConfig {
    /// Probability in `[0, 1]` of an injected send failure, to exercise the
    /// failure-handling paths without a real provider.
    pub fault_rate: f64,
    pub latency_ms: u64,
}

impl Default for InertEmailConfig {
    fn default() -> Self {
        Self {
            fault_rate: 0.0,
            latency_ms: 150,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub recipient: EmailAddress,
    pub templates_dir: Option<PathBuf>,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u64,
    pub capacity: usize,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s)
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom(format_args!("Invalid duration: {s:?}")))
    }
}

/// Parses whitespace-separated `<digits><unit>` terms ("1d 2h 3m 4s") into
/// their total. The empty string is the zero duration.
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let mut total = 0u64;
    for term in s.split_whitespace() {
        let digits = term.strip_suffix(|c: char| c.is_ascii_alphabetic())?;
        let scale = match &term[digits.len()..] {
            "s" => 1,
            "m" => 60,
            "h" => 60 * 60,
            "d" => 24 * 60 * 60,
            _ => return None,
        };
        let value = digits.parse::<u64>().ok()?;
        total = total.checked_add(value.checked_mul(scale)?)?;
    }
    Some(std::time::Duration::from_secs(total))
}
