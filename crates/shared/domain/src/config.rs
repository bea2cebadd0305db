use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub corpus: CorpusConfig,
    pub lookup: LookupConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Text-corpus settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Modules the dev corpus seeds at startup.
    pub default_modules: Vec<String>,
    /// Where installed module data lives (owned by external install flows).
    pub data_dir: PathBuf,
}

/// Lookup pipeline knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Per-request deadline for the whole pipeline, in milliseconds.
    pub deadline_ms: u64,
    /// Bounded capacity of the read-through passage cache.
    pub cache_capacity: u64,
    /// TTL of cached passage responses, in seconds.
    pub cache_ttl_seconds: u64,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4589, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            default_modules: vec!["KJV".to_owned(), "WEB".to_owned()],
            data_dir: PathBuf::from("."),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { deadline_ms: 5_000, cache_capacity: 1_000, cache_ttl_seconds: 300 }
    }
}
