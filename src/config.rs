//! Configuration for the kitchen-sakhi service.
//!
//! Every runtime knob lives in [`ServiceConfig`], built via its
//! [`ServiceConfigBuilder`]. The binary maps CLI flags and environment
//! variables onto the builder; embedders and tests set only what they need
//! and rely on the defaults for the rest.

use crate::error::KitchenError;
use crate::pipeline::paginate::PageGeometry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default MongoDB target when no connection string is configured.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";

/// Configuration for the HTTP service.
///
/// # Example
/// ```rust
/// use kitchen_sakhi::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .port(8080)
///     .model("gemini-1.5-pro")
///     .build()
///     .unwrap();
/// assert_eq!(config.public_base_url(), "http://localhost:8080");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Interface to bind. Default: `0.0.0.0`.
    pub host: String,

    /// TCP port. Default: 5001.
    pub port: u16,

    /// MongoDB connection string. Default: [`DEFAULT_MONGO_URI`].
    pub mongo_uri: String,

    /// Database holding the history collections. Default: `KitchenSakhi`.
    pub database: String,

    /// `edgequake-llm` provider name. Default: `gemini`.
    pub provider_name: String,

    /// Model identifier passed to the provider. Default: `gemini-1.5-flash`.
    pub model: String,

    /// Sampling temperature. Default: 0.7.
    ///
    /// Suggestions and plans are meant to be varied, so this sits higher
    /// than a transcription task would use.
    pub temperature: f32,

    /// Maximum tokens generated per call. Default: 2048.
    ///
    /// A seven-day plan with three meals a day and tips runs to roughly
    /// 1 000 tokens; 2048 leaves headroom without unbounded cost.
    pub max_tokens: usize,

    /// Directory exported PDFs are written to and served from. Default: `static`.
    pub static_dir: PathBuf,

    /// Absolute URL clients use to reach this service.
    /// If None, `http://localhost:<port>`.
    pub public_base_url: Option<String>,

    /// Page layout for PDF export. Default: [`PageGeometry::A4`].
    pub geometry: PageGeometry,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database: "KitchenSakhi".to_string(),
            provider_name: "gemini".to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            static_dir: PathBuf::from("static"),
            public_base_url: None,
            geometry: PageGeometry::A4,
        }
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// `host:port` string to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }

    /// Absolute URL prefix under which exported files are reachable.
    pub fn static_url_prefix(&self) -> String {
        format!("{}/static", self.public_base_url())
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn mongo_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.mongo_uri = uri.into();
        self
    }

    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.config.database = name.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.static_dir = dir.into();
        self
    }

    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.public_base_url = Some(url.into());
        self
    }

    pub fn geometry(mut self, geometry: PageGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, KitchenError> {
        let c = &self.config;
        if c.port == 0 {
            return Err(KitchenError::InvalidConfig("Port must be >= 1".into()));
        }
        if c.database.trim().is_empty() {
            return Err(KitchenError::InvalidConfig(
                "Database name must not be empty".into(),
            ));
        }
        if c.mongo_uri.trim().is_empty() {
            return Err(KitchenError::InvalidConfig(
                "MongoDB URI must not be empty".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(KitchenError::InvalidConfig(
                "max_tokens must be >= 1".into(),
            ));
        }
        c.geometry.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let c = ServiceConfig::builder().build().unwrap();
        assert_eq!(c.port, 5001);
        assert_eq!(c.mongo_uri, "mongodb://localhost:27017/");
        assert_eq!(c.database, "KitchenSakhi");
        assert_eq!(c.bind_address(), "0.0.0.0:5001");
        assert_eq!(c.static_url_prefix(), "http://localhost:5001/static");
        assert_eq!(c.geometry, PageGeometry::A4);
    }

    #[test]
    fn explicit_public_url_wins() {
        let c = ServiceConfig::builder()
            .public_base_url("https://sakhi.example.org/")
            .build()
            .unwrap();
        assert_eq!(c.static_url_prefix(), "https://sakhi.example.org/static");
    }

    #[test]
    fn temperature_is_clamped() {
        let c = ServiceConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(ServiceConfig::builder().port(0).build().is_err());
        assert!(ServiceConfig::builder().database(" ").build().is_err());
        assert!(ServiceConfig::builder().max_tokens(0).build().is_err());

        let bad = PageGeometry {
            line_height: -1.0,
            ..PageGeometry::A4
        };
        assert!(ServiceConfig::builder().geometry(bad).build().is_err());
    }

    #[test]
    fn validation_messages_are_ascii() {
        for err in [
            ServiceConfig::builder().port(0).build().unwrap_err(),
            ServiceConfig::builder().max_tokens(0).build().unwrap_err(),
        ] {
            let message = err.to_string();
            assert!(message.is_ascii(), "{message}");
            assert!(message.contains(">= 1"));
        }
    }
}
