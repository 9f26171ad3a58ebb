//! Configuration types and builders.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;

/// Default HTTP port for the SSE transport.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind host for the SSE transport.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// How the server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Newline-delimited JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// HTTP with server-sent events.
    Sse,
}

impl TransportMode {
    /// Exact, case-sensitive match.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stdio" => Some(Self::Stdio),
            "sse" => Some(Self::Sse),
            _ => None,
        }
    }

    /// Select the mode from the final command-line argument. Anything other
    /// than `sse`, including no argument at all, selects stdio.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        args.into_iter()
            .last()
            .and_then(|arg| Self::parse(arg.as_ref()))
            .unwrap_or_default()
    }
}

/// Listening address for the SSE transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl HttpConfig {
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Builder for HttpConfig with fluent API.
#[derive(Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Read `PORT` and `HOSTNAME` from the process environment.
    pub fn from_env(self) -> Result<Self> {
        self.from_lookup(|key| env::var(key).ok())
    }

    /// Read `PORT` and `HOSTNAME` through `lookup`. Empty values count as
    /// unset.
    pub fn from_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = lookup("PORT") {
            self.config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".into(),
                message: format!("Invalid port number: {}", port).into(),
            })?;
        }

        if let Some(host) = lookup("HOSTNAME") {
            self.config.host = host.trim().to_string();
        }

        Ok(self)
    }

    pub fn build(self) -> Result<HttpConfig> {
        if self.config.host.trim().is_empty() {
            return Err(ConfigError::MissingField("host".into()).into());
        }
        Ok(self.config)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub transport: TransportMode,
    pub http: HttpConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            transport: TransportMode::default(),
            http: HttpConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Configuration for `transport`, reading the environment.
    pub fn from_env(transport: TransportMode) -> Result<Self> {
        Self::from_lookup(transport, |key| env::var(key).ok())
    }

    /// Configuration for `transport`. The HTTP settings are only read, and
    /// only able to fail, when serving SSE.
    pub fn from_lookup<F>(transport: TransportMode, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http = match transport {
            TransportMode::Sse => HttpConfig::builder().from_lookup(lookup)?.build()?,
            TransportMode::Stdio => HttpConfig::default(),
        };

        Ok(Self::builder().transport(transport).http(http).build())
    }
}

/// Builder for ServerConfig.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn transport(mut self, transport: TransportMode) -> Self {
        self.config.transport = transport;
        self
    }

    pub fn http(mut self, http: HttpConfig) -> Self {
        self.config.http = http;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}
