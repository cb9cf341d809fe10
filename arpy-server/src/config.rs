// Copyright 2025 Arpy AI Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Arpy Server Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:5000")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Require bearer tokens on API routes (default: false; signup/login
    /// and health stay public either way)
    #[serde(default)]
    pub enabled: bool,

    /// Secret used to sign and validate JWTs
    pub jwt_secret: Option<String>,

    /// Rate limiting on the auth endpoints
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    /// Maximum requests per window
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,

    /// Time window in seconds
    #[serde(default = "default_rate_limit_window_secs")]
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Google Generative Language API key; chat runs in demo mode without it
    pub google_api_key: Option<String>,

    /// Gemini model name (default: gemini-1.5-flash)
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            gemini_model: default_gemini_model(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            jwt_secret: None,
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            max_requests: default_rate_limit_max_requests(),
            window_secs: default_rate_limit_window_secs(),
        }
    }
}

// Default values
fn default_http_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_enable_cors() -> bool {
    true
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_rate_limit_max_requests() -> u32 {
    30
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: HttpConfig::default(),
            auth: AuthConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - ARPY_HTTP_ADDR: HTTP listen address (default: 127.0.0.1:5000)
    /// - ARPY_ENABLE_CORS: Enable CORS (default: true)
    /// - ARPY_AUTH_ENABLED: Require bearer tokens on API routes
    /// - ARPY_JWT_SECRET: JWT signing secret
    /// - GOOGLE_API_KEY: Google Generative Language API key
    /// - ARPY_GEMINI_MODEL: Gemini model name
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("ARPY_HTTP_ADDR") {
            config.server.listen_addr = addr;
        }

        if let Ok(cors) = std::env::var("ARPY_ENABLE_CORS") {
            config.server.enable_cors = cors.parse().unwrap_or(true);
        }

        if let Ok(enabled) = std::env::var("ARPY_AUTH_ENABLED") {
            config.auth.enabled = enabled.parse().unwrap_or(false);
        }

        if let Ok(secret) = std::env::var("ARPY_JWT_SECRET") {
            config.auth.jwt_secret = Some(secret);
        }

        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            config.llm.google_api_key = Some(key);
        }

        if let Ok(model) = std::env::var("ARPY_GEMINI_MODEL") {
            config.llm.gemini_model = model;
        }

        config
    }

    /// Load configuration with priority: env > file > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        config = Self::merge_with_env(config);

        Ok(config)
    }

    /// Merge config with environment variables (env takes priority)
    fn merge_with_env(mut config: Self) -> Self {
        let env_config = Self::from_env();

        // Only override if the env var was explicitly set
        if std::env::var("ARPY_HTTP_ADDR").is_ok() {
            config.server.listen_addr = env_config.server.listen_addr;
        }
        if std::env::var("ARPY_ENABLE_CORS").is_ok() {
            config.server.enable_cors = env_config.server.enable_cors;
        }
        if std::env::var("ARPY_AUTH_ENABLED").is_ok() {
            config.auth.enabled = env_config.auth.enabled;
        }
        if std::env::var("ARPY_JWT_SECRET").is_ok() {
            config.auth.jwt_secret = env_config.auth.jwt_secret;
        }
        if std::env::var("GOOGLE_API_KEY").is_ok() {
            config.llm.google_api_key = env_config.llm.google_api_key;
        }
        if std::env::var("ARPY_GEMINI_MODEL").is_ok() {
            config.llm.gemini_model = env_config.llm.gemini_model;
        }

        config
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.listen_addr.parse()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.auth.enabled && self.auth.jwt_secret.is_none() {
            anyhow::bail!("Authentication enabled but no JWT secret configured");
        }

        Ok(())
    }
}
