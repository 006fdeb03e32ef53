//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `LADLE_*` environment variables.
//! The catalog API key is required: [`Config::from_env`] fails without it.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Which LLM backend to initialize at startup.
///
/// `Groq` still degrades to disabled at runtime when `GROQ_API_KEY` is absent,
/// mirroring how the rest of the pipeline treats the LLM as best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Groq,
    Ollama,
    Disabled,
}

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LADLE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// API key for the external recipe catalog. Required.
    pub catalog_api_key: String,

    /// Base URL of the recipe catalog. Default: the Spoonacular recipes API.
    pub catalog_base_url: String,

    /// Seconds before an in-flight catalog request times out. Default: `10`.
    pub catalog_timeout_secs: u64,

    /// Directory holding the embedding model (`config.json`,
    /// `model.safetensors`, `tokenizer.json`). Absent means stub mode.
    pub model_dir: Option<PathBuf>,

    /// LLM backend selector. Default: `groq`.
    pub llm_provider: LlmProvider,
}

/// Default catalog URL used when `LADLE_CATALOG_BASE_URL` is not set.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.spoonacular.com/recipes";

impl Config {
    const ENV_PORT: &'static str = "LADLE_PORT";
    const ENV_BIND_ADDR: &'static str = "LADLE_BIND_ADDR";
    const ENV_CATALOG_API_KEY: &'static str = "LADLE_CATALOG_API_KEY";
    const ENV_CATALOG_BASE_URL: &'static str = "LADLE_CATALOG_BASE_URL";
    const ENV_CATALOG_TIMEOUT_SECS: &'static str = "LADLE_CATALOG_TIMEOUT_SECS";
    const ENV_MODEL_DIR: &'static str = "LADLE_MODEL_DIR";
    const ENV_LLM_PROVIDER: &'static str = "LADLE_LLM_PROVIDER";

    /// Loads configuration from environment variables (falling back to
    /// defaults for everything except the catalog API key).
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = Self::parse_port_from_env(8080)?;
        let bind_addr =
            Self::parse_bind_addr_from_env(IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)))?;

        let catalog_api_key = Self::parse_nonempty_from_env(Self::ENV_CATALOG_API_KEY)
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_CATALOG_API_KEY,
            })?;

        let catalog_base_url = Self::parse_string_from_env(
            Self::ENV_CATALOG_BASE_URL,
            DEFAULT_CATALOG_BASE_URL.to_string(),
        );
        let catalog_timeout_secs = Self::parse_u64_from_env(Self::ENV_CATALOG_TIMEOUT_SECS, 10);
        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let llm_provider = Self::parse_llm_provider_from_env()?;

        Ok(Self {
            port,
            bind_addr,
            catalog_api_key,
            catalog_base_url,
            catalog_timeout_secs,
            model_dir,
            llm_provider,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_llm_provider_from_env() -> Result<LlmProvider, ConfigError> {
        match env::var(Self::ENV_LLM_PROVIDER) {
            Ok(value) => match value.trim().to_lowercase().as_str() {
                "groq" => Ok(LlmProvider::Groq),
                "ollama" => Ok(LlmProvider::Ollama),
                "disabled" | "none" => Ok(LlmProvider::Disabled),
                _ => Err(ConfigError::UnknownLlmProvider { value }),
            },
            Err(_) => Ok(LlmProvider::Groq),
        }
    }

    fn parse_nonempty_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_nonempty_from_env(var_name).map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
