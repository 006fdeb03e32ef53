use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_ladle_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("LADLE_PORT");
        env::remove_var("LADLE_BIND_ADDR");
        env::remove_var("LADLE_CATALOG_API_KEY");
        env::remove_var("LADLE_CATALOG_BASE_URL");
        env::remove_var("LADLE_CATALOG_TIMEOUT_SECS");
        env::remove_var("LADLE_MODEL_DIR");
        env::remove_var("LADLE_LLM_PROVIDER");
    }
}

const KEY: (&str, &str) = ("LADLE_CATALOG_API_KEY", "test-api-key");

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_ladle_env();

    with_env_vars(&[KEY], || {
        let config = Config::from_env().expect("should parse with defaults");

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.bind_addr,
            IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.catalog_api_key, "test-api-key");
        assert_eq!(config.catalog_base_url, DEFAULT_CATALOG_BASE_URL);
        assert_eq!(config.catalog_timeout_secs, 10);
        assert!(config.model_dir.is_none());
        assert_eq!(config.llm_provider, LlmProvider::Groq);
    });
}

#[test]
#[serial]
fn test_missing_api_key_is_fatal() {
    clear_ladle_env();

    let result = Config::from_env();
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar { .. }));
    assert!(err.to_string().contains("LADLE_CATALOG_API_KEY"));
}

#[test]
#[serial]
fn test_blank_api_key_is_fatal() {
    clear_ladle_env();

    with_env_vars(&[("LADLE_CATALOG_API_KEY", "   ")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::MissingEnvVar { .. })));
    });
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_ladle_env();

    with_env_vars(&[KEY, ("LADLE_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_ladle_env();

    with_env_vars(&[KEY, ("LADLE_PORT", "0")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_ladle_env();

    with_env_vars(&[KEY, ("LADLE_PORT", "not_a_port")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::PortParseError { .. })));
    });
}

#[test]
#[serial]
fn test_from_env_custom_bind_addr() {
    clear_ladle_env();

    with_env_vars(&[KEY, ("LADLE_BIND_ADDR", "0.0.0.0")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_ladle_env();

    with_env_vars(&[KEY, ("LADLE_BIND_ADDR", "not.an.ip.address")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
    });
}

#[test]
#[serial]
fn test_llm_provider_selection() {
    clear_ladle_env();

    with_env_vars(&[KEY, ("LADLE_LLM_PROVIDER", "ollama")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.llm_provider, LlmProvider::Ollama);
    });

    with_env_vars(&[KEY, ("LADLE_LLM_PROVIDER", "disabled")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.llm_provider, LlmProvider::Disabled);
    });

    with_env_vars(&[KEY, ("LADLE_LLM_PROVIDER", "none")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.llm_provider, LlmProvider::Disabled);
    });
}

#[test]
#[serial]
fn test_unknown_llm_provider_rejected() {
    clear_ladle_env();

    with_env_vars(&[KEY, ("LADLE_LLM_PROVIDER", "claude")], || {
        let result = Config::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::UnknownLlmProvider { .. })
        ));
    });
}

#[test]
#[serial]
fn test_invalid_timeout_uses_default() {
    clear_ladle_env();

    with_env_vars(&[KEY, ("LADLE_CATALOG_TIMEOUT_SECS", "soon")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.catalog_timeout_secs, 10);
    });
}

#[test]
fn test_validate_nonexistent_model_dir() {
    let config = Config {
        port: 8080,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        catalog_api_key: "k".to_string(),
        catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
        catalog_timeout_secs: 10,
        model_dir: Some(PathBuf::from("/nonexistent/path/to/model")),
        llm_provider: LlmProvider::Disabled,
    };

    let result = config.validate();
    assert!(matches!(result, Err(ConfigError::PathNotFound { .. })));
}

#[test]
fn test_validate_model_dir_is_file() {
    let config = Config {
        port: 8080,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        catalog_api_key: "k".to_string(),
        catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
        catalog_timeout_secs: 10,
        model_dir: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        llm_provider: LlmProvider::Disabled,
    };

    let result = config.validate();
    assert!(matches!(result, Err(ConfigError::NotADirectory { .. })));
}

#[test]
fn test_validate_success_with_valid_model_dir() {
    let config = Config {
        port: 8080,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        catalog_api_key: "k".to_string(),
        catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
        catalog_timeout_secs: 10,
        model_dir: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")),
        llm_provider: LlmProvider::Disabled,
    };

    assert!(config.validate().is_ok());
}
