use std::fs;

use mcdesk::config::{Config, ENV_API_URL, ENV_TOKEN_PATH};
use mcdesk::error::{ConfigError, Error};
use mcdesk::testkit::config::{offline, offline_toml};
use rust_decimal_macros::dec;

#[test]
fn offline_fixture_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, offline_toml(dir.path())).unwrap();

    let loaded = Config::load(&path).unwrap();
    let expected = offline(dir.path());
    assert_eq!(loaded.api.retry_max_attempts, expected.api.retry_max_attempts);
    assert_eq!(loaded.api.retry_backoff_ms, expected.api.retry_backoff_ms);
    assert_eq!(loaded.stats, expected.stats);
    assert_eq!(loaded.search, expected.search);
}

#[test]
fn missing_file_is_an_error_for_load_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
    assert!(Config::load_or_default(&path).is_ok());
}

#[test]
fn invalid_values_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("[api]\ntimeout_ms = 0\n", "api.timeout_ms"),
        ("[stats]\nglobal_fetch_limit = 0\n", "stats.global_fetch_limit"),
        ("[search]\npage_size = 0\n", "search.page_size"),
        ("[stats]\ndeposit_fallback = \"-5\"\n", "stats.deposit_fallback"),
    ];

    for (content, expected) in cases {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        match Config::load(&path) {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, expected);
            }
            other => panic!("{expected}: expected invalid value, got {other:?}"),
        }
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[api\nbase_url = ").unwrap();

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn deposit_fallback_is_configurable() {
    let config = Config::parse_toml("[stats]\ndeposit_fallback = \"7500\"\n").unwrap();
    assert_eq!(config.stats.policy().deposit_fallback, dec!(7500));
}

// The only test in this binary that touches the process environment.
#[test]
fn environment_overrides_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("env-session.json");
    std::env::set_var(ENV_API_URL, "https://staging.example.com/api/");
    std::env::set_var(ENV_TOKEN_PATH, &token_path);

    let mut config = Config::parse_toml("[api]\nbase_url = \"https://prod.example.com/api/\"\n").unwrap();
    config.apply_env_overrides();

    std::env::remove_var(ENV_API_URL);
    std::env::remove_var(ENV_TOKEN_PATH);

    assert_eq!(config.api.base_url, "https://staging.example.com/api/");
    assert_eq!(config.session.resolved_token_path(), token_path);
}
