//! Canonical test configuration.

use std::path::Path;

use crate::config::Config;

/// Defaults pointed at an unroutable backend, with tokens under `dir`.
pub fn offline(dir: &Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = "http://127.0.0.1:9/api/".into();
    config.api.retry_max_attempts = 1;
    config.api.retry_backoff_ms = 0;
    config.session.token_path = Some(dir.join("session.json"));
    config
}

/// TOML matching [`offline`], for CLI tests that read a config file.
pub fn offline_toml(dir: &Path) -> String {
    format!(
        r#"[api]
base_url = "http://127.0.0.1:9/api/"
retry_max_attempts = 1
retry_backoff_ms = 0

[session]
token_path = "{}"
"#,
        dir.join("session.json").display()
    )
}
