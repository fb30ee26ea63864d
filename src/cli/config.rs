//! Handlers for the `config` command group.
//!
//! These run without a backend: they only read the file.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::config::Config;
use crate::error::Result;

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load_or_default(path)?;
    if output::is_json() {
        output::json_output(json!({ "command": "config.show", "config": config }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("File", path.display());
    if !path.exists() {
        output::note("(file not found, showing defaults)");
    }

    output::section("API");
    output::field("Base URL", &config.api.base_url);
    output::field("Timeout", format!("{}ms", config.api.timeout_ms));
    output::field("Connect", format!("{}ms", config.api.connect_timeout_ms));
    output::field(
        "Retries",
        format!(
            "{} attempts, {}ms backoff",
            config.api.retry_max_attempts, config.api.retry_backoff_ms
        ),
    );

    output::section("Session");
    output::field("Token file", config.session.resolved_token_path().display());

    output::section("Stats");
    output::field("Deposit fallback", output::money(config.stats.deposit_fallback));
    output::field("Global fetch", config.stats.global_fetch_limit);

    output::section("Search");
    output::field("Debounce", format!("{}ms", config.search.debounce_ms));
    output::field("Page size", config.search.page_size);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    Config::load(path)?;
    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
        }));
        return Ok(());
    }
    output::success("Configuration is valid");
    output::field("Path", path.display());
    output::section("Next");
    output::note("mcdesk login");
    Ok(())
}
