//! Durable credential storage port.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Access and refresh tokens as persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Where tokens survive restarts and are shared between processes.
///
/// Implementations are the source of truth; the session only mirrors them.
pub trait TokenStore: Send + Sync {
    /// Read stored tokens. `Ok(None)` means signed out.
    fn load(&self) -> Result<Option<StoredTokens>>;

    /// Replace stored tokens.
    fn save(&self, tokens: &StoredTokens) -> Result<()>;

    /// Remove stored tokens.
    fn clear(&self) -> Result<()>;
}
