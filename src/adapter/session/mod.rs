//! Authenticated session shared by every request.
//!
//! The durable [`TokenStore`] is the source of truth. The session keeps an
//! in-memory mirror that is refreshed on every read, so a login or logout in
//! another process is picked up on the next request. The mirror is only
//! served when the store cannot be read.

mod store;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::Result;
use crate::port::{StoredTokens, TokenStore};

pub use store::{FileTokenStore, MemoryTokenStore};

/// Injectable holder of the current credentials.
pub struct Session {
    store: Box<dyn TokenStore>,
    mirror: RwLock<Option<StoredTokens>>,
}

impl Session {
    #[must_use]
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self {
            store,
            mirror: RwLock::new(None),
        }
    }

    /// A session backed by process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryTokenStore::new()))
    }

    /// Current tokens, read from durable storage first.
    #[must_use]
    pub fn tokens(&self) -> Option<StoredTokens> {
        match self.store.load() {
            Ok(tokens) => {
                *self.mirror.write() = tokens.clone();
                tokens
            }
            Err(err) => {
                warn!(error = %err, "Token store unreadable, using in-memory copy");
                self.mirror.read().clone()
            }
        }
    }

    /// Bearer token for the next request.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.tokens().map(|t| t.access_token)
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.tokens().and_then(|t| t.refresh_token)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.access_token().is_some()
    }

    /// Persist new tokens and mirror them.
    pub fn set_tokens(&self, tokens: StoredTokens) -> Result<()> {
        self.store.save(&tokens)?;
        *self.mirror.write() = Some(tokens);
        debug!("Session tokens updated");
        Ok(())
    }

    /// Replace only the access token, keeping the stored refresh token.
    pub fn set_access_token(&self, access_token: impl Into<String>) -> Result<()> {
        let refresh_token = self.refresh_token();
        self.set_tokens(StoredTokens {
            access_token: access_token.into(),
            refresh_token,
        })
    }

    /// Sign out locally.
    pub fn clear(&self) -> Result<()> {
        *self.mirror.write() = None;
        self.store.clear()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.mirror.read().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::Error;

    struct BrokenStore;

    impl TokenStore for BrokenStore {
        fn load(&self) -> Result<Option<StoredTokens>> {
            Err(Error::Session("disk gone".into()))
        }
        fn save(&self, _tokens: &StoredTokens) -> Result<()> {
            Ok(())
        }
        fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    /// Store handle shared between two sessions, like two processes on one file.
    struct Shared(Arc<MemoryTokenStore>);

    impl TokenStore for Shared {
        fn load(&self) -> Result<Option<StoredTokens>> {
            self.0.load()
        }
        fn save(&self, tokens: &StoredTokens) -> Result<()> {
            self.0.save(tokens)
        }
        fn clear(&self) -> Result<()> {
            self.0.clear()
        }
    }

    fn tokens(access: &str) -> StoredTokens {
        StoredTokens {
            access_token: access.into(),
            refresh_token: Some("r1".into()),
        }
    }

    #[test]
    fn durable_store_wins_over_mirror() {
        let shared = Arc::new(MemoryTokenStore::new());
        let first = Session::new(Box::new(Shared(shared.clone())));
        let second = Session::new(Box::new(Shared(shared)));

        first.set_tokens(tokens("a1")).unwrap();
        assert_eq!(second.access_token().as_deref(), Some("a1"));

        second.clear().unwrap();
        assert_eq!(first.access_token(), None);
    }

    #[test]
    fn mirror_serves_when_store_fails() {
        let session = Session::new(Box::new(BrokenStore));
        session.set_tokens(tokens("cached")).unwrap();
        assert_eq!(session.access_token().as_deref(), Some("cached"));
    }

    #[test]
    fn set_access_token_keeps_refresh() {
        let session = Session::in_memory();
        session.set_tokens(tokens("old")).unwrap();
        session.set_access_token("new").unwrap();
        let current = session.tokens().unwrap();
        assert_eq!(current.access_token, "new");
        assert_eq!(current.refresh_token.as_deref(), Some("r1"));
    }
}
