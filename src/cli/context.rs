//! Wiring shared by every command: config, session and backend client.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::adapter::http::MarketplaceClient;
use crate::adapter::session::{FileTokenStore, Session};
use crate::application::{AdminActions, BuyerActions, DashboardLoader, SellerActions};
use crate::config::Config;
use crate::error::Result;

pub struct Context {
    pub config: Config,
    pub client: Arc<MarketplaceClient>,
}

impl Context {
    /// Load configuration, start logging and build the client.
    pub fn load(path: &Path, verbosity: u8) -> Result<Self> {
        let config = Config::load_or_default(path)?;
        config.logging.init(verbosity);

        let token_path = config.session.resolved_token_path();
        debug!(token_path = %token_path.display(), "Using session file");
        let session = Arc::new(Session::new(Box::new(FileTokenStore::new(token_path))));
        let client = Arc::new(MarketplaceClient::from_config(&config.api, session)?);
        Ok(Self { config, client })
    }

    #[must_use]
    pub fn loader(&self) -> DashboardLoader<MarketplaceClient> {
        DashboardLoader::new(Arc::clone(&self.client), &self.config.stats)
    }

    #[must_use]
    pub fn admin(&self) -> AdminActions<MarketplaceClient> {
        AdminActions::new(Arc::clone(&self.client))
    }

    #[must_use]
    pub fn buyer(&self) -> BuyerActions<MarketplaceClient> {
        BuyerActions::new(Arc::clone(&self.client))
    }

    #[must_use]
    pub fn seller(&self) -> SellerActions<MarketplaceClient> {
        SellerActions::new(Arc::clone(&self.client))
    }
}
