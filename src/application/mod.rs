//! Application services (use cases).
//!
//! These services drive the [`MarketplaceApi`](crate::port::MarketplaceApi)
//! port and turn its results into screen state.

pub mod actions;
pub mod cancel;
pub mod dashboard;
pub mod search;
pub mod view;

pub use actions::{AdminActions, BuyerActions, SellerActions};
pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use dashboard::{
    AdminClosings, AdminOverview, BuyerDashboard, CreationForm, DashboardLoader, Loaded,
    SellerDashboard, TransactionView,
};
pub use search::{run_search, Debouncer, SearchResults, SearchTarget};
pub use view::{Notice, NoticeLevel, ViewState};
