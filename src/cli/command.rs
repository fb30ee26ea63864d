//! Command-line interface definitions.
//!
//! Defines the CLI structure for mcdesk using `clap`. Every list command
//! shares [`ListArgs`]; every command accepts the global output flags.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use super::paths;
use crate::application::SearchTarget;
use crate::domain::UserRole;
use crate::port::ListQuery;

/// MC authority marketplace desk
#[derive(Parser, Debug)]
#[command(name = "mcdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Marketplace role a command acts as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Buyer => UserRole::Buyer,
            Role::Seller => UserRole::Seller,
            Role::Admin => UserRole::Admin,
        }
    }
}

impl Role {
    /// The role of an account; unknown roles get the least privileged view.
    #[must_use]
    pub fn of(role: &UserRole) -> Self {
        match role {
            UserRole::Admin => Role::Admin,
            UserRole::Seller => Role::Seller,
            UserRole::Buyer | UserRole::Unknown(_) => Role::Buyer,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),

    /// Create an account and sign in
    Register(RegisterArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Browse and act on transactions
    #[command(subcommand)]
    Transactions(TransactionsCommand),

    /// Browse and act on offers
    #[command(subcommand)]
    Offers(OffersCommand),

    /// Browse and review listings
    #[command(subcommand)]
    Listings(ListingsCommand),

    /// Manage user accounts (admin)
    #[command(subcommand)]
    Users(UsersCommand),

    /// Show the dashboard for a role
    Dashboard(DashboardArgs),

    /// Search users or listings as you type
    Search(SearchArgs),

    /// Look up an FMCSA carrier by USDOT number
    Carrier(CarrierArgs),

    /// Search Creditsafe company records by name
    Companies(CompaniesArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Buyer or seller; admin accounts are created by the platform
    #[arg(long, value_enum, default_value = "buyer")]
    pub role: Role,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Password (prompted with confirmation when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

/// Pagination and filters shared by list commands.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Show every record instead of your own (admin)
    #[arg(long)]
    pub admin: bool,

    /// Filter by status, e.g. IN_REVIEW
    #[arg(long)]
    pub status: Option<String>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, default_value = "1")]
    pub page: u32,

    #[arg(long, default_value = "20")]
    pub limit: u32,
}

impl ListArgs {
    #[must_use]
    pub fn query(&self) -> ListQuery {
        let mut query = ListQuery {
            limit: self.limit,
            ..ListQuery::default()
        }
        .with_page(self.page);
        if let Some(search) = &self.search {
            query = query.with_search(search.as_str());
        }
        if let Some(status) = &self.status {
            query = query.with_status(status.trim().to_ascii_uppercase());
        }
        query
    }
}

#[derive(Subcommand, Debug)]
pub enum TransactionsCommand {
    /// List transactions
    List(ListArgs),
    /// Show one transaction with its workflow progress
    Show { id: String },
    /// Approve a transaction as buyer, seller or admin
    Approve {
        id: String,
        /// Role to approve as
        #[arg(long = "as", value_enum, default_value = "admin")]
        role: Role,
    },
    /// Confirm the deposit arrived (admin)
    VerifyDeposit { id: String },
    /// Confirm the final payment arrived (admin)
    VerifyPayment { id: String },
    /// Cancel a transaction (admin)
    Cancel {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Record a payment reference (buyer)
    Pay {
        id: String,
        /// Bank or wire reference
        reference: String,
        /// Record the final payment instead of the deposit
        #[arg(long)]
        r#final: bool,
    },
    /// Upload proof of payment (buyer)
    UploadProof { id: String, file: PathBuf },
    /// Open a transaction (admin)
    Create(CreateTransactionArgs),
}

#[derive(Args, Debug)]
pub struct CreateTransactionArgs {
    /// Use the terms of this offer
    #[arg(long, conflicts_with_all = ["listing", "buyer", "price"])]
    pub from_offer: Option<String>,

    #[arg(long, required_unless_present = "from_offer")]
    pub listing: Option<String>,

    #[arg(long, required_unless_present = "from_offer")]
    pub buyer: Option<String>,

    /// Agreed price in dollars
    #[arg(long, required_unless_present = "from_offer")]
    pub price: Option<Decimal>,

    #[arg(long)]
    pub deposit: Option<Decimal>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum OffersCommand {
    /// List offers
    List(ListArgs),
    /// Approve an offer (admin)
    Approve {
        /// One or more offer ids
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Reject an offer (admin)
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Make an offer on a listing (buyer)
    Create {
        listing: String,
        /// Amount in dollars
        amount: Decimal,
        #[arg(long)]
        message: Option<String>,
        /// Buy at the listing price
        #[arg(long)]
        buy_now: bool,
    },
    /// Withdraw your offer (buyer)
    Withdraw { id: String },
    /// Accept the seller's counter-offer (buyer)
    AcceptCounter { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ListingsCommand {
    /// List listings
    List(ListArgs),
    /// Show one listing
    Show { id: String },
    /// Publish a listing (admin)
    Approve { id: String },
    /// Reject a listing (admin)
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by role
        #[arg(long, value_enum)]
        role: Option<Role>,
    },
    /// Block a user
    Block {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Unblock a user
    Unblock { id: String },
    /// Mark a user as verified
    Verify { id: String },
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Role to show (defaults to the signed-in account's role)
    #[arg(long = "as", value_enum)]
    pub role: Option<Role>,

    /// Show admin active closings instead of the overview
    #[arg(long)]
    pub closings: bool,

    #[command(flatten)]
    pub list: ListArgs,
}

/// What `search` looks up.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SearchKind {
    Users,
    Buyers,
    Listings,
}

impl From<SearchKind> for SearchTarget {
    fn from(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Users => SearchTarget::Users,
            SearchKind::Buyers => SearchTarget::Buyers,
            SearchKind::Listings => SearchTarget::Listings,
        }
    }
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(value_enum)]
    pub kind: SearchKind,

    /// Search once for this term instead of reading terms from stdin
    #[arg(long)]
    pub term: Option<String>,
}

#[derive(Args, Debug)]
pub struct CarrierArgs {
    /// USDOT number
    pub dot: String,
}

#[derive(Args, Debug)]
pub struct CompaniesArgs {
    /// Company name or part of it
    pub name: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied
    Show,
    /// Validate the configuration file
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_args_build_query() {
        let cli = Cli::parse_from([
            "mcdesk",
            "transactions",
            "list",
            "--status",
            "in_review",
            "--search",
            " acme ",
            "--page",
            "2",
        ]);
        let Commands::Transactions(TransactionsCommand::List(args)) = cli.command else {
            panic!("expected transactions list");
        };
        let query = args.query();
        assert_eq!(query.status.as_deref(), Some("IN_REVIEW"));
        assert_eq!(query.search.as_deref(), Some("acme"));
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 20);
    }

    #[test]
    fn approve_defaults_to_admin() {
        let cli = Cli::parse_from(["mcdesk", "transactions", "approve", "t1"]);
        assert!(matches!(
            cli.command,
            Commands::Transactions(TransactionsCommand::Approve {
                role: Role::Admin,
                ..
            })
        ));
    }

    #[test]
    fn create_requires_terms_or_offer() {
        assert!(Cli::try_parse_from(["mcdesk", "transactions", "create"]).is_err());
        assert!(
            Cli::try_parse_from(["mcdesk", "transactions", "create", "--from-offer", "o1"]).is_ok()
        );
    }

    #[test]
    fn register_defaults_to_buyer() {
        let cli = Cli::parse_from(["mcdesk", "register", "--email", "a@b.co", "--name", "Ana"]);
        let Commands::Register(args) = cli.command else {
            panic!("expected register");
        };
        assert_eq!(args.role, Role::Buyer);
        assert!(args.password.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["mcdesk", "whoami", "--json", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}
