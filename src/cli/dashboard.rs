//! Handler for `dashboard`.
//!
//! Picks the view from `--as` or the signed-in account's role. Ctrl-C
//! cancels the load and nothing is printed.

use indicatif::ProgressBar;
use serde::Serialize;

use super::command::{DashboardArgs, Role};
use super::context::Context;
use super::{output, render};
use crate::application::{
    cancel_pair, AdminClosings, AdminOverview, BuyerDashboard, Loaded, SellerDashboard,
};
use crate::error::Result;
use crate::port::MarketplaceApi;

pub async fn execute(ctx: &Context, args: &DashboardArgs) -> Result<()> {
    let role = match args.role {
        Some(role) => role,
        None => match ctx.client.current_user().await {
            Ok(user) => Role::of(&user.role),
            Err(err) => {
                output::error(&err.display_message());
                output::hint("sign in with `mcdesk login`, or pass --as <role>");
                return Ok(());
            }
        },
    };

    let (handle, signal) = cancel_pair();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let loader = ctx.loader();
    let query = args.list.query();
    let pb = output::spinner("Loading dashboard");
    match role {
        Role::Admin if args.closings => {
            if let Some(view) = finish(&pb, loader.admin_closings(&query, &signal).await) {
                show("dashboard.closings", &view, admin_closings);
            }
        }
        Role::Admin => {
            if let Some(view) = finish(&pb, loader.admin_overview(&signal).await) {
                show("dashboard.admin", &view, admin_overview);
            }
        }
        Role::Seller => {
            if let Some(view) = finish(&pb, loader.seller(&query, &signal).await) {
                show("dashboard.seller", &view, seller);
            }
        }
        Role::Buyer => {
            if let Some(view) = finish(&pb, loader.buyer(&query, &signal).await) {
                show("dashboard.buyer", &view, buyer);
            }
        }
    }
    interrupt.abort();
    Ok(())
}

fn finish<T>(pb: &ProgressBar, loaded: Loaded<T>) -> Option<T> {
    match loaded {
        Loaded::Ready(view) => {
            output::spinner_success(pb, "Loaded");
            Some(view)
        }
        Loaded::Cancelled => {
            output::spinner_fail(pb, "Cancelled");
            None
        }
    }
}

fn show<T: Serialize>(command: &str, view: &T, human: impl FnOnce(&T)) {
    if !render::json_document(command, "view", view) {
        human(view);
    }
}

fn admin_closings(view: &AdminClosings) {
    output::section("Active closings");
    render::view(&view.transactions, |page| {
        render::page(page, render::transactions_table);
    });
    output::section("All transactions");
    render::transaction_stats(&view.stats);
    output::section("Stripe payments");
    if view.charges.is_empty() {
        output::note("No charges recorded.");
    } else {
        output::lines(&render::charges_table(&view.charges));
    }
}

fn admin_overview(view: &AdminOverview) {
    output::section("Users");
    render::user_stats(&view.users);
    output::section("Listings");
    render::listing_stats(&view.listings);
    output::section("Offers");
    render::offer_stats(&view.offers);
    output::section("Transactions");
    render::transaction_stats(&view.transactions);
    if view.offers_awaiting_review > 0 {
        output::warning(&format!(
            "{} offers awaiting review",
            view.offers_awaiting_review
        ));
        output::hint("run `mcdesk offers list --admin --status PENDING`");
    }
}

fn buyer(view: &BuyerDashboard) {
    output::section("Your transactions");
    render::view(&view.transactions, |page| {
        render::page(page, render::transactions_table);
    });
    output::section("Summary");
    render::transaction_stats(&view.stats);
    output::section("Your offers");
    render::view(&view.offers, |page| render::page(page, render::offers_table));
    render::offer_stats(&view.offer_stats);
    needs_action(view.needs_action.len());
}

fn seller(view: &SellerDashboard) {
    output::section("Your transactions");
    render::view(&view.transactions, |page| {
        render::page(page, render::transactions_table);
    });
    output::section("Summary");
    render::transaction_stats(&view.stats);
    output::section("Your listings");
    render::view(&view.listings, |page| render::page(page, render::listings_table));
    render::listing_stats(&view.listing_stats);
    needs_action(view.needs_action.len());
}

fn needs_action(count: usize) {
    if count > 0 {
        output::warning(&format!("{count} transactions need your action"));
    }
}
