//! Handlers for the `listings` command group.

use super::command::ListingsCommand;
use super::context::Context;
use super::transactions::report;
use super::{output, render};
use crate::application::ViewState;
use crate::domain::ListingId;
use crate::error::Result;
use crate::port::{MarketplaceApi, Scope};

pub async fn execute(ctx: &Context, command: &ListingsCommand) -> Result<()> {
    match command {
        ListingsCommand::List(args) => {
            let scope = if args.admin { Scope::Admin } else { Scope::Own };
            let state = ViewState::from_page(
                ctx.client.list_listings(scope, &args.query()).await,
                "No listings match.",
            );
            if render::json_document("listings.list", "view", &state) {
                return Ok(());
            }
            output::section("Listings");
            render::view(&state, |page| render::page(page, render::listings_table));
        }
        ListingsCommand::Show { id } => {
            let state = ViewState::from_result(
                ctx.client.get_listing(&ListingId::new(id.as_str())).await,
            );
            if render::json_document("listings.show", "view", &state) {
                return Ok(());
            }
            render::view(&state, render::listing_detail);
        }
        ListingsCommand::Approve { id } => {
            let notice = ctx.admin().approve_listing(&ListingId::new(id.as_str())).await;
            report("listings.approve", &notice);
        }
        ListingsCommand::Reject { id, reason } => {
            let notice = ctx
                .admin()
                .reject_listing(&ListingId::new(id.as_str()), reason)
                .await;
            report("listings.reject", &notice);
        }
    }
    Ok(())
}
