//! Handlers for the `offers` command group.

use serde_json::json;

use super::command::OffersCommand;
use super::context::Context;
use super::transactions::report;
use super::{output, render};
use crate::application::ViewState;
use crate::domain::{ListingId, OfferId};
use crate::error::Result;
use crate::port::{MarketplaceApi, Scope};

pub async fn execute(ctx: &Context, command: &OffersCommand) -> Result<()> {
    match command {
        OffersCommand::List(args) => {
            let scope = if args.admin { Scope::Admin } else { Scope::Own };
            let state = ViewState::from_page(
                ctx.client.list_offers(scope, &args.query()).await,
                "No offers match.",
            );
            if render::json_document("offers.list", "view", &state) {
                return Ok(());
            }
            output::section("Offers");
            render::view(&state, |page| render::page(page, render::offers_table));
        }
        OffersCommand::Approve { ids, notes } => {
            let admin = ctx.admin();
            if let [id] = ids.as_slice() {
                let notice = admin
                    .approve_offer(&OfferId::new(id.as_str()), notes.as_deref())
                    .await;
                report("offers.approve", &notice);
                return Ok(());
            }

            let ids: Vec<OfferId> = ids.iter().map(|id| OfferId::new(id.as_str())).collect();
            let notices = admin.approve_offers(&ids).await;
            if output::is_json() {
                output::json_output(json!({ "command": "offers.approve", "notices": notices }));
                return Ok(());
            }
            let approved = notices.iter().filter(|n| output::notice(n)).count();
            output::note(&format!("{approved} of {} offers approved", ids.len()));
        }
        OffersCommand::Reject { id, reason } => {
            let notice = ctx
                .admin()
                .reject_offer(&OfferId::new(id.as_str()), reason)
                .await;
            report("offers.reject", &notice);
        }
        OffersCommand::Create {
            listing,
            amount,
            message,
            buy_now,
        } => {
            let notice = ctx
                .buyer()
                .create_offer(
                    &ListingId::new(listing.as_str()),
                    *amount,
                    message.as_deref(),
                    *buy_now,
                )
                .await;
            report("offers.create", &notice);
        }
        OffersCommand::Withdraw { id } => {
            let notice = ctx.buyer().withdraw_offer(&OfferId::new(id.as_str())).await;
            report("offers.withdraw", &notice);
        }
        OffersCommand::AcceptCounter { id } => {
            let notice = ctx.buyer().accept_counter(&OfferId::new(id.as_str())).await;
            report("offers.accept-counter", &notice);
        }
    }
    Ok(())
}
