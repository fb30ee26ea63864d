//! Handlers for the `transactions` command group.

use serde_json::json;

use super::command::{CreateTransactionArgs, ListArgs, Role, TransactionsCommand};
use super::context::Context;
use super::{output, render};
use crate::application::{CancelSignal, Notice, ViewState};
use crate::domain::{OfferId, TransactionDraft, TransactionId};
use crate::error::Result;
use crate::port::{ListQuery, MarketplaceApi, Scope};

const NO_TRANSACTIONS: &str = "No transactions match.";

pub async fn execute(ctx: &Context, command: &TransactionsCommand) -> Result<()> {
    match command {
        TransactionsCommand::List(args) => execute_list(ctx, args).await,
        TransactionsCommand::Show { id } => execute_show(ctx, &TransactionId::new(id.as_str())).await,
        TransactionsCommand::Approve { id, role } => {
            let id = TransactionId::new(id.as_str());
            let notice = match role {
                Role::Buyer => ctx.buyer().approve_transaction(&id).await,
                Role::Seller => ctx.seller().approve_transaction(&id).await,
                Role::Admin => ctx.admin().approve_transaction(&id).await,
            };
            report("transactions.approve", &notice);
            Ok(())
        }
        TransactionsCommand::VerifyDeposit { id } => {
            let notice = ctx.admin().verify_deposit(&TransactionId::new(id.as_str())).await;
            report("transactions.verify-deposit", &notice);
            Ok(())
        }
        TransactionsCommand::VerifyPayment { id } => {
            let notice = ctx
                .admin()
                .verify_final_payment(&TransactionId::new(id.as_str()))
                .await;
            report("transactions.verify-payment", &notice);
            Ok(())
        }
        TransactionsCommand::Cancel { id, reason } => {
            let notice = ctx
                .admin()
                .cancel_transaction(&TransactionId::new(id.as_str()), reason)
                .await;
            report("transactions.cancel", &notice);
            Ok(())
        }
        TransactionsCommand::Pay {
            id,
            reference,
            r#final,
        } => {
            let id = TransactionId::new(id.as_str());
            let notice = if *r#final {
                ctx.buyer().record_final_payment(&id, reference).await
            } else {
                ctx.buyer().record_deposit(&id, reference).await
            };
            report("transactions.pay", &notice);
            Ok(())
        }
        TransactionsCommand::UploadProof { id, file } => {
            let notice = ctx
                .buyer()
                .upload_payment_proof(&TransactionId::new(id.as_str()), file)
                .await;
            report("transactions.upload-proof", &notice);
            Ok(())
        }
        TransactionsCommand::Create(args) => execute_create(ctx, args).await,
    }
}

/// Print a command outcome; JSON mode gets one document.
pub(super) fn report(command: &str, notice: &Notice) {
    if output::is_json() {
        output::json_output(json!({ "command": command, "notice": notice }));
        return;
    }
    output::notice(notice);
}

fn scope(args: &ListArgs) -> Scope {
    if args.admin {
        Scope::Admin
    } else {
        Scope::Own
    }
}

async fn execute_list(ctx: &Context, args: &ListArgs) -> Result<()> {
    let query: ListQuery = args.query();
    let state = ViewState::from_page(
        ctx.client.list_transactions(scope(args), &query).await,
        NO_TRANSACTIONS,
    );
    if render::json_document("transactions.list", "view", &state) {
        return Ok(());
    }
    output::section("Transactions");
    render::view(&state, |page| render::page(page, render::transactions_table));
    Ok(())
}

async fn execute_show(ctx: &Context, id: &TransactionId) -> Result<()> {
    let Some(state) = ctx
        .loader()
        .transaction(id, &CancelSignal::never())
        .await
        .into_ready()
    else {
        return Ok(());
    };

    if output::is_json() {
        let view = match &state {
            ViewState::Ready(view) => render::workflow_json(view),
            other => serde_json::to_value(other.clone().map(|_| ())).unwrap_or_default(),
        };
        output::json_output(json!({ "command": "transactions.show", "view": view }));
        return Ok(());
    }
    render::view(&state, render::transaction_detail);
    Ok(())
}

async fn execute_create(ctx: &Context, args: &CreateTransactionArgs) -> Result<()> {
    let admin = ctx.admin();
    let notice = match &args.from_offer {
        Some(offer_id) => {
            let offer_id = OfferId::new(offer_id.as_str());
            let query = ListQuery::everything(ctx.config.stats.global_fetch_limit);
            match ctx.client.list_offers(Scope::Admin, &query).await {
                Ok(page) => match page.items.iter().find(|offer| offer.id == offer_id) {
                    Some(offer) => admin.create_from_offer(offer).await,
                    None => Notice::error(format!("Offer {offer_id} not found")),
                },
                Err(err) => Notice::error(err.display_message()),
            }
        }
        None => {
            let draft = TransactionDraft {
                offer_id: None,
                listing_id: args.listing.clone().unwrap_or_default().into(),
                buyer_id: args.buyer.clone().unwrap_or_default().into(),
                agreed_price: args.price.unwrap_or_default(),
                deposit_amount: args.deposit,
                notes: args.notes.clone(),
            };
            admin.create_transaction(draft).await
        }
    };
    report("transactions.create", &notice);
    Ok(())
}
