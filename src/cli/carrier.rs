//! Handlers for the `carrier` and `companies` lookups.

use super::command::{CarrierArgs, CompaniesArgs};
use super::context::Context;
use super::{output, render};
use crate::application::{CancelSignal, ViewState};
use crate::error::Result;
use crate::port::MarketplaceApi;

pub async fn execute(ctx: &Context, args: &CarrierArgs) -> Result<()> {
    let pb = output::spinner(&format!("Looking up USDOT {}", args.dot.trim()));
    let Some(state) = ctx
        .loader()
        .carrier(&args.dot, &CancelSignal::never())
        .await
        .into_ready()
    else {
        pb.finish_and_clear();
        return Ok(());
    };
    pb.finish_and_clear();

    if render::json_document("carrier", "view", &state) {
        return Ok(());
    }
    render::view(&state, render::carrier);
    Ok(())
}

pub async fn execute_companies(ctx: &Context, args: &CompaniesArgs) -> Result<()> {
    let name = args.name.trim();
    let state = if name.is_empty() {
        ViewState::Empty {
            hint: "Enter a company name to search.".into(),
        }
    } else {
        let pb = output::spinner(&format!("Searching companies for {name}"));
        let result = ctx.client.search_companies(name).await;
        pb.finish_and_clear();
        ViewState::from_list(result, Vec::is_empty, "No companies match.")
    };

    if render::json_document("companies", "view", &state) {
        return Ok(());
    }
    render::view(&state, |companies| {
        output::lines(&render::companies_table(companies));
    });
    Ok(())
}
