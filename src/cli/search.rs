//! Handler for `search`.
//!
//! With `--term` one request is sent. Otherwise every stdin line is a
//! keystroke-level update of the search box: lines arriving within the
//! debounce window collapse into one request for the latest term.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::command::SearchArgs;
use super::context::Context;
use super::{output, render};
use crate::adapter::http::MarketplaceClient;
use crate::application::{run_search, Debouncer, SearchTarget};
use crate::error::Result;

pub async fn execute(ctx: &Context, args: &SearchArgs) -> Result<()> {
    let target = SearchTarget::from(args.kind);
    let page_size = ctx.config.search.page_size;

    if let Some(term) = &args.term {
        search_once(&ctx.client, target, term.clone(), page_size).await;
        return Ok(());
    }

    let quiet = Duration::from_millis(ctx.config.search.debounce_ms);
    let client = Arc::clone(&ctx.client);
    let debouncer = Debouncer::new(quiet, move |term: String| {
        let client = Arc::clone(&client);
        async move { search_once(&client, target, term, page_size).await }
    });

    output::note("Type a search term per line; Ctrl-D to finish.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        debug!(term = %line, "Search input");
        debouncer.push(line);
    }
    debouncer.flush().await;
    Ok(())
}

async fn search_once(
    client: &MarketplaceClient,
    target: SearchTarget,
    term: String,
    page_size: u32,
) {
    match run_search(client, target, &term, page_size).await {
        Ok(results) if output::is_json() => {
            output::json_output(render::search_json(&term, &results));
        }
        Ok(results) if results.is_empty() => {
            output::note(&format!("No matches for \"{}\"", term.trim()));
        }
        Ok(results) => {
            output::section(&format!("Results for \"{}\"", term.trim()));
            render::search_results(&results);
        }
        Err(err) => output::error(&err.display_message()),
    }
}
