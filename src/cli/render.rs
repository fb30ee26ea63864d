//! Human-readable rendering of view states, tables and stat cards.

use serde::Serialize;
use serde_json::{json, Value};
use tabled::{Table, Tabled};

use super::output;
use crate::application::{SearchResults, TransactionView, ViewState};
use crate::domain::external::{or_na, or_zero, CarrierSnapshot, ChargeRecord, CompanyRecord};
use crate::domain::projector::{offer_badge, transaction_badge, StepPosition, WORKFLOW};
use crate::domain::stats::{ListingStats, OfferStats, TransactionStats, UserStats};
use crate::domain::{Listing, Offer, Transaction, User};
use crate::port::Page;

/// Print a view state, calling `ready` for loaded data.
pub fn view<T>(state: &ViewState<T>, ready: impl FnOnce(&T)) {
    match state {
        ViewState::Loading => output::note("Loading..."),
        ViewState::Failed { message } => {
            output::error(message);
            output::hint("run the command again to retry");
        }
        ViewState::Empty { hint } => output::note(hint),
        ViewState::Ready(data) => ready(data),
    }
}

/// Emit `{"command", <key>: value}` in JSON mode. Returns whether it did.
pub fn json_document(command: &str, key: &str, value: &impl Serialize) -> bool {
    if !output::is_json() {
        return false;
    }
    let value = serde_json::to_value(value).unwrap_or(Value::Null);
    output::json_output(json!({ "command": command, key: value }));
    true
}

/// Print a page as a table followed by its pagination line.
pub fn page<T>(page: &Page<T>, table: impl FnOnce(&[T]) -> String) {
    output::lines(&table(&page.items));
    if let Some(p) = page.pagination {
        output::note(&format!(
            "Page {} of {} ({} total)",
            p.page,
            p.total_pages.max(1),
            p.total
        ));
        if page.has_next() {
            output::hint(&format!("use --page {} for more", p.page + 1));
        }
    }
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Listing")]
    listing: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Buyer")]
    buyer: String,
    #[tabled(rename = "Seller")]
    seller: String,
    #[tabled(rename = "Approvals")]
    approvals: String,
}

fn approvals(txn: &Transaction) -> String {
    let flag = |given: bool, who: &str| if given { who.to_string() } else { "-".to_string() };
    format!(
        "{}{}{}",
        flag(txn.buyer_approved, "B"),
        flag(txn.seller_approved, "S"),
        flag(txn.admin_approved, "A")
    )
}

#[must_use]
pub fn transactions_table(transactions: &[Transaction]) -> String {
    let rows = transactions.iter().map(|txn| TransactionRow {
        id: txn.id.to_string(),
        listing: txn.listing_label(),
        status: transaction_badge(&txn.status).label.to_string(),
        price: output::money_or_na(txn.agreed_price),
        buyer: or_na(txn.buyer.as_ref().map(|p| p.label())).to_string(),
        seller: or_na(txn.seller.as_ref().map(|p| p.label())).to_string(),
        approvals: approvals(txn),
    });
    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct OfferRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Listing")]
    listing: String,
    #[tabled(rename = "Buyer")]
    buyer: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Counter")]
    counter: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[must_use]
pub fn offers_table(offers: &[Offer]) -> String {
    let rows = offers.iter().map(|offer| {
        let listing = match (&offer.listing, &offer.listing_id) {
            (Some(summary), _) => summary.label(),
            (None, Some(id)) => id.to_string(),
            (None, None) => or_na(None).to_string(),
        };
        let buy_now = if offer.is_buy_now { " (buy now)" } else { "" };
        OfferRow {
            id: offer.id.to_string(),
            listing,
            buyer: or_na(offer.buyer.as_ref().map(|p| p.label())).to_string(),
            amount: format!("{}{buy_now}", output::money(offer.amount)),
            counter: output::money_or_na(offer.counter_amount),
            status: offer_badge(&offer.status).label.to_string(),
        }
    });
    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct ListingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "MC")]
    mc: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Asking")]
    asking: String,
    #[tabled(rename = "Listed")]
    listed: String,
    #[tabled(rename = "Margin")]
    margin: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[must_use]
pub fn listings_table(listings: &[Listing]) -> String {
    let rows = listings.iter().map(|listing| ListingRow {
        id: listing.id.to_string(),
        mc: or_na(listing.mc_number.as_deref()).to_string(),
        name: listing.headline(),
        asking: output::money_or_na(listing.asking_price),
        listed: output::money_or_na(listing.listing_price),
        margin: output::money_or_na(listing.margin()),
        status: listing.status.to_string(),
    });
    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Verified")]
    verified: String,
    #[tabled(rename = "Credits")]
    credits: String,
}

#[must_use]
pub fn users_table(users: &[User]) -> String {
    let rows = users.iter().map(|user| UserRow {
        id: user.id.to_string(),
        name: user.display_name().to_string(),
        email: user.email.clone(),
        role: user.role.to_string(),
        status: user.status.to_string(),
        verified: if user.verified { "yes" } else { "no" }.to_string(),
        credits: user.available_credits().to_string(),
    });
    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct ChargeRow {
    #[tabled(rename = "Charge")]
    id: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Created")]
    created: String,
}

#[must_use]
pub fn charges_table(charges: &[ChargeRecord]) -> String {
    let rows = charges.iter().map(|charge| ChargeRow {
        id: or_na(charge.id.as_deref()).to_string(),
        amount: format!(
            "{} {}",
            output::money(charge.amount_major()),
            or_na(charge.currency.as_deref()).to_ascii_uppercase()
        ),
        status: or_na(charge.status.as_deref()).to_string(),
        customer: or_na(charge.customer_email.as_deref()).to_string(),
        created: charge
            .created
            .map_or_else(|| or_na(None).to_string(), |at| at.format("%Y-%m-%d").to_string()),
    });
    Table::new(rows).to_string()
}

pub fn transaction_stats(stats: &TransactionStats) {
    output::field("Total", stats.total);
    output::field("Active", stats.active);
    output::field("Needs review", stats.needs_review);
    output::field("Awaiting payment", stats.awaiting_payment);
    output::field("Verify payment", stats.verify_payment);
    output::field("Completed", output::positive(stats.completed));
    output::field("Cancelled", stats.cancelled);
    output::field("Disputed", stats.disputed);
    output::field("Completion", output::percent(stats.completion_rate()));
    output::field("Pipeline", output::highlight(output::money(stats.total_pipeline)));
    output::field("Deposits", output::money(stats.total_deposits));
    output::field("Closed volume", output::money(stats.completed_volume));
    output::field("Platform fees", output::money(stats.platform_fees));
}

pub fn offer_stats(stats: &OfferStats) {
    output::field("Total", stats.total);
    output::field("Pending", stats.pending);
    output::field("Approved", stats.approved);
    output::field("Countered", stats.countered);
    output::field("Accepted", output::positive(stats.accepted));
    output::field("Rejected", stats.rejected);
    output::field("Buy now", stats.buy_now);
    output::field("Offer value", output::money(stats.total_offer_value));
    output::field(
        "Average offer",
        output::money_or_na(stats.average_offer()),
    );
}

pub fn listing_stats(stats: &ListingStats) {
    output::field("Total", stats.total);
    output::field("Pending review", stats.pending_review);
    output::field("Active", stats.active);
    output::field("Sold", output::positive(stats.sold));
    output::field("Asking total", output::money(stats.total_asking));
    output::field("Listed total", output::money(stats.total_listing));
    output::field("Margin", output::highlight(output::money(stats.total_margin)));
}

pub fn user_stats(stats: &UserStats) {
    output::field("Total", stats.total);
    output::field("Buyers", stats.buyers);
    output::field("Sellers", stats.sellers);
    output::field("Admins", stats.admins);
    output::field("Active", stats.active);
    output::field("Blocked", stats.blocked);
    output::field("Pending", stats.pending);
    output::field("Verified", output::percent(stats.verification_rate()));
}

/// Workflow steps as `{id, title, state}` objects.
#[must_use]
pub fn workflow_json(view: &TransactionView) -> Value {
    let steps: Vec<Value> = WORKFLOW
        .iter()
        .zip(view.states.iter())
        .map(|(step, state)| json!({ "id": step.id(), "title": step.title(), "state": state.as_str() }))
        .collect();
    let halted = match view.position {
        StepPosition::Halted { halt, .. } => Some(halt.id()),
        StepPosition::Active(_) => None,
    };
    json!({
        "transaction": view.transaction,
        "step": view.position.step().id(),
        "halted": halted,
        "progress": view.progress,
        "steps": steps,
    })
}

/// Transaction header, money, approvals and the progress bar.
pub fn transaction_detail(view: &TransactionView) {
    let txn = &view.transaction;
    output::section(&format!("Transaction {}", txn.id));
    output::field("Status", output::badge(transaction_badge(&txn.status)));
    output::field("Listing", txn.listing_label());
    output::field("Buyer", or_na(txn.buyer.as_ref().map(|p| p.label())));
    output::field("Seller", or_na(txn.seller.as_ref().map(|p| p.label())));
    output::field("Agreed price", output::money_or_na(txn.agreed_price));
    output::field("Deposit", output::money_or_na(txn.deposit_amount));
    output::field("Balance due", output::money_or_na(txn.balance_due()));
    output::field("Platform fee", output::money_or_na(txn.platform_fee));
    output::field("Approvals", approvals(txn));
    if let Some(reason) = txn.cancellation_reason.as_deref() {
        output::field("Reason", reason);
    }

    output::section("Workflow");
    for (step, state) in WORKFLOW.iter().zip(view.states.iter()) {
        output::note(&format!("{} {}", output::step_glyph(*state), step.title()));
    }
    output::field("Progress", format!("{}%", view.progress));
    if let StepPosition::Halted { halt, at } = view.position {
        output::warning(&format!("{} at {}", halt.id(), at.title()));
    }
}

pub fn carrier(snapshot: &CarrierSnapshot) {
    output::section("Carrier");
    output::field("Legal name", or_na(snapshot.legal_name.as_deref()));
    output::field("DBA", or_na(snapshot.dba_name.as_deref()));
    output::field("USDOT", or_na(snapshot.dot_number.as_deref()));
    output::field("MC", or_na(snapshot.mc_number.as_deref()));
    output::field("Operating", or_na(snapshot.operating_status.as_deref()));
    output::field("Entity", or_na(snapshot.entity_type.as_deref()));
    output::field("Address", or_na(snapshot.physical_address.as_deref()));
    output::field("Phone", or_na(snapshot.phone.as_deref()));
    output::field("Power units", or_zero(snapshot.power_units));
    output::field("Drivers", or_zero(snapshot.drivers));
    output::field("Safety rating", or_na(snapshot.safety_rating.as_deref()));

    if let Some(authority) = &snapshot.authority {
        output::section("Authority");
        output::field("Common", or_na(authority.common_authority.as_deref()));
        output::field("Contract", or_na(authority.contract_authority.as_deref()));
        output::field("Broker", or_na(authority.broker_authority.as_deref()));
        output::field("Granted", or_na(authority.granted_at.as_deref()));
    }

    if let Some(insurance) = &snapshot.insurance {
        output::section("Insurance");
        output::field("BIPD on file", output::money_or_na(insurance.bipd_on_file));
        output::field("BIPD required", output::money_or_na(insurance.bipd_required));
        output::field("Cargo on file", output::money_or_na(insurance.cargo_on_file));
        output::field("Insurer", or_na(insurance.insurer.as_deref()));
    }

    match &snapshot.safety {
        Some(safety) => {
            output::section("SMS");
            let score = |value: Option<f64>| format!("{:.1}", or_zero(value));
            output::field("Unsafe driving", score(safety.unsafe_driving));
            output::field("Hours of service", score(safety.hours_of_service));
            output::field("Maintenance", score(safety.vehicle_maintenance));
            output::field("Driver fitness", score(safety.driver_fitness));
            output::field("Inspections", or_zero(safety.inspections));
            output::field("Crashes", or_zero(safety.crashes));
            output::field("OOS rate", output::percent(safety.out_of_service_rate));
        }
        None => output::note("SMS data unavailable"),
    }
}

pub fn listing_detail(listing: &Listing) {
    output::section(&listing.headline());
    output::field("Status", &listing.status);
    output::field("MC", or_na(listing.mc_number.as_deref()));
    output::field("USDOT", or_na(listing.dot_number.as_deref()));
    output::field("Legal name", or_na(listing.legal_name.as_deref()));
    output::field("State", or_na(listing.state.as_deref()));
    output::field("Years active", or_zero(listing.years_active));
    output::field("Fleet size", or_zero(listing.fleet_size));
    output::field("Safety rating", or_na(listing.safety_rating.as_deref()));
    output::field("Insurance", if listing.insurance_on_file { "on file" } else { "missing" });
    output::field("Asking", output::money_or_na(listing.asking_price));
    output::field("Listed at", output::money_or_na(listing.buyer_price()));
    output::field("Margin", output::money_or_na(listing.margin()));
    if let Some(reason) = &listing.rejection_reason {
        output::field("Rejected", reason);
    }
}

#[derive(Tabled)]
struct CompanyRow {
    #[tabled(rename = "Company")]
    name: String,
    #[tabled(rename = "Reg. no")]
    reg_no: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Address")]
    address: String,
}

#[must_use]
pub fn companies_table(companies: &[CompanyRecord]) -> String {
    let rows = companies.iter().map(|company| CompanyRow {
        name: or_na(company.name.as_deref()).to_string(),
        reg_no: or_na(company.reg_no.as_deref()).to_string(),
        status: or_na(company.status.as_deref()).to_string(),
        score: company
            .credit_score
            .map_or_else(|| or_na(None).to_string(), |s| s.to_string()),
        limit: output::money_or_na(company.credit_limit),
        address: or_na(company.address.as_deref()).to_string(),
    });
    Table::new(rows).to_string()
}

pub fn search_results(results: &SearchResults) {
    match results {
        SearchResults::Users(page) => output::lines(&users_table(&page.items)),
        SearchResults::Listings(page) => output::lines(&listings_table(&page.items)),
    }
}

#[must_use]
pub fn search_json(term: &str, results: &SearchResults) -> Value {
    let items = match results {
        SearchResults::Users(page) => serde_json::to_value(page),
        SearchResults::Listings(page) => serde_json::to_value(page),
    };
    json!({ "command": "search", "term": term, "results": items.unwrap_or(Value::Null) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn transaction_table_shows_badge_and_money() {
        let txn = Transaction {
            id: "t1".into(),
            status: TransactionStatus::PaymentReceived,
            agreed_price: Some(dec!(52000)),
            buyer_approved: true,
            ..Default::default()
        };
        let table = transactions_table(&[txn]);
        assert!(table.contains("Verify Payment"));
        assert!(table.contains("$52,000"));
        assert!(table.contains("B--"));
        assert!(table.contains("N/A"));
    }

    #[test]
    fn workflow_json_marks_halt() {
        let view = TransactionView::new(Transaction {
            status: TransactionStatus::Disputed,
            deposit_reference: Some("wire-1".into()),
            ..Default::default()
        });
        let json = workflow_json(&view);
        assert_eq!(json["halted"], "disputed");
        assert_eq!(json["step"], "deposit-received");
        assert_eq!(json["steps"][2]["state"], "error");
        assert_eq!(json["steps"][3]["state"], "pending");
    }
}
