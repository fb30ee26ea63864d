use std::sync::Arc;
use std::time::Duration;

use mcdesk::application::{cancel_pair, CancelSignal, DashboardLoader, Loaded, ViewState};
use mcdesk::config::StatsConfig;
use mcdesk::domain::external::{CarrierSnapshot, ChargeRecord, SafetySnapshot};
use mcdesk::domain::{
    ListingStatus, OfferStatus, TransactionId, TransactionStatus, UserRole, UserStatus,
};
use mcdesk::port::ListQuery;
use mcdesk::testkit::domain::{listing, offer, transaction, transactions, user};
use mcdesk::testkit::{Call, Endpoint, FakeApi};
use rust_decimal_macros::dec;

fn loader(api: &Arc<FakeApi>) -> DashboardLoader<FakeApi> {
    DashboardLoader::new(Arc::clone(api), &StatsConfig::default())
}

fn marketplace() -> FakeApi {
    FakeApi::new()
        .with_transactions(transactions(&[
            TransactionStatus::DepositReceived,
            TransactionStatus::Completed,
            TransactionStatus::Cancelled,
        ]))
        .with_offers(vec![
            offer("o1", OfferStatus::Pending, dec!(30000)),
            offer("o2", OfferStatus::Pending, dec!(31000)),
            offer("o3", OfferStatus::Approved, dec!(32000)),
        ])
        .with_listings(vec![
            listing("l1", ListingStatus::Active),
            listing("l2", ListingStatus::PendingReview),
        ])
        .with_users(vec![
            user("u1", UserRole::Buyer, UserStatus::Active),
            user("u2", UserRole::Seller, UserStatus::Active),
        ])
        .with_charges(vec![ChargeRecord {
            id: Some("ch_1".into()),
            amount: Some(500_000),
            ..Default::default()
        }])
}

#[tokio::test]
async fn admin_closings_stats_ignore_the_page_filter() {
    let api = Arc::new(marketplace());
    let query = ListQuery::default().with_status("COMPLETED");

    let closings = loader(&api)
        .admin_closings(&query, &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    let page = closings.transactions.ready().unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(closings.stats.total, 3);
    assert_eq!(closings.stats.active, 1);
    assert_eq!(closings.charges.len(), 1);
}

#[tokio::test]
async fn failing_supporting_branch_keeps_the_page() {
    let api = Arc::new(marketplace().failing(Endpoint::Charges));

    let closings = loader(&api)
        .admin_closings(&ListQuery::default(), &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert!(closings.transactions.is_ready());
    assert!(closings.charges.is_empty());
    assert_eq!(closings.stats.total, 3);
}

#[tokio::test]
async fn failing_page_branch_is_a_failed_view() {
    let api = Arc::new(marketplace().failing(Endpoint::Transactions));

    let closings = loader(&api)
        .admin_closings(&ListQuery::default(), &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert!(matches!(
        closings.transactions,
        ViewState::Failed { ref message } if message.contains("HTTP 500")
    ));
    assert_eq!(closings.stats.total, 0);
    // The independent branch still completed.
    assert_eq!(closings.charges.len(), 1);
}

#[tokio::test]
async fn all_branches_are_requested() {
    let api = Arc::new(marketplace());
    let _ = loader(&api).admin_overview(&CancelSignal::never()).await;

    assert_eq!(api.count(|c| matches!(c, Call::ListUsers(_))), 1);
    assert_eq!(api.count(|c| matches!(c, Call::ListListings(..))), 1);
    assert_eq!(api.count(|c| matches!(c, Call::ListOffers(..))), 1);
    assert_eq!(api.count(|c| matches!(c, Call::ListTransactions(..))), 1);
}

#[tokio::test]
async fn admin_overview_counts_offers_awaiting_review() {
    let api = Arc::new(marketplace().failing(Endpoint::Users));

    let overview = loader(&api)
        .admin_overview(&CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert_eq!(overview.offers_awaiting_review, 2);
    assert_eq!(overview.offers.total, 3);
    assert_eq!(overview.listings.total, 2);
    assert_eq!(overview.transactions.completed, 1);
    assert_eq!(overview.users.total, 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_load_discards_results() {
    let api = Arc::new(marketplace().with_delay(Duration::from_secs(2)));
    let loader = loader(&api);
    let (handle, signal) = cancel_pair();

    let cancel_soon = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    };
    let (loaded, ()) = tokio::join!(loader.admin_overview(&signal), cancel_soon);

    assert_eq!(loaded, Loaded::Cancelled);
    // Requests went out before the cancel; their results were dropped.
    assert_eq!(api.calls().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn fan_out_runs_branches_concurrently() {
    let api = Arc::new(marketplace().with_delay(Duration::from_secs(1)));
    let started = tokio::time::Instant::now();

    let overview = loader(&api).admin_overview(&CancelSignal::never()).await;

    assert!(matches!(overview, Loaded::Ready(_)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn already_cancelled_signal_skips_the_result() {
    let api = Arc::new(marketplace());
    let (handle, signal) = cancel_pair();
    handle.cancel();

    let loaded = loader(&api).buyer(&ListQuery::default(), &signal).await;
    assert_eq!(loaded, Loaded::Cancelled);
}

#[tokio::test]
async fn buyer_dashboard_lists_pending_work() {
    let api = Arc::new(
        marketplace().with_transactions(vec![
            transaction("t9", TransactionStatus::AwaitingDeposit, dec!(40000)),
            transaction("t8", TransactionStatus::Completed, dec!(10000)),
        ]),
    );

    let dashboard = loader(&api)
        .buyer(&ListQuery::default(), &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert_eq!(dashboard.needs_action.len(), 1);
    assert_eq!(dashboard.needs_action[0].id, TransactionId::new("t9"));
    assert_eq!(dashboard.offer_stats.pending, 2);
}

#[tokio::test]
async fn seller_dashboard_with_no_transactions_is_empty() {
    let api = Arc::new(marketplace().with_transactions(Vec::new()));

    let dashboard = loader(&api)
        .seller(&ListQuery::default(), &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert!(matches!(dashboard.transactions, ViewState::Empty { .. }));
    assert!(dashboard.listings.is_ready());
    assert_eq!(dashboard.listing_stats.total, 2);
    assert!(dashboard.needs_action.is_empty());
}

#[tokio::test]
async fn transaction_detail_projects_the_workflow() {
    let api = Arc::new(marketplace());
    let view = loader(&api)
        .transaction(&TransactionId::new("t0"), &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    let view = view.ready().unwrap();
    assert!(!view.position.is_halted());
    assert!(view.progress > 0);
}

#[tokio::test]
async fn missing_transaction_is_a_failed_view() {
    let api = Arc::new(marketplace());
    let view = loader(&api)
        .transaction(&TransactionId::new("nope"), &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert!(matches!(view, ViewState::Failed { .. }));
}

#[tokio::test]
async fn creation_form_filters_buyers_and_active_listings() {
    let api = Arc::new(marketplace());
    let form = loader(&api)
        .creation_form(&CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert_eq!(form.buyers.len(), 1);
    assert_eq!(form.listings.len(), 1);
    assert_eq!(form.listings[0].status, ListingStatus::Active);
}

#[tokio::test]
async fn blank_dot_number_is_empty_without_a_request() {
    let api = Arc::new(marketplace());
    let view = loader(&api)
        .carrier("   ", &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert!(matches!(view, ViewState::Empty { .. }));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn carrier_without_sms_data_still_loads() {
    let api = Arc::new(
        marketplace()
            .with_carrier(CarrierSnapshot {
                dot_number: Some("1234567".into()),
                legal_name: Some("Acme Freight".into()),
                ..Default::default()
            })
            .failing(Endpoint::CarrierSafety),
    );

    let view = loader(&api)
        .carrier("1234567", &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    let snapshot = view.ready().unwrap();
    assert_eq!(snapshot.legal_name.as_deref(), Some("Acme Freight"));
    assert!(snapshot.safety.is_none());
    assert_eq!(api.count(|c| matches!(c, Call::CarrierSnapshot(_))), 1);
    assert_eq!(api.count(|c| matches!(c, Call::CarrierSafety(_))), 1);

    let api = Arc::new(
        marketplace()
            .with_carrier(CarrierSnapshot::default())
            .with_safety(SafetySnapshot::default()),
    );
    let view = loader(&api)
        .carrier("1234567", &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();
    assert!(view.ready().unwrap().safety.is_some());
}

#[tokio::test]
async fn failing_census_lookup_is_a_failed_view() {
    let api = Arc::new(
        marketplace()
            .with_safety(SafetySnapshot::default())
            .failing(Endpoint::Carrier),
    );

    let view = loader(&api)
        .carrier("1234567", &CancelSignal::never())
        .await
        .into_ready()
        .unwrap();

    assert!(matches!(view, ViewState::Failed { .. }));
}
