//! Behavior tests for the daily ads aggregation and the paginated sales
//! aggregation, driven through the source traits.

use adpulse_core::{
    aggregate_daily, aggregate_sales, AdsStatRecord, CampaignId, Day, Period, Sku,
    SourceErrorKind,
};
use adpulse_tests::{FakeAds, FakeSeller};

fn day(raw: &str) -> Day {
    Day::parse(raw).expect("must parse")
}

fn two_days() -> Period {
    Period::new(day("2025-03-01"), day("2025-03-02")).expect("must build")
}

fn record(id: &str, spend: f64, views: u64, clicks: u64, click_price: f64) -> AdsStatRecord {
    AdsStatRecord {
        campaign_id: CampaignId::new(id),
        spend,
        views,
        clicks,
        orders: 0,
        orders_money: 0.0,
        click_price,
    }
}

// =============================================================================
// Ads: per-day batched fetching
// =============================================================================

#[test]
fn when_stats_are_aggregated_each_day_and_batch_gets_its_own_call() {
    let ads = FakeAds::default();
    let ids = vec![
        CampaignId::new("a"),
        CampaignId::new("b"),
        CampaignId::new("c"),
    ];

    aggregate_daily(&ads, &two_days(), &ids, 2, false).expect("must aggregate");

    let calls = ads.stats_calls.borrow();
    assert_eq!(calls.len(), 4);
    // Two single-day windows, two id batches each.
    assert_eq!(calls[0].0, "2025-03-01..2025-03-01");
    assert_eq!(calls[0].1.len(), 2);
    assert_eq!(calls[1].0, "2025-03-01..2025-03-01");
    assert_eq!(calls[1].1, vec![CampaignId::new("c")]);
    assert_eq!(calls[2].0, "2025-03-02..2025-03-02");
    assert_eq!(calls[3].0, "2025-03-02..2025-03-02");
}

#[test]
fn days_without_data_still_appear_with_zero_totals() {
    let ads = FakeAds::default().with_day_stat(
        "2025-03-02",
        "a",
        record("a", 50.0, 500, 10, 0.0),
    );
    let ids = vec![CampaignId::new("a")];

    let index = aggregate_daily(&ads, &two_days(), &ids, 15, false).expect("must aggregate");

    assert_eq!(index.totals.len(), 2);
    assert_eq!(index.totals[0].day, day("2025-03-01"));
    assert_eq!(index.totals[0].money_spent, 0.0);
    assert_eq!(index.totals[0].views, 0);
    assert_eq!(index.totals[1].money_spent, 50.0);
    assert!(index.by_campaign_day.is_empty());
}

#[test]
fn campaign_lookup_recomputes_click_price_from_spend_and_clicks() {
    let ads = FakeAds::default()
        .with_day_stat("2025-03-01", "a", record("a", 100.0, 1000, 40, 9.9))
        .with_day_stat("2025-03-01", "b", record("b", 50.0, 500, 0, 7.7));
    let ids = vec![CampaignId::new("a"), CampaignId::new("b")];

    let index = aggregate_daily(&ads, &two_days(), &ids, 15, true).expect("must aggregate");

    let derived = index
        .by_campaign_day
        .get(&(day("2025-03-01"), CampaignId::new("a")))
        .expect("must keep lookup");
    assert_eq!(derived.click_price, 2.5);

    // Zero clicks keeps the upstream-reported price.
    let reported = index
        .by_campaign_day
        .get(&(day("2025-03-01"), CampaignId::new("b")))
        .expect("must keep lookup");
    assert_eq!(reported.click_price, 7.7);
}

#[test]
fn zero_batch_size_is_rejected_before_any_call() {
    let ads = FakeAds::default();
    let err = aggregate_daily(&ads, &two_days(), &[CampaignId::new("a")], 0, false)
        .expect_err("must reject");
    assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
    assert!(ads.stats_calls.borrow().is_empty());
}

// =============================================================================
// Sales: pagination, dedup, dropped rows
// =============================================================================

#[test]
fn when_pages_fill_completely_one_extra_empty_page_ends_pagination() {
    let seller = FakeSeller::default()
        .with_row(Some("100"), Some("2025-03-01"), 1000.0, 2)
        .with_row(Some("100"), Some("2025-03-01"), 500.0, 1)
        .with_row(Some("200"), Some("2025-03-01"), 700.0, 1)
        .with_row(None, Some("2025-03-01"), 10.0, 1)
        .with_row(Some("100"), Some("2025-03-02"), 300.0, 1)
        .with_row(Some("200"), Some("2025-03-02"), 100.0, 1);

    let index = aggregate_sales(&seller, &two_days(), 2).expect("must aggregate");

    let calls = seller.page_calls.borrow();
    assert_eq!(*calls, vec![(0, 2), (2, 2), (4, 2), (6, 2)]);

    // Duplicate (sku, day) rows are summed, the dimensionless row counted.
    assert_eq!(index.dropped_rows, 1);
    let hundred = index.sku_totals(&Sku::new("100"));
    assert_eq!(hundred.revenue, 1800.0);
    assert_eq!(hundred.units, 4);
    let split = index.day_sku_totals(day("2025-03-01"), &Sku::new("100"));
    assert_eq!(split.revenue, 1500.0);
    assert_eq!(split.units, 3);
}

#[test]
fn a_short_first_page_stops_after_one_call() {
    let seller = FakeSeller::default().with_row(Some("100"), Some("2025-03-01"), 100.0, 1);

    let index = aggregate_sales(&seller, &two_days(), 1000).expect("must aggregate");

    assert_eq!(seller.page_calls.borrow().len(), 1);
    assert_eq!(index.day_totals(day("2025-03-01")).revenue, 100.0);
    assert_eq!(index.day_totals(day("2025-03-02")).revenue, 0.0);
}
