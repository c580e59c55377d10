//! Period report assembly: campaign rows, the GRAND_TOTAL reducer,
//! per-campaign daily drill-down and the account-level daily breakdown.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ads::AdsDailyIndex;
use crate::domain::{
    AdsStatRecord, Campaign, CampaignDailyRow, CampaignId, CampaignProduct, DailyBreakdownRow,
    Period, ReportRow, Sku, SkuDisplay, GRAND_TOTAL,
};
use crate::metrics;
use crate::sales::SalesIndex;

/// How a campaign presents itself in campaign-level rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDisplay {
    pub sku: SkuDisplay,
    pub title: String,
    /// Current sku bid, only when the campaign carries exactly one sku.
    pub bid_micro: Option<i64>,
    /// Every sku attached to the campaign, display policy aside.
    pub skus: Vec<Sku>,
}

/// Resolves the 0/1/many sku display policy for one campaign.
pub fn campaign_display(campaign_title: &str, products: &[CampaignProduct]) -> CampaignDisplay {
    let skus: Vec<Sku> = products.iter().map(|p| p.sku.clone()).collect();

    match products {
        [] => CampaignDisplay {
            sku: SkuDisplay::None,
            title: campaign_title.to_owned(),
            bid_micro: None,
            skus,
        },
        [only] => CampaignDisplay {
            sku: SkuDisplay::One(only.sku.clone()),
            title: if only.title.is_empty() {
                campaign_title.to_owned()
            } else {
                only.title.clone()
            },
            bid_micro: only.bid_micro,
            skus,
        },
        _ => CampaignDisplay {
            sku: SkuDisplay::Several,
            title: String::from("several"),
            bid_micro: None,
            skus,
        },
    }
}

/// A finished period report: one row per running campaign plus the
/// synthetic totals row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub rows: Vec<ReportRow>,
    pub grand_total: ReportRow,
}

/// Builds the period report.
///
/// Campaign order follows `running` (already title-sorted by the caller).
/// Campaigns missing from `stats_by_campaign` contribute zeroed bases. The
/// grand total sums additive fields across campaign rows and re-derives
/// every ratio from those sums; ratios are never averaged.
pub fn build_report_rows(
    running: &[Campaign],
    stats_by_campaign: &HashMap<CampaignId, AdsStatRecord>,
    sales: &SalesIndex,
    products_by_campaign: &HashMap<CampaignId, Vec<CampaignProduct>>,
) -> PeriodReport {
    let mut rows = Vec::with_capacity(running.len());

    let mut gt_spend = 0.0;
    let mut gt_views: u64 = 0;
    let mut gt_clicks: u64 = 0;
    let mut gt_orders_money = 0.0;
    let mut gt_revenue = 0.0;
    let mut gt_units: u64 = 0;

    for campaign in running {
        let products = products_by_campaign
            .get(&campaign.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let display = campaign_display(&campaign.title, products);

        let stat = stats_by_campaign.get(&campaign.id);
        let spend = stat.map_or(0.0, |s| s.spend);
        let views = stat.map_or(0, |s| s.views);
        let clicks = stat.map_or(0, |s| s.clicks);
        let reported_click_price = stat.map_or(0.0, |s| s.click_price);
        let orders_money = stat.map_or(0.0, |s| s.orders_money);

        let mut revenue = 0.0;
        let mut units: u64 = 0;
        for sku in &display.skus {
            let totals = sales.sku_totals(sku);
            revenue += totals.revenue;
            units += totals.units;
        }

        gt_spend += spend;
        gt_views += views;
        gt_clicks += clicks;
        gt_orders_money += orders_money;
        gt_revenue += revenue;
        gt_units += units;

        rows.push(ReportRow {
            campaign_id: campaign.id.clone(),
            sku: display.sku.label().to_owned(),
            title: display.title,
            money_spent: spend,
            views,
            clicks,
            click_price: metrics::click_price(spend, clicks as f64, reported_click_price),
            orders_money_ads: orders_money,
            total_revenue: revenue,
            ordered_units: units,
            total_drr_pct: metrics::drr_pct(spend, revenue),
            ctr: metrics::ctr(clicks as f64, views as f64),
            cr: metrics::cr(units as f64, clicks as f64),
            vor: metrics::vor(units as f64, views as f64),
            vpo: metrics::vpo(views as f64, units as f64),
        });
    }

    let grand_total = ReportRow {
        campaign_id: CampaignId::new(GRAND_TOTAL),
        sku: String::new(),
        title: String::new(),
        money_spent: gt_spend,
        views: gt_views,
        clicks: gt_clicks,
        click_price: metrics::click_price(gt_spend, gt_clicks as f64, 0.0),
        orders_money_ads: gt_orders_money,
        total_revenue: gt_revenue,
        ordered_units: gt_units,
        total_drr_pct: metrics::drr_pct(gt_spend, gt_revenue),
        ctr: metrics::ctr(gt_clicks as f64, gt_views as f64),
        cr: metrics::cr(gt_units as f64, gt_clicks as f64),
        vor: metrics::vor(gt_units as f64, gt_views as f64),
        vpo: metrics::vpo(gt_views as f64, gt_units as f64),
    };

    PeriodReport { rows, grand_total }
}

/// Daily drill-down for one campaign over the period.
///
/// Every day of the period gets a row; days absent from the ads lookup keep
/// zeroed bases. Sales are restricted to the campaign's own skus.
pub fn build_campaign_daily_rows(
    campaign_id: &CampaignId,
    period: &Period,
    products: &[CampaignProduct],
    ads: &AdsDailyIndex,
    sales: &SalesIndex,
    target_drr: f64,
) -> Vec<CampaignDailyRow> {
    let display = campaign_display("", products);
    let mut out = Vec::with_capacity(period.len_days() as usize);

    for day in period.days() {
        let stat = ads.by_campaign_day.get(&(day, campaign_id.clone()));
        let spend = stat.map_or(0.0, |s| s.money_spent);
        let views = stat.map_or(0, |s| s.views);
        let clicks = stat.map_or(0, |s| s.clicks);
        let orders = stat.map_or(0, |s| s.orders);
        let click_price = stat.map_or(0.0, |s| s.click_price);

        let mut revenue = 0.0;
        let mut units: u64 = 0;
        for sku in &display.skus {
            let totals = sales.day_sku_totals(day, sku);
            revenue += totals.revenue;
            units += totals.units;
        }

        let rpc = metrics::rpc(revenue, clicks as f64);
        out.push(CampaignDailyRow {
            day,
            campaign_id: campaign_id.clone(),
            money_spent: spend,
            views,
            clicks,
            orders,
            click_price,
            cpm: metrics::cpm(spend, views as f64),
            total_revenue: revenue,
            ordered_units: units,
            total_drr_pct: metrics::drr_pct(spend, revenue),
            ctr: metrics::ctr(clicks as f64, views as f64),
            cr: metrics::cr(units as f64, clicks as f64),
            vor: metrics::vor(units as f64, views as f64),
            rpc,
            target_cpc: metrics::target_cpc(rpc, target_drr),
            vpo: metrics::vpo(views as f64, units as f64),
        });
    }

    out
}

/// Account-level daily breakdown across all running campaigns, with the
/// organic (non-ads) share of each day's revenue.
pub fn daily_breakdown(
    ads: &AdsDailyIndex,
    sales: &SalesIndex,
    target_drr: f64,
) -> Vec<DailyBreakdownRow> {
    ads.totals
        .iter()
        .map(|day_totals| {
            let revenue = sales.day_totals(day_totals.day).revenue;
            let units = sales.day_totals(day_totals.day).units;
            let spend = day_totals.money_spent;
            let views = day_totals.views;
            let clicks = day_totals.clicks;

            let rpc = metrics::rpc(revenue, clicks as f64);
            DailyBreakdownRow {
                day: day_totals.day,
                money_spent: spend,
                views,
                clicks,
                orders_money_ads: day_totals.orders_money,
                total_revenue: revenue,
                ordered_units: units,
                total_drr_pct: metrics::drr_pct(spend, revenue),
                cpm: metrics::cpm(spend, views as f64),
                ctr: metrics::ctr(clicks as f64, views as f64),
                cr: metrics::cr(units as f64, clicks as f64),
                vor: metrics::vor(units as f64, views as f64),
                rpc,
                target_cpc: metrics::target_cpc(rpc, target_drr),
                vpo: metrics::vpo(views as f64, units as f64),
                organic_pct: metrics::organic_pct(day_totals.orders_money, revenue),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::{CampaignDayStat, DayAdsTotals};
    use crate::domain::{CampaignState, Day};
    use crate::sales::SalesTotals;

    fn campaign(id: &str, title: &str) -> Campaign {
        Campaign {
            id: CampaignId::new(id),
            title: title.to_owned(),
            state: CampaignState::Running,
        }
    }

    fn product(sku: &str, title: &str, bid_micro: Option<i64>) -> CampaignProduct {
        CampaignProduct {
            sku: Sku::new(sku),
            title: title.to_owned(),
            bid_micro,
        }
    }

    fn stat(id: &str, spend: f64, views: u64, clicks: u64) -> AdsStatRecord {
        AdsStatRecord {
            campaign_id: CampaignId::new(id),
            spend,
            views,
            clicks,
            orders: 0,
            orders_money: spend,
            click_price: 0.5,
        }
    }

    fn day(raw: &str) -> Day {
        Day::parse(raw).expect("must parse")
    }

    fn sales_with_sku(sku: &str, revenue: f64, units: u64) -> SalesIndex {
        let mut sales = SalesIndex::default();
        sales.by_sku.insert(Sku::new(sku), SalesTotals { revenue, units });
        sales
    }

    #[test]
    fn display_policy_for_empty_campaign() {
        let display = campaign_display("Brand push", &[]);
        assert_eq!(display.sku, SkuDisplay::None);
        assert_eq!(display.sku.label(), "—");
        assert_eq!(display.title, "Brand push");
        assert_eq!(display.bid_micro, None);
    }

    #[test]
    fn display_policy_for_single_sku() {
        let display = campaign_display("Brand push", &[product("100", "Kettle", Some(12_500_000))]);
        assert_eq!(display.sku, SkuDisplay::One(Sku::new("100")));
        assert_eq!(display.title, "Kettle");
        assert_eq!(display.bid_micro, Some(12_500_000));

        let untitled = campaign_display("Brand push", &[product("100", "", None)]);
        assert_eq!(untitled.title, "Brand push");
    }

    #[test]
    fn display_policy_for_multi_sku() {
        let display = campaign_display(
            "Brand push",
            &[product("100", "Kettle", Some(1)), product("200", "Pan", Some(2))],
        );
        assert_eq!(display.sku, SkuDisplay::Several);
        assert_eq!(display.sku.label(), "several");
        assert_eq!(display.title, "several");
        assert_eq!(display.bid_micro, None);
    }

    #[test]
    fn grand_total_rederives_ratios_from_sums() {
        // Campaign A: ctr 10%, campaign B: ctr 1%. The averaged value would
        // be 5.5%; the re-derived one is 200/1100.
        let running = vec![campaign("a", "A"), campaign("b", "B")];
        let mut stats = HashMap::new();
        stats.insert(CampaignId::new("a"), stat("a", 100.0, 1000, 100));
        stats.insert(CampaignId::new("b"), stat("b", 300.0, 10_000, 100));

        let report = build_report_rows(&running, &stats, &SalesIndex::default(), &HashMap::new());
        let gt = &report.grand_total;

        assert_eq!(gt.views, 11_000);
        assert_eq!(gt.clicks, 200);
        assert_eq!(gt.money_spent, 400.0);
        assert!((gt.ctr - 200.0 / 11_000.0 * 100.0).abs() < 1e-9);
        assert_eq!(gt.click_price, 2.0);
        assert!(gt.is_grand_total());
    }

    #[test]
    fn grand_total_click_price_has_no_reported_fallback() {
        let running = vec![campaign("a", "A")];
        let mut stats = HashMap::new();
        stats.insert(CampaignId::new("a"), stat("a", 100.0, 1000, 0));

        let report = build_report_rows(&running, &stats, &SalesIndex::default(), &HashMap::new());
        // Campaign row falls back to the reported price, the total does not.
        assert_eq!(report.rows[0].click_price, 0.5);
        assert_eq!(report.grand_total.click_price, 0.0);
    }

    #[test]
    fn campaign_missing_from_stats_gets_zero_bases() {
        let running = vec![campaign("a", "A")];
        let report = build_report_rows(
            &running,
            &HashMap::new(),
            &SalesIndex::default(),
            &HashMap::new(),
        );

        let row = &report.rows[0];
        assert_eq!(row.money_spent, 0.0);
        assert_eq!(row.views, 0);
        assert_eq!(row.ctr, 0.0);
        assert_eq!(row.total_drr_pct, 0.0);
    }

    #[test]
    fn campaign_revenue_joins_only_its_own_skus() {
        let running = vec![campaign("a", "A")];
        let mut stats = HashMap::new();
        stats.insert(CampaignId::new("a"), stat("a", 100.0, 1000, 50));
        let mut products = HashMap::new();
        products.insert(CampaignId::new("a"), vec![product("100", "Kettle", None)]);

        let mut sales = sales_with_sku("100", 1500.0, 3);
        sales
            .by_sku
            .insert(Sku::new("999"), SalesTotals { revenue: 9_999.0, units: 99 });

        let report = build_report_rows(&running, &stats, &sales, &products);
        let row = &report.rows[0];
        assert_eq!(row.total_revenue, 1500.0);
        assert_eq!(row.ordered_units, 3);
        assert!((row.total_drr_pct - 100.0 / 1500.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn shared_sku_counts_into_every_campaign_and_the_total() {
        let running = vec![campaign("a", "A"), campaign("b", "B")];
        let mut products = HashMap::new();
        products.insert(CampaignId::new("a"), vec![product("100", "Kettle", None)]);
        products.insert(CampaignId::new("b"), vec![product("100", "Kettle", None)]);

        let sales = sales_with_sku("100", 1000.0, 2);
        let report = build_report_rows(&running, &HashMap::new(), &sales, &products);

        assert_eq!(report.rows[0].total_revenue, 1000.0);
        assert_eq!(report.rows[1].total_revenue, 1000.0);
        // The total is a sum over campaign rows, overlap included.
        assert_eq!(report.grand_total.total_revenue, 2000.0);
    }

    #[test]
    fn campaign_daily_rows_cover_every_day() {
        let period = Period::new(day("2025-03-01"), day("2025-03-03")).expect("must build");
        let mut ads = AdsDailyIndex::default();
        ads.by_campaign_day.insert(
            (day("2025-03-02"), CampaignId::new("a")),
            CampaignDayStat {
                money_spent: 50.0,
                views: 100,
                clicks: 10,
                orders: 1,
                orders_money: 80.0,
                click_price: 5.0,
            },
        );

        let mut sales = SalesIndex::default();
        sales.by_day_sku.insert(
            (day("2025-03-02"), Sku::new("100")),
            SalesTotals { revenue: 500.0, units: 1 },
        );

        let rows = build_campaign_daily_rows(
            &CampaignId::new("a"),
            &period,
            &[product("100", "Kettle", None)],
            &ads,
            &sales,
            0.2,
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].money_spent, 0.0);
        assert_eq!(rows[1].money_spent, 50.0);
        assert_eq!(rows[1].total_revenue, 500.0);
        assert_eq!(rows[1].rpc, 50.0);
        assert_eq!(rows[1].target_cpc, 10.0);
        assert_eq!(rows[2].money_spent, 0.0);
    }

    #[test]
    fn daily_breakdown_computes_organic_share() {
        let ads = AdsDailyIndex {
            totals: vec![DayAdsTotals {
                day: day("2025-03-01"),
                money_spent: 100.0,
                views: 1000,
                clicks: 50,
                orders: 5,
                orders_money: 250.0,
            }],
            by_campaign_day: HashMap::new(),
        };
        let mut sales = SalesIndex::default();
        sales
            .by_day
            .insert(day("2025-03-01"), SalesTotals { revenue: 1000.0, units: 10 });

        let rows = daily_breakdown(&ads, &sales, 0.2);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].organic_pct, 75.0);
        assert_eq!(rows[0].total_drr_pct, 10.0);
        assert_eq!(rows[0].cpm, 100.0);
    }
}
