//! Weekly rollup of campaign daily rows.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{CampaignDailyRow, Day, WeeklyRow};
use crate::metrics;

#[derive(Default)]
struct WeekAcc {
    days: BTreeSet<Day>,
    spend: f64,
    views: u64,
    clicks: u64,
    revenue: f64,
    units: u64,
}

/// Groups daily rows into Monday-start weeks, sums the additive bases and
/// re-derives every ratio from the weekly sums. Output weeks ascend; an
/// empty input yields an empty output.
///
/// `days_in_period` counts distinct days that fell into the week, so edge
/// weeks clipped by the queried period are comparable at a glance.
pub fn weekly_rollup(daily: &[CampaignDailyRow], target_drr: f64) -> Vec<WeeklyRow> {
    let mut weeks: BTreeMap<Day, WeekAcc> = BTreeMap::new();

    for row in daily {
        let acc = weeks.entry(row.day.week_start()).or_default();
        acc.days.insert(row.day);
        acc.spend += row.money_spent;
        acc.views += row.views;
        acc.clicks += row.clicks;
        acc.revenue += row.total_revenue;
        acc.units += row.ordered_units;
    }

    weeks
        .into_iter()
        .map(|(week, acc)| {
            let rpc = metrics::rpc(acc.revenue, acc.clicks as f64);
            WeeklyRow {
                week,
                days_in_period: acc.days.len() as u32,
                money_spent: acc.spend,
                views: acc.views,
                clicks: acc.clicks,
                click_price: metrics::click_price(acc.spend, acc.clicks as f64, 0.0),
                cpm: metrics::cpm(acc.spend, acc.views as f64),
                total_revenue: acc.revenue,
                ordered_units: acc.units,
                total_drr_pct: metrics::drr_pct(acc.spend, acc.revenue),
                ctr: metrics::ctr(acc.clicks as f64, acc.views as f64),
                cr: metrics::cr(acc.units as f64, acc.clicks as f64),
                vor: metrics::vor(acc.units as f64, acc.views as f64),
                rpc,
                target_cpc: metrics::target_cpc(rpc, target_drr),
                vpo: metrics::vpo(acc.views as f64, acc.units as f64),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CampaignId, Period};

    fn daily_row(day: &str, spend: f64, views: u64, clicks: u64, revenue: f64, units: u64) -> CampaignDailyRow {
        CampaignDailyRow {
            day: Day::parse(day).expect("must parse"),
            campaign_id: CampaignId::new("a"),
            money_spent: spend,
            views,
            clicks,
            orders: 0,
            click_price: 0.0,
            cpm: 0.0,
            total_revenue: revenue,
            ordered_units: units,
            total_drr_pct: 0.0,
            ctr: 0.0,
            cr: 0.0,
            vor: 0.0,
            rpc: 0.0,
            target_cpc: 0.0,
            vpo: 0.0,
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(weekly_rollup(&[], 0.2).is_empty());
    }

    #[test]
    fn ten_days_from_wednesday_split_into_two_five_day_weeks() {
        // 2025-03-19 is a Wednesday; ten days reach Friday of the next week.
        let from = Day::parse("2025-03-19").expect("must parse");
        let to = Day::parse("2025-03-28").expect("must parse");
        let period = Period::new(from, to).expect("must build");

        let daily: Vec<CampaignDailyRow> = period
            .days()
            .map(|d| daily_row(&d.format_iso(), 10.0, 100, 10, 50.0, 1))
            .collect();

        let weeks = weekly_rollup(&daily, 0.2);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week.format_iso(), "2025-03-17");
        assert_eq!(weeks[1].week.format_iso(), "2025-03-24");
        assert_eq!(weeks[0].days_in_period, 5);
        assert_eq!(weeks[1].days_in_period, 5);
        assert!(weeks[0].week < weeks[1].week);
    }

    #[test]
    fn ratios_are_rederived_from_weekly_sums() {
        let daily = vec![
            daily_row("2025-03-17", 100.0, 1000, 100, 400.0, 4),
            daily_row("2025-03-18", 100.0, 9000, 20, 600.0, 6),
        ];

        let weeks = weekly_rollup(&daily, 0.2);
        assert_eq!(weeks.len(), 1);
        let week = &weeks[0];

        assert_eq!(week.money_spent, 200.0);
        assert_eq!(week.views, 10_000);
        assert_eq!(week.clicks, 120);
        assert_eq!(week.ctr, 1.2);
        assert!((week.click_price - 200.0 / 120.0).abs() < 1e-9);
        assert!((week.rpc - 1000.0 / 120.0).abs() < 1e-9);
        assert!((week.target_cpc - week.rpc * 0.2).abs() < 1e-9);
        assert_eq!(week.cpm, 20.0);
        assert_eq!(week.total_drr_pct, 20.0);
    }

    #[test]
    fn duplicate_days_count_once_in_days_in_period() {
        // Two campaigns can contribute rows for the same day.
        let daily = vec![
            daily_row("2025-03-17", 10.0, 100, 10, 0.0, 0),
            daily_row("2025-03-17", 20.0, 200, 20, 0.0, 0),
        ];

        let weeks = weekly_rollup(&daily, 0.2);
        assert_eq!(weeks[0].days_in_period, 1);
        assert_eq!(weeks[0].money_spent, 30.0);
    }
}
