//! Economic CPC window: what a click may cost for the campaign to hold its
//! target ad-spend share of revenue.

use serde::{Deserialize, Serialize};

use crate::domain::CampaignDailyRow;

/// Default absolute tolerance around the target DRR, in share units.
pub const DEFAULT_DRR_TOLERANCE: f64 = 0.05;

/// Economically justified CPC with its tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpcWindow {
    pub cpc_econ: f64,
    pub cpc_econ_min: f64,
    pub cpc_econ_max: f64,
}

/// Computes the CPC window from a campaign's daily rows.
///
/// `cpc = order_value x conversion x drr`, where order value and conversion
/// come from period sums. Returns `None` when any of revenue, units or
/// clicks sums to zero or below; a window derived from a degenerate period
/// would be noise. The tolerance band is clamped into the 0..=1 share range.
pub fn cpc_window(
    daily: &[CampaignDailyRow],
    target_drr: f64,
    drr_tolerance: f64,
) -> Option<CpcWindow> {
    let revenue: f64 = daily.iter().map(|r| r.total_revenue).sum();
    let units: f64 = daily.iter().map(|r| r.ordered_units as f64).sum();
    let clicks: f64 = daily.iter().map(|r| r.clicks as f64).sum();

    if revenue <= 0.0 || units <= 0.0 || clicks <= 0.0 {
        return None;
    }

    let order_value = revenue / units;
    let conversion = units / clicks;
    let per_drr = order_value * conversion;

    let drr_min = (target_drr - drr_tolerance).max(0.0);
    let drr_max = (target_drr + drr_tolerance).min(1.0);

    Some(CpcWindow {
        cpc_econ: per_drr * target_drr,
        cpc_econ_min: per_drr * drr_min,
        cpc_econ_max: per_drr * drr_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CampaignId, Day};

    fn row(revenue: f64, units: u64, clicks: u64) -> CampaignDailyRow {
        CampaignDailyRow {
            day: Day::parse("2025-03-01").expect("must parse"),
            campaign_id: CampaignId::new("a"),
            money_spent: 0.0,
            views: 0,
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
    fn window_from_period_sums() {
        // revenue 10000, units 20, clicks 500, target 0.2, tolerance 0.05:
        // order_value 500, conversion 0.04, cpc 4.0, band [3.0, 5.0].
        let daily = vec![row(4_000.0, 8, 200), row(6_000.0, 12, 300)];
        let window = cpc_window(&daily, 0.2, 0.05).expect("must compute");

        assert!((window.cpc_econ - 4.0).abs() < 1e-9);
        assert!((window.cpc_econ_min - 3.0).abs() < 1e-9);
        assert!((window.cpc_econ_max - 5.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_sums_give_no_window() {
        assert!(cpc_window(&[], 0.2, 0.05).is_none());
        assert!(cpc_window(&[row(0.0, 20, 500)], 0.2, 0.05).is_none());
        assert!(cpc_window(&[row(10_000.0, 0, 500)], 0.2, 0.05).is_none());
        assert!(cpc_window(&[row(10_000.0, 20, 0)], 0.2, 0.05).is_none());
    }

    #[test]
    fn tolerance_band_is_clamped_to_share_range() {
        let daily = vec![row(10_000.0, 20, 500)];

        let low = cpc_window(&daily, 0.03, 0.05).expect("must compute");
        // 0.03 - 0.05 clamps to 0.
        assert_eq!(low.cpc_econ_min, 0.0);

        let high = cpc_window(&daily, 0.98, 0.05).expect("must compute");
        // 0.98 + 0.05 clamps to 1; per_drr is order_value x conversion = 20.
        assert!((high.cpc_econ_max - 20.0).abs() < 1e-9);
    }
}
