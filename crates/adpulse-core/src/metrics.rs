//! Advertising efficiency formula library.
//!
//! Every ratio follows one policy: a zero (or non-positive) denominator
//! yields `0.0`. The single exception is [`click_price`], which falls back
//! to the API-reported value when there are no clicks to divide by.
//!
//! All functions return unrounded values. Rounding is a presentation
//! concern and happens once, at the output edge, via [`round1`]/[`round0`].

/// Click-through rate, percent: clicks per hundred views.
pub fn ctr(clicks: f64, views: f64) -> f64 {
    if views > 0.0 {
        clicks / views * 100.0
    } else {
        0.0
    }
}

/// Conversion rate, percent: ordered units per hundred clicks.
pub fn cr(units: f64, clicks: f64) -> f64 {
    if clicks > 0.0 {
        units / clicks * 100.0
    } else {
        0.0
    }
}

/// View-to-order rate, percent: ordered units per hundred views.
pub fn vor(units: f64, views: f64) -> f64 {
    if views > 0.0 {
        units / views * 100.0
    } else {
        0.0
    }
}

/// Cost per thousand views.
pub fn cpm(spend: f64, views: f64) -> f64 {
    if views > 0.0 {
        spend / views * 1000.0
    } else {
        0.0
    }
}

/// Cost per click, with the API-reported price as the zero-clicks fallback.
pub fn click_price(spend: f64, clicks: f64, reported: f64) -> f64 {
    if clicks > 0.0 {
        spend / clicks
    } else {
        reported
    }
}

/// Revenue per click.
pub fn rpc(revenue: f64, clicks: f64) -> f64 {
    if clicks > 0.0 {
        revenue / clicks
    } else {
        0.0
    }
}

/// Highest affordable CPC at the target ad-spend share of revenue.
pub fn target_cpc(rpc: f64, target_drr: f64) -> f64 {
    rpc * target_drr
}

/// Views needed per ordered unit.
pub fn vpo(views: f64, units: f64) -> f64 {
    if units > 0.0 {
        views / units
    } else {
        0.0
    }
}

/// Ad spend as a percent of revenue.
pub fn drr_pct(spend: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        spend / revenue * 100.0
    } else {
        0.0
    }
}

/// Share of revenue not attributed to ads, percent, clamped into 0..=100.
pub fn organic_pct(ads_revenue: f64, total_revenue: f64) -> f64 {
    if total_revenue <= 0.0 {
        return 0.0;
    }
    let organic = 100.0 - ads_revenue / total_revenue * 100.0;
    organic.clamp(0.0, 100.0)
}

/// Round to one decimal, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to a whole number, half away from zero.
pub fn round0(value: f64) -> f64 {
    value.round()
}
