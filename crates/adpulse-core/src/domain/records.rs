use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::Day;

/// Upstream campaign identifier. Opaque string, non-empty by construction
/// at the client boundary; kept permissive here because identifiers also
/// arrive embedded in upstream payloads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CampaignId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marketplace stock keeping unit identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Sku {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Campaign lifecycle state as reported by the ads API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignState {
    Running,
    Stopped,
    Archived,
    Draft,
    Other,
}

impl CampaignState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Campaign directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub state: CampaignState,
}

/// Product attached to a campaign, with its current sku bid in micro-units
/// when the API reports one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProduct {
    pub sku: Sku,
    pub title: String,
    pub bid_micro: Option<i64>,
}

/// Per-campaign advertising statistics for one queried date range.
///
/// `click_price` is the value the API itself reports; it can disagree with
/// `spend / clicks` and is only trusted when clicks are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdsStatRecord {
    pub campaign_id: CampaignId,
    pub spend: f64,
    pub views: u64,
    pub clicks: u64,
    pub orders: u64,
    pub orders_money: f64,
    pub click_price: f64,
}

/// One raw row from the seller analytics feed. Dimensions the upstream
/// failed to fill arrive as `None` and are dropped (and counted) during
/// aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSalesRow {
    pub sku: Option<Sku>,
    pub day: Option<Day>,
    pub revenue: f64,
    pub units: u64,
}

/// Sku display policy for campaign-level rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkuDisplay {
    None,
    One(Sku),
    Several,
}

impl SkuDisplay {
    pub fn label(&self) -> &str {
        match self {
            Self::None => "—",
            Self::One(sku) => sku.as_str(),
            Self::Several => "several",
        }
    }
}

/// Sentinel campaign id of the synthetic totals row.
pub const GRAND_TOTAL: &str = "GRAND_TOTAL";

/// One row of the period report: a campaign, or the GRAND_TOTAL sentinel.
/// Metric fields carry unrounded values; rounding happens at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub campaign_id: CampaignId,
    pub sku: String,
    pub title: String,
    pub money_spent: f64,
    pub views: u64,
    pub clicks: u64,
    pub click_price: f64,
    pub orders_money_ads: f64,
    pub total_revenue: f64,
    pub ordered_units: u64,
    pub total_drr_pct: f64,
    pub ctr: f64,
    pub cr: f64,
    pub vor: f64,
    pub vpo: f64,
}

impl ReportRow {
    pub fn is_grand_total(&self) -> bool {
        self.campaign_id.as_str() == GRAND_TOTAL
    }
}

/// Per-day row for a single campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDailyRow {
    pub day: Day,
    pub campaign_id: CampaignId,
    pub money_spent: f64,
    pub views: u64,
    pub clicks: u64,
    pub orders: u64,
    pub click_price: f64,
    pub cpm: f64,
    pub total_revenue: f64,
    pub ordered_units: u64,
    pub total_drr_pct: f64,
    pub ctr: f64,
    pub cr: f64,
    pub vor: f64,
    pub rpc: f64,
    pub target_cpc: f64,
    pub vpo: f64,
}

/// Account-level per-day row across all running campaigns, with the organic
/// share of revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakdownRow {
    pub day: Day,
    pub money_spent: f64,
    pub views: u64,
    pub clicks: u64,
    pub orders_money_ads: f64,
    pub total_revenue: f64,
    pub ordered_units: u64,
    pub total_drr_pct: f64,
    pub cpm: f64,
    pub ctr: f64,
    pub cr: f64,
    pub vor: f64,
    pub rpc: f64,
    pub target_cpc: f64,
    pub vpo: f64,
    pub organic_pct: f64,
}

/// Weekly rollup row. `week` is the Monday the week starts on;
/// `days_in_period` counts the distinct days that actually fell into the
/// queried period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRow {
    pub week: Day,
    pub days_in_period: u32,
    pub money_spent: f64,
    pub views: u64,
    pub clicks: u64,
    pub click_price: f64,
    pub cpm: f64,
    pub total_revenue: f64,
    pub ordered_units: u64,
    pub total_drr_pct: f64,
    pub ctr: f64,
    pub cr: f64,
    pub vor: f64,
    pub rpc: f64,
    pub target_cpc: f64,
    pub vpo: f64,
}
