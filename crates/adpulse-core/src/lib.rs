//! Core contracts and aggregation engine for adpulse.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The advertising metric formula library
//! - Source traits for the ads and seller APIs
//! - Daily/weekly/period aggregation and report assembly
//! - CSV export and the bid-change audit ledger
//!
//! The engine is synchronous and performs no I/O of its own; all upstream
//! data arrives through the [`source`] traits.

pub mod ads;
pub mod audit;
pub mod domain;
pub mod econ;
pub mod error;
pub mod export;
pub mod metrics;
pub mod report;
pub mod sales;
pub mod source;
pub mod weekly;

pub use ads::{aggregate_daily, AdsDailyIndex, CampaignDayStat, DayAdsTotals, DEFAULT_STATS_BATCH};
pub use audit::{apply_bid_logged, BidApplyOutcome, BidChange, BidLedger, LEDGER_COLUMNS};
pub use domain::{
    AdsStatRecord, Campaign, CampaignDailyRow, CampaignId, CampaignProduct, CampaignState,
    DailyBreakdownRow, Day, Days, Period, RawSalesRow, ReportRow, Sku, SkuDisplay, WeeklyRow,
    GRAND_TOTAL,
};
pub use econ::{cpc_window, CpcWindow, DEFAULT_DRR_TOLERANCE};
pub use error::{CoreError, ValidationError};
pub use export::{report_to_csv, write_report_csv, REPORT_COLUMNS};
pub use report::{
    build_campaign_daily_rows, build_report_rows, campaign_display, daily_breakdown,
    CampaignDisplay, PeriodReport,
};
pub use sales::{aggregate_sales, SalesIndex, SalesTotals, DEFAULT_PAGE_LIMIT};
pub use source::{running_campaigns, AdsSource, SellerSource, SourceError, SourceErrorKind};
pub use weekly::weekly_rollup;
