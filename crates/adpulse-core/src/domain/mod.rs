pub mod day;
pub mod money;
pub mod period;
pub mod records;

pub use day::Day;
pub use period::{Days, Period};
pub use records::{
    AdsStatRecord, Campaign, CampaignDailyRow, CampaignId, CampaignProduct, CampaignState,
    DailyBreakdownRow, RawSalesRow, ReportRow, Sku, SkuDisplay, WeeklyRow, GRAND_TOTAL,
};
