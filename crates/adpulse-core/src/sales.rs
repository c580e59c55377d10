//! Sales-side aggregation over the paginated seller analytics feed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Day, Period, Sku};
use crate::source::{SellerSource, SourceError};

/// Default page size for the seller analytics feed.
pub const DEFAULT_PAGE_LIMIT: usize = 1_000;

/// Summed revenue and units for one aggregation key.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesTotals {
    pub revenue: f64,
    pub units: u64,
}

impl SalesTotals {
    fn add(&mut self, revenue: f64, units: u64) {
        self.revenue += revenue;
        self.units += units;
    }
}

/// Sales rolled up along every axis the reports join on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesIndex {
    pub by_sku: HashMap<Sku, SalesTotals>,
    pub by_day: HashMap<Day, SalesTotals>,
    pub by_day_sku: HashMap<(Day, Sku), SalesTotals>,
    /// Rows discarded because the upstream left sku or day unfilled.
    pub dropped_rows: u64,
}

impl SalesIndex {
    pub fn sku_totals(&self, sku: &Sku) -> SalesTotals {
        self.by_sku.get(sku).copied().unwrap_or_default()
    }

    pub fn day_totals(&self, day: Day) -> SalesTotals {
        self.by_day.get(&day).copied().unwrap_or_default()
    }

    pub fn day_sku_totals(&self, day: Day, sku: &Sku) -> SalesTotals {
        self.by_day_sku
            .get(&(day, sku.clone()))
            .copied()
            .unwrap_or_default()
    }
}

/// Drains the seller feed page by page and folds rows into a [`SalesIndex`].
///
/// Pagination stops at the first empty or short page. Duplicate (sku, day)
/// keys are summed; a page split can land the same key on two pages and an
/// overwrite would lose revenue.
pub fn aggregate_sales(
    source: &dyn SellerSource,
    period: &Period,
    page_limit: usize,
) -> Result<SalesIndex, SourceError> {
    if page_limit == 0 {
        return Err(SourceError::invalid_request(
            "sales page limit must be greater than zero",
        ));
    }

    let mut index = SalesIndex::default();
    let mut offset: u64 = 0;

    loop {
        let page = source.sales_page(period, offset, page_limit)?;
        let page_len = page.len();

        for row in page {
            let (sku, day) = match (row.sku, row.day) {
                (Some(sku), Some(day)) => (sku, day),
                _ => {
                    index.dropped_rows += 1;
                    continue;
                }
            };

            index
                .by_sku
                .entry(sku.clone())
                .or_default()
                .add(row.revenue, row.units);
            index.by_day.entry(day).or_default().add(row.revenue, row.units);
            index
                .by_day_sku
                .entry((day, sku))
                .or_default()
                .add(row.revenue, row.units);
        }

        if page_len < page_limit {
            break;
        }
        offset += page_len as u64;
    }

    Ok(index)
}
