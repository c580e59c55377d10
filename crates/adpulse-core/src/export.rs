//! Spreadsheet export of the period report.
//!
//! The CSV is `;`-delimited with a fixed legacy column order; downstream
//! sheets reference columns by position. Money and count columns are
//! written as whole numbers, rate columns with one decimal.

use std::io::Write;

use crate::domain::money::fmt_num;
use crate::domain::ReportRow;
use crate::error::CoreError;
use crate::metrics;
use crate::report::PeriodReport;

pub const REPORT_COLUMNS: [&str; 15] = [
    "campaign_id",
    "sku",
    "title",
    "money_spent",
    "views",
    "clicks",
    "click_price",
    "orders_money_ads",
    "total_revenue",
    "ordered_units",
    "total_drr_pct",
    "ctr",
    "cr",
    "vor",
    "vpo",
];

const DELIMITER: char = ';';

/// Writes the report as CSV: campaign rows in order, GRAND_TOTAL last.
/// A report without campaign rows is refused.
pub fn write_report_csv<W: Write>(out: &mut W, report: &PeriodReport) -> Result<(), CoreError> {
    if report.rows.is_empty() {
        return Err(CoreError::EmptyReport);
    }

    writeln!(out, "{}", REPORT_COLUMNS.join(";"))?;
    for row in &report.rows {
        writeln!(out, "{}", format_row(row))?;
    }
    writeln!(out, "{}", format_row(&report.grand_total))?;
    Ok(())
}

/// Renders the report CSV into a string.
pub fn report_to_csv(report: &PeriodReport) -> Result<String, CoreError> {
    let mut buffer = Vec::new();
    write_report_csv(&mut buffer, report)?;
    String::from_utf8(buffer)
        .map_err(|e| CoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn format_row(row: &ReportRow) -> String {
    let fields = [
        quote(row.campaign_id.as_str()),
        quote(&row.sku),
        quote(&row.title),
        fmt_num(Some(row.money_spent)),
        fmt_num(Some(row.views as f64)),
        fmt_num(Some(row.clicks as f64)),
        fmt_num(Some(row.click_price)),
        fmt_num(Some(row.orders_money_ads)),
        fmt_num(Some(row.total_revenue)),
        fmt_num(Some(row.ordered_units as f64)),
        fmt_num(Some(row.total_drr_pct)),
        format!("{:.1}", metrics::round1(row.ctr)),
        format!("{:.1}", metrics::round1(row.cr)),
        format!("{:.1}", metrics::round1(row.vor)),
        format!("{:.1}", metrics::round1(row.vpo)),
    ];
    fields.join(";")
}

fn quote(field: &str) -> String {
    if field.contains(DELIMITER) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CampaignId, GRAND_TOTAL};

    fn row(id: &str, title: &str) -> ReportRow {
        ReportRow {
            campaign_id: CampaignId::new(id),
            sku: String::from("100"),
            title: title.to_owned(),
            money_spent: 1234.56,
            views: 1000,
            clicks: 50,
            click_price: 24.69,
            orders_money_ads: 900.0,
            total_revenue: 1500.4,
            ordered_units: 3,
            total_drr_pct: 82.3,
            ctr: 5.0,
            cr: 6.0,
            vor: 0.3,
            vpo: 333.33,
        }
    }

    fn report() -> PeriodReport {
        let mut grand_total = row(GRAND_TOTAL, "");
        grand_total.sku = String::new();
        PeriodReport {
            rows: vec![row("a", "Kettle")],
            grand_total,
        }
    }

    #[test]
    fn header_matches_legacy_column_order() {
        let csv = report_to_csv(&report()).expect("must render");
        let header = csv.lines().next().expect("must have header");
        assert_eq!(
            header,
            "campaign_id;sku;title;money_spent;views;clicks;click_price;\
             orders_money_ads;total_revenue;ordered_units;total_drr_pct;ctr;cr;vor;vpo"
        );
    }

    #[test]
    fn money_columns_are_integers_and_rates_one_decimal() {
        let csv = report_to_csv(&report()).expect("must render");
        let line = csv.lines().nth(1).expect("must have a row");
        assert_eq!(line, "a;100;Kettle;1235;1000;50;25;900;1500;3;82;5.0;6.0;0.3;333.3");
    }

    #[test]
    fn grand_total_is_the_last_line() {
        let csv = report_to_csv(&report()).expect("must render");
        let last = csv.lines().last().expect("must have rows");
        assert!(last.starts_with("GRAND_TOTAL;"));
    }

    #[test]
    fn titles_with_delimiter_are_quoted() {
        let mut report = report();
        report.rows[0].title = String::from("Kettle; 2L");
        let csv = report_to_csv(&report).expect("must render");
        assert!(csv.contains("\"Kettle; 2L\""));
    }

    #[test]
    fn empty_report_is_refused() {
        let mut report = report();
        report.rows.clear();
        let err = report_to_csv(&report).expect_err("must refuse");
        assert!(matches!(err, CoreError::EmptyReport));
    }
}
