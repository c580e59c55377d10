use adpulse_core::domain::money::fmt_num;
use adpulse_core::{
    aggregate_daily, aggregate_sales, daily_breakdown, metrics, running_campaigns, CampaignId,
    DailyBreakdownRow,
};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::{Cli, OutputFormat};
use crate::config::Credentials;
use crate::error::CliError;
use crate::output::csv_document;

use super::CommandResult;

const CSV_COLUMNS: [&str; 16] = [
    "day",
    "money_spent",
    "views",
    "clicks",
    "orders_money_ads",
    "total_revenue",
    "ordered_units",
    "total_drr_pct",
    "cpm",
    "ctr",
    "cr",
    "vor",
    "rpc",
    "target_cpc",
    "vpo",
    "organic_pct",
];

pub fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let period = super::resolve_period(cli)?;
    let batch_size = super::batch_size(cli)?;
    let target_drr = super::share_from_percent(cli.target_drr, "--target-drr")?;
    let creds = Credentials::from_env(cli.company.as_deref())?;
    let ads = super::ads_client(cli, &creds.perf);
    let seller = super::seller_client(&creds.seller);

    let running = running_campaigns(&ads)?;
    let ids: Vec<CampaignId> = running.iter().map(|c| c.id.clone()).collect();

    let index = aggregate_daily(&ads, &period, &ids, batch_size, false)?;
    let sales = aggregate_sales(&seller, &period, cli.page_limit)?;
    let rows = daily_breakdown(&index, &sales, target_drr);
    info!(days = rows.len(), campaigns = ids.len(), "daily breakdown built");

    let data = json!({
        "period": { "from": period.from_day(), "to": period.to_day() },
        "dropped_sales_rows": sales.dropped_rows,
        "days": rows.iter().map(day_value).collect::<Vec<_>>(),
    });

    let mut result = CommandResult::new(data);
    if cli.format == OutputFormat::Csv {
        let csv_rows: Vec<Vec<String>> = rows.iter().map(csv_row).collect();
        result = result.with_csv(csv_document(&CSV_COLUMNS, &csv_rows));
    }
    Ok(result)
}

fn day_value(row: &DailyBreakdownRow) -> Value {
    json!({
        "day": row.day,
        "money_spent": metrics::round0(row.money_spent),
        "views": row.views,
        "clicks": row.clicks,
        "orders_money_ads": metrics::round0(row.orders_money_ads),
        "total_revenue": metrics::round0(row.total_revenue),
        "ordered_units": row.ordered_units,
        "total_drr_pct": metrics::round1(row.total_drr_pct),
        "cpm": metrics::round0(row.cpm),
        "ctr": metrics::round1(row.ctr),
        "cr": metrics::round1(row.cr),
        "vor": metrics::round1(row.vor),
        "rpc": metrics::round1(row.rpc),
        "target_cpc": metrics::round1(row.target_cpc),
        "vpo": metrics::round1(row.vpo),
        "organic_pct": metrics::round1(row.organic_pct),
    })
}

fn csv_row(row: &DailyBreakdownRow) -> Vec<String> {
    vec![
        row.day.format_iso(),
        fmt_num(Some(row.money_spent)),
        row.views.to_string(),
        row.clicks.to_string(),
        fmt_num(Some(row.orders_money_ads)),
        fmt_num(Some(row.total_revenue)),
        row.ordered_units.to_string(),
        fmt_num(Some(row.total_drr_pct)),
        fmt_num(Some(row.cpm)),
        format!("{:.1}", metrics::round1(row.ctr)),
        format!("{:.1}", metrics::round1(row.cr)),
        format!("{:.1}", metrics::round1(row.vor)),
        format!("{:.1}", metrics::round1(row.rpc)),
        format!("{:.1}", metrics::round1(row.target_cpc)),
        format!("{:.1}", metrics::round1(row.vpo)),
        format!("{:.1}", metrics::round1(row.organic_pct)),
    ]
}
