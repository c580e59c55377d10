use adpulse_core::domain::money::fmt_num;
use adpulse_core::{
    aggregate_daily, aggregate_sales, build_campaign_daily_rows, campaign_display, cpc_window,
    metrics, weekly_rollup, AdsSource, CampaignDailyRow, WeeklyRow, DEFAULT_DRR_TOLERANCE,
};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::{CampaignArgs, Cli, OutputFormat};
use crate::config::Credentials;
use crate::error::CliError;
use crate::output::csv_document;

use super::CommandResult;

const DAILY_CSV_COLUMNS: [&str; 16] = [
    "day",
    "money_spent",
    "views",
    "clicks",
    "orders",
    "click_price",
    "cpm",
    "total_revenue",
    "ordered_units",
    "total_drr_pct",
    "ctr",
    "cr",
    "vor",
    "rpc",
    "target_cpc",
    "vpo",
];

const WEEKLY_CSV_COLUMNS: [&str; 16] = [
    "week",
    "days_in_period",
    "money_spent",
    "views",
    "clicks",
    "click_price",
    "cpm",
    "total_revenue",
    "ordered_units",
    "total_drr_pct",
    "ctr",
    "cr",
    "vor",
    "rpc",
    "target_cpc",
    "vpo",
];

pub fn run(cli: &Cli, args: &CampaignArgs) -> Result<CommandResult, CliError> {
    let period = super::resolve_period(cli)?;
    let batch_size = super::batch_size(cli)?;
    let target_drr = super::share_from_percent(cli.target_drr, "--target-drr")?;
    let id = super::campaign_id(&args.campaign_id)?;
    let creds = Credentials::from_env(cli.company.as_deref())?;
    let ads = super::ads_client(cli, &creds.perf);
    let seller = super::seller_client(&creds.seller);

    let products = ads.campaign_products(&id)?;
    let display = campaign_display("", &products);
    let index = aggregate_daily(&ads, &period, std::slice::from_ref(&id), batch_size, true)?;
    let sales = aggregate_sales(&seller, &period, cli.page_limit)?;

    let daily = build_campaign_daily_rows(&id, &period, &products, &index, &sales, target_drr);
    let window = cpc_window(&daily, target_drr, DEFAULT_DRR_TOLERANCE);
    info!(campaign = %id, days = daily.len(), "campaign drill-down built");

    let window_value = match &window {
        Some(w) => json!({
            "cpc_econ": metrics::round1(w.cpc_econ),
            "cpc_econ_min": metrics::round1(w.cpc_econ_min),
            "cpc_econ_max": metrics::round1(w.cpc_econ_max),
        }),
        None => Value::Null,
    };

    let mut data = json!({
        "campaign_id": id,
        "sku": display.sku.label(),
        "skus": display.skus,
        "bid": display.bid_micro.map(adpulse_core::domain::money::from_micro),
        "period": { "from": period.from_day(), "to": period.to_day() },
        "cpc_window": window_value,
        "days": daily.iter().map(day_value).collect::<Vec<_>>(),
    });

    let csv = if args.weekly {
        let weeks = weekly_rollup(&daily, target_drr);
        data["weeks"] = Value::Array(weeks.iter().map(week_value).collect());
        csv_document(
            &WEEKLY_CSV_COLUMNS,
            &weeks.iter().map(weekly_csv_row).collect::<Vec<_>>(),
        )
    } else {
        csv_document(
            &DAILY_CSV_COLUMNS,
            &daily.iter().map(daily_csv_row).collect::<Vec<_>>(),
        )
    };

    let mut result = CommandResult::new(data);
    if cli.format == OutputFormat::Csv {
        result = result.with_csv(csv);
    }
    Ok(result)
}

fn day_value(row: &CampaignDailyRow) -> Value {
    json!({
        "day": row.day,
        "money_spent": metrics::round0(row.money_spent),
        "views": row.views,
        "clicks": row.clicks,
        "orders": row.orders,
        "click_price": metrics::round1(row.click_price),
        "cpm": metrics::round0(row.cpm),
        "total_revenue": metrics::round0(row.total_revenue),
        "ordered_units": row.ordered_units,
        "total_drr_pct": metrics::round1(row.total_drr_pct),
        "ctr": metrics::round1(row.ctr),
        "cr": metrics::round1(row.cr),
        "vor": metrics::round1(row.vor),
        "rpc": metrics::round1(row.rpc),
        "target_cpc": metrics::round1(row.target_cpc),
        "vpo": metrics::round1(row.vpo),
    })
}

fn week_value(row: &WeeklyRow) -> Value {
    json!({
        "week": row.week,
        "days_in_period": row.days_in_period,
        "money_spent": metrics::round0(row.money_spent),
        "views": row.views,
        "clicks": row.clicks,
        "click_price": metrics::round1(row.click_price),
        "cpm": metrics::round0(row.cpm),
        "total_revenue": metrics::round0(row.total_revenue),
        "ordered_units": row.ordered_units,
        "total_drr_pct": metrics::round1(row.total_drr_pct),
        "ctr": metrics::round1(row.ctr),
        "cr": metrics::round1(row.cr),
        "vor": metrics::round1(row.vor),
        "rpc": metrics::round1(row.rpc),
        "target_cpc": metrics::round1(row.target_cpc),
        "vpo": metrics::round1(row.vpo),
    })
}

fn daily_csv_row(row: &CampaignDailyRow) -> Vec<String> {
    vec![
        row.day.format_iso(),
        fmt_num(Some(row.money_spent)),
        row.views.to_string(),
        row.clicks.to_string(),
        row.orders.to_string(),
        format!("{:.1}", metrics::round1(row.click_price)),
        fmt_num(Some(row.cpm)),
        fmt_num(Some(row.total_revenue)),
        row.ordered_units.to_string(),
        fmt_num(Some(row.total_drr_pct)),
        format!("{:.1}", metrics::round1(row.ctr)),
        format!("{:.1}", metrics::round1(row.cr)),
        format!("{:.1}", metrics::round1(row.vor)),
        format!("{:.1}", metrics::round1(row.rpc)),
        format!("{:.1}", metrics::round1(row.target_cpc)),
        format!("{:.1}", metrics::round1(row.vpo)),
    ]
}

fn weekly_csv_row(row: &WeeklyRow) -> Vec<String> {
    vec![
        row.week.format_iso(),
        row.days_in_period.to_string(),
        fmt_num(Some(row.money_spent)),
        row.views.to_string(),
        row.clicks.to_string(),
        format!("{:.1}", metrics::round1(row.click_price)),
        fmt_num(Some(row.cpm)),
        fmt_num(Some(row.total_revenue)),
        row.ordered_units.to_string(),
        fmt_num(Some(row.total_drr_pct)),
        format!("{:.1}", metrics::round1(row.ctr)),
        format!("{:.1}", metrics::round1(row.cr)),
        format!("{:.1}", metrics::round1(row.vor)),
        format!("{:.1}", metrics::round1(row.rpc)),
        format!("{:.1}", metrics::round1(row.target_cpc)),
        format!("{:.1}", metrics::round1(row.vpo)),
    ]
}
