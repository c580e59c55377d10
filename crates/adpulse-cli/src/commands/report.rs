use std::collections::HashMap;
use std::fs::File;

use adpulse_core::{
    aggregate_sales, build_report_rows, metrics, report_to_csv, running_campaigns,
    write_report_csv, AdsSource, AdsStatRecord, CampaignId, Period, ReportRow,
};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::{Cli, OutputFormat, ReportArgs};
use crate::config::Credentials;
use crate::error::CliError;

use super::CommandResult;

pub fn run(cli: &Cli, args: &ReportArgs) -> Result<CommandResult, CliError> {
    let period = super::resolve_period(cli)?;
    let batch_size = super::batch_size(cli)?;
    let creds = Credentials::from_env(cli.company.as_deref())?;
    let ads = super::ads_client(cli, &creds.perf);
    let seller = super::seller_client(&creds.seller);

    let running = running_campaigns(&ads)?;
    let ids: Vec<CampaignId> = running.iter().map(|c| c.id.clone()).collect();
    info!(campaigns = running.len(), period = %period_label(&period), "building period report");

    let stats_by_campaign = fetch_period_stats(&ads, &period, &ids, batch_size)?;

    let mut products_by_campaign = HashMap::new();
    for campaign in &running {
        let products = ads.campaign_products(&campaign.id)?;
        products_by_campaign.insert(campaign.id.clone(), products);
    }

    let sales = aggregate_sales(&seller, &period, cli.page_limit)?;
    let report = build_report_rows(&running, &stats_by_campaign, &sales, &products_by_campaign);

    if let Some(path) = &args.out {
        let mut file = File::create(path)?;
        write_report_csv(&mut file, &report)?;
        info!(path = %path.display(), rows = report.rows.len(), "report written");
    }

    let data = json!({
        "period": { "from": period.from_day(), "to": period.to_day() },
        "dropped_sales_rows": sales.dropped_rows,
        "rows": report.rows.iter().map(row_value).collect::<Vec<_>>(),
        "grand_total": row_value(&report.grand_total),
    });

    let mut result = CommandResult::new(data);
    if cli.format == OutputFormat::Csv {
        result = result.with_csv(report_to_csv(&report)?);
    }
    Ok(result)
}

/// One statistics record per campaign over the whole period, fetched in
/// id batches and summed across response rows.
fn fetch_period_stats(
    ads: &dyn AdsSource,
    period: &Period,
    ids: &[CampaignId],
    batch_size: usize,
) -> Result<HashMap<CampaignId, AdsStatRecord>, CliError> {
    let mut by_campaign: HashMap<CampaignId, AdsStatRecord> = HashMap::new();

    for batch in ids.chunks(batch_size) {
        for record in ads.stats(period, batch)? {
            match by_campaign.get_mut(&record.campaign_id) {
                Some(acc) => {
                    acc.spend += record.spend;
                    acc.views += record.views;
                    acc.clicks += record.clicks;
                    acc.orders += record.orders;
                    acc.orders_money += record.orders_money;
                    if record.click_price > 0.0 {
                        acc.click_price = record.click_price;
                    }
                }
                None => {
                    by_campaign.insert(record.campaign_id.clone(), record);
                }
            }
        }
    }

    Ok(by_campaign)
}

fn period_label(period: &Period) -> String {
    format!("{}..{}", period.from_day(), period.to_day())
}

fn row_value(row: &ReportRow) -> Value {
    json!({
        "campaign_id": row.campaign_id,
        "sku": row.sku,
        "title": row.title,
        "money_spent": metrics::round0(row.money_spent),
        "views": row.views,
        "clicks": row.clicks,
        "click_price": metrics::round1(row.click_price),
        "orders_money_ads": metrics::round0(row.orders_money_ads),
        "total_revenue": metrics::round0(row.total_revenue),
        "ordered_units": row.ordered_units,
        "total_drr_pct": metrics::round1(row.total_drr_pct),
        "ctr": metrics::round1(row.ctr),
        "cr": metrics::round1(row.cr),
        "vor": metrics::round1(row.vor),
        "vpo": metrics::round1(row.vpo),
    })
}
