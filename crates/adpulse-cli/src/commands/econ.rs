use adpulse_core::{
    aggregate_daily, aggregate_sales, build_campaign_daily_rows, cpc_window, metrics,
    running_campaigns, AdsSource, CampaignId, CpcWindow,
};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::{Cli, EconArgs, OutputFormat};
use crate::config::Credentials;
use crate::error::CliError;
use crate::output::csv_document;

use super::CommandResult;

const CSV_COLUMNS: [&str; 4] = ["campaign_id", "cpc_econ", "cpc_econ_min", "cpc_econ_max"];

pub fn run(cli: &Cli, args: &EconArgs) -> Result<CommandResult, CliError> {
    let period = super::resolve_period(cli)?;
    let batch_size = super::batch_size(cli)?;
    let target_drr = super::share_from_percent(cli.target_drr, "--target-drr")?;
    let drr_tolerance = super::share_from_percent(args.drr_tolerance, "--drr-tolerance")?;
    let creds = Credentials::from_env(cli.company.as_deref())?;
    let ads = super::ads_client(cli, &creds.perf);
    let seller = super::seller_client(&creds.seller);

    // One explicit campaign, or every running one.
    let ids: Vec<CampaignId> = match &args.campaign_id {
        Some(raw) => vec![super::campaign_id(raw)?],
        None => running_campaigns(&ads)?
            .into_iter()
            .map(|c| c.id)
            .collect(),
    };

    let index = aggregate_daily(&ads, &period, &ids, batch_size, true)?;
    let sales = aggregate_sales(&seller, &period, cli.page_limit)?;

    let mut campaigns = Vec::with_capacity(ids.len());
    let mut csv_rows = Vec::with_capacity(ids.len());
    for id in &ids {
        let products = ads.campaign_products(id)?;
        let daily = build_campaign_daily_rows(id, &period, &products, &index, &sales, target_drr);
        let window = cpc_window(&daily, target_drr, drr_tolerance);

        campaigns.push(entry_value(id, window.as_ref()));
        csv_rows.push(csv_row(id, window.as_ref()));
    }
    info!(campaigns = campaigns.len(), "cpc windows computed");

    let data = json!({
        "period": { "from": period.from_day(), "to": period.to_day() },
        "target_drr": target_drr,
        "drr_tolerance": drr_tolerance,
        "campaigns": campaigns,
    });

    let mut result = CommandResult::new(data);
    if cli.format == OutputFormat::Csv {
        result = result.with_csv(csv_document(&CSV_COLUMNS, &csv_rows));
    }
    Ok(result)
}

fn entry_value(id: &CampaignId, window: Option<&CpcWindow>) -> Value {
    match window {
        Some(w) => json!({
            "campaign_id": id,
            "cpc_econ": metrics::round1(w.cpc_econ),
            "cpc_econ_min": metrics::round1(w.cpc_econ_min),
            "cpc_econ_max": metrics::round1(w.cpc_econ_max),
        }),
        // Degenerate period sums: revenue, units or clicks at zero.
        None => json!({
            "campaign_id": id,
            "cpc_econ": Value::Null,
            "cpc_econ_min": Value::Null,
            "cpc_econ_max": Value::Null,
        }),
    }
}

fn csv_row(id: &CampaignId, window: Option<&CpcWindow>) -> Vec<String> {
    match window {
        Some(w) => vec![
            id.as_str().to_owned(),
            format!("{:.1}", metrics::round1(w.cpc_econ)),
            format!("{:.1}", metrics::round1(w.cpc_econ_min)),
            format!("{:.1}", metrics::round1(w.cpc_econ_max)),
        ],
        None => vec![
            id.as_str().to_owned(),
            String::new(),
            String::new(),
            String::new(),
        ],
    }
}
