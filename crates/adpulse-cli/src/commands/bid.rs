use adpulse_core::domain::money::from_micro;
use adpulse_core::{apply_bid_logged, BidLedger, Sku, ValidationError};
use serde_json::json;
use tracing::info;

use crate::cli::{BidArgs, Cli};
use crate::config::PerfCredentials;
use crate::error::CliError;

use super::CommandResult;

pub fn run(cli: &Cli, args: &BidArgs) -> Result<CommandResult, CliError> {
    let id = super::campaign_id(&args.campaign_id)?;
    if args.sku.trim().is_empty() {
        return Err(ValidationError::EmptySku.into());
    }
    let sku = Sku::new(args.sku.as_str());
    if !args.bid.is_finite() || args.bid <= 0.0 {
        return Err(ValidationError::InvalidBid {
            value: args.bid.to_string(),
        }
        .into());
    }

    let creds = PerfCredentials::from_env(cli.company.as_deref())?;
    let ads = super::ads_client(cli, &creds);
    let ledger = BidLedger::new(&args.ledger);

    let outcome = apply_bid_logged(
        &ads,
        &ledger,
        &id,
        &sku,
        args.bid,
        &args.reason,
        &args.comment,
    )?;
    info!(
        campaign = %outcome.campaign_id,
        sku = %outcome.sku,
        new_bid_micro = outcome.new_bid_micro,
        "bid applied and recorded"
    );

    let data = json!({
        "campaign_id": outcome.campaign_id,
        "sku": outcome.sku,
        "old_bid": outcome.old_bid_micro.map(from_micro),
        "new_bid": from_micro(outcome.new_bid_micro),
        "ledger": args.ledger,
    });

    Ok(CommandResult::new(data))
}
