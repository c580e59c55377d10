mod bid;
mod campaign;
mod daily;
mod econ;
mod report;

use adpulse_client::{CacheMode, PerfClient, PerfConfig, SellerClient, SellerConfig};
use adpulse_core::{Day, Period, ValidationError};
use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::cli::{Cli, Command};
use crate::config::{PerfCredentials, SellerCredentials};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    /// Pre-rendered `;`-delimited form, when the command has one.
    pub csv: Option<String>,
}

impl CommandResult {
    pub fn new(data: Value) -> Self {
        Self { data, csv: None }
    }

    pub fn with_csv(mut self, csv: String) -> Self {
        self.csv = Some(csv);
        self
    }
}

pub fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Report(args) => report::run(cli, args),
        Command::Daily => daily::run(cli),
        Command::Campaign(args) => campaign::run(cli, args),
        Command::Econ(args) => econ::run(cli, args),
        Command::Bid(args) => bid::run(cli, args),
    }
}

/// Reporting window: explicit bounds, or the last seven full days ending
/// yesterday (UTC).
pub(crate) fn resolve_period(cli: &Cli) -> Result<Period, CliError> {
    let today = OffsetDateTime::now_utc().date();
    let yesterday = Day::from_date(today.previous_day().unwrap_or(today));

    let to = match &cli.to {
        Some(raw) => Day::parse(raw)?,
        None => yesterday,
    };
    let from = match &cli.from {
        Some(raw) => Day::parse(raw)?,
        None => Day::from_date(to.into_date() - Duration::days(6)),
    };

    Period::new(from, to).map_err(CliError::from)
}

/// Converts a percent flag into a 0..=1 share.
pub(crate) fn share_from_percent(value: f64, flag: &str) -> Result<f64, CliError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(CliError::Command(format!(
            "{flag} must be a percentage in 0..=100, got {value}"
        )));
    }
    Ok(value / 100.0)
}

pub(crate) fn batch_size(cli: &Cli) -> Result<usize, CliError> {
    if cli.batch_size == 0 {
        return Err(CliError::Command(String::from(
            "--batch-size must be greater than zero",
        )));
    }
    Ok(cli.batch_size)
}

pub(crate) fn campaign_id(raw: &str) -> Result<adpulse_core::CampaignId, CliError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyCampaignId.into());
    }
    Ok(adpulse_core::CampaignId::new(raw))
}

pub(crate) fn ads_client(cli: &Cli, creds: &PerfCredentials) -> PerfClient {
    let config = PerfConfig::new(creds.client_id.as_str(), creds.client_secret.as_str());
    let mode = if cli.refresh {
        CacheMode::Refresh
    } else {
        CacheMode::Use
    };
    PerfClient::new(config).with_cache_mode(mode)
}

pub(crate) fn seller_client(creds: &SellerCredentials) -> SellerClient {
    SellerClient::new(SellerConfig::new(
        creds.client_id.as_str(),
        creds.api_key.as_str(),
    ))
}
