//! CLI argument definitions for adpulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `report` | Period report per running campaign with a grand total |
//! | `daily` | Account-level daily breakdown with the organic share |
//! | `campaign` | Daily drill-down for one campaign, optionally by week |
//! | `econ` | Economically justified CPC window per running campaign |
//! | `bid` | Set a sku bid and record it in the audit ledger |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--company` | unset | Credential set selector for env lookup |
//! | `--from` / `--to` | last 7 full days | Reporting window, ISO days |
//! | `--target-drr` | `20` | Target ad-spend share of revenue, percent |
//! | `--batch-size` | `15` | Campaign ids per statistics request |
//! | `--page-limit` | `1000` | Rows per seller analytics page |
//! | `--refresh` | `false` | Bypass cached product lists |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Marketplace advertising and sales analytics.
///
/// Joins the ads performance API with seller analytics into campaign
/// reports, daily breakdowns and bid economics.
#[derive(Debug, Parser)]
#[command(
    name = "adpulse",
    author,
    version,
    about = "Marketplace advertising and sales analytics CLI"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Named credential set. `--company acme` reads `ADPULSE_ACME_*`
    /// environment variables; without it the plain `ADPULSE_*` names apply.
    #[arg(long, global = true)]
    pub company: Option<String>,

    /// First day of the reporting window (ISO `YYYY-MM-DD`).
    #[arg(long, global = true)]
    pub from: Option<String>,

    /// Last day of the reporting window, inclusive (ISO `YYYY-MM-DD`).
    #[arg(long, global = true)]
    pub to: Option<String>,

    /// Target ad-spend share of revenue, in percent.
    #[arg(long, global = true, default_value_t = 20.0)]
    pub target_drr: f64,

    /// Campaign ids per statistics request.
    #[arg(long, global = true, default_value_t = adpulse_core::DEFAULT_STATS_BATCH)]
    pub batch_size: usize,

    /// Rows per seller analytics page.
    #[arg(long, global = true, default_value_t = adpulse_core::DEFAULT_PAGE_LIMIT)]
    pub page_limit: usize,

    /// Refetch product lists instead of using the local cache.
    #[arg(long, global = true, default_value_t = false)]
    pub refresh: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// `;`-delimited CSV.
    Csv,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Period report: one row per running campaign plus a grand total.
    ///
    /// # Examples
    ///
    ///   adpulse report --from 2025-03-01 --to 2025-03-07
    ///   adpulse report --out report.csv
    Report(ReportArgs),

    /// Account-level daily breakdown across all running campaigns.
    ///
    /// Includes the organic (non-ads) share of each day's revenue.
    Daily,

    /// Daily drill-down for one campaign.
    ///
    /// # Examples
    ///
    ///   adpulse campaign 12345
    ///   adpulse campaign 12345 --weekly
    Campaign(CampaignArgs),

    /// Economically justified CPC window per campaign.
    ///
    /// Derived from period sums of revenue, units and clicks; a campaign
    /// with a degenerate period gets no window.
    Econ(EconArgs),

    /// Set a sku bid through the ads API and record it in the ledger.
    ///
    /// # Examples
    ///
    ///   adpulse bid 12345 100500 12.5 --reason "cpc above window"
    Bid(BidArgs),
}

/// Arguments for the `report` command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Also write the report as `;`-delimited CSV to this path.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the `campaign` command.
#[derive(Debug, Args)]
pub struct CampaignArgs {
    /// Campaign id to drill into.
    pub campaign_id: String,

    /// Roll daily rows up into ISO weeks (Monday start).
    #[arg(long, default_value_t = false)]
    pub weekly: bool,
}

/// Arguments for the `econ` command.
#[derive(Debug, Args)]
pub struct EconArgs {
    /// Campaign id to compute the window for; every running campaign
    /// when omitted.
    pub campaign_id: Option<String>,

    /// Absolute tolerance around the target DRR, in percent.
    #[arg(long, default_value_t = 5.0)]
    pub drr_tolerance: f64,
}

/// Arguments for the `bid` command.
#[derive(Debug, Args)]
pub struct BidArgs {
    /// Campaign the sku belongs to.
    pub campaign_id: String,

    /// Sku to change the bid for.
    pub sku: String,

    /// New bid in major currency units (e.g. 12.5).
    pub bid: f64,

    /// Why the bid changed.
    #[arg(long, default_value = "manual")]
    pub reason: String,

    /// Free-form note stored next to the reason.
    #[arg(long, default_value = "")]
    pub comment: String,

    /// Path of the bid-change ledger file.
    #[arg(long, default_value = "bid_changes.csv")]
    pub ledger: PathBuf,
}
