//! Append-only ledger of sku bid changes.
//!
//! Every bid applied through the ads API leaves a row here, so a spend
//! anomaly can always be traced back to who changed what and why. The file
//! is `;`-delimited CSV with a fixed header, created on first append.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::money;
use crate::domain::{CampaignId, Sku};
use crate::error::CoreError;
use crate::source::AdsSource;

pub const LEDGER_COLUMNS: [&str; 8] = [
    "ts_iso",
    "date",
    "campaign_id",
    "sku",
    "old_bid_micro",
    "new_bid_micro",
    "reason",
    "comment",
];

/// One recorded bid change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidChange {
    pub ts_iso: String,
    pub date: String,
    pub campaign_id: CampaignId,
    pub sku: Sku,
    pub old_bid_micro: Option<i64>,
    pub new_bid_micro: i64,
    pub reason: String,
    pub comment: String,
}

/// File-backed bid-change ledger.
#[derive(Debug, Clone)]
pub struct BidLedger {
    path: PathBuf,
}

impl BidLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one change, writing the header first if the file is new.
    pub fn append(&self, change: &BidChange) -> Result<(), CoreError> {
        let new_file = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if new_file {
            writeln!(file, "{}", LEDGER_COLUMNS.join(";"))?;
        }

        let fields = [
            quote(&change.ts_iso),
            quote(&change.date),
            quote(change.campaign_id.as_str()),
            quote(change.sku.as_str()),
            change
                .old_bid_micro
                .map(|v| v.to_string())
                .unwrap_or_default(),
            change.new_bid_micro.to_string(),
            quote(&change.reason),
            quote(&change.comment),
        ];
        writeln!(file, "{}", fields.join(";"))?;
        Ok(())
    }

    /// Loads every recorded change, oldest first. A missing file is an
    /// empty ledger.
    pub fn load(&self) -> Result<Vec<BidChange>, CoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut changes = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if index == 0 || line.trim().is_empty() {
                continue;
            }

            let fields = split_row(&line);
            if fields.len() != LEDGER_COLUMNS.len() {
                return Err(CoreError::MalformedLedgerRow {
                    line: index + 1,
                    reason: format!(
                        "expected {} fields, found {}",
                        LEDGER_COLUMNS.len(),
                        fields.len()
                    ),
                });
            }

            let new_bid_micro = fields[5].parse::<i64>().map_err(|_| {
                CoreError::MalformedLedgerRow {
                    line: index + 1,
                    reason: format!("new_bid_micro is not an integer: '{}'", fields[5]),
                }
            })?;

            changes.push(BidChange {
                ts_iso: fields[0].clone(),
                date: fields[1].clone(),
                campaign_id: CampaignId::new(fields[2].clone()),
                sku: Sku::new(fields[3].clone()),
                old_bid_micro: if fields[4].is_empty() {
                    None
                } else {
                    fields[4].parse::<i64>().ok()
                },
                new_bid_micro,
                reason: fields[6].clone(),
                comment: fields[7].clone(),
            });
        }

        Ok(changes)
    }

    /// Most recent bid recorded for a (campaign, sku) pair.
    pub fn last_set_bid_micro(
        &self,
        campaign_id: &CampaignId,
        sku: &Sku,
    ) -> Result<Option<i64>, CoreError> {
        let changes = self.load()?;
        Ok(changes
            .into_iter()
            .rev()
            .find(|c| &c.campaign_id == campaign_id && &c.sku == sku)
            .map(|c| c.new_bid_micro))
    }
}

/// Outcome of a logged bid update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidApplyOutcome {
    pub campaign_id: CampaignId,
    pub sku: Sku,
    pub old_bid_micro: Option<i64>,
    pub new_bid_micro: i64,
}

/// Applies a bid through the ads API and records the change.
///
/// The previous bid is read from the campaign's product list before the
/// update. The ledger row is written only after the upstream accepted the
/// new bid.
pub fn apply_bid_logged(
    source: &dyn AdsSource,
    ledger: &BidLedger,
    campaign_id: &CampaignId,
    sku: &Sku,
    new_bid_major: f64,
    reason: &str,
    comment: &str,
) -> Result<BidApplyOutcome, CoreError> {
    let new_bid_micro = money::to_micro(new_bid_major);

    let old_bid_micro = source
        .campaign_products(campaign_id)?
        .into_iter()
        .find(|p| &p.sku == sku)
        .and_then(|p| p.bid_micro);

    source.apply_bid(campaign_id, sku, new_bid_micro)?;

    let now = OffsetDateTime::now_utc();
    let ts_iso = now
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"));
    let date = {
        let (year, month, day) = now.date().to_calendar_date();
        format!("{year:04}-{:02}-{day:02}", u8::from(month))
    };

    let change = BidChange {
        ts_iso,
        date,
        campaign_id: campaign_id.clone(),
        sku: sku.clone(),
        old_bid_micro,
        new_bid_micro,
        reason: reason.to_owned(),
        comment: comment.to_owned(),
    };
    ledger.append(&change)?;

    Ok(BidApplyOutcome {
        campaign_id: campaign_id.clone(),
        sku: sku.clone(),
        old_bid_micro,
        new_bid_micro,
    })
}

fn quote(field: &str) -> String {
    if field.contains(';') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

/// Splits one `;`-delimited row, honoring double-quoted fields.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ';' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
