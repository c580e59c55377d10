use std::fmt::{Display, Formatter};

use crate::domain::{AdsStatRecord, Campaign, CampaignId, CampaignProduct, Period, RawSalesRow, Sku};

/// Upstream-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Configuration,
    Transport,
    RateLimited,
    InvalidRequest,
    Upstream,
    Internal,
}

/// Structured error returned by source implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Configuration,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transport,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    /// Upstream answered but the answer is unusable (non-2xx, bad payload).
    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Upstream,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Configuration => "source.configuration",
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Upstream => "source.upstream",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Advertising API contract.
pub trait AdsSource {
    /// Full campaign directory, all lifecycle states.
    fn campaigns(&self) -> Result<Vec<Campaign>, SourceError>;

    /// Products attached to one campaign.
    fn campaign_products(&self, id: &CampaignId) -> Result<Vec<CampaignProduct>, SourceError>;

    /// Per-campaign statistics over an inclusive date range. Campaigns the
    /// upstream has nothing for may be absent from the result.
    fn stats(
        &self,
        period: &Period,
        campaign_ids: &[CampaignId],
    ) -> Result<Vec<AdsStatRecord>, SourceError>;

    /// Sets the sku bid (micro-units) within a campaign.
    fn apply_bid(&self, id: &CampaignId, sku: &Sku, bid_micro: i64) -> Result<(), SourceError>;
}

/// Seller analytics API contract.
pub trait SellerSource {
    /// One page of sku/day sales rows for the period. A short or empty page
    /// signals the end of the feed.
    fn sales_page(
        &self,
        period: &Period,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<RawSalesRow>, SourceError>;
}

/// Running campaigns, sorted by title (case-insensitive) for stable output.
pub fn running_campaigns(source: &dyn AdsSource) -> Result<Vec<Campaign>, SourceError> {
    let mut campaigns: Vec<Campaign> = source
        .campaigns()?
        .into_iter()
        .filter(|c| c.state.is_running())
        .collect();
    campaigns.sort_by_key(|c| c.title.to_lowercase());
    Ok(campaigns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CampaignState;

    struct DirectoryOnly(Vec<Campaign>);

    impl AdsSource for DirectoryOnly {
        fn campaigns(&self) -> Result<Vec<Campaign>, SourceError> {
            Ok(self.0.clone())
        }

        fn campaign_products(
            &self,
            _id: &CampaignId,
        ) -> Result<Vec<CampaignProduct>, SourceError> {
            Ok(Vec::new())
        }

        fn stats(
            &self,
            _period: &Period,
            _campaign_ids: &[CampaignId],
        ) -> Result<Vec<AdsStatRecord>, SourceError> {
            Ok(Vec::new())
        }

        fn apply_bid(
            &self,
            _id: &CampaignId,
            _sku: &Sku,
            _bid_micro: i64,
        ) -> Result<(), SourceError> {
            Ok(())
        }
    }

    fn campaign(id: &str, title: &str, state: CampaignState) -> Campaign {
        Campaign {
            id: CampaignId::new(id),
            title: title.to_owned(),
            state,
        }
    }

    #[test]
    fn running_campaigns_filters_and_sorts() {
        let source = DirectoryOnly(vec![
            campaign("3", "zeta", CampaignState::Running),
            campaign("1", "Alpha", CampaignState::Running),
            campaign("2", "beta", CampaignState::Stopped),
            campaign("4", "Archived", CampaignState::Archived),
        ]);

        let running = running_campaigns(&source).expect("must list");
        let titles: Vec<&str> = running.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "zeta"]);
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::rate_limited("slow down").code(), "source.rate_limited");
        assert!(SourceError::rate_limited("slow down").retryable());
        assert!(!SourceError::configuration("no key").retryable());
        assert!(SourceError::transport("timeout").retryable());
    }
}
