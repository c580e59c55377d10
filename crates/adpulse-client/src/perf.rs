//! Performance (ads) API client.

use adpulse_core::{
    AdsSource, AdsStatRecord, Campaign, CampaignId, CampaignProduct, CampaignState, Period, Sku,
    SourceError, SourceErrorKind,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::cache::{CacheMode, TtlCache};
use crate::payload;
use crate::retry::RetryConfig;
use crate::token::TokenCache;
use crate::transport::{HttpRequest, Transport};

pub const DEFAULT_PERF_BASE: &str = "https://api-performance.ozon.ru";

const PRODUCTS_PAGE_SIZE: usize = 100;

/// Credentials and endpoint for one ads account.
#[derive(Debug, Clone)]
pub struct PerfConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl PerfConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            base_url: String::from(DEFAULT_PERF_BASE),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Blocking ads API client with token caching and product-list memoization.
pub struct PerfClient {
    config: PerfConfig,
    transport: Transport,
    tokens: TokenCache,
    products: TtlCache<Vec<CampaignProduct>>,
    cache_mode: CacheMode,
}

impl PerfClient {
    pub fn new(config: PerfConfig) -> Self {
        Self::with_transport(config, Transport::new(RetryConfig::default()))
    }

    pub fn with_transport(config: PerfConfig, transport: Transport) -> Self {
        Self {
            config,
            transport,
            tokens: TokenCache::new(),
            products: TtlCache::with_default_ttl(),
            cache_mode: CacheMode::Use,
        }
    }

    /// Overrides cache behavior for product lists (`--refresh` support).
    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    fn bearer(&self) -> Result<String, SourceError> {
        self.tokens.bearer(
            &self.transport,
            &self.config.base_url,
            &self.config.client_id,
            &self.config.client_secret,
        )
    }

    /// Runs an authorized call, retrying once with a fresh token when the
    /// upstream rejects the cached one.
    fn with_fresh_token_retry<T>(
        &self,
        call: impl Fn(&str) -> Result<T, SourceError>,
    ) -> Result<T, SourceError> {
        let token = self.bearer()?;
        match call(&token) {
            Err(err) if token_rejected(&err) => {
                debug!("authorized call rejected, refreshing token");
                self.tokens.invalidate_all();
                let token = self.bearer()?;
                call(&token)
            }
            other => other,
        }
    }

    fn get_json(&self, request: HttpRequest) -> Result<Value, SourceError> {
        let response = self.transport.execute(&request)?;
        serde_json::from_str(&response.body)
            .map_err(|e| SourceError::upstream(format!("response is not valid JSON: {e}")))
    }

    fn products_page(
        &self,
        token: &str,
        id: &CampaignId,
        page: usize,
    ) -> Result<Vec<CampaignProduct>, SourceError> {
        let request = HttpRequest::get(format!(
            "{}/api/client/campaign/{}/v2/products",
            self.config.base_url, id
        ))
        .with_bearer(token)
        .with_header("accept", "application/json")
        .with_query("page", page.to_string())
        .with_query("pageSize", PRODUCTS_PAGE_SIZE.to_string());

        let body = self.get_json(request)?;
        // The endpoint has shipped the item list under three names so far.
        let items = ["products", "list", "items"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_array).cloned())
            .unwrap_or_default();

        Ok(items
            .iter()
            .filter_map(|item| {
                let sku = payload::text(item.get("sku"));
                if sku.is_empty() {
                    return None;
                }
                Some(CampaignProduct {
                    sku: Sku::new(sku),
                    title: payload::text(item.get("title")),
                    bid_micro: payload::int_opt(item.get("bid")),
                })
            })
            .collect())
    }

    fn fetch_all_products(&self, id: &CampaignId) -> Result<Vec<CampaignProduct>, SourceError> {
        let all = self.with_fresh_token_retry(|token| {
            let mut all = Vec::new();
            let mut page = 1;

            loop {
                let items = self.products_page(token, id, page)?;
                let page_len = items.len();
                all.extend(items);
                if page_len < PRODUCTS_PAGE_SIZE {
                    break;
                }
                page += 1;
            }
            Ok(all)
        })?;

        debug!(campaign = %id, products = all.len(), "fetched campaign products");
        Ok(all)
    }
}

/// A cached token the upstream no longer accepts comes back as an auth
/// failure; anything else is not the token's fault.
fn token_rejected(err: &SourceError) -> bool {
    err.kind() == SourceErrorKind::Configuration
}

fn campaign_state(raw: &str) -> CampaignState {
    match raw {
        "CAMPAIGN_STATE_RUNNING" => CampaignState::Running,
        "CAMPAIGN_STATE_STOPPED" | "CAMPAIGN_STATE_INACTIVE" => CampaignState::Stopped,
        "CAMPAIGN_STATE_ARCHIVED" => CampaignState::Archived,
        "CAMPAIGN_STATE_PLANNED" | "CAMPAIGN_STATE_DRAFT" => CampaignState::Draft,
        _ => CampaignState::Other,
    }
}

impl AdsSource for PerfClient {
    fn campaigns(&self) -> Result<Vec<Campaign>, SourceError> {
        let body = self.with_fresh_token_retry(|token| {
            let request =
                HttpRequest::get(format!("{}/api/client/campaign", self.config.base_url))
                    .with_bearer(token)
                    .with_header("accept", "application/json")
                    .with_query("advObjectType", "SKU");
            self.get_json(request)
        })?;
        let list = body
            .get("list")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(list
            .iter()
            .filter_map(|item| {
                let id = payload::text(item.get("id"));
                if id.is_empty() {
                    return None;
                }
                Some(Campaign {
                    id: CampaignId::new(id),
                    title: payload::text(item.get("title")),
                    state: campaign_state(&payload::text(item.get("state"))),
                })
            })
            .collect())
    }

    fn campaign_products(&self, id: &CampaignId) -> Result<Vec<CampaignProduct>, SourceError> {
        let key = format!("products\u{1f}{}\u{1f}{}", self.config.client_id, id);
        self.products
            .get_or_fetch(&key, self.cache_mode, || self.fetch_all_products(id))
    }

    fn stats(
        &self,
        period: &Period,
        campaign_ids: &[CampaignId],
    ) -> Result<Vec<AdsStatRecord>, SourceError> {
        if campaign_ids.is_empty() {
            return Ok(Vec::new());
        }

        let body = self.with_fresh_token_retry(|token| {
            let mut request = HttpRequest::get(format!(
                "{}/api/client/statistics/campaign/product/json",
                self.config.base_url
            ))
            .with_bearer(token)
            .with_header("accept", "application/json")
            .with_query("dateFrom", period.from_day().format_iso())
            .with_query("dateTo", period.to_day().format_iso())
            .with_timeout_ms(60_000);
            for id in campaign_ids {
                request = request.with_query("campaignIds", id.as_str());
            }
            self.get_json(request)
        })?;
        let rows = body
            .get("rows")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(rows
            .iter()
            .filter_map(|row| {
                let id = payload::text(row.get("id"));
                if id.is_empty() {
                    return None;
                }
                Some(AdsStatRecord {
                    campaign_id: CampaignId::new(id),
                    spend: payload::num(row.get("moneySpent")),
                    views: payload::count(row.get("views")),
                    clicks: payload::count(row.get("clicks")),
                    orders: payload::count(row.get("orders")),
                    orders_money: payload::num(row.get("ordersMoney")),
                    click_price: payload::num(row.get("clickPrice")),
                })
            })
            .collect())
    }

    fn apply_bid(&self, id: &CampaignId, sku: &Sku, bid_micro: i64) -> Result<(), SourceError> {
        self.with_fresh_token_retry(|token| {
            let request = HttpRequest::put(format!(
                "{}/api/client/campaign/{}/products",
                self.config.base_url, id
            ))
            .with_bearer(token)
            .with_header("accept", "application/json")
            .with_json(json!({
                "bids": [{
                    "sku": sku.as_str(),
                    "bid": bid_micro.to_string(),
                }]
            }));

            self.transport.execute(&request).map(|_| ())
        })?;
        // The product list now carries a stale bid.
        let key = format!("products\u{1f}{}\u{1f}{}", self.config.client_id, id);
        self.products.invalidate(&key);
        Ok(())
    }
}
