//! Seller analytics API client.

use std::thread;
use std::time::Duration;

use adpulse_core::{Day, Period, RawSalesRow, SellerSource, Sku, SourceError};
use serde_json::{json, Value};
use tracing::debug;

use crate::payload;
use crate::retry::RetryConfig;
use crate::throttle::{BackoffPolicy, ThrottlingQueue};
use crate::transport::{HttpRequest, Transport};

pub const DEFAULT_SELLER_BASE: &str = "https://api-seller.ozon.ru";

/// Credentials and endpoint for one seller account.
#[derive(Debug, Clone)]
pub struct SellerConfig {
    pub base_url: String,
    pub client_id: String,
    pub api_key: String,
}

impl SellerConfig {
    pub fn new(client_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: String::from(DEFAULT_SELLER_BASE),
            client_id: client_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Blocking seller API client. The analytics endpoint is aggressively rate
/// limited upstream, so every call goes through a local throttling queue
/// before it ever reaches the retry layer.
pub struct SellerClient {
    config: SellerConfig,
    transport: Transport,
    throttle: ThrottlingQueue,
}

impl SellerClient {
    pub fn new(config: SellerConfig) -> Self {
        Self::with_transport(config, Transport::new(RetryConfig::default()))
    }

    pub fn with_transport(config: SellerConfig, transport: Transport) -> Self {
        Self {
            config,
            transport,
            // Documented analytics budget is roughly one request per second.
            throttle: ThrottlingQueue::new(Duration::from_secs(60), 60, BackoffPolicy::default()),
        }
    }

    fn wait_for_budget(&self) {
        let mut delay = match self.throttle.acquire() {
            Ok(()) => return,
            Err(delay) => delay,
        };
        loop {
            debug!(?delay, "seller quota exhausted, waiting");
            thread::sleep(delay);
            if self.throttle.reacquire() {
                return;
            }
            match self.throttle.register_retry() {
                Some(next) => delay = next,
                None => {
                    // Local retry budget spent; the upstream limiter is the
                    // backstop from here.
                    self.throttle.complete_one();
                    return;
                }
            }
        }
    }
}

impl SellerSource for SellerClient {
    fn sales_page(
        &self,
        period: &Period,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<RawSalesRow>, SourceError> {
        self.wait_for_budget();

        let request = HttpRequest::post(format!("{}/v1/analytics/data", self.config.base_url))
            .with_header("client-id", self.config.client_id.clone())
            .with_header("api-key", self.config.api_key.clone())
            .with_timeout_ms(60_000)
            .with_json(json!({
                "date_from": period.from_day().format_iso(),
                "date_to": period.to_day().format_iso(),
                "dimension": ["sku", "day"],
                "metrics": ["revenue", "ordered_units"],
                "limit": limit,
                "offset": offset,
            }));

        let response = self.transport.execute(&request)?;
        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::upstream(format!("response is not valid JSON: {e}")))?;

        let data = body
            .get("result")
            .and_then(|r| r.get("data"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(data.iter().map(raw_sales_row).collect())
    }
}

fn raw_sales_row(row: &Value) -> RawSalesRow {
    let dims = row.get("dimensions").and_then(Value::as_array);
    let dim_id = |index: usize| {
        dims.and_then(|d| d.get(index))
            .map(|d| payload::text(d.get("id")))
            .unwrap_or_default()
    };

    let sku = dim_id(0);
    let day = dim_id(1);
    let metrics = row.get("metrics").and_then(Value::as_array);

    RawSalesRow {
        sku: if sku.is_empty() { None } else { Some(Sku::new(sku)) },
        day: Day::parse(&day).ok(),
        revenue: payload::num(metrics.and_then(|m| m.get(0))),
        units: payload::count(metrics.and_then(|m| m.get(1))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sales_row_maps_dimensions_and_metrics() {
        let row = json!({
            "dimensions": [{"id": "100500"}, {"id": "2025-03-01"}],
            "metrics": [1500.5, 3],
        });
        let parsed = raw_sales_row(&row);
        assert_eq!(parsed.sku, Some(Sku::new("100500")));
        assert_eq!(
            parsed.day,
            Some(Day::parse("2025-03-01").expect("must parse"))
        );
        assert_eq!(parsed.revenue, 1500.5);
        assert_eq!(parsed.units, 3);
    }

    #[test]
    fn missing_dimensions_become_none() {
        let row = json!({
            "dimensions": [{"id": ""}],
            "metrics": ["1 234,5", null],
        });
        let parsed = raw_sales_row(&row);
        assert_eq!(parsed.sku, None);
        assert_eq!(parsed.day, None);
        assert_eq!(parsed.revenue, 1234.5);
        assert_eq!(parsed.units, 0);
    }

    #[test]
    fn unparsable_day_dimension_becomes_none() {
        let row = json!({
            "dimensions": [{"id": "100"}, {"id": "03/01/2025"}],
            "metrics": [10, 1],
        });
        let parsed = raw_sales_row(&row);
        assert_eq!(parsed.sku, Some(Sku::new("100")));
        assert_eq!(parsed.day, None);
    }
}
