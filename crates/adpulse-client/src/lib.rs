//! HTTP clients for the adpulse upstreams.
//!
//! Implements the `adpulse-core` source traits over blocking HTTP:
//! - Performance (ads) API: token auth, campaign directory, product lists,
//!   day statistics, bid updates
//! - Seller analytics API: header auth, paginated sku/day sales
//!
//! Shared plumbing: retrying transport, quota throttling, TTL caches.

pub mod cache;
pub mod payload;
pub mod perf;
pub mod retry;
pub mod seller;
pub mod throttle;
pub mod token;
pub mod transport;

pub use cache::{CacheMode, TtlCache};
pub use perf::{PerfClient, PerfConfig, DEFAULT_PERF_BASE};
pub use retry::{Backoff, RetryConfig};
pub use seller::{SellerClient, SellerConfig, DEFAULT_SELLER_BASE};
pub use throttle::{BackoffPolicy, ThrottlingQueue};
pub use token::TokenCache;
pub use transport::{HttpBody, HttpMethod, HttpRequest, HttpResponse, Transport};
