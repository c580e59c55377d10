//! Credential resolution from the environment.
//!
//! Each upstream account is a set of `ADPULSE_*` variables. `--company`
//! selects a named set (`ADPULSE_<COMPANY>_*`); a name missing from the
//! company set falls back to the plain one, so shared credentials need not
//! be repeated per company.

use crate::error::CliError;

pub const PERF_CLIENT_ID: &str = "PERF_CLIENT_ID";
pub const PERF_CLIENT_SECRET: &str = "PERF_CLIENT_SECRET";
pub const SELLER_CLIENT_ID: &str = "SELLER_CLIENT_ID";
pub const SELLER_API_KEY: &str = "SELLER_API_KEY";

/// Ads performance API credentials.
#[derive(Debug, Clone)]
pub struct PerfCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Seller analytics API credentials.
#[derive(Debug, Clone)]
pub struct SellerCredentials {
    pub client_id: String,
    pub api_key: String,
}

/// Full credential set for commands that join both upstreams.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub perf: PerfCredentials,
    pub seller: SellerCredentials,
}

impl PerfCredentials {
    pub fn from_env(company: Option<&str>) -> Result<Self, CliError> {
        Ok(Self {
            client_id: require(company, PERF_CLIENT_ID)?,
            client_secret: require(company, PERF_CLIENT_SECRET)?,
        })
    }
}

impl SellerCredentials {
    pub fn from_env(company: Option<&str>) -> Result<Self, CliError> {
        Ok(Self {
            client_id: require(company, SELLER_CLIENT_ID)?,
            api_key: require(company, SELLER_API_KEY)?,
        })
    }
}

impl Credentials {
    pub fn from_env(company: Option<&str>) -> Result<Self, CliError> {
        Ok(Self {
            perf: PerfCredentials::from_env(company)?,
            seller: SellerCredentials::from_env(company)?,
        })
    }
}

/// Environment variable name for one credential field.
pub fn var_name(company: Option<&str>, suffix: &str) -> String {
    match company {
        Some(name) => {
            let tag: String = name
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() {
                        c.to_ascii_uppercase()
                    } else {
                        '_'
                    }
                })
                .collect();
            format!("ADPULSE_{tag}_{suffix}")
        }
        None => format!("ADPULSE_{suffix}"),
    }
}

fn lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn require(company: Option<&str>, suffix: &str) -> Result<String, CliError> {
    let name = var_name(company, suffix);
    if let Some(value) = lookup(&name) {
        return Ok(value);
    }
    if company.is_some() {
        if let Some(value) = lookup(&var_name(None, suffix)) {
            return Ok(value);
        }
    }
    Err(CliError::Configuration(format!(
        "environment variable {name} is not set"
    )))
}
