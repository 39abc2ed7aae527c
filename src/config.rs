//! Environment-driven settings.
//!
//! The storefront ships with two behaviors that are a matter of policy
//! rather than correctness: whether tax is rounded to cents before being
//! added to the subtotal, and whether name search matches case-sensitively.
//! Both are named policies selected here, with the shipped behavior as the
//! default, so neither is baked in as "the" behavior.

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub const DEFAULT_TAX_RATE: f64 = 0.0825;
pub const DEFAULT_DATA_DIR: &str = ".freshbites";

/// How `subtotal * rate` becomes the tax line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxPolicy {
    /// Round to 2 decimal places before adding to the subtotal.
    Rounded,
    /// Keep full floating precision.
    Unrounded,
}

impl FromStr for TaxPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rounded" => Ok(Self::Rounded),
            "unrounded" => Ok(Self::Unrounded),
            other => Err(format!("unknown tax policy: {other}")),
        }
    }
}

/// How a search term matches against entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePolicy {
    Sensitive,
    Insensitive,
}

impl FromStr for CasePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sensitive" => Ok(Self::Sensitive),
            "insensitive" => Ok(Self::Insensitive),
            other => Err(format!("unknown case policy: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tax_rate: f64,
    pub tax_policy: TaxPolicy,
    pub search_case: CasePolicy,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            tax_rate: try_load("FRESHBITES_TAX_RATE", "0.0825"),
            tax_policy: try_load("FRESHBITES_TAX_POLICY", "rounded"),
            search_case: try_load("FRESHBITES_SEARCH_CASE", "sensitive"),
            data_dir: try_load("FRESHBITES_DATA_DIR", DEFAULT_DATA_DIR),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            tax_policy: TaxPolicy::Rounded,
            search_case: CasePolicy::Sensitive,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value: {e}, using default: {default}");
        default
            .parse()
            .map_err(|_| ())
            .expect("default misconfigured")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("rounded".parse::<TaxPolicy>().unwrap(), TaxPolicy::Rounded);
        assert_eq!(
            "unrounded".parse::<TaxPolicy>().unwrap(),
            TaxPolicy::Unrounded
        );
        assert!("round".parse::<TaxPolicy>().is_err());

        assert_eq!(
            "sensitive".parse::<CasePolicy>().unwrap(),
            CasePolicy::Sensitive
        );
        assert_eq!(
            "insensitive".parse::<CasePolicy>().unwrap(),
            CasePolicy::Insensitive
        );
        assert!("".parse::<CasePolicy>().is_err());
    }

    #[test]
    fn test_shipped_defaults() {
        let config = Config::default();

        assert_eq!(config.tax_rate, DEFAULT_TAX_RATE);
        assert_eq!(config.tax_policy, TaxPolicy::Rounded);
        assert_eq!(config.search_case, CasePolicy::Sensitive);
    }
}
