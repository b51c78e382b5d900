//! Configuration management for the dashboard

use crate::error::{DashboardError, Result};
use worker::Env;

/// Largest lot size accepted; quantities are lot multiples up to 20 lots
pub const MAX_LOT_SIZE: u32 = 100_000;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (production, staging, development)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// Analytics backend base URL
    pub api_base_url: String,

    /// Form defaults
    pub default_symbol: String,         // Strike performance / monthly volatility
    pub default_leg_symbol: String,     // Custom strategy legs
    pub default_strike: f64,
    pub strike_step: f64,               // +/- buttons on a leg row
    pub lot_size: u32,                  // Quantity of one lot

    /// Upper bound on months in a strike performance sweep
    pub max_sweep_months: u32,

    /// Session cookies
    pub session_max_age_seconds: u64,
    pub secure_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "production".to_string(),
            log_level: "info".to_string(),
            api_base_url: "http://localhost:8000".to_string(),
            default_symbol: "NSE:NIFTY50-INDEX".to_string(),
            default_leg_symbol: "NIFTY".to_string(),
            default_strike: 25600.0,
            strike_step: 100.0,
            lot_size: 75,
            max_sweep_months: 24,
            session_max_age_seconds: 86_400,
            secure_cookies: true,
        }
    }
}

impl Config {
    /// Load configuration from Cloudflare environment variables
    pub fn from_env(env: &Env) -> Result<Self> {
        let config = Self::from_lookup(|key| env.var(key).ok().map(|v| v.to_string()));
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),

            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),

            api_base_url: lookup("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),

            default_symbol: lookup("DEFAULT_SYMBOL").unwrap_or(defaults.default_symbol),

            default_leg_symbol: lookup("DEFAULT_LEG_SYMBOL").unwrap_or(defaults.default_leg_symbol),

            default_strike: parse_var(&lookup, "DEFAULT_STRIKE").unwrap_or(defaults.default_strike),

            strike_step: parse_var(&lookup, "STRIKE_STEP").unwrap_or(defaults.strike_step),

            lot_size: parse_var(&lookup, "LOT_SIZE").unwrap_or(defaults.lot_size),

            max_sweep_months: parse_var(&lookup, "MAX_SWEEP_MONTHS").unwrap_or(defaults.max_sweep_months),

            session_max_age_seconds: parse_var(&lookup, "SESSION_MAX_AGE_SECONDS")
                .unwrap_or(defaults.session_max_age_seconds),

            secure_cookies: lookup("SECURE_COOKIES")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.secure_cookies),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_ok = url::Url::parse(&self.api_base_url)
            .is_ok_and(|u| matches!(u.scheme(), "http" | "https"));
        if !base_ok {
            return Err(DashboardError::Config(format!(
                "API_BASE_URL is not a valid URL: {}",
                self.api_base_url
            )));
        }
        if self.lot_size == 0 {
            return Err(DashboardError::Config("lot_size must be positive".into()));
        }
        if self.lot_size > MAX_LOT_SIZE {
            return Err(DashboardError::Config(format!(
                "lot_size must not exceed {MAX_LOT_SIZE}"
            )));
        }
        if self.strike_step <= 0.0 {
            return Err(DashboardError::Config("strike_step must be positive".into()));
        }
        if self.max_sweep_months == 0 {
            return Err(DashboardError::Config("max_sweep_months must be at least 1".into()));
        }
        Ok(())
    }

    /// Whether debug-level log lines should be emitted
    pub fn is_debug(&self) -> bool {
        self.log_level.eq_ignore_ascii_case("debug")
    }
}

/// Parse a numeric variable, ignoring values that do not parse
fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.default_symbol, "NSE:NIFTY50-INDEX");
        assert_eq!(config.lot_size, 75);
        assert!(config.secure_cookies);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_BASE_URL", "https://analytics.example.com/"),
            ("LOT_SIZE", "50"),
            ("STRIKE_STEP", "not-a-number"),
            ("SECURE_COOKIES", "FALSE"),
            ("LOG_LEVEL", "DEBUG"),
        ]));

        assert_eq!(config.api_base_url, "https://analytics.example.com");
        assert_eq!(config.lot_size, 50);
        assert!((config.strike_step - 100.0).abs() < f64::EPSILON);
        assert!(!config.secure_cookies);
        assert!(config.is_debug());
    }

    #[test]
    fn test_config_validation() {
        let config = Config::from_lookup(lookup_from(&[("API_BASE_URL", "not a url")]));
        assert!(config.validate().is_err());

        let config = Config::from_lookup(lookup_from(&[("API_BASE_URL", "ftp://files.example.com")]));
        assert!(config.validate().is_err());

        let config = Config { lot_size: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { lot_size: MAX_LOT_SIZE, ..Config::default() };
        assert!(config.validate().is_ok());

        let config = Config::from_lookup(lookup_from(&[("LOT_SIZE", "4000000000")]));
        assert!(config.validate().is_err());

        let config = Config { max_sweep_months: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }
}
