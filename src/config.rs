//! Runtime settings read from the environment
//!
//! Recognised variables:
//!   OPTIMUM_SHARE_TABLE, OPTIMUM_SHARE_CEILINGS, OPTIMUM_SHARE_CREDENTIALS,
//!   OPTIMUM_SHARE_OPEX_LOADING

use crate::auth::{Authenticator, CredentialStore, OpenAccess};
use crate::calculator::{CostLoadings, DEFAULT_OPEX_LOADING_PCT};
use crate::error::CalcResult;
use crate::exposure::loader::{DEFAULT_CEILINGS_PATH, DEFAULT_TABLE_PATH};
use log::warn;
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_TABLE: &str = "OPTIMUM_SHARE_TABLE";
pub const ENV_CEILINGS: &str = "OPTIMUM_SHARE_CEILINGS";
pub const ENV_CREDENTIALS: &str = "OPTIMUM_SHARE_CREDENTIALS";
pub const ENV_OPEX_LOADING: &str = "OPTIMUM_SHARE_OPEX_LOADING";

/// Where reference data lives and which loadings apply
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Net loss ratio table CSV
    pub table_path: PathBuf,

    /// Ceiling mapping CSV; `None` uses the built-in bands
    pub ceilings_path: Option<PathBuf>,

    /// Credential digest CSV; `None` leaves the calculator ungated
    pub credentials_path: Option<PathBuf>,

    /// Operating-expense loading in percentage points
    pub opex_loading_pct: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            ceilings_path: Path::new(DEFAULT_CEILINGS_PATH)
                .exists()
                .then(|| PathBuf::from(DEFAULT_CEILINGS_PATH)),
            credentials_path: None,
            opex_loading_pct: DEFAULT_OPEX_LOADING_PCT,
        }
    }
}

impl Settings {
    /// Read settings from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let opex_loading_pct = match non_empty(ENV_OPEX_LOADING) {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => v,
                _ => {
                    warn!("ignoring invalid {}={:?}", ENV_OPEX_LOADING, raw);
                    defaults.opex_loading_pct
                }
            },
            None => defaults.opex_loading_pct,
        };

        Self {
            table_path: non_empty(ENV_TABLE)
                .map(PathBuf::from)
                .unwrap_or(defaults.table_path),
            ceilings_path: non_empty(ENV_CEILINGS)
                .map(PathBuf::from)
                .or(defaults.ceilings_path),
            credentials_path: non_empty(ENV_CREDENTIALS).map(PathBuf::from),
            opex_loading_pct,
        }
    }

    pub fn loadings(&self) -> CostLoadings {
        CostLoadings::new(self.opex_loading_pct)
    }

    /// Authentication gate for these settings
    pub fn authenticator(&self) -> CalcResult<Box<dyn Authenticator>> {
        match &self.credentials_path {
            Some(path) => Ok(Box::new(CredentialStore::load(path)?)),
            None => Ok(Box::new(OpenAccess)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let settings = Settings::from_lookup(lookup_from(&[]));
        assert_eq!(settings.table_path, PathBuf::from(DEFAULT_TABLE_PATH));
        assert_eq!(settings.opex_loading_pct, DEFAULT_OPEX_LOADING_PCT);
        assert!(settings.credentials_path.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_TABLE, "/srv/nlr.csv"),
            (ENV_CEILINGS, "/srv/ceilings.csv"),
            (ENV_CREDENTIALS, "/srv/users.csv"),
            (ENV_OPEX_LOADING, "12.5"),
        ]));
        assert_eq!(settings.table_path, PathBuf::from("/srv/nlr.csv"));
        assert_eq!(settings.ceilings_path, Some(PathBuf::from("/srv/ceilings.csv")));
        assert_eq!(settings.credentials_path, Some(PathBuf::from("/srv/users.csv")));
        assert_eq!(settings.loadings().opex_loading_pct, 12.5);
    }

    #[test]
    fn test_invalid_opex_loading_falls_back() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_OPEX_LOADING, "fifteen")]));
        assert_eq!(settings.opex_loading_pct, DEFAULT_OPEX_LOADING_PCT);

        let negative = Settings::from_lookup(lookup_from(&[(ENV_OPEX_LOADING, "-3")]));
        assert_eq!(negative.opex_loading_pct, DEFAULT_OPEX_LOADING_PCT);
    }

    #[test]
    fn test_open_access_without_credentials() {
        let settings = Settings::from_lookup(lookup_from(&[]));
        let auth = settings.authenticator().unwrap();
        assert!(auth.authorize("anyone", "anything"));
    }
}
