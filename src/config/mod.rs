/// Application configuration module
use crate::completeness::CompletenessPolicy;
use anyhow::{anyhow, bail};
use chrono::Duration;
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub planning_inputs: Vec<PathBuf>,
    pub catalog_inputs: Vec<PathBuf>,
    pub completeness: CompletenessPolicy,
    pub priorities: Priorities,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Priorities {
    /// Priority of the MISSING placeholders derived from planning
    pub planning_completeness: i32,
    /// Priority of everything derived from the catalog feed
    pub catalog: i32,
}

impl Default for Priorities {
    fn default() -> Self {
        Self {
            planning_completeness: 10,
            catalog: 30,
        }
    }
}

/// Upper bound of every configured offset, keeping timestamp arithmetic in range
fn max_offset() -> Duration {
    Duration::days(366)
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unparseable numbers fall back to their defaults; negative or
    /// out-of-range values are rejected
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let paths = |key: &str| -> Vec<PathBuf> {
            lookup(key)
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(PathBuf::from)
                        .collect()
                })
                .unwrap_or_default()
        };
        let number = |key: &str, default: i64| -> anyhow::Result<i64> {
            let value = lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default);
            if value < 0 {
                bail!("{} must not be negative, got {}", key, value);
            }
            Ok(value)
        };
        let seconds = |key: &str, default: i64| -> anyhow::Result<Duration> {
            let value = number(key, default)?;
            Duration::try_seconds(value)
                .filter(|d| *d <= max_offset())
                .ok_or_else(|| anyhow!("{} out of range: {}", key, value))
        };
        let priority = |key: &str, default: i32| -> anyhow::Result<i32> {
            let value = number(key, i64::from(default))?;
            i32::try_from(value).map_err(|_| anyhow!("{} out of range: {}", key, value))
        };

        let delay_hours = number("ALERT_NOTIFICATION_DELAY_HOURS", 24)?;
        let completeness = CompletenessPolicy {
            start_margin: seconds("COMPLETENESS_START_MARGIN_SECONDS", 10)?,
            stop_margin: seconds("COMPLETENESS_STOP_MARGIN_SECONDS", 20)?,
            fallback: seconds("COMPLETENESS_FALLBACK_SECONDS", 1)?,
            notification_delay: Duration::try_hours(delay_hours)
                .filter(|d| *d <= max_offset())
                .ok_or_else(|| {
                    anyhow!("ALERT_NOTIFICATION_DELAY_HOURS out of range: {}", delay_hours)
                })?,
        };

        let defaults = Priorities::default();
        let priorities = Priorities {
            planning_completeness: priority(
                "PLANNING_COMPLETENESS_PRIORITY",
                defaults.planning_completeness,
            )?,
            catalog: priority("CATALOG_PRIORITY", defaults.catalog)?,
        };

        Ok(Self {
            planning_inputs: paths("PLANNING_INPUT"),
            catalog_inputs: paths("CATALOG_INPUT"),
            completeness,
            priorities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        lookup(vars).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert!(config.planning_inputs.is_empty());
        assert_eq!(config.completeness, CompletenessPolicy::default());
        assert_eq!(config.priorities, Priorities::default());
    }

    #[test]
    fn test_overrides_and_input_lists() {
        let config = config(&[
            ("PLANNING_INPUT", "a.json, b.json,"),
            ("COMPLETENESS_STOP_MARGIN_SECONDS", "30"),
            ("CATALOG_PRIORITY", "not a number"),
        ]);
        assert_eq!(
            config.planning_inputs,
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
        assert_eq!(config.completeness.stop_margin, Duration::seconds(30));
        assert_eq!(config.priorities.catalog, 30);
    }

    #[test]
    fn test_negative_durations_are_rejected() {
        for key in [
            "COMPLETENESS_START_MARGIN_SECONDS",
            "COMPLETENESS_STOP_MARGIN_SECONDS",
            "COMPLETENESS_FALLBACK_SECONDS",
            "ALERT_NOTIFICATION_DELAY_HOURS",
        ] {
            let err = lookup(&[(key, "-5")]).unwrap_err();
            assert!(err.to_string().contains(key));
        }
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(lookup(&[("ALERT_NOTIFICATION_DELAY_HOURS", "9000000000000000")]).is_err());
        assert!(lookup(&[("COMPLETENESS_FALLBACK_SECONDS", "9223372036854775807")]).is_err());
        assert!(lookup(&[("COMPLETENESS_START_MARGIN_SECONDS", "40000000")]).is_err());
        assert!(lookup(&[("CATALOG_PRIORITY", "3000000000")]).is_err());
    }

    #[test]
    fn test_accepted_policy_never_inverts_window() {
        let config = config(&[("COMPLETENESS_FALLBACK_SECONDS", "0")]);
        let start = chrono::NaiveDate::from_ymd_opt(2021, 3, 16)
            .and_then(|d| d.and_hms_opt(18, 10, 0))
            .unwrap();
        let (exp_start, exp_stop) = config.completeness.window(start, start);
        assert!(exp_start <= exp_stop);
    }
}
