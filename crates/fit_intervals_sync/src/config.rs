use chrono::NaiveTime;

use crate::error::SyncError;

/// Sync behaviour knobs, read from `FIT_SYNC_*` variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// Label used in log lines.
    pub user: String,
    /// How many days back the wellness ledger is checked for gaps.
    pub days_to_compare: u32,
    /// Local time of day separating one night from the next when querying
    /// sleep sessions.
    pub sleep_day_border: NaiveTime,
    /// Log the updates instead of writing them.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            user: "default".into(),
            days_to_compare: 30,
            sleep_day_border: NaiveTime::from_hms_opt(15, 0, 0).unwrap_or(NaiveTime::MIN),
            dry_run: false,
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Result<Self, SyncError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(user) = get("FIT_SYNC_USER") {
            cfg.user = user;
        }
        if let Some(days) = get("FIT_SYNC_DAYS_TO_COMPARE") {
            cfg.days_to_compare = days
                .parse::<u32>()
                .ok()
                .filter(|d| *d > 0)
                .ok_or_else(|| {
                    SyncError::Config(format!(
                        "FIT_SYNC_DAYS_TO_COMPARE must be a positive integer, got {days:?}"
                    ))
                })?;
        }
        if let Some(border) = get("FIT_SYNC_SLEEP_DAY_BORDER") {
            cfg.sleep_day_border = NaiveTime::parse_from_str(&border, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(&border, "%H:%M"))
                .map_err(|e| {
                    SyncError::Config(format!("FIT_SYNC_SLEEP_DAY_BORDER {border:?}: {e}"))
                })?;
        }
        if let Some(flag) = get("FIT_SYNC_DRY_RUN") {
            cfg.dry_run = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => {
                    return Err(SyncError::Config(format!(
                        "FIT_SYNC_DRY_RUN must be true or false, got {other:?}"
                    )));
                }
            };
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let cfg = SyncConfig::from_env_with(|_| None).expect("cfg");
        assert_eq!(cfg, SyncConfig::default());
        assert_eq!(cfg.days_to_compare, 30);
        assert_eq!(cfg.sleep_day_border, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
    }

    #[test]
    fn reads_overrides() {
        let get = |k: &str| match k {
            "FIT_SYNC_USER" => Some("alice".into()),
            "FIT_SYNC_DAYS_TO_COMPARE" => Some("7".into()),
            "FIT_SYNC_SLEEP_DAY_BORDER" => Some("12:30".into()),
            "FIT_SYNC_DRY_RUN" => Some("TRUE".into()),
            _ => None,
        };
        let cfg = SyncConfig::from_env_with(get).expect("cfg");
        assert_eq!(cfg.user, "alice");
        assert_eq!(cfg.days_to_compare, 7);
        assert_eq!(cfg.sleep_day_border, NaiveTime::from_hms_opt(12, 30, 0).unwrap());
        assert!(cfg.dry_run);
    }

    #[test]
    fn rejects_zero_days() {
        let get = |k: &str| (k == "FIT_SYNC_DAYS_TO_COMPARE").then(|| "0".to_string());
        assert!(matches!(
            SyncConfig::from_env_with(get),
            Err(SyncError::Config(_))
        ));
    }

    #[test]
    fn rejects_bad_border_and_flag() {
        let get = |k: &str| (k == "FIT_SYNC_SLEEP_DAY_BORDER").then(|| "25:00".to_string());
        assert!(SyncConfig::from_env_with(get).is_err());
        let get = |k: &str| (k == "FIT_SYNC_DRY_RUN").then(|| "maybe".to_string());
        assert!(SyncConfig::from_env_with(get).is_err());
    }
}
