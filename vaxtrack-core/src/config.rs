//! Policy constants exposed as configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_GRACE_PERIOD_DAYS: u32 = 30;
/// One hundred years.
pub const MAX_GRACE_PERIOD_DAYS: u32 = 36_500;
pub const DEFAULT_RECENT_WINDOW: usize = 5;
pub const DEFAULT_DUE_LIST_LIMIT: usize = 25;
pub const DEFAULT_DUE_SOON_HORIZON_DAYS: u32 = 14;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSettings {
    pub follow_up: FollowUpSettings,
    pub dashboard: DashboardSettings,
}

impl CoreSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.follow_up.validate()?;
        self.dashboard.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowUpSettings {
    /// Days past the due date before a follow-up is marked missed.
    pub grace_period_days: u32,
}

impl Default for FollowUpSettings {
    fn default() -> Self {
        Self {
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
        }
    }
}

impl FollowUpSettings {
    pub fn grace_period(&self) -> Duration {
        Duration::days(i64::from(self.grace_period_days))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.grace_period_days > MAX_GRACE_PERIOD_DAYS {
            return Err(ValidationError::new(
                "follow_up.grace_period_days",
                format!("must be at most {MAX_GRACE_PERIOD_DAYS}"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub recent_window: usize,
    pub due_list_limit: usize,
    pub due_soon_horizon_days: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            recent_window: DEFAULT_RECENT_WINDOW,
            due_list_limit: DEFAULT_DUE_LIST_LIMIT,
            due_soon_horizon_days: DEFAULT_DUE_SOON_HORIZON_DAYS,
        }
    }
}

impl DashboardSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.recent_window == 0 {
            return Err(ValidationError::new(
                "dashboard.recent_window",
                "must be at least 1",
            ));
        }
        if self.due_list_limit == 0 {
            return Err(ValidationError::new(
                "dashboard.due_list_limit",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: CoreSettings =
            serde_json::from_str(r#"{"follow_up": {"grace_period_days": 45}}"#).unwrap();
        assert_eq!(settings.follow_up.grace_period_days, 45);
        assert_eq!(settings.dashboard, DashboardSettings::default());
    }

    #[test]
    fn zero_recent_window_is_rejected() {
        let settings = DashboardSettings {
            recent_window: 0,
            ..DashboardSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn grace_period_beyond_a_century_is_rejected() {
        let mut settings = CoreSettings::default();
        settings.follow_up.grace_period_days = MAX_GRACE_PERIOD_DAYS;
        assert!(settings.validate().is_ok());

        settings.follow_up.grace_period_days = 1_000_000_000;
        let err = settings.validate().unwrap_err();
        assert_eq!(err.field, "follow_up.grace_period_days");
    }
}
