//! Configuration for the session tracker.

use serde::{Deserialize, Serialize};

/// Which dice rolls are worth writing into the session log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollLogPolicy {
    /// Only d20 rolls: checks, attacks and saves.
    #[default]
    D20Only,
    /// Every roll.
    All,
}

/// Configuration for a session tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Longest recap field, in characters, before it is cut short.
    pub field_limit: usize,
    /// Which rolls get logged.
    pub roll_policy: RollLogPolicy,
    /// `strftime` format for clock times in logs and recaps.
    pub time_format: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            field_limit: 1024,
            roll_policy: RollLogPolicy::D20Only,
            time_format: "%I:%M %p".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Set the recap field limit (at least 16 characters).
    pub fn with_field_limit(mut self, limit: usize) -> Self {
        self.field_limit = limit.max(16);
        self
    }

    /// Set the roll logging policy.
    pub fn with_roll_policy(mut self, policy: RollLogPolicy) -> Self {
        self.roll_policy = policy;
        self
    }

    /// Set the clock format.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.field_limit, 1024);
        assert_eq!(cfg.roll_policy, RollLogPolicy::D20Only);
        assert_eq!(cfg.time_format, "%I:%M %p");
    }

    #[test]
    fn builder_methods() {
        let cfg = TrackerConfig::default()
            .with_field_limit(200)
            .with_roll_policy(RollLogPolicy::All)
            .with_time_format("%H:%M");
        assert_eq!(cfg.field_limit, 200);
        assert_eq!(cfg.roll_policy, RollLogPolicy::All);
        assert_eq!(cfg.time_format, "%H:%M");
    }

    #[test]
    fn field_limit_clamped() {
        assert_eq!(TrackerConfig::default().with_field_limit(0).field_limit, 16);
    }

    #[test]
    fn deserialize_partial() {
        let cfg: TrackerConfig = serde_json::from_str(r#"{"roll_policy":"all"}"#).unwrap();
        assert_eq!(cfg.roll_policy, RollLogPolicy::All);
        assert_eq!(cfg.field_limit, 1024);
    }
}
