//! Policy knobs of the discovery pass.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How service names read from the marker are validated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Empty or malformed names are rejected with `InvalidDescriptor`.
    #[default]
    Strict,
    /// Names are used as-is; an empty name publishes at `/`.
    Verbatim,
}

/// What happens when a path is published twice.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The second publication fails with `PathAlreadyBound`.
    #[default]
    FailFast,
    /// The second publication replaces the first.
    Overwrite,
}

/// Discovery section of the application config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub name_policy: NamePolicy,
    pub collision_policy: CollisionPolicy,
    /// Upper bound for the whole pass; startup fails once exceeded.
    #[serde(with = "humantime_serde")]
    pub startup_timeout: Duration,
    /// Treat any per-component failure as a startup failure.
    pub fail_on_rejections: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            name_policy: NamePolicy::default(),
            collision_policy: CollisionPolicy::default(),
            startup_timeout: Duration::from_secs(30),
            fail_on_rejections: true,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_hardened() {
        let cfg = DiscoveryConfig::default();
        assert_eq!(cfg.name_policy, NamePolicy::Strict);
        assert_eq!(cfg.collision_policy, CollisionPolicy::FailFast);
        assert_eq!(cfg.startup_timeout, Duration::from_secs(30));
        assert!(cfg.fail_on_rejections);
    }

    #[test]
    fn parses_snake_case_policies_and_humantime() {
        let cfg: DiscoveryConfig = serde_json::from_value(json!({
            "name_policy": "verbatim",
            "collision_policy": "overwrite",
            "startup_timeout": "1m 30s",
        }))
        .unwrap();

        assert_eq!(cfg.name_policy, NamePolicy::Verbatim);
        assert_eq!(cfg.collision_policy, CollisionPolicy::Overwrite);
        assert_eq!(cfg.startup_timeout, Duration::from_secs(90));
        assert!(cfg.fail_on_rejections, "missing fields fall back to defaults");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<DiscoveryConfig, _> =
            serde_json::from_value(json!({ "collision": "overwrite" }));
        assert!(res.is_err());
    }
}
