/*!
 * Shim Configuration
 * Deployment-tier selection with environment overrides
 */

use crate::caps::Tier;
use log::warn;
use serde::{Deserialize, Serialize};

/// Environment variable that forces a deployment tier.
pub const TIER_ENV: &str = "POSIX_SHIM_TIER";

/// Construction-time configuration for a shim instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShimConfig {
    pub tier: Tier,
}

impl ShimConfig {
    /// The default tier for this platform: full host where there is one.
    #[must_use]
    pub fn native() -> Self {
        Self { tier: default_tier() }
    }

    /// Read the tier from `POSIX_SHIM_TIER` (`native`, `worker`,
    /// `sandboxed`), falling back to the platform default. Unrecognized
    /// values are reported and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let tier = match std::env::var(TIER_ENV) {
            Ok(value) => match value.as_str() {
                "native" => Tier::Native,
                "worker" => Tier::Worker,
                "sandboxed" => Tier::Sandboxed,
                other => {
                    warn!("{}={:?} is not a tier, using the platform default", TIER_ENV, other);
                    default_tier()
                }
            },
            Err(_) => default_tier(),
        };
        Self { tier }
    }
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self::native()
    }
}

#[cfg(unix)]
const fn default_tier() -> Tier {
    Tier::Native
}

#[cfg(not(unix))]
const fn default_tier() -> Tier {
    Tier::Sandboxed
}
