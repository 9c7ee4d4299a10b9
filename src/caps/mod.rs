/*!
 * Capability Providers
 * Tiered host backends behind four independent trait surfaces
 */

mod detached;
mod fixed;
#[cfg(unix)]
mod native;
mod traits;

pub use detached::Detached;
pub use fixed::{FixedIdentity, FixedPlatform};
#[cfg(unix)]
pub use native::{NativeFs, NativeIdentity, NativePlatform, NativePosixExt};
pub use traits::{CapCall, FsCaps, IdentityCaps, PlatformCaps, PosixExtCaps};

#[cfg(test)]
pub use traits::{MockFsCaps, MockIdentityCaps, MockPlatformCaps, MockPosixExtCaps};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Deployment tier the shim runs in. Decides which capability backends get
/// constructed; nothing downstream re-probes the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Full-privilege host process
    Native,
    /// Restricted worker context: identity mutation disallowed by host
    /// policy
    Worker,
    /// No OS at all (browser or equivalent)
    Sandboxed,
}

/// The four provider surfaces a shim instance closes over.
///
/// Constructed once at initialization and only queried afterwards. Surfaces
/// are independently swappable; tests and unusual embeddings mix tiers
/// freely.
#[derive(Clone)]
pub struct CapabilitySet {
    pub fs: Arc<dyn FsCaps>,
    pub platform: Arc<dyn PlatformCaps>,
    pub identity: Arc<dyn IdentityCaps>,
    pub posix: Arc<dyn PosixExtCaps>,
}

impl CapabilitySet {
    /// Backends for a deployment tier.
    #[must_use]
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Sandboxed => Self::detached(),
            #[cfg(unix)]
            Tier::Native => Self {
                fs: Arc::new(NativeFs),
                platform: Arc::new(NativePlatform),
                identity: Arc::new(NativeIdentity),
                posix: Arc::new(NativePosixExt::unrestricted()),
            },
            #[cfg(unix)]
            Tier::Worker => Self {
                fs: Arc::new(NativeFs),
                platform: Arc::new(NativePlatform),
                identity: Arc::new(NativeIdentity),
                posix: Arc::new(NativePosixExt::worker()),
            },
            #[cfg(not(unix))]
            Tier::Native | Tier::Worker => {
                log::warn!("no native host backend on this platform, falling back to detached");
                Self::detached()
            }
        }
    }

    /// Every surface absent.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            fs: Arc::new(Detached),
            platform: Arc::new(Detached),
            identity: Arc::new(Detached),
            posix: Arc::new(Detached),
        }
    }

    #[must_use]
    pub fn with_fs(mut self, fs: Arc<dyn FsCaps>) -> Self {
        self.fs = fs;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Arc<dyn PlatformCaps>) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Arc<dyn IdentityCaps>) -> Self {
        self.identity = identity;
        self
    }

    #[must_use]
    pub fn with_posix(mut self, posix: Arc<dyn PosixExtCaps>) -> Self {
        self.posix = posix;
        self
    }
}
