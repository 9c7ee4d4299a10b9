/*!
 * Scripted Backends
 * Fixed-answer providers for tests and hostless embeddings
 */

use super::traits::{CapCall, IdentityCaps, PlatformCaps};
use crate::core::{Gid, Pid, Uid};

/// Identity provider that answers from a fixed record.
///
/// Useful for embeddings that present the guest with a synthetic identity
/// (every browser-tier process is uid 1000 somewhere), and for tests that
/// need deterministic ids.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    pub uid: Uid,
    pub gid: Gid,
    pub euid: Uid,
    pub egid: Gid,
    pub pid: Pid,
    pub ppid: Pid,
    pub groups: Vec<Gid>,
}

impl FixedIdentity {
    /// A single-user process model: uid/gid 1000, pid 1.
    #[must_use]
    pub fn single_user() -> Self {
        Self {
            uid: 1000,
            gid: 1000,
            euid: 1000,
            egid: 1000,
            pid: 1,
            ppid: 1,
            groups: vec![1000],
        }
    }

    #[must_use]
    pub fn with_groups(mut self, groups: Vec<Gid>) -> Self {
        self.groups = groups;
        self
    }
}

impl IdentityCaps for FixedIdentity {
    fn uid(&self) -> Option<Uid> {
        Some(self.uid)
    }

    fn gid(&self) -> Option<Gid> {
        Some(self.gid)
    }

    fn euid(&self) -> Option<Uid> {
        Some(self.euid)
    }

    fn egid(&self) -> Option<Gid> {
        Some(self.egid)
    }

    fn pid(&self) -> Option<Pid> {
        Some(self.pid)
    }

    fn ppid(&self) -> Option<Pid> {
        Some(self.ppid)
    }

    fn groups(&self) -> Option<Vec<Gid>> {
        Some(self.groups.clone())
    }
}

/// Platform provider with scripted hostname/username and no priority
/// surface.
#[derive(Debug, Clone, Default)]
pub struct FixedPlatform {
    pub hostname: Option<String>,
    pub username: Option<String>,
}

impl PlatformCaps for FixedPlatform {
    fn hostname(&self) -> Option<String> {
        self.hostname.clone()
    }

    fn username(&self) -> Option<String> {
        self.username.clone()
    }

    fn priority(&self, _pid: Pid) -> CapCall<i32> {
        None
    }
}
