/*!
 * Detached Backend
 * The no-OS tier: every operation absent
 */

use super::traits::{FsCaps, IdentityCaps, PlatformCaps, PosixExtCaps};

/// Capability backend for sandboxed tiers with no operating system behind
/// them (a browser, a bare test harness). Every operation reports absent;
/// the dispatch policy decides which calls degrade to defaults and which
/// become fatal.
pub struct Detached;

impl FsCaps for Detached {}
impl PlatformCaps for Detached {}
impl IdentityCaps for Detached {}
impl PosixExtCaps for Detached {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::CapCall;

    #[test]
    fn test_everything_is_absent() {
        assert!(IdentityCaps::uid(&Detached).is_none());
        assert!(PlatformCaps::hostname(&Detached).is_none());
        let pgid: CapCall<i32> = PosixExtCaps::getpgid(&Detached, 1);
        assert!(pgid.is_none());
        assert!(PosixExtCaps::alarm(&Detached, 5).is_none());
    }
}
