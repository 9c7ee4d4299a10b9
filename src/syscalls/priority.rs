/*!
 * Scheduling Hint Syscalls
 * nice and the getpriority/setpriority pair
 *
 * Tiers with no notion of OS process priority succeed silently: a guest
 * that lowers its own priority on a platform without one is better served
 * by a no-op than by an error it will treat as fatal.
 */

use super::executor::{unit_ret, SyscallExecutor};
use super::types::CallResult;
use crate::core::{Errno, Pid};
use log::warn;

/// The only `which` scope the host side can honor (`PRIO_PROCESS`).
const PRIO_PROCESS: i32 = 0;

impl SyscallExecutor {
    pub(super) fn nice(&self, incr: i32) -> CallResult {
        let current = match self.caps.platform.priority(0) {
            None => return Ok(0),
            Some(Err(errno)) => return Ok(errno.ret()),
            Some(Ok(value)) => value,
        };
        match self.caps.platform.set_priority(0, current.saturating_add(incr)) {
            None => Ok(0),
            Some(result) => Ok(unit_ret(result)),
        }
    }

    pub(super) fn getpriority(&self, which: i32, who: Pid) -> CallResult {
        if self.caps.platform.priority(0).is_none() {
            return Ok(0);
        }
        if which != PRIO_PROCESS {
            warn!("getpriority: only the process scope is supported, which={}", which);
            return Ok(0);
        }
        match self.caps.platform.priority(who) {
            None => Ok(0),
            Some(Ok(value)) => Ok(value),
            Some(Err(errno)) => Ok(errno.ret()),
        }
    }

    pub(super) fn setpriority(&self, which: i32, who: Pid, value: i32) -> CallResult {
        // probe with the read side; mutating as a presence check would
        // clobber the real priority
        if self.caps.platform.priority(0).is_none() {
            return Ok(0);
        }
        if which != PRIO_PROCESS {
            warn!("setpriority: only the process scope is supported, which={}", which);
            return Ok(Errno::EINVAL.ret());
        }
        match self.caps.platform.set_priority(who, value) {
            None => Ok(0),
            Some(result) => Ok(unit_ret(result)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::{CapabilitySet, MockPlatformCaps};
    use crate::descriptors::DescriptorTable;
    use crate::memory::{Marshaller, SharedMemory};
    use std::sync::Arc;

    fn executor(caps: CapabilitySet) -> SyscallExecutor {
        let marshal = Marshaller::new(Arc::new(SharedMemory::with_size(64)));
        SyscallExecutor::new(marshal, caps, Arc::new(DescriptorTable::new()), None)
    }

    #[test]
    fn test_priority_calls_noop_without_surface() {
        let exec = executor(CapabilitySet::detached());
        assert_eq!(exec.nice(5).unwrap(), 0);
        assert_eq!(exec.getpriority(0, 0).unwrap(), 0);
        assert_eq!(exec.setpriority(0, 0, 10).unwrap(), 0);
    }

    #[test]
    fn test_nice_is_get_then_set() {
        let mut platform = MockPlatformCaps::new();
        platform.expect_priority().returning(|_| Some(Ok(3)));
        platform
            .expect_set_priority()
            .withf(|pid, value| *pid == 0 && *value == 8)
            .returning(|_, _| Some(Ok(())));
        let exec = executor(CapabilitySet::detached().with_platform(Arc::new(platform)));
        assert_eq!(exec.nice(5).unwrap(), 0);
    }

    #[test]
    fn test_setpriority_rejects_non_process_scope() {
        let mut platform = MockPlatformCaps::new();
        platform.expect_priority().returning(|_| Some(Ok(0)));
        platform.expect_set_priority().times(0);
        let exec = executor(CapabilitySet::detached().with_platform(Arc::new(platform)));
        assert_eq!(exec.setpriority(1, 0, 10).unwrap(), Errno::EINVAL.ret());
    }

    #[test]
    fn test_getpriority_passes_value_through() {
        let mut platform = MockPlatformCaps::new();
        platform.expect_priority().returning(|_| Some(Ok(-7)));
        let exec = executor(CapabilitySet::detached().with_platform(Arc::new(platform)));
        assert_eq!(exec.getpriority(0, 42).unwrap(), -7);
    }
}
