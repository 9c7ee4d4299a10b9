/*!
 * Identity Syscalls
 * uid/gid/pid queries and group membership
 *
 * Everything here is benign-default: with no identity provider the guest
 * sees the single-user single-process model (ids 0, pid 1) rather than an
 * error, because guest programs call these unconditionally and expect them
 * to succeed.
 */

use super::executor::SyscallExecutor;
use super::types::CallResult;
use crate::core::{Errno, GuestPtr};
use log::trace;

impl SyscallExecutor {
    pub(super) fn getuid(&self) -> CallResult {
        Ok(self.caps.identity.uid().unwrap_or(0) as i32)
    }

    pub(super) fn getgid(&self) -> CallResult {
        Ok(self.caps.identity.gid().unwrap_or(0) as i32)
    }

    pub(super) fn geteuid(&self) -> CallResult {
        Ok(self.caps.identity.euid().unwrap_or(0) as i32)
    }

    pub(super) fn getegid(&self) -> CallResult {
        Ok(self.caps.identity.egid().unwrap_or(0) as i32)
    }

    pub(super) fn getpid(&self) -> CallResult {
        Ok(self.caps.identity.pid().unwrap_or(1))
    }

    pub(super) fn getppid(&self) -> CallResult {
        // single-process model: the parent is the process itself
        match self.caps.identity.ppid() {
            Some(ppid) => Ok(ppid),
            None => self.getpid(),
        }
    }

    /// POSIX two-phase `getgroups`: a zero capacity asks only for the
    /// count; otherwise at most `gidsetsize` entries are written and the
    /// number written is returned.
    pub(super) fn getgroups(&self, gidsetsize: i32, list_ptr: GuestPtr) -> CallResult {
        let Some(groups) = self.caps.identity.groups() else {
            trace!("getgroups: no membership surface, reporting no groups");
            return Ok(0);
        };
        if gidsetsize < 0 {
            return Ok(Errno::EINVAL.ret());
        }
        if gidsetsize == 0 {
            return Ok(groups.len() as i32);
        }
        let count = groups.len().min(gidsetsize as usize);
        if count == 0 {
            return Ok(0);
        }
        // validate the whole destination up front so a fault writes nothing
        self.marshal.check_range(list_ptr, 4 * count)?;
        for (slot, gid) in groups[..count].iter().enumerate() {
            self.marshal.write_u32(list_ptr + 4 * slot as u32, *gid)?;
        }
        Ok(count as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::{CapabilitySet, FixedIdentity};
    use crate::descriptors::DescriptorTable;
    use crate::memory::{Marshaller, SharedMemory};
    use std::sync::Arc;

    fn executor(caps: CapabilitySet) -> SyscallExecutor {
        let marshal = Marshaller::new(Arc::new(SharedMemory::with_size(128)));
        SyscallExecutor::new(marshal, caps, Arc::new(DescriptorTable::new()), None)
    }

    #[test]
    fn test_absent_identity_is_single_user_model() {
        let exec = executor(CapabilitySet::detached());
        assert_eq!(exec.getuid().unwrap(), 0);
        assert_eq!(exec.getgid().unwrap(), 0);
        assert_eq!(exec.geteuid().unwrap(), 0);
        assert_eq!(exec.getegid().unwrap(), 0);
        assert_eq!(exec.getpid().unwrap(), 1);
        assert_eq!(exec.getppid().unwrap(), 1);
    }

    #[test]
    fn test_identity_queries_are_idempotent() {
        let exec = executor(CapabilitySet::detached());
        assert_eq!(exec.getuid().unwrap(), exec.getuid().unwrap());
        assert_eq!(exec.getpid().unwrap(), exec.getpid().unwrap());
    }

    #[test]
    fn test_getppid_collapses_to_own_pid() {
        let identity = FixedIdentity { ppid: 99, ..FixedIdentity::single_user() };
        let exec = executor(
            CapabilitySet::detached().with_identity(Arc::new(identity)),
        );
        assert_eq!(exec.getppid().unwrap(), 99);
    }

    #[test]
    fn test_getgroups_zero_capacity_counts_without_writing() {
        let identity = FixedIdentity::single_user().with_groups(vec![4, 24, 27]);
        let exec = executor(
            CapabilitySet::detached().with_identity(Arc::new(identity)),
        );
        assert_eq!(exec.getgroups(0, 0).unwrap(), 3);
        // nothing was written at the (valid) target
        assert_eq!(exec.marshal.read_u32(0).unwrap(), 0);
    }

    #[test]
    fn test_getgroups_short_buffer_writes_exactly_capacity() {
        let identity = FixedIdentity::single_user().with_groups(vec![4, 24, 27]);
        let exec = executor(
            CapabilitySet::detached().with_identity(Arc::new(identity)),
        );
        assert_eq!(exec.getgroups(2, 16).unwrap(), 2);
        assert_eq!(exec.marshal.read_u32(16).unwrap(), 4);
        assert_eq!(exec.marshal.read_u32(20).unwrap(), 24);
        assert_eq!(exec.marshal.read_u32(24).unwrap(), 0);
    }

    #[test]
    fn test_getgroups_roomy_buffer_writes_all() {
        let identity = FixedIdentity::single_user().with_groups(vec![4, 24]);
        let exec = executor(
            CapabilitySet::detached().with_identity(Arc::new(identity)),
        );
        assert_eq!(exec.getgroups(8, 16).unwrap(), 2);
        assert_eq!(exec.marshal.read_u32(20).unwrap(), 24);
    }

    #[test]
    fn test_getgroups_empty_membership_short_circuits() {
        let identity = FixedIdentity::single_user().with_groups(Vec::new());
        let exec = executor(
            CapabilitySet::detached().with_identity(Arc::new(identity)),
        );
        // even an invalid pointer is never dereferenced
        assert_eq!(exec.getgroups(4, 0xdead_0000).unwrap(), 0);
    }

    #[test]
    fn test_getgroups_negative_capacity_is_einval() {
        let exec = executor(
            CapabilitySet::detached()
                .with_identity(Arc::new(FixedIdentity::single_user())),
        );
        assert_eq!(exec.getgroups(-1, 0).unwrap(), Errno::EINVAL.ret());
    }
}
