/*!
 * Ownership Syscalls
 * chown family and whole-table sync
 */

use super::executor::{unit_ret, SyscallExecutor};
use super::types::CallResult;
use crate::core::{Fd, Gid, GuestPtr, Uid};
use log::{debug, trace, warn};
use std::path::Path;

impl SyscallExecutor {
    pub(super) fn chown(&self, path_ptr: GuestPtr, uid: Uid, gid: Gid) -> CallResult {
        let path = self.marshal.read_string(path_ptr)?;
        debug!("chown {:?} to {}:{}", path, uid, gid);
        match self.caps.fs.chown(Path::new(&path), uid, gid) {
            None => {
                trace!("chown: no filesystem ownership surface, treating as applied");
                Ok(0)
            }
            Some(result) => Ok(unit_ret(result)),
        }
    }

    pub(super) fn lchown(&self, path_ptr: GuestPtr, uid: Uid, gid: Gid) -> CallResult {
        let path = self.marshal.read_string(path_ptr)?;
        debug!("lchown {:?} to {}:{}", path, uid, gid);
        match self.caps.fs.lchown(Path::new(&path), uid, gid) {
            None => Ok(0),
            Some(result) => Ok(unit_ret(result)),
        }
    }

    pub(super) fn fchown(&self, fd: Fd, uid: Uid, gid: Gid) -> CallResult {
        let entry = match self.entry("fchown", fd) {
            Ok(entry) => entry,
            Err(errno) => return Ok(errno.ret()),
        };
        if !entry.resource.is_host_backed() {
            // ownership of guest-virtual files is the guest VFS's business
            return Ok(0);
        }
        match self.caps.fs.fchown(&entry.resource, uid, gid) {
            None => Ok(0),
            Some(result) => Ok(unit_ret(result)),
        }
    }

    /// Flush every host-backed descriptor. POSIX `sync` reports nothing, so
    /// per-descriptor failures are logged and swallowed.
    pub(super) fn sync(&self) -> CallResult {
        self.descriptors.for_each(|fd, entry| {
            if let Some(Err(errno)) = self.caps.fs.fsync(&entry.resource) {
                warn!("sync: fsync failed on fd {}: {}", fd, errno);
            }
        });
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::{CapabilitySet, MockFsCaps};
    use crate::core::Errno;
    use crate::descriptors::{DescriptorEntry, DescriptorTable, HostResource};
    use crate::memory::{Marshaller, SharedMemory};
    use std::sync::Arc;

    fn executor_with_fs(fs: MockFsCaps) -> SyscallExecutor {
        let memory = Arc::new(SharedMemory::with_size(256));
        let marshal = Marshaller::new(memory);
        marshal.write_string("/tmp/x", 0, 32).unwrap();
        let caps = CapabilitySet::detached().with_fs(Arc::new(fs));
        SyscallExecutor::new(marshal, caps, Arc::new(DescriptorTable::with_stdio()), None)
    }

    #[test]
    fn test_chown_host_failure_becomes_errno() {
        let mut fs = MockFsCaps::new();
        fs.expect_chown().returning(|_, _, _| Some(Err(Errno::EPERM)));
        let exec = executor_with_fs(fs);
        assert_eq!(exec.chown(0, 0, 0).unwrap(), -1);
    }

    #[test]
    fn test_fchown_unknown_fd_never_reaches_host() {
        let mut fs = MockFsCaps::new();
        fs.expect_fchown().times(0);
        let exec = executor_with_fs(fs);
        assert_eq!(exec.fchown(42, 0, 0).unwrap(), Errno::EBADF.ret());
    }

    #[test]
    fn test_fchown_virtual_fd_is_a_quiet_success() {
        let mut fs = MockFsCaps::new();
        fs.expect_fchown().times(0);
        let exec = executor_with_fs(fs);
        exec.descriptors
            .insert(7, DescriptorEntry::new(HostResource::Virtual));
        assert_eq!(exec.fchown(7, 10, 10).unwrap(), 0);
    }

    #[test]
    fn test_sync_swallows_per_descriptor_failures() {
        let mut fs = MockFsCaps::new();
        fs.expect_fsync().returning(|_| Some(Err(Errno::EIO)));
        let exec = executor_with_fs(fs);
        assert_eq!(exec.sync().unwrap(), 0);
    }
}
