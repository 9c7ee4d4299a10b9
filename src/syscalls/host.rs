/*!
 * Host Identity Syscalls
 * Hostname, login name, terminal names, and the alarm timer
 */

use super::executor::{unit_ret, ResolvedLogin, SyscallExecutor};
use super::types::{CallFault, CallResult};
use crate::core::{Errno, Fd, GuestPtr};
use crate::memory::MemoryFault;
use log::{debug, trace};
use std::sync::Arc;

impl SyscallExecutor {
    /// Returns a guest pointer to the resolved login name.
    ///
    /// The name is published into guest memory through the guest's own
    /// allocator exactly once; later calls hand back the cached pointer.
    /// Falls back to `"user"` when the platform has no resident user.
    pub(super) fn getlogin(&self) -> CallResult {
        if let Some(resolved) = self.login.load_full() {
            trace!("getlogin cached {:?}", resolved.name);
            return Ok(resolved.at as i32);
        }
        let alloc = self
            .alloc
            .as_ref()
            .ok_or_else(|| CallFault::not_implemented("getlogin"))?;
        let name = self
            .caps
            .platform
            .username()
            .unwrap_or_else(|| "user".to_string());
        let len = name.len() + 1;
        let at = alloc(len).ok_or(MemoryFault::AllocFailed { len })?;
        self.marshal.write_string(&name, at, len)?;
        debug!("getlogin resolved {:?} at 0x{:08x}", name, at);
        self.login.store(Some(Arc::new(ResolvedLogin { name, at })));
        Ok(at as i32)
    }

    pub(super) fn gethostname(&self, name_ptr: GuestPtr, len: i32) -> CallResult {
        let hostname = Self::require("gethostname", self.caps.platform.hostname())?;
        self.marshal
            .write_string(&hostname, name_ptr, len.max(0) as usize)?;
        Ok(0)
    }

    pub(super) fn sethostname(&self, name_ptr: GuestPtr, len: i32) -> CallResult {
        if len < 0 {
            return Ok(Errno::EINVAL.ret());
        }
        let name = self.marshal.read_string_len(name_ptr, len as usize)?;
        debug!("sethostname {:?}", name);
        let attempt = Self::require("sethostname", self.caps.posix.sethostname(&name))?;
        Ok(unit_ret(attempt))
    }

    pub(super) fn ttyname_r(&self, fd: Fd, buf_ptr: GuestPtr, len: i32) -> CallResult {
        let entry = match self.entry("ttyname_r", fd) {
            Ok(entry) => entry,
            Err(errno) => return Ok(errno.ret()),
        };
        let name = match Self::require("ttyname_r", self.caps.posix.ttyname(&entry.resource))? {
            Ok(name) => name,
            Err(errno) => return Ok(errno.ret()),
        };
        let capacity = len.max(0) as usize;
        if name.len() + 1 > capacity {
            return Ok(Errno::ERANGE.ret());
        }
        self.marshal.write_string(&name, buf_ptr, capacity)?;
        Ok(0)
    }

    pub(super) fn alarm(&self, seconds: i32) -> CallResult {
        let remaining = Self::require(
            "alarm",
            self.caps.posix.alarm(seconds.max(0) as u32),
        )?;
        Ok(remaining as i32)
    }
}
