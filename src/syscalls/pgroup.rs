/*!
 * Process Group and Session Syscalls
 *
 * Queries degrade to the single-process model (everything is group 1);
 * mutations require the real capability, since pretending a process moved
 * groups corrupts job-control logic in the guest.
 */

use super::executor::{unit_ret, SyscallExecutor};
use super::types::CallResult;
use crate::core::Pid;
use log::debug;

impl SyscallExecutor {
    pub(super) fn getpgid(&self, pid: Pid) -> CallResult {
        match self.caps.posix.getpgid(pid) {
            None => Ok(1),
            Some(Ok(pgid)) => Ok(pgid),
            Some(Err(errno)) => Ok(errno.ret()),
        }
    }

    pub(super) fn setpgid(&self, pid: Pid, pgid: Pid) -> CallResult {
        debug!("setpgid pid={} pgid={}", pid, pgid);
        let attempt = Self::require("setpgid", self.caps.posix.setpgid(pid, pgid))?;
        Ok(unit_ret(attempt))
    }

    pub(super) fn getpgrp(&self) -> CallResult {
        Ok(self.caps.posix.getpgrp().unwrap_or(1))
    }

    pub(super) fn setsid(&self) -> CallResult {
        debug!("setsid");
        match Self::require("setsid", self.caps.posix.setsid())? {
            Ok(sid) => Ok(sid),
            Err(errno) => Ok(errno.ret()),
        }
    }

    pub(super) fn getsid(&self, pid: Pid) -> CallResult {
        match Self::require("getsid", self.caps.posix.getsid(pid))? {
            Ok(sid) => Ok(sid),
            Err(errno) => Ok(errno.ret()),
        }
    }
}
