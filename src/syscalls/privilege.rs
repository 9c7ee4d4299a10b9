/*!
 * Privilege Transition Syscalls
 * Effective/real/saved id changes, the resolved-id queries, and execve
 *
 * None of these can be faked: a guest that believes it dropped privileges
 * when nothing happened is a correctness (and safety) failure. Absent
 * capability is therefore fatal across the board.
 */

use super::executor::{unit_ret, SyscallExecutor};
use super::types::CallResult;
use crate::core::{Gid, GuestPtr, Uid};
use log::debug;
use std::path::Path;

impl SyscallExecutor {
    pub(super) fn seteuid(&self, uid: Uid) -> CallResult {
        debug!("seteuid {}", uid);
        let attempt = Self::require("seteuid", self.caps.posix.seteuid(uid))?;
        Ok(unit_ret(attempt))
    }

    pub(super) fn setegid(&self, gid: Gid) -> CallResult {
        debug!("setegid {}", gid);
        let attempt = Self::require("setegid", self.caps.posix.setegid(gid))?;
        Ok(unit_ret(attempt))
    }

    pub(super) fn setgid(&self, gid: Gid) -> CallResult {
        debug!("setgid {}", gid);
        let attempt = Self::require("setgid", self.caps.posix.setgid(gid))?;
        Ok(unit_ret(attempt))
    }

    pub(super) fn setreuid(&self, ruid: Uid, euid: Uid) -> CallResult {
        debug!("setreuid {}:{}", ruid, euid);
        let attempt = Self::require("setreuid", self.caps.posix.setreuid(ruid, euid))?;
        Ok(unit_ret(attempt))
    }

    pub(super) fn setregid(&self, rgid: Gid, egid: Gid) -> CallResult {
        debug!("setregid {}:{}", rgid, egid);
        let attempt = Self::require("setregid", self.caps.posix.setregid(rgid, egid))?;
        Ok(unit_ret(attempt))
    }

    pub(super) fn setresuid(&self, ruid: Uid, euid: Uid, suid: Uid) -> CallResult {
        debug!("setresuid {}:{}:{}", ruid, euid, suid);
        let attempt = Self::require("setresuid", self.caps.posix.setresuid(ruid, euid, suid))?;
        Ok(unit_ret(attempt))
    }

    pub(super) fn setresgid(&self, rgid: Gid, egid: Gid, sgid: Gid) -> CallResult {
        debug!("setresgid {}:{}:{}", rgid, egid, sgid);
        let attempt = Self::require("setresgid", self.caps.posix.setresgid(rgid, egid, sgid))?;
        Ok(unit_ret(attempt))
    }

    /// Structured transfer: all three ids land in guest memory, or none do.
    pub(super) fn getresuid(&self, ruid_ptr: GuestPtr, euid_ptr: GuestPtr, suid_ptr: GuestPtr) -> CallResult {
        let ids = match Self::require("getresuid", self.caps.posix.getresuid())? {
            Ok(ids) => ids,
            Err(errno) => return Ok(errno.ret()),
        };
        for ptr in [ruid_ptr, euid_ptr, suid_ptr] {
            self.marshal.check_range(ptr, 4)?;
        }
        self.marshal.write_u32(ruid_ptr, ids.real)?;
        self.marshal.write_u32(euid_ptr, ids.effective)?;
        self.marshal.write_u32(suid_ptr, ids.saved)?;
        Ok(0)
    }

    pub(super) fn getresgid(&self, rgid_ptr: GuestPtr, egid_ptr: GuestPtr, sgid_ptr: GuestPtr) -> CallResult {
        let ids = match Self::require("getresgid", self.caps.posix.getresgid())? {
            Ok(ids) => ids,
            Err(errno) => return Ok(errno.ret()),
        };
        for ptr in [rgid_ptr, egid_ptr, sgid_ptr] {
            self.marshal.check_range(ptr, 4)?;
        }
        self.marshal.write_u32(rgid_ptr, ids.real)?;
        self.marshal.write_u32(egid_ptr, ids.effective)?;
        self.marshal.write_u32(sgid_ptr, ids.saved)?;
        Ok(0)
    }

    pub(super) fn execve(&self, path_ptr: GuestPtr, argv_ptr: GuestPtr, envp_ptr: GuestPtr) -> CallResult {
        let path = self.marshal.read_string(path_ptr)?;
        let argv = self.marshal.read_string_array(argv_ptr)?;
        let envp = self.marshal.read_string_array(envp_ptr)?;
        debug!("execve {:?} argv={:?}", path, argv);
        let attempt = Self::require(
            "execve",
            self.caps.posix.execve(Path::new(&path), &argv, &envp),
        )?;
        // reached only when the host refused to replace the image
        Ok(unit_ret(attempt))
    }
}
