/*!
 * Capability Provider Traits
 * What the host can actually do, one optional operation at a time
 *
 * Every method models a single host operation that may or may not exist on
 * the current deployment tier. `None` means the operation is absent,
 * decided once at provider construction rather than discovered by a
 * failing call. Handlers check presence defensively and apply their per-call
 * degradation policy; they never assume.
 */

use crate::core::{Errno, Gid, Pid, ResGids, ResUids, Uid};
use crate::descriptors::HostResource;
use std::path::Path;

/// Outcome of an optional host operation: absent entirely (`None`), or
/// attempted with a host-side result.
pub type CapCall<T> = Option<Result<T, Errno>>;

/// Filesystem ownership and durability operations.
#[cfg_attr(test, mockall::automock)]
pub trait FsCaps: Send + Sync {
    fn chown(&self, _path: &Path, _uid: Uid, _gid: Gid) -> CapCall<()> {
        None
    }

    fn lchown(&self, _path: &Path, _uid: Uid, _gid: Gid) -> CapCall<()> {
        None
    }

    fn fchown(&self, _resource: &HostResource, _uid: Uid, _gid: Gid) -> CapCall<()> {
        None
    }

    /// Flush one descriptor's data to stable storage.
    fn fsync(&self, _resource: &HostResource) -> CapCall<()> {
        None
    }
}

/// Host platform introspection: hostname, scheduling priority, and the
/// resident user behind the process.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformCaps: Send + Sync {
    fn hostname(&self) -> Option<String> {
        None
    }

    /// Login name of the user the host process runs as.
    fn username(&self) -> Option<String> {
        None
    }

    /// Scheduling priority (nice value) of `pid`; 0 means the calling
    /// process.
    fn priority(&self, _pid: Pid) -> CapCall<i32> {
        None
    }

    fn set_priority(&self, _pid: Pid, _value: i32) -> CapCall<()> {
        None
    }
}

/// Identity of the process the guest believes it is: ids, parentage, and
/// group membership. Queries only: these always have a benign default, so
/// none of them can fail host-side.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityCaps: Send + Sync {
    fn uid(&self) -> Option<Uid> {
        None
    }

    fn gid(&self) -> Option<Gid> {
        None
    }

    fn euid(&self) -> Option<Uid> {
        None
    }

    fn egid(&self) -> Option<Gid> {
        None
    }

    fn pid(&self) -> Option<Pid> {
        None
    }

    fn ppid(&self) -> Option<Pid> {
        None
    }

    /// Supplementary groups, in host order.
    fn groups(&self) -> Option<Vec<Gid>> {
        None
    }
}

/// Extended POSIX surface: process groups, sessions, privilege
/// transitions, terminal names, and the alarm timer.
///
/// On worker tiers the privilege-transition subset is constructed absent:
/// host policy forbids identity mutation from a worker context, and the
/// shim must know that before the first call, not find out from a failure.
#[cfg_attr(test, mockall::automock)]
pub trait PosixExtCaps: Send + Sync {
    fn getpgid(&self, _pid: Pid) -> CapCall<Pid> {
        None
    }

    fn setpgid(&self, _pid: Pid, _pgid: Pid) -> CapCall<()> {
        None
    }

    fn getpgrp(&self) -> Option<Pid> {
        None
    }

    fn setsid(&self) -> CapCall<Pid> {
        None
    }

    fn getsid(&self, _pid: Pid) -> CapCall<Pid> {
        None
    }

    fn seteuid(&self, _uid: Uid) -> CapCall<()> {
        None
    }

    fn setegid(&self, _gid: Gid) -> CapCall<()> {
        None
    }

    fn setgid(&self, _gid: Gid) -> CapCall<()> {
        None
    }

    fn setreuid(&self, _ruid: Uid, _euid: Uid) -> CapCall<()> {
        None
    }

    fn setregid(&self, _rgid: Gid, _egid: Gid) -> CapCall<()> {
        None
    }

    fn getresuid(&self) -> CapCall<ResUids> {
        None
    }

    fn getresgid(&self) -> CapCall<ResGids> {
        None
    }

    fn setresuid(&self, _ruid: Uid, _euid: Uid, _suid: Uid) -> CapCall<()> {
        None
    }

    fn setresgid(&self, _rgid: Gid, _egid: Gid, _sgid: Gid) -> CapCall<()> {
        None
    }

    fn sethostname(&self, _name: &str) -> CapCall<()> {
        None
    }

    /// Name of the terminal behind a descriptor.
    fn ttyname(&self, _resource: &HostResource) -> CapCall<String> {
        None
    }

    /// Arm (or with 0, cancel) the alarm timer; returns seconds that were
    /// remaining on the previous timer.
    fn alarm(&self, _seconds: u32) -> Option<u32> {
        None
    }

    /// Replace the host process image. Only returns on failure.
    fn execve(&self, _path: &Path, _argv: &[String], _envp: &[String]) -> CapCall<()> {
        None
    }
}
