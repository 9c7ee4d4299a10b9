/*!
 * Native Capability Backends
 * Full-host and worker tiers, backed by the real OS
 */

use super::traits::{CapCall, FsCaps, IdentityCaps, PlatformCaps, PosixExtCaps};
use crate::core::{Errno, Gid, Pid, Uid};
use crate::descriptors::HostResource;
use nix::unistd;
use std::ffi::CString;
use std::fs::File;
use std::io;
use std::path::Path;

#[cfg(any(target_os = "linux", target_os = "freebsd"))]
use crate::core::{ResGids, ResUids};

#[inline]
fn host_err(err: io::Error) -> Errno {
    Errno::from_io(&err)
}

/// Ownership and sync against the host filesystem.
pub struct NativeFs;

impl NativeFs {
    fn chown_resource(
        resource: &HostResource,
        uid: Uid,
        gid: Gid,
    ) -> Result<(), Errno> {
        use std::os::unix::fs::fchown;
        match resource {
            HostResource::File(file) => fchown(file, Some(uid), Some(gid)).map_err(host_err),
            HostResource::Stdin => fchown(&io::stdin(), Some(uid), Some(gid)).map_err(host_err),
            HostResource::Stdout => fchown(&io::stdout(), Some(uid), Some(gid)).map_err(host_err),
            HostResource::Stderr => fchown(&io::stderr(), Some(uid), Some(gid)).map_err(host_err),
            HostResource::Virtual => Err(Errno::EBADF),
        }
    }

    fn sync_file(file: &File) -> Result<(), Errno> {
        file.sync_all().map_err(host_err)
    }
}

impl FsCaps for NativeFs {
    fn chown(&self, path: &Path, uid: Uid, gid: Gid) -> CapCall<()> {
        Some(std::os::unix::fs::chown(path, Some(uid), Some(gid)).map_err(host_err))
    }

    fn lchown(&self, path: &Path, uid: Uid, gid: Gid) -> CapCall<()> {
        Some(std::os::unix::fs::lchown(path, Some(uid), Some(gid)).map_err(host_err))
    }

    fn fchown(&self, resource: &HostResource, uid: Uid, gid: Gid) -> CapCall<()> {
        Some(Self::chown_resource(resource, uid, gid))
    }

    fn fsync(&self, resource: &HostResource) -> CapCall<()> {
        match resource {
            HostResource::File(file) => Some(Self::sync_file(file)),
            // streams and guest-virtual fds have nothing durable behind them
            _ => Some(Ok(())),
        }
    }
}

/// Hostname, priority, and resident-user lookup on a real OS.
pub struct NativePlatform;

impl PlatformCaps for NativePlatform {
    fn hostname(&self) -> Option<String> {
        unistd::gethostname()
            .ok()
            .map(|name| name.to_string_lossy().into_owned())
    }

    fn username(&self) -> Option<String> {
        unistd::User::from_uid(unistd::getuid())
            .ok()
            .flatten()
            .map(|user| user.name)
    }

    fn priority(&self, pid: Pid) -> CapCall<i32> {
        nix::errno::Errno::clear();
        // getpriority legitimately returns -1, so errno is the only signal
        let value = unsafe {
            nix::libc::getpriority(nix::libc::PRIO_PROCESS as _, pid as nix::libc::id_t)
        };
        if value == -1 && nix::errno::Errno::last_raw() != 0 {
            return Some(Err(Errno::from(nix::errno::Errno::last())));
        }
        Some(Ok(value as i32))
    }

    fn set_priority(&self, pid: Pid, value: i32) -> CapCall<()> {
        let rc = unsafe {
            nix::libc::setpriority(
                nix::libc::PRIO_PROCESS as _,
                pid as nix::libc::id_t,
                value as nix::libc::c_int,
            )
        };
        if rc == -1 {
            return Some(Err(Errno::from(nix::errno::Errno::last())));
        }
        Some(Ok(()))
    }
}

/// Real process identity of the host process.
pub struct NativeIdentity;

impl IdentityCaps for NativeIdentity {
    fn uid(&self) -> Option<Uid> {
        Some(unistd::getuid().as_raw())
    }

    fn gid(&self) -> Option<Gid> {
        Some(unistd::getgid().as_raw())
    }

    fn euid(&self) -> Option<Uid> {
        Some(unistd::geteuid().as_raw())
    }

    fn egid(&self) -> Option<Gid> {
        Some(unistd::getegid().as_raw())
    }

    fn pid(&self) -> Option<Pid> {
        Some(unistd::getpid().as_raw())
    }

    fn ppid(&self) -> Option<Pid> {
        Some(unistd::getppid().as_raw())
    }

    #[cfg(not(target_vendor = "apple"))]
    fn groups(&self) -> Option<Vec<Gid>> {
        unistd::getgroups()
            .ok()
            .map(|groups| groups.into_iter().map(|g| g.as_raw()).collect())
    }
}

/// Process-group, session, privilege, and terminal operations.
///
/// `worker()` constructs the same surface minus the privilege-transition
/// subset: the host forbids identity mutation from worker contexts, so
/// those operations are absent from the start rather than failing later.
pub struct NativePosixExt {
    restricted: bool,
}

impl NativePosixExt {
    /// Full-privilege process context.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self { restricted: false }
    }

    /// Worker execution context: identity mutation statically absent.
    #[must_use]
    pub fn worker() -> Self {
        Self { restricted: true }
    }

    #[inline]
    fn raw_fd(resource: &HostResource) -> Option<std::os::fd::RawFd> {
        use std::os::fd::AsRawFd;
        match resource {
            HostResource::File(file) => Some(file.as_raw_fd()),
            HostResource::Stdin => Some(io::stdin().as_raw_fd()),
            HostResource::Stdout => Some(io::stdout().as_raw_fd()),
            HostResource::Stderr => Some(io::stderr().as_raw_fd()),
            HostResource::Virtual => None,
        }
    }
}

fn tty_of(fd: std::os::fd::RawFd) -> Result<String, Errno> {
    let mut buf = vec![0u8; 256];
    // ttyname_r reports its errno in the return value
    let rc = unsafe {
        nix::libc::ttyname_r(fd, buf.as_mut_ptr() as *mut nix::libc::c_char, buf.len())
    };
    if rc != 0 {
        return Err(Errno(rc));
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

impl PosixExtCaps for NativePosixExt {
    fn getpgid(&self, pid: Pid) -> CapCall<Pid> {
        Some(
            unistd::getpgid(Some(unistd::Pid::from_raw(pid)))
                .map(|pgid| pgid.as_raw())
                .map_err(Errno::from),
        )
    }

    fn setpgid(&self, pid: Pid, pgid: Pid) -> CapCall<()> {
        Some(
            unistd::setpgid(unistd::Pid::from_raw(pid), unistd::Pid::from_raw(pgid))
                .map_err(Errno::from),
        )
    }

    fn getpgrp(&self) -> Option<Pid> {
        Some(unistd::getpgrp().as_raw())
    }

    fn setsid(&self) -> CapCall<Pid> {
        Some(unistd::setsid().map(|sid| sid.as_raw()).map_err(Errno::from))
    }

    fn getsid(&self, pid: Pid) -> CapCall<Pid> {
        Some(
            unistd::getsid(Some(unistd::Pid::from_raw(pid)))
                .map(|sid| sid.as_raw())
                .map_err(Errno::from),
        )
    }

    fn seteuid(&self, uid: Uid) -> CapCall<()> {
        if self.restricted {
            return None;
        }
        Some(unistd::seteuid(unistd::Uid::from_raw(uid)).map_err(Errno::from))
    }

    fn setegid(&self, gid: Gid) -> CapCall<()> {
        if self.restricted {
            return None;
        }
        Some(unistd::setegid(unistd::Gid::from_raw(gid)).map_err(Errno::from))
    }

    fn setgid(&self, gid: Gid) -> CapCall<()> {
        if self.restricted {
            return None;
        }
        Some(unistd::setgid(unistd::Gid::from_raw(gid)).map_err(Errno::from))
    }

    fn setreuid(&self, ruid: Uid, euid: Uid) -> CapCall<()> {
        if self.restricted {
            return None;
        }
        let rc = unsafe {
            nix::libc::setreuid(ruid as nix::libc::uid_t, euid as nix::libc::uid_t)
        };
        Some(nix::errno::Errno::result(rc).map(drop).map_err(Errno::from))
    }

    fn setregid(&self, rgid: Gid, egid: Gid) -> CapCall<()> {
        if self.restricted {
            return None;
        }
        let rc = unsafe {
            nix::libc::setregid(rgid as nix::libc::gid_t, egid as nix::libc::gid_t)
        };
        Some(nix::errno::Errno::result(rc).map(drop).map_err(Errno::from))
    }

    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
    fn getresuid(&self) -> CapCall<ResUids> {
        Some(
            unistd::getresuid()
                .map(|ids| ResUids {
                    real: ids.real.as_raw(),
                    effective: ids.effective.as_raw(),
                    saved: ids.saved.as_raw(),
                })
                .map_err(Errno::from),
        )
    }

    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
    fn getresgid(&self) -> CapCall<ResGids> {
        Some(
            unistd::getresgid()
                .map(|ids| ResGids {
                    real: ids.real.as_raw(),
                    effective: ids.effective.as_raw(),
                    saved: ids.saved.as_raw(),
                })
                .map_err(Errno::from),
        )
    }

    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
    fn setresuid(&self, ruid: Uid, euid: Uid, suid: Uid) -> CapCall<()> {
        if self.restricted {
            return None;
        }
        Some(
            unistd::setresuid(
                unistd::Uid::from_raw(ruid),
                unistd::Uid::from_raw(euid),
                unistd::Uid::from_raw(suid),
            )
            .map_err(Errno::from),
        )
    }

    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
    fn setresgid(&self, rgid: Gid, egid: Gid, sgid: Gid) -> CapCall<()> {
        if self.restricted {
            return None;
        }
        Some(
            unistd::setresgid(
                unistd::Gid::from_raw(rgid),
                unistd::Gid::from_raw(egid),
                unistd::Gid::from_raw(sgid),
            )
            .map_err(Errno::from),
        )
    }

    fn sethostname(&self, name: &str) -> CapCall<()> {
        Some(unistd::sethostname(name).map_err(Errno::from))
    }

    fn ttyname(&self, resource: &HostResource) -> CapCall<String> {
        match Self::raw_fd(resource) {
            Some(fd) => Some(tty_of(fd)),
            None => Some(Err(Errno::ENOTTY)),
        }
    }

    fn alarm(&self, seconds: u32) -> Option<u32> {
        let remaining = if seconds == 0 {
            unistd::alarm::cancel()
        } else {
            unistd::alarm::set(seconds)
        };
        Some(remaining.unwrap_or(0))
    }

    fn execve(&self, path: &Path, argv: &[String], envp: &[String]) -> CapCall<()> {
        if self.restricted {
            return None;
        }
        Some(exec_image(path, argv, envp))
    }
}

fn exec_image(path: &Path, argv: &[String], envp: &[String]) -> Result<(), Errno> {
    let to_cstrings = |items: &[String]| -> Result<Vec<CString>, Errno> {
        items
            .iter()
            .map(|s| CString::new(s.as_bytes()).map_err(|_| Errno::EINVAL))
            .collect()
    };
    let path = CString::new(path.as_os_str().as_encoded_bytes()).map_err(|_| Errno::EINVAL)?;
    let argv = to_cstrings(argv)?;
    let envp = to_cstrings(envp)?;
    match unistd::execve(&path, &argv, &envp) {
        // execve only returns on failure
        Ok(_) => Ok(()),
        Err(err) => Err(Errno::from(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_queries_present_on_native() {
        let ids = NativeIdentity;
        assert!(ids.uid().is_some());
        assert!(ids.pid().is_some());
        assert!(ids.ppid().is_some());
    }

    #[test]
    fn test_worker_tier_hides_privilege_transitions() {
        let ext = NativePosixExt::worker();
        assert!(ext.seteuid(0).is_none());
        assert!(ext.setgid(0).is_none());
        assert!(ext.setreuid(0, 0).is_none());
        assert!(ext.execve(Path::new("/bin/true"), &[], &[]).is_none());
        // reads stay available in a worker
        assert!(ext.getpgrp().is_some());
    }

    #[test]
    fn test_platform_resolves_hostname_and_priority() {
        let platform = NativePlatform;
        assert!(platform.hostname().is_some());
        // own process priority must resolve
        assert!(matches!(platform.priority(0), Some(Ok(_))));
    }

    #[test]
    fn test_fchown_virtual_is_bad_descriptor() {
        let fs = NativeFs;
        assert_eq!(
            fs.fchown(&HostResource::Virtual, 0, 0),
            Some(Err(Errno::EBADF))
        );
    }
}
