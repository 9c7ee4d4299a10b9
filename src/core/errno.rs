/*!
 * POSIX Error Codes
 * Errno values as the guest's libc numbers them
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// A POSIX errno value, returned to the guest as its negation.
///
/// These are recoverable, expected-at-runtime failures. The fatal outcomes
/// (missing capability, out-of-bounds marshalling) never travel through this
/// type; they abort the call instead of returning a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Errno(pub i32);

impl Errno {
    pub const EPERM: Errno = Errno(1);
    pub const ENOENT: Errno = Errno(2);
    pub const ESRCH: Errno = Errno(3);
    pub const EIO: Errno = Errno(5);
    pub const EBADF: Errno = Errno(9);
    pub const EAGAIN: Errno = Errno(11);
    pub const EACCES: Errno = Errno(13);
    pub const EFAULT: Errno = Errno(14);
    pub const EINVAL: Errno = Errno(22);
    pub const ENOTTY: Errno = Errno(25);
    pub const ERANGE: Errno = Errno(34);
    pub const ENOSYS: Errno = Errno(38);

    /// The guest-visible return value for this error.
    #[inline]
    #[must_use]
    pub const fn ret(self) -> i32 {
        -self.0
    }

    /// Translate a host I/O failure into a guest errno.
    ///
    /// Unknown or non-OS errors collapse to EIO; the guest gets no detail
    /// beyond the code.
    #[must_use]
    pub fn from_io(err: &io::Error) -> Errno {
        match err.raw_os_error() {
            Some(code) if code > 0 => Errno(code),
            _ => Errno::EIO,
        }
    }
}

#[cfg(unix)]
impl From<nix::errno::Errno> for Errno {
    fn from(err: nix::errno::Errno) -> Self {
        Errno(err as i32)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "errno {}", self.0)
    }
}
