/*!
 * Core Types
 * Common types shared across the shim
 */

/// Process ID as the guest ABI sees it (`pid_t`)
pub type Pid = i32;

/// Guest-visible file descriptor type
pub type Fd = i32;

/// Real or effective user ID (`uid_t`)
pub type Uid = u32;

/// Real or effective group ID (`gid_t`)
pub type Gid = u32;

/// An offset into guest linear memory
///
/// The guest ABI uses fixed-width 32-bit pointers; every pointer argument a
/// syscall receives is one of these.
pub type GuestPtr = u32;

/// Resolved real/effective/saved user ID triple (`getresuid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResUids {
    pub real: Uid,
    pub effective: Uid,
    pub saved: Uid,
}

/// Resolved real/effective/saved group ID triple (`getresgid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResGids {
    pub real: Gid,
    pub effective: Gid,
    pub saved: Gid,
}
