/*!
 * Core Module
 * Shared primitive types and errno codes
 */

mod errno;
pub mod types;

pub use errno::Errno;
pub use types::{Fd, Gid, GuestPtr, Pid, ResGids, ResUids, Uid};
