/*!
 * Syscall Executor
 * Shared state every handler in the domain closes over
 */

use crate::caps::CapabilitySet;
use crate::core::{Errno, Fd, GuestPtr};
use crate::descriptors::{DescriptorEntry, DescriptorTable};
use crate::memory::{GuestAlloc, Marshaller};
use crate::syscalls::types::CallFault;
use arc_swap::ArcSwapOption;
use log::warn;
use std::sync::Arc;

/// Login name resolved once per shim instance, plus the guest offset it was
/// published at. Invalidated only by tearing the shim down.
pub(super) struct ResolvedLogin {
    pub name: String,
    pub at: GuestPtr,
}

/// Executes the unistd-domain calls.
///
/// Owns nothing exclusively except the login cache: memory, capability set
/// and descriptor table are shared with the rest of the sandbox runtime.
/// One executor per sandbox context.
pub struct SyscallExecutor {
    pub(super) marshal: Marshaller,
    pub(super) caps: CapabilitySet,
    pub(super) descriptors: Arc<DescriptorTable>,
    pub(super) login: ArcSwapOption<ResolvedLogin>,
    pub(super) alloc: Option<GuestAlloc>,
}

impl SyscallExecutor {
    #[must_use]
    pub fn new(
        marshal: Marshaller,
        caps: CapabilitySet,
        descriptors: Arc<DescriptorTable>,
        alloc: Option<GuestAlloc>,
    ) -> Self {
        Self {
            marshal,
            caps,
            descriptors,
            login: ArcSwapOption::empty(),
            alloc,
        }
    }

    #[must_use]
    pub fn descriptors(&self) -> &Arc<DescriptorTable> {
        &self.descriptors
    }

    #[must_use]
    pub fn marshaller(&self) -> &Marshaller {
        &self.marshal
    }

    /// Resolve a guest fd or produce the bad-descriptor errno. Guests probe
    /// invalid descriptors routinely; this is never fatal.
    pub(super) fn entry(&self, call: &'static str, fd: Fd) -> Result<Arc<DescriptorEntry>, Errno> {
        self.descriptors.lookup(fd).ok_or_else(|| {
            warn!("{}: bad file descriptor {}", call, fd);
            Errno::EBADF
        })
    }

    /// Unwrap a capability probe under the require-or-fatal policy.
    pub(super) fn require<T>(call: &'static str, probed: Option<T>) -> Result<T, CallFault> {
        probed.ok_or_else(|| CallFault::not_implemented(call))
    }
}

/// Collapse a host-side unit result into the guest return convention.
#[inline]
pub(super) fn unit_ret(result: Result<(), Errno>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(errno) => errno.ret(),
    }
}
