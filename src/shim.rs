/*!
 * Shim Facade
 * Builder and entry point the sandbox runtime embeds
 */

use crate::caps::CapabilitySet;
use crate::config::ShimConfig;
use crate::descriptors::DescriptorTable;
use crate::memory::{GuestAlloc, GuestMemory, Marshaller};
use crate::syscalls::{CallResult, Policy, SyscallExecutor, SyscallTable};
use log::info;
use std::sync::Arc;

/// A fully wired unistd-domain shim for one sandbox context.
///
/// Holds the dispatch table and, through it, everything the handlers close
/// over. One shim per guest instance; nothing here is shared across
/// contexts.
pub struct Shim {
    table: SyscallTable,
}

impl Shim {
    /// Start building a shim over a guest memory.
    #[must_use]
    pub fn builder(memory: Arc<dyn GuestMemory>) -> ShimBuilder {
        ShimBuilder {
            memory,
            config: None,
            caps: None,
            descriptors: None,
            alloc: None,
        }
    }

    /// Dispatch one guest call by name with its raw argument vector.
    pub fn call(&self, name: &str, args: &[i32]) -> CallResult {
        self.table.dispatch(name, args)
    }

    /// The underlying dispatch table.
    #[must_use]
    pub fn table(&self) -> &SyscallTable {
        &self.table
    }

    /// The descriptor table shared with the rest of the runtime.
    #[must_use]
    pub fn descriptors(&self) -> &Arc<DescriptorTable> {
        self.table.executor().descriptors()
    }

    /// Per-call policies, for diagnostics and contract tests.
    pub fn policies(&self) -> impl Iterator<Item = (&'static str, Policy)> + '_ {
        self.table.calls()
    }
}

/// Builder for [`Shim`].
///
/// Only the guest memory is mandatory. The capability set defaults to the
/// configured tier (environment-overridable), the descriptor table to one
/// seeded with the standard streams, and the guest allocator to absent
/// (which makes `getlogin` fatal-unsupported).
pub struct ShimBuilder {
    memory: Arc<dyn GuestMemory>,
    config: Option<ShimConfig>,
    caps: Option<CapabilitySet>,
    descriptors: Option<Arc<DescriptorTable>>,
    alloc: Option<GuestAlloc>,
}

impl ShimBuilder {
    #[must_use]
    pub fn config(mut self, config: ShimConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an explicit capability set instead of the tier default.
    #[must_use]
    pub fn capabilities(mut self, caps: CapabilitySet) -> Self {
        self.caps = Some(caps);
        self
    }

    /// Share an existing descriptor table (the file-I/O domain owns
    /// open/close but both domains consult the same instance).
    #[must_use]
    pub fn descriptors(mut self, table: Arc<DescriptorTable>) -> Self {
        self.descriptors = Some(table);
        self
    }

    /// Wire the guest's exported allocator, enabling `getlogin`.
    #[must_use]
    pub fn guest_alloc(mut self, alloc: GuestAlloc) -> Self {
        self.alloc = Some(alloc);
        self
    }

    #[must_use]
    pub fn build(self) -> Shim {
        let config = self.config.unwrap_or_else(ShimConfig::from_env);
        let caps = self
            .caps
            .unwrap_or_else(|| CapabilitySet::for_tier(config.tier));
        let descriptors = self
            .descriptors
            .unwrap_or_else(|| Arc::new(DescriptorTable::with_stdio()));
        let executor = SyscallExecutor::new(
            Marshaller::new(self.memory),
            caps,
            descriptors,
            self.alloc,
        );
        let table = SyscallTable::unistd(Arc::new(executor));
        info!("posix shim initialized: tier={:?}, {} calls", config.tier, table.len());
        Shim { table }
    }
}
