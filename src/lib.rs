/*!
 * posix-shim
 * POSIX compatibility layer for guests in a sandboxed virtual machine
 *
 * A guest binary running inside a WebAssembly-style sandbox has no native
 * access to host memory, descriptors, or OS objects. This crate is the
 * explicitly marshalled boundary it talks through: scalar and string
 * arguments are decoded out of guest linear memory, host facilities are
 * reached through swappable capability providers, results are encoded back,
 * and hosts that cannot honor an operation degrade predictably into a
 * benign default, a POSIX error code, or a fatal not-implemented outcome
 * the embedder can tell apart from an errno.
 */

pub mod caps;
pub mod config;
pub mod core;
pub mod descriptors;
pub mod memory;
pub mod monitoring;
pub mod shim;
pub mod syscalls;

// Re-exports
pub use caps::{CapabilitySet, Tier};
pub use config::ShimConfig;
pub use crate::core::Errno;
pub use descriptors::{DescriptorEntry, DescriptorTable, HostResource};
pub use memory::{GuestMemory, Marshaller, MemoryFault, SharedMemory};
pub use monitoring::init_tracing;
pub use shim::{Shim, ShimBuilder};
pub use syscalls::{CallFault, CallResult, Policy, SyscallExecutor, SyscallTable};
