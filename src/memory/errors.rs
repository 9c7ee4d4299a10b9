/*!
 * Marshalling Faults
 * Out-of-bounds and malformed guest memory conditions
 */

use crate::core::GuestPtr;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A guest linear-memory access the marshaller refused or could not finish.
///
/// Every variant is fatal to the syscall that triggered it: a fault here
/// means the guest and host disagree about the ABI, and no partial result is
/// ever left behind in guest memory.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "fault", content = "details")]
#[non_exhaustive]
pub enum MemoryFault {
    /// Access past the end of guest linear memory
    #[error("out-of-bounds guest access: {len} bytes at 0x{at:08x}, memory is {size} bytes")]
    #[diagnostic(
        code(memory::out_of_bounds),
        help("The guest passed a pointer outside its linear memory. This is an ABI violation, not a recoverable error.")
    )]
    OutOfBounds {
        at: GuestPtr,
        len: usize,
        size: usize,
    },

    /// A NUL terminator was never found before the end of memory
    #[error("unterminated string at 0x{at:08x}")]
    #[diagnostic(
        code(memory::unterminated_string),
        help("Expected a NUL-terminated string but scanned to the end of guest memory.")
    )]
    Unterminated { at: GuestPtr },

    /// The guest-side allocator refused a request
    #[error("guest allocation of {len} bytes failed")]
    #[diagnostic(
        code(memory::alloc_failed),
        help("The guest's exported allocator returned null. The guest heap may be exhausted.")
    )]
    AllocFailed { len: usize },
}
