/*!
 * Call Fault Types
 * Fatal outcomes that abort a syscall instead of returning a code
 */

use crate::memory::MemoryFault;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A syscall outcome the guest never sees as an integer.
///
/// Deliberately distinct from a POSIX error return: the embedding runtime
/// must be able to tell "the call failed" (negative errno, guest handles
/// it) from "the call cannot exist here" or "the ABI was violated" (these),
/// and choose to kill the guest call or surface a diagnostic.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "fault_type", content = "details")]
#[non_exhaustive]
pub enum CallFault {
    /// The operation cannot be faithfully emulated on this host tier
    #[error("{call} is not implemented on this host tier")]
    #[diagnostic(
        code(syscall::not_implemented),
        help("The capability behind this call is absent here. Run under a fuller tier, or treat the guest program as incompatible with this deployment.")
    )]
    NotImplemented { call: String },

    /// Marshalling hit memory the guest does not have
    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryFault),

    /// The guest passed the wrong number of arguments
    #[error("{call}: expected {expected} arguments, got {got}")]
    #[diagnostic(
        code(syscall::bad_arity),
        help("Argument-count mismatch between the guest binary and the shim's call table. The binary was likely built against a different ABI.")
    )]
    BadArity {
        call: String,
        expected: usize,
        got: usize,
    },

    /// No entry in the dispatch table under that name
    #[error("unknown syscall {call:?}")]
    #[diagnostic(
        code(syscall::unknown),
        help("The guest imported a function this domain does not provide.")
    )]
    Unknown { call: String },
}

impl CallFault {
    #[inline]
    pub fn not_implemented(call: impl Into<String>) -> Self {
        Self::NotImplemented { call: call.into() }
    }

    /// Whether this fault is the permanent/absent-capability kind (as
    /// opposed to an ABI violation).
    #[inline]
    #[must_use]
    pub const fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_helpers() {
        let fault = CallFault::not_implemented("fork");
        assert!(fault.is_not_implemented());
        assert_eq!(fault.to_string(), "fork is not implemented on this host tier");
    }

    #[test]
    fn test_memory_fault_converts() {
        let fault: CallFault = MemoryFault::Unterminated { at: 16 }.into();
        assert!(!fault.is_not_implemented());
        assert!(matches!(fault, CallFault::Memory(_)));
    }

    #[test]
    fn test_fault_serialization_round_trips() {
        let fault = CallFault::BadArity {
            call: "chown".into(),
            expected: 3,
            got: 1,
        };
        let json = serde_json::to_string(&fault).unwrap();
        let back: CallFault = serde_json::from_str(&json).unwrap();
        assert_eq!(fault, back);
    }
}
