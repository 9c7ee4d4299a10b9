/*!
 * Degradation Policy
 * What a call does when its capability is absent
 */

use serde::{Deserialize, Serialize};

/// Per-call degradation shape, carried as data on every dispatch-table
/// entry so the whole table can be audited and tested as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Absent capability substitutes a POSIX-plausible default (the
    /// single-user, single-process model). Guest programs expect these
    /// queries to always succeed.
    BenignDefault,

    /// Absent capability is fatal: faking the operation would change
    /// program correctness.
    RequireCapability,

    /// Absent capability quietly succeeds; a no-op is less disruptive than
    /// a failure for these.
    NoopWithoutCapability,

    /// Always fatal, on every tier. A policy decision about the host
    /// runtime's execution model, not a capability probe.
    PermanentlyUnsupported,

    /// Multi-field result written through out-pointers; the whole transfer
    /// happens or none of it does. Absence is fatal, as with
    /// `RequireCapability`.
    StructuredTransfer,
}

impl Policy {
    /// Whether a missing capability aborts the call under this policy.
    #[inline]
    #[must_use]
    pub const fn fatal_when_absent(self) -> bool {
        matches!(
            self,
            Policy::RequireCapability | Policy::PermanentlyUnsupported | Policy::StructuredTransfer
        )
    }
}
