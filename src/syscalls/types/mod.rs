/*!
 * Syscall Types
 * Result and fault types for the dispatch boundary
 */

mod errors;

pub use errors::CallFault;

/// What a handler hands back across the boundary.
///
/// `Ok(n)` is the guest-visible integer: zero or a positive count on
/// success, a negated errno on recoverable failure. `Err` carries the
/// fatal outcomes that must not be confused with an errno.
pub type CallResult = Result<i32, CallFault>;
