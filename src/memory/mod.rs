/*!
 * Memory Module
 * Guest linear memory access and the typed marshaller on top of it
 */

mod errors;
mod guest;
mod marshal;

pub use errors::MemoryFault;
pub use guest::{GuestAlloc, GuestMemory, SharedMemory};
pub use marshal::{Marshaller, Width};
