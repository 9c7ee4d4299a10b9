/*!
 * Guest Linear Memory
 * Bounds-checked byte access to the sandbox's address space
 */

use super::errors::MemoryFault;
use crate::core::GuestPtr;
use parking_lot::RwLock;

/// Byte-level view of a guest's linear memory.
///
/// Implementations adapt whatever the sandbox runtime exposes (a wasm
/// memory export, a mmap'd region, a plain buffer). All bounds checking
/// happens here; the marshaller on top only deals in typed values.
///
/// One instance belongs to exactly one sandbox context. Concurrent contexts
/// each bind their own memory and their own shim.
pub trait GuestMemory: Send + Sync {
    /// Current extent of the memory, in bytes.
    fn size(&self) -> usize;

    /// Copy `buf.len()` bytes starting at `at` out of guest memory.
    fn read_into(&self, at: GuestPtr, buf: &mut [u8]) -> Result<(), MemoryFault>;

    /// Copy `data` into guest memory starting at `at`.
    fn write_from(&self, at: GuestPtr, data: &[u8]) -> Result<(), MemoryFault>;
}

/// Allocation hook into the guest: given a byte count, returns the offset of
/// a fresh guest-owned buffer, or `None` if the guest heap is exhausted.
///
/// Wired to the guest's exported allocator by the embedder. Only calls that
/// hand the guest a new object (`getlogin`) need it.
pub type GuestAlloc = Box<dyn Fn(usize) -> Option<GuestPtr> + Send + Sync>;

#[inline]
fn check(at: GuestPtr, len: usize, size: usize) -> Result<usize, MemoryFault> {
    let at = at as usize;
    let end = at.checked_add(len);
    match end {
        Some(end) if end <= size => Ok(at),
        _ => Err(MemoryFault::OutOfBounds { at: at as GuestPtr, len, size }),
    }
}

/// Heap-backed linear memory.
///
/// Stands in for a real sandbox memory in tests and in embeddings that run
/// the guest against a plain buffer.
pub struct SharedMemory {
    bytes: RwLock<Vec<u8>>,
}

impl SharedMemory {
    /// Create a zeroed memory of `size` bytes.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            bytes: RwLock::new(vec![0; size]),
        }
    }

    /// Grow the memory to `size` bytes, zero-filling the new tail.
    ///
    /// Shrinking is not supported; a smaller `size` is ignored.
    pub fn grow(&self, size: usize) {
        let mut bytes = self.bytes.write();
        if size > bytes.len() {
            bytes.resize(size, 0);
        }
    }
}

impl GuestMemory for SharedMemory {
    fn size(&self) -> usize {
        self.bytes.read().len()
    }

    fn read_into(&self, at: GuestPtr, buf: &mut [u8]) -> Result<(), MemoryFault> {
        let bytes = self.bytes.read();
        let start = check(at, buf.len(), bytes.len())?;
        buf.copy_from_slice(&bytes[start..start + buf.len()]);
        Ok(())
    }

    fn write_from(&self, at: GuestPtr, data: &[u8]) -> Result<(), MemoryFault> {
        let mut bytes = self.bytes.write();
        let len = bytes.len();
        let start = check(at, data.len(), len)?;
        bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_round_trip() {
        let mem = SharedMemory::with_size(32);
        mem.write_from(4, b"abc").unwrap();
        let mut buf = [0u8; 3];
        mem.read_into(4, &mut buf).unwrap();
        assert_eq!(&buf, b"abc");
    }

    #[test]
    fn test_out_of_bounds_read_fails() {
        let mem = SharedMemory::with_size(8);
        let mut buf = [0u8; 4];
        let err = mem.read_into(6, &mut buf).unwrap_err();
        assert!(matches!(err, MemoryFault::OutOfBounds { at: 6, len: 4, size: 8 }));
    }

    #[test]
    fn test_offset_overflow_is_out_of_bounds() {
        let mem = SharedMemory::with_size(8);
        let err = mem.write_from(u32::MAX, &[1, 2]).unwrap_err();
        assert!(matches!(err, MemoryFault::OutOfBounds { .. }));
    }

    #[test]
    fn test_grow_never_shrinks() {
        let mem = SharedMemory::with_size(16);
        mem.grow(8);
        assert_eq!(mem.size(), 16);
        mem.grow(64);
        assert_eq!(mem.size(), 64);
    }
}
