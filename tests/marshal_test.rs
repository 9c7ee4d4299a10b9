/*!
 * Marshaller Tests
 * Round-trip and fault properties of the guest memory codec
 */

use posix_shim::memory::Width;
use posix_shim::{GuestMemory, Marshaller, MemoryFault, SharedMemory};
use proptest::prelude::*;
use std::sync::Arc;

fn marshaller(size: usize) -> Marshaller {
    Marshaller::new(Arc::new(SharedMemory::with_size(size)) as Arc<dyn GuestMemory>)
}

#[test]
fn test_out_of_bounds_never_partially_applies() {
    let m = marshaller(8);
    // a write that straddles the boundary must leave memory untouched
    assert!(m.write_string("abcdefgh", 4, 8).is_err());
    for at in 0..8 {
        assert_eq!(m.read_scalar(at, Width::U8).unwrap(), 0, "byte {}", at);
    }
}

#[test]
fn test_scalar_widths_do_not_bleed() {
    let m = marshaller(32);
    m.write_scalar(0, Width::U64, u64::MAX).unwrap();
    m.write_scalar(0, Width::U16, 0).unwrap();
    // only the low two bytes were overwritten
    assert_eq!(m.read_scalar(0, Width::U64).unwrap(), u64::MAX << 16);
}

#[test]
fn test_string_array_rejects_wild_pointer() {
    let m = marshaller(64);
    m.write_u32(0, 0xffff_0000).unwrap();
    assert!(matches!(
        m.read_string_array(0),
        Err(MemoryFault::OutOfBounds { .. })
    ));
}

proptest! {
    #[test]
    fn prop_string_round_trips_when_it_fits(s in "[ -~]{0,40}") {
        let m = marshaller(128);
        let written = m.write_string(&s, 8, 64).unwrap();
        prop_assert_eq!(written, s.len() + 1);
        prop_assert_eq!(m.read_string(8).unwrap(), s);
    }

    #[test]
    fn prop_string_truncates_to_exactly_capacity(s in "[ -~]{8,40}", cap in 1usize..8) {
        let m = marshaller(128);
        let written = m.write_string(&s, 0, cap).unwrap();
        prop_assert_eq!(written, cap);
        let back = m.read_string(0).unwrap();
        prop_assert_eq!(back.as_bytes(), &s.as_bytes()[..cap - 1]);
    }

    #[test]
    fn prop_scalar_round_trips(value: u64, at in 0u32..56) {
        let m = marshaller(64);
        m.write_scalar(at, Width::U64, value).unwrap();
        prop_assert_eq!(m.read_scalar(at, Width::U64).unwrap(), value);
    }

    #[test]
    fn prop_reads_outside_memory_always_fault(at in 64u32..2048, len in 1usize..16) {
        let m = marshaller(64);
        prop_assert!(m.check_range(at, len).is_err());
        prop_assert!(m.read_scalar(at, Width::U8).is_err());
    }
}
