//! Property-based tests using proptest
//!
//! Round trips for every scalar width and for fixed-size arrays, plus failure
//! injection at every position of a write and read chain.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use binary_io::core::scalar::Scalar;
use binary_io::{BufferSink, BufferSource, IoError, Reader, Result, Sink, Source, Writer};
use bytes::BytesMut;
use proptest::prelude::*;

fn round_trip<T: Scalar + PartialEq + std::fmt::Debug>(value: T) -> T {
    let mut buffer = BytesMut::new();
    let mut sink = BufferSink::new(&mut buffer);
    assert!(Writer::new(&mut sink).write(value).is_ok());
    assert_eq!(buffer.len(), T::SIZE);

    let mut source = BufferSource::new(&buffer);
    let mut out = T::default();
    assert!(Reader::new(&mut source).read(&mut out).is_ok());
    out
}

#[test]
fn test_boundary_values_round_trip() {
    for v in [0u8, u8::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0i8, i8::MIN, i8::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0u16, u16::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0i16, i16::MIN, i16::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0u32, u32::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0i32, i32::MIN, i32::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0u64, u64::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0i64, i64::MIN, i64::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0.0f32, f32::MIN, f32::MAX] {
        assert_eq!(round_trip(v), v);
    }
    for v in [0.0f64, f64::MIN, f64::MAX] {
        assert_eq!(round_trip(v), v);
    }
    assert!(round_trip(true));
    assert!(!round_trip(false));
}

proptest! {
    #[test]
    fn prop_u64_round_trip(value in any::<u64>()) {
        prop_assert_eq!(round_trip(value), value);
    }

    #[test]
    fn prop_i32_round_trip(value in any::<i32>()) {
        prop_assert_eq!(round_trip(value), value);
    }

    #[test]
    fn prop_fixed_array_round_trip(
        values in prop::collection::vec(any::<u32>(), 0..8),
    ) {
        // Trailing default slots must survive like any other value.
        let mut slots = [0u32; 16];
        slots[..values.len()].copy_from_slice(&values);

        let mut buffer = BytesMut::new();
        let mut sink = BufferSink::new(&mut buffer);
        prop_assert!(Writer::new(&mut sink).write_range(&slots).is_ok());
        prop_assert_eq!(buffer.len(), 64);

        let mut source = BufferSource::new(&buffer);
        let mut out = [0xFFFF_FFFFu32; 16];
        prop_assert!(Reader::new(&mut source).read_range(&mut out).is_ok());
        prop_assert_eq!(out, slots);
    }
}

/// Sink that rejects the `fail_at`-th write call (zero based) and counts calls.
struct FaultySink {
    data: Vec<u8>,
    fail_at: usize,
    calls: usize,
}

impl Sink for FaultySink {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let call = self.calls;
        self.calls += 1;
        if call == self.fail_at {
            return Err(IoError::TransportError("injected".into()));
        }
        self.data.extend_from_slice(data);
        Ok(data.len())
    }

    fn overwrite(&mut self, _offset: usize, _data: &[u8]) -> Result<usize> {
        Ok(0)
    }

    fn position(&self) -> usize {
        self.data.len()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

const CHAIN_LEN: usize = 6;

fn write_chain(writer: &mut Writer<'_, FaultySink>) {
    writer
        .write(1u8)
        .write(2u16)
        .write(3u32)
        .write(4u64)
        .write_range(&[5u16, 6u16])
        .write_bytes(b"end");
}

const CHAIN_WIDTHS: [usize; CHAIN_LEN] = [1, 2, 4, 8, 4, 3];

proptest! {
    #[test]
    fn prop_write_failure_suppresses_later_calls(fail_at in 0..CHAIN_LEN) {
        let mut sink = FaultySink { data: Vec::new(), fail_at, calls: 0 };
        let mut writer = Writer::new(&mut sink);
        write_chain(&mut writer);
        prop_assert!(!writer.is_ok());

        // Only the failing call reached the sink after the successful prefix.
        prop_assert_eq!(sink.calls, fail_at + 1);
        let prefix: usize = CHAIN_WIDTHS[..fail_at].iter().sum();
        prop_assert_eq!(sink.data.len(), prefix);
    }

    #[test]
    fn prop_read_failure_suppresses_later_calls(available in 0usize..22) {
        let mut full = BytesMut::new();
        let mut sink = BufferSink::new(&mut full);
        Writer::new(&mut sink)
            .write(1u8)
            .write(2u16)
            .write(3u32)
            .write(4u64)
            .write_range(&[5u16, 6u16])
            .write_bytes(b"end");
        prop_assert_eq!(full.len(), 22);

        let mut source = BufferSource::new(&full[..available]);
        let mut reader = Reader::new(&mut source);
        let (mut a, mut b, mut c, mut d) = (0xAAu8, 0xAAAAu16, 0xAAAA_AAAAu32, u64::MAX);
        let mut e = [0u16; 2];
        let mut tail = [0u8; 3];
        reader
            .read(&mut a)
            .read(&mut b)
            .read(&mut c)
            .read(&mut d)
            .read_range(&mut e)
            .read_bytes(&mut tail);
        prop_assert!(!reader.is_ok());

        // Find the first element that did not fit and check nothing after it changed.
        let mut offset = 0;
        let mut failed_index = CHAIN_LEN;
        for (index, width) in CHAIN_WIDTHS.iter().enumerate() {
            if offset + width > available {
                failed_index = index;
                break;
            }
            offset += width;
        }
        if failed_index == 0 { prop_assert_eq!(a, 0xAA); } else { prop_assert_eq!(a, 1); }
        if failed_index <= 1 { prop_assert_eq!(b, 0xAAAA); } else { prop_assert_eq!(b, 2); }
        if failed_index <= 2 { prop_assert_eq!(c, 0xAAAA_AAAA); } else { prop_assert_eq!(c, 3); }
        if failed_index <= 3 { prop_assert_eq!(d, u64::MAX); } else { prop_assert_eq!(d, 4); }
        if failed_index < 5 { prop_assert_eq!(tail, [0u8; 3]); }
        prop_assert_eq!(source.position(), available);
    }
}
