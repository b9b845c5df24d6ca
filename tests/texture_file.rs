//! Integration tests for the htex file codec over stream-backed sinks and sources

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use binary_io::tex::pre_header::{load_pre_header, PreHeader, FILE_SIGNATURE};
use binary_io::tex::v1_0::{self, mip_chain_length, Compression, Header, MAX_MIP_COUNT};
use binary_io::tex::{load_texture_header, TextureHeader};
use binary_io::{BufferSource, IoError, Reader, Source, StreamSink, StreamSource};
use std::fs::{self, File, OpenOptions};
use std::io::Cursor;

fn sample_header() -> Header {
    Header {
        compression: Compression::NotCompressed,
        has_mips: mip_chain_length(4, 2).is_some(),
        width: 4,
        height: 2,
        ..Header::default()
    }
}

#[test]
fn test_texture_round_trip_through_file() {
    let path = std::env::temp_dir().join(format!("binary-io-{}.htex", std::process::id()));
    let level0: Vec<u8> = (0..24).collect();
    let level1: Vec<u8> = vec![0xAB; 6];

    let mut header = sample_header();
    {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&path)
            .expect("create temp file");
        let mut sink = StreamSink::new(file).unwrap();
        v1_0::save_texture(&mut sink, &mut header, &[&level0[..], &level1[..]]).unwrap();
    }

    let file = File::open(&path).expect("open temp file");
    let mut source = StreamSource::new(file).unwrap();
    let mut reader = Reader::new(&mut source);

    let TextureHeader::V1_0(loaded) = load_texture_header(&mut reader).unwrap();
    assert_eq!(loaded, header);
    assert!(loaded.has_mips);
    assert_eq!(loaded.mip_count(), 2);
    assert_eq!(loaded.mip_offsets[0], 142);
    assert_eq!(loaded.mip_lengths[1], 6);
    assert!(loaded.mip_offsets[2..].iter().all(|&o| o == 0));

    assert_eq!(v1_0::read_mip(&mut reader, &loaded, 0).unwrap(), level0);
    assert_eq!(v1_0::read_mip(&mut reader, &loaded, 1).unwrap(), level1);
    assert_eq!(reader.source().size(), Some(142 + 30));

    drop(reader);
    drop(source);
    fs::remove_file(&path).ok();
}

#[test]
fn test_header_bytes_are_little_endian() {
    let mut sink = StreamSink::new(Cursor::new(Vec::new())).unwrap();
    let mut header = Header {
        width: 0x0102,
        height: 0x0304,
        ..Header::default()
    };
    v1_0::save_texture(&mut sink, &mut header, &[&[0u8; 1][..]]).unwrap();
    let bytes = sink.into_inner().into_inner();

    assert_eq!(&bytes[0..4], b"HTEX");
    assert_eq!(&bytes[4..8], &[0x00, 0x01, 0x00, 0x00]);
    assert_eq!(bytes[8], 0); // compression
    assert_eq!(bytes[9], 0); // has mips
    assert_eq!(&bytes[10..14], &[0x02, 0x01, 0x04, 0x03]);
    assert_eq!(&bytes[14..18], &142u32.to_le_bytes());
    assert_eq!(&bytes[14 + 4 * MAX_MIP_COUNT..18 + 4 * MAX_MIP_COUNT], &1u32.to_le_bytes());
}

#[test]
fn test_bad_magic_keeps_default_version() {
    let mut data = Vec::new();
    data.extend_from_slice(b"BM6\0");
    data.extend_from_slice(&0x0100u32.to_le_bytes());

    let mut source = BufferSource::new(&data);
    let mut reader = Reader::new(&mut source);
    let mut pre_header = PreHeader {
        signature: FILE_SIGNATURE,
        version: 0x7777,
    };

    match load_pre_header(&mut pre_header, &mut reader) {
        Err(IoError::InvalidSignature { expected, .. }) => assert_eq!(expected, FILE_SIGNATURE),
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(pre_header.version, 0x7777);
}

#[test]
fn test_three_reads_over_six_bytes() {
    let data = [1u8, 0, 0, 0, 2, 0];
    let mut source = BufferSource::new(&data);
    let mut reader = Reader::new(&mut source);

    let (mut a, mut b, mut c) = (0u32, 0xBBBB_BBBBu32, 0xCCCC_CCCCu32);
    reader.read(&mut a).read(&mut b).read(&mut c);

    assert!(!reader.is_ok());
    assert_eq!(a, 1);
    assert_eq!(b, 0xBBBB_BBBB);
    assert_eq!(c, 0xCCCC_CCCC);
}

#[test]
fn test_truncated_file_fails_header_load() {
    let mut sink = StreamSink::new(Cursor::new(Vec::new())).unwrap();
    let mut header = sample_header();
    v1_0::save_texture(&mut sink, &mut header, &[]).unwrap();
    let mut bytes = sink.into_inner().into_inner();
    bytes.truncate(100);

    let mut source = StreamSource::new(Cursor::new(bytes)).unwrap();
    let mut reader = Reader::new(&mut source);
    assert!(matches!(
        load_texture_header(&mut reader),
        Err(IoError::ReadFailed { .. })
    ));
}
