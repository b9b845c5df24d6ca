//! htex pre-header: signature and version, read before any version dispatch.
//!
//! ```text
//! [Signature(4) "HTEX"] [Version(4)]
//! ```

use crate::core::reader::Reader;
use crate::core::sink::Sink;
use crate::core::source::Source;
use crate::core::writer::Writer;
use crate::error::{IoError, Result};
use tracing::debug;

/// "HTEX" read as a little-endian u32
pub const FILE_SIGNATURE: u32 = u32::from_le_bytes(*b"HTEX");

/// Known header layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1_0,
}

impl Version {
    /// Raw on-disk value
    pub const fn raw(self) -> u32 {
        match self {
            Version::V1_0 => 0x0100,
        }
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0x0100 => Some(Version::V1_0),
            _ => None,
        }
    }
}

/// Leading fixed-size block of every htex file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreHeader {
    pub signature: u32,
    pub version: u32,
}

impl PreHeader {
    /// Encoded size in bytes
    pub const SIZE: usize = 8;

    pub fn new(version: Version) -> Self {
        Self {
            signature: FILE_SIGNATURE,
            version: version.raw(),
        }
    }

    /// Resolve the raw version into a known layout
    pub fn version(&self) -> Result<Version> {
        Version::from_raw(self.version).ok_or(IoError::UnsupportedVersion(self.version))
    }
}

impl Default for PreHeader {
    fn default() -> Self {
        Self {
            signature: FILE_SIGNATURE,
            version: 0,
        }
    }
}

/// Read a pre-header into `header`.
///
/// The signature is checked before the version is read; on any failure
/// `header` keeps the values it had on entry.
pub fn load_pre_header<O: Source + ?Sized>(
    header: &mut PreHeader,
    reader: &mut Reader<'_, O>,
) -> Result<()> {
    let mut signature = 0u32;
    reader.read(&mut signature).finish()?;

    if signature != FILE_SIGNATURE {
        debug!(found = signature, "Rejected htex pre-header signature");
        return Err(IoError::InvalidSignature {
            expected: FILE_SIGNATURE,
            found: signature,
        });
    }

    let mut version = header.version;
    reader.read(&mut version).finish()?;

    header.signature = signature;
    header.version = version;
    Ok(())
}

/// Write `header` through `writer`
pub fn save_pre_header<S: Sink + ?Sized>(
    header: &PreHeader,
    writer: &mut Writer<'_, S>,
) -> Result<()> {
    writer
        .write(header.signature)
        .write(header.version)
        .finish()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::core::sink::BufferSink;
    use crate::core::source::BufferSource;
    use bytes::BytesMut;

    #[test]
    fn test_signature_bytes() {
        assert_eq!(FILE_SIGNATURE.to_le_bytes(), *b"HTEX");
    }

    #[test]
    fn test_pre_header_round_trip() {
        let mut buffer = BytesMut::new();
        let mut sink = BufferSink::new(&mut buffer);
        let mut writer = Writer::new(&mut sink);
        save_pre_header(&PreHeader::new(Version::V1_0), &mut writer).unwrap();
        assert_eq!(buffer.len(), PreHeader::SIZE);

        let mut source = BufferSource::new(&buffer);
        let mut reader = Reader::new(&mut source);
        let mut loaded = PreHeader::default();
        load_pre_header(&mut loaded, &mut reader).unwrap();
        assert_eq!(loaded.version().unwrap(), Version::V1_0);
    }

    #[test]
    fn test_wrong_signature_leaves_version() {
        let mut data = b"BMPX".to_vec();
        data.extend_from_slice(&0x0100u32.to_le_bytes());

        let mut source = BufferSource::new(&data);
        let mut reader = Reader::new(&mut source);
        let mut loaded = PreHeader {
            signature: 0,
            version: 0xDEAD,
        };

        let result = load_pre_header(&mut loaded, &mut reader);
        assert!(matches!(result, Err(IoError::InvalidSignature { .. })));
        assert_eq!(loaded.version, 0xDEAD);
        assert_eq!(loaded.signature, 0);
    }

    #[test]
    fn test_truncated_version() {
        let mut data = b"HTEX".to_vec();
        data.push(1);

        let mut source = BufferSource::new(&data);
        let mut reader = Reader::new(&mut source);
        let mut loaded = PreHeader::default();

        assert!(matches!(
            load_pre_header(&mut loaded, &mut reader),
            Err(IoError::ReadFailed { .. })
        ));
        assert_eq!(loaded.version, 0);
    }

    #[test]
    fn test_unknown_version() {
        let header = PreHeader {
            signature: FILE_SIGNATURE,
            version: 0x0200,
        };
        assert!(matches!(
            header.version(),
            Err(IoError::UnsupportedVersion(0x0200))
        ));
    }
}
