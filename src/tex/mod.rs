//! # htex Texture Format
//!
//! File codec built on the core reader/writer. An htex file is a fixed
//! pre-header, a version-specific header and the raw mip payloads.
//!
//! ```text
//! [PreHeader(8)] [v1.0 Header(134)] [Mip 0] [Mip 1] ...
//! ```
//!
//! Headers never carry variable-length fields, so the writer knows the header
//! size up front, emits placeholders for the mip arrays, streams the payload and
//! backpatches the offsets and lengths afterwards.

pub mod pre_header;
pub mod v1_0;

use crate::core::reader::Reader;
use crate::core::source::Source;
use crate::error::Result;
use pre_header::{load_pre_header, PreHeader, Version};
use tracing::debug;

/// Header of any supported version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureHeader {
    V1_0(v1_0::Header),
}

/// Read the pre-header, then the header layout it announces
pub fn load_texture_header<O: Source + ?Sized>(
    reader: &mut Reader<'_, O>,
) -> Result<TextureHeader> {
    let mut pre_header = PreHeader::default();
    load_pre_header(&mut pre_header, reader)?;

    match pre_header.version()? {
        Version::V1_0 => {
            let mut header = v1_0::Header::new(pre_header.version);
            v1_0::load_header(&mut header, reader)?;
            debug!(
                width = header.width,
                height = header.height,
                mips = header.mip_count(),
                "Loaded htex v1.0 header"
            );
            Ok(TextureHeader::V1_0(header))
        }
    }
}
