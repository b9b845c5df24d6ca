//! htex version 1.0 header.
//!
//! ```text
//! [Compression(1)] [HasMips(1)] [Width(2)] [Height(2)]
//! [MipOffsets(4 x 16)] [MipLengths(4 x 16)]
//! ```
//!
//! The mip arrays always hold [`MAX_MIP_COUNT`] slots, so the header size is
//! fixed and known before any payload offset is computed. Unused slots are zero.

use super::pre_header::{save_pre_header, PreHeader, Version};
use crate::core::reader::Reader;
use crate::core::sink::Sink;
use crate::core::source::Source;
use crate::core::writer::{RangePatch, Writer};
use crate::error::{IoError, Result};
use std::fmt;
use std::ops::Range;
use tracing::{debug, instrument};

/// Number of mip slots in the header
pub const MAX_MIP_COUNT: usize = 16;

/// Pixel data compression.
///
/// Only these four values are accepted by [`load_header`]; any other byte is
/// rejected as an invalid header even though the on-disk field is a plain u8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Compression {
    #[default]
    NotCompressed = 0,
    Dxt1 = 1,
    Dxt3 = 2,
    Dxt5 = 3,
}

impl Compression {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Compression::NotCompressed),
            1 => Some(Compression::Dxt1),
            2 => Some(Compression::Dxt3),
            3 => Some(Compression::Dxt5),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Compression::NotCompressed => "none",
            Compression::Dxt1 => "DXT1",
            Compression::Dxt3 => "DXT3",
            Compression::Dxt5 => "DXT5",
        }
    }
}

/// Version 1.0 texture header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Raw version from the pre-header
    pub version: u32,
    pub compression: Compression,
    pub has_mips: bool,
    pub width: u16,
    pub height: u16,
    pub mip_offsets: [u32; MAX_MIP_COUNT],
    pub mip_lengths: [u32; MAX_MIP_COUNT],
}

impl Header {
    /// Encoded size in bytes, excluding the pre-header
    pub const SIZE: usize = 1 + 1 + 2 + 2 + 4 * MAX_MIP_COUNT * 2;

    pub fn new(version: u32) -> Self {
        Self {
            version,
            compression: Compression::NotCompressed,
            has_mips: false,
            width: 0,
            height: 0,
            mip_offsets: [0; MAX_MIP_COUNT],
            mip_lengths: [0; MAX_MIP_COUNT],
        }
    }

    /// Number of populated mip slots
    pub fn mip_count(&self) -> usize {
        self.mip_lengths.iter().take_while(|&&len| len != 0).count()
    }

    /// Byte range of mip `level` in the file, `None` for empty or invalid slots
    pub fn mip_range(&self, level: usize) -> Option<Range<usize>> {
        let offset = *self.mip_offsets.get(level)? as usize;
        let length = *self.mip_lengths.get(level)? as usize;
        (length != 0).then(|| offset..offset + length)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(Version::V1_0.raw())
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {}x{}", self.width, self.height)?;
        writeln!(f, "Has mip maps: {}", self.has_mips)?;
        writeln!(f, "Compression: {}", self.compression.name())?;
        writeln!(f, "Mip map infos:")?;
        for (index, (offset, length)) in self
            .mip_offsets
            .iter()
            .zip(self.mip_lengths.iter())
            .enumerate()
        {
            writeln!(f, "\t#{index}:\tOffset {offset};\tLength: {length}")?;
        }
        Ok(())
    }
}

/// Number of mip levels for a power-of-two texture, `None` otherwise.
///
/// The chain stops once the smaller side reaches one pixel, so a 64x16
/// texture has 5 levels.
pub fn mip_chain_length(width: u16, height: u16) -> Option<usize> {
    if !width.is_power_of_two() || !height.is_power_of_two() {
        return None;
    }
    let smallest = width.min(height);
    Some((smallest.trailing_zeros() as usize + 1).min(MAX_MIP_COUNT))
}

/// Read a v1.0 header into `header`.
///
/// `header` is only updated when the whole header decoded successfully and
/// carries a known compression value.
#[instrument(skip_all)]
pub fn load_header<O: Source + ?Sized>(
    header: &mut Header,
    reader: &mut Reader<'_, O>,
) -> Result<()> {
    let mut loaded = Header::new(header.version);
    let mut compression = 0u8;

    reader
        .read(&mut compression)
        .read(&mut loaded.has_mips)
        .read(&mut loaded.width)
        .read(&mut loaded.height)
        .read_range(&mut loaded.mip_offsets)
        .read_range(&mut loaded.mip_lengths)
        .finish()?;

    loaded.compression = Compression::from_byte(compression).ok_or_else(|| {
        IoError::InvalidHeader(format!("unknown compression {compression}"))
    })?;

    *header = loaded;
    Ok(())
}

/// Writes the pre-header and a v1.0 header with placeholder mip arrays, then
/// fills the arrays in once the payload has been written.
///
/// ```rust
/// use binary_io::core::sink::BufferSink;
/// use binary_io::core::writer::Writer;
/// use binary_io::tex::v1_0::{Header, HeaderSaver};
/// use bytes::BytesMut;
///
/// let mut buffer = BytesMut::new();
/// let mut sink = BufferSink::new(&mut buffer);
/// let mut writer = Writer::new(&mut sink);
///
/// let mut header = Header::default();
/// let saver = HeaderSaver::begin(&mut writer, &header).unwrap();
/// header.mip_offsets[0] = writer.position() as u32;
/// header.mip_lengths[0] = 3;
/// writer.write_bytes(&[1, 2, 3]);
/// saver.finish(&mut writer, &header).unwrap();
/// ```
#[derive(Debug)]
pub struct HeaderSaver {
    offsets: RangePatch<u32, MAX_MIP_COUNT>,
    lengths: RangePatch<u32, MAX_MIP_COUNT>,
}

impl HeaderSaver {
    /// Write everything except the final mip arrays
    pub fn begin<S: Sink + ?Sized>(writer: &mut Writer<'_, S>, header: &Header) -> Result<Self> {
        let pre_header = PreHeader {
            version: header.version,
            ..PreHeader::default()
        };
        save_pre_header(&pre_header, writer)?;

        writer
            .write(header.compression as u8)
            .write(header.has_mips)
            .write(header.width)
            .write(header.height);
        let offsets = writer.reserve_range::<u32, MAX_MIP_COUNT>();
        let lengths = writer.reserve_range::<u32, MAX_MIP_COUNT>();
        writer.finish()?;

        Ok(Self { offsets, lengths })
    }

    /// Commit the real mip offsets and lengths from `header`
    pub fn finish<S: Sink + ?Sized>(
        self,
        writer: &mut Writer<'_, S>,
        header: &Header,
    ) -> Result<()> {
        writer.commit_range(self.offsets, &header.mip_offsets)?;
        writer.commit_range(self.lengths, &header.mip_lengths)?;
        writer.finish()
    }
}

/// Write a complete texture in one forward pass.
///
/// `mips` are laid out back to back right after the header; `header`'s mip
/// arrays are updated to describe them.
#[instrument(skip(sink, header, mips), fields(levels = mips.len()))]
pub fn save_texture<S: Sink + ?Sized>(
    sink: &mut S,
    header: &mut Header,
    mips: &[&[u8]],
) -> Result<()> {
    if mips.len() > MAX_MIP_COUNT {
        return Err(IoError::InvalidHeader(format!(
            "{} mip levels exceed the maximum of {MAX_MIP_COUNT}",
            mips.len()
        )));
    }

    let mut writer = Writer::new(sink);
    let saver = HeaderSaver::begin(&mut writer, header)?;

    header.mip_offsets = [0; MAX_MIP_COUNT];
    header.mip_lengths = [0; MAX_MIP_COUNT];
    for (level, mip) in mips.iter().enumerate() {
        let offset = u32::try_from(writer.position())
            .map_err(|_| IoError::InvalidHeader("mip offset exceeds 4 GiB".into()))?;
        let length = u32::try_from(mip.len())
            .map_err(|_| IoError::InvalidHeader("mip length exceeds 4 GiB".into()))?;
        header.mip_offsets[level] = offset;
        header.mip_lengths[level] = length;
        writer.write_bytes(mip);
    }
    writer.finish()?;

    saver.finish(&mut writer, header)?;
    debug!(end = writer.position(), "Texture written");
    writer.flush()
}

/// Read the payload of mip `level` by seeking to its recorded offset.
///
/// A range running past the end of a sized source is rejected before any
/// buffer is allocated.
pub fn read_mip<O: Source + ?Sized>(
    reader: &mut Reader<'_, O>,
    header: &Header,
    level: usize,
) -> Result<Vec<u8>> {
    let range = header
        .mip_range(level)
        .ok_or_else(|| IoError::InvalidHeader(format!("mip level {level} is empty")))?;

    if let Some(size) = reader.source().size() {
        if range.end > size {
            return Err(IoError::InvalidHeader(format!(
                "mip level {level} spans {}..{} past end of file at {size}",
                range.start, range.end
            )));
        }
    }

    reader.source().seek(range.start)?;
    let mut data = vec![0u8; range.len()];
    reader.read_bytes(&mut data).finish()?;
    Ok(data)
}
