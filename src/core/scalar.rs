//! # Scalar Encoding
//!
//! Fixed-width values that a [`Writer`](super::writer::Writer) can emit and a
//! [`Reader`](super::reader::Reader) can decode. Every multi-byte scalar uses
//! little-endian byte order on the wire and on disk.

/// Largest `Scalar::SIZE` of any implementor; sizes the stack scratch buffers.
pub const MAX_SCALAR_SIZE: usize = 8;

/// A fixed-width value with a canonical little-endian encoding.
///
/// `encode` and `decode` are handed slices of exactly `SIZE` bytes.
pub trait Scalar: Copy + Default {
    /// Encoded width in bytes
    const SIZE: usize;

    /// Encode into `dst` (length `SIZE`)
    fn encode(self, dst: &mut [u8]);

    /// Decode from `src` (length `SIZE`)
    fn decode(src: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn encode(self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn decode(src: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(src);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Scalar for bool {
    const SIZE: usize = 1;

    #[inline]
    fn encode(self, dst: &mut [u8]) {
        dst[0] = u8::from(self);
    }

    // Any non-zero byte is true.
    #[inline]
    fn decode(src: &[u8]) -> Self {
        src[0] != 0
    }
}
