//! Fixed-width, endian-tagged integers
//!
//! Each type stores its value as raw bytes in a fixed order, so a record
//! field decodes identically on every host. All types have alignment 1 and
//! can sit at any offset inside a `#[repr(C)]` record.

use zerocopy::byteorder::{BigEndian, LittleEndian, I16, I32, I64, U16, U32, U64};
use zerocopy::{Immutable, IntoBytes};

pub type U16Be = U16<BigEndian>;
pub type U16Le = U16<LittleEndian>;
pub type U32Be = U32<BigEndian>;
pub type U32Le = U32<LittleEndian>;
pub type U64Be = U64<BigEndian>;
pub type U64Le = U64<LittleEndian>;
pub type I16Be = I16<BigEndian>;
pub type I16Le = I16<LittleEndian>;
pub type I32Be = I32<BigEndian>;
pub type I32Le = I32<LittleEndian>;
pub type I64Be = I64<BigEndian>;
pub type I64Le = I64<LittleEndian>;

/// Conversion between a native integer and its on-disk representation
pub trait EndianInt: Copy + IntoBytes + Immutable {
    /// The host integer type
    type Native: Copy;

    /// Encoded width in bytes
    const WIDTH: usize;

    /// Encode `value`
    fn wrap(value: Self::Native) -> Self;

    /// Overwrite the stored bytes with `value`
    fn store(&mut self, value: Self::Native);

    /// Decode the stored value
    fn unwrap(&self) -> Self::Native;

    /// The encoded bytes
    fn to_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

macro_rules! impl_endian_int {
    ($($ty:ty => $native:ty),* $(,)?) => {
        $(
            impl EndianInt for $ty {
                type Native = $native;
                const WIDTH: usize = std::mem::size_of::<$native>();

                #[inline]
                fn wrap(value: $native) -> Self {
                    <$ty>::new(value)
                }

                #[inline]
                fn store(&mut self, value: $native) {
                    self.set(value);
                }

                #[inline]
                fn unwrap(&self) -> $native {
                    self.get()
                }
            }
        )*
    };
}

impl_endian_int! {
    U16Be => u16, U16Le => u16,
    U32Be => u32, U32Le => u32,
    U64Be => u64, U64Le => u64,
    I16Be => i16, I16Le => i16,
    I32Be => i32, I32Le => i32,
    I64Be => i64, I64Le => i64,
}
