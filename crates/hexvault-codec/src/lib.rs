//! # Hexvault Codec
//!
//! Plain-data field types for mapping raw bytes onto fixed-layout records.
//!
//! - **Endian integers**: `U16Be`, `U32Le`, ... with `wrap` / `unwrap`
//! - **BitArray**: flag words with selectable byte and bit order
//! - **FixedString**: string fields with separate encoded and logical sizes
//! - **Padding**: reserved byte runs
//! - **Magic**: packed ASCII structure tags
//! - **Align**: rounding helpers for offsets and sizes
//!
//! Every field type has alignment 1, so a `#[repr(C)]` record built from them
//! has no implicit padding and can be borrowed straight out of a buffer.
//!
//! ## Example
//!
//! ```rust
//! use hexvault_codec::{magic32, read_record, EndianInt, FixedString, U32Le, U64Be};
//! use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
//!
//! #[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
//! #[repr(C)]
//! struct Header {
//!     magic: U32Le,
//!     size: U64Be,
//!     name: FixedString<8, 8>,
//! }
//!
//! let mut buf = Vec::new();
//! buf.extend_from_slice(b"HFS0");
//! buf.extend_from_slice(&64u64.to_be_bytes());
//! buf.extend_from_slice(b"main\0\0\0\0");
//!
//! let header = read_record::<Header>(&buf).unwrap();
//! assert_eq!(header.magic.unwrap(), magic32(b"HFS0"));
//! assert_eq!(header.size.unwrap(), 64);
//! assert_eq!(header.name.decode(), "main");
//! ```

pub mod align;
pub mod bits;
pub mod endian;
pub mod magic;
pub mod padding;
pub mod record;
pub mod string;

pub use align::{align, is_aligned, padding_for, round_up};
pub use bits::{BeBytes, BitArray, LeBytes, Lsb0, Msb0};
pub use endian::{
    EndianInt, I16Be, I16Le, I32Be, I32Le, I64Be, I64Le, U16Be, U16Le, U32Be, U32Le, U64Be, U64Le,
};
pub use magic::{magic32, magic64, unmagic32, unmagic64};
pub use padding::Padding;
pub use record::{read_record, read_record_copy, read_record_mut, record_bytes};
pub use string::FixedString;
