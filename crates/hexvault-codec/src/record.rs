//! Mapping byte buffers onto fixed-layout records
//!
//! A record is a `#[repr(C)]` struct built from codec types and deriving the
//! `zerocopy` traits. Parsers must check that a buffer holds the whole
//! record; these helpers return `None` for a short buffer rather than
//! raising a parser-specific error.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Borrow the record stored at the start of `bytes`
pub fn read_record<T>(bytes: &[u8]) -> Option<&T>
where
    T: FromBytes + KnownLayout + Immutable,
{
    T::ref_from_prefix(bytes).ok().map(|(record, _)| record)
}

/// Mutably borrow the record stored at the start of `bytes`
pub fn read_record_mut<T>(bytes: &mut [u8]) -> Option<&mut T>
where
    T: FromBytes + IntoBytes + KnownLayout,
{
    T::mut_from_prefix(bytes).ok().map(|(record, _)| record)
}

/// Copy the record stored at the start of `bytes`
pub fn read_record_copy<T: FromBytes>(bytes: &[u8]) -> Option<T> {
    T::read_from_prefix(bytes).ok().map(|(record, _)| record)
}

/// The record's bytes
pub fn record_bytes<T: IntoBytes + Immutable>(record: &T) -> &[u8] {
    record.as_bytes()
}
