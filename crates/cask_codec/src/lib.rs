//! Wire encoding for the cask entity format.
//!
//! The format is a stream of *chunks*. A chunk is `(type tag, size, key,
//! payload)`; tags below `0x40` use a one-byte size field (small chunks,
//! payload + key < 256 bytes), tags from `0x40` up use a `u64` size field
//! (large chunks). Named subsections and arrays of size-prefixed unnamed
//! subsections nest arbitrarily; see [`EntityWriter`] and [`EntityReader`].
//!
//! All multi-byte integers are little-endian on the wire. A byte-order
//! flipping read path is reserved but not implemented, so the crate only
//! builds for little-endian targets.

#[cfg(target_endian = "big")]
compile_error!(
    "cask_codec only supports little-endian targets; the byte-flip read path is reserved"
);

mod chunk;
mod reader;
mod stream;
mod value;
mod writer;

pub use self::{
    reader::{ArrayItemReader, EntityReader, SectionArrayReader},
    stream::{ReadStream, WriteStream, DEFAULT_RESERVATION},
    value::Value,
    writer::{ArrayItemWriter, EntityWriter, SectionArrayWriter},
};
