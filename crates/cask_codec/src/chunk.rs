//! Framing helpers shared by the entity writer and reader.
//!
//! Small chunk (tag < `0x40`):
//!
//! ```text
//! u8  tag
//! u8  block_size            // payload + key bytes that follow
//! u8  payload[]             // fixed width from the tag; absent = null
//! u8  key[]                 // block_size - payload width bytes
//! ```
//!
//! Large chunk (tag >= `0x40`):
//!
//! ```text
//! u8  tag
//! u64 block_size            // everything after this field
//! u8  key_length            // 1..=40
//! u8  key[]
//! u8  payload[]             // up to block end; empty payload = null
//! ```
//!
//! Array payloads open with a `u16` flag word (low byte: per-item width,
//! bit 8: has-index, bit 9: 64-bit index, reserved) and a `u64` item count,
//! then the optional `u64`-counted `u32` index, then the item bytes.

use cask_types::{Error, Result, MAX_KEY_LENGTH};

use crate::stream::{ReadStream, WireScalar, WriteStream};

pub(crate) const HAS_INDEX: u16 = 0x100;
pub(crate) const INDEX_IS_64_BIT: u16 = 0x200;

/// Keys are short ASCII identifiers; anything else is a caller bug.
pub(crate) fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > MAX_KEY_LENGTH || !key.is_ascii() {
        log::error!(
            "invalid chunk key {key:?}: keys are 1..={MAX_KEY_LENGTH} ASCII bytes"
        );
        return Err(Error::InvalidParam);
    }
    Ok(())
}

/// Write the header of a large chunk, with a stand-in size field.
///
/// The stand-in is intentionally an impossible value, so a missed
/// [`end_large`] shows up as a corrupt size instead of a plausible one.
/// Returns the stream position of the header for the matching `end_large`.
pub(crate) fn begin_large(stream: &mut WriteStream, tag: u8, key: &str) -> Result<usize> {
    check_key(key)?;
    let start = stream.position();
    stream.write_u8(tag);
    stream.write_u64(i64::MAX as u64);
    stream.write_u8(key.len() as u8);
    stream.write_bytes(key.as_bytes());
    debug_assert_eq!(stream.position(), start + 10 + key.len());
    Ok(start)
}

/// Backfill the size field of a large chunk opened at `start`.
pub(crate) fn end_large(stream: &mut WriteStream, start: usize) -> Result<()> {
    let end = stream.position();
    if end <= start {
        log::error!("large chunk end position {end} is not past its start {start}");
        return Err(Error::CantWrite);
    }
    // block size counts everything after the u64 size field itself
    let block_size = (end - start - 9) as u64;
    stream.set_position(start + 1);
    stream.write_u64(block_size);
    stream.set_position(end);
    Ok(())
}

/// Read and verify a large chunk header: tag, size, key length, key bytes,
/// in that order. Any mismatch is a hard read error.
///
/// Returns the stream position of the end of the chunk.
pub(crate) fn read_large_header(
    stream: &mut ReadStream<'_>,
    tag: u8,
    key: &str,
) -> Result<usize> {
    debug_assert!(check_key(key).is_ok());

    let Some(read_tag) = stream.read_u8() else {
        log::error!("stream ended where chunk type {tag:#04x} was expected");
        return Err(Error::CantRead);
    };
    if read_tag != tag {
        log::error!("chunk type {read_tag:#04x} in stream does not match expected {tag:#04x}");
        return Err(Error::CantRead);
    }

    let Some(block_size) = stream.read_u64() else {
        log::error!("stream ended inside the size field of chunk {key:?}");
        return Err(Error::CantRead);
    };
    let Some(end) = usize::try_from(block_size)
        .ok()
        .and_then(|size| stream.position().checked_add(size))
        .filter(|end| *end <= stream.len())
    else {
        log::error!("chunk {key:?} declares size {block_size} beyond the end of the stream");
        return Err(Error::CantRead);
    };

    let Some(read_key_length) = stream.read_u8() else {
        return Err(Error::CantRead);
    };
    if read_key_length as usize != key.len() {
        log::error!(
            "key length {read_key_length} in stream does not match expected {} for key {key:?}",
            key.len()
        );
        return Err(Error::CantRead);
    }
    match stream.take_bytes(key.len()) {
        Some(read_key) if read_key == key.as_bytes() => {}
        _ => {
            log::error!("key in stream does not match expected key {key:?}");
            return Err(Error::CantRead);
        }
    }

    Ok(end)
}

/// `true` iff the cursor sits exactly at the declared chunk end.
#[inline]
pub(crate) fn at_chunk_end(stream: &ReadStream<'_>, end: usize) -> bool {
    stream.position() == end
}

/// Write the flag word, item count and optional index of an array payload.
pub(crate) fn write_array_header(
    stream: &mut WriteStream,
    per_item_width: u8,
    item_count: u64,
    index: Option<&[u32]>,
) {
    let mut flags = per_item_width as u16;
    if index.is_some() {
        flags |= HAS_INDEX;
    }
    stream.write_u16(flags);
    stream.write_u64(item_count);
    if let Some(index) = index {
        stream.write_u64(index.len() as u64);
        stream.write_bytes(bytemuck::cast_slice(index));
    }
}

pub(crate) struct ArrayHeader {
    pub per_item_width: usize,
    pub item_count: usize,
}

/// Read the flag word, item count and optional index of an array payload.
///
/// The stream must agree with the caller about the index: an index in the
/// stream without `want_index` is an error, and vice versa.
pub(crate) fn read_array_header(
    stream: &mut ReadStream<'_>,
    block_end: usize,
    want_index: bool,
) -> Result<(ArrayHeader, Option<Vec<u32>>)> {
    let Some(flags) = stream.read_u16() else {
        return Err(Error::CantRead);
    };
    let per_item_width = (flags & 0xff) as usize;
    let has_index = (flags & HAS_INDEX) != 0;
    if (flags & INDEX_IS_64_BIT) != 0 {
        log::error!("the array has a 64 bit index, which is not supported");
        return Err(Error::CantRead);
    }

    let Some(item_count) = stream.read_u64().and_then(|n| usize::try_from(n).ok()) else {
        return Err(Error::CantRead);
    };

    let index = if has_index {
        if !want_index {
            log::error!("the array in the stream has an index, but the destination does not");
            return Err(Error::CantRead);
        }
        let Some(index_count) = stream.read_u64().and_then(|n| usize::try_from(n).ok()) else {
            return Err(Error::CantRead);
        };
        let max_possible = block_end.saturating_sub(stream.position()) / 4;
        if index_count > max_possible {
            log::error!("the array index count {index_count} is beyond the size of the chunk");
            return Err(Error::CantRead);
        }
        let Some(index) = <u32 as WireScalar>::read_slice_from(stream, index_count) else {
            return Err(Error::CantRead);
        };
        Some(index)
    } else {
        if want_index {
            log::error!("the array in the stream has no index, but the destination expects one");
            return Err(Error::CantRead);
        }
        None
    };

    Ok((
        ArrayHeader {
            per_item_width,
            item_count,
        },
        index,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_chunk_round_trip() {
        let mut ws = WriteStream::new();
        let start = begin_large(&mut ws, 0xd0, "Node").unwrap();
        ws.write_bytes(&[1, 2, 3]);
        end_large(&mut ws, start).unwrap();

        let bytes = ws.into_vec();
        // tag + u64 size + key length + "Node" + payload
        assert_eq!(bytes.len(), 1 + 8 + 1 + 4 + 3);
        assert_eq!(bytes[0], 0xd0);
        // size counts key length byte + key + payload
        assert_eq!(u64::from_le_bytes(bytes[1..9].try_into().unwrap()), 1 + 4 + 3);

        let mut rs = ReadStream::new(&bytes);
        let end = read_large_header(&mut rs, 0xd0, "Node").unwrap();
        assert_eq!(end, bytes.len());
        assert_eq!(rs.position(), 14);
    }

    #[test]
    fn header_mismatches_are_hard_errors() {
        let mut ws = WriteStream::new();
        let start = begin_large(&mut ws, 0xd0, "Key").unwrap();
        end_large(&mut ws, start).unwrap();
        let good = ws.into_vec();

        // wrong tag expected
        let mut rs = ReadStream::new(&good);
        assert_eq!(read_large_header(&mut rs, 0xd1, "Key"), Err(Error::CantRead));

        // wrong key expected
        let mut rs = ReadStream::new(&good);
        assert_eq!(read_large_header(&mut rs, 0xd0, "Kay"), Err(Error::CantRead));

        // key length mismatch
        let mut rs = ReadStream::new(&good);
        assert_eq!(read_large_header(&mut rs, 0xd0, "LongerKey"), Err(Error::CantRead));

        // size pointing past the stream end
        let mut bad = good.clone();
        bad[1] = 0xff;
        let mut rs = ReadStream::new(&bad);
        assert_eq!(read_large_header(&mut rs, 0xd0, "Key"), Err(Error::CantRead));

        // truncated header
        let mut rs = ReadStream::new(&good[..5]);
        assert_eq!(read_large_header(&mut rs, 0xd0, "Key"), Err(Error::CantRead));
    }

    #[test]
    fn array_header_round_trip_with_index() {
        let index = [3_u32, 1, 4, 1, 5];
        let mut ws = WriteStream::new();
        write_array_header(&mut ws, 4, 9, Some(&index));
        let bytes = ws.into_vec();

        let mut rs = ReadStream::new(&bytes);
        let (header, read_index) = read_array_header(&mut rs, bytes.len(), true).unwrap();
        assert_eq!(header.per_item_width, 4);
        assert_eq!(header.item_count, 9);
        assert_eq!(read_index.as_deref(), Some(&index[..]));
    }

    #[test]
    fn array_header_index_expectations_must_agree() {
        let mut ws = WriteStream::new();
        write_array_header(&mut ws, 1, 2, None);
        let without = ws.into_vec();

        let mut ws = WriteStream::new();
        write_array_header(&mut ws, 1, 2, Some(&[0, 1]));
        let with = ws.into_vec();

        let mut rs = ReadStream::new(&without);
        assert_eq!(
            read_array_header(&mut rs, without.len(), true).err(),
            Some(Error::CantRead)
        );
        let mut rs = ReadStream::new(&with);
        assert_eq!(
            read_array_header(&mut rs, with.len(), false).err(),
            Some(Error::CantRead)
        );
    }

    #[test]
    fn reserved_64_bit_index_flag_is_rejected() {
        let mut ws = WriteStream::new();
        ws.write_u16(INDEX_IS_64_BIT | 4);
        ws.write_u64(0);
        let bytes = ws.into_vec();
        let mut rs = ReadStream::new(&bytes);
        assert_eq!(
            read_array_header(&mut rs, bytes.len(), false).err(),
            Some(Error::CantRead)
        );
    }

    #[test]
    fn keys_are_checked() {
        assert_eq!(check_key(""), Err(Error::InvalidParam));
        assert_eq!(check_key(&"k".repeat(41)), Err(Error::InvalidParam));
        assert_eq!(check_key("døds"), Err(Error::InvalidParam));
        assert!(check_key("Keys").is_ok());
        assert!(check_key(&"k".repeat(40)).is_ok());
    }
}
