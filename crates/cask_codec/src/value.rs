//! The typed value surface of the entity writer and reader: one
//! [`Value`] impl per supported element × container combination.
//!
//! Fixed-size elements take the small-chunk path as single values and the
//! flattened array path in vectors. Bools pack to bits in arrays, strings
//! always use large chunks with a `u64` length per string. The impls are
//! generated per element type, mirroring the closed type table of the wire
//! format.

use cask_types::{Element, EntityRef, Error, Hash, IdxVec, ItemRef, Result, WireTag};
use glam::{
    DMat2, DMat3, DMat4, DQuat, DVec2, DVec3, DVec4, I8Vec2, I8Vec3, I8Vec4, I16Vec2, I16Vec3,
    I16Vec4, I64Vec2, I64Vec3, I64Vec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Quat, U8Vec2,
    U8Vec3, U8Vec4, U16Vec2, U16Vec3, U16Vec4, U64Vec2, U64Vec3, U64Vec4, UVec2, UVec3, UVec4,
    Vec2, Vec3, Vec4,
};
use uuid::Uuid;

use crate::{
    chunk,
    reader::EntityReader,
    stream::{ReadStream, WireScalar, WriteStream},
    writer::EntityWriter,
};

/// A value the entity writer and reader can carry under a key.
///
/// The set of implementors is closed: for every element type `T` of the
/// format there are impls for `T`, `Option<T>`, `Vec<T>`, `Option<Vec<T>>`,
/// `IdxVec<T>` and `Option<IdxVec<T>>`.
pub trait Value: Sized {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()>;
    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self>;
}

// ---

/// A fixed-size element: single values fit a small chunk.
pub(crate) trait FixedElement: Element {
    /// The single-value wire tag.
    const TAG: u8;
    const SCALAR_WIDTH: usize;
    const SCALAR_COUNT: usize;

    fn emit(&self, stream: &mut WriteStream);
    fn parse(stream: &mut ReadStream<'_>) -> Option<Self>;
}

/// A fixed-size element whose arrays take the flattened bulk path.
/// Everything but `bool` (bit-packed) and `String` (length-prefixed).
pub(crate) trait PodArrayElement: FixedElement {
    fn emit_slice(items: &[Self], stream: &mut WriteStream);

    /// `scalar_count` is the flattened scalar count from the array header;
    /// it must be a multiple of [`FixedElement::SCALAR_COUNT`].
    fn parse_slice(stream: &mut ReadStream<'_>, scalar_count: usize) -> Option<Vec<Self>>;
}

macro_rules! impl_fixed_scalar {
    ($($ty:ty => $tag:ident,)+) => {
        $(
            impl FixedElement for $ty {
                const TAG: u8 = WireTag::$tag as u8;
                const SCALAR_WIDTH: usize = std::mem::size_of::<$ty>();
                const SCALAR_COUNT: usize = 1;

                #[inline]
                fn emit(&self, stream: &mut WriteStream) {
                    WireScalar::write_to(*self, stream);
                }

                #[inline]
                fn parse(stream: &mut ReadStream<'_>) -> Option<Self> {
                    WireScalar::read_from(stream)
                }
            }

            impl PodArrayElement for $ty {
                fn emit_slice(items: &[Self], stream: &mut WriteStream) {
                    WireScalar::write_slice_to(items, stream);
                }

                fn parse_slice(
                    stream: &mut ReadStream<'_>,
                    scalar_count: usize,
                ) -> Option<Vec<Self>> {
                    WireScalar::read_slice_from(stream, scalar_count)
                }
            }
        )+
    };
}

impl_fixed_scalar! {
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    Uuid => Uuid,
    Hash => Hash,
}

macro_rules! impl_fixed_pod {
    ($($ty:ty => ($tag:ident, $scalar:ty, $count:literal),)+) => {
        $(
            impl FixedElement for $ty {
                const TAG: u8 = WireTag::$tag as u8;
                const SCALAR_WIDTH: usize = std::mem::size_of::<$scalar>();
                const SCALAR_COUNT: usize = $count;

                #[inline]
                fn emit(&self, stream: &mut WriteStream) {
                    stream.write_bytes(bytemuck::bytes_of(self));
                }

                fn parse(stream: &mut ReadStream<'_>) -> Option<Self> {
                    let bytes = stream.take_bytes(std::mem::size_of::<$ty>())?;
                    Some(bytemuck::pod_read_unaligned(bytes))
                }
            }

            impl PodArrayElement for $ty {
                fn emit_slice(items: &[Self], stream: &mut WriteStream) {
                    stream.write_bytes(bytemuck::cast_slice(items));
                }

                fn parse_slice(
                    stream: &mut ReadStream<'_>,
                    scalar_count: usize,
                ) -> Option<Vec<Self>> {
                    if scalar_count % $count != 0 {
                        return None;
                    }
                    let bytes = stream.take_bytes(scalar_count * Self::SCALAR_WIDTH)?;
                    let mut items = vec![<$ty>::default(); scalar_count / $count];
                    bytemuck::cast_slice_mut::<$ty, u8>(&mut items).copy_from_slice(bytes);
                    Some(items)
                }
            }
        )+
    };
}

impl_fixed_pod! {
    I8Vec2 => (IVec2, i8, 2),
    I8Vec3 => (IVec3, i8, 3),
    I8Vec4 => (IVec4, i8, 4),
    I16Vec2 => (IVec2, i16, 2),
    I16Vec3 => (IVec3, i16, 3),
    I16Vec4 => (IVec4, i16, 4),
    IVec2 => (IVec2, i32, 2),
    IVec3 => (IVec3, i32, 3),
    IVec4 => (IVec4, i32, 4),
    I64Vec2 => (IVec2, i64, 2),
    I64Vec3 => (IVec3, i64, 3),
    I64Vec4 => (IVec4, i64, 4),
    U8Vec2 => (UVec2, u8, 2),
    U8Vec3 => (UVec3, u8, 3),
    U8Vec4 => (UVec4, u8, 4),
    U16Vec2 => (UVec2, u16, 2),
    U16Vec3 => (UVec3, u16, 3),
    U16Vec4 => (UVec4, u16, 4),
    UVec2 => (UVec2, u32, 2),
    UVec3 => (UVec3, u32, 3),
    UVec4 => (UVec4, u32, 4),
    U64Vec2 => (UVec2, u64, 2),
    U64Vec3 => (UVec3, u64, 3),
    U64Vec4 => (UVec4, u64, 4),
    Vec2 => (Vec2, f32, 2),
    Vec3 => (Vec3, f32, 3),
    Vec4 => (Vec4, f32, 4),
    DVec2 => (Vec2, f64, 2),
    DVec3 => (Vec3, f64, 3),
    DVec4 => (Vec4, f64, 4),
    Mat2 => (Mat2, f32, 4),
    Mat3 => (Mat3, f32, 9),
    Mat4 => (Mat4, f32, 16),
    DMat2 => (Mat2, f64, 4),
    DMat3 => (Mat3, f64, 9),
    DMat4 => (Mat4, f64, 16),
    Quat => (Quat, f32, 4),
    DQuat => (Quat, f64, 4),
}

// The refs serialize as their underlying 16/32 byte value.

impl FixedElement for EntityRef {
    const TAG: u8 = WireTag::Hash as u8;
    const SCALAR_WIDTH: usize = 32;
    const SCALAR_COUNT: usize = 1;

    #[inline]
    fn emit(&self, stream: &mut WriteStream) {
        self.hash().emit(stream);
    }

    #[inline]
    fn parse(stream: &mut ReadStream<'_>) -> Option<Self> {
        Hash::parse(stream).map(Self::from)
    }
}

impl PodArrayElement for EntityRef {
    fn emit_slice(items: &[Self], stream: &mut WriteStream) {
        for item in items {
            item.emit(stream);
        }
    }

    fn parse_slice(stream: &mut ReadStream<'_>, scalar_count: usize) -> Option<Vec<Self>> {
        Hash::parse_slice(stream, scalar_count)
            .map(|hashes| hashes.into_iter().map(Self::from).collect())
    }
}

impl FixedElement for ItemRef {
    const TAG: u8 = WireTag::Uuid as u8;
    const SCALAR_WIDTH: usize = 16;
    const SCALAR_COUNT: usize = 1;

    #[inline]
    fn emit(&self, stream: &mut WriteStream) {
        self.uuid().emit(stream);
    }

    #[inline]
    fn parse(stream: &mut ReadStream<'_>) -> Option<Self> {
        Uuid::parse(stream).map(Self::from)
    }
}

impl PodArrayElement for ItemRef {
    fn emit_slice(items: &[Self], stream: &mut WriteStream) {
        for item in items {
            item.emit(stream);
        }
    }

    fn parse_slice(stream: &mut ReadStream<'_>, scalar_count: usize) -> Option<Vec<Self>> {
        Uuid::parse_slice(stream, scalar_count)
            .map(|ids| ids.into_iter().map(Self::from).collect())
    }
}

// Bools are one byte as single values; their array form is bit-packed and
// handled separately below.

impl FixedElement for bool {
    const TAG: u8 = WireTag::Bool as u8;
    const SCALAR_WIDTH: usize = 1;
    const SCALAR_COUNT: usize = 1;

    #[inline]
    fn emit(&self, stream: &mut WriteStream) {
        stream.write_u8(u8::from(*self));
    }

    #[inline]
    fn parse(stream: &mut ReadStream<'_>) -> Option<Self> {
        u8::parse(stream).map(|b| b != 0)
    }
}

// ---
// Small-chunk single values.

fn write_single<T: FixedElement>(
    writer: &mut EntityWriter<'_>,
    key: &str,
    value: Option<&T>,
) -> Result<()> {
    chunk::check_key(key)?;
    let payload_width = T::SCALAR_WIDTH * T::SCALAR_COUNT;
    debug_assert!(payload_width + key.len() < 256);

    let stream = writer.stream_mut();
    let block_size = match value {
        Some(_) => payload_width + key.len(),
        None => key.len(),
    };
    let start = stream.position();
    stream.write_u8(T::TAG);
    stream.write_u8(block_size as u8);
    if let Some(value) = value {
        value.emit(stream);
    }
    stream.write_bytes(key.as_bytes());
    debug_assert_eq!(stream.position(), start + 2 + block_size);
    Ok(())
}

fn read_single<T: FixedElement>(
    reader: &mut EntityReader<'_, '_>,
    key: &str,
    empty_value_is_allowed: bool,
) -> Result<Option<T>> {
    chunk::check_key(key)?;
    let payload_width = T::SCALAR_WIDTH * T::SCALAR_COUNT;
    let expected_block_size = payload_width + key.len();
    let expected_block_size_if_empty = key.len();

    let stream = reader.stream_mut();
    let start = stream.position();

    let Some(tag) = stream.read_u8() else {
        log::error!("stream ended where value {key:?} was expected");
        return Err(Error::CantRead);
    };
    if tag != T::TAG {
        log::error!(
            "value type {tag:#04x} in stream does not match expected {:#04x} for key {key:?}",
            T::TAG
        );
        return Err(Error::CantRead);
    }

    let Some(block_size) = stream.read_u8() else {
        return Err(Error::CantRead);
    };
    let block_size = block_size as usize;

    // any size other than the expected full size is regarded as empty, and
    // then the size must be exactly the empty shape
    let is_empty = block_size != expected_block_size;
    if is_empty {
        if !empty_value_is_allowed {
            log::error!(
                "block size {block_size} of value {key:?} does not match expected size \
                 {expected_block_size} (empty is not allowed)"
            );
            return Err(Error::CantRead);
        }
        if block_size != expected_block_size_if_empty {
            log::error!(
                "block size {block_size} of value {key:?} matches neither the empty \
                 ({expected_block_size_if_empty}) nor the full ({expected_block_size}) shape"
            );
            return Err(Error::CantRead);
        }
    }

    let value = if is_empty {
        None
    } else {
        match T::parse(stream) {
            Some(value) => Some(value),
            None => {
                log::error!("could not read all expected bytes of value {key:?}");
                return Err(Error::CantRead);
            }
        }
    };

    match stream.take_bytes(key.len()) {
        Some(read_key) if read_key == key.as_bytes() => {}
        _ => {
            log::error!("key in stream does not match expected key {key:?}");
            return Err(Error::CantRead);
        }
    }

    let expected_end = start + 2 + block_size;
    if stream.position() != expected_end {
        log::error!(
            "invalid position in stream after value {key:?}: {}, expected {expected_end}",
            stream.position()
        );
        return Err(Error::CantRead);
    }

    Ok(value)
}

// ---
// Flattened arrays of fixed-size elements.

fn write_array<T: PodArrayElement>(
    writer: &mut EntityWriter<'_>,
    key: &str,
    items: Option<&[T]>,
    index: Option<&[u32]>,
) -> Result<()> {
    let stream = writer.stream_mut();
    let start = chunk::begin_large(stream, T::TAG + 0x40, key)?;
    if let Some(items) = items {
        let scalar_count = items.len() * T::SCALAR_COUNT;
        chunk::write_array_header(stream, T::SCALAR_WIDTH as u8, scalar_count as u64, index);
        T::emit_slice(items, stream);
    }
    chunk::end_large(stream, start)
}

fn read_array<T: PodArrayElement>(
    reader: &mut EntityReader<'_, '_>,
    key: &str,
    empty_value_is_allowed: bool,
    want_index: bool,
) -> Result<Option<(Vec<T>, Option<Vec<u32>>)>> {
    let stream = reader.stream_mut();
    let end = chunk::read_large_header(stream, T::TAG + 0x40, key)?;
    if chunk::at_chunk_end(stream, end) {
        if empty_value_is_allowed {
            return Ok(None);
        }
        log::error!("the value {key:?} is empty, which is not allowed here");
        return Err(Error::CantRead);
    }

    let (header, index) = chunk::read_array_header(stream, end, want_index)?;
    if header.per_item_width != T::SCALAR_WIDTH {
        log::error!(
            "per-item width {} of array {key:?} does not match the expected width {}",
            header.per_item_width,
            T::SCALAR_WIDTH
        );
        return Err(Error::CantRead);
    }

    let max_possible = end.saturating_sub(stream.position()) / T::SCALAR_WIDTH;
    if header.item_count > max_possible {
        log::error!("item count of array {key:?} is beyond the size of its chunk");
        return Err(Error::CantRead);
    }
    if header.item_count % T::SCALAR_COUNT != 0 {
        log::error!(
            "scalar count {} of array {key:?} is not a multiple of the element size",
            header.item_count
        );
        return Err(Error::CantRead);
    }

    let Some(items) = T::parse_slice(stream, header.item_count) else {
        log::error!("could not read all items of array {key:?}");
        return Err(Error::CantRead);
    };

    if !chunk::at_chunk_end(stream, end) {
        log::error!(
            "array {key:?} did not end where declared: position {}, expected {end}",
            stream.position()
        );
        return Err(Error::CantRead);
    }

    Ok(Some((items, index)))
}

// ---
// Bool arrays: the wire carries ceil(count / 8) packed bytes, LSB first,
// and the array header stores the logical bool count with width 0.

fn write_bool_array(
    writer: &mut EntityWriter<'_>,
    key: &str,
    items: Option<&[bool]>,
    index: Option<&[u32]>,
) -> Result<()> {
    let stream = writer.stream_mut();
    let start = chunk::begin_large(stream, WireTag::Bool.array(), key)?;
    if let Some(items) = items {
        chunk::write_array_header(stream, 0, items.len() as u64, index);
        let mut packed = vec![0_u8; items.len().div_ceil(8)];
        for (i, set) in items.iter().enumerate() {
            if *set {
                packed[i >> 3] |= 1 << (i & 0x7);
            }
        }
        stream.write_bytes(&packed);
    }
    chunk::end_large(stream, start)
}

fn read_bool_array(
    reader: &mut EntityReader<'_, '_>,
    key: &str,
    empty_value_is_allowed: bool,
    want_index: bool,
) -> Result<Option<(Vec<bool>, Option<Vec<u32>>)>> {
    let stream = reader.stream_mut();
    let end = chunk::read_large_header(stream, WireTag::Bool.array(), key)?;
    if chunk::at_chunk_end(stream, end) {
        if empty_value_is_allowed {
            return Ok(None);
        }
        log::error!("the value {key:?} is empty, which is not allowed here");
        return Err(Error::CantRead);
    }

    let (header, index) = chunk::read_array_header(stream, end, want_index)?;
    let packed_len = header.item_count.div_ceil(8);
    if packed_len > end.saturating_sub(stream.position()) {
        log::error!("bool count of array {key:?} is beyond the size of its chunk");
        return Err(Error::CantRead);
    }

    let Some(packed) = stream.take_bytes(packed_len) else {
        return Err(Error::CantRead);
    };
    let mut items = Vec::with_capacity(header.item_count);
    for i in 0..header.item_count {
        items.push((packed[i >> 3] & (1 << (i & 0x7))) != 0);
    }

    if !chunk::at_chunk_end(stream, end) {
        log::error!(
            "array {key:?} did not end where declared: position {}, expected {end}",
            stream.position()
        );
        return Err(Error::CantRead);
    }

    Ok(Some((items, index)))
}

// ---
// Strings: always large chunks. A single string is a u64 length + bytes; a
// string array is a count in the header (width 0) and one length-prefixed
// string per item.

fn write_string(writer: &mut EntityWriter<'_>, key: &str, value: Option<&str>) -> Result<()> {
    let stream = writer.stream_mut();
    let start = chunk::begin_large(stream, WireTag::String as u8, key)?;
    if let Some(value) = value {
        stream.write_u64(value.len() as u64);
        stream.write_bytes(value.as_bytes());
    }
    chunk::end_large(stream, start)
}

fn parse_string(stream: &mut ReadStream<'_>, end: usize, key: &str) -> Result<String> {
    let Some(length) = stream.read_u64().and_then(|n| usize::try_from(n).ok()) else {
        return Err(Error::CantRead);
    };
    if length > end.saturating_sub(stream.position()) {
        log::error!("string length in value {key:?} is beyond the size of its chunk");
        return Err(Error::CantRead);
    }
    let Some(bytes) = stream.take_bytes(length) else {
        return Err(Error::CantRead);
    };
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => {
            log::error!("string in value {key:?} is not valid UTF-8");
            Err(Error::CantRead)
        }
    }
}

fn read_string(
    reader: &mut EntityReader<'_, '_>,
    key: &str,
    empty_value_is_allowed: bool,
) -> Result<Option<String>> {
    let stream = reader.stream_mut();
    let end = chunk::read_large_header(stream, WireTag::String as u8, key)?;
    if chunk::at_chunk_end(stream, end) {
        if empty_value_is_allowed {
            return Ok(None);
        }
        log::error!("the value {key:?} is empty, which is not allowed here");
        return Err(Error::CantRead);
    }

    let value = parse_string(stream, end, key)?;
    if !chunk::at_chunk_end(stream, end) {
        log::error!(
            "value {key:?} did not end where declared: position {}, expected {end}",
            stream.position()
        );
        return Err(Error::CantRead);
    }
    Ok(Some(value))
}

fn write_string_array(
    writer: &mut EntityWriter<'_>,
    key: &str,
    items: Option<&[String]>,
    index: Option<&[u32]>,
) -> Result<()> {
    let stream = writer.stream_mut();
    let start = chunk::begin_large(stream, WireTag::StringArray as u8, key)?;
    if let Some(items) = items {
        chunk::write_array_header(stream, 0, items.len() as u64, index);
        for item in items {
            stream.write_u64(item.len() as u64);
            stream.write_bytes(item.as_bytes());
        }
    }
    chunk::end_large(stream, start)
}

fn read_string_array(
    reader: &mut EntityReader<'_, '_>,
    key: &str,
    empty_value_is_allowed: bool,
    want_index: bool,
) -> Result<Option<(Vec<String>, Option<Vec<u32>>)>> {
    let stream = reader.stream_mut();
    let end = chunk::read_large_header(stream, WireTag::StringArray as u8, key)?;
    if chunk::at_chunk_end(stream, end) {
        if empty_value_is_allowed {
            return Ok(None);
        }
        log::error!("the value {key:?} is empty, which is not allowed here");
        return Err(Error::CantRead);
    }

    let (header, index) = chunk::read_array_header(stream, end, want_index)?;

    // plausibility: even all-empty strings take a u64 length each
    let max_possible = end.saturating_sub(stream.position()) / 8;
    if header.item_count > max_possible {
        log::error!("string count of array {key:?} is beyond the size of its chunk");
        return Err(Error::CantRead);
    }

    let mut items = Vec::with_capacity(header.item_count);
    for _ in 0..header.item_count {
        items.push(parse_string(stream, end, key)?);
    }

    if !chunk::at_chunk_end(stream, end) {
        log::error!(
            "array {key:?} did not end where declared: position {}, expected {end}",
            stream.position()
        );
        return Err(Error::CantRead);
    }

    Ok(Some((items, index)))
}

// ---
// The per-type impl surface.

fn require<T>(value: Option<T>) -> Result<T> {
    // read paths only produce None when the empty shape was allowed
    value.ok_or(Error::CantRead)
}

macro_rules! impl_value_fixed {
    ($($ty:ty,)+) => {
        $(
            impl Value for $ty {
                fn write_value(
                    writer: &mut EntityWriter<'_>,
                    key: &str,
                    value: &Self,
                ) -> Result<()> {
                    write_single(writer, key, Some(value))
                }

                fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
                    require(read_single(reader, key, false)?)
                }
            }

            impl Value for Option<$ty> {
                fn write_value(
                    writer: &mut EntityWriter<'_>,
                    key: &str,
                    value: &Self,
                ) -> Result<()> {
                    write_single(writer, key, value.as_ref())
                }

                fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
                    read_single(reader, key, true)
                }
            }

            impl Value for Vec<$ty> {
                fn write_value(
                    writer: &mut EntityWriter<'_>,
                    key: &str,
                    value: &Self,
                ) -> Result<()> {
                    write_array(writer, key, Some(value.as_slice()), None)
                }

                fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
                    let (items, _) = require(read_array(reader, key, false, false)?)?;
                    Ok(items)
                }
            }

            impl Value for Option<Vec<$ty>> {
                fn write_value(
                    writer: &mut EntityWriter<'_>,
                    key: &str,
                    value: &Self,
                ) -> Result<()> {
                    write_array(writer, key, value.as_deref(), None)
                }

                fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
                    Ok(read_array(reader, key, true, false)?.map(|(items, _)| items))
                }
            }

            impl Value for IdxVec<$ty> {
                fn write_value(
                    writer: &mut EntityWriter<'_>,
                    key: &str,
                    value: &Self,
                ) -> Result<()> {
                    write_array(writer, key, Some(value.values()), Some(value.index()))
                }

                fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
                    let (values, index) = require(read_array(reader, key, false, true)?)?;
                    Ok(IdxVec::from_parts(values, index.unwrap_or_default()))
                }
            }

            impl Value for Option<IdxVec<$ty>> {
                fn write_value(
                    writer: &mut EntityWriter<'_>,
                    key: &str,
                    value: &Self,
                ) -> Result<()> {
                    match value {
                        Some(v) => write_array(writer, key, Some(v.values()), Some(v.index())),
                        None => write_array::<$ty>(writer, key, None, None),
                    }
                }

                fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
                    Ok(read_array(reader, key, true, true)?
                        .map(|(values, index)| IdxVec::from_parts(values, index.unwrap_or_default())))
                }
            }
        )+
    };
}

impl_value_fixed! {
    i8, i16, i32, i64,
    u8, u16, u32, u64,
    f32, f64,
    I8Vec2, I8Vec3, I8Vec4,
    I16Vec2, I16Vec3, I16Vec4,
    IVec2, IVec3, IVec4,
    I64Vec2, I64Vec3, I64Vec4,
    U8Vec2, U8Vec3, U8Vec4,
    U16Vec2, U16Vec3, U16Vec4,
    UVec2, UVec3, UVec4,
    U64Vec2, U64Vec3, U64Vec4,
    Vec2, Vec3, Vec4,
    DVec2, DVec3, DVec4,
    Mat2, Mat3, Mat4,
    DMat2, DMat3, DMat4,
    Quat, DQuat,
    Uuid, Hash,
    EntityRef, ItemRef,
}

// Bools: generic single-value path, packed array path.

impl Value for bool {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_single(writer, key, Some(value))
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        require(read_single(reader, key, false)?)
    }
}

impl Value for Option<bool> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_single(writer, key, value.as_ref())
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        read_single(reader, key, true)
    }
}

impl Value for Vec<bool> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_bool_array(writer, key, Some(value.as_slice()), None)
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        let (items, _) = require(read_bool_array(reader, key, false, false)?)?;
        Ok(items)
    }
}

impl Value for Option<Vec<bool>> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_bool_array(writer, key, value.as_deref(), None)
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        Ok(read_bool_array(reader, key, true, false)?.map(|(items, _)| items))
    }
}

impl Value for IdxVec<bool> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_bool_array(writer, key, Some(value.values()), Some(value.index()))
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        let (values, index) = require(read_bool_array(reader, key, false, true)?)?;
        Ok(IdxVec::from_parts(values, index.unwrap_or_default()))
    }
}

impl Value for Option<IdxVec<bool>> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        match value {
            Some(v) => write_bool_array(writer, key, Some(v.values()), Some(v.index())),
            None => write_bool_array(writer, key, None, None),
        }
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        Ok(read_bool_array(reader, key, true, true)?
            .map(|(values, index)| IdxVec::from_parts(values, index.unwrap_or_default())))
    }
}

// Strings: large-chunk paths throughout.

impl Value for String {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_string(writer, key, Some(value))
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        require(read_string(reader, key, false)?)
    }
}

impl Value for Option<String> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_string(writer, key, value.as_deref())
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        read_string(reader, key, true)
    }
}

impl Value for Vec<String> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_string_array(writer, key, Some(value.as_slice()), None)
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        let (items, _) = require(read_string_array(reader, key, false, false)?)?;
        Ok(items)
    }
}

impl Value for Option<Vec<String>> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_string_array(writer, key, value.as_deref(), None)
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        Ok(read_string_array(reader, key, true, false)?.map(|(items, _)| items))
    }
}

impl Value for IdxVec<String> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        write_string_array(writer, key, Some(value.values()), Some(value.index()))
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        let (values, index) = require(read_string_array(reader, key, false, true)?)?;
        Ok(IdxVec::from_parts(values, index.unwrap_or_default()))
    }
}

impl Value for Option<IdxVec<String>> {
    fn write_value(writer: &mut EntityWriter<'_>, key: &str, value: &Self) -> Result<()> {
        match value {
            Some(v) => write_string_array(writer, key, Some(v.values()), Some(v.index())),
            None => write_string_array(writer, key, None, None),
        }
    }

    fn read_value(reader: &mut EntityReader<'_, '_>, key: &str) -> Result<Self> {
        Ok(read_string_array(reader, key, true, true)?
            .map(|(values, index)| IdxVec::from_parts(values, index.unwrap_or_default())))
    }
}
