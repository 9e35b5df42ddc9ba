//! The byte streams underneath the chunk codec.

use cask_types::Hash;
use uuid::Uuid;

/// Default initial reservation for a [`WriteStream`], sized so that a
/// typical entity file serializes without reallocating.
pub const DEFAULT_RESERVATION: usize = 64 * 1024 * 1024;

/// An append-only, single-writer byte buffer with a position cursor.
///
/// The buffer grows geometrically: a grow either doubles the reservation or
/// jumps straight to the requested size, whichever is larger. Moving the
/// position past the logical end grows the logical size (zero-filled), which
/// is what the chunk writer uses to backfill size fields.
///
/// Not thread safe; one stream belongs to one writer.
#[derive(Default)]
pub struct WriteStream {
    buf: Vec<u8>,
    position: usize,
}

impl WriteStream {
    /// An empty stream with no reservation.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty stream with `capacity` bytes reserved up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            position: 0,
        }
    }

    /// The logical size of the stream in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The current write position. Position 0 is the beginning of the
    /// stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the write position. Moving past the end grows the stream.
    pub fn set_position(&mut self, position: usize) {
        if position > self.buf.len() {
            self.grow_to(position);
        }
        self.position = position;
    }

    /// The written bytes, `0..len`.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Append raw bytes at the cursor, growing the stream as needed.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if end > self.buf.len() {
            self.grow_to(end);
        }
        self.buf[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    fn grow_to(&mut self, size: usize) {
        if size > self.buf.capacity() {
            // double the reservation, or jump to the requested size,
            // whichever is larger
            let target = size.max(self.buf.capacity() * 2);
            self.buf.reserve_exact(target - self.buf.len());
        }
        self.buf.resize(size, 0);
    }
}

/// A read-only byte view with a position cursor.
///
/// Reads are saturating: reading past the end returns a short count rather
/// than an error, and the chunk codec detects the mismatch from the
/// resulting positions. Not thread safe.
pub struct ReadStream<'data> {
    data: &'data [u8],
    position: usize,
}

impl<'data> ReadStream<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self { data, position: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor. Fails (returning `false`) if `position` is beyond
    /// the end of the stream.
    pub fn set_position(&mut self, position: usize) -> bool {
        if position > self.data.len() {
            return false;
        }
        self.position = position;
        true
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.position >= self.data.len()
    }

    /// The byte at the cursor without advancing, or 0 at EOF.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.data.get(self.position).copied().unwrap_or(0)
    }

    /// Copy bytes at the cursor into `dest`, returning how many were
    /// actually available. The cursor advances by the returned count.
    pub fn read_bytes(&mut self, dest: &mut [u8]) -> usize {
        let count = dest.len().min(self.remaining());
        dest[..count].copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;
        count
    }

    /// Borrow `count` bytes at the cursor, or `None` if fewer remain. On
    /// `None` the cursor moves to the end of the stream.
    pub(crate) fn take_bytes(&mut self, count: usize) -> Option<&'data [u8]> {
        if count > self.remaining() {
            self.position = self.data.len();
            return None;
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Some(bytes)
    }

    pub(crate) fn read_u8(&mut self) -> Option<u8> {
        self.take_bytes(1).map(|b| b[0])
    }

    pub(crate) fn read_u16(&mut self) -> Option<u16> {
        self.take_bytes(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
    }

    pub(crate) fn read_u64(&mut self) -> Option<u64> {
        self.take_bytes(8).map(|b| {
            u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
        })
    }
}

/// A fixed-width value the streams can carry in bulk.
///
/// For the primitive scalars the wire layout is the little-endian byte
/// form; uuids and hashes are raw bytes in printed order, with no
/// reordering on any host.
pub(crate) trait WireScalar: Copy {
    const WIDTH: usize;

    fn write_to(self, stream: &mut WriteStream);
    fn write_slice_to(values: &[Self], stream: &mut WriteStream);

    /// `None` if the stream has fewer bytes than one value.
    fn read_from(stream: &mut ReadStream<'_>) -> Option<Self>;

    /// `None` if the stream has fewer bytes than `count` values.
    fn read_slice_from(stream: &mut ReadStream<'_>, count: usize) -> Option<Vec<Self>>;
}

macro_rules! impl_wire_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl WireScalar for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn write_to(self, stream: &mut WriteStream) {
                    stream.write_bytes(&self.to_le_bytes());
                }

                fn write_slice_to(values: &[Self], stream: &mut WriteStream) {
                    // native layout == wire layout on the little-endian
                    // targets this crate supports
                    stream.write_bytes(bytemuck::cast_slice(values));
                }

                #[inline]
                fn read_from(stream: &mut ReadStream<'_>) -> Option<Self> {
                    let bytes = stream.take_bytes(Self::WIDTH)?;
                    Some(<$ty>::from_le_bytes(bytes.try_into().expect("width checked")))
                }

                fn read_slice_from(stream: &mut ReadStream<'_>, count: usize) -> Option<Vec<Self>> {
                    let bytes = stream.take_bytes(count * Self::WIDTH)?;
                    let mut values = vec![<$ty>::default(); count];
                    bytemuck::cast_slice_mut::<$ty, u8>(&mut values).copy_from_slice(bytes);
                    Some(values)
                }
            }
        )+
    };
}

impl_wire_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl WireScalar for Uuid {
    const WIDTH: usize = 16;

    #[inline]
    fn write_to(self, stream: &mut WriteStream) {
        stream.write_bytes(self.as_bytes());
    }

    fn write_slice_to(values: &[Self], stream: &mut WriteStream) {
        for value in values {
            stream.write_bytes(value.as_bytes());
        }
    }

    fn read_from(stream: &mut ReadStream<'_>) -> Option<Self> {
        let bytes = stream.take_bytes(16)?;
        Some(Self::from_bytes(bytes.try_into().expect("width checked")))
    }

    fn read_slice_from(stream: &mut ReadStream<'_>, count: usize) -> Option<Vec<Self>> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(Self::read_from(stream)?);
        }
        Some(values)
    }
}

impl WireScalar for Hash {
    const WIDTH: usize = 32;

    #[inline]
    fn write_to(self, stream: &mut WriteStream) {
        stream.write_bytes(self.as_bytes());
    }

    fn write_slice_to(values: &[Self], stream: &mut WriteStream) {
        for value in values {
            stream.write_bytes(value.as_bytes());
        }
    }

    fn read_from(stream: &mut ReadStream<'_>) -> Option<Self> {
        let bytes = stream.take_bytes(32)?;
        Some(Self::from_bytes(bytes.try_into().expect("width checked")))
    }

    fn read_slice_from(stream: &mut ReadStream<'_>, count: usize) -> Option<Vec<Self>> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(Self::read_from(stream)?);
        }
        Some(values)
    }
}
