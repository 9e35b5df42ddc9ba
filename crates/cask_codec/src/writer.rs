//! The serializing side of the entity format.

use cask_types::{Error, Result, WireTag};

use crate::{chunk, stream::WriteStream, value::Value};

/// Serializes typed values and nested sections into a [`WriteStream`].
///
/// A writer is a scope: the one created with [`EntityWriter::new`] is the
/// root, and [`EntityWriter::begin_section`] hands out a child writer for
/// the nested scope. The child borrows the parent, so only one subsection
/// can be open at a time, and it must be closed with
/// [`EntityWriter::end`] (which backfills the section's size field) before
/// the parent is usable again.
pub struct EntityWriter<'a> {
    stream: &'a mut WriteStream,
    /// Position of this section's chunk header; `None` for the root scope
    /// and for array elements, which have no header of their own.
    header_start: Option<usize>,
}

impl<'a> EntityWriter<'a> {
    /// A root writer at the stream's current position.
    pub fn new(stream: &'a mut WriteStream) -> Self {
        Self {
            stream,
            header_start: None,
        }
    }

    pub(crate) fn stream_mut(&mut self) -> &mut WriteStream {
        self.stream
    }

    /// Write one keyed value of any supported element × container type.
    pub fn write<V: Value>(&mut self, key: &str, value: &V) -> Result<()> {
        V::write_value(self, key, value)
    }

    /// Open a named subsection. The returned writer must be closed with
    /// [`EntityWriter::end`].
    pub fn begin_section(&mut self, key: &str) -> Result<EntityWriter<'_>> {
        let start = chunk::begin_large(self.stream, WireTag::Subsection as u8, key)?;
        Ok(EntityWriter {
            stream: &mut *self.stream,
            header_start: Some(start),
        })
    }

    /// Close a subsection writer, backfilling its size field.
    ///
    /// Fails with [`Error::InvalidParam`] on the root writer, which has no
    /// section to close.
    pub fn end(self) -> Result<()> {
        let Some(start) = self.header_start else {
            log::error!("end() called on a writer that is not a section");
            return Err(Error::InvalidParam);
        };
        chunk::end_large(self.stream, start)
    }

    /// Write an empty (null) section under `key`.
    pub fn write_null_section(&mut self, key: &str) -> Result<()> {
        self.begin_section(key)?.end()
    }

    /// Open an array of unnamed subsections under `key`.
    ///
    /// `count` is the number of elements that must then be written, in
    /// order; `None` marks the whole array as absent (an empty chunk on the
    /// wire). `index` optionally attaches a `u32` index to the array.
    pub fn begin_sections_array(
        &mut self,
        key: &str,
        count: Option<usize>,
        index: Option<&[u32]>,
    ) -> Result<SectionArrayWriter<'_>> {
        let start = chunk::begin_large(self.stream, WireTag::SubsectionArray as u8, key)?;
        let count = match count {
            Some(count) => {
                chunk::write_array_header(self.stream, 0, count as u64, index);
                count
            }
            None => 0,
        };
        Ok(SectionArrayWriter {
            stream: &mut *self.stream,
            header_start: start,
            count,
            next_index: 0,
        })
    }

    /// Write an absent sections array under `key`.
    pub fn write_null_sections_array(&mut self, key: &str) -> Result<()> {
        self.begin_sections_array(key, None, None)?.end()
    }
}

/// An open array of subsections; hands out one element writer at a time.
pub struct SectionArrayWriter<'a> {
    stream: &'a mut WriteStream,
    header_start: usize,
    count: usize,
    next_index: usize,
}

impl SectionArrayWriter<'_> {
    /// Open element `index` of the array.
    ///
    /// Elements must be produced strictly in order `0..count`; any other
    /// index fails with [`Error::InvalidParam`]. The returned writer must
    /// be closed with [`ArrayItemWriter::end`].
    pub fn begin_section_in_array(&mut self, index: usize) -> Result<ArrayItemWriter<'_>> {
        if index != self.next_index {
            log::error!(
                "out of sync section index {index}, expected {}",
                self.next_index
            );
            return Err(Error::InvalidParam);
        }
        if index >= self.count {
            log::error!(
                "section index {index} out of bounds, the array size is {}",
                self.count
            );
            return Err(Error::InvalidParam);
        }
        self.next_index += 1;

        // stand-in element size, impossible on purpose so a missed end()
        // cannot produce a plausible stream
        let size_field = self.stream.position();
        self.stream.write_u64(i64::MAX as u64);

        Ok(ArrayItemWriter {
            writer: EntityWriter {
                stream: &mut *self.stream,
                header_start: None,
            },
            size_field,
        })
    }

    /// Close the array, backfilling its size field. All `count` elements
    /// must have been written.
    pub fn end(self) -> Result<()> {
        if self.next_index != self.count {
            log::error!(
                "sections array closed after {} elements, expected {}",
                self.next_index,
                self.count
            );
            return Err(Error::InvalidParam);
        }
        chunk::end_large(self.stream, self.header_start)
    }
}

/// Writer for one element of a sections array.
///
/// Dereferences to [`EntityWriter`] for writing the element's fields. An
/// element left empty (no writes) reads back as a no-data element.
pub struct ArrayItemWriter<'a> {
    writer: EntityWriter<'a>,
    size_field: usize,
}

impl<'a> std::ops::Deref for ArrayItemWriter<'a> {
    type Target = EntityWriter<'a>;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}

impl std::ops::DerefMut for ArrayItemWriter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}

impl ArrayItemWriter<'_> {
    /// Close the element, backfilling its size prefix.
    pub fn end(self) -> Result<()> {
        let end = self.writer.stream.position();
        let size = (end - self.size_field - 8) as u64;
        self.writer.stream.set_position(self.size_field);
        self.writer.stream.write_u64(size);
        self.writer.stream.set_position(end);
        Ok(())
    }
}
