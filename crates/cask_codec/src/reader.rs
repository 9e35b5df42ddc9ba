//! The deserializing side of the entity format, mirroring
//! [`EntityWriter`](crate::EntityWriter) transition for transition.

use cask_types::{Error, Result, WireTag};

use crate::{chunk, stream::ReadStream, value::Value};

/// Reads typed values and nested sections from a [`ReadStream`].
///
/// Like the writer, a reader is a scope bounded by its section's declared
/// end position; child readers borrow the parent, so one subsection is open
/// at a time and must be closed with [`EntityReader::end`], which verifies
/// the cursor landed exactly on the declared end.
pub struct EntityReader<'a, 'data> {
    stream: &'a mut ReadStream<'data>,
    end_position: usize,
    /// Root readers and array elements are not sections; `end()` applies
    /// only to sections.
    is_section: bool,
}

impl<'a, 'data> EntityReader<'a, 'data> {
    /// A root reader over the whole remaining stream.
    pub fn new(stream: &'a mut ReadStream<'data>) -> Self {
        let end_position = stream.len();
        Self {
            stream,
            end_position,
            is_section: false,
        }
    }

    pub(crate) fn stream_mut(&mut self) -> &mut ReadStream<'data> {
        self.stream
    }

    /// Read one keyed value of any supported element × container type.
    ///
    /// The chunk's tag, size, key and payload length are validated in that
    /// order; optionality is expressed in the destination type
    /// (`read::<Option<u32>>` accepts the null shape, `read::<u32>` does
    /// not).
    pub fn read<V: Value>(&mut self, key: &str) -> Result<V> {
        V::read_value(self, key)
    }

    /// Open the named subsection under `key`.
    ///
    /// Returns `Ok(None)` when the section is empty on the wire and
    /// `null_section_is_allowed` permits that; an empty section otherwise
    /// fails with [`Error::Invalid`]. A present section must be closed with
    /// [`EntityReader::end`].
    pub fn begin_section(
        &mut self,
        key: &str,
        null_section_is_allowed: bool,
    ) -> Result<Option<EntityReader<'_, 'data>>> {
        let end = chunk::read_large_header(self.stream, WireTag::Subsection as u8, key)?;
        if chunk::at_chunk_end(self.stream, end) {
            if null_section_is_allowed {
                return Ok(None);
            }
            log::error!("the section {key:?} is empty, which is not allowed here");
            return Err(Error::Invalid);
        }
        Ok(Some(EntityReader {
            stream: &mut *self.stream,
            end_position: end,
            is_section: true,
        }))
    }

    /// Close a subsection reader. The cursor must sit exactly on the
    /// section's declared end.
    pub fn end(self) -> Result<()> {
        if !self.is_section {
            log::error!("end() called on a reader that is not a section");
            return Err(Error::InvalidParam);
        }
        if !chunk::at_chunk_end(self.stream, self.end_position) {
            log::error!(
                "section did not end where declared: position {}, expected {}",
                self.stream.position(),
                self.end_position
            );
            return Err(Error::Invalid);
        }
        Ok(())
    }

    /// Open the array of subsections under `key`.
    ///
    /// Returns `Ok(None)` for an absent array when
    /// `null_array_is_allowed` permits that. `want_index` must match
    /// whether the array was written with an index; the index is then
    /// available from [`SectionArrayReader::take_index`].
    pub fn begin_sections_array(
        &mut self,
        key: &str,
        null_array_is_allowed: bool,
        want_index: bool,
    ) -> Result<Option<SectionArrayReader<'_, 'data>>> {
        let end = chunk::read_large_header(self.stream, WireTag::SubsectionArray as u8, key)?;
        if chunk::at_chunk_end(self.stream, end) {
            if null_array_is_allowed {
                return Ok(None);
            }
            log::error!("the sections array {key:?} is empty, which is not allowed here");
            return Err(Error::Invalid);
        }

        let (header, index) = match chunk::read_array_header(self.stream, end, want_index) {
            Ok(parts) => parts,
            Err(_) => return Err(Error::Invalid),
        };

        Ok(Some(SectionArrayReader {
            stream: &mut *self.stream,
            end_position: end,
            count: header.item_count,
            next_index: 0,
            index,
        }))
    }
}

/// An open array of subsections; hands out one element reader at a time.
pub struct SectionArrayReader<'a, 'data> {
    stream: &'a mut ReadStream<'data>,
    end_position: usize,
    count: usize,
    next_index: usize,
    index: Option<Vec<u32>>,
}

impl<'a, 'data> SectionArrayReader<'a, 'data> {
    /// The number of elements in the array.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The array's index, if one was read. Yields the value once.
    pub fn take_index(&mut self) -> Option<Vec<u32>> {
        self.index.take()
    }

    /// Open element `index` of the array.
    ///
    /// Elements must be consumed strictly in order `0..len`; any other
    /// index fails with [`Error::InvalidParam`]. An element that is empty
    /// on the wire fails with [`Error::Invalid`] unless `empty_is_allowed`;
    /// when allowed, the returned reader reports
    /// [`ArrayItemReader::has_data`] `== false` and holds no values.
    pub fn begin_section_in_array(
        &mut self,
        index: usize,
        empty_is_allowed: bool,
    ) -> Result<ArrayItemReader<'_, 'data>> {
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

        let Some(size) = self.stream.read_u64() else {
            return Err(Error::CantRead);
        };
        let Some(end) = usize::try_from(size)
            .ok()
            .and_then(|size| self.stream.position().checked_add(size))
            .filter(|end| *end <= self.end_position)
        else {
            log::error!("array element {index} declares a size beyond its array");
            return Err(Error::CantRead);
        };

        if size == 0 && !empty_is_allowed {
            log::error!("array element {index} is empty, which is not allowed here");
            return Err(Error::Invalid);
        }

        Ok(ArrayItemReader {
            reader: EntityReader {
                stream: &mut *self.stream,
                end_position: end,
                is_section: false,
            },
            has_data: size != 0,
        })
    }

    /// Close the array. All elements must have been consumed and the
    /// cursor must sit exactly on the array's declared end.
    pub fn end(self) -> Result<()> {
        if self.next_index != self.count {
            log::error!(
                "sections array closed after {} elements, expected {}",
                self.next_index,
                self.count
            );
            return Err(Error::InvalidParam);
        }
        if !chunk::at_chunk_end(self.stream, self.end_position) {
            log::error!(
                "sections array did not end where declared: position {}, expected {}",
                self.stream.position(),
                self.end_position
            );
            return Err(Error::Invalid);
        }
        Ok(())
    }
}

/// Reader for one element of a sections array.
///
/// Dereferences to [`EntityReader`] for reading the element's fields.
pub struct ArrayItemReader<'a, 'data> {
    reader: EntityReader<'a, 'data>,
    has_data: bool,
}

impl<'a, 'data> std::ops::Deref for ArrayItemReader<'a, 'data> {
    type Target = EntityReader<'a, 'data>;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl std::ops::DerefMut for ArrayItemReader<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

impl ArrayItemReader<'_, '_> {
    /// `false` iff the element was written empty.
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    /// Close the element. The cursor must sit exactly on the element's
    /// recorded end.
    pub fn end(self) -> Result<()> {
        if !chunk::at_chunk_end(self.reader.stream, self.reader.end_position) {
            log::error!(
                "array element did not end where expected: position {}, expected {}",
                self.reader.stream.position(),
                self.reader.end_position
            );
            return Err(Error::Invalid);
        }
        Ok(())
    }
}
