use cask_codec::{EntityReader, EntityWriter, Value};
use cask_types::{
    validation_error, Element, IdxVec, IndexType, IndexedVector, Result, ValidationFlags,
    Validator,
};

use crate::Managed;

/// Serialized as the underlying values + index structure under the single
/// key `Values`.
impl<T, Idx> Managed for IndexedVector<T, Idx>
where
    T: Element,
    Idx: IndexType,
    IdxVec<T>: Value,
{
    fn clear(&mut self) {
        Self::clear(self);
    }

    fn write(&self, writer: &mut EntityWriter<'_>) -> Result<()> {
        writer.write("Values", self.data())
    }

    fn read(&mut self, reader: &mut EntityReader<'_, '_>) -> Result<()> {
        *self.data_mut() = reader.read("Values")?;
        Ok(())
    }

    fn validate(&self, validator: &mut Validator) -> Result<()> {
        if self.values().is_empty() {
            if !self.index().is_empty() {
                validation_error!(
                    validator,
                    ValidationFlags::INVALID_COUNT,
                    "the index vector must be empty when the values vector is"
                );
            }
            return Ok(());
        }

        if self.values().len() as u64 - 1 > Idx::MAX_INDEX {
            validation_error!(
                validator,
                ValidationFlags::INVALID_COUNT,
                "the values vector has {} values, more than the index type can address",
                self.values().len()
            );
        }

        for (position, index) in self.index().iter().enumerate() {
            if *index as usize >= self.values().len() {
                validation_error!(
                    validator,
                    ValidationFlags::INVALID_VALUE,
                    "index {index} at position {position} is out of bounds, \
                     the values vector has {} values",
                    self.values().len()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cask_codec::{ReadStream, WriteStream};

    use super::*;

    #[test]
    fn round_trip() {
        let vector: IndexedVector<f32> =
            IndexedVector::from_parts(vec![0.5, 1.5, 2.5], vec![2, 0, 1, 2]);

        let mut stream = WriteStream::new();
        let mut writer = EntityWriter::new(&mut stream);
        vector.write(&mut writer).unwrap();

        let bytes = stream.into_vec();
        let mut rs = ReadStream::new(&bytes);
        let mut reader = EntityReader::new(&mut rs);
        let mut read_back: IndexedVector<f32> = IndexedVector::new();
        read_back.read(&mut reader).unwrap();
        assert_eq!(read_back, vector);
    }

    #[test]
    fn out_of_bounds_index_is_reported_per_position() {
        // values of length 3, index [0, 2, 3]: only position 2 is invalid
        let vector: IndexedVector<u32> =
            IndexedVector::from_parts(vec![10, 20, 30], vec![0, 2, 3]);

        let mut validator = Validator::new();
        validator.set_record_descriptions(true);
        vector.validate(&mut validator).unwrap();

        assert_eq!(validator.error_count(), 1);
        assert_eq!(validator.errors(), ValidationFlags::INVALID_VALUE);
        assert!(validator.descriptions()[0].message.contains("position 2"));
    }

    #[test]
    fn last_valid_index_is_accepted() {
        let vector: IndexedVector<u8> = IndexedVector::from_parts(vec![1, 2, 3], vec![2, 2]);
        let mut validator = Validator::new();
        vector.validate(&mut validator).unwrap();
        assert_eq!(validator.error_count(), 0);
    }

    #[test]
    fn values_beyond_index_type_bound_are_reported() {
        let values = vec![0_u8; 300];
        let vector: IndexedVector<u8, u8> = IndexedVector::from_parts(values, vec![0]);
        let mut validator = Validator::new();
        vector.validate(&mut validator).unwrap();
        assert_eq!(validator.errors(), ValidationFlags::INVALID_COUNT);
    }

    #[test]
    fn nonempty_index_over_empty_values_is_reported() {
        let vector: IndexedVector<u16> = IndexedVector::from_parts(vec![], vec![0]);
        let mut validator = Validator::new();
        vector.validate(&mut validator).unwrap();
        assert_eq!(validator.errors(), ValidationFlags::INVALID_COUNT);
    }
}
