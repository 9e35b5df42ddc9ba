use cask_codec::{EntityReader, EntityWriter, Value};
use cask_types::{
    validation_error, Element, Error, ItemTable, Result, TableFlags, ValidationFlags, Validator,
};

use crate::Managed;

/// Serialized as the `IDs` vector of keys plus the `Ents` array of
/// sections, one per key in the same order; an empty array element is a
/// null slot.
impl<K, V> Managed for ItemTable<K, V>
where
    K: Element + Ord,
    V: Managed,
    Vec<K>: Value,
{
    fn clear(&mut self) {
        Self::clear(self);
    }

    fn write(&self, writer: &mut EntityWriter<'_>) -> Result<()> {
        let keys: Vec<K> = self.entries().keys().cloned().collect();
        writer.write("IDs", &keys)?;

        let mut array = writer.begin_sections_array("Ents", Some(keys.len()), None)?;
        for (index, slot) in self.entries().values().enumerate() {
            let mut item = array.begin_section_in_array(index)?;
            if let Some(value) = slot {
                value.write(&mut item)?;
            }
            item.end()?;
        }
        array.end()
    }

    fn read(&mut self, reader: &mut EntityReader<'_, '_>) -> Result<()> {
        let keys: Vec<K> = reader.read("IDs")?;

        let Some(mut array) = reader.begin_sections_array("Ents", false, false)? else {
            return Err(Error::Corrupted);
        };
        // the element count comes from the array itself and must agree
        // with the key count
        if array.len() != keys.len() {
            log::error!(
                "the IDs and Ents arrays of an item table differ in size: {} vs {}",
                keys.len(),
                array.len()
            );
            return Err(Error::Corrupted);
        }

        Self::clear(self);
        for (index, key) in keys.into_iter().enumerate() {
            let mut item = array.begin_section_in_array(index, true)?;
            let slot = if item.has_data() {
                let mut value = V::default();
                value.read(&mut item)?;
                Some(value)
            } else {
                None
            };
            item.end()?;

            if self.contains_key(&key) {
                log::error!("duplicate key in an item table stream");
                return Err(Error::CantRead);
            }
            self.entries_mut().insert(key, slot);
        }
        array.end()
    }

    fn validate(&self, validator: &mut Validator) -> Result<()> {
        if !self.flags().contains(TableFlags::ZERO_KEYS) && self.contains_key(&K::zero()) {
            validation_error!(
                validator,
                ValidationFlags::NULL_NOT_ALLOWED,
                "the table has a zero-value key, which its flags do not allow"
            );
        }

        let allow_null = self.flags().contains(TableFlags::NULL_ENTITIES);
        for (key, slot) in self.entries() {
            match slot {
                Some(value) => value.validate(validator)?,
                None => {
                    if !allow_null {
                        validation_error!(
                            validator,
                            ValidationFlags::NULL_NOT_ALLOWED,
                            "the slot of key {key:?} is null, which the table flags do not allow"
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
