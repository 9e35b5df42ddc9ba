use cask_codec::{EntityReader, EntityWriter, Value};
use cask_types::{BidirectionalMap, Element, Error, Result, Validator};

use crate::Managed;

/// Serialized as two parallel vectors `Keys` and `Values`, in iteration
/// order.
impl<K, V> Managed for BidirectionalMap<K, V>
where
    K: Element + Ord,
    V: Element + Ord,
    Vec<K>: Value,
    Vec<V>: Value,
{
    fn clear(&mut self) {
        Self::clear(self);
    }

    fn write(&self, writer: &mut EntityWriter<'_>) -> Result<()> {
        let mut keys = Vec::with_capacity(self.len());
        let mut values = Vec::with_capacity(self.len());
        for (key, value) in self.iter() {
            keys.push(key.clone());
            values.push(value.clone());
        }
        writer.write("Keys", &keys)?;
        writer.write("Values", &values)?;
        Ok(())
    }

    fn read(&mut self, reader: &mut EntityReader<'_, '_>) -> Result<()> {
        Self::clear(self);

        let keys: Vec<K> = reader.read("Keys")?;
        let values: Vec<V> = reader.read("Values")?;
        if keys.len() != values.len() {
            log::error!(
                "the Keys and Values arrays of a bidirectional map differ in size: {} vs {}",
                keys.len(),
                values.len()
            );
            return Err(Error::Corrupted);
        }

        for (key, value) in keys.into_iter().zip(values) {
            self.insert(key, value);
        }
        Ok(())
    }

    fn validate(&self, _validator: &mut Validator) -> Result<()> {
        // uniqueness in both directions holds by construction
        Ok(())
    }
}
