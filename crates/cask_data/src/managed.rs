use cask_codec::{EntityReader, EntityWriter};
use cask_types::{Result, Validator};

/// The management function surface every composite value exposes.
///
/// `write` and `read` serialize the value's fields as keyed children of the
/// *current* writer/reader scope; opening a section for the value is the
/// caller's business. `validate` accumulates into the validator and only
/// returns an error for internal failures, never for validation findings.
pub trait Managed: Clone + Default + PartialEq {
    /// Reset the value to its empty state. Policy flags, where a container
    /// carries them, survive clearing.
    fn clear(&mut self);

    /// Replace `self` with a deep copy of `source`; a `None` source clears.
    fn deep_copy_from(&mut self, source: Option<&Self>) {
        match source {
            Some(source) => self.clone_from(source),
            None => self.clear(),
        }
    }

    fn write(&self, writer: &mut EntityWriter<'_>) -> Result<()>;

    fn read(&mut self, reader: &mut EntityReader<'_, '_>) -> Result<()>;

    fn validate(&self, validator: &mut Validator) -> Result<()>;
}

/// Value equality over optional references, with the pointer short-cuts of
/// the management function contract: two `None`s are equal, identical
/// references are equal without comparing, one-sided `None` never is.
pub fn equals<T: PartialEq>(lhs: Option<&T>, rhs: Option<&T>) -> bool {
    match (lhs, rhs) {
        (None, None) => true,
        (Some(lhs), Some(rhs)) => std::ptr::eq(lhs, rhs) || lhs == rhs,
        _ => false,
    }
}
