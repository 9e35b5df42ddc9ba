use std::any::Any;

use cask_codec::{EntityReader, EntityWriter};
use cask_types::{Result, Validator};

/// An atomic user record: owns every value inside it and is serialized in
/// one go.
///
/// Implementations come from package code generation, not from this crate;
/// the store only needs the stable type name (to find the right package on
/// load) and `Any` access so packages can downcast to their concrete
/// types.
pub trait Entity: Any + Send + Sync {
    /// The stable name of the entity type, unique across all registered
    /// packages.
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The contract a package supplies so the store can handle its entity
/// types without knowing them.
///
/// Every operation answers [`Error::NotFound`](cask_types::Error::NotFound)
/// for "not my package, keep looking"; the store tries each registered
/// record in order and treats any other error as final.
pub trait PackageRecord: Send + Sync {
    /// Create a new, writable entity of the named type.
    fn new_entity(&self, type_name: &str) -> Option<Box<dyn Entity>>;

    /// Serialize an entity's fields into the open section.
    fn write(&self, entity: &dyn Entity, writer: &mut EntityWriter<'_>) -> Result<()>;

    /// Deserialize an entity's fields from the open section.
    fn read(&self, entity: &mut dyn Entity, reader: &mut EntityReader<'_, '_>) -> Result<()>;

    /// Check an entity's invariants, accumulating into the validator.
    fn validate(&self, entity: &dyn Entity, validator: &mut Validator) -> Result<()>;
}
