use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;

use cask_codec::{EntityReader, EntityWriter, ReadStream, WriteStream, DEFAULT_RESERVATION};
use cask_types::{EntityRef, Error, Hash, Result, Validator};

use crate::{
    compute_hash,
    entity::{Entity, PackageRecord},
    HashAlgorithm,
};

#[derive(Clone)]
struct StoreConfig {
    path: PathBuf,
    records: Vec<Arc<dyn PackageRecord>>,
    algorithm: HashAlgorithm,
}

/// The content-addressed entity store.
///
/// A store owns a flat directory of `<hex digest>.dat` files and an
/// in-memory cache of loaded entities keyed by their [`EntityRef`]. The
/// cache sits behind a reader/writer lock: lookups take the read side,
/// insertion and eviction take the write side. Entities in the cache are
/// shared; callers keep them alive by holding the `Arc` from
/// [`EntityStore::get_loaded_entity`].
///
/// The async variants dispatch the blocking work to the tokio blocking
/// pool and hand back the task's future; the synchronous variants do the
/// same work inline. Cache insertion happens only after a fully
/// successful read or write, so a cancelled task never half-populates the
/// cache.
#[derive(Default)]
pub struct EntityStore {
    config: RwLock<Option<StoreConfig>>,
    entities: RwLock<HashMap<EntityRef, Arc<dyn Entity>>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the store directory and the package records, with the default
    /// digest algorithm.
    ///
    /// Fails with [`Error::AlreadyInitialized`] on a live store,
    /// [`Error::InvalidParam`] if `records` is empty or `path` is not an
    /// existing directory.
    pub fn initialize(
        &self,
        path: impl Into<PathBuf>,
        records: Vec<Arc<dyn PackageRecord>>,
    ) -> Result<()> {
        self.initialize_with_algorithm(path, records, HashAlgorithm::default())
    }

    /// [`EntityStore::initialize`] with an explicit digest algorithm. The
    /// algorithm must match the one the directory's existing files were
    /// named with.
    pub fn initialize_with_algorithm(
        &self,
        path: impl Into<PathBuf>,
        records: Vec<Arc<dyn PackageRecord>>,
        algorithm: HashAlgorithm,
    ) -> Result<()> {
        let path = path.into();

        let mut config = self.config.write();
        if config.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        if records.is_empty() {
            log::error!("at least one package record is required");
            return Err(Error::InvalidParam);
        }
        if !path.is_dir() {
            log::error!("invalid store path: {}", path.display());
            return Err(Error::InvalidParam);
        }

        *config = Some(StoreConfig {
            path,
            records,
            algorithm,
        });
        Ok(())
    }

    fn config(&self) -> Result<StoreConfig> {
        match self.config.read().as_ref() {
            Some(config) => Ok(config.clone()),
            None => {
                log::error!("the entity store has not been initialized");
                Err(Error::NotInitialized)
            }
        }
    }

    fn file_path(config: &StoreConfig, hash: Hash) -> PathBuf {
        config.path.join(format!("{hash}.dat"))
    }

    /// Load the entity into the cache, verifying its digest. A no-op if it
    /// is already loaded.
    pub fn load_entity(&self, entity_ref: EntityRef) -> Result<()> {
        self.read_task(entity_ref)
    }

    /// [`EntityStore::load_entity`] on the blocking pool. Must be called
    /// within a tokio runtime.
    pub fn load_entity_async(self: Arc<Self>, entity_ref: EntityRef) -> JoinHandle<Result<()>> {
        tokio::task::spawn_blocking(move || self.read_task(entity_ref))
    }

    /// Validate, serialize and persist the entity, transferring ownership
    /// to the store. Returns the entity's content address.
    ///
    /// The entity must be treated as immutable from here on. If a file
    /// with the same digest already exists its bytes are by construction
    /// identical and the write is skipped.
    pub fn add_entity(&self, entity: Arc<dyn Entity>) -> Result<EntityRef> {
        self.write_task(entity)
    }

    /// [`EntityStore::add_entity`] on the blocking pool. Must be called
    /// within a tokio runtime.
    pub fn add_entity_async(
        self: Arc<Self>,
        entity: Arc<dyn Entity>,
    ) -> JoinHandle<Result<EntityRef>> {
        tokio::task::spawn_blocking(move || self.write_task(entity))
    }

    pub fn is_entity_loaded(&self, entity_ref: EntityRef) -> bool {
        self.entities.read().contains_key(&entity_ref)
    }

    /// The loaded entity, or `None` if it is not in the cache.
    pub fn get_loaded_entity(&self, entity_ref: EntityRef) -> Option<Arc<dyn Entity>> {
        self.entities.read().get(&entity_ref).cloned()
    }

    /// Evict every cached entity that no caller holds a reference to.
    pub fn unload_non_referenced_entities(&self) {
        self.entities
            .write()
            .retain(|_, entity| Arc::strong_count(entity) > 1);
    }

    fn insert_entity(&self, entity_ref: EntityRef, entity: Arc<dyn Entity>) {
        self.entities.write().insert(entity_ref, entity);
    }

    fn read_task(&self, entity_ref: EntityRef) -> Result<()> {
        let config = self.config()?;

        if self.is_entity_loaded(entity_ref) {
            return Ok(());
        }

        let path = Self::file_path(&config, entity_ref.hash());
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::error!("can't read entity file {}: {err}", path.display());
                return Err(Error::CantRead);
            }
        };

        // can't be smaller than the digest it is named by
        if bytes.len() < Hash::SIZE {
            log::error!("entity file {} is too small", path.display());
            return Err(Error::Corrupted);
        }

        // recompute the digest over the file bytes; a mismatch means the
        // file does not hold the content it is named by
        let digest = compute_hash(config.algorithm, &bytes);
        if digest != entity_ref.hash() {
            log::error!("entity file {} fails its digest check", path.display());
            return Err(Error::Corrupted);
        }

        let mut stream = ReadStream::new(&bytes);
        let mut reader = EntityReader::new(&mut stream);
        let Ok(Some(mut section)) = reader.begin_section("EntityFile", false) else {
            return Err(Error::Corrupted);
        };
        let Ok(type_name) = section.read::<String>("EntityType") else {
            return Err(Error::Corrupted);
        };
        let mut entity = new_entity(&config.records, &type_name)?;
        if read_entity(&config.records, entity.as_mut(), &mut section).is_err() {
            return Err(Error::Corrupted);
        }
        if section.end().is_err() {
            return Err(Error::Corrupted);
        }

        self.insert_entity(entity_ref, Arc::from(entity));
        Ok(())
    }

    fn write_task(&self, entity: Arc<dyn Entity>) -> Result<EntityRef> {
        let config = self.config()?;

        // the entity must pass validation before it is locked in
        let mut validator = Validator::new();
        validate_entity(&config.records, entity.as_ref(), &mut validator)?;
        if validator.error_count() > 0 {
            log::error!(
                "the entity fails validation with {} errors",
                validator.error_count()
            );
            return Err(Error::Invalid);
        }

        // serialize the whole entity into one EntityFile section
        let mut stream = WriteStream::with_capacity(DEFAULT_RESERVATION);
        let mut writer = EntityWriter::new(&mut stream);
        let mut section = writer.begin_section("EntityFile")?;
        section.write("EntityType", &entity.type_name().to_owned())?;
        write_entity(&config.records, entity.as_ref(), &mut section)?;
        section.end()?;

        let digest = compute_hash(config.algorithm, stream.as_slice());
        let path = Self::file_path(&config, digest);

        // content addressing: an existing file already holds these bytes
        if !path.exists() {
            let staging = path.with_extension("dat.tmp");
            let written = std::fs::write(&staging, stream.as_slice())
                .and_then(|()| std::fs::rename(&staging, &path));
            if let Err(err) = written {
                log::error!("can't write entity file {}: {err}", path.display());
                return Err(Error::CantWrite);
            }
        }

        let entity_ref = EntityRef::from(digest);
        self.insert_entity(entity_ref, entity);
        Ok(entity_ref)
    }
}

/// Ask each package in registration order to allocate the named type.
fn new_entity(records: &[Arc<dyn PackageRecord>], type_name: &str) -> Result<Box<dyn Entity>> {
    for record in records {
        if let Some(entity) = record.new_entity(type_name) {
            return Ok(entity);
        }
    }
    log::error!("the entity type {type_name:?} is not registered with any package");
    Err(Error::NotFound)
}

fn write_entity(
    records: &[Arc<dyn PackageRecord>],
    entity: &dyn Entity,
    writer: &mut EntityWriter<'_>,
) -> Result<()> {
    for record in records {
        match record.write(entity, writer) {
            Err(Error::NotFound) => continue,
            result => return result,
        }
    }
    log::error!(
        "the entity type {:?} is not registered with any package",
        entity.type_name()
    );
    Err(Error::NotFound)
}

fn read_entity(
    records: &[Arc<dyn PackageRecord>],
    entity: &mut dyn Entity,
    reader: &mut EntityReader<'_, '_>,
) -> Result<()> {
    for record in records {
        match record.read(entity, reader) {
            Err(Error::NotFound) => continue,
            result => return result,
        }
    }
    log::error!(
        "the entity type {:?} is not registered with any package",
        entity.type_name()
    );
    Err(Error::NotFound)
}

fn validate_entity(
    records: &[Arc<dyn PackageRecord>],
    entity: &dyn Entity,
    validator: &mut Validator,
) -> Result<()> {
    for record in records {
        match record.validate(entity, validator) {
            Err(Error::NotFound) => continue,
            result => return result,
        }
    }
    log::error!(
        "the entity type {:?} is not registered with any package",
        entity.type_name()
    );
    Err(Error::NotFound)
}
