//! Item table serialization and the key/slot nullability rules.

use cask_codec::{EntityReader, EntityWriter, ReadStream, WriteStream};
use cask_types::{
    Error, ItemRef, ItemTable, Result, TableFlags, ValidationFlags, Validator,
};
use cask_data::{equals, validate_keys_in, Managed};

/// A minimal managed record for the table slots.
#[derive(Debug, Clone, Default, PartialEq)]
struct Label {
    text: String,
    weight: Option<u32>,
}

impl Managed for Label {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn write(&self, writer: &mut EntityWriter<'_>) -> Result<()> {
        writer.write("Text", &self.text)?;
        writer.write("Wght", &self.weight)?;
        Ok(())
    }

    fn read(&mut self, reader: &mut EntityReader<'_, '_>) -> Result<()> {
        self.text = reader.read("Text")?;
        self.weight = reader.read("Wght")?;
        Ok(())
    }

    fn validate(&self, _validator: &mut Validator) -> Result<()> {
        Ok(())
    }
}

fn label(text: &str, weight: Option<u32>) -> Label {
    Label {
        text: text.to_owned(),
        weight,
    }
}

fn round_trip(table: &ItemTable<u32, Label>) -> ItemTable<u32, Label> {
    let mut stream = WriteStream::new();
    let mut writer = EntityWriter::new(&mut stream);
    table.write(&mut writer).unwrap();

    let bytes = stream.into_vec();
    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    let mut read_back = ItemTable::new(table.flags());
    read_back.read(&mut reader).unwrap();
    read_back
}

#[test]
fn tables_round_trip_with_null_slots() {
    let mut table: ItemTable<u32, Label> = ItemTable::new(TableFlags::NULL_ENTITIES);
    *table.insert(1) = label("one", Some(11));
    table.insert_null(2);
    *table.insert(3) = label("three", None);

    let read_back = round_trip(&table);
    assert_eq!(read_back, table);
    assert_eq!(read_back.get(&1), Some(&label("one", Some(11))));
    assert!(read_back.contains_key(&2));
    assert_eq!(read_back.get(&2), None);
}

#[test]
fn empty_table_round_trips() {
    let table: ItemTable<u32, Label> = ItemTable::new(TableFlags::empty());
    assert_eq!(round_trip(&table), table);
}

#[test]
fn mismatched_ids_and_ents_are_corrupted() {
    // serialize by hand with a missing entry in the sections array
    let mut stream = WriteStream::new();
    let mut writer = EntityWriter::new(&mut stream);
    writer.write("IDs", &vec![1_u32, 2]).unwrap();
    let mut array = writer.begin_sections_array("Ents", Some(1), None).unwrap();
    let mut item = array.begin_section_in_array(0).unwrap();
    label("one", None).write(&mut item).unwrap();
    item.end().unwrap();
    array.end().unwrap();

    let bytes = stream.into_vec();
    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    let mut read_back: ItemTable<u32, Label> = ItemTable::new(TableFlags::empty());
    assert_eq!(read_back.read(&mut reader), Err(Error::Corrupted));
}

#[test]
fn zero_keys_are_rejected_unless_allowed() {
    let mut table: ItemTable<u32, Label> = ItemTable::new(TableFlags::empty());
    *table.insert(0) = label("zero", None);

    let mut validator = Validator::new();
    table.validate(&mut validator).unwrap();
    assert_eq!(validator.errors(), ValidationFlags::NULL_NOT_ALLOWED);

    table.set_flags(TableFlags::ZERO_KEYS);
    let mut validator = Validator::new();
    table.validate(&mut validator).unwrap();
    assert_eq!(validator.error_count(), 0);
}

#[test]
fn null_slots_are_rejected_unless_allowed() {
    let mut table: ItemTable<u32, Label> = ItemTable::new(TableFlags::empty());
    table.insert_null(7);

    let mut validator = Validator::new();
    table.validate(&mut validator).unwrap();
    assert_eq!(validator.errors(), ValidationFlags::NULL_NOT_ALLOWED);

    table.set_flags(TableFlags::NULL_ENTITIES);
    let mut validator = Validator::new();
    table.validate(&mut validator).unwrap();
    assert_eq!(validator.error_count(), 0);
}

#[test]
fn validation_recurses_into_slots() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct AlwaysInvalid;

    impl Managed for AlwaysInvalid {
        fn clear(&mut self) {}
        fn write(&self, _writer: &mut EntityWriter<'_>) -> Result<()> {
            Ok(())
        }
        fn read(&mut self, _reader: &mut EntityReader<'_, '_>) -> Result<()> {
            Ok(())
        }
        fn validate(&self, validator: &mut Validator) -> Result<()> {
            validator.report_error(ValidationFlags::INVALID_VALUE);
            Ok(())
        }
    }

    let mut table: ItemTable<u32, AlwaysInvalid> = ItemTable::new(TableFlags::empty());
    table.insert(1);
    table.insert(2);

    let mut validator = Validator::new();
    table.validate(&mut validator).unwrap();
    assert_eq!(validator.error_count(), 2);
    assert_eq!(validator.errors(), ValidationFlags::INVALID_VALUE);
}

#[test]
fn cross_table_key_checks() {
    let mut table: ItemTable<ItemRef, Label> = ItemTable::new(TableFlags::empty());
    let present = ItemRef::make_ref();
    let absent = ItemRef::make_ref();
    *table.insert(present) = label("here", None);

    let mut validator = Validator::new();
    validate_keys_in([&present], &table, "Labels", &mut validator);
    assert_eq!(validator.error_count(), 0);

    validate_keys_in([&present, &absent], &table, "Labels", &mut validator);
    assert_eq!(validator.errors(), ValidationFlags::MISSING_OBJECT);
    assert_eq!(validator.error_count(), 1);
}

#[test]
fn deep_copy_and_equality() {
    let mut table: ItemTable<u32, Label> = ItemTable::new(TableFlags::NULL_ENTITIES);
    *table.insert(5) = label("five", Some(5));
    table.insert_null(6);

    let mut copy: ItemTable<u32, Label> = ItemTable::new(TableFlags::NULL_ENTITIES);
    copy.deep_copy_from(Some(&table));
    assert!(equals(Some(&table), Some(&copy)));

    *copy.insert(5) = label("five!", Some(5));
    assert!(!equals(Some(&table), Some(&copy)));
    assert!(equals::<ItemTable<u32, Label>>(None, None));
}
