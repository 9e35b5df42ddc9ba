//! Byte-exact framing checks and the section/array state machine rules.

use cask_codec::{EntityReader, EntityWriter, ReadStream, WriteStream};
use cask_types::Error;

fn write_root(f: impl FnOnce(&mut EntityWriter<'_>)) -> Vec<u8> {
    let mut stream = WriteStream::new();
    let mut writer = EntityWriter::new(&mut stream);
    f(&mut writer);
    stream.into_vec()
}

#[test]
fn u32_small_chunk_bytes() {
    let bytes = write_root(|w| w.write("v", &0x0218_a782_u32).unwrap());
    // tag, block size (4 byte payload + 1 byte key), LE payload, key
    assert_eq!(bytes, [0x03, 0x05, 0x82, 0xa7, 0x18, 0x02, 0x76]);

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    assert_eq!(reader.read::<u32>("v").unwrap(), 0x0218_a782);
}

#[test]
fn null_optional_small_chunk_bytes() {
    let bytes = write_root(|w| w.write("v", &Option::<u32>::None).unwrap());
    // tag, block size (key only), key
    assert_eq!(bytes, [0x03, 0x01, 0x76]);

    // the null shape is accepted iff the destination is optional
    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    assert_eq!(reader.read::<Option<u32>>("v").unwrap(), None);

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    assert_eq!(reader.read::<u32>("v"), Err(Error::CantRead));
}

#[test]
fn nested_section_bytes() {
    let bytes = write_root(|w| {
        let mut section = w.begin_section("A").unwrap();
        section.write("b", &7_i8).unwrap();
        section.end().unwrap();
    });

    // large chunk prolog: tag, u64 size, key length, key
    assert_eq!(bytes[0], 0xd0);
    let declared = u64::from_le_bytes(bytes[1..9].try_into().unwrap());
    // key length byte + key + the nested small chunk
    assert_eq!(declared, 1 + 1 + 4);
    assert_eq!(bytes[9], 1);
    assert_eq!(bytes[10], b'A');
    // nested small chunk: i8 is the signed integer tag with width 1
    assert_eq!(&bytes[11..], [0x02, 0x02, 0x07, 0x62]);

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    let mut section = reader.begin_section("A", false).unwrap().unwrap();
    assert_eq!(section.read::<i8>("b").unwrap(), 7);
    section.end().unwrap();
}

#[test]
fn altered_tag_size_or_key_fails() {
    let good = write_root(|w| w.write("key", &123_456_u32).unwrap());

    let read_u32 = |bytes: &[u8]| {
        let mut rs = ReadStream::new(bytes);
        let mut reader = EntityReader::new(&mut rs);
        reader.read::<u32>("key")
    };
    assert_eq!(read_u32(&good).unwrap(), 123_456);

    // altered type tag
    let mut bad = good.clone();
    bad[0] = 0x02;
    assert_eq!(read_u32(&bad), Err(Error::CantRead));

    // altered key byte
    let mut bad = good.clone();
    *bad.last_mut().unwrap() = b'x';
    assert_eq!(read_u32(&bad), Err(Error::CantRead));

    // declared size shorter than the payload
    let mut bad = good.clone();
    bad[1] = 3;
    assert_eq!(read_u32(&bad), Err(Error::CantRead));

    // truncated stream
    assert_eq!(read_u32(&good[..4]), Err(Error::CantRead));
}

#[test]
fn empty_section_needs_permission() {
    let bytes = write_root(|w| w.write_null_section("S").unwrap());

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    assert!(reader.begin_section("S", true).unwrap().is_none());

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    assert_eq!(
        reader.begin_section("S", false).err(),
        Some(Error::Invalid)
    );
}

#[test]
fn sections_array_round_trip() {
    let bytes = write_root(|w| {
        let mut array = w.begin_sections_array("Ents", Some(3), None).unwrap();
        for i in 0..3_usize {
            let mut item = array.begin_section_in_array(i).unwrap();
            if i != 1 {
                item.write("n", &(i as u32)).unwrap();
            }
            item.end().unwrap();
        }
        array.end().unwrap();
    });

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    let mut array = reader
        .begin_sections_array("Ents", false, false)
        .unwrap()
        .unwrap();
    assert_eq!(array.len(), 3);
    for i in 0..3_usize {
        let mut item = array.begin_section_in_array(i, true).unwrap();
        assert_eq!(item.has_data(), i != 1);
        if item.has_data() {
            assert_eq!(item.read::<u32>("n").unwrap(), i as u32);
        }
        item.end().unwrap();
    }
    array.end().unwrap();
}

#[test]
fn writer_index_discipline() {
    let mut stream = WriteStream::new();
    let mut writer = EntityWriter::new(&mut stream);
    let mut array = writer.begin_sections_array("A", Some(2), None).unwrap();

    // indices must be produced strictly in order 0..count
    assert_eq!(
        array.begin_section_in_array(1).err(),
        Some(Error::InvalidParam)
    );
    array.begin_section_in_array(0).unwrap().end().unwrap();
    assert_eq!(
        array.begin_section_in_array(2).err(),
        Some(Error::InvalidParam)
    );

    // closing before all elements were written fails
    assert_eq!(array.end().err(), Some(Error::InvalidParam));
}

#[test]
fn reader_index_discipline() {
    let bytes = write_root(|w| {
        let mut array = w.begin_sections_array("A", Some(2), None).unwrap();
        for i in 0..2_usize {
            let mut item = array.begin_section_in_array(i).unwrap();
            item.write("x", &1_u8).unwrap();
            item.end().unwrap();
        }
        array.end().unwrap();
    });

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    let mut array = reader
        .begin_sections_array("A", false, false)
        .unwrap()
        .unwrap();
    assert_eq!(
        array.begin_section_in_array(1, true).err(),
        Some(Error::InvalidParam)
    );
    assert_eq!(array.end().err(), Some(Error::InvalidParam));
}

#[test]
fn required_empty_array_element_fails() {
    let bytes = write_root(|w| {
        let mut array = w.begin_sections_array("A", Some(1), None).unwrap();
        array.begin_section_in_array(0).unwrap().end().unwrap();
        array.end().unwrap();
    });

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    let mut array = reader
        .begin_sections_array("A", false, false)
        .unwrap()
        .unwrap();
    assert_eq!(
        array.begin_section_in_array(0, false).err(),
        Some(Error::Invalid)
    );
}

#[test]
fn null_sections_array_round_trip() {
    let bytes = write_root(|w| w.write_null_sections_array("A").unwrap());

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    assert!(reader
        .begin_sections_array("A", true, false)
        .unwrap()
        .is_none());

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    assert_eq!(
        reader.begin_sections_array("A", false, false).err(),
        Some(Error::Invalid)
    );
}

#[test]
fn sections_array_with_index_round_trip() {
    let index = vec![2_u32, 0, 1];
    let bytes = write_root(|w| {
        let mut array = w
            .begin_sections_array("A", Some(1), Some(&index))
            .unwrap();
        let mut item = array.begin_section_in_array(0).unwrap();
        item.write("x", &9_u16).unwrap();
        item.end().unwrap();
        array.end().unwrap();
    });

    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    let mut array = reader
        .begin_sections_array("A", false, true)
        .unwrap()
        .unwrap();
    assert_eq!(array.take_index().as_deref(), Some(&index[..]));
    let mut item = array.begin_section_in_array(0, false).unwrap();
    assert_eq!(item.read::<u16>("x").unwrap(), 9);
    item.end().unwrap();
    array.end().unwrap();
}

#[test]
fn deterministic_re_encode() {
    let write_once = || {
        write_root(|w| {
            w.write("a", &1.25_f64).unwrap();
            w.write("b", &vec![true, false, true, true]).unwrap();
            w.write("c", &"hej".to_owned()).unwrap();
            let mut s = w.begin_section("S").unwrap();
            s.write("d", &Some(7_u64)).unwrap();
            s.end().unwrap();
        })
    };
    assert_eq!(write_once(), write_once());
}
