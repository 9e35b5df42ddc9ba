//! Feeding arbitrary bytes through the reader must never panic, never read
//! past the stream, and always fail with a kind from the closed error set.

use cask_codec::{EntityReader, ReadStream};
use cask_types::{Error, IdxVec};
use rand::rngs::SmallRng;
use rand::{Rng as _, SeedableRng as _};

fn check_error(result: Result<(), Error>) {
    if let Err(err) = result {
        assert!(
            matches!(
                err,
                Error::CantRead | Error::Corrupted | Error::Invalid | Error::InvalidParam
            ),
            "unexpected error kind {err:?} from random input"
        );
    }
}

#[test]
fn random_bytes_never_panic_the_reader() {
    for seed in 0..32_u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let length = rng.random_range(10_000..50_000);
        let data: Vec<u8> = (0..length).map(|_| rng.random()).collect();

        let mut stream = ReadStream::new(&data);
        let mut reader = EntityReader::new(&mut stream);

        for _ in 0..1_000 {
            check_error(reader.read::<i32>("i").map(|_| ()));
            check_error(reader.read::<Vec<i8>>("dv").map(|_| ()));
            check_error(reader.read::<String>("ds").map(|_| ()));
            check_error(reader.read::<Option<u64>>("o").map(|_| ()));
            check_error(reader.read::<IdxVec<f32>>("ix").map(|_| ()));
            check_error(match reader.begin_section("s", true) {
                Ok(Some(section)) => section.end(),
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            });
            check_error(match reader.begin_sections_array("a", true, false) {
                Ok(Some(array)) => array.end(),
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            });
        }

        assert!(stream.position() <= stream.len());
    }
}

#[test]
fn truncations_of_a_valid_stream_never_panic() {
    use cask_codec::{EntityWriter, WriteStream};

    let mut ws = WriteStream::new();
    let mut writer = EntityWriter::new(&mut ws);
    let mut section = writer.begin_section("S").unwrap();
    section.write("a", &123_u32).unwrap();
    section.write("b", &"payload".to_owned()).unwrap();
    section.write("c", &vec![1.0_f32, 2.0, 3.0]).unwrap();
    section.end().unwrap();
    let bytes = ws.into_vec();

    for cut in 0..bytes.len() {
        let mut stream = ReadStream::new(&bytes[..cut]);
        let mut reader = EntityReader::new(&mut stream);
        let result = (|| -> Result<(), Error> {
            let mut section = match reader.begin_section("S", false)? {
                Some(section) => section,
                None => return Ok(()),
            };
            section.read::<u32>("a")?;
            section.read::<String>("b")?;
            section.read::<Vec<f32>>("c")?;
            section.end()
        })();
        assert!(result.is_err(), "truncated stream at {cut} read successfully");
    }
}
