//! On-disk round trip using `tempfile::NamedTempFile`.

use std::fs::File;
use std::io::{Read, Write};

use mfaf::archive::Archive;
use mfaf::metadata::Entry;

#[test]
fn pack_and_reopen_from_disk() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();

    {
        let mut ar = Archive::new();
        ar.add(Entry::new("readme.txt", b"Hello, MFAF!".to_vec()).with_mime_type("text/plain")).unwrap();
        ar.add(Entry::new("data.bin", vec![0xDE, 0xAD, 0xBE, 0xEF])).unwrap();

        let mut file = File::create(&path).unwrap();
        ar.save(&mut file).unwrap();
    }

    {
        let file = File::open(&path).unwrap();
        let mut ar = Archive::load(file).unwrap();
        assert_eq!(ar.names(), vec!["readme.txt".to_string(), "data.bin".to_string()]);

        let readme = ar.get("readme.txt").unwrap().unwrap();
        assert_eq!(readme.content, b"Hello, MFAF!");
        assert_eq!(readme.mime_type, "text/plain");

        let mut extracted = Vec::new();
        ar.extract("data.bin", &mut extracted).unwrap();
        assert_eq!(extracted, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }
}

#[test]
fn header_and_trailer_magic_land_at_the_documented_offsets() {
    let mut ar = Archive::new();
    ar.add(Entry::new("a", vec![0x61])).unwrap();

    let mut buf = Vec::new();
    ar.save(&mut buf).unwrap();

    assert_eq!(&buf[0..8], &[0x4D, 0x41, 0x46, 0x46, 0x49, 0x4C, 0x45, 0x01]);
    let trailer_start = buf.len() - 64;
    assert_eq!(&buf[trailer_start..trailer_start + 8], &[0x45, 0x4E, 0x44, 0x4D, 0x41, 0x46, 0x00, 0x00]);
    // content byte sits immediately after the header.
    assert_eq!(buf[64], 0x61);
}

#[test]
fn hand_crafted_unknown_key_is_ignored_and_not_echoed_on_resave() {
    // An entry map with an extra "x" key decodes fine, and the canonical
    // re-encoder does not echo it back out.
    use serde::Serialize;

    #[derive(Serialize)]
    struct RawEntryWithExtra {
        n: String,
        o: u64,
        s: u64,
        m: String,
        a: mfaf::AttributeMap,
        x: i64,
    }

    let raw = vec![RawEntryWithExtra {
        n: "a".to_string(),
        o: 64,
        s: 1,
        m: "text/plain".to_string(),
        a: Default::default(),
        x: 42,
    }];
    let metadata_bytes = rmp_serde::encode::to_vec_named(&raw).unwrap();

    let metadata_offset = 64u64;
    let metadata_end = metadata_offset + metadata_bytes.len() as u64;
    let total_size = metadata_end + 64;
    let checksum = mfaf::crc::crc32(&metadata_bytes);

    let mut buf = Vec::new();
    mfaf::Header {
        total_size,
        metadata_offset,
        file_count: 1,
        version: 1,
        flags: 0,
    }
    .write(&mut buf)
    .unwrap();
    buf.write_all(&[0x61]).unwrap();
    buf.write_all(&metadata_bytes).unwrap();
    mfaf::Trailer { metadata_end, checksum }.write(&mut buf).unwrap();

    let mut ar = Archive::load(std::io::Cursor::new(buf)).unwrap();
    let entry = ar.get("a").unwrap().unwrap();
    assert_eq!(entry.content, vec![0x61]);

    // Re-save through the normal add/save path and confirm "x" never
    // appears in the re-encoded metadata bytes.
    let mut rebuilt = Archive::new();
    rebuilt.add(entry).unwrap();
    let mut rebuilt_bytes = Vec::new();
    rebuilt.save(&mut rebuilt_bytes).unwrap();

    // Decode the rebuilt metadata region and confirm only the five
    // canonical keys survive — "x" is gone.
    let mut f = std::io::Cursor::new(rebuilt_bytes);
    let mut whole = Vec::new();
    f.read_to_end(&mut whole).unwrap();
    let header = mfaf::Header::read(&mut std::io::Cursor::new(&whole[..64]), false).unwrap();
    let trailer_start = whole.len() - 64;
    let trailer = mfaf::Trailer::read(&mut std::io::Cursor::new(&whole[trailer_start..])).unwrap();
    let metadata = &whole[header.metadata_offset as usize..trailer.metadata_end as usize];
    let decoded: Vec<mfaf::msgpack::RawEntry> = rmp_serde::from_slice(metadata).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].n, "a");
}
