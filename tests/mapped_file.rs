//! Memory-mapped input files: zero-copy identity, multi-record iteration,
//! and the file-level error kinds.

mod common;

use std::fs;

use common::PersonV1;
use tempfile::tempdir;
use zercord::{
    write, ErrorKind, FieldAccess, FieldDefinition, MappedReader, PlainValue, Schema, TypeTag,
};

fn person_schema() -> Schema {
    Schema::new("person", 1)
        .with_field(FieldDefinition::new("id", TypeTag::U32))
        .with_field(FieldDefinition::new("name", TypeTag::String))
}

fn encode_person(id: u32, name: &str) -> Vec<u8> {
    let person = PersonV1 {
        id,
        name: name.to_owned(),
    };
    let mut buf = vec![0u8; 256];
    let written = write(&person, &mut buf, &person_schema()).unwrap();
    buf.truncate(written);
    buf
}

#[test]
fn zero_copy_view_points_into_the_mapping() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("one.zcrt");
    fs::write(&path, encode_person(1, "Marie")).unwrap();

    let reader = MappedReader::open(&path).unwrap();
    let view = reader.view().unwrap();
    let accessor = view.accessor::<PersonV1>().unwrap();

    let access = accessor.get_field("name", TypeTag::String).unwrap();
    assert!(access.is_view());
    let bytes = access.as_view().unwrap();
    assert_eq!(bytes, b"Marie");

    // The slice lies inside the mapping's address range: zero copies.
    let base = reader.as_bytes().as_ptr() as usize;
    let addr = bytes.as_ptr() as usize;
    assert!(addr >= base && addr + bytes.len() <= base + reader.len());
}

#[test]
fn scalar_field_access_is_owned() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("one.zcrt");
    fs::write(&path, encode_person(42, "x")).unwrap();

    let reader = MappedReader::open(&path).unwrap();
    let view = reader.view().unwrap();

    let access = view.get_field("id", TypeTag::U32).unwrap();
    assert!(!access.is_view());
    assert_eq!(access, FieldAccess::Owned(PlainValue::U32(42)));

    // Widening applies to single-field access too.
    let access = view.get_field("id", TypeTag::U64).unwrap();
    assert_eq!(access, FieldAccess::Owned(PlainValue::U64(42)));
}

#[test]
fn unknown_field_and_mismatched_tag_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("one.zcrt");
    fs::write(&path, encode_person(1, "y")).unwrap();

    let reader = MappedReader::open(&path).unwrap();
    let view = reader.view().unwrap();

    let err = view.get_field("missing", TypeTag::U32).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);
    assert_eq!(err.field(), Some("missing"));

    let err = view.get_field("name", TypeTag::U32).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldTypeMismatch);
}

#[test]
fn iterator_walks_concatenated_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("many.zcrt");

    let mut blob = Vec::new();
    for (id, name) in [(1u32, "a"), (2, "bb"), (3, "ccc")] {
        blob.extend_from_slice(&encode_person(id, name));
    }
    fs::write(&path, &blob).unwrap();

    let reader = MappedReader::open(&path).unwrap();
    let schema = person_schema();
    let mut ids = Vec::new();
    for record in reader.records() {
        let view = record.unwrap();
        let person = view.accessor::<PersonV1>().unwrap().get(&schema).unwrap();
        ids.push(person.id);
    }
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn iterator_reports_garbage_between_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.zcrt");

    let mut blob = encode_person(1, "ok");
    let good_len = blob.len();
    blob.extend_from_slice(b"GARBAGE!");
    fs::write(&path, &blob).unwrap();

    let reader = MappedReader::open(&path).unwrap();
    let mut records = reader.records();

    assert!(records.next().unwrap().is_ok());
    let err = records.next().unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMagicNumber);
    assert_eq!(err.position(), Some(good_len));
    assert!(records.next().is_none());
}

#[test]
fn missing_file_and_empty_file_error_kinds() {
    let dir = tempdir().unwrap();

    let err = MappedReader::open(dir.path().join("absent.zcrt")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);

    let path = dir.path().join("empty.zcrt");
    fs::write(&path, b"").unwrap();
    let err = MappedReader::open(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MappingFailed);
}

#[test]
fn mixed_format_files_iterate_cleanly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.zcrt");

    // A legacy record between two versioned ones.
    let mut blob = encode_person(1, "first");
    let mut legacy = vec![0u8; 64];
    let n = zercord::write_v1(&7i32, &mut legacy).unwrap();
    blob.extend_from_slice(&legacy[..n]);
    blob.extend_from_slice(&encode_person(3, "third"));
    fs::write(&path, &blob).unwrap();

    let reader = MappedReader::open(&path).unwrap();
    let formats: Vec<u32> = reader
        .records()
        .map(|r| r.unwrap().format_version())
        .collect();
    assert_eq!(formats, vec![2, 1, 2]);
}
