//! Generator tests: artifact content across targets, deterministic output,
//! all-or-nothing writing.

use mspgen::emit::{generate, generate_all, write_artifacts, EmitError, TargetProfile};
use mspgen::schema::MessageCatalog;

const SCHEMA: &str = r#"{
    "RC": [
        {"ID": "105"},
        {"comment": "raw channel values"},
        {"c1": "short"},
        {"c2": "short"},
        {"c3": "short"},
        {"c4": "short"}
    ],
    "ATTITUDE": [
        {"ID": "108"},
        {"roll": "short"},
        {"pitch": "short"},
        {"yaw": "short"}
    ],
    "ALTITUDE": [
        {"ID": "206"},
        {"estalt": "int"},
        {"vario": "short"}
    ]
}"#;

fn catalog() -> MessageCatalog {
    MessageCatalog::from_json(SCHEMA).expect("load")
}

#[test]
fn all_targets_generate() {
    let artifacts = generate_all(&catalog(), &TargetProfile::all()).expect("generate");
    assert_eq!(artifacts.len(), 3);
    let langs: Vec<_> = artifacts.iter().map(|a| a.language).collect();
    assert_eq!(langs, ["cpp", "python", "java"]);
    for a in &artifacts {
        assert!(!a.source.is_empty());
    }
}

#[test]
fn emission_order_follows_schema_declaration_order() {
    let artifact = generate(&catalog(), &TargetProfile::python()).expect("generate");
    let rc = artifact.source.find("def serialize_RC(").expect("RC serializer");
    let attitude = artifact
        .source
        .find("def serialize_ATTITUDE(")
        .expect("ATTITUDE serializer");
    let altitude = artifact
        .source
        .find("def serialize_ALTITUDE(")
        .expect("ALTITUDE serializer");
    assert!(rc < attitude && attitude < altitude);
}

#[test]
fn request_class_messages_get_request_serializers() {
    for profile in TargetProfile::all() {
        let artifact = generate(&catalog(), &profile).expect("generate");
        // ID 105 and 108 are request-class, 206 is not.
        assert!(
            artifact.source.contains("serialize_RC_Request"),
            "{} lacks RC request serializer",
            artifact.language
        );
        assert!(
            artifact.source.contains("serialize_ATTITUDE_Request"),
            "{} lacks ATTITUDE request serializer",
            artifact.language
        );
        assert!(
            !artifact.source.contains("serialize_ALTITUDE_Request"),
            "{} emitted a request serializer for a state message",
            artifact.language
        );
    }
}

#[test]
fn request_serializer_doubles_the_id() {
    let py = generate(&catalog(), &TargetProfile::python()).expect("generate");
    assert!(py.source.contains("msg = [0, 105, 105]"));
    let java = generate(&catalog(), &TargetProfile::java()).expect("generate");
    assert!(java.source.contains("message[4] = (byte)105;"));
    assert!(java.source.contains("message[5] = (byte)105;"));
    let cpp = generate(&catalog(), &TargetProfile::cpp()).expect("generate");
    assert!(cpp.source.contains("bytes[4] = 105;"));
    assert!(cpp.source.contains("bytes[5] = 105;"));
}

#[test]
fn direction_byte_tracks_id_range() {
    let py = generate(&catalog(), &TargetProfile::python()).expect("generate");
    // 60 = '<' for the request-class serializers, 62 = '>' for state.
    assert!(py.source.contains("return bytes([36, 77, 60] + msg + [_crc8(msg)])"));
    assert!(py.source.contains("return bytes([36, 77, 62] + msg + [_crc8(msg)])"));
}

#[test]
fn java_dispatcher_reads_cumulative_offsets() {
    let artifact = generate(&catalog(), &TargetProfile::java()).expect("generate");
    // ALTITUDE: int at 0, short at 4.
    assert!(artifact.source.contains("bb.getInt(0)"));
    assert!(artifact.source.contains("bb.getShort(4)"));
    // ATTITUDE: three shorts at 0, 2, 4.
    assert!(artifact.source.contains("bb.getShort(0)"));
    assert!(artifact.source.contains("bb.getShort(2)"));
}

#[test]
fn cpp_checksum_call_covers_len_id_payload() {
    let artifact = generate(&catalog(), &TargetProfile::cpp()).expect("generate");
    // ATTITUDE payload is 6 bytes; domain = len + id + payload = 8,
    // checksum lands at byte 11.
    assert!(artifact.source.contains("bytes[11] = crc8(&bytes[3], 8);"));
}

#[test]
fn artifacts_land_under_language_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let artifacts = generate_all(&catalog(), &TargetProfile::all()).expect("generate");
    let written = write_artifacts(&artifacts, dir.path()).expect("write");
    assert_eq!(written.len(), 3);
    assert!(dir.path().join("cpp/serialtask.hpp").is_file());
    assert!(dir.path().join("python/myparser.py").is_file());
    assert!(dir.path().join("java/MyParser.java").is_file());
}

#[test]
fn generation_failure_means_nothing_is_written() {
    let bad = r#"{
        "OK": [{"ID": "10"}, {"x": "short"}],
        "MIXED_REPLY": [{"ID": "11"}, {"a": "short"}, {"b": "float"}]
    }"#;
    let catalog = MessageCatalog::from_json(bad).expect("load");
    let dir = tempfile::tempdir().expect("tempdir");
    let result = generate_all(&catalog, &TargetProfile::all());
    assert!(matches!(result, Err(EmitError::MixedTypeReply { .. })));
    // The generate/write split guarantees no partial output exists.
    assert_eq!(std::fs::read_dir(dir.path()).expect("read_dir").count(), 0);
}
