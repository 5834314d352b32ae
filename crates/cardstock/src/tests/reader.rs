//! Reader behavior over complete documents.

use super::fixtures::{VCARD_21_QP, VCARD_30, read_all};
use crate::core::VCardVersion;
use crate::parse::RawVCardReader;

#[test_log::test]
fn reads_a_complete_30_document() {
    let (lines, warnings) = read_all(VCARD_30);
    assert!(warnings.is_empty());
    assert_eq!(lines.len(), 8);

    let fn_line = &lines[2];
    assert_eq!(fn_line.name, "FN");
    assert_eq!(fn_line.value, "Johnathan \"Johnny\" Doe");

    let tel = &lines[4];
    assert_eq!(tel.group.as_deref(), Some("item1"));
    assert_eq!(tel.param("TYPE").unwrap().values, vec!["home", "voice"]);

    let adr = &lines[5];
    assert_eq!(
        adr.param_value("LABEL"),
        Some("123 Main St, Anytown; USA")
    );

    let note = &lines[6];
    assert_eq!(note.value, "first line\nsecond line, with a comma");
}

#[test_log::test]
fn reads_a_21_document_with_quoted_printable() {
    let (lines, warnings) = read_all(VCARD_21_QP);
    assert!(warnings.is_empty());

    let adr = &lines[2];
    assert_eq!(adr.params.nameless(), ["HOME", "WORK"]);

    let label = &lines[3];
    assert!(label.params.nameless().contains(&"HOME".to_owned()));
    assert_eq!(label.value, "Silicon Alley 5,\r\nNew York, New York  91234");
}

#[test_log::test]
fn nested_document_shares_the_line_counter() {
    // 2.1 AGENT embedding: the nested vCard follows in the same stream and
    // is consumed by pulling from the same reader
    let input = "\
BEGIN:VCARD\r\n\
VERSION:2.1\r\n\
AGENT:\r\n\
BEGIN:VCARD\r\n\
FN:Agent Smith\r\n\
END:VCARD\r\n\
FN:Neo\r\n\
END:VCARD\r\n";

    let mut reader = RawVCardReader::new(input.as_bytes());
    let mut names = Vec::new();
    while let Some(line) = reader.read_line().unwrap() {
        names.push((reader.logical_line_number(), line.name));
    }

    let expected = [
        (1, "BEGIN"),
        (2, "VERSION"),
        (3, "AGENT"),
        (4, "BEGIN"),
        (5, "FN"),
        (6, "END"),
        (7, "FN"),
        (8, "END"),
    ];
    assert_eq!(names.len(), expected.len());
    for ((line_number, name), (expected_number, expected_name)) in names.iter().zip(expected) {
        assert_eq!(*line_number, expected_number);
        assert_eq!(name, expected_name);
    }
}

#[test_log::test]
fn version_dependent_multi_value_parsing() {
    // same wire text, version-dependent comma handling
    let line = "ADR;TYPE=dom,home,work:;;123 Main St\r\n";

    let mut v3 = RawVCardReader::new(line.as_bytes());
    v3.set_version(VCardVersion::V3_0);
    let parsed = v3.read_line().unwrap().unwrap();
    assert_eq!(parsed.param("TYPE").unwrap().values.len(), 3);

    let mut v21 = RawVCardReader::new(line.as_bytes());
    v21.set_version(VCardVersion::V2_1);
    let parsed = v21.read_line().unwrap().unwrap();
    assert_eq!(
        parsed.param("TYPE").unwrap().values,
        vec!["dom,home,work"]
    );
}
