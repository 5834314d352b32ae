//! Writer behavior over complete properties, checked against the reader.

use super::fixtures::read_all;
use crate::build::{FoldingConfig, RawVCardWriter};
use crate::core::{Parameters, VCardVersion};
use crate::parse::RawVCardReader;

#[test_log::test]
fn long_property_folds_and_unfolds() {
    let value = "word ".repeat(60);
    let mut out = Vec::new();
    let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V3_0);
    writer
        .write_property(None, "NOTE", &Parameters::new(), value.trim_end())
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    // physical lines stay within the default width, modulo the trailing
    // whitespace that is deliberately written past the limit
    for physical in text.trim_end_matches("\r\n").split("\r\n") {
        assert!(physical.trim_end().chars().count() <= 75, "{physical:?}");
    }
    assert!(text.matches("\r\n ").count() >= 3);

    let (lines, warnings) = read_all(&text);
    assert!(warnings.is_empty());
    assert_eq!(lines[0].value, value.trim_end());
}

#[test_log::test]
fn caret_escaping_round_trips_through_both_ends() {
    let mut params = Parameters::new();
    params.push(Some("X-GEO-LABEL"), "40.44\"N\n79.94\"W");

    let mut out = Vec::new();
    let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V4_0);
    writer.set_caret_encoding_enabled(true);
    writer.write_property(None, "GEO", &params, "geo:40.44,-79.94").unwrap();
    let text = String::from_utf8(out).unwrap();

    let mut reader = RawVCardReader::new(text.as_bytes());
    reader.set_version(VCardVersion::V4_0);
    reader.set_caret_decoding_enabled(true);
    let line = reader.read_line().unwrap().unwrap();
    assert_eq!(line.param_value("X-GEO-LABEL"), Some("40.44\"N\n79.94\"W"));
    assert_eq!(line.value, "geo:40.44,-79.94");
}

#[test_log::test]
fn write_version_switches_parameter_syntax() {
    let mut params = Parameters::new();
    params.push(Some("TYPE"), "home");
    params.push(Some("TYPE"), "work");

    let mut out = Vec::new();
    let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V2_1);
    writer.write_property(None, "ADR", &params, "").unwrap();
    writer.write_version(VCardVersion::V4_0).unwrap();
    writer.write_property(None, "ADR", &params, "").unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "ADR;HOME;WORK:\r\nVERSION:4.0\r\nADR;TYPE=home,work:\r\n"
    );
}

#[test_log::test]
fn unlimited_width_disables_folding() {
    let config = FoldingConfig::new().line_length(None).unwrap();
    let value = "x".repeat(300);

    let mut out = Vec::new();
    let mut writer = RawVCardWriter::with_config(&mut out, VCardVersion::V3_0, config);
    writer.write_property(None, "NOTE", &Parameters::new(), &value).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text, format!("NOTE:{value}\r\n"));
}
