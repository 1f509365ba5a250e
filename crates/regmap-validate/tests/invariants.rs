use insta::assert_json_snapshot;

use regmap_core::convert;
use regmap_model::{AGGREGATE_TAG, BitLength, ParameterRecord, SourceKind, SystemCategory, View};
use regmap_standards::Standards;
use regmap_validate::{Issue, Severity, check};

fn record(id: u32, name: &str) -> ParameterRecord {
    ParameterRecord {
        id,
        register: Some(i64::from(id)),
        ..ParameterRecord::named(name)
    }
}

fn bit(id: u32, name: &str, register: i64, mask: Option<u16>) -> ParameterRecord {
    ParameterRecord {
        register: Some(register),
        length: BitLength::ONE,
        mask,
        ..record(id, name)
    }
}

#[test]
fn converted_batch_is_clean() {
    let html = "<table>\
        <tr><th>BMS Address</th><th>Variable name</th><th>Bms_Type</th><th>R/W</th></tr>\
        <tr><td>1</td><td>SP_A</td><td>ANALOG</td><td>RW</td></tr>\
        <tr><td>2</td><td>SP_B</td><td>ANALOG</td><td>RW</td></tr>\
        <tr><td>3</td><td>HighAl</td><td>ANALOG</td><td>RW</td></tr>\
        <tr><td>4</td><td>SP_A</td><td>INTEGER</td><td>R</td></tr>\
        </table>";
    let standards = Standards::builtin().expect("builtin standards");
    let conversion =
        convert(SourceKind::HtmlTable, &[html.as_bytes()], &standards).expect("convert");
    let report = check(&conversion.records);
    assert!(report.is_clean(), "{:?}", report.issues);
}

#[test]
fn writable_alarm_is_reported() {
    let mut alarm = record(1, "HA");
    alarm.system_category = SystemCategory::Alarm;
    alarm.write = 6;
    let report = check(&[alarm]);
    assert_eq!(
        report.issues,
        vec![Issue::AlarmWritable {
            id: 1,
            name: "HA".into(),
            write: 6
        }]
    );
    assert!(report.has_errors());
}

#[test]
fn duplicate_names_and_primary_views() {
    let mut a = record(1, "TEMP");
    a.view = View::Primary;
    let mut b = record(2, "TEMP");
    b.view = View::Primary;
    let report = check(&[a, b]);
    let codes: Vec<&str> = report.issues.iter().map(Issue::code).collect();
    assert_eq!(codes, vec!["duplicate_name", "multiple_primary"]);
}

#[test]
fn gaps_in_ids_are_reported_once() {
    let report = check(&[record(1, "A"), record(3, "B"), record(4, "C")]);
    assert_eq!(
        report.issues,
        vec![Issue::NonDenseId {
            position: 1,
            id: 3,
            expected: 2
        }]
    );
}

#[test]
fn masks_follow_sibling_groups() {
    let mut parent = record(1, "Relay");
    parent.register = Some(40);
    parent.length = BitLength::Bits(2);
    parent.tags.insert(AGGREGATE_TAG.to_string());
    let records = vec![
        parent,
        bit(2, "Relay_1", 41, Some(0x1)),
        bit(3, "Relay_2", 42, Some(0x2)),
        bit(4, "Flag_A", 7, Some(0x1)),
        bit(5, "Flag_B", 7, Some(0x2)),
    ];
    assert!(check(&records).is_clean());

    let broken = vec![
        bit(1, "Flag_A", 7, Some(0x1)),
        bit(2, "Flag_B", 7, Some(0x4)),
        bit(3, "Flag_C", 8, None),
    ];
    let report = check(&broken);
    assert_json_snapshot!(report.issues, @r#"
    [
      {
        "check": "mask_out_of_order",
        "id": 2,
        "name": "Flag_B",
        "expected": "0x2",
        "found": "0x4"
      },
      {
        "check": "missing_mask",
        "id": 3,
        "name": "Flag_C"
      }
    ]
    "#);
}

#[test]
fn standalone_bit_may_not_reuse_a_child_bit() {
    let mut parent = record(1, "Relay");
    parent.register = Some(40);
    parent.length = BitLength::Bits(2);
    parent.tags.insert(AGGREGATE_TAG.to_string());
    let mut records = vec![
        bit(1, "Flag", 41, Some(0x2)),
        parent,
        bit(3, "Relay_1", 41, Some(0x1)),
        bit(4, "Relay_2", 42, Some(0x2)),
    ];
    records[1].id = 2;
    assert!(check(&records).is_clean());

    records[0].mask = Some(0x1);
    let report = check(&records);
    assert_eq!(
        report.issues,
        vec![Issue::MaskOutOfOrder {
            id: 1,
            name: "Flag".into(),
            expected: "0x2".into(),
            found: "0x1".into(),
        }]
    );
}

#[test]
fn mask_on_wide_record_is_a_warning() {
    let mut wide = record(1, "T");
    wide.mask = Some(0x1);
    let report = check(&[wide]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].severity(), Severity::Warning);
    assert!(!report.has_errors());
    assert_eq!(report.warning_count(), 1);
}
