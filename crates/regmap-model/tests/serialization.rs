use insta::assert_json_snapshot;
use regmap_model::{
    BitLength, CANONICAL_COLUMNS, Field, ParameterRecord, Provenance, SourceKind, SystemCategory,
    View, Warning,
};

#[test]
fn record_json_keys_follow_canonical_order() {
    let mut record = ParameterRecord::named("SP_TEMP");
    record.id = 1;
    record.register = Some(10);
    record.system_category = SystemCategory::SetPoint;
    record.view = View::Primary;
    record.length = BitLength::Signed16;
    record.mask = Some(0x4);

    let json = serde_json::to_string(&record).expect("serialize record");
    let mut last = 0;
    for column in CANONICAL_COLUMNS {
        let needle = format!("\"{column}\":");
        let position = json[last..]
            .find(&needle)
            .map(|offset| offset + last)
            .unwrap_or_else(|| panic!("{column} missing or out of order"));
        last = position + needle.len();
    }
    assert!(json.starts_with(r#"{"id":1,"register":10,"name":"SP_TEMP""#));
    assert!(json.contains(r#""system_category":"SET_POINT""#));
    assert!(json.contains(r#""mask":"0x4""#));
    assert!(json.contains(r#""length":"s16""#));
    assert!(json.contains(r#""type":"modbus""#));
}

#[test]
fn warnings_snapshot() {
    let table = Provenance::new(SourceKind::HtmlTable, 0, 0, 1);
    let warnings = vec![
        Warning::HeaderNotFound {
            table: table.clone(),
        },
        Warning::coercion(table, 3, Field::MinValue, "abc", "is not a number"),
    ];
    assert_json_snapshot!(warnings, @r#"
    [
      {
        "kind": "header_not_found",
        "table": {
          "kind": "html-table",
          "document": 0,
          "page": 0,
          "table": 1
        }
      },
      {
        "kind": "value_coercion",
        "table": {
          "kind": "html-table",
          "document": 0,
          "page": 0,
          "table": 1
        },
        "row": 3,
        "field": "minvalue",
        "raw": "abc",
        "reason": "is not a number"
      }
    ]
    "#);
}
