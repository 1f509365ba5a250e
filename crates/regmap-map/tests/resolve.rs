use regmap_map::{HeaderResolver, ResolveError};
use regmap_model::{Field, Provenance, RawTable, SourceKind, Warning};
use regmap_standards::Standards;

fn table(kind: SourceKind, index: usize, rows: &[Vec<&str>]) -> RawTable {
    RawTable::from_text_rows(Provenance::new(kind, 0, 0, index), rows)
}

#[test]
fn html_title_table_is_header_not_found() {
    let standards = Standards::builtin().unwrap();
    let profile = standards.profile(SourceKind::HtmlTable).unwrap();
    let mut resolver = HeaderResolver::new(profile);

    let title = table(SourceKind::HtmlTable, 0, &[vec!["Register list"]]);
    let error = resolver.resolve(&title).unwrap_err();
    assert!(matches!(error, ResolveError::HeaderNotFound { .. }));
    assert!(matches!(error.into_warning(), Warning::HeaderNotFound { .. }));

    let body = table(
        SourceKind::HtmlTable,
        1,
        &[
            vec!["BMS Address", "Variable name", "Min", "Max", "Category", "UOM", "R/W", "Colour"],
            vec!["10", "SP_TEMP", "0", "100", "ANALOG", "C", "RW", "red"],
            vec!["BMS Address", "Variable name", "Min", "Max", "Category", "UOM", "R/W", "Colour"],
            vec!["", "", "", "", "", "", "", ""],
        ],
    );
    let labeled = resolver.resolve(&body).unwrap();
    assert_eq!(labeled.family, "keyter_bms");
    assert_eq!(labeled.rows.len(), 1);
    let row = &labeled.rows[0];
    assert_eq!(row.source_row, 1);
    assert_eq!(row.get(Field::Register), Some("10"));
    assert_eq!(row.get(Field::Unit), Some("C"));
    assert_eq!(row.get(Field::Access), Some("RW"));
    assert!(!labeled.columns.contains(&Field::Label));
}

#[test]
fn dialect_b_picks_the_family_per_table() {
    let standards = Standards::builtin().unwrap();
    let profile = standards.profile(SourceKind::PdfDialectB).unwrap();
    let mut resolver = HeaderResolver::new(profile);

    let vars = table(
        SourceKind::PdfDialectB,
        0,
        &[
            vec!["ALARMS"],
            vec!["VAR NAME", "REGISTER[hex]", "DEC", "DESCRIPTION"],
            vec!["HA", "0x0101", "257", "High alarm"],
        ],
    );
    let labeled = resolver.resolve(&vars).unwrap();
    assert_eq!(labeled.family, "dixell_vars");
    assert_eq!(labeled.title.as_deref(), Some("ALARMS"));
    assert_eq!(labeled.rows[0].get(Field::HexRegister), Some("0x0101"));

    let modbus = table(
        SourceKind::PdfDialectB,
        1,
        &[
            vec!["Name", "Read Register", "Write Register", "R / W"],
            vec!["SET", "768", "768", "R/W"],
        ],
    );
    let labeled = resolver.resolve(&modbus).unwrap();
    assert_eq!(labeled.family, "dixell_modbus");
    assert_eq!(labeled.title, None);
}

#[test]
fn dialect_a_continuation_inherits_header() {
    let standards = Standards::builtin().unwrap();
    let profile = standards.profile(SourceKind::PdfDialectA).unwrap();
    let mut resolver = HeaderResolver::new(profile);

    let first = table(
        SourceKind::PdfDialectA,
        0,
        &[
            vec!["DIRECCION", "Nombre", "Longitud Word Dato"],
            vec!["ESCRITURA", "", ""],
            vec!["100", "SP_AGUA", "1"],
        ],
    );
    let labeled = resolver.resolve(&first).unwrap();
    assert_eq!(labeled.rows.len(), 2);
    assert_eq!(labeled.rows[0].get(Field::Register), Some("ESCRITURA"));

    let continuation = table(
        SourceKind::PdfDialectA,
        1,
        &[vec!["101", "SP_AIRE", "1"], vec!["102", "P_NIVEL", "1"]],
    );
    let labeled = resolver.resolve(&continuation).unwrap();
    assert_eq!(labeled.family, "cefa");
    assert_eq!(labeled.rows.len(), 2);
    assert_eq!(labeled.rows[1].get(Field::Name), Some("P_NIVEL"));

    let narrower = table(SourceKind::PdfDialectA, 2, &[vec!["x", "y"]]);
    assert!(matches!(
        resolver.resolve(&narrower),
        Err(ResolveError::HeaderNotFound { .. })
    ));
}

#[test]
fn header_without_body_is_skipped() {
    let standards = Standards::builtin().unwrap();
    let profile = standards.profile(SourceKind::HtmlTable).unwrap();
    let mut resolver = HeaderResolver::new(profile);
    let only_header = table(
        SourceKind::HtmlTable,
        0,
        &[vec!["BMS Address", "Variable name"]],
    );
    let error = resolver.resolve(&only_header).unwrap_err();
    assert!(matches!(error, ResolveError::NoDataRows { .. }));
    assert!(matches!(error.into_warning(), Warning::TableSkipped { .. }));
}

#[test]
fn ipro_skips_the_row_after_the_header() {
    let standards = Standards::builtin().unwrap();
    let profile = standards.profile(SourceKind::SpreadsheetMultitab).unwrap();
    let mut resolver = HeaderResolver::new(profile);
    let sheet = table(
        SourceKind::SpreadsheetMultitab,
        0,
        &[
            vec!["Name", "Address", "Dimension", "Comment", "Attribute", "Groups"],
            vec!["string", "int", "string", "string", "string", "string"],
            vec!["Relay", "0x10", "[1..4]", "Relays", "READWRITE", "S.DIGITAL"],
        ],
    );
    let labeled = resolver.resolve(&sheet).unwrap();
    assert_eq!(labeled.family, "ipro");
    assert_eq!(labeled.rows.len(), 1);
    assert_eq!(labeled.rows[0].get(Field::Dimension), Some("[1..4]"));
    assert_eq!(labeled.rows[0].get(Field::Label), Some("S.DIGITAL"));
}
