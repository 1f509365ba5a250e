use std::io::Write;

use regmap_model::{DataKind, Field, SourceKind, SystemCategory, View};
use regmap_standards::{PropagationRule, Radix, Standards, StandardsError};

fn standards() -> Standards {
    Standards::builtin().expect("builtin standards")
}

#[test]
fn html_profile_codes_and_primary() {
    let standards = standards();
    let profile = standards.profile(SourceKind::HtmlTable).unwrap();
    assert_eq!(profile.primary_category, Some(SystemCategory::SetPoint));
    assert_eq!(profile.default_view, View::Simple);
    let analog = profile.permissions.by_kind[&DataKind::Analog];
    assert_eq!((analog.read, analog.write), (Some(3), Some(16)));
    assert_eq!(
        profile.classification.data_kind("alarms"),
        Some(DataKind::Alarm)
    );
    assert_eq!(profile.sampling_for(SystemCategory::Default), 60);
}

#[test]
fn spreadsheet_profile_has_both_workbook_families() {
    let standards = standards();
    let profile = standards.profile(SourceKind::SpreadsheetMultitab).unwrap();
    assert_eq!(profile.family_names(), vec!["ipro", "keyter_workbook"]);
    let ipro = profile.family("ipro").unwrap();
    assert_eq!(ipro.skip_rows_after_header, 1);
    assert!(ipro.fields.contains_key(&Field::Dimension));
    assert_eq!(
        profile
            .classification
            .label_category("PARAMETROS_CONFIGURACION, OTROS"),
        Some(SystemCategory::ConfigParameter)
    );
}

#[test]
fn register_radix_is_chosen_per_family() {
    let standards = standards();
    let profile = standards.profile(SourceKind::SpreadsheetMultitab).unwrap();
    assert_eq!(profile.register_radix_for("ipro"), Radix::Hex);
    assert_eq!(profile.register_radix_for("keyter_workbook"), Radix::Auto);
    assert_eq!(profile.register_radix_for("unknown"), Radix::Auto);
}

#[test]
fn pdf_profiles_default_to_the_simple_view() {
    let standards = standards();
    for kind in [
        SourceKind::PdfDialectA,
        SourceKind::PdfDialectB,
        SourceKind::PdfMultiDocument,
    ] {
        let profile = standards.profile(kind).unwrap();
        assert_eq!(profile.default_view, View::Simple, "{kind}");
        assert_eq!(profile.view_for(SystemCategory::SetPoint), View::Simple, "{kind}");
    }
    let cefa = standards.profile(SourceKind::PdfDialectA).unwrap();
    assert_eq!(cefa.sampling_for(SystemCategory::AnalogInput), 60);
    assert_eq!(cefa.sampling_for(SystemCategory::ConfigParameter), 0);
}

#[test]
fn dialect_a_declares_marker_before_sections() {
    let standards = standards();
    let profile = standards.profile(SourceKind::PdfDialectA).unwrap();
    assert!(matches!(
        profile.propagation[0],
        PropagationRule::Marker {
            column: Field::Register,
            drop_subheader: true,
            ..
        }
    ));
    assert!(matches!(
        profile.propagation[1],
        PropagationRule::KeyedSections { .. }
    ));
    assert_eq!(
        profile.classification.name_category("SP_CALOR"),
        Some(SystemCategory::SetPoint)
    );
}

#[test]
fn dialect_b_unit_aliases() {
    let standards = standards();
    let profile = standards.profile(SourceKind::PdfDialectB).unwrap();
    assert_eq!(profile.unit_alias("par \"CF\""), Some("°C"));
    assert_eq!(profile.unit_alias("rpm"), Some("rpm"));
    assert!(profile.is_excluded(SystemCategory::SerialOutput));
}

#[test]
fn multi_document_extends_dialect_b() {
    let standards = standards();
    let profile = standards.profile(SourceKind::PdfMultiDocument).unwrap();
    assert_eq!(
        profile.family_names(),
        vec!["dixell_modbus", "dixell_vars", "cefa"]
    );
    assert!(profile.has_marker_rules());
}

#[test]
fn profile_file_override_and_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "kind = \"html-table\"\n[[families]]\nname = \"mine\"\nfields.name = [\"Tag\"]"
    )
    .unwrap();
    let standards = standards().with_profile_file(file.path()).unwrap();
    assert_eq!(
        standards
            .profile(SourceKind::HtmlTable)
            .unwrap()
            .family_names(),
        vec!["mine"]
    );

    let missing = standards.with_profile_file(std::path::Path::new("/nonexistent/profile.toml"));
    assert!(matches!(missing, Err(StandardsError::Io { .. })));
}
