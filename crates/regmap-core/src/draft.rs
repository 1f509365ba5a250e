//! Field normalization of tagged rows into drafts.
//!
//! A [`Draft`] is a row whose cells have been coerced to typed values but
//! which has no category yet. Dimension templates expand here, so one
//! tagged row may yield several drafts.

use tracing::debug;

use regmap_model::{
    AccessFlags, BitLength, DataKind, Field, Provenance, Warning,
};
use regmap_standards::{Profile, Radix, UnitTable};
use regmap_transform::{
    Coerced, DimensionSpan, MAX_DIMENSION_CHILDREN, canonical_unit, clean_text, coerce_number,
    decode_register, parse_dimension, parse_range, truncate_chars,
};

use crate::context::TaggedRow;

/// Place of a draft within an expanded dimension template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionRole {
    /// The retained template row; describes the packed width only.
    Aggregate { width: BitLength },
    /// The `index`-th child, zero-based.
    Member { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub provenance: Provenance,
    pub source_row: usize,
    pub register: Option<i64>,
    pub name: String,
    pub description: String,
    /// Propagated label used for classification.
    pub label: Option<String>,
    /// Text of the source's own category column.
    pub category_cell: Option<String>,
    pub minvalue: Option<f64>,
    pub maxvalue: Option<f64>,
    pub unit: String,
    pub offset: Option<f64>,
    pub access: AccessFlags,
    pub data_kind: Option<DataKind>,
    /// Length given by the source's length cell.
    pub length: Option<BitLength>,
    pub value: Option<f64>,
    pub dimension: Option<DimensionRole>,
}

/// Normalizes one tagged row, recording coercion warnings.
///
/// Returns no drafts for rows that carry neither a register nor a name, and
/// for rows without a register when the profile requires one.
pub fn normalize_row(
    tagged: &TaggedRow,
    profile: &Profile,
    units: &UnitTable,
    warnings: &mut Vec<Warning>,
) -> Vec<Draft> {
    let row = &tagged.row;
    let mut warn = |field: Field, raw: &str, reason: String| {
        warnings.push(Warning::coercion(
            tagged.provenance.clone(),
            row.source_row,
            field,
            raw,
            reason,
        ));
    };

    let register = coalesce_register(tagged, profile.register_radix_for(&tagged.family), &mut warn);
    let name = row.get(Field::Name).map(clean_text).unwrap_or_default();
    if register.is_none() && name.is_empty() {
        debug!(table = %tagged.provenance, row = row.source_row, "row without register or name dropped");
        return Vec::new();
    }
    if register.is_none() && profile.drop_rows_without_register {
        debug!(table = %tagged.provenance, row = row.source_row, name, "row without register dropped");
        return Vec::new();
    }
    let name = if name.is_empty() {
        register.map(|r| format!("REG_{r}")).unwrap_or_default()
    } else {
        name
    };

    let mut description = row.get(Field::Description).map(clean_text).unwrap_or_default();
    if let Some(max) = profile.description_max_chars {
        description = truncate_chars(&description, max);
    }

    let mut number = |field: Field| -> Option<f64> {
        let raw = row.get(field)?;
        match coerce_number(raw) {
            Coerced::Value(value) => Some(value),
            Coerced::Null => None,
            Coerced::Invalid => {
                warn(field, raw, "is not a number".to_string());
                None
            }
        }
    };
    let mut minvalue = number(Field::MinValue);
    let mut maxvalue = number(Field::MaxValue);
    let offset = number(Field::Offset);

    let mut unit_text = row.get(Field::Unit).map(str::to_string);
    if let Some(range) = row.get(Field::RangeText).and_then(parse_range) {
        minvalue = minvalue.or(Some(range.min));
        maxvalue = maxvalue.or(Some(range.max));
        if unit_text.is_none() {
            unit_text = range.unit;
        }
    }
    let unit = unit_text
        .map(|text| canonical_unit(&text, profile, units))
        .unwrap_or_default();

    let mut access = row
        .get(Field::Access)
        .map(AccessFlags::parse)
        .unwrap_or_default();
    if let Some(mode) = tagged.mode {
        access = access.merge(mode.into());
    }
    if !access.read && !access.write {
        access.read = true;
    }

    let category_cell = row.get(Field::Category).map(clean_text);
    let data_kind = row
        .get(Field::TypeHint)
        .and_then(|hint| profile.classification.data_kind(hint))
        .or_else(|| {
            category_cell
                .as_deref()
                .and_then(|category| profile.classification.data_kind(category))
        });

    let length = row.get(Field::Length).and_then(|raw| {
        match BitLength::parse(raw, profile.length_unit) {
            Some(length) if profile.normalize_length => Some(length.normalized()),
            Some(length) => Some(length),
            None => {
                if !regmap_transform::is_placeholder(raw) {
                    warn(Field::Length, raw, "is not a bit length".to_string());
                }
                None
            }
        }
    });

    let value = if tagged.has_value_column {
        row.get(Field::Value).and_then(|raw| {
            let decoded = decode_value(raw, profile.value_radix);
            if decoded.is_invalid() {
                warn(Field::Value, raw, "is not a number".to_string());
            }
            decoded.value()
        })
    } else {
        Some(0.0)
    };
    let value = match (value, profile.value_limit) {
        (Some(v), Some(limit)) if v.abs() > limit => {
            let clamped = v.clamp(-limit, limit);
            warn(
                Field::Value,
                &v.to_string(),
                format!("clamped to {clamped}"),
            );
            Some(clamped)
        }
        (value, _) => value,
    };

    let dimension = match row.get(Field::Dimension) {
        Some(raw) => match parse_dimension(raw) {
            Some(span) if span.len() > MAX_DIMENSION_CHILDREN => {
                warn(
                    Field::Dimension,
                    raw,
                    format!(
                        "spans {} positions, more than {MAX_DIMENSION_CHILDREN}; not expanded",
                        span.len()
                    ),
                );
                None
            }
            span => span,
        },
        None => None,
    };

    let draft = Draft {
        provenance: tagged.provenance.clone(),
        source_row: row.source_row,
        register,
        name,
        description,
        label: tagged.label.clone(),
        category_cell,
        minvalue,
        maxvalue,
        unit,
        offset,
        access,
        data_kind,
        length,
        value,
        dimension: None,
    };
    match dimension {
        Some(span) if !span.is_empty() => expand_dimension(draft, span, profile.normalize_length),
        _ => vec![draft],
    }
}

/// First register source that decodes, in [`Field::REGISTER_SOURCES`] order.
fn coalesce_register(
    tagged: &TaggedRow,
    radix: Radix,
    warn: &mut impl FnMut(Field, &str, String),
) -> Option<i64> {
    for field in Field::REGISTER_SOURCES {
        let Some(raw) = tagged.row.get(field) else {
            continue;
        };
        let field_radix = match field {
            Field::HexRegister => Radix::Hex,
            Field::DecRegister => Radix::Decimal,
            _ => radix,
        };
        match decode_register(raw, field_radix) {
            Coerced::Value(register) => return Some(register),
            Coerced::Null => {}
            Coerced::Invalid => warn(field, raw, "is not a register address".to_string()),
        }
    }
    None
}

fn decode_value(raw: &str, radix: Radix) -> Coerced<f64> {
    match radix {
        Radix::Decimal => coerce_number(raw),
        Radix::Hex => decode_register(raw, Radix::Hex).map(|v| v as f64),
        Radix::Auto => match decode_register(raw, Radix::Auto) {
            Coerced::Value(v) => Coerced::Value(v as f64),
            Coerced::Null => Coerced::Null,
            Coerced::Invalid => coerce_number(raw),
        },
    }
}

/// Replaces a template row by its aggregate parent followed by one child per position.
fn expand_dimension(parent: Draft, span: DimensionSpan, normalize: bool) -> Vec<Draft> {
    let count = span.len();
    let width = BitLength::Bits(u32::try_from(count).unwrap_or(u32::MAX));
    let width = if normalize { width.normalized() } else { width };
    let children: Vec<Draft> = span
        .positions()
        .enumerate()
        .map(|(index, position)| Draft {
            register: parent.register.map(|base| base + index as i64 + 1),
            name: format!("{}_{position}", parent.name),
            description: format!("{} - position {position}", parent.name),
            length: Some(BitLength::ONE),
            dimension: Some(DimensionRole::Member { index }),
            ..parent.clone()
        })
        .collect();
    debug!(
        table = %parent.provenance,
        name = %parent.name,
        children = count,
        "dimension expanded"
    );
    let aggregate = Draft {
        length: Some(width),
        dimension: Some(DimensionRole::Aggregate { width }),
        ..parent
    };
    std::iter::once(aggregate).chain(children).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmap_model::{AccessMode, LabeledRow, SourceKind};
    use regmap_standards::Standards;

    fn tagged(kind: SourceKind, cells: &[(Field, &str)], has_value_column: bool) -> TaggedRow {
        let mut row = LabeledRow::default();
        for (field, text) in cells {
            row.set(*field, *text);
        }
        TaggedRow {
            row,
            provenance: Provenance::new(kind, 0, 0, 0),
            family: String::new(),
            label: None,
            mode: None,
            has_value_column,
        }
    }

    #[test]
    fn placeholders_stay_null() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::HtmlTable).unwrap();
        let mut warnings = Vec::new();
        for placeholder in ["", "---", "nan"] {
            let row = tagged(
                SourceKind::HtmlTable,
                &[
                    (Field::Register, "1"),
                    (Field::Name, "X"),
                    (Field::MinValue, placeholder),
                    (Field::MaxValue, placeholder),
                ],
                false,
            );
            let drafts = normalize_row(&row, profile, standards.units(), &mut warnings);
            assert_eq!(drafts[0].minvalue, None);
            assert_eq!(drafts[0].maxvalue, None);
        }
        assert!(warnings.is_empty());
    }

    #[test]
    fn hex_register_and_range_text() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::PdfDialectB).unwrap();
        let mut warnings = Vec::new();
        let row = tagged(
            SourceKind::PdfDialectB,
            &[
                (Field::Name, "Probe 1"),
                (Field::HexRegister, "0101"),
                (Field::DecRegister, "999"),
                (Field::RangeText, "-50 to 150 C"),
            ],
            false,
        );
        let drafts = normalize_row(&row, profile, standards.units(), &mut warnings);
        let draft = &drafts[0];
        assert_eq!(draft.register, Some(257));
        assert_eq!(draft.minvalue, Some(-50.0));
        assert_eq!(draft.maxvalue, Some(150.0));
        assert_eq!(draft.unit, "°C");
        assert_eq!(draft.value, Some(0.0));
    }

    #[test]
    fn non_numeric_value_is_null_with_warning() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::PdfDialectB).unwrap();
        let mut warnings = Vec::new();
        let row = tagged(
            SourceKind::PdfDialectB,
            &[
                (Field::Name, "SET"),
                (Field::Register, "768"),
                (Field::Value, "ZZ"),
            ],
            true,
        );
        let drafts = normalize_row(&row, profile, standards.units(), &mut warnings);
        assert_eq!(drafts[0].value, None);
        assert!(matches!(
            warnings.as_slice(),
            [Warning::ValueCoercion { field: Field::Value, .. }]
        ));
    }

    #[test]
    fn rows_without_register_or_name_are_dropped() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::HtmlTable).unwrap();
        let mut warnings = Vec::new();
        let row = tagged(SourceKind::HtmlTable, &[(Field::Description, "note")], false);
        assert!(normalize_row(&row, profile, standards.units(), &mut warnings).is_empty());
    }

    #[test]
    fn marker_mode_merges_into_access() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::PdfDialectA).unwrap();
        let mut warnings = Vec::new();
        let mut row = tagged(
            SourceKind::PdfDialectA,
            &[(Field::Register, "100"), (Field::Name, "SP")],
            false,
        );
        row.mode = Some(AccessMode::Write);
        let drafts = normalize_row(&row, profile, standards.units(), &mut warnings);
        assert!(drafts[0].access.write);
        assert!(!drafts[0].access.read);
    }

    #[test]
    fn dimension_expands_into_children() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::SpreadsheetMultitab).unwrap();
        let mut warnings = Vec::new();
        let row = tagged(
            SourceKind::SpreadsheetMultitab,
            &[
                (Field::Register, "40"),
                (Field::Name, "Relay"),
                (Field::Dimension, "[1..4]"),
            ],
            false,
        );
        let drafts = normalize_row(&row, profile, standards.units(), &mut warnings);
        assert_eq!(drafts.len(), 5);
        assert_eq!(
            drafts[0].dimension,
            Some(DimensionRole::Aggregate { width: BitLength::Bits(4) })
        );
        assert_eq!(drafts[0].register, Some(40));
        let children: Vec<(Option<i64>, &str)> = drafts[1..]
            .iter()
            .map(|d| (d.register, d.name.as_str()))
            .collect();
        assert_eq!(
            children,
            vec![
                (Some(41), "Relay_1"),
                (Some(42), "Relay_2"),
                (Some(43), "Relay_3"),
                (Some(44), "Relay_4"),
            ]
        );
        assert_eq!(drafts[2].description, "Relay - position 2");
        assert!(drafts[1..].iter().all(|d| d.length == Some(BitLength::ONE)));
    }

    #[test]
    fn oversized_dimension_is_kept_as_one_row() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::SpreadsheetMultitab).unwrap();
        let mut warnings = Vec::new();
        let row = tagged(
            SourceKind::SpreadsheetMultitab,
            &[
                (Field::Register, "40"),
                (Field::Name, "Log"),
                (Field::Dimension, "[0..4000000000]"),
            ],
            false,
        );
        let drafts = normalize_row(&row, profile, standards.units(), &mut warnings);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].dimension, None);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("not expanded"));
    }

    #[test]
    fn ipro_addresses_are_hex_digits() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::SpreadsheetMultitab).unwrap();
        let mut warnings = Vec::new();
        let cells = [(Field::Register, "0010"), (Field::Name, "Relay")];

        let mut ipro = tagged(SourceKind::SpreadsheetMultitab, &cells, false);
        ipro.family = "ipro".into();
        let drafts = normalize_row(&ipro, profile, standards.units(), &mut warnings);
        assert_eq!(drafts[0].register, Some(16));

        let mut keyter = tagged(SourceKind::SpreadsheetMultitab, &cells, false);
        keyter.family = "keyter_workbook".into();
        let drafts = normalize_row(&keyter, profile, standards.units(), &mut warnings);
        assert_eq!(drafts[0].register, Some(10));
        assert!(warnings.is_empty());
    }

    #[test]
    fn values_beyond_limit_are_clamped() {
        let standards = Standards::builtin().unwrap();
        let profile = standards.profile(SourceKind::SpreadsheetMultitab).unwrap();
        let mut warnings = Vec::new();
        let row = tagged(
            SourceKind::SpreadsheetMultitab,
            &[(Field::Register, "1"), (Field::Name, "Big"), (Field::Value, "40000")],
            true,
        );
        let drafts = normalize_row(&row, profile, standards.units(), &mut warnings);
        assert_eq!(drafts[0].value, Some(32767.0));
        assert_eq!(warnings.len(), 1);
    }
}
