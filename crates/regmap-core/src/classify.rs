//! Classification Engine.
//!
//! Rules are evaluated in a fixed order and the first match wins. Signal
//! and permission rules come before name and label dictionaries so a row
//! detected as an alarm is never downgraded by a generic rule.

use regmap_model::{AccessClass, DataKind, SystemCategory};
use regmap_standards::ClassificationRules;

use crate::draft::Draft;

/// Which rule decided a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatch {
    AlarmSignal,
    ReadWriteNumeric,
    ReadWriteDigital,
    ReadOnlyNumeric,
    NamePattern,
    Label,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: SystemCategory,
    pub rule: RuleMatch,
}

impl Classification {
    fn new(category: SystemCategory, rule: RuleMatch) -> Self {
        Self { category, rule }
    }
}

pub fn classify(draft: &Draft, rules: &ClassificationRules) -> Classification {
    let label = draft.label.as_deref().unwrap_or("");
    let label_category = rules
        .label_category(label)
        .or_else(|| draft.category_cell.as_deref().and_then(|c| rules.label_category(c)));

    let alarm_signal = draft.data_kind == Some(DataKind::Alarm)
        || label_category == Some(SystemCategory::Alarm)
        || rules.is_alarm_label(label)
        || rules.is_alarm_name(&draft.name);
    if alarm_signal {
        return Classification::new(SystemCategory::Alarm, RuleMatch::AlarmSignal);
    }

    let class = draft.access.class();
    match (draft.data_kind, class) {
        (Some(kind), AccessClass::ReadWrite) if kind.is_numeric() => {
            return Classification::new(rules.read_write_numeric, RuleMatch::ReadWriteNumeric);
        }
        (Some(DataKind::Digital), AccessClass::ReadWrite) => {
            return Classification::new(rules.read_write_digital, RuleMatch::ReadWriteDigital);
        }
        (Some(kind), AccessClass::ReadOnly) if kind.is_numeric() => {
            return Classification::new(rules.read_only, RuleMatch::ReadOnlyNumeric);
        }
        _ => {}
    }

    if let Some(category) = rules.name_category(&draft.name) {
        return Classification::new(category, RuleMatch::NamePattern);
    }
    if let Some(category) = label_category {
        return Classification::new(category, RuleMatch::Label);
    }
    Classification::new(rules.fallback, RuleMatch::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmap_model::{AccessFlags, Provenance, SourceKind};
    use regmap_standards::Standards;

    fn draft(name: &str, label: Option<&str>, kind: Option<DataKind>, access: &str) -> Draft {
        Draft {
            provenance: Provenance::new(SourceKind::HtmlTable, 0, 0, 0),
            source_row: 0,
            register: Some(1),
            name: name.to_string(),
            description: String::new(),
            label: label.map(str::to_string),
            category_cell: None,
            minvalue: None,
            maxvalue: None,
            unit: String::new(),
            offset: None,
            access: AccessFlags::parse(access),
            data_kind: kind,
            length: None,
            value: None,
            dimension: None,
        }
    }

    #[test]
    fn html_rules() {
        let standards = Standards::builtin().unwrap();
        let rules = &standards.profile(SourceKind::HtmlTable).unwrap().classification;
        let sp = classify(&draft("SP_TEMP", None, Some(DataKind::Analog), "RW"), rules);
        assert_eq!(sp, Classification::new(SystemCategory::SetPoint, RuleMatch::ReadWriteNumeric));
        let cmd = classify(&draft("ONOFF", None, Some(DataKind::Digital), "RW"), rules);
        assert_eq!(cmd.category, SystemCategory::Command);
        let ro = classify(&draft("T_OUT", None, Some(DataKind::Integer), "R"), rules);
        assert_eq!(ro.category, SystemCategory::Default);
        let alarm = classify(&draft("HighTempAl", None, Some(DataKind::Analog), "RW"), rules);
        assert_eq!(alarm.rule, RuleMatch::AlarmSignal);
    }

    #[test]
    fn alarm_label_beats_name_rules() {
        let standards = Standards::builtin().unwrap();
        let rules = &standards.profile(SourceKind::PdfDialectA).unwrap().classification;
        let alarm = classify(&draft("SP_ALTA", Some("ALARMAS_GENERALES"), None, "R"), rules);
        assert_eq!(alarm.category, SystemCategory::Alarm);
        let sp = classify(&draft("SP_ALTA", Some("ANALOGICAS"), None, "R"), rules);
        assert_eq!(sp, Classification::new(SystemCategory::SetPoint, RuleMatch::NamePattern));
        let label = classify(&draft("T_AGUA", Some("ANALOGICAS"), None, "R"), rules);
        assert_eq!(label.category, SystemCategory::AnalogInputOutput);
        let none = classify(&draft("T_AGUA", None, None, "R"), rules);
        assert_eq!(none.rule, RuleMatch::Fallback);
    }

    #[test]
    fn section_labels_for_dialect_b() {
        let standards = Standards::builtin().unwrap();
        let rules = &standards.profile(SourceKind::PdfDialectB).unwrap().classification;
        let status = classify(&draft("Compressor", Some("DEVICE STATUS"), None, "R"), rules);
        assert_eq!(status.category, SystemCategory::Status);
        let output = classify(&draft("Relay output 1", Some("CLOCK"), None, "R"), rules);
        assert_eq!(output.category, SystemCategory::DigitalOutput);
        let alarm = classify(&draft("HA", Some("ALARMS"), None, "R"), rules);
        assert_eq!(alarm.category, SystemCategory::Alarm);
    }
}
