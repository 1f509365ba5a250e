//! The unified output record and its contractual column order.

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};
use serde_json::json;

use crate::{BitLength, SystemCategory, View};

/// Output columns, in contractual order.
pub const CANONICAL_COLUMNS: [&str; 30] = [
    "id",
    "register",
    "name",
    "description",
    "system_category",
    "category",
    "view",
    "sampling",
    "read",
    "write",
    "minvalue",
    "maxvalue",
    "unit",
    "offset",
    "addition",
    "mask",
    "value",
    "length",
    "general_icon",
    "alarm",
    "metadata",
    "l10n",
    "tags",
    "type",
    "parameter_write_byte_position",
    "mqtt",
    "json",
    "current_value",
    "current_error_status",
    "notes",
];

/// Protocol written to the `type` column.
pub const DEFAULT_PROTOCOL: &str = "modbus";

/// Locale used when a profile does not name one.
pub const DEFAULT_LANG: &str = "en_US";

/// Tag added to every SYSTEM record.
pub const LIBRARY_IDENTIFIER_TAG: &str = "library_identifier";

/// Tag carried by the aggregate parent of an expanded dimension.
pub const AGGREGATE_TAG: &str = "aggregate";

/// Alarm configuration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmPayload {
    pub severity: String,
}

impl Default for AlarmPayload {
    fn default() -> Self {
        Self {
            severity: "none".to_string(),
        }
    }
}

/// Single default-locale localization payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L10n {
    pub default_lang: String,
}

impl L10n {
    pub fn new(default_lang: impl Into<String>) -> Self {
        Self {
            default_lang: default_lang.into(),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        let mut translations = serde_json::Map::new();
        translations.insert(
            self.default_lang.clone(),
            json!({"name": null, "_type": "languages", "description": null}),
        );
        json!({
            "_type": "l10n",
            "default_lang": self.default_lang,
            "translations": translations,
        })
    }
}

impl Default for L10n {
    fn default() -> Self {
        Self::new(DEFAULT_LANG)
    }
}

impl Serialize for L10n {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn serialize_mask<S: Serializer>(mask: &Option<u16>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_mask(*mask))
}

/// `0x1`, `0x8000`..., or `0` when no mask applies.
pub fn format_mask(mask: Option<u16>) -> String {
    match mask {
        Some(bits) => format!("0x{bits:X}"),
        None => "0".to_string(),
    }
}

/// One normalized parameter. Field order matches [`CANONICAL_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterRecord {
    pub id: u32,
    pub register: Option<i64>,
    pub name: String,
    pub description: String,
    pub system_category: SystemCategory,
    /// Intermediate label from the source (section, group, or category column).
    pub category: String,
    pub view: View,
    /// Polling period in seconds.
    pub sampling: u32,
    pub read: u8,
    pub write: u8,
    pub minvalue: Option<f64>,
    pub maxvalue: Option<f64>,
    pub unit: String,
    pub offset: f64,
    pub addition: f64,
    #[serde(serialize_with = "serialize_mask")]
    pub mask: Option<u16>,
    pub value: Option<f64>,
    pub length: BitLength,
    pub general_icon: String,
    pub alarm: AlarmPayload,
    pub metadata: Vec<serde_json::Value>,
    pub l10n: L10n,
    pub tags: BTreeSet<String>,
    #[serde(rename = "type")]
    pub protocol: String,
    pub parameter_write_byte_position: u32,
    pub mqtt: String,
    pub json: String,
    pub current_value: f64,
    pub current_error_status: i64,
    pub notes: String,
}

impl Default for ParameterRecord {
    fn default() -> Self {
        Self {
            id: 0,
            register: None,
            name: String::new(),
            description: String::new(),
            system_category: SystemCategory::Default,
            category: String::new(),
            view: View::default(),
            sampling: 0,
            read: 0,
            write: 0,
            minvalue: None,
            maxvalue: None,
            unit: String::new(),
            offset: 0.0,
            addition: 0.0,
            mask: None,
            value: None,
            length: BitLength::default(),
            general_icon: String::new(),
            alarm: AlarmPayload::default(),
            metadata: Vec::new(),
            l10n: L10n::default(),
            tags: BTreeSet::new(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            parameter_write_byte_position: 0,
            mqtt: String::new(),
            json: String::new(),
            current_value: 0.0,
            current_error_status: 0,
            notes: String::new(),
        }
    }
}

/// A single output cell, typed for tabular writers.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    fn optional_float(value: Option<f64>) -> Self {
        value.map_or(CellValue::Null, CellValue::Float)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl ParameterRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn tags_json(&self) -> String {
        serde_json::Value::from(self.tags.iter().cloned().collect::<Vec<_>>()).to_string()
    }

    /// All canonical cells in contractual order.
    ///
    /// JSON payload columns are rendered as compact JSON text.
    pub fn cells(&self) -> Vec<(&'static str, CellValue)> {
        let values = vec![
            CellValue::Int(i64::from(self.id)),
            self.register.map_or(CellValue::Null, CellValue::Int),
            CellValue::Text(self.name.clone()),
            CellValue::Text(self.description.clone()),
            CellValue::Text(self.system_category.as_str().to_string()),
            CellValue::Text(self.category.clone()),
            CellValue::Text(self.view.as_str().to_string()),
            CellValue::Int(i64::from(self.sampling)),
            CellValue::Int(i64::from(self.read)),
            CellValue::Int(i64::from(self.write)),
            CellValue::optional_float(self.minvalue),
            CellValue::optional_float(self.maxvalue),
            CellValue::Text(self.unit.clone()),
            CellValue::Float(self.offset),
            CellValue::Float(self.addition),
            CellValue::Text(format_mask(self.mask)),
            CellValue::optional_float(self.value),
            CellValue::Text(self.length.to_string()),
            CellValue::Text(self.general_icon.clone()),
            CellValue::Text(serde_json::to_string(&self.alarm).unwrap_or_default()),
            CellValue::Text(serde_json::Value::from(self.metadata.clone()).to_string()),
            CellValue::Text(self.l10n.to_value().to_string()),
            CellValue::Text(self.tags_json()),
            CellValue::Text(self.protocol.clone()),
            CellValue::Int(i64::from(self.parameter_write_byte_position)),
            CellValue::Text(self.mqtt.clone()),
            CellValue::Text(self.json.clone()),
            CellValue::Float(self.current_value),
            CellValue::Int(self.current_error_status),
            CellValue::Text(self.notes.clone()),
        ];
        CANONICAL_COLUMNS.into_iter().zip(values).collect()
    }
}
