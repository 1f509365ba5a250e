#![deny(unsafe_code)]

//! Rule profile schema.
//!
//! One profile drives a whole conversion for its source kind: which header
//! families to look for, how context is propagated, how rows are classified
//! and which attributes each category receives.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::units::unit_key;
use regmap_model::{
    AccessClass, AccessMode, BitLength, DEFAULT_LANG, DataKind, Field, LengthUnit, SourceKind,
    SystemCategory, View,
};

/// Deserialize a string-keyed table into a map keyed by a parsed type.
fn parsed_keys<'de, D, K, V>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: FromStr + Ord,
    K::Err: Display,
    V: Deserialize<'de>,
{
    let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| key.parse::<K>().map(|key| (key, value)).map_err(D::Error::custom))
        .collect()
}

/// Deserialize a table whose keys are compared case-insensitively later on.
fn upper_keys<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key.trim().to_uppercase(), value))
        .collect())
}

fn default_header_scan_rows() -> usize {
    12
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

fn default_min_matches() -> usize {
    2
}

/// How register and value cells are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radix {
    #[default]
    Decimal,
    Hex,
    /// Hex when the token has a `0x` prefix or hex letters, decimal otherwise.
    Auto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub kind: SourceKind,
    /// Forget the running category at every raw table boundary.
    #[serde(default)]
    pub reset_category_per_table: bool,
    /// Reuse the previous header for a headerless table of equal width.
    #[serde(default)]
    pub inherit_header: bool,
    #[serde(default = "default_header_scan_rows")]
    pub header_scan_rows: usize,
    #[serde(default)]
    pub register_radix: Radix,
    #[serde(default)]
    pub value_radix: Radix,
    /// Drop rows whose label does not map through the label dictionary.
    #[serde(default)]
    pub drop_unlabeled: bool,
    #[serde(default)]
    pub drop_rows_without_register: bool,
    #[serde(default)]
    pub description_max_chars: Option<usize>,
    #[serde(default)]
    pub default_view: View,
    /// Records of this category compete for the single primary view.
    #[serde(default)]
    pub primary_category: Option<SystemCategory>,
    #[serde(default = "default_lang")]
    pub default_lang: String,
    #[serde(default)]
    pub length_unit: LengthUnit,
    #[serde(default)]
    pub normalize_length: bool,
    #[serde(default)]
    pub value_limit: Option<f64>,
    #[serde(default)]
    pub excluded_categories: Vec<SystemCategory>,
    pub families: Vec<FieldFamily>,
    #[serde(default)]
    pub propagation: Vec<PropagationRule>,
    #[serde(default)]
    pub classification: ClassificationRules,
    #[serde(default)]
    pub permissions: PermissionRules,
    #[serde(default, deserialize_with = "parsed_keys")]
    pub sampling: BTreeMap<SystemCategory, u32>,
    #[serde(default)]
    pub default_sampling: u32,
    #[serde(default, deserialize_with = "parsed_keys")]
    pub views: BTreeMap<SystemCategory, View>,
    #[serde(default, deserialize_with = "parsed_keys")]
    pub lengths: BTreeMap<SystemCategory, LengthRule>,
    #[serde(default, deserialize_with = "parsed_keys")]
    pub ranges: BTreeMap<SystemCategory, ValueRange>,
    #[serde(default, deserialize_with = "parsed_keys")]
    pub offsets: BTreeMap<SystemCategory, f64>,
    /// Profile-local unit aliases, consulted before the shared unit table.
    #[serde(default, deserialize_with = "upper_keys")]
    pub units: BTreeMap<String, String>,
}

impl Profile {
    pub fn family(&self, name: &str) -> Option<&FieldFamily> {
        self.families.iter().find(|family| family.name == name)
    }

    /// Register radix of tables resolved through `family`.
    pub fn register_radix_for(&self, family: &str) -> Radix {
        self.family(family)
            .and_then(|family| family.register_radix)
            .unwrap_or(self.register_radix)
    }

    pub fn family_names(&self) -> Vec<&str> {
        self.families.iter().map(|family| family.name.as_str()).collect()
    }

    pub fn sampling_for(&self, category: SystemCategory) -> u32 {
        self.sampling
            .get(&category)
            .copied()
            .unwrap_or(self.default_sampling)
    }

    pub fn view_for(&self, category: SystemCategory) -> View {
        self.views
            .get(&category)
            .copied()
            .unwrap_or(self.default_view)
    }

    pub fn is_excluded(&self, category: SystemCategory) -> bool {
        self.excluded_categories.contains(&category)
    }

    /// Profile-local alias for a unit token.
    pub fn unit_alias(&self, token: &str) -> Option<&str> {
        let key = unit_key(token);
        self.units
            .iter()
            .find(|(alias, _)| unit_key(alias) == key)
            .map(|(_, canonical)| canonical.as_str())
    }

    pub fn has_marker_rules(&self) -> bool {
        self.propagation
            .iter()
            .any(|rule| matches!(rule, PropagationRule::Marker { .. }))
    }
}

/// One header dictionary: the raw header spellings of each canonical field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldFamily {
    pub name: String,
    /// Fewer matching header cells than this never promote a row to header.
    #[serde(default = "default_min_matches")]
    pub min_matches: usize,
    #[serde(default)]
    pub skip_rows_after_header: usize,
    /// Overrides the profile's `register_radix` for tables of this family.
    #[serde(default)]
    pub register_radix: Option<Radix>,
    #[serde(deserialize_with = "parsed_keys")]
    pub fields: BTreeMap<Field, Vec<String>>,
}

impl FieldFamily {
    /// All (alias, field) pairs.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, Field)> {
        self.fields
            .iter()
            .flat_map(|(field, aliases)| aliases.iter().map(move |alias| (alias.as_str(), *field)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PropagationRule {
    /// Rows whose `column` holds a mode token set the running access mode.
    Marker {
        column: Field,
        #[serde(deserialize_with = "upper_keys")]
        tokens: BTreeMap<String, AccessMode>,
        /// Drop a textual row right after a marker.
        #[serde(default)]
        drop_subheader: bool,
    },
    /// Rows keyed by `key`; rows with an empty key are label rows.
    KeyedSections {
        key: Field,
        label: Field,
        #[serde(default)]
        new_key: NewKeyPolicy,
    },
    /// A table title matching an alias opens a section.
    SectionTitles { sections: Vec<SectionTitle> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewKeyPolicy {
    /// A key differing from the running one becomes the new label.
    #[default]
    KeyIsLabel,
    /// A key seen again turns its first occurrence into a group header.
    RepeatIsHeader,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionTitle {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl SectionTitle {
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    #[default]
    Prefix,
    Contains,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMatch {
    #[default]
    Exact,
    /// Longest dictionary label contained in the row label wins.
    Contains,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameRule {
    pub pattern: String,
    #[serde(rename = "match", default)]
    pub matching: NameMatch,
    pub category: SystemCategory,
}

impl NameRule {
    /// Case-insensitive match against a parameter name.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_uppercase();
        let pattern = self.pattern.to_uppercase();
        match self.matching {
            NameMatch::Prefix => name.starts_with(&pattern),
            NameMatch::Contains => name.contains(&pattern),
        }
    }
}

fn set_point() -> SystemCategory {
    SystemCategory::SetPoint
}

fn command() -> SystemCategory {
    SystemCategory::Command
}

fn default_category() -> SystemCategory {
    SystemCategory::Default
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationRules {
    #[serde(default = "set_point")]
    pub read_write_numeric: SystemCategory,
    #[serde(default = "command")]
    pub read_write_digital: SystemCategory,
    #[serde(default = "default_category")]
    pub read_only: SystemCategory,
    #[serde(default = "default_category")]
    pub fallback: SystemCategory,
    /// Labels starting with one of these (case-insensitive) are alarms.
    #[serde(default)]
    pub alarm_label_prefixes: Vec<String>,
    /// Names containing one of these (case-sensitive) are alarms.
    #[serde(default)]
    pub alarm_name_contains: Vec<String>,
    #[serde(default)]
    pub name_rules: Vec<NameRule>,
    #[serde(default)]
    pub label_match: LabelMatch,
    #[serde(default, deserialize_with = "upper_keys")]
    pub labels: BTreeMap<String, SystemCategory>,
    #[serde(default, deserialize_with = "upper_keys")]
    pub data_kinds: BTreeMap<String, DataKind>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            read_write_numeric: set_point(),
            read_write_digital: command(),
            read_only: default_category(),
            fallback: default_category(),
            alarm_label_prefixes: Vec::new(),
            alarm_name_contains: Vec::new(),
            name_rules: Vec::new(),
            label_match: LabelMatch::default(),
            labels: BTreeMap::new(),
            data_kinds: BTreeMap::new(),
        }
    }
}

impl ClassificationRules {
    /// Category a label maps to through the label dictionary.
    pub fn label_category(&self, label: &str) -> Option<SystemCategory> {
        let label = label.trim().to_uppercase();
        if label.is_empty() {
            return None;
        }
        if let Some(category) = self.labels.get(&label) {
            return Some(*category);
        }
        match self.label_match {
            LabelMatch::Exact => None,
            LabelMatch::Contains => self
                .labels
                .iter()
                .filter(|(key, _)| label.contains(key.as_str()))
                .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
                .map(|(_, category)| *category),
        }
    }

    pub fn data_kind(&self, token: &str) -> Option<DataKind> {
        self.data_kinds.get(&token.trim().to_uppercase()).copied()
    }

    pub fn is_alarm_label(&self, label: &str) -> bool {
        let label = label.trim().to_uppercase();
        self.alarm_label_prefixes
            .iter()
            .any(|prefix| label.starts_with(&prefix.to_uppercase()))
    }

    pub fn is_alarm_name(&self, name: &str) -> bool {
        self.alarm_name_contains
            .iter()
            .any(|needle| name.contains(needle.as_str()))
    }

    pub fn name_category(&self, name: &str) -> Option<SystemCategory> {
        self.name_rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(|rule| rule.category)
    }
}

/// Read and write codes; `None` leaves the current code untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Codes {
    #[serde(default)]
    pub read: Option<u8>,
    #[serde(default)]
    pub write: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMatch {
    #[default]
    Any,
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMatch {
    pub fn accepts(&self, class: AccessClass) -> bool {
        match self {
            AccessMatch::Any => true,
            AccessMatch::ReadOnly => class == AccessClass::ReadOnly,
            AccessMatch::WriteOnly => class == AccessClass::WriteOnly,
            AccessMatch::ReadWrite => class == AccessClass::ReadWrite,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionOverride {
    pub category: SystemCategory,
    #[serde(default)]
    pub access: AccessMatch,
    #[serde(default)]
    pub read: Option<u8>,
    #[serde(default)]
    pub write: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionRules {
    /// Codes by data kind, gated by the access flags of the row.
    #[serde(default, deserialize_with = "parsed_keys")]
    pub by_kind: BTreeMap<DataKind, Codes>,
    #[serde(default)]
    pub read: Codes,
    #[serde(default)]
    pub write: Codes,
    #[serde(default)]
    pub read_write: Codes,
    #[serde(default)]
    pub overrides: Vec<PermissionOverride>,
}

impl PermissionRules {
    pub fn for_class(&self, class: AccessClass) -> Codes {
        match class {
            AccessClass::None => Codes::default(),
            AccessClass::ReadOnly => self.read,
            AccessClass::WriteOnly => self.write,
            AccessClass::ReadWrite => self.read_write,
        }
    }
}

/// Length assigned to a category regardless of the source's length cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    Fixed(BitLength),
    /// `s16` when the range dips below zero, `16bit` otherwise.
    SignAware,
}

impl LengthRule {
    pub fn resolve(&self, min: Option<f64>, max: Option<f64>) -> BitLength {
        match self {
            LengthRule::Fixed(length) => *length,
            LengthRule::SignAware => BitLength::for_range(min, max),
        }
    }
}

impl<'de> Deserialize<'de> for LengthRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text.trim().eq_ignore_ascii_case("signed16") {
            return Ok(LengthRule::SignAware);
        }
        BitLength::parse(&text, LengthUnit::Bits)
            .map(LengthRule::Fixed)
            .ok_or_else(|| D::Error::custom(format!("invalid length rule: {text}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}
