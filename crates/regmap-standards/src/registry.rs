#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use regmap_model::SourceKind;

use crate::error::{Result, StandardsError};
use crate::profile::{Profile, PropagationRule};
use crate::units::UnitTable;

const UNITS_TOML: &str = include_str!("../profiles/units.toml");

/// Embedded TOML text of a kind's built-in profile.
pub fn builtin_profile_text(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::HtmlTable => include_str!("../profiles/html-table.toml"),
        SourceKind::SpreadsheetMultitab => include_str!("../profiles/spreadsheet-multitab.toml"),
        SourceKind::PdfDialectA => include_str!("../profiles/pdf-dialect-a.toml"),
        SourceKind::PdfDialectB => include_str!("../profiles/pdf-dialect-b.toml"),
        SourceKind::PdfMultiDocument => include_str!("../profiles/pdf-multi-document.toml"),
    }
}

/// Immutable rule tables for every source kind.
#[derive(Debug, Clone)]
pub struct Standards {
    profiles: BTreeMap<SourceKind, Profile>,
    units: UnitTable,
}

impl Standards {
    /// Parse the embedded profiles and unit table.
    pub fn builtin() -> Result<Self> {
        let units = UnitTable::from_toml(UNITS_TOML).map_err(|source| StandardsError::Toml {
            origin: "units.toml".to_string(),
            source,
        })?;
        let mut profiles = BTreeMap::new();
        for kind in SourceKind::ALL {
            let origin = format!("builtin {kind}");
            let profile = parse_profile(&origin, builtin_profile_text(kind))?;
            if profile.kind != kind {
                return Err(StandardsError::KindMismatch {
                    origin,
                    expected: kind,
                    found: profile.kind,
                });
            }
            profiles.insert(kind, profile);
        }
        debug!(profiles = profiles.len(), units = units.len(), "loaded builtin standards");
        Ok(Self { profiles, units })
    }

    /// Replace the profile of the kind declared in `path`.
    pub fn with_profile_file(self, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        self.with_profile_text(&path.display().to_string(), &text)
    }

    pub fn with_profile_text(mut self, origin: &str, text: &str) -> Result<Self> {
        let profile = parse_profile(origin, text)?;
        debug!(origin, kind = %profile.kind, "profile override");
        self.profiles.insert(profile.kind, profile);
        Ok(self)
    }

    pub fn profile(&self, kind: SourceKind) -> Option<&Profile> {
        self.profiles.get(&kind)
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }
}

fn parse_profile(origin: &str, text: &str) -> Result<Profile> {
    let profile: Profile = toml::from_str(text).map_err(|source| StandardsError::Toml {
        origin: origin.to_string(),
        source,
    })?;
    validate_profile(origin, &profile)?;
    Ok(profile)
}

fn validate_profile(origin: &str, profile: &Profile) -> Result<()> {
    if profile.families.is_empty() {
        return Err(StandardsError::invalid(origin, "no field families"));
    }
    let mut seen = Vec::new();
    for family in &profile.families {
        if family.name.trim().is_empty() {
            return Err(StandardsError::invalid(origin, "family without a name"));
        }
        if seen.contains(&family.name.as_str()) {
            return Err(StandardsError::invalid(
                origin,
                format!("duplicate family {}", family.name),
            ));
        }
        seen.push(family.name.as_str());
        if family.fields.is_empty() {
            return Err(StandardsError::invalid(
                origin,
                format!("family {} maps no fields", family.name),
            ));
        }
        if family.min_matches == 0 {
            return Err(StandardsError::invalid(
                origin,
                format!("family {} has min_matches = 0", family.name),
            ));
        }
    }
    for rule in &profile.propagation {
        if let PropagationRule::Marker { tokens, .. } = rule
            && tokens.is_empty()
        {
            return Err(StandardsError::invalid(origin, "marker rule without tokens"));
        }
    }
    if profile.default_lang.trim().is_empty() {
        return Err(StandardsError::invalid(origin, "empty default_lang"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmap_model::SystemCategory;

    #[test]
    fn builtin_parses_every_kind() {
        let standards = Standards::builtin().unwrap();
        for kind in SourceKind::ALL {
            let profile = standards.profile(kind).unwrap();
            assert_eq!(profile.kind, kind);
            assert!(!profile.families.is_empty());
        }
        assert_eq!(standards.units().lookup("C"), Some("°C"));
    }

    #[test]
    fn override_replaces_one_kind() {
        let text = r#"
kind = "pdf-dialect-a"
[[families]]
name = "custom"
fields.name = ["Label"]
fields.register = ["Addr"]
[sampling]
ALARM = 5
"#;
        let standards = Standards::builtin()
            .unwrap()
            .with_profile_text("custom.toml", text)
            .unwrap();
        let profile = standards.profile(SourceKind::PdfDialectA).unwrap();
        assert_eq!(profile.family_names(), vec!["custom"]);
        assert_eq!(profile.sampling_for(SystemCategory::Alarm), 5);
        assert_eq!(
            standards
                .profile(SourceKind::HtmlTable)
                .unwrap()
                .family_names(),
            vec!["keyter_bms"]
        );
    }

    #[test]
    fn duplicate_family_is_invalid() {
        let text = r#"
kind = "html-table"
[[families]]
name = "a"
fields.name = ["N"]
[[families]]
name = "a"
fields.name = ["M"]
"#;
        let error = Standards::builtin()
            .unwrap()
            .with_profile_text("dup.toml", text)
            .unwrap_err();
        assert!(matches!(error, StandardsError::InvalidProfile { .. }));
    }
}
