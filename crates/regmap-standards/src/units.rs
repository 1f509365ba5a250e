#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnitFile {
    /// Canonical symbol → recognized spellings.
    units: BTreeMap<String, Vec<String>>,
}

/// Shared lookup of unit spellings to canonical symbols.
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    by_token: BTreeMap<String, String>,
}

impl UnitTable {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let file: UnitFile = toml::from_str(text)?;
        let mut by_token = BTreeMap::new();
        for (canonical, spellings) in file.units {
            by_token.insert(unit_key(&canonical), canonical.clone());
            for spelling in spellings {
                by_token.insert(unit_key(&spelling), canonical.clone());
            }
        }
        Ok(Self { by_token })
    }

    /// Canonical symbol for a token, if the token is known.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.by_token.get(&unit_key(token)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

/// Lookup key: whitespace removed, uppercased.
pub fn unit_key(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_spacing() {
        let table = UnitTable::from_toml(
            r#"
[units]
"°C" = ["C", "degC", "º C"]
"bar" = ["BAR"]
"#,
        )
        .unwrap();
        assert_eq!(table.lookup("c"), Some("°C"));
        assert_eq!(table.lookup("º c"), Some("°C"));
        assert_eq!(table.lookup("°C"), Some("°C"));
        assert_eq!(table.lookup("Bar"), Some("bar"));
        assert_eq!(table.lookup("furlong"), None);
    }
}
