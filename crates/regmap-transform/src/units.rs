//! Unit canonicalization.

use regmap_standards::{Profile, UnitTable};

use crate::numeric::is_placeholder;

/// Canonical symbol for a unit cell.
///
/// The profile's own aliases win over the shared table; unknown tokens are
/// kept as written (trimmed) and placeholders become empty.
pub fn canonical_unit(raw: &str, profile: &Profile, table: &UnitTable) -> String {
    if is_placeholder(raw) {
        return String::new();
    }
    let token = raw.trim();
    profile
        .unit_alias(token)
        .or_else(|| table.lookup(token))
        .unwrap_or(token)
        .to_string()
}
