//! Attribute Deriver.
//!
//! Turns a classified draft into a [`ParameterRecord`]: permission codes,
//! sampling, default ranges, offsets, bit length, view, tags and the
//! localization payload. Masks and the single primary view depend on the
//! whole batch and are settled afterwards by [`assign_masks`] and
//! [`settle_primary_view`].

use tracing::debug;

use regmap_model::{
    AGGREGATE_TAG, AccessFlags, BitLength, L10n, LIBRARY_IDENTIFIER_TAG, ParameterRecord,
    SystemCategory, View,
};
use regmap_standards::{PermissionOverride, Profile};
use regmap_transform::{RegisterBits, mask_for};

use crate::draft::{DimensionRole, Draft};

/// A record still carrying its place in a dimension template.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub record: ParameterRecord,
    pub dimension: Option<DimensionRole>,
}

/// Read and write codes for a category.
///
/// Codes by data kind apply first, each gated by the matching access flag;
/// access-class codes and then category overrides replace whatever they
/// name. ALARM records never get a write code.
pub fn permission_codes(
    draft: &Draft,
    category: SystemCategory,
    profile: &Profile,
    overrides: &[PermissionOverride],
) -> (u8, u8) {
    let AccessFlags { read, write } = draft.access;
    let class = draft.access.class();
    let mut codes = (0u8, 0u8);

    if let Some(by_kind) = draft.data_kind.and_then(|kind| profile.permissions.by_kind.get(&kind)) {
        if read && let Some(code) = by_kind.read {
            codes.0 = code;
        }
        if write && let Some(code) = by_kind.write {
            codes.1 = code;
        }
    }
    let by_class = profile.permissions.for_class(class);
    if let Some(code) = by_class.read {
        codes.0 = code;
    }
    if let Some(code) = by_class.write {
        codes.1 = code;
    }
    for rule in overrides
        .iter()
        .filter(|rule| rule.category == category && rule.access.accepts(class))
    {
        if let Some(code) = rule.read {
            codes.0 = code;
        }
        if let Some(code) = rule.write {
            codes.1 = code;
        }
    }
    if category == SystemCategory::Alarm {
        codes.1 = 0;
    }
    codes
}

/// Length by precedence: dimension, category table, length cell, sign rule.
pub fn resolve_length(
    draft: &Draft,
    category: SystemCategory,
    profile: &Profile,
    minvalue: Option<f64>,
    maxvalue: Option<f64>,
) -> BitLength {
    match draft.dimension {
        Some(DimensionRole::Aggregate { width }) => return width,
        Some(DimensionRole::Member { .. }) => return BitLength::ONE,
        None => {}
    }
    if let Some(rule) = profile.lengths.get(&category) {
        return rule.resolve(minvalue, maxvalue);
    }
    draft
        .length
        .unwrap_or_else(|| BitLength::for_range(minvalue, maxvalue))
}

pub fn resolve_view(category: SystemCategory, profile: &Profile) -> View {
    match category {
        SystemCategory::Status => View::Basic,
        SystemCategory::Alarm => profile.default_view,
        other => profile.view_for(other),
    }
}

/// Builds the record for one classified draft.
pub fn derive(
    draft: Draft,
    category: SystemCategory,
    profile: &Profile,
    overrides: &[PermissionOverride],
) -> Candidate {
    let (read, write) = permission_codes(&draft, category, profile, overrides);
    let range = profile.ranges.get(&category);
    let minvalue = draft.minvalue.or(range.map(|r| r.min));
    let maxvalue = draft.maxvalue.or(range.map(|r| r.max));
    let length = resolve_length(&draft, category, profile, minvalue, maxvalue);
    let offset = draft
        .offset
        .or_else(|| profile.offsets.get(&category).copied())
        .unwrap_or(0.0);
    let aggregate = matches!(draft.dimension, Some(DimensionRole::Aggregate { .. }));
    let sampling = if aggregate {
        0
    } else {
        profile.sampling_for(category)
    };

    let mut record = ParameterRecord {
        register: draft.register,
        name: draft.name,
        description: draft.description,
        system_category: category,
        category: draft.label.or(draft.category_cell).unwrap_or_default(),
        view: resolve_view(category, profile),
        sampling,
        read,
        write,
        minvalue,
        maxvalue,
        unit: draft.unit,
        offset,
        value: draft.value,
        length,
        l10n: L10n::new(profile.default_lang.clone()),
        ..ParameterRecord::default()
    };
    if category == SystemCategory::System {
        record.tags.insert(LIBRARY_IDENTIFIER_TAG.to_string());
    }
    if aggregate {
        record.tags.insert(AGGREGATE_TAG.to_string());
    }
    Candidate {
        record,
        dimension: draft.dimension,
    }
}

/// Packs single-bit records into sibling groups and numbers their masks.
///
/// Children of a dimension template are one group in template order and
/// claim their bits first. Other 1bit records sharing a register are one
/// group in input order and take the bits left free there. Aggregate
/// parents never get a mask.
pub fn assign_masks(candidates: &mut [Candidate]) {
    let mut bits = RegisterBits::new();
    for candidate in candidates.iter_mut() {
        let record = &mut candidate.record;
        match candidate.dimension {
            Some(DimensionRole::Aggregate { .. }) => record.mask = None,
            Some(DimensionRole::Member { index }) => {
                let mask = mask_for(index);
                bits.reserve(record.register, mask);
                record.mask = Some(mask);
            }
            None => {}
        }
    }
    for candidate in candidates.iter_mut() {
        if candidate.dimension.is_some() {
            continue;
        }
        let record = &mut candidate.record;
        record.mask = record
            .length
            .is_single_bit()
            .then(|| bits.allocate(record.register));
    }
}

/// Keeps the first primary-view qualifier and demotes the rest.
pub fn settle_primary_view(candidates: &mut [Candidate], profile: &Profile) {
    let mut granted = false;
    for candidate in candidates.iter_mut() {
        let record = &mut candidate.record;
        let qualifies = record.view == View::Primary
            || profile.primary_category == Some(record.system_category);
        if !qualifies {
            continue;
        }
        if granted {
            if record.view == View::Primary {
                record.view = demoted_view(record.system_category, profile);
            }
        } else {
            debug!(name = %record.name, "primary view granted");
            record.view = View::Primary;
            granted = true;
        }
    }
}

fn demoted_view(category: SystemCategory, profile: &Profile) -> View {
    [resolve_view(category, profile), profile.default_view]
        .into_iter()
        .find(|view| *view != View::Primary)
        .unwrap_or(View::Basic)
}
