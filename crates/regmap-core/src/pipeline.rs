//! One conversion request, end to end.

use tracing::{debug, info, info_span, warn};

use regmap_ingest::Extraction;
use regmap_map::HeaderResolver;
use regmap_model::{
    ConvertError, Document, ParameterRecord, Result, SchemaError, SourceKind, SystemCategory,
    Warning,
};
use regmap_standards::{Profile, Standards};
use regmap_transform::disambiguate_names;

use crate::adapter::{SourceAdapter, adapter_for};
use crate::attributes::{Candidate, assign_masks, derive, settle_primary_view};
use crate::classify::{RuleMatch, classify};
use crate::context::Propagator;
use crate::draft::{Draft, normalize_row};
use crate::unify::unify;

/// Records in output order and the warnings met on the way.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub records: Vec<ParameterRecord>,
    pub warnings: Vec<Warning>,
}

/// Runs conversions against one set of rule tables.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    standards: &'a Standards,
}

impl<'a> Converter<'a> {
    pub fn new(standards: &'a Standards) -> Self {
        Self { standards }
    }

    fn profile(&self, kind: SourceKind) -> Result<&'a Profile> {
        self.standards
            .profile(kind)
            .ok_or_else(|| SchemaError::MissingProfile { kind }.into())
    }

    /// Converts the documents of one request, in the order given.
    pub fn convert(&self, kind: SourceKind, blobs: &[&[u8]]) -> Result<Conversion> {
        let _span = info_span!("convert", kind = %kind, documents = blobs.len()).entered();
        self.profile(kind)?;
        let documents: Vec<Document<'_>> = blobs
            .iter()
            .enumerate()
            .map(|(index, bytes)| Document::new(index, *bytes))
            .collect();
        let extraction = adapter_for(kind).extract_raw_tables(&documents)?;
        self.convert_tables(kind, extraction)
    }

    /// Converts tables that were already extracted.
    pub fn convert_tables(&self, kind: SourceKind, extraction: Extraction) -> Result<Conversion> {
        let profile = self.profile(kind)?;
        let adapter = adapter_for(kind);
        let Extraction {
            tables,
            mut warnings,
        } = extraction;
        let table_count = tables.len();

        let mut resolver = HeaderResolver::with_families(profile, adapter.field_families(profile));
        let mut propagator = Propagator::new(profile);
        for table in &tables {
            propagator.begin_table();
            let title_only = propagator.observe_title(table);
            if title_only {
                debug!(table = %table.provenance, "section title table consumed");
                continue;
            }
            let labeled = match resolver.resolve(table) {
                Ok(labeled) => labeled,
                Err(error) => {
                    warnings.push(error.into_warning());
                    continue;
                }
            };
            let filled = labeled.rows.iter().filter(|row| row.style.is_some()).count();
            if filled > 0 {
                debug!(table = %table.provenance, rows = filled, "colour-filled rows");
            }
            propagator.propagate(labeled);
        }

        let mut drafts = Vec::new();
        for tagged in propagator.finish() {
            drafts.extend(normalize_row(
                &tagged,
                profile,
                self.standards.units(),
                &mut warnings,
            ));
        }

        let records = build_records(drafts, profile, adapter)?;
        for warning in &warnings {
            warn!(code = warning.code(), "{warning}");
        }
        info!(
            kind = %kind,
            tables = table_count,
            records = records.len(),
            warnings = warnings.len(),
            "conversion finished"
        );
        Ok(Conversion { records, warnings })
    }
}

fn build_records(
    drafts: Vec<Draft>,
    profile: &Profile,
    adapter: &dyn SourceAdapter,
) -> std::result::Result<Vec<ParameterRecord>, ConvertError> {
    let rules = &profile.classification;
    let mut kept: Vec<(Draft, SystemCategory)> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let classification = classify(&draft, rules);
        if profile.drop_unlabeled && classification.rule == RuleMatch::Fallback {
            debug!(name = %draft.name, "unlabeled row dropped");
            continue;
        }
        if profile.is_excluded(classification.category) {
            debug!(name = %draft.name, category = %classification.category, "excluded category dropped");
            continue;
        }
        kept.push((draft, classification.category));
    }

    let names: Vec<&str> = kept.iter().map(|(draft, _)| draft.name.as_str()).collect();
    let unique = disambiguate_names(&names);

    let overrides = adapter.category_overrides(profile);
    let mut candidates: Vec<Candidate> = kept
        .into_iter()
        .zip(unique)
        .map(|((mut draft, category), name)| {
            draft.name = name;
            derive(draft, category, profile, overrides)
        })
        .collect();
    assign_masks(&mut candidates);
    settle_primary_view(&mut candidates, profile);

    let records = candidates.into_iter().map(|c| c.record).collect();
    Ok(unify(records)?)
}

/// Converts one request with the given rule tables.
pub fn convert(kind: SourceKind, blobs: &[&[u8]], standards: &Standards) -> Result<Conversion> {
    Converter::new(standards).convert(kind, blobs)
}
