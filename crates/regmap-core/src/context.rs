//! Context Propagator.
//!
//! Vendor tables encode structure by position: a marker row switches the
//! access mode for everything below it, an empty-key row names the group
//! that follows, a table titled `ALARMS` holds alarms. The propagator turns
//! that position into explicit fields with a fold over the rows, carrying a
//! [`ContextState`] from row to row and from table to table.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use regmap_model::{AccessMode, Field, LabeledRow, LabeledTable, Provenance, RawTable};
use regmap_standards::{NewKeyPolicy, Profile, PropagationRule};
use regmap_transform::{Coerced, clean_text, coerce_number};

/// Running context.
///
/// `mode` and `category` persist across raw tables unless the profile sets
/// `reset_category_per_table`; `section` always persists until replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextState {
    pub mode: Option<AccessMode>,
    /// Label set by keyed sections.
    pub category: Option<String>,
    /// Section opened by a table title.
    pub section: Option<String>,
    /// Key of the last keyed row, for `key_is_label` sections.
    running_key: Option<String>,
}

impl ContextState {
    fn reset_table_scope(&mut self) {
        self.mode = None;
        self.category = None;
        self.running_key = None;
    }
}

/// A data row with its propagated context.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRow {
    pub row: LabeledRow,
    pub provenance: Provenance,
    /// Field family the row's table was resolved through.
    pub family: String,
    /// Explicit label cell, else keyed category, else section.
    pub label: Option<String>,
    pub mode: Option<AccessMode>,
    /// The table carried a value column.
    pub has_value_column: bool,
}

/// Repeated-register group tracking.
///
/// A group may open at the end of one raw table and continue on the next
/// page, so this lives as long as the running category does.
#[derive(Debug, Default)]
struct Groups {
    /// Output positions turned into group headers after the fact.
    removed: BTreeSet<usize>,
    /// First output position of each key.
    first_seen: BTreeMap<String, usize>,
    /// Keys already promoted to group headers.
    headed: BTreeSet<String>,
}

/// Folds labeled tables into tagged rows, carrying context across tables.
///
/// Rows are buffered until [`Propagator::finish`]: a row is only known to
/// be data once no later row repeats its key.
pub struct Propagator<'a> {
    profile: &'a Profile,
    state: ContextState,
    rows: Vec<TaggedRow>,
    groups: Groups,
    after_marker: bool,
}

impl<'a> Propagator<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self {
            profile,
            state: ContextState::default(),
            rows: Vec::new(),
            groups: Groups::default(),
            after_marker: false,
        }
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    /// Call at every raw table boundary, before [`Propagator::observe_title`].
    pub fn begin_table(&mut self) {
        self.after_marker = false;
        if self.profile.reset_category_per_table {
            self.state.reset_table_scope();
            self.groups.first_seen.clear();
            self.groups.headed.clear();
        }
    }

    /// Opens a section when the table's first row spells a section title.
    ///
    /// Returns true when the table holds nothing but that title, so the
    /// caller can drop it without a header warning.
    pub fn observe_title(&mut self, table: &RawTable) -> bool {
        let first = table.row_texts(0).join(" ");
        if first.is_empty() {
            return false;
        }
        let Some(section) = self.section_for(&first) else {
            return false;
        };
        debug!(table = %table.provenance, section, "section opened");
        self.state.section = Some(section.to_string());
        table
            .rows
            .iter()
            .skip(1)
            .all(|row| row.iter().all(regmap_model::RawCell::is_blank))
    }

    fn section_for(&self, text: &str) -> Option<&'a str> {
        let wanted = clean_text(text).to_uppercase();
        self.profile.propagation.iter().find_map(|rule| match rule {
            PropagationRule::SectionTitles { sections } => sections
                .iter()
                .find(|section| {
                    section
                        .spellings()
                        .any(|spelling| clean_text(spelling).to_uppercase() == wanted)
                })
                .map(|section| section.name.as_str()),
            _ => None,
        })
    }

    /// Folds one labeled table, consuming marker and label rows.
    ///
    /// Returns the number of rows buffered from this table.
    pub fn propagate(&mut self, table: LabeledTable) -> usize {
        let has_value_column = table.has_column(Field::Value);
        let LabeledTable {
            provenance,
            family,
            rows,
            ..
        } = table;
        let before = self.rows.len();
        let headers_before = self.groups.removed.len();
        for row in rows {
            self.step(row, &provenance, &family, has_value_column);
        }
        let added = self.rows.len() - before;
        debug!(
            table = %provenance,
            rows = added,
            group_headers = self.groups.removed.len() - headers_before,
            "context propagated"
        );
        added
    }

    /// Every buffered data row in input order, group headers removed.
    pub fn finish(self) -> Vec<TaggedRow> {
        let removed = self.groups.removed;
        self.rows
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !removed.contains(index))
            .map(|(_, row)| row)
            .collect()
    }

    fn step(
        &mut self,
        row: LabeledRow,
        provenance: &Provenance,
        family: &str,
        has_value_column: bool,
    ) {
        let profile = self.profile;
        let after_marker = std::mem::replace(&mut self.after_marker, false);
        let mut keyed_label: Option<String> = None;

        for rule in &profile.propagation {
            match rule {
                PropagationRule::Marker {
                    column,
                    tokens,
                    drop_subheader,
                } => {
                    let Some(cell) = row.get(*column) else {
                        continue;
                    };
                    let upper = cell.to_uppercase();
                    if let Some(mode) = tokens
                        .iter()
                        .find(|(token, _)| upper.contains(token.as_str()))
                        .map(|(_, mode)| *mode)
                    {
                        debug!(table = %provenance, row = row.source_row, ?mode, "marker row");
                        self.state.mode = Some(mode);
                        self.after_marker = *drop_subheader;
                        return;
                    }
                    if after_marker && *drop_subheader && !is_numeric(cell) {
                        debug!(table = %provenance, row = row.source_row, "sub-header dropped");
                        return;
                    }
                }
                PropagationRule::KeyedSections {
                    key,
                    label,
                    new_key,
                } => {
                    let Some(key_text) = row.get(*key) else {
                        if let Some(text) = row.get(*label).or_else(|| first_text(&row)) {
                            self.state.category = Some(label_key(text));
                            self.state.running_key = None;
                        }
                        return;
                    };
                    match new_key {
                        NewKeyPolicy::KeyIsLabel => {
                            if self.state.running_key.as_deref() != Some(key_text) {
                                self.state.running_key = Some(key_text.to_string());
                                self.state.category = Some(label_key(key_text));
                            }
                        }
                        NewKeyPolicy::RepeatIsHeader => {
                            let groups = &mut self.groups;
                            if let Some(&first) = groups.first_seen.get(key_text)
                                && !groups.headed.contains(key_text)
                            {
                                let header_label =
                                    self.rows[first].row.get(*label).map(label_key);
                                groups.removed.insert(first);
                                groups.headed.insert(key_text.to_string());
                                if let Some(header_label) = header_label {
                                    self.state.category = Some(header_label);
                                }
                            } else {
                                groups
                                    .first_seen
                                    .entry(key_text.to_string())
                                    .or_insert(self.rows.len());
                            }
                        }
                    }
                    keyed_label = self.state.category.clone();
                }
                PropagationRule::SectionTitles { .. } => {}
            }
        }

        let label = row
            .get(Field::Label)
            .map(str::to_string)
            .or(keyed_label)
            .or_else(|| self.state.category.clone())
            .or_else(|| self.state.section.clone());
        self.rows.push(TaggedRow {
            row,
            provenance: provenance.clone(),
            family: family.to_string(),
            label,
            mode: self.state.mode,
            has_value_column,
        });
    }
}

fn is_numeric(text: &str) -> bool {
    matches!(coerce_number(text), Coerced::Value(_))
}

fn first_text(row: &LabeledRow) -> Option<&str> {
    row.cells
        .values()
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
}

/// Group names become labels with underscores: `CONTROL EQUIPOS` → `CONTROL_EQUIPOS`.
fn label_key(text: &str) -> String {
    clean_text(text).replace(' ', "_")
}
