//! Table-by-table header resolution with optional header inheritance.

use tracing::debug;

use regmap_model::{Field, LabeledRow, LabeledTable, RawCell, RawTable};
use regmap_standards::{FieldFamily, Profile};

use crate::error::ResolveError;
use crate::header::{column_fields, locate_header};
use crate::score::FamilyIndex;
use crate::utils::normalize_header;

/// Header carried over to a following headerless table of the same width.
#[derive(Debug, Clone)]
struct InheritedHeader {
    family: String,
    slots: Vec<Option<Field>>,
    texts: Vec<String>,
}

/// Resolves the raw tables of one conversion in order.
///
/// The resolver is stateful only when the profile sets `inherit_header`:
/// PDF tables broken across pages repeat their body without the header,
/// and those continuation tables reuse the last header seen.
#[derive(Debug, Clone)]
pub struct HeaderResolver<'a> {
    profile: &'a Profile,
    families: Vec<FamilyIndex>,
    previous: Option<InheritedHeader>,
}

impl<'a> HeaderResolver<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self::with_families(profile, &profile.families)
    }

    /// Resolver scoring `families` instead of the profile's own list.
    pub fn with_families(profile: &'a Profile, families: &[FieldFamily]) -> Self {
        Self {
            profile,
            families: families.iter().map(FamilyIndex::new).collect(),
            previous: None,
        }
    }

    pub fn families(&self) -> &[FamilyIndex] {
        &self.families
    }

    pub fn resolve(&mut self, table: &RawTable) -> Result<LabeledTable, ResolveError> {
        let located = locate_header(&table.rows, &self.families, self.profile.header_scan_rows);
        let (header, first_data_row, title) = match located {
            Some(found) => {
                let family = &self.families[found.family];
                let header_cells = table.rows.get(found.row).map(Vec::as_slice).unwrap_or(&[]);
                let header = InheritedHeader {
                    family: family.name.clone(),
                    slots: column_fields(family, header_cells),
                    texts: header_cells
                        .iter()
                        .map(|cell| normalize_header(cell.as_str()))
                        .collect(),
                };
                debug!(
                    table = %table.provenance,
                    family = %family.name,
                    score = found.score,
                    header_row = found.row,
                    "header resolved"
                );
                let title = title_above(table, found.row);
                (header, found.row + 1 + family.skip_rows_after_header, title)
            }
            None => match self.inheritable(table) {
                Some(previous) => {
                    debug!(
                        table = %table.provenance,
                        family = %previous.family,
                        "header inherited"
                    );
                    (previous, 0, None)
                }
                None => {
                    return Err(ResolveError::HeaderNotFound {
                        table: table.provenance.clone(),
                    });
                }
            },
        };

        let rows: Vec<LabeledRow> = table
            .rows
            .iter()
            .enumerate()
            .skip(first_data_row)
            .filter(|(_, cells)| !is_blank_row(cells) && !repeats_header(&header, cells))
            .map(|(index, cells)| label_row(&header.slots, cells, index))
            .filter(|row| !row.cells.is_empty())
            .collect();

        let columns: Vec<Field> = header.slots.iter().flatten().copied().collect();
        let family = header.family.clone();
        if self.profile.inherit_header {
            self.previous = Some(header);
        }
        if rows.is_empty() {
            return Err(ResolveError::NoDataRows {
                table: table.provenance.clone(),
            });
        }
        Ok(LabeledTable {
            provenance: table.provenance.clone(),
            family,
            columns,
            title,
            rows,
        })
    }

    fn inheritable(&self, table: &RawTable) -> Option<InheritedHeader> {
        if !self.profile.inherit_header {
            return None;
        }
        self.previous
            .as_ref()
            .filter(|previous| previous.slots.len() == table.width())
            .cloned()
    }
}

fn title_above(table: &RawTable, header_row: usize) -> Option<String> {
    let text = (0..header_row)
        .map(|index| table.row_texts(index).join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

fn is_blank_row(cells: &[RawCell]) -> bool {
    cells.iter().all(RawCell::is_blank)
}

/// A body row whose mapped cells spell the header again.
fn repeats_header(header: &InheritedHeader, cells: &[RawCell]) -> bool {
    let mut compared = 0;
    for (index, slot) in header.slots.iter().enumerate() {
        if slot.is_none() {
            continue;
        }
        let text = cells.get(index).map(RawCell::as_str).unwrap_or("");
        let expected = header.texts.get(index).map(String::as_str).unwrap_or("");
        if normalize_header(text) != expected {
            return false;
        }
        compared += 1;
    }
    compared > 0
}

fn label_row(slots: &[Option<Field>], cells: &[RawCell], source_row: usize) -> LabeledRow {
    let mut row = LabeledRow {
        source_row,
        style: cells.iter().find_map(|cell| cell.style),
        ..LabeledRow::default()
    };
    for (slot, cell) in slots.iter().zip(cells) {
        if let Some(field) = slot
            && !cell.is_blank()
        {
            row.set(*field, cell.as_str().trim());
        }
    }
    row
}
