//! Schema Unifier.

use regmap_model::{CANONICAL_COLUMNS, ParameterRecord, SchemaError};

/// Assigns dense ids from 1 and checks every record against the canonical
/// column list.
pub fn unify(mut records: Vec<ParameterRecord>) -> Result<Vec<ParameterRecord>, SchemaError> {
    for (position, record) in records.iter_mut().enumerate() {
        record.id = u32::try_from(position + 1).unwrap_or(u32::MAX);
        check_schema(record)?;
    }
    Ok(records)
}

fn check_schema(record: &ParameterRecord) -> Result<(), SchemaError> {
    let cells = record.cells();
    if cells.len() != CANONICAL_COLUMNS.len() {
        return Err(SchemaError::Width {
            expected: CANONICAL_COLUMNS.len(),
            found: cells.len(),
        });
    }
    for (expected, (column, _)) in CANONICAL_COLUMNS.iter().zip(&cells) {
        if expected != column {
            return Err(SchemaError::MissingColumn {
                column: (*expected).to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_from_one() {
        let records = vec![
            ParameterRecord::named("A"),
            ParameterRecord::named("B"),
            ParameterRecord::named("C"),
        ];
        let unified = unify(records).unwrap();
        let ids: Vec<u32> = unified.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(unified[1].name, "B");
    }

    #[test]
    fn empty_batch_is_valid() {
        assert!(unify(Vec::new()).unwrap().is_empty());
    }
}
