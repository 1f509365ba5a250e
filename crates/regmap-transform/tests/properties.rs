//! Property-based tests for the normalization laws.

use std::collections::BTreeSet;

use proptest::prelude::*;
use regmap_transform::{Coerced, coerce_number, disambiguate_names, mask_for, parse_dimension};

fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("(TEMP|SP|AL)(_[1-3])?").unwrap()
}

fn placeholder_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t]{1,4}",
        "-{1,6}",
        Just("nan".to_string()),
        Just("NaN".to_string()),
        Just("N/A".to_string()),
    ]
}

proptest! {
    #[test]
    fn disambiguated_names_are_unique(names in prop::collection::vec(name_strategy(), 0..40)) {
        let out = disambiguate_names(&names);
        prop_assert_eq!(out.len(), names.len());
        let unique: BTreeSet<&String> = out.iter().collect();
        prop_assert_eq!(unique.len(), out.len());
    }

    #[test]
    fn first_occurrence_keeps_its_name(names in prop::collection::vec(name_strategy(), 1..40)) {
        let out = disambiguate_names(&names);
        let mut seen = BTreeSet::new();
        for (original, renamed) in names.iter().zip(&out) {
            if seen.insert(original.clone()) {
                prop_assert_eq!(original, renamed);
            } else {
                let prefix = format!("{original}_");
                prop_assert!(renamed.starts_with(&prefix));
            }
        }
    }

    #[test]
    fn sibling_masks_are_distinct_within_a_register(count in 1usize..=16) {
        let masks: BTreeSet<u16> = (0..count).map(mask_for).collect();
        prop_assert_eq!(masks.len(), count);
        for index in 0..count {
            prop_assert_eq!(mask_for(index), 1u16 << index);
        }
    }

    #[test]
    fn masks_restart_every_sixteen(index in 0usize..1000) {
        prop_assert_eq!(mask_for(index), mask_for(index % 16));
        prop_assert_eq!(mask_for(index).count_ones(), 1);
    }

    #[test]
    fn placeholders_never_become_zero(text in placeholder_strategy()) {
        prop_assert_eq!(coerce_number(&text), Coerced::Null);
    }

    #[test]
    fn integers_round_trip_through_coercion(value in -100_000i64..100_000) {
        prop_assert_eq!(coerce_number(&value.to_string()), Coerced::Value(value as f64));
    }

    #[test]
    fn dimension_span_length(start in 0i64..50, extra in 0i64..40) {
        let end = start + extra;
        let span = parse_dimension(&format!("[{start}..{end}]")).unwrap();
        prop_assert_eq!(span.len() as i64, extra + 1);
    }
}
