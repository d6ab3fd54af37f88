use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::json;
use table_detector::{Detector, FieldType, data::Cell, detector::deduplicate_names};

fn cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        any::<i32>().prop_map(|v| v.to_string()),
        (-1000.0f64..1000.0).prop_map(|v| format!("{v:.2}")),
        "[a-z]{1,6}",
        Just("true".to_string()),
        Just("2024-02-29".to_string()),
    ]
}

fn rows_strategy() -> impl Strategy<Value = Vec<Vec<Cell>>> {
    (1usize..5).prop_flat_map(|width| {
        prop::collection::vec(
            prop::collection::vec(cell_strategy().prop_map(|s| json!(s)), width),
            0..12,
        )
    })
}

proptest! {
    #[test]
    fn deduplicated_names_are_unique_and_keep_their_stem(
        names in prop::collection::vec("[ab]{1,2}", 0..16)
    ) {
        let deduped = deduplicate_names(&names);
        prop_assert_eq!(deduped.len(), names.len());
        let unique = deduped.iter().collect::<HashSet<_>>();
        prop_assert_eq!(unique.len(), deduped.len());
        for (original, renamed) in names.iter().zip(&deduped) {
            prop_assert!(renamed.starts_with(original.as_str()));
        }
        if let (Some(first), Some(renamed)) = (names.first(), deduped.first()) {
            prop_assert_eq!(first, renamed);
        }
    }

    #[test]
    fn detection_covers_every_column_deterministically(rows in rows_strategy()) {
        let detector = Detector::default();
        let first = detector.detect_schema(&rows, None, None).expect("detect");
        let second = detector.detect_schema(&rows, None, None).expect("detect");
        prop_assert_eq!(&first, &second);
        let width = rows.first().map(Vec::len).unwrap_or(0);
        prop_assert_eq!(first.fields.len(), width);
        prop_assert!(first.ensure_unique_names().is_ok());
    }

    #[test]
    fn integer_columns_are_detected_as_integer(
        values in prop::collection::vec(any::<i64>(), 1..30)
    ) {
        let rows = values
            .iter()
            .map(|v| vec![json!(v.to_string())])
            .collect::<Vec<_>>();
        let schema = Detector::default().detect_schema(&rows, None, None).expect("detect");
        prop_assert_eq!(schema.fields[0].field_type, FieldType::Integer);
    }
}
