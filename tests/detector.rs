mod common;

use common::{sample, strings};
use serde_json::json;
use table_detector::{
    DetectorConfig, Error, Field, FieldType, Schema,
    data::Cell,
    detector::{Detector, deduplicate_names, patch_schema, sync_schema},
};

fn detector(config: DetectorConfig) -> Detector {
    Detector::new(config).expect("valid detector config")
}

fn types(schema: &Schema) -> Vec<FieldType> {
    schema.fields.iter().map(|f| f.field_type).collect()
}

#[test]
fn detects_integer_and_string_columns_without_labels() {
    let rows = sample(&[&["1", "Alex"], &["2", "Kim"], &["3", "Sam"]]);
    let schema = Detector::default()
        .detect_schema(&rows, None, None)
        .expect("detect");
    assert_eq!(schema.field_names(), strings(&["field1", "field2"]));
    assert_eq!(types(&schema), vec![FieldType::Integer, FieldType::String]);
    assert_eq!(schema.missing_values, strings(&[""]));
}

#[test]
fn labels_name_the_fields_and_are_deduplicated() {
    let rows = sample(&[&["1", "2", "3"], &["4", "5", "6"]]);
    let labels = strings(&["id", "id", ""]);
    let schema = Detector::default()
        .detect_schema(&rows, Some(&labels), None)
        .expect("detect");
    assert_eq!(schema.field_names(), strings(&["id", "id2", "field3"]));
}

#[test]
fn field_names_override_labels() {
    let rows = sample(&[&["1", "x"]]);
    let labels = strings(&["a", "b"]);
    let config = DetectorConfig {
        field_names: Some(strings(&["left", "right"])),
        ..DetectorConfig::default()
    };
    let schema = detector(config)
        .detect_schema(&rows, Some(&labels), None)
        .expect("detect");
    assert_eq!(schema.field_names(), strings(&["left", "right"]));
}

#[test]
fn common_types_are_recognized() {
    let rows = sample(&[
        &["2024-01-01", "2024-01-01T10:00:00Z", "10:30:00", "1.5", "true", "2024-03", "P1D"],
        &["2024-02-03", "2024-02-03T11:15:30", "23:59:59", "2", "false", "2023-12", "PT5M"],
    ]);
    let schema = Detector::default()
        .detect_schema(&rows, None, None)
        .expect("detect");
    assert_eq!(
        types(&schema),
        vec![
            FieldType::Date,
            FieldType::DateTime,
            FieldType::Time,
            FieldType::Number,
            FieldType::Boolean,
            FieldType::YearMonth,
            FieldType::Duration,
        ]
    );
}

#[test]
fn structured_cells_are_recognized() {
    let rows = vec![
        vec![json!(r#"{"a": 1}"#), json!("[1, 2]"), json!("0, 0")],
        vec![json!(r#"{"b": 2}"#), json!("[]"), json!("12.5, -40")],
    ];
    let schema = Detector::default()
        .detect_schema(&rows, None, None)
        .expect("detect");
    assert_eq!(
        types(&schema),
        vec![FieldType::Object, FieldType::Array, FieldType::GeoPoint]
    );
}

#[test]
fn first_declared_candidate_wins_ties() {
    // integer is declared before year and boolean, which also accept these cells
    let rows = sample(&[&["2020", "1"], &["2021", "0"]]);
    let schema = Detector::default()
        .detect_schema(&rows, None, None)
        .expect("detect");
    assert_eq!(types(&schema), vec![FieldType::Integer, FieldType::Integer]);
}

#[test]
fn json_numbers_beyond_decimal_range_are_numbers() {
    let rows = vec![vec![json!(1e300)], vec![json!(2.5e40)]];
    let schema = Detector::default()
        .detect_schema(&rows, None, None)
        .expect("detect");
    assert_eq!(types(&schema), vec![FieldType::Number]);
}

#[test]
fn ids_beyond_i64_are_integers() {
    let ids = (0..3)
        .map(|i| format!("12345678901234567890123456789{i}"))
        .collect::<Vec<_>>();
    let rows = ids.iter().map(|id| vec![json!(id)]).collect::<Vec<_>>();
    let schema = Detector::default()
        .detect_schema(&rows, None, None)
        .expect("detect");
    assert_eq!(types(&schema), vec![FieldType::Integer]);
}

#[test]
fn raising_confidence_can_fall_back_to_a_broader_type() {
    let rows = sample(&[&["2024-01"], &["2024-02"], &["x"], &["y"]]);
    let detect = |confidence: f64| {
        let schema = detector(DetectorConfig {
            field_confidence: confidence,
            ..DetectorConfig::default()
        })
        .detect_schema(&rows, None, None)
        .expect("detect");
        schema.fields[0].field_type
    };
    assert_eq!(detect(0.5), FieldType::YearMonth);
    assert_eq!(detect(0.9), FieldType::String);
    assert_eq!(detect(1.0), FieldType::String);
}

#[test]
fn all_missing_column_is_any() {
    let rows = sample(&[&["1", ""], &["2", ""], &["3", ""]]);
    let schema = Detector::default()
        .detect_schema(&rows, None, None)
        .expect("detect");
    assert_eq!(types(&schema), vec![FieldType::Integer, FieldType::Any]);
}

#[test]
fn absent_trailing_cells_count_as_missing() {
    let rows = vec![
        vec![json!("1")],
        vec![json!("2"), Cell::Null],
        vec![json!("3"), json!("a")],
    ];
    let labels = strings(&["id", "note"]);
    let schema = Detector::default()
        .detect_schema(&rows, Some(&labels), None)
        .expect("detect");
    // two missing cells leave a single point to win
    assert_eq!(types(&schema), vec![FieldType::Integer, FieldType::String]);
}

#[test]
fn lower_confidence_tolerates_stray_values() {
    let rows = sample(&[&["1"], &["2"], &["3"], &["x"]]);
    let strict = Detector::default()
        .detect_schema(&rows, None, None)
        .expect("detect");
    assert_eq!(types(&strict), vec![FieldType::String]);

    let lenient = detector(DetectorConfig {
        field_confidence: 0.75,
        ..DetectorConfig::default()
    })
    .detect_schema(&rows, None, None)
    .expect("detect");
    assert_eq!(types(&lenient), vec![FieldType::Integer]);
}

#[test]
fn float_numbers_mark_number_fields() {
    let rows = sample(&[&["1.5"], &["2.25"]]);
    let schema = detector(DetectorConfig {
        field_float_numbers: true,
        ..DetectorConfig::default()
    })
    .detect_schema(&rows, None, None)
    .expect("detect");
    assert_eq!(schema.fields[0].field_type, FieldType::Number);
    assert!(schema.fields[0].float_number);
}

#[test]
fn forced_field_type_skips_inference() {
    let rows = sample(&[&["1", "2"], &["3", "4"]]);
    let schema = detector(DetectorConfig {
        field_type: Some(FieldType::String),
        ..DetectorConfig::default()
    })
    .detect_schema(&rows, None, None)
    .expect("detect");
    assert_eq!(types(&schema), vec![FieldType::String, FieldType::String]);
}

#[test]
fn empty_sample_with_labels_yields_any_fields() {
    let labels = strings(&["a", "b"]);
    let schema = Detector::default()
        .detect_schema(&[], Some(&labels), None)
        .expect("detect");
    assert_eq!(schema.field_names(), labels);
    assert_eq!(types(&schema), vec![FieldType::Any, FieldType::Any]);
}

#[test]
fn empty_sample_without_labels_yields_empty_schema() {
    let schema = Detector::default()
        .detect_schema(&[], None, None)
        .expect("detect");
    assert!(schema.fields.is_empty());
}

#[test]
fn custom_missing_values_are_used_and_recorded() {
    let rows = sample(&[&["1", "NA"], &["NA", "NA"], &["3", "NA"]]);
    let schema = detector(DetectorConfig {
        field_missing_values: strings(&["", "NA"]),
        ..DetectorConfig::default()
    })
    .detect_schema(&rows, None, None)
    .expect("detect");
    assert_eq!(types(&schema), vec![FieldType::Integer, FieldType::Any]);
    assert_eq!(schema.missing_values, strings(&["", "NA"]));
    let rendered = serde_json::to_value(&schema).unwrap();
    assert_eq!(rendered["missingValues"], json!(["", "NA"]));
}

#[test]
fn existing_schema_with_fields_is_reused() {
    let existing = Schema::from_fields(vec![
        Field::new("id", FieldType::String),
        Field::new("name", FieldType::String),
    ])
    .unwrap();
    let rows = sample(&[&["1", "Alex"]]);
    let schema = Detector::default()
        .detect_schema(&rows, None, Some(&existing))
        .expect("detect");
    assert_eq!(schema, existing);
}

#[test]
fn empty_existing_schema_falls_back_to_inference() {
    let rows = sample(&[&["1"]]);
    let schema = Detector::default()
        .detect_schema(&rows, None, Some(&Schema::default()))
        .expect("detect");
    assert_eq!(types(&schema), vec![FieldType::Integer]);
}

#[test]
fn sync_follows_labels() {
    let existing = Schema::from_fields(vec![
        Field::new("x", FieldType::Integer),
        Field::new("y", FieldType::Number),
    ])
    .unwrap();
    let labels = strings(&["y", "z"]);
    let schema = detector(DetectorConfig {
        schema_sync: true,
        ..DetectorConfig::default()
    })
    .detect_schema(&[], Some(&labels), Some(&existing))
    .expect("detect");
    assert_eq!(schema.field_names(), labels);
    assert_eq!(types(&schema), vec![FieldType::Number, FieldType::Any]);
}

#[test]
fn sync_with_duplicate_labels_is_rejected() {
    let existing = Schema::from_fields(vec![Field::new("a", FieldType::String)]).unwrap();
    let labels = strings(&["a", "a"]);
    let err = detector(DetectorConfig {
        schema_sync: true,
        ..DetectorConfig::default()
    })
    .detect_schema(&[], Some(&labels), Some(&existing))
    .unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
    assert!(err.to_string().contains("duplicate field names"));
}

#[test]
fn patch_overrides_detected_types() {
    let rows = sample(&[&["x"], &["y"]]);
    let labels = strings(&["a"]);
    let patch = json!({"fields": {"a": {"type": "integer"}}, "primaryKey": ["a"]});
    let schema = detector(DetectorConfig {
        schema_patch: patch.as_object().cloned(),
        ..DetectorConfig::default()
    })
    .detect_schema(&rows, Some(&labels), None)
    .expect("detect");
    assert_eq!(schema.fields[0].field_type, FieldType::Integer);
    assert_eq!(schema.primary_key, strings(&["a"]));
}

#[test]
fn patch_renaming_into_a_duplicate_is_rejected() {
    let rows = sample(&[&["1", "2"]]);
    let labels = strings(&["a", "b"]);
    let patch = json!({"fields": {"b": {"name": "a"}}});
    let err = detector(DetectorConfig {
        schema_patch: patch.as_object().cloned(),
        ..DetectorConfig::default()
    })
    .detect_schema(&rows, Some(&labels), None)
    .unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[test]
fn patch_for_unknown_field_is_ignored() {
    let schema = Schema::from_fields(vec![Field::new("a", FieldType::String)]).unwrap();
    let patch = json!({"fields": {"missing": {"type": "integer"}}});
    let patched = patch_schema(&schema, patch.as_object().unwrap()).expect("patch");
    assert_eq!(patched, schema);
}

#[test]
fn sync_does_not_touch_the_input_schema() {
    let schema = Schema::from_fields(vec![Field::new("a", FieldType::Year)]).unwrap();
    let before = schema.clone();
    let synced = sync_schema(&schema, &strings(&["b"]));
    assert_eq!(schema, before);
    assert_eq!(synced.field_names(), strings(&["b"]));
}

#[test]
fn detection_is_deterministic() {
    let rows = sample(&[
        &["1", "a", "2024-01-01", ""],
        &["2", "b", "2024-01-02", "3.5"],
        &["x", "c", "nope", "4"],
    ]);
    let detector = Detector::default();
    let first = detector.detect_schema(&rows, None, None).expect("detect");
    let second = detector.detect_schema(&rows, None, None).expect("detect");
    assert_eq!(first, second);
}

#[test]
fn invalid_confidence_is_rejected() {
    for confidence in [0.0, 1.5, -0.1] {
        let err = Detector::new(DetectorConfig {
            field_confidence: confidence,
            ..DetectorConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}

#[test]
fn deduplicate_is_stable_for_unique_names() {
    let names = strings(&["a", "b", "c"]);
    assert_eq!(deduplicate_names(&names), names);
}
