use super::*;

const SMALL: &str = r##"{
  "title": "Test league",
  "rounds": ["Round 1", "Round 2"],
  "participants": [
    { "name": "A", "color": "#3366ff", "scores": [10, 15], "ranks": [2, 3] },
    { "name": "B", "color": "#ffcc00", "scores": [20, 20], "ranks": [1, 2] }
  ]
}"##;

#[test]
fn parses_integer_scores_as_numbers() {
    let ds = parse_dataset(SMALL).unwrap();
    assert_eq!(ds.participants()[0].scores(), &[10.0, 15.0]);
    assert_eq!(ds.round_label(0), "Round 1");
}

#[test]
fn syntax_errors_map_to_serde_errors() {
    let err = parse_dataset("{ not json").unwrap_err();
    assert!(matches!(err, RaceError::Serde(_)));
}

#[test]
fn missing_fields_are_rejected() {
    let err = parse_dataset(r#"{ "rounds": ["x"] }"#).unwrap_err();
    assert!(matches!(err, RaceError::Serde(_)));
}

#[test]
fn load_reports_missing_file_path() {
    let err = load_dataset(Path::new("does/not/exist.json")).unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}
