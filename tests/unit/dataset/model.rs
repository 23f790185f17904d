use super::*;

fn def() -> DatasetDef {
    DatasetDef {
        title: Some("League".to_string()),
        max_scale: None,
        rounds: vec!["R1".to_string(), "R2".to_string()],
        participants: vec![
            ParticipantDef {
                name: "A".to_string(),
                color: "#ff0000".to_string(),
                scores: vec![10.0, 15.0],
                ranks: vec![2, 3],
            },
            ParticipantDef {
                name: "B".to_string(),
                color: "#00ff00".to_string(),
                scores: vec![20.0, 20.0],
                ranks: vec![1, 2],
            },
        ],
    }
}

#[test]
fn valid_definition_loads() {
    let ds = Dataset::from_def(def()).unwrap();
    assert_eq!(ds.round_count(), 2);
    assert_eq!(ds.last_round(), 1);
    assert_eq!(ds.title(), Some("League"));
    assert_eq!(ds.participants()[1].name(), "B");
    assert_eq!(ds.participant("A").unwrap().color(), Rgb8::new(255, 0, 0));
    assert_eq!(ds.rounds()[1], Round { index: 1, label: "R2".to_string() });
}

#[test]
fn round_requests_are_clamped() {
    let ds = Dataset::from_def(def()).unwrap();
    assert_eq!(ds.clamp_round(0), 0);
    assert_eq!(ds.clamp_round(99), 1);
    assert_eq!(ds.round_label(99), "R2");
}

#[test]
fn score_length_mismatch_is_a_configuration_error() {
    let mut d = def();
    d.participants[0].scores.pop();
    let err = Dataset::from_def(d).unwrap_err();
    assert!(matches!(err, RaceError::Validation(_)));
    assert!(err.to_string().contains("'A'"));
}

#[test]
fn rank_length_mismatch_is_rejected() {
    let mut d = def();
    d.participants[1].ranks.push(4);
    assert!(Dataset::from_def(d).is_err());
}

#[test]
fn label_count_mismatch_is_rejected() {
    let mut d = def();
    d.rounds.push("R3".to_string());
    assert!(Dataset::from_def(d).is_err());
}

#[test]
fn empty_tables_are_rejected() {
    let mut d = def();
    d.rounds.clear();
    for p in &mut d.participants {
        p.scores.clear();
        p.ranks.clear();
    }
    assert!(Dataset::from_def(d).is_err());

    let mut d = def();
    d.participants.clear();
    assert!(Dataset::from_def(d).is_err());
}

#[test]
fn duplicate_names_and_bad_values_are_rejected() {
    let mut d = def();
    d.participants[1].name = "A".to_string();
    assert!(Dataset::from_def(d).is_err());

    let mut d = def();
    d.participants[0].scores[0] = -1.0;
    assert!(Dataset::from_def(d).is_err());

    let mut d = def();
    d.participants[0].scores[1] = f64::NAN;
    assert!(Dataset::from_def(d).is_err());

    let mut d = def();
    d.participants[0].ranks[0] = 0;
    assert!(Dataset::from_def(d).is_err());

    let mut d = def();
    d.participants[0].color = "crimson".to_string();
    assert!(Dataset::from_def(d).is_err());

    let mut d = def();
    d.max_scale = Some(0.0);
    assert!(Dataset::from_def(d).is_err());
}

#[test]
fn max_scale_is_derived_with_headroom() {
    let ds = Dataset::from_def(def()).unwrap();
    // 20 * 1.05 = 21 -> next multiple of 10.
    assert_eq!(ds.max_scale(), 30.0);

    let mut d = def();
    d.max_scale = Some(270.0);
    assert_eq!(Dataset::from_def(d).unwrap().max_scale(), 270.0);

    let mut d = def();
    for p in &mut d.participants {
        p.scores = vec![0.0, 0.0];
    }
    assert_eq!(Dataset::from_def(d).unwrap().max_scale(), 1.0);
}

#[test]
fn to_def_round_trips_through_validation() {
    let ds = Dataset::from_def(def()).unwrap();
    let again = Dataset::from_def(ds.to_def()).unwrap();
    assert_eq!(ds, again);
}
