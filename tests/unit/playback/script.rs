use super::*;

#[test]
fn parses_short_commands() {
    assert_eq!("p".parse::<TransportCommand>().unwrap(), TransportCommand::TogglePlay);
    assert_eq!("Reset".parse::<TransportCommand>().unwrap(), TransportCommand::Reset);
    assert_eq!(
        "s 12".parse::<TransportCommand>().unwrap(),
        TransportCommand::Scrub { round: 12 }
    );
    assert_eq!(
        "speed 750".parse::<TransportCommand>().unwrap(),
        TransportCommand::SetSpeed { ms: 750 }
    );
    assert_eq!(
        "fast".parse::<TransportCommand>().unwrap(),
        TransportCommand::Speed {
            preset: SpeedPreset::Fast
        }
    );
}

#[test]
fn rejects_malformed_commands() {
    for bad in ["", "   ", "jump", "s", "s x", "speed", "p now", "s 1 2"] {
        assert!(bad.parse::<TransportCommand>().is_err(), "'{bad}' should fail");
    }
}

#[test]
fn commands_drive_the_controller() {
    let mut c = PlaybackController::new(10, 1000);
    TransportCommand::Speed {
        preset: SpeedPreset::Slow,
    }
    .apply(&mut c);
    assert_eq!(c.speed_ms(), 2000);
    TransportCommand::TogglePlay.apply(&mut c);
    assert!(c.is_playing());
    TransportCommand::Scrub { round: 4 }.apply(&mut c);
    assert_eq!(c.round(), 4);
    assert!(!c.is_playing());
    TransportCommand::Reset.apply(&mut c);
    assert_eq!(c.round(), 0);
}

#[test]
fn script_json_uses_tagged_commands() {
    let script = TransportScript::parse(
        r#"{ "events": [
            { "at_ms": 0, "command": { "op": "toggle_play" } },
            { "at_ms": 2500, "command": { "op": "speed", "preset": "fast" } },
            { "at_ms": 4000, "command": { "op": "scrub", "round": 3 } }
        ] }"#,
    )
    .unwrap();
    assert_eq!(script.events.len(), 3);
    assert_eq!(
        script.events[1].command,
        TransportCommand::Speed {
            preset: SpeedPreset::Fast
        }
    );
    assert_eq!(script.end(), Duration::from_millis(4000));
}

#[test]
fn empty_script_means_autoplay() {
    let script = TransportScript::parse(r#"{ "events": [] }"#).unwrap();
    assert_eq!(script, TransportScript::autoplay());
}

#[test]
fn unsorted_or_zero_speed_scripts_are_rejected() {
    let unsorted = r#"{ "events": [
        { "at_ms": 10, "command": { "op": "reset" } },
        { "at_ms": 5, "command": { "op": "reset" } }
    ] }"#;
    assert!(matches!(
        TransportScript::parse(unsorted),
        Err(RaceError::Validation(_))
    ));

    let zero = r#"{ "events": [ { "at_ms": 0, "command": { "op": "set_speed", "ms": 0 } } ] }"#;
    assert!(TransportScript::parse(zero).is_err());
}

#[test]
fn cursor_releases_events_once_they_are_due() {
    let script = TransportScript {
        events: vec![
            ScriptEvent {
                at_ms: 0,
                command: TransportCommand::TogglePlay,
            },
            ScriptEvent {
                at_ms: 100,
                command: TransportCommand::Reset,
            },
        ],
    };
    let mut cursor = ScriptCursor::new(&script);
    assert_eq!(
        cursor.pop_due(Duration::ZERO).map(|e| e.command),
        Some(TransportCommand::TogglePlay)
    );
    assert_eq!(cursor.pop_due(Duration::from_millis(99)), None);
    assert!(!cursor.is_exhausted());
    assert_eq!(
        cursor.pop_due(Duration::from_millis(100)).map(|e| e.command),
        Some(TransportCommand::Reset)
    );
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.pop_due(Duration::from_secs(9)), None);
}
