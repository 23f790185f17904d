use super::*;
use crate::{
    animation::ease::Ease,
    dataset::model::{DatasetDef, ParticipantDef},
    encode::sink::InMemorySink,
    foundation::core::Canvas,
    playback::{controller::PlaybackPhase, script::ScriptEvent},
};

#[derive(Default)]
struct RecordingBackend {
    rounds: Vec<usize>,
}

impl RenderBackend for RecordingBackend {
    fn canvas(&self) -> Canvas {
        Canvas::new(4, 2).unwrap()
    }

    fn render_frame(&mut self, view: &ChartView, _widths: &[f64]) -> RaceResult<FrameRGBA> {
        self.rounds.push(view.round);
        Ok(FrameRGBA {
            width: 4,
            height: 2,
            data: vec![view.round as u8; 32],
            premultiplied: true,
        })
    }
}

fn dataset(rounds: usize) -> Dataset {
    Dataset::from_def(DatasetDef {
        title: None,
        max_scale: Some(10.0 * rounds as f64),
        rounds: (1..=rounds).map(|i| format!("R{i}")).collect(),
        participants: vec![
            ParticipantDef {
                name: "A".to_string(),
                color: "#ff0000".to_string(),
                scores: (1..=rounds).map(|i| (i * 10) as f64).collect(),
                ranks: vec![1; rounds],
            },
            ParticipantDef {
                name: "B".to_string(),
                color: "#00ff00".to_string(),
                scores: (1..=rounds).map(|i| (i * 5) as f64).collect(),
                ranks: vec![2; rounds],
            },
        ],
    })
    .unwrap()
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn opts(fps: u32, speed_ms: u64) -> RaceSessionOpts {
    RaceSessionOpts {
        fps: Fps::new(fps, 1).unwrap(),
        speed_ms,
        static_frame_elision: false,
        ..RaceSessionOpts::default()
    }
}

fn ev(at_ms: u64, command: TransportCommand) -> ScriptEvent {
    ScriptEvent { at_ms, command }
}

#[test]
fn invalid_opts_are_rejected() {
    let bad = RaceSessionOpts {
        fps: Fps { num: 30, den: 0 },
        ..RaceSessionOpts::default()
    };
    assert!(RaceSession::new(dataset(2), &ChartStyle::default(), bad).is_err());

    let bad = RaceSessionOpts {
        max_duration: Duration::ZERO,
        ..RaceSessionOpts::default()
    };
    assert!(RaceSession::new(dataset(2), &ChartStyle::default(), bad).is_err());
}

#[test]
fn autoplay_runs_to_the_last_round() {
    let mut s = RaceSession::new(dataset(3), &ChartStyle::default(), opts(30, 1000)).unwrap();
    s.apply(TransportCommand::TogglePlay);
    assert_eq!(s.advance(ms(5000)), 2);
    assert_eq!(s.controller().round(), 2);
    assert_eq!(s.controller().phase(), PlaybackPhase::Finished);
    assert_eq!(s.now(), ms(5000));
    assert!(s.is_settled());
}

#[test]
fn bar_transition_starts_at_the_tick_time() {
    let style = ChartStyle::default();
    let mut s = RaceSession::new(dataset(2), &style, opts(30, 1000)).unwrap();
    s.apply(TransportCommand::TogglePlay);
    s.advance(ms(1500));

    // A grows 10 -> 20 on a 20-point axis; the tick at t = 1000 starts the 700 ms tween.
    let view = s.view();
    assert_eq!(view.entries[0].name, "A");
    let expected = 0.5 + 0.5 * Ease::OutCubic.apply(500.0 / 700.0);
    assert!((s.widths(&view)[0] - expected).abs() < 1e-9);
}

#[test]
fn render_round_settles_the_bars() {
    let mut s = RaceSession::new(dataset(4), &ChartStyle::default(), opts(30, 1000)).unwrap();
    let mut backend = RecordingBackend::default();
    let frame = s.render_round(2, &mut backend).unwrap();

    assert_eq!(frame.data[0], 2);
    assert_eq!(backend.rounds, [2]);
    let view = s.view();
    assert_eq!(s.widths(&view), vec![0.75, 0.375]);
    assert!(s.is_settled());
}

#[test]
fn render_text_shows_the_current_round() {
    let mut s = RaceSession::new(dataset(2), &ChartStyle::default(), opts(30, 1000)).unwrap();
    s.apply(TransportCommand::Scrub { round: 1 });
    let out = s.render_text(&TextRenderer::default()).unwrap();
    assert!(out.starts_with("Prediction League | R2"));
}

#[test]
fn script_events_apply_at_their_own_time_between_frames() {
    let mut s = RaceSession::new(dataset(10), &ChartStyle::default(), opts(1, 1000)).unwrap();
    let script = TransportScript {
        events: vec![
            ev(0, TransportCommand::TogglePlay),
            ev(100, TransportCommand::SetSpeed { ms: 500 }),
            ev(2100, TransportCommand::TogglePlay),
        ],
    };
    let mut backend = RecordingBackend::default();
    let mut sink = InMemorySink::new();
    let stats = s.render_script(&script, &mut backend, &mut sink).unwrap();

    // Ticks at 600, 1100, 1600 and 2100 ms; the pause lands right after the last one.
    assert_eq!(backend.rounds, [0, 1, 3, 4, 4, 4]);
    assert_eq!(stats.frames_total, 6);
    assert_eq!(stats.frames_rendered, 6);
    assert!(sink.is_ended());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(idx, [0, 1, 2, 3, 4, 5]);
}

#[test]
fn autoplay_render_holds_the_final_state_and_elides_repeats() {
    let o = RaceSessionOpts {
        static_frame_elision: true,
        ..opts(10, 500)
    };
    let mut s = RaceSession::new(dataset(3), &ChartStyle::default(), o).unwrap();
    let mut backend = RecordingBackend::default();
    let mut sink = InMemorySink::new();
    let stats = s
        .render_script(&TransportScript::autoplay(), &mut backend, &mut sink)
        .unwrap();

    // Finished at 1000 ms, settled at 1700 ms, held for 1500 ms.
    assert_eq!(stats.frames_total, 33);
    assert_eq!(stats.frames_rendered + stats.frames_elided, 33);
    assert!(stats.frames_elided >= 15);
    assert_eq!(sink.frames().len(), 33);
    assert_eq!(sink.config().unwrap().fps, Fps::new(10, 1).unwrap());
    assert_eq!(backend.rounds.last(), Some(&2));
    assert_eq!(s.controller().phase(), PlaybackPhase::Finished);
}

#[test]
fn render_stops_at_max_duration() {
    let o = RaceSessionOpts {
        max_duration: ms(2000),
        ..opts(10, 1000)
    };
    let mut s = RaceSession::new(dataset(100), &ChartStyle::default(), o).unwrap();
    let mut backend = RecordingBackend::default();
    let mut sink = InMemorySink::new();
    let stats = s
        .render_script(&TransportScript::autoplay(), &mut backend, &mut sink)
        .unwrap();
    assert_eq!(stats.frames_total, 21);
    assert!(s.controller().is_playing());
}

#[test]
fn session_keeps_no_playback_event_backlog() {
    let mut s = RaceSession::new(dataset(3), &ChartStyle::default(), opts(30, 1000)).unwrap();
    for _ in 0..500 {
        s.apply(TransportCommand::TogglePlay);
        s.advance(ms(5000));
        assert!(s.controller.drain_events().is_empty());
    }
    s.apply(TransportCommand::SetSpeed { ms: 250 });
    s.apply(TransportCommand::Scrub { round: 1 });
    s.apply(TransportCommand::Reset);
    s.settle();
    assert!(s.controller.drain_events().is_empty());
    assert_eq!(s.controller().round(), 0);
}
