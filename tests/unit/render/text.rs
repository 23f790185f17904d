use super::*;
use crate::{
    dataset::model::{Dataset, DatasetDef, ParticipantDef},
    playback::controller::PlaybackController,
};

fn league() -> Dataset {
    let p = |name: &str, color: &str, scores: [f64; 2]| ParticipantDef {
        name: name.to_string(),
        color: color.to_string(),
        scores: scores.to_vec(),
        ranks: vec![1, 1],
    };
    Dataset::from_def(DatasetDef {
        title: None,
        max_scale: Some(40.0),
        rounds: vec!["R1".to_string(), "R2".to_string()],
        participants: vec![
            p("Ann", "#ff0000", [10.0, 15.0]),
            p("Bo", "#00ff00", [20.0, 40.0]),
        ],
    })
    .unwrap()
}

#[test]
fn bar_glyphs_use_eighth_blocks() {
    assert_eq!(bar_glyphs(0.0, 4), "    ");
    assert_eq!(bar_glyphs(1.0, 4), "████");
    assert_eq!(bar_glyphs(0.5, 4), "██  ");
    assert_eq!(bar_glyphs(0.5 + 1.0 / 32.0, 4), "██▏ ");
    assert_eq!(bar_glyphs(7.0, 2), "██");
}

#[test]
fn renders_standings_and_transport() {
    let ds = league();
    let mut c = PlaybackController::new(ds.round_count(), 500);
    c.scrub(1);
    let view = ChartView::build(&ds, &c);
    let r = TextRenderer {
        bar_cells: 8,
        ansi: false,
    };
    let out = r.render(&view, &[1.0, 0.375]).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "Prediction League | R2");
    assert_eq!(lines[1], "Standings after R2   Top performer: Bo (+20 points)");
    assert_eq!(lines[3], " Bo ████████ 40 points (rank 1)");
    assert_eq!(lines[4], "Ann ███      15 points (rank 1)");
    assert_eq!(lines[6], "[Restart]  speed: 500 ms (Fast)");
    assert_eq!(lines[7], "|=======o|  R1 .. R2");
}

#[test]
fn ansi_mode_wraps_bars_in_true_color() {
    let ds = league();
    let c = PlaybackController::new(ds.round_count(), 1000);
    let view = ChartView::build(&ds, &c);
    let r = TextRenderer {
        bar_cells: 4,
        ansi: true,
    };
    let out = r.render(&view, &[0.5, 0.25]).unwrap();
    assert!(out.contains("\x1b[38;2;0;255;0m██  \x1b[0m"));
    assert!(out.contains("[Play]"));
}
