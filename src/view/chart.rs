use crate::{
    dataset::model::Dataset,
    foundation::core::Rgb8,
    playback::controller::{PlaybackController, PlaybackPhase, SpeedPreset},
    ranking::computer::{Gain, RankingComputer, RankingEntry},
};

/// Title used when the dataset does not define one.
pub const DEFAULT_TITLE: &str = "Prediction League";

/// Label state of the play button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlayButton {
    /// Idle before the last round.
    Play,
    /// Playing.
    Pause,
    /// Parked on the last round; pressing restarts from round 0.
    Restart,
}

impl PlayButton {
    /// Button for a controller phase.
    pub fn for_phase(phase: PlaybackPhase) -> Self {
        match phase {
            PlaybackPhase::Idle => Self::Play,
            PlaybackPhase::Playing => Self::Pause,
            PlaybackPhase::Finished => Self::Restart,
        }
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::Restart => "Restart",
        }
    }
}

/// Scrub control state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ScrubView {
    /// Current round.
    pub value: usize,
    /// Highest selectable round (`round_count - 1`).
    pub max: usize,
    /// Axis captions with their rounds: first, middle and last (deduplicated).
    pub axis: Vec<(usize, String)>,
}

/// Transport row state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TransportView {
    /// Controller phase.
    pub phase: PlaybackPhase,
    /// Play button caption.
    pub play_button: PlayButton,
    /// Milliseconds per round.
    pub speed_ms: u64,
    /// Highlighted preset, if the speed matches one.
    pub active_preset: Option<SpeedPreset>,
    /// Scrub control.
    pub scrub: ScrubView,
}

/// Legend swatch.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LegendEntry {
    /// Participant name.
    pub name: String,
    /// Bar color.
    pub color: Rgb8,
}

/// Everything the presentation layer needs to draw one state of the race.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ChartView {
    /// Chart title.
    pub title: String,
    /// Current round.
    pub round: usize,
    /// Label of the current round.
    pub round_label: String,
    /// Standings at the current round, best first.
    pub entries: Vec<RankingEntry>,
    /// Largest positive gain this round, if any.
    pub top_performer: Option<Gain>,
    /// Value mapped to a full-width bar.
    pub max_scale: f64,
    /// Transport controls.
    pub transport: TransportView,
    /// Participants in dataset order.
    pub legend: Vec<LegendEntry>,
}

impl ChartView {
    /// Derive the view for the controller's current state.
    pub fn build(dataset: &Dataset, controller: &PlaybackController) -> Self {
        let ranking = RankingComputer::new(dataset);
        let round = dataset.clamp_round(controller.round());
        let phase = controller.phase();

        Self {
            title: dataset.title().unwrap_or(DEFAULT_TITLE).to_string(),
            round,
            round_label: dataset.round_label(round).to_string(),
            entries: ranking.entries(round),
            top_performer: ranking.top_performer(round),
            max_scale: dataset.max_scale(),
            transport: TransportView {
                phase,
                play_button: PlayButton::for_phase(phase),
                speed_ms: controller.speed_ms(),
                active_preset: SpeedPreset::from_ms(controller.speed_ms()),
                scrub: ScrubView {
                    value: round,
                    max: dataset.last_round(),
                    axis: axis_labels(dataset),
                },
            },
            legend: dataset
                .participants()
                .iter()
                .map(|p| LegendEntry {
                    name: p.name().to_string(),
                    color: p.color(),
                })
                .collect(),
        }
    }
}

/// Points as shown on labels: whole numbers without decimals, others with one.
pub fn format_points(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

/// Gain with an explicit sign, e.g. `+20` or `-3.5`.
pub fn format_gain(v: f64) -> String {
    if v >= 0.0 {
        format!("+{}", format_points(v))
    } else {
        format_points(v)
    }
}

fn axis_labels(dataset: &Dataset) -> Vec<(usize, String)> {
    let last = dataset.last_round();
    let mut rounds = vec![0, last / 2, last];
    rounds.dedup();
    rounds
        .into_iter()
        .map(|r| (r, dataset.round_label(r).to_string()))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/view/chart.rs"]
mod tests;
