use std::collections::BTreeSet;

use crate::foundation::{
    core::Rgb8,
    error::{RaceError, RaceResult},
    math::ceil_to_multiple,
};

/// Headroom applied above the highest score when no explicit scale is configured.
const AUTO_SCALE_HEADROOM: f64 = 1.05;
const AUTO_SCALE_STEP: f64 = 10.0;

/// Boundary (JSON) form of a dataset, before validation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DatasetDef {
    /// Optional chart title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional fixed maximum of the bar scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scale: Option<f64>,
    /// Round labels, in order.
    pub rounds: Vec<String>,
    /// Participants, in tie-break order.
    pub participants: Vec<ParticipantDef>,
}

/// Boundary (JSON) form of one participant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParticipantDef {
    /// Unique display name.
    pub name: String,
    /// Bar color as `#RRGGBB`.
    pub color: String,
    /// Cumulative score after each round.
    pub scores: Vec<f64>,
    /// Pre-assigned rank after each round (1 = first).
    pub ranks: Vec<u32>,
}

/// A validated participant.
#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    name: String,
    color: Rgb8,
    scores: Vec<f64>,
    ranks: Vec<u32>,
}

impl Participant {
    /// Display name (unique within a dataset).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bar color.
    pub fn color(&self) -> Rgb8 {
        self.color
    }

    /// Per-round scores; length equals the dataset's round count.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Per-round ranks, parallel to [`Participant::scores`].
    pub fn ranks(&self) -> &[u32] {
        &self.ranks
    }
}

/// One round of the season.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    /// 0-based position.
    pub index: usize,
    /// Display label.
    pub label: String,
}

/// Immutable, validated participants × rounds table.
///
/// Every participant carries exactly [`Dataset::round_count`] scores and ranks, and there is at
/// least one round and one participant.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    title: Option<String>,
    rounds: Vec<Round>,
    participants: Vec<Participant>,
    max_scale: f64,
}

impl Dataset {
    /// Validate a boundary definition.
    pub fn from_def(def: DatasetDef) -> RaceResult<Self> {
        let round_count = def.rounds.len();
        if round_count == 0 {
            return Err(RaceError::validation("dataset must define at least one round"));
        }
        if def.participants.is_empty() {
            return Err(RaceError::validation(
                "dataset must define at least one participant",
            ));
        }

        let mut seen = BTreeSet::new();
        let mut participants = Vec::with_capacity(def.participants.len());
        for p in def.participants {
            if p.name.trim().is_empty() {
                return Err(RaceError::validation("participant name must be non-empty"));
            }
            if !seen.insert(p.name.clone()) {
                return Err(RaceError::validation(format!(
                    "duplicate participant name '{}'",
                    p.name
                )));
            }
            if p.scores.len() != round_count {
                return Err(RaceError::validation(format!(
                    "participant '{}' has {} scores, expected {round_count} (one per round)",
                    p.name,
                    p.scores.len()
                )));
            }
            if p.ranks.len() != round_count {
                return Err(RaceError::validation(format!(
                    "participant '{}' has {} ranks, expected {round_count} (one per round)",
                    p.name,
                    p.ranks.len()
                )));
            }
            if let Some(bad) = p.scores.iter().find(|s| !s.is_finite() || **s < 0.0) {
                return Err(RaceError::validation(format!(
                    "participant '{}' has invalid score {bad} (scores must be finite and >= 0)",
                    p.name
                )));
            }
            if p.ranks.contains(&0) {
                return Err(RaceError::validation(format!(
                    "participant '{}' has rank 0 (ranks start at 1)",
                    p.name
                )));
            }
            let color = Rgb8::parse_hex(&p.color).map_err(|e| {
                RaceError::validation(format!("participant '{}': {e}", p.name))
            })?;

            participants.push(Participant {
                name: p.name,
                color,
                scores: p.scores,
                ranks: p.ranks,
            });
        }

        let max_scale = match def.max_scale {
            Some(v) if v.is_finite() && v > 0.0 => v,
            Some(v) => {
                return Err(RaceError::validation(format!(
                    "max_scale must be finite and > 0, got {v}"
                )));
            }
            None => auto_max_scale(&participants),
        };

        let rounds = def
            .rounds
            .into_iter()
            .enumerate()
            .map(|(index, label)| Round { index, label })
            .collect();

        Ok(Self {
            title: def.title,
            rounds,
            participants,
            max_scale,
        })
    }

    /// Convert back into the boundary form.
    pub fn to_def(&self) -> DatasetDef {
        DatasetDef {
            title: self.title.clone(),
            max_scale: Some(self.max_scale),
            rounds: self.rounds.iter().map(|r| r.label.clone()).collect(),
            participants: self
                .participants
                .iter()
                .map(|p| ParticipantDef {
                    name: p.name.clone(),
                    color: p.color.to_hex(),
                    scores: p.scores.clone(),
                    ranks: p.ranks.clone(),
                })
                .collect(),
        }
    }

    /// Optional chart title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Number of rounds (always >= 1).
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Index of the last round.
    pub fn last_round(&self) -> usize {
        self.rounds.len() - 1
    }

    /// Clamp any round request into `[0, last_round]`.
    pub fn clamp_round(&self, round: usize) -> usize {
        round.min(self.last_round())
    }

    /// All rounds in order.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Label of `round`, clamped into range.
    pub fn round_label(&self, round: usize) -> &str {
        &self.rounds[self.clamp_round(round)].label
    }

    /// Participants in dataset (tie-break) order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Look up a participant by name.
    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Maximum of the bar scale (always > 0).
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }
}

fn auto_max_scale(participants: &[Participant]) -> f64 {
    let top = participants
        .iter()
        .flat_map(|p| p.scores.iter().copied())
        .fold(0.0_f64, f64::max);
    if top <= 0.0 {
        return 1.0;
    }
    ceil_to_multiple(top * AUTO_SCALE_HEADROOM, AUTO_SCALE_STEP)
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/model.rs"]
mod tests;
