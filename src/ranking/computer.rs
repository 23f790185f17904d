use crate::{dataset::model::Dataset, foundation::core::Rgb8};

/// One participant's standing at a given round.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RankingEntry {
    /// Participant name.
    pub name: String,
    /// Score at the round.
    pub score: f64,
    /// Pre-assigned rank at the round.
    pub rank: u32,
    /// Bar color.
    pub color: Rgb8,
}

/// Score gained by one participant in one round.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Gain {
    /// Participant name.
    pub name: String,
    /// `score[i] - score[i-1]`, or `score[0]` for the first round. May be negative.
    pub delta: f64,
}

/// Pure ranking queries over a dataset snapshot.
#[derive(Clone, Copy, Debug)]
pub struct RankingComputer<'a> {
    dataset: &'a Dataset,
}

impl<'a> RankingComputer<'a> {
    /// Wrap a dataset.
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Standings at `round`, sorted by descending score.
    ///
    /// Equal scores keep dataset order (`sort_by` is stable). Rounds past the end are clamped.
    pub fn entries(&self, round: usize) -> Vec<RankingEntry> {
        let round = self.dataset.clamp_round(round);
        let mut entries: Vec<RankingEntry> = self
            .dataset
            .participants()
            .iter()
            .map(|p| RankingEntry {
                name: p.name().to_string(),
                score: p.scores()[round],
                rank: p.ranks()[round],
                color: p.color(),
            })
            .collect();
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries
    }

    /// Score gained by `name` in `round`.
    ///
    /// Rounds `<= 0` count the whole first-round score as gained. Unknown names yield `0.0`.
    pub fn delta(&self, round: i64, name: &str) -> f64 {
        let Some(p) = self.dataset.participant(name) else {
            return 0.0;
        };
        let i = if round <= 0 {
            0
        } else {
            usize::try_from(round)
                .map(|r| self.dataset.clamp_round(r))
                .unwrap_or_else(|_| self.dataset.last_round())
        };
        round_gain(p.scores(), i)
    }

    /// Every participant's gain at `round`, in dataset order.
    pub fn gains(&self, round: usize) -> Vec<Gain> {
        let round = self.dataset.clamp_round(round);
        self.dataset
            .participants()
            .iter()
            .map(|p| Gain {
                name: p.name().to_string(),
                delta: round_gain(p.scores(), round),
            })
            .collect()
    }

    /// Participant with the largest positive gain at `round`.
    ///
    /// The first round has nothing to compare against, so it never has a top performer. Ties go
    /// to the earliest participant in dataset order; `None` if nobody gained points.
    pub fn top_performer(&self, round: usize) -> Option<Gain> {
        if self.dataset.clamp_round(round) == 0 {
            return None;
        }
        self.gains(round)
            .into_iter()
            .filter(|g| g.delta > 0.0)
            .fold(None, |best: Option<Gain>, g| match best {
                Some(b) if b.delta >= g.delta => Some(b),
                _ => Some(g),
            })
    }
}

/// `scores[round] - scores[round - 1]`, or the whole first score for round 0.
fn round_gain(scores: &[f64], round: usize) -> f64 {
    match round {
        0 => scores[0],
        i => scores[i] - scores[i - 1],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ranking/computer.rs"]
mod tests;
