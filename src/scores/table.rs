use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use crate::{
    foundation::error::JigsawResult, puzzle::config::Difficulty, session::clock::score_seconds,
};

/// One ranked result as delivered by the score backend.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "Name")]
    pub name: String,
    /// Completion time in milliseconds.
    #[serde(rename = "Time", deserialize_with = "de_millis")]
    pub time_ms: u64,
}

/// Ranked lists per difficulty, best first.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScoreBoard {
    pub easy: Vec<ScoreEntry>,
    pub medium: Vec<ScoreEntry>,
    pub hard: Vec<ScoreEntry>,
    pub insane: Vec<ScoreEntry>,
}

impl ScoreBoard {
    pub fn list(&self, difficulty: Difficulty) -> &[ScoreEntry] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
            Difficulty::Insane => &self.insane,
        }
    }

    fn list_mut(&mut self, difficulty: Difficulty) -> &mut Vec<ScoreEntry> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
            Difficulty::Insane => &mut self.insane,
        }
    }

    pub fn is_empty(&self) -> bool {
        Difficulty::ALL.iter().all(|d| self.list(*d).is_empty())
    }
}

/// Read side of the score service. Storage and transport live with the host.
pub trait ScoreBackend {
    fn fetch(&self) -> JigsawResult<ScoreBoard>;
}

/// Scores held in memory, e.g. already fetched by the host.
#[derive(Clone, Debug, Default)]
pub struct StaticScores(pub ScoreBoard);

impl ScoreBackend for StaticScores {
    fn fetch(&self) -> JigsawResult<ScoreBoard> {
        Ok(self.0.clone())
    }
}

/// Scores read from a JSON payload on disk.
#[derive(Clone, Debug)]
pub struct JsonFileScores {
    pub path: PathBuf,
}

impl ScoreBackend for JsonFileScores {
    fn fetch(&self) -> JigsawResult<ScoreBoard> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read scores '{}'", self.path.display()))?;
        Ok(parse_scores(&text))
    }
}

/// Parse a backend payload, never failing.
///
/// A payload that is not a JSON object yields an empty board. Within an object, a missing or
/// malformed difficulty list is empty and the others are kept.
pub fn parse_scores(payload: &str) -> ScoreBoard {
    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "score payload is not valid JSON");
            return ScoreBoard::default();
        }
    };
    let Some(obj) = value.as_object() else {
        tracing::warn!("score payload is not a JSON object");
        return ScoreBoard::default();
    };

    let mut board = ScoreBoard::default();
    for difficulty in Difficulty::ALL {
        let Some(list) = obj.get(difficulty.as_str()) else {
            continue;
        };
        match Vec::<ScoreEntry>::deserialize(list) {
            Ok(entries) => *board.list_mut(difficulty) = entries,
            Err(e) => {
                tracing::warn!(%difficulty, error = %e, "malformed score list dropped");
            }
        }
    }
    board
}

/// Plain-text score table: a header per difficulty, then `"{rank}. {name}  {seconds}"` rows.
pub fn format_scores(board: &ScoreBoard) -> String {
    if board.is_empty() {
        return "no scores".to_string();
    }

    let mut out = String::new();
    for difficulty in Difficulty::ALL {
        out.push_str(&format!("{}  Time\n", title(difficulty)));
        for (idx, entry) in board.list(difficulty).iter().enumerate() {
            out.push_str(&format!(
                "{}. {}  {}\n",
                idx + 1,
                entry.name,
                score_seconds(entry.time_ms)
            ));
        }
    }
    out
}

fn title(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy",
        Difficulty::Medium => "Medium",
        Difficulty::Hard => "Hard",
        Difficulty::Insane => "Insane",
    }
}

fn de_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ms = f64::deserialize(deserializer)?;
    if !(ms.is_finite() && ms >= 0.0) {
        return Err(serde::de::Error::custom(format!(
            "time must be a non-negative number of milliseconds, got {ms}"
        )));
    }
    Ok(ms.floor() as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/scores/table.rs"]
mod tests;
