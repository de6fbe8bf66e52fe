#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scoring system that reports finished sessions to an external collaborator.
//!
//! The system never feeds anything back into the world: a failing sink is
//! logged and forgotten, leaving score and outcome untouched.

use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zombie_rescue_core::{Difficulty, Event};

/// Name submitted when the player did not provide one.
pub const ANONYMOUS_PLAYER: &str = "Anonymous";

/// How a reported session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every human was rescued.
    Won,
    /// The player ran out of health.
    Lost,
}

/// Payload handed to the score collaborator when a session ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Humans rescued during the session.
    pub score: u32,
    /// Whole seconds spent after the grace period.
    pub time: u64,
    /// Difficulty the session was played on.
    pub difficulty: Difficulty,
    /// Name entered by the player.
    pub player_name: String,
    /// How the session ended.
    pub outcome: Outcome,
}

/// Failures raised by score sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The report could not be serialized.
    #[error("failed to encode score report: {0}")]
    Encode(#[from] serde_json::Error),
    /// The destination refused the write.
    #[error("failed to write score report: {0}")]
    Io(#[from] std::io::Error),
    /// The collaborator rejected the report.
    #[error("score collaborator rejected the report: {0}")]
    Rejected(String),
}

/// Destination accepting finished-session reports.
pub trait ScoreSink {
    /// Delivers a report, returning an error when delivery fails.
    fn submit(&mut self, report: &ScoreReport) -> Result<(), SinkError>;
}

impl ScoreSink for Vec<ScoreReport> {
    fn submit(&mut self, report: &ScoreReport) -> Result<(), SinkError> {
        self.push(report.clone());
        Ok(())
    }
}

/// Sink writing one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ScoreSink for JsonLinesSink<W> {
    fn submit(&mut self, report: &ScoreReport) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, report)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Pure system that turns terminal session events into score reports.
#[derive(Debug)]
pub struct Scoring {
    player_name: String,
    difficulty: Difficulty,
    reported: bool,
    last_report: Option<ScoreReport>,
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new(ANONYMOUS_PLAYER)
    }
}

impl Scoring {
    /// Creates a scoring system reporting under `player_name`.
    #[must_use]
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            difficulty: Difficulty::default(),
            reported: false,
            last_report: None,
        }
    }

    /// Returns the most recent report built by the system, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&ScoreReport> {
        self.last_report.as_ref()
    }

    /// Consumes world events and submits at most one report per session.
    pub fn handle<S>(&mut self, events: &[Event], sink: &mut S)
    where
        S: ScoreSink + ?Sized,
    {
        for event in events {
            match event {
                Event::SessionStarted { difficulty, .. } => {
                    self.difficulty = *difficulty;
                    self.reported = false;
                }
                Event::SessionWon { score, elapsed, .. } => {
                    self.report(Outcome::Won, *score, elapsed.as_secs(), sink);
                }
                Event::SessionLost { score, elapsed } => {
                    self.report(Outcome::Lost, *score, elapsed.as_secs(), sink);
                }
                _ => {}
            }
        }
    }

    fn report<S>(&mut self, outcome: Outcome, score: u32, time: u64, sink: &mut S)
    where
        S: ScoreSink + ?Sized,
    {
        if self.reported {
            return;
        }
        self.reported = true;

        let report = ScoreReport {
            score,
            time,
            difficulty: self.difficulty,
            player_name: self.player_name.clone(),
            outcome,
        };

        match sink.submit(&report) {
            Ok(()) => tracing::info!(score, time, ?outcome, "score submitted"),
            Err(error) => tracing::warn!(%error, "score submission failed"),
        }
        self.last_report = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_with_collaborator_field_names() {
        let report = ScoreReport {
            score: 4,
            time: 37,
            difficulty: Difficulty::Hard,
            player_name: "Rin".to_owned(),
            outcome: Outcome::Won,
        };

        let value = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(value["score"], 4);
        assert_eq!(value["time"], 37);
        assert_eq!(value["difficulty"], "HARD");
        assert_eq!(value["player_name"], "Rin");
        assert_eq!(value["outcome"], "won");
    }

    #[test]
    fn json_lines_sink_writes_one_line_per_report() {
        let mut sink = JsonLinesSink::new(Vec::new());
        let report = ScoreReport {
            score: 0,
            time: 2,
            difficulty: Difficulty::Easy,
            player_name: ANONYMOUS_PLAYER.to_owned(),
            outcome: Outcome::Lost,
        };
        sink.submit(&report).expect("first write");
        sink.submit(&report).expect("second write");

        let written = String::from_utf8(sink.into_inner()).expect("utf8 output");
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: ScoreReport = serde_json::from_str(lines[0]).expect("parse line");
        assert_eq!(parsed, report);
    }
}
