use serde::Serialize;

use crate::answers::{AnswerState, MistakeCounters};
use crate::frame::{BoxSpec, Frame, Point};

/// Trimmed, case-insensitive comparison of a typed answer against the
/// expected text.
pub fn answer_matches(expected: &str, given: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Per-frame slice of the final result, for the review screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameScore {
    pub frame_id: String,
    pub earned: u32,
    pub possible: u32,
    pub background_misses: Vec<Point>,
}

/// Final session result, computed once on entering review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    /// Correct boxes minus mistakes, floored at zero.
    pub points: u32,
    pub correct_boxes: u32,
    pub possible: u32,
    pub wrong_hotspots: u32,
    pub background_clicks: u32,
    pub frames: Vec<FrameScore>,
}

impl ScoreReport {
    pub fn deductions(&self) -> u32 {
        self.wrong_hotspots + self.background_clicks
    }
}

fn box_is_correct(spec: &BoxSpec, answers: &AnswerState) -> bool {
    match spec {
        BoxSpec::Hotspot { id, .. } => answers.is_hit(id),
        BoxSpec::Input {
            id, expected_text, ..
        } => answers
            .input_values
            .get(id)
            .is_some_and(|given| answer_matches(expected_text, given)),
    }
}

/// Derive the final score from the full frame set and the session's answers.
/// Every box is worth one point; deductions apply to the session total, not
/// per frame, so a bad frame can eat points earned elsewhere.
pub fn score_session(
    frames: &[Frame],
    answers: &[AnswerState],
    mistakes: &MistakeCounters,
) -> ScoreReport {
    debug_assert_eq!(frames.len(), answers.len());

    let mut frame_scores = Vec::with_capacity(frames.len());
    let mut correct_boxes = 0u32;
    let mut possible = 0u32;

    for (index, (frame, state)) in frames.iter().zip(answers).enumerate() {
        let earned = frame
            .boxes
            .iter()
            .filter(|spec| box_is_correct(spec, state))
            .count() as u32;
        let frame_possible = frame.boxes.len() as u32;

        correct_boxes += earned;
        possible += frame_possible;
        frame_scores.push(FrameScore {
            frame_id: frame.id.clone(),
            earned,
            possible: frame_possible,
            background_misses: mistakes.background_misses(index).to_vec(),
        });
    }

    ScoreReport {
        points: correct_boxes.saturating_sub(mistakes.total()),
        correct_boxes,
        possible,
        wrong_hotspots: mistakes.wrong_hotspots,
        background_clicks: mistakes.background_clicks,
        frames: frame_scores,
    }
}
