use tracing::{debug, info};

use crate::answers::{AnswerState, MistakeCounters, SequenceProgress};
use crate::feedback::{FeedbackFlash, FlashKind, PendingAdvance};
use crate::frame::{BoxSpec, Frame};
use crate::scoring::{score_session, ScoreReport};
use crate::TICK_RATE_MS;

/// Delay between a frame-completing click and the automatic advance, so the
/// acknowledgment flash gets rendered before the frame changes.
pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 200;

/// Session lifecycle. `Review` is terminal for a session; only a reset
/// returns to a fresh `NotStarted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    NotStarted,
    InProgress,
    Review,
}

/// What a click did, for the frontend to pick feedback from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Correct hotspot. `frame_done` means an auto-advance was scheduled.
    Hit { frame_done: bool },
    /// Wrong or out-of-order hotspot.
    WrongOrder,
    /// Missed every box on a frame that has hotspots.
    Background,
    /// Landed on a text-input region; focus is the frontend's business.
    InputFocus,
    /// No effect (review mode, or a background click with no hotspots around).
    Ignored,
}

/// Plays one loaded quiz: tracks the current frame, per-frame answers and
/// sequence progress, mistakes, the active-time clock, and the final report.
#[derive(Debug)]
pub struct Player {
    pub frames: Vec<Frame>,
    pub current: usize,
    pub phase: Phase,
    pub answers: Vec<AnswerState>,
    pub progress: Vec<SequenceProgress>,
    pub mistakes: MistakeCounters,
    pub flash: FeedbackFlash,
    pub report: Option<ScoreReport>,
    elapsed_ms: u64,
    pending_advance: PendingAdvance,
    advance_delay_ms: u64,
}

impl Player {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self::with_advance_delay(frames, DEFAULT_ADVANCE_DELAY_MS)
    }

    pub fn with_advance_delay(frames: Vec<Frame>, advance_delay_ms: u64) -> Self {
        debug_assert!(!frames.is_empty(), "loader never yields an empty frame list");
        let count = frames.len();
        Self {
            frames,
            current: 0,
            phase: Phase::NotStarted,
            answers: vec![AnswerState::default(); count],
            progress: vec![SequenceProgress::default(); count],
            mistakes: MistakeCounters::default(),
            flash: FeedbackFlash::new(),
            report: None,
            elapsed_ms: 0,
            pending_advance: PendingAdvance::default(),
            advance_delay_ms,
        }
    }

    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.current]
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Review
    }

    /// Whole seconds of active play time.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    /// True while a scheduled auto-advance has not fired yet.
    pub fn advance_pending(&self) -> bool {
        self.pending_advance.is_pending()
    }

    pub fn start(&mut self) {
        if self.phase == Phase::NotStarted {
            info!(frames = self.frames.len(), "session started");
            self.phase = Phase::InProgress;
        }
    }

    /// One runtime tick. The clock only runs while in progress; feedback and
    /// a pending auto-advance are driven off the same tick.
    pub fn on_tick(&mut self) {
        if self.phase == Phase::InProgress {
            self.elapsed_ms += TICK_RATE_MS;
        }
        self.flash.update(TICK_RATE_MS);
        if self.pending_advance.update(TICK_RATE_MS) {
            self.advance();
        }
    }

    /// Handle a click at image coordinates on the current frame.
    pub fn click(&mut self, x: f64, y: f64) -> ClickOutcome {
        if self.phase == Phase::Review {
            debug!(x, y, "click ignored in review mode");
            return ClickOutcome::Ignored;
        }
        self.start();

        let frame = &self.frames[self.current];
        match frame.box_at(x, y) {
            Some(BoxSpec::Hotspot { id, order, .. }) => {
                let id = id.clone();
                let order = *order;
                self.hotspot_click(&id, order)
            }
            Some(BoxSpec::Input { .. }) => ClickOutcome::InputFocus,
            None => {
                if frame.hotspot_count() == 0 {
                    return ClickOutcome::Ignored;
                }
                debug!(frame = self.current, x, y, "background miss");
                self.mistakes.record_background(self.current, x, y);
                self.flash.trigger(FlashKind::Mistake);
                ClickOutcome::Background
            }
        }
    }

    fn hotspot_click(&mut self, id: &str, order: Option<u32>) -> ClickOutcome {
        let frame = &self.frames[self.current];

        if !frame.is_sequential() {
            // Zero or one ordered hotspots: any hotspot click is correct and
            // finishes the frame.
            self.answers[self.current].mark_hit(id);
            self.flash.trigger(FlashKind::Acknowledge);
            self.pending_advance.schedule(self.advance_delay_ms);
            return ClickOutcome::Hit { frame_done: true };
        }

        let expected = self.progress[self.current].next_expected_order;
        if order == Some(expected) {
            self.answers[self.current].mark_hit(id);
            self.progress[self.current].next_expected_order += 1;
            self.flash.trigger(FlashKind::Acknowledge);

            let last_in_sequence = frame.max_order().is_some_and(|max| expected >= max);
            if last_in_sequence {
                self.pending_advance.schedule(self.advance_delay_ms);
            }
            ClickOutcome::Hit {
                frame_done: last_in_sequence,
            }
        } else {
            debug!(hotspot = id, expected, "out-of-order hotspot click");
            self.mistakes.record_wrong_hotspot();
            self.flash.trigger(FlashKind::Mistake);
            ClickOutcome::WrongOrder
        }
    }

    /// Record typed text for an input box on the current frame. Returns
    /// whether the value was accepted.
    pub fn set_input(&mut self, box_id: &str, text: &str) -> bool {
        if self.phase == Phase::Review {
            debug!(box_id, "input ignored in review mode");
            return false;
        }
        match self.frames[self.current].box_by_id(box_id) {
            Some(BoxSpec::Input { .. }) => {
                self.start();
                self.answers[self.current].set_input(box_id, text.to_string());
                true
            }
            _ => {
                debug!(box_id, "input rejected: no such input box on this frame");
                false
            }
        }
    }

    /// Move to the next frame, or into review when already on the last one.
    /// In review this is read-only navigation with no wrap.
    pub fn advance(&mut self) {
        match self.phase {
            Phase::NotStarted => {}
            Phase::InProgress => {
                self.pending_advance.cancel();
                if self.current + 1 < self.frames.len() {
                    self.current += 1;
                    debug!(frame = self.current, "advanced");
                } else {
                    self.enter_review();
                }
            }
            Phase::Review => {
                if self.current + 1 < self.frames.len() {
                    self.current += 1;
                }
            }
        }
    }

    /// Step back one frame; review mode only.
    pub fn retreat(&mut self) {
        if self.phase == Phase::Review && self.current > 0 {
            self.current -= 1;
        }
    }

    fn enter_review(&mut self) {
        self.pending_advance.cancel();
        self.phase = Phase::Review;
        let report = score_session(&self.frames, &self.answers, &self.mistakes);
        info!(
            points = report.points,
            possible = report.possible,
            elapsed_secs = self.elapsed_secs(),
            "session finished"
        );
        self.report = Some(report);
    }

    /// Drop the whole session and return to a fresh not-started state on the
    /// same frames. No partial state survives.
    pub fn reset(&mut self) {
        let count = self.frames.len();
        self.current = 0;
        self.phase = Phase::NotStarted;
        self.answers = vec![AnswerState::default(); count];
        self.progress = vec![SequenceProgress::default(); count];
        self.mistakes = MistakeCounters::default();
        self.flash = FeedbackFlash::new();
        self.report = None;
        self.elapsed_ms = 0;
        self.pending_advance = PendingAdvance::default();
    }
}
