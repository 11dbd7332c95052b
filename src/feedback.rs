/// Visual feedback kinds a frontend can render for the last interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum FlashKind {
    Acknowledge,
    Mistake,
}

/// Short feedback flash shown after a click. Retriggering while a flash is
/// still running restarts it with the new kind (last trigger wins).
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackFlash {
    pub kind: Option<FlashKind>,
    pub remaining_ms: u64,
    pub is_active: bool,
}

impl FeedbackFlash {
    pub const DURATION_MS: u64 = 200;

    pub fn new() -> Self {
        Self {
            kind: None,
            remaining_ms: 0,
            is_active: false,
        }
    }

    pub fn trigger(&mut self, kind: FlashKind) {
        self.kind = Some(kind);
        self.remaining_ms = Self::DURATION_MS;
        self.is_active = true;
    }

    /// Advance the flash by `dt_ms`. Returns whether it is still active.
    pub fn update(&mut self, dt_ms: u64) -> bool {
        if !self.is_active {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
        if self.remaining_ms == 0 {
            self.is_active = false;
            self.kind = None;
        }
        self.is_active
    }
}

impl Default for FeedbackFlash {
    fn default() -> Self {
        Self::new()
    }
}

/// Delayed frame advance scheduled after a correct click, so the
/// acknowledgment flash gets a chance to render first. Scheduling again
/// replaces the previous deadline; only one advance ever fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingAdvance {
    remaining_ms: Option<u64>,
}

impl PendingAdvance {
    pub fn schedule(&mut self, delay_ms: u64) {
        self.remaining_ms = Some(delay_ms);
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Advance the deadline by `dt_ms`. Returns true exactly once, on the
    /// tick where the delay expires.
    pub fn update(&mut self, dt_ms: u64) -> bool {
        match self.remaining_ms {
            Some(remaining) => {
                let left = remaining.saturating_sub(dt_ms);
                if left == 0 {
                    self.remaining_ms = None;
                    true
                } else {
                    self.remaining_ms = Some(left);
                    false
                }
            }
            None => false,
        }
    }
}
