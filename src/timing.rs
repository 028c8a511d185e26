//! Polled cooldowns.  Every timing rule in the game is "elapsed time since the
//! last trigger ≥ period", checked against the tick's timestamp.

#[derive(Clone, Debug, PartialEq)]
pub struct Cooldown {
    pub period_ms: u64,
    last: Option<u64>,
}

impl Cooldown {
    /// A cooldown that has never fired and is ready immediately.
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last: None,
        }
    }

    /// A cooldown that behaves as if it fired at `now_ms`.
    pub fn armed(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms,
            last: Some(now_ms),
        }
    }

    pub fn last(&self) -> Option<u64> {
        self.last
    }

    pub fn elapsed(&self, now_ms: u64) -> Option<u64> {
        self.last.map(|last| now_ms.saturating_sub(last))
    }

    pub fn ready(&self, now_ms: u64) -> bool {
        self.elapsed(now_ms).map_or(true, |e| e >= self.period_ms)
    }

    pub fn trigger(&mut self, now_ms: u64) {
        self.last = Some(now_ms);
    }

    /// Fires if ready.  Returns whether it fired.
    pub fn try_trigger(&mut self, now_ms: u64) -> bool {
        if self.ready(now_ms) {
            self.trigger(now_ms);
            true
        } else {
            false
        }
    }
}

/// Hit-flash feedback.  After a hit the player blinks for
/// `hit_cooldown - margin` ms, toggling every `toggle_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct Flash {
    pub should_flash: bool,
    pub can_flash: bool,
    toggle: Cooldown,
}

impl Flash {
    pub fn new(toggle_ms: u64) -> Self {
        Self {
            should_flash: false,
            can_flash: false,
            toggle: Cooldown::new(toggle_ms),
        }
    }

    /// Called whenever the player takes damage.
    pub fn arm(&mut self) {
        self.can_flash = true;
    }

    /// `since_hit` is the time since the last successful hit, if any.
    pub fn update(&mut self, since_hit: Option<u64>, window_ms: u64, now_ms: u64) {
        match since_hit {
            Some(elapsed) if elapsed < window_ms => {
                if self.toggle.try_trigger(now_ms) {
                    self.should_flash = !self.should_flash;
                }
            }
            _ => self.can_flash = false,
        }
    }

    pub fn translucent(&self) -> bool {
        self.should_flash && self.can_flash
    }

    pub fn reset(&mut self) {
        self.should_flash = false;
        self.can_flash = false;
    }
}
