//! Time-based debounce tracker for a single input line.
//!
//! The tracker works in the logical domain: callers pass `true` for
//! "pressed", so active-low wiring is inverted before it gets here.
//!
//! ```text
//!   raw     ‾‾|_|‾|___________________|‾|_|‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!   stable  ‾‾‾‾‾‾‾‾‾‾‾‾|_____________________‾‾‾‾‾‾‾‾‾‾‾‾‾
//!                 <-50ms->              <-50ms->
//! ```

/// A confirmed transition of the debounced state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Debounce state for one line.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    /// Most recent raw sample.
    raw_stable: bool,
    /// When `raw_stable` last changed (ms since boot).
    last_change_ms: u64,
    confirmed_pressed: bool,
    interval_ms: u64,
}

impl Debouncer {
    /// Create a released tracker.  The first press still has to settle
    /// for a full window, so nothing fires at boot.
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            raw_stable: false,
            last_change_ms: 0,
            confirmed_pressed: false,
            interval_ms,
        }
    }

    /// Feed one raw sample taken at `now_ms`.
    pub fn update(&mut self, raw: bool, now_ms: u64) -> Option<Edge> {
        if raw != self.raw_stable {
            self.last_change_ms = now_ms;
            self.raw_stable = raw;
        }

        let held_ms = now_ms.saturating_sub(self.last_change_ms);
        if held_ms > self.interval_ms && self.raw_stable != self.confirmed_pressed {
            self.confirmed_pressed = self.raw_stable;
            return Some(if self.confirmed_pressed {
                Edge::Pressed
            } else {
                Edge::Released
            });
        }

        None
    }

    /// Debounced state.
    pub fn is_pressed(&self) -> bool {
        self.confirmed_pressed
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}
