//! Periodic Aura Timing
//!
//! Duration countdown and tick schedule for one aura-applying effect.
//!
//! ## Tick schedule
//!
//! ```text
//!   duration D = 15000, period P = 3000
//!
//!   offsets (generated ascending):  [0, 3000, 6000, 9000, 12000]
//!   remaining counts down:          15000 ──────────────────────► 0
//!
//!   remaining ≤ 12000  → pop 12000   (first tick, 3 s in)
//!   remaining ≤  9000  → pop  9000
//!   ...
//!   remaining ≤     0  → pop     0   (last tick, at expiry)
//! ```
//!
//! Offsets are compared against the *remaining* time, so the schedule is
//! consumed from its tail. A tick fires when its offset is `>=` the
//! remaining time; the tie is what makes the final tick land exactly on
//! expiry.

use serde::{Serialize, Deserialize};
use tracing::{debug, trace};

use crate::spell::entry::CastContext;

/// Countdown state of an aura.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum AuraTiming {
    /// No duration running.
    #[default]
    Inactive,
    /// Counting down.
    Active {
        /// Milliseconds left; goes negative once overrun
        remaining_ms: f64,
        /// Timestamp (seconds) of the last update
        last_update: f64,
    },
}

/// Build the tick schedule for a duration and period.
///
/// Returns `floor(duration / period)` offsets `0, P, 2P, ...` in ascending
/// order. A zero period, or a duration shorter than one period, yields no
/// ticks.
pub fn generate_tick_offsets(duration_ms: i64, period_ms: u32) -> Vec<i64> {
    if period_ms == 0 || duration_ms <= 0 {
        return Vec::new();
    }
    let period = period_ms as i64;
    let tick_count = duration_ms / period;
    (0..tick_count).map(|i| i * period).collect()
}

/// Duration and tick tracking for one effect instance.
///
/// Each tracker owns its own schedule; cloning a tracker copies it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodicTracker {
    timing: AuraTiming,
    pending_ticks: Vec<i64>,
}

impl PeriodicTracker {
    /// Inactive tracker with an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the countdown for a cast.
    ///
    /// Does nothing when the cast has no duration definition, or when a
    /// schedule is already running and `overwrite` is false. Otherwise the
    /// countdown restarts at the cast's full duration from `now` and, for a
    /// non-zero `period_ms`, the schedule is regenerated.
    ///
    /// Returns whether the tracker was (re)armed.
    pub fn start_duration(
        &mut self,
        cast: &CastContext,
        period_ms: u32,
        now: f64,
        overwrite: bool,
    ) -> bool {
        let Some(duration_ms) = cast.duration_ms else {
            return false;
        };
        if !self.pending_ticks.is_empty() && !overwrite {
            return false;
        }

        self.timing = AuraTiming::Active {
            remaining_ms: duration_ms as f64,
            last_update: now,
        };
        self.pending_ticks = if period_ms != 0 {
            generate_tick_offsets(duration_ms, period_ms)
        } else {
            Vec::new()
        };

        debug!(
            duration_ms,
            period_ms,
            ticks = self.pending_ticks.len(),
            overwrite,
            "aura duration started"
        );
        true
    }

    /// Count the remaining time down to `timestamp` (seconds).
    pub fn update_duration(&mut self, timestamp: f64) {
        if let AuraTiming::Active { remaining_ms, last_update } = &mut self.timing {
            *remaining_ms -= (timestamp - *last_update) * 1000.0;
            *last_update = timestamp;
        }
    }

    /// Is the next scheduled tick due?
    pub fn is_past_next_tick(&self) -> bool {
        match (self.timing, self.pending_ticks.last()) {
            (AuraTiming::Active { remaining_ms, .. }, Some(&offset)) => offset as f64 >= remaining_ms,
            _ => false,
        }
    }

    /// Drop every tick that is due. Returns how many fired.
    pub fn consume_due_ticks(&mut self) -> u32 {
        let mut fired = 0;
        while self.is_past_next_tick() {
            if let Some(offset) = self.pending_ticks.pop() {
                trace!(offset, "periodic tick");
                fired += 1;
            }
        }
        fired
    }

    /// Update to `timestamp`, then consume due ticks. Returns how many fired.
    pub fn advance(&mut self, timestamp: f64) -> u32 {
        self.update_duration(timestamp);
        self.consume_due_ticks()
    }

    /// Return to the inactive state with an empty schedule.
    pub fn end(&mut self) {
        self.timing = AuraTiming::Inactive;
        self.pending_ticks.clear();
    }

    /// Current countdown state.
    #[inline]
    pub fn timing(&self) -> AuraTiming {
        self.timing
    }

    /// Is a duration running?
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.timing, AuraTiming::Active { .. })
    }

    /// Milliseconds left, if active.
    pub fn remaining_ms(&self) -> Option<f64> {
        match self.timing {
            AuraTiming::Active { remaining_ms, .. } => Some(remaining_ms),
            AuraTiming::Inactive => None,
        }
    }

    /// Has an active duration run out?
    pub fn is_expired(&self) -> bool {
        self.remaining_ms().is_some_and(|remaining| remaining <= 0.0)
    }

    /// Ticks still scheduled, in generation order.
    #[inline]
    pub fn pending_ticks(&self) -> &[i64] {
        &self.pending_ticks
    }
}

// =============================================================================
// TESTS
// =============================================================================
