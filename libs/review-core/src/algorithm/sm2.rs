//! SM-2 spaced repetition algorithm.
//!
//! Classic SuperMemo 2 on a 0-5 quality scale:
//! - quality below 3 restarts the spacing at one day
//! - successful recalls go 1 day, 6 days, then multiply by the ease factor
//! - the ease factor moves on every review and never drops below its floor

use super::ScheduleResult;
use crate::types::{Quality, ScheduleState, INITIAL_EASE, MAX_INTERVAL, MIN_EASE};
use chrono::{DateTime, Duration, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub max_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE,
            minimum_ease: MIN_EASE,
            max_interval: MAX_INTERVAL,
        }
    }
}

impl Sm2 {
    /// State for a newly queued item.
    pub fn initial_state(&self) -> ScheduleState {
        ScheduleState {
            ease_factor: self.initial_ease,
            ..ScheduleState::default()
        }
    }

    /// Calculate the next state after a review.
    pub fn compute_next(
        &self,
        state: &ScheduleState,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> ScheduleResult {
        let (interval, repetitions) = if quality.is_pass() {
            let interval = match state.repetitions {
                0 => 1.0,
                1 => 6.0,
                _ => (f64::from(state.interval) * state.ease_factor).round(),
            };
            (interval, state.repetitions.saturating_add(1))
        } else {
            (1.0, 0)
        };

        let ease_factor = round_ease(
            (state.ease_factor + ease_delta(quality)).max(self.minimum_ease),
        );
        // Clamp in f64 before casting so oversized products cannot wrap.
        let interval = interval.clamp(1.0, f64::from(self.max_interval)) as u32;

        ScheduleResult {
            state: ScheduleState {
                ease_factor,
                interval,
                repetitions,
            },
            next_review: now + Duration::days(i64::from(interval)),
            mastered: interval >= self.max_interval,
        }
    }
}

/// EF' - EF = 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)
fn ease_delta(quality: Quality) -> f64 {
    let miss = f64::from(Quality::MAX - quality.value());
    0.1 - miss * (0.08 + miss * 0.02)
}

fn round_ease(ease: f64) -> f64 {
    (ease * 100.0).round() / 100.0
}
