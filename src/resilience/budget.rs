//! Per-endpoint attempt budget.

use std::sync::atomic::{AtomicI64, Ordering};

/// Bounded retry counter for one endpoint-retry-sequence.
///
/// A fresh budget is created every time the coordinator starts working
/// against an endpoint and is never shared across endpoints or operations.
#[derive(Debug)]
pub struct AttemptBudget {
    attempts_left: AtomicI64,
}

impl AttemptBudget {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts_left: AtomicI64::new(i64::from(max_attempts)),
        }
    }

    /// Consume one attempt.
    pub fn decrease(&self) {
        self.attempts_left.fetch_sub(1, Ordering::AcqRel);
    }

    /// True once the endpoint has used up its attempts.
    pub fn should_switch(&self) -> bool {
        self.remaining() <= 0
    }

    pub fn remaining(&self) -> i64 {
        self.attempts_left.load(Ordering::Acquire)
    }
}
