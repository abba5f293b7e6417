//! Per-process spending budget.
//!
//! One tracker is constructed at startup from the configured ceiling and
//! shared by handle; spend state lives only for the process lifetime and is
//! never persisted. Dispatch is serialized by the stdio request loop, so
//! the check-then-debit sequence of a single tool call cannot interleave
//! with another; the internal mutex only guards individual accesses.

use std::sync::Mutex;

use serde::Serialize;

/// Budget status snapshot shaped for the `check_budget` tool response.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget_limit: f64,
    pub budget_spent: f64,
    pub budget_remaining: f64,
    pub percentage_used: f64,
}

/// Tracks cumulative spend against a fixed ceiling.
#[derive(Debug)]
pub struct BudgetTracker {
    limit: f64,
    spent: Mutex<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl BudgetTracker {
    pub fn new(limit: f64) -> Self {
        Self {
            limit,
            spent: Mutex::new(0.0),
        }
    }

    /// True iff spending `cost` would stay within the ceiling. The ceiling
    /// is inclusive: `spent + cost == limit` is affordable.
    pub fn can_afford(&self, cost: f64) -> bool {
        let spent = *self.spent.lock().unwrap();
        spent + cost <= self.limit
    }

    /// Record a debit. Does not self-check; callers gate on
    /// [`BudgetTracker::can_afford`] before invoking the remote call.
    pub fn debit(&self, cost: f64) {
        let mut spent = self.spent.lock().unwrap();
        *spent += cost;
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn spent(&self) -> f64 {
        *self.spent.lock().unwrap()
    }

    pub fn remaining(&self) -> f64 {
        self.limit - self.spent()
    }

    /// Display-rounded status. A zero limit reports 0.0% used rather than
    /// propagating a division fault.
    pub fn status(&self) -> BudgetStatus {
        let spent = self.spent();
        let percentage_used = if self.limit == 0.0 {
            0.0
        } else {
            round1(spent / self.limit * 100.0)
        };
        BudgetStatus {
            budget_limit: self.limit,
            budget_spent: round2(spent),
            budget_remaining: round2(self.limit - spent),
            percentage_used,
        }
    }
}
