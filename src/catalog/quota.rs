//! Process-wide daily call budget for the external catalog.

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Mutable counter state; only [`QuotaTracker`] touches it.
struct QuotaState {
    count: u32,
    reset_date: NaiveDate,
}

/// Daily catalog budget with calendar-day reset.
///
/// The count resets to zero exactly once per date boundary, on the first
/// consume attempt after the boundary crosses, and is monotonically
/// non-decreasing within a day. All transitions happen under one lock so a
/// racing pair of callers can never push the effective count past the limit.
pub struct QuotaTracker {
    daily_limit: u32,
    state: Mutex<QuotaState>,
}

impl QuotaTracker {
    pub fn new(daily_limit: u32) -> Self {
        Self {
            daily_limit,
            state: Mutex::new(QuotaState {
                count: 0,
                reset_date: Utc::now().date_naive(),
            }),
        }
    }

    /// Consumes one call from today's budget; false means the budget is spent
    /// and nothing was mutated.
    pub fn try_consume(&self) -> bool {
        self.try_consume_on(Utc::now().date_naive())
    }

    /// Date-injected variant of [`try_consume`](Self::try_consume) for tests.
    pub(crate) fn try_consume_on(&self, today: NaiveDate) -> bool {
        let mut state = self.state.lock();

        if today > state.reset_date {
            info!(date = %today, "daily catalog quota reset");
            state.count = 0;
            state.reset_date = today;
        }

        if state.count >= self.daily_limit {
            return false;
        }

        state.count += 1;
        debug!(used = state.count, limit = self.daily_limit, "catalog call consumed");
        true
    }

    /// Calls consumed so far today.
    pub fn used_today(&self) -> u32 {
        self.state.lock().count
    }
}
