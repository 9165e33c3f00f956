//! Trial entitlement policy.
//!
//! A first-time subscriber gets the full default trial. A user coming back
//! after cancelling keeps whatever trial balance their most recent cancelled
//! subscription had left, unless that trial was already used up. Only the most
//! recent cancelled record is consulted, so balances never accumulate across
//! cancellations.

use serde::Serialize;

use super::subscription::Subscription;

/// Trial length granted to users with no cancelled subscription on record.
pub const DEFAULT_TRIAL_DAYS: i32 = 14;

/// Number of trial days (0..=14) to grant a new checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TrialAllowance(i32);

impl TrialAllowance {
    pub const NONE: TrialAllowance = TrialAllowance(0);
    pub const FULL: TrialAllowance = TrialAllowance(DEFAULT_TRIAL_DAYS);

    /// Clamp any day count into the valid allowance range.
    pub fn days(days: i32) -> Self {
        Self(days.clamp(0, DEFAULT_TRIAL_DAYS))
    }

    pub fn as_days(&self) -> i32 {
        self.0
    }

    pub fn is_granted(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for TrialAllowance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.0)
    }
}

/// Compute the trial allowance from the user's most recent cancelled
/// subscription, if any.
pub fn compute_trial_days(last_cancelled: Option<&Subscription>) -> TrialAllowance {
    match last_cancelled {
        None => TrialAllowance::FULL,
        Some(sub) if sub.trial_consumed => TrialAllowance::NONE,
        Some(sub) => TrialAllowance::days(sub.trial_remaining_days),
    }
}
