//! Pure derivations from raw records.
//!
//! Every function that depends on time takes the reference `now` as an
//! argument. None of them read the wall clock.

mod buckets;
mod compliance;
mod elapsed;
mod reminders;
mod rollups;
mod sla;

pub use buckets::{group_into_buckets, Bucket};
pub use compliance::{compliance_status, ComplianceStatus, AT_RISK_WINDOW_HOURS};
pub use elapsed::{elapsed_days, elapsed_hours, hours_until, parse_timestamp};
pub use reminders::{
    build_reminder, rank_reminders, Reminder, ReminderInput, ReminderKind, Severity, SlaClock,
    REMINDER_LIMIT,
};
pub use rollups::{average, percentage, round_to, sum_money};
pub use sla::{is_overdue, is_past_due, is_sla_breached, sla_deadline};
