use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sla::{is_overdue, is_past_due, sla_deadline};
use super::elapsed_hours;
use crate::records::RecordId;

/// How many reminders a snapshot carries.
pub const REMINDER_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// What kind of record a reminder points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Opportunity,
    InterviewTask,
    Offer,
    Application,
    Order,
    Milestone,
}

/// A derived, never persisted, call to action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub kind: ReminderKind,
    pub record_id: RecordId,
    pub title: String,
    pub due_at: Option<DateTime<Utc>>,
    pub severity: Severity,
    pub overdue: bool,
}

/// SLA bookkeeping for a record that lives in a stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlaClock {
    pub sla_hours: u32,
    pub entered_at: Option<DateTime<Utc>>,
}

/// Everything needed to derive a reminder from one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderInput {
    pub kind: ReminderKind,
    pub record_id: RecordId,
    pub title: String,
    pub due_at: Option<DateTime<Utc>>,
    pub sla: Option<SlaClock>,
    pub flagged_overdue: bool,
    pub at_risk: bool,
}

impl ReminderInput {
    pub fn new(kind: ReminderKind, record_id: RecordId, title: impl Into<String>) -> Self {
        Self {
            kind,
            record_id,
            title: title.into(),
            due_at: None,
            sla: None,
            flagged_overdue: false,
            at_risk: false,
        }
    }

    pub fn due_at(mut self, due_at: Option<DateTime<Utc>>) -> Self {
        self.due_at = due_at;
        self
    }

    pub fn sla(mut self, sla: Option<SlaClock>) -> Self {
        self.sla = sla;
        self
    }

    pub fn flagged_overdue(mut self, flagged: bool) -> Self {
        self.flagged_overdue = flagged;
        self
    }

    pub fn at_risk(mut self, at_risk: bool) -> Self {
        self.at_risk = at_risk;
        self
    }
}

/// Builds the reminder for one record, or `None` when the record has neither
/// a due date nor an SLA.
///
/// Severity is `critical` when the record is overdue (status flag, SLA breach
/// or due date passed), `warning` when the risk flag is set, `info` otherwise.
/// Without an explicit due date the SLA deadline is used as the due date.
pub fn build_reminder(input: ReminderInput, now: DateTime<Utc>) -> Option<Reminder> {
    if input.due_at.is_none() && input.sla.is_none() {
        return None;
    }

    let (elapsed, sla_hours, deadline) = match input.sla {
        Some(clock) => (
            elapsed_hours(clock.entered_at, now),
            Some(clock.sla_hours),
            sla_deadline(clock.entered_at, Some(clock.sla_hours)),
        ),
        None => (None, None, None),
    };

    let due_at = input.due_at.or(deadline);
    let overdue = is_overdue(input.flagged_overdue, elapsed, sla_hours) || is_past_due(due_at, now);

    let severity = if overdue {
        Severity::Critical
    } else if input.at_risk {
        Severity::Warning
    } else {
        Severity::Info
    };

    Some(Reminder {
        kind: input.kind,
        record_id: input.record_id,
        title: input.title,
        due_at,
        severity,
        overdue,
    })
}

/// Sorts reminders by due date ascending, undated last, and keeps the first
/// `limit`. The sort is stable, so ties keep their input order.
pub fn rank_reminders(mut reminders: Vec<Reminder>, limit: usize) -> Vec<Reminder> {
    reminders.sort_by(|a, b| match (a.due_at, b.due_at) {
        (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    reminders.truncate(limit);
    reminders
}
