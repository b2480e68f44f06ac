use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::derive::{
    average, build_reminder, group_into_buckets, is_overdue, is_past_due, percentage,
    rank_reminders, round_to, sum_money, Bucket, Reminder, ReminderInput, ReminderKind,
    REMINDER_LIMIT,
};
use crate::records::{
    Application, ApplicationStatus, GigOrder, Notification, OrderMilestone, OrderStatus,
    RecordId, UserAccount,
};
use crate::subject::SubjectId;

/// Notifications shown on the dashboard.
pub const NOTIFICATION_LIMIT: usize = 12;

/// Records fetched for one user dashboard build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDashboardInputs {
    pub profile: Option<UserAccount>,
    pub applications: Vec<Application>,
    pub notifications: Vec<Notification>,
    pub orders: Vec<GigOrder>,
    pub milestones: Vec<OrderMilestone>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboardSummary {
    pub total_applications: usize,
    pub active_applications: usize,
    pub average_application_score: Option<f64>,
    pub unread_notifications: usize,
    pub open_orders: usize,
    pub overdue_orders: usize,
    pub completed_orders: usize,
    /// Percentage of non-cancelled orders that are completed.
    pub order_completion_rate: f64,
    pub earnings_total: f64,
    pub pending_payout: f64,
}

/// An order with its milestones joined on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCard {
    #[serde(flatten)]
    pub order: GigOrder,
    pub milestones: Vec<OrderMilestone>,
    pub milestone_progress: f64,
    pub outstanding_amount: f64,
    pub overdue: bool,
}

/// The marketplace dashboard of one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub subject_id: SubjectId,
    pub generated_at: DateTime<Utc>,
    pub profile: Option<UserAccount>,
    pub summary: UserDashboardSummary,
    pub applications_by_status: Vec<Bucket<ApplicationStatus, Application>>,
    pub recent_notifications: Vec<Notification>,
    pub orders: Vec<OrderCard>,
    pub reminders: Vec<Reminder>,
}

impl UserDashboard {
    /// The dashboard of a user with no records. Still lists every status
    /// bucket, each empty.
    pub fn empty(subject: SubjectId, now: DateTime<Utc>) -> Self {
        Self::assemble(subject, UserDashboardInputs::default(), now)
    }

    /// Builds the dashboard from fetched records.
    ///
    /// Milestones are joined onto orders through a lookup map. Every time
    /// based figure uses `now`.
    pub fn assemble(subject: SubjectId, inputs: UserDashboardInputs, now: DateTime<Utc>) -> Self {
        let UserDashboardInputs {
            profile,
            applications,
            mut notifications,
            orders,
            milestones,
        } = inputs;

        let mut milestones_by_order: HashMap<RecordId, Vec<OrderMilestone>> = HashMap::new();
        for milestone in milestones {
            milestones_by_order
                .entry(milestone.order_id)
                .or_default()
                .push(milestone);
        }

        let mut reminders = Vec::new();

        let orders: Vec<OrderCard> = orders
            .into_iter()
            .map(|order| {
                let milestones = milestones_by_order.remove(&order.id).unwrap_or_default();
                order_card(order, milestones, now)
            })
            .collect();

        for card in orders.iter().filter(|card| card.order.status.is_open()) {
            let order = &card.order;
            if order.due_at.is_some() {
                reminders.extend(build_reminder(
                    ReminderInput::new(ReminderKind::Order, order.id, &order.title)
                        .due_at(order.due_at)
                        .flagged_overdue(order.status == OrderStatus::Overdue)
                        .at_risk(order.at_risk),
                    now,
                ));
            }
            for milestone in card.milestones.iter().filter(|m| !m.is_completed()) {
                if milestone.due_at.is_some() {
                    reminders.extend(build_reminder(
                        ReminderInput::new(ReminderKind::Milestone, milestone.id, &milestone.title)
                            .due_at(milestone.due_at),
                        now,
                    ));
                }
            }
        }

        for application in applications.iter().filter(|a| a.status.is_active()) {
            if application.follow_up_at.is_some() {
                reminders.extend(build_reminder(
                    ReminderInput::new(
                        ReminderKind::Application,
                        application.id,
                        format!("Follow up: {}", application.gig_title),
                    )
                    .due_at(application.follow_up_at),
                    now,
                ));
            }
        }

        let non_cancelled = orders
            .iter()
            .filter(|card| card.order.status != OrderStatus::Cancelled)
            .count();
        let completed_orders = count_status(&orders, OrderStatus::Completed);

        let summary = UserDashboardSummary {
            total_applications: applications.len(),
            active_applications: applications.iter().filter(|a| a.status.is_active()).count(),
            average_application_score: average(applications.iter().map(|a| a.score))
                .map(|score| round_to(score, 1)),
            unread_notifications: notifications.iter().filter(|n| n.is_unread()).count(),
            open_orders: orders.iter().filter(|card| card.order.status.is_open()).count(),
            overdue_orders: orders.iter().filter(|card| card.overdue).count(),
            completed_orders,
            order_completion_rate: percentage(completed_orders, non_cancelled, None),
            earnings_total: sum_money(amounts(&orders, OrderStatus::Completed)),
            pending_payout: sum_money(amounts(&orders, OrderStatus::Delivered)),
        };

        let applications_by_status = group_into_buckets(
            ApplicationStatus::ALL,
            applications,
            |application| application.status,
            |application| {
                application.status.is_active() && is_past_due(application.follow_up_at, now)
            },
        );

        notifications.truncate(NOTIFICATION_LIMIT);

        Self {
            subject_id: subject,
            generated_at: now,
            profile,
            summary,
            applications_by_status,
            recent_notifications: notifications,
            orders,
            reminders: rank_reminders(reminders, REMINDER_LIMIT),
        }
    }
}

fn order_card(order: GigOrder, milestones: Vec<OrderMilestone>, now: DateTime<Utc>) -> OrderCard {
    let completed = milestones.iter().filter(|m| m.is_completed()).count();
    let outstanding_amount = sum_money(
        milestones
            .iter()
            .filter(|m| !m.is_completed())
            .map(|m| m.amount),
    );
    let overdue = order.status.is_open()
        && (is_overdue(order.status == OrderStatus::Overdue, None, None)
            || is_past_due(order.due_at, now));

    OrderCard {
        milestone_progress: percentage(completed, milestones.len(), None),
        outstanding_amount,
        overdue,
        milestones,
        order,
    }
}

fn count_status(orders: &[OrderCard], status: OrderStatus) -> usize {
    orders.iter().filter(|card| card.order.status == status).count()
}

fn amounts(orders: &[OrderCard], status: OrderStatus) -> impl Iterator<Item = f64> + '_ {
    orders
        .iter()
        .filter(move |card| card.order.status == status)
        .map(|card| card.order.amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Severity;
    use crate::records::generate_demo_dataset;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn subject() -> SubjectId {
        SubjectId::new(1).unwrap()
    }

    fn order(id: RecordId, status: OrderStatus, amount: f64) -> GigOrder {
        GigOrder {
            id,
            seller_id: 1,
            buyer_name: "Acme".to_string(),
            title: format!("Order {id}"),
            status,
            amount,
            currency: "USD".to_string(),
            due_at: None,
            delivered_at: None,
            at_risk: false,
            created_at: now() - Duration::days(10),
            updated_at: now() - Duration::days(1),
        }
    }

    fn milestone(id: RecordId, order_id: RecordId, amount: f64, done: bool) -> OrderMilestone {
        OrderMilestone {
            id,
            order_id,
            title: format!("Milestone {id}"),
            amount,
            due_at: None,
            completed_at: done.then(|| now() - Duration::days(1)),
            created_at: now() - Duration::days(10),
        }
    }

    fn application(id: RecordId, status: ApplicationStatus, score: Option<f64>) -> Application {
        Application {
            id,
            user_id: 1,
            gig_title: format!("Gig {id}"),
            client_name: "Client".to_string(),
            status,
            score,
            submitted_at: None,
            follow_up_at: None,
            created_at: now() - Duration::days(5),
            updated_at: now() - Duration::days(1),
        }
    }

    #[test]
    fn test_empty_dashboard_has_zero_counts_and_empty_lists() {
        let dashboard = UserDashboard::empty(subject(), now());

        assert_eq!(dashboard.generated_at, now());
        assert_eq!(dashboard.summary, UserDashboardSummary::default());
        assert!(dashboard.profile.is_none());
        assert!(dashboard.orders.is_empty());
        assert!(dashboard.reminders.is_empty());
        assert!(dashboard.recent_notifications.is_empty());
        assert_eq!(dashboard.applications_by_status.len(), ApplicationStatus::ALL.len());
        assert!(dashboard.applications_by_status.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_empty_dashboard_json_shape() {
        let json = serde_json::to_value(UserDashboard::empty(subject(), now())).unwrap();

        assert_eq!(json["subjectId"], 1);
        assert_eq!(json["summary"]["totalApplications"], 0);
        assert_eq!(json["summary"]["averageApplicationScore"], serde_json::Value::Null);
        assert_eq!(json["summary"]["orderCompletionRate"], 0.0);
        assert_eq!(json["applicationsByStatus"][0]["key"], "draft");
        assert!(json["reminders"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_milestones_join_onto_their_orders() {
        let inputs = UserDashboardInputs {
            orders: vec![
                order(1, OrderStatus::InProgress, 300.0),
                order(2, OrderStatus::InProgress, 90.0),
            ],
            milestones: vec![
                milestone(10, 1, 100.0, true),
                milestone(11, 1, 100.0, false),
                milestone(12, 1, 100.1, false),
                milestone(20, 2, 90.0, false),
            ],
            ..Default::default()
        };

        let dashboard = UserDashboard::assemble(subject(), inputs, now());

        let first = &dashboard.orders[0];
        assert_eq!(first.milestones.len(), 3);
        assert_eq!(first.milestone_progress, 33.0);
        assert_eq!(first.outstanding_amount, 200.1);

        let second = &dashboard.orders[1];
        assert_eq!(second.milestones.len(), 1);
        assert_eq!(second.milestone_progress, 0.0);
    }

    #[test]
    fn test_order_rollups() {
        let mut late = order(3, OrderStatus::InProgress, 50.0);
        late.due_at = Some(now() - Duration::hours(2));

        let inputs = UserDashboardInputs {
            orders: vec![
                order(1, OrderStatus::Completed, 100.10),
                order(2, OrderStatus::Completed, 200.20),
                late,
                order(4, OrderStatus::Overdue, 75.0),
                order(5, OrderStatus::Delivered, 80.5),
                order(6, OrderStatus::Cancelled, 999.0),
            ],
            ..Default::default()
        };

        let summary = UserDashboard::assemble(subject(), inputs, now()).summary;

        assert_eq!(summary.open_orders, 3);
        assert_eq!(summary.overdue_orders, 2);
        assert_eq!(summary.completed_orders, 2);
        assert_eq!(summary.order_completion_rate, 40.0);
        assert_eq!(summary.earnings_total, 300.3);
        assert_eq!(summary.pending_payout, 80.5);
    }

    #[test]
    fn test_application_score_average_ignores_missing_scores() {
        let inputs = UserDashboardInputs {
            applications: vec![
                application(1, ApplicationStatus::Submitted, Some(80.0)),
                application(2, ApplicationStatus::Draft, None),
                application(3, ApplicationStatus::Hired, Some(90.0)),
            ],
            ..Default::default()
        };

        let dashboard = UserDashboard::assemble(subject(), inputs, now());

        assert_eq!(dashboard.summary.average_application_score, Some(85.0));
        assert_eq!(dashboard.summary.total_applications, 3);
        assert_eq!(dashboard.summary.active_applications, 1);

        let hired = &dashboard.applications_by_status[5];
        assert_eq!(hired.key, ApplicationStatus::Hired);
        assert_eq!(hired.count, 1);
    }

    #[test]
    fn test_reminders_ordered_by_due_date() {
        let mut soon = order(1, OrderStatus::InProgress, 10.0);
        soon.due_at = Some(now() + Duration::days(1));
        let mut later = order(2, OrderStatus::InProgress, 10.0);
        later.due_at = Some(now() + Duration::days(3));
        later.at_risk = true;
        let mut done = order(3, OrderStatus::Completed, 10.0);
        done.due_at = Some(now() - Duration::days(3));

        let mut follow_up = application(4, ApplicationStatus::Shortlisted, None);
        follow_up.follow_up_at = Some(now() - Duration::hours(1));

        let inputs = UserDashboardInputs {
            orders: vec![later, soon, done],
            applications: vec![follow_up],
            ..Default::default()
        };

        let reminders = UserDashboard::assemble(subject(), inputs, now()).reminders;

        let ids: Vec<_> = reminders.iter().map(|r| r.record_id).collect();
        assert_eq!(ids, vec![4, 1, 2]);
        assert_eq!(reminders[0].severity, Severity::Critical);
        assert_eq!(reminders[1].severity, Severity::Info);
        assert_eq!(reminders[2].severity, Severity::Warning);
    }

    #[test]
    fn test_notifications_are_capped() {
        let notifications = (0..20)
            .map(|i| Notification {
                id: i,
                user_id: 1,
                kind: "message".to_string(),
                title: format!("Message {i}"),
                read_at: None,
                created_at: now() - Duration::minutes(i),
            })
            .collect();

        let dashboard = UserDashboard::assemble(
            subject(),
            UserDashboardInputs {
                notifications,
                ..Default::default()
            },
            now(),
        );

        assert_eq!(dashboard.recent_notifications.len(), NOTIFICATION_LIMIT);
        assert_eq!(dashboard.summary.unread_notifications, 20);
    }

    #[test]
    fn test_same_inputs_same_dashboard() {
        let dataset = generate_demo_dataset(1, now());
        let inputs = UserDashboardInputs {
            profile: dataset.users.first().cloned(),
            applications: dataset.applications,
            notifications: dataset.notifications,
            orders: dataset.orders,
            milestones: dataset.milestones,
        };

        let first = UserDashboard::assemble(subject(), inputs.clone(), now());
        let second = UserDashboard::assemble(subject(), inputs, now());

        assert_eq!(first, second);
        assert!(first.reminders.len() <= REMINDER_LIMIT);
    }
}
