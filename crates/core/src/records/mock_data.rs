//! Demo dataset generation for seeding and tests.
//!
//! Pure functions only. All timestamps are placed relative to the `now`
//! passed in, so a freshly seeded store always shows a mix of overdue,
//! at-risk and comfortable records.

use chrono::{DateTime, Duration, Utc};

use super::{
    Application, ApplicationStatus, AutoApplyRule, Dataset, GigOrder, InterviewTask,
    Notification, OfferPackage, OfferStatus, Opportunity, OpportunityStatus, OrderMilestone,
    OrderStatus, PipelineBoard, PipelineStage, RecordId, TaskStatus, UserAccount,
};

/// Generate a deterministic demo dataset for one user.
///
/// Record ids are derived from `user_id` so datasets for different users can
/// be merged into one store without collisions.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use gigdash_core::records::generate_demo_dataset;
///
/// let dataset = generate_demo_dataset(1, Utc::now());
///
/// assert_eq!(dataset.users.len(), 1);
/// assert_eq!(dataset.boards.len(), 1);
/// assert!(!dataset.opportunities.is_empty());
/// ```
pub fn generate_demo_dataset(user_id: RecordId, now: DateTime<Utc>) -> Dataset {
    let base = user_id * 10_000;
    let hours = Duration::hours;
    let days = Duration::days;

    let users = vec![UserAccount {
        id: user_id,
        display_name: format!("Demo Freelancer {user_id}"),
        email: format!("freelancer{user_id}@example.com"),
        created_at: now - days(120),
        updated_at: now - days(2),
    }];

    let application_specs: [(&str, &str, ApplicationStatus, Option<f64>, Option<i64>); 8] = [
        ("Landing page redesign", "Northwind", ApplicationStatus::Submitted, Some(82.0), Some(1)),
        ("Rust CLI tooling", "Ferrous Labs", ApplicationStatus::Shortlisted, Some(91.0), Some(3)),
        ("Data pipeline audit", "Contoso", ApplicationStatus::Interviewing, None, Some(-1)),
        ("Mobile app QA", "Fabrikam", ApplicationStatus::Draft, None, None),
        ("Brand guidelines", "Tailspin", ApplicationStatus::Offered, Some(76.0), Some(5)),
        ("API integration", "Litware", ApplicationStatus::Hired, Some(88.0), None),
        ("SEO sprint", "Adventure Works", ApplicationStatus::Rejected, Some(54.0), None),
        ("Video editing", "Wingtip", ApplicationStatus::Withdrawn, None, None),
    ];
    let applications = application_specs
        .iter()
        .enumerate()
        .map(|(i, (gig, client, status, score, follow_up))| {
            let i = i as i64;
            Application {
                id: base + 100 + i,
                user_id,
                gig_title: gig.to_string(),
                client_name: client.to_string(),
                status: *status,
                score: *score,
                submitted_at: (*status != ApplicationStatus::Draft).then(|| now - days(10 - i)),
                follow_up_at: follow_up.map(|d| now + days(d)),
                created_at: now - days(12 - i),
                updated_at: now - hours(6 * (i + 1)),
            }
        })
        .collect();

    let notification_titles = [
        ("message", "New message from Northwind"),
        ("order", "Order #1 marked as delivered"),
        ("application", "You were shortlisted by Ferrous Labs"),
        ("payment", "Payout of 300.00 USD released"),
        ("reminder", "Follow up with Contoso"),
    ];
    let notifications = notification_titles
        .iter()
        .enumerate()
        .map(|(i, (kind, title))| {
            let i = i as i64;
            Notification {
                id: base + 200 + i,
                user_id,
                kind: kind.to_string(),
                title: title.to_string(),
                read_at: (i % 2 == 1).then(|| now - hours(i)),
                created_at: now - hours(3 * (i + 1)),
            }
        })
        .collect();

    let order_specs: [(&str, &str, OrderStatus, f64, Option<i64>, bool); 5] = [
        ("Landing page build", "Northwind", OrderStatus::InProgress, 1200.0, Some(48), false),
        ("Logo refresh", "Tailspin", OrderStatus::Overdue, 350.0, Some(-20), true),
        ("Docs migration", "Litware", OrderStatus::Delivered, 800.5, Some(-72), false),
        ("Perf review", "Contoso", OrderStatus::Completed, 640.25, Some(-240), false),
        ("Banner set", "Wingtip", OrderStatus::Cancelled, 90.0, None, false),
    ];
    let mut orders = Vec::with_capacity(order_specs.len());
    let mut milestones = Vec::new();
    for (i, (title, buyer, status, amount, due_hours, at_risk)) in order_specs.iter().enumerate() {
        let i = i as i64;
        let order_id = base + 300 + i;
        let due_at = due_hours.map(|h| now + hours(h));
        orders.push(GigOrder {
            id: order_id,
            seller_id: user_id,
            buyer_name: buyer.to_string(),
            title: title.to_string(),
            status: *status,
            amount: *amount,
            currency: "USD".to_string(),
            due_at,
            delivered_at: matches!(status, OrderStatus::Delivered | OrderStatus::Completed)
                .then(|| now - days(4)),
            at_risk: *at_risk,
            created_at: now - days(30 - i),
            updated_at: now - hours(2 * (i + 1)),
        });

        if *status == OrderStatus::Cancelled {
            continue;
        }
        let completed = matches!(status, OrderStatus::Delivered | OrderStatus::Completed);
        for (m, label) in ["Kickoff", "Draft", "Final"].iter().enumerate() {
            let m = m as i64;
            milestones.push(OrderMilestone {
                id: base + 400 + i * 10 + m,
                order_id,
                title: format!("{label}: {title}"),
                amount: ((amount / 3.0) * 100.0).round() / 100.0,
                due_at: due_at.map(|due| due - days(2 - m)),
                completed_at: (completed || m == 0).then(|| now - days(5 - m)),
                created_at: now - days(30 - i),
            });
        }
    }

    let board_id = base + 500;
    let boards = vec![PipelineBoard {
        id: board_id,
        user_id,
        name: "Job search".to_string(),
        is_default: true,
        created_at: now - days(90),
        updated_at: now - days(1),
    }];

    let stage_specs: [(&str, Option<u32>); 5] = [
        ("Sourced", None),
        ("Applied", Some(72)),
        ("Screening", Some(48)),
        ("Interview", Some(24)),
        ("Offer", Some(96)),
    ];
    let stages: Vec<PipelineStage> = stage_specs
        .iter()
        .enumerate()
        .map(|(i, (name, sla_hours))| PipelineStage {
            id: base + 510 + i as i64,
            board_id,
            name: name.to_string(),
            position: i as i32,
            sla_hours: *sla_hours,
            created_at: now - days(90),
        })
        .collect();

    let opportunity_specs: [(&str, &str, usize, OpportunityStatus, Option<f64>, bool, i64); 8] = [
        ("Backend Engineer", "Ferrous Labs", 0, OpportunityStatus::Active, None, false, 10),
        ("Platform Engineer", "Northwind", 1, OpportunityStatus::Active, Some(78.0), false, 30),
        ("SRE", "Contoso", 1, OpportunityStatus::Overdue, Some(64.0), true, 100),
        ("Staff Engineer", "Litware", 2, OpportunityStatus::Active, Some(88.0), true, 40),
        ("Rust Developer", "Tailspin", 3, OpportunityStatus::Active, Some(92.0), false, 30),
        ("Tech Lead", "Fabrikam", 3, OpportunityStatus::OnHold, None, false, 5),
        ("Principal Engineer", "Wingtip", 4, OpportunityStatus::Active, Some(95.0), false, 20),
        ("Data Engineer", "Adventure Works", 2, OpportunityStatus::Lost, Some(50.0), false, 200),
    ];
    let opportunities: Vec<Opportunity> = opportunity_specs
        .iter()
        .enumerate()
        .map(|(i, (title, company, stage, status, score, at_risk, hours_in_stage))| {
            let i = i as i64;
            Opportunity {
                id: base + 600 + i,
                board_id,
                stage_id: stages[*stage].id,
                title: title.to_string(),
                company: company.to_string(),
                status: *status,
                score: *score,
                at_risk: *at_risk,
                stage_entered_at: Some(now - hours(*hours_in_stage)),
                due_at: (i % 3 == 0).then(|| now + days(i + 1)),
                created_at: now - days(40 - i),
                updated_at: now - hours(i + 1),
            }
        })
        .collect();

    let task_specs: [(usize, &str, TaskStatus, Option<i64>); 7] = [
        (4, "Review Tailspin codebase", TaskStatus::Todo, Some(20)),
        (4, "Prepare system design notes", TaskStatus::InProgress, Some(-4)),
        (5, "Ask about team structure", TaskStatus::Blocked, None),
        (3, "Take-home exercise", TaskStatus::InProgress, Some(44)),
        (3, "Send thank-you note", TaskStatus::Done, Some(-30)),
        (6, "Reference list", TaskStatus::Todo, Some(70)),
        (1, "Research Northwind", TaskStatus::Todo, None),
    ];
    let tasks = task_specs
        .iter()
        .enumerate()
        .map(|(i, (opportunity, title, status, due_hours))| {
            let i = i as i64;
            InterviewTask {
                id: base + 700 + i,
                opportunity_id: opportunities[*opportunity].id,
                title: title.to_string(),
                status: *status,
                due_at: due_hours.map(|h| now + hours(h)),
                completed_at: (*status == TaskStatus::Done).then(|| now - hours(30)),
                created_at: now - days(7),
            }
        })
        .collect();

    let offers = vec![
        OfferPackage {
            id: base + 800,
            opportunity_id: opportunities[6].id,
            status: OfferStatus::Extended,
            base_salary: 185_000.0,
            signing_bonus: 15_000.0,
            equity_value: 40_000.0,
            currency: "USD".to_string(),
            decision_deadline: Some(now + hours(36)),
            documents_required: 3,
            documents_received: 1,
            created_at: now - days(2),
            updated_at: now - hours(5),
        },
        OfferPackage {
            id: base + 801,
            opportunity_id: opportunities[4].id,
            status: OfferStatus::Negotiating,
            base_salary: 160_000.0,
            signing_bonus: 0.0,
            equity_value: 25_000.5,
            currency: "USD".to_string(),
            decision_deadline: Some(now + days(6)),
            documents_required: 2,
            documents_received: 2,
            created_at: now - days(3),
            updated_at: now - hours(8),
        },
        OfferPackage {
            id: base + 802,
            opportunity_id: opportunities[7].id,
            status: OfferStatus::Declined,
            base_salary: 120_000.0,
            signing_bonus: 0.0,
            equity_value: 0.0,
            currency: "USD".to_string(),
            decision_deadline: Some(now - days(10)),
            documents_required: 1,
            documents_received: 0,
            created_at: now - days(20),
            updated_at: now - days(10),
        },
    ];

    let rules = vec![
        AutoApplyRule {
            id: base + 900,
            user_id,
            name: "Remote Rust roles".to_string(),
            enabled: true,
            daily_limit: 5,
            applied_today: 5,
            last_run_at: Some(now - hours(2)),
            created_at: now - days(60),
        },
        AutoApplyRule {
            id: base + 901,
            user_id,
            name: "Contract platform work".to_string(),
            enabled: true,
            daily_limit: 10,
            applied_today: 1,
            last_run_at: Some(now - hours(30)),
            created_at: now - days(45),
        },
        AutoApplyRule {
            id: base + 902,
            user_id,
            name: "Paused: agency gigs".to_string(),
            enabled: false,
            daily_limit: 3,
            applied_today: 0,
            last_run_at: None,
            created_at: now - days(30),
        },
    ];

    Dataset {
        users,
        applications,
        notifications,
        orders,
        milestones,
        boards,
        stages,
        opportunities,
        tasks,
        offers,
        rules,
    }
}
