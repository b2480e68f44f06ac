use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::derive::{
    average, build_reminder, compliance_status, elapsed_hours, group_into_buckets, hours_until,
    is_overdue, is_past_due, is_sla_breached, percentage, rank_reminders, round_to, sum_money,
    Bucket, ComplianceStatus, Reminder, ReminderInput, ReminderKind, SlaClock, REMINDER_LIMIT,
};
use crate::records::{
    AutoApplyRule, InterviewTask, OfferPackage, Opportunity, OpportunityStatus, PipelineBoard,
    PipelineStage, RecordId, TaskStatus,
};
use crate::subject::SubjectId;

/// An enabled rule that has not run for this long is reported as stale.
pub const RULE_STALE_AFTER_HOURS: f64 = 24.0;

/// Records fetched for one pipeline automation build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineInputs {
    pub board: Option<PipelineBoard>,
    pub stages: Vec<PipelineStage>,
    pub opportunities: Vec<Opportunity>,
    pub tasks: Vec<InterviewTask>,
    pub offers: Vec<OfferPackage>,
    pub rules: Vec<AutoApplyRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub total_opportunities: usize,
    pub open_opportunities: usize,
    pub overdue_opportunities: usize,
    pub at_risk_opportunities: usize,
    /// Percentage of open opportunities in an SLA-bound stage that are
    /// still within the SLA.
    pub sla_compliance_rate: f64,
    pub average_score: Option<f64>,
    pub average_hours_in_stage: Option<f64>,
    pub open_tasks: usize,
    pub overdue_tasks: usize,
    pub active_offers: usize,
    pub offers_total_value: f64,
    pub compliant_offers: usize,
    pub active_rules: usize,
    pub rules_at_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityCard {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub hours_in_stage: Option<f64>,
    pub sla_hours: Option<u32>,
    pub overdue: bool,
    pub open_tasks: usize,
    /// Unrounded hours in stage. Averages are taken over these and rounded once.
    #[serde(skip)]
    elapsed: Option<f64>,
}

/// One board column. Totals only cover the cards in this column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageColumn {
    #[serde(flatten)]
    pub stage: PipelineStage,
    pub count: usize,
    pub overdue_count: usize,
    pub average_hours_in_stage: Option<f64>,
    pub opportunities: Vec<OpportunityCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCard {
    #[serde(flatten)]
    pub task: InterviewTask,
    pub opportunity_title: Option<String>,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferCard {
    #[serde(flatten)]
    pub offer: OfferPackage,
    pub opportunity_title: Option<String>,
    pub total_compensation: f64,
    pub compliance_status: ComplianceStatus,
    pub hours_until_deadline: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCard {
    #[serde(flatten)]
    pub rule: AutoApplyRule,
    pub at_capacity: bool,
    pub stale: bool,
}

/// The career pipeline automation dashboard of one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineAutomation {
    pub subject_id: SubjectId,
    pub generated_at: DateTime<Utc>,
    pub board: Option<PipelineBoard>,
    pub summary: PipelineSummary,
    pub stages: Vec<StageColumn>,
    pub task_board: Vec<Bucket<TaskStatus, TaskCard>>,
    pub offers: Vec<OfferCard>,
    pub automation_rules: Vec<RuleCard>,
    pub reminders: Vec<Reminder>,
}

impl PipelineAutomation {
    /// The snapshot of a user without a board. The task board still lists
    /// every column, each empty.
    pub fn empty(subject: SubjectId, now: DateTime<Utc>) -> Self {
        Self::assemble(subject, PipelineInputs::default(), now)
    }

    /// Builds the snapshot from fetched records.
    ///
    /// Tasks and offers are joined onto opportunities, and opportunities onto
    /// stages, through lookup maps. Every time based figure uses `now`.
    pub fn assemble(subject: SubjectId, inputs: PipelineInputs, now: DateTime<Utc>) -> Self {
        let PipelineInputs {
            board,
            mut stages,
            opportunities,
            tasks,
            offers,
            rules,
        } = inputs;

        stages.sort_by_key(|stage| stage.position);
        let sla_by_stage: HashMap<RecordId, Option<u32>> =
            stages.iter().map(|stage| (stage.id, stage.sla_hours)).collect();
        let title_by_opportunity: HashMap<RecordId, String> = opportunities
            .iter()
            .map(|o| (o.id, o.title.clone()))
            .collect();

        let mut open_tasks_by_opportunity: HashMap<RecordId, usize> = HashMap::new();
        for task in tasks.iter().filter(|task| task.is_open()) {
            *open_tasks_by_opportunity
                .entry(task.opportunity_id)
                .or_default() += 1;
        }

        let mut reminders = Vec::new();
        let mut within_sla = 0;
        let mut sla_tracked = 0;

        let cards: Vec<OpportunityCard> = opportunities
            .into_iter()
            .map(|opportunity| {
                let sla_hours = sla_by_stage.get(&opportunity.stage_id).copied().flatten();
                let elapsed = elapsed_hours(opportunity.stage_entered_at, now);
                let open = opportunity.status.is_open();
                let flagged = opportunity.status == OpportunityStatus::Overdue;

                if open {
                    if sla_hours.is_some() && elapsed.is_some() {
                        sla_tracked += 1;
                        if !is_sla_breached(elapsed, sla_hours) {
                            within_sla += 1;
                        }
                    }

                    let sla = sla_hours.map(|sla_hours| SlaClock {
                        sla_hours,
                        entered_at: opportunity.stage_entered_at,
                    });
                    reminders.extend(build_reminder(
                        ReminderInput::new(
                            ReminderKind::Opportunity,
                            opportunity.id,
                            format!("{} at {}", opportunity.title, opportunity.company),
                        )
                        .due_at(opportunity.due_at)
                        .sla(sla)
                        .flagged_overdue(flagged)
                        .at_risk(opportunity.at_risk),
                        now,
                    ));
                }

                OpportunityCard {
                    hours_in_stage: elapsed.map(|hours| round_to(hours, 1)),
                    sla_hours,
                    overdue: open && is_overdue(flagged, elapsed, sla_hours),
                    open_tasks: open_tasks_by_opportunity
                        .get(&opportunity.id)
                        .copied()
                        .unwrap_or_default(),
                    elapsed,
                    opportunity,
                }
            })
            .collect();

        let task_cards: Vec<TaskCard> = tasks
            .into_iter()
            .map(|task| {
                let overdue = task.is_open() && is_past_due(task.due_at, now);
                if task.is_open() && task.due_at.is_some() {
                    reminders.extend(build_reminder(
                        ReminderInput::new(ReminderKind::InterviewTask, task.id, &task.title)
                            .due_at(task.due_at),
                        now,
                    ));
                }
                TaskCard {
                    opportunity_title: title_by_opportunity.get(&task.opportunity_id).cloned(),
                    overdue,
                    task,
                }
            })
            .collect();

        let offer_cards: Vec<OfferCard> = offers
            .into_iter()
            .map(|offer| {
                let compliance = compliance_status(
                    offer.documents_required,
                    offer.documents_received,
                    offer.decision_deadline,
                    now,
                );
                if offer.status.awaits_decision() && offer.decision_deadline.is_some() {
                    let title = match title_by_opportunity.get(&offer.opportunity_id) {
                        Some(title) => format!("Decide on offer: {title}"),
                        None => "Decide on offer".to_string(),
                    };
                    reminders.extend(build_reminder(
                        ReminderInput::new(ReminderKind::Offer, offer.id, title)
                            .due_at(offer.decision_deadline)
                            .at_risk(compliance == ComplianceStatus::AtRisk),
                        now,
                    ));
                }
                OfferCard {
                    opportunity_title: title_by_opportunity.get(&offer.opportunity_id).cloned(),
                    total_compensation: sum_money([
                        offer.base_salary,
                        offer.signing_bonus,
                        offer.equity_value,
                    ]),
                    compliance_status: compliance,
                    hours_until_deadline: hours_until(offer.decision_deadline, now)
                        .map(|hours| round_to(hours, 1)),
                    offer,
                }
            })
            .collect();

        let rule_cards: Vec<RuleCard> = rules
            .into_iter()
            .map(|rule| RuleCard {
                at_capacity: rule.enabled && rule.applied_today >= rule.daily_limit,
                stale: rule.enabled
                    && elapsed_hours(rule.last_run_at, now)
                        .is_none_or(|hours| hours > RULE_STALE_AFTER_HOURS),
                rule,
            })
            .collect();

        let open_cards = || cards.iter().filter(|card| card.opportunity.status.is_open());
        let summary = PipelineSummary {
            total_opportunities: cards.len(),
            open_opportunities: open_cards().count(),
            overdue_opportunities: cards.iter().filter(|card| card.overdue).count(),
            at_risk_opportunities: open_cards().filter(|card| card.opportunity.at_risk).count(),
            sla_compliance_rate: percentage(within_sla, sla_tracked, None),
            average_score: average(cards.iter().map(|card| card.opportunity.score))
                .map(|score| round_to(score, 1)),
            average_hours_in_stage: average(open_cards().map(|card| card.elapsed))
                .map(|hours| round_to(hours, 1)),
            open_tasks: task_cards.iter().filter(|card| card.task.is_open()).count(),
            overdue_tasks: task_cards.iter().filter(|card| card.overdue).count(),
            active_offers: offer_cards
                .iter()
                .filter(|card| card.offer.status.awaits_decision())
                .count(),
            offers_total_value: sum_money(
                offer_cards
                    .iter()
                    .filter(|card| card.offer.status.is_live())
                    .map(|card| card.total_compensation),
            ),
            compliant_offers: offer_cards
                .iter()
                .filter(|card| card.compliance_status == ComplianceStatus::Compliant)
                .count(),
            active_rules: rule_cards.iter().filter(|card| card.rule.enabled).count(),
            rules_at_capacity: rule_cards.iter().filter(|card| card.at_capacity).count(),
        };

        let columns = group_into_buckets(
            stages.iter().map(|stage| stage.id),
            cards,
            |card| card.opportunity.stage_id,
            |card| card.overdue,
        );
        let stages = stages
            .into_iter()
            .zip(columns)
            .map(|(stage, column)| StageColumn {
                average_hours_in_stage: average(
                    column
                        .items
                        .iter()
                        .filter(|card| card.opportunity.status.is_open())
                        .map(|card| card.elapsed),
                )
                .map(|hours| round_to(hours, 1)),
                count: column.count,
                overdue_count: column.overdue_count,
                opportunities: column.items,
                stage,
            })
            .collect();

        let task_board = group_into_buckets(
            TaskStatus::ALL,
            task_cards,
            |card| card.task.status,
            |card| card.overdue,
        );

        Self {
            subject_id: subject,
            generated_at: now,
            board,
            summary,
            stages,
            task_board,
            offers: offer_cards,
            automation_rules: rule_cards,
            reminders: rank_reminders(reminders, REMINDER_LIMIT),
        }
    }
}
