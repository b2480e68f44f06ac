//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and record types.
//! Required timestamps and status slugs must parse; optional domain
//! timestamps that do not parse are read as `None`.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use gigdash_core::derive::parse_timestamp;
use gigdash_core::records::{
    Application, ApplicationStatus, AutoApplyRule, GigOrder, InterviewTask, Notification,
    OfferPackage, OfferStatus, Opportunity, OpportunityStatus, OrderMilestone, OrderStatus,
    PipelineBoard, PipelineStage, TaskStatus, UserAccount,
};

// ============================================================================
// Marketplace conversions
// ============================================================================

/// Expected columns: id, display_name, email, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<UserAccount> {
    Ok(UserAccount {
        id: row.get(0)?,
        display_name: row.get(1)?,
        email: row.get(2)?,
        created_at: parse_datetime(3, &row.get::<_, String>(3)?)?,
        updated_at: parse_datetime(4, &row.get::<_, String>(4)?)?,
    })
}

/// Expected columns: id, user_id, gig_title, client_name, status, score,
/// submitted_at, follow_up_at, created_at, updated_at
pub fn row_to_application(row: &Row) -> rusqlite::Result<Application> {
    let status: String = row.get(4)?;

    Ok(Application {
        id: row.get(0)?,
        user_id: row.get(1)?,
        gig_title: row.get(2)?,
        client_name: row.get(3)?,
        status: parse_status(4, &status, ApplicationStatus::parse)?,
        score: row.get(5)?,
        submitted_at: parse_optional_datetime(row.get(6)?),
        follow_up_at: parse_optional_datetime(row.get(7)?),
        created_at: parse_datetime(8, &row.get::<_, String>(8)?)?,
        updated_at: parse_datetime(9, &row.get::<_, String>(9)?)?,
    })
}

/// Expected columns: id, user_id, kind, title, read_at, created_at
pub fn row_to_notification(row: &Row) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        title: row.get(3)?,
        read_at: parse_optional_datetime(row.get(4)?),
        created_at: parse_datetime(5, &row.get::<_, String>(5)?)?,
    })
}

/// Expected columns: id, seller_id, buyer_name, title, status, amount,
/// currency, due_at, delivered_at, at_risk, created_at, updated_at
pub fn row_to_order(row: &Row) -> rusqlite::Result<GigOrder> {
    let status: String = row.get(4)?;

    Ok(GigOrder {
        id: row.get(0)?,
        seller_id: row.get(1)?,
        buyer_name: row.get(2)?,
        title: row.get(3)?,
        status: parse_status(4, &status, OrderStatus::parse)?,
        amount: row.get(5)?,
        currency: row.get(6)?,
        due_at: parse_optional_datetime(row.get(7)?),
        delivered_at: parse_optional_datetime(row.get(8)?),
        at_risk: row.get(9)?,
        created_at: parse_datetime(10, &row.get::<_, String>(10)?)?,
        updated_at: parse_datetime(11, &row.get::<_, String>(11)?)?,
    })
}

/// Expected columns: id, order_id, title, amount, due_at, completed_at, created_at
pub fn row_to_milestone(row: &Row) -> rusqlite::Result<OrderMilestone> {
    Ok(OrderMilestone {
        id: row.get(0)?,
        order_id: row.get(1)?,
        title: row.get(2)?,
        amount: row.get(3)?,
        due_at: parse_optional_datetime(row.get(4)?),
        completed_at: parse_optional_datetime(row.get(5)?),
        created_at: parse_datetime(6, &row.get::<_, String>(6)?)?,
    })
}

// ============================================================================
// Career pipeline conversions
// ============================================================================

/// Expected columns: id, user_id, name, is_default, created_at, updated_at
pub fn row_to_board(row: &Row) -> rusqlite::Result<PipelineBoard> {
    Ok(PipelineBoard {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        is_default: row.get(3)?,
        created_at: parse_datetime(4, &row.get::<_, String>(4)?)?,
        updated_at: parse_datetime(5, &row.get::<_, String>(5)?)?,
    })
}

/// Expected columns: id, board_id, name, position, sla_hours, created_at
pub fn row_to_stage(row: &Row) -> rusqlite::Result<PipelineStage> {
    Ok(PipelineStage {
        id: row.get(0)?,
        board_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
        sla_hours: row.get(4)?,
        created_at: parse_datetime(5, &row.get::<_, String>(5)?)?,
    })
}

/// Expected columns: id, board_id, stage_id, title, company, status, score,
/// at_risk, stage_entered_at, due_at, created_at, updated_at
pub fn row_to_opportunity(row: &Row) -> rusqlite::Result<Opportunity> {
    let status: String = row.get(5)?;

    Ok(Opportunity {
        id: row.get(0)?,
        board_id: row.get(1)?,
        stage_id: row.get(2)?,
        title: row.get(3)?,
        company: row.get(4)?,
        status: parse_status(5, &status, OpportunityStatus::parse)?,
        score: row.get(6)?,
        at_risk: row.get(7)?,
        stage_entered_at: parse_optional_datetime(row.get(8)?),
        due_at: parse_optional_datetime(row.get(9)?),
        created_at: parse_datetime(10, &row.get::<_, String>(10)?)?,
        updated_at: parse_datetime(11, &row.get::<_, String>(11)?)?,
    })
}

/// Expected columns: id, opportunity_id, title, status, due_at, completed_at, created_at
pub fn row_to_task(row: &Row) -> rusqlite::Result<InterviewTask> {
    let status: String = row.get(3)?;

    Ok(InterviewTask {
        id: row.get(0)?,
        opportunity_id: row.get(1)?,
        title: row.get(2)?,
        status: parse_status(3, &status, TaskStatus::parse)?,
        due_at: parse_optional_datetime(row.get(4)?),
        completed_at: parse_optional_datetime(row.get(5)?),
        created_at: parse_datetime(6, &row.get::<_, String>(6)?)?,
    })
}

/// Expected columns: id, opportunity_id, status, base_salary, signing_bonus,
/// equity_value, currency, decision_deadline, documents_required,
/// documents_received, created_at, updated_at
pub fn row_to_offer(row: &Row) -> rusqlite::Result<OfferPackage> {
    let status: String = row.get(2)?;

    Ok(OfferPackage {
        id: row.get(0)?,
        opportunity_id: row.get(1)?,
        status: parse_status(2, &status, OfferStatus::parse)?,
        base_salary: row.get(3)?,
        signing_bonus: row.get(4)?,
        equity_value: row.get(5)?,
        currency: row.get(6)?,
        decision_deadline: parse_optional_datetime(row.get(7)?),
        documents_required: row.get(8)?,
        documents_received: row.get(9)?,
        created_at: parse_datetime(10, &row.get::<_, String>(10)?)?,
        updated_at: parse_datetime(11, &row.get::<_, String>(11)?)?,
    })
}

/// Expected columns: id, user_id, name, enabled, daily_limit, applied_today,
/// last_run_at, created_at
pub fn row_to_rule(row: &Row) -> rusqlite::Result<AutoApplyRule> {
    Ok(AutoApplyRule {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        enabled: row.get(3)?,
        daily_limit: row.get(4)?,
        applied_today: row.get(5)?,
        last_run_at: parse_optional_datetime(row.get(6)?),
        created_at: parse_datetime(7, &row.get::<_, String>(7)?)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    parse_timestamp(s).ok_or_else(|| conversion_error(column, format!("Invalid timestamp: {s}")))
}

fn parse_optional_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.as_deref().and_then(parse_timestamp)
}

fn parse_status<S>(column: usize, s: &str, parse: fn(&str) -> Option<S>) -> rusqlite::Result<S> {
    parse(s).ok_or_else(|| conversion_error(column, format!("Unknown status: {s}")))
}

/// Format a DateTime<Utc> as fixed-width RFC 3339 text.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn format_optional_datetime(dt: &Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(format_datetime)
}
