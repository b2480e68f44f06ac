//! SQLite schema definitions and query construction.
//!
//! Pure data and string building, no I/O. Timestamps are stored as
//! fixed-width RFC 3339 text in UTC, so text comparison and ordering match
//! chronological order.

use rusqlite::types::Value;

use gigdash_core::records::RecordId;
use gigdash_core::sources::ListFilters;

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    display_name TEXT NOT NULL,
    email TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    gig_title TEXT NOT NULL,
    client_name TEXT NOT NULL,
    status TEXT NOT NULL,
    score REAL,
    submitted_at TEXT,
    follow_up_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    read_at TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY,
    seller_id INTEGER NOT NULL,
    buyer_name TEXT NOT NULL,
    title TEXT NOT NULL,
    status TEXT NOT NULL,
    amount REAL NOT NULL,
    currency TEXT NOT NULL,
    due_at TEXT,
    delivered_at TEXT,
    at_risk INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS milestones (
    id INTEGER PRIMARY KEY,
    order_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    amount REAL NOT NULL,
    due_at TEXT,
    completed_at TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS boards (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    is_default INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stages (
    id INTEGER PRIMARY KEY,
    board_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    position INTEGER NOT NULL,
    sla_hours INTEGER,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS opportunities (
    id INTEGER PRIMARY KEY,
    board_id INTEGER NOT NULL,
    stage_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    company TEXT NOT NULL,
    status TEXT NOT NULL,
    score REAL,
    at_risk INTEGER NOT NULL DEFAULT 0,
    stage_entered_at TEXT,
    due_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY,
    opportunity_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    status TEXT NOT NULL,
    due_at TEXT,
    completed_at TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS offers (
    id INTEGER PRIMARY KEY,
    opportunity_id INTEGER NOT NULL,
    status TEXT NOT NULL,
    base_salary REAL NOT NULL,
    signing_bonus REAL NOT NULL DEFAULT 0,
    equity_value REAL NOT NULL DEFAULT 0,
    currency TEXT NOT NULL,
    decision_deadline TEXT,
    documents_required INTEGER NOT NULL DEFAULT 0,
    documents_received INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS auto_apply_rules (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    enabled INTEGER NOT NULL,
    daily_limit INTEGER NOT NULL,
    applied_today INTEGER NOT NULL DEFAULT 0,
    last_run_at TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_applications_user_id ON applications(user_id);
CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications(user_id);
CREATE INDEX IF NOT EXISTS idx_orders_seller_id ON orders(seller_id);
CREATE INDEX IF NOT EXISTS idx_milestones_order_id ON milestones(order_id);
CREATE INDEX IF NOT EXISTS idx_boards_user_id ON boards(user_id);
CREATE INDEX IF NOT EXISTS idx_stages_board_id ON stages(board_id);
CREATE INDEX IF NOT EXISTS idx_opportunities_board_id ON opportunities(board_id);
CREATE INDEX IF NOT EXISTS idx_tasks_opportunity_id ON tasks(opportunity_id);
CREATE INDEX IF NOT EXISTS idx_offers_opportunity_id ON offers(opportunity_id);
CREATE INDEX IF NOT EXISTS idx_auto_apply_rules_user_id ON auto_apply_rules(user_id);
"#;

// Inserts

pub const INSERT_USER: &str = r#"
INSERT INTO users (id, display_name, email, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const INSERT_APPLICATION: &str = r#"
INSERT INTO applications (id, user_id, gig_title, client_name, status, score, submitted_at, follow_up_at, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub const INSERT_NOTIFICATION: &str = r#"
INSERT INTO notifications (id, user_id, kind, title, read_at, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const INSERT_ORDER: &str = r#"
INSERT INTO orders (id, seller_id, buyer_name, title, status, amount, currency, due_at, delivered_at, at_risk, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

pub const INSERT_MILESTONE: &str = r#"
INSERT INTO milestones (id, order_id, title, amount, due_at, completed_at, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const INSERT_BOARD: &str = r#"
INSERT INTO boards (id, user_id, name, is_default, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const INSERT_STAGE: &str = r#"
INSERT INTO stages (id, board_id, name, position, sla_hours, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const INSERT_OPPORTUNITY: &str = r#"
INSERT INTO opportunities (id, board_id, stage_id, title, company, status, score, at_risk, stage_entered_at, due_at, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

pub const INSERT_TASK: &str = r#"
INSERT INTO tasks (id, opportunity_id, title, status, due_at, completed_at, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const INSERT_OFFER: &str = r#"
INSERT INTO offers (id, opportunity_id, status, base_salary, signing_bonus, equity_value, currency, decision_deadline, documents_required, documents_received, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

pub const INSERT_RULE: &str = r#"
INSERT INTO auto_apply_rules (id, user_id, name, enabled, daily_limit, applied_today, last_run_at, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

// Single-row selects

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, display_name, email, created_at, updated_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_DEFAULT_BOARD: &str = r#"
SELECT id, user_id, name, is_default, created_at, updated_at
FROM boards
WHERE user_id = ?1
ORDER BY is_default DESC, created_at ASC, id ASC
LIMIT 1
"#;

/// How one collection is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// Column list and table, without a WHERE clause.
    pub select: &'static str,
    /// Column the scope ids are matched against.
    pub scope_column: &'static str,
    /// Expression compared against `ListFilters::statuses`.
    pub status_expr: &'static str,
    pub order_by: &'static str,
}

pub const APPLICATIONS: ListQuery = ListQuery {
    select: "SELECT id, user_id, gig_title, client_name, status, score, submitted_at, follow_up_at, created_at, updated_at FROM applications",
    scope_column: "user_id",
    status_expr: "status",
    order_by: "updated_at DESC, id ASC",
};

pub const NOTIFICATIONS: ListQuery = ListQuery {
    select: "SELECT id, user_id, kind, title, read_at, created_at FROM notifications",
    scope_column: "user_id",
    status_expr: "kind",
    order_by: "created_at DESC, id ASC",
};

pub const ORDERS: ListQuery = ListQuery {
    select: "SELECT id, seller_id, buyer_name, title, status, amount, currency, due_at, delivered_at, at_risk, created_at, updated_at FROM orders",
    scope_column: "seller_id",
    status_expr: "status",
    order_by: "updated_at DESC, id ASC",
};

pub const MILESTONES: ListQuery = ListQuery {
    select: "SELECT id, order_id, title, amount, due_at, completed_at, created_at FROM milestones",
    scope_column: "order_id",
    status_expr: "CASE WHEN completed_at IS NULL THEN 'pending' ELSE 'completed' END",
    order_by: "due_at IS NULL, due_at ASC, id ASC",
};

pub const STAGES: ListQuery = ListQuery {
    select: "SELECT id, board_id, name, position, sla_hours, created_at FROM stages",
    scope_column: "board_id",
    status_expr: "name",
    order_by: "position ASC, id ASC",
};

pub const OPPORTUNITIES: ListQuery = ListQuery {
    select: "SELECT id, board_id, stage_id, title, company, status, score, at_risk, stage_entered_at, due_at, created_at, updated_at FROM opportunities",
    scope_column: "board_id",
    status_expr: "status",
    order_by: "updated_at DESC, id ASC",
};

pub const TASKS: ListQuery = ListQuery {
    select: "SELECT id, opportunity_id, title, status, due_at, completed_at, created_at FROM tasks",
    scope_column: "opportunity_id",
    status_expr: "status",
    order_by: "due_at IS NULL, due_at ASC, id ASC",
};

pub const OFFERS: ListQuery = ListQuery {
    select: "SELECT id, opportunity_id, status, base_salary, signing_bonus, equity_value, currency, decision_deadline, documents_required, documents_received, created_at, updated_at FROM offers",
    scope_column: "opportunity_id",
    status_expr: "status",
    order_by: "decision_deadline IS NULL, decision_deadline ASC, id ASC",
};

pub const RULES: ListQuery = ListQuery {
    select: "SELECT id, user_id, name, enabled, daily_limit, applied_today, last_run_at, created_at FROM auto_apply_rules",
    scope_column: "user_id",
    status_expr: "CASE WHEN enabled THEN 'enabled' ELSE 'disabled' END",
    order_by: "created_at ASC, id ASC",
};

impl ListQuery {
    /// Builds the statement and its positional parameters for `scope_ids`.
    ///
    /// All scope ids go into a single `IN (...)` clause, so a batch over any
    /// number of parents is one round trip.
    pub fn build(&self, scope_ids: &[RecordId], filters: &ListFilters) -> (String, Vec<Value>) {
        let mut params: Vec<Value> = Vec::new();

        let scope = placeholders(&mut params, scope_ids.iter().map(|id| Value::Integer(*id)));
        let mut sql = format!("{} WHERE {} IN ({scope})", self.select, self.scope_column);

        if !filters.statuses.is_empty() {
            let statuses = placeholders(
                &mut params,
                filters.statuses.iter().map(|s| Value::Text((*s).to_string())),
            );
            sql.push_str(&format!(" AND {} IN ({statuses})", self.status_expr));
        }

        if let Some(range) = filters.range {
            params.push(Value::Text(super::conversions::format_datetime(&range.start)));
            let start = params.len();
            params.push(Value::Text(super::conversions::format_datetime(&range.end)));
            let end = params.len();
            sql.push_str(&format!(" AND created_at >= ?{start} AND created_at <= ?{end}"));
        }

        params.push(Value::Integer(filters.limit as i64));
        sql.push_str(&format!(" ORDER BY {} LIMIT ?{}", self.order_by, params.len()));

        (sql, params)
    }
}

/// Pushes `values` onto `params` and returns their numbered placeholders.
fn placeholders(params: &mut Vec<Value>, values: impl Iterator<Item = Value>) -> String {
    let mut numbered = Vec::new();
    for value in values {
        params.push(value);
        numbered.push(format!("?{}", params.len()));
    }
    numbered.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gigdash_core::sources::TimeRange;

    #[test]
    fn test_single_scope_id() {
        let (sql, params) = APPLICATIONS.build(&[7], &ListFilters::default());

        assert!(sql.ends_with("WHERE user_id IN (?1) ORDER BY updated_at DESC, id ASC LIMIT ?2"));
        assert_eq!(params, vec![Value::Integer(7), Value::Integer(50)]);
    }

    #[test]
    fn test_batch_uses_one_in_clause() {
        let (sql, params) = MILESTONES.build(&[1, 2, 3], &ListFilters::batch());

        assert!(sql.contains("WHERE order_id IN (?1, ?2, ?3)"));
        assert!(sql.contains("ORDER BY due_at IS NULL, due_at ASC, id ASC LIMIT ?4"));
        assert_eq!(params.len(), 4);
        assert_eq!(params[3], Value::Integer(1000));
    }

    #[test]
    fn test_status_and_range_placeholders_follow_scope() {
        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let filters = ListFilters::default()
            .with_statuses(["todo", "blocked"])
            .with_range(range)
            .with_limit(10);

        let (sql, params) = TASKS.build(&[4, 5], &filters);

        assert!(sql.contains("opportunity_id IN (?1, ?2) AND status IN (?3, ?4)"));
        assert!(sql.contains("created_at >= ?5 AND created_at <= ?6"));
        assert!(sql.ends_with("LIMIT ?7"));
        assert_eq!(params[2], Value::Text("todo".to_string()));
        assert_eq!(params[6], Value::Integer(10));
    }
}
