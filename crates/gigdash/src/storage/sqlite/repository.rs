//! SQLite data source implementation.
//!
//! Implements the data source traits from `gigdash_core::sources` using SQLite.

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::Row;
use tokio_rusqlite::Connection;

use gigdash_core::records::{
    Application, AutoApplyRule, Dataset, GigOrder, InterviewTask, Notification, OfferPackage,
    Opportunity, OrderMilestone, PipelineBoard, PipelineStage, RecordId, UserAccount,
};
use gigdash_core::sources::{
    ApplicationSource, AutoApplyRuleSource, BoardSource, DataSourceError, InterviewTaskSource,
    ListFilters, MilestoneSource, NotificationSource, OfferSource, OpportunitySource, OrderSource,
    Result, StageSource, UserSource,
};
use gigdash_core::subject::SubjectId;

use super::conversions::{
    format_datetime, format_optional_datetime, row_to_application, row_to_board,
    row_to_milestone, row_to_notification, row_to_offer, row_to_opportunity, row_to_order,
    row_to_rule, row_to_stage, row_to_task, row_to_user,
};
use super::error::map_tokio_rusqlite_error;
use super::schema::{self, ListQuery};

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-backed data source.
#[derive(Clone)]
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Opens (or creates) a file-based database and creates the schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| DataSourceError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a source over an in-memory database. Data is lost when the
    /// connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DataSourceError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "schema"))
    }

    /// Inserts every record of `dataset` in one transaction.
    pub async fn insert_dataset(&self, dataset: Dataset) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                insert_all(&tx, &dataset).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Dataset"))
    }

    /// Runs a list query over `scope_ids`.
    async fn list<T>(
        &self,
        query: ListQuery,
        scope_ids: &[RecordId],
        filters: &ListFilters,
        map_row: fn(&Row) -> rusqlite::Result<T>,
        entity_type: &'static str,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
    {
        if scope_ids.is_empty() {
            return Ok(Vec::new());
        }
        let (sql, params) = query.build(scope_ids, filters);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params.iter()), map_row)
                    .map_err(wrap_err)?;

                let mut records = Vec::new();
                for row_result in rows {
                    records.push(row_result.map_err(wrap_err)?);
                }
                Ok(records)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    async fn get_one<T>(
        &self,
        sql: &'static str,
        id: RecordId,
        map_row: fn(&Row) -> rusqlite::Result<T>,
        entity_type: &'static str,
    ) -> Result<Option<T>>
    where
        T: Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                match stmt.query_row([id], map_row) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }
}

fn insert_all(tx: &rusqlite::Transaction<'_>, dataset: &Dataset) -> rusqlite::Result<()> {
    use rusqlite::params;

    for u in &dataset.users {
        tx.execute(
            schema::INSERT_USER,
            params![
                u.id,
                u.display_name,
                u.email,
                format_datetime(&u.created_at),
                format_datetime(&u.updated_at)
            ],
        )?;
    }
    for a in &dataset.applications {
        tx.execute(
            schema::INSERT_APPLICATION,
            params![
                a.id,
                a.user_id,
                a.gig_title,
                a.client_name,
                a.status.as_str(),
                a.score,
                format_optional_datetime(&a.submitted_at),
                format_optional_datetime(&a.follow_up_at),
                format_datetime(&a.created_at),
                format_datetime(&a.updated_at)
            ],
        )?;
    }
    for n in &dataset.notifications {
        tx.execute(
            schema::INSERT_NOTIFICATION,
            params![
                n.id,
                n.user_id,
                n.kind,
                n.title,
                format_optional_datetime(&n.read_at),
                format_datetime(&n.created_at)
            ],
        )?;
    }
    for o in &dataset.orders {
        tx.execute(
            schema::INSERT_ORDER,
            params![
                o.id,
                o.seller_id,
                o.buyer_name,
                o.title,
                o.status.as_str(),
                o.amount,
                o.currency,
                format_optional_datetime(&o.due_at),
                format_optional_datetime(&o.delivered_at),
                o.at_risk,
                format_datetime(&o.created_at),
                format_datetime(&o.updated_at)
            ],
        )?;
    }
    for m in &dataset.milestones {
        tx.execute(
            schema::INSERT_MILESTONE,
            params![
                m.id,
                m.order_id,
                m.title,
                m.amount,
                format_optional_datetime(&m.due_at),
                format_optional_datetime(&m.completed_at),
                format_datetime(&m.created_at)
            ],
        )?;
    }
    for b in &dataset.boards {
        tx.execute(
            schema::INSERT_BOARD,
            params![
                b.id,
                b.user_id,
                b.name,
                b.is_default,
                format_datetime(&b.created_at),
                format_datetime(&b.updated_at)
            ],
        )?;
    }
    for s in &dataset.stages {
        tx.execute(
            schema::INSERT_STAGE,
            params![
                s.id,
                s.board_id,
                s.name,
                s.position,
                s.sla_hours,
                format_datetime(&s.created_at)
            ],
        )?;
    }
    for o in &dataset.opportunities {
        tx.execute(
            schema::INSERT_OPPORTUNITY,
            params![
                o.id,
                o.board_id,
                o.stage_id,
                o.title,
                o.company,
                o.status.as_str(),
                o.score,
                o.at_risk,
                format_optional_datetime(&o.stage_entered_at),
                format_optional_datetime(&o.due_at),
                format_datetime(&o.created_at),
                format_datetime(&o.updated_at)
            ],
        )?;
    }
    for t in &dataset.tasks {
        tx.execute(
            schema::INSERT_TASK,
            params![
                t.id,
                t.opportunity_id,
                t.title,
                t.status.as_str(),
                format_optional_datetime(&t.due_at),
                format_optional_datetime(&t.completed_at),
                format_datetime(&t.created_at)
            ],
        )?;
    }
    for o in &dataset.offers {
        tx.execute(
            schema::INSERT_OFFER,
            params![
                o.id,
                o.opportunity_id,
                o.status.as_str(),
                o.base_salary,
                o.signing_bonus,
                o.equity_value,
                o.currency,
                format_optional_datetime(&o.decision_deadline),
                o.documents_required,
                o.documents_received,
                format_datetime(&o.created_at),
                format_datetime(&o.updated_at)
            ],
        )?;
    }
    for r in &dataset.rules {
        tx.execute(
            schema::INSERT_RULE,
            params![
                r.id,
                r.user_id,
                r.name,
                r.enabled,
                r.daily_limit,
                r.applied_today,
                format_optional_datetime(&r.last_run_at),
                format_datetime(&r.created_at)
            ],
        )?;
    }
    Ok(())
}

// ============================================================================
// Data source trait implementations
// ============================================================================

#[async_trait]
impl UserSource for SqliteSource {
    async fn get_user(&self, subject: SubjectId) -> Result<Option<UserAccount>> {
        self.get_one(schema::SELECT_USER_BY_ID, subject.get(), row_to_user, "User")
            .await
    }
}

#[async_trait]
impl ApplicationSource for SqliteSource {
    async fn list_applications(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<Application>> {
        self.list(
            schema::APPLICATIONS,
            &[subject.get()],
            filters,
            row_to_application,
            "Application",
        )
        .await
    }
}

#[async_trait]
impl NotificationSource for SqliteSource {
    async fn list_notifications(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<Notification>> {
        self.list(
            schema::NOTIFICATIONS,
            &[subject.get()],
            filters,
            row_to_notification,
            "Notification",
        )
        .await
    }
}

#[async_trait]
impl OrderSource for SqliteSource {
    async fn list_orders(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<GigOrder>> {
        self.list(schema::ORDERS, &[subject.get()], filters, row_to_order, "GigOrder")
            .await
    }
}

#[async_trait]
impl MilestoneSource for SqliteSource {
    async fn list_milestones_by_order_ids(
        &self,
        order_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<OrderMilestone>> {
        self.list(
            schema::MILESTONES,
            order_ids,
            filters,
            row_to_milestone,
            "OrderMilestone",
        )
        .await
    }
}

#[async_trait]
impl BoardSource for SqliteSource {
    async fn get_default_board(&self, subject: SubjectId) -> Result<Option<PipelineBoard>> {
        self.get_one(
            schema::SELECT_DEFAULT_BOARD,
            subject.get(),
            row_to_board,
            "PipelineBoard",
        )
        .await
    }
}

#[async_trait]
impl StageSource for SqliteSource {
    async fn list_stages_by_board_ids(
        &self,
        board_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<PipelineStage>> {
        self.list(schema::STAGES, board_ids, filters, row_to_stage, "PipelineStage")
            .await
    }
}

#[async_trait]
impl OpportunitySource for SqliteSource {
    async fn list_opportunities_by_board_ids(
        &self,
        board_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<Opportunity>> {
        self.list(
            schema::OPPORTUNITIES,
            board_ids,
            filters,
            row_to_opportunity,
            "Opportunity",
        )
        .await
    }
}

#[async_trait]
impl InterviewTaskSource for SqliteSource {
    async fn list_tasks_by_opportunity_ids(
        &self,
        opportunity_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<InterviewTask>> {
        self.list(
            schema::TASKS,
            opportunity_ids,
            filters,
            row_to_task,
            "InterviewTask",
        )
        .await
    }
}

#[async_trait]
impl OfferSource for SqliteSource {
    async fn list_offers_by_opportunity_ids(
        &self,
        opportunity_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<OfferPackage>> {
        self.list(
            schema::OFFERS,
            opportunity_ids,
            filters,
            row_to_offer,
            "OfferPackage",
        )
        .await
    }
}

#[async_trait]
impl AutoApplyRuleSource for SqliteSource {
    async fn list_auto_apply_rules(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<AutoApplyRule>> {
        self.list(schema::RULES, &[subject.get()], filters, row_to_rule, "AutoApplyRule")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use gigdash_core::records::generate_demo_dataset;
    use gigdash_core::sources::TimeRange;

    use crate::storage::inmemory::InMemorySource;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn subject(id: i64) -> SubjectId {
        SubjectId::new(id).unwrap()
    }

    fn demo_dataset() -> Dataset {
        let mut dataset = generate_demo_dataset(1, now());
        dataset.extend(generate_demo_dataset(2, now()));
        dataset
    }

    async fn setup() -> SqliteSource {
        let source = SqliteSource::new_in_memory().await.unwrap();
        source.insert_dataset(demo_dataset()).await.unwrap();
        source
    }

    #[tokio::test]
    async fn test_get_user() {
        let source = setup().await;

        let user = source.get_user(subject(1)).await.unwrap().unwrap();
        assert_eq!(user.display_name, "Demo Freelancer 1");
        assert!(source.get_user(subject(77)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_default_board() {
        let source = setup().await;

        let board = source.get_default_board(subject(2)).await.unwrap().unwrap();
        assert_eq!(board.user_id, 2);
        assert!(board.is_default);
        assert!(source.get_default_board(subject(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_with_no_ids_is_empty() {
        let source = setup().await;

        let offers = source
            .list_offers_by_opportunity_ids(&[], &ListFilters::batch())
            .await
            .unwrap();
        assert!(offers.is_empty());
    }

    #[tokio::test]
    async fn test_filters_apply_in_sql() {
        let source = setup().await;

        let filters = ListFilters::default().with_statuses(["todo"]).with_limit(2);
        let board = source.get_default_board(subject(1)).await.unwrap().unwrap();
        let opportunities = source
            .list_opportunities_by_board_ids(&[board.id], &ListFilters::default())
            .await
            .unwrap();
        let ids: Vec<_> = opportunities.iter().map(|o| o.id).collect();

        let tasks = source
            .list_tasks_by_opportunity_ids(&ids, &filters)
            .await
            .unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.status.as_str() == "todo"));

        let range = TimeRange::new(now() - Duration::hours(7), now()).unwrap();
        let notifications = source
            .list_notifications(subject(1), &ListFilters::default().with_range(range))
            .await
            .unwrap();
        assert_eq!(notifications.len(), 2);
    }

    #[tokio::test]
    async fn test_matches_in_memory_backend() {
        let sqlite = setup().await;
        let memory = InMemorySource::from_dataset(demo_dataset());
        let all = ListFilters::default().with_limit(120);
        let batch = ListFilters::batch();

        for id in [1, 2] {
            let s = subject(id);
            assert_eq!(
                sqlite.list_applications(s, &all).await.unwrap(),
                memory.list_applications(s, &all).await.unwrap()
            );
            assert_eq!(
                sqlite.list_notifications(s, &all).await.unwrap(),
                memory.list_notifications(s, &all).await.unwrap()
            );
            assert_eq!(
                sqlite.list_auto_apply_rules(s, &all).await.unwrap(),
                memory.list_auto_apply_rules(s, &all).await.unwrap()
            );

            let orders = sqlite.list_orders(s, &all).await.unwrap();
            assert_eq!(orders, memory.list_orders(s, &all).await.unwrap());
            let order_ids: Vec<_> = orders.iter().map(|o| o.id).collect();
            assert_eq!(
                sqlite
                    .list_milestones_by_order_ids(&order_ids, &batch)
                    .await
                    .unwrap(),
                memory
                    .list_milestones_by_order_ids(&order_ids, &batch)
                    .await
                    .unwrap()
            );

            let board = sqlite.get_default_board(s).await.unwrap();
            assert_eq!(board, memory.get_default_board(s).await.unwrap());
            let board_ids: Vec<_> = board.iter().map(|b| b.id).collect();
            assert_eq!(
                sqlite.list_stages_by_board_ids(&board_ids, &batch).await.unwrap(),
                memory.list_stages_by_board_ids(&board_ids, &batch).await.unwrap()
            );

            let opportunities = sqlite
                .list_opportunities_by_board_ids(&board_ids, &all)
                .await
                .unwrap();
            assert_eq!(
                opportunities,
                memory
                    .list_opportunities_by_board_ids(&board_ids, &all)
                    .await
                    .unwrap()
            );
            let opportunity_ids: Vec<_> = opportunities.iter().map(|o| o.id).collect();
            assert_eq!(
                sqlite
                    .list_tasks_by_opportunity_ids(&opportunity_ids, &batch)
                    .await
                    .unwrap(),
                memory
                    .list_tasks_by_opportunity_ids(&opportunity_ids, &batch)
                    .await
                    .unwrap()
            );
            assert_eq!(
                sqlite
                    .list_offers_by_opportunity_ids(&opportunity_ids, &batch)
                    .await
                    .unwrap(),
                memory
                    .list_offers_by_opportunity_ids(&opportunity_ids, &batch)
                    .await
                    .unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_unparseable_optional_timestamp_reads_as_none() {
        let source = setup().await;

        source
            .conn
            .call(|conn| {
                conn.execute(
                    "UPDATE applications SET follow_up_at = 'soon' WHERE user_id = 1",
                    [],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .unwrap();

        let applications = source
            .list_applications(subject(1), &ListFilters::default())
            .await
            .unwrap();
        assert!(applications.iter().all(|a| a.follow_up_at.is_none()));
    }

    #[tokio::test]
    async fn test_unknown_status_is_invalid_data() {
        let source = setup().await;

        source
            .conn
            .call(|conn| {
                conn.execute("UPDATE orders SET status = 'lost_in_mail' WHERE seller_id = 2", [])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .unwrap();

        let result = source.list_orders(subject(2), &ListFilters::default()).await;
        assert!(matches!(result, Err(DataSourceError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let path = std::env::temp_dir().join(format!("gigdash-test-{}.db", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(&path);

        {
            let source = SqliteSource::new(&path_str).await.unwrap();
            source.insert_dataset(generate_demo_dataset(1, now())).await.unwrap();
        }

        let reopened = SqliteSource::new(&path_str).await.unwrap();
        assert!(reopened.get_user(subject(1)).await.unwrap().is_some());

        let _ = std::fs::remove_file(&path);
    }
}
