use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gigdash_core::cache::DashboardNamespace;
use gigdash_core::clock::Clock;
use gigdash_core::records::RecordId;
use gigdash_core::snapshot::{PipelineAutomation, PipelineInputs};
use gigdash_core::sources::{ListFilters, PipelineSource, Result};
use gigdash_core::subject::SubjectId;

use super::{fetch_stage, SnapshotAssembler};

/// Most opportunities a board snapshot looks at.
const OPPORTUNITY_LIMIT: usize = 120;

/// Assembles [`PipelineAutomation`] snapshots.
///
/// Three stages: the default board; then its stages, opportunities and the
/// subject's rules concurrently; then tasks and offers of all opportunities,
/// each as one batch. Six calls at most, whatever the number of opportunities.
#[derive(Clone)]
pub struct PipelineAssembler {
    source: Arc<dyn PipelineSource>,
    clock: Arc<dyn Clock>,
    fetch_timeout: Duration,
}

impl PipelineAssembler {
    pub fn new(
        source: Arc<dyn PipelineSource>,
        clock: Arc<dyn Clock>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            fetch_timeout,
        }
    }
}

#[async_trait]
impl SnapshotAssembler for PipelineAssembler {
    type Snapshot = PipelineAutomation;

    const NAMESPACE: DashboardNamespace = DashboardNamespace::PipelineAutomation;

    async fn build(&self, subject: SubjectId) -> Result<PipelineAutomation> {
        let now = self.clock.now();
        let source = &self.source;

        let Some(board) =
            fetch_stage("board", self.fetch_timeout, source.get_default_board(subject)).await?
        else {
            tracing::debug!(subject_id = %subject, "No pipeline board, assembling empty snapshot");
            return Ok(PipelineAutomation::empty(subject, now));
        };

        let board_ids = [board.id];
        let batch = ListFilters::batch();
        let opportunity_filters = ListFilters::default().with_limit(OPPORTUNITY_LIMIT);
        let rule_filters = ListFilters::default();

        let (stages, opportunities, rules) =
            fetch_stage("board records", self.fetch_timeout, async {
                tokio::try_join!(
                    source.list_stages_by_board_ids(&board_ids, &batch),
                    source.list_opportunities_by_board_ids(&board_ids, &opportunity_filters),
                    source.list_auto_apply_rules(subject, &rule_filters),
                )
            })
            .await?;

        let opportunity_ids: Vec<RecordId> = opportunities.iter().map(|o| o.id).collect();
        let (tasks, offers) = if opportunity_ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            fetch_stage("opportunity records", self.fetch_timeout, async {
                tokio::try_join!(
                    source.list_tasks_by_opportunity_ids(&opportunity_ids, &batch),
                    source.list_offers_by_opportunity_ids(&opportunity_ids, &batch),
                )
            })
            .await?
        };

        tracing::debug!(
            subject_id = %subject,
            board_id = board.id,
            stages = stages.len(),
            opportunities = opportunities.len(),
            tasks = tasks.len(),
            offers = offers.len(),
            rules = rules.len(),
            "Fetched pipeline records"
        );

        Ok(PipelineAutomation::assemble(
            subject,
            PipelineInputs {
                board: Some(board),
                stages,
                opportunities,
                tasks,
                offers,
                rules,
            },
            now,
        ))
    }
}
