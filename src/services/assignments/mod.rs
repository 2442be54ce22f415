//! 评委-候选人分配引擎

pub mod distribution;
pub mod rebalance;
pub mod stats;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::audited;
use crate::errors::{JuryError, Result};
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentPair, DistributionQuality, EvaluatorLoad},
        requests::{AssignmentListQuery, AutoDistributeRequest, ManualAssignRequest},
        responses::{
            AssignmentStatistics, ClearAssignmentsResult, DistributionResult,
            ManualAssignResponse, RebalanceResult,
        },
    },
    audit::entities::{AuditAction, AuditScope, NewAuditEntry},
    auth::entities::{AccountRole, Actor, Capability},
};
use crate::storage::Storage;

use distribution::{PlanOptions, loads_after, plan_distribution};
use rebalance::plan_rebalance;
use stats::distribution_stats;

/// 单个评委允许的分配上限
const MAX_CANDIDATES_PER_JURY: u32 = 1000;

#[derive(Clone)]
pub struct AssignmentService {
    storage: Arc<dyn Storage>,
}

fn pairs_of(assignments: &[Assignment]) -> Vec<AssignmentPair> {
    assignments
        .iter()
        .map(|a| AssignmentPair {
            evaluator_id: a.evaluator_id,
            candidate_id: a.candidate_id,
        })
        .collect()
}

fn to_loads(loads: impl IntoIterator<Item = (i64, i64)>) -> Vec<EvaluatorLoad> {
    loads
        .into_iter()
        .map(|(evaluator_id, count)| EvaluatorLoad {
            evaluator_id,
            count,
        })
        .collect()
}

impl AssignmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 评委只能查看自己的分配
    fn ensure_visible(actor: &Actor, evaluator_id: i64) -> Result<()> {
        match actor.role {
            AccountRole::Jury => {
                if actor.evaluator_id()? == evaluator_id {
                    Ok(())
                } else {
                    Err(JuryError::permission("评委只能查看自己的分配"))
                }
            }
            AccountRole::Admin => actor.require(Capability::ManageAssignments),
        }
    }

    // 检查分配是否存在
    pub async fn exists(&self, actor: &Actor, evaluator_id: i64, candidate_id: i64) -> Result<bool> {
        Self::ensure_visible(actor, evaluator_id)?;
        self.storage.assignment_exists(evaluator_id, candidate_id).await
    }

    // 自动分配
    pub async fn auto_distribute(
        &self,
        actor: &Actor,
        req: AutoDistributeRequest,
    ) -> Result<DistributionResult> {
        actor.require(Capability::ManageAssignments)?;
        if req.candidates_per_jury == 0 || req.candidates_per_jury > MAX_CANDIDATES_PER_JURY {
            return Err(JuryError::validation(format!(
                "candidates_per_jury 必须在 1 到 {MAX_CANDIDATES_PER_JURY} 之间"
            )));
        }

        let evaluators: Vec<i64> = self
            .storage
            .list_evaluators(true)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        let candidates: Vec<i64> = self
            .storage
            .list_distributable_candidates()
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        // 没有评委或候选人时不做任何写入，包括 clear_existing
        if evaluators.is_empty() || candidates.is_empty() {
            debug!(
                "Nothing to distribute: {} evaluators, {} candidates",
                evaluators.len(),
                candidates.len()
            );
            return Ok(DistributionResult::empty(req.dry_run));
        }

        let existing = if req.clear_existing {
            Vec::new()
        } else {
            pairs_of(&self.storage.list_assignments(None, None).await?)
        };

        let options = PlanOptions {
            method: req.method,
            candidates_per_jury: req.candidates_per_jury,
            max_total: req.max_total,
            seed: req.seed,
        };
        let planned = plan_distribution(&evaluators, &candidates, &existing, &options);

        if req.dry_run {
            debug!(
                "Dry-run distribution planned {} assignments for {} evaluators",
                planned.len(),
                evaluators.len()
            );
            let loads = loads_after(&evaluators, &existing, &planned);
            return Ok(DistributionResult {
                assignments_created: 0,
                per_evaluator_counts: to_loads(loads),
                dry_run: true,
                planned,
            });
        }

        let entry = NewAuditEntry::new(AuditAction::AssignmentsDistributed, AuditScope::All, actor)
            .details(serde_json::json!({
                "method": req.method,
                "candidates_per_jury": req.candidates_per_jury,
                "clear_existing": req.clear_existing,
                "seed": req.seed,
                "max_total": req.max_total,
            }));
        let created = audited(
            &self.storage,
            entry.clone(),
            self.storage
                .apply_assignments(planned, req.clear_existing, entry),
        )
        .await?;

        let after = pairs_of(&self.storage.list_assignments(None, None).await?);
        info!(
            "Auto-distribution ({}) created {} assignments by account {}",
            req.method, created, actor.account_id
        );

        Ok(DistributionResult {
            assignments_created: created,
            per_evaluator_counts: to_loads(loads_after(&evaluators, &after, &[])),
            dry_run: false,
            planned: Vec::new(),
        })
    }

    // 再平衡，持有有效评分的分配不迁移
    pub async fn rebalance(&self, actor: &Actor) -> Result<RebalanceResult> {
        actor.require(Capability::ManageAssignments)?;

        let evaluators: Vec<i64> = self
            .storage
            .list_evaluators(true)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        let current = pairs_of(&self.storage.list_assignments(None, None).await?);
        let pinned = self.storage.pinned_pairs().await?;

        let moves = plan_rebalance(&evaluators, &current, &pinned);
        let entry = NewAuditEntry::new(AuditAction::AssignmentsRebalanced, AuditScope::All, actor)
            .details(serde_json::json!({
                "planned_moves": moves.len(),
                "pinned_pairs": pinned.len(),
            }));
        let applied = audited(
            &self.storage,
            entry.clone(),
            self.storage.apply_moves(moves, entry),
        )
        .await?;

        info!(
            "Rebalance moved {} assignments by account {}",
            applied.len(),
            actor.account_id
        );
        Ok(RebalanceResult {
            moved_count: applied.len() as u64,
            moves: applied,
        })
    }

    // 清空全部分配；不级联时遗留的评分在读取时被拒绝
    pub async fn clear_all(
        &self,
        actor: &Actor,
        cascade_evaluations: bool,
    ) -> Result<ClearAssignmentsResult> {
        actor.require(Capability::ManageAssignments)?;

        let entry = NewAuditEntry::new(AuditAction::AssignmentsCleared, AuditScope::All, actor);
        let result = audited(
            &self.storage,
            entry.clone(),
            self.storage.clear_assignments(cascade_evaluations, entry),
        )
        .await?;

        warn!(
            "All assignments cleared by account {}: {} assignments, {} evaluations removed",
            actor.account_id, result.assignments_removed, result.evaluations_removed
        );
        Ok(result)
    }

    // 手动分配
    pub async fn manual_assign(
        &self,
        actor: &Actor,
        req: ManualAssignRequest,
    ) -> Result<ManualAssignResponse> {
        actor.require(Capability::ManageAssignments)?;
        if req.candidate_ids.is_empty() {
            return Err(JuryError::validation("candidate_ids 不能为空"));
        }

        let evaluator = self
            .storage
            .get_evaluator(req.evaluator_id)
            .await?
            .ok_or_else(|| JuryError::not_found(format!("评委不存在: {}", req.evaluator_id)))?;
        if !evaluator.is_active {
            return Err(JuryError::validation(format!(
                "评委 {} 已停用，不能接收分配",
                evaluator.id
            )));
        }

        let mut seen = HashSet::new();
        let mut pairs = Vec::with_capacity(req.candidate_ids.len());
        for candidate_id in req.candidate_ids {
            if !seen.insert(candidate_id) {
                continue;
            }
            let candidate = self
                .storage
                .get_candidate(candidate_id)
                .await?
                .ok_or_else(|| JuryError::not_found(format!("候选人不存在: {candidate_id}")))?;
            if !candidate.status.is_distributable() {
                return Err(JuryError::validation(format!(
                    "候选人 {candidate_id} 已退出评选"
                )));
            }
            pairs.push(AssignmentPair {
                evaluator_id: evaluator.id,
                candidate_id,
            });
        }

        let candidate_ids: Vec<i64> = pairs.iter().map(|p| p.candidate_id).collect();
        let entry =
            NewAuditEntry::new(AuditAction::AssignmentsCreated, AuditScope::Evaluator, actor)
                .evaluator(Some(evaluator.id))
                .details(serde_json::json!({ "candidate_ids": candidate_ids }));
        let assigned_count = audited(
            &self.storage,
            entry.clone(),
            self.storage.apply_assignments(pairs, false, entry),
        )
        .await?;

        info!(
            "Assigned {} candidates to evaluator {} by account {}",
            assigned_count, evaluator.id, actor.account_id
        );
        Ok(ManualAssignResponse { assigned_count })
    }

    // 删除单条分配
    pub async fn remove_assignment(
        &self,
        actor: &Actor,
        evaluator_id: i64,
        candidate_id: i64,
        cascade_evaluations: bool,
    ) -> Result<()> {
        actor.require(Capability::ManageAssignments)?;

        let entry =
            NewAuditEntry::new(AuditAction::AssignmentRemoved, AuditScope::Individual, actor)
                .evaluator(Some(evaluator_id))
                .candidate(Some(candidate_id));
        let removed = audited(
            &self.storage,
            entry.clone(),
            self.storage
                .remove_assignment(evaluator_id, candidate_id, cascade_evaluations, entry),
        )
        .await?;

        if !removed {
            return Err(JuryError::not_found(format!(
                "分配不存在: 评委 {evaluator_id} / 候选人 {candidate_id}"
            )));
        }
        warn!(
            "Assignment {}/{} removed by account {} (cascade: {})",
            evaluator_id, candidate_id, actor.account_id, cascade_evaluations
        );
        Ok(())
    }

    // 分配统计
    pub async fn statistics(&self, actor: &Actor) -> Result<AssignmentStatistics> {
        actor.require(Capability::ViewReports)?;

        let evaluators: Vec<i64> = self
            .storage
            .list_evaluators(true)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        let current = pairs_of(&self.storage.list_assignments(None, None).await?);

        let loads = loads_after(&evaluators, &current, &[]);
        let counts: Vec<i64> = loads.values().copied().collect();
        let summary = distribution_stats(&counts);

        let assigned_candidates = current
            .iter()
            .map(|p| p.candidate_id)
            .collect::<HashSet<_>>()
            .len() as i64;
        let assigned_evaluators = current
            .iter()
            .map(|p| p.evaluator_id)
            .collect::<HashSet<_>>()
            .len() as i64;

        debug!(
            "Assignment statistics: total={}, stddev={:.3}",
            current.len(),
            summary.stddev
        );
        Ok(AssignmentStatistics {
            total: current.len() as i64,
            assigned_candidates,
            assigned_evaluators,
            per_evaluator_counts: to_loads(loads),
            min: summary.min,
            max: summary.max,
            average: summary.average,
            stddev: summary.stddev,
            quality: DistributionQuality::from_stddev(summary.stddev),
        })
    }

    // 尚未分配给任何评委的候选人（不含已退出）
    pub async fn unassigned_candidates(&self, actor: &Actor) -> Result<Vec<i64>> {
        actor.require(Capability::ViewReports)?;

        let assigned: HashSet<i64> = self
            .storage
            .list_assignments(None, None)
            .await?
            .into_iter()
            .map(|a| a.candidate_id)
            .collect();

        Ok(self
            .storage
            .list_distributable_candidates()
            .await?
            .into_iter()
            .map(|c| c.id)
            .filter(|id| !assigned.contains(id))
            .collect())
    }

    // 列出分配；评委只能看到自己的
    pub async fn list(&self, actor: &Actor, query: AssignmentListQuery) -> Result<Vec<Assignment>> {
        let evaluator_id = match actor.role {
            AccountRole::Jury => Some(actor.evaluator_id()?),
            AccountRole::Admin => {
                actor.require(Capability::ManageAssignments)?;
                query.evaluator_id
            }
        };
        self.storage
            .list_assignments(evaluator_id, query.candidate_id)
            .await
    }
}
