use std::collections::HashSet;
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentMove, AssignmentPair},
        responses::ClearAssignmentsResult,
    },
    audit::{
        entities::{AuditAction, AuditEntry, NewAuditEntry},
        requests::AuditListQuery,
        responses::{AuditListResponse, AuditStatistics},
    },
    backups::{
        entities::{Backup, BackupType},
        responses::{BackupStatistics, RestoreBackupResponse},
    },
    candidates::{
        entities::{Candidate, CandidateStatus},
        requests::{CandidateListQuery, CreateCandidateRequest},
        responses::CandidateListResponse,
    },
    evaluations::entities::{Evaluation, ValidatedEvaluation},
    evaluators::{entities::Evaluator, requests::CreateEvaluatorRequest},
    phases::entities::Phase,
    resets::{entities::ResetCommand, responses::ResetOutcome},
    votes::entities::Vote,
};

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

/// 评分记录过滤条件
#[derive(Debug, Clone, Default)]
pub struct EvaluationFilter {
    pub evaluator_id: Option<i64>,
    pub candidate_id: Option<i64>,
    /// 仅已提交
    pub submitted_only: bool,
}

/// 审计日志过滤条件
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub actor_id: Option<i64>,
    pub scope: Option<crate::models::audit::entities::AuditScope>,
    pub actions: Vec<AuditAction>,
    pub limit: Option<u64>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 候选人与评委管理方法
    // 创建候选人
    async fn create_candidate(&self, req: CreateCandidateRequest) -> Result<Candidate>;
    // 批量导入候选人（单事务）
    async fn import_candidates(&self, reqs: Vec<CreateCandidateRequest>) -> Result<Vec<Candidate>>;
    // 通过ID获取候选人
    async fn get_candidate(&self, id: i64) -> Result<Option<Candidate>>;
    // 列出候选人
    async fn list_candidates(&self, query: CandidateListQuery) -> Result<CandidateListResponse>;
    // 全部参与分配的候选人（排除已退出）
    async fn list_distributable_candidates(&self) -> Result<Vec<Candidate>>;
    // 更新候选人状态
    async fn update_candidate_status(
        &self,
        id: i64,
        status: CandidateStatus,
    ) -> Result<Option<Candidate>>;
    // 评委入职
    async fn create_evaluator(&self, req: CreateEvaluatorRequest) -> Result<Evaluator>;
    // 通过ID获取评委
    async fn get_evaluator(&self, id: i64) -> Result<Option<Evaluator>>;
    // 通过账户ID获取评委
    async fn get_evaluator_by_account(&self, account_id: i64) -> Result<Option<Evaluator>>;
    // 列出评委
    async fn list_evaluators(&self, active_only: bool) -> Result<Vec<Evaluator>>;
    // 停用评委
    async fn deactivate_evaluator(&self, id: i64) -> Result<Option<Evaluator>>;

    /// 分配管理方法
    // 分配是否存在
    async fn assignment_exists(&self, evaluator_id: i64, candidate_id: i64) -> Result<bool>;
    // 列出分配
    async fn list_assignments(
        &self,
        evaluator_id: Option<i64>,
        candidate_id: Option<i64>,
    ) -> Result<Vec<Assignment>>;
    // 写入一组分配，已存在的组合跳过；clear_existing 时先清空，整体在一个事务内
    async fn apply_assignments(
        &self,
        pairs: Vec<AssignmentPair>,
        clear_existing: bool,
        audit: NewAuditEntry,
    ) -> Result<u64>;
    // 执行再平衡迁移，返回实际迁移的记录
    async fn apply_moves(
        &self,
        moves: Vec<AssignmentMove>,
        audit: NewAuditEntry,
    ) -> Result<Vec<AssignmentMove>>;
    // 删除单条分配
    async fn remove_assignment(
        &self,
        evaluator_id: i64,
        candidate_id: i64,
        cascade_evaluations: bool,
        audit: NewAuditEntry,
    ) -> Result<bool>;
    // 清空全部分配
    async fn clear_assignments(
        &self,
        cascade_evaluations: bool,
        audit: NewAuditEntry,
    ) -> Result<ClearAssignmentsResult>;
    // 持有有效评分（草稿或已提交）的评委-候选人组合
    async fn pinned_pairs(&self) -> Result<HashSet<(i64, i64)>>;

    /// 评分方法
    // 保存评分（草稿或提交），单事务内完成校验与写入
    async fn save_evaluation(&self, evaluation: ValidatedEvaluation) -> Result<Evaluation>;
    // 获取当前阶段的有效评分；分配已不存在时返回 Conflict
    async fn get_evaluation(&self, evaluator_id: i64, candidate_id: i64)
    -> Result<Option<Evaluation>>;
    // 列出仍有分配支撑的有效评分
    async fn list_evaluations(&self, filter: EvaluationFilter) -> Result<Vec<Evaluation>>;

    /// 投票方法
    // 投票（同一阶段同一组合只保留一条有效投票）
    async fn cast_vote(
        &self,
        evaluator_id: i64,
        candidate_id: i64,
        rating: i32,
        comments: Option<String>,
    ) -> Result<Vote>;
    // 获取当前阶段的有效投票
    async fn get_vote(&self, evaluator_id: i64, candidate_id: i64) -> Result<Option<Vote>>;
    // 通过ID获取投票
    async fn get_vote_by_id(&self, id: i64) -> Result<Option<Vote>>;

    /// 阶段方法
    // 当前阶段
    async fn current_phase(&self) -> Result<Phase>;
    // 列出阶段
    async fn list_phases(&self) -> Result<Vec<Phase>>;
    // 锁定/解锁阶段
    async fn set_phase_lock(
        &self,
        name: &str,
        locked: bool,
        audit: NewAuditEntry,
    ) -> Result<Option<Phase>>;

    /// 重置与备份方法
    // 执行重置：读取锁状态、备份、变更、写审计，整体一个事务
    async fn execute_reset(&self, command: ResetCommand, audit: NewAuditEntry)
    -> Result<ResetOutcome>;
    // 手动备份（不做任何变更）
    async fn create_backup(
        &self,
        backup_type: BackupType,
        reason: String,
        audit: NewAuditEntry,
    ) -> Result<Backup>;
    // 恢复备份
    async fn restore_backup(
        &self,
        backup_id: i64,
        expected_type: Option<BackupType>,
        audit: NewAuditEntry,
    ) -> Result<RestoreBackupResponse>;
    // 通过ID获取备份
    async fn get_backup(&self, id: i64) -> Result<Option<Backup>>;
    // 备份历史，按时间倒序
    async fn list_backups(&self, limit: u64) -> Result<Vec<Backup>>;
    // 备份统计
    async fn backup_statistics(&self, recent_since: i64) -> Result<BackupStatistics>;
    // 删除早于给定时间且从未恢复过的备份
    async fn purge_backups(&self, older_than: i64, audit: NewAuditEntry) -> Result<u64>;

    /// 审计日志方法
    // 追加审计条目
    async fn append_audit(&self, entry: NewAuditEntry) -> Result<i64>;
    // 按条件查询审计条目，按时间倒序
    async fn find_audit(&self, filter: AuditFilter) -> Result<Vec<AuditEntry>>;
    // 分页列出审计条目
    async fn list_audit(&self, query: AuditListQuery) -> Result<AuditListResponse>;
    // 审计统计
    async fn audit_statistics(&self) -> Result<AuditStatistics>;
    // 删除早于给定时间的审计条目
    async fn clean_audit(&self, older_than: i64, audit: NewAuditEntry) -> Result<u64>;
}

/// 根据配置创建存储实例
pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
