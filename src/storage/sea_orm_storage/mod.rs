//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 所有维护不变量的“读-改-写”序列都在单个事务内完成，
//! 事务内的查询只经过事务句柄。

mod assignments;
mod audit;
mod backups;
mod evaluations;
mod phases;
mod resets;
mod roster;
mod votes;

use crate::config::DatabaseConfig;
use crate::errors::{JuryError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按配置连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::with_connection(db).await?;
        info!("SeaORM storage initialized, database: {}", db_url);
        Ok(storage)
    }

    /// 内存 SQLite，单连接，供测试使用
    pub async fn in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| JuryError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        // 内存库随连接销毁，必须固定为同一条连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| JuryError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Self::with_connection(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)).await
    }

    /// 包装现有连接并运行迁移
    pub async fn with_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| JuryError::database_config(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// 底层连接
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| JuryError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| JuryError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| JuryError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(JuryError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 当前秒级时间戳
pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
use std::collections::HashSet;

use super::{AuditFilter, EvaluationFilter, Storage};
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentMove, AssignmentPair},
        responses::ClearAssignmentsResult,
    },
    audit::{
        entities::{AuditEntry, NewAuditEntry},
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
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 候选人与评委模块
    async fn create_candidate(&self, req: CreateCandidateRequest) -> Result<Candidate> {
        self.create_candidate_impl(req).await
    }

    async fn import_candidates(&self, reqs: Vec<CreateCandidateRequest>) -> Result<Vec<Candidate>> {
        self.import_candidates_impl(reqs).await
    }

    async fn get_candidate(&self, id: i64) -> Result<Option<Candidate>> {
        self.get_candidate_impl(id).await
    }

    async fn list_candidates(&self, query: CandidateListQuery) -> Result<CandidateListResponse> {
        self.list_candidates_impl(query).await
    }

    async fn list_distributable_candidates(&self) -> Result<Vec<Candidate>> {
        self.list_distributable_candidates_impl().await
    }

    async fn update_candidate_status(
        &self,
        id: i64,
        status: CandidateStatus,
    ) -> Result<Option<Candidate>> {
        self.update_candidate_status_impl(id, status).await
    }

    async fn create_evaluator(&self, req: CreateEvaluatorRequest) -> Result<Evaluator> {
        self.create_evaluator_impl(req).await
    }

    async fn get_evaluator(&self, id: i64) -> Result<Option<Evaluator>> {
        self.get_evaluator_impl(id).await
    }

    async fn get_evaluator_by_account(&self, account_id: i64) -> Result<Option<Evaluator>> {
        self.get_evaluator_by_account_impl(account_id).await
    }

    async fn list_evaluators(&self, active_only: bool) -> Result<Vec<Evaluator>> {
        self.list_evaluators_impl(active_only).await
    }

    async fn deactivate_evaluator(&self, id: i64) -> Result<Option<Evaluator>> {
        self.deactivate_evaluator_impl(id).await
    }

    // 分配模块
    async fn assignment_exists(&self, evaluator_id: i64, candidate_id: i64) -> Result<bool> {
        assignments::assignment_exists_in(&self.db, evaluator_id, candidate_id).await
    }

    async fn list_assignments(
        &self,
        evaluator_id: Option<i64>,
        candidate_id: Option<i64>,
    ) -> Result<Vec<Assignment>> {
        self.list_assignments_impl(evaluator_id, candidate_id).await
    }

    async fn apply_assignments(
        &self,
        pairs: Vec<AssignmentPair>,
        clear_existing: bool,
        audit: NewAuditEntry,
    ) -> Result<u64> {
        self.apply_assignments_impl(pairs, clear_existing, audit)
            .await
    }

    async fn apply_moves(
        &self,
        moves: Vec<AssignmentMove>,
        audit: NewAuditEntry,
    ) -> Result<Vec<AssignmentMove>> {
        self.apply_moves_impl(moves, audit).await
    }

    async fn remove_assignment(
        &self,
        evaluator_id: i64,
        candidate_id: i64,
        cascade_evaluations: bool,
        audit: NewAuditEntry,
    ) -> Result<bool> {
        self.remove_assignment_impl(evaluator_id, candidate_id, cascade_evaluations, audit)
            .await
    }

    async fn clear_assignments(
        &self,
        cascade_evaluations: bool,
        audit: NewAuditEntry,
    ) -> Result<ClearAssignmentsResult> {
        self.clear_assignments_impl(cascade_evaluations, audit).await
    }

    async fn pinned_pairs(&self) -> Result<HashSet<(i64, i64)>> {
        assignments::pinned_pairs_in(&self.db).await
    }

    // 评分模块
    async fn save_evaluation(&self, evaluation: ValidatedEvaluation) -> Result<Evaluation> {
        self.save_evaluation_impl(evaluation).await
    }

    async fn get_evaluation(
        &self,
        evaluator_id: i64,
        candidate_id: i64,
    ) -> Result<Option<Evaluation>> {
        self.get_evaluation_impl(evaluator_id, candidate_id).await
    }

    async fn list_evaluations(&self, filter: EvaluationFilter) -> Result<Vec<Evaluation>> {
        self.list_evaluations_impl(filter).await
    }

    // 投票模块
    async fn cast_vote(
        &self,
        evaluator_id: i64,
        candidate_id: i64,
        rating: i32,
        comments: Option<String>,
    ) -> Result<Vote> {
        self.cast_vote_impl(evaluator_id, candidate_id, rating, comments)
            .await
    }

    async fn get_vote(&self, evaluator_id: i64, candidate_id: i64) -> Result<Option<Vote>> {
        self.get_vote_impl(evaluator_id, candidate_id).await
    }

    async fn get_vote_by_id(&self, id: i64) -> Result<Option<Vote>> {
        self.get_vote_by_id_impl(id).await
    }

    // 阶段模块
    async fn current_phase(&self) -> Result<Phase> {
        phases::current_phase_in(&self.db)
            .await
            .map(|m| m.into_phase())
    }

    async fn list_phases(&self) -> Result<Vec<Phase>> {
        self.list_phases_impl().await
    }

    async fn set_phase_lock(
        &self,
        name: &str,
        locked: bool,
        audit: NewAuditEntry,
    ) -> Result<Option<Phase>> {
        self.set_phase_lock_impl(name, locked, audit).await
    }

    // 重置与备份模块
    async fn execute_reset(
        &self,
        command: ResetCommand,
        audit: NewAuditEntry,
    ) -> Result<ResetOutcome> {
        self.execute_reset_impl(command, audit).await
    }

    async fn create_backup(
        &self,
        backup_type: BackupType,
        reason: String,
        audit: NewAuditEntry,
    ) -> Result<Backup> {
        self.create_backup_impl(backup_type, reason, audit).await
    }

    async fn restore_backup(
        &self,
        backup_id: i64,
        expected_type: Option<BackupType>,
        audit: NewAuditEntry,
    ) -> Result<RestoreBackupResponse> {
        self.restore_backup_impl(backup_id, expected_type, audit)
            .await
    }

    async fn get_backup(&self, id: i64) -> Result<Option<Backup>> {
        self.get_backup_impl(id).await
    }

    async fn list_backups(&self, limit: u64) -> Result<Vec<Backup>> {
        self.list_backups_impl(limit).await
    }

    async fn backup_statistics(&self, recent_since: i64) -> Result<BackupStatistics> {
        self.backup_statistics_impl(recent_since).await
    }

    async fn purge_backups(&self, older_than: i64, audit: NewAuditEntry) -> Result<u64> {
        self.purge_backups_impl(older_than, audit).await
    }

    // 审计模块
    async fn append_audit(&self, entry: NewAuditEntry) -> Result<i64> {
        audit::insert_audit(&self.db, entry).await
    }

    async fn find_audit(&self, filter: AuditFilter) -> Result<Vec<AuditEntry>> {
        self.find_audit_impl(filter).await
    }

    async fn list_audit(&self, query: AuditListQuery) -> Result<AuditListResponse> {
        self.list_audit_impl(query).await
    }

    async fn audit_statistics(&self) -> Result<AuditStatistics> {
        self.audit_statistics_impl().await
    }

    async fn clean_audit(&self, older_than: i64, audit: NewAuditEntry) -> Result<u64> {
        self.clean_audit_impl(older_than, audit).await
    }
}
