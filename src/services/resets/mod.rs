//! 重置与备份服务
//!
//! 所有破坏性操作遵循“先备份、后变更”，由存储层在单个事务内完成。

pub mod backup;
pub mod reset;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    auth::entities::Actor,
    backups::{
        entities::Backup,
        requests::{BackupHistoryQuery, CreateBackupRequest, RestoreBackupRequest},
        responses::{BackupStatistics, CreateBackupResponse, RestoreBackupResponse},
    },
    resets::{
        requests::{BulkResetRequest, IndividualResetRequest},
        responses::ResetOutcome,
    },
};
use crate::storage::Storage;

#[derive(Clone)]
pub struct ResetService {
    storage: Arc<dyn Storage>,
    backup_retention_days: i64,
}

impl ResetService {
    pub fn new(storage: Arc<dyn Storage>, backup_retention_days: i64) -> Self {
        Self {
            storage,
            backup_retention_days,
        }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn backup_retention_days(&self) -> i64 {
        self.backup_retention_days
    }

    // 重置单条投票及对应评分
    pub async fn reset_individual(
        &self,
        actor: &Actor,
        req: IndividualResetRequest,
    ) -> Result<ResetOutcome> {
        reset::reset_individual(self, actor, req).await
    }

    // 批量重置
    pub async fn bulk_reset(&self, actor: &Actor, req: BulkResetRequest) -> Result<ResetOutcome> {
        reset::bulk_reset(self, actor, req).await
    }

    // 手动备份
    pub async fn create_backup(
        &self,
        actor: &Actor,
        req: CreateBackupRequest,
    ) -> Result<CreateBackupResponse> {
        backup::create_backup(self, actor, req).await
    }

    // 恢复备份
    pub async fn restore_backup(
        &self,
        actor: &Actor,
        req: RestoreBackupRequest,
    ) -> Result<RestoreBackupResponse> {
        backup::restore_backup(self, actor, req).await
    }

    // 备份历史
    pub async fn backup_history(
        &self,
        actor: &Actor,
        query: BackupHistoryQuery,
    ) -> Result<Vec<Backup>> {
        backup::backup_history(self, actor, query).await
    }

    // 备份统计
    pub async fn backup_statistics(&self, actor: &Actor) -> Result<BackupStatistics> {
        backup::backup_statistics(self, actor).await
    }

    // 删除超过保留期且从未恢复的备份，days 为空时使用配置的保留期
    pub async fn purge_expired_backups(&self, actor: &Actor, days: Option<i64>) -> Result<u64> {
        backup::purge_expired_backups(self, actor, days).await
    }
}
