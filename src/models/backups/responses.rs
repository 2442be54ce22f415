use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{Backup, BackupSource};

// 手动备份结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct CreateBackupResponse {
    pub backup_id: i64,
    pub votes_backed_up: i32,
    pub scores_backed_up: i32,
    pub timestamp: DateTime<Utc>,
}

// 恢复结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct RestoreBackupResponse {
    pub backup_id: i64,
    pub votes_restored: i64,
    pub scores_restored: i64,
}

// 备份历史
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct BackupHistoryResponse {
    pub backups: Vec<Backup>,
}

// 按来源统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct SourceCount {
    pub source: BackupSource,
    pub count: i64,
}

// 备份统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct BackupStatistics {
    pub total_backups: i64,
    pub recent_backups: i64,
    pub storage_size: i64,
    pub restorations: i64,
    pub by_source: Vec<SourceCount>,
}

// 清理过期备份结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct PurgeBackupsResponse {
    pub deleted: u64,
}
